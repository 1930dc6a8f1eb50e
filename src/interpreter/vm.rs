/// The machine: frame stack, temporaries and the fetch-execute loop.
pub mod core;

/// Binary operator semantics: arithmetic with promotion, always-float
/// division, and comparisons yielding `0` or `1`.
pub mod binary;

/// Unary operator semantics.
pub mod unary;

pub use self::core::{Machine, RuntimeResult};
