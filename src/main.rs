use std::{
    collections::HashSet,
    fs,
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::Parser;
use minilang::{
    analyze,
    error::{Error, ErrorKind, RuntimeError},
    execute, generate,
    interpreter::lexer::Token,
    parse, tokenize,
};
use tracing_subscriber::EnvFilter;

/// minilang compiles programs written between `start` and `end` into
/// three-address code and runs them on a small virtual machine.
///
/// Without a mode flag every phase is shown: tokens, syntax and semantic
/// checks, the three-address code listing and finally the program output.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The source file to compile (`.mc`).
    path: PathBuf,

    /// Show only the lexer tokens.
    #[arg(long)]
    lex: bool,

    /// Show the phases up to and including the three-address code, without
    /// running the program.
    #[arg(long)]
    tac_only: bool,

    /// Only run the program and print nothing but its output. Unlike the
    /// default mode, no phase listings or summary table are shown.
    #[arg(long)]
    run: bool,

    /// Skip semantic analysis. The virtual machine still rejects undeclared
    /// variables and narrowing stores at run time.
    #[arg(long)]
    no_check: bool,

    /// Log the pipeline's progress to stderr.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Lex,
    Tac,
    Run,
    All,
}

impl Args {
    const fn mode(&self) -> Mode {
        if self.run {
            Mode::Run
        } else if self.tac_only {
            Mode::Tac
        } else if self.lex {
            Mode::Lex
        } else {
            Mode::All
        }
    }
}

/// Counters printed in the closing summary table.
#[derive(Debug, Default)]
struct Summary {
    tokens:           usize,
    unique_lexemes:   usize,
    tac_instructions: usize,
    failed:           Option<ErrorKind>,
    executed:         bool,
}

impl Summary {
    fn record_tokens(&mut self, tokens: &[Token]) {
        let user_tokens = tokens.iter().filter(|t| !t.is_eof());
        self.tokens = user_tokens.clone().count();
        self.unique_lexemes = user_tokens.map(|t| t.lexeme.as_str())
                                         .collect::<HashSet<_>>()
                                         .len();
    }

    fn errors(&self, kind: ErrorKind) -> usize {
        usize::from(self.failed == Some(kind))
    }

    fn print(&self) {
        println!();
        println!("========== OVERALL SUMMARY ==========");
        println!("TOTAL TOKENS       : {}", self.tokens);
        println!("UNIQUE LEXEMES     : {}", self.unique_lexemes);
        println!("LEXICAL ERRORS     : {}", self.errors(ErrorKind::Lexical));
        println!("SYNTAX ERRORS      : {}", self.errors(ErrorKind::Syntactic));
        println!("SEMANTIC ERRORS    : {}", self.errors(ErrorKind::Semantic));
        println!("RUNTIME ERRORS     : {}", self.errors(ErrorKind::Runtime));
        println!("TAC INSTRUCTIONS   : {}", self.tac_instructions);
        println!("VM EXECUTED        : {}", if self.executed { "YES" } else { "NO" });
        println!("=====================================");
    }
}

const fn error_header(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Lexical => "--- LEXER ERROR ---",
        ErrorKind::Syntactic => "--- PARSER (Syntax) ERROR ---",
        ErrorKind::Semantic => "--- SEMANTIC ANALYSIS ERROR ---",
        ErrorKind::Runtime => "--- RUNTIME ERROR ---",
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt().with_env_filter(filter)
                             .with_target(false)
                             .with_writer(io::stderr)
                             .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let source = match fs::read_to_string(&args.path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Failed to read the input file '{}': {e}", args.path.display());
            return ExitCode::FAILURE;
        },
    };

    let mode = args.mode();
    let mut summary = Summary::default();
    let result = compile_and_run(&args, mode, &source, &mut summary);

    if let Err(e) = &result {
        summary.failed = Some(e.kind());
        eprintln!();
        eprintln!("{}", error_header(e.kind()));
        eprintln!("{e}");
    }

    if mode != Mode::Run {
        summary.print();
    }

    if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn compile_and_run(args: &Args,
                   mode: Mode,
                   source: &str,
                   summary: &mut Summary)
                   -> Result<(), Error> {
    let listing = mode != Mode::Run;

    let tokens = tokenize(source)?;
    summary.record_tokens(&tokens);
    if listing {
        println!("--- LEXER (Lexemes / Tokens) ---");
        for token in &tokens {
            println!("'{}'\t=> {}", token.lexeme, token.kind.name());
        }
        println!();
    }
    if mode == Mode::Lex {
        return Ok(());
    }

    let program = parse(&tokens)?;
    if listing {
        println!("--- PARSER (Syntax) ---");
        println!("OK: no syntax error");
        println!();
    }

    if !args.no_check {
        analyze(&program)?;
        if listing {
            println!("--- SEMANTIC ANALYSIS ---");
            println!("OK: no semantic error");
            println!();
        }
    }

    let tac = generate(&program);
    summary.tac_instructions = tac.len();
    if listing {
        println!("--- THREE ADDRESS CODE ---");
        if tac.is_empty() {
            println!("(no instructions)");
        }
        print!("{tac}");
        println!();
    }
    if mode == Mode::Tac {
        return Ok(());
    }

    if listing {
        println!("--- PROGRAM OUTPUT (VM) ---");
    }
    let mut stdout = io::stdout().lock();
    let result = execute(&tac, &mut stdout);
    stdout.flush().map_err(RuntimeError::from)?;
    result?;
    summary.executed = true;
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn run_flag_help_contrasts_with_the_default_mode() {
        let help = Args::command().render_help().to_string();
        assert!(help.contains("Unlike the"));
        assert!(help.contains("default mode, no phase listings or summary table are shown"));
    }

    #[test]
    fn mode_flags_pick_the_most_specific_mode() {
        let args = Args::parse_from(["minilang", "prog.mc"]);
        assert_eq!(args.mode(), Mode::All);

        let args = Args::parse_from(["minilang", "prog.mc", "--lex", "--run"]);
        assert_eq!(args.mode(), Mode::Run);

        let args = Args::parse_from(["minilang", "prog.mc", "--lex", "--tac-only"]);
        assert_eq!(args.mode(), Mode::Tac);
    }
}
