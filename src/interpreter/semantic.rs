use tracing::debug;

use crate::{
    ast::{Expr, Position, Program, Statement, Type},
    error::SemanticError,
    interpreter::scope::{ScopeStack, Symbol},
};

/// Result type used by the semantic analyzer.
pub type SemanticResult<T> = Result<T, SemanticError>;

/// Static checker for declarations, name resolution and assignment
/// compatibility.
///
/// The analyzer walks the tree once, failing on the first violation. Each
/// block, and each non-block branch or loop body, is checked in its own
/// frame; the frame is released on every exit path.
#[derive(Debug, Default)]
pub struct SemanticAnalyzer {
    scopes: ScopeStack<Symbol>,
}

impl SemanticAnalyzer {
    /// Creates an analyzer with an empty global scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks a whole program.
    ///
    /// # Errors
    /// The first [`SemanticError`] encountered in source order.
    ///
    /// # Example
    /// ```
    /// use minilang::{interpreter::semantic::SemanticAnalyzer, parse, tokenize};
    ///
    /// let tokens = tokenize("start int x = 1; { float x = 2.5; } end").unwrap();
    /// let program = parse(&tokens).unwrap();
    ///
    /// assert!(SemanticAnalyzer::new().analyze(&program).is_ok());
    /// ```
    pub fn analyze(&mut self, program: &Program) -> SemanticResult<()> {
        for statement in &program.statements {
            self.check_statement(statement)?;
        }
        debug!(statements = program.statements.len(), "semantic analysis passed");
        Ok(())
    }

    fn check_statement(&mut self, statement: &Statement) -> SemanticResult<()> {
        match statement {
            Statement::VarDecl { ty, name, init, pos } => {
                if !self.scopes.declare(name, Symbol { ty: *ty }) {
                    return Err(SemanticError::DuplicateDeclaration { name:   name.clone(),
                                                                     line:   pos.line,
                                                                     column: pos.column, });
                }
                if let Some(init) = init {
                    let found = self.type_of(init)?;
                    check_assignable(name, *ty, found, *pos)?;
                }
                Ok(())
            },
            Statement::Assign { name, value, pos } => {
                let expected = self.resolve(name, *pos)?.ty;
                let found = self.type_of(value)?;
                check_assignable(name, expected, found, *pos)
            },
            Statement::Print { expr, .. } => self.type_of(expr).map(|_| ()),
            Statement::Block { statements, .. } => self.in_scope(|analyzer| {
                statements.iter()
                          .try_for_each(|s| analyzer.check_statement(s))
            }),
            Statement::If { condition,
                            then_branch,
                            else_branch,
                            .. } => {
                self.type_of(condition)?;
                self.check_branch(then_branch)?;
                match else_branch {
                    Some(else_branch) => self.check_branch(else_branch),
                    None => Ok(()),
                }
            },
            Statement::While { condition, body, .. } => {
                self.type_of(condition)?;
                self.check_branch(body)
            },
        }
    }

    /// Checks an `if`/`else`/`while` body. A block brings its own frame; any
    /// other statement gets an implicit one, so its declarations end with it.
    fn check_branch(&mut self, body: &Statement) -> SemanticResult<()> {
        if matches!(body, Statement::Block { .. }) {
            self.check_statement(body)
        } else {
            self.in_scope(|analyzer| analyzer.check_statement(body))
        }
    }

    /// Computes the static type of an expression.
    ///
    /// # Errors
    /// `UndeclaredVariable` for any name not visible from the current frame.
    pub fn type_of(&self, expr: &Expr) -> SemanticResult<Type> {
        match expr {
            Expr::Literal { value, .. } => Ok(value.ty()),
            Expr::Variable { name, pos } => Ok(self.resolve(name, *pos)?.ty),
            Expr::Unary { op, operand, .. } => Ok(op.result_type(self.type_of(operand)?)),
            Expr::Binary { left, op, right, .. } => {
                let left = self.type_of(left)?;
                let right = self.type_of(right)?;
                Ok(op.result_type(left, right))
            },
        }
    }

    fn resolve(&self, name: &str, pos: Position) -> SemanticResult<&Symbol> {
        self.scopes
            .resolve(name)
            .ok_or_else(|| SemanticError::UndeclaredVariable { name:   name.to_string(),
                                                               line:   pos.line,
                                                               column: pos.column, })
    }

    /// Runs `check` inside a fresh frame, popping it whether or not the
    /// check succeeds.
    fn in_scope<F>(&mut self, check: F) -> SemanticResult<()>
        where F: FnOnce(&mut Self) -> SemanticResult<()>
    {
        self.scopes.push();
        let result = check(self);
        self.scopes.pop();
        result
    }
}

fn check_assignable(name: &str, expected: Type, found: Type, pos: Position) -> SemanticResult<()> {
    if expected.accepts(found) {
        Ok(())
    } else {
        Err(SemanticError::NarrowingAssignment { name: name.to_string(),
                                                 expected,
                                                 found,
                                                 line: pos.line,
                                                 column: pos.column })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse, tokenize};

    fn check(source: &str) -> SemanticResult<()> {
        let tokens = tokenize(source).expect("lexes");
        let program = parse(&tokens).expect("parses");
        SemanticAnalyzer::new().analyze(&program)
    }

    #[test]
    fn duplicate_in_same_frame_fails() {
        let err = check("start int a; float a; end").unwrap_err();
        assert!(matches!(err, SemanticError::DuplicateDeclaration { ref name, .. } if name == "a"));
    }

    #[test]
    fn shadowing_in_nested_block_succeeds() {
        assert!(check("start int a = 1; { int a = 2; { float a = 3.5; } } end").is_ok());
    }

    #[test]
    fn widening_allowed_narrowing_rejected() {
        assert!(check("start float f = 1; f = 2; end").is_ok());

        let err = check("start int x = 1; x = x * 1.5; end").unwrap_err();
        assert_eq!(err,
                   SemanticError::NarrowingAssignment { name:     "x".to_string(),
                                                        expected: Type::Int,
                                                        found:    Type::Float,
                                                        line:     1,
                                                        column:   18, });
    }

    #[test]
    fn comparisons_and_not_type_to_int() {
        assert!(check("start float a = 1.5; int b = a < 2.0; int c = !a; end").is_ok());
        assert!(check("start float a = 1.5; int d = -a; end").is_err());
    }

    #[test]
    fn undeclared_variable_fails() {
        let err = check("start print(y); end").unwrap_err();
        assert!(matches!(err, SemanticError::UndeclaredVariable { ref name, .. } if name == "y"));
    }

    #[test]
    fn non_block_branch_declaration_does_not_escape() {
        assert!(check("start if (1) int y = 2; end").is_ok());

        let err = check("start if (1) int y = 2; print(y); end").unwrap_err();
        assert!(matches!(err, SemanticError::UndeclaredVariable { ref name, .. } if name == "y"));
    }

    #[test]
    fn block_frame_is_released_after_error_free_exit() {
        let err = check("start { int z = 1; } z = 2; end").unwrap_err();
        assert!(matches!(err, SemanticError::UndeclaredVariable { .. }));
    }

    #[test]
    fn declaration_is_visible_to_its_own_initializer() {
        assert!(check("start int x = x + 1; end").is_ok());
    }
}
