//! # Statement Sequencer
//!
//! [`FunctionGenerator`] accumulates the statements of one test body in
//! program order and hands out collision-free identifiers. Statements are
//! immutable records; [`FunctionGenerator::render`] is a pure function of
//! the recorded sequence.
//!
//! Identifiers are `<role>_<n>` with `n` taken from a per-generator counter
//! that only ever increases. Since every allocated name ends in its own
//! number, two allocations can never produce the same identifier, whatever
//! roles are requested.

use crate::argument::{
    ArgumentHandle, ArgumentSynthesizer, BaseArgument, ExpressionArgument, Operand, RngArgument,
    Value,
};
use crate::error::InvalidWrapError;
use crate::overload::Overload;
use crate::signature::ArgType;

/// One generated statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// Declaration of an argument
    Declare(ArgumentHandle),
    /// `auto name = function(args...);`
    CallAssign {
        /// Bound identifier
        name: String,
        /// Called function
        function: String,
        /// Argument identifiers
        args: Vec<String>,
    },
    /// `function(args...);`
    Call {
        /// Called function
        function: String,
        /// Argument identifiers
        args: Vec<String>,
    },
}

impl Statement {
    /// C++ source of the statement.
    pub fn cpp(&self) -> String {
        match self {
            Self::Declare(handle) => handle.cpp(),
            Self::CallAssign {
                name,
                function,
                args,
            } => format!("auto {} = {}({});", name, function, args.join(", ")),
            Self::Call { function, args } => format!("{}({});", function, args.join(", ")),
        }
    }
}

fn operand_names(args: &[&dyn Operand]) -> Vec<String> {
    args.iter().map(|arg| arg.name().to_string()).collect()
}

/// Append-only statement list for one test body.
///
/// # Examples
/// ```
/// use exprgen_core::argument::{CppArgumentSynthesizer, Operand};
/// use exprgen_core::overload::Overload;
/// use exprgen_core::sequencer::FunctionGenerator;
/// use exprgen_core::signature::ArgType;
///
/// let mut fg = FunctionGenerator::new();
/// let x = fg.add_argument(
///     &CppArgumentSynthesizer::default(),
///     Overload::Prim,
///     &ArgType::parse("real").unwrap(),
///     None,
/// );
/// let y = fg.call_assign("stan::math::exp", "result", &[&x]);
/// fg.call("EXPECT_STAN_EQ", &[&y, &x]);
///
/// assert_eq!(
///     fg.render(),
///     "double real_0 = 0.4;\n\
///      auto result_1 = stan::math::exp(real_0);\n\
///      EXPECT_STAN_EQ(result_1, real_0);"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct FunctionGenerator {
    statements: Vec<Statement>,
    next_id: usize,
}

impl FunctionGenerator {
    /// Empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh identifier for `role`.
    pub fn unique_name(&mut self, role: &str) -> String {
        let name = format!("{}_{}", role, self.next_id);
        self.next_id += 1;
        name
    }

    /// Synthesizes and declares an argument of type `arg_type`.
    pub fn add_argument<S>(
        &mut self,
        synthesizer: &S,
        overload: Overload,
        arg_type: &ArgType,
        value: Option<&str>,
    ) -> ArgumentHandle
    where
        S: ArgumentSynthesizer + ?Sized,
    {
        let name = self.unique_name(&arg_type.name_prefix());
        let base = synthesizer.synthesize(overload, arg_type, name, value);
        self.declare(ArgumentHandle::Base(base))
    }

    /// Declares an evaluation-counting expression over `base`.
    ///
    /// # Errors
    ///
    /// [`InvalidWrapError`] if `base` is not matrix-like; nothing is
    /// appended in that case.
    pub fn add_expression(
        &mut self,
        base: &BaseArgument,
    ) -> Result<ArgumentHandle, InvalidWrapError> {
        if !base.is_matrix_like() {
            return Err(InvalidWrapError {
                name: base.name().to_string(),
            });
        }
        let name = self.unique_name(&format!("{}_expr", base.name()));
        let expr = ExpressionArgument::wrap(base, name)?;
        Ok(self.declare(ArgumentHandle::Expression(expr)))
    }

    /// Declares a random number generator.
    pub fn add_rng(&mut self) -> ArgumentHandle {
        let name = self.unique_name("rng");
        self.declare(ArgumentHandle::Rng(RngArgument { name }))
    }

    fn declare(&mut self, handle: ArgumentHandle) -> ArgumentHandle {
        self.statements.push(Statement::Declare(handle.clone()));
        handle
    }

    /// Appends `auto <role>_<n> = function(args...);` and returns the bound
    /// value.
    pub fn call_assign(&mut self, function: &str, role: &str, args: &[&dyn Operand]) -> Value {
        let name = self.unique_name(role);
        self.statements.push(Statement::CallAssign {
            name: name.clone(),
            function: function.to_string(),
            args: operand_names(args),
        });
        Value { name }
    }

    /// Appends a bare call such as an assertion.
    pub fn call(&mut self, function: &str, args: &[&dyn Operand]) {
        self.statements.push(Statement::Call {
            function: function.to_string(),
            args: operand_names(args),
        });
    }

    /// Statements in program order.
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Source of all statements, one per line, in append order.
    pub fn render(&self) -> String {
        self.statements
            .iter()
            .map(Statement::cpp)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
