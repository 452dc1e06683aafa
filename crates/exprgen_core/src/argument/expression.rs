//! Expression wrappers over matrix-like arguments.

use super::{BaseArgument, Operand};
use crate::error::InvalidWrapError;

/// Lazily evaluated proxy over a matrix-like [`BaseArgument`] that counts
/// how many times its elements are evaluated.
///
/// The proxy is declared after its base; the base declaration itself is
/// left untouched.
///
/// # Examples
/// ```
/// use exprgen_core::argument::{ArgumentSynthesizer, CppArgumentSynthesizer, ExpressionArgument};
/// use exprgen_core::overload::Overload;
/// use exprgen_core::signature::ArgType;
///
/// let base = CppArgumentSynthesizer::new(1).synthesize(
///     Overload::Prim,
///     &ArgType::parse("vector").unwrap(),
///     "vector_0".to_string(),
///     None,
/// );
/// let expr = ExpressionArgument::wrap(&base, "vector_0_expr_1".to_string()).unwrap();
/// assert_eq!(expr.counter(), "vector_0_expr_1_counter");
/// assert_eq!(
///     expr.cpp(),
///     "int vector_0_expr_1_counter = 0;\n\
///      stan::test::counterOp<double> vector_0_expr_1_counter_op(&vector_0_expr_1_counter);\n\
///      auto vector_0_expr_1 = vector_0.unaryExpr(vector_0_expr_1_counter_op);"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionArgument {
    name: String,
    counter: String,
    base: BaseArgument,
}

impl ExpressionArgument {
    /// Wraps `base` in an expression named `name`.
    ///
    /// # Errors
    ///
    /// [`InvalidWrapError`] if `base` is not matrix-like.
    pub fn wrap(base: &BaseArgument, name: String) -> Result<Self, InvalidWrapError> {
        if !base.is_matrix_like() {
            return Err(InvalidWrapError {
                name: base.name().to_string(),
            });
        }
        Ok(Self {
            counter: format!("{}_counter", name),
            name,
            base: base.clone(),
        })
    }

    /// Variable holding the evaluation count.
    pub fn counter(&self) -> &str {
        &self.counter
    }

    /// Argument this expression wraps.
    pub fn base(&self) -> &BaseArgument {
        &self.base
    }

    /// Counter, counting functor and expression declarations.
    pub fn cpp(&self) -> String {
        format!(
            "int {counter} = 0;\n\
             stan::test::counterOp<{scalar}> {counter}_op(&{counter});\n\
             auto {name} = {base}.unaryExpr({counter}_op);",
            counter = self.counter,
            scalar = self.base.scalar(),
            name = self.name,
            base = self.base.name(),
        )
    }
}

impl Operand for ExpressionArgument {
    fn name(&self) -> &str {
        &self.name
    }
}
