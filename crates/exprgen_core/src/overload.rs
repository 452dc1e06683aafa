//! Differentiation modes a function is instantiated under.

use std::fmt;

/// Calling convention used to synthesize arguments for one test body.
///
/// - `Prim`: plain `double` scalars
/// - `Rev`: reverse-mode `var` scalars (adjoints are checked)
/// - `Fwd`: forward-mode `fvar<double>` scalars
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Overload {
    /// Plain values
    Prim,
    /// Reverse-mode autodiff
    Rev,
    /// Forward-mode autodiff
    Fwd,
}

impl Overload {
    /// Every overload, in generation order.
    pub const ALL: [Overload; 3] = [Overload::Prim, Overload::Rev, Overload::Fwd];

    /// Name used in the test group, e.g. `ExpressionTestRev`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Prim => "Prim",
            Self::Rev => "Rev",
            Self::Fwd => "Fwd",
        }
    }

    /// C++ scalar type arguments are built from under this overload.
    pub fn scalar_type(&self) -> &'static str {
        match self {
            Self::Prim => "double",
            Self::Rev => "stan::math::var",
            Self::Fwd => "stan::math::fvar<double>",
        }
    }
}

impl fmt::Display for Overload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
