//! # Argument Handles
//!
//! One synthesized argument instance within a single test body. Three kinds
//! exist:
//!
//! - [`BaseArgument`]: a plain value built by an [`ArgumentSynthesizer`]
//! - [`ExpressionArgument`]: a lazy, evaluation-counting proxy over a
//!   matrix-like base argument
//! - [`RngArgument`]: the random number generator appended to `*_rng`
//!   calls, which never goes through the per-type synthesizer
//!
//! All three share the capability surface of [`ArgumentHandle`] so call
//! construction does not care which kind it is handed.

mod expression;
mod synth;

pub use expression::ExpressionArgument;
pub use synth::{ArgumentSynthesizer, CppArgumentSynthesizer};

use crate::signature::ArgType;

/// Anything that can appear as an argument of a generated call.
pub trait Operand {
    /// Identifier in the generated code.
    fn name(&self) -> &str;
}

/// Plain synthesized argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseArgument {
    pub(crate) name: String,
    pub(crate) arg_type: ArgType,
    pub(crate) scalar: String,
    pub(crate) cpp_type: String,
    pub(crate) init: String,
    pub(crate) reverse_mode: bool,
}

impl BaseArgument {
    /// Signature type this argument was synthesized for.
    pub fn arg_type(&self) -> &ArgType {
        &self.arg_type
    }

    /// C++ scalar type of the argument's elements.
    pub fn scalar(&self) -> &str {
        &self.scalar
    }

    /// Eligible for expression wrapping.
    pub fn is_matrix_like(&self) -> bool {
        self.arg_type.is_matrix_like()
    }

    /// Carries adjoints that must be checked.
    pub fn is_reverse_mode(&self) -> bool {
        self.reverse_mode
    }

    /// Declaration of the argument.
    pub fn cpp(&self) -> String {
        format!("{} {} = {};", self.cpp_type, self.name, self.init)
    }
}

/// Random number generator passed to `*_rng` functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RngArgument {
    pub(crate) name: String,
}

impl RngArgument {
    /// Declaration of a deterministically seeded generator.
    pub fn cpp(&self) -> String {
        format!("std::minstd_rand {}(0);", self.name)
    }
}

/// Any argument of a generated call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentHandle {
    /// Plain value
    Base(BaseArgument),
    /// Evaluation-counting expression over a base value
    Expression(ExpressionArgument),
    /// Random number generator
    Rng(RngArgument),
}

impl ArgumentHandle {
    /// Eligible for expression wrapping (expressions themselves stand in for
    /// matrix-like values).
    pub fn is_matrix_like(&self) -> bool {
        match self {
            Self::Base(base) => base.is_matrix_like(),
            Self::Expression(_) => true,
            Self::Rng(_) => false,
        }
    }

    /// Carries adjoints under the current overload.
    pub fn is_reverse_mode(&self) -> bool {
        match self {
            Self::Base(base) => base.is_reverse_mode(),
            Self::Expression(expr) => expr.base().is_reverse_mode(),
            Self::Rng(_) => false,
        }
    }

    /// The wrapped expression, if this is one.
    pub fn as_expression(&self) -> Option<&ExpressionArgument> {
        match self {
            Self::Expression(expr) => Some(expr),
            _ => None,
        }
    }

    /// The plain base value, if this is one.
    pub fn as_base(&self) -> Option<&BaseArgument> {
        match self {
            Self::Base(base) => Some(base),
            _ => None,
        }
    }

    /// Declaration code of the argument.
    pub fn cpp(&self) -> String {
        match self {
            Self::Base(base) => base.cpp(),
            Self::Expression(expr) => expr.cpp(),
            Self::Rng(rng) => rng.cpp(),
        }
    }
}

impl Operand for BaseArgument {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Operand for RngArgument {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Operand for ArgumentHandle {
    fn name(&self) -> &str {
        match self {
            Self::Base(base) => base.name(),
            Self::Expression(expr) => expr.name(),
            Self::Rng(rng) => rng.name(),
        }
    }
}

/// Value bound by a generated `auto name = f(...)` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Value {
    pub(crate) name: String,
}

impl Operand for Value {
    fn name(&self) -> &str {
        &self.name
    }
}
