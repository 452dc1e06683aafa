//! # Signature Model
//!
//! Parses declarative function signatures of the form
//! `returnType functionName(argType, argType, ...)` into a typed
//! [`Signature`] and exposes the properties the orchestrator needs to decide
//! which tests apply.

mod arg_type;

pub use arg_type::{ArgType, ElementType};

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// Immutable description of one function signature.
///
/// # Examples
/// ```
/// use exprgen_core::signature::Signature;
///
/// let sig = Signature::parse("vector foo(vector, data real)").unwrap();
/// assert_eq!(sig.name(), "foo");
/// assert_eq!(sig.args().len(), 2);
/// assert!(sig.has_vector_arg());
/// assert!(!sig.is_rng());
/// assert!(!sig.returns_int());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    return_type: ArgType,
    name: String,
    args: Vec<ArgType>,
}

impl Signature {
    /// Parses signature text.
    ///
    /// # Errors
    ///
    /// [`ParseError::Signature`] if the text is not shaped like
    /// `returnType name(args)`, [`ParseError::UnknownType`] if a type is
    /// not recognised.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let malformed = || ParseError::Signature(text.trim().to_string());
        let trimmed = text.trim();

        let open = trimmed.find('(').ok_or_else(malformed)?;
        let inner = trimmed[open + 1..].strip_suffix(')').ok_or_else(malformed)?;
        let (return_text, name) = trimmed[..open]
            .trim_end()
            .rsplit_once(char::is_whitespace)
            .ok_or_else(malformed)?;
        if !is_identifier(name) || return_text.trim().is_empty() {
            return Err(malformed());
        }

        let return_type = ArgType::parse(return_text)?;
        let args = if inner.trim().is_empty() {
            Vec::new()
        } else {
            split_top_level(inner)
                .ok_or_else(malformed)?
                .into_iter()
                .map(ArgType::parse)
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(Self {
            return_type,
            name: name.to_string(),
            args,
        })
    }

    /// Function name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return type.
    pub fn return_type(&self) -> &ArgType {
        &self.return_type
    }

    /// Argument types in declaration order.
    pub fn args(&self) -> &[ArgType] {
        &self.args
    }

    /// Random number generating function (`*_rng`).
    pub fn is_rng(&self) -> bool {
        self.name.ends_with("_rng")
    }

    /// Returns `int` or an array of `int`.
    pub fn returns_int(&self) -> bool {
        self.return_type.element.is_integral()
    }

    /// At least one argument is a vector, row vector or matrix (possibly
    /// nested in arrays).
    pub fn has_vector_arg(&self) -> bool {
        self.args.iter().any(|arg| arg.element.is_vector_family())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Splits on commas that are not nested inside brackets or parentheses.
fn split_top_level(text: &str) -> Option<Vec<&str>> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '[' | '(' => depth += 1,
            ']' | ')' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }
    parts.push(&text[start..]);
    Some(parts)
}

impl FromStr for Signature {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}(", self.return_type, self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", arg)?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let sig = Signature::parse("real dot_self(vector)").unwrap();
        assert_eq!(sig.name(), "dot_self");
        assert_eq!(sig.return_type(), &ArgType::scalar(ElementType::Real));
        assert_eq!(sig.args(), &[ArgType::scalar(ElementType::Vector)]);
    }

    #[test]
    fn test_parse_array_return_and_args() {
        let sig = Signature::parse("array[] int foo_rng(array[,] real, int)").unwrap();
        assert_eq!(sig.return_type().array_dims, 1);
        assert_eq!(sig.args().len(), 2);
        assert_eq!(sig.args()[0].array_dims, 2);
        assert!(sig.returns_int());
        assert!(sig.is_rng());
        assert!(!sig.has_vector_arg());
    }

    #[test]
    fn test_parse_no_arguments() {
        let sig = Signature::parse("real pi()").unwrap();
        assert!(sig.args().is_empty());
        assert!(!sig.has_vector_arg());
    }

    #[test]
    fn test_parse_malformed() {
        for text in [
            "vector foo",
            "foo(vector)",
            "vector foo(vector",
            "vector 1foo(vector)",
            "vector foo(vector,, real)",
            "vector foo(array[ real)",
        ] {
            assert!(Signature::parse(text).is_err(), "'{}' should not parse", text);
        }
    }

    #[test]
    fn test_parse_unknown_type() {
        assert_eq!(
            Signature::parse("real foo(tensor)"),
            Err(ParseError::UnknownType("tensor".to_string()))
        );
    }

    #[test]
    fn test_has_vector_arg_through_arrays() {
        let sig = Signature::parse("real foo(array[] row_vector, real)").unwrap();
        assert!(sig.has_vector_arg());
    }

    #[test]
    fn test_display_round_trips() {
        let text = "array[] real foo(data array[,] int, matrix)";
        let sig = Signature::parse(text).unwrap();
        assert_eq!(sig.to_string(), text);
        assert_eq!(Signature::parse(&sig.to_string()).unwrap(), sig);
    }
}
