//! Argument and return types appearing in function signatures.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// Innermost (non-array) type of an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// `int`
    Int,
    /// `real`
    Real,
    /// `complex`
    Complex,
    /// `vector` (column vector)
    Vector,
    /// `row_vector`
    RowVector,
    /// `matrix`
    Matrix,
    /// `complex_vector`
    ComplexVector,
    /// `complex_row_vector`
    ComplexRowVector,
    /// `complex_matrix`
    ComplexMatrix,
}

impl ElementType {
    /// Keyword used for this type in signature text.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Real => "real",
            Self::Complex => "complex",
            Self::Vector => "vector",
            Self::RowVector => "row_vector",
            Self::Matrix => "matrix",
            Self::ComplexVector => "complex_vector",
            Self::ComplexRowVector => "complex_row_vector",
            Self::ComplexMatrix => "complex_matrix",
        }
    }

    fn from_keyword(keyword: &str) -> Option<Self> {
        let element = match keyword {
            "int" => Self::Int,
            "real" => Self::Real,
            "complex" => Self::Complex,
            "vector" => Self::Vector,
            "row_vector" => Self::RowVector,
            "matrix" => Self::Matrix,
            "complex_vector" => Self::ComplexVector,
            "complex_row_vector" => Self::ComplexRowVector,
            "complex_matrix" => Self::ComplexMatrix,
            _ => return None,
        };
        Some(element)
    }

    /// Vector, row vector or matrix, real or complex.
    pub fn is_vector_family(&self) -> bool {
        matches!(
            self,
            Self::Vector
                | Self::RowVector
                | Self::Matrix
                | Self::ComplexVector
                | Self::ComplexRowVector
                | Self::ComplexMatrix
        )
    }

    /// Complex scalar or complex container element.
    pub fn is_complex(&self) -> bool {
        matches!(
            self,
            Self::Complex | Self::ComplexVector | Self::ComplexRowVector | Self::ComplexMatrix
        )
    }

    /// `int`, which never carries derivatives.
    pub fn is_integral(&self) -> bool {
        matches!(self, Self::Int)
    }
}

/// A fully-qualified argument type: element type, array nesting and the
/// `data` qualifier.
///
/// Both the `array[,] real` and the legacy `real[ , ]` spellings are
/// accepted; [`fmt::Display`] always renders the former.
///
/// # Examples
/// ```
/// use exprgen_core::signature::{ArgType, ElementType};
///
/// let ty: ArgType = "data array[,] vector".parse().unwrap();
/// assert_eq!(ty.element, ElementType::Vector);
/// assert_eq!(ty.array_dims, 2);
/// assert!(ty.data_only);
/// assert_eq!(ty, "data vector[ , ]".parse().unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArgType {
    /// Innermost type
    pub element: ElementType,
    /// Number of enclosing array dimensions
    pub array_dims: usize,
    /// Argument must be data (never differentiated)
    pub data_only: bool,
}

impl ArgType {
    /// Non-array, non-data type.
    pub fn scalar(element: ElementType) -> Self {
        Self {
            element,
            array_dims: 0,
            data_only: false,
        }
    }

    /// Plain (non-array) vector, row vector or matrix: the types an
    /// expression can stand in for.
    pub fn is_matrix_like(&self) -> bool {
        self.array_dims == 0 && self.element.is_vector_family()
    }

    /// Prefix for generated variable names, e.g. `array_vector`.
    pub fn name_prefix(&self) -> String {
        let mut prefix = "array_".repeat(self.array_dims);
        prefix.push_str(self.element.keyword());
        prefix
    }

    /// Parses an argument type.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let trimmed = text.trim();
        let (data_only, rest) = match trimmed.strip_prefix("data ") {
            Some(rest) => (true, rest.trim_start()),
            None => (false, trimmed),
        };
        let (element, array_dims) = parse_unqualified(rest)
            .ok_or_else(|| ParseError::UnknownType(trimmed.to_string()))?;
        Ok(Self {
            element,
            array_dims,
            data_only,
        })
    }
}

fn bracket_dims(inner: &str) -> Option<usize> {
    if inner.chars().all(|c| c == ',' || c.is_whitespace()) {
        Some(1 + inner.matches(',').count())
    } else {
        None
    }
}

fn parse_unqualified(text: &str) -> Option<(ElementType, usize)> {
    if let Some(rest) = text.strip_prefix("array") {
        let rest = rest.trim_start().strip_prefix('[')?;
        let close = rest.find(']')?;
        let dims = bracket_dims(&rest[..close])?;
        let (element, inner_dims) = parse_unqualified(rest[close + 1..].trim())?;
        return Some((element, dims + inner_dims));
    }
    match text.find('[') {
        Some(open) => {
            let inner = text[open + 1..].strip_suffix(']')?;
            let dims = bracket_dims(inner)?;
            let element = ElementType::from_keyword(text[..open].trim())?;
            Some((element, dims))
        }
        None => ElementType::from_keyword(text).map(|element| (element, 0)),
    }
}

impl FromStr for ArgType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.data_only {
            f.write_str("data ")?;
        }
        if self.array_dims > 0 {
            write!(f, "array[{}] ", ",".repeat(self.array_dims - 1))?;
        }
        f.write_str(self.element.keyword())
    }
}
