//! Argument synthesis: turning a signature type into a concrete C++ value.

use super::BaseArgument;
use crate::overload::Overload;
use crate::signature::{ArgType, ElementType};

/// Fabricates a value-producing declaration for one argument type.
///
/// Implementations must report `is_reverse_mode` only for arguments that
/// are differentiated under `overload`, and must use `name` verbatim so the
/// caller's uniqueness guarantee carries over.
pub trait ArgumentSynthesizer {
    /// Builds the argument named `name` for `arg_type` under `overload`.
    ///
    /// `value` overrides the default fill value when set.
    fn synthesize(
        &self,
        overload: Overload,
        arg_type: &ArgType,
        name: String,
        value: Option<&str>,
    ) -> BaseArgument;
}

/// Synthesizer emitting Stan Math test fixtures.
///
/// Scalars are written as literals, containers are built with
/// `stan::test::make_arg<T>(value, size)`. `data` arguments always use the
/// `Prim` scalar type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CppArgumentSynthesizer {
    size: usize,
}

impl CppArgumentSynthesizer {
    /// Containers get `size` rows (and columns).
    pub fn new(size: usize) -> Self {
        Self { size }
    }

    fn default_value(element: ElementType) -> &'static str {
        match element {
            ElementType::Int => "1",
            element if element.is_complex() => "0.4, 0.5",
            _ => "0.4",
        }
    }
}

impl Default for CppArgumentSynthesizer {
    fn default() -> Self {
        Self::new(1)
    }
}

/// C++ type of one element for `element` with scalar type `scalar`.
fn element_type(element: ElementType, scalar: &str) -> String {
    let complex = format!("std::complex<{}>", scalar);
    match element {
        ElementType::Int => "int".to_string(),
        ElementType::Real => scalar.to_string(),
        ElementType::Complex => complex,
        ElementType::Vector => format!("Eigen::Matrix<{}, Eigen::Dynamic, 1>", scalar),
        ElementType::RowVector => format!("Eigen::Matrix<{}, 1, Eigen::Dynamic>", scalar),
        ElementType::Matrix => {
            format!("Eigen::Matrix<{}, Eigen::Dynamic, Eigen::Dynamic>", scalar)
        }
        ElementType::ComplexVector => format!("Eigen::Matrix<{}, Eigen::Dynamic, 1>", complex),
        ElementType::ComplexRowVector => format!("Eigen::Matrix<{}, 1, Eigen::Dynamic>", complex),
        ElementType::ComplexMatrix => {
            format!("Eigen::Matrix<{}, Eigen::Dynamic, Eigen::Dynamic>", complex)
        }
    }
}

impl ArgumentSynthesizer for CppArgumentSynthesizer {
    fn synthesize(
        &self,
        overload: Overload,
        arg_type: &ArgType,
        name: String,
        value: Option<&str>,
    ) -> BaseArgument {
        let effective = if arg_type.data_only {
            Overload::Prim
        } else {
            overload
        };
        let element = arg_type.element;
        let scalar = match element {
            ElementType::Int => "int".to_string(),
            element if element.is_complex() => {
                format!("std::complex<{}>", effective.scalar_type())
            }
            _ => effective.scalar_type().to_string(),
        };

        let mut cpp_type = element_type(element, effective.scalar_type());
        for _ in 0..arg_type.array_dims {
            cpp_type = format!("std::vector<{}>", cpp_type);
        }

        let value = value.unwrap_or(Self::default_value(element));
        let init = if arg_type.array_dims == 0 && !element.is_vector_family() {
            if element.is_complex() {
                format!("{}({})", cpp_type, value)
            } else {
                value.to_string()
            }
        } else {
            let fill = if element.is_complex() {
                format!("std::complex<double>({})", value)
            } else {
                value.to_string()
            };
            format!("stan::test::make_arg<{}>({}, {})", cpp_type, fill, self.size)
        };

        BaseArgument {
            name,
            arg_type: arg_type.clone(),
            scalar,
            cpp_type,
            init,
            reverse_mode: effective == Overload::Rev && !element.is_integral(),
        }
    }
}
