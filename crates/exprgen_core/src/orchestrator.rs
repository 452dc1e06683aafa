//! # Test Orchestrator
//!
//! Decides, for every selected signature and every [`Overload`], whether an
//! expression test applies and, if so, builds its body:
//!
//! 1. declare one base argument per signature argument (plus a random
//!    number generator for `*_rng` functions outside `Prim`)
//! 2. wrap every matrix-like base argument in a counting expression
//! 3. call the function with expressions, then with plain arguments, and
//!    assert both results agree
//! 4. in reverse mode, assert the adjoints of both calls agree
//! 5. assert each expression was evaluated at most once
//!
//! Inapplicable combinations are skipped, never reported as errors; the
//! reason is kept in the [`GenerationReport`] and logged at debug level.

use std::fmt;

use tracing::{debug, info};

use crate::argument::{
    ArgumentHandle, ArgumentSynthesizer, CppArgumentSynthesizer, Operand, Value,
};
use crate::config::{special_value, Exemptions, GeneratorConfig, SpecialArgValue};
use crate::error::Result;
use crate::overload::Overload;
use crate::selection::Selection;
use crate::sequencer::FunctionGenerator;
use crate::signature::Signature;

/// One generated test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestBody {
    /// Overload the arguments were synthesized for
    pub overload: Overload,
    /// Function under test
    pub function: String,
    /// Position of the signature in the selection
    pub index: usize,
    /// Statements of the test, one per line
    pub code: String,
}

impl TestBody {
    /// Test name within its group, `<function>_<index>`.
    pub fn test_name(&self) -> String {
        format!("{}_{}", self.function, self.index)
    }

    /// Complete test case source.
    pub fn render(&self) -> String {
        format!(
            "\nTEST(ExpressionTest{}, {}) {{\n{}\n}}\n",
            self.overload,
            self.test_name(),
            self.code
        )
    }
}

/// Why a (signature, overload) pair produced no test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Function is on the ignored list and the whole catalog was selected
    Ignored,
    /// No vector, row vector or matrix argument to wrap
    NoVectorArgument,
    /// Function has no forward-mode instantiation
    NoForwardOverload,
    /// Function has no reverse-mode instantiation
    NoReverseOverload,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::Ignored => "ignored by default",
            Self::NoVectorArgument => "no vector-like argument",
            Self::NoForwardOverload => "no forward-mode overload",
            Self::NoReverseOverload => "no reverse-mode overload",
        };
        f.write_str(reason)
    }
}

/// A skipped (signature, overload) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipRecord {
    /// Canonical signature text
    pub signature: String,
    /// Overload that was skipped
    pub overload: Overload,
    /// Reason for skipping
    pub reason: SkipReason,
}

/// Outcome of one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Generated tests in generation order
    pub bodies: Vec<TestBody>,
    /// Pairs that produced no test
    pub skipped: Vec<SkipRecord>,
}

/// Builds expression test bodies from signatures.
///
/// Exemption lists and special argument values are injected, so the
/// orchestrator holds no global state.
#[derive(Debug, Clone)]
pub struct TestOrchestrator<S = CppArgumentSynthesizer> {
    exemptions: Exemptions,
    special_values: Vec<SpecialArgValue>,
    synthesizer: S,
}

impl TestOrchestrator<CppArgumentSynthesizer> {
    /// Orchestrator using the configured exemptions, special values and
    /// argument size.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(
            config.exemptions.clone(),
            CppArgumentSynthesizer::new(config.arg_size),
        )
        .with_special_values(config.special_arg_values.clone())
    }
}

impl<S: ArgumentSynthesizer> TestOrchestrator<S> {
    /// Orchestrator with the given exemptions and synthesizer.
    pub fn new(exemptions: Exemptions, synthesizer: S) -> Self {
        Self {
            exemptions,
            special_values: Vec::new(),
            synthesizer,
        }
    }

    /// Sets per-function argument value overrides.
    pub fn with_special_values(mut self, special_values: Vec<SpecialArgValue>) -> Self {
        self.special_values = special_values;
        self
    }

    /// Reason `signature` gets no test under `overload`, if any.
    pub fn skip_reason(
        &self,
        signature: &Signature,
        overload: Overload,
        default_checks: bool,
    ) -> Option<SkipReason> {
        let name = signature.name();
        if default_checks && self.exemptions.ignored.contains(name) {
            return Some(SkipReason::Ignored);
        }
        if !signature.has_vector_arg() {
            return Some(SkipReason::NoVectorArgument);
        }
        match overload {
            Overload::Fwd if self.exemptions.no_fwd_overload.contains(name) => {
                Some(SkipReason::NoForwardOverload)
            }
            Overload::Rev if self.exemptions.no_rev_overload.contains(name) => {
                Some(SkipReason::NoReverseOverload)
            }
            _ => None,
        }
    }

    /// Generates every applicable test for `selection`.
    ///
    /// # Errors
    ///
    /// Only on internal inconsistencies (an expression requested for a
    /// non matrix-like argument); skips are not errors.
    pub fn generate(&self, selection: &Selection) -> Result<GenerationReport> {
        let mut report = GenerationReport::default();

        for (index, signature) in selection.signatures().iter().enumerate() {
            for overload in Overload::ALL {
                if let Some(reason) =
                    self.skip_reason(signature, overload, selection.default_checks())
                {
                    debug!("Skipping {} for {}: {}", overload, signature, reason);
                    report.skipped.push(SkipRecord {
                        signature: signature.to_string(),
                        overload,
                        reason,
                    });
                    continue;
                }
                report.bodies.push(self.build_body(index, signature, overload)?);
            }
        }

        info!(
            "Generated {} expression tests ({} combinations skipped)",
            report.bodies.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    /// Builds the test body of `signature` under `overload`, without
    /// checking applicability.
    pub fn build_body(
        &self,
        index: usize,
        signature: &Signature,
        overload: Overload,
    ) -> Result<TestBody> {
        let mut fg = FunctionGenerator::new();

        let mut arg_list_base: Vec<ArgumentHandle> = signature
            .args()
            .iter()
            .enumerate()
            .map(|(position, arg_type)| {
                let value = special_value(&self.special_values, signature.name(), position);
                fg.add_argument(&self.synthesizer, overload, arg_type, value)
            })
            .collect();
        if signature.is_rng() && overload != Overload::Prim {
            arg_list_base.push(fg.add_rng());
        }

        let is_reverse_mode =
            arg_list_base.iter().any(ArgumentHandle::is_reverse_mode) && !signature.returns_int();

        let mut arg_list = Vec::with_capacity(arg_list_base.len());
        for arg in &arg_list_base {
            match arg.as_base() {
                Some(base) if base.is_matrix_like() => arg_list.push(fg.add_expression(base)?),
                _ => arg_list.push(arg.clone()),
            }
        }

        let function = format!("stan::math::{}", signature.name());
        let result = fg.call_assign(&function, "result", &operands(&arg_list));
        if is_reverse_mode {
            let summed_result = fg.call_assign("stan::test::recursive_sum", "summed_result", &[&result]);
            fg.call("stan::test::grad", &[&summed_result]);
        }

        let result_base = fg.call_assign(&function, "result_base", &operands(&arg_list_base));
        fg.call("EXPECT_STAN_EQ", &[&result, &result_base]);

        if is_reverse_mode {
            let reverse_args: Vec<&ArgumentHandle> = arg_list_base
                .iter()
                .filter(|arg| arg.is_reverse_mode())
                .collect();

            let adjoints_from_expression: Vec<Value> = reverse_args
                .iter()
                .map(|arg| {
                    let role = format!("{}_adjoints_expr", arg.name());
                    fg.call_assign("stan::test::adjoints_of", &role, &[*arg])
                })
                .collect();

            let summed_result_base =
                fg.call_assign("stan::test::recursive_sum", "summed_result_base", &[&result_base]);
            fg.call("stan::math::set_zero_all_adjoints", &[]);
            fg.call("stan::test::grad", &[&summed_result_base]);

            let adjoints_from_base: Vec<Value> = reverse_args
                .iter()
                .map(|arg| {
                    let role = format!("{}_adjoints_base", arg.name());
                    fg.call_assign("stan::test::adjoints_of", &role, &[*arg])
                })
                .collect();

            for (from_expression, from_base) in adjoints_from_expression.iter().zip(&adjoints_from_base) {
                fg.call("EXPECT_STAN_EQ", &[from_expression, from_base]);
            }
        }

        for expr in arg_list.iter().filter_map(ArgumentHandle::as_expression) {
            let counter = Value {
                name: expr.counter().to_string(),
            };
            fg.call("EXPECT_LEQ_ONE", &[&counter]);
        }

        if is_reverse_mode {
            fg.call("stan::math::recover_memory", &[]);
        }

        Ok(TestBody {
            overload,
            function: signature.name().to_string(),
            index,
            code: fg.render(),
        })
    }
}

fn operands(args: &[ArgumentHandle]) -> Vec<&dyn Operand> {
    args.iter().map(|arg| arg as &dyn Operand).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn orchestrator() -> TestOrchestrator {
        TestOrchestrator::new(Exemptions::none(), CppArgumentSynthesizer::default())
    }

    fn sig(text: &str) -> Signature {
        Signature::parse(text).unwrap()
    }

    fn lines(body: &TestBody) -> Vec<String> {
        body.code.lines().map(str::to_string).collect()
    }

    #[test]
    fn test_reverse_mode_body_order() {
        let body = orchestrator()
            .build_body(3, &sig("vector foo(vector, data real)"), Overload::Rev)
            .unwrap();

        assert_eq!(body.test_name(), "foo_3");
        let expected = vec![
            "Eigen::Matrix<stan::math::var, Eigen::Dynamic, 1> vector_0 = stan::test::make_arg<Eigen::Matrix<stan::math::var, Eigen::Dynamic, 1>>(0.4, 1);",
            "double real_1 = 0.4;",
            "int vector_0_expr_2_counter = 0;",
            "stan::test::counterOp<stan::math::var> vector_0_expr_2_counter_op(&vector_0_expr_2_counter);",
            "auto vector_0_expr_2 = vector_0.unaryExpr(vector_0_expr_2_counter_op);",
            "auto result_3 = stan::math::foo(vector_0_expr_2, real_1);",
            "auto summed_result_4 = stan::test::recursive_sum(result_3);",
            "stan::test::grad(summed_result_4);",
            "auto result_base_5 = stan::math::foo(vector_0, real_1);",
            "EXPECT_STAN_EQ(result_3, result_base_5);",
            "auto vector_0_adjoints_expr_6 = stan::test::adjoints_of(vector_0);",
            "auto summed_result_base_7 = stan::test::recursive_sum(result_base_5);",
            "stan::math::set_zero_all_adjoints();",
            "stan::test::grad(summed_result_base_7);",
            "auto vector_0_adjoints_base_8 = stan::test::adjoints_of(vector_0);",
            "EXPECT_STAN_EQ(vector_0_adjoints_expr_6, vector_0_adjoints_base_8);",
            "EXPECT_LEQ_ONE(vector_0_expr_2_counter);",
            "stan::math::recover_memory();",
        ];
        assert_eq!(lines(&body), expected);
    }

    #[test]
    fn test_reverse_mode_plain_real_carries_adjoints() {
        let body = orchestrator()
            .build_body(0, &sig("vector foo(vector, real)"), Overload::Rev)
            .unwrap();

        let expected = vec![
            "Eigen::Matrix<stan::math::var, Eigen::Dynamic, 1> vector_0 = stan::test::make_arg<Eigen::Matrix<stan::math::var, Eigen::Dynamic, 1>>(0.4, 1);",
            "stan::math::var real_1 = 0.4;",
            "int vector_0_expr_2_counter = 0;",
            "stan::test::counterOp<stan::math::var> vector_0_expr_2_counter_op(&vector_0_expr_2_counter);",
            "auto vector_0_expr_2 = vector_0.unaryExpr(vector_0_expr_2_counter_op);",
            "auto result_3 = stan::math::foo(vector_0_expr_2, real_1);",
            "auto summed_result_4 = stan::test::recursive_sum(result_3);",
            "stan::test::grad(summed_result_4);",
            "auto result_base_5 = stan::math::foo(vector_0, real_1);",
            "EXPECT_STAN_EQ(result_3, result_base_5);",
            "auto vector_0_adjoints_expr_6 = stan::test::adjoints_of(vector_0);",
            "auto real_1_adjoints_expr_7 = stan::test::adjoints_of(real_1);",
            "auto summed_result_base_8 = stan::test::recursive_sum(result_base_5);",
            "stan::math::set_zero_all_adjoints();",
            "stan::test::grad(summed_result_base_8);",
            "auto vector_0_adjoints_base_9 = stan::test::adjoints_of(vector_0);",
            "auto real_1_adjoints_base_10 = stan::test::adjoints_of(real_1);",
            "EXPECT_STAN_EQ(vector_0_adjoints_expr_6, vector_0_adjoints_base_9);",
            "EXPECT_STAN_EQ(real_1_adjoints_expr_7, real_1_adjoints_base_10);",
            "EXPECT_LEQ_ONE(vector_0_expr_2_counter);",
            "stan::math::recover_memory();",
        ];
        assert_eq!(lines(&body), expected);
    }

    #[test]
    fn test_prim_body_has_no_gradient_statements() {
        let body = orchestrator()
            .build_body(0, &sig("real dot_product(vector, row_vector)"), Overload::Prim)
            .unwrap();

        assert!(!body.code.contains("grad"));
        assert!(!body.code.contains("adjoints_of"));
        assert!(!body.code.contains("recover_memory"));
        assert_eq!(body.code.matches("EXPECT_LEQ_ONE").count(), 2);
        assert!(body
            .code
            .contains("auto result_4 = stan::math::dot_product(vector_0_expr_2, row_vector_1_expr_3);"));
    }

    #[test]
    fn test_int_return_disables_reverse_checks() {
        let body = orchestrator()
            .build_body(0, &sig("int num_elements(vector)"), Overload::Rev)
            .unwrap();
        assert!(!body.code.contains("adjoints_of"));
        assert!(!body.code.contains("recover_memory"));
        assert_eq!(body.code.matches("EXPECT_LEQ_ONE").count(), 1);
    }

    #[test]
    fn test_all_data_arguments_disable_reverse_checks() {
        let body = orchestrator()
            .build_body(0, &sig("vector foo(data vector)"), Overload::Rev)
            .unwrap();
        assert!(!body.code.contains("grad"));
    }

    #[test]
    fn test_adjoint_checks_per_reverse_argument() {
        let body = orchestrator()
            .build_body(0, &sig("real foo(vector, int, matrix, real)"), Overload::Rev)
            .unwrap();
        // vector, matrix and real carry adjoints; int does not
        assert_eq!(body.code.matches("_adjoints_expr_").count(), 6);
        assert_eq!(body.code.matches("stan::test::adjoints_of").count(), 6);
        assert_eq!(body.code.matches("EXPECT_STAN_EQ").count(), 4);
        assert_eq!(body.code.matches("EXPECT_LEQ_ONE").count(), 2);
    }

    #[test]
    fn test_rng_argument_outside_prim() {
        let orchestrator = orchestrator();
        let signature = sig("vector multi_normal_rng(vector, matrix)");

        let prim = orchestrator.build_body(0, &signature, Overload::Prim).unwrap();
        assert!(!prim.code.contains("std::minstd_rand"));

        let fwd = orchestrator.build_body(0, &signature, Overload::Fwd).unwrap();
        assert!(fwd.code.contains("std::minstd_rand rng_2(0);"));
        assert!(fwd.code.contains(
            "auto result_5 = stan::math::multi_normal_rng(vector_0_expr_3, matrix_1_expr_4, rng_2);"
        ));
    }

    #[test]
    fn test_special_values_apply_by_position() {
        let orchestrator = orchestrator().with_special_values(vec![SpecialArgValue {
            function: "acosh".to_string(),
            position: 0,
            value: "1.4".to_string(),
        }]);
        let body = orchestrator
            .build_body(0, &sig("vector acosh(vector)"), Overload::Prim)
            .unwrap();
        assert!(body.code.contains("(1.4, 1);"));
    }

    #[test]
    fn test_skip_reasons() {
        let exemptions = Exemptions {
            ignored: BTreeSet::from(["foo".to_string()]),
            no_fwd_overload: BTreeSet::from(["bar".to_string()]),
            no_rev_overload: BTreeSet::from(["bar".to_string()]),
        };
        let orchestrator = TestOrchestrator::new(exemptions, CppArgumentSynthesizer::default());

        let foo = sig("vector foo(vector)");
        assert_eq!(orchestrator.skip_reason(&foo, Overload::Prim, true), Some(SkipReason::Ignored));
        assert_eq!(orchestrator.skip_reason(&foo, Overload::Prim, false), None);

        let scalar = sig("real exp(real)");
        assert_eq!(
            orchestrator.skip_reason(&scalar, Overload::Rev, false),
            Some(SkipReason::NoVectorArgument)
        );

        let bar = sig("vector bar(vector)");
        assert_eq!(orchestrator.skip_reason(&bar, Overload::Prim, true), None);
        assert_eq!(
            orchestrator.skip_reason(&bar, Overload::Fwd, true),
            Some(SkipReason::NoForwardOverload)
        );
        assert_eq!(
            orchestrator.skip_reason(&bar, Overload::Rev, true),
            Some(SkipReason::NoReverseOverload)
        );
    }

    #[test]
    fn test_generate_indexes_by_signature() {
        let selection = Selection::from_signatures(
            vec![sig("real exp(real)"), sig("vector softmax(vector)")],
            true,
        );
        let report = orchestrator().generate(&selection).unwrap();

        assert_eq!(report.skipped.len(), 3);
        let names: Vec<_> = report
            .bodies
            .iter()
            .map(|body| format!("{} {}", body.overload, body.test_name()))
            .collect();
        assert_eq!(names, vec!["Prim softmax_1", "Rev softmax_1", "Fwd softmax_1"]);
    }

    #[test]
    fn test_render_wraps_in_test_macro() {
        let body = TestBody {
            overload: Overload::Fwd,
            function: "foo".to_string(),
            index: 7,
            code: "x;".to_string(),
        };
        assert_eq!(body.render(), "\nTEST(ExpressionTestFwd, foo_7) {\nx;\n}\n");
    }
}
