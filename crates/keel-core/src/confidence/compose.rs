//! Composition rules.

use super::value::{clamp_unit, ConfidenceValue};

/// Weakest-link composition: a chain is only as strong as its weakest step.
///
/// Empty input yields `Absent`.
pub fn sequential(inputs: &[ConfidenceValue]) -> ConfidenceValue {
    if inputs.is_empty() {
        return ConfidenceValue::absent("no inputs to sequential composition");
    }
    let value = inputs
        .iter()
        .map(ConfidenceValue::point)
        .fold(f64::INFINITY, f64::min);
    derived("min", value, inputs)
}

/// Conjunctive composition: every input must hold independently.
///
/// Empty input yields `Absent`.
pub fn parallel_all(inputs: &[ConfidenceValue]) -> ConfidenceValue {
    if inputs.is_empty() {
        return ConfidenceValue::absent("no inputs to parallel composition");
    }
    let value = inputs.iter().map(ConfidenceValue::point).product::<f64>();
    derived("product", value, inputs)
}

fn derived(rule: &str, value: f64, inputs: &[ConfidenceValue]) -> ConfidenceValue {
    let operands: Vec<String> = inputs.iter().map(|v| format!("{:.3}", v.point())).collect();
    ConfidenceValue::Derived {
        value: clamp_unit(value),
        formula: format!("{rule}({})", operands.join(", ")),
        inputs: inputs.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_takes_minimum() {
        let result = sequential(&[
            ConfidenceValue::measured(0.9, 10, "beta"),
            ConfidenceValue::measured(0.6, 10, "beta"),
            ConfidenceValue::deterministic("edge"),
        ]);
        assert!((result.point() - 0.6).abs() < 1e-12);
        match result {
            ConfidenceValue::Derived { formula, inputs, .. } => {
                assert_eq!(formula, "min(0.900, 0.600, 1.000)");
                assert_eq!(inputs.len(), 3);
            }
            other => panic!("expected derived, got {other:?}"),
        }
    }

    #[test]
    fn test_parallel_takes_product() {
        let result = parallel_all(&[
            ConfidenceValue::measured(0.5, 4, "beta"),
            ConfidenceValue::measured(0.5, 4, "beta"),
        ]);
        assert!((result.point() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_empty_is_absent() {
        assert!(sequential(&[]).is_absent());
        assert!(parallel_all(&[]).is_absent());
    }

    #[test]
    fn test_absent_input_zeroes_both_rules() {
        let inputs = [
            ConfidenceValue::measured(0.8, 3, "beta"),
            ConfidenceValue::absent("missing"),
        ];
        assert_eq!(sequential(&inputs).point(), 0.0);
        assert_eq!(parallel_all(&inputs).point(), 0.0);
    }
}
