use simplex_api_sdk::ProblemPayload;
use thiserror::Error;

use crate::domain::form::{FieldId, FormModel};

/// Reasons the form cannot be turned into a payload
///
/// Rows and variables are numbered from 1, as shown to users.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerializeError {
    #[error("Invalid coefficient for x{index}.")]
    InvalidCoefficient { index: usize },

    #[error("Invalid coefficient in constraint {row}: the value '{value}' is not a valid number.")]
    InvalidConstraintCoefficient { row: usize, value: String },

    #[error("Invalid right-hand side in constraint {row}: the value '{value}' is not a valid number.")]
    InvalidConstraintRhs { row: usize, value: String },

    #[error("Constraint {row} has {found} variables, but the objective function has {expected}.")]
    ConstraintArityMismatch {
        row: usize,
        found: usize,
        expected: usize,
    },
}

/// Read the form into the payload sent to the solver
pub fn to_payload(form: &FormModel) -> Result<ProblemPayload, SerializeError> {
    let c = form
        .objective()
        .iter()
        .enumerate()
        .map(|(i, field)| {
            field
                .value()
                .ok_or(SerializeError::InvalidCoefficient { index: i + 1 })
        })
        .collect::<Result<Vec<f64>, _>>()?;

    let mut li = Vec::with_capacity(form.constraints().len());
    let mut o = Vec::with_capacity(form.constraints().len());
    let mut ld = Vec::with_capacity(form.constraints().len());

    for (i, row) in form.constraints().iter().enumerate() {
        let coefficients = row
            .coefficients()
            .iter()
            .map(|field| {
                field
                    .value()
                    .ok_or_else(|| SerializeError::InvalidConstraintCoefficient {
                        row: i + 1,
                        value: field.text().trim().to_string(),
                    })
            })
            .collect::<Result<Vec<f64>, _>>()?;

        let rhs = row
            .rhs()
            .value()
            .ok_or_else(|| SerializeError::InvalidConstraintRhs {
                row: i + 1,
                value: row.rhs().text().trim().to_string(),
            })?;

        li.push(coefficients);
        o.push(row.operator());
        ld.push(rhs);
    }

    if let Some((row, found)) = li
        .iter()
        .map(Vec::len)
        .enumerate()
        .find(|(_, len)| *len != c.len())
    {
        return Err(SerializeError::ConstraintArityMismatch {
            row: row + 1,
            found,
            expected: c.len(),
        });
    }

    Ok(ProblemPayload {
        problem_type: form.sense(),
        c,
        li,
        o,
        ld,
    })
}

/// Rebuild a form from a payload
///
/// The payload is trusted to be well shaped; entries without a matching
/// field are skipped.
pub fn from_payload(payload: &ProblemPayload) -> FormModel {
    let mut form = FormModel::with_variables(payload.num_variables());
    form.set_objective_sense(payload.problem_type);

    for (i, value) in payload.c.iter().enumerate() {
        fill(&mut form, FieldId::Objective(i), *value);
    }

    form.clear_constraints();
    for (i, coefficients) in payload.li.iter().enumerate() {
        let Some(row) = form.add_constraint_row() else {
            break;
        };
        for (index, value) in coefficients.iter().enumerate() {
            fill(&mut form, FieldId::Coefficient { row, index }, *value);
        }
        if let Some(operator) = payload.o.get(i) {
            form.set_operator(row, *operator);
        }
        if let Some(rhs) = payload.ld.get(i) {
            fill(&mut form, FieldId::Rhs(row), *rhs);
        }
    }

    form
}

// `Display` for f64 is the shortest text that parses back to the same value.
fn fill(form: &mut FormModel, field: FieldId, value: f64) {
    let text = value.to_string();
    let cursor = text.len();
    form.edit_field(field, &text, cursor);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use simplex_api_sdk::{Operator, ProblemBuilder, ProblemType};

    fn form_with(objective: &[&str], rows: &[(&[&str], Operator, &str)]) -> FormModel {
        let mut form = FormModel::with_variables(objective.len());
        for (i, text) in objective.iter().enumerate() {
            form.edit_field(FieldId::Objective(i), text, text.len());
        }
        form.clear_constraints();
        for (coefficients, operator, rhs) in rows {
            let row = form.add_constraint_row().unwrap();
            for (index, text) in coefficients.iter().enumerate() {
                form.edit_field(FieldId::Coefficient { row, index }, text, text.len());
            }
            form.set_operator(row, *operator);
            form.edit_field(FieldId::Rhs(row), rhs, rhs.len());
        }
        form
    }

    #[test]
    fn test_two_variable_scenario() {
        let form = form_with(
            &["3", "5"],
            &[
                (&["1", "0"], Operator::LessEqual, "4"),
                (&["0", "2"], Operator::LessEqual, "12"),
            ],
        );

        let payload = to_payload(&form).unwrap();
        let expected = ProblemBuilder::new()
            .problem_type(ProblemType::Maximization)
            .objective(vec![3.0, 5.0])
            .constraint(vec![1.0, 0.0], Operator::LessEqual, 4.0)
            .constraint(vec![0.0, 2.0], Operator::LessEqual, 12.0)
            .build()
            .unwrap();
        assert_eq!(payload, expected);
    }

    #[test]
    fn test_invalid_objective_coefficient() {
        let form = form_with(&["3", "-"], &[(&["1", "1"], Operator::LessEqual, "4")]);
        assert_eq!(
            to_payload(&form),
            Err(SerializeError::InvalidCoefficient { index: 2 })
        );
    }

    #[test]
    fn test_invalid_constraint_fields_name_the_row() {
        let form = form_with(
            &["1"],
            &[
                (&["1"], Operator::LessEqual, "4"),
                (&[""], Operator::GreaterEqual, "1"),
            ],
        );
        assert_eq!(
            to_payload(&form),
            Err(SerializeError::InvalidConstraintCoefficient {
                row: 2,
                value: String::new()
            })
        );

        let form = form_with(&["1"], &[(&["1"], Operator::Equal, ".")]);
        assert_eq!(
            to_payload(&form),
            Err(SerializeError::InvalidConstraintRhs {
                row: 1,
                value: ".".to_string()
            })
        );
    }

    #[test]
    fn test_restore_sets_sense_and_rows() {
        let payload = ProblemPayload {
            problem_type: ProblemType::Minimization,
            c: vec![2.0, -1.5, 0.25],
            li: vec![vec![1.0, 1.0, 1.0], vec![0.0, 3.0, -2.0]],
            o: vec![Operator::GreaterEqual, Operator::Equal],
            ld: vec![5.0, 0.5],
        };

        let form = from_payload(&payload);
        assert_eq!(form.sense(), ProblemType::Minimization);
        assert_eq!(form.variable_count(), 3);
        assert_eq!(form.constraints().len(), 2);
        assert_eq!(form.constraints()[1].operator(), Operator::Equal);
        assert_eq!(form.objective()[1].text(), "-1.5");
        assert_eq!(to_payload(&form).unwrap(), payload);
    }

    fn arb_payload() -> impl Strategy<Value = ProblemPayload> {
        (1usize..6, 1usize..5).prop_flat_map(|(n, m)| {
            let number = -1.0e6f64..1.0e6;
            let operator = prop_oneof![
                Just(Operator::LessEqual),
                Just(Operator::Equal),
                Just(Operator::GreaterEqual)
            ];
            let sense = prop_oneof![Just(ProblemType::Maximization), Just(ProblemType::Minimization)];
            (
                sense,
                prop::collection::vec(number.clone(), n),
                prop::collection::vec(prop::collection::vec(number.clone(), n), m),
                prop::collection::vec(operator, m),
                prop::collection::vec(number, m),
            )
                .prop_map(|(problem_type, c, li, o, ld)| ProblemPayload {
                    problem_type,
                    c,
                    li,
                    o,
                    ld,
                })
        })
    }

    proptest! {
        #[test]
        fn restored_form_serializes_to_the_same_payload(payload in arb_payload()) {
            let form = from_payload(&payload);
            prop_assert_eq!(to_payload(&form).unwrap(), payload);
        }

        #[test]
        fn arity_mismatch_is_reported(n in 1usize..6, extra in 1usize..3, shorter in any::<bool>()) {
            let mut form = FormModel::with_variables(n);
            let found = if shorter { n - 1 } else { n + extra };
            form.constraints[0].coefficients = vec![form.constraints[0].coefficients[0].clone(); found];
            prop_assert_eq!(
                to_payload(&form),
                Err(SerializeError::ConstraintArityMismatch { row: 1, found, expected: n })
            );
        }
    }
}
