use thiserror::Error;

use crate::domain::form::{parse_variable_count, FieldId, FormModel, MAX_VARIABLES};

/// A check that keeps a submission from reaching the solver
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("The number of variables must be greater than or equal to 1 and at most {}.", MAX_VARIABLES)]
    VariableCount,

    #[error("Found {} field(s) with invalid values. Please review the fields marked in red.", .fields.len())]
    InvalidFields { fields: Vec<FieldId> },

    #[error("You must add at least one constraint to the problem.")]
    NoConstraints,
}

impl ValidationError {
    /// Fields to flag in the page
    pub fn invalid_fields(&self) -> &[FieldId] {
        match self {
            ValidationError::InvalidFields { fields } => fields,
            _ => &[],
        }
    }

    /// The field that should receive focus
    pub fn focus(&self) -> Option<FieldId> {
        self.invalid_fields().first().copied()
    }
}

/// Run the pre-submission checks in order, stopping at the first failure
pub fn validate_submission(form: &FormModel) -> Result<(), ValidationError> {
    if parse_variable_count(form.variable_count_input()).is_none() {
        return Err(ValidationError::VariableCount);
    }

    let fields: Vec<FieldId> = form
        .numeric_fields()
        .filter(|(_, field)| field.is_invalid())
        .map(|(id, _)| id)
        .collect();
    if !fields.is_empty() {
        return Err(ValidationError::InvalidFields { fields });
    }

    if form.constraints().is_empty() {
        return Err(ValidationError::NoConstraints);
    }

    Ok(())
}
