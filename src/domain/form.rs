//! In-memory model of the problem form.
//!
//! The page is a projection of [`FormModel`]: every constraint row holds
//! exactly one coefficient field per variable, and changing the variable
//! count regenerates the objective and the constraints from scratch.

use std::fmt;
use std::str::FromStr;

use simplex_api_sdk::{Operator, ProblemType};
use thiserror::Error;

use crate::domain::sanitize::{self, Sanitized};

/// Variable count used when nothing was restored
pub const DEFAULT_VARIABLE_COUNT: usize = 2;
/// Largest variable count the form accepts
pub const MAX_VARIABLES: usize = 100;
pub const DEFAULT_OBJECTIVE_COEFFICIENT: &str = "1";
pub const DEFAULT_CONSTRAINT_COEFFICIENT: &str = "1";
pub const DEFAULT_RHS: &str = "10";

/// Name of the variable count input
pub const VARIABLE_COUNT_FIELD: &str = "num_variables";

/// Text of a numeric input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericField {
    text: String,
}

impl NumericField {
    fn new(text: &str) -> Self {
        NumericField {
            text: text.to_string(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_invalid(&self) -> bool {
        sanitize::is_invalid(&self.text)
    }

    pub fn value(&self) -> Option<f64> {
        sanitize::parse_number(&self.text)
    }

    fn edit(&mut self, text: &str, cursor: usize) -> Sanitized {
        let out = sanitize::sanitize(text, cursor);
        self.text.clone_from(&out.text);
        out
    }
}

/// Stable identity of a constraint row, independent of its position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(u64);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RowId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(RowId)
    }
}

/// One constraint: coefficients, operator and right-hand side
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintRow {
    id: RowId,
    pub(crate) coefficients: Vec<NumericField>,
    operator: Operator,
    rhs: NumericField,
}

impl ConstraintRow {
    fn new(id: RowId, variables: usize) -> Self {
        ConstraintRow {
            id,
            coefficients: vec![NumericField::new(DEFAULT_CONSTRAINT_COEFFICIENT); variables],
            operator: Operator::default(),
            rhs: NumericField::new(DEFAULT_RHS),
        }
    }

    pub fn id(&self) -> RowId {
        self.id
    }

    pub fn coefficients(&self) -> &[NumericField] {
        &self.coefficients
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn rhs(&self) -> &NumericField {
        &self.rhs
    }
}

/// Address of a numeric input; its `Display` form is the input's name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    /// Objective coefficient, zero-based
    Objective(usize),
    /// Constraint coefficient, zero-based column
    Coefficient { row: RowId, index: usize },
    /// Constraint right-hand side
    Rhs(RowId),
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldId::Objective(i) => write!(f, "c{}", i + 1),
            FieldId::Coefficient { row, index } => write!(f, "r{}-a{}", row, index + 1),
            FieldId::Rhs(row) => write!(f, "r{}-b", row),
        }
    }
}

/// A posted name that does not address a numeric input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a numeric field name")]
pub struct FieldIdError(String);

impl FromStr for FieldId {
    type Err = FieldIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FieldIdError(s.to_string());
        // Names are 1-based.
        let position = |n: &str| {
            n.parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .ok_or_else(invalid)
        };

        if let Some(n) = s.strip_prefix('c') {
            return position(n).map(FieldId::Objective);
        }
        let (row, rest) = s
            .strip_prefix('r')
            .and_then(|r| r.split_once('-'))
            .ok_or_else(invalid)?;
        let row: RowId = row.parse().map_err(|_| invalid())?;
        if rest == "b" {
            return Ok(FieldId::Rhs(row));
        }
        let index = position(rest.strip_prefix('a').ok_or_else(invalid)?)?;
        Ok(FieldId::Coefficient { row, index })
    }
}

/// Read the variable count input: a whole number from 1 to [`MAX_VARIABLES`]
pub fn parse_variable_count(raw: &str) -> Option<usize> {
    sanitize::parse_count(raw)
        .and_then(|n| usize::try_from(n).ok())
        .filter(|n| (1..=MAX_VARIABLES).contains(n))
}

/// Name of the operator select of a row
pub fn operator_field(row: RowId) -> String {
    format!("r{}-op", row)
}

/// Parse an operator select name back into its row
pub fn parse_operator_field(name: &str) -> Option<RowId> {
    name.strip_prefix('r')?.strip_suffix("-op")?.parse().ok()
}

/// The problem form: variable count, objective and constraint rows
#[derive(Debug, Clone, PartialEq)]
pub struct FormModel {
    variable_count_input: String,
    variable_count: usize,
    sense: ProblemType,
    objective: Vec<NumericField>,
    pub(crate) constraints: Vec<ConstraintRow>,
    next_row_id: u64,
}

impl Default for FormModel {
    fn default() -> Self {
        Self::with_variables(DEFAULT_VARIABLE_COUNT)
    }
}

impl FormModel {
    /// A fresh maximization form with `count` variables and one constraint
    ///
    /// The count is clamped to `1..=MAX_VARIABLES`.
    pub fn with_variables(count: usize) -> Self {
        let mut form = FormModel {
            variable_count_input: String::new(),
            variable_count: 0,
            sense: ProblemType::default(),
            objective: Vec::new(),
            constraints: Vec::new(),
            next_row_id: 1,
        };
        form.regenerate(count.clamp(1, MAX_VARIABLES));
        form
    }

    /// Raw text of the variable count input
    pub fn variable_count_input(&self) -> &str {
        &self.variable_count_input
    }

    /// Number of variables the objective and the rows currently have
    pub fn variable_count(&self) -> usize {
        self.variable_count
    }

    pub fn sense(&self) -> ProblemType {
        self.sense
    }

    pub fn objective(&self) -> &[NumericField] {
        &self.objective
    }

    pub fn constraints(&self) -> &[ConstraintRow] {
        &self.constraints
    }

    pub fn constraint(&self, id: RowId) -> Option<&ConstraintRow> {
        self.constraints.iter().find(|r| r.id == id)
    }

    /// Label preceding the objective coefficients
    pub fn objective_label(&self) -> &'static str {
        match self.sense {
            ProblemType::Maximization => "Maximize Z =",
            ProblemType::Minimization => "Minimize Z =",
        }
    }

    /// Apply the text of the variable count input
    ///
    /// A count from 1 to [`MAX_VARIABLES`] regenerates the objective with
    /// default coefficients and resets the constraints to a single fresh
    /// row; returns whether that happened. Anything else only records the
    /// text.
    pub fn set_variable_count(&mut self, raw: &str) -> bool {
        self.variable_count_input = raw.to_string();
        match parse_variable_count(raw) {
            Some(n) => {
                self.regenerate(n);
                true
            }
            None => {
                log::error!("Invalid variable count {:?}; form left unchanged", raw);
                false
            }
        }
    }

    fn regenerate(&mut self, count: usize) {
        self.variable_count = count;
        self.variable_count_input = count.to_string();
        self.objective = vec![NumericField::new(DEFAULT_OBJECTIVE_COEFFICIENT); count];
        self.constraints.clear();
        self.push_row();
    }

    fn push_row(&mut self) -> RowId {
        let id = RowId(self.next_row_id);
        self.next_row_id += 1;
        self.constraints.push(ConstraintRow::new(id, self.variable_count));
        id
    }

    /// Append a constraint row with default values
    ///
    /// Refused, with a diagnostic, while the variable count input does not
    /// hold an accepted count.
    pub fn add_constraint_row(&mut self) -> Option<RowId> {
        match parse_variable_count(&self.variable_count_input) {
            Some(_) => Some(self.push_row()),
            None => {
                log::error!(
                    "Invalid variable count {:?} while adding a constraint",
                    self.variable_count_input
                );
                None
            }
        }
    }

    /// Remove one row; other rows are untouched
    pub fn remove_constraint_row(&mut self, id: RowId) -> bool {
        let before = self.constraints.len();
        self.constraints.retain(|r| r.id != id);
        self.constraints.len() != before
    }

    pub(crate) fn clear_constraints(&mut self) {
        self.constraints.clear();
    }

    /// Switch between maximization and minimization; coefficients are kept
    pub fn set_objective_sense(&mut self, sense: ProblemType) {
        self.sense = sense;
    }

    /// Replace the text of a numeric input, sanitizing it
    ///
    /// Returns `None` when the field does not exist.
    pub fn edit_field(&mut self, field: FieldId, text: &str, cursor: usize) -> Option<Sanitized> {
        self.field_mut(field).map(|f| f.edit(text, cursor))
    }

    pub fn set_operator(&mut self, row: RowId, operator: Operator) -> bool {
        match self.constraints.iter_mut().find(|r| r.id == row) {
            Some(r) => {
                r.operator = operator;
                true
            }
            None => false,
        }
    }

    pub fn field(&self, field: FieldId) -> Option<&NumericField> {
        match field {
            FieldId::Objective(i) => self.objective.get(i),
            FieldId::Coefficient { row, index } => {
                self.constraint(row).and_then(|r| r.coefficients.get(index))
            }
            FieldId::Rhs(row) => self.constraint(row).map(|r| &r.rhs),
        }
    }

    fn field_mut(&mut self, field: FieldId) -> Option<&mut NumericField> {
        match field {
            FieldId::Objective(i) => self.objective.get_mut(i),
            FieldId::Coefficient { row, index } => self
                .constraints
                .iter_mut()
                .find(|r| r.id == row)
                .and_then(|r| r.coefficients.get_mut(index)),
            FieldId::Rhs(row) => self
                .constraints
                .iter_mut()
                .find(|r| r.id == row)
                .map(|r| &mut r.rhs),
        }
    }

    /// Every numeric input in page order
    pub fn numeric_fields(&self) -> impl Iterator<Item = (FieldId, &NumericField)> {
        let objective = self
            .objective
            .iter()
            .enumerate()
            .map(|(i, f)| (FieldId::Objective(i), f));
        let rows = self.constraints.iter().flat_map(|r| {
            r.coefficients
                .iter()
                .enumerate()
                .map(move |(index, f)| (FieldId::Coefficient { row: r.id, index }, f))
                .chain(std::iter::once((FieldId::Rhs(r.id), &r.rhs)))
        });
        objective.chain(rows)
    }
}
