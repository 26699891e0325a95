use crate::error::{Result, SimplexError};
use crate::types::{Operator, ProblemPayload, ProblemType};

/// Builder for constructing problem payloads with a fluent API
#[derive(Debug, Default)]
pub struct ProblemBuilder {
    problem_type: ProblemType,
    objective: Vec<f64>,
    coefficients: Vec<Vec<f64>>,
    operators: Vec<Operator>,
    rhs: Vec<f64>,
}

impl ProblemBuilder {
    /// Create a new builder for a maximization problem
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the optimization sense
    ///
    /// # Example
    ///
    /// ```
    /// use simplex_api_sdk::{ProblemBuilder, ProblemType};
    ///
    /// let builder = ProblemBuilder::new()
    ///     .problem_type(ProblemType::Minimization);
    /// ```
    pub fn problem_type(mut self, problem_type: ProblemType) -> Self {
        self.problem_type = problem_type;
        self
    }

    /// Set the objective coefficients, one per variable
    ///
    /// # Example
    ///
    /// ```
    /// use simplex_api_sdk::ProblemBuilder;
    ///
    /// // Z = 3x1 + 5x2
    /// let builder = ProblemBuilder::new().objective(vec![3.0, 5.0]);
    /// ```
    pub fn objective(mut self, coefficients: Vec<f64>) -> Self {
        self.objective = coefficients;
        self
    }

    /// Add a constraint row
    ///
    /// # Example
    ///
    /// ```
    /// use simplex_api_sdk::{Operator, ProblemBuilder};
    ///
    /// // 3x1 + 2x2 <= 18
    /// let builder = ProblemBuilder::new()
    ///     .objective(vec![3.0, 5.0])
    ///     .constraint(vec![3.0, 2.0], Operator::LessEqual, 18.0);
    /// ```
    pub fn constraint(mut self, coefficients: Vec<f64>, operator: Operator, rhs: f64) -> Self {
        self.coefficients.push(coefficients);
        self.operators.push(operator);
        self.rhs.push(rhs);
        self
    }

    /// Build the payload
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No objective coefficients have been set
    /// - No constraint has been added
    /// - A constraint does not have one coefficient per variable
    pub fn build(self) -> Result<ProblemPayload> {
        if self.objective.is_empty() {
            return Err(SimplexError::InvalidRequest(
                "At least one variable is required".to_string(),
            ));
        }

        if self.coefficients.is_empty() {
            return Err(SimplexError::InvalidRequest(
                "At least one constraint is required".to_string(),
            ));
        }

        let expected = self.objective.len();
        if let Some((row, found)) = self
            .coefficients
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, len)| *len != expected)
        {
            return Err(SimplexError::ArityMismatch {
                row: row + 1,
                found,
                expected,
            });
        }

        Ok(ProblemPayload {
            problem_type: self.problem_type,
            c: self.objective,
            li: self.coefficients,
            o: self.operators,
            ld: self.rhs,
        })
    }
}
