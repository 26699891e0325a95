use thiserror::Error;

/// Result type for simplex API client operations
pub type Result<T> = std::result::Result<T, SimplexError>;

/// Errors that can occur when using the simplex API client
#[derive(Error, Debug)]
pub enum SimplexError {
    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Invalid URL provided
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The solve endpoint answered with a failure, or its body did not parse
    #[error("{}", failure_message(.status_code, .raw_body))]
    SolverRequestFailed { status_code: u16, raw_body: String },

    /// The graph endpoint answered with a failure
    #[error("{}", failure_message(.status_code, .raw_body))]
    GraphRequestFailed { status_code: u16, raw_body: String },

    /// Graphs are only drawn for problems with two variables
    #[error("A graph needs exactly 2 variables, the problem has {0}")]
    GraphUnavailable(usize),

    /// Invalid request configuration
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A constraint row does not have one coefficient per variable
    #[error("Constraint {row} has {found} coefficients, expected {expected}")]
    ArityMismatch {
        row: usize,
        found: usize,
        expected: usize,
    },
}

// The raw body is what users see; fall back to the status when it is empty.
fn failure_message(status_code: &u16, raw_body: &str) -> String {
    if raw_body.trim().is_empty() {
        format!("Error {}", status_code)
    } else {
        raw_body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_message_is_raw_body() {
        let err = SimplexError::SolverRequestFailed {
            status_code: 400,
            raw_body: r#"{"detail":"Datos inválidos"}"#.to_string(),
        };
        assert_eq!(err.to_string(), r#"{"detail":"Datos inválidos"}"#);
    }

    #[test]
    fn test_failure_message_falls_back_to_status() {
        let err = SimplexError::GraphRequestFailed {
            status_code: 502,
            raw_body: String::new(),
        };
        assert_eq!(err.to_string(), "Error 502");
    }
}
