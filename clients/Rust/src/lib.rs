//! # Simplex API Client
//!
//! A Rust client SDK for the tabular simplex REST API: it sends linear
//! programs to `/simplex/solve-tabular` and fetches two-variable plots from
//! `/simplex/generate-graph-html`.
//!
//! ## Example
//!
//! ```no_run
//! use simplex_api_sdk::{Operator, ProblemBuilder, ProblemType, SimplexClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SimplexClient::new("http://localhost:8000")?;
//!
//!     let payload = ProblemBuilder::new()
//!         .problem_type(ProblemType::Maximization)
//!         .objective(vec![3.0, 5.0])
//!         .constraint(vec![1.0, 0.0], Operator::LessEqual, 4.0)
//!         .constraint(vec![0.0, 2.0], Operator::LessEqual, 12.0)
//!         .constraint(vec![3.0, 2.0], Operator::LessEqual, 18.0)
//!         .build()?;
//!
//!     let response = client.solve(&payload).await?;
//!     println!("Status: {}", response.result.status);
//!     Ok(())
//! }
//! ```

pub mod types;
pub mod client;
pub mod builder;
pub mod error;

pub use client::SimplexClient;
pub use types::{
    Cell, Operator, ProblemPayload, ProblemType, SimplexTable, Solution, SolveResponse,
    SolverResult, VariableValue, Variables, OPTIMAL_STATUS,
};
pub use builder::ProblemBuilder;
pub use error::{Result, SimplexError};
