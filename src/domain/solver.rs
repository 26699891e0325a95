use async_trait::async_trait;
use simplex_api_sdk::{ProblemPayload, SimplexClient, SimplexError, SolveResponse};

/// Common interface for the services that solve submitted problems
#[async_trait]
pub trait Solver: Send + Sync {
    /// Solve a problem and return the parsed result with its raw body
    async fn solve(&self, payload: &ProblemPayload) -> Result<SolveResponse, SimplexError>;

    /// Fetch an HTML document plotting a two-variable problem
    async fn fetch_graph(&self, payload: &ProblemPayload) -> Result<String, SimplexError>;

    /// Get the solver name for logging/debugging
    fn name(&self) -> &str;
}

#[async_trait]
impl Solver for SimplexClient {
    async fn solve(&self, payload: &ProblemPayload) -> Result<SolveResponse, SimplexError> {
        SimplexClient::solve(self, payload).await
    }

    async fn fetch_graph(&self, payload: &ProblemPayload) -> Result<String, SimplexError> {
        SimplexClient::fetch_graph(self, payload).await
    }

    fn name(&self) -> &str {
        "remote simplex"
    }
}

/// Create the solver that talks to the service at `base_url`
pub fn create_solver(base_url: &str) -> Result<Box<dyn Solver>, SimplexError> {
    Ok(Box::new(SimplexClient::new(base_url)?))
}
