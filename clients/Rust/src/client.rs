use crate::error::{Result, SimplexError};
use crate::types::{ProblemPayload, SolveResponse, SolverResult};
use reqwest::{Client, Url};

const SOLVE_PATH: &str = "/simplex/solve-tabular";
const GRAPH_PATH: &str = "/simplex/generate-graph-html";

/// HTTP client for the tabular simplex API
///
/// Requests are sent once: there is no retry and no timeout unless the
/// wrapped [`reqwest::Client`] was configured with one.
#[derive(Debug, Clone)]
pub struct SimplexClient {
    client: Client,
    base_url: Url,
}

impl SimplexClient {
    /// Create a new simplex API client
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the solver (e.g., "http://localhost:8000")
    ///
    /// # Example
    ///
    /// ```no_run
    /// use simplex_api_sdk::SimplexClient;
    ///
    /// let client = SimplexClient::new("http://localhost:8000").unwrap();
    /// ```
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new client with a custom reqwest client
    ///
    /// This allows you to configure proxies, TLS, etc.
    pub fn with_client(base_url: impl AsRef<str>, client: Client) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref())
            .map_err(|e| SimplexError::InvalidUrl(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Solve a problem and return the tableau history
    ///
    /// A non-success status or a body that does not parse as a
    /// [`SolverResult`] fails with [`SimplexError::SolverRequestFailed`]
    /// carrying the body verbatim.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use simplex_api_sdk::{SimplexClient, ProblemBuilder, Operator, ProblemType};
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = SimplexClient::new("http://localhost:8000")?;
    ///
    /// let payload = ProblemBuilder::new()
    ///     .problem_type(ProblemType::Maximization)
    ///     .objective(vec![3.0, 5.0])
    ///     .constraint(vec![1.0, 0.0], Operator::LessEqual, 4.0)
    ///     .constraint(vec![0.0, 2.0], Operator::LessEqual, 12.0)
    ///     .build()?;
    ///
    /// let response = client.solve(&payload).await?;
    /// println!("Status: {}", response.result.status);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn solve(&self, payload: &ProblemPayload) -> Result<SolveResponse> {
        let url = self.endpoint(SOLVE_PATH)?;

        let response = self.client.post(url).json(payload).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(SimplexError::SolverRequestFailed {
                status_code: status.as_u16(),
                raw_body: body,
            });
        }

        match serde_json::from_str::<SolverResult>(&body) {
            Ok(result) => Ok(SolveResponse { result, body }),
            Err(_) => Err(SimplexError::SolverRequestFailed {
                status_code: status.as_u16(),
                raw_body: body,
            }),
        }
    }

    /// Fetch an HTML document plotting a two-variable problem
    ///
    /// The document is returned as received; it is not sanitized.
    pub async fn fetch_graph(&self, payload: &ProblemPayload) -> Result<String> {
        if !payload.is_two_dimensional() {
            return Err(SimplexError::GraphUnavailable(payload.num_variables()));
        }

        let url = self.endpoint(GRAPH_PATH)?;

        let response = self.client.post(url).json(payload).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(SimplexError::GraphRequestFailed {
                status_code: status.as_u16(),
                raw_body: body,
            });
        }

        Ok(body)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| SimplexError::InvalidUrl(e.to_string()))
    }
}
