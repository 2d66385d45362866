use reqwest::Method;
use tracing::info;

use super::{GatewayClient, require_non_empty};
use crate::error::GatewayResult;
use crate::models::{
    HealthStatus, NaturalQueryRequest, NaturalQueryResponse, ServiceInfo, SqlExecRequest,
    SqlExecResponse,
};

impl GatewayClient {
    /// Fetches the gateway banner.
    pub async fn service_info(&self) -> GatewayResult<ServiceInfo> {
        let (label, request) = self.request(Method::GET, &[]);
        self.dispatch(&label, request, true).await
    }

    /// Checks the gateway and its Doris connection.
    ///
    /// A reachable gateway that cannot reach Doris is reported through
    /// `doris_connected`, not as an error.
    pub async fn check_health(&self) -> GatewayResult<HealthStatus> {
        let (label, request) = self.request(Method::GET, &["api", "health"]);
        let health: HealthStatus = self.dispatch(&label, request, false).await?;

        if !health.doris_connected {
            info!(
                "Gateway reachable but Doris is not connected: {}",
                health.error.as_deref().unwrap_or("no reason given")
            );
        }
        Ok(health)
    }

    /// Asks a natural-language question using the client's default LLM
    /// credentials, if any.
    pub async fn ask(&self, question: impl Into<String>) -> GatewayResult<NaturalQueryResponse> {
        self.ask_with(NaturalQueryRequest::new(question)).await
    }

    /// Asks a natural-language question.
    ///
    /// Overrides on the request win over the client defaults. Whatever is
    /// still unset afterwards is left out of the body so the gateway falls
    /// back to its own configuration.
    pub async fn ask_with(
        &self,
        mut request: NaturalQueryRequest,
    ) -> GatewayResult<NaturalQueryResponse> {
        if request.api_key.is_none() {
            request.api_key = self.api_key.clone();
        }
        if request.model.is_none() {
            request.model = self.model.clone();
        }

        info!("Natural language query: {}", request.question);
        let (label, builder) = self.request(Method::POST, &["api", "query", "natural"]);
        let response: NaturalQueryResponse =
            self.dispatch(&label, builder.json(&request), true).await?;

        info!("Generated SQL returned {} rows: {}", response.count, response.sql);
        Ok(response)
    }

    /// Runs a request against the unified execute endpoint.
    pub async fn execute(&self, request: &SqlExecRequest) -> GatewayResult<SqlExecResponse> {
        require_non_empty(&request.action, "action")?;
        if request.action == SqlExecRequest::QUERY_ACTION {
            require_non_empty(request.sql().unwrap_or_default(), "SQL")?;
        }

        let (label, builder) = self.request(Method::POST, &["api", "execute"]);
        self.dispatch(&label, builder.json(request), true).await
    }

    /// Executes a SQL statement directly.
    pub async fn run_query(&self, sql: &str) -> GatewayResult<SqlExecResponse> {
        let response = self.execute(&SqlExecRequest::query(sql)).await?;
        info!("SQL returned {} rows", response.count);
        Ok(response)
    }
}
