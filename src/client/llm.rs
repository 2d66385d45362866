use reqwest::Method;
use tracing::info;

use super::{GatewayClient, require_path_segment};
use crate::error::GatewayResult;
use crate::models::llm::LlmResourceList;
use crate::models::{Acknowledgement, LlmConfig, LlmResource, LlmTestOutcome};

const LLM_CONFIG_PATH: [&str; 3] = ["api", "llm", "config"];

impl GatewayClient {
    /// Registers an LLM resource on the gateway.
    pub async fn create_llm_config(&self, config: &LlmConfig) -> GatewayResult<Acknowledgement> {
        config.validate()?;

        info!(
            "Creating LLM resource {} ({} / {})",
            config.resource_name, config.provider_type, config.model_name
        );
        let (label, request) = self.request(Method::POST, &LLM_CONFIG_PATH);
        self.dispatch(&label, request.json(config), true).await
    }

    pub async fn list_llm_configs(&self) -> GatewayResult<Vec<LlmResource>> {
        let (label, request) = self.request(Method::GET, &LLM_CONFIG_PATH);
        let list: LlmResourceList = self.dispatch(&label, request, true).await?;
        Ok(list.resources)
    }

    /// Runs a one-shot generation through the named resource.
    pub async fn test_llm_config(&self, resource_name: &str) -> GatewayResult<LlmTestOutcome> {
        require_path_segment(resource_name, "resource name")?;
        let (label, request) =
            self.request(Method::POST, &["api", "llm", "config", resource_name, "test"]);
        self.dispatch(&label, request, true).await
    }

    /// Drops the named resource. Deleting an absent resource is reported by
    /// the gateway as a `Remote` error every time.
    pub async fn delete_llm_config(&self, resource_name: &str) -> GatewayResult<Acknowledgement> {
        require_path_segment(resource_name, "resource name")?;
        let (label, request) =
            self.request(Method::DELETE, &["api", "llm", "config", resource_name]);
        let ack: Acknowledgement = self.dispatch(&label, request, true).await?;

        info!("Deleted LLM resource {}", resource_name);
        Ok(ack)
    }
}
