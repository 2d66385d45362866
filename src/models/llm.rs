use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::{GatewayError, GatewayResult};

/// An LLM resource definition registered on the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Unique resource name; also the path key for test and delete.
    pub resource_name: String,
    /// Vendor identifier such as `openai`, `deepseek` or `qwen`.
    pub provider_type: String,
    pub endpoint: String,
    pub model_name: String,
    pub api_key: String,
    /// Sampling temperature. Included only if set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Completion token limit. Included only if set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl LlmConfig {
    pub fn new(
        resource_name: impl Into<String>,
        provider_type: impl Into<String>,
        endpoint: impl Into<String>,
        model_name: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            resource_name: resource_name.into(),
            provider_type: provider_type.into(),
            endpoint: endpoint.into(),
            model_name: model_name.into(),
            api_key: api_key.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub(crate) fn validate(&self) -> GatewayResult<()> {
        let required = [
            ("resource_name", &self.resource_name),
            ("provider_type", &self.provider_type),
            ("endpoint", &self.endpoint),
            ("model_name", &self.model_name),
            ("api_key", &self.api_key),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(GatewayError::invalid_input(format!(
                    "LLM config field '{}' must not be empty",
                    field
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct LlmResourceList {
    pub resources: Vec<LlmResource>,
}

/// An AI resource as listed by the gateway, with its raw property map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResource {
    #[serde(rename = "ResourceName")]
    pub name: String,
    #[serde(rename = "ResourceType", default)]
    pub resource_type: String,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl LlmResource {
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .get(key)
            .or_else(|| self.properties.get(&format!("ai.{}", key)))
            .map(String::as_str)
    }

    pub fn provider_type(&self) -> Option<&str> {
        self.property("provider_type")
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.property("endpoint")
    }

    pub fn model_name(&self) -> Option<&str> {
        self.property("model_name")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmTestOutcome {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_result: Option<Value>,
}
