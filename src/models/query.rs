use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Row;

/// Banner returned by the gateway root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub service: String,
    pub status: String,
    pub version: String,
}

/// Gateway health and Doris connectivity.
///
/// An unhealthy gateway still answers 200 with `success: false`, so this is
/// returned as data rather than as an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub success: bool,
    #[serde(default)]
    pub doris_connected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A natural-language question for the text-to-SQL endpoint.
///
/// Every optional member is included in the request body only if set; the
/// gateway treats a present field as "override the server default".
#[derive(Debug, Clone, Default, Serialize)]
pub struct NaturalQueryRequest {
    #[serde(rename = "query")]
    pub question: String,
    /// LLM API key. Included only if set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// LLM model name. Included only if set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Alternate LLM endpoint. Included only if set.
    #[serde(rename = "base_url", skip_serializing_if = "Option::is_none")]
    pub llm_base_url: Option<String>,
}

impl NaturalQueryRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            ..Default::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_llm_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.llm_base_url = Some(base_url.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NaturalQueryResponse {
    pub success: bool,
    /// The question as the gateway received it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub sql: String,
    pub data: Vec<Row>,
    pub count: usize,
}

/// Body for the unified execute endpoint.
///
/// Only the `query` action is modelled with a constructor; other action
/// names are passed through as-is for gateways that support them.
#[derive(Debug, Clone, Serialize)]
pub struct SqlExecRequest {
    pub action: String,
    /// Target table. Included only if set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    /// Target column. Included only if set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    pub params: Map<String, Value>,
}

impl SqlExecRequest {
    pub const QUERY_ACTION: &'static str = "query";

    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            table: None,
            column: None,
            params: Map::new(),
        }
    }

    pub fn query(sql: impl Into<String>) -> Self {
        Self::new(Self::QUERY_ACTION).with_param("sql", sql.into())
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn sql(&self) -> Option<&str> {
        self.params.get("sql").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlExecResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default)]
    pub data: Vec<Row>,
    #[serde(default)]
    pub count: usize,
    /// Anything else the action handler returned.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
