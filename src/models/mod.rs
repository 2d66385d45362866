pub mod llm;
pub mod query;
pub mod schema;
pub mod upload;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use llm::{LlmConfig, LlmResource, LlmTestOutcome};
pub use query::{
    HealthStatus, NaturalQueryRequest, NaturalQueryResponse, ServiceInfo, SqlExecRequest,
    SqlExecResponse,
};
pub use schema::{ColumnDescriptor, TableSchema};
pub use upload::{PreviewResponse, UploadRequest, UploadResponse};

/// One result row: column name to a dynamically typed value.
pub type Row = Map<String, Value>;

/// Plain `{success, message}` answer used by create and delete calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    /// Statement the gateway ran on our behalf, when it reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,
}
