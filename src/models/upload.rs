use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::Row;

pub const DEFAULT_PREVIEW_ROWS: u32 = 10;

/// A spreadsheet to import into a Doris table.
///
/// The file is opened and streamed when the upload is sent; nothing is read
/// when the request is built.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub path: PathBuf,
    pub table_name: String,
    pub create_table: bool,
    /// Source column to target column renames. Included only if set.
    pub column_mapping: Option<BTreeMap<String, String>>,
}

impl UploadRequest {
    pub fn new(path: impl Into<PathBuf>, table_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            table_name: table_name.into(),
            create_table: true,
            column_mapping: None,
        }
    }

    pub fn with_create_table(mut self, create_table: bool) -> Self {
        self.create_table = create_table;
        self
    }

    pub fn with_column_mapping(mut self, mapping: BTreeMap<String, String>) -> Self {
        self.column_mapping = Some(mapping);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub table_name: String,
    pub rows_imported: u64,
    #[serde(default)]
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub data: Vec<Row>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
