use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct TableList {
    pub tables: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSchema {
    pub table: String,
    #[serde(rename = "schema")]
    pub columns: Vec<ColumnDescriptor>,
}

/// One row of `DESCRIBE <table>` as relayed by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    #[serde(rename = "Field")]
    pub field: String,
    #[serde(rename = "Type")]
    pub column_type: String,
    #[serde(rename = "Null", default)]
    pub null: String,
    #[serde(rename = "Key", default)]
    pub key: String,
    #[serde(rename = "Default", default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(rename = "Extra", default)]
    pub extra: String,
}

impl ColumnDescriptor {
    pub fn is_nullable(&self) -> bool {
        self.null.eq_ignore_ascii_case("yes")
    }

    // Doris reports "true"/"false", MySQL-style servers report "PRI".
    pub fn is_key(&self) -> bool {
        self.key.eq_ignore_ascii_case("true") || self.key.eq_ignore_ascii_case("pri")
    }
}

impl TableSchema {
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.field == name)
    }
}
