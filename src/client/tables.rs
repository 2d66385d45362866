use reqwest::Method;

use super::{GatewayClient, require_path_segment};
use crate::error::GatewayResult;
use crate::models::TableSchema;
use crate::models::schema::TableList;

impl GatewayClient {
    /// Lists table names in the gateway's database, in gateway order.
    pub async fn list_tables(&self) -> GatewayResult<Vec<String>> {
        let (label, request) = self.request(Method::GET, &["api", "tables"]);
        let list: TableList = self.dispatch(&label, request, true).await?;
        Ok(list.tables)
    }

    pub async fn get_table_schema(&self, table: &str) -> GatewayResult<TableSchema> {
        require_path_segment(table, "table name")?;
        let (label, request) = self.request(Method::GET, &["api", "tables", table, "schema"]);
        self.dispatch(&label, request, true).await
    }
}
