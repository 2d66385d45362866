use reqwest::multipart::{Form, Part};
use reqwest::{Body, Method};
use std::path::Path;
use tokio::fs::File;
use tracing::info;

use super::{GatewayClient, require_non_empty};
use crate::error::{GatewayError, GatewayResult};
use crate::models::{PreviewResponse, UploadRequest, UploadResponse};

impl GatewayClient {
    /// Imports a spreadsheet into a Doris table.
    ///
    /// The file is opened before any request is made, so an unreadable path
    /// fails with `LocalIo` without contacting the gateway.
    pub async fn upload_file(&self, request: &UploadRequest) -> GatewayResult<UploadResponse> {
        require_non_empty(&request.table_name, "table name")?;

        let mut form = Form::new()
            .part("file", file_part(&request.path).await?)
            .text("table_name", request.table_name.clone())
            .text("create_table", request.create_table.to_string());

        if let Some(mapping) = &request.column_mapping {
            let encoded = serde_json::to_string(mapping).map_err(|e| {
                GatewayError::invalid_input(format!("column mapping is not serializable: {}", e))
            })?;
            form = form.text("column_mapping", encoded);
        }

        info!(
            "Uploading {} into table {}",
            request.path.display(),
            request.table_name
        );
        let (label, builder) = self.request(Method::POST, &["api", "upload"]);
        let response: UploadResponse = self.dispatch(&label, builder.multipart(form), true).await?;

        info!(
            "Imported {} rows into {}",
            response.rows_imported, response.table_name
        );
        Ok(response)
    }

    /// Asks the gateway to parse the first `rows` rows of a file without
    /// importing anything.
    pub async fn preview_file(
        &self,
        path: impl AsRef<Path>,
        rows: u32,
    ) -> GatewayResult<PreviewResponse> {
        if rows == 0 {
            return Err(GatewayError::invalid_input("preview row count must be positive"));
        }

        let form = Form::new()
            .part("file", file_part(path.as_ref()).await?)
            .text("rows", rows.to_string());

        let (label, builder) = self.request(Method::POST, &["api", "upload", "preview"]);
        let builder = builder.query(&[("rows", rows)]).multipart(form);
        self.dispatch(&label, builder, true).await
    }
}

/// Opens `path` and wraps it as a streamed multipart part.
///
/// The handle moves into the request body and is closed when the body is
/// dropped, whether the upload completes, fails or is cancelled.
async fn file_part(path: &Path) -> GatewayResult<Part> {
    let local_io = |source: std::io::Error| GatewayError::LocalIo {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).await.map_err(local_io)?;
    let metadata = file.metadata().await.map_err(local_io)?;
    if !metadata.is_file() {
        return Err(local_io(std::io::Error::other("not a regular file")));
    }

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    let mime = mime_guess::from_path(path).first_or_octet_stream();

    let part = Part::stream_with_length(Body::from(file), metadata.len())
        .file_name(file_name)
        .mime_str(mime.as_ref())?;
    Ok(part)
}
