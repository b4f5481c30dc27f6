use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    response::Json,
};
use tracing::info;

use crate::error::ApiError;
use crate::{classify_url, AppState};

const UPLOAD_FIELD: &str = "upload_file";

/// Classify every line of an uploaded file of thread URLs.
///
/// Keys are the raw lines including their trailing newline. The first line
/// that fails aborts the whole batch.
pub async fn automated_testing(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<BTreeMap<String, String>>, ApiError> {
    let mut multipart = multipart.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let (file_name, bytes) = loop {
        let field = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?
            .ok_or_else(|| ApiError::BadRequest(format!("missing {UPLOAD_FIELD} part")))?;
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(str::to_owned);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        break (file_name, bytes);
    };

    let upload = tempfile::Builder::new()
        .prefix("upload-")
        .suffix(".txt")
        .tempfile_in(&state.upload_dir)
        .with_context(|| format!("creating upload file in {}", state.upload_dir.display()))?;
    tokio::fs::write(upload.path(), &bytes)
        .await
        .context("saving upload")?;
    let contents = tokio::fs::read_to_string(upload.path())
        .await
        .context("reading upload")?;

    info!(
        file_name = file_name.as_deref().unwrap_or("<unnamed>"),
        saved_as = %upload.path().display(),
        bytes = bytes.len(),
        "Batch upload received"
    );

    let mut predictions = BTreeMap::new();
    for line in split_lines(&contents) {
        let label = classify_url(&state, &line).await?;
        predictions.insert(line, label.to_string());
    }

    info!(lines = predictions.len(), "Batch classified");
    Ok(Json(predictions))
}

/// Lines with their trailing `\n`, after translating `\r\n` and `\r` line
/// endings to `\n`.
fn split_lines(contents: &str) -> Vec<String> {
    let unified = contents.replace("\r\n", "\n").replace('\r', "\n");
    unified.split_inclusive('\n').map(str::to_owned).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_keep_their_newline() {
        assert_eq!(split_lines("a\nb\n"), vec!["a\n", "b\n"]);
        assert_eq!(split_lines("a\nb"), vec!["a\n", "b"]);
    }

    #[test]
    fn windows_and_old_mac_endings_become_newlines() {
        assert_eq!(split_lines("a\r\nb\rc"), vec!["a\n", "b\n", "c"]);
    }

    #[test]
    fn empty_upload_has_no_lines() {
        assert!(split_lines("").is_empty());
    }
}
