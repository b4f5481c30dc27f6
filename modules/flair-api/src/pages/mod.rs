use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, State},
    response::Html,
    Form,
};
use serde::Deserialize;

use crate::components::render_index;
use crate::error::ApiError;
use crate::{classify_url, AppState};

#[derive(Deserialize)]
pub struct PredictForm {
    url: String,
}

pub async fn home() -> Html<String> {
    Html(render_index(None))
}

pub async fn predict(
    State(state): State<Arc<AppState>>,
    form: Result<Form<PredictForm>, FormRejection>,
) -> Result<Html<String>, ApiError> {
    let Form(form) = form.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let label = classify_url(&state, &form.url).await?;
    let message = format!("Flair of the given reddit post is : {label} ");
    Ok(Html(render_index(Some(message))))
}
