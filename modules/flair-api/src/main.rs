use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use flair_api::{router, AppState, Config};
use flair_classifier::Predictor;
use reddit_client::RedditClient;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("flair=info".parse()?)
                .add_directive("reddit_client=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;

    let predictor = Predictor::load(&config.artifact_paths())?;
    let client = RedditClient::new(
        config.reddit_client_id.clone(),
        config.reddit_client_secret.clone(),
        config.reddit_user_agent.clone(),
    );

    let state = Arc::new(AppState {
        predictor: Arc::new(predictor),
        fetcher: Arc::new(client),
        upload_dir: config.upload_dir.clone(),
    });

    let app = router(state);

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("Flair API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
