use mock_server::{Documents, EnvelopeMode};
use tokio::net::TcpListener;
use tracing::info;

/// Compact logs filtered by `RUST_LOG` (default `info`).
fn setup_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn load_documents() -> Result<Documents, std::io::Error> {
    match std::env::var("DB_FILE") {
        Ok(path) => {
            let raw = std::fs::read_to_string(&path)?;
            let docs = Documents::from_json(&raw).map_err(std::io::Error::other)?;
            info!(%path, "loaded seed documents");
            Ok(docs)
        }
        Err(_) => Ok(Documents::default()),
    }
}

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    setup_tracing();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let envelope = match std::env::var("ENVELOPE") {
        Ok(raw) => raw.parse::<EnvelopeMode>().map_err(std::io::Error::other)?,
        Err(_) => EnvelopeMode::default(),
    };
    let documents = load_documents()?;

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, ?envelope, "listening");
    mock_server::run_with(listener, documents, envelope).await
}
