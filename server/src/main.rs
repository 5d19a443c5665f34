use anyhow::{Context, Result};
use clap::Parser;
use lexis_server::build_app;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

/// Serves boolean and ranked queries over a built index as JSON.
#[derive(Parser)]
#[command(name = "lexis-server", about = "HTTP query server for boolean and TF-IDF search", long_about = None)]
struct Args {
    /// Directory written by `indexer build` (snapshot.bin or the text artifacts)
    #[arg(long, default_value = "./index")]
    index: String,
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let app = build_app(args.index.clone()).with_context(|| format!("loading index from {}", args.index))?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", args.host, args.port))?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, index = %args.index, "query server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
