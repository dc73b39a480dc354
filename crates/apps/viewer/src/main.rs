use scene::AdminAtlas;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;
use viewer::{MapSession, ViewerConfig, bridge, load_atlas};

#[tokio::main]
async fn main() {
    // stdout carries the command stream; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ViewerConfig::from_env()?;
    info!(root = %config.geojson_root.display(), "loading administrative data");

    let mut atlas = AdminAtlas::new();
    let summary = load_atlas(&config.geojson_root, &mut atlas).await;
    info!(loaded = ?summary.loaded, failed = ?summary.failed, "data ready");

    let mut session = MapSession::new(atlas, config.sync_config());
    let stdin = BufReader::new(tokio::io::stdin());
    bridge::serve(&mut session, stdin, tokio::io::stdout()).await?;
    Ok(())
}
