use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use stubway_http_stub::StubAdapter;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "stubway", about = "Serve contract stub descriptors over HTTP")]
struct Args {
    /// Port to bind; omit to pick a free port
    #[arg(short, long)]
    port: Option<u16>,
    /// Directory containing .json stub descriptors
    #[arg(short, long)]
    mappings_dir: Option<PathBuf>,
    /// Forward engine log events at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let mut adapter = StubAdapter::new();
    if let Some(port) = args.port {
        adapter.start_on(port).await?;
    } else {
        adapter.start().await?;
    }
    info!("stubway serving on port {}", adapter.port());

    let files = match args.mappings_dir {
        Some(ref dir) => {
            let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
                .with_context(|| format!("cannot read mappings dir [{}]", dir.display()))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| StubAdapter::is_accepted(path))
                .collect();
            files.sort();
            files
        }
        None => Vec::new(),
    };

    // Health checks are installed even with no descriptor files
    adapter.register_mappings(&files).await?;
    info!("registered {} stub descriptor file(s)", files.len());

    tokio::signal::ctrl_c().await.ok();
    adapter.stop().await;
    Ok(())
}
