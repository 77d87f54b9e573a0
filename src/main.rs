//! domain-culture service.
//!
//! Serves the resolved domain culture of each request as JSON.
//!
//! ```text
//!     Client Request
//!     ──────────────▶ request id → trace → timeout → domain_culture middleware → handler
//!                                                    │
//!                                                    ▼
//!                                         ArcSwap<Resolver> ◀── config watcher (--watch)
//! ```

use std::path::PathBuf;

use clap::Parser;

use domain_culture::lifecycle::{self, StartupOptions};

#[derive(Parser)]
#[command(name = "domain-culture")]
#[command(about = "Resolve request domain and culture against a whitelist", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: PathBuf,

    /// Reload the whitelist when the configuration file changes.
    #[arg(short, long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    lifecycle::run(StartupOptions {
        config_path: cli.config,
        watch: cli.watch,
    })
    .await?;

    Ok(())
}
