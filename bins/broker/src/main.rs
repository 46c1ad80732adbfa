mod config;
mod error;

mod cmd;

use clap::Parser;
use config::{Effective, ServeArgs};

#[derive(Parser)]
#[command(name = "procon-broker", about = "In-memory publish/subscribe broker")]
struct Cli {
    #[command(flatten)]
    args: ServeArgs,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let eff = match Effective::new(&cli.args) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = cmd::serve::run(eff).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
