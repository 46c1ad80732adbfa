mod cmd;

use clap::Parser;
use cmd::config::Commands;

#[derive(Parser)]
#[command(name = "procon", about = "Produce to and consume from a procon broker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Produce(args) => cmd::produce::run(&args).await,
        Commands::Consume(args) => cmd::consume::run(&args).await,
    };
    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
