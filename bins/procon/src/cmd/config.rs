use clap::{Args, Subcommand};

use super::error::CliError;

#[derive(Subcommand)]
pub enum Commands {
    /// Append messages to a topic
    Produce(ProduceArgs),
    /// Read messages from a topic
    Consume(ConsumeArgs),
}

#[derive(Args, Clone, Debug)]
pub struct BrokerArgs {
    /// Broker address: URL, host:port, :port or port
    #[arg(long, default_value = ":7122", env = "PROCON_BROKER")]
    pub broker: String,
}

#[derive(Args, Clone, Debug)]
pub struct ProduceArgs {
    #[command(flatten)]
    pub broker: BrokerArgs,

    /// Topic name
    #[arg(long, short)]
    pub topic: String,

    /// Messages to send. JSON is sent as-is, anything else as a string.
    /// Without messages, one message per stdin line.
    pub data: Vec<String>,
}

#[derive(Args, Clone, Debug)]
pub struct ConsumeArgs {
    #[command(flatten)]
    pub broker: BrokerArgs,

    /// Topic name
    #[arg(long, short)]
    pub topic: String,

    /// Start offset (default: where the last read stopped, or 0)
    #[arg(long, short)]
    pub start: Option<u64>,

    /// Exclusive end offset, -1 for the latest message
    #[arg(long, short, default_value_t = -1, allow_negative_numbers = true)]
    pub end: i64,

    /// Keep polling for new messages until Ctrl+C
    #[arg(long, short)]
    pub follow: bool,

    /// Poll interval in ms for --follow
    #[arg(long, default_value_t = 1000)]
    pub interval_ms: u64,
}

impl ProduceArgs {
    pub fn validate(&self) -> Result<(), CliError> {
        non_empty_topic(&self.topic)
    }
}

impl ConsumeArgs {
    pub fn validate(&self) -> Result<(), CliError> {
        non_empty_topic(&self.topic)?;
        if self.end < -1 {
            return Err(CliError::Config(format!("--end must be >= -1, got {}", self.end)));
        }
        if self.follow && self.end != -1 {
            return Err(CliError::Config("--follow reads to the latest message; drop --end".into()));
        }
        if self.follow && self.interval_ms == 0 {
            return Err(CliError::Config("--interval-ms must be > 0".into()));
        }
        Ok(())
    }
}

fn non_empty_topic(topic: &str) -> Result<(), CliError> {
    if topic.trim().is_empty() {
        return Err(CliError::Config("--topic must not be empty".into()));
    }
    Ok(())
}

/// Parse a message argument: JSON if it parses, a JSON string otherwise.
pub fn parse_message(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
}
