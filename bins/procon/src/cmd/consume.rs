use std::time::Duration;

use broker_client::{Consumer, RangeEnd};
use serde_json::Value;

use super::config::ConsumeArgs;
use super::error::CliError;

pub async fn run(args: &ConsumeArgs) -> Result<(), CliError> {
    args.validate()?;
    let mut consumer = Consumer::new(&args.broker.broker);
    let end = RangeEnd::from_wire(args.end)
        .ok_or_else(|| CliError::Config(format!("invalid --end {}", args.end)))?;

    if !args.follow {
        let data = consumer.consume(&args.topic, args.start, end).await?;
        print_json(&Value::Array(data))?;
        return Ok(());
    }

    if let Some(start) = args.start {
        consumer.seek(&args.topic, start);
    }
    let interval = Duration::from_millis(args.interval_ms);
    let mut idle = IdleReason::default();

    loop {
        match consumer.consume(&args.topic, None, RangeEnd::Latest).await {
            Ok(data) => {
                idle.clear();
                for value in &data {
                    print_json(value)?;
                }
            }
            // Nothing past the cursor yet, or nobody has produced to the topic.
            Err(e) if e.is_bad_request() || e.is_unknown_topic() => {
                let reason = e.to_string();
                if idle.changed(&reason) {
                    tracing::info!(
                        topic = %args.topic,
                        offset = consumer.offset(&args.topic),
                        reason = %reason,
                        "waiting for messages"
                    );
                } else {
                    tracing::trace!(topic = %args.topic, "idle");
                }
            }
            Err(e) => return Err(e.into()),
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            res = tokio::signal::ctrl_c() => {
                res?;
                tracing::info!(topic = %args.topic, offset = consumer.offset(&args.topic), "stopped");
                return Ok(());
            }
        }
    }
}

/// Last rejection seen while polling, so a repeated one is reported only once.
#[derive(Debug, Default)]
struct IdleReason {
    last: Option<String>,
}

impl IdleReason {
    /// Record `reason`; `true` if it differs from the previous one.
    fn changed(&mut self, reason: &str) -> bool {
        if self.last.as_deref() == Some(reason) {
            return false;
        }
        self.last = Some(reason.to_string());
        true
    }

    fn clear(&mut self) {
        self.last = None;
    }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
