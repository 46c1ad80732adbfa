use tokio::io::{AsyncBufReadExt, BufReader};

use broker_client::Producer;

use super::config::{ProduceArgs, parse_message};
use super::error::CliError;

pub async fn run(args: &ProduceArgs) -> Result<(), CliError> {
    args.validate()?;
    let mut producer = Producer::new(&args.broker.broker);

    if !args.data.is_empty() {
        for raw in &args.data {
            send(&mut producer, &args.topic, raw).await?;
        }
        return Ok(());
    }

    // Stdin mode: one message per non-empty line.
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        send(&mut producer, &args.topic, &line).await?;
    }
    Ok(())
}

async fn send(producer: &mut Producer, topic: &str, raw: &str) -> Result<(), CliError> {
    let offset = producer.produce(topic, &parse_message(raw)).await?;
    println!("{offset}");
    Ok(())
}
