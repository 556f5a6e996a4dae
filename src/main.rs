//! Command-line interface for the Kafka REST Proxy
//!
//! # Usage Examples
//!
//! ```bash
//! # List topics and brokers
//! kafka-rest --proxy-url http://localhost:8082 topics
//! kafka-rest brokers
//!
//! # Produce one record per stdin line
//! printf 'one\ntwo\n' | kafka-rest produce --topic events --key source-a
//!
//! # Consume in batches of at most 100 messages or 30 seconds
//! kafka-rest consume --group audit --topic events \
//!   --max-count 100 --max-duration 30s --offset-reset earliest
//! ```
//!
//! The proxy URL can also be set with `KAFKA_REST_URL`. Consumed messages are
//! printed to stdout as JSON lines; logging goes to stderr and is controlled
//! by `RUST_LOG`.

mod config;

use anyhow::Context;
use clap::{Parser, Subcommand};
use kafka_rest::{
    AutoOffsetReset, BatchConsumer, BatchConsumerFactory, ClientConfig, ConsumerOptions,
    Message, ProduceRecord, Producer, RestClient, Subscription,
};
use serde_json::json;
use std::sync::Arc;
use tokio::io::AsyncBufReadExt;
use tracing::info;

use crate::config::duration::parse_duration_to_secs;

#[derive(Parser)]
#[command(name = "kafka-rest")]
#[command(about = "Produce to and consume from Kafka through the Kafka REST Proxy")]
#[command(long_about = None)]
struct Cli {
    /// Kafka REST Proxy connection options
    #[command(flatten)]
    client: ClientConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List topic names
    Topics,

    /// List broker ids
    Brokers,

    /// Produce one record per line read from stdin
    Produce {
        /// Topic to produce to
        #[arg(long)]
        topic: String,

        /// Key attached to every record
        #[arg(long)]
        key: Option<String>,
    },

    /// Consume a topic in batches, printing every message as a JSON line
    Consume {
        /// Consumer group
        #[arg(long)]
        group: String,

        /// Topic to subscribe to
        #[arg(long)]
        topic: String,

        /// Flush a batch once it holds this many messages
        #[arg(long)]
        max_count: Option<usize>,

        /// Flush a batch once it has been open this long ("30s", "5m", "1h")
        #[arg(long)]
        max_duration: Option<String>,

        /// Max bytes hint passed to every fetch
        #[arg(long)]
        max_bytes: Option<u64>,

        /// Where to start without a committed offset (earliest, latest, none)
        #[arg(long)]
        offset_reset: Option<AutoOffsetReset>,

        /// Do not commit consumed batches
        #[arg(long)]
        no_commit: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client: Arc<dyn RestClient> = Arc::new(
        cli.client
            .build()
            .context("Failed to configure the REST Proxy client")?,
    );

    match cli.command {
        Commands::Topics => {
            let topics = client.list_topics().await.context("Failed to list topics")?;
            for topic in topics {
                println!("{topic}");
            }
        }
        Commands::Brokers => {
            let brokers = client.brokers().await.context("Failed to list brokers")?;
            for broker in brokers {
                println!("{broker}");
            }
        }
        Commands::Produce { topic, key } => {
            run_produce(client, &topic, key).await?;
        }
        Commands::Consume {
            group,
            topic,
            max_count,
            max_duration,
            max_bytes,
            offset_reset,
            no_commit,
        } => {
            let max_duration_secs = max_duration
                .as_deref()
                .map(parse_duration_to_secs)
                .transpose()
                .context("Invalid --max-duration")?;
            let options = ConsumerOptions {
                auto_offset_reset: offset_reset,
                auto_commit_enable: Some(false),
                ..Default::default()
            };

            let factory = BatchConsumerFactory::new(client);
            let mut consumer = factory
                .create(
                    &group,
                    &Subscription::topic(topic.as_str()),
                    max_count,
                    max_duration_secs,
                    Some(&options),
                )
                .await
                .with_context(|| format!("Failed to create consumer in group {group}"))?;
            info!("Consuming {} as group {}", topic, group);

            let result = consume_batches(&mut consumer, max_bytes, !no_commit).await;
            if !consumer.is_closed() {
                consumer.close().await.context("Failed to close consumer")?;
            }
            result?;
        }
    }

    Ok(())
}

async fn run_produce(
    client: Arc<dyn RestClient>,
    topic: &str,
    key: Option<String>,
) -> anyhow::Result<()> {
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    let mut records = Vec::new();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let record = ProduceRecord::new(line);
        records.push(match &key {
            Some(key) => record.with_key(key.as_str()),
            None => record,
        });
    }

    let count = records.len();
    Producer::new(client)
        .produce_batch(topic, records)
        .await
        .with_context(|| format!("Failed to produce to {topic}"))?;
    info!("Produced {} records to {}", count, topic);
    Ok(())
}

/// Print and commit batches until interrupted or the consumer fails.
async fn consume_batches(
    consumer: &mut BatchConsumer,
    max_bytes: Option<u64>,
    commit: bool,
) -> anyhow::Result<()> {
    loop {
        let batch = tokio::select! {
            batch = consumer.next_batch(max_bytes) => batch.context("Failed to consume")?,
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, stopping consumer");
                return Ok(());
            }
        };

        for message in &batch {
            println!("{}", message_json(message));
        }

        if commit {
            consumer
                .commit(&batch)
                .await
                .context("Failed to commit batch")?;
        }
    }
}

fn message_json(message: &Message) -> serde_json::Value {
    json!({
        "topic": message.topic,
        "partition": message.partition,
        "offset": message.offset,
        "key": message.key.as_deref().map(String::from_utf8_lossy),
        "value": message.content_lossy(),
        "timestamp": message.created_at().map(|t| t.to_rfc3339()),
    })
}
