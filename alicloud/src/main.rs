use alicloud::AlicloudProvider;
use clap::Parser;
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Read an Alibaba Cloud listing data source and print its state as JSON
#[derive(Debug, Parser)]
#[command(name = "alicloud-datasource", version)]
struct Cli {
    /// Data source type, e.g. alicloud_vpcs
    data_source: String,

    /// Data source arguments as a JSON object
    #[arg(long, conflicts_with = "config_file")]
    config: Option<String>,

    /// File holding the data source arguments as JSON
    #[arg(long)]
    config_file: Option<PathBuf>,

    /// Log level written to stderr
    #[arg(long, default_value = "info")]
    log_level: tracing::Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .init();

    let config: Value = match (&cli.config, &cli.config_file) {
        (Some(raw), _) => serde_json::from_str(raw)?,
        (None, Some(path)) => serde_json::from_str(&tokio::fs::read_to_string(path).await?)?,
        (None, None) => Value::Null,
    };

    // Provider settings come from ALICLOUD_* variables
    let mut provider = AlicloudProvider::new();
    provider.configure(&Map::new())?;

    let state = provider.read_data_source(&cli.data_source, config).await?;
    println!("{}", serde_json::to_string_pretty(&state.to_json())?);

    Ok(())
}
