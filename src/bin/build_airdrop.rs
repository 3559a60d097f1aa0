use std::fs::File;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::prelude::*;

use airdrop_tx_builder::ada::format_ada;
use airdrop_tx_builder::address::{AddressCodec, ShelleyAddressCodec};
use airdrop_tx_builder::airdrop::build_airdrop;
use airdrop_tx_builder::assembler::{FlatFee, TransactionAssembler};
use airdrop_tx_builder::config::Config;
use airdrop_tx_builder::reference::verify_with_reference_decoder;

#[derive(Parser, Debug)]
#[clap(version)]
pub struct Cli {
    /// path to config file
    #[clap(long, value_parser)]
    config_path: PathBuf,
}

#[tokio::main]
async fn main() {
    let result = _main().await;
    result.unwrap();
}

async fn _main() -> anyhow::Result<()> {
    // Start logging setup block
    let fmt_layer = tracing_subscriber::fmt::layer().with_test_writer();

    tracing_subscriber::registry().with(fmt_layer).init();

    let Cli { config_path } = Cli::parse();

    tracing::info!("Config file {:?}", config_path);
    let config = Config::load(&config_path)?;

    let codec = ShelleyAddressCodec;
    let change_address = codec
        .parse(&config.sender_address)
        .with_context(|| format!("Bad sender address {}", config.sender_address))?;
    let request = config.request()?;
    let ledger = config.ledger(&codec)?;

    let assembler = TransactionAssembler::new(
        codec,
        FlatFee(config.fee),
        change_address,
        config.min_output,
    );

    let result = build_airdrop(&ledger, &assembler, &request)
        .await
        .context("Failed to build the airdrop transaction")?;

    if config.verify_with_reference_decoder {
        verify_with_reference_decoder(&result.assembled)?;
    } else {
        tracing::warn!("Reference decoder check is disabled");
    }

    let file = File::create(&config.output_path).with_context(|| {
        format!(
            "Cannot create output file {path}",
            path = config.output_path.display()
        )
    })?;
    serde_json::to_writer_pretty(file, &result.artifact)?;

    let change = result
        .assembled
        .change_output()
        .map(|output| format_ada(output.value.coin))
        .unwrap_or_else(|| "none".to_string());
    tracing::info!(
        "Transaction {} written to {:?}: {} recipients, {} ADA sent, fee {} ADA, change {}, {} bytes",
        result.id,
        config.output_path,
        result.assembled.recipient_outputs().len(),
        format_ada(result.total_sent),
        format_ada(result.assembled.transaction.body.fee),
        change,
        result.assembled.bytes.len(),
    );

    Ok(())
}
