use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use serde::Deserialize;

use crate::ada::parse_ada;
use crate::address::AddressCodec;
use crate::airdrop::AirdropRequest;
use crate::assembler::DEFAULT_FEE;
use crate::error::LedgerError;
use crate::funding::FundingRecord;
use crate::ledger::{
    entries_to_records, BlockfrostConfig, BlockfrostLedger, FixedLedger, LedgerQuery, UtxoEntry,
};
use crate::metadata::{Metadata, Metadatum, AIRDROP_LABEL};
use crate::outputs::{Recipient, DEFAULT_MIN_OUTPUT};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub sender_address: String,
    #[serde(default = "default_fee")]
    pub fee: u64,
    #[serde(default = "default_min_output")]
    pub min_output: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Short form of `metadata`: becomes `{674: {"msg": [..]}}`.
    #[serde(default)]
    pub message: Option<String>,
    /// Payload attached under label 674.
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    pub recipients: Vec<RecipientConfig>,
    pub ledger: LedgerConfig,
    pub output_path: PathBuf,
    #[serde(default = "default_verify")]
    pub verify_with_reference_decoder: bool,
}

fn default_fee() -> u64 {
    DEFAULT_FEE
}

fn default_min_output() -> u64 {
    DEFAULT_MIN_OUTPUT
}

fn default_verify() -> bool {
    true
}

fn default_retries() -> u64 {
    3
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecipientConfig {
    pub address: String,
    #[serde(default)]
    pub lovelace: Option<u64>,
    #[serde(default)]
    pub ada: Option<AdaAmount>,
}

/// ADA as written in YAML: `5` or `"1.5"`. Fractional amounts must be quoted, an unquoted
/// `1.5` would already have been rounded to a float by the YAML parser.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AdaAmount {
    Whole(u64),
    Text(String),
}

impl AdaAmount {
    fn to_lovelace(&self) -> crate::error::Result<u64> {
        match self {
            AdaAmount::Whole(ada) => parse_ada(&ada.to_string()),
            AdaAmount::Text(ada) => parse_ada(ada),
        }
    }
}

impl RecipientConfig {
    pub fn to_recipient(&self) -> anyhow::Result<Recipient> {
        let amount = match (self.lovelace, &self.ada) {
            (Some(lovelace), None) => lovelace,
            (None, Some(ada)) => ada
                .to_lovelace()
                .with_context(|| format!("Bad ADA amount for {}", self.address))?,
            _ => {
                return Err(anyhow!(
                    "Recipient {} needs exactly one of `lovelace` or `ada`",
                    self.address
                ))
            }
        };
        Ok(Recipient::new(self.address.clone(), amount))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[serde(deny_unknown_fields)]
pub enum LedgerConfig {
    Blockfrost {
        endpoint: String,
        key: String,
        #[serde(default = "default_retries")]
        retries: u64,
    },
    /// Records given inline, in the shape Blockfrost reports them.
    Fixed { utxos: Vec<UtxoEntry> },
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Cannot read config file {path}", path = path.display()))?;
        let config: Self = serde_yaml::from_reader(file)
            .with_context(|| format!("Cannot parse config file {path}", path = path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.min_output == 0 {
            return Err(anyhow!("`min_output` must be at least 1 lovelace"));
        }
        Ok(())
    }

    pub fn recipients(&self) -> anyhow::Result<Vec<Recipient>> {
        self.recipients
            .iter()
            .map(RecipientConfig::to_recipient)
            .collect()
    }

    pub fn metadata(&self) -> anyhow::Result<Option<Metadata>> {
        match (&self.message, &self.metadata) {
            (None, None) => Ok(None),
            (Some(message), None) => Ok(Some(Metadata::airdrop_message(message)?)),
            (None, Some(payload)) => {
                let payload = Metadatum::from_json(payload).context("Bad metadata payload")?;
                Ok(Some(Metadata::labeled(AIRDROP_LABEL, payload)?))
            }
            (Some(_), Some(_)) => Err(anyhow!("`message` and `metadata` are mutually exclusive")),
        }
    }

    pub fn request(&self) -> anyhow::Result<AirdropRequest> {
        Ok(AirdropRequest {
            sender_address: self.sender_address.clone(),
            recipients: self.recipients()?,
            metadata: self.metadata()?,
            title: self.title.clone(),
            description: self.description.clone(),
        })
    }

    pub fn ledger(&self, codec: &impl AddressCodec) -> anyhow::Result<ConfiguredLedger> {
        match &self.ledger {
            LedgerConfig::Blockfrost {
                endpoint,
                key,
                retries,
            } => Ok(ConfiguredLedger::Blockfrost(BlockfrostLedger::new(
                &BlockfrostConfig {
                    endpoint: endpoint.clone(),
                    key: key.clone(),
                    retries: *retries,
                },
            )?)),
            LedgerConfig::Fixed { utxos } => {
                let owner = codec
                    .parse(&self.sender_address)
                    .with_context(|| format!("Bad sender address {}", self.sender_address))?;
                let records = entries_to_records(utxos.clone(), &owner)?;
                Ok(ConfiguredLedger::Fixed(
                    FixedLedger::new().with_records(self.sender_address.clone(), records),
                ))
            }
        }
    }
}

pub enum ConfiguredLedger {
    Blockfrost(BlockfrostLedger),
    Fixed(FixedLedger),
}

impl LedgerQuery for ConfiguredLedger {
    async fn get_spendable(&self, address: &str) -> Result<Vec<FundingRecord>, LedgerError> {
        match self {
            ConfiguredLedger::Blockfrost(ledger) => ledger.get_spendable(address).await,
            ConfiguredLedger::Fixed(ledger) => ledger.get_spendable(address).await,
        }
    }
}
