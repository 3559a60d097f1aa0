use std::collections::HashMap;
use std::fmt;
use std::future::Future;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::address::{Address, AddressCodec, ShelleyAddressCodec};
use crate::error::LedgerError;
use crate::funding::{FundingRecord, TransactionId, UtxoPointer};
use crate::value::{AssetId, MultiAsset, Value};

const LOVELACE_UNIT: &str = "lovelace";

/// Source of the spendable records of an address.
pub trait LedgerQuery {
    fn get_spendable(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<Vec<FundingRecord>, LedgerError>> + Send;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtxoAmount {
    pub unit: String,
    pub quantity: String,
}

/// UTxO as reported by Blockfrost's `addresses/{address}/utxos`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtxoEntry {
    pub tx_hash: TransactionId,
    pub output_index: u64,
    pub amount: Vec<UtxoAmount>,
}

impl UtxoEntry {
    pub fn into_record(self, owner: Address) -> Result<FundingRecord, LedgerError> {
        let pointer = UtxoPointer {
            transaction_id: self.tx_hash,
            output_index: self.output_index,
        };
        let invalid = |what: String| LedgerError::InvalidRecord(format!("{pointer}: {what}"));

        let mut coin = 0u64;
        let mut assets = MultiAsset::new();
        for amount in self.amount.into_iter() {
            let quantity: u64 = amount
                .quantity
                .parse()
                .map_err(|_| invalid(format!("bad quantity {:?}", amount.quantity)))?;
            if amount.unit == LOVELACE_UNIT {
                coin = coin
                    .checked_add(quantity)
                    .ok_or_else(|| invalid("lovelace overflow".to_string()))?;
            } else {
                let asset =
                    AssetId::from_unit(&amount.unit).map_err(|err| invalid(err.to_string()))?;
                assets
                    .insert(asset, quantity)
                    .map_err(|err| invalid(err.to_string()))?;
            }
        }

        Ok(FundingRecord::new(pointer, owner, Value::new(coin, assets)))
    }
}

pub fn entries_to_records(
    entries: Vec<UtxoEntry>,
    owner: &Address,
) -> Result<Vec<FundingRecord>, LedgerError> {
    entries
        .into_iter()
        .map(|entry| entry.into_record(owner.clone()))
        .collect()
}

/// A record set known up front, keyed by bech32 address.
#[derive(Clone, Debug, Default)]
pub struct FixedLedger {
    records: HashMap<String, Vec<FundingRecord>>,
}

impl FixedLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(mut self, address: impl Into<String>, records: Vec<FundingRecord>) -> Self {
        self.records.entry(address.into()).or_default().extend(records);
        self
    }
}

impl LedgerQuery for FixedLedger {
    async fn get_spendable(&self, address: &str) -> Result<Vec<FundingRecord>, LedgerError> {
        self.records
            .get(address)
            .cloned()
            .ok_or_else(|| LedgerError::AddressNotFound(address.to_owned()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockfrostConfig {
    pub endpoint: String,
    pub key: String,
    pub retries: u64,
}

pub struct BlockfrostLedger<Codec: AddressCodec = ShelleyAddressCodec> {
    client: Client,
    endpoint: String,
    retries: u64,
    codec: Codec,
}

impl BlockfrostLedger<ShelleyAddressCodec> {
    pub fn new(config: &BlockfrostConfig) -> anyhow::Result<Self> {
        Self::with_codec(config, ShelleyAddressCodec)
    }
}

impl<Codec: AddressCodec> BlockfrostLedger<Codec> {
    pub fn with_codec(config: &BlockfrostConfig, codec: Codec) -> anyhow::Result<Self> {
        use anyhow::Context;

        let mut headers = HeaderMap::new();
        headers.append(
            "project_id",
            HeaderValue::from_str(&config.key)
                .context("The project_id (authentication key) is not in a valid format")?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP Client")?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            retries: config.retries.max(1),
            codec,
        })
    }

    async fn get_page(&self, address: &str, page: u64) -> Result<Vec<UtxoEntry>, LedgerError> {
        let response = self
            .client
            .get(url(
                &self.endpoint,
                format!("api/v0/addresses/{address}/utxos?page={page}"),
            ))
            .send()
            .await
            .map_err(|err| LedgerError::ServiceUnavailable(err.to_string()))?;

        match response.status() {
            StatusCode::OK => response
                .json()
                .await
                .map_err(|err| LedgerError::ServiceUnavailable(err.to_string())),
            StatusCode::NOT_FOUND => Err(LedgerError::AddressNotFound(address.to_owned())),
            code => Err(LedgerError::ServiceUnavailable(format!(
                "unexpected status {code} for page {page}"
            ))),
        }
    }

    async fn get_page_with_retries(
        &self,
        address: &str,
        page: u64,
    ) -> Result<Vec<UtxoEntry>, LedgerError> {
        let mut retries = self.retries;
        loop {
            match self.get_page(address, page).await {
                Ok(entries) => return Ok(entries),
                Err(LedgerError::ServiceUnavailable(err)) if retries > 1 => {
                    retries -= 1;
                    tracing::warn!(
                        "failed to fetch utxos page {}: {}, retries left: {}",
                        page,
                        err,
                        retries
                    );
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl<Codec: AddressCodec + Sync> LedgerQuery for BlockfrostLedger<Codec> {
    async fn get_spendable(&self, address: &str) -> Result<Vec<FundingRecord>, LedgerError> {
        let owner = self
            .codec
            .parse(address)
            .map_err(|_| LedgerError::AddressNotFound(address.to_owned()))?;

        let mut entries = vec![];
        let mut page = 1;
        loop {
            let mut page_entries = self.get_page_with_retries(address, page).await?;
            if page_entries.is_empty() {
                break;
            }
            entries.append(&mut page_entries);
            page += 1;
        }

        tracing::info!("Fetched {} utxos in {} pages", entries.len(), page - 1);

        entries_to_records(entries, &owner)
    }
}

fn url(endpoint: &str, api: impl fmt::Display) -> String {
    format!("{endpoint}/{api}")
}
