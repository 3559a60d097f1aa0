use serde::{Deserialize, Serialize};

use crate::ada::format_ada;
use crate::assembler::AssembledTransaction;

/// Envelope type wallets and `cardano-cli` expect for a full transaction.
pub const FORMAT_TAG: &str = "Tx ConwayEra";

/// The text envelope written next to the transaction, ready for a wallet to sign.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionArtifact {
    #[serde(rename = "type")]
    pub format: String,
    pub description: String,
    #[serde(rename = "cborHex")]
    pub cbor_hex: String,
}

impl TransactionArtifact {
    pub fn new(description: impl Into<String>, assembled: &AssembledTransaction) -> Self {
        Self {
            format: FORMAT_TAG.to_string(),
            description: description.into(),
            cbor_hex: assembled.to_hex(),
        }
    }
}

/// `"<title> - <n> Recipients (<total> ADA)"`
pub fn default_description(title: &str, recipients: usize, total_lovelace: u64) -> String {
    format!(
        "{title} - {recipients} Recipients ({} ADA)",
        format_ada(total_lovelace)
    )
}
