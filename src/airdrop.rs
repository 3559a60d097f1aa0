use crate::address::AddressCodec;
use crate::artifact::{default_description, TransactionArtifact};
use crate::assembler::{AssembledTransaction, FeeSource, TransactionAssembler};
use crate::error::Result;
use crate::funding::TransactionId;
use crate::ledger::LedgerQuery;
use crate::metadata::Metadata;
use crate::outputs::Recipient;
use crate::value::ValueError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AirdropRequest {
    /// Bech32 address whose records fund the airdrop.
    pub sender_address: String,
    pub recipients: Vec<Recipient>,
    pub metadata: Option<Metadata>,
    pub title: String,
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AirdropResult {
    pub assembled: AssembledTransaction,
    pub artifact: TransactionArtifact,
    pub id: TransactionId,
    pub total_sent: u64,
}

/// Validates the recipients, fetches the sender's records and assembles the transaction.
///
/// Recipients are checked before the ledger is queried so a bad list never costs a round trip.
pub async fn build_airdrop<Ledger, Codec, Fee>(
    ledger: &Ledger,
    assembler: &TransactionAssembler<Codec, Fee>,
    request: &AirdropRequest,
) -> Result<AirdropResult>
where
    Ledger: LedgerQuery,
    Codec: AddressCodec,
    Fee: FeeSource,
{
    assembler.validate(&request.recipients)?;
    let total_sent = request
        .recipients
        .iter()
        .try_fold(0u64, |acc, recipient| acc.checked_add(recipient.amount))
        .ok_or_else(|| ValueError::Overflow("recipient amounts".to_string()))?;

    let available = ledger.get_spendable(&request.sender_address).await?;
    tracing::info!(
        "{} spendable records found for {}",
        available.len(),
        request.sender_address
    );

    let assembled = assembler.assemble(
        &request.recipients,
        &available,
        request.metadata.clone(),
    )?;
    let id = assembled.id()?;

    let description = request.description.clone().unwrap_or_else(|| {
        default_description(&request.title, request.recipients.len(), total_sent)
    });
    let artifact = TransactionArtifact::new(description, &assembled);

    tracing::info!("airdrop transaction {} built: {}", id, artifact.description);

    Ok(AirdropResult {
        assembled,
        artifact,
        id,
        total_sent,
    })
}
