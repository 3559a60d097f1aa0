use crate::address::{Address, AddressCodec};
use crate::aggregation::aggregate_assets;
use crate::change::compute_change;
use crate::codec;
use crate::error::{Error, Result};
use crate::funding::{FundingRecord, TransactionId};
use crate::metadata::Metadata;
use crate::outputs::{OutputBuilder, Recipient};
use crate::selection::LargestFirst;
use crate::transaction::{TransactionBody, TransactionOutput, UnsignedTransaction};
use crate::value::ValueError;

pub const DEFAULT_FEE: u64 = 200_000;

pub trait FeeSource {
    fn fee(&self, recipients: &[Recipient]) -> u64;
}

/// The same fee whatever the transaction looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatFee(pub u64);

impl Default for FlatFee {
    fn default() -> Self {
        Self(DEFAULT_FEE)
    }
}

impl FeeSource for FlatFee {
    fn fee(&self, _recipients: &[Recipient]) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledTransaction {
    pub transaction: UnsignedTransaction,
    pub selected: Vec<FundingRecord>,
    pub bytes: Vec<u8>,
    recipients: usize,
}

impl AssembledTransaction {
    pub fn id(&self) -> Result<TransactionId> {
        Ok(self.transaction.id()?)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    pub fn recipient_outputs(&self) -> &[TransactionOutput] {
        &self.transaction.body.outputs[..self.recipients]
    }

    pub fn change_output(&self) -> Option<&TransactionOutput> {
        self.transaction.body.outputs.get(self.recipients)
    }
}

pub struct TransactionAssembler<Codec: AddressCodec, Fee: FeeSource> {
    codec: Codec,
    fee: Fee,
    change_address: Address,
    min_output: u64,
    selector: LargestFirst,
}

impl<Codec: AddressCodec, Fee: FeeSource> TransactionAssembler<Codec, Fee> {
    pub fn new(codec: Codec, fee: Fee, change_address: Address, min_output: u64) -> Self {
        Self {
            codec,
            fee,
            change_address,
            min_output,
            selector: LargestFirst,
        }
    }

    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    pub fn change_address(&self) -> &Address {
        &self.change_address
    }

    pub fn min_output(&self) -> u64 {
        self.min_output
    }

    /// Checks every recipient and builds their outputs without looking at any funds.
    pub fn validate(&self, recipients: &[Recipient]) -> Result<Vec<TransactionOutput>> {
        OutputBuilder::new(&self.codec, self.min_output).build(recipients)
    }

    pub fn assemble(
        &self,
        recipients: &[Recipient],
        available: &[FundingRecord],
        metadata: Option<Metadata>,
    ) -> Result<AssembledTransaction> {
        let mut outputs = self.validate(recipients)?;

        let spent = recipients
            .iter()
            .try_fold(0u64, |acc, recipient| acc.checked_add(recipient.amount))
            .ok_or_else(|| ValueError::Overflow("recipient amounts".to_string()))?;
        let fee = self.fee.fee(recipients);
        let target = spent
            .checked_add(fee)
            .ok_or_else(|| ValueError::Overflow("fee".to_string()))?;

        let selection = self.selector.select(available, target)?;
        let assets = aggregate_assets(&selection.selected)?;
        let change = compute_change(
            &self.change_address,
            selection.total,
            spent,
            fee,
            assets,
        )?;

        if let Some(change) = change {
            if change.value.coin < self.min_output {
                tracing::warn!(
                    "change output carries {} lovelace, below the minimum output of {}",
                    change.value.coin,
                    self.min_output
                );
            }
            outputs.push(change);
        }

        let body = TransactionBody {
            inputs: selection
                .selected
                .iter()
                .map(|record| record.pointer)
                .collect(),
            outputs,
            fee,
            metadata,
        };

        let imbalance = body
            .imbalance(&selection.selected)
            .map_err(|err| Error::ConservationViolated(err.to_string()))?;
        if !imbalance.is_zero() {
            return Err(Error::ConservationViolated(format!(
                "{imbalance:?} left unaccounted"
            )));
        }

        let transaction = UnsignedTransaction::new(body);
        let bytes = codec::encode(&transaction)?;
        let decoded =
            codec::decode(&bytes).map_err(|err| Error::EncodingIntegrity(err.to_string()))?;
        if decoded != transaction {
            return Err(Error::EncodingIntegrity(format!(
                "decoded {decoded:?}, assembled {transaction:?}"
            )));
        }

        tracing::info!(
            "assembled transaction: {} inputs, {} outputs, fee: {}, {} bytes",
            transaction.body.inputs.len(),
            transaction.body.outputs.len(),
            fee,
            bytes.len()
        );

        Ok(AssembledTransaction {
            transaction,
            selected: selection.selected,
            bytes,
            recipients: recipients.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::address::{Address, AddressCodec};
    use crate::assembler::{FlatFee, TransactionAssembler};
    use crate::codec;
    use crate::error::{Error, InvalidOutputReason};
    use crate::funding::FundingRecord;
    use crate::metadata::Metadata;
    use crate::outputs::tests::LabelCodec;
    use crate::outputs::{Recipient, DEFAULT_MIN_OUTPUT};
    use crate::selection::tests::record;
    use crate::value::{AssetId, AssetName, PolicyId, Value};

    fn assembler(fee: u64) -> TransactionAssembler<LabelCodec, FlatFee> {
        TransactionAssembler::new(
            LabelCodec,
            FlatFee(fee),
            Address::from_bytes(b"sender".to_vec()),
            DEFAULT_MIN_OUTPUT,
        )
    }

    fn asset(policy: u8, name: &str) -> AssetId {
        AssetId::new(
            PolicyId::new([policy; PolicyId::LEN]),
            AssetName::new(name.as_bytes()).unwrap(),
        )
    }

    fn with_tokens(tx: u8, coin: u64, tokens: &[(AssetId, u64)]) -> FundingRecord {
        let mut record = record(tx, coin);
        for (asset, quantity) in tokens {
            record.value.assets.insert(asset.clone(), *quantity).unwrap();
        }
        record
    }

    fn assert_conserved(inputs: &[FundingRecord], fee: u64, outputs: &[Value]) {
        let consumed = Value::sum(inputs.iter().map(|record| &record.value)).unwrap();
        let produced = Value::sum(outputs.iter())
            .unwrap()
            .checked_add(&Value::from_coin(fee))
            .unwrap();
        assert_eq!(consumed, produced);
    }

    #[test]
    fn single_record_scenario() {
        let assembled = assembler(200_000)
            .assemble(
                &[Recipient::new("R1", 1_000_000)],
                &[record(1, 5_000_000)],
                None,
            )
            .unwrap();

        assert_eq!(assembled.selected, vec![record(1, 5_000_000)]);
        let outputs = &assembled.transaction.body.outputs;
        assert_eq!(outputs.len(), 2);
        assert_eq!(LabelCodec.render(&outputs[0].address).as_deref(), Some("R1"));
        assert_eq!(outputs[0].value, Value::from_coin(1_000_000));
        assert_eq!(outputs[1].address, Address::from_bytes(b"sender".to_vec()));
        assert_eq!(outputs[1].value, Value::from_coin(3_800_000));
        assert_eq!(assembled.change_output(), Some(&outputs[1]));
        assert_eq!(assembled.recipient_outputs().len(), 1);
        assert_eq!(assembled.transaction.body.fee, 200_000);
        assert!(assembled.transaction.body.metadata.is_none());
    }

    #[test]
    fn largest_first_inputs_in_body() {
        let available = vec![
            record(1, 30_000_000),
            record(2, 100_000_000),
            record(3, 10_000_000),
            record(4, 50_000_000),
        ];
        let assembled = assembler(0)
            .assemble(&[Recipient::new("R1", 120_000_000)], &available, None)
            .unwrap();
        let inputs: Vec<_> = assembled.transaction.body.inputs.clone();
        assert_eq!(inputs, vec![available[1].pointer, available[3].pointer]);
        assert_eq!(
            assembled.change_output().unwrap().value,
            Value::from_coin(30_000_000)
        );
    }

    #[test]
    fn exact_amount_omits_change() {
        let assembled = assembler(200_000)
            .assemble(
                &[Recipient::new("R1", 2_000_000), Recipient::new("R2", 2_800_000)],
                &[record(1, 5_000_000)],
                None,
            )
            .unwrap();
        assert_eq!(assembled.transaction.body.outputs.len(), 2);
        assert_eq!(assembled.change_output(), None);
    }

    #[test]
    fn tokens_are_returned_as_change() {
        let hosky = asset(1, "HOSKY");
        let hero = asset(2, "Hero001");
        let available = vec![
            with_tokens(1, 3_000_000, &[(hosky.clone(), 500), (hero.clone(), 1)]),
            with_tokens(2, 2_000_000, &[(hosky.clone(), 250)]),
            with_tokens(3, 1_000_000, &[(asset(3, "UNUSED"), 7)]),
        ];
        let assembled = assembler(200_000)
            .assemble(&[Recipient::new("R1", 4_000_000)], &available, None)
            .unwrap();

        assert_eq!(assembled.selected.len(), 2);
        let change = assembled.change_output().unwrap();
        assert_eq!(change.value.coin, 800_000);
        assert_eq!(change.value.assets.get(&hosky), 750);
        assert_eq!(change.value.assets.get(&hero), 1);
        assert_eq!(change.value.assets.get(&asset(3, "UNUSED")), 0);

        let outputs: Vec<Value> = assembled
            .transaction
            .body
            .outputs
            .iter()
            .map(|output| output.value.clone())
            .collect();
        assert_conserved(&assembled.selected, 200_000, &outputs);
    }

    #[test]
    fn tokens_survive_when_no_lovelace_is_left() {
        let nft = asset(9, "Hero042");
        let available = vec![with_tokens(1, 1_200_000, &[(nft.clone(), 1)])];
        let assembled = assembler(200_000)
            .assemble(&[Recipient::new("R1", 1_000_000)], &available, None)
            .unwrap();
        let change = assembled.change_output().unwrap();
        assert_eq!(change.value.coin, 0);
        assert_eq!(change.value.assets.get(&nft), 1);
    }

    #[test]
    fn sub_minimum_recipient_fails_before_selection() {
        // no funds at all: only validation can produce this error
        let err = assembler(200_000)
            .assemble(
                &[
                    Recipient::new("R1", 5_000_000),
                    Recipient::new("R2", DEFAULT_MIN_OUTPUT - 1),
                ],
                &[],
                None,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidOutput {
                index: 1,
                reason: InvalidOutputReason::BelowMinimum { .. }
            }
        ));
    }

    #[test]
    fn zero_amount_recipient_never_yields_an_empty_transaction() {
        let assembler = TransactionAssembler::new(
            LabelCodec,
            FlatFee(0),
            Address::from_bytes(b"sender".to_vec()),
            0,
        );
        assert_eq!(
            assembler.assemble(&[Recipient::new("R1", 0)], &[record(1, 5_000_000)], None),
            Err(Error::InvalidOutput {
                index: 0,
                reason: InvalidOutputReason::ZeroAmount
            })
        );
    }

    #[test]
    fn insufficient_funds() {
        let err = assembler(200_000)
            .assemble(
                &[Recipient::new("R1", 10_000_000)],
                &[record(1, 5_000_000), record(2, 4_000_000)],
                None,
            )
            .unwrap_err();
        assert_eq!(
            err,
            Error::InsufficientFunds {
                available: 9_000_000,
                target: 10_200_000
            }
        );
    }

    #[test]
    fn metadata_is_attached_and_round_trips() {
        let metadata = Metadata::airdrop_message("BOM Airdrop S1 - 2 Recipients").unwrap();
        let assembled = assembler(200_000)
            .assemble(
                &[Recipient::new("R1", 1_000_000), Recipient::new("R2", 1_500_000)],
                &[record(1, 10_000_000)],
                Some(metadata.clone()),
            )
            .unwrap();
        assert_eq!(assembled.transaction.body.metadata, Some(metadata));
        assert_eq!(codec::decode(&assembled.bytes).unwrap(), assembled.transaction);
        assert_eq!(assembled.to_hex(), hex::encode(&assembled.bytes));
        assert_eq!(
            assembled.id().unwrap(),
            assembled.transaction.id().unwrap()
        );
    }

    #[test]
    fn empty_recipients_are_rejected() {
        assert_eq!(
            assembler(200_000).assemble(&[], &[record(1, 5_000_000)], None),
            Err(Error::NoRecipients)
        );
    }
}
