use crate::address::Address;
use crate::codec::{blake2b_256, encode_body, CodecError};
use crate::funding::{FundingRecord, TransactionId, UtxoPointer};
use crate::metadata::Metadata;
use crate::value::{Value, ValueError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionOutput {
    pub address: Address,
    pub value: Value,
}

impl TransactionOutput {
    pub fn new(address: Address, value: Value) -> Self {
        Self { address, value }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionBody {
    pub inputs: Vec<UtxoPointer>,
    /// Recipient outputs first, then the change output if any.
    pub outputs: Vec<TransactionOutput>,
    pub fee: u64,
    pub metadata: Option<Metadata>,
}

impl TransactionBody {
    pub fn output_total(&self) -> Result<Value, ValueError> {
        Value::sum(self.outputs.iter().map(|output| &output.value))
    }

    /// Input value minus output value minus fee; zero for a balanced body.
    pub fn imbalance(&self, inputs: &[FundingRecord]) -> Result<Value, ValueError> {
        let consumed = Value::sum(inputs.iter().map(|record| &record.value))?;
        let produced = self
            .output_total()?
            .checked_add(&Value::from_coin(self.fee))?;
        consumed.checked_sub(&produced)
    }
}

/// Witness section of a transaction. Unsigned transactions carry an empty one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WitnessSet {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnsignedTransaction {
    pub body: TransactionBody,
    pub witness_set: WitnessSet,
}

impl UnsignedTransaction {
    pub fn new(body: TransactionBody) -> Self {
        Self {
            body,
            witness_set: WitnessSet::default(),
        }
    }

    /// blake2b-256 of the encoded body.
    pub fn id(&self) -> Result<TransactionId, CodecError> {
        Ok(TransactionId::new(blake2b_256(&encode_body(&self.body)?)))
    }
}
