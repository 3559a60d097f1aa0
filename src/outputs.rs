use serde::{Deserialize, Serialize};

use crate::address::AddressCodec;
use crate::error::{Error, InvalidOutputReason, Result};
use crate::transaction::TransactionOutput;
use crate::value::Value;

/// Smallest output the ledger accepts for a lovelace-only output to a base address.
pub const DEFAULT_MIN_OUTPUT: u64 = 1_000_000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub address: String,
    pub amount: u64,
}

impl Recipient {
    pub fn new(address: impl Into<String>, amount: u64) -> Self {
        Self {
            address: address.into(),
            amount,
        }
    }
}

pub struct OutputBuilder<'a, Codec: AddressCodec> {
    codec: &'a Codec,
    min_output: u64,
}

impl<'a, Codec: AddressCodec> OutputBuilder<'a, Codec> {
    pub fn new(codec: &'a Codec, min_output: u64) -> Self {
        Self { codec, min_output }
    }

    /// Validates every recipient before building anything, so the first bad entry fails the
    /// whole list.
    pub fn build(&self, recipients: &[Recipient]) -> Result<Vec<TransactionOutput>> {
        if recipients.is_empty() {
            return Err(Error::NoRecipients);
        }

        let mut addresses = Vec::with_capacity(recipients.len());
        for (index, recipient) in recipients.iter().enumerate() {
            if recipient.amount == 0 {
                return Err(Error::InvalidOutput {
                    index,
                    reason: InvalidOutputReason::ZeroAmount,
                });
            }
            if recipient.amount < self.min_output {
                return Err(Error::InvalidOutput {
                    index,
                    reason: InvalidOutputReason::BelowMinimum {
                        amount: recipient.amount,
                        minimum: self.min_output,
                    },
                });
            }
            let address =
                self.codec
                    .parse(&recipient.address)
                    .map_err(|source| Error::InvalidOutput {
                        index,
                        reason: InvalidOutputReason::Address {
                            address: recipient.address.clone(),
                            source,
                        },
                    })?;
            addresses.push(address);
        }

        Ok(addresses
            .into_iter()
            .zip(recipients.iter())
            .map(|(address, recipient)| {
                TransactionOutput::new(address, Value::from_coin(recipient.amount))
            })
            .collect())
    }
}
