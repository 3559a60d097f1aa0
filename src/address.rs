use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("can't decode address: {0}")]
    Malformed(String),
    #[error("unsupported address kind: {0}")]
    Unsupported(&'static str),
}

/// Address in its raw ledger byte form.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(Vec<u8>);

impl Address {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", hex::encode(&self.0))
    }
}

pub trait AddressCodec {
    fn parse(&self, address: &str) -> Result<Address, AddressError>;

    fn render(&self, address: &Address) -> Option<String>;

    fn is_valid(&self, address: &str) -> bool {
        self.parse(address).is_ok()
    }
}

/// Bech32 Shelley payment addresses. Byron and reward addresses can't receive airdrops.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShelleyAddressCodec;

impl AddressCodec for ShelleyAddressCodec {
    fn parse(&self, address: &str) -> Result<Address, AddressError> {
        let parsed = pallas_addresses::Address::from_bech32(address)
            .map_err(|err| AddressError::Malformed(format!("{address}: {err}")))?;
        match parsed {
            pallas_addresses::Address::Shelley(_) => Ok(Address::from_bytes(parsed.to_vec())),
            pallas_addresses::Address::Byron(_) => Err(AddressError::Unsupported("byron")),
            pallas_addresses::Address::Stake(_) => Err(AddressError::Unsupported("stake")),
        }
    }

    fn render(&self, address: &Address) -> Option<String> {
        pallas_addresses::Address::from_bytes(address.as_bytes())
            .ok()?
            .to_bech32()
            .ok()
    }
}
