use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub type Coin = u64;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    #[error("value overflow while adding {0}")]
    Overflow(String),
    #[error("value underflow while subtracting {0}")]
    Underflow(String),
    #[error("invalid policy id: {0}")]
    InvalidPolicyId(String),
    #[error("invalid asset name: {0}")]
    InvalidAssetName(String),
    #[error("invalid ADA amount: {0:?}")]
    InvalidAmount(String),
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PolicyId([u8; PolicyId::LEN]);

impl PolicyId {
    pub const LEN: usize = 28;

    pub const fn new(bytes: [u8; Self::LEN]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, ValueError> {
        let bytes: [u8; Self::LEN] = bytes
            .try_into()
            .map_err(|_| ValueError::InvalidPolicyId(hex::encode(bytes)))?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for PolicyId {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|_| ValueError::InvalidPolicyId(s.to_owned()))?;
        Self::from_slice(&bytes)
    }
}

impl TryFrom<String> for PolicyId {
    type Error = ValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PolicyId> for String {
    fn from(policy_id: PolicyId) -> Self {
        policy_id.to_string()
    }
}

impl fmt::Display for PolicyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for PolicyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PolicyId({self})")
    }
}

/// Raw asset name bytes.
///
/// Names order by length first and then bytewise, which is the key order canonical CBOR
/// uses for byte string map keys.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct AssetName(Vec<u8>);

impl AssetName {
    pub const MAX_LEN: usize = 32;

    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, ValueError> {
        let bytes = bytes.into();
        if bytes.len() > Self::MAX_LEN {
            return Err(ValueError::InvalidAssetName(hex::encode(&bytes)));
        }
        Ok(Self(bytes))
    }

    pub fn from_hex(s: &str) -> Result<Self, ValueError> {
        let bytes = hex::decode(s).map_err(|_| ValueError::InvalidAssetName(s.to_owned()))?;
        Self::new(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Ord for AssetName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for AssetName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for AssetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

impl fmt::Debug for AssetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match std::str::from_utf8(&self.0) {
            Ok(name) => write!(f, "AssetName({name:?})"),
            Err(_) => write!(f, "AssetName({self})"),
        }
    }
}

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct AssetId {
    pub policy_id: PolicyId,
    pub asset_name: AssetName,
}

impl AssetId {
    pub fn new(policy_id: PolicyId, asset_name: AssetName) -> Self {
        Self {
            policy_id,
            asset_name,
        }
    }

    /// Parses the concatenated `policy_id ++ asset_name` hex form used by ledger indexers.
    pub fn from_unit(unit: &str) -> Result<Self, ValueError> {
        let split = PolicyId::LEN * 2;
        if unit.len() < split || !unit.is_char_boundary(split) {
            return Err(ValueError::InvalidPolicyId(unit.to_owned()));
        }
        let (policy_id, asset_name) = unit.split_at(split);
        Ok(Self::new(policy_id.parse()?, AssetName::from_hex(asset_name)?))
    }

    pub fn to_unit(&self) -> String {
        format!("{}{}", self.policy_id, self.asset_name)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.policy_id, self.asset_name)
    }
}

/// Secondary asset quantities. Zero quantities are never stored.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct MultiAsset(BTreeMap<AssetId, u64>);

impl MultiAsset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, asset: &AssetId) -> u64 {
        self.0.get(asset).copied().unwrap_or_default()
    }

    pub fn insert(&mut self, asset: AssetId, quantity: u64) -> Result<(), ValueError> {
        if quantity == 0 {
            return Ok(());
        }
        let entry = self.0.entry(asset).or_default();
        *entry = entry
            .checked_add(quantity)
            .ok_or_else(|| ValueError::Overflow(format!("{quantity} of an asset")))?;
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AssetId, u64)> {
        self.0.iter().map(|(asset, quantity)| (asset, *quantity))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn policies(&self) -> usize {
        self.0
            .keys()
            .map(|asset| asset.policy_id)
            .collect::<std::collections::BTreeSet<_>>()
            .len()
    }

    pub fn checked_add(&self, other: &MultiAsset) -> Result<MultiAsset, ValueError> {
        let mut result = self.clone();
        for (asset, quantity) in other.iter() {
            result.insert(asset.clone(), quantity)?;
        }
        Ok(result)
    }

    pub fn checked_sub(&self, other: &MultiAsset) -> Result<MultiAsset, ValueError> {
        let mut result = self.clone();
        for (asset, quantity) in other.iter() {
            let remaining = result
                .get(asset)
                .checked_sub(quantity)
                .ok_or_else(|| ValueError::Underflow(format!("{quantity} of {asset}")))?;
            if remaining == 0 {
                result.0.remove(asset);
            } else {
                result.0.insert(asset.clone(), remaining);
            }
        }
        Ok(result)
    }
}

impl<'a> IntoIterator for &'a MultiAsset {
    type Item = (&'a AssetId, &'a u64);
    type IntoIter = std::collections::btree_map::Iter<'a, AssetId, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Lovelace plus secondary assets.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct Value {
    pub coin: Coin,
    pub assets: MultiAsset,
}

impl Value {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn from_coin(coin: Coin) -> Self {
        Self {
            coin,
            assets: MultiAsset::default(),
        }
    }

    pub fn new(coin: Coin, assets: MultiAsset) -> Self {
        Self { coin, assets }
    }

    pub fn is_zero(&self) -> bool {
        self.coin == 0 && self.assets.is_empty()
    }

    pub fn checked_add(&self, other: &Value) -> Result<Value, ValueError> {
        let coin = self
            .coin
            .checked_add(other.coin)
            .ok_or_else(|| ValueError::Overflow(format!("{} lovelace", other.coin)))?;
        Ok(Value {
            coin,
            assets: self.assets.checked_add(&other.assets)?,
        })
    }

    pub fn checked_sub(&self, other: &Value) -> Result<Value, ValueError> {
        let coin = self
            .coin
            .checked_sub(other.coin)
            .ok_or_else(|| ValueError::Underflow(format!("{} lovelace", other.coin)))?;
        Ok(Value {
            coin,
            assets: self.assets.checked_sub(&other.assets)?,
        })
    }

    pub fn sum<'a>(values: impl IntoIterator<Item = &'a Value>) -> Result<Value, ValueError> {
        values
            .into_iter()
            .try_fold(Value::zero(), |acc, value| acc.checked_add(value))
    }
}

// component-wise: None when some component is larger and another is smaller
impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let mut ordering = self.coin.cmp(&other.coin);
        let assets = self.assets.0.keys().chain(other.assets.0.keys());
        for asset in assets {
            let next = self.assets.get(asset).cmp(&other.assets.get(asset));
            ordering = match (ordering, next) {
                (current, Ordering::Equal) => current,
                (Ordering::Equal, next) => next,
                (current, next) if current == next => current,
                _ => return None,
            };
        }
        Some(ordering)
    }
}
