use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// CIP-20 transaction message label.
pub const AIRDROP_LABEL: u64 = 674;

/// Longest text or byte string a metadatum may hold.
pub const MAX_CHUNK_LEN: usize = 64;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Metadatum {
    Int(i128),
    Bytes(Vec<u8>),
    Text(String),
    List(Vec<Metadatum>),
    Map(Vec<(Metadatum, Metadatum)>),
}

impl Metadatum {
    pub fn text(text: impl Into<String>) -> Self {
        Metadatum::Text(text.into())
    }

    /// Splits `text` into a list of strings of at most 64 bytes each, on char boundaries.
    pub fn text_chunks(text: &str) -> Self {
        let mut chunks = vec![];
        let mut current = String::new();
        for c in text.chars() {
            if current.len() + c.len_utf8() > MAX_CHUNK_LEN {
                chunks.push(Metadatum::Text(std::mem::take(&mut current)));
            }
            current.push(c);
        }
        if !current.is_empty() || chunks.is_empty() {
            chunks.push(Metadatum::Text(current));
        }
        Metadatum::List(chunks)
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Metadatum::Int(int) => {
                let bound = i128::from(u64::MAX);
                if *int > bound || *int < -bound - 1 {
                    return Err(Error::InvalidMetadata(format!("integer out of range: {int}")));
                }
            }
            Metadatum::Bytes(bytes) if bytes.len() > MAX_CHUNK_LEN => {
                return Err(Error::InvalidMetadata(format!(
                    "byte string longer than {MAX_CHUNK_LEN} bytes: {}",
                    bytes.len()
                )));
            }
            Metadatum::Text(text) if text.len() > MAX_CHUNK_LEN => {
                return Err(Error::InvalidMetadata(format!(
                    "text longer than {MAX_CHUNK_LEN} bytes: {text:?}"
                )));
            }
            Metadatum::Bytes(_) | Metadatum::Text(_) => {}
            Metadatum::List(items) => {
                for item in items.iter() {
                    item.validate()?;
                }
            }
            Metadatum::Map(entries) => {
                for (key, value) in entries.iter() {
                    key.validate()?;
                    value.validate()?;
                }
            }
        }
        Ok(())
    }

    /// Converts a JSON payload without a schema: long strings become lists of chunks, objects
    /// become maps with text keys. Floats, booleans and null have no metadata form.
    pub fn from_json(json: &serde_json::Value) -> Result<Self> {
        match json {
            serde_json::Value::Number(number) => number
                .as_i64()
                .map(i128::from)
                .or_else(|| number.as_u64().map(i128::from))
                .map(Metadatum::Int)
                .ok_or_else(|| Error::InvalidMetadata(format!("not an integer: {number}"))),
            serde_json::Value::String(text) if text.len() > MAX_CHUNK_LEN => {
                Ok(Metadatum::text_chunks(text))
            }
            serde_json::Value::String(text) => Ok(Metadatum::Text(text.clone())),
            serde_json::Value::Array(items) => items
                .iter()
                .map(Metadatum::from_json)
                .collect::<Result<Vec<_>>>()
                .map(Metadatum::List),
            serde_json::Value::Object(entries) => entries
                .iter()
                .map(|(key, value)| {
                    if key.len() > MAX_CHUNK_LEN {
                        return Err(Error::InvalidMetadata(format!("key too long: {key:?}")));
                    }
                    Ok((Metadatum::Text(key.clone()), Metadatum::from_json(value)?))
                })
                .collect::<Result<Vec<_>>>()
                .map(Metadatum::Map),
            other => Err(Error::InvalidMetadata(format!(
                "unsupported JSON value: {other}"
            ))),
        }
    }
}

/// Transaction metadata keyed by label. The engine never looks inside the payloads.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Metadata(BTreeMap<u64, Metadatum>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn labeled(label: u64, payload: Metadatum) -> Result<Self> {
        let mut metadata = Self::new();
        metadata.insert(label, payload)?;
        Ok(metadata)
    }

    /// `{674: {"msg": [..]}}`
    pub fn airdrop_message(message: &str) -> Result<Self> {
        Self::labeled(
            AIRDROP_LABEL,
            Metadatum::Map(vec![(
                Metadatum::text("msg"),
                Metadatum::text_chunks(message),
            )]),
        )
    }

    pub fn insert(&mut self, label: u64, payload: Metadatum) -> Result<()> {
        payload.validate()?;
        self.0.insert(label, payload);
        Ok(())
    }

    pub fn get(&self, label: u64) -> Option<&Metadatum> {
        self.0.get(&label)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &Metadatum)> {
        self.0.iter().map(|(label, payload)| (*label, payload))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::metadata::{Metadata, Metadatum, AIRDROP_LABEL, MAX_CHUNK_LEN};

    #[test]
    fn short_message_is_single_chunk() {
        let metadata = Metadata::airdrop_message("BOM Airdrop S1").unwrap();
        assert_eq!(
            metadata.get(AIRDROP_LABEL),
            Some(&Metadatum::Map(vec![(
                Metadatum::text("msg"),
                Metadatum::List(vec![Metadatum::text("BOM Airdrop S1")])
            )]))
        );
    }

    #[test]
    fn long_text_is_chunked_on_char_boundaries() {
        let text = "é".repeat(40); // 80 bytes
        let chunks = match Metadatum::text_chunks(&text) {
            Metadatum::List(chunks) => chunks,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(chunks.len(), 2);
        let mut joined = String::new();
        for chunk in chunks.iter() {
            match chunk {
                Metadatum::Text(part) => {
                    assert!(part.len() <= MAX_CHUNK_LEN);
                    joined.push_str(part);
                }
                other => panic!("unexpected {other:?}"),
            }
        }
        assert_eq!(joined, text);
    }

    #[test]
    fn oversized_text_is_rejected() {
        let result = Metadata::labeled(AIRDROP_LABEL, Metadatum::text("x".repeat(65)));
        assert!(matches!(result, Err(Error::InvalidMetadata(_))));
    }

    #[test]
    fn json_payload_conversion() {
        let json = serde_json::json!({
            "msg": ["BOM Airdrop S1"],
            "recipients": 5,
        });
        let datum = Metadatum::from_json(&json).unwrap();
        assert_eq!(
            datum,
            Metadatum::Map(vec![
                (
                    Metadatum::text("msg"),
                    Metadatum::List(vec![Metadatum::text("BOM Airdrop S1")])
                ),
                (Metadatum::text("recipients"), Metadatum::Int(5)),
            ])
        );
        assert!(Metadatum::from_json(&serde_json::json!(1.5)).is_err());
        assert!(Metadatum::from_json(&serde_json::json!(null)).is_err());
        assert!(Metadatum::from_json(&serde_json::json!({ "ok": true })).is_err());
    }

    #[test]
    fn integer_bounds() {
        assert!(Metadatum::Int(i128::from(u64::MAX)).validate().is_ok());
        assert!(Metadatum::Int(-i128::from(u64::MAX) - 1).validate().is_ok());
        assert!(Metadatum::Int(i128::from(u64::MAX) + 1).validate().is_err());
    }
}
