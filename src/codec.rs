use std::io::Cursor;

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use ciborium::value::{Integer, Value as Cbor};
use itertools::Itertools;

use crate::address::Address;
use crate::funding::{TransactionId, UtxoPointer};
use crate::metadata::{Metadata, Metadatum};
use crate::transaction::{TransactionBody, TransactionOutput, UnsignedTransaction, WitnessSet};
use crate::value::{AssetId, AssetName, MultiAsset, PolicyId, Value};

type Blake2b256 = Blake2b<U32>;

const BODY_INPUTS: u64 = 0;
const BODY_OUTPUTS: u64 = 1;
const BODY_FEE: u64 = 2;
const BODY_AUXILIARY_DATA_HASH: u64 = 7;

const TAG_SET: u64 = 258;
const TAG_ALONZO_AUXILIARY_DATA: u64 = 259;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("can't encode CBOR: {0}")]
    Encode(String),
    #[error("can't read CBOR: {0}")]
    Cbor(String),
    #[error("malformed transaction: {0}")]
    Malformed(String),
    #[error("auxiliary data hash does not match the auxiliary data")]
    AuxiliaryDataHash,
}

fn malformed(what: impl Into<String>) -> CodecError {
    CodecError::Malformed(what.into())
}

pub fn blake2b_256(bytes: &[u8]) -> [u8; 32] {
    let digest = Blake2b256::digest(bytes);
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&digest);
    hash
}

fn to_bytes(value: &Cbor) -> Result<Vec<u8>, CodecError> {
    let mut bytes = vec![];
    ciborium::into_writer(value, &mut bytes).map_err(|err| CodecError::Encode(format!("{err:?}")))?;
    Ok(bytes)
}

/// `[body, {}, true, auxiliary_data / null]`
pub fn encode(tx: &UnsignedTransaction) -> Result<Vec<u8>, CodecError> {
    let auxiliary_data = match &tx.body.metadata {
        Some(metadata) => metadata_to_cbor(metadata)?,
        None => Cbor::Null,
    };
    to_bytes(&Cbor::Array(vec![
        body_to_cbor(&tx.body)?,
        Cbor::Map(vec![]),
        Cbor::Bool(true),
        auxiliary_data,
    ]))
}

pub fn encode_body(body: &TransactionBody) -> Result<Vec<u8>, CodecError> {
    to_bytes(&body_to_cbor(body)?)
}

pub fn auxiliary_data_hash(metadata: &Metadata) -> Result<[u8; 32], CodecError> {
    Ok(blake2b_256(&to_bytes(&metadata_to_cbor(metadata)?)?))
}

fn uint(value: u64) -> Cbor {
    Cbor::Integer(Integer::from(value))
}

fn body_to_cbor(body: &TransactionBody) -> Result<Cbor, CodecError> {
    let inputs = body
        .inputs
        .iter()
        .map(|pointer| {
            Cbor::Array(vec![
                Cbor::Bytes(pointer.transaction_id.as_bytes().to_vec()),
                uint(pointer.output_index),
            ])
        })
        .collect();
    let outputs = body.outputs.iter().map(output_to_cbor).collect();

    let mut entries = vec![
        (uint(BODY_INPUTS), Cbor::Array(inputs)),
        (uint(BODY_OUTPUTS), Cbor::Array(outputs)),
        (uint(BODY_FEE), uint(body.fee)),
    ];
    if let Some(metadata) = &body.metadata {
        entries.push((
            uint(BODY_AUXILIARY_DATA_HASH),
            Cbor::Bytes(auxiliary_data_hash(metadata)?.to_vec()),
        ));
    }
    Ok(Cbor::Map(entries))
}

fn output_to_cbor(output: &TransactionOutput) -> Cbor {
    Cbor::Array(vec![
        Cbor::Bytes(output.address.as_bytes().to_vec()),
        value_to_cbor(&output.value),
    ])
}

fn value_to_cbor(value: &Value) -> Cbor {
    if value.assets.is_empty() {
        return uint(value.coin);
    }

    let grouped = value.assets.iter().group_by(|(asset, _)| asset.policy_id);
    let mut policies = vec![];
    for (policy_id, assets) in &grouped {
        let assets = assets
            .map(|(asset, quantity)| {
                (
                    Cbor::Bytes(asset.asset_name.as_bytes().to_vec()),
                    uint(quantity),
                )
            })
            .collect();
        policies.push((Cbor::Bytes(policy_id.as_bytes().to_vec()), Cbor::Map(assets)));
    }

    Cbor::Array(vec![uint(value.coin), Cbor::Map(policies)])
}

fn metadata_to_cbor(metadata: &Metadata) -> Result<Cbor, CodecError> {
    metadata
        .iter()
        .map(|(label, payload)| Ok((uint(label), metadatum_to_cbor(payload)?)))
        .collect::<Result<Vec<_>, CodecError>>()
        .map(Cbor::Map)
}

fn metadatum_to_cbor(datum: &Metadatum) -> Result<Cbor, CodecError> {
    Ok(match datum {
        Metadatum::Int(int) => Integer::try_from(*int)
            .map(Cbor::Integer)
            .map_err(|_| CodecError::Encode(format!("metadata integer out of range: {int}")))?,
        Metadatum::Bytes(bytes) => Cbor::Bytes(bytes.clone()),
        Metadatum::Text(text) => Cbor::Text(text.clone()),
        Metadatum::List(items) => Cbor::Array(
            items
                .iter()
                .map(metadatum_to_cbor)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Metadatum::Map(entries) => Cbor::Map(
            entries
                .iter()
                .map(|(key, value)| Ok((metadatum_to_cbor(key)?, metadatum_to_cbor(value)?)))
                .collect::<Result<Vec<_>, CodecError>>()?,
        ),
    })
}

pub fn decode(bytes: &[u8]) -> Result<UnsignedTransaction, CodecError> {
    let mut cursor = Cursor::new(bytes);
    let value: Cbor = ciborium::from_reader(&mut cursor)
        .map_err(|err| CodecError::Cbor(format!("{err:?}")))?;
    let consumed = cursor.position();
    if consumed != bytes.len() as u64 {
        return Err(malformed(format!(
            "{} trailing bytes after the transaction",
            bytes.len() as u64 - consumed
        )));
    }

    let items = as_array(&value, "transaction")?;
    let (body, witness_set, auxiliary_data) = match items {
        [body, witness_set, Cbor::Bool(true), auxiliary_data] => {
            (body, witness_set, auxiliary_data)
        }
        [_, _, Cbor::Bool(false), _] => return Err(malformed("transaction is marked invalid")),
        [body, witness_set, auxiliary_data] => (body, witness_set, auxiliary_data),
        _ => return Err(malformed("transaction must have 3 or 4 elements")),
    };

    if !as_map(witness_set, "witness set")?.is_empty() {
        return Err(malformed("witness set is not empty"));
    }

    // the hash covers the auxiliary data exactly as it was written, whichever era's form
    let auxiliary_data = match auxiliary_data {
        Cbor::Null => None,
        other => Some((
            decode_auxiliary_data(other)?,
            blake2b_256(&to_bytes(other)?),
        )),
    };

    let body = decode_body(body, auxiliary_data)?;
    Ok(UnsignedTransaction {
        body,
        witness_set: WitnessSet::default(),
    })
}

fn as_array<'a>(value: &'a Cbor, what: &str) -> Result<&'a [Cbor], CodecError> {
    match value {
        Cbor::Array(items) => Ok(items),
        _ => Err(malformed(format!("{what} must be an array"))),
    }
}

fn as_map<'a>(value: &'a Cbor, what: &str) -> Result<&'a [(Cbor, Cbor)], CodecError> {
    match value {
        Cbor::Map(entries) => Ok(entries),
        _ => Err(malformed(format!("{what} must be a map"))),
    }
}

fn as_bytes<'a>(value: &'a Cbor, what: &str) -> Result<&'a [u8], CodecError> {
    match value {
        Cbor::Bytes(bytes) => Ok(bytes),
        _ => Err(malformed(format!("{what} must be a byte string"))),
    }
}

fn as_uint(value: &Cbor, what: &str) -> Result<u64, CodecError> {
    match value {
        Cbor::Integer(int) => {
            u64::try_from(*int).map_err(|_| malformed(format!("{what} must be a natural number")))
        }
        _ => Err(malformed(format!("{what} must be an integer"))),
    }
}

fn decode_body(
    value: &Cbor,
    auxiliary_data: Option<(Metadata, [u8; 32])>,
) -> Result<TransactionBody, CodecError> {
    let mut inputs = None;
    let mut outputs = None;
    let mut fee = None;
    let mut auxiliary_data_hash_field = None;

    for (key, value) in as_map(value, "transaction body")? {
        let key = as_uint(key, "transaction body key")?;
        let duplicate = match key {
            BODY_INPUTS => inputs.replace(decode_inputs(value)?).is_some(),
            BODY_OUTPUTS => outputs.replace(decode_outputs(value)?).is_some(),
            BODY_FEE => fee.replace(as_uint(value, "fee")?).is_some(),
            BODY_AUXILIARY_DATA_HASH => auxiliary_data_hash_field
                .replace(as_bytes(value, "auxiliary data hash")?.to_vec())
                .is_some(),
            other => {
                return Err(malformed(format!(
                    "unsupported transaction body field {other}"
                )))
            }
        };
        if duplicate {
            return Err(malformed(format!("duplicate transaction body field {key}")));
        }
    }

    let metadata = match (auxiliary_data, auxiliary_data_hash_field) {
        (Some((metadata, expected)), Some(hash)) if hash == expected => Some(metadata),
        (None, None) => None,
        _ => return Err(CodecError::AuxiliaryDataHash),
    };

    Ok(TransactionBody {
        inputs: inputs.ok_or_else(|| malformed("missing inputs"))?,
        outputs: outputs.ok_or_else(|| malformed("missing outputs"))?,
        fee: fee.ok_or_else(|| malformed("missing fee"))?,
        metadata,
    })
}

fn decode_inputs(value: &Cbor) -> Result<Vec<UtxoPointer>, CodecError> {
    let items = match value {
        Cbor::Tag(TAG_SET, inner) => as_array(inner, "inputs")?,
        other => as_array(other, "inputs")?,
    };
    items
        .iter()
        .map(|item| match as_array(item, "input")? {
            [transaction_id, output_index] => Ok(UtxoPointer {
                transaction_id: TransactionId::from_slice(as_bytes(
                    transaction_id,
                    "transaction id",
                )?)
                .map_err(|err| malformed(err.to_string()))?,
                output_index: as_uint(output_index, "output index")?,
            }),
            _ => Err(malformed("input must have 2 elements")),
        })
        .collect()
}

fn decode_outputs(value: &Cbor) -> Result<Vec<TransactionOutput>, CodecError> {
    as_array(value, "outputs")?
        .iter()
        .map(decode_output)
        .collect()
}

fn decode_output(value: &Cbor) -> Result<TransactionOutput, CodecError> {
    let (address, amount) = match value {
        Cbor::Array(items) => match items.as_slice() {
            [address, amount] => (address, amount),
            _ => return Err(malformed("outputs with datums are not supported")),
        },
        Cbor::Map(entries) => {
            let mut address = None;
            let mut amount = None;
            for (key, value) in entries.iter() {
                let duplicate = match as_uint(key, "output key")? {
                    0 => address.replace(value).is_some(),
                    1 => amount.replace(value).is_some(),
                    other => return Err(malformed(format!("unsupported output field {other}"))),
                };
                if duplicate {
                    return Err(malformed("duplicate output field"));
                }
            }
            (
                address.ok_or_else(|| malformed("output without address"))?,
                amount.ok_or_else(|| malformed("output without amount"))?,
            )
        }
        _ => return Err(malformed("output must be an array or a map")),
    };

    Ok(TransactionOutput::new(
        Address::from_bytes(as_bytes(address, "address")?.to_vec()),
        decode_value(amount)?,
    ))
}

fn decode_value(value: &Cbor) -> Result<Value, CodecError> {
    let (coin, policies) = match value {
        Cbor::Integer(_) => return Ok(Value::from_coin(as_uint(value, "coin")?)),
        Cbor::Array(items) => match items.as_slice() {
            [coin, policies] => (as_uint(coin, "coin")?, as_map(policies, "multiasset")?),
            _ => return Err(malformed("value must have 2 elements")),
        },
        _ => return Err(malformed("value must be an integer or an array")),
    };

    let mut assets = MultiAsset::new();
    for (policy_id, names) in policies.iter() {
        let policy_id = PolicyId::from_slice(as_bytes(policy_id, "policy id")?)
            .map_err(|err| malformed(err.to_string()))?;
        for (name, quantity) in as_map(names, "assets")?.iter() {
            let name = AssetName::new(as_bytes(name, "asset name")?.to_vec())
                .map_err(|err| malformed(err.to_string()))?;
            let asset = AssetId::new(policy_id, name);
            let quantity = as_uint(quantity, "asset quantity")?;
            if quantity == 0 {
                return Err(malformed(format!("zero quantity for {asset}")));
            }
            if assets.get(&asset) != 0 {
                return Err(malformed(format!("duplicate asset {asset}")));
            }
            assets
                .insert(asset, quantity)
                .map_err(|err| malformed(err.to_string()))?;
        }
    }

    Ok(Value::new(coin, assets))
}

fn decode_auxiliary_data(value: &Cbor) -> Result<Metadata, CodecError> {
    match value {
        Cbor::Map(_) => decode_metadata(value),
        Cbor::Array(items) => match items.as_slice() {
            [metadata, Cbor::Array(scripts)] if scripts.is_empty() => decode_metadata(metadata),
            _ => Err(malformed("auxiliary scripts are not supported")),
        },
        Cbor::Tag(TAG_ALONZO_AUXILIARY_DATA, inner) => {
            let mut metadata = None;
            for (key, value) in as_map(inner, "auxiliary data")?.iter() {
                match as_uint(key, "auxiliary data key")? {
                    0 => metadata = Some(decode_metadata(value)?),
                    other => {
                        return Err(malformed(format!(
                            "unsupported auxiliary data field {other}"
                        )))
                    }
                }
            }
            Ok(metadata.unwrap_or_default())
        }
        _ => Err(malformed("unsupported auxiliary data format")),
    }
}

fn decode_metadata(value: &Cbor) -> Result<Metadata, CodecError> {
    let mut metadata = Metadata::new();
    for (label, payload) in as_map(value, "metadata")?.iter() {
        let label = as_uint(label, "metadata label")?;
        if metadata.get(label).is_some() {
            return Err(malformed(format!("duplicate metadata label {label}")));
        }
        metadata
            .insert(label, decode_metadatum(payload)?)
            .map_err(|err| malformed(err.to_string()))?;
    }
    Ok(metadata)
}

fn decode_metadatum(value: &Cbor) -> Result<Metadatum, CodecError> {
    match value {
        Cbor::Integer(int) => Ok(Metadatum::Int(i128::from(*int))),
        Cbor::Bytes(bytes) => Ok(Metadatum::Bytes(bytes.clone())),
        Cbor::Text(text) => Ok(Metadatum::Text(text.clone())),
        Cbor::Array(items) => items
            .iter()
            .map(decode_metadatum)
            .collect::<Result<Vec<_>, _>>()
            .map(Metadatum::List),
        Cbor::Map(entries) => entries
            .iter()
            .map(|(key, value)| Ok((decode_metadatum(key)?, decode_metadatum(value)?)))
            .collect::<Result<Vec<_>, CodecError>>()
            .map(Metadatum::Map),
        _ => Err(malformed("unsupported metadatum")),
    }
}

#[cfg(test)]
mod tests {
    use ciborium::value::Value as Cbor;

    use crate::address::Address;
    use crate::codec::{blake2b_256, decode, encode, metadatum_to_cbor, to_bytes, CodecError};
    use crate::funding::{TransactionId, UtxoPointer};
    use crate::metadata::{Metadata, Metadatum};
    use crate::transaction::{TransactionBody, TransactionOutput, UnsignedTransaction};
    use crate::value::{AssetId, AssetName, MultiAsset, PolicyId, Value};

    fn pointer(tx: u8, index: u64) -> UtxoPointer {
        UtxoPointer {
            transaction_id: TransactionId::new([tx; 32]),
            output_index: index,
        }
    }

    fn token_value(coin: u64) -> Value {
        let mut assets = MultiAsset::new();
        for (policy, name, quantity) in [(1u8, "HOSKY", 1_000u64), (1, "A", 1), (9, "Hero001", 1)] {
            assets
                .insert(
                    AssetId::new(
                        PolicyId::new([policy; PolicyId::LEN]),
                        AssetName::new(name.as_bytes()).unwrap(),
                    ),
                    quantity,
                )
                .unwrap();
        }
        Value::new(coin, assets)
    }

    fn sample(metadata: Option<Metadata>) -> UnsignedTransaction {
        UnsignedTransaction::new(TransactionBody {
            inputs: vec![pointer(0xaa, 0), pointer(0xbb, 3)],
            outputs: vec![
                TransactionOutput::new(
                    Address::from_bytes(vec![0x01; 57]),
                    Value::from_coin(1_000_000),
                ),
                TransactionOutput::new(Address::from_bytes(vec![0x61; 29]), token_value(3_800_000)),
            ],
            fee: 200_000,
            metadata,
        })
    }

    #[test]
    fn round_trip_without_metadata() {
        let tx = sample(None);
        let bytes = encode(&tx).unwrap();
        assert_eq!(decode(&bytes).unwrap(), tx);
    }

    #[test]
    fn round_trip_with_metadata() {
        let mut metadata = Metadata::airdrop_message("BOM Airdrop S1 - 2 Recipients").unwrap();
        metadata.insert(1, Metadatum::Int(-5)).unwrap();
        metadata.insert(2, Metadatum::Bytes(vec![1, 2, 3])).unwrap();
        let tx = sample(Some(metadata));
        let bytes = encode(&tx).unwrap();
        assert_eq!(decode(&bytes).unwrap(), tx);
    }

    #[test]
    fn layout_is_four_element_array() {
        let bytes = encode(&sample(None)).unwrap();
        let value: Cbor = ciborium::from_reader(bytes.as_slice()).unwrap();
        let items = value.as_array().unwrap();
        assert_eq!(items.len(), 4);
        assert_eq!(items[1], Cbor::Map(vec![]));
        assert_eq!(items[2], Cbor::Bool(true));
        assert_eq!(items[3], Cbor::Null);
        // body keys 0, 1, 2 and no auxiliary data hash
        assert_eq!(items[0].as_map().unwrap().len(), 3);
    }

    #[test]
    fn fee_is_encoded_as_natural() {
        let bytes = encode(&sample(None)).unwrap();
        let hex = hex::encode(&bytes);
        // 200_000 = 0x1a00030d40
        assert!(hex.contains("021a00030d40"));
        assert!(hex.starts_with("84a3"));
    }

    #[test]
    fn accepts_set_tagged_inputs_and_map_outputs() {
        let tx = sample(None);
        let bytes = encode(&tx).unwrap();
        let value: Cbor = ciborium::from_reader(bytes.as_slice()).unwrap();
        let mut items = value.into_array().unwrap();
        let mut body = items[0].clone().into_map().unwrap();
        for (key, value) in body.iter_mut() {
            if *key == Cbor::Integer(0.into()) {
                *value = Cbor::Tag(258, Box::new(value.clone()));
            }
            if *key == Cbor::Integer(1.into()) {
                let outputs = value
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|output| {
                        let fields = output.as_array().unwrap();
                        Cbor::Map(vec![
                            (Cbor::Integer(0.into()), fields[0].clone()),
                            (Cbor::Integer(1.into()), fields[1].clone()),
                        ])
                    })
                    .collect();
                *value = Cbor::Array(outputs);
            }
        }
        items[0] = Cbor::Map(body);
        let mut reencoded = vec![];
        ciborium::into_writer(&Cbor::Array(items), &mut reencoded).unwrap();

        assert_eq!(decode(&reencoded).unwrap(), tx);
    }

    #[test]
    fn accepts_alonzo_auxiliary_data() {
        let metadata = Metadata::airdrop_message("hello").unwrap();
        let tx = sample(Some(metadata));
        let bytes = encode(&tx).unwrap();
        let value: Cbor = ciborium::from_reader(bytes.as_slice()).unwrap();
        let mut items = value.into_array().unwrap();

        let alonzo = Cbor::Tag(
            259,
            Box::new(Cbor::Map(vec![(Cbor::Integer(0.into()), items[3].clone())])),
        );
        let hash = blake2b_256(&to_bytes(&alonzo).unwrap());
        let mut body = items[0].clone().into_map().unwrap();
        for (key, value) in body.iter_mut() {
            if *key == Cbor::Integer(7.into()) {
                *value = Cbor::Bytes(hash.to_vec());
            }
        }
        items[0] = Cbor::Map(body);
        items[3] = alonzo;
        let reencoded = to_bytes(&Cbor::Array(items)).unwrap();

        assert_eq!(decode(&reencoded).unwrap(), tx);
    }

    #[test]
    fn shelley_hash_does_not_cover_alonzo_form() {
        let metadata = Metadata::airdrop_message("hello").unwrap();
        let bytes = encode(&sample(Some(metadata))).unwrap();
        let value: Cbor = ciborium::from_reader(bytes.as_slice()).unwrap();
        let mut items = value.into_array().unwrap();
        items[3] = Cbor::Tag(
            259,
            Box::new(Cbor::Map(vec![(Cbor::Integer(0.into()), items[3].clone())])),
        );
        let reencoded = to_bytes(&Cbor::Array(items)).unwrap();
        assert_eq!(decode(&reencoded), Err(CodecError::AuxiliaryDataHash));
    }

    #[test]
    fn rejects_tampered_metadata() {
        let tx = sample(Some(Metadata::airdrop_message("original").unwrap()));
        let bytes = encode(&tx).unwrap();
        let value: Cbor = ciborium::from_reader(bytes.as_slice()).unwrap();
        let mut items = value.into_array().unwrap();
        items[3] = Cbor::Map(vec![(
            Cbor::Integer(674.into()),
            Cbor::Text("tampered".to_string()),
        )]);
        let mut reencoded = vec![];
        ciborium::into_writer(&Cbor::Array(items), &mut reencoded).unwrap();
        assert_eq!(decode(&reencoded), Err(CodecError::AuxiliaryDataHash));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(decode(&[0xff, 0x00]), Err(CodecError::Cbor(_))));
        assert!(matches!(decode(&[0x80]), Err(CodecError::Malformed(_))));
        assert!(decode(&[]).is_err());
    }

    #[test]
    fn rejects_trailing_bytes() {
        let mut bytes = encode(&sample(None)).unwrap();
        bytes.push(0x00);
        assert!(matches!(decode(&bytes), Err(CodecError::Malformed(_))));
    }

    #[test]
    fn rejects_repeated_output_fields() {
        let bytes = encode(&sample(None)).unwrap();
        let value: Cbor = ciborium::from_reader(bytes.as_slice()).unwrap();
        let mut items = value.into_array().unwrap();
        let mut body = items[0].clone().into_map().unwrap();
        for (key, value) in body.iter_mut() {
            if *key == Cbor::Integer(1.into()) {
                let fields = value.as_array().unwrap()[0].as_array().unwrap().clone();
                *value = Cbor::Array(vec![Cbor::Map(vec![
                    (Cbor::Integer(0.into()), fields[0].clone()),
                    (Cbor::Integer(1.into()), fields[1].clone()),
                    (Cbor::Integer(1.into()), Cbor::Integer(5.into())),
                ])]);
            }
        }
        items[0] = Cbor::Map(body);
        let reencoded = to_bytes(&Cbor::Array(items)).unwrap();
        assert!(matches!(decode(&reencoded), Err(CodecError::Malformed(_))));
    }

    #[test]
    fn out_of_range_metadata_integer_fails_to_encode() {
        // bypasses Metadata::insert, which would reject the value up front
        let datum = Metadatum::Int(i128::from(u64::MAX) + 1);
        assert!(matches!(
            metadatum_to_cbor(&datum),
            Err(CodecError::Encode(_))
        ));
        assert_eq!(
            metadatum_to_cbor(&Metadatum::Int(-1)).unwrap(),
            Cbor::Integer((-1).into())
        );
    }

    #[test]
    fn rejects_signed_transactions() {
        let bytes = encode(&sample(None)).unwrap();
        let value: Cbor = ciborium::from_reader(bytes.as_slice()).unwrap();
        let mut items = value.into_array().unwrap();
        items[1] = Cbor::Map(vec![(Cbor::Integer(0.into()), Cbor::Array(vec![]))]);
        let mut reencoded = vec![];
        ciborium::into_writer(&Cbor::Array(items), &mut reencoded).unwrap();
        assert!(matches!(decode(&reencoded), Err(CodecError::Malformed(_))));
    }
}
