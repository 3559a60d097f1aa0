use anyhow::anyhow;

use crate::assembler::AssembledTransaction;

/// Per-output summary: address bytes, lovelace, `(policy, name, quantity)` sorted.
type OutputSummary = (Vec<u8>, u64, Vec<(Vec<u8>, Vec<u8>, u64)>);

/// Parses the assembled bytes with cardano-multiplatform-lib and checks that an independent
/// decoder sees the same fee, inputs and outputs as the engine.
pub fn verify_with_reference_decoder(assembled: &AssembledTransaction) -> anyhow::Result<()> {
    let parsed = cardano_multiplatform_lib::Transaction::from_bytes(assembled.bytes.clone())
        .map_err(|err| anyhow!("reference decoder rejected the transaction: {:?}", err))?;
    let body = parsed.body();
    let expected = &assembled.transaction.body;

    let fee = u64::from(body.fee());
    if fee != expected.fee {
        return Err(anyhow!("fee mismatch: reference {}, engine {}", fee, expected.fee));
    }

    let inputs = body.inputs();
    let parsed_inputs: Vec<(String, u64)> = (0..inputs.len())
        .map(|index| {
            let input = inputs.get(index);
            (input.transaction_id().to_hex(), u64::from(input.index()))
        })
        .collect();
    let expected_inputs: Vec<(String, u64)> = expected
        .inputs
        .iter()
        .map(|pointer| (pointer.transaction_id.to_string(), pointer.output_index))
        .collect();
    if parsed_inputs != expected_inputs {
        return Err(anyhow!(
            "input mismatch: reference {:?}, engine {:?}",
            parsed_inputs,
            expected_inputs
        ));
    }

    let outputs = body.outputs();
    if outputs.len() != expected.outputs.len() {
        return Err(anyhow!(
            "output count mismatch: reference {}, engine {}",
            outputs.len(),
            expected.outputs.len()
        ));
    }
    for index in 0..outputs.len() {
        let output = outputs.get(index);
        let amount = output.amount();

        let mut assets = vec![];
        if let Some(multiasset) = amount.multiasset() {
            let policy_ids = multiasset.keys();
            for policy_id_index in 0..policy_ids.len() {
                let policy_id = policy_ids.get(policy_id_index);
                if let Some(assets_by_policy_id) = multiasset.get(&policy_id) {
                    let asset_names = assets_by_policy_id.keys();
                    for asset_name_id in 0..asset_names.len() {
                        let asset_name = asset_names.get(asset_name_id);
                        if let Some(quantity) = assets_by_policy_id.get(&asset_name) {
                            assets.push((
                                policy_id.to_bytes(),
                                asset_name.name(),
                                u64::from(quantity),
                            ));
                        }
                    }
                }
            }
        }
        assets.sort();
        let reference: OutputSummary =
            (output.address().to_bytes(), u64::from(amount.coin()), assets);

        let engine_output = &expected.outputs[index];
        let mut engine_assets: Vec<_> = engine_output
            .value
            .assets
            .iter()
            .map(|(asset, quantity)| {
                (
                    asset.policy_id.as_bytes().to_vec(),
                    asset.asset_name.as_bytes().to_vec(),
                    quantity,
                )
            })
            .collect();
        engine_assets.sort();
        let engine: OutputSummary = (
            engine_output.address.as_bytes().to_vec(),
            engine_output.value.coin,
            engine_assets,
        );

        if reference != engine {
            return Err(anyhow!(
                "output #{} mismatch: reference {:?}, engine {:?}",
                index,
                reference,
                engine
            ));
        }
    }

    tracing::info!(
        "reference decoder agrees: {} inputs, {} outputs, fee {}",
        parsed_inputs.len(),
        outputs.len(),
        fee
    );
    Ok(())
}
