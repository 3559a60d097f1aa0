use crate::address::Address;
use crate::error::{Error, Result};
use crate::transaction::TransactionOutput;
use crate::value::{MultiAsset, Value};

/// Builds the single change output returned to the sender.
///
/// Returns `None` only when there is neither lovelace nor any token left over. Tokens are
/// never dropped: if the selected inputs carried any, a change output carries all of them.
pub fn compute_change(
    change_address: &Address,
    selected_total: u64,
    spent: u64,
    fee: u64,
    assets: MultiAsset,
) -> Result<Option<TransactionOutput>> {
    let change = spent
        .checked_add(fee)
        .and_then(|needed| selected_total.checked_sub(needed))
        .ok_or(Error::NegativeChange {
            selected: selected_total,
            spent,
            fee,
        })?;

    if change == 0 && assets.is_empty() {
        return Ok(None);
    }

    Ok(Some(TransactionOutput::new(
        change_address.clone(),
        Value::new(change, assets),
    )))
}
