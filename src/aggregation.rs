use crate::funding::FundingRecord;
use crate::value::{MultiAsset, ValueError};

/// Sums the secondary assets carried by `selected`, so they can be handed back as change.
pub fn aggregate_assets(selected: &[FundingRecord]) -> Result<MultiAsset, ValueError> {
    selected
        .iter()
        .try_fold(MultiAsset::new(), |acc, record| {
            acc.checked_add(&record.value.assets)
        })
}
