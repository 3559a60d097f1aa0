use itertools::Itertools;

use crate::error::{Error, Result};
use crate::funding::FundingRecord;
use crate::value::ValueError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub selected: Vec<FundingRecord>,
    pub total: u64,
}

/// Largest-first input selection on lovelace only.
///
/// Records are taken in descending lovelace order until the running total reaches the target.
/// Secondary assets ride along with whatever records get picked; they are never a selection
/// criterion and never cause a record to be skipped. Ties keep the order of `available`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LargestFirst;

impl LargestFirst {
    pub fn select(&self, available: &[FundingRecord], target: u64) -> Result<Selection> {
        let mut selected = vec![];
        let mut total: u64 = 0;

        for record in available
            .iter()
            .sorted_by(|a, b| b.value.coin.cmp(&a.value.coin))
        {
            if total >= target {
                break;
            }
            total = total
                .checked_add(record.value.coin)
                .ok_or_else(|| ValueError::Overflow(format!("{} lovelace", record.value.coin)))?;
            selected.push(record.clone());
        }

        if total < target {
            tracing::debug!(
                "selection failed: {} records, available: {}, target: {}",
                available.len(),
                total,
                target
            );
            return Err(Error::InsufficientFunds {
                available: total,
                target,
            });
        }

        tracing::debug!(
            "selected {} of {} records, total: {}, target: {}",
            selected.len(),
            available.len(),
            total,
            target
        );

        Ok(Selection { selected, total })
    }
}
