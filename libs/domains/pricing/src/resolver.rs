//! Catalog resolver: picks the price row a selection refers to.

use crate::config::MatchStrategy;
use crate::error::{PricingError, PricingResult};
use crate::models::{PriceRow, Selection};

/// The row chosen for a selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution<'a> {
    pub row: &'a PriceRow,
    /// Ids of every equally good candidate, ascending. Empty unless the
    /// choice was ambiguous.
    pub tied: Vec<i64>,
}

impl Resolution<'_> {
    pub fn is_ambiguous(&self) -> bool {
        !self.tied.is_empty()
    }
}

/// Does `row` apply to `selection` under `strategy`?
pub fn row_matches(row: &PriceRow, selection: &Selection, strategy: MatchStrategy) -> bool {
    match strategy {
        MatchStrategy::Exact => row.attrs == *selection,
        MatchStrategy::Subset => row
            .attrs
            .iter()
            .all(|(key, value)| selection.get(key) == Some(value)),
    }
}

/// Find the single row for `selection` among the rows of service `slug`.
///
/// Under `subset` the row with the most attributes wins. Rows tied for the
/// win resolve to the lowest id and are reported in [`Resolution::tied`].
pub fn resolve_row<'a>(
    slug: &str,
    rows: &'a [PriceRow],
    selection: &Selection,
    strategy: MatchStrategy,
) -> PricingResult<Resolution<'a>> {
    let matching: Vec<&PriceRow> = rows
        .iter()
        .filter(|row| row_matches(row, selection, strategy))
        .collect();

    let specificity = matching
        .iter()
        .map(|row| row.attrs.len())
        .max()
        .ok_or_else(|| PricingError::NoPricingRuleFound {
            slug: slug.to_string(),
        })?;

    let mut best: Vec<&PriceRow> = matching
        .into_iter()
        .filter(|row| row.attrs.len() == specificity)
        .collect();
    best.sort_by_key(|row| row.id);

    let tied = if best.len() > 1 {
        best.iter().map(|row| row.id).collect()
    } else {
        Vec::new()
    };

    // `best` is non-empty: `specificity` came from one of its members
    let row = best.first().copied().ok_or_else(|| PricingError::NoPricingRuleFound {
        slug: slug.to_string(),
    })?;

    Ok(Resolution { row, tied })
}
