//! Grouping, counting and ranking primitives shared by the catalog and the
//! dashboard summary.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use securecheck_stop_models::StopRecord;

/// Running totals for one group of stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StopTally {
    /// Stops in the group.
    pub stops: u64,
    /// Stops with a search.
    pub searches: u64,
    /// Stops ending in arrest.
    pub arrests: u64,
    /// Drug-related stops.
    pub drug_stops: u64,
    /// Stops with a search, an arrest, or both.
    pub searched_or_arrested: u64,
}

impl StopTally {
    /// Adds one stop to the tally.
    pub const fn add(&mut self, record: &StopRecord) {
        self.stops += 1;
        if record.search_conducted {
            self.searches += 1;
        }
        if record.is_arrested {
            self.arrests += 1;
        }
        if record.drugs_related_stop {
            self.drug_stops += 1;
        }
        if record.search_conducted || record.is_arrested {
            self.searched_or_arrested += 1;
        }
    }

    /// Search rate percentage, rounded to two decimals.
    #[must_use]
    pub fn search_rate(&self) -> f64 {
        rate_percent(self.searches, self.stops)
    }

    /// Arrest rate percentage, rounded to two decimals.
    #[must_use]
    pub fn arrest_rate(&self) -> f64 {
        rate_percent(self.arrests, self.stops)
    }
}

/// `numer / denom` rounded half-up to two decimals, as the store's
/// `ROUND(numeric, 2)` does. Zero when `denom` is zero.
///
/// The rounding happens on integers, so boundaries such as `0.575` are not
/// lost to binary floating point before they are rounded.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn round_ratio(numer: u64, denom: u64) -> f64 {
    if denom == 0 {
        return 0.0;
    }
    let hundredths = (200 * numer + denom) / (2 * denom);
    hundredths as f64 / 100.0
}

/// `100 * part / total` without rounding. Zero when `total` is zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    100.0 * part as f64 / total as f64
}

/// `100 * part / total` rounded to two decimals.
#[must_use]
pub fn rate_percent(part: u64, total: u64) -> f64 {
    round_ratio(100 * part, total)
}

/// Counts records per key. Records whose key is `None` are left out.
pub fn count_by<'a, K: Ord>(
    records: impl IntoIterator<Item = &'a StopRecord>,
    key: impl Fn(&StopRecord) -> Option<K>,
) -> BTreeMap<K, u64> {
    let mut counts = BTreeMap::new();
    for record in records {
        if let Some(k) = key(record) {
            *counts.entry(k).or_insert(0) += 1;
        }
    }
    counts
}

/// Tallies records per key. Records whose key is `None` are left out.
pub fn tally_by<'a, K: Ord>(
    records: impl IntoIterator<Item = &'a StopRecord>,
    key: impl Fn(&StopRecord) -> Option<K>,
) -> BTreeMap<K, StopTally> {
    let mut tallies: BTreeMap<K, StopTally> = BTreeMap::new();
    for record in records {
        if let Some(k) = key(record) {
            tallies.entry(k).or_default().add(record);
        }
    }
    tallies
}

/// Orders counts descending. Equal counts keep their incoming order.
#[must_use]
pub fn by_count_desc<K>(counts: BTreeMap<K, u64>) -> Vec<(K, u64)> {
    let mut ranked: Vec<(K, u64)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

/// Descending comparison for floats.
#[must_use]
pub fn desc_f64(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

/// SQL `RANK()` over `values` ordered descending: equal values share a rank
/// and the following rank skips ahead by the size of the tie.
#[must_use]
pub fn rank_desc<T: PartialOrd>(values: &[T]) -> Vec<u64> {
    values
        .iter()
        .map(|v| 1 + values.iter().filter(|other| *other > v).count() as u64)
        .collect()
}
