//! Reduction of the raw hospitalisation table to one row per day.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dataset::HospitalisationRow;

/// The source convention for "both sexes combined". Sex-specific rows repeat
/// the same counts split by sex, so only these rows are summed.
pub const SEXE_TOTAL: u8 = 0;

/// Counts for a single calendar day, summed across all départements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCensus {
    pub jour: NaiveDate,
    pub hosp: u64,
    pub rea: u64,
    pub rad: u64,
    pub dc: u64,
}

impl DailyCensus {
    fn empty(jour: NaiveDate) -> Self {
        Self {
            jour,
            hosp: 0,
            rea: 0,
            rad: 0,
            dc: 0,
        }
    }
}

/// Keeps the `sexe == 0` rows, groups them by day and sums the four counts
/// within each group. Days with no `sexe == 0` row are absent from the
/// output; there is no zero-filling. The `BTreeMap` keys keep the output in
/// ascending day order, which the histogram and trend plot rely on.
pub fn daily_census(rows: &[HospitalisationRow]) -> Vec<DailyCensus> {
    let mut days: BTreeMap<NaiveDate, DailyCensus> = BTreeMap::new();
    for row in rows.iter().filter(|row| row.sexe == SEXE_TOTAL) {
        let day = days
            .entry(row.jour)
            .or_insert_with(|| DailyCensus::empty(row.jour));
        day.hosp += row.hosp;
        day.rea += row.rea;
        day.rad += row.rad;
        day.dc += row.dc;
    }
    days.into_values().collect()
}
