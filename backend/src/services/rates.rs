//! Monthly rate resolution for tea harvests
//!
//! Tea handed to a collector is often weighed before its sale price is
//! known; the collector announces one rate per calendar month after the
//! fact. Resolution is a pure read-time transform: every consumer prices
//! pending harvests through the rate table, and nothing here writes back
//! to the store. Upserting a rate therefore reprices past harvests of
//! that month on the next read, including months whose rate was replaced.

use std::collections::HashMap;

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use shared::models::{CollectorRate, Harvest};

/// Rate lookup keyed by (collector, month, year)
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    rates: HashMap<(Uuid, u32, i32), Decimal>,
    duplicate_warnings: Vec<String>,
}

impl RateTable {
    /// Build a table from rate rows. The store's upsert key makes
    /// (collector, month, year) unique by construction; if duplicates
    /// appear anyway the first row wins and the duplicate is reported as
    /// a data-integrity warning.
    pub fn from_rows(rows: &[CollectorRate]) -> Self {
        let mut table = RateTable::default();
        for row in rows {
            let key = (row.collector_id, row.month, row.year);
            if table.rates.contains_key(&key) {
                table.duplicate_warnings.push(format!(
                    "Duplicate rate for collector {} in {}/{}",
                    row.collector_id, row.month, row.year
                ));
            } else {
                table.rates.insert(key, row.rate);
            }
        }
        table
    }

    pub fn lookup(&self, collector_id: Uuid, month: u32, year: i32) -> Option<Decimal> {
        self.rates.get(&(collector_id, month, year)).copied()
    }

    /// Data-integrity warnings collected while building the table
    pub fn duplicate_warnings(&self) -> &[String] {
        &self.duplicate_warnings
    }
}

/// A harvest after rate resolution. Same shape as the stored harvest,
/// with rate and total filled in when a matching monthly rate exists.
#[derive(Debug, Clone)]
pub struct ResolvedHarvest {
    pub harvest: Harvest,
    /// True when the harvest awaits a rate that is not in the table yet;
    /// its total stays as stored (usually 0)
    pub rate_pending: bool,
}

/// Resolve one harvest against the rate table.
///
/// Already-priced harvests (non-null, non-zero rate) and cash sales pass
/// through untouched, so resolving twice is a no-op.
pub fn resolve(harvest: Harvest, rates: &RateTable) -> ResolvedHarvest {
    if !harvest.needs_rate() {
        return ResolvedHarvest {
            harvest,
            rate_pending: false,
        };
    }

    let month = harvest.date.month();
    let year = harvest.date.year();
    let monthly_rate = harvest
        .collector_id
        .and_then(|collector_id| rates.lookup(collector_id, month, year));

    match monthly_rate {
        Some(rate) => {
            let mut harvest = harvest;
            harvest.rate = Some(rate);
            harvest.total_amount = harvest.weight_kg * rate;
            ResolvedHarvest {
                harvest,
                rate_pending: false,
            }
        }
        None => ResolvedHarvest {
            harvest,
            rate_pending: true,
        },
    }
}

/// Resolve a batch of harvests
pub fn resolve_all(harvests: Vec<Harvest>, rates: &RateTable) -> Vec<ResolvedHarvest> {
    harvests
        .into_iter()
        .map(|harvest| resolve(harvest, rates))
        .collect()
}

/// An advisory that a collector's rate for a past month is still unset
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PendingRateAdvisory {
    pub collector_id: Uuid,
    pub month: u32,
    pub year: i32,
    /// Harvests waiting on this rate
    pub harvest_count: usize,
}

/// Scan the calendar month before `as_of` for tea harvests whose
/// collector has no rate entry for that month. Advisories prompt the
/// user to set rates; they are never errors.
pub fn pending_rate_advisories(
    harvests: &[Harvest],
    rates: &RateTable,
    as_of: NaiveDate,
) -> Vec<PendingRateAdvisory> {
    let prior = as_of - Months::new(1);
    let (month, year) = (prior.month(), prior.year());

    let mut counts: HashMap<Uuid, usize> = HashMap::new();
    for harvest in harvests {
        if harvest.date.month() != month || harvest.date.year() != year {
            continue;
        }
        let Some(collector_id) = harvest.collector_id else {
            continue;
        };
        if harvest.crop_type != shared::models::CropType::Tea {
            continue;
        }
        if rates.lookup(collector_id, month, year).is_none() {
            *counts.entry(collector_id).or_default() += 1;
        }
    }

    let mut advisories: Vec<PendingRateAdvisory> = counts
        .into_iter()
        .map(|(collector_id, harvest_count)| PendingRateAdvisory {
            collector_id,
            month,
            year,
            harvest_count,
        })
        .collect();
    advisories.sort_by_key(|a| a.collector_id);
    advisories
}
