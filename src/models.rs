//! Core data structures for message log processing.
//!
//! Defines the parsed record, the input source description, and the
//! statistics returned from a processing run.

use crate::constants::fields;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::path::PathBuf;
use thiserror::Error;

/// Raised when the derived cost cannot be computed
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostError {
    /// A cost component is unset
    #[error("{0} is unset; cannot calculate cost")]
    Missing(&'static str),

    /// The components are individually valid but their sum is out of range
    #[error("transit_cost + route_cost is out of range")]
    Overflow,
}

/// One parsed telephony message event
///
/// String and price fields are plain options filled in by the mapper and
/// checked by validation. The two cost components are private: `cost` is
/// derived from them and memoized, and the setters are the only way to change
/// them so the memo can never outlive the values it was computed from.
#[derive(Debug, Clone, Default)]
pub struct LogRecord {
    pub message_id: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub account_id: Option<String>,
    pub gateway_id: Option<String>,
    pub country: Option<String>,
    pub status: Option<String>,
    pub price: Option<Decimal>,
    transit_cost: Option<Decimal>,
    route_cost: Option<Decimal>,
    cost_memo: Cell<Option<Decimal>>,
}

impl LogRecord {
    /// Create an empty record with every field unset
    pub fn new() -> Self {
        Self::default()
    }

    /// Set both cost components at once
    pub fn with_costs(mut self, transit_cost: Option<Decimal>, route_cost: Option<Decimal>) -> Self {
        self.set_transit_cost(transit_cost);
        self.set_route_cost(route_cost);
        self
    }

    pub fn transit_cost(&self) -> Option<Decimal> {
        self.transit_cost
    }

    pub fn route_cost(&self) -> Option<Decimal> {
        self.route_cost
    }

    /// Replace the transit cost; always drops the memoized cost
    pub fn set_transit_cost(&mut self, transit_cost: Option<Decimal>) {
        self.cost_memo.set(None);
        self.transit_cost = transit_cost;
    }

    /// Replace the route cost; always drops the memoized cost
    pub fn set_route_cost(&mut self, route_cost: Option<Decimal>) {
        self.cost_memo.set(None);
        self.route_cost = route_cost;
    }

    /// Total cost of the message: `transit_cost + route_cost`
    ///
    /// Computed on first successful call and memoized until either component
    /// is reassigned.
    pub fn cost(&self) -> Result<Decimal, CostError> {
        if let Some(cost) = self.cost_memo.get() {
            return Ok(cost);
        }

        let transit_cost = self
            .transit_cost
            .ok_or(CostError::Missing(fields::TRANSIT_COST))?;
        let route_cost = self
            .route_cost
            .ok_or(CostError::Missing(fields::ROUTE_COST))?;

        let cost = transit_cost
            .checked_add(route_cost)
            .ok_or(CostError::Overflow)?;
        self.cost_memo.set(Some(cost));
        Ok(cost)
    }
}

// The memo is a cache, not data; two records are equal on their fields alone.
impl PartialEq for LogRecord {
    fn eq(&self, other: &Self) -> bool {
        self.message_id == other.message_id
            && self.timestamp == other.timestamp
            && self.account_id == other.account_id
            && self.gateway_id == other.gateway_id
            && self.country == other.country
            && self.status == other.status
            && self.price == other.price
            && self.transit_cost == other.transit_cost
            && self.route_cost == other.route_cost
    }
}

/// Where the log lines come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// A single log file
    File(PathBuf),
    /// Every file in a directory with the given extension
    Directory { path: PathBuf, extension: String },
}

impl InputSource {
    pub fn path(&self) -> &PathBuf {
        match self {
            InputSource::File(path) => path,
            InputSource::Directory { path, .. } => path,
        }
    }
}

/// Processing statistics
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ProcessingStats {
    pub files_processed: usize,
    pub lines_read: usize,
    /// Blank and comment lines that were not mapped
    pub lines_ignored: usize,
    pub records_written: usize,
    pub parse_errors: usize,
    pub validation_errors: usize,
    pub output_path: PathBuf,
    pub processing_time_ms: u128,
}

impl ProcessingStats {
    /// Lines rejected and skipped under the skip policy
    pub fn lines_skipped(&self) -> usize {
        self.parse_errors + self.validation_errors
    }

    /// Share of mapped lines that became records, as a percentage
    pub fn success_rate(&self) -> f64 {
        let attempted = self.records_written + self.lines_skipped();
        if attempted == 0 {
            0.0
        } else {
            (self.records_written as f64 / attempted as f64) * 100.0
        }
    }
}
