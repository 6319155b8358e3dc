use crate::utils::format::dollars;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Text fragments describing one marketplace item, before field extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawListingText {
    pub title: String,
    pub price_text: String,
    pub link: String,
}

/// Why a listing could not be valued against the reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NoReferenceReason {
    UnknownModel { model: String },
    UnknownYear { model: String, year: i32 },
    InsufficientData { year_missing: bool, price_missing: bool },
}

impl fmt::Display for NoReferenceReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownModel { model } => write!(f, "Model {} not in reference table", model),
            Self::UnknownYear { year, .. } => write!(f, "Year {} not in reference table", year),
            Self::InsufficientData {
                year_missing,
                price_missing,
            } => {
                let missing = match (year_missing, price_missing) {
                    (true, true) => "year and price unknown",
                    (true, false) => "year unknown",
                    (false, true) => "price unknown",
                    (false, false) => "no data missing",
                };
                write!(f, "Insufficient data: {}", missing)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum DealVerdict {
    GoodDeal { savings: u32, reference_price: u32 },
    /// `overage` is measured against the tolerance ceiling, not the reference price.
    Overpriced { overage: f64, reference_price: u32 },
    NoReference { reason: NoReferenceReason },
}

impl DealVerdict {
    pub fn is_good_deal(&self) -> bool {
        matches!(self, Self::GoodDeal { .. })
    }

    pub fn reference_price(&self) -> Option<u32> {
        match self {
            Self::GoodDeal {
                reference_price, ..
            }
            | Self::Overpriced {
                reference_price, ..
            } => Some(*reference_price),
            Self::NoReference { .. } => None,
        }
    }

    /// Short explanation intended for direct display.
    pub fn explanation(&self) -> String {
        match self {
            Self::GoodDeal {
                savings,
                reference_price,
            } => format!(
                "Good deal! {} below reference ({})",
                dollars(i64::from(*savings)),
                dollars(i64::from(*reference_price))
            ),
            Self::Overpriced {
                overage,
                reference_price,
            } => format!(
                "Overpriced by {} (Ref: {})",
                dollars(overage.round_ties_even() as i64),
                dollars(i64::from(*reference_price))
            ),
            Self::NoReference { reason } => reason.to_string(),
        }
    }
}

/// One accepted listing. Built once by the classifier and never changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub model: String,
    pub year: Option<i32>,
    pub title: String,
    pub asking_price: String,
    pub asking_price_value: Option<u32>,
    pub reference_price: Option<u32>,
    pub is_good_deal: bool,
    pub deal_analysis: String,
    pub verdict: DealVerdict,
    pub link: String,
    pub scraped_at: DateTime<Utc>,
}

/// Why a listing was left out of the results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    YearOutOfRange { year: i32, min_year: i32, max_year: i32 },
    PriceAboveLimit { price: u32, max_price: u32 },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::YearOutOfRange {
                year,
                min_year,
                max_year,
            } => write!(f, "year {} outside {}-{}", year, min_year, max_year),
            Self::PriceAboveLimit { price, max_price } => write!(
                f,
                "price {} above limit {}",
                dollars(i64::from(*price)),
                dollars(i64::from(*max_price))
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Accepted(ListingRecord),
    Skipped(SkipReason),
}

/// Counters for one aggregation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub examined: usize,
    pub accepted: usize,
    pub skipped: usize,
    pub failed: usize,
    pub good_deals: usize,
}

/// Accepted records in processing order. Good deals are held as membership
/// (indices into `records`), never as copies.
#[derive(Debug, Clone, Default)]
pub struct ScanResults {
    records: Vec<ListingRecord>,
    good_deal_indices: Vec<usize>,
    pub stats: ScanStats,
}

impl ScanResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, record: ListingRecord) {
        if record.verdict.is_good_deal() {
            self.good_deal_indices.push(self.records.len());
            self.stats.good_deals += 1;
        }
        self.records.push(record);
        self.stats.accepted += 1;
    }

    pub fn records(&self) -> &[ListingRecord] {
        &self.records
    }

    pub fn good_deals(&self) -> impl Iterator<Item = &ListingRecord> + '_ {
        self.good_deal_indices.iter().map(|&i| &self.records[i])
    }

    pub fn good_deal_count(&self) -> usize {
        self.good_deal_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
