//! Plain-text summaries printed around a scan.

use crate::domain::model::{ListingRecord, ScanResults};
use crate::domain::FilterConfig;
use crate::utils::format::dollars;

pub const DEFAULT_SELLER_QUESTIONS: [&str; 3] = [
    "Is the bike Clean Title? Has it ever been in an accident?",
    "Has the bike ever been dropped on the ground?",
    "Is the title in your hand or with a bank?",
];

fn rule() -> String {
    "=".repeat(60)
}

pub fn filter_summary(filters: &FilterConfig, models: &[String]) -> String {
    [
        rule(),
        "FILTER SETTINGS:".to_string(),
        format!("  Models: {}", models.join(", ")),
        format!("  Year Range: {}-{}", filters.min_year, filters.max_year),
        format!("  Max Price: {}", dollars(i64::from(filters.max_price))),
        format!(
            "  Price Tolerance: {:.1}% of reference",
            filters.price_tolerance * 100.0
        ),
        format!("  Max Results Per Model: {}", filters.max_results_per_model),
        rule(),
    ]
    .join("\n")
}

pub fn run_summary(results: &ScanResults, seller_questions: &[String]) -> String {
    let mut lines = vec![
        rule(),
        "SUMMARY:".to_string(),
        format!("  Total listings scraped: {}", results.records().len()),
        format!("  Good deals found: {}", results.good_deal_count()),
    ];
    if results.stats.skipped > 0 || results.stats.failed > 0 {
        lines.push(format!(
            "  Filtered out: {}, unreadable: {}",
            results.stats.skipped, results.stats.failed
        ));
    }
    if !seller_questions.is_empty() {
        lines.push(String::new());
        lines.push("  Questions to ask sellers:".to_string());
        for (i, question) in seller_questions.iter().enumerate() {
            lines.push(format!("  {}) {}", i + 1, question));
        }
    }
    lines.push(rule());
    lines.join("\n")
}

fn describe_deal(record: &ListingRecord) -> String {
    let year = record
        .year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "Unknown".to_string());
    let reference = record
        .reference_price
        .map(|p| dollars(i64::from(p)))
        .unwrap_or_else(|| "N/A".to_string());

    [
        format!("  {} ({})", record.model, year),
        format!("  Price: {} (Ref: {})", record.asking_price, reference),
        format!("  {}", record.deal_analysis),
        format!("  Link: {}", record.link),
    ]
    .join("\n")
}

/// Empty when the scan found no good deals.
pub fn good_deals_listing(results: &ScanResults) -> String {
    let deals: Vec<String> = results.good_deals().map(describe_deal).collect();
    if deals.is_empty() {
        return String::new();
    }
    format!("GOOD DEALS TO CONTACT:\n\n{}\n", deals.join("\n\n"))
}
