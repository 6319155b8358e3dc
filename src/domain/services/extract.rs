//! Field extraction from free listing text. Every function here fails soft:
//! text that cannot be read yields `None`, never an error.

use lazy_static::lazy_static;
use regex::Regex;
use std::ops::RangeInclusive;

/// Years a listing title may plausibly advertise.
pub const PLAUSIBLE_YEARS: RangeInclusive<i32> = 2010..=2025;

/// Number of leading span texts inspected per result card.
pub const MAX_SPANS: usize = 5;

/// Titles at or below this many characters are treated as labels, not titles.
const MIN_TITLE_CHARS: usize = 10;

lazy_static! {
    static ref YEAR_REGEX: Regex =
        Regex::new(r"\b(20\d{2}|19\d{2})\b").expect("year pattern is valid");
}

/// First 19xx/20xx token of the title, if it falls in [`PLAUSIBLE_YEARS`].
///
/// Only the first candidate is considered. A title such as
/// "2005 frame, 2019 engine" yields `None` rather than 2019.
pub fn extract_year(title: &str) -> Option<i32> {
    let first = YEAR_REGEX.find(title)?;
    let year: i32 = first.as_str().parse().ok()?;
    PLAUSIBLE_YEARS.contains(&year).then_some(year)
}

/// Whole-unit price from text like `"$12,000 OBO"`.
pub fn extract_price(price_text: &str) -> Option<u32> {
    let cleaned = price_text.replace(['$', ','], "");
    let token = cleaned.split_whitespace().next()?;
    token.parse().ok()
}

/// Picks `(title, price_text)` out of the span texts of one result card.
///
/// Until a title is found, any text containing `$` is taken as the price,
/// a later one replacing an earlier one. The first text longer than ten
/// characters that does not start with `$` is the title and ends the scan.
pub fn split_spans(texts: &[String]) -> (String, String) {
    let mut title = None;
    let mut price_text = None;

    for text in texts.iter().take(MAX_SPANS) {
        if text.contains('$') {
            price_text = Some(text);
        } else if text.chars().count() > MIN_TITLE_CHARS && !text.starts_with('$') {
            title = Some(text);
            break;
        }
    }

    let title = title
        .or_else(|| texts.first())
        .cloned()
        .unwrap_or_else(|| "Unknown".to_string());
    let price_text = price_text.cloned().unwrap_or_else(|| "N/A".to_string());
    (title, price_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_extract_year_plain() {
        assert_eq!(extract_year("2023"), Some(2023));
        assert_eq!(extract_year("2021 Honda CBR1000RR clean title"), Some(2021));
    }

    #[test]
    fn test_extract_year_absent() {
        assert_eq!(extract_year("Honda CBR1000RR"), None);
        assert_eq!(extract_year("Low miles, 1000cc"), None);
        assert_eq!(extract_year("ZX10R 3000 miles"), None);
        assert_eq!(extract_year(""), None);
    }

    #[test]
    fn test_extract_year_out_of_range() {
        assert_eq!(extract_year("1875 antique"), None);
        assert_eq!(extract_year("2005 GSXR 1000"), None);
        assert_eq!(extract_year("2026 preorder"), None);
        assert_eq!(extract_year("1999 Hayabusa"), None);
    }

    #[test]
    fn test_extract_year_first_match_wins() {
        assert_eq!(extract_year("2019 R1 with 2022 exhaust"), Some(2019));
        assert_eq!(extract_year("2005 frame, 2019 engine"), None);
    }

    #[test]
    fn test_extract_year_needs_word_boundary() {
        assert_eq!(extract_year("VIN 12021ABC"), None);
        assert_eq!(extract_year("model-2020"), Some(2020));
    }

    #[test]
    fn test_extract_price() {
        assert_eq!(extract_price("$12,000 OBO"), Some(12000));
        assert_eq!(extract_price("$9,500"), Some(9500));
        assert_eq!(extract_price("$750/month"), None);
        assert_eq!(extract_price("$750 /month"), Some(750));
        assert_eq!(extract_price("Trade only"), None);
        assert_eq!(extract_price(""), None);
        assert_eq!(extract_price("N/A"), None);
        assert_eq!(extract_price("$9.500.00"), None);
        assert_eq!(extract_price("$12.50"), None);
    }

    #[test]
    fn test_split_spans_price_then_title() {
        let (title, price) =
            split_spans(&spans(&["$8,000", "2021 Honda CBR1000RR", "Seattle, WA"]));
        assert_eq!(title, "2021 Honda CBR1000RR");
        assert_eq!(price, "$8,000");
    }

    #[test]
    fn test_split_spans_last_price_before_title_wins() {
        let (title, price) =
            split_spans(&spans(&["$9,000", "$8,000", "2021 Honda CBR1000RR", "$1"]));
        assert_eq!(title, "2021 Honda CBR1000RR");
        assert_eq!(price, "$8,000");
    }

    #[test]
    fn test_split_spans_fallbacks() {
        let (title, price) = split_spans(&spans(&["short", "tiny"]));
        assert_eq!(title, "short");
        assert_eq!(price, "N/A");

        let (title, price) = split_spans(&[]);
        assert_eq!(title, "Unknown");
        assert_eq!(price, "N/A");
    }

    #[test]
    fn test_split_spans_only_inspects_first_five() {
        let (title, _) = split_spans(&spans(&["a", "b", "c", "d", "e", "2020 Yamaha YZF-R1"]));
        assert_eq!(title, "a");
    }
}
