use crate::domain::model::{
    Classification, DealVerdict, ListingRecord, NoReferenceReason, RawListingText, SkipReason,
};
use crate::domain::reference::ReferenceTable;
use crate::domain::services::evaluate::evaluate;
use crate::domain::services::extract::{extract_price, extract_year};
use crate::domain::FilterConfig;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};

/// Turns one raw listing into a record or a skip, for a searched model.
#[derive(Debug, Clone, Copy)]
pub struct ListingClassifier<'a> {
    table: &'a ReferenceTable,
    filters: &'a FilterConfig,
}

impl<'a> ListingClassifier<'a> {
    pub fn new(table: &'a ReferenceTable, filters: &'a FilterConfig) -> Self {
        Self { table, filters }
    }

    /// Filters run only on values that were extracted: a listing with no
    /// readable year or price passes the corresponding filter and is kept
    /// with an insufficient-data verdict.
    pub fn classify(
        &self,
        model: &str,
        raw: &RawListingText,
        scraped_at: DateTime<Utc>,
    ) -> Result<Classification> {
        let year = extract_year(&raw.title);
        let price = extract_price(&raw.price_text);

        if let Some(year) = year {
            if year < self.filters.min_year || year > self.filters.max_year {
                return Ok(Classification::Skipped(SkipReason::YearOutOfRange {
                    year,
                    min_year: self.filters.min_year,
                    max_year: self.filters.max_year,
                }));
            }
        }

        if let Some(price) = price {
            if price > self.filters.max_price {
                return Ok(Classification::Skipped(SkipReason::PriceAboveLimit {
                    price,
                    max_price: self.filters.max_price,
                }));
            }
        }

        let verdict = match (year, price) {
            (Some(year), Some(price)) => {
                evaluate(self.table, model, year, price, self.filters.price_tolerance)?
            }
            _ => DealVerdict::NoReference {
                reason: NoReferenceReason::InsufficientData {
                    year_missing: year.is_none(),
                    price_missing: price.is_none(),
                },
            },
        };

        Ok(Classification::Accepted(ListingRecord {
            model: model.to_string(),
            year,
            title: raw.title.clone(),
            asking_price: raw.price_text.clone(),
            asking_price_value: price,
            reference_price: verdict.reference_price(),
            is_good_deal: verdict.is_good_deal(),
            deal_analysis: verdict.explanation(),
            verdict,
            link: raw.link.clone(),
            scraped_at,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn raw(title: &str, price: &str) -> RawListingText {
        RawListingText {
            title: title.to_string(),
            price_text: price.to_string(),
            link: "https://www.facebook.com/marketplace/item/1/".to_string(),
        }
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn accepted(classification: Classification) -> ListingRecord {
        match classification {
            Classification::Accepted(record) => record,
            Classification::Skipped(reason) => panic!("unexpected skip: {}", reason),
        }
    }

    #[test]
    fn test_good_deal_record() {
        let table = ReferenceTable::builtin();
        let filters = FilterConfig::default();
        let classifier = ListingClassifier::new(&table, &filters);

        let record = accepted(
            classifier
                .classify("Honda CBR1000rr", &raw("2021 Honda CBR1000RR", "$8,000"), at())
                .unwrap(),
        );
        assert_eq!(record.year, Some(2021));
        assert_eq!(record.asking_price, "$8,000");
        assert_eq!(record.asking_price_value, Some(8000));
        assert_eq!(record.reference_price, Some(11030));
        assert!(record.is_good_deal);
        assert_eq!(record.deal_analysis, "Good deal! $3,030 below reference ($11,030)");
        assert_eq!(record.scraped_at, at());
    }

    #[test]
    fn test_year_outside_filter_is_skipped() {
        let table = ReferenceTable::builtin();
        let filters = FilterConfig {
            min_year: 2020,
            max_year: 2024,
            ..FilterConfig::default()
        };
        let classifier = ListingClassifier::new(&table, &filters);

        let result = classifier
            .classify("Honda CBR1000rr", &raw("2018 Honda CBR1000RR", "$5,000"), at())
            .unwrap();
        assert_eq!(
            result,
            Classification::Skipped(SkipReason::YearOutOfRange {
                year: 2018,
                min_year: 2020,
                max_year: 2024,
            })
        );
    }

    #[test]
    fn test_price_above_limit_is_skipped() {
        let table = ReferenceTable::builtin();
        let filters = FilterConfig {
            max_price: 12000,
            ..FilterConfig::default()
        };
        let classifier = ListingClassifier::new(&table, &filters);

        let result = classifier
            .classify("BMW S1000rr", &raw("2022 BMW S1000RR", "$14,500 firm"), at())
            .unwrap();
        assert!(matches!(
            result,
            Classification::Skipped(SkipReason::PriceAboveLimit { price: 14500, .. })
        ));
    }

    #[test]
    fn test_price_at_limit_is_kept() {
        let table = ReferenceTable::builtin();
        let filters = FilterConfig {
            max_price: 12000,
            ..FilterConfig::default()
        };
        let classifier = ListingClassifier::new(&table, &filters);

        let record = accepted(
            classifier
                .classify("BMW S1000rr", &raw("2022 BMW S1000RR", "$12,000"), at())
                .unwrap(),
        );
        assert_eq!(record.asking_price_value, Some(12000));
    }

    #[test]
    fn test_missing_fields_are_kept_without_verdict() {
        let table = ReferenceTable::builtin();
        let filters = FilterConfig::default();
        let classifier = ListingClassifier::new(&table, &filters);

        let record = accepted(
            classifier
                .classify("Honda CBR1000rr", &raw("Honda CBR1000RR", "Trade only"), at())
                .unwrap(),
        );
        assert_eq!(record.year, None);
        assert_eq!(record.asking_price_value, None);
        assert_eq!(record.reference_price, None);
        assert!(!record.is_good_deal);
        assert_eq!(
            record.verdict,
            DealVerdict::NoReference {
                reason: NoReferenceReason::InsufficientData {
                    year_missing: true,
                    price_missing: true,
                }
            }
        );
        assert_eq!(record.deal_analysis, "Insufficient data: year and price unknown");
    }

    #[test]
    fn test_year_only_listing_still_filtered_by_year() {
        let table = ReferenceTable::builtin();
        let filters = FilterConfig::default();
        let classifier = ListingClassifier::new(&table, &filters);

        let result = classifier
            .classify("Honda CBR1000rr", &raw("2012 Honda CBR1000RR", "Make an offer"), at())
            .unwrap();
        assert!(matches!(result, Classification::Skipped(SkipReason::YearOutOfRange { .. })));
    }

    #[test]
    fn test_classification_is_idempotent() {
        let table = ReferenceTable::builtin();
        let filters = FilterConfig::default();
        let classifier = ListingClassifier::new(&table, &filters);
        let listing = raw("2023 Kawasaki Ninja ZX6R", "$9,000 OBO");

        let first = classifier.classify("Kawasaki Ninja ZX6r", &listing, at()).unwrap();
        let second = classifier.classify("Kawasaki Ninja ZX6r", &listing, at()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_tolerance_surfaces_as_error() {
        let table = ReferenceTable::builtin();
        let filters = FilterConfig {
            price_tolerance: 1.5,
            ..FilterConfig::default()
        };
        let classifier = ListingClassifier::new(&table, &filters);

        assert!(classifier
            .classify("Honda CBR1000rr", &raw("2021 Honda CBR1000RR", "$8,000"), at())
            .is_err());
    }
}
