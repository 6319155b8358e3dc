use crate::domain::model::RawListingText;
use crate::domain::services::extract::split_spans;
use crate::utils::error::{Result, ScoutError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// Text captured from a marketplace results page, grouped by searched model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingSnapshot {
    pub captured_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub searches: Vec<ModelSearch>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSearch {
    pub model: String,
    #[serde(default)]
    pub listings: Vec<CapturedListing>,
}

/// One result card as captured. Either the raw span texts, or a title/price
/// pair that was already picked out by the capturing tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CapturedListing {
    #[serde(default)]
    pub texts: Vec<String>,
    pub href: Option<String>,
    pub title: Option<String>,
    pub price: Option<String>,
}

impl ListingSnapshot {
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let snapshot: Self = serde_json::from_slice(data)?;
        if let Some(position) = snapshot
            .searches
            .iter()
            .position(|search| search.model.trim().is_empty())
        {
            return Err(ScoutError::ValidationError {
                message: format!("search #{} in snapshot has no model name", position + 1),
            });
        }
        Ok(snapshot)
    }

    /// Listings captured for `model`, in capture order. Several searches for the
    /// same model are concatenated.
    pub fn listings_for<'a>(&'a self, model: &'a str) -> impl Iterator<Item = &'a CapturedListing> {
        self.searches
            .iter()
            .filter(move |search| search.model == model)
            .flat_map(|search| search.listings.iter())
    }
}

impl CapturedListing {
    /// Resolves the card into title, price text, and an absolute link.
    pub fn to_raw(&self, base_url: &Url) -> Result<RawListingText> {
        let href = self
            .href
            .as_deref()
            .map(str::trim)
            .filter(|href| !href.is_empty())
            .ok_or_else(|| ScoutError::ProcessingError {
                message: "listing has no link".to_string(),
            })?;

        let link = base_url.join(href).map_err(|e| ScoutError::ProcessingError {
            message: format!("cannot resolve link '{}': {}", href, e),
        })?;

        let (title, price_text) = match &self.title {
            Some(title) => (
                title.clone(),
                self.price.clone().unwrap_or_else(|| "N/A".to_string()),
            ),
            None => split_spans(&self.texts),
        };

        Ok(RawListingText {
            title,
            price_text,
            link: link.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://www.facebook.com").unwrap()
    }

    #[test]
    fn test_relative_href_is_resolved() {
        let card = CapturedListing {
            texts: vec!["$8,000".to_string(), "2021 Honda CBR1000RR SP".to_string()],
            href: Some("/marketplace/item/123456/".to_string()),
            ..Default::default()
        };
        let raw = card.to_raw(&base()).unwrap();
        assert_eq!(raw.link, "https://www.facebook.com/marketplace/item/123456/");
        assert_eq!(raw.title, "2021 Honda CBR1000RR SP");
        assert_eq!(raw.price_text, "$8,000");
    }

    #[test]
    fn test_explicit_title_wins_over_spans() {
        let card = CapturedListing {
            texts: vec!["ignored span text".to_string()],
            href: Some("https://example.com/item/9".to_string()),
            title: Some("2019 BMW S1000rr".to_string()),
            price: None,
        };
        let raw = card.to_raw(&base()).unwrap();
        assert_eq!(raw.link, "https://example.com/item/9");
        assert_eq!(raw.title, "2019 BMW S1000rr");
        assert_eq!(raw.price_text, "N/A");
    }

    #[test]
    fn test_missing_href_is_a_listing_error() {
        let card = CapturedListing {
            texts: vec!["2020 Yamaha R1".to_string()],
            ..Default::default()
        };
        let err = card.to_raw(&base()).unwrap_err();
        assert!(err.is_listing_scoped());
    }

    #[test]
    fn test_snapshot_groups_by_model() {
        let json = br#"{
            "searches": [
                {"model": "BMW S1000rr", "listings": [{"href": "/a", "texts": ["one"]}]},
                {"model": "Honda CBR1000rr", "listings": [{"href": "/b"}]},
                {"model": "BMW S1000rr", "listings": [{"href": "/c"}]}
            ]
        }"#;
        let snapshot = ListingSnapshot::from_json(json).unwrap();
        let hrefs: Vec<_> = snapshot
            .listings_for("BMW S1000rr")
            .filter_map(|l| l.href.as_deref())
            .collect();
        assert_eq!(hrefs, vec!["/a", "/c"]);
        assert_eq!(snapshot.listings_for("Unknown").count(), 0);
    }

    #[test]
    fn test_snapshot_rejects_unnamed_search() {
        let json = br#"{"searches": [{"model": " ", "listings": []}]}"#;
        assert!(matches!(
            ListingSnapshot::from_json(json),
            Err(ScoutError::ValidationError { .. })
        ));
    }
}
