use crate::utils::error::{Result, ScoutError};
use crate::utils::validation::{
    validate_positive_number, validate_range, validate_tolerance, Validate,
};
use serde::{Deserialize, Serialize};

/// Per-run listing filters. Loaded once and never changed during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub min_year: i32,
    pub max_year: i32,
    pub max_price: u32,
    /// Fraction of the reference price accepted as a good deal, in `(0, 1]`.
    pub price_tolerance: f64,
    pub max_results_per_model: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_year: 2017,
            max_year: 2025,
            max_price: 20000,
            price_tolerance: 0.8,
            max_results_per_model: 10,
        }
    }
}

impl Validate for FilterConfig {
    fn validate(&self) -> Result<()> {
        validate_range("filters.min_year", self.min_year, 1900, 2099)?;
        validate_range("filters.max_year", self.max_year, 1900, 2099)?;
        if self.min_year > self.max_year {
            return Err(ScoutError::InvalidConfigValueError {
                field: "filters.min_year".to_string(),
                value: self.min_year.to_string(),
                reason: format!("min_year must not exceed max_year ({})", self.max_year),
            });
        }
        validate_tolerance("filters.price_tolerance", self.price_tolerance)?;
        validate_positive_number(
            "filters.max_results_per_model",
            self.max_results_per_model,
            1,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(FilterConfig::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_year_range_rejected() {
        let filters = FilterConfig {
            min_year: 2024,
            max_year: 2020,
            ..FilterConfig::default()
        };
        assert!(filters.validate().is_err());
    }

    #[test]
    fn test_zero_results_rejected() {
        let filters = FilterConfig {
            max_results_per_model: 0,
            ..FilterConfig::default()
        };
        assert!(filters.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let filters: FilterConfig = toml::from_str("max_price = 15000").unwrap();
        assert_eq!(filters.max_price, 15000);
        assert_eq!(filters.min_year, 2017);
        assert!((filters.price_tolerance - 0.8).abs() < f64::EPSILON);
    }
}
