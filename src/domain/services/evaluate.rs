use crate::domain::model::{DealVerdict, NoReferenceReason};
use crate::domain::reference::ReferenceTable;
use crate::utils::error::Result;
use crate::utils::validation::validate_tolerance;

/// Values `asking_price` against the reference price for `(model, year)`.
///
/// The listing is a good deal when the asking price is at or below
/// `reference * tolerance`. When it is not, the reported overage is the
/// distance above that ceiling rather than above the reference itself.
///
/// A tolerance outside `(0, 1]` is a configuration error and is returned as
/// `Err`, never folded into a verdict.
pub fn evaluate(
    table: &ReferenceTable,
    model: &str,
    year: i32,
    asking_price: u32,
    tolerance: f64,
) -> Result<DealVerdict> {
    validate_tolerance("price_tolerance", tolerance)?;

    let Some(years) = table.years(model) else {
        return Ok(DealVerdict::NoReference {
            reason: NoReferenceReason::UnknownModel {
                model: model.to_string(),
            },
        });
    };

    let Some(&reference_price) = years.get(&year) else {
        return Ok(DealVerdict::NoReference {
            reason: NoReferenceReason::UnknownYear {
                model: model.to_string(),
                year,
            },
        });
    };

    // Snap to 1e-6 so a ceiling like 10500 * 0.7 compares as exactly 7350.
    let ceiling = (f64::from(reference_price) * tolerance * 1e6).round() / 1e6;
    let asking = f64::from(asking_price);

    if asking <= ceiling {
        Ok(DealVerdict::GoodDeal {
            savings: reference_price.saturating_sub(asking_price),
            reference_price,
        })
    } else {
        Ok(DealVerdict::Overpriced {
            overage: asking - ceiling,
            reference_price,
        })
    }
}
