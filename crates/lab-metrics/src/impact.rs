//! Radar-style impact metric vector.

use lab_core::enums::ImpactSubject;
use lab_core::errors::CoreError;
use lab_core::responses::ImpactAxis;

/// Build the fixed citations/downloads/views vector against `full_mark`.
///
/// Values are not clamped: a total above the ceiling yields `ratio > 1.0`.
///
/// # Errors
///
/// Returns `CoreError::Validation` if `full_mark` is not a positive finite number.
#[allow(clippy::cast_precision_loss)]
pub fn impact_vector(
    citations: u64,
    downloads: u64,
    views: u64,
    full_mark: f64,
) -> Result<Vec<ImpactAxis>, CoreError> {
    if !full_mark.is_finite() || full_mark <= 0.0 {
        return Err(CoreError::Validation(format!(
            "full_mark must be a positive number, got {full_mark}"
        )));
    }

    Ok(ImpactSubject::ALL
        .into_iter()
        .map(|subject| {
            let raw = match subject {
                ImpactSubject::Citations => citations,
                ImpactSubject::Downloads => downloads,
                ImpactSubject::Views => views,
            };
            let value = raw as f64;
            ImpactAxis {
                subject,
                value,
                full_mark,
                ratio: value / full_mark,
            }
        })
        .collect())
}
