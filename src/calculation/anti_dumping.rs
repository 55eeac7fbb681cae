//! Anti-dumping and countervailing duty.
//!
//! A measure may carry an ad valorem part, a per-unit part, or both. The duty
//! is always added on top of whichever general, FTA or TCO outcome was selected.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{ANTI_DUMPING_DUTY, AntiDumpingRate, CalculationInput, DutyBasis, DutyComponent};

use super::rounding::{percentage_of, round_money};

/// Calculates the duty payable under an anti-dumping measure.
///
/// Both parts are independently optional and additive:
/// - ad valorem: `value × rate / 100` when the rate is positive
/// - specific: `quantity × per-unit amount` when both are present
///
/// # Examples
///
/// ```
/// use duty_engine::calculation::calculate_anti_dumping_duty;
/// use duty_engine::models::{AntiDumpingRate, CalculationInput};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let measure = AntiDumpingRate {
///     code: "7208510000".to_string(),
///     country_code: "CHN".to_string(),
///     exporter_name: None,
///     percentage_rate: Some(Decimal::from_str("23.6").unwrap()),
///     per_unit_amount: None,
///     unit: None,
///     effective_date: None,
///     expiry_date: None,
///     is_active: true,
/// };
/// let input = CalculationInput::new("7208510000", "CHN", Decimal::from(50000));
///
/// let duty = calculate_anti_dumping_duty(&measure, &input);
/// assert_eq!(duty.amount, Decimal::from_str("11800.00").unwrap());
/// assert_eq!(duty.description, "23.6% ad valorem");
/// ```
pub fn calculate_anti_dumping_duty(
    measure: &AntiDumpingRate,
    input: &CalculationInput,
) -> DutyComponent {
    let percentage = measure
        .percentage_rate
        .filter(|rate| *rate > Decimal::ZERO);

    let ad_valorem_part = match percentage {
        Some(rate) => percentage_of(input.customs_value, rate),
        None => round_money(Decimal::ZERO),
    };

    let specific_part = match (measure.per_unit_amount, input.quantity) {
        (Some(per_unit), Some(quantity)) => round_money(quantity * per_unit),
        _ => round_money(Decimal::ZERO),
    };

    let mut parts = Vec::new();
    if ad_valorem_part > Decimal::ZERO {
        if let Some(rate) = percentage {
            parts.push(format!("{}% ad valorem", rate.normalize()));
        }
    }
    if specific_part > Decimal::ZERO {
        if let Some(per_unit) = measure.per_unit_amount {
            parts.push(format!(
                "${} per {}",
                per_unit.normalize(),
                measure.unit.as_deref().unwrap_or("unit")
            ));
        }
    }
    let description = if parts.is_empty() {
        "No anti-dumping duty payable".to_string()
    } else {
        parts.join(" + ")
    };

    let basis = match (ad_valorem_part > Decimal::ZERO, specific_part > Decimal::ZERO) {
        (true, true) => DutyBasis::Compound,
        (false, true) => DutyBasis::Specific,
        (true, false) => DutyBasis::AdValorem,
        (false, false) => DutyBasis::Free,
    };

    DutyComponent::new(
        ANTI_DUMPING_DUTY,
        percentage,
        ad_valorem_part + specific_part,
        basis,
        description,
    )
    .with_detail("ad_valorem_amount", ad_valorem_part.to_string())
    .with_detail("specific_amount", specific_part.to_string())
    .with_detail("exporter_specific", measure.is_exporter_specific())
    .with_detail(
        "exporter_name",
        measure
            .exporter_name
            .clone()
            .map(serde_json::Value::String)
            .unwrap_or(serde_json::Value::Null),
    )
}

/// Picks the anti-dumping measure that applies to an entry.
///
/// With an exporter name, an active and date-valid measure naming that exporter
/// (case-insensitive substring match) wins. Otherwise the country-wide measure
/// with no exporter set applies. The two outcomes are never combined. A blank
/// exporter name is treated as no exporter.
pub fn select_anti_dumping<'a, I>(
    candidates: I,
    country_code: &str,
    exporter_name: Option<&str>,
    date: NaiveDate,
) -> Option<&'a AntiDumpingRate>
where
    I: IntoIterator<Item = &'a AntiDumpingRate>,
{
    let valid: Vec<&AntiDumpingRate> = candidates
        .into_iter()
        .filter(|m| m.country_code == country_code && m.is_valid_on(date))
        .collect();

    let exporter_name = exporter_name
        .map(str::trim)
        .filter(|name| !name.is_empty());

    if let Some(exporter) = exporter_name {
        let wanted = exporter.to_lowercase();
        let exporter_specific = valid.iter().copied().find(|m| {
            m.exporter_name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&wanted))
        });
        if exporter_specific.is_some() {
            return exporter_specific;
        }
    }

    valid.into_iter().find(|m| m.exporter_name.is_none())
}
