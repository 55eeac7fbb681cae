//! General (MFN) duty calculation.
//!
//! Turns a [`GeneralRate`] and the entry's value and quantity into a
//! [`DutyComponent`], branching on how the rate is expressed.

use rust_decimal::Decimal;
use serde_json::json;

use crate::models::{CalculationInput, DutyBasis, DutyComponent, GeneralRate, RateKind};

use super::rounding::{percentage_of, round_money};

/// Calculates the duty a general rate gives for an entry.
///
/// - `ad_valorem` with a percentage: `value × rate / 100`.
/// - `specific` with a unit amount and an entry quantity: `quantity × unit amount`.
/// - `compound`: the ad valorem part plus the specific part, each when usable.
/// - Anything else, including a specific rate without a quantity, is free.
///
/// Compound rates are charged rather than treated as free. A compound rate with
/// neither part usable still falls back to free.
///
/// # Examples
///
/// ```
/// use duty_engine::calculation::calculate_general_duty;
/// use duty_engine::models::{CalculationInput, DutyBasis, GeneralRate, RateKind, GENERAL_DUTY};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let rate = GeneralRate {
///     code: "2204".to_string(),
///     percentage_rate: Some(Decimal::from(5)),
///     unit_amount: None,
///     unit: None,
///     kind: RateKind::AdValorem,
/// };
/// let input = CalculationInput::new("2204210000", "FRA", Decimal::from_str("1200.00").unwrap());
///
/// let duty = calculate_general_duty(&rate, &input, GENERAL_DUTY);
/// assert_eq!(duty.amount, Decimal::from_str("60.00").unwrap());
/// assert_eq!(duty.basis, DutyBasis::AdValorem);
/// ```
pub fn calculate_general_duty(
    rate: &GeneralRate,
    input: &CalculationInput,
    label: &str,
) -> DutyComponent {
    let unit = rate.unit.as_deref().unwrap_or("unit");

    let component = match (rate.kind, rate.percentage_rate, rate.unit_amount, input.quantity) {
        (RateKind::AdValorem, Some(percentage), _, _) => DutyComponent::new(
            label,
            Some(percentage),
            percentage_of(input.customs_value, percentage),
            DutyBasis::AdValorem,
            format!("{}% ad valorem", percentage.normalize()),
        ),
        (RateKind::Specific, _, Some(unit_amount), Some(quantity)) => DutyComponent::new(
            label,
            None,
            round_money(quantity * unit_amount),
            DutyBasis::Specific,
            format!("${} per {}", unit_amount.normalize(), unit),
        )
        .with_detail("quantity", quantity.to_string()),
        (RateKind::Compound, percentage, unit_amount, quantity)
            if percentage.is_some() || (unit_amount.is_some() && quantity.is_some()) =>
        {
            calculate_compound(label, percentage, unit_amount, quantity, unit, input)
        }
        _ => DutyComponent::free(label),
    };

    component
        .with_detail("rate_code", rate.code.as_str())
        .with_detail("rate_kind", json!(rate.kind))
}

fn calculate_compound(
    label: &str,
    percentage: Option<Decimal>,
    unit_amount: Option<Decimal>,
    quantity: Option<Decimal>,
    unit: &str,
    input: &CalculationInput,
) -> DutyComponent {
    let ad_valorem_part = percentage
        .map(|p| percentage_of(input.customs_value, p))
        .unwrap_or_else(|| round_money(Decimal::ZERO));
    let specific_part = match (unit_amount, quantity) {
        (Some(amount), Some(qty)) => round_money(qty * amount),
        _ => round_money(Decimal::ZERO),
    };

    let mut parts = Vec::new();
    if let Some(p) = percentage {
        parts.push(format!("{}% ad valorem", p.normalize()));
    }
    if let (Some(amount), Some(_)) = (unit_amount, quantity) {
        parts.push(format!("${} per {}", amount.normalize(), unit));
    }

    DutyComponent::new(
        label,
        percentage,
        ad_valorem_part + specific_part,
        DutyBasis::Compound,
        parts.join(" + "),
    )
    .with_detail("ad_valorem_amount", ad_valorem_part.to_string())
    .with_detail("specific_amount", specific_part.to_string())
}
