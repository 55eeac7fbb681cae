//! FTA preferential duty calculation.
//!
//! This module computes the duty under a free trade agreement preferential rate
//! and picks the most favorable valid preference among several candidates.

use chrono::NaiveDate;
use serde_json::Value;

use crate::models::{CalculationInput, DutyBasis, DutyComponent, FTA_DUTY, PreferentialRate};

use super::rounding::percentage_of;

/// Description used for every FTA component.
pub const FTA_PREFERENTIAL: &str = "FTA Preferential";

/// Calculates the duty payable under a preferential rate on `date`.
///
/// The rate is zero once its elimination date has been reached. The component
/// details carry the agreement, staging category and origin rule for
/// compliance messaging.
///
/// # Examples
///
/// ```
/// use duty_engine::calculation::calculate_fta_duty;
/// use duty_engine::models::{CalculationInput, PreferentialRate};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let rate = PreferentialRate {
///     code: "8471".to_string(),
///     agreement_id: "KAFTA".to_string(),
///     country_code: "KOR".to_string(),
///     percentage_rate: Some(Decimal::from(2)),
///     staging_category: None,
///     elimination_date: None,
///     effective_date: None,
///     quota_quantity: None,
///     origin_rule: None,
/// };
/// let input = CalculationInput::new("84713000", "KOR", Decimal::from(1000));
/// let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
///
/// let duty = calculate_fta_duty(&rate, &input, date);
/// assert_eq!(duty.amount, Decimal::from_str("20.00").unwrap());
/// ```
pub fn calculate_fta_duty(
    rate: &PreferentialRate,
    input: &CalculationInput,
    date: NaiveDate,
) -> DutyComponent {
    let effective_rate = rate.effective_rate(date);
    let eliminated = rate.is_eliminated_on(date);

    DutyComponent::new(
        FTA_DUTY,
        Some(effective_rate),
        percentage_of(input.customs_value, effective_rate),
        DutyBasis::AdValorem,
        FTA_PREFERENTIAL,
    )
    .with_detail("agreement", rate.agreement_id.as_str())
    .with_detail("rate_code", rate.code.as_str())
    .with_detail("staging_category", optional(&rate.staging_category))
    .with_detail("origin_rule", optional(&rate.origin_rule))
    .with_detail(
        "quota_quantity",
        rate.quota_quantity
            .map(|q| Value::String(q.to_string()))
            .unwrap_or(Value::Null),
    )
    .with_detail("tariff_eliminated", eliminated)
}

fn optional(value: &Option<String>) -> Value {
    value.clone().map(Value::String).unwrap_or(Value::Null)
}

/// Picks the lowest-rate preference for `country_code` that is valid on `date`.
///
/// Ties keep the first candidate in iteration order.
pub fn select_best_fta<'a, I>(
    candidates: I,
    country_code: &str,
    date: NaiveDate,
) -> Option<&'a PreferentialRate>
where
    I: IntoIterator<Item = &'a PreferentialRate>,
{
    candidates
        .into_iter()
        .filter(|rate| rate.country_code == country_code && rate.is_valid_on(date))
        .fold(None, |best: Option<&PreferentialRate>, rate| match best {
            Some(current) if current.effective_rate(date) <= rate.effective_rate(date) => {
                Some(current)
            }
            _ => Some(rate),
        })
}
