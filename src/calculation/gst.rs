//! GST on imported goods.
//!
//! GST is charged on the duty-inclusive value, subject to provision-based
//! exemptions and a minimum value threshold.

use rust_decimal::Decimal;

use crate::models::{DutyBasis, DutyComponent, GST, GstProvision};

use super::rounding::round_money;

/// Returns the default GST rate (10%).
pub fn default_gst_rate() -> Decimal {
    Decimal::new(10, 2)
}

/// Returns the default value below which no GST is charged ($1000.00).
pub fn default_gst_threshold() -> Decimal {
    Decimal::new(100000, 2)
}

/// Calculates GST on a duty-inclusive value.
///
/// 1. The first active provision with an exemption type that applies to the
///    value exempts the goods. Provisions are never combined.
/// 2. Otherwise a value below `threshold` attracts no GST.
/// 3. Otherwise GST is `value × rate`.
///
/// # Examples
///
/// ```
/// use duty_engine::calculation::{calculate_gst, default_gst_rate, default_gst_threshold};
/// use duty_engine::models::DutyBasis;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let value = Decimal::from_str("1200.00").unwrap();
/// let gst = calculate_gst(&[], value, default_gst_rate(), default_gst_threshold());
/// assert_eq!(gst.amount, Decimal::from_str("120.00").unwrap());
/// assert_eq!(gst.basis, DutyBasis::StandardRate);
/// ```
pub fn calculate_gst(
    provisions: &[GstProvision],
    duty_inclusive_value: Decimal,
    rate: Decimal,
    threshold: Decimal,
) -> DutyComponent {
    let percentage = (rate * Decimal::ONE_HUNDRED).normalize();

    let exemption = provisions.iter().find(|p| {
        p.is_active && p.exemption_type.is_some() && p.applies_to_value(duty_inclusive_value)
    });

    if let Some(provision) = exemption {
        let exemption_type = provision.exemption_type.as_deref().unwrap_or_default();
        return DutyComponent::new(
            GST,
            Some(Decimal::ZERO),
            round_money(Decimal::ZERO),
            DutyBasis::Exemption,
            format!("GST exempt: {}", exemption_type),
        )
        .with_detail("exemption_type", exemption_type)
        .with_detail(
            "provision_code",
            provision
                .code
                .clone()
                .map(serde_json::Value::String)
                .unwrap_or(serde_json::Value::Null),
        );
    }

    if duty_inclusive_value < threshold {
        return DutyComponent::new(
            GST,
            Some(Decimal::ZERO),
            round_money(Decimal::ZERO),
            DutyBasis::Threshold,
            format!("Below GST threshold of ${:.2}", threshold),
        )
        .with_detail("threshold", threshold.to_string());
    }

    DutyComponent::new(
        GST,
        Some(percentage),
        round_money(duty_inclusive_value * rate),
        DutyBasis::StandardRate,
        format!("GST at {}%", percentage),
    )
    .with_detail("taxable_value", duty_inclusive_value.to_string())
}
