//! Tariff concession order (TCO) exemptions.
//!
//! A TCO waives duty for goods with no locally manufactured substitute. It is a
//! legal exemption, so it always takes precedence over general and FTA duty.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{DutyBasis, DutyComponent, ExemptionGrant, TCO_EXEMPTION};

/// Default window, in days, within which an expiring TCO is flagged.
pub const DEFAULT_TCO_EXPIRY_WARNING_DAYS: i64 = 90;

/// Picks the TCO that applies on `date`.
///
/// Only current grants whose `[effective, expiry)` window contains `date` are
/// considered. The most recently effective grant wins; a grant with no
/// effective date counts as the oldest.
pub fn select_exemption<'a, I>(candidates: I, date: NaiveDate) -> Option<&'a ExemptionGrant>
where
    I: IntoIterator<Item = &'a ExemptionGrant>,
{
    candidates
        .into_iter()
        .filter(|grant| grant.is_valid_on(date))
        .fold(None, |best: Option<&ExemptionGrant>, grant| match best {
            Some(current) if current.effective_date >= grant.effective_date => Some(current),
            _ => Some(grant),
        })
}

/// Builds the zero-amount component recording a TCO exemption.
pub fn tco_component(grant: &ExemptionGrant) -> DutyComponent {
    DutyComponent::new(
        TCO_EXEMPTION,
        None,
        Decimal::new(0, 2),
        DutyBasis::Exemption,
        format!("{}: {}", grant.number, grant.description),
    )
    .with_detail("tco_number", grant.number.as_str())
    .with_detail("goods_description", grant.description.as_str())
    .with_detail(
        "expiry_date",
        grant
            .expiry_date
            .map(|d| serde_json::Value::String(d.to_string()))
            .unwrap_or(serde_json::Value::Null),
    )
}

/// Returns the days left before a grant expires, if that is within `window_days` of `date`.
pub fn days_until_expiry(grant: &ExemptionGrant, date: NaiveDate, window_days: i64) -> Option<i64> {
    let expiry = grant.expiry_date?;
    let remaining = (expiry - date).num_days();
    (0..=window_days).contains(&remaining).then_some(remaining)
}
