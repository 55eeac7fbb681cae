//! Best-rate selection.
//!
//! Decides which of the general, FTA and TCO outcomes counts toward the total.
//! Anti-dumping duty never takes part: it is added on top of the selection.

use rust_decimal::Decimal;

use crate::models::{BestRateType, DutyComponent};

/// The outcome of best-rate selection.
#[derive(Debug, Clone, PartialEq)]
pub struct BestRateSelection {
    /// The component that counts toward total duty, if any resolved.
    pub selected: Option<DutyComponent>,
    /// Which regime was selected.
    pub best_rate_type: BestRateType,
    /// Duty avoided compared with the general rate.
    pub potential_savings: Decimal,
}

impl BestRateSelection {
    /// The selected duty amount, zero when nothing resolved.
    pub fn amount(&self) -> Decimal {
        self.selected
            .as_ref()
            .map(|c| c.amount)
            .unwrap_or(Decimal::ZERO)
    }
}

/// Selects the applicable duty outcome.
///
/// 1. A TCO exemption always wins.
/// 2. With both general and FTA duty, the lower amount wins; ties favor general.
/// 3. Otherwise whichever exists; with neither, nothing is selected.
///
/// Savings are `general - fta` when FTA wins, the whole general duty when a TCO
/// wins, and zero otherwise.
///
/// # Examples
///
/// ```
/// use duty_engine::calculation::select_best_rate;
/// use duty_engine::models::{BestRateType, DutyBasis, DutyComponent, FTA_DUTY, GENERAL_DUTY};
/// use rust_decimal::Decimal;
///
/// let general = DutyComponent::new(GENERAL_DUTY, None, Decimal::from(50), DutyBasis::AdValorem, "5% ad valorem");
/// let fta = DutyComponent::new(FTA_DUTY, None, Decimal::from(20), DutyBasis::AdValorem, "FTA Preferential");
///
/// let selection = select_best_rate(Some(&general), Some(&fta), None);
/// assert_eq!(selection.best_rate_type, BestRateType::Fta);
/// assert_eq!(selection.potential_savings, Decimal::from(30));
/// ```
pub fn select_best_rate(
    general_duty: Option<&DutyComponent>,
    fta_duty: Option<&DutyComponent>,
    tco_exemption: Option<&DutyComponent>,
) -> BestRateSelection {
    let general_amount = general_duty.map(|g| g.amount).unwrap_or(Decimal::ZERO);

    if let Some(tco) = tco_exemption {
        return BestRateSelection {
            selected: Some(tco.clone()),
            best_rate_type: BestRateType::TcoExemption,
            potential_savings: general_amount,
        };
    }

    match (general_duty, fta_duty) {
        (Some(general), Some(fta)) if fta.amount < general.amount => BestRateSelection {
            selected: Some(fta.clone()),
            best_rate_type: BestRateType::Fta,
            potential_savings: general.amount - fta.amount,
        },
        (Some(general), _) => BestRateSelection {
            selected: Some(general.clone()),
            best_rate_type: BestRateType::General,
            potential_savings: Decimal::ZERO,
        },
        (None, Some(fta)) => BestRateSelection {
            selected: Some(fta.clone()),
            best_rate_type: BestRateType::Fta,
            potential_savings: Decimal::ZERO,
        },
        (None, None) => BestRateSelection {
            selected: None,
            best_rate_type: BestRateType::General,
            potential_savings: Decimal::ZERO,
        },
    }
}
