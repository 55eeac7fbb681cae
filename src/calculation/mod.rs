//! Calculation logic for the duty calculation engine.
//!
//! This module contains the pure calculation functions the engine sequences:
//! monetary rounding, hierarchical code resolution, general, FTA and
//! anti-dumping duty calculators, TCO exemption selection, best-rate
//! selection, GST, and the explanation accumulator.

mod anti_dumping;
mod best_rate;
mod code_resolver;
mod explanation;
mod fta_duty;
mod general_duty;
mod gst;
mod rounding;
mod tco_exemption;

pub use anti_dumping::{calculate_anti_dumping_duty, select_anti_dumping};
pub use best_rate::{BestRateSelection, select_best_rate};
pub use code_resolver::{CodeMatch, HIERARCHY_LEVELS, candidate_codes, resolve_hierarchical};
pub use explanation::Explanation;
pub use fta_duty::{FTA_PREFERENTIAL, calculate_fta_duty, select_best_fta};
pub use general_duty::calculate_general_duty;
pub use gst::{calculate_gst, default_gst_rate, default_gst_threshold};
pub use rounding::{MONEY_DECIMAL_PLACES, percentage_of, round_money};
pub use tco_exemption::{
    DEFAULT_TCO_EXPIRY_WARNING_DAYS, days_until_expiry, select_exemption, tco_component,
};
