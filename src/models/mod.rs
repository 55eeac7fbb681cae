//! Core data models for the duty calculation engine.
//!
//! This module contains the calculation input, the rate records a repository
//! returns, and the components and results the engine produces.

mod calculation_result;
mod duty_component;
mod input;
mod rate_record;

pub use calculation_result::{BestRateType, BreakdownReport, CalculationResult, format_money};
pub use duty_component::{
    ANTI_DUMPING_DUTY, DutyBasis, DutyComponent, FTA_DUTY, GENERAL_DUTY, GST, TCO_EXEMPTION,
};
pub use input::{CalculationInput, MAX_CUSTOMS_VALUE, MAX_QUANTITY, ValueBasis};
pub use rate_record::{
    AntiDumpingRate, ExemptionGrant, GeneralRate, GstProvision, PreferentialRate, RateKind,
};
