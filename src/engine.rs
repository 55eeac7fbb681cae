//! The duty calculation orchestrator.
//!
//! [`DutyEngine`] runs one calculation as a fixed sequence: general duty, FTA
//! duty, TCO exemption, anti-dumping duty, best-rate selection, duty-inclusive
//! value, GST, total amount, and finally savings and compliance messaging.
//! Each step appends a line to the result's `steps`.
//!
//! A repository failure on any duty category is downgraded to "no applicable
//! rate" plus a warning. A failure reading GST provisions aborts the
//! calculation with [`EngineError::GstUnavailable`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::calculation::{
    Explanation, calculate_anti_dumping_duty, calculate_fta_duty, calculate_general_duty,
    calculate_gst, days_until_expiry, resolve_hierarchical, round_money, select_best_rate,
    tco_component,
};
use crate::config::EngineSettings;
use crate::error::{EngineError, EngineResult, LookupResult};
use crate::models::{
    AntiDumpingRate, BestRateType, BreakdownReport, CalculationInput, CalculationResult,
    DutyComponent, ExemptionGrant, GENERAL_DUTY, PreferentialRate, format_money,
};
use crate::repository::RateRepository;

/// Calculates customs duty and import GST against a rate repository.
///
/// The engine holds no per-calculation state, so one instance can serve any
/// number of concurrent calculations.
///
/// # Example
///
/// ```
/// use duty_engine::engine::DutyEngine;
/// use duty_engine::models::{BestRateType, CalculationInput, GeneralRate, PreferentialRate, RateKind};
/// use duty_engine::repository::{InMemoryRateRepository, TariffTables};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let repository = InMemoryRateRepository::new(TariffTables {
///     general_rates: vec![GeneralRate {
///         code: "2204210000".to_string(),
///         percentage_rate: Some(Decimal::from(5)),
///         unit_amount: None,
///         unit: None,
///         kind: RateKind::AdValorem,
///     }],
///     fta_rates: vec![PreferentialRate {
///         code: "2204210000".to_string(),
///         agreement_id: "AANZFTA".to_string(),
///         country_code: "NZL".to_string(),
///         percentage_rate: Some(Decimal::ZERO),
///         staging_category: None,
///         elimination_date: None,
///         effective_date: None,
///         quota_quantity: None,
///         origin_rule: None,
///     }],
///     ..TariffTables::default()
/// });
///
/// let engine = DutyEngine::new(repository);
/// let input = CalculationInput::new("2204210000", "NZL", Decimal::from_str("1200.00").unwrap());
/// let result = engine.calculate(&input).unwrap();
///
/// assert_eq!(result.best_rate_type, BestRateType::Fta);
/// assert_eq!(result.total_amount, Decimal::from_str("1320.00").unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct DutyEngine<R> {
    repository: R,
    settings: EngineSettings,
}

impl<R: RateRepository> DutyEngine<R> {
    /// Creates an engine with default settings (10% GST, $1000.00 threshold).
    pub fn new(repository: R) -> Self {
        Self::with_settings(repository, EngineSettings::default())
    }

    /// Creates an engine with explicit settings.
    pub fn with_settings(repository: R, settings: EngineSettings) -> Self {
        Self {
            repository,
            settings,
        }
    }

    /// Returns the rate repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Calculates duty and GST for one entry.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Validation`] if the input is invalid.
    /// - [`EngineError::GstUnavailable`] if GST provisions cannot be read.
    pub fn calculate(&self, input: &CalculationInput) -> EngineResult<CalculationResult> {
        input.validate()?;

        let date = input.effective_date();
        let code = input.classification_code.as_str();
        let country = input.country_code.as_str();
        let mut explanation = Explanation::new();

        // 1. General duty, hierarchical
        let general_duty = self.general_duty(input, &mut explanation);

        // 2. FTA duty, hierarchical
        let fta = self.fta_duty(input, date, &mut explanation);
        let fta_duty = fta.as_ref().map(|(_, component)| component.clone());

        // 3. TCO exemption, exact code
        let exemption = absent_on_failure(
            self.repository.find_exemption(code, date),
            "TCO exemption",
            &mut explanation,
        );
        let tco_exemption = exemption.as_ref().map(tco_component);
        match &exemption {
            Some(grant) => {
                debug!(code, tco_number = %grant.number, "Resolved TCO exemption");
                explanation.step(format!(
                    "TCO exemption: {} applies, duty reduced to {}",
                    grant.number,
                    format_money(Decimal::ZERO)
                ));
            }
            None => explanation.step("TCO exemption: none found"),
        }

        // 4. Anti-dumping duty, exact code, always additive
        let measure = absent_on_failure(
            self.repository.find_anti_dumping_duty(
                code,
                country,
                input.exporter_name.as_deref(),
                date,
            ),
            "Anti-dumping duty",
            &mut explanation,
        );
        let anti_dumping_duty = measure
            .as_ref()
            .map(|measure| calculate_anti_dumping_duty(measure, input));
        match &anti_dumping_duty {
            Some(component) => {
                debug!(code, country, amount = %component.amount, "Resolved anti-dumping measure");
                explanation.step(format!(
                    "Anti-dumping duty: {} = {}",
                    component.description,
                    format_money(component.amount)
                ));
            }
            None => explanation.step(format!("Anti-dumping duty: none applicable for {}", country)),
        }

        // 5. Best rate
        let selection = select_best_rate(
            general_duty.as_ref(),
            fta_duty.as_ref(),
            tco_exemption.as_ref(),
        );
        let anti_dumping_amount = anti_dumping_duty
            .as_ref()
            .map(|component| component.amount)
            .unwrap_or(Decimal::ZERO);
        let total_duty = round_money(selection.amount() + anti_dumping_amount);
        explanation.step(format!(
            "Best rate: {} duty of {} plus anti-dumping duty of {} = total duty {}",
            best_rate_label(selection.best_rate_type),
            format_money(selection.amount()),
            format_money(anti_dumping_amount),
            format_money(total_duty)
        ));

        // 6. Duty-inclusive value
        let duty_inclusive_value = input.customs_value + total_duty;
        explanation.step(format!(
            "Duty-inclusive value: {} + {} = {}",
            format_money(input.customs_value),
            format_money(total_duty),
            format_money(duty_inclusive_value)
        ));

        // 7. GST, mandatory
        let provisions = self.repository.find_gst_provisions(code).map_err(|failure| {
            warn!(code, error = %failure, "GST provisions unavailable, aborting calculation");
            EngineError::GstUnavailable {
                code: code.to_string(),
                message: failure.to_string(),
            }
        })?;
        let gst_component = calculate_gst(
            &provisions,
            duty_inclusive_value,
            self.settings.gst_rate,
            self.settings.gst_threshold,
        );
        let total_gst = gst_component.amount;
        explanation.step(format!(
            "GST: {} on {} = {}",
            gst_component.description,
            format_money(duty_inclusive_value),
            format_money(total_gst)
        ));

        // 8. Total amount
        let total_amount = duty_inclusive_value + total_gst;
        explanation.step(format!(
            "Total amount: {} + {} = {}",
            format_money(duty_inclusive_value),
            format_money(total_gst),
            format_money(total_amount)
        ));

        // 9. Savings and compliance
        let potential_savings = round_money(selection.potential_savings);
        if potential_savings > Decimal::ZERO {
            explanation.step(format!(
                "Savings: {} compared with general duty",
                format_money(potential_savings)
            ));
        } else {
            explanation.step("Savings: none compared with general duty");
        }

        let preference = fta.as_ref().map(|(rate, _)| rate);
        self.compliance(
            selection.best_rate_type,
            preference,
            exemption.as_ref(),
            measure.as_ref(),
            date,
            &mut explanation,
        );

        let (steps, compliance_notes, warnings) = explanation.finish();
        let result = CalculationResult {
            classification_code: input.classification_code.clone(),
            country_code: input.country_code.clone(),
            customs_value: input.customs_value,
            calculation_date: date,
            value_basis: input.value_basis,
            general_duty,
            fta_duty,
            anti_dumping_duty,
            tco_exemption,
            gst_component,
            total_duty,
            duty_inclusive_value,
            total_gst,
            total_amount,
            best_rate_type: selection.best_rate_type,
            potential_savings,
            steps,
            compliance_notes,
            warnings,
        };

        info!(
            code,
            country,
            best_rate_type = %result.best_rate_type,
            total_duty = %result.total_duty,
            total_gst = %result.total_gst,
            total_amount = %result.total_amount,
            warnings = result.warnings.len(),
            "Duty calculation completed"
        );

        Ok(result)
    }

    /// Calculates and reshapes the result for display.
    ///
    /// # Errors
    ///
    /// Fails exactly when [`calculate`](Self::calculate) fails.
    pub fn explain(&self, input: &CalculationInput) -> EngineResult<BreakdownReport> {
        let result = self.calculate(input)?;
        Ok(BreakdownReport::from(&result))
    }

    fn general_duty(
        &self,
        input: &CalculationInput,
        explanation: &mut Explanation,
    ) -> Option<DutyComponent> {
        let code = input.classification_code.as_str();
        let found = absent_on_failure(
            resolve_hierarchical(code, |candidate| self.repository.find_general_rate(candidate)),
            "General duty",
            explanation,
        );

        match found {
            Some(found) => {
                let component = calculate_general_duty(&found.record, input, GENERAL_DUTY)
                    .with_detail("matched_code", found.matched_code.as_str());
                explanation.step(format!(
                    "General duty: {} (rate at code {}) = {}",
                    component.description,
                    found.matched_code,
                    format_money(component.amount)
                ));
                Some(component)
            }
            None => {
                explanation.step(format!("General duty: no rate found for {}", code));
                None
            }
        }
    }

    fn fta_duty(
        &self,
        input: &CalculationInput,
        date: NaiveDate,
        explanation: &mut Explanation,
    ) -> Option<(PreferentialRate, DutyComponent)> {
        let code = input.classification_code.as_str();
        let country = input.country_code.as_str();
        let found = absent_on_failure(
            resolve_hierarchical(code, |candidate| {
                self.repository.find_best_fta_rate(candidate, country, date)
            }),
            "FTA duty",
            explanation,
        );

        match found {
            Some(found) => {
                let component = calculate_fta_duty(&found.record, input, date)
                    .with_detail("matched_code", found.matched_code.as_str());
                explanation.step(format!(
                    "FTA duty: {} {}% (rate at code {}) = {}",
                    found.record.agreement_id,
                    found.record.effective_rate(date).normalize(),
                    found.matched_code,
                    format_money(component.amount)
                ));
                Some((found.record, component))
            }
            None => {
                explanation.step(format!("FTA duty: no preferential rate for {}", country));
                None
            }
        }
    }

    fn compliance(
        &self,
        best_rate_type: BestRateType,
        preference: Option<&PreferentialRate>,
        exemption: Option<&ExemptionGrant>,
        measure: Option<&AntiDumpingRate>,
        date: NaiveDate,
        explanation: &mut Explanation,
    ) {
        if let (BestRateType::Fta, Some(rate)) = (best_rate_type, preference) {
            if let Some(rule) = &rate.origin_rule {
                explanation.note(format!(
                    "{} rule of origin must be met: {}",
                    rate.agreement_id, rule
                ));
            }
            if let Some(quota) = rate.quota_quantity {
                explanation.warn(format!(
                    "{} preference is subject to a quota of {}; entries beyond the quota pay the general rate",
                    rate.agreement_id,
                    quota.normalize()
                ));
            }
        }

        if let Some(grant) = exemption {
            explanation.note(format!(
                "Goods must match the description in {}: {}",
                grant.number, grant.description
            ));
            let window = self.settings.tco_expiry_warning_days;
            if let (Some(days), Some(expiry)) = (
                days_until_expiry(grant, date, window),
                grant.expiry_date,
            ) {
                explanation.warn(format!(
                    "{} expires on {} ({} days remaining)",
                    grant.number, expiry, days
                ));
            }
        }

        if let Some(measure) = measure {
            match &measure.exporter_name {
                Some(exporter) if measure.is_exporter_specific() => explanation.note(format!(
                    "Exporter-specific anti-dumping duty for {} is payable in addition to the {} duty",
                    exporter,
                    best_rate_label(best_rate_type)
                )),
                _ => explanation.note(format!(
                    "Anti-dumping duty on goods from {} is payable in addition to the {} duty",
                    measure.country_code,
                    best_rate_label(best_rate_type)
                )),
            }
        }
    }
}

/// Turns a lookup failure into "no applicable rate" and records a warning.
fn absent_on_failure<T>(
    result: LookupResult<Option<T>>,
    category: &str,
    explanation: &mut Explanation,
) -> Option<T> {
    result.unwrap_or_else(|failure| {
        explanation.warn(format!(
            "{} lookup failed and was treated as not applicable: {}",
            category, failure
        ));
        None
    })
}

fn best_rate_label(best_rate_type: BestRateType) -> &'static str {
    match best_rate_type {
        BestRateType::General => "general",
        BestRateType::Fta => "FTA",
        BestRateType::TcoExemption => "TCO exemption",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupFailure;
    use crate::models::{
        DutyBasis, ExemptionGrant, GeneralRate, GstProvision, MAX_CUSTOMS_VALUE, PreferentialRate,
        RateKind,
    };
    use crate::repository::{InMemoryRateRepository, TariffTables};
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2026, 3, 1)
    }

    fn ad_valorem(code: &str, rate: &str) -> GeneralRate {
        GeneralRate {
            code: code.to_string(),
            percentage_rate: Some(dec(rate)),
            unit_amount: None,
            unit: None,
            kind: RateKind::AdValorem,
        }
    }

    fn free(code: &str) -> GeneralRate {
        GeneralRate {
            code: code.to_string(),
            percentage_rate: None,
            unit_amount: None,
            unit: None,
            kind: RateKind::Free,
        }
    }

    fn preference(code: &str, agreement: &str, country: &str, rate: &str) -> PreferentialRate {
        PreferentialRate {
            code: code.to_string(),
            agreement_id: agreement.to_string(),
            country_code: country.to_string(),
            percentage_rate: Some(dec(rate)),
            staging_category: None,
            elimination_date: None,
            effective_date: None,
            quota_quantity: None,
            origin_rule: None,
        }
    }

    fn anti_dumping(code: &str, country: &str, rate: &str) -> AntiDumpingRate {
        AntiDumpingRate {
            code: code.to_string(),
            country_code: country.to_string(),
            exporter_name: None,
            percentage_rate: Some(dec(rate)),
            per_unit_amount: None,
            unit: None,
            effective_date: None,
            expiry_date: None,
            is_active: true,
        }
    }

    fn tco(code: &str, number: &str, expiry: Option<NaiveDate>) -> ExemptionGrant {
        ExemptionGrant {
            number: number.to_string(),
            code: code.to_string(),
            effective_date: Some(date(2020, 1, 1)),
            expiry_date: expiry,
            is_current: true,
            description: "Robotic palletising systems".to_string(),
        }
    }

    fn engine(tables: TariffTables) -> DutyEngine<InMemoryRateRepository> {
        DutyEngine::new(InMemoryRateRepository::new(tables))
    }

    fn input(code: &str, country: &str, value: &str) -> CalculationInput {
        CalculationInput::new(code, country, dec(value)).on_date(today())
    }

    /// Repository that fails the queries named in `failing`.
    struct FailingRepository {
        inner: InMemoryRateRepository,
        failing: Vec<&'static str>,
    }

    impl FailingRepository {
        fn check(&self, query: &'static str) -> LookupResult<()> {
            if self.failing.contains(&query) {
                Err(LookupFailure::new(query, "connection refused"))
            } else {
                Ok(())
            }
        }
    }

    impl RateRepository for FailingRepository {
        fn find_general_rate(&self, code: &str) -> LookupResult<Option<GeneralRate>> {
            self.check("general_rate")?;
            self.inner.find_general_rate(code)
        }

        fn find_best_fta_rate(
            &self,
            code: &str,
            country_code: &str,
            date: NaiveDate,
        ) -> LookupResult<Option<PreferentialRate>> {
            self.check("fta_rate")?;
            self.inner.find_best_fta_rate(code, country_code, date)
        }

        fn find_exemption(
            &self,
            code: &str,
            date: NaiveDate,
        ) -> LookupResult<Option<ExemptionGrant>> {
            self.check("exemption")?;
            self.inner.find_exemption(code, date)
        }

        fn find_anti_dumping_duty(
            &self,
            code: &str,
            country_code: &str,
            exporter_name: Option<&str>,
            date: NaiveDate,
        ) -> LookupResult<Option<AntiDumpingRate>> {
            self.check("anti_dumping")?;
            self.inner
                .find_anti_dumping_duty(code, country_code, exporter_name, date)
        }

        fn find_gst_provisions(&self, code: &str) -> LookupResult<Vec<GstProvision>> {
            self.check("gst_provisions")?;
            self.inner.find_gst_provisions(code)
        }
    }

    fn wine_tables() -> TariffTables {
        TariffTables {
            general_rates: vec![ad_valorem("2204210000", "5")],
            fta_rates: vec![preference("2204210000", "AANZFTA", "NZL", "0")],
            ..TariffTables::default()
        }
    }

    /// ENG-001: wine from New Zealand under AANZFTA
    #[test]
    fn test_fta_end_to_end() {
        let result = engine(wine_tables())
            .calculate(&input("2204210000", "NZL", "1200.00"))
            .unwrap();

        assert_eq!(result.general_duty.as_ref().unwrap().amount, dec("60.00"));
        assert_eq!(result.fta_duty.as_ref().unwrap().amount, dec("0.00"));
        assert_eq!(result.total_duty, dec("0.00"));
        assert_eq!(result.duty_inclusive_value, dec("1200.00"));
        assert_eq!(result.total_gst, dec("120.00"));
        assert_eq!(result.total_amount, dec("1320.00"));
        assert_eq!(result.best_rate_type, BestRateType::Fta);
        assert_eq!(result.potential_savings, dec("60.00"));
        assert!(result.warnings.is_empty());
    }

    /// ENG-002: anti-dumping duty on top of free general duty
    #[test]
    fn test_anti_dumping_end_to_end() {
        let tables = TariffTables {
            general_rates: vec![free("7208")],
            anti_dumping_rates: vec![anti_dumping("7208510000", "CHN", "23.6")],
            ..TariffTables::default()
        };
        let result = engine(tables)
            .calculate(&input("7208510000", "CHN", "50000.00"))
            .unwrap();

        assert_eq!(result.general_duty.as_ref().unwrap().basis, DutyBasis::Free);
        assert_eq!(result.anti_dumping_duty.as_ref().unwrap().amount, dec("11800.00"));
        assert_eq!(result.total_duty, dec("11800.00"));
        assert_eq!(result.duty_inclusive_value, dec("61800.00"));
        assert_eq!(result.total_gst, dec("6180.00"));
        assert_eq!(result.total_amount, dec("67980.00"));
        assert_eq!(result.best_rate_type, BestRateType::General);
        assert!(
            result
                .compliance_notes
                .iter()
                .any(|n| n.contains("Anti-dumping duty on goods from CHN"))
        );
    }

    /// ENG-003: FTA cheaper than general
    #[test]
    fn test_fta_beats_general() {
        let tables = TariffTables {
            general_rates: vec![ad_valorem("8471", "5")],
            fta_rates: vec![preference("8471", "KAFTA", "KOR", "2")],
            ..TariffTables::default()
        };
        let result = engine(tables)
            .calculate(&input("84713000", "KOR", "1000.00"))
            .unwrap();

        assert_eq!(result.general_duty.as_ref().unwrap().amount, dec("50.00"));
        assert_eq!(result.fta_duty.as_ref().unwrap().amount, dec("20.00"));
        assert_eq!(result.best_rate_type, BestRateType::Fta);
        assert_eq!(result.total_duty, dec("20.00"));
        assert_eq!(result.potential_savings, dec("30.00"));
    }

    /// ENG-004: TCO wins over a cheaper FTA, anti-dumping still added
    #[test]
    fn test_tco_precedence() {
        let tables = TariffTables {
            general_rates: vec![ad_valorem("8479", "5")],
            fta_rates: vec![preference("8479", "KAFTA", "KOR", "2")],
            exemptions: vec![tco("8479899000", "TC 2345678", None)],
            anti_dumping_rates: vec![anti_dumping("8479899000", "KOR", "10")],
            ..TariffTables::default()
        };
        let result = engine(tables)
            .calculate(&input("8479899000", "KOR", "10000.00"))
            .unwrap();

        assert_eq!(result.best_rate_type, BestRateType::TcoExemption);
        assert_eq!(result.total_duty, dec("1000.00"));
        assert_eq!(result.potential_savings, dec("500.00"));
        assert!(
            result
                .compliance_notes
                .iter()
                .any(|n| n.contains("TC 2345678"))
        );
    }

    /// ENG-005: hierarchical fallback to a 4-digit heading
    #[test]
    fn test_hierarchical_general_rate() {
        let tables = TariffTables {
            general_rates: vec![ad_valorem("8471", "5")],
            ..TariffTables::default()
        };
        let engine = engine(tables);

        let found = engine.calculate(&input("84713000", "USA", "100.00")).unwrap();
        let general = found.general_duty.unwrap();
        assert_eq!(general.details["matched_code"], "8471");

        let missing = engine
            .calculate(&input("9999999999", "USA", "100.00"))
            .unwrap();
        assert!(missing.general_duty.is_none());
        assert_eq!(missing.total_duty, dec("0.00"));
    }

    /// ENG-006: nothing resolves, GST threshold still applies
    #[test]
    fn test_no_rates_below_threshold() {
        let result = engine(TariffTables::default())
            .calculate(&input("0101210000", "USA", "999.99"))
            .unwrap();

        assert_eq!(result.best_rate_type, BestRateType::General);
        assert_eq!(result.total_duty, dec("0.00"));
        assert_eq!(result.gst_component.basis, DutyBasis::Threshold);
        assert_eq!(result.total_gst, dec("0.00"));
        assert_eq!(result.total_amount, dec("999.99"));
    }

    /// ENG-007: the step log has one line per stage
    #[test]
    fn test_step_log() {
        let result = engine(wine_tables())
            .calculate(&input("2204210000", "NZL", "1200.00"))
            .unwrap();

        assert_eq!(result.steps.len(), 9);
        assert_eq!(
            result.steps[0],
            "1. General duty: 5% ad valorem (rate at code 2204210000) = $60.00"
        );
        assert_eq!(
            result.steps[1],
            "2. FTA duty: AANZFTA 0% (rate at code 2204210000) = $0.00"
        );
        assert_eq!(result.steps[2], "3. TCO exemption: none found");
        assert_eq!(result.steps[6], "7. GST: GST at 10% on $1200.00 = $120.00");
        assert_eq!(result.steps[7], "8. Total amount: $1200.00 + $120.00 = $1320.00");
        assert_eq!(result.steps[8], "9. Savings: $60.00 compared with general duty");
    }

    /// ENG-008: negative customs value is rejected
    #[test]
    fn test_negative_value_rejected() {
        let result = engine(wine_tables()).calculate(&input("2204210000", "NZL", "-1.00"));

        match result {
            Err(EngineError::Validation { field, .. }) => assert_eq!(field, "customs_value"),
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    /// ENG-009: duty lookup failures degrade to absent with warnings
    #[test]
    fn test_lookup_failures_downgraded() {
        let repository = FailingRepository {
            inner: InMemoryRateRepository::new(wine_tables()),
            failing: vec!["general_rate", "fta_rate", "exemption", "anti_dumping"],
        };
        let result = DutyEngine::new(repository)
            .calculate(&input("2204210000", "NZL", "1200.00"))
            .unwrap();

        assert!(result.general_duty.is_none());
        assert!(result.fta_duty.is_none());
        assert!(result.tco_exemption.is_none());
        assert!(result.anti_dumping_duty.is_none());
        assert_eq!(result.warnings.len(), 4);
        assert!(result.warnings[0].starts_with("General duty lookup failed"));
        assert_eq!(result.total_duty, dec("0.00"));
        assert_eq!(result.total_gst, dec("120.00"));
    }

    /// ENG-010: GST lookup failure aborts
    #[test]
    fn test_gst_failure_aborts() {
        let repository = FailingRepository {
            inner: InMemoryRateRepository::new(wine_tables()),
            failing: vec!["gst_provisions"],
        };
        let result = DutyEngine::new(repository).calculate(&input("2204210000", "NZL", "1200.00"));

        match result {
            Err(EngineError::GstUnavailable { code, message }) => {
                assert_eq!(code, "2204210000");
                assert!(message.contains("connection refused"));
            }
            other => panic!("Expected GstUnavailable error, got {:?}", other),
        }
    }

    /// ENG-011: FTA quota and origin rule produce messaging
    #[test]
    fn test_fta_compliance_messages() {
        let mut kafta = preference("8471", "KAFTA", "KOR", "2");
        kafta.quota_quantity = Some(dec("5000"));
        kafta.origin_rule = Some("Change in tariff heading".to_string());
        let tables = TariffTables {
            general_rates: vec![ad_valorem("8471", "5")],
            fta_rates: vec![kafta],
            ..TariffTables::default()
        };
        let result = engine(tables)
            .calculate(&input("84713000", "KOR", "1000.00"))
            .unwrap();

        assert_eq!(
            result.compliance_notes,
            vec!["KAFTA rule of origin must be met: Change in tariff heading"]
        );
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("quota of 5000"));
    }

    /// ENG-012: FTA messaging only when the FTA is selected
    #[test]
    fn test_fta_messages_skipped_when_general_selected() {
        let mut pricey = preference("8471", "KAFTA", "KOR", "7");
        pricey.quota_quantity = Some(dec("5000"));
        pricey.origin_rule = Some("Change in tariff heading".to_string());
        let tables = TariffTables {
            general_rates: vec![ad_valorem("8471", "5")],
            fta_rates: vec![pricey],
            ..TariffTables::default()
        };
        let result = engine(tables)
            .calculate(&input("84713000", "KOR", "1000.00"))
            .unwrap();

        assert_eq!(result.best_rate_type, BestRateType::General);
        assert!(result.compliance_notes.is_empty());
        assert!(result.warnings.is_empty());
    }

    /// ENG-013: TCO expiring within the window warns
    #[test]
    fn test_tco_expiry_warning() {
        let tables = TariffTables {
            general_rates: vec![ad_valorem("8479", "5")],
            exemptions: vec![tco("8479899000", "TC 2345678", Some(date(2026, 4, 15)))],
            ..TariffTables::default()
        };
        let result = engine(tables)
            .calculate(&input("8479899000", "USA", "2000.00"))
            .unwrap();

        assert_eq!(result.warnings.len(), 1);
        assert_eq!(
            result.warnings[0],
            "TC 2345678 expires on 2026-04-15 (45 days remaining)"
        );
    }

    /// ENG-014: custom settings drive GST
    #[test]
    fn test_custom_gst_settings() {
        let settings = EngineSettings {
            gst_rate: dec("0.15"),
            gst_threshold: dec("0"),
            ..EngineSettings::default()
        };
        let engine = DutyEngine::with_settings(InMemoryRateRepository::default(), settings);
        let result = engine.calculate(&input("0101210000", "USA", "100.00")).unwrap();

        assert_eq!(result.total_gst, dec("15.00"));
    }

    /// ENG-015: explain reshapes the same result
    #[test]
    fn test_explain_matches_calculate() {
        let engine = engine(wine_tables());
        let entry = input("2204210000", "NZL", "1200.00");

        let result = engine.calculate(&entry).unwrap();
        let report = engine.explain(&entry).unwrap();

        assert_eq!(report.steps, result.steps);
        assert_eq!(report.totals["total_amount"], "$1320.00");
        assert_eq!(report.potential_savings, "$60.00");
        assert!(report.components.contains_key("FTA Duty"));
    }

    /// ENG-016: repeated calculation is identical
    #[test]
    fn test_idempotent() {
        let engine = engine(wine_tables());
        let entry = input("2204210000", "NZL", "1200.00");

        let first = serde_json::to_string(&engine.calculate(&entry).unwrap()).unwrap();
        let second = serde_json::to_string(&engine.calculate(&entry).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    /// ENG-017: TCO and anti-dumping match the exact code only
    #[test]
    fn test_exact_code_lookups_do_not_fall_back() {
        let tables = TariffTables {
            general_rates: vec![ad_valorem("7208", "5")],
            exemptions: vec![tco("7208", "TC 1111111", None)],
            anti_dumping_rates: vec![anti_dumping("7208", "CHN", "23.6")],
            ..TariffTables::default()
        };
        let result = engine(tables)
            .calculate(&input("7208510000", "CHN", "1000.00"))
            .unwrap();

        let general = result.general_duty.as_ref().unwrap();
        assert_eq!(general.details["matched_code"], "7208");
        assert_eq!(general.amount, dec("50.00"));
        assert!(result.tco_exemption.is_none());
        assert!(result.anti_dumping_duty.is_none());
        assert_eq!(result.best_rate_type, BestRateType::General);
        assert_eq!(result.total_duty, dec("50.00"));
    }

    /// ENG-018: a blank exporter name gets the country-wide measure
    #[test]
    fn test_blank_exporter_uses_country_measure() {
        let mut exporter_measure = anti_dumping("7208510000", "CHN", "10");
        exporter_measure.exporter_name = Some("Acme Steel Co".to_string());
        let tables = TariffTables {
            anti_dumping_rates: vec![exporter_measure, anti_dumping("7208510000", "CHN", "20")],
            ..TariffTables::default()
        };
        let entry = input("7208510000", "CHN", "1000.00").with_exporter("");
        let result = engine(tables).calculate(&entry).unwrap();

        assert_eq!(result.anti_dumping_duty.as_ref().unwrap().amount, dec("200.00"));
    }

    /// ENG-019: customs values beyond the accepted range are rejected, not overflowed
    #[test]
    fn test_oversized_customs_value_rejected() {
        let tables = TariffTables {
            general_rates: vec![ad_valorem("8471", "5")],
            ..TariffTables::default()
        };
        let engine = engine(tables);

        let oversized = CalculationInput::new("84713000", "USA", Decimal::MAX).on_date(today());
        match engine.calculate(&oversized) {
            Err(EngineError::Validation { field, .. }) => assert_eq!(field, "customs_value"),
            other => panic!("Expected Validation error, got {:?}", other),
        }

        let largest = CalculationInput::new("84713000", "USA", Decimal::from(MAX_CUSTOMS_VALUE))
            .on_date(today());
        let result = engine.calculate(&largest).unwrap();
        assert_eq!(result.total_duty, dec("50000000000000.00"));
        assert_eq!(result.total_amount, dec("1155000000000000.00"));
    }

    proptest! {
        #[test]
        fn prop_totals_are_consistent(
            cents in 0i64..100_000_000,
            general_pct in 0u32..30,
            fta_pct in 0u32..30,
            ad_pct in 0u32..50,
        ) {
            let tables = TariffTables {
                general_rates: vec![ad_valorem("8471", &general_pct.to_string())],
                fta_rates: vec![preference("8471", "KAFTA", "KOR", &fta_pct.to_string())],
                anti_dumping_rates: vec![anti_dumping("8471300000", "KOR", &ad_pct.to_string())],
                ..TariffTables::default()
            };
            let value = Decimal::new(cents, 2);
            let entry = CalculationInput::new("8471300000", "KOR", value).on_date(today());
            let result = engine(tables).calculate(&entry).unwrap();

            prop_assert_eq!(result.duty_inclusive_value, result.customs_value + result.total_duty);
            prop_assert_eq!(result.total_amount, result.duty_inclusive_value + result.total_gst);
            prop_assert!(result.total_duty >= result.anti_dumping_duty.as_ref().unwrap().amount);
            prop_assert!(result.potential_savings >= Decimal::ZERO);
            prop_assert_eq!(result.total_duty.scale(), 2);
        }
    }
}
