//! In-memory rate repository.
//!
//! Holds the five rate tables in memory (typically loaded from YAML by
//! [`ConfigLoader`](crate::config::ConfigLoader)) and answers queries with the
//! selection policies from [`crate::calculation`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calculation::{select_anti_dumping, select_best_fta, select_exemption};
use crate::error::LookupResult;
use crate::models::{AntiDumpingRate, ExemptionGrant, GeneralRate, GstProvision, PreferentialRate};

use super::RateRepository;

/// The rate tables backing an [`InMemoryRateRepository`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TariffTables {
    /// General (MFN) rates.
    #[serde(default)]
    pub general_rates: Vec<GeneralRate>,
    /// FTA preferential rates.
    #[serde(default)]
    pub fta_rates: Vec<PreferentialRate>,
    /// Anti-dumping measures.
    #[serde(default)]
    pub anti_dumping_rates: Vec<AntiDumpingRate>,
    /// TCO exemption grants.
    #[serde(default)]
    pub exemptions: Vec<ExemptionGrant>,
    /// GST provisions.
    #[serde(default)]
    pub gst_provisions: Vec<GstProvision>,
}

/// A [`RateRepository`] answering from in-memory tables.
///
/// # Example
///
/// ```
/// use duty_engine::models::{GeneralRate, RateKind};
/// use duty_engine::repository::{InMemoryRateRepository, RateRepository, TariffTables};
/// use rust_decimal::Decimal;
///
/// let repository = InMemoryRateRepository::new(TariffTables {
///     general_rates: vec![GeneralRate {
///         code: "8471".to_string(),
///         percentage_rate: Some(Decimal::from(5)),
///         unit_amount: None,
///         unit: None,
///         kind: RateKind::AdValorem,
///     }],
///     ..TariffTables::default()
/// });
///
/// assert!(repository.find_general_rate("8471").unwrap().is_some());
/// assert!(repository.find_general_rate("84713000").unwrap().is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryRateRepository {
    tables: TariffTables,
}

impl InMemoryRateRepository {
    /// Creates a repository over the given tables.
    pub fn new(tables: TariffTables) -> Self {
        Self { tables }
    }

    /// Returns the underlying tables.
    pub fn tables(&self) -> &TariffTables {
        &self.tables
    }
}

impl RateRepository for InMemoryRateRepository {
    fn find_general_rate(&self, code: &str) -> LookupResult<Option<GeneralRate>> {
        Ok(self
            .tables
            .general_rates
            .iter()
            .find(|rate| rate.code == code)
            .cloned())
    }

    fn find_best_fta_rate(
        &self,
        code: &str,
        country_code: &str,
        date: NaiveDate,
    ) -> LookupResult<Option<PreferentialRate>> {
        let candidates = self.tables.fta_rates.iter().filter(|rate| rate.code == code);
        Ok(select_best_fta(candidates, country_code, date).cloned())
    }

    fn find_exemption(&self, code: &str, date: NaiveDate) -> LookupResult<Option<ExemptionGrant>> {
        let candidates = self.tables.exemptions.iter().filter(|grant| grant.code == code);
        Ok(select_exemption(candidates, date).cloned())
    }

    fn find_anti_dumping_duty(
        &self,
        code: &str,
        country_code: &str,
        exporter_name: Option<&str>,
        date: NaiveDate,
    ) -> LookupResult<Option<AntiDumpingRate>> {
        let candidates = self
            .tables
            .anti_dumping_rates
            .iter()
            .filter(|measure| measure.code == code);
        Ok(select_anti_dumping(candidates, country_code, exporter_name, date).cloned())
    }

    /// Code-specific provisions come first, then general ones, each in table order.
    fn find_gst_provisions(&self, code: &str) -> LookupResult<Vec<GstProvision>> {
        let (specific, general): (Vec<&GstProvision>, Vec<&GstProvision>) = self
            .tables
            .gst_provisions
            .iter()
            .filter(|provision| provision.matches_code(code))
            .partition(|provision| provision.code.is_some());

        Ok(specific.into_iter().chain(general).cloned().collect())
    }
}
