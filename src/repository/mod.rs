//! Rate repository abstraction.
//!
//! The engine reads rate data through [`RateRepository`] and never depends on
//! a particular storage technology. Every query returns a [`LookupResult`] so
//! that "no matching record" and "the store could not answer" stay distinct.

mod memory;

use std::sync::Arc;

use chrono::NaiveDate;

use crate::error::LookupResult;
use crate::models::{AntiDumpingRate, ExemptionGrant, GeneralRate, GstProvision, PreferentialRate};

pub use memory::{InMemoryRateRepository, TariffTables};

/// Read-only queries the engine runs against a rate store.
///
/// `find_general_rate` and `find_best_fta_rate` match a single code level; the
/// engine performs hierarchical fallback itself. `find_exemption` and
/// `find_anti_dumping_duty` are exact-code queries.
pub trait RateRepository: Send + Sync {
    /// The general rate published against exactly `code`.
    fn find_general_rate(&self, code: &str) -> LookupResult<Option<GeneralRate>>;

    /// The lowest valid preferential rate for `code` and `country_code` on `date`.
    fn find_best_fta_rate(
        &self,
        code: &str,
        country_code: &str,
        date: NaiveDate,
    ) -> LookupResult<Option<PreferentialRate>>;

    /// The TCO exemption applying to `code` on `date`.
    fn find_exemption(&self, code: &str, date: NaiveDate) -> LookupResult<Option<ExemptionGrant>>;

    /// The anti-dumping measure applying to `code`, `country_code` and exporter on `date`.
    fn find_anti_dumping_duty(
        &self,
        code: &str,
        country_code: &str,
        exporter_name: Option<&str>,
        date: NaiveDate,
    ) -> LookupResult<Option<AntiDumpingRate>>;

    /// GST provisions for `code`, including general provisions with no code.
    fn find_gst_provisions(&self, code: &str) -> LookupResult<Vec<GstProvision>>;
}

impl<R: RateRepository + ?Sized> RateRepository for Arc<R> {
    fn find_general_rate(&self, code: &str) -> LookupResult<Option<GeneralRate>> {
        (**self).find_general_rate(code)
    }

    fn find_best_fta_rate(
        &self,
        code: &str,
        country_code: &str,
        date: NaiveDate,
    ) -> LookupResult<Option<PreferentialRate>> {
        (**self).find_best_fta_rate(code, country_code, date)
    }

    fn find_exemption(&self, code: &str, date: NaiveDate) -> LookupResult<Option<ExemptionGrant>> {
        (**self).find_exemption(code, date)
    }

    fn find_anti_dumping_duty(
        &self,
        code: &str,
        country_code: &str,
        exporter_name: Option<&str>,
        date: NaiveDate,
    ) -> LookupResult<Option<AntiDumpingRate>> {
        (**self).find_anti_dumping_duty(code, country_code, exporter_name, date)
    }

    fn find_gst_provisions(&self, code: &str) -> LookupResult<Vec<GstProvision>> {
        (**self).find_gst_provisions(code)
    }
}
