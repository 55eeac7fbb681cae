//! Hierarchical classification code resolution.
//!
//! Duty schedules are published at coarser code granularities than the codes
//! goods are entered under, so a rate at a 4 or 6-digit heading applies to all
//! of its 8 and 10-digit children. The resolver tries the exact code first and
//! then each shorter level once, longest first.

use tracing::debug;

use crate::error::LookupResult;

/// Code lengths tried after the exact code, longest first.
pub const HIERARCHY_LEVELS: [usize; 4] = [8, 6, 4, 2];

/// A record found by hierarchical resolution, with the code level it matched at.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeMatch<T> {
    /// The matching record.
    pub record: T,
    /// The (possibly truncated) code the record was found under.
    pub matched_code: String,
    /// Whether the match was on the full input code.
    pub exact: bool,
}

/// Returns the codes to try for `code`: the code itself, then each shorter level.
///
/// Only levels strictly shorter than the input are included.
///
/// # Examples
///
/// ```
/// use duty_engine::calculation::candidate_codes;
///
/// assert_eq!(candidate_codes("2204210000"), vec!["2204210000", "22042100", "220421", "2204", "22"]);
/// assert_eq!(candidate_codes("847130"), vec!["847130", "8471", "84"]);
/// ```
pub fn candidate_codes(code: &str) -> Vec<&str> {
    let mut candidates = vec![code];
    candidates.extend(
        HIERARCHY_LEVELS
            .iter()
            .filter(|&&len| len < code.len())
            .filter_map(|&len| code.get(..len)),
    );
    candidates
}

/// Finds the most specific record for `code`.
///
/// `lookup` is called with each candidate code in turn until it returns a
/// record. A lookup failure at any level stops the search and is returned.
pub fn resolve_hierarchical<T, F>(code: &str, mut lookup: F) -> LookupResult<Option<CodeMatch<T>>>
where
    F: FnMut(&str) -> LookupResult<Option<T>>,
{
    for candidate in candidate_codes(code) {
        if let Some(record) = lookup(candidate)? {
            let exact = candidate == code;
            debug!(code, matched_code = candidate, exact, "Resolved code level");
            return Ok(Some(CodeMatch {
                record,
                matched_code: candidate.to_string(),
                exact,
            }));
        }
    }

    debug!(code, "No code level matched");
    Ok(None)
}
