//! Calculation explanation accumulator.
//!
//! Collects the ordered step log, compliance notes and warnings during one
//! calculation. It is owned by a single calculation and consumed when the
//! result is assembled.

use tracing::warn;

/// The explanation accumulated over one calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Explanation {
    steps: Vec<String>,
    compliance_notes: Vec<String>,
    warnings: Vec<String>,
}

impl Explanation {
    /// Creates an empty explanation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a numbered step, e.g. `"3. TCO exemption: none found"`.
    pub fn step(&mut self, text: impl AsRef<str>) {
        let number = self.steps.len() + 1;
        self.steps.push(format!("{}. {}", number, text.as_ref()));
    }

    /// Appends a compliance note.
    pub fn note(&mut self, text: impl Into<String>) {
        self.compliance_notes.push(text.into());
    }

    /// Appends a warning and logs it.
    pub fn warn(&mut self, text: impl Into<String>) {
        let text = text.into();
        warn!(warning = %text, "Calculation warning");
        self.warnings.push(text);
    }

    /// The steps recorded so far.
    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    /// Consumes the explanation, returning `(steps, compliance_notes, warnings)`.
    pub fn finish(self) -> (Vec<String>, Vec<String>, Vec<String>) {
        (self.steps, self.compliance_notes, self.warnings)
    }
}
