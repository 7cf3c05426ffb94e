//! Accumulated data-quality findings for one build.
//!
//! Every stage pushes its warnings and errors here instead of failing; the
//! caller inspects the finished context to judge input quality.  Messages
//! are mirrored to the `log` facade as they arrive, so a subscriber sees
//! them live while the context keeps the full record.

/// Warning/error accumulator threaded through every pipeline stage.
#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    /// Region the findings belong to, prefixed onto every log line.
    pub region: String,
    warnings: Vec<String>,
    errors: Vec<String>,
}

impl Diagnostics {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            ..Self::default()
        }
    }

    /// Record a recoverable data-quality finding (a default was applied).
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("[{}] {message}", self.region);
        self.warnings.push(message);
    }

    /// Record a structural anomaly (the affected piece was skipped).
    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::error!("[{}] {message}", self.region);
        self.errors.push(message);
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// True when nothing was recorded.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.errors.is_empty()
    }
}
