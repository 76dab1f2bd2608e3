//! Sinks for defects found by the checkers

use super::types::ValidationError;

/// Receives defects as they are found and answers cancellation checkpoints
pub trait Reporter {
    /// Publish one defect
    fn report(&mut self, error: ValidationError);

    /// Read at every checkpoint; `true` stops the walk
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Collects every defect in emission order; never cancels
#[derive(Debug, Default)]
pub struct CollectingReporter {
    errors: Vec<ValidationError>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }
}

impl Reporter for CollectingReporter {
    fn report(&mut self, error: ValidationError) {
        self.errors.push(error);
    }
}

/// Marker for a walk stopped at a cancellation checkpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Interrupted;

pub(crate) type Step<T = ()> = Result<T, Interrupted>;

/// Cancellation checkpoint
pub(crate) fn checkpoint<R: Reporter + ?Sized>(reporter: &R) -> Step {
    if reporter.is_cancelled() {
        Err(Interrupted)
    } else {
        Ok(())
    }
}
