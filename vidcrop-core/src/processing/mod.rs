//! Crop batch processing and backend dispatch.
//!
//! Each file is handled by a small tagged-result state machine: backends
//! are tried in priority order (external encoder first, capture-library
//! writer second) until one yields `Success`.

/// Main batch orchestration logic
pub mod video;

/// Capture-library frame-by-frame fallback writer
pub mod fallback;

pub use video::{process_videos, CropResult};

/// Identifies which backend produced a cropped output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// External ffmpeg re-encode
    ExternalEncoder,
    /// Capture-library frame-by-frame writer (always silent output)
    FallbackWriter,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::ExternalEncoder => write!(f, "ffmpeg encoder"),
            BackendKind::FallbackWriter => write!(f, "capture writer"),
        }
    }
}

/// Tri-state result of one backend attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendOutcome {
    /// The backend produced the expected output file.
    Success,
    /// The backend's preconditions were not met (e.g. tool not on the
    /// path), so it was never run.
    NotAttempted,
    /// The backend ran and failed, with a reason for diagnostics.
    Failed(String),
}

impl BackendOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, BackendOutcome::Success)
    }
}

/// Runs backends in priority order until one succeeds.
///
/// Returns the kind of the winning backend, or `None` when every backend
/// was skipped or failed.
pub(crate) fn first_success(
    backends: Vec<(BackendKind, Box<dyn FnOnce() -> BackendOutcome + '_>)>,
) -> Option<BackendKind> {
    for (kind, run) in backends {
        match run() {
            BackendOutcome::Success => return Some(kind),
            BackendOutcome::NotAttempted => {
                log::info!("{kind} not attempted");
            }
            BackendOutcome::Failed(reason) => {
                log::warn!("{kind} failed: {reason}");
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn backend(
        outcome: BackendOutcome,
        ran: &Cell<bool>,
    ) -> Box<dyn FnOnce() -> BackendOutcome + '_> {
        Box::new(move || {
            ran.set(true);
            outcome
        })
    }

    #[test]
    fn fallback_is_skipped_when_external_succeeds() {
        let external_ran = Cell::new(false);
        let fallback_ran = Cell::new(false);
        let winner = first_success(vec![
            (
                BackendKind::ExternalEncoder,
                backend(BackendOutcome::Success, &external_ran),
            ),
            (
                BackendKind::FallbackWriter,
                backend(BackendOutcome::Success, &fallback_ran),
            ),
        ]);
        assert_eq!(winner, Some(BackendKind::ExternalEncoder));
        assert!(external_ran.get());
        assert!(!fallback_ran.get());
    }

    #[test]
    fn fallback_runs_after_external_failure() {
        let fallback_ran = Cell::new(false);
        let winner = first_success(vec![
            (
                BackendKind::ExternalEncoder,
                Box::new(|| BackendOutcome::Failed("no output file".into())),
            ),
            (
                BackendKind::FallbackWriter,
                backend(BackendOutcome::Success, &fallback_ran),
            ),
        ]);
        assert_eq!(winner, Some(BackendKind::FallbackWriter));
        assert!(fallback_ran.get());
    }

    #[test]
    fn fallback_runs_when_external_was_never_attempted() {
        let fallback_ran = Cell::new(false);
        let winner = first_success(vec![
            (
                BackendKind::ExternalEncoder,
                Box::new(|| BackendOutcome::NotAttempted),
            ),
            (
                BackendKind::FallbackWriter,
                backend(BackendOutcome::Success, &fallback_ran),
            ),
        ]);
        assert_eq!(winner, Some(BackendKind::FallbackWriter));
        assert!(fallback_ran.get());
    }

    #[test]
    fn exhausted_backends_yield_none() {
        let winner = first_success(vec![
            (
                BackendKind::ExternalEncoder,
                Box::new(|| BackendOutcome::NotAttempted),
            ),
            (
                BackendKind::FallbackWriter,
                Box::new(|| BackendOutcome::Failed("no codec".into())),
            ),
        ]);
        assert_eq!(winner, None);
    }
}
