//! Analyzer progress notifications
//!
//! A background analyzer streams a completion fraction per track. The
//! overview only shows progress for the track it currently displays.

use crate::types::TrackId;

/// Completion fraction of a background analysis.
///
/// Values in `[0, 1]` are real progress; [`AnalyzerProgress::UNKNOWN`] means
/// no analysis is known to be running for the track.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct AnalyzerProgress(pub f64);

impl AnalyzerProgress {
    pub const UNKNOWN: Self = Self(-1.0);
    pub const NONE: Self = Self(0.0);
    pub const HALF: Self = Self(0.5);
    pub const FINALIZING: Self = Self(0.95);
    pub const DONE: Self = Self(1.0);

    /// Progress is inside the window where the overview draws an indicator
    pub fn is_in_progress(self) -> bool {
        self >= Self::NONE && self < Self::DONE
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for AnalyzerProgress {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

/// One progress notification from the analyzer worker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyzerEvent {
    pub track_id: TrackId,
    pub progress: AnalyzerProgress,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_progress_window() {
        assert!(!AnalyzerProgress::UNKNOWN.is_in_progress());
        assert!(AnalyzerProgress::NONE.is_in_progress());
        assert!(AnalyzerProgress::HALF.is_in_progress());
        assert!(AnalyzerProgress::FINALIZING.is_in_progress());
        assert!(!AnalyzerProgress::DONE.is_in_progress());
    }

    #[test]
    fn test_default_is_unknown() {
        assert_eq!(AnalyzerProgress::default(), AnalyzerProgress::UNKNOWN);
    }
}
