//! Synthetic waveform analyzer
//!
//! Stands in for a real analysis pipeline: a background thread fills the
//! track's waveform summary column by column and streams progress over an
//! mpsc channel, the same way a real analyzer would report to the UI.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use deckview_core::{AnalyzerEvent, AnalyzerProgress, TrackPointer, WaveformData, WaveformSummary};
use deckview_widgets::SharedReceiver;

/// Number of progress updates per analysis
const ANALYSIS_STEPS: usize = 40;

/// Progress reported once every column is written
const COLUMNS_DONE_PROGRESS: f64 = 0.9;

/// Background analyzer for one deck
pub struct DemoAnalyzer {
    sender: Sender<AnalyzerEvent>,
    receiver: SharedReceiver<AnalyzerEvent>,
    step_delay: Duration,
    /// Cancellation flag of the running job
    running: Option<Arc<AtomicBool>>,
}

impl DemoAnalyzer {
    pub fn new(step_delay: Duration) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver: Arc::new(Mutex::new(receiver)),
            step_delay,
            running: None,
        }
    }

    /// Progress events of every job started by this analyzer
    pub fn events(&self) -> SharedReceiver<AnalyzerEvent> {
        Arc::clone(&self.receiver)
    }

    /// Analyze `track` in the background, cancelling the previous job
    pub fn analyze(&mut self, track: TrackPointer, columns: usize) {
        self.cancel();

        let cancelled = Arc::new(AtomicBool::new(false));
        self.running = Some(Arc::clone(&cancelled));
        let job = AnalysisJob {
            track,
            columns,
            sender: self.sender.clone(),
            step_delay: self.step_delay,
            cancelled,
        };

        let spawned = thread::Builder::new()
            .name("demo-analyzer".to_string())
            .spawn(move || job.run());
        if let Err(e) = spawned {
            log::error!("DemoAnalyzer: Failed to spawn analyzer thread: {}", e);
        }
    }

    pub fn cancel(&mut self) {
        if let Some(flag) = self.running.take() {
            flag.store(true, Ordering::Relaxed);
        }
    }
}

impl Drop for DemoAnalyzer {
    fn drop(&mut self) {
        self.cancel();
    }
}

struct AnalysisJob {
    track: TrackPointer,
    columns: usize,
    sender: Sender<AnalyzerEvent>,
    step_delay: Duration,
    cancelled: Arc<AtomicBool>,
}

impl AnalysisJob {
    fn report(&self, progress: AnalyzerProgress) -> bool {
        let event = AnalyzerEvent {
            track_id: self.track.id(),
            progress,
        };
        // Receiver gone: the UI has shut down
        self.sender.send(event).is_ok()
    }

    fn should_stop(&self) -> bool {
        if self.cancelled.load(Ordering::Relaxed) {
            log::debug!("DemoAnalyzer: Analysis of track {} cancelled", self.track.id());
            return true;
        }
        false
    }

    fn run(self) {
        let id = self.track.id();
        log::info!("DemoAnalyzer: Analyzing track {} ({} columns)", id, self.columns);

        let summary = Arc::new(WaveformSummary::new(self.columns));
        self.track.set_waveform_summary(Some(Arc::clone(&summary)));
        if !self.report(AnalyzerProgress::NONE) {
            return;
        }

        let chunk = self.columns.div_ceil(ANALYSIS_STEPS).max(1);
        let mut column = 0;
        while column < self.columns {
            if self.should_stop() {
                return;
            }
            let end = (column + chunk).min(self.columns);
            for c in column..end {
                let (left, right) = synthetic_column(c, self.columns);
                summary.write(2 * c, left);
                summary.write(2 * c + 1, right);
            }
            summary.set_completion(2 * end);
            column = end;

            let fraction = column as f64 / self.columns as f64;
            if !self.report(AnalyzerProgress(fraction * COLUMNS_DONE_PROGRESS)) {
                return;
            }
            thread::sleep(self.step_delay);
        }

        if self.should_stop() || !self.report(AnalyzerProgress::FINALIZING) {
            return;
        }
        thread::sleep(self.step_delay * 4);
        if self.should_stop() {
            return;
        }

        self.track.notify_waveform_summary_updated();
        self.report(AnalyzerProgress::DONE);
        log::info!("DemoAnalyzer: Track {} done", id);
    }
}

/// Deterministic stereo column of a fake dance track
///
/// Four-on-the-floor kicks in the low band, a slowly swelling mid band and
/// hats in the highs, faded in and out over the first and last eighth.
pub fn synthetic_column(column: usize, columns: usize) -> (WaveformData, WaveformData) {
    let t = column as f64 / columns.max(1) as f64;
    let envelope = (t * 8.0).min((1.0 - t) * 8.0).clamp(0.0, 1.0);
    let kick = if column % 16 < 3 { 1.0 } else { 0.55 };
    let swell = 0.6 + 0.4 * (t * 37.0).sin().abs();

    let channel = |phase: f64| {
        let low = envelope * kick * 170.0;
        let mid = envelope * swell * 110.0;
        let high = envelope * (0.5 + 0.5 * (t * 211.0 + phase).sin().abs()) * 60.0;
        let all = low.max(mid).max(high) * 1.1;
        WaveformData::new(
            low.min(255.0) as u8,
            mid.min(255.0) as u8,
            high.min(255.0) as u8,
            all.min(255.0) as u8,
        )
    };
    (channel(0.0), channel(1.3))
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckview_core::{Track, TrackId};

    #[test]
    fn test_synthetic_column_shape() {
        let (left, right) = synthetic_column(0, 1000);
        assert_eq!(left.low, 0, "Fade-in starts silent");
        assert_eq!(right.all, 0);

        let (left, _) = synthetic_column(496, 1000);
        assert!(left.low > left.mid && left.mid > 0);
        assert!(left.all >= left.low, "All band covers the loudest band");
    }

    #[test]
    fn test_job_fills_summary_and_reports_done() {
        let (sender, receiver) = mpsc::channel();
        let track = Arc::new(Track::new(TrackId(3), "/music/demo.wav"));
        let job = AnalysisJob {
            track: Arc::clone(&track),
            columns: 100,
            sender,
            step_delay: Duration::ZERO,
            cancelled: Arc::new(AtomicBool::new(false)),
        };
        job.run();

        let summary = track.waveform_summary().unwrap();
        assert!(summary.is_complete());

        let events: Vec<AnalyzerEvent> = receiver.try_iter().collect();
        assert_eq!(events.first().unwrap().progress, AnalyzerProgress::NONE);
        assert_eq!(events.last().unwrap().progress, AnalyzerProgress::DONE);
        assert!(events.iter().all(|e| e.track_id == TrackId(3)));
        assert!(
            events.windows(2).all(|w| w[0].progress <= w[1].progress),
            "Progress never goes backwards"
        );
    }

    #[test]
    fn test_cancelled_job_stops_early() {
        let (sender, receiver) = mpsc::channel();
        let track = Arc::new(Track::new(TrackId(4), "/music/demo.wav"));
        let job = AnalysisJob {
            track: Arc::clone(&track),
            columns: 100,
            sender,
            step_delay: Duration::ZERO,
            cancelled: Arc::new(AtomicBool::new(true)),
        };
        job.run();

        let summary = track.waveform_summary().unwrap();
        assert!(!summary.is_complete());
        let events: Vec<AnalyzerEvent> = receiver.try_iter().collect();
        assert_eq!(events.len(), 1, "Only the start was reported");
    }
}
