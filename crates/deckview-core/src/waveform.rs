//! Waveform summary: the low-resolution amplitude data behind the overview
//!
//! The summary is written by a background analyzer and read by the UI thread.
//! Entries are interleaved stereo (left, right, left, right...), so one
//! display column covers two entries. The analyzer fills entries front to
//! back and bumps `completion` after each batch; readers only look at
//! entries below the completion count.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{RwLock, RwLockReadGuard};

/// Band-filtered amplitudes of one summary entry (0-255 each)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WaveformData {
    pub low: u8,
    pub mid: u8,
    pub high: u8,
    /// Unfiltered amplitude
    pub all: u8,
}

impl WaveformData {
    pub const fn new(low: u8, mid: u8, high: u8, all: u8) -> Self {
        Self { low, mid, high, all }
    }
}

/// Precomputed amplitude summary of a whole track
#[derive(Debug)]
pub struct WaveformSummary {
    data: RwLock<Vec<WaveformData>>,
    completion: AtomicUsize,
}

impl WaveformSummary {
    /// Create an empty summary with room for `columns` stereo columns
    pub fn new(columns: usize) -> Self {
        Self {
            data: RwLock::new(vec![WaveformData::default(); columns * 2]),
            completion: AtomicUsize::new(0),
        }
    }

    /// Create an already complete summary from interleaved entries
    pub fn from_data(mut data: Vec<WaveformData>) -> Self {
        // Odd tails cannot form a column
        if data.len() % 2 != 0 {
            data.pop();
        }
        let len = data.len();
        Self {
            data: RwLock::new(data),
            completion: AtomicUsize::new(len),
        }
    }

    /// Number of interleaved entries
    pub fn data_size(&self) -> usize {
        self.read().len()
    }

    /// Number of entries analyzed so far
    pub fn completion(&self) -> usize {
        self.completion.load(Ordering::Acquire)
    }

    pub fn is_complete(&self) -> bool {
        self.completion() == self.data_size()
    }

    /// Write one entry. Out-of-range writes are ignored.
    pub fn write(&self, index: usize, value: WaveformData) {
        let mut data = self.data.write().unwrap_or_else(|e| e.into_inner());
        if let Some(slot) = data.get_mut(index) {
            *slot = value;
        }
    }

    /// Publish that entries `[0, completion)` are valid
    pub fn set_completion(&self, completion: usize) {
        let clamped = completion.min(self.data_size());
        self.completion.store(clamped, Ordering::Release);
    }

    /// Read access to the entries
    pub fn read(&self) -> RwLockReadGuard<'_, Vec<WaveformData>> {
        self.data.read().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_summary_is_empty_but_sized() {
        let summary = WaveformSummary::new(100);
        assert_eq!(summary.data_size(), 200);
        assert_eq!(summary.completion(), 0);
        assert!(!summary.is_complete());
    }

    #[test]
    fn test_from_data_is_complete() {
        let summary = WaveformSummary::from_data(vec![WaveformData::new(1, 2, 3, 4); 10]);
        assert_eq!(summary.data_size(), 10);
        assert!(summary.is_complete());
    }

    #[test]
    fn test_from_data_drops_odd_tail() {
        let summary = WaveformSummary::from_data(vec![WaveformData::default(); 7]);
        assert_eq!(summary.data_size(), 6);
        assert!(summary.is_complete());
    }

    #[test]
    fn test_completion_clamped_to_size() {
        let summary = WaveformSummary::new(4);
        summary.set_completion(100);
        assert_eq!(summary.completion(), 8);
        assert!(summary.is_complete());
    }

    #[test]
    fn test_out_of_range_write_ignored() {
        let summary = WaveformSummary::new(1);
        summary.write(5, WaveformData::new(9, 9, 9, 9));
        summary.write(1, WaveformData::new(1, 1, 1, 1));
        let data = summary.read();
        assert_eq!(data[0], WaveformData::default());
        assert_eq!(data[1], WaveformData::new(1, 1, 1, 1));
    }
}
