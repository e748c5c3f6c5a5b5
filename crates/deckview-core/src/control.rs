//! Typed playback controls
//!
//! Numeric deck parameters (play position, rate, track length...) live in a
//! registry keyed by `(group, item)`. Widgets never look values up by string
//! at runtime: they resolve the handles they need once, at construction, and
//! keep the typed [`ControlHandle`]s.
//!
//! Values are stored as `f64` bit patterns in an `AtomicU64`, so the engine
//! thread can publish without taking a lock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use thiserror::Error;

/// Errors raised when resolving controls
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControlError {
    #[error("Unknown control: {group},{item}")]
    UnknownControl { group: String, item: String },
}

pub type Result<T> = std::result::Result<T, ControlError>;

/// Address of a control: deck group plus item name, e.g. `[Channel1]`,`playposition`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ControlKey {
    pub group: String,
    pub item: String,
}

impl ControlKey {
    pub fn new(group: impl Into<String>, item: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            item: item.into(),
        }
    }
}

impl std::fmt::Display for ControlKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.group, self.item)
    }
}

#[derive(Debug)]
struct ControlCell {
    key: ControlKey,
    bits: AtomicU64,
}

/// Shared handle to one numeric control
#[derive(Debug, Clone)]
pub struct ControlHandle {
    cell: Arc<ControlCell>,
}

impl ControlHandle {
    /// Create a free-standing control (not registered anywhere)
    pub fn new(key: ControlKey, value: f64) -> Self {
        Self {
            cell: Arc::new(ControlCell {
                key,
                bits: AtomicU64::new(value.to_bits()),
            }),
        }
    }

    pub fn key(&self) -> &ControlKey {
        &self.cell.key
    }

    pub fn get(&self) -> f64 {
        f64::from_bits(self.cell.bits.load(Ordering::Acquire))
    }

    /// Store a new value, returning whether it changed
    pub fn set(&self, value: f64) -> bool {
        let previous = self.cell.bits.swap(value.to_bits(), Ordering::AcqRel);
        previous != value.to_bits()
    }

    /// Two handles address the same control
    pub fn same_control(&self, other: &ControlHandle) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }
}

/// Registry resolving control keys to shared handles
#[derive(Debug, Default)]
pub struct ControlRegistry {
    controls: HashMap<ControlKey, ControlHandle>,
}

impl ControlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a control with its default value.
    ///
    /// Registering an existing key returns the existing handle unchanged.
    pub fn register(&mut self, key: ControlKey, default: f64) -> ControlHandle {
        self.controls
            .entry(key.clone())
            .or_insert_with(|| ControlHandle::new(key, default))
            .clone()
    }

    /// Resolve a registered control
    pub fn get(&self, key: &ControlKey) -> Result<ControlHandle> {
        self.controls
            .get(key)
            .cloned()
            .ok_or_else(|| ControlError::UnknownControl {
                group: key.group.clone(),
                item: key.item.clone(),
            })
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_reports_change() {
        let handle = ControlHandle::new(ControlKey::new("[Channel1]", "rate"), 0.0);
        assert!(handle.set(0.5));
        assert!(!handle.set(0.5));
        assert_eq!(handle.get(), 0.5);
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = ControlRegistry::new();
        let a = registry.register(ControlKey::new("[Channel1]", "track_samples"), 0.0);
        a.set(1000.0);
        let b = registry.register(ControlKey::new("[Channel1]", "track_samples"), 5.0);
        assert!(a.same_control(&b));
        assert_eq!(b.get(), 1000.0);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unknown_control_error() {
        let registry = ControlRegistry::new();
        let err = registry
            .get(&ControlKey::new("[Channel9]", "rate"))
            .unwrap_err();
        assert_eq!(
            err,
            ControlError::UnknownControl {
                group: "[Channel9]".to_string(),
                item: "rate".to_string()
            }
        );
        assert_eq!(err.to_string(), "Unknown control: [Channel9],rate");
    }
}
