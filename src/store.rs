//! Persistent key-value store contract
//!
//! The host supplies the actual backing (browser LocalStorage, a file,
//! anything); the shell only needs string get/set. Every typed accessor is
//! read-modify-write and tolerant of absent or corrupt values, which are
//! treated as their type-appropriate default rather than surfaced as errors.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// String key-value backing supplied by the host.
pub trait KvStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// In-process store for tests, the demo binary, and headless hosts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    map: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        let _ = self.map.insert(key.to_string(), value.to_string());
    }
}

/// Store keys for one game instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub best: String,
    pub runs: String,
    pub metrics: String,
    pub sound: String,
}

impl StorageKeys {
    /// Conventional `<game>_<field>_v1` key set.
    pub fn prefixed(prefix: &str) -> Self {
        Self {
            best: format!("{prefix}_best_v1"),
            runs: format!("{prefix}_runs_v1"),
            metrics: format!("{prefix}_metrics_v1"),
            sound: format!("{prefix}_sound_v1"),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let keys = [&self.best, &self.runs, &self.metrics, &self.sound];
        if keys.iter().any(|k| k.is_empty()) {
            return Err(ConfigError::InvalidStorageKeys);
        }
        for (i, a) in keys.iter().enumerate() {
            if keys[i + 1..].contains(a) {
                return Err(ConfigError::InvalidStorageKeys);
            }
        }
        Ok(())
    }
}

/// Continue-funnel counters, all monotonically incrementing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunnelMetrics {
    #[serde(default)]
    pub continue_offered: u32,
    #[serde(default)]
    pub continue_clicked: u32,
    #[serde(default)]
    pub continue_completed: u32,
    #[serde(default)]
    pub continue_granted: u32,
}

impl FunnelMetrics {
    fn pct(n: u32, den: u32) -> f32 {
        if den == 0 {
            0.0
        } else {
            n as f32 / den as f32 * 100.0
        }
    }

    /// Offer-to-click, click-to-complete and offer-to-complete percentages.
    pub fn summary(&self) -> (f32, f32, f32) {
        (
            Self::pct(self.continue_clicked, self.continue_offered),
            Self::pct(self.continue_completed, self.continue_clicked),
            Self::pct(self.continue_completed, self.continue_offered),
        )
    }
}

/// Funnel stage being recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunnelStage {
    Offered,
    Clicked,
    Completed,
    Granted,
}

/// Typed accessors over the host's key-value backing.
pub struct Store {
    kv: Box<dyn KvStore>,
    keys: StorageKeys,
}

impl Store {
    pub fn new(kv: Box<dyn KvStore>, keys: StorageKeys) -> Self {
        Self { kv, keys }
    }

    fn read_u32(&self, key: &str) -> u32 {
        self.kv
            .get(key)
            .and_then(|s| s.trim().parse::<u32>().ok())
            .unwrap_or(0)
    }

    /// Best score ever committed (0 when absent or corrupt).
    pub fn best(&self) -> u32 {
        self.read_u32(&self.keys.best)
    }

    /// Commit a new best if it improves on the stored one.
    pub fn record_best(&mut self, score: u32) -> bool {
        if score > self.best() {
            let key = self.keys.best.clone();
            self.kv.set(&key, &score.to_string());
            log::info!("new best score: {score}");
            true
        } else {
            false
        }
    }

    /// Lifetime run counter.
    pub fn runs(&self) -> u32 {
        self.read_u32(&self.keys.runs)
    }

    pub fn increment_runs(&mut self) -> u32 {
        let n = self.runs().saturating_add(1);
        let key = self.keys.runs.clone();
        self.kv.set(&key, &n.to_string());
        n
    }

    /// Sound preference, enabled by default.
    pub fn sound_enabled(&self) -> bool {
        match self.kv.get(&self.keys.sound) {
            Some(v) => v == "1",
            None => true,
        }
    }

    pub fn set_sound_enabled(&mut self, on: bool) {
        let key = self.keys.sound.clone();
        self.kv.set(&key, if on { "1" } else { "0" });
    }

    /// Current funnel counters (defaults when absent or corrupt).
    pub fn metrics(&self) -> FunnelMetrics {
        self.kv
            .get(&self.keys.metrics)
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    /// Increment one funnel counter and persist the record.
    pub fn bump(&mut self, stage: FunnelStage) {
        let mut m = self.metrics();
        match stage {
            FunnelStage::Offered => m.continue_offered += 1,
            FunnelStage::Clicked => m.continue_clicked += 1,
            FunnelStage::Completed => m.continue_completed += 1,
            FunnelStage::Granted => m.continue_granted += 1,
        }
        if let Ok(json) = serde_json::to_string(&m) {
            let key = self.keys.metrics.clone();
            self.kv.set(&key, &json);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Store {
        Store::new(Box::new(MemoryStore::new()), StorageKeys::prefixed("test"))
    }

    #[test]
    fn test_absent_values_default() {
        let s = store();
        assert_eq!(s.best(), 0);
        assert_eq!(s.runs(), 0);
        assert!(s.sound_enabled());
        assert_eq!(s.metrics(), FunnelMetrics::default());
    }

    #[test]
    fn test_corrupt_values_default() {
        let mut kv = MemoryStore::new();
        kv.set("test_best_v1", "not a number");
        kv.set("test_metrics_v1", "{broken json");
        let s = Store::new(Box::new(kv), StorageKeys::prefixed("test"));
        assert_eq!(s.best(), 0);
        assert_eq!(s.metrics(), FunnelMetrics::default());
    }

    #[test]
    fn test_partial_metrics_record_fills_defaults() {
        let mut kv = MemoryStore::new();
        kv.set("test_metrics_v1", r#"{"continue_offered": 3}"#);
        let s = Store::new(Box::new(kv), StorageKeys::prefixed("test"));
        let m = s.metrics();
        assert_eq!(m.continue_offered, 3);
        assert_eq!(m.continue_granted, 0);
    }

    #[test]
    fn test_record_best_only_improves() {
        let mut s = store();
        assert!(s.record_best(10));
        assert!(!s.record_best(5));
        assert!(!s.record_best(10));
        assert!(s.record_best(11));
        assert_eq!(s.best(), 11);
    }

    #[test]
    fn test_funnel_bumps_persist() {
        let mut s = store();
        s.bump(FunnelStage::Offered);
        s.bump(FunnelStage::Offered);
        s.bump(FunnelStage::Clicked);
        let m = s.metrics();
        assert_eq!(m.continue_offered, 2);
        assert_eq!(m.continue_clicked, 1);
        let (offer_click, _, _) = m.summary();
        assert!((offer_click - 50.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_sound_round_trip() {
        let mut s = store();
        s.set_sound_enabled(false);
        assert!(!s.sound_enabled());
        s.set_sound_enabled(true);
        assert!(s.sound_enabled());
    }

    #[test]
    fn test_runs_counter() {
        let mut s = store();
        assert_eq!(s.increment_runs(), 1);
        assert_eq!(s.increment_runs(), 2);
        assert_eq!(s.runs(), 2);
    }
}
