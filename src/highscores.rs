//! High score persistence
//!
//! The only gameplay value that survives a page reload: a single best-score
//! record kept in LocalStorage.

use serde::{Deserialize, Serialize};

/// The persisted best-score record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HighScore {
    pub score: u64,
    /// Boss cycle reached when the score was set
    pub cycle: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

impl HighScore {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "nova_strike_highscore";

    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a finished run beats the record
    pub fn qualifies(&self, score: u64) -> bool {
        score > 0 && score > self.score
    }

    /// Record a finished run. Returns true if the record was beaten.
    pub fn submit(&mut self, score: u64, cycle: u32, timestamp: f64) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.score = score;
        self.cycle = cycle;
        self.timestamp = timestamp;
        true
    }

    pub fn is_set(&self) -> bool {
        self.score > 0
    }

    /// Load the record from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(record) = serde_json::from_str::<HighScore>(&json) {
                    log::info!("Loaded high score: {}", record.score);
                    return record;
                }
            }
        }

        log::info!("No high score found, starting fresh");
        Self::new()
    }

    /// Save the record to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("High score saved ({})", self.score);
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
