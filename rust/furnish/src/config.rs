// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Layout configuration loaded from environment variables.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::placement::{PlacementConfig, SnapMode, DEFAULT_TIMEOUT};

/// Layout configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Search budget per item in seconds.
    pub timeout_secs: f64,
    /// Cap on validated candidates per item (unbounded if absent).
    pub max_attempts: Option<u32>,
    /// How snapped items are pushed off the wall.
    pub snap_mode: SnapMode,
    /// Base seed; room `i` uses `seed + i`. Entropy-seeded if absent.
    pub seed: Option<u64>,
    /// Furnish independent rooms on the rayon pool.
    pub parallel: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT.as_secs_f64(),
            max_attempts: None,
            snap_mode: SnapMode::Cardinal,
            seed: None,
            parallel: true,
        }
    }
}

impl LayoutConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unparsable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            timeout_secs: lookup("FURNISH_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .filter(|t: &f64| t.is_finite() && *t >= 0.0)
                .unwrap_or(defaults.timeout_secs),
            max_attempts: lookup("FURNISH_MAX_ATTEMPTS").and_then(|v| v.parse().ok()),
            snap_mode: lookup("FURNISH_SNAP_MODE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.snap_mode),
            seed: lookup("FURNISH_SEED").and_then(|v| v.parse().ok()),
            parallel: lookup("FURNISH_PARALLEL")
                .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no"))
                .unwrap_or(defaults.parallel),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout_secs).unwrap_or(DEFAULT_TIMEOUT)
    }

    pub fn placement(&self) -> PlacementConfig {
        PlacementConfig {
            timeout: self.timeout(),
            max_attempts: self.max_attempts,
            snap_mode: self.snap_mode,
        }
    }
}
