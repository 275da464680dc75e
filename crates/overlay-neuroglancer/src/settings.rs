// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Adapter settings: DOM selectors and url conventions.

use overlay_app_core::config::{ConfigError, ConfigService, ConfigStore};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Config key the settings are stored under.
pub const SETTINGS_KEY: &str = "neuroglancer";

/// Error building an adapter from settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The cache-busting parameter does not form a usable pattern.
    #[error("invalid cache-bust parameter {param:?}: {source}")]
    CacheBustPattern {
        /// Offending parameter name.
        param: String,
        /// Underlying regex error.
        source: regex::Error,
    },
    /// The cache-busting parameter is empty.
    #[error("cache-bust parameter must not be empty")]
    EmptyCacheBustParam,
}

/// Knobs for the Neuroglancer adapter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeuroglancerSettings {
    /// Selector of the element displaying pixels.
    pub tracked_element_selector: String,
    /// Selector of the per-viewport panel elements.
    pub panel_selector: String,
    /// Https prefix that replaces `gs://`.
    pub gcs_https_base: String,
    /// Query parameter rewritten on every refresh.
    pub cache_bust_param: String,
    /// Layer type tag listed as an openable data view.
    pub image_layer_type: String,
}

impl Default for NeuroglancerSettings {
    fn default() -> Self {
        Self {
            tracked_element_selector: "canvas".to_owned(),
            panel_selector: ".neuroglancer-panel".to_owned(),
            gcs_https_base: "https://storage.googleapis.com/".to_owned(),
            cache_bust_param: "run_id".to_owned(),
            image_layer_type: "image".to_owned(),
        }
    }
}

impl NeuroglancerSettings {
    /// Loads settings from `service`, defaulting when none are stored.
    pub fn load<S: ConfigStore>(service: &ConfigService<S>) -> Result<Self, ConfigError> {
        service.load_or_default(SETTINGS_KEY)
    }

    /// Persists settings through `service`.
    pub fn save<S: ConfigStore>(&self, service: &ConfigService<S>) -> Result<(), ConfigError> {
        service.save(SETTINGS_KEY, self)
    }
}
