//! Engine configuration

use std::collections::BTreeMap;

use carousel_config::{default_options, AttributeNames, ConfigMap, SliderConfigBuilder};
use serde::Deserialize;

use crate::breakpoint::{BreakpointRules, DEFAULT_RULES};
use crate::error::EngineError;

/// Class names and style property used to reflect slider state on controls
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StateClasses {
    pub disabled: String,
    pub active: String,
    pub playing: String,
    pub paused: String,
    /// Custom property receiving progress in `[0, 1]`
    pub progress_property: String,
}

impl Default for StateClasses {
    fn default() -> Self {
        Self {
            disabled: "se-disabled".to_string(),
            active: "se-active".to_string(),
            playing: "se-playing".to_string(),
            paused: "se-paused".to_string(),
            progress_property: "--se-progress".to_string(),
        }
    }
}

/// Engine configuration options
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Attribute prefix
    pub prefix: String,

    /// Log discovery and compilation decisions
    pub debug: bool,

    /// Breakpoint rule name -> media condition
    pub breakpoints: BTreeMap<String, String>,

    /// Slider options underneath every compiled configuration
    pub defaults: ConfigMap,

    /// Visual state vocabulary
    pub classes: StateClasses,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            prefix: "se-".to_string(),
            debug: false,
            breakpoints: DEFAULT_RULES
                .iter()
                .map(|(name, condition)| (name.to_string(), condition.to_string()))
                .collect(),
            defaults: default_options(),
            classes: StateClasses::default(),
        }
    }
}

impl EngineConfig {
    /// Parse from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Turn debug on when the page URL carries `<prefix>debug=true`
    pub fn with_debug_from_url(mut self, page_url: &str) -> Self {
        if debug_from_url(page_url, &self.prefix) {
            self.debug = true;
        }
        self
    }

    pub fn names(&self) -> AttributeNames {
        AttributeNames::new(&self.prefix)
    }

    pub fn slider_builder(&self) -> SliderConfigBuilder {
        SliderConfigBuilder::with_defaults(self.defaults.clone())
    }

    pub fn breakpoint_rules(&self) -> Result<BreakpointRules, EngineError> {
        BreakpointRules::from_map(&self.breakpoints)
    }
}

/// Whether `page_url` has a `<prefix>debug=true` query parameter
pub fn debug_from_url(page_url: &str, prefix: &str) -> bool {
    let Ok(url) = url::Url::parse(page_url) else {
        return false;
    };
    let key = format!("{prefix}debug");
    url.query_pairs().any(|(k, v)| k == key && v == "true")
}
