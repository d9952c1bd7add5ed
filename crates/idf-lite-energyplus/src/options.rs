// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Translator options

use serde::{Deserialize, Serialize};

/// Options for model to workspace translation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForwardTranslatorOptions {
    /// Restrict output names to characters safe in IDF text
    pub mangle_names: bool,
    /// Translate resources nothing in the model uses
    pub translate_unused_resources: bool,
    /// Highest numeric suffix tried when an output name collides
    pub max_name_suffix: u32,
}

impl Default for ForwardTranslatorOptions {
    fn default() -> Self {
        Self {
            mangle_names: true,
            translate_unused_resources: true,
            max_name_suffix: 9999,
        }
    }
}

impl ForwardTranslatorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mangle_names(mut self, mangle: bool) -> Self {
        self.mangle_names = mangle;
        self
    }

    pub fn with_translate_unused_resources(mut self, translate: bool) -> Self {
        self.translate_unused_resources = translate;
        self
    }

    pub fn with_max_name_suffix(mut self, max: u32) -> Self {
        self.max_name_suffix = max;
        self
    }

    /// Load from JSON; missing keys keep their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Options for workspace to model translation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReverseTranslatorOptions {
    /// Highest numeric suffix tried when a model name collides
    pub max_name_suffix: u32,
}

impl Default for ReverseTranslatorOptions {
    fn default() -> Self {
        Self {
            max_name_suffix: 9999,
        }
    }
}

impl ReverseTranslatorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_name_suffix(mut self, max: u32) -> Self {
        self.max_name_suffix = max;
        self
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_defaults() {
        let options = ForwardTranslatorOptions::default();
        assert!(options.mangle_names);
        assert!(options.translate_unused_resources);
        assert_eq!(options.max_name_suffix, 9999);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let options = ForwardTranslatorOptions::from_json(r#"{ "mangle_names": false }"#).unwrap();
        assert!(!options.mangle_names);
        assert!(options.translate_unused_resources);

        let reverse = ReverseTranslatorOptions::from_json("{}").unwrap();
        assert_eq!(reverse, ReverseTranslatorOptions::default());
    }

    #[test]
    fn test_json_round_trip() {
        let options = ForwardTranslatorOptions::new()
            .with_translate_unused_resources(false)
            .with_max_name_suffix(3);
        let json = options.to_json().unwrap();
        assert_eq!(ForwardTranslatorOptions::from_json(&json).unwrap(), options);
    }
}
