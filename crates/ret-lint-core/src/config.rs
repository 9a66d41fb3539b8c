//! Host-provided configuration.
//!
//! The only settings are the separator colours used by the decoration layer.
//! Setting keys keep the spelling editors already have in their user settings
//! (`jsonSeperator`, ...); the correctly spelled keys are accepted as aliases.

use serde::{Deserialize, Serialize};

use crate::error::{LintError, Result};
use crate::sections::SectionKind;

pub const DEFAULT_JSON_SEPARATOR_COLOR: &str = "#FFFF00";
pub const DEFAULT_HTML_SEPARATOR_COLOR: &str = "#E44D26";
pub const DEFAULT_TEXT_SEPARATOR_COLOR: &str = "#008000";

/// Settings section name under which hosts nest RET configuration.
pub const SETTINGS_SECTION: &str = "ret";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetConfig {
    #[serde(rename = "jsonSeperator", alias = "jsonSeparator")]
    pub json_separator: String,
    #[serde(rename = "htmlSeperator", alias = "htmlSeparator")]
    pub html_separator: String,
    #[serde(rename = "textSeperator", alias = "textSeparator")]
    pub text_separator: String,
}

impl Default for RetConfig {
    fn default() -> Self {
        Self {
            json_separator: DEFAULT_JSON_SEPARATOR_COLOR.to_string(),
            html_separator: DEFAULT_HTML_SEPARATOR_COLOR.to_string(),
            text_separator: DEFAULT_TEXT_SEPARATOR_COLOR.to_string(),
        }
    }
}

impl RetConfig {
    /// Read configuration from host settings.
    ///
    /// Accepts either the RET object itself or a settings tree with the RET
    /// object under `"ret"`. `null` yields the defaults; keys that are not
    /// set keep their defaults.
    pub fn from_settings(settings: &serde_json::Value) -> Result<Self> {
        let section = settings.get(SETTINGS_SECTION).unwrap_or(settings);
        if section.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(section.clone()).map_err(LintError::InvalidSettings)
    }

    pub fn separator_color(&self, kind: SectionKind) -> &str {
        match kind {
            SectionKind::Json => &self.json_separator,
            SectionKind::Html => &self.html_separator,
            SectionKind::Text => &self.text_separator,
        }
    }

    /// Whether switching to `other` changes how separators are drawn.
    pub fn affects_separators(&self, other: &RetConfig) -> bool {
        SectionKind::ALL
            .iter()
            .any(|kind| self.separator_color(*kind) != other.separator_color(*kind))
    }
}
