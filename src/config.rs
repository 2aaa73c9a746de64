//! Check configuration and JSON persistence.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::numeral::NumeralClass;
use crate::sequence::ResetMode;

/// Default volume heading pattern: `第 <numeral> 卷/部/辑/册/幕/篇`.
pub const DEFAULT_VOLUME_PATTERN: &str =
    r"第\s*([0-9]+|[零〇一二三四五六七八九十百千万壹贰叁肆伍陆柒捌玖拾佰仟萬两]+)\s*[卷部辑册幕篇]";

/// Chapter and volume naming rules plus detection flags.
///
/// Persisted as JSON; missing fields fall back to their defaults, so old
/// config files keep loading after new fields are added.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Literal prefix of a chapter label, e.g. `第`.
    pub chap_prefix: String,
    /// Numeral script the chapter number may use.
    pub chap_num_type: NumeralClass,
    /// Literal suffix; `|` separates accepted alternatives, e.g. `章|回`.
    pub chap_suffix: String,
    /// The user's saved suffix choices.
    pub custom_suffixes: Vec<String>,
    /// Whether volume headings are detected at all.
    pub enable_volume: bool,
    /// Volume heading pattern, used verbatim; the first capture group (if
    /// any) is the volume numeral.
    pub vol_regex: String,
    /// Expected first chapter number per volume.
    pub chap_reset_mode: ResetMode,
    /// Split the book into segments wherever chapter numbers reset (only
    /// when volume detection is off).
    pub auto_detect_reset: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            chap_prefix: "第".to_string(),
            chap_num_type: NumeralClass::Mixed,
            chap_suffix: "章".to_string(),
            custom_suffixes: ["章", "回", "节", "话", "集"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            enable_volume: false,
            vol_regex: DEFAULT_VOLUME_PATTERN.to_string(),
            chap_reset_mode: ResetMode::ResetToOne,
            auto_detect_reset: false,
        }
    }
}

impl CheckConfig {
    /// Load from a JSON file, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        fs::read_to_string(path)
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default()
    }

    /// Save as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }

    /// The first suffix alternative, used when synthesizing labels.
    pub fn primary_suffix(&self) -> &str {
        self.chap_suffix
            .split('|')
            .map(str::trim)
            .find(|s| !s.is_empty())
            .unwrap_or_default()
    }
}
