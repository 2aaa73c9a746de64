//! Compiled matchers for chapter and volume headings.
//!
//! Chapter patterns are assembled from the configured literal prefix/suffix
//! and the numeral class's character repertoire; user text is always
//! regex-escaped before composition. Volume patterns are user-supplied
//! regular expressions used verbatim.

use regex::Regex;

use crate::config::CheckConfig;
use crate::error::Result;
use crate::numeral::NumeralClass;

/// The compiled chapter matcher plus the optional volume matcher.
pub struct Matchers {
    /// Capture group 1 is the chapter numeral.
    pub chapter: Regex,
    /// Present only when volume detection is enabled and configured.
    pub volume: Option<Regex>,
}

impl Matchers {
    /// Compile both matchers from the configuration.
    ///
    /// Fails with [`crate::Error::Pattern`] when either pattern does not
    /// compile; no partial value is returned.
    pub fn build(config: &CheckConfig) -> Result<Self> {
        let chapter = Regex::new(&chapter_pattern(
            &config.chap_prefix,
            config.chap_num_type,
            &config.chap_suffix,
        ))?;

        let volume = if config.enable_volume && !config.vol_regex.is_empty() {
            Some(Regex::new(&config.vol_regex)?)
        } else {
            None
        };

        Ok(Self { chapter, volume })
    }

    /// Whether the volume pattern declares a capture group for its numeral.
    pub fn volume_has_group(&self) -> bool {
        self.volume.as_ref().is_some_and(|re| re.captures_len() > 1)
    }
}

fn chapter_pattern(prefix: &str, class: NumeralClass, suffix: &str) -> String {
    format!(
        r"{}\s*({})\s*{}",
        regex::escape(prefix),
        numeral_pattern(class),
        suffix_pattern(suffix)
    )
}

/// One-or-more characters of the allowed repertoire, interior whitespace
/// tolerated. `Mixed` alternates between scripts without mixing them in one
/// token.
fn numeral_pattern(class: NumeralClass) -> String {
    let runs: Vec<String> = class
        .repertoires()
        .iter()
        .map(|set| format!(r"[{set}](?:\s*[{set}])*"))
        .collect();

    match runs.as_slice() {
        [single] => single.clone(),
        _ => format!("(?:{})", runs.join("|")),
    }
}

/// `|`-separated alternatives, each escaped individually and joined as a
/// non-capturing alternation. A single suffix is escaped as-is.
fn suffix_pattern(suffix: &str) -> String {
    if suffix.contains('|') {
        let parts: Vec<String> = suffix
            .split('|')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(regex::escape)
            .collect();
        match parts.as_slice() {
            [] => String::new(),
            [single] => single.clone(),
            _ => format!("(?:{})", parts.join("|")),
        }
    } else {
        regex::escape(suffix)
    }
}
