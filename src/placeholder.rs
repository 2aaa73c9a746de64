//! Placeholder entries for missing chapters.
//!
//! Pure string transforms over nav markup: computing where a placeholder
//! for a missing chapter belongs, inserting the entries, and stripping them
//! again. Reading and writing the actual EPUB resource stays in
//! [`crate::epub`].
//!
//! Every placeholder carries two signals: a structural class on the `<li>`
//! and a visible marker in the label. Removal targets the class first and
//! falls back to the marker, so entries survive documents that lost one
//! signal or the other.

use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Unbounded};
use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};

use crate::config::CheckConfig;
use crate::error::{Error, Result};
use crate::numeral::convert;
use crate::pattern::Matchers;

/// Visible marker embedded in every placeholder label.
pub const MISSING_MARKER: &str = "【★缺失★】";

/// Structural class carried by every placeholder entry.
pub const MISSING_CLASS: &str = "toclint-missing-chapter";

/// Map every recognized chapter number in the nav markup to its anchor
/// href. Rebuilt from the live markup on each run, never persisted.
pub fn chapter_locations(markup: &str, matchers: &Matchers) -> BTreeMap<u32, String> {
    static ANCHOR: OnceLock<Regex> = OnceLock::new();
    let anchor = ANCHOR.get_or_init(|| {
        RegexBuilder::new(r#"<a[^>]*href="([^"]*)"[^>]*>([^<]*)</a>"#)
            .case_insensitive(true)
            .build()
            .expect("static pattern")
    });

    let mut map = BTreeMap::new();
    for caps in anchor.captures_iter(markup) {
        let (Some(href), Some(text)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        if let Some(chapter) = matchers.chapter.captures(text.as_str().trim())
            && let Some(m) = chapter.get(1)
        {
            map.insert(convert(m.as_str()), href.as_str().to_string());
        }
    }
    map
}

/// The anchor a placeholder for `missing` should point at: the nearest
/// chapter with a strictly greater number, else the nearest with a strictly
/// lesser one, else any mapped href. `None` only for an empty map.
pub fn nearest_anchor(missing: u32, locations: &BTreeMap<u32, String>) -> Option<&str> {
    if let Some((_, href)) = locations.range((Excluded(missing), Unbounded)).next() {
        return Some(href);
    }
    if let Some((_, href)) = locations.range(..missing).next_back() {
        return Some(href);
    }
    locations.values().next().map(String::as_str)
}

/// Insert a placeholder `<li>` for every missing chapter.
///
/// Numbers are processed in descending order so that several insertions in
/// front of the same anchor come out in ascending visual order. Returns the
/// new markup and the number of entries inserted; fails with
/// [`Error::NoAnchor`] when the location map is empty.
pub fn insert_placeholders(
    markup: &str,
    missing: &[u32],
    locations: &BTreeMap<u32, String>,
    config: &CheckConfig,
) -> Result<(String, usize)> {
    if locations.is_empty() {
        return Err(Error::NoAnchor);
    }

    let mut ordered: Vec<u32> = missing.to_vec();
    ordered.sort_unstable();

    let mut content = markup.to_string();
    let mut inserted = 0;

    for &number in ordered.iter().rev() {
        let Some(target) = nearest_anchor(number, locations) else {
            continue;
        };
        let label = format!(
            "{MISSING_MARKER}{}{number}{}",
            config.chap_prefix,
            config.primary_suffix()
        );
        let entry =
            format!(r#"<li class="{MISSING_CLASS}"><a href="{target}">{label}</a></li>"#);

        let next_href = locations
            .range((Excluded(number), Unbounded))
            .next()
            .map(|(_, href)| href);
        if let Some(href) = next_href
            && let Some(range) = find_entry(&content, href)?
        {
            content.insert_str(range.start, &format!("{entry}\n"));
            inserted += 1;
            continue;
        }

        let prev_href = locations.range(..number).next_back().map(|(_, href)| href);
        if let Some(href) = prev_href
            && let Some(range) = find_entry(&content, href)?
        {
            content.insert_str(range.end, &format!("\n{entry}"));
            inserted += 1;
        }
    }

    Ok((content, inserted))
}

/// Locate the `<li>` entry whose anchor points at `href`.
fn find_entry(content: &str, href: &str) -> Result<Option<std::ops::Range<usize>>> {
    let pattern = format!(
        r#"<li[^>]*>\s*<a[^>]*href="{}"[^>]*>[^<]*</a>\s*</li>"#,
        regex::escape(href)
    );
    let re = RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()?;
    Ok(re.find(content).map(|m| m.range()))
}

/// Strip every placeholder entry from the markup.
///
/// Matches the structural class first; only when that removes nothing does
/// the marker-text pattern run. Returns the new markup and the number of
/// entries removed.
pub fn remove_placeholders(markup: &str) -> (String, usize) {
    static BY_CLASS: OnceLock<Regex> = OnceLock::new();
    static BY_MARKER: OnceLock<Regex> = OnceLock::new();

    let by_class = BY_CLASS.get_or_init(|| {
        RegexBuilder::new(&format!(
            r#"<li[^>]*class="[^"]*{MISSING_CLASS}[^"]*"[^>]*>.*?</li>\s*"#
        ))
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
        .expect("static pattern")
    });

    let count = by_class.find_iter(markup).count();
    if count > 0 {
        return (by_class.replace_all(markup, "").into_owned(), count);
    }

    let by_marker = BY_MARKER.get_or_init(|| {
        RegexBuilder::new(&format!(
            r#"<li[^>]*>\s*<a[^>]*>[^<]*{}[^<]*</a>\s*</li>\s*"#,
            regex::escape(MISSING_MARKER)
        ))
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
        .expect("static pattern")
    });

    let count = by_marker.find_iter(markup).count();
    (by_marker.replace_all(markup, "").into_owned(), count)
}
