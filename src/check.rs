//! Full table-of-contents check runs.
//!
//! Ties the pieces together: compiles the matchers, summarizes the naming
//! format observed in the fragments, classifies chapters under volumes (or
//! auto-detected segments), and renders one sequence report per bucket.

use crate::classify::{classify, split_by_reset};
use crate::config::CheckConfig;
use crate::error::Result;
use crate::pattern::Matchers;
use crate::report;
use crate::sequence::{ResetMode, analyze};

/// The outcome of one check run: display lines plus the structured
/// missing-number list (input for placeholder insertion).
#[derive(Debug)]
pub struct CheckReport {
    pub lines: Vec<String>,
    pub missing: Vec<u32>,
}

/// Naming-format digest over the navigation fragments.
#[derive(Debug, Default)]
pub struct FormatAnalysis {
    /// Chapters recognized, by numeral script.
    pub arabic: usize,
    pub cn_lower: usize,
    pub cn_upper: usize,
    /// Labels containing the variant characters `〇` or `两`.
    pub variant: usize,
    /// Whether any fragment matched the volume pattern.
    pub has_volume: bool,
    /// Up to 5 sample chapter labels, truncated to 30 characters.
    pub samples: Vec<String>,
}

impl FormatAnalysis {
    pub fn total_chapters(&self) -> usize {
        self.arabic + self.cn_lower + self.cn_upper
    }
}

const MAX_SAMPLES: usize = 5;
const SAMPLE_LEN: usize = 30;

/// Summarize the naming format observed in the fragments.
pub fn analyze_format(fragments: &[String], matchers: &Matchers) -> FormatAnalysis {
    let mut analysis = FormatAnalysis::default();

    for fragment in fragments {
        if let Some(vol_re) = &matchers.volume
            && vol_re.is_match(fragment)
        {
            analysis.has_volume = true;
            continue;
        }

        let Some(caps) = matchers.chapter.captures(fragment) else {
            continue;
        };
        let Some(token) = caps.get(1).map(|m| m.as_str()) else {
            continue;
        };

        if token.bytes().all(|b| b.is_ascii_digit()) {
            analysis.arabic += 1;
        } else if token.chars().any(|c| "壹贰叁肆伍陆柒捌玖拾佰仟萬".contains(c)) {
            analysis.cn_upper += 1;
        } else if token
            .chars()
            .any(|c| "零〇一二三四五六七八九十百千万两".contains(c))
        {
            analysis.cn_lower += 1;
        }

        if token.contains('〇') || token.contains('两') {
            analysis.variant += 1;
        }

        if analysis.samples.len() < MAX_SAMPLES {
            analysis
                .samples
                .push(fragment.trim().chars().take(SAMPLE_LEN).collect());
        }
    }

    analysis
}

/// Run a full continuity check over the navigation fragments.
///
/// Fails only when a configured pattern does not compile; everything else
/// degrades to report lines.
pub fn run_check(fragments: &[String], config: &CheckConfig) -> Result<CheckReport> {
    let matchers = Matchers::build(config)?;

    let mut lines = Vec::new();
    let mut missing = Vec::new();

    lines.push("configuration:".to_string());
    lines.push(format!("  prefix: \"{}\"", config.chap_prefix));
    lines.push(format!("  suffix: \"{}\"", config.chap_suffix));
    lines.push(format!("  numerals: {}", config.chap_num_type));
    let mode = if config.enable_volume {
        "volumes"
    } else if config.auto_detect_reset {
        "auto-segment"
    } else {
        "whole book"
    };
    lines.push(format!("  detection: {mode}"));
    if matchers.volume.is_some() {
        lines.push(format!("  volume pattern: {}", config.vol_regex));
    }
    lines.push(String::new());

    let analysis = analyze_format(fragments, &matchers);
    lines.push("analysis:".to_string());
    lines.push(format!(
        "  chapters recognized: {}",
        analysis.total_chapters()
    ));
    let mut scripts = Vec::new();
    if analysis.arabic > 0 {
        scripts.push(format!("arabic {}", analysis.arabic));
    }
    if analysis.cn_lower > 0 {
        scripts.push(format!("chinese lowercase {}", analysis.cn_lower));
    }
    if analysis.cn_upper > 0 {
        scripts.push(format!("chinese uppercase {}", analysis.cn_upper));
    }
    if !scripts.is_empty() {
        lines.push(format!("  numeral scripts: {}", scripts.join(", ")));
    }
    if analysis.variant > 0 {
        lines.push(format!(
            "  variant characters (〇/两): {} labels",
            analysis.variant
        ));
    }
    lines.push(format!(
        "  volume headings: {}",
        if analysis.has_volume { "yes" } else { "no" }
    ));
    for sample in analysis.samples.iter().take(3) {
        lines.push(format!("  sample: {sample}"));
    }
    lines.push(String::new());

    lines.push("results:".to_string());
    let classified = classify(fragments, &matchers);

    // Numbering resets partition the stream instead of the whole-book report
    if config.auto_detect_reset && matchers.volume.is_none() && !classified.flat_order.is_empty() {
        let segments = split_by_reset(&classified.flat_order);
        if segments.len() > 1 {
            lines.push(format!(
                "{} segments detected (chapter numbering resets)",
                segments.len()
            ));
            for (idx, segment) in segments.iter().enumerate() {
                let label = format!("Segment {}", idx + 1);
                if let Some(rep) = analyze(
                    &label,
                    segment,
                    config.chap_reset_mode,
                    None,
                    Some(segment),
                ) {
                    missing.extend_from_slice(&rep.missing);
                    lines.extend(report::render(&rep));
                }
            }
            return Ok(CheckReport { lines, missing });
        }
    }

    // Continuity of the explicit volume numbers themselves
    if matchers.volume.is_some() {
        let volumes: Vec<u32> = classified
            .volumes
            .iter()
            .map(|v| v.number)
            .filter(|&n| n != 0)
            .collect();
        if let Some(rep) = analyze("Volume sequence", &volumes, ResetMode::ResetToOne, None, None)
        {
            lines.extend(report::render(&rep));
        }
    }

    let mut prev_end: u32 = 0;
    let mut matched_any = false;

    for bucket in &classified.volumes {
        if bucket.chapters.is_empty() {
            continue;
        }
        matched_any = true;

        let label = if bucket.number == 0 && matchers.volume.is_none() {
            "Book".to_string()
        } else if bucket.number == 0 {
            "Uncategorized".to_string()
        } else {
            format!("Volume {}", bucket.number)
        };

        let numbers: Vec<u32> = bucket.chapters.iter().map(|c| c.number).collect();
        if let Some(rep) = analyze(
            &label,
            &numbers,
            config.chap_reset_mode,
            Some(prev_end),
            Some(&numbers),
        ) {
            prev_end = rep.end;
            missing.extend_from_slice(&rep.missing);
            lines.extend(report::render(&rep));
        }
    }

    if !matched_any {
        lines.push("no chapters matched the configured naming rule".to_string());
        lines.push("check the prefix, suffix, and numeral settings".to_string());
    }

    Ok(CheckReport { lines, missing })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragments(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_whole_book_missing() {
        let texts = fragments(&["第一章", "第二章", "第四章", "第五章", "第七章"]);
        let report = run_check(&texts, &CheckConfig::default()).unwrap();
        assert_eq!(report.missing, vec![3, 6]);
        assert!(report.lines.iter().any(|l| l == "Book"));
    }

    #[test]
    fn test_pattern_error_aborts() {
        let config = CheckConfig {
            enable_volume: true,
            vol_regex: "([".to_string(),
            ..CheckConfig::default()
        };
        assert!(matches!(
            run_check(&fragments(&["第一章"]), &config),
            Err(crate::Error::Pattern(_))
        ));
    }

    #[test]
    fn test_no_chapters_matched() {
        let texts = fragments(&["Cover", "Preface"]);
        let report = run_check(&texts, &CheckConfig::default()).unwrap();
        assert!(report.missing.is_empty());
        assert!(
            report
                .lines
                .iter()
                .any(|l| l.contains("no chapters matched"))
        );
    }

    #[test]
    fn test_auto_segmentation() {
        let config = CheckConfig {
            auto_detect_reset: true,
            ..CheckConfig::default()
        };
        let texts = fragments(&["第一章", "第二章", "第三章", "第一章", "第二章"]);
        let report = run_check(&texts, &config).unwrap();
        assert!(
            report
                .lines
                .iter()
                .any(|l| l.contains("2 segments detected"))
        );
        assert!(report.lines.iter().any(|l| l == "Segment 1"));
        assert!(report.lines.iter().any(|l| l == "Segment 2"));
        assert!(report.missing.is_empty());
    }

    #[test]
    fn test_auto_segmentation_single_run_reports_whole_book() {
        let config = CheckConfig {
            auto_detect_reset: true,
            ..CheckConfig::default()
        };
        let texts = fragments(&["第一章", "第二章", "第三章"]);
        let report = run_check(&texts, &config).unwrap();
        assert!(report.lines.iter().any(|l| l == "Book"));
    }

    #[test]
    fn test_volume_reports() {
        let config = CheckConfig {
            enable_volume: true,
            ..CheckConfig::default()
        };
        let texts = fragments(&[
            "第一卷",
            "第一章",
            "第二章",
            "第三卷",
            "第一章",
            "第三章",
        ]);
        let report = run_check(&texts, &config).unwrap();

        // Volume numbers 1 and 3: volume 2 is missing from the volume sequence
        assert!(report.lines.iter().any(|l| l == "Volume sequence"));
        assert!(report.lines.iter().any(|l| l == "Volume 1"));
        assert!(report.lines.iter().any(|l| l == "Volume 3"));
        // Chapter 2 of volume 3 is missing
        assert_eq!(report.missing, vec![2]);
    }

    #[test]
    fn test_continuous_mode_threads_volume_ends() {
        let config = CheckConfig {
            enable_volume: true,
            chap_reset_mode: ResetMode::Continuous,
            ..CheckConfig::default()
        };
        let texts = fragments(&[
            "第一卷",
            "第一章",
            "第二章",
            "第二卷",
            "第三章",
            "第四章",
        ]);
        let report = run_check(&texts, &config).unwrap();
        assert!(report.missing.is_empty());
        // Both volumes start where the previous one ended
        assert!(
            !report
                .lines
                .iter()
                .any(|l| l.contains("expected"))
        );
    }

    #[test]
    fn test_format_analysis() {
        let matchers = Matchers::build(&CheckConfig::default()).unwrap();
        let texts = fragments(&["第1章", "第二章", "第两百章", "第拾章", "前言"]);
        let analysis = analyze_format(&texts, &matchers);

        assert_eq!(analysis.arabic, 1);
        assert_eq!(analysis.cn_lower, 2);
        assert_eq!(analysis.cn_upper, 1);
        assert_eq!(analysis.variant, 1);
        assert_eq!(analysis.total_chapters(), 4);
        assert_eq!(analysis.samples.len(), 4);
        assert!(!analysis.has_volume);
    }
}
