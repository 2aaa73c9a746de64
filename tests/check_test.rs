//! End-to-end checks over navigation markup: extraction through reporting.

use toclint::{CheckConfig, NumeralClass, ResetMode, extract_texts, run_check};

fn config() -> CheckConfig {
    CheckConfig::default()
}

#[test]
fn test_nav_markup_to_report() {
    let nav = r#"<?xml version="1.0" encoding="utf-8"?>
<html xmlns="http://www.w3.org/1999/xhtml">
<body>
  <nav>
    <ol>
      <li><a href="ch01.xhtml">第一章 出门</a></li>
      <li><a href="ch02.xhtml">第二章 赶路</a></li>
      <li><a href="ch05.xhtml">第五章 到站</a></li>
      <li><a href="ch05.xhtml">第五章 到站</a></li>
    </ol>
  </nav>
</body>
</html>"#;

    let report = run_check(&extract_texts(nav), &config()).unwrap();

    assert_eq!(report.missing, vec![3, 4]);
    assert!(report.lines.iter().any(|l| l.contains("missing (2):")));
    assert!(report.lines.iter().any(|l| l.contains("3, 4")));
    assert!(
        report
            .lines
            .iter()
            .any(|l| l.contains("chapter 5 appears 2 times"))
    );
    assert!(report.lines.iter().any(|l| l.contains("2 -> 5 (skipped 2)")));
}

#[test]
fn test_malformed_markup_still_checks() {
    // Unbalanced tags force the fallback extractor; the check still runs
    let nav = r#"<ul>
<li><a href="c1.xhtml">第一章</a>
<li><a href="c3.xhtml">第三章</a>
</div>"#;

    let report = run_check(&extract_texts(nav), &config()).unwrap();
    assert_eq!(report.missing, vec![2]);
}

#[test]
fn test_mixed_scripts_in_one_book() {
    let labels: Vec<String> = ["第1章", "第二章", "第３章", "第肆章", "第五章"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let report = run_check(&labels, &config()).unwrap();
    assert!(report.missing.is_empty());
    assert!(report.lines.iter().any(|l| l.contains("complete (1 -> 5)")));
}

#[test]
fn test_suffix_alternatives_across_book() {
    let mut cfg = config();
    cfg.chap_suffix = "章|回".to_string();

    let labels: Vec<String> = ["第一回 楔子", "第二章 正文", "第三回 收尾"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let report = run_check(&labels, &cfg).unwrap();
    assert!(report.missing.is_empty());
    assert!(report.lines.iter().any(|l| l.contains("chapters recognized: 3")));
}

#[test]
fn test_volumes_with_continuous_numbering() {
    let mut cfg = config();
    cfg.enable_volume = true;
    cfg.chap_reset_mode = ResetMode::Continuous;

    let labels: Vec<String> = [
        "第一卷 出山",
        "第一章",
        "第二章",
        "第二卷 入世",
        "第五章",
        "第六章",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    let report = run_check(&labels, &cfg).unwrap();
    // Volume 2 should continue at 3; it starts at 5 with no internal gap
    assert!(
        report
            .lines
            .iter()
            .any(|l| l.contains("starts at 5 (expected 3)"))
    );
    assert!(report.missing.is_empty());
}

#[test]
fn test_uncategorized_bucket_label() {
    let mut cfg = config();
    cfg.enable_volume = true;

    let labels: Vec<String> = ["第一章 序", "第一卷", "第一章"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let report = run_check(&labels, &cfg).unwrap();
    assert!(report.lines.iter().any(|l| l == "Uncategorized"));
    assert!(report.lines.iter().any(|l| l == "Volume 1"));
}

#[test]
fn test_arabic_only_class_ignores_chinese() {
    let mut cfg = config();
    cfg.chap_num_type = NumeralClass::Arabic;

    let labels: Vec<String> = ["第1章", "第二章", "第3章"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let report = run_check(&labels, &cfg).unwrap();
    // "第二章" is invisible to the arabic class, leaving a gap at 2
    assert_eq!(report.missing, vec![2]);
}

#[test]
fn test_large_gap_grouped_listing() {
    let mut labels: Vec<String> = vec!["第一章".to_string()];
    labels.push("第一百章".to_string());

    let report = run_check(&labels, &config()).unwrap();
    assert_eq!(report.missing.len(), 98);
    // 98 missing numbers arrive in position-labeled chunks of 30
    assert!(report.lines.iter().any(|l| l.contains("[1-30]")));
    assert!(report.lines.iter().any(|l| l.contains("[91-98]")));
}
