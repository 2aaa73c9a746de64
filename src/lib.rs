//! # toclint
//!
//! Audits the table of contents of an EPUB for missing, duplicated, or
//! out-of-order chapter numbers, and can repair the navigation document by
//! inserting placeholder entries for the gaps.
//!
//! ## Features
//!
//! - Chapter/volume recognition from configurable naming rules (prefix,
//!   numeral script, suffix alternatives)
//! - Chinese numeral conversion across simplified, traditional/financial,
//!   and full-width scripts
//! - Continuity analysis: gaps, duplicates, skips and regressions, with
//!   optional per-volume bucketing or automatic segmentation
//! - Placeholder insertion/removal in EPUB3 nav documents
//!
//! ## Quick Start
//!
//! ```
//! use toclint::{run_check, CheckConfig};
//!
//! let labels: Vec<String> = ["第一章 起点", "第二章 转折", "第四章 结局"]
//!     .iter()
//!     .map(|s| s.to_string())
//!     .collect();
//!
//! let report = run_check(&labels, &CheckConfig::default()).unwrap();
//! assert_eq!(report.missing, vec![3]);
//! ```
//!
//! ## Checking a Book on Disk
//!
//! ```no_run
//! use toclint::{extract_texts, run_check, CheckConfig, Epub};
//!
//! let epub = Epub::open("book.epub")?;
//! let texts = extract_texts(&epub.toc_text()?);
//! let report = run_check(&texts, &CheckConfig::default())?;
//! for line in &report.lines {
//!     println!("{line}");
//! }
//! # Ok::<(), toclint::Error>(())
//! ```

pub mod check;
pub mod classify;
pub mod config;
pub mod epub;
mod error;
pub mod extract;
pub mod numeral;
pub mod pattern;
pub mod placeholder;
pub mod report;
pub mod sequence;

pub use check::{CheckReport, run_check};
pub use config::CheckConfig;
pub use epub::{Epub, TocKind};
pub use error::{Error, Result};
pub use extract::extract_texts;
pub use numeral::{NumeralClass, convert};
pub use pattern::Matchers;
pub use sequence::{ResetMode, SequenceReport, analyze};
