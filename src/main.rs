//! toclint - EPUB table-of-contents auditor

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use toclint::pattern::Matchers;
use toclint::placeholder;
use toclint::{CheckConfig, Epub, NumeralClass, ResetMode, TocKind, extract_texts, run_check};

#[derive(Parser)]
#[command(name = "toclint")]
#[command(version, about = "EPUB table-of-contents auditor", long_about = None)]
#[command(after_help = "EXAMPLES:
    toclint check book.epub                  Audit chapter continuity
    toclint check book.epub --volumes        Audit per-volume numbering
    toclint insert book.epub -o fixed.epub   Insert placeholders for gaps
    toclint remove book.epub                 Strip inserted placeholders")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check chapter numbering continuity
    Check {
        /// Input EPUB file
        input: PathBuf,

        #[command(flatten)]
        options: ConfigOptions,
    },
    /// Insert placeholder entries for missing chapters
    Insert {
        /// Input EPUB file
        input: PathBuf,

        /// Output file (defaults to rewriting the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        options: ConfigOptions,
    },
    /// Remove previously inserted placeholder entries
    Remove {
        /// Input EPUB file
        input: PathBuf,

        /// Output file (defaults to rewriting the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct ConfigOptions {
    /// Configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Chapter label prefix
    #[arg(long)]
    prefix: Option<String>,

    /// Chapter label suffix ('|' separates alternatives)
    #[arg(long)]
    suffix: Option<String>,

    /// Numeral script: arabic, cn_lower, cn_upper, or mixed
    #[arg(long, value_parser = parse_numerals)]
    numerals: Option<NumeralClass>,

    /// Enable volume detection
    #[arg(long)]
    volumes: bool,

    /// Volume heading pattern (first capture group is the volume numeral)
    #[arg(long)]
    volume_pattern: Option<String>,

    /// Expected numbering: reset_1, reset_0, or continuous
    #[arg(long, value_parser = parse_reset_mode)]
    reset_mode: Option<ResetMode>,

    /// Split into segments where chapter numbers reset
    #[arg(long)]
    auto_segment: bool,
}

fn parse_numerals(s: &str) -> Result<NumeralClass, String> {
    match s {
        "arabic" => Ok(NumeralClass::Arabic),
        "cn_lower" => Ok(NumeralClass::CnLower),
        "cn_upper" => Ok(NumeralClass::CnUpper),
        "mixed" => Ok(NumeralClass::Mixed),
        other => Err(format!("unknown numeral script: {other}")),
    }
}

fn parse_reset_mode(s: &str) -> Result<ResetMode, String> {
    match s {
        "reset_1" => Ok(ResetMode::ResetToOne),
        "reset_0" => Ok(ResetMode::ResetToZero),
        "continuous" => Ok(ResetMode::Continuous),
        other => Err(format!("unknown reset mode: {other}")),
    }
}

impl ConfigOptions {
    fn resolve(&self) -> CheckConfig {
        let mut config = match &self.config {
            Some(path) => CheckConfig::load(path),
            None => CheckConfig::default(),
        };

        if let Some(prefix) = &self.prefix {
            config.chap_prefix = prefix.clone();
        }
        if let Some(suffix) = &self.suffix {
            config.chap_suffix = suffix.clone();
        }
        if let Some(numerals) = self.numerals {
            config.chap_num_type = numerals;
        }
        if self.volumes {
            config.enable_volume = true;
        }
        if let Some(pattern) = &self.volume_pattern {
            config.vol_regex = pattern.clone();
            config.enable_volume = true;
        }
        if let Some(mode) = self.reset_mode {
            config.chap_reset_mode = mode;
        }
        if self.auto_segment {
            config.auto_detect_reset = true;
        }

        config
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match &cli.command {
        Command::Check { input, options } => check(input, &options.resolve()),
        Command::Insert {
            input,
            output,
            options,
        } => insert(input, output.as_deref(), &options.resolve()),
        Command::Remove { input, output } => remove(input, output.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn check(input: &Path, config: &CheckConfig) -> toclint::Result<()> {
    let epub = Epub::open(input)?;
    let (path, kind) = epub.toc()?;
    println!(
        "table of contents: {path} ({})",
        match kind {
            TocKind::Nav => "nav",
            TocKind::Ncx => "ncx",
        }
    );
    println!();

    let texts = extract_texts(&epub.toc_text()?);
    let report = run_check(&texts, config)?;
    for line in &report.lines {
        println!("{line}");
    }

    if !report.missing.is_empty() {
        println!();
        println!(
            "{} missing chapters; run `toclint insert` to add placeholders",
            report.missing.len()
        );
    }

    Ok(())
}

fn insert(input: &Path, output: Option<&Path>, config: &CheckConfig) -> toclint::Result<()> {
    let mut epub = Epub::open(input)?;
    require_nav(&epub)?;

    let content = epub.toc_text()?;
    let texts = extract_texts(&content);
    let report = run_check(&texts, config)?;
    if report.missing.is_empty() {
        println!("no missing chapters detected");
        return Ok(());
    }

    let matchers = Matchers::build(config)?;
    let locations = placeholder::chapter_locations(&content, &matchers);
    let (updated, inserted) =
        placeholder::insert_placeholders(&content, &report.missing, &locations, config)?;

    epub.set_toc_text(updated)?;
    epub.save(output.unwrap_or(input))?;
    println!("inserted {inserted} placeholder entries");

    Ok(())
}

fn remove(input: &Path, output: Option<&Path>) -> toclint::Result<()> {
    let mut epub = Epub::open(input)?;
    require_nav(&epub)?;

    let content = epub.toc_text()?;
    let (updated, removed) = placeholder::remove_placeholders(&content);
    if removed == 0 {
        println!("no placeholders found");
        return Ok(());
    }

    epub.set_toc_text(updated)?;
    epub.save(output.unwrap_or(input))?;
    println!("removed {removed} placeholder entries");

    Ok(())
}

/// Placeholder editing is defined only for EPUB3 nav documents.
fn require_nav(epub: &Epub) -> toclint::Result<()> {
    match epub.toc()? {
        (_, TocKind::Nav) => Ok(()),
        (_, TocKind::Ncx) => Err(toclint::Error::NoToc(
            "placeholder editing requires an EPUB3 nav document".to_string(),
        )),
    }
}
