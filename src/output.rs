//! # Terminal Output
//!
//! Status lines printed by the CLI around a unification run: the header,
//! the success summary, and the failure marker. Decoration (colors and
//! emoji) follows the `--color` flag and the usual environment variables:
//!
//! - `--color=never|always|auto`
//! - `NO_COLOR` - disables decoration when set (https://no-color.org/)
//! - `CLICOLOR=0` - disables decoration
//! - `CLICOLOR_FORCE=1` - forces decoration on a non-TTY
//! - `TERM=dumb` - disables decoration
//!
//! Diagnostics (discovered files, skipped documents) go through `log`
//! instead and are not affected by these settings.

use std::env;
use std::path::Path;

use console::style;

use crate::phases::orchestrator::RunReport;

/// How status lines are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    /// Whether colors and emoji are used
    pub use_color: bool,
}

impl OutputConfig {
    /// Build the configuration from the `--color` flag value and environment.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => detect_color_support(),
        };
        Self { use_color }
    }

    pub fn plain() -> Self {
        Self { use_color: false }
    }

    /// Pick the emoji or its plain-text stand-in.
    pub fn marker<'a>(&self, emoji: &'a str, plain: &'a str) -> &'a str {
        if self.use_color {
            emoji
        } else {
            plain
        }
    }

    /// Header printed before a run starts.
    pub fn header(&self, target: &str, directory: &Path) -> String {
        let target = if self.use_color {
            style(target).cyan().bold().force_styling(true).to_string()
        } else {
            target.to_string()
        };
        format!(
            "{} Unifying {} for target {}",
            self.marker("🔍", "[SCAN]"),
            directory.display(),
            target
        )
    }

    /// Summary printed after the output was written.
    pub fn summary(&self, report: &RunReport, output: &Path) -> String {
        let headline = format!(
            "{} Wrote {}",
            self.marker("✅", "[OK]"),
            output.display()
        );
        let headline = if self.use_color {
            style(headline).green().force_styling(true).to_string()
        } else {
            headline
        };
        format!(
            "{}\n   {} files, {} documents, {} images",
            headline, report.files, report.documents, report.images
        )
    }

    /// Marker printed when the run failed.
    pub fn failure(&self) -> String {
        let line = format!("{} Unification failed", self.marker("❌", "[FAILED]"));
        if self.use_color {
            style(line).red().force_styling(true).to_string()
        } else {
            line
        }
    }
}

fn detect_color_support() -> bool {
    if env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
        return false;
    }
    if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
        return true;
    }
    if env::var("TERM").is_ok_and(|v| v == "dumb") {
        return false;
    }
    console::Term::stdout().features().colors_supported()
}
