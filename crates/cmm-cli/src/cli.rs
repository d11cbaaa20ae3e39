//! CLI argument definitions for the material tracker.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use cmm_model::{Field, NOT_APPLICABLE, RawRecord};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "cmm",
    version,
    about = "Construction material tracker - record and count steel hollow sections",
    long_about = "Record steel hollow-section movements from Thai or English field notes.\n\n\
                  Values are normalized (Thai months, Buddhist-era years, bilingual\n\
                  roof element names) before being appended to the record table."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Include user-entered free text (descriptions) in logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Service configuration file (default: ./cmm.toml when present).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Normalize a material movement and append it to the record table.
    Record(RecordArgs),

    /// Count steel sections in a photo and save an annotated copy.
    Detect(DetectArgs),

    /// Print hauling, stock and usage summaries from the record table.
    Summary,

    /// Normalize a single field value without recording anything.
    Check(CheckArgs),

    /// List the roof structure elements and the terms that map to them.
    Elements,
}

#[derive(Args)]
pub struct RecordArgs {
    /// When it happened: 'now', 'today', '1 ม.ค. 2568 14.30', '2025-01-01 14:30', ...
    #[arg(long, default_value = "now")]
    pub datetime: String,

    /// Process stage: hauling, stock or usage.
    #[arg(long)]
    pub process: String,

    /// Stock direction: in, out or '-'.
    #[arg(long, default_value = NOT_APPLICABLE, allow_hyphen_values = true)]
    pub flow: String,

    /// Steel family: shs, square, rhs, rect, ...
    #[arg(long)]
    pub family: String,

    /// Cross-section as WxHxT in millimetres, e.g. 100x100x6.
    #[arg(long)]
    pub dimension: String,

    /// Member length in metres.
    #[arg(long)]
    pub length: f64,

    /// Number of members.
    #[arg(
        long,
        allow_negative_numbers = true,
        required_unless_present = "image",
        conflicts_with = "image"
    )]
    pub quantity: Option<i64>,

    /// Photo of the section ends; the detected count becomes the quantity.
    #[arg(long, value_name = "PATH")]
    pub image: Option<PathBuf>,

    /// Roof element (usage only): ขื่อ, จันทัน, rafter, tie beam, ...
    #[arg(long, default_value = NOT_APPLICABLE, allow_hyphen_values = true)]
    pub element: String,

    /// Free-text note (usage only).
    #[arg(long, default_value = NOT_APPLICABLE, allow_hyphen_values = true)]
    pub description: String,

    /// Normalize and print the record without storing it.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

impl RecordArgs {
    /// Raw record with `quantity` from `--quantity` or the detected count.
    pub fn to_raw(&self, quantity: i64) -> RawRecord {
        RawRecord {
            datetime: self.datetime.clone(),
            process: self.process.clone(),
            flow: self.flow.clone(),
            family: self.family.clone(),
            dimension: self.dimension.clone(),
            length: self.length,
            quantity,
            element: self.element.clone(),
            description: self.description.clone(),
        }
    }
}

#[derive(Args)]
pub struct DetectArgs {
    /// Photo of steel section ends (JPEG or PNG).
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,

    /// Where to write the annotated image (default: <IMAGE stem>_detected.jpg).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Field to normalize.
    #[arg(value_enum)]
    pub field: FieldArg,

    /// Raw value as written in the field notes.
    #[arg(allow_hyphen_values = true)]
    pub value: String,
}

/// Normalized record fields.
#[derive(Clone, Copy, ValueEnum)]
pub enum FieldArg {
    Datetime,
    Process,
    Flow,
    Family,
    Dimension,
    Element,
}

impl From<FieldArg> for Field {
    fn from(arg: FieldArg) -> Self {
        match arg {
            FieldArg::Datetime => Field::Datetime,
            FieldArg::Process => Field::Process,
            FieldArg::Flow => Field::Flow,
            FieldArg::Family => Field::Family,
            FieldArg::Dimension => Field::Dimension,
            FieldArg::Element => Field::Element,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
