//! Subcommand implementations.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use cmm_model::{CanonicalRecord, Field};
use cmm_normalization::normalization::ROOF_ELEMENT_KEYWORDS;
use cmm_normalization::{SystemClock, normalize_and_assemble, normalize_field};
use cmm_report::Summary;
use cmm_services::{DetectionClient, RecordStore, ServiceConfig};
use comfy_table::Table;
use tracing::info_span;

use crate::cli::{DetectArgs, RecordArgs};
use crate::logging::redact_value;
use crate::summary::apply_table_style;

/// Normalize the record, then append it to `store`.
///
/// With `--image` the quantity is the number of sections the detection
/// service counts in the photo. A rejected record surfaces as an
/// [`AssemblyError`](cmm_normalization::AssemblyError) inside the returned
/// error, and nothing is stored.
pub async fn run_record<S: RecordStore>(
    args: &RecordArgs,
    config: &ServiceConfig,
    store: &S,
) -> Result<CanonicalRecord> {
    let quantity = record_quantity(args, config).await?;
    let raw = args.to_raw(quantity);
    let record = info_span!("record", process = %raw.process).in_scope(|| {
        tracing::debug!(
            datetime = %raw.datetime,
            dimension = %raw.dimension,
            description = %redact_value(&raw.description),
            "Normalizing record"
        );
        normalize_and_assemble(&raw)
    })?;
    store.insert(&record).await.context("insert record")?;
    Ok(record)
}

async fn record_quantity(args: &RecordArgs, config: &ServiceConfig) -> Result<i64> {
    match (args.quantity, &args.image) {
        (Some(quantity), _) => Ok(quantity),
        (None, Some(image)) => {
            let client = DetectionClient::new(config.detection.clone(), config.request_timeout())
                .context("create detection client")?;
            let detection = client.detect(image).await?;
            tracing::info!(count = detection.count, ?image, "Quantity taken from detection");
            i64::try_from(detection.count).context("detected count out of range")
        }
        (None, None) => bail!("either --quantity or --image is required"),
    }
}

/// Result of a detection run.
#[derive(Debug)]
pub struct DetectOutcome {
    pub count: usize,
    pub output: PathBuf,
}

pub async fn run_detect(args: &DetectArgs, config: &ServiceConfig) -> Result<DetectOutcome> {
    let client = DetectionClient::new(config.detection.clone(), config.request_timeout())
        .context("create detection client")?;
    let detection = client.detect(&args.image).await?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| annotated_path(&args.image));
    detection
        .annotated
        .save(&output)
        .with_context(|| format!("write annotated image {}", output.display()))?;

    Ok(DetectOutcome {
        count: detection.count,
        output,
    })
}

/// `<dir>/<stem>_detected.jpg` next to the input image.
pub fn annotated_path(image: &Path) -> PathBuf {
    let stem = image
        .file_stem()
        .map_or_else(|| "image".into(), |stem| stem.to_string_lossy());
    image.with_file_name(format!("{stem}_detected.jpg"))
}

pub async fn run_summary<S: RecordStore>(store: &S) -> Result<Summary> {
    let rows = store.select_all().await.context("read records")?;
    let plan = store.select_plan().await.context("read roof plan")?;
    Ok(Summary::from_rows(&rows, &plan))
}

/// Normalize a single value to its stored form.
pub fn run_check(field: Field, value: &str) -> Result<String> {
    Ok(normalize_field(field, value, &SystemClock)?)
}

pub fn run_elements() {
    println!("{}", elements_table());
}

/// Roof elements in matching priority order with their accepted terms.
pub fn elements_table() -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Element", "Thai", "Matches"]);
    apply_table_style(&mut table);
    for (element, keywords) in ROOF_ELEMENT_KEYWORDS {
        table.add_row(vec![
            element.as_str().to_string(),
            element.thai_name().unwrap_or("-").to_string(),
            keywords.join(", "),
        ]);
    }
    table
}
