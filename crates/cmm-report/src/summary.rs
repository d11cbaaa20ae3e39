//! Aggregate summaries over stored rows and the roof plan.
//!
//! Rows read back from the table are cleaned leniently first: missing
//! `process`/`flow` become `-` and are trimmed and lower-cased, missing
//! `dimension` becomes `-`, missing numbers count as zero. Plan dimensions
//! lose their `TUBR`/`TUBS` prefix so they line up with recorded ones.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use cmm_model::{NOT_APPLICABLE, PlanRow, StoredRow, parse_datetime};
use regex::Regex;

static PLANNER_SECTION_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)TUBR|TUBS").expect("valid section code pattern"));

/// A stored row after lenient cleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanRow {
    pub datetime: Option<NaiveDateTime>,
    pub process: String,
    pub flow: String,
    pub dimension: String,
    pub element: String,
    pub length: f64,
    pub quantity: i64,
}

impl From<&StoredRow> for CleanRow {
    fn from(row: &StoredRow) -> Self {
        let lowered = |value: &Option<String>| {
            value
                .as_deref()
                .map_or_else(|| NOT_APPLICABLE.to_string(), |v| v.trim().to_lowercase())
        };
        Self {
            datetime: row.datetime.as_deref().and_then(|v| parse_datetime(v).ok()),
            process: lowered(&row.process),
            flow: lowered(&row.flow),
            dimension: row
                .dimension
                .clone()
                .unwrap_or_else(|| NOT_APPLICABLE.to_string()),
            element: lowered(&row.element),
            length: row.length.unwrap_or(0.0),
            quantity: row.quantity.unwrap_or(0),
        }
    }
}

/// Total hauled quantity for one dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HaulingTotal {
    pub dimension: String,
    pub quantity: i64,
}

/// Running stock level for one dimension at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockPoint {
    pub datetime: NaiveDateTime,
    pub dimension: String,
    pub in_cumulative: i64,
    pub out_cumulative: i64,
    pub net: i64,
}

/// Planned, drawn and installed length for one dimension, in metres.
#[derive(Debug, Clone, PartialEq)]
pub struct LengthUsage {
    pub dimension: String,
    /// Total cut length in the roof plan.
    pub planned: f64,
    pub stock_out: f64,
    pub installed: f64,
    /// `stock_out - installed`.
    pub remaining: f64,
    /// `installed / |stock_out|`, capped at 1.0.
    pub progress: f64,
    /// `planned - installed`.
    pub planner_remaining: f64,
    /// `installed / planned`, capped at 1.0.
    pub planner_progress: f64,
}

/// Planned against installed quantity for one roof element.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementUsage {
    pub element: String,
    /// Members listed for this element in the roof plan.
    pub planned: i64,
    /// Installed quantity.
    pub quantity: i64,
    /// `planned - quantity`.
    pub remaining: i64,
    /// Installed share of the plan in percent, two decimals. `None` for
    /// elements the plan does not list.
    pub progress_percent: Option<f64>,
}

/// Every aggregate computed from one read of the table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub hauling: Vec<HaulingTotal>,
    pub stock_timeline: Vec<StockPoint>,
    /// Latest net stock per dimension.
    pub stock_net: Vec<(String, i64)>,
    pub length_usage: Vec<LengthUsage>,
    pub element_usage: Vec<ElementUsage>,
}

impl Summary {
    pub fn from_rows(rows: &[StoredRow], plan: &[PlanRow]) -> Self {
        let rows: Vec<CleanRow> = rows.iter().map(CleanRow::from).collect();
        let stock_timeline = stock_timeline(&rows);
        let summary = Self {
            hauling: hauling_totals(&rows),
            stock_net: latest_net(&stock_timeline),
            stock_timeline,
            length_usage: length_usage(&rows, plan),
            element_usage: element_usage(&rows, plan),
        };
        tracing::debug!(
            rows = rows.len(),
            planned = plan.len(),
            dimensions = summary.stock_net.len(),
            "Summary computed"
        );
        summary
    }
}

/// Strip the planner's `TUBR`/`TUBS` section code from a dimension label.
pub fn clean_plan_dimension(dimension: &str) -> String {
    PLANNER_SECTION_CODE
        .replace_all(dimension, "")
        .trim()
        .to_string()
}

/// Hauled quantity per dimension, largest first.
pub fn hauling_totals(rows: &[CleanRow]) -> Vec<HaulingTotal> {
    let mut totals: BTreeMap<&str, i64> = BTreeMap::new();
    for row in rows.iter().filter(|row| row.process == "hauling") {
        *totals.entry(row.dimension.as_str()).or_default() += row.quantity;
    }
    let mut totals: Vec<HaulingTotal> = totals
        .into_iter()
        .map(|(dimension, quantity)| HaulingTotal {
            dimension: dimension.to_string(),
            quantity,
        })
        .collect();
    totals.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    totals
}

/// Cumulative stock in, out and net per dimension over time.
///
/// Out quantities are stored negative, so `net = in + out`. Rows sharing a
/// datetime are combined into one point. Rows without a parseable datetime
/// are skipped.
pub fn stock_timeline(rows: &[CleanRow]) -> Vec<StockPoint> {
    let mut movements: BTreeMap<&str, BTreeMap<NaiveDateTime, (i64, i64)>> = BTreeMap::new();
    for row in rows.iter().filter(|row| row.process == "stock") {
        let Some(datetime) = row.datetime else {
            tracing::warn!(dimension = %row.dimension, "Skipping stock row without datetime");
            continue;
        };
        let slot = movements
            .entry(row.dimension.as_str())
            .or_default()
            .entry(datetime)
            .or_default();
        match row.flow.as_str() {
            "in" => slot.0 += row.quantity,
            "out" => slot.1 += row.quantity,
            _ => {}
        }
    }

    let mut points = Vec::new();
    for (dimension, by_time) in movements {
        let (mut in_cumulative, mut out_cumulative) = (0, 0);
        for (datetime, (inbound, outbound)) in by_time {
            in_cumulative += inbound;
            out_cumulative += outbound;
            points.push(StockPoint {
                datetime,
                dimension: dimension.to_string(),
                in_cumulative,
                out_cumulative,
                net: in_cumulative + out_cumulative,
            });
        }
    }
    points
}

fn latest_net(timeline: &[StockPoint]) -> Vec<(String, i64)> {
    let mut latest: BTreeMap<&str, &StockPoint> = BTreeMap::new();
    for point in timeline {
        latest
            .entry(point.dimension.as_str())
            .and_modify(|current| {
                if point.datetime >= current.datetime {
                    *current = point;
                }
            })
            .or_insert(point);
    }
    latest
        .into_iter()
        .map(|(dimension, point)| (dimension.to_string(), point.net))
        .collect()
}

/// Planned, stock-out and installed length per dimension.
///
/// Every dimension seen in any of the three sources is listed; missing
/// sources count as zero.
pub fn length_usage(rows: &[CleanRow], plan: &[PlanRow]) -> Vec<LengthUsage> {
    // (planned, stock_out, installed)
    let mut totals: BTreeMap<String, (f64, f64, f64)> = BTreeMap::new();
    for member in plan {
        let Some(dimension) = member.dimension.as_deref() else {
            continue;
        };
        totals.entry(clean_plan_dimension(dimension)).or_default().0 +=
            member.cutlength.unwrap_or(0.0);
    }
    for row in rows {
        let total_length = row.length * row.quantity as f64;
        if row.process == "stock" && row.flow == "out" {
            totals.entry(row.dimension.clone()).or_default().1 -= total_length;
        } else if row.process == "usage" {
            totals.entry(row.dimension.clone()).or_default().2 += total_length;
        }
    }
    totals
        .into_iter()
        .map(|(dimension, (planned, stock_out, installed))| LengthUsage {
            dimension,
            planned,
            stock_out,
            installed,
            remaining: stock_out - installed,
            progress: if stock_out == 0.0 {
                0.0
            } else {
                (installed / stock_out.abs()).min(1.0)
            },
            planner_remaining: planned - installed,
            planner_progress: if planned > 0.0 {
                (installed / planned).min(1.0)
            } else {
                0.0
            },
        })
        .collect()
}

/// Planned members against installed quantity per roof element.
pub fn element_usage(rows: &[CleanRow], plan: &[PlanRow]) -> Vec<ElementUsage> {
    // (planned, installed)
    let mut totals: BTreeMap<String, (i64, i64)> = BTreeMap::new();
    for member in plan {
        let Some(element) = member.element.as_deref() else {
            continue;
        };
        totals.entry(element.trim().to_lowercase()).or_default().0 += 1;
    }
    for row in rows.iter().filter(|row| row.process == "usage") {
        totals.entry(row.element.clone()).or_default().1 += row.quantity;
    }
    totals
        .into_iter()
        .map(|(element, (planned, quantity))| ElementUsage {
            element,
            planned,
            quantity,
            remaining: planned - quantity,
            progress_percent: (planned > 0)
                .then(|| (quantity as f64 / planned as f64 * 10_000.0).round() / 100.0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_row_defaults() {
        let row = CleanRow::from(&StoredRow {
            process: Some(" Stock ".to_string()),
            ..StoredRow::default()
        });
        assert_eq!(row.process, "stock");
        assert_eq!(row.flow, "-");
        assert_eq!(row.dimension, "-");
        assert_eq!(row.quantity, 0);
        assert_eq!(row.datetime, None);
    }

    #[test]
    fn test_progress_zero_without_stock_out() {
        let rows = vec![CleanRow {
            datetime: None,
            process: "usage".to_string(),
            flow: "-".to_string(),
            dimension: "100x100x6".to_string(),
            element: "rafter".to_string(),
            length: 6.0,
            quantity: 2,
        }];
        let usage = length_usage(&rows, &[]);
        assert_eq!(usage[0].installed, 12.0);
        assert_eq!(usage[0].progress, 0.0);
        assert_eq!(usage[0].remaining, -12.0);
        assert_eq!(usage[0].planner_progress, 0.0);
    }

    #[test]
    fn test_clean_plan_dimension() {
        assert_eq!(clean_plan_dimension("TUBS100x100x6"), "100x100x6");
        assert_eq!(clean_plan_dimension(" tubr 100x50x3.2 "), "100x50x3.2");
        assert_eq!(clean_plan_dimension("100x100x6"), "100x100x6");
    }
}
