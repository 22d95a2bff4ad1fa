//! Export flow: paginated fetch, column projection and CSV rendering.

use crate::cli::RunOptions;
use crate::config::{ColumnSpec, Configuration, ExportSpec};
use crate::error::{CliError, CliResult};
use chrono::{Local, NaiveDate, NaiveTime, TimeZone};
use serde::Deserialize;
use std::path::Path;
use strava_client::{RemoteActivity, StravaClient, pagination};

/// Fixed page size for the listing calls.
pub const PAGE_SIZE: u32 = 100;

/// Closed registry of value transforms a column may name. Filters are data,
/// never code: an unknown name is rejected when the configuration loads.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ColumnFilter {
    /// Duration in seconds -> `HH:MM:SS`.
    SecondsToHms,
    /// Distance in meters -> kilometers rounded to two decimals.
    MetersToKm,
}

impl ColumnFilter {
    pub fn apply(&self, value: &serde_json::Value) -> CliResult<String> {
        let n = numeric(value).ok_or_else(|| {
            CliError::Validation(format!("filter input is not numeric: {value}"))
        })?;
        Ok(match self {
            ColumnFilter::SecondsToHms => {
                let secs = n.max(0.0) as u64;
                format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
            }
            ColumnFilter::MetersToKm => format!("{:.2}", n / 1000.0),
        })
    }
}

fn numeric(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Falsy per the original's substitution rule: absent handling lives in the
/// projector; here null, false, zero and the empty string trigger the default.
fn is_falsy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::Bool(b) => !b,
        serde_json::Value::Number(n) => n.as_f64() == Some(0.0),
        serde_json::Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn cell(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Project one raw record onto the configured columns, in spec order.
/// Absent or falsy raw values take the column default; a named filter, when
/// present, applies to the possibly-defaulted value.
pub fn project(record: &RemoteActivity, columns: &[ColumnSpec]) -> CliResult<Vec<String>> {
    columns
        .iter()
        .map(|col| {
            let effective = match record.get(&col.field) {
                Some(v) if !is_falsy(v) => v.clone(),
                _ => serde_json::Value::String(col.default.clone()),
            };
            match col.filter {
                Some(filter) => filter.apply(&effective),
                None => Ok(cell(&effective)),
            }
        })
        .collect()
}

/// Render the header plus one row per record. Separators come straight from
/// the configuration; every row, the header included, ends with the row
/// separator.
pub fn render(records: &[RemoteActivity], spec: &ExportSpec) -> CliResult<String> {
    let mut out = String::new();
    let header: Vec<&str> = spec.columns.iter().map(|c| c.label()).collect();
    out.push_str(&header.join(&spec.column_separator));
    out.push_str(&spec.row_separator);

    for record in records {
        let cells = project(record, &spec.columns)?;
        out.push_str(&cells.join(&spec.column_separator));
        out.push_str(&spec.row_separator);
    }
    Ok(out)
}

/// Unix-second listing bounds for a day-resolution range: `after` is the
/// start day at 00:00 local (inclusive), `before` the end day at 23:59
/// local (exclusive).
pub fn range_bounds(start: NaiveDate, end: NaiveDate) -> CliResult<(i64, i64)> {
    let after = local_epoch(start, NaiveTime::MIN)?;
    let before = local_epoch(end, NaiveTime::from_hms_opt(23, 59, 0).expect("valid time"))?;
    Ok((after, before))
}

fn local_epoch(day: NaiveDate, time: NaiveTime) -> CliResult<i64> {
    Local
        .from_local_datetime(&day.and_time(time))
        .earliest()
        .map(|dt| dt.timestamp())
        .ok_or_else(|| CliError::Validation(format!("local time does not exist: {day}")))
}

/// Run the export flow: fetch every page in the range, project and render,
/// then write the file (when requested) only after the whole fetch
/// succeeded, so a failed run never leaves a partial file behind.
///
/// Returns the rendered content; the caller prints it when no file path
/// was given.
pub async fn run(
    client: &dyn StravaClient,
    config: &Configuration,
    opts: &RunOptions,
    file: Option<&Path>,
) -> CliResult<String> {
    let (after, before) = range_bounds(opts.start, opts.end)?;
    let records = pagination::fetch_all(client, after, before, PAGE_SIZE).await?;
    let content = render(&records, &config.activities_export)?;

    if let Some(path) = file {
        std::fs::write(path, &content)?;
        tracing::info!(file = %path.display(), rows = records.len(), "export written");
    }
    Ok(content)
}
