//! Expansion of an activity template against a concrete calendar day.

use crate::config::ActivityDefinition;
use crate::error::{CliError, CliResult};
use chrono::{Local, NaiveDate, NaiveTime, TimeZone};
use strava_client::ActivityRequest;

/// Parse a plain `HH:MM` wall-clock time, independent of any calendar date.
pub fn parse_time_of_day(s: &str) -> CliResult<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .map_err(|_| CliError::Validation(format!("invalid time_of_day (shall be HH:MM): {s}")))
}

/// Resolve `day` + `time` into an ISO-8601 local timestamp with the
/// machine's UTC offset, e.g. `2016-10-03T07:00:00+02:00`.
fn local_timestamp(day: NaiveDate, time: NaiveTime) -> CliResult<String> {
    let naive = day.and_time(time);
    let local = Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| {
            CliError::Validation(format!("local time does not exist on this day: {naive}"))
        })?;
    Ok(local.format("%Y-%m-%dT%H:%M:%S%:z").to_string())
}

/// Expand every definition of a template against one calendar day,
/// preserving template order. Deterministic: the same template and day
/// always produce identical requests.
pub fn expand(template: &[ActivityDefinition], day: NaiveDate) -> CliResult<Vec<ActivityRequest>> {
    template
        .iter()
        .map(|def| {
            let time = parse_time_of_day(&def.time_of_day)?;
            Ok(ActivityRequest {
                activity_type: def.activity_type.clone(),
                start_date_local: local_timestamp(day, time)?,
                name: def.name.clone(),
                extra: def.extra.clone(),
            })
        })
        .collect()
}
