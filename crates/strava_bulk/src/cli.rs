//! Command-line surface and the immutable run options built from it.
//!
//! Flag names (including the camelCase long forms) are the tool's stable
//! interface and must not change.

use crate::error::{CliError, CliResult};
use chrono::{Local, NaiveDate};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "strava-bulk",
    version,
    about = "Bulk-create Strava activities from templates and export history to CSV"
)]
pub struct Args {
    /// Run the one-time OAuth setup flow to obtain an access token
    #[arg(short = 'g', long = "generate")]
    pub generate: bool,

    /// Print the list of available activity templates
    #[arg(short = 'l', long = "listTemplates")]
    pub list_templates: bool,

    /// Export activities in the date range instead of creating any
    #[arg(short = 'L', long = "listActivities")]
    pub list_activities: bool,

    /// CSV file to export activities to; prints to the console when omitted
    #[arg(short = 'f', long = "file")]
    pub file: Option<PathBuf>,

    /// Starting date, format YYYYMMDD (defaults to today)
    #[arg(short = 's', long = "startDate")]
    pub start_date: Option<String>,

    /// Ending date, format YYYYMMDD (defaults to today)
    #[arg(short = 'e', long = "endDate")]
    pub end_date: Option<String>,

    /// Activity template name to use for the period
    #[arg(short = 'a', long = "activity")]
    pub activity: Option<String>,

    /// Skip Saturdays and Sundays
    #[arg(short = 'i', long = "ignoreWeekEnd")]
    pub ignore_week_end: bool,

    /// One specific date to skip (YYYYMMDD or YYYY-MM-DD)
    #[arg(short = 'E', long = "except")]
    pub except: Option<String>,

    /// Simulate execution: log everything, call nothing
    #[arg(short = 'S', long = "simulate")]
    pub simulate: bool,
}

impl Args {
    /// True when no mode was selected at all; the caller shows help then.
    pub fn wants_help(&self) -> bool {
        !self.generate
            && !self.list_templates
            && !self.list_activities
            && self.activity.is_none()
    }
}

/// Validated, immutable options shared by the generate and export flows.
/// Built once from the parsed arguments; never mutated afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct RunOptions {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub ignore_week_end: bool,
    pub except: Option<NaiveDate>,
    pub simulate: bool,
}

impl RunOptions {
    pub fn from_args(args: &Args) -> CliResult<Self> {
        let start = parse_range_date(
            args.start_date.as_deref(),
            "The starting date is not valid (shall be YYYYMMDD)",
        )?;
        let end = parse_range_date(
            args.end_date.as_deref(),
            "The ending date is not valid (shall be YYYYMMDD)",
        )?;
        let except = args.except.as_deref().map(parse_except_date).transpose()?;
        Ok(Self {
            start,
            end,
            ignore_week_end: args.ignore_week_end,
            except,
            simulate: args.simulate,
        })
    }
}

/// Strict `YYYYMMDD`; an absent value means "today".
fn parse_range_date(raw: Option<&str>, message: &str) -> CliResult<NaiveDate> {
    match raw {
        None => Ok(Local::now().date_naive()),
        Some(s) => NaiveDate::parse_from_str(s, "%Y%m%d")
            .map_err(|_| CliError::Validation(format!("{message}: {s}"))),
    }
}

/// The except date also accepts the ISO form, matching the lenient parsing
/// the original flag had.
fn parse_except_date(raw: &str) -> CliResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y%m%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .map_err(|_| CliError::Validation(format!("The except date is not valid: {raw}")))
}
