//! The one-shot generation flow: walk the date range, expand the selected
//! template for every active day and submit each request for creation.

use crate::cli::RunOptions;
use crate::config::Configuration;
use crate::error::{CliError, CliResult};
use crate::schedule::{DateRangeWalker, SkipReason};
use crate::template;
use strava_client::StravaClient;

/// Outcome of a generation run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerateSummary {
    pub created: usize,
    pub skipped_days: usize,
}

/// Run the generation flow for one named template.
///
/// Days are processed strictly sequentially in ascending order; any
/// creation error is fatal and aborts the run (no retry, no partial
/// recovery). In simulate mode requests are logged but never submitted.
pub async fn run(
    client: &dyn StravaClient,
    config: &Configuration,
    opts: &RunOptions,
    template_name: &str,
) -> CliResult<GenerateSummary> {
    let template = config
        .template(template_name)
        .ok_or_else(|| CliError::Validation(format!("unknown activity template: {template_name}")))?;

    if opts.simulate {
        tracing::info!("simulating exchanges with strava, no data will be added");
    }

    let mut summary = GenerateSummary::default();
    for day in DateRangeWalker::new(opts.start, opts.end, opts.ignore_week_end, opts.except) {
        match day.skip {
            Some(SkipReason::Weekend) => {
                tracing::info!(date = %day.date, "ignoring week end day");
                summary.skipped_days += 1;
                continue;
            }
            Some(SkipReason::Except) => {
                tracing::info!(date = %day.date, "ignoring excepted day");
                summary.skipped_days += 1;
                continue;
            }
            None => {}
        }

        for request in template::expand(template, day.date)? {
            tracing::info!(
                activity = template_name,
                start = %request.start_date_local,
                "adding activity"
            );
            if !opts.simulate {
                client.create_activity(&request).await?;
            }
            summary.created += 1;
        }
    }

    tracing::info!(
        created = summary.created,
        skipped_days = summary.skipped_days,
        "generation complete"
    );
    Ok(summary)
}
