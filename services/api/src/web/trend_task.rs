//! services/api/src/web/trend_task.rs
//!
//! Builds the mood trend: reads the mood log, aggregates it, renders the chart.

use crate::web::state::AppState;
use mindmate_core::{
    aggregator::{aggregate, MoodSeries, MoodTrend},
    domain::SignalSource,
    ports::PortResult,
};
use std::sync::Arc;
use tracing::info;

pub const TREND_ARTIFACT: &str = "mood_trend.png";
pub const FILTERED_TREND_ARTIFACT: &str = "mood_trend_filtered.png";

pub const NO_DATA_MESSAGE: &str = "No mood data yet. Chat or add journal entries to see your trend.";
pub const NO_FILTERED_DATA_MESSAGE: &str =
    "No mood data for the selected source(s). Try chatting or adding a journal entry.";

#[derive(Debug, Clone, PartialEq)]
pub enum TrendOutcome {
    Chart { chart: String, series: MoodSeries },
    NoData { message: &'static str },
}

/// True when `sources` names a strict, non-empty subset of all sources.
pub fn is_filtered(sources: &[SignalSource]) -> bool {
    !sources.is_empty() && !SignalSource::ALL.iter().all(|s| sources.contains(s))
}

/// Reads the mood log for `sources` and renders it.
///
/// Unfiltered trends fall back to the journal entries when the mood-signal log
/// is empty. Filtered trends never fall back.
pub async fn trend_process(
    app_state: Arc<AppState>,
    sources: &[SignalSource],
) -> PortResult<TrendOutcome> {
    let filtered = is_filtered(sources);

    let observations = if filtered {
        app_state.db.get_mood_signals(sources).await?
    } else {
        let signals = app_state.db.get_mood_signals(&[]).await?;
        if signals.is_empty() {
            info!("Mood signal log is empty; falling back to journal entries.");
            app_state.db.get_journal_moods().await?
        } else {
            signals
        }
    };

    match aggregate(&observations) {
        MoodTrend::NoData => Ok(TrendOutcome::NoData {
            message: if filtered {
                NO_FILTERED_DATA_MESSAGE
            } else {
                NO_DATA_MESSAGE
            },
        }),
        MoodTrend::Series(series) => {
            let artifact = if filtered {
                FILTERED_TREND_ARTIFACT
            } else {
                TREND_ARTIFACT
            };
            let chart = app_state.charts.render_line_chart(&series, artifact)?;
            Ok(TrendOutcome::Chart { chart, series })
        }
    }
}
