//! crates/mindmate_core/src/aggregator.rs
//!
//! Turns an ordered mood log into a numeric series for charting.

use crate::domain::{Mood, MoodObservation};
use chrono::NaiveDateTime;

/// Parallel timestamp / value sequences. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodSeries {
    pub timestamps: Vec<NaiveDateTime>,
    pub values: Vec<i8>,
}

impl MoodSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (NaiveDateTime, i8)> + '_ {
        self.timestamps.iter().copied().zip(self.values.iter().copied())
    }
}

/// The result of aggregating a mood log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoodTrend {
    Series(MoodSeries),
    NoData,
}

/// Maps each observation to positive=1, neutral=0, negative=-1, keeping input order.
///
/// The input is expected to be sorted ascending by timestamp already.
pub fn aggregate(observations: &[MoodObservation]) -> MoodTrend {
    if observations.is_empty() {
        return MoodTrend::NoData;
    }

    let (timestamps, values): (Vec<_>, Vec<_>) = observations
        .iter()
        .map(|o| (o.recorded_at, Mood::from_label(&o.label).chart_value()))
        .unzip();

    MoodTrend::Series(MoodSeries { timestamps, values })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|d| d.and_hms_opt(hour, 0, 0))
            .unwrap()
    }

    fn obs(hour: u32, label: &str) -> MoodObservation {
        MoodObservation { recorded_at: at(hour), label: label.to_string() }
    }

    #[test]
    fn labels_map_to_values_in_order() {
        let trend = aggregate(&[obs(1, "positive"), obs(2, "negative"), obs(3, "neutral")]);
        let MoodTrend::Series(series) = trend else {
            panic!("expected a series");
        };
        assert_eq!(series.values, vec![1, -1, 0]);
        assert_eq!(series.timestamps, vec![at(1), at(2), at(3)]);
    }

    #[test]
    fn empty_log_is_no_data() {
        assert_eq!(aggregate(&[]), MoodTrend::NoData);
    }

    #[test]
    fn labels_are_case_insensitive() {
        let MoodTrend::Series(series) = aggregate(&[obs(1, "POSITIVE"), obs(2, "Negative"), obs(3, "meh")]) else {
            panic!("expected a series");
        };
        assert_eq!(series.values, vec![1, -1, 0]);
        assert_eq!(series.points().count(), 3);
    }
}
