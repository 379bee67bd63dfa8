mod common;

use api_lib::web::{
    journal_task::{self, JournalOutcome, EMPTY_ENTRY_PROMPT},
    trend_task::{trend_process, TrendOutcome, NO_DATA_MESSAGE, NO_FILTERED_DATA_MESSAGE},
};
use common::test_app;
use mindmate_core::{
    domain::{local_now, Mood, SignalSource},
    ports::DatabaseService,
    reply::ReplyStrategy,
};

#[tokio::test]
async fn saving_an_entry_logs_a_matching_signal() {
    let app = test_app(ReplyStrategy::Local).await;

    let outcome = journal_task::submit_entry(app.state.clone(), "Today was a wonderful day, I feel grateful")
        .await
        .unwrap();

    let JournalOutcome::Saved { entry, suggestion } = outcome else {
        panic!("entry should be saved");
    };
    assert_eq!(entry.mood, Mood::Positive);
    assert_eq!(entry.polarity, 1.0);
    assert!(suggestion.starts_with("Keep up the positive energy!"));

    let signals = app.db.get_mood_signals(&[SignalSource::Journal]).await.unwrap();
    assert_eq!(signals.len(), 1);
    assert_eq!(signals[0].recorded_at, entry.recorded_at);
    assert_eq!(signals[0].label, "positive");
}

#[tokio::test]
async fn blank_entries_are_skipped() {
    let app = test_app(ReplyStrategy::Local).await;

    let outcome = journal_task::submit_entry(app.state.clone(), " \n ").await.unwrap();

    assert_eq!(outcome, JournalOutcome::Skipped { prompt: EMPTY_ENTRY_PROMPT });
    assert!(journal_task::recent_entries(app.state.clone()).await.unwrap().is_empty());
}

#[tokio::test]
async fn recent_entries_are_capped_at_five() {
    let app = test_app(ReplyStrategy::Local).await;
    for i in 0..7 {
        journal_task::submit_entry(app.state.clone(), &format!("entry number {}", i))
            .await
            .unwrap();
    }

    let recent = journal_task::recent_entries(app.state.clone()).await.unwrap();
    assert_eq!(recent.len(), journal_task::RECENT_ENTRY_LIMIT);
}

#[tokio::test]
async fn empty_log_reports_no_data() {
    let app = test_app(ReplyStrategy::Local).await;

    let outcome = trend_process(app.state.clone(), &[]).await.unwrap();
    assert_eq!(outcome, TrendOutcome::NoData { message: NO_DATA_MESSAGE });

    let outcome = trend_process(app.state.clone(), &[SignalSource::Chat]).await.unwrap();
    assert_eq!(outcome, TrendOutcome::NoData { message: NO_FILTERED_DATA_MESSAGE });
    assert!(!app.static_dir.path().join("mood_trend.png").exists());
}

#[tokio::test]
async fn trend_renders_all_sources_in_order() {
    let app = test_app(ReplyStrategy::Local).await;
    let db = &app.db;
    let base = local_now();
    db.create_mood_signal(base, SignalSource::Chat, "great", Mood::Positive, 1.0)
        .await
        .unwrap();
    db.create_mood_signal(
        base + chrono::Duration::seconds(1),
        SignalSource::Journal,
        "bad day",
        Mood::Negative,
        -1.0,
    )
    .await
    .unwrap();
    db.create_mood_signal(
        base + chrono::Duration::seconds(2),
        SignalSource::Chat,
        "ok",
        Mood::Neutral,
        0.0,
    )
    .await
    .unwrap();

    let TrendOutcome::Chart { chart, series } = trend_process(app.state.clone(), &[]).await.unwrap() else {
        panic!("expected a chart");
    };
    assert_eq!(chart, "static/mood_trend.png");
    assert_eq!(series.values, vec![1, -1, 0]);
    assert!(app.static_dir.path().join("mood_trend.png").exists());

    let TrendOutcome::Chart { chart, series } =
        trend_process(app.state.clone(), &[SignalSource::Chat]).await.unwrap()
    else {
        panic!("expected a filtered chart");
    };
    assert_eq!(chart, "static/mood_trend_filtered.png");
    assert_eq!(series.values, vec![1, 0]);
}

#[tokio::test]
async fn unfiltered_trend_falls_back_to_journal_entries() {
    let app = test_app(ReplyStrategy::Local).await;
    app.db
        .create_journal_entry(local_now(), "so sad", Mood::Negative, -1.0)
        .await
        .unwrap();

    let TrendOutcome::Chart { series, .. } = trend_process(app.state.clone(), &[]).await.unwrap() else {
        panic!("expected a chart from journal entries");
    };
    assert_eq!(series.values, vec![-1]);

    let filtered = trend_process(app.state.clone(), &[SignalSource::Journal]).await.unwrap();
    assert_eq!(filtered, TrendOutcome::NoData { message: NO_FILTERED_DATA_MESSAGE });
}
