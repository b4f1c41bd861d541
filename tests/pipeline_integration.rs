//! End-to-end pipeline runs against mocked collaborators.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, NaiveDateTime};

use dockwatch::config::{DeliveryConfig, ReportConfig};
use dockwatch::contract::{MockNotifier, MockRowSource, RawRow};
use dockwatch::pipeline::run_report;
use dockwatch::table::ColumnLayout;

fn report_config() -> ReportConfig {
    ReportConfig {
        timezone: chrono_tz::America::Sao_Paulo,
        window_hours: 2,
        layout: ColumnLayout::default(),
    }
}

fn delivery_config(chunk_limit: usize) -> DeliveryConfig {
    DeliveryConfig {
        webhook_url: "http://localhost/hook".to_string(),
        chunk_limit,
        pacing_ms: 0,
    }
}

fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 10)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

fn raw_row(trip: &str, dock: &str, cpt: &str, destination: &str) -> RawRow {
    RawRow {
        dock_raw: dock.to_string(),
        trip_id: trip.to_string(),
        destination: destination.to_string(),
        cpt_raw: cpt.to_string(),
    }
}

/// Notifier mock that records every chunk it is handed.
fn capturing_notifier(sent: Arc<Mutex<Vec<String>>>) -> MockNotifier {
    let mut notifier = MockNotifier::new();
    notifier.expect_send().returning(move |text| {
        sent.lock().unwrap().push(text.to_string());
        Ok(())
    });
    notifier
}

#[tokio::test]
async fn empty_feed_sends_empty_state_and_zero_count_summary() {
    let mut source = MockRowSource::new();
    source.expect_fetch_rows().return_once(|| Ok(vec![]));

    let sent = Arc::new(Mutex::new(Vec::new()));
    let notifier = capturing_notifier(sent.clone());

    let report = run_report(
        &report_config(),
        &delivery_config(3000),
        &source,
        &notifier,
        at(14, 0),
    )
    .await
    .expect("run should succeed");

    assert_eq!(report.records_total, 0);
    assert_eq!(report.records_in_window, 0);
    assert_eq!(report.chunks_total, 1);
    assert_eq!(report.chunks_delivered, 1);
    assert_eq!(report.chunks_failed, 0);

    let messages = sent.lock().unwrap();
    assert_eq!(messages.len(), 1);
    let text = &messages[0];
    assert!(text.contains("No departures in the next 2 hours."));
    // 14:00 is shift 2; the two other shifts are listed with explicit zeros.
    assert!(text.contains("• Shift 3: 0 trips pending"));
    assert!(text.contains("• Shift 1: 0 trips pending"));
    assert!(!text.contains("```"));
}

#[tokio::test]
async fn near_term_trips_are_grouped_aligned_and_marked() {
    let mut source = MockRowSource::new();
    source.expect_fetch_rows().return_once(|| {
        Ok(vec![
            raw_row("LT-ALFA", "Doca 1", "10/05/2024 14:05", "Alpha"),
            raw_row("LT-BRAVO", "EXT.OUT 64", "10/05/2024 14:40", "Bravo"),
            raw_row("LT-CHARLIE", "-", "10/05/2024 15:10", "Charlie"),
        ])
    });

    let sent = Arc::new(Mutex::new(Vec::new()));
    let notifier = capturing_notifier(sent.clone());

    let report = run_report(
        &report_config(),
        &delivery_config(3000),
        &source,
        &notifier,
        at(14, 0),
    )
    .await
    .expect("run should succeed");

    assert_eq!(report.records_total, 3);
    assert_eq!(report.records_in_window, 3);
    assert_eq!(report.chunks_total, 1);

    let messages = sent.lock().unwrap();
    let text = &messages[0];

    // Two hour-groups, in first-seen order.
    let group_14 = text.find("[2 LTs at 14h]").expect("14h group heading");
    let group_15 = text.find("[1 LTs at 15h]").expect("15h group heading");
    assert!(group_14 < group_15);

    // Dock codes normalized; dash becomes the sentinel.
    assert!(text.contains("64"));
    assert!(text.contains("--"));

    let lines: Vec<&str> = text.lines().collect();
    let row_alfa = lines.iter().find(|l| l.contains("LT-ALFA")).unwrap();
    let row_bravo = lines.iter().find(|l| l.contains("LT-BRAVO")).unwrap();

    // 14:05 is within ten minutes of 14:00: imminent marker. 14:40 is not.
    assert!(row_alfa.ends_with('*'), "expected imminent marker: {row_alfa}");
    assert!(!row_bravo.contains('*'), "unexpected marker: {row_bravo}");

    // Width alignment: the time field starts at the same column in both rows.
    assert_eq!(row_alfa.find("14:05"), row_bravo.find("14:40"));

    // Table is fenced and the fences are balanced.
    assert_eq!(text.lines().filter(|l| l.trim() == "```").count(), 2);
}

#[tokio::test]
async fn records_outside_window_still_count_in_summary() {
    let mut source = MockRowSource::new();
    source.expect_fetch_rows().return_once(|| {
        Ok(vec![
            // 17:00 is outside [14:00, 16:00) but still pending in shift 2.
            raw_row("LT-LATE", "4", "10/05/2024 17:00", "Later"),
            // 23:00 pending in shift 3.
            raw_row("LT-NIGHT", "5", "10/05/2024 23:00", "Night"),
        ])
    });

    let sent = Arc::new(Mutex::new(Vec::new()));
    let notifier = capturing_notifier(sent.clone());

    let report = run_report(
        &report_config(),
        &delivery_config(3000),
        &source,
        &notifier,
        at(14, 0),
    )
    .await
    .expect("run should succeed");

    assert_eq!(report.records_total, 2);
    assert_eq!(report.records_in_window, 0);

    let messages = sent.lock().unwrap();
    let text = &messages[0];
    assert!(text.contains("No departures"));
    assert!(text.contains("• Shift 3: 1 trip pending"));
    assert!(text.contains("• Shift 1: 0 trips pending"));
}

#[tokio::test]
async fn oversized_report_is_chunked_and_each_chunk_is_well_formed() {
    let mut rows = Vec::new();
    for i in 0..60 {
        let minute = i % 60;
        let hour = 14 + i / 60;
        rows.push(raw_row(
            &format!("LT-{i:04}"),
            &format!("Doca {i}"),
            &format!("10/05/2024 {hour:02}:{minute:02}"),
            &format!("Destination {i:02}"),
        ));
    }
    let mut source = MockRowSource::new();
    source.expect_fetch_rows().return_once(move || Ok(rows));

    let sent = Arc::new(Mutex::new(Vec::new()));
    let notifier = capturing_notifier(sent.clone());

    let budget = 600;
    let report = run_report(
        &report_config(),
        &delivery_config(budget),
        &source,
        &notifier,
        at(14, 0),
    )
    .await
    .expect("run should succeed");

    assert!(report.chunks_total > 1);
    assert_eq!(report.chunks_delivered, report.chunks_total);
    assert_eq!(report.chunks_failed, 0);

    let messages = sent.lock().unwrap();
    assert_eq!(messages.len(), report.chunks_total);
    for (i, chunk) in messages.iter().enumerate() {
        assert!(chunk.len() <= budget, "chunk {i} over budget: {}", chunk.len());
        let fences = chunk.lines().filter(|l| l.trim() == "```").count();
        assert_eq!(fences % 2, 0, "chunk {i} has unbalanced fences");
    }
}

#[tokio::test]
async fn failed_chunk_does_not_stop_later_chunks() {
    let mut rows = Vec::new();
    for i in 0..60 {
        rows.push(raw_row(
            &format!("LT-{i:04}"),
            "1",
            &format!("10/05/2024 14:{:02}", i % 60),
            &format!("Destination {i:02}"),
        ));
    }
    let mut source = MockRowSource::new();
    source.expect_fetch_rows().return_once(move || Ok(rows));

    // First send is rejected by the channel, every later one succeeds.
    let attempts = Arc::new(AtomicUsize::new(0));
    let seen = attempts.clone();
    let mut notifier = MockNotifier::new();
    notifier.expect_send().returning(move |_| {
        if seen.fetch_add(1, Ordering::SeqCst) == 0 {
            Err("channel rejected message".into())
        } else {
            Ok(())
        }
    });

    let report = run_report(
        &report_config(),
        &delivery_config(600),
        &source,
        &notifier,
        at(14, 0),
    )
    .await
    .expect("run should succeed despite one failed chunk");

    assert!(report.chunks_total > 1);
    assert_eq!(report.chunks_failed, 1);
    assert_eq!(report.chunks_delivered, report.chunks_total - 1);
    // Every chunk was attempted despite the first failure.
    assert_eq!(attempts.load(Ordering::SeqCst), report.chunks_total);
}

#[tokio::test]
async fn fetch_failure_aborts_the_run() {
    let mut source = MockRowSource::new();
    source
        .expect_fetch_rows()
        .return_once(|| Err("sheet unavailable".into()));

    let notifier = MockNotifier::new();

    let err = run_report(
        &report_config(),
        &delivery_config(3000),
        &source,
        &notifier,
        at(14, 0),
    )
    .await
    .expect_err("fetch failure must abort");
    assert!(err.contains("sheet unavailable"));
}

#[tokio::test]
async fn invalid_rows_are_dropped_before_reporting() {
    let mut source = MockRowSource::new();
    source.expect_fetch_rows().return_once(|| {
        Ok(vec![
            raw_row("", "1", "10/05/2024 14:05", "NoId"),
            raw_row("LT-BAD", "2", "not a date", "BadDate"),
            raw_row("LT-OK", "3", "10/05/2024 14:30", "Good"),
        ])
    });

    let sent = Arc::new(Mutex::new(Vec::new()));
    let notifier = capturing_notifier(sent.clone());

    let report = run_report(
        &report_config(),
        &delivery_config(3000),
        &source,
        &notifier,
        at(14, 0),
    )
    .await
    .expect("run should succeed");

    assert_eq!(report.records_total, 1);
    let messages = sent.lock().unwrap();
    assert!(messages[0].contains("LT-OK"));
    assert!(!messages[0].contains("LT-BAD"));
}
