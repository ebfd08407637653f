mod fixture;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use fixture::{build, fruit_source, settle, type_text, ParkedSearches, QUIET};
use tape_typeahead::{Component, DataSource, EventDisposition, InputEvent};

#[tokio::test(start_paused = true)]
async fn dispose_before_the_debounce_fires_dispatches_nothing() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let (mut typeahead, _) = build(fruit_source(Arc::clone(&calls)), true);

    type_text(&mut typeahead, "a");
    typeahead.dispose();
    tokio::time::sleep(QUIET * 4).await;

    assert!(calls.lock().expect("calls lock").is_empty());
    assert_eq!(typeahead.process_next_search_event().await, 0);
    assert!(typeahead.is_disposed());
}

#[tokio::test(start_paused = true)]
async fn late_completion_after_dispose_is_dropped() {
    let parked = ParkedSearches::default();
    let (mut typeahead, _) = build(parked.source(), true);

    type_text(&mut typeahead, "a");
    settle(&mut typeahead).await;
    assert!(typeahead.state().waiting());

    typeahead.dispose();
    parked.take("a").complete("a", vec!["apple".to_string()]);

    assert_eq!(typeahead.flush_search_events(), 0);
    assert!(typeahead.state().suggestions().is_empty());
}

#[tokio::test(start_paused = true)]
async fn completion_outliving_the_typeahead_is_harmless() {
    let parked = ParkedSearches::default();
    let (mut typeahead, _) = build(parked.source(), true);

    type_text(&mut typeahead, "a");
    settle(&mut typeahead).await;
    drop(typeahead);

    parked.take("a").complete("a", vec!["apple".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn disposed_typeahead_ignores_input() {
    let (mut typeahead, _) = build(fruit_source(Arc::new(Mutex::new(Vec::new()))), true);
    typeahead.dispose();
    typeahead.dispose();

    assert_eq!(
        typeahead.handle_event(&InputEvent::text("a")),
        EventDisposition::Propagate
    );
    assert_eq!(typeahead.state().input_text(), "");
}

#[tokio::test(start_paused = true)]
async fn dispose_drops_in_flight_futures() {
    let finished = Arc::new(AtomicUsize::new(0));
    let finished_for_source = Arc::clone(&finished);
    let source = DataSource::future(move |term: String| {
        let finished = Arc::clone(&finished_for_source);
        async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            finished.fetch_add(1, Ordering::SeqCst);
            (term, Vec::new())
        }
    });
    let (mut typeahead, _) = build(source, true);

    type_text(&mut typeahead, "a");
    tokio::time::sleep(QUIET + Duration::from_millis(50)).await;
    typeahead.flush_search_events();
    assert!(typeahead.state().waiting());

    typeahead.dispose();
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(finished.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_typeahead_stops_its_searches() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let (mut typeahead, _) = build(fruit_source(Arc::clone(&calls)), true);

    type_text(&mut typeahead, "a");
    drop(typeahead);
    tokio::time::sleep(QUIET * 4).await;

    assert!(calls.lock().expect("calls lock").is_empty());
}
