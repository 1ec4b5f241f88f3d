//! Contract tests shared by every event source

use scrobblecast_core::{ListeningEvent, Watermark};
use scrobblecast_sources::{EventSource, MemorySource};

fn event(ts: i64) -> ListeningEvent {
    ListeningEvent::new(
        ts,
        format!("Track {ts}"),
        Some("Artist".to_string()),
        format!("https://www.last.fm/music/Artist/_/Track+{ts}"),
    )
}

fn assert_contract(source: &dyn EventSource, watermark: Watermark) {
    let events = source.fetch_since(watermark).expect("fetch should succeed");
    assert!(events.iter().all(|e| e.timestamp > watermark.value()));
    assert!(events.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
}

#[test]
fn test_ordering_example() {
    let source = MemorySource::with_events(vec![event(5), event(9), event(12)]);
    let events = source.fetch_since(Watermark::new(5)).unwrap();
    let stamps: Vec<i64> = events.iter().map(|e| e.timestamp).collect();
    assert_eq!(stamps, vec![9, 12]);
}

#[test]
fn test_contract_holds_for_every_watermark() {
    let source = MemorySource::with_events((1..=20).rev().map(event).collect());
    for mark in [0, 1, 5, 19, 20, 100] {
        assert_contract(&source, Watermark::new(mark));
    }
}

#[test]
fn test_new_scrobbles_show_up_on_next_fetch() {
    let source = MemorySource::with_events(vec![event(10)]);
    assert_eq!(source.fetch_since(Watermark::new(10)).unwrap().len(), 0);

    source.push(event(11));
    let events = source.fetch_since(Watermark::new(10)).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].timestamp, 11);
}
