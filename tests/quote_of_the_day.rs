//! End-to-end tests for the daily quote protocol
//!
//! Drives the service and scheduler through the public API with a scripted
//! quotes source and a manual clock.

use chrono::{Duration, NaiveDate};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use quotd::clock::{Clock, ManualClock};
use quotd::quote::{
    select_category, QuoteError, QuoteService, QuoteSource, Role, LAST_FETCH_KEY, QUOTE_KEY,
};
use quotd::scheduler::DailyScheduler;
use quotd::storage::{FileStore, KeyValueStore, MemoryStore};

/// Quotes source returning a different quote on every call
#[derive(Default)]
struct RotatingSource {
    calls: AtomicUsize,
    offline: AtomicBool,
    requested: Mutex<Vec<Option<String>>>,
}

impl RotatingSource {
    fn offline() -> Self {
        let source = Self::default();
        source.offline.store(true, Ordering::SeqCst);
        source
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl QuoteSource for RotatingSource {
    async fn fetch_random(&self, category: Option<String>) -> Result<Value, QuoteError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(category.clone());
        if self.offline.load(Ordering::SeqCst) {
            return Err(QuoteError::MalformedResponse("connection refused".to_string()));
        }
        Ok(json!({
            "text": format!("Random quote #{n}"),
            "by": "Rotating Author",
            "category": category.unwrap_or_else(|| "random".to_string()),
        }))
    }
}

fn clock_at(y: i32, m: u32, d: u32, h: u32, min: u32) -> ManualClock {
    ManualClock::at(y, m, d, h, min).expect("valid test time")
}

#[test]
fn test_category_selection_is_deterministic_all_year() {
    let mut day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
    while day <= end {
        for role in Role::ALL {
            let picks: Vec<_> = (0..3).map(|_| select_category(role, day)).collect();
            assert!(picks.iter().all(|p| *p == picks[0]), "{role} on {day}");
        }
        day = day.succ_opt().unwrap();
    }
}

#[tokio::test]
async fn test_same_day_fetch_is_served_from_cache() {
    let service = QuoteService::new(
        MemoryStore::new(),
        RotatingSource::default(),
        clock_at(2024, 3, 1, 8, 0),
    );

    let first = service.get_quote_of_the_day(Role::Student).await;
    service.clock().advance(Duration::hours(10));
    let second = service.get_quote_of_the_day(Role::Student).await;

    assert_eq!(service.source().calls(), 1, "second call must not hit the network");
    assert_eq!(first.data, second.data);
    assert_eq!(first.data.text, "Random quote #0");
}

#[tokio::test]
async fn test_cache_expires_at_next_day() {
    let store = Arc::new(MemoryStore::new());
    let service = QuoteService::new(
        Arc::clone(&store),
        RotatingSource::default(),
        clock_at(2024, 3, 1, 23, 0),
    );

    service.get_quote_of_the_day(Role::Faculty).await;
    assert!(service.cache().is_valid_for_today(service.clock().today()));

    service.clock().advance(Duration::hours(2));
    assert!(!service.cache().is_valid_for_today(service.clock().today()));
    assert_eq!(store.get(LAST_FETCH_KEY).as_deref(), Some("2024-03-01"));
}

#[tokio::test]
async fn test_offline_student_gets_mandela() {
    let service = QuoteService::new(
        MemoryStore::new(),
        RotatingSource::offline(),
        clock_at(2024, 3, 1, 8, 0),
    );

    let response = service.get_quote_of_the_day(Role::Student).await;

    assert!(!response.success);
    assert!(response.message.starts_with("API Error:"));
    assert_eq!(response.data.author, "Nelson Mandela");
    assert_eq!(response.data.category, "education");
}

#[tokio::test]
async fn test_admin_scenario_requests_random() {
    let service = QuoteService::new(
        MemoryStore::new(),
        RotatingSource::default(),
        clock_at(2024, 3, 1, 8, 0),
    );

    service.get_quote_of_the_day(Role::Admin).await;

    let requested = service.source().requested.lock().unwrap().clone();
    assert_eq!(requested, vec![Some("random".to_string())]);
}

#[tokio::test]
async fn test_student_scenario_requests_education() {
    let service = QuoteService::new(
        MemoryStore::new(),
        RotatingSource::default(),
        clock_at(2024, 3, 1, 8, 0),
    );

    let response = service.get_quote_of_the_day(Role::Student).await;

    assert_eq!(response.data.category, "education");
    assert_eq!(response.data.author, "Rotating Author");
}

#[tokio::test]
async fn test_rollover_clears_and_refetches_even_when_offline() {
    let service = Arc::new(QuoteService::new(
        MemoryStore::new(),
        RotatingSource::default(),
        clock_at(2024, 7, 26, 9, 15),
    ));
    let scheduler = DailyScheduler::new(Arc::clone(&service), Role::Student);

    assert!(scheduler.initialize().await);
    assert_eq!(scheduler.last_update_date().as_deref(), Some("2024-07-26"));
    assert!(service.cache().read().is_some());

    service.source().offline.store(true, Ordering::SeqCst);
    service
        .clock()
        .set(NaiveDate::from_ymd_opt(2024, 7, 27).unwrap().and_hms_opt(0, 0, 0).unwrap());

    assert!(scheduler.check_for_update().await);
    assert_eq!(service.source().calls(), 2);
    assert_eq!(scheduler.last_update_date().as_deref(), Some("2024-07-27"));
    assert!(service.cache().read().is_none(), "rollover clears the stale quote");
    assert_eq!(
        service.current().map(|q| q.author),
        Some("Nelson Mandela".to_string())
    );

    // A second tick the same minute does nothing
    assert!(!scheduler.check_for_update().await);
    assert_eq!(service.source().calls(), 2);
}

#[tokio::test]
async fn test_quote_survives_restart_through_file_store() {
    let dir = TempDir::new().unwrap();

    let first = QuoteService::new(
        FileStore::with_dir(dir.path().to_path_buf()),
        RotatingSource::default(),
        clock_at(2024, 5, 10, 7, 0),
    );
    let fetched = first.get_quote_of_the_day(Role::Faculty).await;
    assert!(dir.path().join(QUOTE_KEY).exists());

    let restarted = QuoteService::new(
        FileStore::with_dir(dir.path().to_path_buf()),
        RotatingSource::default(),
        clock_at(2024, 5, 10, 18, 0),
    );
    let cached = restarted.get_quote_of_the_day(Role::Faculty).await;

    assert_eq!(restarted.source().calls(), 0);
    assert_eq!(cached.data, fetched.data);
}
