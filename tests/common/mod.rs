use chrono::NaiveDate;
use rust_decimal_macros::dec;
use stockbook::{
    config::AppConfig,
    events::Event,
    services::catalog::NewProduct,
    Stockbook,
};
use tokio::sync::mpsc;

/// Helper harness wiring a full component set against an in-memory
/// SQLite store. The pool is pinned to a single connection so the store
/// lives for the duration of the test.
pub struct TestApp {
    pub book: Stockbook,
    #[allow(dead_code)]
    events: mpsc::Receiver<Event>,
}

impl TestApp {
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new("sqlite::memory:");
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;
        cfg.auto_migrate = true;

        let (book, events) = Stockbook::connect(&cfg)
            .await
            .expect("Failed to open in-memory store");

        Self { book, events }
    }

    /// Drains and returns all events emitted so far.
    #[allow(dead_code)]
    pub fn drain_events(&mut self) -> Vec<Event> {
        let mut drained = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            drained.push(event);
        }
        drained
    }
}

#[allow(dead_code)]
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Seeds one catalog entry and returns its id.
#[allow(dead_code)]
pub async fn seed_product(app: &TestApp, code: &str, description: &str) -> i64 {
    app.book
        .catalog
        .create(NewProduct {
            code: code.to_string(),
            description: description.to_string(),
            unit: "EA".to_string(),
            price: dec!(10.00),
            max_qty: dec!(500),
            min_qty: dec!(5),
        })
        .await
        .expect("Failed to seed product")
}
