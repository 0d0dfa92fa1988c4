use assert_matches::assert_matches;
use rust_decimal_macros::dec;
use stockbook::{
    config::AppConfig,
    errors::ServiceError,
    services::{
        catalog::NewProduct,
        recorder::{IncomingDraft, LineDraft, TransactionDraft},
    },
    Stockbook,
};
use tempfile::TempDir;

fn file_config(dir: &TempDir) -> AppConfig {
    let path = dir.path().join("stock.db");
    let mut cfg = AppConfig::new(format!("sqlite://{}?mode=rwc", path.display()));
    cfg.db_max_connections = 1;
    cfg.db_min_connections = 1;
    cfg
}

#[tokio::test]
async fn committed_rows_survive_a_reconnect() {
    let dir = TempDir::new().unwrap();
    let cfg = file_config(&dir);

    {
        let (book, _events) = Stockbook::connect(&cfg).await.unwrap();

        book.catalog
            .create(NewProduct {
                code: "BOLT-M6".to_string(),
                description: "Hex bolt M6".to_string(),
                unit: "EA".to_string(),
                price: dec!(2.50),
                max_qty: dec!(500),
                min_qty: dec!(50),
            })
            .await
            .unwrap();

        book.recorder
            .record(TransactionDraft::Incoming(IncomingDraft {
                date: chrono::NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
                dn_number: "DN-1001".to_string(),
                supplier: "Acme Trading".to_string(),
                remarks: String::new(),
                lines: vec![LineDraft {
                    product_code: "BOLT-M6".to_string(),
                    quantity: "100".to_string(),
                    price: "2.50".to_string(),
                }],
            }))
            .await
            .unwrap();
    }

    // Reopen the same file; migrations are idempotent and the data is
    // still there.
    let (book, _events) = Stockbook::connect(&cfg).await.unwrap();

    let product = book.catalog.find("BOLT-M6").await.unwrap();
    let movements = book.ledger.query_movements(product.id).await.unwrap();
    assert_eq!(movements.incoming.len(), 1);
    assert_eq!(movements.incoming[0].quantity, dec!(100));

    // The bootstrap user was seeded exactly once.
    let users = book.access.list_users().await.unwrap();
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn unopenable_store_is_fatal() {
    let cfg = AppConfig::new("sqlite:///no/such/directory/stock.db?mode=rwc");

    let result = Stockbook::connect(&cfg).await;
    assert_matches!(result, Err(ServiceError::StoreUnavailable(_)));
}
