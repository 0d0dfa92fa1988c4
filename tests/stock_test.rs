mod common;

use rust_decimal_macros::dec;
use stockbook::{
    entities::adjustment_line::AdjustmentKind,
    services::recorder::{
        AdjustmentDraft, AdjustmentLineDraft, IncomingDraft, LineDraft, OutgoingDraft,
        TransactionDraft,
    },
};

use common::{date, seed_product, TestApp};

async fn receive(app: &TestApp, code: &str, quantity: &str, price: &str) {
    app.book
        .recorder
        .record(TransactionDraft::Incoming(IncomingDraft {
            date: date(2024, 3, 1),
            dn_number: "DN-1".to_string(),
            supplier: "Acme Trading".to_string(),
            remarks: String::new(),
            lines: vec![LineDraft {
                product_code: code.to_string(),
                quantity: quantity.to_string(),
                price: price.to_string(),
            }],
        }))
        .await
        .unwrap();
}

async fn issue(app: &TestApp, code: &str, quantity: &str, price: &str) {
    app.book
        .recorder
        .record(TransactionDraft::Outgoing(OutgoingDraft {
            date: date(2024, 3, 2),
            cost_center: "MAINT".to_string(),
            remarks: String::new(),
            lines: vec![LineDraft {
                product_code: code.to_string(),
                quantity: quantity.to_string(),
                price: price.to_string(),
            }],
        }))
        .await
        .unwrap();
}

async fn adjust(app: &TestApp, code: &str, quantity: &str, price: &str, kind: AdjustmentKind) {
    app.book
        .recorder
        .record(TransactionDraft::Adjustment(AdjustmentDraft {
            date: date(2024, 3, 3),
            remarks: String::new(),
            lines: vec![AdjustmentLineDraft {
                product_code: code.to_string(),
                quantity: quantity.to_string(),
                price: price.to_string(),
                kind,
            }],
        }))
        .await
        .unwrap();
}

#[tokio::test]
async fn empty_catalog_yields_empty_snapshot() {
    let app = TestApp::new().await;

    let snapshot = app.book.stock.current_stock().await.unwrap();
    assert!(snapshot.rows.is_empty());
    assert_eq!(snapshot.total_value, dec!(0));
}

#[tokio::test]
async fn product_without_movements_reports_zero_not_missing() {
    let app = TestApp::new().await;
    seed_product(&app, "BOLT-M6", "Hex bolt M6").await;

    let snapshot = app.book.stock.current_stock().await.unwrap();
    assert_eq!(snapshot.rows.len(), 1);

    let row = &snapshot.rows[0];
    assert_eq!(row.quantity_on_hand, dec!(0));
    assert_eq!(row.unit_rate, dec!(0));
    assert_eq!(row.value, dec!(0));
    assert_eq!(snapshot.total_value, dec!(0));
}

#[tokio::test]
async fn on_hand_combines_all_three_streams() {
    let app = TestApp::new().await;
    seed_product(&app, "BOLT-M6", "Hex bolt M6").await;
    app.book
        .ledger
        .insert_cost_center("MAINT", "Maintenance department")
        .await
        .unwrap();

    receive(&app, "BOLT-M6", "100", "10").await;
    issue(&app, "BOLT-M6", "30", "12").await;
    adjust(&app, "BOLT-M6", "5", "10", AdjustmentKind::Decrease).await;

    let snapshot = app.book.stock.current_stock().await.unwrap();
    let row = &snapshot.rows[0];

    // 100 received - 30 issued - 5 adjusted away.
    assert_eq!(row.quantity_on_hand, dec!(65));
    // Average of incoming prices only; the outgoing price plays no part.
    assert_eq!(row.unit_rate, dec!(10));
    assert_eq!(row.value, dec!(650));
    assert_eq!(snapshot.total_value, dec!(650));
}

#[tokio::test]
async fn unit_rate_averages_incoming_prices() {
    let app = TestApp::new().await;
    seed_product(&app, "BOLT-M6", "Hex bolt M6").await;

    receive(&app, "BOLT-M6", "10", "10").await;
    receive(&app, "BOLT-M6", "10", "20").await;

    let snapshot = app.book.stock.current_stock().await.unwrap();
    let row = &snapshot.rows[0];
    assert_eq!(row.quantity_on_hand, dec!(20));
    assert_eq!(row.unit_rate, dec!(15));
    assert_eq!(row.value, dec!(300));
}

#[tokio::test]
async fn increase_adjustment_adds_to_stock() {
    let app = TestApp::new().await;
    seed_product(&app, "BOLT-M6", "Hex bolt M6").await;

    receive(&app, "BOLT-M6", "10", "4").await;
    adjust(&app, "BOLT-M6", "2", "4", AdjustmentKind::Increase).await;

    let snapshot = app.book.stock.current_stock().await.unwrap();
    assert_eq!(snapshot.rows[0].quantity_on_hand, dec!(12));
}

#[tokio::test]
async fn snapshot_orders_rows_by_product_id_and_sums_value() {
    let app = TestApp::new().await;
    let bolt = seed_product(&app, "BOLT-M6", "Hex bolt M6").await;
    let nut = seed_product(&app, "NUT-M6", "Hex nut M6").await;

    receive(&app, "NUT-M6", "10", "2").await;
    receive(&app, "BOLT-M6", "10", "3").await;

    let snapshot = app.book.stock.current_stock().await.unwrap();
    assert_eq!(snapshot.rows.len(), 2);
    assert_eq!(snapshot.rows[0].product.id, bolt);
    assert_eq!(snapshot.rows[1].product.id, nut);
    assert_eq!(snapshot.total_value, dec!(50));

    // Each query re-derives the snapshot; a new movement shows up on the
    // next call without any cached balance.
    receive(&app, "BOLT-M6", "10", "3").await;
    let snapshot = app.book.stock.current_stock().await.unwrap();
    assert_eq!(snapshot.rows[0].quantity_on_hand, dec!(20));
    assert_eq!(snapshot.total_value, dec!(80));
}
