mod common;

use assert_matches::assert_matches;
use rust_decimal_macros::dec;
use stockbook::{
    errors::ServiceError,
    services::catalog::{NewProduct, ProductUpdate},
};

use common::{seed_product, TestApp};

fn new_product(code: &str) -> NewProduct {
    NewProduct {
        code: code.to_string(),
        description: format!("{} description", code),
        unit: "EA".to_string(),
        price: dec!(25.00),
        max_qty: dec!(100),
        min_qty: dec!(10),
    }
}

#[tokio::test]
async fn create_then_find_by_code() {
    let app = TestApp::new().await;

    let id = app.book.catalog.create(new_product("BOLT-M6")).await.unwrap();
    assert_eq!(id, 1);

    let found = app.book.catalog.find("BOLT-M6").await.unwrap();
    assert_eq!(found.id, id);
    assert_eq!(found.description, "BOLT-M6 description");
    assert_eq!(found.unit, "EA");
    assert_eq!(found.price, dec!(25.00));
}

#[tokio::test]
async fn create_rejects_empty_code_and_description() {
    let app = TestApp::new().await;

    let mut input = new_product("");
    assert_matches!(
        app.book.catalog.create(input).await,
        Err(ServiceError::ValidationError(_))
    );

    input = new_product("BOLT-M6");
    input.description = "   ".to_string();
    assert_matches!(
        app.book.catalog.create(input).await,
        Err(ServiceError::ValidationError(_))
    );

    input = new_product("BOLT-M6");
    input.price = dec!(-1);
    assert_matches!(
        app.book.catalog.create(input).await,
        Err(ServiceError::ValidationError(_))
    );

    // Nothing was persisted by the rejected attempts.
    assert!(app.book.catalog.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn find_unknown_code_is_not_found() {
    let app = TestApp::new().await;

    assert_matches!(
        app.book.catalog.find("NOPE").await,
        Err(ServiceError::NotFound(_))
    );
}

#[tokio::test]
async fn update_edits_mutable_fields_only() {
    let app = TestApp::new().await;

    let id = app.book.catalog.create(new_product("PIPE-10")).await.unwrap();

    let updated = app
        .book
        .catalog
        .update(
            id,
            ProductUpdate {
                description: "Galvanized pipe 10mm".to_string(),
                price: dec!(31.75),
                max_qty: dec!(200),
                min_qty: dec!(20),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.description, "Galvanized pipe 10mm");
    assert_eq!(updated.price, dec!(31.75));
    assert_eq!(updated.max_qty, dec!(200));
    assert_eq!(updated.min_qty, dec!(20));
    // Code and unit are immutable after creation.
    assert_eq!(updated.code, "PIPE-10");
    assert_eq!(updated.unit, "EA");
}

#[tokio::test]
async fn update_unknown_id_is_not_found() {
    let app = TestApp::new().await;

    assert_matches!(
        app.book
            .catalog
            .update(
                99,
                ProductUpdate {
                    description: "x".to_string(),
                    price: dec!(1),
                    max_qty: dec!(1),
                    min_qty: dec!(1),
                },
            )
            .await,
        Err(ServiceError::NotFound(_))
    );
}

#[tokio::test]
async fn list_returns_products_in_creation_order() {
    let app = TestApp::new().await;

    seed_product(&app, "CEMENT", "Portland cement").await;
    seed_product(&app, "SAND", "Washed sand").await;
    seed_product(&app, "GRAVEL", "Crushed gravel").await;

    let listed = app.book.catalog.list().await.unwrap();
    let codes: Vec<_> = listed.iter().map(|p| p.code.as_str()).collect();
    assert_eq!(codes, ["CEMENT", "SAND", "GRAVEL"]);
    assert_eq!(listed[0].id, 1);
    assert_eq!(listed[2].id, 3);
}

#[tokio::test]
async fn search_matches_code_and_description() {
    let app = TestApp::new().await;

    seed_product(&app, "CEMENT", "Portland cement").await;
    seed_product(&app, "SAND", "Washed sand").await;
    seed_product(&app, "WIRE-16", "Tie wire, sand-resistant coating").await;

    let by_code = app.book.catalog.search("CEMENT").await.unwrap();
    assert_eq!(by_code.len(), 1);
    assert_eq!(by_code[0].code, "CEMENT");

    let by_description = app.book.catalog.search("sand").await.unwrap();
    assert_eq!(by_description.len(), 2);

    assert!(app.book.catalog.search("missing").await.unwrap().is_empty());
}
