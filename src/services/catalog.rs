use std::sync::Arc;

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::{info, instrument};

use crate::{
    db::DbPool,
    entities::product::{self, Column as ProductColumn, Entity as Product},
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Input for creating a catalog entry. Code and unit are immutable after
/// creation.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub code: String,
    pub description: String,
    pub unit: String,
    pub price: Decimal,
    pub max_qty: Decimal,
    pub min_qty: Decimal,
}

/// Input for editing an existing catalog entry.
#[derive(Debug, Clone)]
pub struct ProductUpdate {
    pub description: String,
    pub price: Decimal,
    pub max_qty: Decimal,
    pub min_qty: Decimal,
}

/// Master list of stockable items. Other components read it for pricing
/// and validation; products are never deleted.
#[derive(Clone, Debug)]
pub struct ProductCatalog {
    db: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl ProductCatalog {
    pub fn new(db: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Creates a product and returns its identifier.
    #[instrument(skip(self))]
    pub async fn create(&self, input: NewProduct) -> Result<i64, ServiceError> {
        if input.code.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "product code must not be empty".to_string(),
            ));
        }
        if input.description.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "product description must not be empty".to_string(),
            ));
        }
        if input.price < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "product price must not be negative".to_string(),
            ));
        }

        let db = self.db.as_ref();

        let row = product::ActiveModel {
            code: Set(input.code.clone()),
            description: Set(input.description),
            unit: Set(input.unit),
            price: Set(input.price),
            max_qty: Set(input.max_qty),
            min_qty: Set(input.min_qty),
            ..Default::default()
        };
        let inserted = row.insert(db).await.map_err(ServiceError::db_error)?;

        self.event_sender
            .send(Event::ProductCreated {
                product_id: inserted.id,
            })
            .await
            .map_err(ServiceError::EventError)?;

        info!(product_id = inserted.id, code = %input.code, "Product created");

        Ok(inserted.id)
    }

    /// Edits the mutable fields of a product. Code and unit stay as
    /// created.
    #[instrument(skip(self))]
    pub async fn update(
        &self,
        id: i64,
        update: ProductUpdate,
    ) -> Result<product::Model, ServiceError> {
        if update.description.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "product description must not be empty".to_string(),
            ));
        }
        if update.price < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "product price must not be negative".to_string(),
            ));
        }

        let db = self.db.as_ref();

        let existing = Product::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Product with id {} not found", id)))?;

        let mut row: product::ActiveModel = existing.into();
        row.description = Set(update.description);
        row.price = Set(update.price);
        row.max_qty = Set(update.max_qty);
        row.min_qty = Set(update.min_qty);

        let updated = row.update(db).await.map_err(ServiceError::db_error)?;

        self.event_sender
            .send(Event::ProductUpdated {
                product_id: updated.id,
            })
            .await
            .map_err(ServiceError::EventError)?;

        info!(product_id = updated.id, "Product updated");

        Ok(updated)
    }

    /// All products in creation order.
    pub async fn list(&self) -> Result<Vec<product::Model>, ServiceError> {
        let db = self.db.as_ref();

        Product::find()
            .order_by_asc(ProductColumn::Id)
            .all(db)
            .await
            .map_err(ServiceError::db_error)
    }

    /// Looks up a product by code. Not-found is a user input error for
    /// callers feeding ledger lines, not a system fault.
    pub async fn find(&self, code: &str) -> Result<product::Model, ServiceError> {
        let db = self.db.as_ref();

        Product::find()
            .filter(ProductColumn::Code.eq(code))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("No product with code '{}'", code)))
    }

    pub async fn get(&self, id: i64) -> Result<product::Model, ServiceError> {
        let db = self.db.as_ref();

        Product::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Product with id {} not found", id)))
    }

    /// Substring search over code and description, in creation order.
    pub async fn search(&self, term: &str) -> Result<Vec<product::Model>, ServiceError> {
        let db = self.db.as_ref();

        Product::find()
            .filter(
                ProductColumn::Code
                    .contains(term)
                    .or(ProductColumn::Description.contains(term)),
            )
            .order_by_asc(ProductColumn::Id)
            .all(db)
            .await
            .map_err(ServiceError::db_error)
    }
}
