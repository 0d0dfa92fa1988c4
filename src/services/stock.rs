use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use sea_orm::{EntityTrait, QueryOrder};
use serde::Serialize;
use tracing::debug;

use crate::{
    db::DbPool,
    entities::{adjustment_line, incoming_line, outgoing_line, product},
    errors::ServiceError,
};

/// Current position of one product, derived from the ledger.
#[derive(Debug, Clone, Serialize)]
pub struct StockRow {
    pub product: product::Model,
    pub quantity_on_hand: Decimal,
    pub unit_rate: Decimal,
    pub value: Decimal,
}

/// Full stock snapshot, ordered by product id. `total_value` sums the
/// `value` column across all rows.
#[derive(Debug, Clone, Serialize)]
pub struct StockSnapshot {
    pub rows: Vec<StockRow>,
    pub total_value: Decimal,
}

#[derive(Default)]
struct ReceiptTotals {
    quantity: Decimal,
    price_sum: Decimal,
    line_count: u32,
}

/// The read side of the ledger: joins the product master against all
/// three movement streams and re-derives quantity and valuation on every
/// call. There is no running balance to drift.
#[derive(Clone, Debug)]
pub struct StockAggregator {
    db: Arc<DbPool>,
}

impl StockAggregator {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Derives the current stock position of every product.
    ///
    /// on_hand = Σ incoming − Σ outgoing + Σ adjustment (signed);
    /// unit_rate = average incoming line price; value = on_hand × rate.
    /// Products with no movements report zero, never a missing value.
    pub async fn current_stock(&self) -> Result<StockSnapshot, ServiceError> {
        let db = self.db.as_ref();

        let products = product::Entity::find()
            .order_by_asc(product::Column::Id)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let incoming = incoming_line::Entity::find()
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let outgoing = outgoing_line::Entity::find()
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let adjustments = adjustment_line::Entity::find()
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let mut received: HashMap<i64, ReceiptTotals> = HashMap::new();
        for line in &incoming {
            let totals = received.entry(line.product_id).or_default();
            totals.quantity += line.quantity;
            totals.price_sum += line.price;
            totals.line_count += 1;
        }

        let mut issued: HashMap<i64, Decimal> = HashMap::new();
        for line in &outgoing {
            *issued.entry(line.product_id).or_default() += line.quantity;
        }

        let mut adjusted: HashMap<i64, Decimal> = HashMap::new();
        for line in &adjustments {
            *adjusted.entry(line.product_id).or_default() += line.quantity;
        }

        let mut rows = Vec::with_capacity(products.len());
        let mut total_value = Decimal::ZERO;

        for product in products {
            let (received_qty, unit_rate) = match received.get(&product.id) {
                Some(totals) if totals.line_count > 0 => (
                    totals.quantity,
                    totals.price_sum / Decimal::from(totals.line_count),
                ),
                _ => (Decimal::ZERO, Decimal::ZERO),
            };
            let issued_qty = issued.get(&product.id).copied().unwrap_or(Decimal::ZERO);
            let adjusted_qty = adjusted.get(&product.id).copied().unwrap_or(Decimal::ZERO);

            let quantity_on_hand = received_qty - issued_qty + adjusted_qty;
            let value = quantity_on_hand * unit_rate;
            total_value += value;

            rows.push(StockRow {
                product,
                quantity_on_hand,
                unit_rate,
                value,
            });
        }

        debug!(products = rows.len(), %total_value, "Stock snapshot derived");

        Ok(StockSnapshot { rows, total_value })
    }
}
