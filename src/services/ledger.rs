use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    db::DbPool,
    entities::{
        adjustment_header, adjustment_line,
        adjustment_line::AdjustmentKind,
        cost_center::{self, Entity as CostCenter},
        incoming_header, incoming_line,
        outgoing_header, outgoing_line,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};

/// One of the three movement kinds, each with its own header/line table
/// pair.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum Stream {
    Incoming,
    Outgoing,
    Adjustment,
}

/// Header data for one transaction, already resolved to storable form
/// (cost centers by id, dates parsed). One variant per stream.
#[derive(Debug, Clone)]
pub enum HeaderRecord {
    Incoming {
        date: NaiveDate,
        dn_number: String,
        supplier: String,
        remarks: String,
    },
    Outgoing {
        date: NaiveDate,
        cost_center_id: i64,
        remarks: String,
    },
    Adjustment {
        date: NaiveDate,
        remarks: String,
    },
}

impl HeaderRecord {
    pub fn stream(&self) -> Stream {
        match self {
            HeaderRecord::Incoming { .. } => Stream::Incoming,
            HeaderRecord::Outgoing { .. } => Stream::Outgoing,
            HeaderRecord::Adjustment { .. } => Stream::Adjustment,
        }
    }
}

/// A resolved incoming or outgoing movement line.
#[derive(Debug, Clone)]
pub struct MovementRow {
    pub product_id: i64,
    pub quantity: Decimal,
    pub price: Decimal,
}

/// A resolved adjustment line. `quantity` already carries the sign
/// matching `kind`.
#[derive(Debug, Clone)]
pub struct AdjustmentRow {
    pub product_id: i64,
    pub quantity: Decimal,
    pub price: Decimal,
    pub kind: AdjustmentKind,
}

/// Line data for one transaction, matching the header's stream.
#[derive(Debug, Clone)]
pub enum LineRecords {
    Incoming(Vec<MovementRow>),
    Outgoing(Vec<MovementRow>),
    Adjustment(Vec<AdjustmentRow>),
}

impl LineRecords {
    pub fn len(&self) -> usize {
        match self {
            LineRecords::Incoming(rows) | LineRecords::Outgoing(rows) => rows.len(),
            LineRecords::Adjustment(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// All committed movement lines for one product, across the three streams.
#[derive(Debug, Clone, Default)]
pub struct ProductMovements {
    pub incoming: Vec<incoming_line::Model>,
    pub outgoing: Vec<outgoing_line::Model>,
    pub adjustments: Vec<adjustment_line::Model>,
}

/// Structural persistence layer for the three movement streams and the
/// cost center lookup. No business validation lives here; the recorder
/// owns validation and the transaction boundary.
#[derive(Clone, Debug)]
pub struct LedgerStore {
    db: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl LedgerStore {
    pub fn new(db: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Identifier the next committed header on `stream` will receive:
    /// `1 + max(existing ids)`, or `1` for an empty stream. Allocation
    /// itself is done by the store's auto-increment primitive inside the
    /// recorder's transaction; this is a read-side helper only.
    pub async fn next_header_id(&self, stream: Stream) -> Result<i64, ServiceError> {
        let db = self.db.as_ref();

        let max_id = match stream {
            Stream::Incoming => incoming_header::Entity::find()
                .order_by_desc(incoming_header::Column::Id)
                .one(db)
                .await
                .map_err(ServiceError::db_error)?
                .map(|h| h.id),
            Stream::Outgoing => outgoing_header::Entity::find()
                .order_by_desc(outgoing_header::Column::Id)
                .one(db)
                .await
                .map_err(ServiceError::db_error)?
                .map(|h| h.id),
            Stream::Adjustment => adjustment_header::Entity::find()
                .order_by_desc(adjustment_header::Column::Id)
                .one(db)
                .await
                .map_err(ServiceError::db_error)?
                .map(|h| h.id),
        };

        Ok(max_id.map_or(1, |id| id + 1))
    }

    /// Inserts one header row on `conn` and returns the store-generated
    /// identifier. Generic over the connection so the recorder can pass
    /// its open transaction.
    pub async fn insert_header<C: ConnectionTrait>(
        &self,
        conn: &C,
        header: &HeaderRecord,
    ) -> Result<i64, ServiceError> {
        match header {
            HeaderRecord::Incoming {
                date,
                dn_number,
                supplier,
                remarks,
            } => {
                let row = incoming_header::ActiveModel {
                    date: Set(*date),
                    dn_number: Set(dn_number.clone()),
                    supplier: Set(supplier.clone()),
                    remarks: Set(remarks.clone()),
                    ..Default::default()
                };
                let inserted = row.insert(conn).await.map_err(ServiceError::db_error)?;
                Ok(inserted.id)
            }
            HeaderRecord::Outgoing {
                date,
                cost_center_id,
                remarks,
            } => {
                let row = outgoing_header::ActiveModel {
                    date: Set(*date),
                    cost_center_id: Set(*cost_center_id),
                    remarks: Set(remarks.clone()),
                    ..Default::default()
                };
                let inserted = row.insert(conn).await.map_err(ServiceError::db_error)?;
                Ok(inserted.id)
            }
            HeaderRecord::Adjustment { date, remarks } => {
                let row = adjustment_header::ActiveModel {
                    date: Set(*date),
                    remarks: Set(remarks.clone()),
                    ..Default::default()
                };
                let inserted = row.insert(conn).await.map_err(ServiceError::db_error)?;
                Ok(inserted.id)
            }
        }
    }

    /// Inserts all lines of one transaction, tagged with their header id,
    /// on `conn`.
    pub async fn insert_lines<C: ConnectionTrait>(
        &self,
        conn: &C,
        header_id: i64,
        lines: &LineRecords,
    ) -> Result<(), ServiceError> {
        if lines.is_empty() {
            return Err(ServiceError::IntegrityError(
                "a header must not be persisted without at least one line".to_string(),
            ));
        }

        match lines {
            LineRecords::Incoming(rows) => {
                let models = rows.iter().map(|row| incoming_line::ActiveModel {
                    incoming_id: Set(header_id),
                    product_id: Set(row.product_id),
                    quantity: Set(row.quantity),
                    price: Set(row.price),
                    ..Default::default()
                });
                incoming_line::Entity::insert_many(models)
                    .exec(conn)
                    .await
                    .map_err(ServiceError::db_error)?;
            }
            LineRecords::Outgoing(rows) => {
                let models = rows.iter().map(|row| outgoing_line::ActiveModel {
                    outgoing_id: Set(header_id),
                    product_id: Set(row.product_id),
                    quantity: Set(row.quantity),
                    price: Set(row.price),
                    ..Default::default()
                });
                outgoing_line::Entity::insert_many(models)
                    .exec(conn)
                    .await
                    .map_err(ServiceError::db_error)?;
            }
            LineRecords::Adjustment(rows) => {
                let models = rows.iter().map(|row| adjustment_line::ActiveModel {
                    adjustment_id: Set(header_id),
                    product_id: Set(row.product_id),
                    quantity: Set(row.quantity),
                    price: Set(row.price),
                    kind: Set(row.kind.as_str().to_string()),
                    ..Default::default()
                });
                adjustment_line::Entity::insert_many(models)
                    .exec(conn)
                    .await
                    .map_err(ServiceError::db_error)?;
            }
        }

        Ok(())
    }

    /// Creates a cost center and returns its identifier.
    pub async fn insert_cost_center(
        &self,
        code: &str,
        description: &str,
    ) -> Result<i64, ServiceError> {
        let db = self.db.as_ref();

        let row = cost_center::ActiveModel {
            code: Set(code.to_string()),
            description: Set(description.to_string()),
            ..Default::default()
        };
        let inserted = row.insert(db).await.map_err(ServiceError::db_error)?;

        self.event_sender
            .send(Event::CostCenterCreated {
                cost_center_id: inserted.id,
            })
            .await
            .map_err(ServiceError::EventError)?;

        info!(cost_center_id = inserted.id, code = %code, "Cost center created");

        Ok(inserted.id)
    }

    /// Looks up a cost center by code. `None` means the code is unknown;
    /// the recorder surfaces that as a user input error.
    pub async fn find_cost_center(
        &self,
        code: &str,
    ) -> Result<Option<cost_center::Model>, ServiceError> {
        let db = self.db.as_ref();

        CostCenter::find()
            .filter(cost_center::Column::Code.eq(code))
            .one(db)
            .await
            .map_err(ServiceError::db_error)
    }

    pub async fn list_cost_centers(&self) -> Result<Vec<cost_center::Model>, ServiceError> {
        let db = self.db.as_ref();

        CostCenter::find()
            .order_by_asc(cost_center::Column::Id)
            .all(db)
            .await
            .map_err(ServiceError::db_error)
    }

    /// Returns every committed line referencing `product_id`, across all
    /// three streams.
    pub async fn query_movements(&self, product_id: i64) -> Result<ProductMovements, ServiceError> {
        let db = self.db.as_ref();

        let incoming = incoming_line::Entity::find()
            .filter(incoming_line::Column::ProductId.eq(product_id))
            .order_by_asc(incoming_line::Column::Id)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let outgoing = outgoing_line::Entity::find()
            .filter(outgoing_line::Column::ProductId.eq(product_id))
            .order_by_asc(outgoing_line::Column::Id)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let adjustments = adjustment_line::Entity::find()
            .filter(adjustment_line::Column::ProductId.eq(product_id))
            .order_by_asc(adjustment_line::Column::Id)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(ProductMovements {
            incoming,
            outgoing,
            adjustments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_round_trips_through_strings() {
        for stream in [Stream::Incoming, Stream::Outgoing, Stream::Adjustment] {
            let parsed: Stream = stream.to_string().parse().unwrap();
            assert_eq!(parsed, stream);
        }
    }

    #[test]
    fn line_records_report_length() {
        let rows = LineRecords::Incoming(vec![MovementRow {
            product_id: 1,
            quantity: Decimal::ONE,
            price: Decimal::TEN,
        }]);
        assert_eq!(rows.len(), 1);
        assert!(!rows.is_empty());
        assert!(LineRecords::Adjustment(Vec::new()).is_empty());
    }
}
