use std::sync::Arc;

use chrono::NaiveDate;
use metrics::{counter, histogram};
use rust_decimal::Decimal;
use sea_orm::{TransactionError, TransactionTrait};
use tracing::{info, warn};

use crate::{
    db::DbPool,
    entities::adjustment_line::AdjustmentKind,
    errors::ServiceError,
    events::{Event, EventSender},
    services::{
        catalog::ProductCatalog,
        ledger::{
            AdjustmentRow, HeaderRecord, LedgerStore, LineRecords, MovementRow, Stream,
        },
    },
};

/// One unresolved movement line as entered: product by code, quantity and
/// price as raw text.
#[derive(Debug, Clone)]
pub struct LineDraft {
    pub product_code: String,
    pub quantity: String,
    pub price: String,
}

/// One unresolved adjustment line. Quantity is entered positive; the sign
/// is applied from `kind` during recording.
#[derive(Debug, Clone)]
pub struct AdjustmentLineDraft {
    pub product_code: String,
    pub quantity: String,
    pub price: String,
    pub kind: AdjustmentKind,
}

#[derive(Debug, Clone)]
pub struct IncomingDraft {
    pub date: NaiveDate,
    pub dn_number: String,
    pub supplier: String,
    pub remarks: String,
    pub lines: Vec<LineDraft>,
}

#[derive(Debug, Clone)]
pub struct OutgoingDraft {
    pub date: NaiveDate,
    pub cost_center: String,
    pub remarks: String,
    pub lines: Vec<LineDraft>,
}

#[derive(Debug, Clone)]
pub struct AdjustmentDraft {
    pub date: NaiveDate,
    pub remarks: String,
    pub lines: Vec<AdjustmentLineDraft>,
}

/// A complete, not-yet-committed transaction. One variant per stream;
/// there is no stringly-typed table dispatch.
#[derive(Debug, Clone)]
pub enum TransactionDraft {
    Incoming(IncomingDraft),
    Outgoing(OutgoingDraft),
    Adjustment(AdjustmentDraft),
}

impl TransactionDraft {
    pub fn stream(&self) -> Stream {
        match self {
            TransactionDraft::Incoming(_) => Stream::Incoming,
            TransactionDraft::Outgoing(_) => Stream::Outgoing,
            TransactionDraft::Adjustment(_) => Stream::Adjustment,
        }
    }

    fn line_count(&self) -> usize {
        match self {
            TransactionDraft::Incoming(d) => d.lines.len(),
            TransactionDraft::Outgoing(d) => d.lines.len(),
            TransactionDraft::Adjustment(d) => d.lines.len(),
        }
    }
}

/// The only write entry point for ledger transactions.
///
/// `record` validates a draft, resolves product and cost-center codes,
/// and commits the header together with all its lines inside one store
/// transaction. It consumes the draft by value: submitting again means
/// rebuilding the draft, and a rebuilt submission is a second, distinct
/// ledger entry by design.
#[derive(Clone, Debug)]
pub struct TransactionRecorder {
    db: Arc<DbPool>,
    catalog: ProductCatalog,
    ledger: LedgerStore,
    event_sender: Arc<EventSender>,
}

impl TransactionRecorder {
    pub fn new(
        db: Arc<DbPool>,
        catalog: ProductCatalog,
        ledger: LedgerStore,
        event_sender: Arc<EventSender>,
    ) -> Self {
        Self {
            db,
            catalog,
            ledger,
            event_sender,
        }
    }

    /// Validates and commits one transaction, returning the header id the
    /// store generated for it. Either the header and every line become
    /// visible to subsequent reads, or nothing does.
    pub async fn record(&self, draft: TransactionDraft) -> Result<i64, ServiceError> {
        let stream = draft.stream();
        let line_count = draft.line_count();

        if line_count == 0 {
            return Err(ServiceError::IntegrityError(format!(
                "{} transaction must carry at least one line",
                stream
            )));
        }

        let (header, lines) = self.resolve(draft).await?;

        let ledger = self.ledger.clone();
        let start = std::time::Instant::now();

        let result = self
            .db
            .transaction::<_, i64, ServiceError>(move |txn| {
                Box::pin(async move {
                    let header_id = ledger.insert_header(txn, &header).await?;
                    ledger.insert_lines(txn, header_id, &lines).await?;
                    Ok(header_id)
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(db_err) => ServiceError::db_error(db_err),
                TransactionError::Transaction(service_err) => service_err,
            });

        histogram!("stockbook_db.transaction.duration", start.elapsed());

        let header_id = match result {
            Ok(id) => {
                counter!("stockbook_db.transaction.committed", 1);
                id
            }
            Err(e) => {
                counter!("stockbook_db.transaction.rolled_back", 1);
                warn!(stream = %stream, "Transaction rolled back: {}", e);
                return Err(e);
            }
        };

        info!(
            stream = %stream,
            header_id,
            line_count,
            "Transaction recorded"
        );

        self.event_sender
            .send(Event::TransactionRecorded {
                stream,
                header_id,
                line_count,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(header_id)
    }

    /// Resolves a draft into storable header and line records, or fails
    /// with a `ValidationError` naming the offending field. Nothing is
    /// written here.
    async fn resolve(
        &self,
        draft: TransactionDraft,
    ) -> Result<(HeaderRecord, LineRecords), ServiceError> {
        match draft {
            TransactionDraft::Incoming(d) => {
                let mut rows = Vec::with_capacity(d.lines.len());
                for line in &d.lines {
                    rows.push(self.resolve_movement_line(line).await?);
                }
                Ok((
                    HeaderRecord::Incoming {
                        date: d.date,
                        dn_number: d.dn_number,
                        supplier: d.supplier,
                        remarks: d.remarks,
                    },
                    LineRecords::Incoming(rows),
                ))
            }
            TransactionDraft::Outgoing(d) => {
                let cost_center = self
                    .ledger
                    .find_cost_center(&d.cost_center)
                    .await?
                    .ok_or_else(|| {
                        ServiceError::ValidationError(format!(
                            "unknown cost center code '{}'",
                            d.cost_center
                        ))
                    })?;

                let mut rows = Vec::with_capacity(d.lines.len());
                for line in &d.lines {
                    rows.push(self.resolve_movement_line(line).await?);
                }
                Ok((
                    HeaderRecord::Outgoing {
                        date: d.date,
                        cost_center_id: cost_center.id,
                        remarks: d.remarks,
                    },
                    LineRecords::Outgoing(rows),
                ))
            }
            TransactionDraft::Adjustment(d) => {
                let mut rows = Vec::with_capacity(d.lines.len());
                for line in &d.lines {
                    let product = self.resolve_product(&line.product_code).await?;
                    let quantity = parse_quantity("quantity", &line.quantity)?;
                    let price = parse_amount("price", &line.price)?;
                    let quantity = match line.kind {
                        AdjustmentKind::Increase => quantity,
                        AdjustmentKind::Decrease => -quantity,
                    };
                    rows.push(AdjustmentRow {
                        product_id: product.id,
                        quantity,
                        price,
                        kind: line.kind,
                    });
                }
                Ok((
                    HeaderRecord::Adjustment {
                        date: d.date,
                        remarks: d.remarks,
                    },
                    LineRecords::Adjustment(rows),
                ))
            }
        }
    }

    async fn resolve_movement_line(&self, line: &LineDraft) -> Result<MovementRow, ServiceError> {
        let product = self.resolve_product(&line.product_code).await?;
        let quantity = parse_quantity("quantity", &line.quantity)?;
        let price = parse_amount("price", &line.price)?;
        Ok(MovementRow {
            product_id: product.id,
            quantity,
            price,
        })
    }

    async fn resolve_product(
        &self,
        code: &str,
    ) -> Result<crate::entities::product::Model, ServiceError> {
        self.catalog.find(code).await.map_err(|e| match e {
            ServiceError::NotFound(_) => {
                ServiceError::ValidationError(format!("unknown product code '{}'", code))
            }
            other => other,
        })
    }
}

/// Parses a non-negative decimal amount from raw text.
fn parse_amount(field: &str, raw: &str) -> Result<Decimal, ServiceError> {
    let value = raw.trim().parse::<Decimal>().map_err(|_| {
        ServiceError::ValidationError(format!("{} must be a number, got '{}'", field, raw))
    })?;
    if value < Decimal::ZERO {
        return Err(ServiceError::ValidationError(format!(
            "{} must not be negative, got '{}'",
            field, raw
        )));
    }
    Ok(value)
}

/// Parses a strictly positive decimal quantity from raw text.
fn parse_quantity(field: &str, raw: &str) -> Result<Decimal, ServiceError> {
    let value = parse_amount(field, raw)?;
    if value == Decimal::ZERO {
        return Err(ServiceError::ValidationError(format!(
            "{} must be greater than zero",
            field
        )));
    }
    Ok(value)
}
