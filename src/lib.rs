//! Stockbook
//!
//! Inventory ledger core for small-business stock tracking. The crate
//! holds a product master list and three append-only movement streams
//! (incoming receipts, outgoing issues, inventory adjustments), commits
//! each multi-line transaction as one atomic unit, and derives current
//! stock and valuation by aggregating the streams against the master.
//!
//! The crate is a library consumed in-process: no network surface, no
//! rendering. Hosts open a store through [`Stockbook::connect`] and use
//! the component handles it exposes.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod logging;
pub mod migrator;
pub mod services;

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::errors::ServiceError;
use crate::events::Event;
use crate::services::{
    access::{AccessGuard, LoginSession},
    catalog::ProductCatalog,
    ledger::LedgerStore,
    recorder::TransactionRecorder,
    stock::StockAggregator,
};

/// Wired component set sharing one open store handle.
///
/// Every component receives the handle at construction; there is no
/// ambient global connection. Mutating services also share the event
/// sender whose receiving end `connect` hands back to the host.
#[derive(Debug)]
pub struct Stockbook {
    db: Arc<DbPool>,
    login_attempt_limit: u8,
    pub catalog: ProductCatalog,
    pub ledger: LedgerStore,
    pub recorder: TransactionRecorder,
    pub stock: StockAggregator,
    pub access: AccessGuard,
}

impl Stockbook {
    /// Opens the configured store, optionally runs migrations, and wires
    /// all components. Returns the facade together with the receiving end
    /// of the event channel; the host should keep the receiver alive for
    /// as long as it mutates the store.
    ///
    /// # Errors
    /// `ServiceError::StoreUnavailable` if the store cannot be opened.
    pub async fn connect(
        config: &AppConfig,
    ) -> Result<(Self, mpsc::Receiver<Event>), ServiceError> {
        let db = Arc::new(db::establish_connection_from_app_config(config).await?);

        if config.auto_migrate {
            db::run_migrations(db.as_ref()).await?;
        }

        let (event_sender, receiver) = events::channel(config.event_channel_capacity);
        let event_sender = Arc::new(event_sender);

        let catalog = ProductCatalog::new(db.clone(), event_sender.clone());
        let ledger = LedgerStore::new(db.clone(), event_sender.clone());
        let recorder = TransactionRecorder::new(
            db.clone(),
            catalog.clone(),
            ledger.clone(),
            event_sender.clone(),
        );
        let stock = StockAggregator::new(db.clone());
        let access = AccessGuard::new(db.clone(), event_sender);

        Ok((
            Self {
                db,
                login_attempt_limit: config.max_login_attempts,
                catalog,
                ledger,
                recorder,
                stock,
                access,
            },
            receiver,
        ))
    }

    /// Starts a login session with the configured attempt limit.
    pub fn login_session(&self) -> LoginSession {
        LoginSession::new(self.login_attempt_limit)
    }

    /// The shared store handle.
    pub fn db(&self) -> &DbPool {
        self.db.as_ref()
    }
}
