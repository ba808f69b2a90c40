//! Shared application state.
//!
//! SQLite and bcrypt are blocking, so every storage call and every hash runs
//! on tokio's blocking pool. Storage closures return `ApiError`, which lets a
//! handler check ownership and mutate inside one writer critical section.

use std::sync::Arc;

use conduit_core::config::ConduitConfig;
use conduit_storage::connection::writer::with_immediate_transaction;
use conduit_storage::DatabaseManager;
use rusqlite::{Connection, Transaction};

use crate::auth::{password, TokenService};
use crate::error::ApiError;

pub struct AppState {
    db: Arc<DatabaseManager>,
    config: ConduitConfig,
    tokens: TokenService,
}

impl AppState {
    pub fn new(db: DatabaseManager, config: ConduitConfig) -> Arc<Self> {
        let tokens = TokenService::from_config(&config.auth);
        Arc::new(Self {
            db: Arc::new(db),
            config,
            tokens,
        })
    }

    pub fn config(&self) -> &ConduitConfig {
        &self.config
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    pub fn db(&self) -> &Arc<DatabaseManager> {
        &self.db
    }

    /// Run `f` on a pooled read connection.
    pub async fn read<F, T>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Connection) -> Result<T, ApiError> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        let outcome = tokio::task::spawn_blocking(move || db.with_reader(|conn| Ok(f(conn)))).await?;
        outcome?
    }

    /// Run `f` on the serialized writer connection.
    pub async fn write<F, T>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Connection) -> Result<T, ApiError> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        let outcome = tokio::task::spawn_blocking(move || db.with_writer(|conn| Ok(f(conn)))).await?;
        outcome?
    }

    /// Run `f` inside a BEGIN IMMEDIATE transaction on the writer.
    /// Any error rolls the whole transaction back.
    pub async fn transaction<F, T>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, ApiError> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        let outcome = tokio::task::spawn_blocking(move || {
            db.with_writer(|conn| Ok(with_immediate_transaction(conn, f)))
        })
        .await?;
        outcome?
    }

    /// bcrypt-hash a password with the configured cost.
    pub async fn hash_password(&self, plain: String) -> Result<String, ApiError> {
        let cost = self.config.auth.effective_bcrypt_cost();
        let hash = tokio::task::spawn_blocking(move || password::hash_password(&plain, cost)).await??;
        Ok(hash)
    }

    pub async fn verify_password(&self, plain: String, hash: String) -> Result<bool, ApiError> {
        Ok(tokio::task::spawn_blocking(move || password::verify_password(&plain, &hash)).await?)
    }
}
