use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{EngineError, PushGateway, ResultEngine};

mod admin;
mod beneficiaries;
mod deposits;
mod reversals;
mod transactions;
mod transfers;
mod users;
mod wallets;

/// Run a block inside a DB transaction, committing on success and rolling
/// back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Facade for all ledger operations.
///
/// One instance is constructed at process start and shared behind an `Arc`;
/// each operation is an independent unit of work safe to run concurrently.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    gateway: Arc<dyn PushGateway>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    gateway: Option<Arc<dyn PushGateway>>,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Pass the mobile-money gateway used by the deposit workflow.
    pub fn gateway(mut self, gateway: Arc<dyn PushGateway>) -> EngineBuilder {
        self.gateway = Some(gateway);
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        let gateway = self
            .gateway
            .ok_or_else(|| EngineError::Gateway("push gateway not configured".to_string()))?;
        Ok(Engine {
            database: self.database,
            gateway,
        })
    }
}
