//! Builders wiring outbound adapters into the driving ports used by HTTP.

use std::sync::Arc;

use tracing::info;

use crate::domain::ports::{PasswordHasher, TaskRepository, UserRepository};
use crate::domain::{
    AccountService, CompressionPolicy, FamilyDirectory, ImageIngestionPool,
    RandomFamilyCodeGenerator, SizeConstrainedCompressor, TaskBoardService,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::InMemoryBoardStore;
use crate::outbound::persistence::{
    DbPool, DieselTaskRepository, DieselUserRepository, PoolConfig, PoolError,
};
use crate::outbound::raster::RasterImageCodec;

/// Repository pair backing the services.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub tasks: Arc<dyn TaskRepository>,
}

impl Repositories {
    /// Both ports served by one in-process store.
    #[must_use]
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryBoardStore::new());
        Self {
            users: store.clone(),
            tasks: store,
        }
    }

    /// Connect to PostgreSQL and apply pending migrations.
    pub async fn postgres(database_url: &str) -> Result<Self, PoolError> {
        let pool = DbPool::new(PoolConfig::new(database_url)).await?;
        let applied = pool.run_migrations().await?;
        info!(applied, "database ready");
        Ok(Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            tasks: Arc::new(DieselTaskRepository::new(pool)),
        })
    }
}

/// Image pipeline knobs.
#[derive(Clone)]
pub struct IngestionSettings {
    pub policy: CompressionPolicy,
    pub workers: usize,
}

/// Assemble the domain services and expose them as HTTP state.
#[must_use]
pub fn build_http_state(
    repositories: Repositories,
    hasher: Arc<dyn PasswordHasher>,
    ingestion: IngestionSettings,
    max_upload_bytes: usize,
) -> HttpState {
    let Repositories { users, tasks } = repositories;
    let directory = FamilyDirectory::new(users.clone(), Arc::new(RandomFamilyCodeGenerator));
    let accounts = Arc::new(AccountService::new(users, hasher, directory.clone()));
    let compressor =
        SizeConstrainedCompressor::new(Arc::new(RasterImageCodec::default()), ingestion.policy);
    let board = Arc::new(TaskBoardService::new(
        tasks,
        directory.clone(),
        ImageIngestionPool::new(compressor, ingestion.workers),
    ));
    let directory = Arc::new(directory);

    HttpState::new(
        HttpStatePorts {
            login: accounts.clone(),
            registration: accounts,
            family_query: directory.clone(),
            family_command: directory,
            tasks: board.clone(),
            dashboard: board,
        },
        max_upload_bytes,
    )
}
