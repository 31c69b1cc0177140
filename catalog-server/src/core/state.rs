//! Server state
//!
//! Shared handles for every request: configuration, the embedded database
//! and the media store. `Clone` is shallow; handlers construct repositories
//! and the cascade engine on demand from these.

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::core::Config;
use crate::db::DbService;
use crate::hierarchy::CascadeEngine;
use crate::media::MediaStore;
use crate::utils::AppError;

#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    /// Embedded database (SurrealDB)
    pub db: Surreal<Db>,
    /// Image file store (cascade side channel)
    pub media: MediaStore,
}

impl ServerState {
    /// Initialize all services: work directory layout, database, media store
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::internal(format!("Failed to create work directory: {e}")))?;

        let db_path = config.database_dir().join("catalog.db");
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;

        let media = MediaStore::new(config.images_dir());

        Ok(Self {
            config: config.clone(),
            db: db_service.db,
            media,
        })
    }

    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// Cascade engine over this state's database and media store
    pub fn cascade_engine(&self) -> CascadeEngine {
        CascadeEngine::new(self.db.clone(), self.media.clone())
    }
}
