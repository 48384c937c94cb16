use std::sync::Arc;

use growfolio_core::db::{self, DbPool, WriteHandle};

/// Fresh on-disk database in a temp dir, migrated and ready.
pub fn setup_db(dir: &tempfile::TempDir) -> (Arc<DbPool>, WriteHandle) {
    let data_dir = dir.path().to_str().expect("temp dir path is UTF-8");

    let db_path = db::init(data_dir).expect("Failed to initialize database");
    let pool = db::create_pool(&db_path).expect("Failed to create database pool");
    db::run_migrations(&pool).expect("Failed to run migrations");

    let writer = db::spawn_writer(pool.clone());
    (pool, writer)
}
