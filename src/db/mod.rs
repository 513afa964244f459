//! Database layer
//!
//! Connection pools for SQLite (default) and MySQL, embedded migrations,
//! and the repositories the services are built on.

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{
    create_pool, create_test_pool, DatabasePool, DynDatabasePool, MysqlDatabase, SqliteDatabase,
};
