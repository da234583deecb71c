//! tc-db: music library persistence layer.
//!
//! This crate provides SQLite-backed storage with connection pooling,
//! embedded migrations, row mappers, and query modules for genres, artists,
//! albums and songs.

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
