// Adapters layer: concrete implementations for external systems (record store, object storage).

pub mod cache;
pub mod rest;
pub mod s3;
pub mod snapshot;
pub mod storage;
