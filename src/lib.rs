pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{CliConfig, Command, OutputFormat};
pub use config::{toml_config::TomlConfig, Settings, SourceSelection};

#[cfg(feature = "s3")]
pub use adapters::s3::S3Storage;
pub use adapters::{
    cache::{QueryCache, QueryTag},
    rest::RestSource,
    snapshot::{Snapshot, SnapshotSource},
    storage::LocalStorage,
};

pub use crate::core::{
    catalog::Catalog,
    gallery::{filter_gallery, join_finds_with_collectors},
    leaderboard::generate_leaderboard,
    palindrome::{format_license_plate, is_palindrome, normalize_plate},
    stats::calculate_collector_stats,
    upload::UploadService,
};
pub use domain::model::*;
pub use utils::error::{GalleryError, Result};
