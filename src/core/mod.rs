pub mod access;
pub mod catalog;
pub mod export;
pub mod gallery;
pub mod leaderboard;
pub mod palindrome;
pub mod projection;
pub mod stats;
pub mod upload;

pub use crate::domain::model::{
    Collector, CollectorStats, CollectorSummary, Find, GalleryFilter, GalleryItem,
    LeaderboardEntry,
};
pub use crate::domain::ports::{ConfigProvider, ObjectStorage, RecordSource};
pub use crate::utils::error::Result;
