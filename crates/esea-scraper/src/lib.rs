//! Classification and extraction of ESEA match-report pages.
//!
//! [`classify`] decides which page variant a rendered snapshot is, and
//! [`extract`] turns a snapshot of a known variant into a
//! [`esea_core::GameRecord`]. Both are synchronous and read-only. Fetching
//! pages lives in [`fetch`] at the boundary.

pub mod classify;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod landmarks;
pub mod snapshot;
mod text;

pub use classify::classify;
pub use error::{ExtractError, FetchError, LandmarkError};
pub use extract::extract;
pub use fetch::{
    FetchSession, HttpFetcher, PageFetcher, RenderedPage, SessionTracker, SnapshotDirFetcher,
};
pub use landmarks::{CompiledLandmarks, Landmarks, RecapColumns, ScoreboardColumns};
pub use snapshot::PageSnapshot;
