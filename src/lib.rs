// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod analyze;
pub mod api;
pub mod comment;
pub mod error;
pub mod export;
pub mod ingest;
pub mod metrics;
pub mod normalize;
pub mod sentiment;
pub mod view;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, ApiState};
pub use crate::comment::{CanonicalComment, RawRow, Sentiment};
pub use crate::error::{LoadError, MalformedRow};
pub use crate::normalize::{normalize_row, normalize_rows};
pub use crate::view::{RefreshTimer, ViewOrchestrator, ViewPhase, ViewSnapshot};
