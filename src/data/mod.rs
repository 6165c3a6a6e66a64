//! Data layer: loading, joining, caching, filtering and derived series.
//!
//! Architecture:
//! ```text
//!  energy .csv / .parquet      climate .csv (optional)
//!        │                           │
//!        ▼                           ▼
//!   ┌───────────────────────────────────┐
//!   │  loader   parse, left join, sort   │──► LoadWarning (unmatched buildings)
//!   └───────────────────────────────────┘
//!        │  (memoised by `cache`, keyed by source fingerprints)
//!        ▼
//!   ┌──────────────┐
//!   │ CombinedTable │  rows + distinct buildings / zones
//!   └──────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  zones, then buildings → FilteredTable | Empty
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────────────────┐
//!   │ derive   + summary    │  EUI series, shading windows, base/peak metrics
//!   └──────────────────────┘
//! ```
//! `pipeline::run` strings the last three stages together for one interaction.

pub mod cache;
pub mod derive;
pub mod filter;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod summary;
pub mod timestamp;
