//! Query layer: every function takes the unified table by reference and
//! recomputes from scratch. Nothing here caches or mutates.
//!
//! ```text
//!   &Dataset ─▶ Filter::apply ─▶ Vec<&Record>
//!                                   │
//!          ┌────────────┬───────────┼─────────────┬──────────────┐
//!          ▼            ▼           ▼             ▼              ▼
//!       stats::mean  leaderboard  shape::      shape::       options
//!                                 time_series  breakdown
//!          └────────────┴───────────┴─────┬───────┴──────────────┘
//!                                         ▼
//!                                     sections   (one per dashboard tab)
//! ```

pub mod leaderboard;
pub mod options;
pub mod sections;
pub mod shape;
pub mod stats;
