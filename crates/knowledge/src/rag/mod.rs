//! Retrieval-and-ranking answer pipeline.
//!
//! Turns a free-text question into guidance plus a few verse quotes using
//! keyword classification, nearest-neighbor retrieval over the prebuilt
//! index, and a small ranking stage.

pub mod ask;
pub mod compose;
pub mod rank;
pub mod retrieve;
pub mod similarity;

pub use ask::WisdomEngine;
pub use compose::{Composer, FixedGuidance, GuidanceSelector};
pub use rank::{filter_rank, Ranking};
pub use similarity::text_similarity;
