//! Learning-state inference over emotion observation windows
//!
//! Pure functions from ordered observation windows (plus a progress snapshot)
//! to pattern summaries, effectiveness scores, recommendation bundles, and
//! coarse learning-state labels. Nothing here touches storage or the clock;
//! callers fetch the window and pass it in.

pub mod effectiveness;
pub mod pattern;
pub mod recommend;
pub mod state;

/// Default recency window passed through the analysis contract
pub const DEFAULT_TIME_WINDOW_MINUTES: u32 = 30;

pub use effectiveness::score_effectiveness;
pub use pattern::analyze_pattern;
pub use recommend::{build_learning_plan, recommend_for_score, RecommendationEngine};
pub use state::classify_state;
