//! Built-in strategy rules.

pub mod duration;
pub mod leverage;
pub mod market;
pub mod sizing;

pub use duration::{HoldLongerRule, QuickInOutRule};
pub use leverage::HighLeverageRule;
pub use market::{DiversifiedRule, FocusedMarketRule};
pub use sizing::SimilarSizingRule;
