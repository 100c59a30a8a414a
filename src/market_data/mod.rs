pub mod cache;
pub mod history;

pub use cache::{CachedProvider, TtlCache};
pub use history::{FileHistoryProvider, PriceHistory, PriceHistoryProvider, SeriesPoint};
