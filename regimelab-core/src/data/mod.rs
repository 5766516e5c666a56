//! Source series handling: provider abstraction, alignment, synthetic generation.

pub mod align;
pub mod provider;
pub mod synthetic;

pub use align::{align_series, unmatched_counts, AlignError, SeriesRole};
pub use provider::{DataError, DataSource, SeriesProvider};
pub use synthetic::{SyntheticConfig, SyntheticProvider};
