//! Domain types for RegimeLab

pub mod observation;
pub mod regime;
pub mod signal;
pub mod variant;

pub use observation::{AlignedSeries, DatedValue, Observation};
pub use regime::VolRegime;
pub use signal::Signal;
pub use variant::PortfolioVariant;
