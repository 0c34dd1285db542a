pub mod classifier;
pub mod provider;
pub mod tiers;
pub mod validator;

pub use classifier::{classify, BadgeVariant, BandIcon, Classification, SeverityBand};
pub use provider::{build_provider, AnalysisProvider, HttpProvider, SimulatedProvider};
pub use tiers::TierTable;
pub use validator::{guess_mime_type, validate};
