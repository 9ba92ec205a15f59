pub mod color;
pub mod constants;
pub mod error;
pub mod params;
pub mod query;
pub mod store;

// Re-export primary types for convenience.
pub use color::Rgb;
pub use constants::ParamRange;
pub use error::CoreError;
pub use params::FractalParameters;
pub use query::{parse_query, QueryMap, ShareQuery};
pub use store::{ApplicationUiState, ParameterStore, SubscriptionId};

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
