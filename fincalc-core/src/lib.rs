pub mod calculations;
pub mod error;
pub mod models;
pub mod rates;

pub use error::{CalcError, ConfigurationError};
pub use models::*;
pub use rates::RateTableStore;
