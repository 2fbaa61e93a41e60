pub mod convert;
mod error;
mod numeric;

pub use convert::BaseError;
pub use error::NumericError;
pub use numeric::Numeric;
