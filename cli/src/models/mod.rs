pub mod price_series;
pub mod request;

pub use price_series::*;
pub use request::*;
