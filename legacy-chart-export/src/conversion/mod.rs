mod error;
mod converter;
mod projected;

pub use error::*;
pub use converter::*;
pub use projected::*;
