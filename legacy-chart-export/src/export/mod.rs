mod error;
mod archive;
mod exporter;
mod cancellation;

pub use error::*;
pub use archive::*;
pub use exporter::*;
pub use cancellation::*;
