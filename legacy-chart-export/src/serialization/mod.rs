mod error;
mod writer;
mod encoder;
mod legacy_value;
mod legacy_section;

pub use error::*;
pub use writer::*;
pub use encoder::*;
pub use legacy_value::*;
pub use legacy_section::*;

/// oldest legacy format revision we can write
pub const MIN_FORMAT_VERSION: u32 = 5;
/// newest legacy format revision, used when no version is requested
pub const LATEST_FORMAT_VERSION: u32 = 14;

pub fn is_supported_version(version: u32) -> bool {
    (MIN_FORMAT_VERSION..=LATEST_FORMAT_VERSION).contains(&version)
}
