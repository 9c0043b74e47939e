#[cfg(test)]
mod tests;
pub mod types;
pub mod config;
pub mod prelude;
pub mod timeline;
pub mod conversion;
pub mod serialization;
pub mod export;

pub use prelude::*;
