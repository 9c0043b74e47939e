pub(crate) use log::{ trace, debug, info, warn };

pub use serde_json;

pub use crate::types::*;
pub use crate::config::*;
pub use crate::timeline::*;
pub use crate::conversion::*;
pub use crate::serialization::*;
pub use crate::export::*;
pub use serde::{ Serialize, Deserialize };
pub use legacy_chart_export_proc_macros::LegacySection;
