mod chart;
mod sections;
mod hit_object;
mod hit_samples;
mod ruleset_mode;
mod control_point;
mod control_point_info;

pub use chart::*;
pub use sections::*;
pub use hit_object::*;
pub use hit_samples::*;
pub use ruleset_mode::*;
pub use control_point::*;
pub use control_point_info::*;

/// anything placed on the chart's timeline
pub trait Timed {
    /// time in (decimal) milliseconds from the start of the audio
    fn time(&self) -> f64;
}
