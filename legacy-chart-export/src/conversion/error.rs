use crate::prelude::*;

pub type ConversionResult<T> = Result<T, InvalidTimelineError>;

/// which list of the chart a timestamp came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all="snake_case")]
pub enum TimelineSequence {
    TimingPoints,
    EffectPoints,
    HitObjects,
    /// spinner and hold end times
    HitObjectEnds,
    Breaks,
}
impl std::fmt::Display for TimelineSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::TimingPoints => "timing point",
            Self::EffectPoints => "effect point",
            Self::HitObjects => "hit object",
            Self::HitObjectEnds => "hit object end",
            Self::Breaks => "break",
        })
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum InvalidTimelineError {
    #[error("timing point #{index} at {time}ms has an unusable beat length ({beat_length})")]
    InvalidBeatLength {
        index: usize,
        time: f64,
        beat_length: f64,
    },

    #[error("{sequence} #{index} at {time}ms comes before the previous one at {previous}ms")]
    Unsorted {
        sequence: TimelineSequence,
        index: usize,
        time: f64,
        previous: f64,
    },

    #[error("{sequence} #{index} has a non-finite time")]
    NonFiniteTime {
        sequence: TimelineSequence,
        index: usize,
    },

    #[error("{sequence} #{index} at {time}ms does not fit in an integer millisecond")]
    OutOfRange {
        sequence: TimelineSequence,
        index: usize,
        time: f64,
    },

    #[error("{sequence} #{index} ends ({end}ms) before it starts ({start}ms)")]
    EndsBeforeStart {
        sequence: TimelineSequence,
        index: usize,
        start: f64,
        end: f64,
    },
}
