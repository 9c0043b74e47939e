use crate::prelude::*;

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("chart {chart} has an invalid timeline: {source}")]
    InvalidTimeline {
        chart: ChartId,
        #[source]
        source: InvalidTimelineError,
    },

    #[error("chart {chart} could not be written: {source}")]
    Serialization {
        chart: ChartId,
        #[source]
        source: SerializationError,
    },

    #[error("format version v{0} is not supported (v{min} to v{max})", min = MIN_FORMAT_VERSION, max = LATEST_FORMAT_VERSION)]
    UnsupportedVersion(u32),

    /// two entries ended up with the same name in the archive
    #[error("duplicate archive entry {0:?}")]
    DuplicateEntry(String),

    #[error("export was cancelled")]
    Cancelled,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
}
impl ExportError {
    /// chart that caused this error, if any
    pub fn chart(&self) -> Option<ChartId> {
        match self {
            Self::InvalidTimeline { chart, .. } | Self::Serialization { chart, .. } => Some(*chart),
            _ => None,
        }
    }
}


#[test]
fn error_names_the_chart() {
    let error = ExportError::InvalidTimeline {
        chart: ChartId(2),
        source: InvalidTimelineError::InvalidBeatLength { index: 0, time: 0.0, beat_length: 0.0 },
    };

    assert_eq!(error.chart(), Some(ChartId(2)));
    assert!(error.to_string().starts_with("chart #2 has an invalid timeline"));
    assert_eq!(ExportError::Cancelled.chart(), None);
}
