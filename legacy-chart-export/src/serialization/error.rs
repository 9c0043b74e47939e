use crate::prelude::*;

pub type SerializationResult<S> = Result<S, SerializationError>;

/// error while writing a chart, with the sections/lines that were being written when it happened
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SerializationError {
    pub inner: SerializationErrorKind,
    pub stack: Vec<String>,
}
impl SerializationError {
    pub fn with_stack(mut self, stack: Vec<String>) -> Self {
        self.stack = stack;
        self
    }

    pub fn format_stack(&self) -> String {
        self.stack.join(" -> ")
    }
}
impl From<SerializationErrorKind> for SerializationError {
    fn from(value: SerializationErrorKind) -> Self {
        Self {
            inner: value,
            stack: Vec::new()
        }
    }
}

impl std::fmt::Display for SerializationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.stack.is_empty() {
            write!(f, "{}", self.inner)
        } else {
            write!(f, "{} (in {})", self.inner, self.format_stack())
        }
    }
}
impl std::error::Error for SerializationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.inner)
    }
}


#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SerializationErrorKind {
    /// the timeline doesnt have a value for something in the chart. the converter was skipped or ran on a different chart
    #[error("no projected time for {sequence} #{index}")]
    MissingProjection {
        sequence: TimelineSequence,
        index: usize,
    },

    #[error("format version v{0} is not supported (v{min} to v{max})", min = MIN_FORMAT_VERSION, max = LATEST_FORMAT_VERSION)]
    UnsupportedVersion(u32),

    #[error("{field} of {sequence} #{index} cant be written")]
    InvalidValue {
        sequence: TimelineSequence,
        index: usize,
        field: &'static str,
    },
}


#[test]
fn error_display() {
    let error = SerializationError::from(SerializationErrorKind::MissingProjection {
        sequence: TimelineSequence::HitObjects,
        index: 3,
    });
    assert_eq!(error.to_string(), "no projected time for hit object #3");

    let error = error.with_stack(vec!["[HitObjects]".to_owned(), "line 4".to_owned()]);
    assert_eq!(error.to_string(), "no projected time for hit object #3 (in [HitObjects] -> line 4)");
}
