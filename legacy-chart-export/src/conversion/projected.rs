use crate::prelude::*;

/// how a timestamp ended up at its integer value
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag="rule", rename_all="snake_case")]
pub enum Projection {
    /// a timing point's own time, floored
    Anchor,
    /// snapped onto the beat grid of a timing point
    GridLocked {
        timing_point: usize,
        anchor: i32,
        beat: i32,
    },
    /// already a whole millisecond, left alone
    Exact,
    /// moved to keep the timeline in order: after an earlier event on the same grid, an end after
    /// its start, or a break between the notes around it
    Nudged {
        from: i32,
    },
    /// no timing point exists, rounded to the nearest millisecond
    Ungoverned,
    /// floored without a grid (breaks)
    Floored,
}

/// an integer millisecond plus where it came from
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectedTime {
    pub value: i32,
    pub source: f64,
    pub projection: Projection,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectedHitObject {
    pub start: ProjectedTime,
    pub end: Option<ProjectedTime>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectedBreak {
    pub start: ProjectedTime,
    pub end: ProjectedTime,
}

/// integer copy of a chart's timeline. every list is parallel to the chart's list of the same name
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectedTimeline {
    pub timing_points: Vec<ProjectedTime>,
    pub effect_points: Vec<ProjectedTime>,
    pub hit_objects: Vec<ProjectedHitObject>,
    pub breaks: Vec<ProjectedBreak>,
}
impl ProjectedTimeline {
    pub fn timing_point(&self, index: usize) -> Option<i32> {
        self.timing_points.get(index).map(|t| t.value)
    }
    pub fn effect_point(&self, index: usize) -> Option<i32> {
        self.effect_points.get(index).map(|t| t.value)
    }
    pub fn hit_object(&self, index: usize) -> Option<&ProjectedHitObject> {
        self.hit_objects.get(index)
    }
    pub fn break_period(&self, index: usize) -> Option<&ProjectedBreak> {
        self.breaks.get(index)
    }

    /// every effect point or hit object start that was nudged to keep them in order
    pub fn nudged(&self) -> impl Iterator<Item = &ProjectedTime> {
        self.effect_points.iter()
            .chain(self.hit_objects.iter().map(|h| &h.start))
            .filter(|t| matches!(t.projection, Projection::Nudged { .. }))
    }
}
