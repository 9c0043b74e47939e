use crate::prelude::*;

/// the chart's control points, each list sorted by time
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlPointInfo {
    pub timing_points: Vec<TimingPoint>,
    pub effect_points: Vec<EffectPoint>,
}
impl ControlPointInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// insert a timing point, after any existing points with the same time
    pub fn add_timing_point(&mut self, point: TimingPoint) {
        let index = self.timing_points.partition_point(|p| p.time <= point.time);
        self.timing_points.insert(index, point);
    }

    /// insert an effect point, after any existing points with the same time
    pub fn add_effect_point(&mut self, point: EffectPoint) {
        let index = self.effect_points.partition_point(|p| p.time <= point.time);
        self.effect_points.insert(index, point);
    }

    /// index of the timing point whose grid applies at `time`
    ///
    /// times before the first timing point use the first timing point
    pub fn timing_point_index_at(&self, time: f64) -> Option<usize> {
        if self.timing_points.is_empty() { return None }
        let after = self.timing_points.partition_point(|p| p.time <= time);
        Some(after.saturating_sub(1))
    }

    pub fn timing_point_at(&self, time: f64) -> Option<&TimingPoint> {
        self.timing_point_index_at(time).map(|i| &self.timing_points[i])
    }

    /// most recent effect point at or before `time`
    pub fn effect_point_at(&self, time: f64) -> Option<&EffectPoint> {
        let after = self.effect_points.partition_point(|p| p.time <= time);
        after.checked_sub(1).map(|i| &self.effect_points[i])
    }
}
