use crate::prelude::*;

/// beat grid of one timing point, in whole milliseconds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeatGrid {
    /// index of the timing point this grid belongs to
    pub timing_point: usize,
    /// the timing point's time, floored
    pub anchor: i32,
    /// the timing point's beat length, rounded. never less than 1
    pub beat: i32,
    /// nothing locked to this grid may land past this (the next timing point's anchor)
    pub limit: Option<i32>,
}
impl BeatGrid {
    /// closest grid line to `time`, the lower one on ties
    pub fn lock(&self, time: f64) -> f64 {
        let anchor = self.anchor as f64;
        let beat = self.beat as f64;

        let lower = anchor + ((time - anchor) / beat).floor() * beat;
        let upper = lower + beat;
        let nearest = if time - lower <= upper - time { lower } else { upper };

        // lower <= time, so falling back to it can never cross into the next grid
        match self.limit {
            Some(limit) if nearest > limit as f64 => lower,
            _ => nearest,
        }
    }
}


/// Projects a chart's decimal timeline onto whole milliseconds.
///
/// Timing points are floored and become the anchors of their beat grids. Everything else
/// (effect points, hit objects) is snapped to the nearest line of the grid it falls in, so
/// things that were on the same beat before the conversion are still on the same beat after it.
pub struct TimingConverter<'a> {
    control_points: &'a ControlPointInfo,
    grids: Vec<BeatGrid>,
}
impl<'a> TimingConverter<'a> {
    pub fn new(control_points: &'a ControlPointInfo) -> ConversionResult<Self> {
        let points = &control_points.timing_points;
        check_sorted(points, TimelineSequence::TimingPoints)?;

        let mut grids: Vec<BeatGrid> = Vec::with_capacity(points.len());
        for (index, point) in points.iter().enumerate() {
            let invalid_beat = || InvalidTimelineError::InvalidBeatLength {
                index,
                time: point.time,
                beat_length: point.beat_length,
            };
            if !point.beat_length.is_finite() || point.beat_length <= 0.0 { return Err(invalid_beat()) }

            let beat = point.beat_length.round().max(1.0);
            if beat > i32::MAX as f64 { return Err(invalid_beat()) }

            let anchor = to_millis(point.time.floor(), TimelineSequence::TimingPoints, index, point.time)?;
            if let Some(previous) = grids.last_mut() {
                previous.limit = Some(anchor);
            }

            grids.push(BeatGrid {
                timing_point: index,
                anchor,
                beat: beat as i32,
                limit: None,
            });
        }

        Ok(Self { control_points, grids })
    }

    /// project every timestamp in a chart
    pub fn convert_chart(chart: &Chart) -> ConversionResult<ProjectedTimeline> {
        TimingConverter::new(&chart.control_points)?.convert(&chart.hit_objects, &chart.events.breaks)
    }

    pub fn grids(&self) -> &[BeatGrid] {
        &self.grids
    }

    /// grid that applies at `time`
    pub fn grid_at(&self, time: f64) -> Option<BeatGrid> {
        let index = self.control_points.timing_point_index_at(time)?;
        let grid = self.grids[index];

        // before the first timing point, dont pass its anchor
        if time < self.control_points.timing_points[index].time {
            return Some(BeatGrid { limit: Some(grid.anchor), ..grid });
        }
        Some(grid)
    }

    pub fn convert(&self, hit_objects: &[HitObject], breaks: &[BreakPeriod]) -> ConversionResult<ProjectedTimeline> {
        let effects = &self.control_points.effect_points;
        check_sorted(effects, TimelineSequence::EffectPoints)?;
        check_sorted(hit_objects, TimelineSequence::HitObjects)?;
        check_sorted(breaks, TimelineSequence::Breaks)?;

        let timing_points = self.control_points.timing_points
            .iter()
            .zip(self.grids.iter())
            .map(|(point, grid)| ProjectedTime {
                value: grid.anchor,
                source: point.time,
                projection: Projection::Anchor,
            })
            .collect::<Vec<_>>();

        let mut effect_points = effects
            .iter()
            .enumerate()
            .map(|(i, p)| self.project(p.time, TimelineSequence::EffectPoints, i))
            .collect::<ConversionResult<Vec<_>>>()?;

        let mut starts = hit_objects
            .iter()
            .enumerate()
            .map(|(i, h)| self.project(h.start_time, TimelineSequence::HitObjects, i))
            .collect::<ConversionResult<Vec<_>>>()?;

        self.keep_order(&mut effect_points, &mut starts);

        let mut projected_objects = Vec::with_capacity(hit_objects.len());
        for (index, (object, start)) in hit_objects.iter().zip(starts).enumerate() {
            let end = match object.end_time() {
                Some(end) => Some(self.project_end(object.start_time, end, start, index)?),
                None => None,
            };
            projected_objects.push(ProjectedHitObject { start, end });
        }

        let breaks = breaks
            .iter()
            .enumerate()
            .map(|(index, period)| self.fit_break(period, index, hit_objects, &projected_objects))
            .collect::<ConversionResult<Vec<_>>>()?;

        debug!(
            "projected {} timing points, {} effect points, {} hit objects",
            timing_points.len(),
            effect_points.len(),
            projected_objects.len()
        );

        Ok(ProjectedTimeline {
            timing_points,
            effect_points,
            hit_objects: projected_objects,
            breaks,
        })
    }

    /// project one timestamp that depends on a timing point
    fn project(&self, time: f64, sequence: TimelineSequence, index: usize) -> ConversionResult<ProjectedTime> {
        let (value, projection) = if time.fract() == 0.0 {
            (time, Projection::Exact)
        } else if let Some(grid) = self.grid_at(time) {
            let projection = Projection::GridLocked {
                timing_point: grid.timing_point,
                anchor: grid.anchor,
                beat: grid.beat,
            };
            (grid.lock(time), projection)
        } else {
            (round_half_down(time), Projection::Ungoverned)
        };

        Ok(ProjectedTime {
            value: to_millis(value, sequence, index, time)?,
            source: time,
            projection,
        })
    }

    fn project_end(&self, start_time: f64, end_time: f64, start: ProjectedTime, index: usize) -> ConversionResult<ProjectedTime> {
        let sequence = TimelineSequence::HitObjectEnds;
        if !end_time.is_finite() { return Err(InvalidTimelineError::NonFiniteTime { sequence, index }) }
        if end_time < start_time {
            return Err(InvalidTimelineError::EndsBeforeStart {
                sequence,
                index,
                start: start_time,
                end: end_time,
            });
        }

        let mut end = self.project(end_time, sequence, index)?;
        if end.value < start.value {
            nudge(&mut end, start.value);
        }
        Ok(end)
    }

    /// Floors a break, then keeps it between the hit objects around it: it cant start before a
    /// hit object that started before it, or end after one that starts after it.
    fn fit_break(&self, period: &BreakPeriod, index: usize, hit_objects: &[HitObject], projected: &[ProjectedHitObject]) -> ConversionResult<ProjectedBreak> {
        if period.end_time < period.start_time {
            return Err(InvalidTimelineError::EndsBeforeStart {
                sequence: TimelineSequence::Breaks,
                index,
                start: period.start_time,
                end: period.end_time,
            });
        }

        let mut start = floored(period.start_time, index)?;
        let mut end = floored(period.end_time, index)?;

        let before = hit_objects.partition_point(|h| h.start_time <= period.start_time);
        if let Some(last) = projected[..before].iter().map(|h| h.start.value).max() {
            if start.value < last {
                debug!("break #{index} starts at {}ms, before a hit object at {last}ms", start.value);
                nudge(&mut start, last);
            }
        }

        let after = hit_objects.partition_point(|h| h.start_time < period.end_time);
        if let Some(next) = projected[after..].iter().map(|h| h.start.value).min() {
            if end.value > next {
                debug!("break #{index} ends at {}ms, after a hit object at {next}ms", end.value);
                nudge(&mut end, next);
            }
        }

        // a break with nothing between its notes is empty, not reversed
        if end.value < start.value {
            nudge(&mut end, start.value);
        }

        Ok(ProjectedBreak { start, end })
    }

    /// Walks every effect point and hit object in time order and pulls any projection that
    /// went backwards on its grid forward to the one before it.
    ///
    /// Grid locking alone never reorders events, but whole-millisecond events are left where
    /// they are and can end up before a decimal event that was snapped upwards.
    fn keep_order(&self, effect_points: &mut [ProjectedTime], starts: &mut [ProjectedTime]) {
        let mut events = effect_points.iter_mut().chain(starts.iter_mut()).collect::<Vec<_>>();
        // stable, so equal times keep their input order
        events.sort_by(|a, b| a.source.total_cmp(&b.source));

        let mut previous: Option<(Option<usize>, i32)> = None;
        for event in events {
            let grid = self.control_points.timing_point_index_at(event.source);

            if let Some((previous_grid, previous_value)) = previous {
                if previous_grid == grid && event.value < previous_value {
                    warn!(
                        "{}ms projected to {}ms, before an earlier event at {previous_value}ms. moving it to {previous_value}ms",
                        event.source,
                        event.value
                    );
                    nudge(event, previous_value);
                }
            }

            previous = Some((grid, event.value));
        }
    }
}


/// make sure a list is ordered and has no nan/infinite times
fn check_sorted<T: Timed>(items: &[T], sequence: TimelineSequence) -> ConversionResult<()> {
    let mut previous: Option<f64> = None;

    for (index, item) in items.iter().enumerate() {
        let time = item.time();
        if !time.is_finite() { return Err(InvalidTimelineError::NonFiniteTime { sequence, index }) }

        if let Some(previous) = previous {
            if time < previous {
                return Err(InvalidTimelineError::Unsorted { sequence, index, time, previous });
            }
        }
        previous = Some(time);
    }

    Ok(())
}

/// nearest whole number, the lower one on ties
fn round_half_down(time: f64) -> f64 {
    let lower = time.floor();
    if time - lower <= 0.5 { lower } else { lower + 1.0 }
}

fn nudge(time: &mut ProjectedTime, value: i32) {
    time.projection = Projection::Nudged { from: time.value };
    time.value = value;
}

fn floored(time: f64, index: usize) -> ConversionResult<ProjectedTime> {
    Ok(ProjectedTime {
        value: to_millis(time.floor(), TimelineSequence::Breaks, index, time)?,
        source: time,
        projection: Projection::Floored,
    })
}

fn to_millis(value: f64, sequence: TimelineSequence, index: usize, time: f64) -> ConversionResult<i32> {
    if !(value >= i32::MIN as f64 && value <= i32::MAX as f64) {
        return Err(InvalidTimelineError::OutOfRange { sequence, index, time });
    }
    Ok(value as i32)
}


#[cfg(test)]
mod tests {
    use super::*;

    fn hit(time: f64) -> HitObject {
        HitObject::circle(time, Position::new(256, 192))
    }

    fn control_points(timing: &[(f64, f64)], effects: &[f64]) -> ControlPointInfo {
        ControlPointInfo {
            timing_points: timing.iter().map(|&(t, b)| TimingPoint::new(t, b)).collect(),
            effect_points: effects.iter().map(|&t| EffectPoint::new(t).kiai(true)).collect(),
        }
    }

    fn convert(info: &ControlPointInfo, hits: &[f64]) -> ConversionResult<ProjectedTimeline> {
        let hits = hits.iter().map(|&t| hit(t)).collect::<Vec<_>>();
        TimingConverter::new(info)?.convert(&hits, &[])
    }

    fn values(times: &[ProjectedTime]) -> Vec<i32> {
        times.iter().map(|t| t.value).collect()
    }
    fn starts(timeline: &ProjectedTimeline) -> Vec<i32> {
        timeline.hit_objects.iter().map(|h| h.start.value).collect()
    }

    #[test]
    fn timing_points_are_floored() {
        let info = control_points(&[(284.725, 352.941), (1000.0, 300.0), (5000.999, 250.0)], &[]);
        let timeline = convert(&info, &[]).unwrap();

        assert_eq!(values(&timeline.timing_points), vec![284, 1000, 5000]);
        assert!(timeline.timing_points.iter().all(|t| t.projection == Projection::Anchor));
    }

    #[test]
    fn effect_and_object_lock_to_the_same_grid_line() {
        // anchor 284, grid of 5647ms
        let info = control_points(&[(284.725, 5647.2)], &[28520.019]);
        let timeline = convert(&info, &[28520.019]).unwrap();

        assert_eq!(timeline.timing_point(0), Some(284));
        assert_eq!(timeline.effect_point(0), Some(28519));
        assert_eq!(starts(&timeline), vec![28519]);
        assert_eq!(
            timeline.effect_points[0].projection,
            Projection::GridLocked { timing_point: 0, anchor: 284, beat: 5647 }
        );
    }

    #[test]
    fn whole_milliseconds_are_kept() {
        let info = control_points(&[(284.725, 5647.2)], &[1000.0]);
        let timeline = convert(&info, &[500.0, 28519.0, 30000.0]).unwrap();

        assert_eq!(values(&timeline.effect_points), vec![1000]);
        assert_eq!(starts(&timeline), vec![500, 28519, 30000]);
        assert!(timeline.hit_objects.iter().all(|h| h.start.projection == Projection::Exact));
    }

    #[test]
    fn ties_go_to_the_lower_line() {
        // grid lines at 0, 3, 6, ...
        let info = control_points(&[(0.0, 3.0)], &[]);
        let timeline = convert(&info, &[1.5, 1.5000001, 4.5]).unwrap();
        assert_eq!(starts(&timeline), vec![0, 3, 3]);
    }

    #[test]
    fn sweep_stays_on_grid_and_in_order() {
        let info = control_points(&[(100.3, 7.4)], &[]);
        let times = (0..5000)
            .map(|k| 100.3 + k as f64 * 0.61)
            .filter(|t| t.fract() != 0.0)
            .collect::<Vec<_>>();
        let timeline = convert(&info, &times).unwrap();

        for (time, projected) in times.iter().zip(starts(&timeline)) {
            assert_eq!((projected - 100).rem_euclid(7), 0, "{time} -> {projected} is off the grid");

            let distance = (projected as f64 - time).abs();
            assert!(distance <= 3.5, "{time} -> {projected} is not the closest line");
            // on a tie the lower line wins
            if distance == 3.5 { assert!((projected as f64) < *time) }
        }

        let starts = starts(&timeline);
        assert!(starts.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn exact_time_after_snapped_time_is_nudged() {
        // grid lines at 0, 10, 20
        let info = control_points(&[(0.3, 10.0)], &[]);
        let timeline = convert(&info, &[5.6, 6.0, 12.0]).unwrap();

        assert_eq!(starts(&timeline), vec![10, 10, 12]);
        assert_eq!(timeline.hit_objects[1].start.projection, Projection::Nudged { from: 6 });
        assert_eq!(timeline.nudged().count(), 1);
    }

    #[test]
    fn effect_points_and_objects_are_ordered_together() {
        let info = control_points(&[(0.3, 10.0)], &[5.6]);
        let timeline = convert(&info, &[6.0]).unwrap();

        assert_eq!(timeline.effect_point(0), Some(10));
        assert_eq!(starts(&timeline), vec![10]);
    }

    #[test]
    fn snapping_never_passes_the_next_anchor() {
        // first grid: 0, 40, 80, 120, 160. second grid starts at 150
        let info = control_points(&[(0.0, 40.0), (150.7, 50.0)], &[]);
        let timeline = convert(&info, &[145.3, 151.2]).unwrap();

        assert_eq!(timeline.timing_point(1), Some(150));
        assert_eq!(starts(&timeline), vec![120, 150]);
        assert_eq!(TimingConverter::new(&info).unwrap().grids()[0].limit, Some(150));
    }

    #[test]
    fn events_before_the_first_timing_point() {
        let info = control_points(&[(1000.4, 300.0)], &[]);
        let timeline = convert(&info, &[500.5, 999.8]).unwrap();
        assert_eq!(starts(&timeline), vec![400, 1000]);
    }

    #[test]
    fn no_timing_points_rounds() {
        let info = control_points(&[], &[10.5, 10.6]);
        let timeline = convert(&info, &[]).unwrap();

        assert_eq!(values(&timeline.effect_points), vec![10, 11]);
        assert!(timeline.effect_points.iter().all(|t| t.projection == Projection::Ungoverned));
    }

    #[test]
    fn small_beat_lengths_use_a_millisecond_grid() {
        let info = control_points(&[(0.0, 0.25)], &[]);
        let timeline = convert(&info, &[7.4, 7.6]).unwrap();
        assert_eq!(starts(&timeline), vec![7, 8]);
    }

    #[test]
    fn end_times_are_projected() {
        let info = control_points(&[(0.3, 10.0)], &[]);
        let objects = vec![
            hit(5.6).with_kind(HitObjectKind::Spinner { end_time: 8.9 }),
            hit(20.2).with_kind(HitObjectKind::Hold { end_time: 44.4 }),
        ];
        let timeline = TimingConverter::new(&info).unwrap().convert(&objects, &[]).unwrap();

        let spinner = timeline.hit_object(0).unwrap();
        assert_eq!(spinner.start.value, 10);
        // 8.9 snaps to 10 on its own, never before the start
        assert_eq!(spinner.end.map(|e| e.value), Some(10));

        let hold = timeline.hit_object(1).unwrap();
        assert_eq!((hold.start.value, hold.end.map(|e| e.value)), (20, Some(40)));
    }

    #[test]
    fn breaks_are_floored() {
        let mut chart = Chart::new(1);
        chart.control_points = control_points(&[(0.0, 500.0)], &[]);
        chart.events.breaks.push(BreakPeriod { start_time: 1200.9, end_time: 4800.2 });

        let timeline = TimingConverter::convert_chart(&chart).unwrap();
        let period = timeline.break_period(0).unwrap();
        assert_eq!((period.start.value, period.end.value), (1200, 4800));
        assert_eq!(period.start.projection, Projection::Floored);
    }

    #[test]
    fn break_never_starts_before_an_earlier_note() {
        // the note rounds up onto the grid line at 30000, the break floors to 29999
        let info = control_points(&[(0.0, 400.0)], &[]);
        let hits = [hit(29999.9)];
        let breaks = [BreakPeriod { start_time: 29999.95, end_time: 35000.0 }];

        let timeline = TimingConverter::new(&info).unwrap().convert(&hits, &breaks).unwrap();
        assert_eq!(starts(&timeline), vec![30000]);

        let period = timeline.break_period(0).unwrap();
        assert_eq!((period.start.value, period.end.value), (30000, 35000));
        assert_eq!(period.start.projection, Projection::Nudged { from: 29999 });
        assert_eq!(period.end.projection, Projection::Floored);
    }

    #[test]
    fn break_never_ends_after_a_later_note() {
        // grid lines every 400ms, 34900.3 snaps down to 34800
        let info = control_points(&[(0.0, 400.0)], &[]);
        let hits = [hit(29999.9), hit(34900.3)];
        let breaks = [BreakPeriod { start_time: 30000.5, end_time: 34900.1 }];

        let timeline = TimingConverter::new(&info).unwrap().convert(&hits, &breaks).unwrap();
        assert_eq!(starts(&timeline), vec![30000, 34800]);

        let period = timeline.break_period(0).unwrap();
        assert_eq!((period.start.value, period.end.value), (30000, 34800));
        assert_eq!(period.start.projection, Projection::Floored);
        assert_eq!(period.end.projection, Projection::Nudged { from: 34900 });

        let ordered = [starts(&timeline)[0], period.start.value, period.end.value, starts(&timeline)[1]];
        assert!(ordered.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn invalid_beat_lengths() {
        for beat_length in [0.0, -100.0, f64::NAN, f64::INFINITY] {
            let info = control_points(&[(0.0, 500.0), (1000.0, beat_length)], &[]);
            assert!(matches!(
                TimingConverter::new(&info),
                Err(InvalidTimelineError::InvalidBeatLength { index: 1, .. })
            ));
        }
    }

    #[test]
    fn unsorted_input() {
        let info = control_points(&[(1000.0, 500.0), (999.0, 500.0)], &[]);
        assert!(matches!(
            TimingConverter::new(&info),
            Err(InvalidTimelineError::Unsorted { sequence: TimelineSequence::TimingPoints, index: 1, .. })
        ));

        let info = control_points(&[(0.0, 500.0)], &[20.0, 10.0]);
        assert!(matches!(
            convert(&info, &[]),
            Err(InvalidTimelineError::Unsorted { sequence: TimelineSequence::EffectPoints, index: 1, .. })
        ));

        let info = control_points(&[(0.0, 500.0)], &[]);
        assert!(matches!(
            convert(&info, &[10.0, 30.0, 20.0]),
            Err(InvalidTimelineError::Unsorted { sequence: TimelineSequence::HitObjects, index: 2, .. })
        ));
    }

    #[test]
    fn broken_times() {
        let info = control_points(&[(0.0, 500.0)], &[]);
        assert!(matches!(
            convert(&info, &[f64::NAN]),
            Err(InvalidTimelineError::NonFiniteTime { sequence: TimelineSequence::HitObjects, index: 0 })
        ));
        assert!(matches!(
            convert(&info, &[1e12 + 0.5]),
            Err(InvalidTimelineError::OutOfRange { .. })
        ));

        let objects = vec![hit(100.0).with_kind(HitObjectKind::Spinner { end_time: 50.0 })];
        assert!(matches!(
            TimingConverter::new(&info).unwrap().convert(&objects, &[]),
            Err(InvalidTimelineError::EndsBeforeStart { sequence: TimelineSequence::HitObjectEnds, .. })
        ));
    }

    #[test]
    fn conversion_is_deterministic_and_leaves_the_source_alone() {
        let info = control_points(&[(284.725, 352.941), (10_000.5, 300.3)], &[1000.1, 12_345.6]);
        let before = info.clone();
        let hits = [300.2, 1000.1, 5000.9, 10_000.6, 12_345.6];

        let first = convert(&info, &hits).unwrap();
        let second = convert(&info, &hits).unwrap();
        assert_eq!(first, second);
        assert_eq!(info, before);
    }
}
