use crate::prelude::*;

/// timing point lines gain the `uninherited,effects` fields
const UNINHERITED_SINCE: u32 = 6;
/// hit object lines gain the trailing hit sample field
const HIT_SAMPLES_SINCE: u32 = 10;

const KIAI_FLAG: u8 = 1;
const OMIT_FIRST_BAR_LINE_FLAG: u8 = 8;

/// Writes a chart as a legacy file, using the integer times from its projected timeline.
///
/// Only timestamps come from the timeline, every other number is written as it is in the chart.
pub struct LegacyEncoder<'a> {
    chart: &'a Chart,
    timeline: &'a ProjectedTimeline,
    version: u32,
}
impl<'a> LegacyEncoder<'a> {
    pub fn new(chart: &'a Chart, timeline: &'a ProjectedTimeline) -> Self {
        Self {
            chart,
            timeline,
            version: LATEST_FORMAT_VERSION,
        }
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn encode(&self) -> SerializationResult<String> {
        if !is_supported_version(self.version) {
            return Err(SerializationErrorKind::UnsupportedVersion(self.version).into());
        }
        self.check_lengths()?;

        let mut lw = LegacyWriter::new(self.version);
        lw.write_header();

        self.chart.general.write_section(&mut lw);
        self.chart.editor.write_section(&mut lw);
        self.chart.metadata.write_section(&mut lw);
        self.chart.difficulty.write_section(&mut lw);
        self.write_events(&mut lw)?;
        self.write_timing_points(&mut lw)?;
        self.write_hit_objects(&mut lw)?;

        Ok(lw.data())
    }

    pub fn encode_bytes(&self) -> SerializationResult<Vec<u8>> {
        self.encode().map(String::into_bytes)
    }

    /// every list in the chart needs exactly one projection per item
    fn check_lengths(&self) -> SerializationResult<()> {
        let chart = self.chart;
        let timeline = self.timeline;

        let lengths = [
            (TimelineSequence::TimingPoints, chart.control_points.timing_points.len(), timeline.timing_points.len()),
            (TimelineSequence::EffectPoints, chart.control_points.effect_points.len(), timeline.effect_points.len()),
            (TimelineSequence::HitObjects, chart.hit_objects.len(), timeline.hit_objects.len()),
            (TimelineSequence::Breaks, chart.events.breaks.len(), timeline.breaks.len()),
        ];

        for (sequence, expected, projected) in lengths {
            if expected != projected {
                return Err(SerializationErrorKind::MissingProjection {
                    sequence,
                    index: expected.min(projected),
                }.into());
            }
        }

        Ok(())
    }

    fn write_events(&self, lw: &mut LegacyWriter) -> SerializationResult<()> {
        let events = &self.chart.events;
        lw.begin_section("Events");

        lw.write_comment("Background and Video events");
        if let Some(background) = &events.background {
            let line = CsvLine::new()
                .field(0)
                .field(0)
                .field(format!("\"{}\"", background.filename))
                .field(background.x_offset)
                .field(background.y_offset)
                .done();
            lw.write_line(&line);
        }

        lw.write_comment("Break Periods");
        for index in 0..events.breaks.len() {
            let period = self.timeline
                .break_period(index)
                .ok_or_else(|| lw.error(missing(TimelineSequence::Breaks, index)))?;

            let line = CsvLine::new()
                .field(2)
                .field(period.start.value)
                .field(period.end.value)
                .done();
            lw.write_line(&line);
        }

        Ok(())
    }

    /// Timing points and effect points share the `[TimingPoints]` section.
    ///
    /// Each timing point is one uninherited line carrying the effects active at its time. Effect points
    /// become inherited lines, unless they landed on a timing point's time, in which case their flags
    /// are folded into that timing point's line.
    ///
    /// An uninherited line resets the scroll speed, so a changed speed that is still active is written
    /// again right after it.
    fn write_timing_points(&self, lw: &mut LegacyWriter) -> SerializationResult<()> {
        let control_points = &self.chart.control_points;
        let effects = &control_points.effect_points;
        lw.begin_section("TimingPoints");

        let mut next_effect = 0;
        let mut active: Option<usize> = None;

        for (index, point) in control_points.timing_points.iter().enumerate() {
            let time = self.timing_time(lw, index)?;

            while next_effect < effects.len() {
                let effect_time = self.effect_time(lw, next_effect)?;
                if effect_time >= time { break }

                let samples = self.governing_samples(&effects[next_effect]);
                self.write_effect_line(lw, next_effect, effect_time, &samples)?;
                active = Some(next_effect);
                next_effect += 1;
            }

            while next_effect < effects.len() && self.effect_time(lw, next_effect)? == time {
                active = Some(next_effect);
                next_effect += 1;
            }

            let mut line = CsvLine::new()
                .field(time)
                .field(point.beat_length)
                .field(point.meter)
                .field(point.sample_set)
                .field(point.sample_index)
                .field(point.volume);
            if self.version >= UNINHERITED_SINCE {
                line = line.field(true).field(effect_flags(active.map(|i| &effects[i]), true));
            }
            lw.write_line(&line.done());

            // scroll speed cant live on an uninherited line
            if let Some(effect) = active {
                if effects[effect].scroll_speed != 1.0 {
                    self.write_effect_line(lw, effect, time, point)?;
                }
            }
        }

        for index in next_effect..effects.len() {
            let time = self.effect_time(lw, index)?;
            let samples = self.governing_samples(&effects[index]);
            self.write_effect_line(lw, index, time, &samples)?;
        }

        Ok(())
    }

    /// sample settings of the timing point an effect point falls under
    fn governing_samples(&self, effect: &EffectPoint) -> TimingPoint {
        self.chart.control_points
            .timing_point_at(effect.time)
            .copied()
            .unwrap_or_default()
    }

    /// inherited lines repeat the sample settings of the timing point they sit under
    fn write_effect_line(&self, lw: &mut LegacyWriter, index: usize, time: i32, samples: &TimingPoint) -> SerializationResult<()> {
        let effect = &self.chart.control_points.effect_points[index];
        lw.push_context(format!("effect point #{index}"));

        if !(effect.scroll_speed.is_finite() && effect.scroll_speed > 0.0) {
            return Err(lw.error(SerializationErrorKind::InvalidValue {
                sequence: TimelineSequence::EffectPoints,
                index,
                field: "scroll_speed",
            }));
        }

        let mut line = CsvLine::new()
            .field(time)
            .field(-100.0 / effect.scroll_speed)
            .field(samples.meter)
            .field(samples.sample_set)
            .field(samples.sample_index)
            .field(samples.volume);
        if self.version >= UNINHERITED_SINCE {
            line = line.field(false).field(effect_flags(Some(effect), false));
        }
        lw.write_line(&line.done());

        lw.pop_context();
        Ok(())
    }

    fn write_hit_objects(&self, lw: &mut LegacyWriter) -> SerializationResult<()> {
        lw.begin_section("HitObjects");
        let with_samples = self.version >= HIT_SAMPLES_SINCE;

        for (index, object) in self.chart.hit_objects.iter().enumerate() {
            lw.push_context(format!("hit object #{index}"));

            let projected = self.timeline
                .hit_object(index)
                .ok_or_else(|| lw.error(missing(TimelineSequence::HitObjects, index)))?;
            let end_time = || projected.end
                .map(|end| end.value)
                .ok_or_else(|| lw.error(missing(TimelineSequence::HitObjectEnds, index)));

            // x,y,time,type,hitSound,objectParams,hitSample
            let mut line = CsvLine::new()
                .field(object.position.x)
                .field(object.position.y)
                .field(projected.start.value)
                .field(object.type_flags())
                .field(object.hit_sound);

            match &object.kind {
                HitObjectKind::Circle => {}

                HitObjectKind::Slider { curve_type, control_points, slides, length, edge_sounds, edge_sets } => {
                    let curve = std::iter::once(curve_type.as_char().to_string())
                        .chain(control_points.iter().map(|p| format!("{}:{}", p.x, p.y)));

                    // one sound per node (head, each repeat, tail)
                    let nodes = *slides as usize + 1;
                    let edge_sounds = if edge_sounds.is_empty() { vec![0; nodes] } else { edge_sounds.clone() };
                    let edge_sets = if edge_sets.is_empty() { vec![[0, 0]; nodes] } else { edge_sets.clone() };

                    line = line
                        .joined(curve, '|')
                        .field(*slides)
                        .field(*length)
                        .joined(edge_sounds, '|')
                        .joined(edge_sets.iter().map(|[normal, addition]| format!("{normal}:{addition}")), '|');
                }

                HitObjectKind::Spinner { .. } => {
                    line = line.field(end_time()?);
                }

                // holds put the end time in front of the hit sample, separated by a colon
                HitObjectKind::Hold { .. } => {
                    let end = end_time()?;
                    line = if with_samples {
                        line.field(format!("{end}:{}", object.samples))
                    } else {
                        line.field(end)
                    };
                }
            }

            if with_samples && !matches!(object.kind, HitObjectKind::Hold { .. }) {
                line = line.field(&object.samples);
            }

            lw.write_line(&line.done());
            lw.pop_context();
        }

        Ok(())
    }

    fn timing_time(&self, lw: &LegacyWriter, index: usize) -> SerializationResult<i32> {
        self.timeline
            .timing_point(index)
            .ok_or_else(|| lw.error(missing(TimelineSequence::TimingPoints, index)))
    }

    fn effect_time(&self, lw: &LegacyWriter, index: usize) -> SerializationResult<i32> {
        self.timeline
            .effect_point(index)
            .ok_or_else(|| lw.error(missing(TimelineSequence::EffectPoints, index)))
    }
}

fn missing(sequence: TimelineSequence, index: usize) -> SerializationErrorKind {
    SerializationErrorKind::MissingProjection { sequence, index }
}

fn effect_flags(effect: Option<&EffectPoint>, uninherited: bool) -> u8 {
    let Some(effect) = effect else { return 0 };

    let mut flags = 0;
    if effect.kiai { flags |= KIAI_FLAG }
    // only means something on uninherited lines
    if uninherited && effect.omit_first_bar_line { flags |= OMIT_FIRST_BAR_LINE_FLAG }
    flags
}
