use crate::prelude::*;

/// Starts a new beat grid. The grid lasts until the next timing point's time (or forever, if this is the last timing point).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingPoint {
    /// Start time of the timing section, in milliseconds from the beginning of the chart's audio.
    pub time: f64,
    /// Duration of a beat, in milliseconds.
    pub beat_length: f64,
    /// Amount of beats in a measure.
    pub meter: u8,

    // samples

    /// Default sample set for hit objects (0 = chart default, 1 = normal, 2 = soft, 3 = drum)
    pub sample_set: u8,
    /// Custom sample index for hit objects. 0 indicates the default hitsounds
    pub sample_index: u8,
    /// Volume percentage for hit objects
    pub volume: u8,
}
impl TimingPoint {
    pub fn new(time: f64, beat_length: f64) -> Self {
        Self {
            time,
            beat_length,
            ..Default::default()
        }
    }
}
impl Default for TimingPoint {
    fn default() -> Self {
        Self {
            time: 0.0,
            beat_length: 1000.0,
            meter: 4,
            sample_set: 0,
            sample_index: 0,
            volume: 100,
        }
    }
}
impl Timed for TimingPoint {
    fn time(&self) -> f64 { self.time }
}


/// Effect marker, uses the beat grid of the timing point before it
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectPoint {
    pub time: f64,
    /// Whether or not kiai time is enabled
    pub kiai: bool,
    /// Whether or not the first barline is omitted in taiko and mania
    pub omit_first_bar_line: bool,
    /// scroll speed multiplier, 1.0 is the chart's base speed
    pub scroll_speed: f64,
}
impl EffectPoint {
    pub fn new(time: f64) -> Self {
        Self {
            time,
            ..Default::default()
        }
    }

    pub fn kiai(mut self, kiai: bool) -> Self {
        self.kiai = kiai;
        self
    }
}
impl Default for EffectPoint {
    fn default() -> Self {
        Self {
            time: 0.0,
            kiai: false,
            omit_first_bar_line: false,
            scroll_speed: 1.0,
        }
    }
}
impl Timed for EffectPoint {
    fn time(&self) -> f64 { self.time }
}
