use crate::prelude::*;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[derive(LegacySection)]
#[legacy(section="General", separator=": ")]
#[serde(default)]
pub struct GeneralSection {
    pub audio_filename: String,
    /// milliseconds of silence before the audio starts playing
    pub audio_lead_in: i32,
    #[legacy(since=5)]
    pub preview_time: i32,
    pub countdown: u8,
    pub sample_set: String,
    pub stack_leniency: f32,
    pub mode: RulesetMode,
    pub letterbox_in_breaks: bool,
    #[legacy(since=8)]
    pub widescreen_storyboard: bool,
    #[legacy(since=14)]
    pub samples_match_playback_rate: bool,
}
impl Default for GeneralSection {
    fn default() -> Self {
        Self {
            audio_filename: String::new(),
            audio_lead_in: 0,
            preview_time: -1,
            countdown: 1,
            sample_set: "Normal".to_owned(),
            stack_leniency: 0.7,
            mode: RulesetMode::Standard,
            letterbox_in_breaks: false,
            widescreen_storyboard: false,
            samples_match_playback_rate: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[derive(LegacySection)]
#[legacy(section="Editor", separator=": ")]
#[serde(default)]
pub struct EditorSection {
    /// written as a comma separated list, left out when empty
    pub bookmarks: Vec<i32>,
    pub distance_spacing: f64,
    pub beat_divisor: u8,
    pub grid_size: u8,
    #[legacy(since=12)]
    pub timeline_zoom: f64,
}
impl Default for EditorSection {
    fn default() -> Self {
        Self {
            bookmarks: Vec::new(),
            distance_spacing: 1.0,
            beat_divisor: 4,
            grid_size: 4,
            timeline_zoom: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[derive(LegacySection)]
#[legacy(section="Metadata")]
#[serde(default)]
pub struct MetadataSection {
    pub title: String,
    #[legacy(since=10)]
    pub title_unicode: String,
    pub artist: String,
    #[legacy(since=10)]
    pub artist_unicode: String,
    pub creator: String,
    /// difficulty name
    pub version: String,
    pub source: String,
    /// space separated
    pub tags: String,
    #[legacy(key="BeatmapID", since=10)]
    pub chart_online_id: Option<i32>,
    #[legacy(key="BeatmapSetID", since=10)]
    pub set_online_id: Option<i32>,
}
impl Default for MetadataSection {
    fn default() -> Self {
        let unknown = "Unknown".to_owned();

        Self {
            title: unknown.clone(),
            title_unicode: unknown.clone(),
            artist: unknown.clone(),
            artist_unicode: unknown.clone(),
            creator: unknown.clone(),
            version: unknown,
            source: String::new(),
            tags: String::new(),
            chart_online_id: None,
            set_online_id: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[derive(LegacySection)]
#[legacy(section="Difficulty")]
#[serde(default)]
pub struct DifficultySection {
    #[legacy(key="HPDrainRate")]
    pub hp_drain_rate: f32,
    pub circle_size: f32,
    pub overall_difficulty: f32,
    #[legacy(since=8)]
    pub approach_rate: f32,
    pub slider_multiplier: f64,
    pub slider_tick_rate: f64,
}
impl Default for DifficultySection {
    fn default() -> Self {
        Self {
            hp_drain_rate: 5.0,
            circle_size: 5.0,
            overall_difficulty: 5.0,
            approach_rate: 5.0,
            slider_multiplier: 1.4,
            slider_tick_rate: 1.0,
        }
    }
}


/// [Events] section contents. storyboard commands are not carried
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsSection {
    pub background: Option<Background>,
    pub breaks: Vec<BreakPeriod>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Background {
    pub filename: String,
    pub x_offset: i32,
    pub y_offset: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BreakPeriod {
    pub start_time: f64,
    pub end_time: f64,
}
impl Timed for BreakPeriod {
    fn time(&self) -> f64 { self.start_time }
}
