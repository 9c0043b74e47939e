use crate::prelude::*;

/// characters that cant appear in an archive entry name
const INVALID_FILENAME_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChartId(pub u32);
impl std::fmt::Display for ChartId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
impl From<u32> for ChartId {
    fn from(id: u32) -> Self { Self(id) }
}


/// one difficulty of a song, with decimal precision timestamps
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Chart {
    pub id: ChartId,

    pub general: GeneralSection,
    pub editor: EditorSection,
    pub metadata: MetadataSection,
    pub difficulty: DifficultySection,
    pub events: EventsSection,

    pub control_points: ControlPointInfo,
    /// sorted by start time
    pub hit_objects: Vec<HitObject>,
}
impl Chart {
    pub fn new(id: impl Into<ChartId>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// name of this chart's entry in an exported archive
    pub fn file_name(&self) -> String {
        let meta = &self.metadata;
        let name = format!("{} - {} ({}) [{}].osu", meta.artist, meta.title, meta.creator, meta.version);
        name.replace(INVALID_FILENAME_CHARS, "_")
    }
}


/// a file stored alongside the charts (audio, backgrounds, etc)
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetFile {
    pub name: String,
    pub data: Vec<u8>,
}
impl SetFile {
    pub fn new(name: impl ToString, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.to_string(),
            data: data.into(),
        }
    }
}

/// every chart belonging to one song
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSet {
    pub charts: Vec<Chart>,
    pub files: Vec<SetFile>,
}
impl ChartSet {
    pub fn new(charts: Vec<Chart>) -> Self {
        Self {
            charts,
            files: Vec::new(),
        }
    }

    /// load a set snapshot from json
    pub fn from_json(data: &str) -> serde_json::Result<Self> {
        serde_json::from_str(data)
    }

    /// charts ordered by id
    pub fn sorted_charts(&self) -> Vec<&Chart> {
        let mut charts = self.charts.iter().collect::<Vec<_>>();
        charts.sort_by_key(|c| c.id);
        charts
    }
}
