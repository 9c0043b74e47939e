use crate::prelude::*;

/// Position in playfield pixels, the legacy format only stores whole pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}
impl Position {
    pub fn new(x: i32, y: i32) -> Self { Self { x, y } }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HitObject {
    /// Time when the object is to be hit, in milliseconds from the beginning of the chart's audio.
    pub start_time: f64,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub new_combo: bool,
    /// how many combo colours to skip, only the lowest 3 bits are kept
    #[serde(default)]
    pub combo_offset: u8,
    /// Bit flags indicating the hitsound applied to the object (0 = normal, 2 = whistle, 4 = finish, 8 = clap)
    #[serde(default)]
    pub hit_sound: u8,
    #[serde(default)]
    pub samples: HitSamples,
    pub kind: HitObjectKind,
}
impl HitObject {
    pub fn circle(start_time: f64, position: Position) -> Self {
        Self {
            start_time,
            position,
            new_combo: false,
            combo_offset: 0,
            hit_sound: 0,
            samples: HitSamples::default(),
            kind: HitObjectKind::Circle,
        }
    }

    pub fn with_kind(mut self, kind: HitObjectKind) -> Self {
        self.kind = kind;
        self
    }

    /// end time for objects with a duration
    pub fn end_time(&self) -> Option<f64> {
        self.kind.end_time()
    }

    /// type bit flags as written in the legacy format
    ///
    /// abcdefgh
    /// h = circle, g = slider, f = new combo, e = spinner, b-d = combo colour skip, a = mania hold
    pub fn type_flags(&self) -> u8 {
        let mut flags = self.kind.type_flag();
        if self.new_combo { flags |= 4 }
        flags | ((self.combo_offset & 7) << 4)
    }
}
impl Timed for HitObject {
    fn time(&self) -> f64 { self.start_time }
}


#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag="type", rename_all="snake_case")]
pub enum HitObjectKind {
    Circle,
    Slider {
        curve_type: CurveType,
        /// curve points after the head, the head is the object's position
        control_points: Vec<Position>,
        /// how many times the slider is travelled, 1 = no repeats
        slides: u32,
        /// visual length in playfield pixels
        length: f64,
        /// hitsounds for each node (head, repeats, tail)
        #[serde(default)]
        edge_sounds: Vec<u8>,
        /// [normal set, addition set] for each node
        #[serde(default)]
        edge_sets: Vec<[u8; 2]>,
    },
    Spinner {
        end_time: f64,
    },
    /// mania hold note
    Hold {
        end_time: f64,
    },
}
impl HitObjectKind {
    pub fn type_flag(&self) -> u8 {
        match self {
            Self::Circle => 1,
            Self::Slider { .. } => 2,
            Self::Spinner { .. } => 8,
            Self::Hold { .. } => 128,
        }
    }

    pub fn end_time(&self) -> Option<f64> {
        match self {
            Self::Spinner { end_time } | Self::Hold { end_time } => Some(*end_time),
            _ => None,
        }
    }
}


#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all="snake_case")]
pub enum CurveType {
    Bezier,
    Catmull,
    Linear,
    Perfect,
}
impl CurveType {
    pub fn as_char(&self) -> char {
        match self {
            Self::Bezier => 'B',
            Self::Catmull => 'C',
            Self::Linear => 'L',
            Self::Perfect => 'P',
        }
    }
}
