use crate::prelude::*;

/// Hit sample syntax: normalSet:additionSet:index:volume:filename
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitSamples {
    /// Sample set of the normal sound.
    pub normal_set: u8,
    /// Sample set of the whistle, finish, and clap sounds.
    pub addition_set: u8,
    /// Index of the sample. If this is 0, the timing point's sample index will be used instead.
    pub index: u8,
    /// Volume of the sample from 1 to 100. If this is 0, the timing point's volume will be used instead.
    pub volume: u8,
    /// Custom filename of the addition sound.
    pub filename: Option<String>,
}

impl std::fmt::Display for HitSamples {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}:{}",
            self.normal_set,
            self.addition_set,
            self.index,
            self.volume,
            self.filename.as_deref().unwrap_or_default()
        )
    }
}

#[test]
fn hit_samples_format() {
    assert_eq!(HitSamples::default().to_string(), "0:0:0:0:");

    let samples = HitSamples {
        normal_set: 1,
        addition_set: 2,
        index: 3,
        volume: 70,
        filename: Some("clap.wav".to_owned()),
    };
    assert_eq!(samples.to_string(), "1:2:3:70:clap.wav");
}
