use crate::prelude::*;

#[repr(u8)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all="snake_case")]
pub enum RulesetMode {
    #[default]
    Standard = 0,
    Taiko = 1,
    Catch = 2,
    Mania = 3,
}
impl From<RulesetMode> for u8 {
    fn from(mode: RulesetMode) -> Self {
        mode as u8
    }
}

impl LegacyValue for RulesetMode {
    fn write_value(&self, out: &mut String) {
        u8::from(*self).write_value(out)
    }
}
