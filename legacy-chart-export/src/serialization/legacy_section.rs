use crate::serialization::*;

/// a `[Section]` made of key/value pairs, usually implemented with `#[derive(LegacySection)]`
pub trait LegacySection {
    const SECTION: &'static str;
    fn write_section(&self, lw: &mut LegacyWriter);
}
