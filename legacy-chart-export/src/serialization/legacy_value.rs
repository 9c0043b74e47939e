use crate::prelude::*;

/// a value that can be written into a legacy field
pub trait LegacyValue {
    fn write_value(&self, out: &mut String);

    /// whether this should be written at all. empty lists and `None`s are left out
    fn is_present(&self) -> bool { true }
}

impl LegacyValue for str {
    fn write_value(&self, out: &mut String) {
        out.push_str(self)
    }
}
impl LegacyValue for String {
    fn write_value(&self, out: &mut String) {
        out.push_str(self)
    }
}
impl<T: LegacyValue + ?Sized> LegacyValue for &T {
    fn write_value(&self, out: &mut String) {
        (**self).write_value(out)
    }
    fn is_present(&self) -> bool {
        (**self).is_present()
    }
}

macro_rules! impl_for_num {
    ($($t:ty),+) => { $(
        impl LegacyValue for $t {
            fn write_value(&self, out: &mut String) {
                out.push_str(&self.to_string())
            }
        } )+
    }
}
// floats use the shortest representation that reads back to the same value, so they pass through unchanged
impl_for_num![u8, i8, u16, i16, u32, i32, u64, i64, usize, f32, f64, char];

// bools are written as 0/1
impl LegacyValue for bool {
    fn write_value(&self, out: &mut String) {
        out.push(if *self { '1' } else { '0' })
    }
}

impl<T: LegacyValue> LegacyValue for Option<T> {
    fn write_value(&self, out: &mut String) {
        if let Some(t) = self { t.write_value(out) }
    }
    fn is_present(&self) -> bool {
        self.as_ref().is_some_and(|t| t.is_present())
    }
}

// lists are comma separated
impl<T: LegacyValue> LegacyValue for Vec<T> {
    fn write_value(&self, out: &mut String) {
        for (i, t) in self.iter().enumerate() {
            if i > 0 { out.push(',') }
            t.write_value(out);
        }
    }
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl LegacyValue for HitSamples {
    fn write_value(&self, out: &mut String) {
        out.push_str(&self.to_string())
    }
}
