use crate::serialization::*;

/// builds the text of a legacy file, section by section
pub struct LegacyWriter {
    version: u32,
    data: String,
    /// where we are in the file, for errors
    stack: Vec<String>,
}
impl LegacyWriter {
    pub fn new(version: u32) -> Self {
        Self {
            version,
            data: String::new(),
            stack: Vec::new(),
        }
    }

    /// format revision being written
    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn data(self) -> String {
        self.data
    }

    pub fn write_header(&mut self) {
        self.data.push_str("osu file format v");
        self.data.push_str(&self.version.to_string());
        self.data.push('\n');
    }

    /// start a new `[Section]`, with a blank line between it and the previous one
    pub fn begin_section(&mut self, name: &str) {
        if !self.data.is_empty() { self.data.push('\n') }
        self.data.push('[');
        self.data.push_str(name);
        self.data.push_str("]\n");

        self.stack.clear();
        self.stack.push(format!("[{name}]"));
    }

    /// write `key{separator}value`, unless the value is empty
    pub fn write_pair<V: LegacyValue + ?Sized>(&mut self, key: &str, separator: &str, value: &V) {
        if !value.is_present() { return }

        self.data.push_str(key);
        self.data.push_str(separator);
        value.write_value(&mut self.data);
        self.data.push('\n');
    }

    pub fn write_line(&mut self, line: &str) {
        self.data.push_str(line);
        self.data.push('\n');
    }

    pub fn write_comment(&mut self, comment: &str) {
        self.data.push_str("//");
        self.write_line(comment);
    }

    /// note what is currently being written, shown in errors
    pub fn push_context(&mut self, context: impl ToString) {
        self.stack.push(context.to_string());
    }
    pub fn pop_context(&mut self) {
        // the section name stays
        if self.stack.len() > 1 { self.stack.pop(); }
    }

    /// an error with the current context attached
    pub fn error(&self, kind: SerializationErrorKind) -> SerializationError {
        SerializationError::from(kind).with_stack(self.stack.clone())
    }
}

/// helper for inline-writing comma separated lines
#[derive(Default)]
pub struct CsvLine {
    line: String,
    fields: usize,
}
impl CsvLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field<V: LegacyValue>(mut self, value: V) -> Self {
        if self.fields > 0 { self.line.push(',') }
        value.write_value(&mut self.line);
        self.fields += 1;
        self
    }

    /// add a field made of several values joined with `separator` (`a|b|c`, `a:b`)
    pub fn joined<V: LegacyValue>(mut self, values: impl IntoIterator<Item = V>, separator: char) -> Self {
        if self.fields > 0 { self.line.push(',') }
        for (i, value) in values.into_iter().enumerate() {
            if i > 0 { self.line.push(separator) }
            value.write_value(&mut self.line);
        }
        self.fields += 1;
        self
    }

    pub fn done(self) -> String {
        self.line
    }
}
