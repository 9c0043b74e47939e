use crate::prelude::*;
use std::io::{ Cursor, Write };
use std::collections::HashSet;
use zip::{ ZipWriter, CompressionMethod, DateTime };
use zip::write::SimpleFileOptions;

/// somewhere to put exported entries
pub trait ArchiveWriter {
    type Output;

    fn add_entry(&mut self, name: &str, data: &[u8]) -> ExportResult<()>;
    fn finish(self) -> ExportResult<Self::Output>;
}

/// Builds a zip archive in memory.
///
/// Nothing is written anywhere until [`ArchiveWriter::finish`] hands back the bytes,
/// so dropping a half built archive leaves no trace.
pub struct ZipArchiveWriter {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
    names: HashSet<String>,
}
impl ZipArchiveWriter {
    pub fn new(compression: ArchiveCompression) -> Self {
        let method = match compression {
            ArchiveCompression::Stored => CompressionMethod::Stored,
            ArchiveCompression::Deflated => CompressionMethod::Deflated,
        };

        // fixed timestamp and permissions so the same input always gives the same bytes
        let options = SimpleFileOptions::default()
            .compression_method(method)
            .last_modified_time(DateTime::default())
            .unix_permissions(0o644);

        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            options,
            names: HashSet::new(),
        }
    }
}
impl ArchiveWriter for ZipArchiveWriter {
    type Output = Vec<u8>;

    fn add_entry(&mut self, name: &str, data: &[u8]) -> ExportResult<()> {
        if !self.names.insert(name.to_owned()) {
            return Err(ExportError::DuplicateEntry(name.to_owned()));
        }

        self.zip.start_file(name, self.options)?;
        self.zip.write_all(data)?;
        Ok(())
    }

    fn finish(self) -> ExportResult<Vec<u8>> {
        Ok(self.zip.finish()?.into_inner())
    }
}
