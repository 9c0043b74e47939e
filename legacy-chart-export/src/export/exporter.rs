use crate::prelude::*;
use std::io::Write;
use std::path::Path;

/// one file in an exported archive
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedEntry {
    pub name: String,
    pub size: usize,
    pub hash: ContentHash,
    /// chart this entry was written from. none for the set's extra files
    pub chart: Option<ChartId>,
}

/// what an export wrote
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSummary {
    pub format_version: u32,
    /// in archive order
    pub entries: Vec<ExportedEntry>,
    /// timestamps that were moved to keep their chart in order
    pub nudged: usize,
}
impl ExportSummary {
    pub fn entry(&self, name: &str) -> Option<&ExportedEntry> {
        self.entries.iter().find(|e| e.name == name)
    }
}

/// a chart after conversion and serialization, ready to go in the archive
struct EncodedChart {
    id: ChartId,
    name: String,
    data: Vec<u8>,
    nudged: usize,
}


/// Writes chart sets as legacy archives.
///
/// Every chart is converted and serialized before anything is written, so a chart
/// that fails never leaves a partial archive behind.
pub struct LegacyExporter {
    config: ExportConfig,
    cancellation: CancellationToken,
}
impl LegacyExporter {
    pub fn new(config: ExportConfig) -> Self {
        Self {
            config,
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// token that cancels this exporter's exports
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// version requested by the caller, then the config, then the newest one
    pub fn resolve_version(&self, format_version: Option<u32>) -> ExportResult<u32> {
        let version = format_version
            .or(self.config.format_version)
            .unwrap_or(LATEST_FORMAT_VERSION);

        if !is_supported_version(version) {
            return Err(ExportError::UnsupportedVersion(version));
        }
        Ok(version)
    }

    /// Export every chart in `set` as one archive written to `output`.
    ///
    /// Charts are written in id order followed by the set's files (sorted by name, when
    /// [`ExportConfig::include_files`] is on). If any chart fails, the error for the
    /// lowest failing id is returned and `output` is left untouched.
    pub fn export_to_stream<W: Write>(&self, set: &ChartSet, mut output: W, format_version: Option<u32>) -> ExportResult<ExportSummary> {
        let version = self.resolve_version(format_version)?;
        self.check_cancelled()?;

        let charts = set.sorted_charts();
        info!("exporting {} charts as v{version}", charts.len());

        let encoded = self.encode_charts(&charts, version)?;

        let mut archive = ZipArchiveWriter::new(self.config.compression);
        let mut summary = ExportSummary {
            format_version: version,
            entries: Vec::with_capacity(encoded.len()),
            nudged: 0,
        };

        for chart in &encoded {
            self.add_entry(&mut archive, &mut summary, &chart.name, &chart.data, Some(chart.id))?;
            summary.nudged += chart.nudged;
        }

        if self.config.include_files {
            let mut files = set.files.iter().collect::<Vec<_>>();
            files.sort_by(|a, b| a.name.cmp(&b.name));

            for file in files {
                self.add_entry(&mut archive, &mut summary, &file.name, &file.data, None)?;
            }
        }

        let bytes = archive.finish()?;
        self.check_cancelled()?;

        output.write_all(&bytes)?;
        output.flush()?;

        info!("exported {} entries ({} bytes)", summary.entries.len(), bytes.len());
        Ok(summary)
    }

    /// Export to a file at `path`.
    ///
    /// The archive is written to a temporary file in the same directory and only moved
    /// into place once it is complete.
    pub fn export_to_path(&self, set: &ChartSet, path: impl AsRef<Path>, format_version: Option<u32>) -> ExportResult<ExportSummary> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        let summary = self.export_to_stream(set, file.as_file_mut(), format_version)?;
        file.persist(path).map_err(|e| ExportError::Io(e.error))?;

        debug!("wrote {path:?}");
        Ok(summary)
    }

    fn encode_charts(&self, charts: &[&Chart], version: u32) -> ExportResult<Vec<EncodedChart>> {
        if !self.config.parallel || charts.len() < 2 {
            return charts.iter().map(|chart| encode_chart(chart, version)).collect();
        }

        std::thread::scope(|scope| {
            let handles = charts
                .iter()
                .map(|chart| scope.spawn(move || encode_chart(chart, version)))
                .collect::<Vec<_>>();

            // joined in id order, so the first error is the lowest failing id
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                .collect()
        })
    }

    fn add_entry(&self, archive: &mut impl ArchiveWriter, summary: &mut ExportSummary, name: &str, data: &[u8], chart: Option<ChartId>) -> ExportResult<()> {
        self.check_cancelled()?;
        archive.add_entry(name, data)?;

        let hash = ContentHash::of(data);
        debug!("added {name} ({} bytes, {hash})", data.len());

        summary.entries.push(ExportedEntry {
            name: name.to_owned(),
            size: data.len(),
            hash,
            chart,
        });
        Ok(())
    }

    fn check_cancelled(&self) -> ExportResult<()> {
        if self.cancellation.is_cancelled() {
            info!("export cancelled");
            return Err(ExportError::Cancelled);
        }
        Ok(())
    }
}
impl Default for LegacyExporter {
    fn default() -> Self {
        Self::new(ExportConfig::default())
    }
}

fn encode_chart(chart: &Chart, version: u32) -> ExportResult<EncodedChart> {
    let timeline = TimingConverter::convert_chart(chart)
        .map_err(|source| ExportError::InvalidTimeline { chart: chart.id, source })?;

    if log::log_enabled!(log::Level::Trace) {
        match serde_json::to_string(&timeline) {
            Ok(json) => trace!("chart {} timeline: {json}", chart.id),
            Err(e) => warn!("chart {} timeline could not be logged: {e}", chart.id),
        }
    }

    let data = LegacyEncoder::new(chart, &timeline)
        .with_version(version)
        .encode_bytes()
        .map_err(|source| ExportError::Serialization { chart: chart.id, source })?;

    let name = chart.file_name();
    debug!("encoded chart {} as {name:?}", chart.id);

    Ok(EncodedChart {
        id: chart.id,
        name,
        data,
        nudged: timeline.nudged().count(),
    })
}
