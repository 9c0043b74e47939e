use crate::prelude::*;
use std::io::{ Cursor, Read };


use fixtures::*;
use legacy_decoder::*;


/// every entry of an archive, in archive order
fn read_archive(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();

    (0..archive.len()).map(|i| {
        let mut file = archive.by_index(i).unwrap();
        let mut data = Vec::new();
        file.read_to_end(&mut data).unwrap();
        (file.name().to_owned(), data)
    }).collect()
}

fn decode_entry(bytes: &[u8], name: &str) -> DecodedChart {
    let (_, data) = read_archive(bytes)
        .into_iter()
        .find(|(n, _)| n == name)
        .unwrap_or_else(|| panic!("no entry {name}"));

    DecodedChart::decode(&String::from_utf8(data).unwrap())
}

fn export(exporter: &LegacyExporter, set: &ChartSet, version: Option<u32>) -> (ExportResult<ExportSummary>, Vec<u8>) {
    let mut output = Vec::new();
    let result = exporter.export_to_stream(set, &mut output, version);
    (result, output)
}


#[test]
fn decimal_times_survive_the_round_trip() {
    let set = ChartSet::new(vec![decimal_chart(1, "Hard")]);
    let (summary, bytes) = export(&LegacyExporter::default(), &set, None);
    let summary = summary.unwrap();
    assert_eq!(summary.format_version, LATEST_FORMAT_VERSION);

    let decoded = decode_entry(&bytes, "Artist - Song (Mapper) [Hard].osu");
    assert_eq!(decoded.version, LATEST_FORMAT_VERSION);
    assert_eq!(decoded.metadata["Title"], "Song");
    assert_eq!(decoded.general["AudioFilename"], "audio.mp3");

    // the timing point is floored, the kiai and the note on the same beat land on the same millisecond
    let anchors = decoded.uninherited().map(|t| t.time).collect::<Vec<_>>();
    assert_eq!(anchors, vec![284, 40000]);
    let kiai = decoded.inherited().next().unwrap();
    assert_eq!((kiai.time, kiai.effects), (28519, 1));
    assert_eq!(decoded.hit_objects[1].time, 28519);

    // everything matches what the converter projected
    let timeline = TimingConverter::convert_chart(&set.charts[0]).unwrap();
    let starts = decoded.hit_objects.iter().map(|h| h.time).collect::<Vec<_>>();
    let ends = decoded.hit_objects.iter().map(|h| h.end_time).collect::<Vec<_>>();
    assert_eq!(starts, timeline.hit_objects.iter().map(|h| h.start.value).collect::<Vec<_>>());
    assert_eq!(ends, timeline.hit_objects.iter().map(|h| h.end.map(|e| e.value)).collect::<Vec<_>>());
    assert_eq!(starts, vec![500, 28519, 40353, 42118]);
    assert_eq!(ends[2], Some(41765));
    assert_eq!(decoded.breaks, vec![(30000, 35000)]);

    // non-timestamp fields pass through
    let beats = decoded.uninherited().map(|t| t.beat_length).collect::<Vec<_>>();
    assert_eq!(beats, vec![5647.2, 352.941]);
}

#[test]
fn grid_locked_times_sit_on_the_grid() {
    let chart = decimal_chart(1, "Hard");
    let set = ChartSet::new(vec![chart.clone()]);
    let (_, bytes) = export(&LegacyExporter::default(), &set, None);
    let decoded = decode_entry(&bytes, &chart.file_name());

    let converter = TimingConverter::new(&chart.control_points).unwrap();
    for (object, decoded) in chart.hit_objects.iter().zip(decoded.hit_objects.iter()) {
        if object.start_time.fract() == 0.0 { continue }

        let grid = converter.grid_at(object.start_time).unwrap();
        assert_eq!((decoded.time - grid.anchor) % grid.beat, 0, "{} is off the grid", decoded.time);
    }
}

#[test]
fn entries_are_ordered_by_chart_id() {
    let (summary, bytes) = export(&LegacyExporter::default(), &chart_set(), None);
    let summary = summary.unwrap();

    let names = read_archive(&bytes).into_iter().map(|(n, _)| n).collect::<Vec<_>>();
    assert_eq!(names, vec![
        "Artist - Song (Mapper) [Easy].osu",
        "Artist - Song (Mapper) [Hard].osu",
        "audio.mp3",
        "bg.jpg",
    ]);

    let charts = summary.entries.iter().map(|e| e.chart).collect::<Vec<_>>();
    assert_eq!(charts, vec![Some(ChartId(1)), Some(ChartId(2)), None, None]);
}

#[test]
fn summary_hashes_match_the_entries() {
    let (summary, bytes) = export(&LegacyExporter::default(), &chart_set(), None);
    let summary = summary.unwrap();

    for (name, data) in read_archive(&bytes) {
        let entry = summary.entry(&name).unwrap();
        assert_eq!(entry.size, data.len());
        assert_eq!(entry.hash, ContentHash::of(&data));
    }
}

#[test]
fn exports_are_deterministic() {
    let set = chart_set();
    let (_, first) = export(&LegacyExporter::default(), &set, None);
    let (_, second) = export(&LegacyExporter::default(), &set, None);
    assert_eq!(first, second);

    let parallel = LegacyExporter::new(ExportConfig {
        parallel: true,
        ..Default::default()
    });
    let (_, threaded) = export(&parallel, &set, None);
    assert_eq!(first, threaded);
}

#[test]
fn a_failing_chart_writes_nothing() {
    let set = ChartSet::new(vec![decimal_chart(1, "Hard"), broken_chart(2)]);

    for parallel in [false, true] {
        let exporter = LegacyExporter::new(ExportConfig { parallel, ..Default::default() });
        let (result, output) = export(&exporter, &set, None);

        let error = result.unwrap_err();
        assert!(matches!(
            error,
            ExportError::InvalidTimeline { chart: ChartId(2), source: InvalidTimelineError::InvalidBeatLength { index: 0, .. } }
        ));
        assert!(output.is_empty());
    }
}

#[test]
fn first_failure_by_id_is_reported() {
    let set = ChartSet::new(vec![broken_chart(5), decimal_chart(4, "Hard"), broken_chart(3)]);

    for parallel in [false, true] {
        let exporter = LegacyExporter::new(ExportConfig { parallel, ..Default::default() });
        let (result, _) = export(&exporter, &set, None);
        assert_eq!(result.unwrap_err().chart(), Some(ChartId(3)));
    }
}

#[test]
fn cancelled_exports_write_nothing() {
    let token = CancellationToken::new();
    let exporter = LegacyExporter::default().with_cancellation(token.clone());
    token.cancel();

    let (result, output) = export(&exporter, &chart_set(), None);
    assert!(matches!(result, Err(ExportError::Cancelled)));
    assert!(output.is_empty());
    assert!(exporter.cancellation_token().is_cancelled());
}

#[test]
fn older_format_versions() {
    let set = ChartSet::new(vec![decimal_chart(1, "Hard")]);
    let (summary, bytes) = export(&LegacyExporter::default(), &set, Some(9));
    assert_eq!(summary.unwrap().format_version, 9);

    let (_, data) = read_archive(&bytes).remove(0);
    let text = String::from_utf8(data).unwrap();
    assert!(text.starts_with("osu file format v9\n"));
    // no hit samples and no unicode metadata before v10
    assert!(text.contains("\n256,192,500,1,0\n"));
    assert!(!text.contains("TitleUnicode"));

    let decoded = DecodedChart::decode(&text);
    assert_eq!(decoded.hit_objects[2].end_time, Some(41765));
}

#[test]
fn config_version_is_used_unless_overridden() {
    let set = ChartSet::new(vec![decimal_chart(1, "Hard")]);
    let exporter = LegacyExporter::new(ExportConfig {
        format_version: Some(12),
        ..Default::default()
    });

    assert_eq!(export(&exporter, &set, None).0.unwrap().format_version, 12);
    assert_eq!(export(&exporter, &set, Some(7)).0.unwrap().format_version, 7);
}

#[test]
fn unsupported_versions_fail_before_writing() {
    let set = chart_set();
    for version in [MIN_FORMAT_VERSION - 1, LATEST_FORMAT_VERSION + 1] {
        let (result, output) = export(&LegacyExporter::default(), &set, Some(version));
        assert!(matches!(result, Err(ExportError::UnsupportedVersion(v)) if v == version));
        assert!(output.is_empty());
    }
}

#[test]
fn set_files_can_be_left_out() {
    let exporter = LegacyExporter::new(ExportConfig {
        include_files: false,
        compression: ArchiveCompression::Stored,
        ..Default::default()
    });

    let (summary, bytes) = export(&exporter, &chart_set(), None);
    assert_eq!(summary.unwrap().entries.len(), 2);
    assert!(read_archive(&bytes).iter().all(|(name, _)| name.ends_with(".osu")));
}

#[test]
fn charts_with_the_same_name_clash() {
    let set = ChartSet::new(vec![decimal_chart(1, "Hard"), decimal_chart(2, "Hard")]);
    let (result, output) = export(&LegacyExporter::default(), &set, None);

    assert!(matches!(result, Err(ExportError::DuplicateEntry(_))));
    assert!(output.is_empty());
}

#[test]
fn export_to_path_commits_on_success() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("set.osz");

    let summary = LegacyExporter::default().export_to_path(&chart_set(), &path, None).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(read_archive(&bytes).len(), summary.entries.len());

    // a failed export leaves the directory as it was
    let failed = dir.path().join("failed.osz");
    let set = ChartSet::new(vec![broken_chart(1)]);
    assert!(LegacyExporter::default().export_to_path(&set, &failed, None).is_err());

    let files = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(files, 1);
    assert!(!failed.exists());
}

#[test]
fn sets_from_json_snapshots() {
    let set = ChartSet::from_json(r#"{
        "charts": [{
            "id": 1,
            "metadata": { "artist": "a", "title": "b", "creator": "c", "version": "d" },
            "control_points": {
                "timing_points": [{ "time": 284.725, "beat_length": 5647.2 }],
                "effect_points": [{ "time": 28520.019, "kiai": true }]
            },
            "hit_objects": [
                { "start_time": 28520.019, "position": { "x": 64, "y": 192 }, "kind": { "type": "hold", "end_time": 28600.2 } }
            ]
        }]
    }"#).unwrap();

    let (summary, bytes) = export(&LegacyExporter::default(), &set, None);
    assert_eq!(summary.unwrap().nudged, 0);

    let decoded = decode_entry(&bytes, "a - b (c) [d].osu");
    assert_eq!(decoded.hit_objects[0].time, 28519);
    assert_eq!(decoded.hit_objects[0].type_flags, 128);
    assert_eq!((decoded.hit_objects[0].x, decoded.hit_objects[0].y), (64, 192));
    assert!(decoded.hit_objects[0].end_time.unwrap() >= 28519);
}
