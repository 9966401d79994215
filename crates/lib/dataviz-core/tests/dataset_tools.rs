use std::path::Path;

use dataviz_core::control::{ControlError, DataVizControlPlane};
use dataviz_core::store::{DataStore, StoreError};
use tempfile::TempDir;

const STATES_CSV: &str = "geography,Obesity,Diabetes\n\
Alabama,36.2,13.2\n\
Alaska,,8.1\n\
Arizona,31.4,10.5\n\
Arkansas,,12.7\n\
California,25.8,10.2\n";

struct Fixture {
    _root: TempDir,
    control: DataVizControlPlane,
}

impl Fixture {
    fn new() -> Self {
        let root = tempfile::tempdir().expect("failed to create scratch directory");
        let data = root.path().join("data");
        let images = root.path().join("images");
        std::fs::create_dir_all(&data).expect("failed to create data dir");
        std::fs::create_dir_all(&images).expect("failed to create output dir");
        let control = DataVizControlPlane::new(DataStore::new(data, images));
        Self {
            _root: root,
            control,
        }
    }

    fn with_file(self, name: &str, contents: &str) -> Self {
        std::fs::write(self.data_dir().join(name), contents).expect("failed to write fixture");
        self
    }

    fn data_dir(&self) -> &Path {
        self.control.store().input_dir()
    }

    fn output_dir(&self) -> &Path {
        self.control.store().output_dir()
    }

    fn output_count(&self) -> usize {
        std::fs::read_dir(self.output_dir())
            .expect("output dir readable")
            .count()
    }
}

#[test]
fn describe_reports_shape_and_null_counts() {
    let fixture = Fixture::new().with_file("states.csv", STATES_CSV);
    let report = fixture
        .control
        .describe_dataset("states.csv")
        .expect("describe should succeed");

    assert_eq!(report.row_count, 5);
    assert_eq!(report.column_count, 3);
    let obesity = report
        .columns
        .iter()
        .find(|column| column.name == "Obesity")
        .expect("Obesity column described");
    assert_eq!(obesity.null_count, 2);
    assert!(report.to_string().contains("Shape: 5 rows × 3 columns"));
}

#[test]
fn describe_missing_file_lists_csv_files() {
    let fixture = Fixture::new()
        .with_file("states.csv", STATES_CSV)
        .with_file("notes.txt", "hello");
    let err = fixture.control.describe_dataset("nope.csv").unwrap_err();
    match err {
        ControlError::Store(StoreError::FileNotFound { available, .. }) => {
            assert_eq!(available, vec!["states.csv".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unparseable_file_is_a_load_error() {
    let fixture = Fixture::new().with_file("broken.csv", "a,b\n1,2,3\n");
    let err = fixture.control.describe_dataset("broken.csv").unwrap_err();
    assert!(matches!(err, ControlError::Load { .. }), "got {err}");
}

#[test]
fn scatter_uses_only_complete_rows() {
    let fixture = Fixture::new().with_file("states.csv", STATES_CSV);
    let artifact = fixture
        .control
        .generate_correlation_plot("states.csv", "scatter")
        .expect("scatter should render");

    assert_eq!(
        artifact.output_path,
        fixture.output_dir().join("states_scatter_correlation.png")
    );
    assert!(artifact.size_bytes > 0);
    let bytes = std::fs::read(&artifact.output_path).expect("artifact readable");
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn heatmap_renders_to_its_own_file() {
    let fixture = Fixture::new().with_file("states.csv", STATES_CSV);
    let artifact = fixture
        .control
        .generate_correlation_plot("states.csv", "heatmap")
        .expect("heatmap should render");
    assert!(artifact.output_path.ends_with("states_heatmap_correlation.png"));
}

#[test]
fn correlation_without_required_columns_writes_nothing() {
    let fixture = Fixture::new().with_file("other.csv", "geography,obesity,Diabetes\nA,1,2\n");
    let err = fixture
        .control
        .generate_correlation_plot("other.csv", "scatter")
        .unwrap_err();
    assert!(matches!(err, ControlError::MissingColumns { .. }));
    assert_eq!(fixture.output_count(), 0);
}

#[test]
fn correlation_with_only_partial_rows_has_no_valid_data() {
    let fixture = Fixture::new().with_file("gaps.csv", "Obesity,Diabetes\n1,\n,2\n");
    let err = fixture
        .control
        .generate_correlation_plot("gaps.csv", "scatter")
        .unwrap_err();
    assert!(matches!(err, ControlError::NoValidData { .. }));
    assert_eq!(fixture.output_count(), 0);
}

#[test]
fn unknown_plot_kind_writes_nothing() {
    let fixture = Fixture::new().with_file("states.csv", STATES_CSV);
    let err = fixture
        .control
        .generate_correlation_plot("states.csv", "bogus")
        .unwrap_err();
    assert!(matches!(err, ControlError::InvalidPlotKind(ref kind) if kind == "bogus"));
    assert_eq!(
        err.to_string(),
        "Invalid plot type 'bogus'. Use 'scatter' or 'heatmap'."
    );
    assert_eq!(fixture.output_count(), 0);
}

#[test]
fn ranking_resolves_metric_ignoring_case() {
    let fixture = Fixture::new().with_file("states.csv", STATES_CSV);
    let artifact = fixture
        .control
        .generate_state_comparison("states.csv", "OBESITY", 3)
        .expect("comparison should render");
    assert_eq!(
        artifact.output_path,
        fixture.output_dir().join("states_OBESITY_top3_comparison.png")
    );
}

#[test]
fn ranking_allows_fewer_rows_than_requested() {
    let fixture = Fixture::new().with_file("states.csv", STATES_CSV);
    let artifact = fixture
        .control
        .generate_state_comparison("states.csv", "Obesity", 10)
        .expect("fewer rows than top_n is fine");
    assert!(artifact.output_path.ends_with("states_Obesity_top10_comparison.png"));
}

#[test]
fn ranking_requires_geography_column() {
    let fixture = Fixture::new().with_file("nogeo.csv", "State,Obesity\nA,1\n");
    let err = fixture
        .control
        .generate_state_comparison("nogeo.csv", "obesity", 5)
        .unwrap_err();
    assert!(matches!(err, ControlError::MissingGeographyColumn));
}

#[test]
fn ranking_unknown_metric_lists_columns() {
    let fixture = Fixture::new().with_file("states.csv", STATES_CSV);
    let err = fixture
        .control
        .generate_state_comparison("states.csv", "smoking", 5)
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("Column 'smoking' not found"));
    assert!(message.contains("geography"));
    assert!(message.contains("Diabetes"));
}

#[test]
fn ranking_rejects_non_positive_top_n() {
    let fixture = Fixture::new().with_file("states.csv", STATES_CSV);
    for top_n in [0, -3] {
        let err = fixture
            .control
            .generate_state_comparison("states.csv", "Obesity", top_n)
            .unwrap_err();
        assert!(matches!(err, ControlError::InvalidTopN(value) if value == top_n));
    }
    assert_eq!(fixture.output_count(), 0);
}

#[test]
fn ranking_metric_with_separator_stays_in_output_dir() {
    let fixture = Fixture::new().with_file(
        "rates.csv",
        "geography,deaths/100k\nAlabama,12.5\nAlaska,9.1\n",
    );
    let artifact = fixture
        .control
        .generate_state_comparison("rates.csv", "deaths/100k", 2)
        .expect("comparison should render");
    assert_eq!(
        artifact.output_path,
        fixture.output_dir().join("rates_deaths_100k_top2_comparison.png")
    );
    assert_eq!(fixture.output_count(), 1);
}

#[test]
fn rerunning_a_render_overwrites_the_same_path() {
    let fixture = Fixture::new().with_file("states.csv", STATES_CSV);
    let first = fixture
        .control
        .generate_state_comparison("states.csv", "Diabetes", 2)
        .expect("first render");
    let second = fixture
        .control
        .generate_state_comparison("states.csv", "Diabetes", 2)
        .expect("second render");
    assert_eq!(first.output_path, second.output_path);
    assert_eq!(fixture.output_count(), 1);

    let images = fixture
        .control
        .list_generated_images()
        .expect("image listing");
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].name, "states_Diabetes_top2_comparison.png");
}

#[test]
fn file_listing_reports_sizes_in_mebibytes() {
    let payload = "x".repeat(3 * 1024 * 1024 / 2);
    let fixture = Fixture::new()
        .with_file("big.csv", &payload)
        .with_file("small.txt", "abc");
    let files = fixture.control.list_data_files().expect("listing works");
    assert_eq!(files.len(), 2);
    let big = files.iter().find(|file| file.name == "big.csv").unwrap();
    assert!((big.size_mb() - 1.5).abs() < f64::EPSILON);
    assert_eq!(big.extension, ".csv");
    let small = files.iter().find(|file| file.name == "small.txt").unwrap();
    assert!(small.size_mb().abs() < f64::EPSILON);
}

#[test]
fn missing_data_directory_is_reported() {
    let control = DataVizControlPlane::new(DataStore::new("/no/such/data", "/no/such/out"));
    let err = control.list_data_files().unwrap_err();
    assert!(matches!(
        err,
        ControlError::Store(StoreError::DirectoryNotFound { .. })
    ));
}
