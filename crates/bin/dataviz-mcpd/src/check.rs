//! Setup verification run by `--check`.

use std::fmt;

use dataviz_core::control::DataVizControlPlane;

const WRITE_CHECK_FILE: &str = ".dataviz-write-check";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckLine {
    pub passed: bool,
    pub message: String,
}

/// Outcome of every setup check, in the order they ran.
#[derive(Debug, Default)]
pub struct SetupReport {
    pub lines: Vec<CheckLine>,
}

impl SetupReport {
    fn pass(&mut self, message: impl Into<String>) {
        self.lines.push(CheckLine {
            passed: true,
            message: message.into(),
        });
    }

    fn fail(&mut self, message: impl Into<String>) {
        self.lines.push(CheckLine {
            passed: false,
            message: message.into(),
        });
    }

    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.lines.iter().all(|line| line.passed)
    }
}

impl fmt::Display for SetupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            let mark = if line.passed { "✅" } else { "❌" };
            writeln!(f, "{mark} {}", line.message)?;
        }
        if self.all_passed() {
            write!(f, "All checks passed.")
        } else {
            write!(f, "Some checks failed.")
        }
    }
}

/// Checks that the data directory holds loadable CSV files and that the
/// output directory accepts writes.
pub fn verify_setup(control: &DataVizControlPlane) -> SetupReport {
    let mut report = SetupReport::default();
    let store = control.store();

    match control.list_data_files() {
        Ok(_) => {
            let csv_files = store.csv_file_names();
            if csv_files.is_empty() {
                report.fail(format!(
                    "No CSV files found in data directory '{}'",
                    store.input_dir().display()
                ));
            } else {
                report.pass(format!(
                    "Found {} CSV files in data directory '{}'",
                    csv_files.len(),
                    store.input_dir().display()
                ));
            }
            for name in csv_files {
                match control.load_table(&name) {
                    Ok(table) => report.pass(format!(
                        "{name}: {} rows × {} columns",
                        table.row_count(),
                        table.column_count()
                    )),
                    Err(err) => report.fail(format!("{name}: {err}")),
                }
            }
        }
        Err(err) => report.fail(err.to_string()),
    }

    let marker = store.output_dir().join(WRITE_CHECK_FILE);
    match std::fs::write(&marker, b"ok").and_then(|()| std::fs::remove_file(&marker)) {
        Ok(()) => report.pass(format!(
            "Output directory '{}' is writable",
            store.output_dir().display()
        )),
        Err(err) => report.fail(format!(
            "Output directory '{}' is not writable: {err}",
            store.output_dir().display()
        )),
    }

    report
}
