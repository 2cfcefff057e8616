//! Result files and the shared execution time log.

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use reconf_pivot::Cell;

/// Format a configuration the way result files expect: `[(x, y), ...]`.
fn format_positions(cells: &[Cell]) -> String {
    let items: Vec<String> = cells.iter().map(|c| c.to_string()).collect();
    format!("[{}]", items.join(", "))
}

/// Write one scenario's result file.
///
/// Safe instances get the three milestone configurations (initial,
/// after pivot-visit, after destination-extension); unsafe instances
/// emit only the verdict line.
pub fn write_result(path: &Path, safe: bool, milestones: Option<&[Vec<Cell>; 3]>) -> Result<()> {
    let mut out = format!("Safe-to-Pivot: {safe}\n");
    if let Some(frames) = milestones {
        for (i, frame) in frames.iter().enumerate() {
            out.push_str(&format!("{i} {}\n", format_positions(frame)));
        }
    }
    std::fs::write(path, out).with_context(|| format!("writing {}", path.display()))
}

/// Append-only `scenario_file;execution_time_seconds` log for one
/// results folder, shared by all workers. Times use a decimal comma
/// for downstream locale compatibility.
pub struct TimeLog {
    path: PathBuf,
    done: HashSet<String>,
    writer: Mutex<csv::Writer<File>>,
}

impl TimeLog {
    /// Open or create the log, collecting already-logged scenario file
    /// names for resume.
    pub fn open(path: PathBuf) -> Result<Self> {
        let mut done = HashSet::new();
        let exists = path.exists();
        if exists {
            let mut reader = csv::ReaderBuilder::new()
                .delimiter(b';')
                .flexible(true)
                .from_path(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            for record in reader.records() {
                let Ok(record) = record else { continue };
                if let Some(file) = record.get(0) {
                    done.insert(file.to_string());
                }
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("opening {}", path.display()))?;
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b';')
            .from_writer(file);
        if !exists {
            writer.write_record(["scenario_file", "execution_time_seconds"])?;
            writer.flush()?;
        }

        Ok(Self {
            path,
            done,
            writer: Mutex::new(writer),
        })
    }

    /// Scenario file names already logged.
    pub fn completed(&self) -> &HashSet<String> {
        &self.done
    }

    /// Append one line, flushed immediately so interrupted batches
    /// resume correctly.
    pub fn append(&self, scenario_file: &str, seconds: f64) -> Result<()> {
        let time = format!("{seconds:?}").replace('.', ",");
        let mut writer = self.writer.lock().unwrap();
        writer
            .write_record([scenario_file, time.as_str()])
            .with_context(|| format!("appending to {}", self.path.display()))?;
        writer.flush()?;
        Ok(())
    }
}
