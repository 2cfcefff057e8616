//! Scenario discovery and the worker pool.
//!
//! Workers share nothing but the job list and the per-folder time log;
//! each scenario gets its own grid, configuration and occupancy state.

use std::collections::{BTreeSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use tracing::{debug, info, warn};

use reconf_core::{GridMap, Scenario};
use reconf_pivot::{
    extend_to_destinations, is_safe, pivot_visit, Cell, Configuration, Grid, Trajectory,
};

use crate::report::{write_result, TimeLog};

/// One scenario file to process.
struct Task {
    scenario_path: PathBuf,
    /// File name only; the time-log key.
    scenario_file: String,
    result_path: PathBuf,
    time_log: Arc<TimeLog>,
}

/// Batch outcome counts.
#[derive(Debug, Default)]
pub struct Summary {
    /// Scenarios with a result file written (solved or unsafe).
    pub completed: usize,
    /// Subset of `completed` rejected by the safety check.
    pub unsafe_instances: usize,
    /// Scenarios skipped because of malformed input or I/O errors.
    pub failed: usize,
}

enum Outcome {
    Solved,
    Unsafe,
    Failed,
}

/// Process every pending scenario under `scenarios_root` on a worker
/// pool, mirroring the folder layout under `results_root`.
pub fn run(
    scenarios_root: &Path,
    results_root: &Path,
    threads: Option<usize>,
    stop: Arc<AtomicBool>,
) -> Result<Summary> {
    let tasks = discover(scenarios_root, results_root)?;
    if tasks.is_empty() {
        info!("all scenarios are already completed");
        return Ok(Summary::default());
    }

    let total = tasks.len();
    let num_threads = threads.unwrap_or_else(num_cpus::get).clamp(1, total);
    info!(scenarios = total, workers = num_threads, "starting batch");

    let jobs = Arc::new(Mutex::new(VecDeque::from(tasks)));
    let (sender, receiver) = channel::<Outcome>();

    let workers: Vec<_> = (0..num_threads)
        .map(|_| {
            let jobs = jobs.clone();
            let tx = sender.clone();
            let stop = stop.clone();
            thread::spawn(move || worker(jobs, tx, stop))
        })
        .collect();
    // The receiver loop below ends once every worker has dropped its
    // sender clone.
    drop(sender);

    let bar = ProgressBar::new(total as u64);
    let mut summary = Summary::default();
    for outcome in receiver {
        bar.inc(1);
        match outcome {
            Outcome::Solved => summary.completed += 1,
            Outcome::Unsafe => {
                summary.completed += 1;
                summary.unsafe_instances += 1;
            }
            Outcome::Failed => summary.failed += 1,
        }
    }
    bar.finish_and_clear();

    for handle in workers {
        let _ = handle.join();
    }

    Ok(summary)
}

fn worker(jobs: Arc<Mutex<VecDeque<Task>>>, tx: Sender<Outcome>, stop: Arc<AtomicBool>) {
    loop {
        if stop.load(Ordering::SeqCst) {
            break;
        }
        let task = { jobs.lock().unwrap().pop_front() };
        let Some(task) = task else { break };
        debug!(scenario = %task.scenario_path.display(), "processing");
        let outcome = process(&task);
        if tx.send(outcome).is_err() {
            break;
        }
    }
}

/// Collect pending scenario files, skipping those already present in a
/// folder's time log with an existing result file.
fn discover(scenarios_root: &Path, results_root: &Path) -> Result<Vec<Task>> {
    if !scenarios_root.is_dir() {
        anyhow::bail!("scenario root {} does not exist", scenarios_root.display());
    }

    let mut folders: Vec<PathBuf> = fs::read_dir(scenarios_root)
        .with_context(|| format!("reading {}", scenarios_root.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    folders.sort();

    let mut tasks = Vec::new();
    for folder in folders {
        let Some(folder_name) = folder.file_name().map(|n| n.to_string_lossy().into_owned())
        else {
            continue;
        };
        let res_folder = results_root.join(&folder_name);
        fs::create_dir_all(&res_folder)
            .with_context(|| format!("creating {}", res_folder.display()))?;

        let time_log = Arc::new(TimeLog::open(res_folder.join("execution_times.csv"))?);

        let mut files: Vec<PathBuf> = fs::read_dir(&folder)
            .with_context(|| format!("reading {}", folder.display()))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension().is_some_and(|ext| ext == "txt")
                    && path
                        .file_name()
                        .is_some_and(|name| !name.to_string_lossy().starts_with("res_"))
            })
            .collect();
        files.sort();

        for file in files {
            let Some(name) = file.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };
            let result_path = res_folder.join(format!("res_{name}"));
            if time_log.completed().contains(&name) && result_path.exists() {
                continue;
            }
            tasks.push(Task {
                scenario_path: file,
                scenario_file: name,
                result_path,
                time_log: time_log.clone(),
            });
        }
    }

    Ok(tasks)
}

fn process(task: &Task) -> Outcome {
    match solve(task) {
        Ok(true) => Outcome::Solved,
        Ok(false) => {
            info!(scenario = %task.scenario_path.display(), "not safe to pivot");
            Outcome::Unsafe
        }
        Err(e) => {
            warn!(scenario = %task.scenario_path.display(), "skipping scenario: {e:#}");
            Outcome::Failed
        }
    }
}

/// Run one scenario end to end. Returns the safety verdict.
fn solve(task: &Task) -> Result<bool> {
    let text = fs::read_to_string(&task.scenario_path).context("reading scenario")?;
    let scenario = Scenario::parse(&text).context("parsing scenario")?;

    // Map paths are relative to the parent of the scenario's folder.
    let folder = task
        .scenario_path
        .parent()
        .context("scenario file has no parent folder")?;
    let map_path = folder.parent().unwrap_or(folder).join(scenario.map_path());
    let map_text = fs::read_to_string(&map_path)
        .with_context(|| format!("reading map {}", map_path.display()))?;
    let map = GridMap::parse(&map_text).context("parsing map")?;

    let grid = Grid::from_map(&map);
    let pivot = map.pivot().map(|(x, y)| Cell::new(x, y));
    let agents: Vec<(u32, Cell)> = scenario
        .agents()
        .iter()
        .map(|&(id, (x, y))| (id, Cell::new(x, y)))
        .collect();
    let mut config = Configuration::new(&agents).context("invalid initial configuration")?;
    let destinations: BTreeSet<Cell> = scenario
        .destinations()
        .iter()
        .map(|&(x, y)| Cell::new(x, y))
        .collect();

    let safe = is_safe(&grid, pivot, &config);

    let mut elapsed = 0.0;
    let mut milestones = None;
    if let (true, Some(p)) = (safe, pivot) {
        let started = Instant::now();
        let initial = config.snapshot();

        // Only the three milestone configurations are persisted.
        let mut trajectory = Trajectory::milestones_only();
        pivot_visit(&grid, &mut config, p, &mut trajectory);
        let visited = config.snapshot();

        extend_to_destinations(&grid, &mut config, &destinations, &mut trajectory);
        let settled = config.snapshot();

        elapsed = started.elapsed().as_secs_f64();
        milestones = Some([initial, visited, settled]);
    }

    write_result(&task.result_path, safe, milestones.as_ref())?;
    task.time_log.append(&task.scenario_file, elapsed)?;

    Ok(safe)
}
