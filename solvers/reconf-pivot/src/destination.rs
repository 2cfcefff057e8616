//! Destination-extension engine.
//!
//! Greedily assigns unsettled agents to the nearest free destination
//! and walks each along a shortest path. Agents already sitting on the
//! path are displaced one cell forward along it, front first, and the
//! sweep continues from the front of the displaced block.

use std::collections::{BTreeSet, HashSet};

use tracing::warn;

use crate::configuration::{AgentId, Configuration, Trajectory};
use crate::grid::{manhattan, Cell, Grid};

/// Settle every agent onto a distinct destination cell.
///
/// Settledness is id membership: an agent counts as settled from the
/// moment its sweep finishes, even if a later displacement pushes it
/// off its destination. Selection scans unsettled agents in
/// configuration order and free destinations in sorted cell order, so
/// runs are reproducible.
pub fn extend_to_destinations(
    grid: &Grid,
    config: &mut Configuration,
    destinations: &BTreeSet<Cell>,
    trajectory: &mut Trajectory,
) {
    let mut settled: HashSet<AgentId> = config
        .ids()
        .iter()
        .copied()
        .filter(|id| destinations.contains(&config.position(*id)))
        .collect();
    let mut pending: Vec<AgentId> = config
        .ids()
        .iter()
        .copied()
        .filter(|id| !settled.contains(id))
        .collect();

    while !pending.is_empty() {
        let occupied: HashSet<Cell> = settled.iter().map(|id| config.position(*id)).collect();
        let free: Vec<Cell> = destinations
            .iter()
            .copied()
            .filter(|d| !occupied.contains(d))
            .collect();

        // Nearest (agent, destination) pair by Manhattan distance;
        // strict improvement keeps the first pair on ties.
        let mut best: Option<(AgentId, Cell, u32)> = None;
        for &agent in &pending {
            let pos = config.position(agent);
            for &dest in &free {
                let dist = manhattan(pos, dest);
                if best.map_or(true, |(_, _, d)| dist < d) {
                    best = Some((agent, dest, dist));
                }
            }
        }
        let Some((agent, dest, _)) = best else {
            warn!(
                unsettled = pending.len(),
                "no free destination left, leaving remaining agents unsettled"
            );
            break;
        };

        let Some(path) = grid.shortest_path(config.position(agent), dest) else {
            warn!(agent, %dest, "destination unreachable, leaving agent unsettled");
            pending.retain(|id| *id != agent);
            continue;
        };

        let last = path.steps.len() - 1;
        let mut t = 0;
        while t < last {
            t = advance(config, &path.steps, t, trajectory);
        }

        settled.insert(agent);
        pending.retain(|id| *id != agent);
    }
}

/// Advance the agent at `steps[t]` one cell along the path.
///
/// If the next cells hold a contiguous block of agents, the block is
/// shifted one cell forward first, front agent first, so every single
/// move lands on a vacant cell. Returns the path index of the agent
/// now at the front of the sweep (the displaced block's lead, or the
/// mover itself when nothing blocked it).
fn advance(
    config: &mut Configuration,
    steps: &[Cell],
    t: usize,
    trajectory: &mut Trajectory,
) -> usize {
    let mut end = t + 1;
    while end < steps.len() && config.occupant(steps[end]).is_some() {
        end += 1;
    }
    if end == steps.len() {
        // The block reaches the path's final cell; nothing can shift.
        // Unreachable for paths produced by the selection above, since
        // the target destination is vacant when the sweep starts.
        warn!(cell = %steps[t], "displacement blocked at the end of the path");
        return steps.len() - 1;
    }

    for i in (t + 1..end).rev() {
        if let Some(blocker) = config.occupant(steps[i]) {
            config.move_agent(blocker, steps[i + 1]);
            trajectory.push(config);
        }
    }

    let mover = config
        .occupant(steps[t])
        .expect("sweep position must hold an agent");
    config.move_agent(mover, steps[t + 1]);
    trajectory.push(config);

    end
}
