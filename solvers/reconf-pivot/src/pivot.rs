//! Pivot-visit engine.
//!
//! Each agent in turn is routed to the pivot along a shortest path.
//! A single path edge `(u, v)` is realized by rotating the cycle made
//! of the shortest back path from `v` to `u` plus the closing edge
//! `u -> v`; every agent on the cycle shifts one cell, so the move
//! stays collision free.

use tracing::warn;

use crate::configuration::{Configuration, Trajectory};
use crate::grid::{Cell, Grid};

/// Route every agent through `pivot`, in configuration order.
///
/// Agents already on the pivot are skipped. An agent whose route or
/// back path cannot be found is left with whatever progress it made;
/// the remaining agents are still processed.
pub fn pivot_visit(
    grid: &Grid,
    config: &mut Configuration,
    pivot: Cell,
    trajectory: &mut Trajectory,
) {
    let ids: Vec<_> = config.ids().to_vec();
    for agent in ids {
        let start = config.position(agent);
        if start == pivot {
            continue;
        }

        let Some(path) = grid.shortest_path(start, pivot) else {
            warn!(agent, %start, "pivot unreachable, skipping agent");
            continue;
        };

        for step in path.steps.windows(2) {
            let (u, v) = (step[0], step[1]);
            let Some(back) = grid.cycle_back_path(v, u) else {
                // Only possible when the edge is a bridge, which the
                // safety check rules out for initial configurations.
                warn!(agent, %u, %v, "no cycle closes this edge, graph is not 2-edge-connected here");
                break;
            };
            config.rotate(&back.steps);
            trajectory.push(config);
        }
    }
}
