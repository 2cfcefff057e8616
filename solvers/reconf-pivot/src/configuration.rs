//! Agent configuration state.
//!
//! A [`Configuration`] keeps the agent-to-cell placement and the
//! inverse cell-to-agent occupancy index in lock step. Both engines
//! mutate it exclusively through [`Configuration::move_agent`] and
//! [`Configuration::rotate`], which uphold the invariant that no two
//! agents ever share a cell.

use std::collections::HashMap;

use thiserror::Error;

use crate::grid::Cell;

/// Identifier of a labeled agent.
pub type AgentId = u32;

/// Errors from building an initial configuration.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("duplicate agent id {0}")]
    DuplicateAgent(AgentId),

    #[error("agents {first} and {second} share cell {cell}")]
    SharedCell {
        first: AgentId,
        second: AgentId,
        cell: Cell,
    },
}

/// An injective placement of all agents onto distinct cells.
///
/// Agent iteration order is the construction order (the scenario file
/// order); engines and output rely on it.
#[derive(Debug, Clone)]
pub struct Configuration {
    ids: Vec<AgentId>,
    positions: HashMap<AgentId, Cell>,
    occupancy: HashMap<Cell, AgentId>,
}

impl Configuration {
    /// Build a configuration from `(id, cell)` pairs, rejecting
    /// duplicate ids and shared cells.
    pub fn new(agents: &[(AgentId, Cell)]) -> Result<Self, ConfigurationError> {
        let mut ids = Vec::with_capacity(agents.len());
        let mut positions = HashMap::with_capacity(agents.len());
        let mut occupancy = HashMap::with_capacity(agents.len());

        for &(id, cell) in agents {
            if positions.contains_key(&id) {
                return Err(ConfigurationError::DuplicateAgent(id));
            }
            if let Some(&other) = occupancy.get(&cell) {
                return Err(ConfigurationError::SharedCell {
                    first: other,
                    second: id,
                    cell,
                });
            }
            ids.push(id);
            positions.insert(id, cell);
            occupancy.insert(cell, id);
        }

        Ok(Self {
            ids,
            positions,
            occupancy,
        })
    }

    /// Agent ids in canonical order.
    pub fn ids(&self) -> &[AgentId] {
        &self.ids
    }

    /// Number of agents.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when the configuration holds no agents.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Current cell of an agent. Panics on an unknown id.
    pub fn position(&self, id: AgentId) -> Cell {
        self.positions[&id]
    }

    /// The agent occupying a cell, if any.
    pub fn occupant(&self, cell: Cell) -> Option<AgentId> {
        self.occupancy.get(&cell).copied()
    }

    /// Move one agent to a vacant cell, keeping both indexes in step.
    pub fn move_agent(&mut self, id: AgentId, to: Cell) {
        debug_assert!(
            !self.occupancy.contains_key(&to),
            "target cell {to} is occupied"
        );
        let from = self.positions[&id];
        self.occupancy.remove(&from);
        self.occupancy.insert(to, id);
        self.positions.insert(id, to);
        debug_assert_eq!(self.occupancy.len(), self.ids.len());
    }

    /// Rotate cell contents one step along a cycle: the occupant of
    /// `cycle[i]` moves to `cycle[(i + 1) % len]`, unoccupied cells
    /// stay unoccupied. The closing edge between the last and first
    /// cell is implicit.
    pub fn rotate(&mut self, cycle: &[Cell]) {
        assert!(cycle.len() >= 3, "degenerate rotation cycle of length {}", cycle.len());

        let occupants: Vec<Option<AgentId>> =
            cycle.iter().map(|c| self.occupant(*c)).collect();

        // Clear first, then reinsert; a one-pass update would collide
        // with the occupant of the next cell.
        for (cell, slot) in cycle.iter().zip(&occupants) {
            if slot.is_some() {
                self.occupancy.remove(cell);
            }
        }
        for (i, slot) in occupants.iter().enumerate() {
            if let Some(id) = *slot {
                let next = cycle[(i + 1) % cycle.len()];
                self.positions.insert(id, next);
                self.occupancy.insert(next, id);
            }
        }
        debug_assert_eq!(self.occupancy.len(), self.ids.len());
    }

    /// Positions in canonical agent order.
    pub fn snapshot(&self) -> Vec<Cell> {
        self.ids.iter().map(|id| self.positions[id]).collect()
    }
}

/// Ordered record of configurations, one frame per elementary move.
///
/// The runner persists only the three milestone configurations, so it
/// runs the engines with recording disabled; tests record every frame
/// to check the per-move invariants.
#[derive(Debug, Clone)]
pub struct Trajectory {
    frames: Vec<Vec<Cell>>,
    record: bool,
}

impl Trajectory {
    /// Full recording, seeded with the initial configuration.
    pub fn recording(config: &Configuration) -> Self {
        Self {
            frames: vec![config.snapshot()],
            record: true,
        }
    }

    /// Milestone-only mode: [`Trajectory::push`] is a no-op.
    pub fn milestones_only() -> Self {
        Self {
            frames: Vec::new(),
            record: false,
        }
    }

    /// Append the current configuration as a frame.
    pub fn push(&mut self, config: &Configuration) {
        if self.record {
            self.frames.push(config.snapshot());
        }
    }

    /// Recorded frames, positions in canonical agent order.
    pub fn frames(&self) -> &[Vec<Cell>] {
        &self.frames
    }
}
