//! Two-stage reconfiguration engines for labeled agents on 4-connected
//! grids.
//!
//! ## Pipeline
//! - Safety check: every agent must lie in the same bridgeless
//!   component as the pivot cell
//! - Pivot-visit: cycle rotations bring each agent through the pivot
//! - Destination-extension: greedy assignment to destination cells,
//!   displacing settled agents that block the way
//!
//! All moves are sequential; no two agents ever share a cell.

mod configuration;
mod destination;
mod grid;
mod pivot;
mod safety;

pub use configuration::{AgentId, Configuration, ConfigurationError, Trajectory};
pub use destination::extend_to_destinations;
pub use grid::{manhattan, Cell, Grid, Path};
pub use pivot::pivot_visit;
pub use safety::{bridges, is_safe};
