//! Tests for bridge detection and the safety predicate.

use pretty_assertions::assert_eq;
use reconf_pivot::{bridges, is_safe, Cell, Configuration, Grid};

fn cell(x: u32, y: u32) -> Cell {
    Cell::new(x, y)
}

fn config(agents: &[(u32, Cell)]) -> Configuration {
    Configuration::new(agents).expect("invalid test configuration")
}

/// 3x3 open grid; 2-edge-connected everywhere.
fn open_3x3() -> Grid {
    Grid::from_raw(&[1; 9], 3, 3)
}

/// 5x1 horizontal corridor; every edge is a bridge.
fn corridor_5x1() -> Grid {
    Grid::from_raw(&[1; 5], 5, 1)
}

/// Two open 3x3 rooms joined by a one-cell-wide neck at y = 1:
/// ```
/// ...@...
/// .......
/// ...@...
/// ```
fn dumbbell_7x3() -> Grid {
    #[rustfmt::skip]
    let data = [
        1, 1, 1, 0, 1, 1, 1,
        1, 1, 1, 1, 1, 1, 1,
        1, 1, 1, 0, 1, 1, 1,
    ];
    Grid::from_raw(&data, 7, 3)
}

// ─────────────────────────────────────────────────────────────────────────────
// bridges
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn open_grid_has_no_bridges() {
    let grid = open_3x3();
    assert!(bridges(&grid, cell(1, 1)).is_empty());
}

#[test]
fn corridor_is_all_bridges() {
    let grid = corridor_5x1();
    let found = bridges(&grid, cell(2, 0));
    assert_eq!(found.len(), 4);
    assert!(found.contains(&(cell(0, 0), cell(1, 0))));
    assert!(found.contains(&(cell(3, 0), cell(4, 0))));
}

#[test]
fn dumbbell_neck_edges_are_bridges() {
    let grid = dumbbell_7x3();
    let found = bridges(&grid, cell(1, 1));
    assert_eq!(found.len(), 2);
    assert!(found.contains(&(cell(2, 1), cell(3, 1))));
    assert!(found.contains(&(cell(3, 1), cell(4, 1))));
}

// ─────────────────────────────────────────────────────────────────────────────
// is_safe
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn safe_on_open_grid() {
    let grid = open_3x3();
    let config = config(&[(0, cell(0, 0)), (1, cell(2, 2))]);
    assert!(is_safe(&grid, Some(cell(1, 1)), &config));
}

#[test]
fn unsafe_on_corridor() {
    // Every edge is a bridge, so no agent can rotate toward the pivot.
    let grid = corridor_5x1();
    let config = config(&[(0, cell(0, 0))]);
    assert!(!is_safe(&grid, Some(cell(2, 0)), &config));
}

#[test]
fn unsafe_without_pivot() {
    let grid = open_3x3();
    let config = config(&[(0, cell(0, 0))]);
    assert!(!is_safe(&grid, None, &config));
}

#[test]
fn unsafe_pivot_on_obstacle() {
    let grid = Grid::from_raw(&[1, 1, 1, 1, 0, 1, 1, 1, 1], 3, 3);
    let config = config(&[(0, cell(0, 0))]);
    assert!(!is_safe(&grid, Some(cell(1, 1)), &config));
}

#[test]
fn unsafe_pivot_out_of_bounds() {
    let grid = open_3x3();
    let config = config(&[(0, cell(0, 0))]);
    assert!(!is_safe(&grid, Some(cell(9, 9)), &config));
}

#[test]
fn agent_across_bridge_is_unsafe() {
    let grid = dumbbell_7x3();
    // Pivot in the left room, one agent in the right room.
    let config = config(&[(0, cell(0, 0)), (1, cell(5, 1))]);
    assert!(!is_safe(&grid, Some(cell(1, 1)), &config));
}

#[test]
fn agents_in_pivot_room_are_safe() {
    let grid = dumbbell_7x3();
    let config = config(&[(0, cell(0, 0)), (1, cell(2, 2))]);
    assert!(is_safe(&grid, Some(cell(1, 1)), &config));
}

#[test]
fn agent_on_the_neck_is_unsafe() {
    // The neck cell itself is separated from the pivot by a bridge.
    let grid = dumbbell_7x3();
    let config = config(&[(0, cell(3, 1))]);
    assert!(!is_safe(&grid, Some(cell(1, 1)), &config));
}

#[test]
fn is_safe_is_deterministic() {
    let grid = dumbbell_7x3();
    let config = config(&[(0, cell(5, 1))]);
    let first = is_safe(&grid, Some(cell(1, 1)), &config);
    let second = is_safe(&grid, Some(cell(1, 1)), &config);
    assert_eq!(first, second);
}
