//! Tests for the free-space grid and its BFS primitives.

use pretty_assertions::assert_eq;
use reconf_pivot::{manhattan, Cell, Grid};

// ─────────────────────────────────────────────────────────────────────────────
// Map fixtures
// ─────────────────────────────────────────────────────────────────────────────

/// 3x3 open grid:
/// ```
/// ...
/// ...
/// ...
/// ```
fn open_3x3() -> Grid {
    Grid::from_raw(&[1; 9], 3, 3)
}

/// 3x3 grid with center blocked:
/// ```
/// ...
/// .#.
/// ...
/// ```
fn blocked_center_3x3() -> Grid {
    Grid::from_raw(&[1, 1, 1, 1, 0, 1, 1, 1, 1], 3, 3)
}

/// 5x1 horizontal corridor; every edge is a bridge.
fn corridor_5x1() -> Grid {
    Grid::from_raw(&[1; 5], 5, 1)
}

fn cell(x: u32, y: u32) -> Cell {
    Cell::new(x, y)
}

// ─────────────────────────────────────────────────────────────────────────────
// shortest_path
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn bfs_straight_line() {
    let grid = open_3x3();
    let path = grid.shortest_path(cell(0, 0), cell(2, 0)).expect("no path");
    assert_eq!(path.steps.len(), 3);
    assert_eq!(path.steps[0], cell(0, 0));
    assert_eq!(path.steps[2], cell(2, 0));
    assert!(path.is_valid_cardinal());
}

#[test]
fn bfs_deterministic_expansion_order() {
    // With the fixed (+y, -y, +x, -x) order, the corner-to-corner path
    // goes all the way down before turning right.
    let grid = open_3x3();
    let path = grid.shortest_path(cell(0, 0), cell(2, 2)).expect("no path");
    assert_eq!(
        path.steps,
        vec![cell(0, 0), cell(0, 1), cell(0, 2), cell(1, 2), cell(2, 2)]
    );
}

#[test]
fn bfs_repeated_calls_identical() {
    let grid = blocked_center_3x3();
    let a = grid.shortest_path(cell(0, 1), cell(2, 1));
    let b = grid.shortest_path(cell(0, 1), cell(2, 1));
    assert_eq!(a, b);
}

#[test]
fn bfs_around_obstacle() {
    let grid = blocked_center_3x3();
    let path = grid.shortest_path(cell(0, 1), cell(2, 1)).expect("no path");
    assert!(!path.steps.contains(&cell(1, 1)));
    assert_eq!(*path.steps.first().unwrap(), cell(0, 1));
    assert_eq!(*path.steps.last().unwrap(), cell(2, 1));
    assert_eq!(path.cost(), 4);
}

#[test]
fn bfs_same_start_goal() {
    let grid = open_3x3();
    let path = grid.shortest_path(cell(1, 1), cell(1, 1)).expect("no path");
    assert_eq!(path.steps, vec![cell(1, 1)]);
    assert_eq!(path.cost(), 0);
}

#[test]
fn bfs_symmetric_lengths() {
    let grid = blocked_center_3x3();
    let forward = grid.shortest_path(cell(0, 0), cell(2, 2)).expect("no path");
    let backward = grid.shortest_path(cell(2, 2), cell(0, 0)).expect("no path");
    assert_eq!(forward.cost(), backward.cost());
}

#[test]
fn bfs_unreachable_goal() {
    // Wall the middle column off completely.
    #[rustfmt::skip]
    let grid = Grid::from_raw(&[
        1, 0, 1,
        1, 0, 1,
        1, 0, 1,
    ], 3, 3);
    assert!(grid.shortest_path(cell(0, 0), cell(2, 0)).is_none());
}

#[test]
fn bfs_blocked_endpoints() {
    let grid = blocked_center_3x3();
    assert!(grid.shortest_path(cell(1, 1), cell(0, 0)).is_none());
    assert!(grid.shortest_path(cell(0, 0), cell(1, 1)).is_none());
    assert!(grid.shortest_path(cell(10, 10), cell(0, 0)).is_none());
}

// ─────────────────────────────────────────────────────────────────────────────
// cycle_back_path
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn cycle_back_path_avoids_direct_edge() {
    let grid = open_3x3();
    let path = grid
        .cycle_back_path(cell(0, 1), cell(0, 0))
        .expect("no back path");
    assert_eq!(*path.steps.first().unwrap(), cell(0, 1));
    assert_eq!(*path.steps.last().unwrap(), cell(0, 0));
    assert!(path.steps.len() >= 3, "cycle would be degenerate");
    // First step must not take the forbidden edge.
    assert_ne!(path.steps[1], cell(0, 0));
    assert!(path.is_valid_cardinal());
}

#[test]
fn cycle_back_path_none_across_bridge() {
    let grid = corridor_5x1();
    assert!(grid.cycle_back_path(cell(1, 0), cell(0, 0)).is_none());
    assert!(grid.cycle_back_path(cell(2, 0), cell(1, 0)).is_none());
}

#[test]
fn cycle_back_path_degenerate_endpoints() {
    let grid = open_3x3();
    assert!(grid.cycle_back_path(cell(1, 1), cell(1, 1)).is_none());
}

// ─────────────────────────────────────────────────────────────────────────────
// Cell and distances
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn manhattan_distance() {
    assert_eq!(manhattan(cell(0, 0), cell(2, 2)), 4);
    assert_eq!(manhattan(cell(3, 1), cell(1, 2)), 3);
    assert_eq!(manhattan(cell(1, 1), cell(1, 1)), 0);
}

#[test]
fn cell_display_matches_result_format() {
    assert_eq!(cell(3, 7).to_string(), "(3, 7)");
}

#[test]
fn neighbor_order_is_fixed() {
    let grid = open_3x3();
    assert_eq!(
        grid.neighbors(cell(1, 1)),
        vec![cell(1, 2), cell(1, 0), cell(2, 1), cell(0, 1)]
    );
}
