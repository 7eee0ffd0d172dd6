//! Breadth-first shortest paths over the tile grid.
use std::collections::VecDeque;

use crate::game::maze::{Cell, Grid};

const DIRS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Shortest 4-connected path from `start` to `goal`.
///
/// The returned cells run from `start` to `goal`, both included. Empty when
/// either end is a wall or out of bounds, or when the goal is unreachable.
pub fn find_path(grid: &Grid, start: Cell, goal: Cell) -> Vec<Cell> {
    if grid.is_wall(start) || grid.is_wall(goal) {
        return Vec::new();
    }
    let w = grid.width();
    let idx = |(i, j): Cell| j as usize * w + i as usize;

    let mut prev: Vec<Option<Cell>> = vec![None; w * grid.height()];
    let mut q = VecDeque::new();
    prev[idx(start)] = Some(start);
    q.push_back(start);

    while let Some(cur) = q.pop_front() {
        if cur == goal {
            break;
        }
        for (dx, dy) in DIRS {
            let next = (cur.0 + dx, cur.1 + dy);
            if grid.is_wall(next) || prev[idx(next)].is_some() {
                continue;
            }
            prev[idx(next)] = Some(cur);
            q.push_back(next);
        }
    }

    if prev[idx(goal)].is_none() {
        return Vec::new();
    }
    let mut path = vec![goal];
    let mut cur = goal;
    while cur != start {
        match prev[idx(cur)] {
            Some(p) => {
                path.push(p);
                cur = p;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_corridor_has_exact_length() {
        let g = Grid::parse("11111111\n1......1\n11111111").unwrap();
        let path = find_path(&g, (1, 1), (6, 1));
        assert_eq!(path.len(), 6);
        assert_eq!(path.first(), Some(&(1, 1)));
        assert_eq!(path.last(), Some(&(6, 1)));
    }

    #[test]
    fn enclosed_goal_is_unreachable() {
        let g = Grid::parse("1111111\n1...111\n1...1.1\n1...111\n1111111").unwrap();
        assert!(find_path(&g, (1, 1), (5, 2)).is_empty());
    }

    #[test]
    fn wall_goal_is_empty_and_same_cell_is_trivial() {
        let g = Grid::parse("111\n1.1\n111").unwrap();
        assert!(find_path(&g, (1, 1), (0, 0)).is_empty());
        assert!(find_path(&g, (1, 1), (-3, 9)).is_empty());
        assert_eq!(find_path(&g, (1, 1), (1, 1)), vec![(1, 1)]);
    }

    #[test]
    fn routes_around_walls_with_unit_steps() {
        let g = Grid::parse("11111\n1...1\n1.1.1\n1...1\n11111").unwrap();
        let path = find_path(&g, (1, 1), (3, 3));
        assert_eq!(path.len(), 5);
        let mut cur = (1, 1);
        for &c in &path[1..] {
            assert_eq!((c.0 - cur.0).abs() + (c.1 - cur.1).abs(), 1);
            assert!(!g.is_wall(c));
            cur = c;
        }
    }
}
