//! DDA ray casting against the tile grid.
use glam::Vec2;

use crate::game::maze::{Grid, TextureId, Tile};
use crate::settings::MAX_STEPS;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HitSide {
    /// Crossed an x grid line (wall face runs north-south).
    Vertical,
    /// Crossed a y grid line (wall face runs east-west).
    Horizontal,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayHit {
    /// Perpendicular distance to the view plane, fish-eye corrected.
    pub distance: f32,
    /// Euclidean distance along the ray.
    pub raw_distance: f32,
    pub side: HitSide,
    /// `None` when the ray ran out of range or left the grid.
    pub texture: Option<TextureId>,
    /// Position along the wall face, `[0, 1)`.
    pub texture_u: f32,
    pub angle: f32,
}

impl RayHit {
    fn miss(angle: f32, max_depth: f32) -> Self {
        Self {
            distance: max_depth,
            raw_distance: max_depth,
            side: HitSide::Vertical,
            texture: None,
            texture_u: 0.0,
            angle,
        }
    }

    #[inline]
    pub fn is_hit(&self) -> bool {
        self.texture.is_some()
    }
}

/// Marches one ray from `origin` until it enters a wall cell.
///
/// Leaving the grid, passing `max_depth` or running `MAX_STEPS` iterations
/// returns a miss at `max_depth`. The returned `distance` is not corrected.
pub fn march(grid: &Grid, origin: Vec2, angle: f32, max_depth: f32) -> RayHit {
    let mut cell = Grid::cell_of(origin);
    match grid.tile(cell) {
        None => return RayHit::miss(angle, max_depth),
        Some(Tile::Wall(id)) => {
            return RayHit {
                distance: 0.0,
                raw_distance: 0.0,
                side: HitSide::Vertical,
                texture: Some(id),
                texture_u: 0.0,
                angle,
            };
        }
        Some(Tile::Empty) => {}
    }

    let dir = Vec2::from_angle(angle);
    let (step_x, delta_x, mut side_x) = axis_setup(origin.x, dir.x, cell.0);
    let (step_y, delta_y, mut side_y) = axis_setup(origin.y, dir.y, cell.1);

    for _ in 0..MAX_STEPS {
        let (dist, side) = if side_x < side_y {
            let d = side_x;
            side_x += delta_x;
            cell.0 += step_x;
            (d, HitSide::Vertical)
        } else {
            let d = side_y;
            side_y += delta_y;
            cell.1 += step_y;
            (d, HitSide::Horizontal)
        };

        if dist > max_depth {
            break;
        }
        match grid.tile(cell) {
            None => break,
            Some(Tile::Empty) => continue,
            Some(Tile::Wall(id)) => {
                let hit = origin + dir * dist;
                let texture_u = match side {
                    HitSide::Vertical => {
                        let u = hit.y.rem_euclid(1.0);
                        if dir.x > 0.0 { u } else { (1.0 - u).fract() }
                    }
                    HitSide::Horizontal => {
                        let u = hit.x.rem_euclid(1.0);
                        if dir.y > 0.0 { (1.0 - u).fract() } else { u }
                    }
                };
                return RayHit {
                    distance: dist,
                    raw_distance: dist,
                    side,
                    texture: Some(id),
                    texture_u: texture_u.clamp(0.0, 0.9999),
                    angle,
                };
            }
        }
    }
    RayHit::miss(angle, max_depth)
}

/// Step direction, distance between crossings and distance to the first crossing.
#[inline]
fn axis_setup(origin: f32, dir: f32, cell: i32) -> (i32, f32, f32) {
    if dir.abs() < 1e-9 {
        return (0, f32::INFINITY, f32::INFINITY);
    }
    let delta = (1.0 / dir).abs();
    if dir < 0.0 {
        (-1, delta, (origin - cell as f32) * delta)
    } else {
        (1, delta, (cell as f32 + 1.0 - origin) * delta)
    }
}

/// Angle offset of screen column `col` from the view centre.
#[inline]
pub fn column_offset(col: usize, width: usize, fov: f32) -> f32 {
    let half_w = width as f32 * 0.5;
    let screen_dist = half_w / (fov * 0.5).tan();
    ((col as f32 - half_w) / screen_dist).atan()
}

/// One ray per screen column, distances corrected by the cosine of the
/// column's offset from the view direction.
pub fn cast_view(grid: &Grid, pos: Vec2, angle: f32, fov: f32, width: usize, max_depth: f32) -> Vec<RayHit> {
    (0..width)
        .map(|col| {
            let offset = column_offset(col, width, fov);
            let mut hit = march(grid, pos, angle + offset, max_depth);
            if hit.is_hit() {
                hit.distance = hit.raw_distance * offset.cos();
            }
            hit
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const FOV: f32 = std::f32::consts::FRAC_PI_3;

    fn hall() -> Grid {
        let mut rows = vec!["1111111111".to_string()];
        for _ in 0..10 {
            rows.push("1........2".to_string());
        }
        rows.push("1111111111".to_string());
        Grid::parse(&rows.join("\n")).unwrap()
    }

    #[test]
    fn centre_column_measures_straight_distance() {
        let g = hall();
        let pos = Vec2::new(2.5, 5.5);
        let hits = cast_view(&g, pos, 0.0, FOV, 640, 20.0);
        let centre = hits[320];
        assert_eq!(centre.texture, Some(2));
        assert_eq!(centre.side, HitSide::Vertical);
        assert_abs_diff_eq!(centre.distance, 9.0 - 2.5, epsilon = 1e-4);
        assert_abs_diff_eq!(centre.texture_u, 0.5, epsilon = 1e-4);
    }

    #[test]
    fn edge_column_is_cosine_corrected() {
        let g = hall();
        let pos = Vec2::new(2.5, 5.5);
        let hits = cast_view(&g, pos, 0.0, FOV, 640, 20.0);
        let edge = hits[0];
        let half = FOV * 0.5;
        assert_abs_diff_eq!(column_offset(0, 640, FOV), -half, epsilon = 1e-5);
        assert_eq!(edge.texture, Some(2));
        assert_abs_diff_eq!(edge.raw_distance, 6.5 / half.cos(), epsilon = 1e-3);
        assert_abs_diff_eq!(edge.distance, edge.raw_distance * half.cos(), epsilon = 1e-4);
        // a flat wall reads the same corrected depth in every column
        assert_abs_diff_eq!(edge.distance, 6.5, epsilon = 1e-3);
    }

    #[test]
    fn facing_along_axes_hits_expected_walls() {
        let g = hall();
        let pos = Vec2::new(4.5, 5.5);
        let up = march(&g, pos, -std::f32::consts::FRAC_PI_2, 20.0);
        assert_eq!(up.side, HitSide::Horizontal);
        assert_abs_diff_eq!(up.raw_distance, 4.5, epsilon = 1e-4);
        let left = march(&g, pos, std::f32::consts::PI, 20.0);
        assert_eq!(left.texture, Some(1));
        assert_abs_diff_eq!(left.raw_distance, 3.5, epsilon = 1e-4);
    }

    #[test]
    fn open_map_caps_at_max_depth() {
        let g = Grid::parse("....\n....\n....").unwrap();
        let hit = march(&g, Vec2::new(1.5, 1.5), 0.3, 20.0);
        assert!(!hit.is_hit());
        assert_eq!(hit.distance, 20.0);

        let short = march(&hall(), Vec2::new(2.5, 5.5), 0.0, 3.0);
        assert!(!short.is_hit());
    }

    #[test]
    fn distances_never_negative_and_u_in_range() {
        let g = Grid::default_map();
        for k in 0..64 {
            let a = k as f32 * std::f32::consts::TAU / 64.0;
            let hits = cast_view(&g, Vec2::new(1.5, 5.0), a, FOV, 32, 20.0);
            for h in hits {
                assert!(h.distance >= 0.0);
                assert!((0.0..1.0).contains(&h.texture_u));
            }
        }
    }
}
