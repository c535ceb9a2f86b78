//! Tile map generation and collision queries
//!
//! The map is generated once per session and immutable afterwards. Collision
//! is circle-vs-AABB against the 3x3 tile neighbourhood of the query point,
//! not tile-center distance, so a radius that grazes a tile corner is caught.

use glam::DVec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::MapConfig;

/// Terrain tile variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    Grass,
    Wall,
    Water,
    Road,
}

impl TileKind {
    /// Whether actors and projectiles can occupy this tile
    pub fn passable(self) -> bool {
        matches!(self, TileKind::Grass | TileKind::Road)
    }
}

/// Static square grid of tiles, immutable after generation
#[derive(Debug, Clone)]
pub struct TileMap {
    grid: Vec<TileKind>,
    grid_size: usize,
    tile_size: f64,
}

impl TileMap {
    /// Generate a map: smooth sinusoid terrain thresholded into water/road,
    /// a solid wall border ring, then sparse seeded interior walls.
    pub fn generate(cfg: &MapConfig, seed: u64) -> Self {
        let grid_size = (cfg.size / cfg.tile_size) as usize;
        let mut grid = vec![TileKind::Grass; grid_size * grid_size];

        for y in 0..grid_size {
            for x in 0..grid_size {
                let (xf, yf) = (x as f64, y as f64);
                let value = (xf / 10.0).sin()
                    + (yf / 8.0).sin()
                    + 1.5 * (xf / 15.0).sin() * (yf / 12.0).cos();
                let norm = (value + 3.0) / 6.0;
                grid[y * grid_size + x] = if norm < 0.3 {
                    TileKind::Water
                } else if norm > 0.7 {
                    TileKind::Road
                } else {
                    TileKind::Grass
                };
            }
        }

        let mut rng = Pcg32::seed_from_u64(seed);
        let border = cfg.border_width;
        for y in 0..grid_size {
            for x in 0..grid_size {
                let on_border = x < border
                    || y < border
                    || x >= grid_size - border
                    || y >= grid_size - border;
                let idx = y * grid_size + x;
                if on_border {
                    grid[idx] = TileKind::Wall;
                } else if grid[idx] == TileKind::Grass
                    && rng.random::<f64>() < cfg.wall_probability
                {
                    grid[idx] = TileKind::Wall;
                }
            }
        }

        log::info!("Generated {0}x{0} tile map (seed {1})", grid_size, seed);

        Self {
            grid,
            grid_size,
            tile_size: cfg.tile_size,
        }
    }

    /// Grid edge length in tiles
    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Tile edge length in world units
    pub fn tile_size(&self) -> f64 {
        self.tile_size
    }

    /// World edge length
    pub fn world_size(&self) -> f64 {
        self.grid_size as f64 * self.tile_size
    }

    /// Tile at grid coordinates, None out of bounds
    pub fn tile(&self, tx: usize, ty: usize) -> Option<TileKind> {
        if tx < self.grid_size && ty < self.grid_size {
            Some(self.grid[ty * self.grid_size + tx])
        } else {
            None
        }
    }

    /// Whether the world point lies on a passable tile (false out of bounds)
    pub fn is_passable(&self, x: f64, y: f64) -> bool {
        if x < 0.0 || y < 0.0 {
            return false;
        }
        let tx = (x / self.tile_size) as usize;
        let ty = (y / self.tile_size) as usize;
        self.tile(tx, ty).is_some_and(TileKind::passable)
    }

    /// Circle-vs-tile collision: true if any impassable tile in the 3x3
    /// neighbourhood of the point comes within `radius` of it.
    pub fn check_collision(&self, x: f64, y: f64, radius: f64) -> bool {
        let tx = (x / self.tile_size).floor() as i64;
        let ty = (y / self.tile_size).floor() as i64;

        for j in (ty - 1)..=(ty + 1) {
            for i in (tx - 1)..=(tx + 1) {
                if i < 0 || j < 0 || i as usize >= self.grid_size || j as usize >= self.grid_size
                {
                    continue;
                }
                let tile = self.grid[j as usize * self.grid_size + i as usize];
                if tile.passable() {
                    continue;
                }
                let rect_min = DVec2::new(i as f64, j as f64) * self.tile_size;
                let rect_max = rect_min + DVec2::splat(self.tile_size);
                let closest = DVec2::new(x, y).clamp(rect_min, rect_max);
                if closest.distance(DVec2::new(x, y)) < radius {
                    return true;
                }
            }
        }
        false
    }

    /// Whether the world point lies inside the map bounds
    pub fn in_bounds(&self, x: f64, y: f64) -> bool {
        x >= 0.0 && y >= 0.0 && x <= self.world_size() && y <= self.world_size()
    }
}
