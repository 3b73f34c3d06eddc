use serde::{Deserialize, Serialize};

use crate::snake::Point;

// Drawable area, in the frontend's own units (terminal cells here)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Viewport { width, height }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CellSize {
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Largest board side. Cell coordinates are `i32`, so sides must stay well inside its range.
pub const MAX_GRID_SIDE: u32 = 10_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub columns: u32,
    pub rows: u32,
}

impl Grid {
    pub fn new(columns: u32, rows: u32) -> Self {
        Grid { columns: columns.min(MAX_GRID_SIDE), rows: rows.min(MAX_GRID_SIDE) }
    }

    /// Derives a grid once from the initial viewport. Never smaller than 1x1.
    pub fn from_viewport(viewport: Viewport, cell_width: u32, cell_height: u32) -> Self {
        let columns = (viewport.width / cell_width.max(1) as f32).floor() as u32;
        let rows = (viewport.height / cell_height.max(1) as f32).floor() as u32;
        Grid::new(columns.max(1), rows.max(1))
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= 0 && point.y >= 0 && (point.x as u32) < self.columns && (point.y as u32) < self.rows
    }

    pub fn cell_size(&self, viewport: Viewport) -> CellSize {
        if self.columns == 0 || self.rows == 0 {
            return CellSize::default();
        }

        CellSize {
            width: viewport.width / self.columns as f32,
            height: viewport.height / self.rows as f32,
        }
    }

    pub fn cell_rect(&self, point: Point, size: CellSize) -> CellRect {
        CellRect {
            x: point.x as f32 * size.width,
            y: point.y as f32 * size.height,
            width: size.width,
            height: size.height,
        }
    }

    pub fn full_rect(&self, viewport: Viewport) -> CellRect {
        CellRect { x: 0.0, y: 0.0, width: viewport.width, height: viewport.height }
    }
}
