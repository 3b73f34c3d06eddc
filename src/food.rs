use crate::geometry::{CellSize, Grid};
use crate::rng::SessionRng;
use crate::snake::{BodySegment, Point};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FoodItem {
    pub cell: BodySegment,
    pub eaten: bool,
}

impl FoodItem {
    pub fn new(point: Point) -> Self {
        FoodItem { cell: BodySegment::new(point), eaten: false }
    }

    pub fn point(&self) -> Point {
        self.cell.point
    }
}

/// Appends `count` items at independent random cells. Overlap with the snake
/// or other food is allowed.
pub fn create_food(mut existing: Vec<FoodItem>, count: usize, grid: Grid, rng: &mut SessionRng) -> Vec<FoodItem> {
    existing.extend((0..count).map(|_| FoodItem::new(Point::random(grid, rng))));
    existing
}

pub(crate) fn set_cell_size(food: &mut [FoodItem], size: CellSize) {
    for item in food.iter_mut() {
        item.cell.size = size;
    }
}
