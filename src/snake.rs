use std::collections::VecDeque;

use crate::geometry::{CellSize, Grid, MAX_GRID_SIDE};
use crate::rng::SessionRng;
use Direction::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }

    pub fn offset(&self, (dx, dy): (i32, i32)) -> Self {
        Point::new(self.x + dx, self.y + dy)
    }

    pub fn random(grid: Grid, rng: &mut SessionRng) -> Self {
        let columns = grid.columns.clamp(1, MAX_GRID_SIDE);
        let rows = grid.rows.clamp(1, MAX_GRID_SIDE);
        Point::new(rng.random_range(0..columns) as i32, rng.random_range(0..rows) as i32)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Left => (-1, 0),
            Right => (1, 0),
            Up => (0, -1),
            Down => (0, 1),
        }
    }
}

/// One cell of the body. `filled` and `size` only matter when drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodySegment {
    pub point: Point,
    pub filled: bool,
    pub size: CellSize,
}

impl BodySegment {
    pub fn new(point: Point) -> Self {
        BodySegment { point, filled: true, size: CellSize::default() }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Snake {
    body: VecDeque<BodySegment>,
    direction: Direction,
    path: Vec<Point>,
    dead: bool,
}

impl Snake {
    /// Single segment at `head`, heading right, with the spawn cell already on the path.
    pub fn new(head: Point) -> Self {
        Snake {
            body: VecDeque::from(vec![BodySegment::new(head)]),
            direction: Right,
            path: vec![head],
            dead: false,
        }
    }

    pub fn spawn(grid: Grid, rng: &mut SessionRng) -> Self {
        Snake::new(Point::random(grid, rng))
    }

    /// Builds a snake from explicit parts. `body` is head first and must not be empty.
    #[cfg(test)]
    pub(crate) fn from_parts(body: &[Point], direction: Direction, path: Vec<Point>) -> Self {
        assert!(!body.is_empty(), "snake body must not be empty");
        Snake {
            body: body.iter().copied().map(BodySegment::new).collect(),
            direction,
            path,
            dead: false,
        }
    }

    pub fn head(&self) -> &BodySegment {
        self.body.front().expect("Snake body should never be empty")
    }

    pub fn body(&self) -> impl Iterator<Item = &BodySegment> {
        self.body.iter()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn occupies(&self, point: Point) -> bool {
        self.body.iter().any(|segment| segment.point == point)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Overwrites the heading. Reversals are caught as self-collisions on the next step.
    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn path(&self) -> &[Point] {
        &self.path
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub(crate) fn kill(&mut self) {
        self.dead = true;
    }

    /// Takes the eaten cell as the new head and forgets the trail.
    pub(crate) fn grow_into(&mut self, segment: BodySegment) {
        self.body.push_front(segment);
        self.path.clear();
    }

    /// Shifts the body one cell forward, keeping its length.
    pub(crate) fn advance_to(&mut self, point: Point) {
        let head = BodySegment { point, ..*self.head() };
        self.body.push_front(head);
        self.body.pop_back();
        self.path.push(point);
    }

    pub(crate) fn set_cell_size(&mut self, size: CellSize) {
        for segment in self.body.iter_mut() {
            segment.size = size;
        }
    }
}
