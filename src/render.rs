use crate::geometry::{CellRect, Viewport};
use crate::session::GameSession;

// Frontends map these to concrete colors
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Paint {
    Background,
    Body,
    Food,
    GameOver,
}

pub trait RenderSink {
    fn fill(&mut self, rect: CellRect, paint: Paint);
}

pub trait StatusSink {
    fn set_score(&mut self, score: u32);
    fn set_lives(&mut self, lives: u32);
    fn set_difficulty(&mut self, difficulty: u32);
}

/// Background first, then the body, then the food.
pub fn draw_frame<R: RenderSink>(session: &GameSession, viewport: Viewport, sink: &mut R) {
    let grid = session.grid();
    let size = grid.cell_size(viewport);

    sink.fill(grid.full_rect(viewport), Paint::Background);

    for segment in session.snake().body() {
        let paint = if segment.filled { Paint::Body } else { Paint::Background };
        sink.fill(grid.cell_rect(segment.point, size), paint);
    }

    for item in session.food() {
        let paint = if item.eaten { Paint::Background } else { Paint::Food };
        sink.fill(grid.cell_rect(item.point(), size), paint);
    }
}

pub fn draw_game_over<R: RenderSink>(session: &GameSession, viewport: Viewport, sink: &mut R) {
    sink.fill(session.grid().full_rect(viewport), Paint::GameOver);
}
