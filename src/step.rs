use crate::food::FoodItem;
use crate::geometry::Grid;
use crate::snake::Snake;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeathReason {
    WallCollision,
    SelfCollision,
}

#[derive(Clone, Debug)]
pub struct StepOutcome {
    pub snake: Snake,
    /// Food still on the board.
    pub food: Vec<FoodItem>,
    /// Food consumed this tick, in board order.
    pub eaten: Vec<FoodItem>,
    pub death: Option<DeathReason>,
}

impl StepOutcome {
    fn died(mut snake: Snake, food: Vec<FoodItem>, reason: DeathReason) -> Self {
        snake.kill();
        StepOutcome { snake, food, eaten: vec![], death: Some(reason) }
    }
}

/// Advances the snake one tick.
///
/// Food is eaten when its cell is already on the snake's path, i.e. the head
/// passed over it since the last growth, not when the next head lands on it.
/// An eaten cell becomes the new head and the snake does not move that tick.
/// A snake that is already dead is returned untouched.
pub fn advance(snake: Snake, food: Vec<FoodItem>, grid: Grid) -> StepOutcome {
    if snake.is_dead() {
        return StepOutcome { snake, food, eaten: vec![], death: None };
    }

    let next_head = snake.head().point.offset(snake.direction().delta());

    if !grid.contains(next_head) {
        return StepOutcome::died(snake, food, DeathReason::WallCollision);
    }

    if snake.occupies(next_head) {
        return StepOutcome::died(snake, food, DeathReason::SelfCollision);
    }

    let (mut eaten, food): (Vec<FoodItem>, Vec<FoodItem>) = food
        .into_iter()
        .partition(|item| snake.path().contains(&item.point()));

    let mut snake = snake;
    if eaten.is_empty() {
        snake.advance_to(next_head);
    } else {
        for item in eaten.iter_mut() {
            item.eaten = true;
            snake.grow_into(item.cell);
        }
    }

    StepOutcome { snake, food, eaten, death: None }
}
