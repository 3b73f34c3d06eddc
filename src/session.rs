use crate::food::{self, create_food, FoodItem};
use crate::geometry::{CellSize, Grid};
use crate::rng::SessionRng;
use crate::snake::{Direction, Snake};
use crate::step::{advance, StepOutcome};

pub struct GameSession {
    snake: Snake,
    food: Vec<FoodItem>,
    score: u32,
    lives: u32,
    total_lives: u32,
    food_count: usize,
    grid: Grid,
    rng: SessionRng,
}

impl GameSession {
    pub fn new(grid: Grid, total_lives: u32, food_count: usize, mut rng: SessionRng) -> Self {
        let snake = Snake::spawn(grid, &mut rng);
        let food = create_food(vec![], food_count, grid, &mut rng);

        GameSession {
            snake,
            food,
            score: 0,
            lives: total_lives,
            total_lives,
            food_count,
            grid,
            rng,
        }
    }

    /// Fresh snake and food. Score and lives are kept.
    pub fn restart(&mut self) {
        self.snake = Snake::spawn(self.grid, &mut self.rng);
        self.food = create_food(vec![], self.food_count, self.grid, &mut self.rng);
    }

    /// Zero score, full lives, then restart.
    pub fn reset(&mut self) {
        self.score = 0;
        self.lives = self.total_lives;
        self.restart();
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.snake.set_direction(direction);
    }

    /// Runs one simulation step against a copy of the board. Nothing is
    /// committed until `commit` is called.
    pub fn simulate(&self) -> StepOutcome {
        advance(self.snake.clone(), self.food.clone(), self.grid)
    }

    pub fn commit(&mut self, snake: Snake, food: Vec<FoodItem>) {
        self.snake = snake;
        self.food = food;
    }

    /// Tops the active food back up to the configured count.
    pub fn replenish_food(&mut self) {
        let missing = self.food_count.saturating_sub(self.food.len());
        let food = std::mem::take(&mut self.food);
        self.food = create_food(food, missing, self.grid, &mut self.rng);
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Takes one life and returns what is left.
    pub fn lose_life(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }

    pub fn apply_cell_size(&mut self, size: CellSize) {
        self.snake.set_cell_size(size);
        food::set_cell_size(&mut self.food, size);
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> &[FoodItem] {
        &self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn total_lives(&self) -> u32 {
        self.total_lives
    }

    pub fn food_count(&self) -> usize {
        self.food_count
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }
}
