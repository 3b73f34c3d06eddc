use std::time::Duration;

use crate::config::GameConfig;
use crate::geometry::Viewport;
use crate::input::Command;
use crate::log;
use crate::render::{draw_frame, draw_game_over, RenderSink, StatusSink};
use crate::session::GameSession;
use crate::step::DeathReason;
use crate::timer::Timer;

#[derive(Clone, Debug, PartialEq)]
pub struct GameSettings {
    pub base_interval: Duration,
    pub min_interval: Duration,
    pub difficulty_increment: u32,
}

impl From<&GameConfig> for GameSettings {
    fn from(config: &GameConfig) -> Self {
        Self {
            base_interval: Duration::from_millis(config.base_tick_interval_ms),
            min_interval: Duration::from_millis(config.min_tick_interval_ms),
            difficulty_increment: config.difficulty_increment,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Moved { eaten: usize },
    Restarted { lives: u32, reason: DeathReason },
    GameOver { final_score: u32, eaten_food: u32, reason: DeathReason },
}

pub struct Controller<T: Timer> {
    session: GameSession,
    settings: GameSettings,
    difficulty: u32,
    eaten_food: u32,
    timer: T,
}

impl<T: Timer> Controller<T> {
    pub fn new(session: GameSession, settings: GameSettings, timer: T) -> Self {
        Controller { session, settings, difficulty: 0, eaten_food: 0, timer }
    }

    /// Publishes the initial status and arms the timer at the base rate.
    pub fn start<S: StatusSink>(&mut self, status: &mut S) {
        self.publish_status(status);
        self.reschedule();
    }

    pub fn interval(&self) -> Duration {
        self.settings
            .base_interval
            .saturating_sub(Duration::from_millis(self.difficulty as u64))
            .max(self.settings.min_interval)
    }

    pub fn tick<F: RenderSink + StatusSink>(&mut self, viewport: Viewport, out: &mut F) -> TickOutcome {
        let size = self.session.grid().cell_size(viewport);
        self.session.apply_cell_size(size);

        let outcome = self.session.simulate();

        if let Some(reason) = outcome.death {
            let lives = self.session.lose_life();
            log!("Snake died ({:?}), lives left: {}", reason, lives);

            if lives == 0 {
                return self.game_over(reason, viewport, out);
            }

            self.timer.cancel();
            self.session.restart();
            self.difficulty = 0;
            self.eaten_food = 0;
            self.reschedule();
            self.publish_status(out);
            draw_frame(&self.session, viewport, out);
            return TickOutcome::Restarted { lives, reason };
        }

        let eaten = outcome.eaten.len();
        self.session.commit(outcome.snake, outcome.food);

        for item in &outcome.eaten {
            self.session.add_score(self.difficulty);
            self.eaten_food += 1;
            log!(
                "Ate food at ({}, {}). Score: {}, length: {}",
                item.point().x,
                item.point().y,
                self.session.score(),
                self.session.snake().len()
            );
            self.increase_difficulty(self.settings.difficulty_increment, out);
        }

        if eaten > 0 {
            self.session.replenish_food();
            out.set_score(self.session.score());
        }

        draw_frame(&self.session, viewport, out);
        TickOutcome::Moved { eaten }
    }

    pub fn handle<F: RenderSink + StatusSink>(&mut self, command: Command, viewport: Viewport, out: &mut F) {
        match command {
            Command::Steer(direction) => self.session.set_direction(direction),
            Command::TogglePause => {
                if self.timer.is_armed() {
                    log!("Paused");
                    self.timer.cancel();
                } else {
                    log!("Resumed");
                    self.reschedule();
                }
            }
            Command::Restart => {
                log!("Session restarted by player");
                self.reset_session();
                self.publish_status(out);
                self.reschedule();
                draw_frame(&self.session, viewport, out);
            }
            Command::SpeedUp => {
                if self.timer.is_armed() {
                    self.increase_difficulty(self.settings.difficulty_increment, out);
                } else {
                    self.difficulty += self.settings.difficulty_increment;
                    out.set_difficulty(self.difficulty);
                }
            }
        }
    }

    /// Repaints for a new viewport. The simulation is left alone.
    pub fn redraw<R: RenderSink>(&mut self, viewport: Viewport, render: &mut R) {
        let size = self.session.grid().cell_size(viewport);
        self.session.apply_cell_size(size);
        draw_frame(&self.session, viewport, render);
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_armed()
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    pub fn eaten_food(&self) -> u32 {
        self.eaten_food
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    fn game_over<F: RenderSink + StatusSink>(
        &mut self,
        reason: DeathReason,
        viewport: Viewport,
        out: &mut F,
    ) -> TickOutcome {
        let final_score = self.session.score();
        let eaten_food = self.eaten_food;
        log!("Game over. Score: {}, food eaten: {}", final_score, eaten_food);

        draw_game_over(&self.session, viewport, out);
        self.timer.cancel();
        self.reset_session();
        self.publish_status(out);

        TickOutcome::GameOver { final_score, eaten_food, reason }
    }

    fn reset_session(&mut self) {
        self.session.reset();
        self.difficulty = 0;
        self.eaten_food = 0;
    }

    fn increase_difficulty<S: StatusSink>(&mut self, amount: u32, status: &mut S) {
        self.difficulty += amount;
        status.set_difficulty(self.difficulty);
        self.reschedule();
    }

    fn reschedule(&mut self) {
        self.timer.cancel();
        let interval = self.interval();
        self.timer.schedule(interval);
        log!("Tick interval {}ms (difficulty {})", interval.as_millis(), self.difficulty);
    }

    fn publish_status<S: StatusSink>(&self, status: &mut S) {
        status.set_score(self.session.score());
        status.set_lives(self.session.lives());
        status.set_difficulty(self.difficulty);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::food::FoodItem;
    use crate::geometry::Grid;
    use crate::render::testing::Recorder;
    use crate::render::Paint;
    use crate::rng::SessionRng;
    use crate::snake::{Direction, Point, Snake};

    #[derive(Default)]
    struct RecordingTimer {
        period: Option<Duration>,
        schedules: Vec<Duration>,
    }

    impl Timer for RecordingTimer {
        fn schedule(&mut self, period: Duration) {
            assert!(self.period.is_none(), "previous schedule was not cancelled");
            self.period = Some(period);
            self.schedules.push(period);
        }

        fn cancel(&mut self) {
            self.period = None;
        }

        fn period(&self) -> Option<Duration> {
            self.period
        }
    }

    fn settings() -> GameSettings {
        GameSettings {
            base_interval: Duration::from_millis(100),
            min_interval: Duration::from_millis(20),
            difficulty_increment: 5,
        }
    }

    fn viewport() -> Viewport {
        Viewport::new(20.0, 20.0)
    }

    fn create_controller(lives: u32, food_count: usize) -> Controller<RecordingTimer> {
        let session = GameSession::new(Grid::new(10, 10), lives, food_count, SessionRng::new(42));
        let mut controller = Controller::new(session, settings(), RecordingTimer::default());
        controller.start(&mut Recorder::default());
        controller
    }

    fn place(controller: &mut Controller<RecordingTimer>, snake: Snake, food: Vec<FoodItem>) {
        controller.session.commit(snake, food);
    }

    fn about_to_eat() -> (Snake, Vec<FoodItem>) {
        let snake = Snake::from_parts(&[Point::new(5, 5)], Direction::Right, vec![Point::new(5, 5)]);
        (snake, vec![FoodItem::new(Point::new(5, 5))])
    }

    fn about_to_crash() -> Snake {
        Snake::from_parts(&[Point::new(9, 0)], Direction::Right, vec![])
    }

    #[test]
    fn test_start_arms_base_rate() {
        let controller = create_controller(3, 1);
        assert_eq!(controller.timer().period(), Some(Duration::from_millis(100)));
        assert_eq!(controller.timer().schedules, vec![Duration::from_millis(100)]);
        assert_eq!(controller.difficulty(), 0);
    }

    #[test]
    fn test_start_publishes_status() {
        let session = GameSession::new(Grid::new(10, 10), 4, 1, SessionRng::new(42));
        let mut controller = Controller::new(session, settings(), RecordingTimer::default());
        let mut out = Recorder::default();
        controller.start(&mut out);
        assert_eq!((out.score, out.lives, out.difficulty), (Some(0), Some(4), Some(0)));
    }

    #[test]
    fn test_plain_tick_draws_frame() {
        let mut controller = create_controller(3, 1);
        place(&mut controller, Snake::new(Point::new(2, 2)), vec![FoodItem::new(Point::new(8, 8))]);

        let mut out = Recorder::default();
        let outcome = controller.tick(viewport(), &mut out);

        assert_eq!(outcome, TickOutcome::Moved { eaten: 0 });
        assert_eq!(controller.session().snake().head().point, Point::new(3, 2));
        assert_eq!(out.fills.first().map(|(_, p)| *p), Some(Paint::Background));
        assert_eq!(out.status_updates, 0);
    }

    #[test]
    fn test_feeding_scores_difficulty_then_raises_it() {
        let mut controller = create_controller(3, 1);
        controller.difficulty = 10;
        let (snake, food) = about_to_eat();
        place(&mut controller, snake, food);

        let mut out = Recorder::default();
        let outcome = controller.tick(viewport(), &mut out);

        assert_eq!(outcome, TickOutcome::Moved { eaten: 1 });
        assert_eq!(controller.session().score(), 10);
        assert_eq!(controller.difficulty(), 15);
        assert_eq!(controller.eaten_food(), 1);
        assert_eq!(controller.session().snake().len(), 2);
        assert_eq!(controller.session().food().len(), 1);
        assert_eq!(out.score, Some(10));
        assert_eq!(out.difficulty, Some(15));
        assert_eq!(controller.timer().period(), Some(Duration::from_millis(85)));
    }

    #[test]
    fn test_two_items_in_one_tick() {
        let mut controller = create_controller(3, 2);
        controller.difficulty = 10;
        let snake = Snake::from_parts(
            &[Point::new(5, 5)],
            Direction::Right,
            vec![Point::new(4, 5), Point::new(5, 5)],
        );
        place(&mut controller, snake, vec![FoodItem::new(Point::new(4, 5)), FoodItem::new(Point::new(5, 5))]);

        let outcome = controller.tick(viewport(), &mut Recorder::default());

        assert_eq!(outcome, TickOutcome::Moved { eaten: 2 });
        assert_eq!(controller.session().score(), 10 + 15);
        assert_eq!(controller.difficulty(), 20);
        assert_eq!(controller.eaten_food(), 2);
        assert_eq!(controller.session().food().len(), 2);
    }

    #[test]
    fn test_difficulty_only_moves_on_feeding() {
        let mut controller = create_controller(3, 1);
        place(&mut controller, Snake::new(Point::new(0, 0)), vec![FoodItem::new(Point::new(9, 9))]);
        for _ in 0..5 {
            controller.tick(viewport(), &mut Recorder::default());
            assert_eq!(controller.difficulty(), 0);
        }
    }

    #[test]
    fn test_interval_never_drops_below_floor() {
        let mut controller = create_controller(3, 1);
        for _ in 0..100 {
            controller.increase_difficulty(5, &mut Recorder::default());
            assert!(controller.interval() >= Duration::from_millis(20));
            assert!(controller.timer().period().unwrap() > Duration::ZERO);
        }
        assert_eq!(controller.interval(), Duration::from_millis(20));
    }

    #[test]
    fn test_death_with_lives_left_respawns() {
        let mut controller = create_controller(3, 2);
        controller.session.add_score(25);
        controller.difficulty = 15;
        controller.eaten_food = 3;
        place(&mut controller, about_to_crash(), vec![]);

        let mut out = Recorder::default();
        let outcome = controller.tick(viewport(), &mut out);

        assert_eq!(outcome, TickOutcome::Restarted { lives: 2, reason: DeathReason::WallCollision });
        assert_eq!(controller.session().lives(), 2);
        assert_eq!(controller.session().score(), 25);
        assert_eq!(controller.difficulty(), 0);
        assert_eq!(controller.eaten_food(), 0);
        assert!(!controller.session().snake().is_dead());
        assert_eq!(controller.session().snake().len(), 1);
        assert_eq!(controller.session().food().len(), 2);
        assert_eq!(controller.timer().period(), Some(Duration::from_millis(100)));
        assert_eq!(out.lives, Some(2));
        assert_eq!(out.difficulty, Some(0));
    }

    #[test]
    fn test_last_death_resets_session_and_stops() {
        let mut controller = create_controller(1, 1);
        controller.session.add_score(40);
        controller.difficulty = 20;
        controller.eaten_food = 4;
        place(&mut controller, about_to_crash(), vec![]);

        let mut out = Recorder::default();
        let outcome = controller.tick(viewport(), &mut out);

        assert_eq!(
            outcome,
            TickOutcome::GameOver { final_score: 40, eaten_food: 4, reason: DeathReason::WallCollision }
        );
        assert_eq!(out.fills.len(), 1);
        assert_eq!(out.fills[0].1, Paint::GameOver);
        assert_eq!(controller.session().score(), 0);
        assert_eq!(controller.session().lives(), 1);
        assert_eq!(controller.difficulty(), 0);
        assert_eq!(controller.eaten_food(), 0);
        assert!(!controller.session().snake().is_dead());
        assert_eq!(controller.session().food().len(), 1);
        assert!(!controller.is_running());
        assert_eq!(out.score, Some(0));
        assert_eq!(out.lives, Some(1));
    }

    #[test]
    fn test_play_resumes_after_game_over() {
        let mut controller = create_controller(1, 1);
        controller.difficulty = 20;
        place(&mut controller, about_to_crash(), vec![]);

        let mut out = Recorder::default();
        let outcome = controller.tick(viewport(), &mut out);
        assert!(matches!(outcome, TickOutcome::GameOver { .. }));
        assert!(!controller.is_running());

        controller.handle(Command::TogglePause, viewport(), &mut out);
        assert!(controller.is_running());
        assert_eq!(controller.timer().period(), Some(Duration::from_millis(100)));

        place(&mut controller, Snake::new(Point::new(2, 2)), vec![FoodItem::new(Point::new(8, 8))]);
        let outcome = controller.tick(viewport(), &mut out);

        assert_eq!(outcome, TickOutcome::Moved { eaten: 0 });
        assert_eq!(controller.session().lives(), controller.session().total_lives());
        assert_eq!(controller.session().score(), 0);
        assert_eq!(controller.difficulty(), 0);
        assert_eq!(controller.session().snake().head().point, Point::new(3, 2));
        assert!(controller.is_running());
    }

    #[test]
    fn test_restart_after_game_over_runs_fresh_board() {
        let mut controller = create_controller(2, 1);
        controller.session.lose_life();
        place(&mut controller, about_to_crash(), vec![]);
        let mut out = Recorder::default();
        assert!(matches!(controller.tick(viewport(), &mut out), TickOutcome::GameOver { .. }));

        controller.handle(Command::Restart, viewport(), &mut out);
        place(&mut controller, Snake::new(Point::new(4, 4)), vec![FoodItem::new(Point::new(0, 9))]);

        assert_eq!(controller.tick(viewport(), &mut out), TickOutcome::Moved { eaten: 0 });
        assert_eq!(controller.session().lives(), 2);
        assert_eq!(controller.difficulty(), 0);
        assert!(controller.is_running());
    }

    #[test]
    fn test_self_collision_costs_a_life() {
        let mut controller = create_controller(2, 1);
        let snake = Snake::from_parts(
            &[Point::new(5, 5), Point::new(4, 5), Point::new(3, 5)],
            Direction::Left,
            vec![],
        );
        place(&mut controller, snake, vec![]);

        let outcome = controller.tick(viewport(), &mut Recorder::default());
        assert_eq!(outcome, TickOutcome::Restarted { lives: 1, reason: DeathReason::SelfCollision });
    }

    #[test]
    fn test_restart_command_resets_and_rearms() {
        let mut controller = create_controller(3, 1);
        controller.session.add_score(9);
        controller.session.lose_life();
        controller.difficulty = 10;
        controller.timer.cancel();

        let mut out = Recorder::default();
        controller.handle(Command::Restart, viewport(), &mut out);

        assert_eq!(controller.session().score(), 0);
        assert_eq!(controller.session().lives(), 3);
        assert_eq!(controller.difficulty(), 0);
        assert_eq!(controller.timer().period(), Some(Duration::from_millis(100)));
        assert_eq!(out.score, Some(0));
        assert!(!out.fills.is_empty());
    }

    #[test]
    fn test_pause_toggles_timer() {
        let mut controller = create_controller(3, 1);
        let mut out = Recorder::default();

        controller.handle(Command::TogglePause, viewport(), &mut out);
        assert!(!controller.is_running());

        controller.handle(Command::TogglePause, viewport(), &mut out);
        assert!(controller.is_running());
    }

    #[test]
    fn test_speed_up_while_running_reschedules() {
        let mut controller = create_controller(3, 1);
        let mut out = Recorder::default();
        controller.handle(Command::SpeedUp, viewport(), &mut out);
        assert_eq!(controller.difficulty(), 5);
        assert_eq!(out.difficulty, Some(5));
        assert_eq!(controller.timer().period(), Some(Duration::from_millis(95)));
    }

    #[test]
    fn test_speed_up_while_paused_stays_paused() {
        let mut controller = create_controller(3, 1);
        let mut out = Recorder::default();
        controller.handle(Command::TogglePause, viewport(), &mut out);

        controller.handle(Command::SpeedUp, viewport(), &mut out);
        assert_eq!(controller.difficulty(), 5);
        assert!(!controller.is_running());

        controller.handle(Command::TogglePause, viewport(), &mut out);
        assert_eq!(controller.timer().period(), Some(Duration::from_millis(95)));
    }

    #[test]
    fn test_steer_changes_next_move() {
        let mut controller = create_controller(3, 1);
        place(&mut controller, Snake::new(Point::new(4, 4)), vec![]);
        let mut out = Recorder::default();
        controller.handle(Command::Steer(Direction::Down), viewport(), &mut out);
        controller.tick(viewport(), &mut out);
        assert_eq!(controller.session().snake().head().point, Point::new(4, 5));
    }

    #[test]
    fn test_redraw_leaves_board_alone() {
        let mut controller = create_controller(3, 1);
        place(&mut controller, Snake::new(Point::new(4, 4)), vec![]);
        let mut out = Recorder::default();
        controller.redraw(Viewport::new(50.0, 10.0), &mut out);
        assert_eq!(controller.session().snake().head().point, Point::new(4, 4));
        assert_eq!(controller.session().snake().head().size.width, 5.0);
        assert!(!out.fills.is_empty());
    }
}
