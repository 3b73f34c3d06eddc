use std::time::Duration;

use crossterm::event::Event;

use crate::config::GameConfig;
use crate::controller::{Controller, GameSettings, TickOutcome};
use crate::input::{is_ctrl_c, map_key, Command, Input};
use crate::log;
use crate::rng::SessionRng;
use crate::session::GameSession;
use crate::term::TermManager;
use crate::timer::FrameTimer;

// How long to block for input while the timer is not armed
const IDLE_POLL_MS: u64 = 250;

pub struct SnakeGame {
    term: TermManager,
    controller: Controller<FrameTimer>,
}

impl SnakeGame {
    /// Builds the session against the current terminal size. A viewport-derived
    /// grid is fixed from here on.
    pub fn new(term: TermManager, config: &GameConfig) -> Self {
        let grid = config.grid.resolve(term.viewport());
        let rng = config.seed.map(SessionRng::new).unwrap_or_else(SessionRng::from_random);
        let session = GameSession::new(grid, config.total_lives, config.food_count as usize, rng);

        log!(
            "New game: {}x{} grid, {} lives, {} food, seed {}",
            grid.columns,
            grid.rows,
            session.total_lives(),
            session.food_count(),
            session.seed()
        );

        let controller = Controller::new(session, GameSettings::from(config), FrameTimer::new());
        SnakeGame { term, controller }
    }

    /// Runs until the player quits. The terminal is restored on every exit path.
    pub fn run(mut self) -> std::io::Result<()> {
        self.term.setup()?;
        let result = self.play();
        let restored = self.term.restore();
        result.and(restored)
    }

    ///////////////////////////////////////////////////////////////////////////

    fn play(&mut self) -> std::io::Result<()> {
        self.term.clear()?;
        if !self.show_intro()? {
            return Ok(());
        }

        self.controller.start(&mut self.term);
        self.controller.redraw(self.term.viewport(), &mut self.term);
        self.term.present()?;

        loop {
            let timeout = self
                .controller
                .timer()
                .time_until_due()
                .unwrap_or(Duration::from_millis(IDLE_POLL_MS));

            if let Some(event) = self.term.next_event(timeout)? {
                match event {
                    Event::Key(key_ev) => match map_key(&key_ev) {
                        Some(Input::Quit) => {
                            let session = self.controller.session();
                            log!("Quit with score {}, {} lives left", session.score(), session.lives());
                            return Ok(());
                        }
                        Some(Input::Command(command)) => self.apply(command)?,
                        None => {}
                    },
                    Event::Resize(width, height) => {
                        self.term.resize(width, height);
                        self.term.clear()?;
                        self.controller.redraw(self.term.viewport(), &mut self.term);
                        self.term.present()?;
                    }
                    _ => {}
                }
            }

            if self.controller.timer_mut().fire_if_due() {
                let viewport = self.term.viewport();
                let outcome = self.controller.tick(viewport, &mut self.term);
                self.term.present()?;

                match outcome {
                    TickOutcome::GameOver { final_score, eaten_food, .. } => {
                        self.show_game_over(final_score, eaten_food)?;
                    }
                    TickOutcome::Restarted { .. } | TickOutcome::Moved { .. } => {}
                }
            }
        }
    }

    fn apply(&mut self, command: Command) -> std::io::Result<()> {
        let was_running = self.controller.is_running();
        let viewport = self.term.viewport();
        self.controller.handle(command, viewport, &mut self.term);

        match (was_running, self.controller.is_running()) {
            (true, false) => {
                self.term.present()?;
                self.term.show_message(&[
                    "Paused",
                    &*format!("Difficulty: {}", self.controller.difficulty()),
                    &*format!("Food eaten: {}", self.controller.eaten_food()),
                    "",
                    "Esc to resume",
                    "R to restart",
                    "Q to quit",
                ])?;
            }
            (false, true) => {
                self.term.hide_message();
                self.controller.redraw(viewport, &mut self.term);
                self.term.present()?;
            }
            _ => self.term.present()?,
        }

        Ok(())
    }

    /// Returns false if the player asked to quit.
    fn show_intro(&mut self) -> std::io::Result<bool> {
        let lines = &[
            "Arrow keys or WASD to move",
            "Esc to pause, R to restart",
            "+ to speed up",
            "Q or CTRL+C to quit",
            "",
            "Press any key to begin",
        ];

        self.term.show_message(lines)?;
        let key_ev = self.term.read_key_blocking()?;
        self.term.hide_message();

        Ok(!is_ctrl_c(&key_ev) && map_key(&key_ev) != Some(Input::Quit))
    }

    fn show_game_over(&mut self, final_score: u32, eaten_food: u32) -> std::io::Result<()> {
        self.term.show_message(&[
            "Game over!",
            &*format!("Score: {}", final_score),
            &*format!("Food eaten: {}", eaten_food),
            "",
            "Press R to play again,",
            "or Q to quit.",
        ])
    }
}
