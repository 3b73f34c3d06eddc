use std::io::{stdout, Stdout, Write};
use std::time::Duration;

use crossterm::event::{poll, read, Event, KeyEvent};
use crossterm::style::{self, Color};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, terminal};

use crate::config::{parse_color, Palette};
use crate::geometry::{CellRect, Viewport};
use crate::render::{Paint, RenderSink, StatusSink};

const STATUS_ROWS: u16 = 1;

pub struct TermColors {
    background: Color,
    body: Color,
    food: Color,
    game_over: Color,
}

impl TermColors {
    pub fn from_palette(palette: &Palette) -> Result<Self, String> {
        Ok(TermColors {
            background: parse_color(&palette.background)?,
            body: parse_color(&palette.body)?,
            food: parse_color(&palette.food)?,
            game_over: parse_color(&palette.game_over)?,
        })
    }

    fn color(&self, paint: Paint) -> Color {
        match paint {
            Paint::Background => self.background,
            Paint::Body => self.body,
            Paint::Food => self.food,
            Paint::GameOver => self.game_over,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Status {
    score: u32,
    lives: u32,
    difficulty: u32,
}

/// Terminal frontend: a back buffer of painted cells flushed as a diff.
/// The active message box is kept and drawn on top of every full repaint.
pub struct TermManager<W: Write = Stdout> {
    width: u16,
    height: u16,
    stdout: W,
    colors: TermColors,
    frame: Vec<Paint>,
    shown: Vec<Option<Paint>>,
    status: Status,
    status_dirty: bool,
    message: Option<Vec<String>>,
    message_dirty: bool,
}

impl TermManager<Stdout> {
    pub fn new(colors: TermColors) -> std::io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(TermManager::with_writer(stdout(), colors, width, height))
    }
}

impl<W: Write> TermManager<W> {
    pub fn with_writer(out: W, colors: TermColors, width: u16, height: u16) -> Self {
        let mut term = TermManager {
            width: 0,
            height: 0,
            stdout: out,
            colors,
            frame: vec![],
            shown: vec![],
            status: Status::default(),
            status_dirty: true,
            message: None,
            message_dirty: false,
        };
        term.resize(width, height);
        term
    }

    pub fn setup(&mut self) -> std::io::Result<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)
    }

    pub fn restore(&mut self) -> std::io::Result<()> {
        terminal::disable_raw_mode()?;
        execute!(
            self.stdout,
            style::ResetColor,
            cursor::Show,
            cursor::EnableBlinking,
            LeaveAlternateScreen
        )
    }

    /// Waits up to `timeout` for the next terminal event.
    pub fn next_event(&self, timeout: Duration) -> std::io::Result<Option<Event>> {
        if poll(timeout)? {
            return Ok(Some(read()?));
        }
        Ok(None)
    }

    pub fn read_key_blocking(&mut self) -> std::io::Result<KeyEvent> {
        loop {
            match read()? {
                Event::Key(ev) => return Ok(ev),
                Event::Resize(w, h) => self.resize(w, h),
                _ => {}
            }
        }
    }

    /// Board area, excluding the status line.
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width as f32, self.board_height() as f32)
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let cells = width as usize * self.board_height() as usize;
        self.frame = vec![Paint::Background; cells];
        self.shown = vec![None; cells];
        self.status_dirty = true;
        self.message_dirty = self.message.is_some();
    }

    /// Writes the cells that changed since the last frame, then the status line.
    pub fn present(&mut self) -> std::io::Result<()> {
        let width = self.width as usize;

        for (i, paint) in self.frame.iter().enumerate() {
            if self.shown[i] == Some(*paint) {
                continue;
            }
            let (x, y) = ((i % width) as u16, (i / width) as u16);
            queue!(
                self.stdout,
                cursor::MoveTo(x, y),
                style::SetBackgroundColor(self.colors.color(*paint)),
                style::Print(' ')
            )?;
            self.shown[i] = Some(*paint);
        }
        queue!(self.stdout, style::ResetColor)?;

        if self.status_dirty {
            self.draw_status()?;
        }
        if self.message_dirty {
            self.draw_message()?;
        }

        self.stdout.flush()
    }

    pub fn show_message(&mut self, lines: &[&str]) -> std::io::Result<()> {
        if self.message.is_some() {
            self.hide_message();
        }

        self.message = Some(lines.iter().map(|line| line.to_string()).collect());
        self.draw_message()?;
        self.stdout.flush()
    }

    /// Forgets what is on screen so the next `present` repaints everything.
    pub fn hide_message(&mut self) {
        if self.message.take().is_none() {
            return;
        }
        self.invalidate();
    }

    pub fn clear(&mut self) -> std::io::Result<()> {
        execute!(self.stdout, style::ResetColor, terminal::Clear(ClearType::All))?;
        self.invalidate();
        Ok(())
    }

    ///////////////////////////////////////////////////////////////////////////

    fn invalidate(&mut self) {
        self.shown.iter_mut().for_each(|cell| *cell = None);
        self.status_dirty = true;
        self.message_dirty = self.message.is_some();
    }

    fn draw_message(&mut self) -> std::io::Result<()> {
        self.message_dirty = false;
        let lines = match self.message {
            Some(ref lines) => lines,
            None => return Ok(()),
        };

        let msg_height = (lines.len() + 2) as u16;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as u16;
        let center = (self.width / 2, self.board_height() / 2);
        let top_left = (
            center.0.saturating_sub(msg_width / 2),
            center.1.saturating_sub(msg_height / 2),
        );

        queue!(self.stdout, style::ResetColor)?;
        let blank = " ".repeat(msg_width as usize);
        for y in [top_left.1, top_left.1 + msg_height - 1] {
            queue!(self.stdout, cursor::MoveTo(top_left.0, y), style::Print(&blank))?;
        }

        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as u16 + 1;
            queue!(self.stdout, cursor::MoveTo(top_left.0, y), style::Print(padded_line))?;
        }

        Ok(())
    }

    fn board_height(&self) -> u16 {
        self.height.saturating_sub(STATUS_ROWS)
    }

    fn draw_status(&mut self) -> std::io::Result<()> {
        if self.height == 0 {
            return Ok(());
        }

        let text = format!(
            "Score: {}  Lives: {}  Difficulty: {}",
            self.status.score, self.status.lives, self.status.difficulty
        );
        let line: String = format!("{:<width$}", text, width = self.width as usize)
            .chars()
            .take(self.width as usize)
            .collect();

        queue!(
            self.stdout,
            style::ResetColor,
            cursor::MoveTo(0, self.height - 1),
            style::Print(line)
        )?;
        self.status_dirty = false;
        Ok(())
    }
}

/// Terminal columns/rows covered by a rect. A cell narrower than one
/// character still gets the character it starts in.
fn span(start: f32, len: f32, limit: u16) -> std::ops::Range<usize> {
    if len <= 0.0 || start < 0.0 {
        return 0..0;
    }

    let from = start.floor() as usize;
    let to = ((start + len).floor() as usize).max(from + 1);
    from.min(limit as usize)..to.min(limit as usize)
}

impl<W: Write> RenderSink for TermManager<W> {
    fn fill(&mut self, rect: CellRect, paint: Paint) {
        let width = self.width as usize;
        for y in span(rect.y, rect.height, self.board_height()) {
            for x in span(rect.x, rect.width, self.width) {
                self.frame[y * width + x] = paint;
            }
        }
    }
}

impl<W: Write> StatusSink for TermManager<W> {
    fn set_score(&mut self, score: u32) {
        self.status.score = score;
        self.status_dirty = true;
    }

    fn set_lives(&mut self, lives: u32) {
        self.status.lives = lives;
        self.status_dirty = true;
    }

    fn set_difficulty(&mut self, difficulty: u32) {
        self.status.difficulty = difficulty;
        self.status_dirty = true;
    }
}
