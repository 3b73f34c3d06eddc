use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::snake::Direction;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Steer(Direction),
    TogglePause,
    Restart,
    SpeedUp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    Quit,
}

/// Maps a key press to game input. Anything unrecognised is ignored.
pub fn map_key(ev: &KeyEvent) -> Option<Input> {
    if ev.kind == KeyEventKind::Release {
        return None;
    }

    if is_ctrl_c(ev) {
        return Some(Input::Quit);
    }

    let command = match ev.code {
        KeyCode::Char('w') | KeyCode::Up => Command::Steer(Direction::Up),
        KeyCode::Char('a') | KeyCode::Left => Command::Steer(Direction::Left),
        KeyCode::Char('s') | KeyCode::Down => Command::Steer(Direction::Down),
        KeyCode::Char('d') | KeyCode::Right => Command::Steer(Direction::Right),
        KeyCode::Esc => Command::TogglePause,
        KeyCode::Char('r') => Command::Restart,
        KeyCode::Char('+') | KeyCode::Char('=') => Command::SpeedUp,
        KeyCode::Char('q') => return Some(Input::Quit),
        _ => return None,
    };

    Some(Input::Command(command))
}

pub fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL)
}
