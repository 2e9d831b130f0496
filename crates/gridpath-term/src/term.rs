//! Crossterm terminal: raw mode, mouse capture, drawing and input mapping.

use std::io::{self, Stdout, Write};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use gridpath_core::Grid;

use crate::editor::{Action, Frontend, Status};
use crate::render::{cell_at, cell_color, screen_pos};

const HELP: &str = "space: search  r: random walls  c: clear  q: quit";

/// Maps a key press to an editor action.
pub fn key_action(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Char(' ') | KeyCode::Enter => Some(Action::Run),
        KeyCode::Char('c') => Some(Action::Clear),
        KeyCode::Char('r') => Some(Action::Scatter),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        _ => None,
    }
}

/// Maps a mouse press or drag over the grid to an editor action.
pub fn mouse_action(grid: &Grid, me: MouseEvent) -> Option<Action> {
    let p = cell_at(grid, me.column, me.row)?;
    match me.kind {
        MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Drag(MouseButton::Left) => {
            Some(Action::Place(p))
        }
        MouseEventKind::Down(MouseButton::Right) | MouseEventKind::Drag(MouseButton::Right) => {
            Some(Action::Erase(p))
        }
        _ => None,
    }
}

fn is_quit_key(ev: &Event) -> bool {
    matches!(
        ev,
        Event::Key(KeyEvent {
            code: KeyCode::Char('q') | KeyCode::Esc,
            kind: KeyEventKind::Press,
            ..
        })
    )
}

/// A terminal session. Restores the terminal on drop.
pub struct Terminal {
    out: Stdout,
    mouse: bool,
    open: bool,
}

impl Terminal {
    /// Enter raw mode and the alternate screen.
    pub fn open(mouse: bool) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = io::stdout();
        execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(ClearType::All)
        )?;
        if mouse {
            execute!(out, event::EnableMouseCapture)?;
        }
        Ok(Self {
            out,
            mouse,
            open: true,
        })
    }

    /// Current terminal size as `(columns, rows)`.
    pub fn size() -> io::Result<(u16, u16)> {
        terminal::size()
    }

    /// Wait up to `timeout` for an input event that maps to an action.
    pub fn next_action(&mut self, grid: &Grid, timeout: Duration) -> io::Result<Option<Action>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        let action = match event::read()? {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => key_action(code),
            Event::Mouse(me) => mouse_action(grid, me),
            Event::Resize(..) => {
                execute!(self.out, terminal::Clear(ClearType::All))?;
                None
            }
            _ => None,
        };
        Ok(action)
    }

    /// Leave the alternate screen and raw mode.
    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        if self.mouse {
            let _ = execute!(self.out, event::DisableMouseCapture);
        }
        let _ = execute!(self.out, ResetColor, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        self.close();
    }
}

impl Frontend for Terminal {
    fn draw(&mut self, grid: &Grid, status: &Status) -> io::Result<()> {
        let mut last = None;
        for c in grid.iter() {
            let (x, y) = screen_pos(c.pos);
            if c.pos.col == 0 {
                queue!(self.out, cursor::MoveTo(x, y))?;
            }
            let colour = cell_color(c.state);
            if last != Some(colour) {
                queue!(self.out, SetBackgroundColor(colour))?;
                last = Some(colour);
            }
            queue!(self.out, Print("  "))?;
        }
        queue!(
            self.out,
            ResetColor,
            cursor::MoveTo(0, grid.rows() as u16),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Grey),
            Print(format!("{status}  |  {HELP}")),
            ResetColor
        )?;
        self.out.flush()
    }

    fn cancel_requested(&mut self) -> io::Result<bool> {
        while event::poll(Duration::ZERO)? {
            if is_quit_key(&event::read()?) {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use gridpath_core::Point;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn keys_map_to_actions() {
        assert_eq!(key_action(KeyCode::Char(' ')), Some(Action::Run));
        assert_eq!(key_action(KeyCode::Char('c')), Some(Action::Clear));
        assert_eq!(key_action(KeyCode::Char('r')), Some(Action::Scatter));
        assert_eq!(key_action(KeyCode::Esc), Some(Action::Quit));
        assert_eq!(key_action(KeyCode::Char('z')), None);
    }

    #[test]
    fn mouse_buttons_place_and_erase() {
        let g = Grid::new(5, 5);
        assert_eq!(
            mouse_action(&g, mouse(MouseEventKind::Down(MouseButton::Left), 3, 2)),
            Some(Action::Place(Point::new(2, 1)))
        );
        assert_eq!(
            mouse_action(&g, mouse(MouseEventKind::Drag(MouseButton::Right), 9, 4)),
            Some(Action::Erase(Point::new(4, 4)))
        );
        assert_eq!(mouse_action(&g, mouse(MouseEventKind::Moved, 3, 2)), None);
        // Status line below the grid.
        assert_eq!(
            mouse_action(&g, mouse(MouseEventKind::Down(MouseButton::Left), 0, 5)),
            None
        );
    }

    #[test]
    fn only_q_and_escape_cancel() {
        let key = |code| Event::Key(KeyEvent::new(code, KeyModifiers::NONE));
        assert!(is_quit_key(&key(KeyCode::Char('q'))));
        assert!(is_quit_key(&key(KeyCode::Esc)));
        assert!(!is_quit_key(&key(KeyCode::Char(' '))));
        assert!(!is_quit_key(&Event::FocusGained));
    }
}
