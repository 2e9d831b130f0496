//! Terminal front-end for the gridpath visual pathfinder.
//!
//! Left click (or drag) marks the start, then the end, then barriers; right
//! click erases. Space runs the search, animating every expansion; `q`
//! stops a running search or quits.

pub mod config;
pub mod editor;
pub mod render;
pub mod term;

use std::error::Error;
use std::time::Duration;

pub use config::Config;
pub use editor::{Action, Editor, Frontend, Status};
pub use term::Terminal;

/// How long the edit loop waits for input before redrawing.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Open the terminal and run the edit loop until the user quits.
pub fn run(config: Config) -> Result<(), Box<dyn Error>> {
    let (width, height) = Terminal::size()?;
    let config = config.fit_to(width, height);
    log::info!("starting {}x{} grid", config.rows, config.cols);

    let mut editor = Editor::new(&config);
    let mut term = Terminal::open(config.mouse)?;
    let result = edit_loop(&mut editor, &mut term);
    term.close();
    result
}

fn edit_loop(editor: &mut Editor, term: &mut Terminal) -> Result<(), Box<dyn Error>> {
    loop {
        term.draw(editor.grid(), editor.status())?;
        match term.next_action(editor.grid(), POLL_INTERVAL)? {
            Some(Action::Quit) => return Ok(()),
            Some(action) => editor.apply(action, term)?,
            None => {}
        }
    }
}
