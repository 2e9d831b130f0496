//! Interactive A* pathfinder in the terminal.
//!
//! Run: cargo run --bin gridpath

use gridpath_term::Config;

fn main() {
    if let Err(e) = gridpath_term::run(Config::default()) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
