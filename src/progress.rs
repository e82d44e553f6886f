use std::io::{self, IsTerminal, Write};

use crossterm::cursor::MoveToColumn;
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};

/// One-line running percentage on stderr, redrawn in place. Stays silent
/// when stderr is not a terminal.
pub struct Progress {
    total: usize,
    done: usize,
    enabled: bool,
}

impl Progress {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            done: 0,
            enabled: io::stderr().is_terminal(),
        }
    }

    pub fn percent(&self) -> f64 {
        percent(self.done, self.total)
    }

    /// Marks one more unit done and redraws.
    pub fn tick(&mut self) {
        self.done = (self.done + 1).min(self.total);
        self.draw();
    }

    pub fn finish(&mut self) {
        if !self.enabled {
            return;
        }
        let mut err = io::stderr();
        let _ = queue!(err, MoveToColumn(0), Clear(ClearType::CurrentLine));
        let _ = err.flush();
    }

    fn draw(&self) {
        if !self.enabled {
            return;
        }
        let mut err = io::stderr();
        let line = format!("  {:.2}% ({}/{})", self.percent(), self.done, self.total);
        let _ = queue!(
            err,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(line)
        );
        let _ = err.flush();
    }
}

/// Percentage rounded to two decimals; an empty total counts as done.
pub fn percent(done: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    ((done as f64 / total as f64) * 10_000.0).round() / 100.0
}
