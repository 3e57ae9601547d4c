//! In-place redraw of a running session.

use std::io::{self, Write};

use crossterm::cursor::{MoveToColumn, MoveUp};
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};
use pilites_core::{Channel, SessionSnapshot};

use crate::render::{StripStyle, frame_bar, status_line};

/// Redraws the status line and one frame bar per channel over the
/// previous drawing.
pub struct Dashboard {
    channels: Vec<Channel>,
    style: StripStyle,
    /// Lines written by the last draw, still on screen above the cursor.
    drawn: u16,
}

impl Dashboard {
    pub fn new(channels: Vec<Channel>, style: StripStyle) -> Self {
        Self {
            channels,
            style,
            drawn: 0,
        }
    }

    /// The lines describing `snapshot`.
    pub fn lines(&self, snapshot: &SessionSnapshot) -> Vec<String> {
        let mut lines = vec![status_line(snapshot)];
        if snapshot.frame.is_empty() {
            return lines;
        }
        let label_width = self
            .channels
            .iter()
            .map(|c| c.name.chars().count())
            .max()
            .unwrap_or(0);
        for channel in &self.channels {
            let pixels = snapshot.frame.pixels_for(channel);
            lines.push(format!(
                "{:<label_width$} {}",
                channel.name,
                frame_bar(&pixels, self.style)
            ));
        }
        lines
    }

    pub fn draw(&mut self, out: &mut impl Write, snapshot: &SessionSnapshot) -> io::Result<()> {
        if self.drawn > 0 {
            queue!(
                out,
                MoveUp(self.drawn),
                MoveToColumn(0),
                Clear(ClearType::FromCursorDown)
            )?;
        }
        let lines = self.lines(snapshot);
        for line in &lines {
            writeln!(out, "{line}")?;
        }
        self.drawn = u16::try_from(lines.len()).unwrap_or(u16::MAX);
        out.flush()
    }

    /// Forget the last drawing after something else was printed below it.
    pub fn detach(&mut self) {
        self.drawn = 0;
    }
}
