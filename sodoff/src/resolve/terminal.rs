//! Raw-mode terminal prompter.
//!
//! Prompts are drawn inline below the cursor and redrawn in place on every
//! key press. Esc or Ctrl-C interrupts.

use std::io::{self, Stdout, Write};

use crossterm::cursor::{MoveToColumn, MoveUp};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};

use super::prompt::{PickList, PromptError, Prompter, Searcher, Validator};

/// Raw mode for as long as the guard lives.
struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(RawMode)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// A piece of a prompt frame.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Part<'a> {
    Plain(&'a str),
    Colored(&'a str, Color),
}

impl<'a> Part<'a> {
    fn text(&self) -> &'a str {
        match *self {
            Part::Plain(text) | Part::Colored(text, _) => text,
        }
    }

    fn with_text(self, text: &'a str) -> Self {
        match self {
            Part::Plain(_) => Part::Plain(text),
            Part::Colored(_, color) => Part::Colored(text, color),
        }
    }
}

/// Cut a frame line down to `width` columns. `redraw` counts one row per
/// line, so a line must never wrap.
fn clip<'a>(line: &[Part<'a>], width: usize) -> Vec<Part<'a>> {
    let mut left = width;
    let mut clipped = Vec::with_capacity(line.len());
    for part in line {
        if left == 0 {
            break;
        }
        let text = part.text();
        let end = text.char_indices().nth(left).map_or(text.len(), |(i, _)| i);
        left -= text[..end].chars().count();
        clipped.push(part.with_text(&text[..end]));
    }
    clipped
}

/// Usable columns, leaving the last one free so the cursor never wraps.
fn line_width() -> usize {
    let columns = terminal::size().map_or(80, |(columns, _)| columns);
    usize::from(columns).saturating_sub(1).max(1)
}

/// Prompts on stdout, reading keys with crossterm.
pub struct TerminalPrompter {
    out: Stdout,
    /// Lines of the current frame, so the next one can overwrite it.
    drawn: u16,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            out: io::stdout(),
            drawn: 0,
        }
    }

    fn redraw(&mut self, frame: &[Vec<Part<'_>>]) -> io::Result<()> {
        queue!(self.out, MoveToColumn(0))?;
        if self.drawn > 1 {
            queue!(self.out, MoveUp(self.drawn - 1))?;
        }
        queue!(self.out, Clear(ClearType::FromCursorDown))?;

        let width = line_width();
        for (i, line) in frame.iter().enumerate() {
            if i > 0 {
                queue!(self.out, Print("\r\n"))?;
            }
            for part in clip(line, width) {
                match part {
                    Part::Plain(text) => queue!(self.out, Print(text))?,
                    Part::Colored(text, color) => queue!(
                        self.out,
                        SetForegroundColor(color),
                        Print(text),
                        ResetColor
                    )?,
                }
            }
        }

        self.drawn = u16::try_from(frame.len()).unwrap_or(u16::MAX);
        self.out.flush()
    }

    /// Replace the frame with a one-line summary of the answer.
    fn finish(&mut self, label: &str, answer: &str) -> io::Result<()> {
        self.redraw(&[vec![
            Part::Colored("✔ ", Color::Green),
            Part::Plain(label),
            Part::Plain(": "),
            Part::Colored(answer, Color::Cyan),
        ]])?;
        queue!(self.out, Print("\r\n"))?;
        self.drawn = 0;
        self.out.flush()
    }

    /// Drop the frame after an interrupt.
    fn abandon(&mut self) -> io::Result<()> {
        self.redraw(&[])?;
        self.drawn = 0;
        Ok(())
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

/// Block until a key is pressed.
fn read_key() -> io::Result<KeyEvent> {
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(key);
            }
        }
    }
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.code == KeyCode::Esc
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

fn is_text(key: &KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => Some(c),
        _ => None,
    }
}

impl Prompter for TerminalPrompter {
    fn input(&mut self, label: &str, validate: Validator<'_>) -> Result<String, PromptError> {
        let _raw = RawMode::enable()?;
        let mut buffer = String::new();
        let mut error: Option<String> = None;

        loop {
            {
                let mut frame = vec![vec![
                    Part::Colored("? ", Color::Cyan),
                    Part::Plain(label),
                    Part::Plain(": "),
                    Part::Plain(&buffer),
                ]];
                if let Some(message) = &error {
                    frame.push(vec![Part::Colored("✗ ", Color::Red), Part::Plain(message)]);
                }
                self.redraw(&frame)?;
            }

            let key = read_key()?;
            if is_interrupt(&key) {
                self.abandon()?;
                return Err(PromptError::Interrupted);
            }

            match key.code {
                KeyCode::Enter => match validate(&buffer) {
                    Ok(()) => {
                        self.finish(label, &buffer)?;
                        return Ok(buffer);
                    }
                    Err(message) => error = Some(message),
                },
                KeyCode::Backspace => {
                    buffer.pop();
                    error = None;
                }
                _ => {
                    if let Some(c) = is_text(&key) {
                        buffer.push(c);
                        error = None;
                    }
                }
            }
        }
    }

    fn select(
        &mut self,
        label: &str,
        items: &[String],
        searcher: Searcher<'_>,
    ) -> Result<usize, PromptError> {
        let _raw = RawMode::enable()?;
        let mut list = PickList::new(items, searcher);

        loop {
            {
                let mut frame = vec![vec![
                    Part::Colored("? ", Color::Cyan),
                    Part::Plain(label),
                    Part::Plain(" (type to search): "),
                    Part::Plain(list.query()),
                ]];
                if list.match_count() == 0 {
                    frame.push(vec![Part::Colored("  No results", Color::DarkGrey)]);
                }
                for (name, current) in list.visible() {
                    frame.push(if current {
                        vec![Part::Colored("▸ ", Color::Cyan), Part::Colored(name, Color::Cyan)]
                    } else {
                        vec![Part::Plain("  "), Part::Plain(name)]
                    });
                }
                self.redraw(&frame)?;
            }

            let key = read_key()?;
            if is_interrupt(&key) {
                self.abandon()?;
                return Err(PromptError::Interrupted);
            }

            match key.code {
                KeyCode::Enter => {
                    if let Some(index) = list.selected() {
                        self.finish(label, &items[index])?;
                        return Ok(index);
                    }
                }
                KeyCode::Up => list.up(),
                KeyCode::Down | KeyCode::Tab => list.down(),
                KeyCode::Backspace => list.backspace(),
                _ => {
                    if let Some(c) = is_text(&key) {
                        list.push(c);
                    }
                }
            }
        }
    }

    fn notice(&mut self, message: &str) -> Result<(), PromptError> {
        queue!(self.out, Print(message), Print("\n"))?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn clip_keeps_lines_that_fit() {
        let line = [Part::Colored("? ", Color::Cyan), Part::Plain("Select Station")];
        assert_eq!(clip(&line, 16), line);
        assert_eq!(clip(&line, 80), line);
    }

    #[test]
    fn clip_cuts_long_lines_across_parts() {
        let line = [
            Part::Colored("> ", Color::Cyan),
            Part::Plain("London Kings Cross [KGX]"),
        ];

        assert_eq!(
            clip(&line, 8),
            [Part::Colored("> ", Color::Cyan), Part::Plain("London")]
        );
        assert_eq!(clip(&line, 1), [Part::Colored(">", Color::Cyan)]);
        assert!(clip(&line, 0).is_empty());
    }

    #[test]
    fn clip_counts_characters() {
        let line = [Part::Colored("✔ ", Color::Green), Part::Plain("Gävle Ström")];
        assert_eq!(
            clip(&line, 5),
            [Part::Colored("✔ ", Color::Green), Part::Plain("Gäv")]
        );
    }

    #[test]
    fn escape_and_ctrl_c_interrupt() {
        assert!(is_interrupt(&key(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(is_interrupt(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!is_interrupt(&key(KeyCode::Char('c'), KeyModifiers::NONE)));
    }

    #[test]
    fn control_chords_are_not_text() {
        assert_eq!(is_text(&key(KeyCode::Char('k'), KeyModifiers::NONE)), Some('k'));
        assert_eq!(is_text(&key(KeyCode::Char('K'), KeyModifiers::SHIFT)), Some('K'));
        assert_eq!(is_text(&key(KeyCode::Char('u'), KeyModifiers::CONTROL)), None);
        assert_eq!(is_text(&key(KeyCode::Enter, KeyModifiers::NONE)), None);
    }
}
