//! Styled text and the terminal output capability.
//!
//! Rendering produces `StyledText`: lines of spans tagged with a `Style`.
//! Nothing here touches the terminal except `TerminalEmitter`, which turns
//! the tags into ANSI sequences with crossterm.

use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};

/// Colors and weight for a span of text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Style {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
}

impl Style {
    pub const PLAIN: Style = Style {
        fg: None,
        bg: None,
        bold: false,
    };

    /// Foreground color only.
    pub const fn fg(color: Color) -> Self {
        Style {
            fg: Some(color),
            bg: None,
            bold: false,
        }
    }

    /// The same style on a background color.
    pub const fn on(self, color: Color) -> Self {
        Style {
            bg: Some(color),
            ..self
        }
    }

    pub const fn bold(self) -> Self {
        Style { bold: true, ..self }
    }

    pub fn is_plain(&self) -> bool {
        *self == Self::PLAIN
    }
}

/// A run of text with one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: Style,
}

impl Span {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Style::PLAIN)
    }
}

/// One output line. The newline is implied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    pub spans: Vec<Span>,
}

impl Line {
    pub fn new(spans: Vec<Span>) -> Self {
        Self { spans }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(vec![Span::plain(text)])
    }

    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self::new(vec![Span::new(text, style)])
    }

    /// The line's text without styling.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// A block of styled lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledText {
    pub lines: Vec<Line>,
}

impl StyledText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: Line) {
        self.lines.push(line);
    }

    pub fn append(&mut self, other: StyledText) {
        self.lines.extend(other.lines);
    }

    /// The text without styling, one `\n` after every line.
    pub fn to_plain(&self) -> String {
        self.lines.iter().fold(String::new(), |mut out, line| {
            out.push_str(&line.text());
            out.push('\n');
            out
        })
    }
}

impl From<Line> for StyledText {
    fn from(line: Line) -> Self {
        Self { lines: vec![line] }
    }
}

/// Somewhere styled text can be shown.
pub trait Emit {
    fn emit(&mut self, text: &StyledText) -> io::Result<()>;
}

/// Writes styled text as ANSI-colored output.
#[derive(Debug)]
pub struct TerminalEmitter<W: Write> {
    out: W,
}

impl TerminalEmitter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalEmitter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_span(&mut self, span: &Span) -> io::Result<()> {
        if span.style.is_plain() {
            return queue!(self.out, Print(&span.text));
        }

        if let Some(fg) = span.style.fg {
            queue!(self.out, SetForegroundColor(fg))?;
        }
        if let Some(bg) = span.style.bg {
            queue!(self.out, SetBackgroundColor(bg))?;
        }
        if span.style.bold {
            queue!(self.out, SetAttribute(Attribute::Bold))?;
        }
        queue!(
            self.out,
            Print(&span.text),
            SetAttribute(Attribute::Reset),
            ResetColor
        )
    }
}

impl<W: Write> Emit for TerminalEmitter<W> {
    fn emit(&mut self, text: &StyledText) -> io::Result<()> {
        for line in &text.lines {
            for span in &line.spans {
                self.write_span(span)?;
            }
            queue!(self.out, Print("\n"))?;
        }
        self.out.flush()
    }
}
