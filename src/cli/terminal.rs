//! Coloured status lines for command output

use owo_colors::{colors::css, OwoColorize};
use supports_color::Stream;

#[derive(Debug, Clone, Copy)]
enum Tone {
    Success,
    Warning,
    Error,
    Dim,
}

fn paint(text: &str, tone: Tone) -> String {
    if supports_color::on(Stream::Stdout).is_none() {
        return text.to_string();
    }
    match tone {
        Tone::Success => text.fg::<css::SeaGreen>().to_string(),
        Tone::Warning => text.fg::<css::Orange>().to_string(),
        Tone::Error => text.fg::<css::Crimson>().to_string(),
        Tone::Dim => text.dimmed().to_string(),
    }
}

/// Status colouring for lines of command output.
///
/// Colour is dropped when stdout is not a colour-capable terminal, so
/// redirected output stays plain.
pub trait Colorize {
    /// A completed step.
    fn success(&self) -> String;
    /// A skipped collection or something that needs review.
    fn warning(&self) -> String;
    /// A failed check.
    fn error(&self) -> String;
    /// Secondary detail.
    fn dim(&self) -> String;
}

impl<T: AsRef<str> + ?Sized> Colorize for T {
    fn success(&self) -> String {
        paint(self.as_ref(), Tone::Success)
    }

    fn warning(&self) -> String {
        paint(self.as_ref(), Tone::Warning)
    }

    fn error(&self) -> String {
        paint(self.as_ref(), Tone::Error)
    }

    fn dim(&self) -> String {
        paint(self.as_ref(), Tone::Dim)
    }
}
