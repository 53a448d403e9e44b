//! Colored status markers and layout hints for command output

use owo_colors::{Color, OwoColorize, colors::css};

/// Whether stdout should receive ANSI colors
fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Whether the terminal is too narrow (< 60 columns) for tabular output
pub fn is_narrow() -> bool {
    terminal_size::terminal_size().is_some_and(|(width, _)| width.0 < 60)
}

fn paint<C: Color>(text: &str) -> String {
    if supports_color() {
        text.fg::<C>().to_string()
    } else {
        text.to_string()
    }
}

/// Extension trait for colorizing report lines
pub trait Colorize {
    /// A section imported, a file that parsed (green)
    fn success(&self) -> String;
    /// Something would change (amber)
    fn warning(&self) -> String;
    /// A failure that blocks the merge (red)
    fn error(&self) -> String;
    /// Summary lines (blue)
    fn info(&self) -> String;
    /// Secondary detail
    fn dim(&self) -> String;
}

impl<T: AsRef<str> + ?Sized> Colorize for T {
    fn success(&self) -> String {
        paint::<css::Green>(self.as_ref())
    }

    fn warning(&self) -> String {
        paint::<css::Orange>(self.as_ref())
    }

    fn error(&self) -> String {
        paint::<css::Red>(self.as_ref())
    }

    fn info(&self) -> String {
        paint::<css::LightBlue>(self.as_ref())
    }

    fn dim(&self) -> String {
        let text = self.as_ref();
        if supports_color() {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_keep_their_text() {
        let marker = String::from("✓");
        for painted in [
            marker.success(),
            "!".warning(),
            "✗".error(),
            "3 source(s) ready".info(),
            marker.dim(),
        ] {
            assert!(["✓", "!", "✗", "3 source(s) ready"]
                .iter()
                .any(|text| painted.contains(text)));
        }
    }

    #[test]
    fn plain_text_without_color_support() {
        if !supports_color() {
            assert_eq!("from runtime (NOTICE.txt)".dim(), "from runtime (NOTICE.txt)");
            assert_eq!("✗".error(), "✗");
        }
    }
}
