//! Text measurement and wrapping.
//!
//! Reports are set in a single bundled font, DejaVu Sans, which covers the
//! Latin Extended ranges used in client names and notes. The same font data
//! is measured here with cosmic-text and embedded by the PDF exporter, so
//! wrapped lines fit the width they are laid out in regardless of which
//! fonts happen to be installed.

use std::sync::{Mutex, OnceLock, PoisonError};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, fontdb};
use log::info;

/// Millimetres per typographic point.
pub const PT_TO_MM: f32 = 25.4 / 72.0;

/// Family name of the bundled report font.
pub const FONT_FAMILY: &str = "DejaVu Sans";

/// TrueType data of the bundled report font.
pub(crate) static FONT_DATA: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

static TEXT_MEASURER: OnceLock<TextMeasurer> = OnceLock::new();

/// Shapes text against a font system that only knows the bundled font.
struct TextMeasurer {
    font_system: Mutex<FontSystem>,
}

impl TextMeasurer {
    fn new() -> Self {
        info!(family = FONT_FAMILY; "Initializing FontSystem");
        let mut db = fontdb::Database::new();
        db.load_font_data(FONT_DATA.to_vec());
        Self {
            font_system: Mutex::new(FontSystem::new_with_locale_and_db("en-US".to_string(), db)),
        }
    }

    /// Advance width of a single line of `text` in points.
    fn width_pt(&self, text: &str, font_size: f32) -> f32 {
        if text.is_empty() {
            return 0.0;
        }

        let mut font_system = self
            .font_system
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // Points are used as layout units, so the advances come back in points
        let metrics = Metrics::new(font_size, font_size * 1.15);
        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);

        let attrs = Attrs::new().family(Family::Name(FONT_FAMILY));
        buffer.set_size(None, None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        buffer
            .layout_runs()
            .filter_map(|run| run.glyphs.last().map(|last| last.x + last.w))
            .fold(0.0, f32::max)
    }
}

/// Width of `text` set at `font_size` points in the report font, in millimetres.
pub fn text_width(text: &str, font_size: f32) -> f32 {
    TEXT_MEASURER
        .get_or_init(TextMeasurer::new)
        .width_pt(text, font_size)
        * PT_TO_MM
}

/// Distance between baselines, in millimetres.
pub fn line_height(font_size: f32, factor: f32) -> f32 {
    font_size * PT_TO_MM * factor
}

/// Breaks `text` into lines no wider than `max_width` millimetres.
///
/// Explicit newlines always start a new line. Within a paragraph words are
/// packed greedily and words that do not fit on a line of their own are
/// split between characters. Always returns at least one line.
pub fn wrap(text: &str, font_size: f32, max_width: f32) -> Vec<String> {
    let fits = |candidate: &str| text_width(candidate, font_size) <= max_width;
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();

        for word in paragraph.split_whitespace() {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{line} {word}")
            };
            if fits(&candidate) {
                line = candidate;
                continue;
            }

            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if fits(word) {
                line = word.to_string();
                continue;
            }

            // Hard break; every piece keeps at least one character
            for ch in word.chars() {
                line.push(ch);
                if line.chars().count() > 1 && !fits(&line) {
                    line.pop();
                    lines.push(std::mem::replace(&mut line, ch.to_string()));
                }
            }
        }
        lines.push(line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
