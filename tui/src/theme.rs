//! Color theme and glyphs for the triage TUI.
//!
//! Colors follow the Kanagawa Wave palette, with a high-contrast variant
//! and ASCII glyph fallbacks selectable through [`UiOptions`].

use ratatui::style::{Color, Modifier, Style};

use triage_engine::SignStyle;
use triage_types::UiOptions;

/// Kanagawa Wave color constants.
mod colors {
    use super::Color;

    // === Backgrounds (Sumi Ink) ===
    pub const BG_DARK: Color = Color::Rgb(22, 22, 29); // sumiInk0
    pub const BG_HIGHLIGHT: Color = Color::Rgb(42, 42, 55); // sumiInk4

    // === Foregrounds (Fuji) ===
    pub const TEXT_PRIMARY: Color = Color::Rgb(220, 215, 186); // fujiWhite
    pub const TEXT_SECONDARY: Color = Color::Rgb(200, 192, 147); // oldWhite
    pub const TEXT_MUTED: Color = Color::Rgb(114, 113, 105); // fujiGray

    // === Accents ===
    pub const VIOLET: Color = Color::Rgb(149, 127, 184); // oniViolet
    pub const BLUE: Color = Color::Rgb(126, 156, 216); // crystalBlue
    pub const CYAN: Color = Color::Rgb(127, 180, 202); // springBlue
    pub const AQUA: Color = Color::Rgb(122, 168, 159); // waveAqua2
    pub const GREEN: Color = Color::Rgb(152, 187, 108); // springGreen
    pub const YELLOW: Color = Color::Rgb(230, 195, 132); // carpYellow
    pub const PEACH: Color = Color::Rgb(255, 160, 102); // surimiOrange
    pub const RED: Color = Color::Rgb(255, 93, 98); // peachRed
}

/// Resolved color palette for a render pass.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg_dark: Color,
    pub bg_highlight: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub primary: Color,
    pub group: Color,
    pub green: Color,
    pub peach: Color,
    pub error: Color,
    pub warning: Color,
    pub info: Color,
    pub hint: Color,
}

impl Palette {
    fn standard() -> Self {
        Self {
            bg_dark: colors::BG_DARK,
            bg_highlight: colors::BG_HIGHLIGHT,
            text_primary: colors::TEXT_PRIMARY,
            text_secondary: colors::TEXT_SECONDARY,
            text_muted: colors::TEXT_MUTED,
            primary: colors::VIOLET,
            group: colors::BLUE,
            green: colors::GREEN,
            peach: colors::PEACH,
            error: colors::RED,
            warning: colors::YELLOW,
            info: colors::CYAN,
            hint: colors::AQUA,
        }
    }

    fn high_contrast() -> Self {
        Self {
            bg_dark: Color::Black,
            bg_highlight: Color::Rgb(60, 60, 80),
            text_primary: Color::White,
            text_secondary: Color::Rgb(230, 230, 230),
            text_muted: Color::Rgb(170, 170, 170),
            primary: Color::Rgb(187, 154, 247),
            group: Color::Rgb(130, 170, 255),
            green: Color::Rgb(158, 206, 106),
            peach: Color::Rgb(255, 158, 100),
            error: Color::Rgb(255, 85, 85),
            warning: Color::Rgb(224, 175, 104),
            info: Color::Rgb(125, 207, 255),
            hint: Color::Rgb(115, 218, 202),
        }
    }
}

/// Returns the palette matching the user's contrast preference.
#[must_use]
pub fn palette(options: UiOptions) -> Palette {
    if options.high_contrast {
        Palette::high_contrast()
    } else {
        Palette::standard()
    }
}

/// Glyph set used by the renderer. The ASCII variant keeps every cell
/// single-width so layouts line up on terminals without Unicode fonts.
#[derive(Debug, Clone, Copy)]
pub struct Glyphs {
    pub expanded: &'static str,
    pub collapsed: &'static str,
    pub status_ok: &'static str,
    pub status_fail: &'static str,
    pub spinner_frames: &'static [&'static str],
    pub spinner_static: &'static str,
}

const UNICODE_GLYPHS: Glyphs = Glyphs {
    expanded: "\u{25be}",  // ▾
    collapsed: "\u{25b8}", // ▸
    status_ok: "\u{25cf}", // ●
    status_fail: "\u{25cb}", // ○
    spinner_frames: &["\u{280b}", "\u{2819}", "\u{2839}", "\u{2838}", "\u{283c}", "\u{2834}", "\u{2826}", "\u{2827}", "\u{2807}", "\u{280f}"],
    spinner_static: "\u{25cc}", // ◌
};

const ASCII_GLYPHS: Glyphs = Glyphs {
    expanded: "v",
    collapsed: ">",
    status_ok: "*",
    status_fail: "o",
    spinner_frames: &["|", "/", "-", "\\"],
    spinner_static: "*",
};

/// Returns the glyph set matching the user's font preference.
#[must_use]
pub fn glyphs(options: UiOptions) -> &'static Glyphs {
    if options.ascii_only {
        &ASCII_GLYPHS
    } else {
        &UNICODE_GLYPHS
    }
}

// Ticks per spinner frame at the 8ms frame cadence, roughly 100ms each.
const SPINNER_TICK_DIVISOR: usize = 12;

/// Picks the spinner frame for an animation tick. Under reduced motion
/// the spinner holds a single static glyph.
#[must_use]
pub fn spinner_frame(tick: usize, options: UiOptions) -> &'static str {
    let glyphs = glyphs(options);
    if options.reduced_motion {
        return glyphs.spinner_static;
    }
    let frames = glyphs.spinner_frames;
    frames[(tick / SPINNER_TICK_DIVISOR) % frames.len()]
}

/// Maps a diagnostic sign style onto the palette.
#[must_use]
pub fn severity_color(style: SignStyle, palette: &Palette) -> Color {
    match style {
        SignStyle::Error => palette.error,
        SignStyle::Warn => palette.warning,
        SignStyle::Info => palette.info,
        SignStyle::Hint => palette.hint,
        SignStyle::Default => palette.text_secondary,
    }
}

/// Reusable style constructors shared across panels.
pub mod styles {
    use super::{Modifier, Palette, Style};

    #[must_use]
    pub fn key_highlight(palette: &Palette) -> Style {
        Style::default().fg(palette.peach).add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_hint(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
