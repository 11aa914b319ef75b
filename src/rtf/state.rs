//! Character formatting state tracked while rendering.
//!
//! The renderer keeps one [`RenderState`] per open group. Entering a group
//! copies the enclosing state; leaving it restores the enclosing one.

use super::tables::{ColorRef, ColorTable, FontRef, FontTable};
use phf::phf_map;
use std::fmt::Write as _;

/// Named colors selectable with `\highlightN`.
static HIGHLIGHT_COLORS: phf::Map<i32, &'static str> = phf_map! {
    1i32 => "Black",
    2i32 => "Blue",
    3i32 => "Cyan",
    4i32 => "Green",
    5i32 => "Magenta",
    6i32 => "Red",
    7i32 => "Yellow",
    9i32 => "DarkBlue",
    10i32 => "DarkCyan",
    11i32 => "DarkGreen",
    12i32 => "DarkMagenta",
    13i32 => "DarkRed",
    14i32 => "DarkYellow",
    15i32 => "DarkGray",
    16i32 => "LightGray",
};

/// Resolve a `\highlightN` palette index to a CSS color name.
///
/// Index 0 (no highlight) and the unused index 8 resolve to `None`.
#[inline]
pub fn highlight_color(index: i32) -> Option<&'static str> {
    HIGHLIGHT_COLORS.get(&index).copied()
}

/// Character formatting in effect at a point of the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderState {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
    /// Hidden text (`\v`)
    pub hidden: bool,
    /// Font size in pixels; 0 when never set
    pub fontsize: i32,
    /// Active font (`\fN`)
    pub font: Option<FontRef>,
    /// Foreground color (`\cfN`)
    pub foreground: Option<ColorRef>,
    /// Background color (`\cbN`)
    pub background: Option<ColorRef>,
    /// Highlight palette index (`\highlightN`)
    pub highlight: Option<i32>,
}

impl RenderState {
    /// A state with every property at its default and the given font.
    #[inline]
    pub fn reset(default_font: Option<FontRef>) -> Self {
        Self {
            font: default_font,
            ..Self::default()
        }
    }

    /// Convert an `\fsN` value (half-points) to the pixel-like size unit.
    #[inline]
    pub fn scale_font_size(half_points: i32) -> i32 {
        (f64::from(half_points) / 24.0 * 16.0).ceil() as i32
    }

    /// CSS declarations for this state.
    ///
    /// Font and color references that do not resolve in the tables are
    /// left out.
    pub fn css(&self, fonts: &FontTable, colors: &ColorTable) -> String {
        let mut style = String::new();

        if self.bold {
            style.push_str("font-weight:bold;");
        }
        if self.italic {
            style.push_str("font-style:italic;");
        }
        if self.underline {
            style.push_str("text-decoration:underline;");
        }
        if self.strike {
            style.push_str("text-decoration:line-through;");
        }
        if self.hidden {
            style.push_str("display:none;");
        }
        if let Some(family) = self
            .font
            .and_then(|font| fonts.get(font))
            .and_then(|font| font.family.css_generic())
        {
            let _ = write!(style, "font-family:{family};");
        }
        if self.fontsize != 0 {
            let _ = write!(style, "font-size:{}px;", self.fontsize);
        }
        if let Some(color) = self.foreground.and_then(|c| colors.get(c)) {
            let _ = write!(style, "color:{};", color.to_hex());
        }

        // A background color takes precedence over a highlight
        let background = self
            .background
            .and_then(|c| colors.get(c))
            .map(|color| color.to_hex())
            .or_else(|| {
                self.highlight
                    .and_then(highlight_color)
                    .map(str::to_string)
            });
        if let Some(background) = background {
            let _ = write!(style, "background-color:{background};");
        }

        style
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtf::tables::{Font, FontFamily};
    use crate::rtf::{Node, parse};

    fn colors() -> ColorTable {
        let root = parse(r"{{\colortbl;\red255\green0\blue0;\red0\green0\blue255;}}").unwrap();
        let Some(Node::Group(group)) = root.children.first() else {
            panic!("expected color table");
        };
        ColorTable::from_group(group)
    }

    #[test]
    fn test_reset_keeps_default_font() {
        let state = RenderState::reset(Some(2));
        assert_eq!(state.font, Some(2));
        assert!(!state.bold);
        assert_eq!(state.fontsize, 0);
        assert_eq!(RenderState::reset(None), RenderState::default());
    }

    #[test]
    fn test_equivalence_is_field_by_field() {
        let a = RenderState {
            bold: true,
            font: Some(0),
            ..RenderState::default()
        };
        let mut b = a;
        assert_eq!(a, b);
        b.font = None;
        assert_ne!(a, b);
        b.font = Some(1);
        assert_ne!(a, b);
    }

    #[test]
    fn test_scale_font_size() {
        assert_eq!(RenderState::scale_font_size(24), 16);
        assert_eq!(RenderState::scale_font_size(20), 14);
        assert_eq!(RenderState::scale_font_size(0), 0);
    }

    #[test]
    fn test_css_flags() {
        let state = RenderState {
            bold: true,
            italic: true,
            underline: true,
            strike: true,
            hidden: true,
            ..RenderState::default()
        };
        assert_eq!(
            state.css(&FontTable::new(), &ColorTable::new()),
            "font-weight:bold;font-style:italic;text-decoration:underline;\
             text-decoration:line-through;display:none;"
        );
    }

    #[test]
    fn test_css_font_and_size() {
        let mut fonts = FontTable::new();
        fonts.insert(
            0,
            Font {
                name: "Arial".to_string(),
                family: FontFamily::Swiss,
                ..Font::default()
            },
        );
        let state = RenderState {
            font: Some(0),
            fontsize: 16,
            ..RenderState::default()
        };
        assert_eq!(
            state.css(&fonts, &ColorTable::new()),
            "font-family:sans-serif;font-size:16px;"
        );

        // Unresolved fonts contribute nothing
        let state = RenderState {
            font: Some(7),
            ..RenderState::default()
        };
        assert_eq!(state.css(&fonts, &ColorTable::new()), "");
    }

    #[test]
    fn test_css_colors() {
        let colors = colors();
        let state = RenderState {
            foreground: Some(1),
            background: Some(2),
            highlight: Some(7),
            ..RenderState::default()
        };
        assert_eq!(
            state.css(&FontTable::new(), &colors),
            "color:#ff0000;background-color:#0000ff;"
        );

        let state = RenderState {
            background: Some(0),
            highlight: Some(7),
            ..RenderState::default()
        };
        assert_eq!(
            state.css(&FontTable::new(), &colors),
            "background-color:Yellow;"
        );
    }

    #[test]
    fn test_highlight_palette() {
        assert_eq!(highlight_color(1), Some("Black"));
        assert_eq!(highlight_color(16), Some("LightGray"));
        assert_eq!(highlight_color(8), None);
        assert_eq!(highlight_color(0), None);
    }
}
