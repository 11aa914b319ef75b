//! Font and color tables.
//!
//! Both tables are built from their header groups (`{\fonttbl ...}` and
//! `{\colortbl ...}`) the first time the renderer meets them, and are only
//! read afterwards.

use super::node::{ControlWord, Group, Node};
use crate::common::encoding::{charset_to_encoding, codepage_to_encoding};
use encoding_rs::Encoding;
use std::collections::HashMap;

/// Font reference (the `N` of `\fN`).
pub type FontRef = i32;

/// Color reference (index into the color table).
pub type ColorRef = i32;

/// Font family categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontFamily {
    /// Nil (unknown or default)
    #[default]
    Nil,
    /// Roman (serif) fonts
    Roman,
    /// Swiss (sans-serif) fonts
    Swiss,
    /// Modern (monospace) fonts
    Modern,
    /// Script fonts
    Script,
    /// Decorative fonts
    Decor,
}

impl FontFamily {
    /// Parse a font family control word (`\froman`, `\fswiss`, ...).
    pub fn from_control_word(word: &str) -> Option<Self> {
        match word {
            "fnil" => Some(FontFamily::Nil),
            "froman" => Some(FontFamily::Roman),
            "fswiss" => Some(FontFamily::Swiss),
            "fmodern" => Some(FontFamily::Modern),
            "fscript" => Some(FontFamily::Script),
            "fdecor" => Some(FontFamily::Decor),
            _ => None,
        }
    }

    /// CSS generic family name, if the family maps to one.
    pub fn css_generic(self) -> Option<&'static str> {
        match self {
            FontFamily::Nil => None,
            FontFamily::Roman => Some("serif"),
            FontFamily::Swiss => Some("sans-serif"),
            FontFamily::Modern => Some("monospace"),
            FontFamily::Script => Some("cursive"),
            FontFamily::Decor => Some("fantasy"),
        }
    }
}

/// Font definition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Font {
    /// Font name, without the trailing `;`
    pub name: String,
    /// Font family category
    pub family: FontFamily,
    /// Encoding implied by `\fcharsetN`
    pub charset: Option<&'static Encoding>,
    /// Encoding implied by `\cpgN`
    pub codepage: Option<&'static Encoding>,
    /// Pitch from `\fprqN`
    pub pitch: Option<i32>,
}

impl Font {
    /// Encoding used to decode `\'hh` bytes written in this font.
    ///
    /// An explicit code page wins over the charset.
    #[inline]
    pub fn encoding(&self) -> Option<&'static Encoding> {
        self.codepage.or(self.charset)
    }
}

/// Font table containing document fonts.
#[derive(Debug, Clone, Default)]
pub struct FontTable {
    fonts: HashMap<FontRef, Font>,
}

impl FontTable {
    /// Create an empty font table.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the font table from a `{\fonttbl ...}` group.
    ///
    /// Both the grouped form (`{\fonttbl{\f0 Arial;}{\f1 Courier;}}`) and
    /// the flat form (`{\fonttbl\f0\fswiss Helvetica;}`) are accepted.
    /// Groups nested inside an entry (`{\*\panose ...}`) are skipped.
    pub fn from_group(group: &Group) -> Self {
        let mut table = Self::new();
        let mut flat = FontEntry::default();

        for child in group.children.iter().skip(1) {
            match child {
                Node::Group(definition) => {
                    let mut entry = FontEntry::default();
                    for node in &definition.children {
                        entry.feed(node, &mut table);
                    }
                    entry.finish(&mut table);
                },
                other => flat.feed(other, &mut table),
            }
        }
        flat.finish(&mut table);

        table
    }

    /// Add or replace a font.
    #[inline]
    pub fn insert(&mut self, font_ref: FontRef, font: Font) {
        self.fonts.insert(font_ref, font);
    }

    /// Get a font by reference.
    #[inline]
    pub fn get(&self, font_ref: FontRef) -> Option<&Font> {
        self.fonts.get(&font_ref)
    }

    /// Number of fonts in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    /// Whether the table is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

/// Font definition being accumulated from a font table.
#[derive(Default)]
struct FontEntry {
    current: Option<(FontRef, Font)>,
    raw_name: String,
}

impl FontEntry {
    fn feed(&mut self, node: &Node, table: &mut FontTable) {
        match node {
            Node::ControlWord(word) => self.apply(word, table),
            Node::Text(text) => self.raw_name.push_str(&text.text),
            Node::Group(_) | Node::ControlSymbol(_) => {},
        }
    }

    fn apply(&mut self, word: &ControlWord, table: &mut FontTable) {
        if word.word == "f" {
            self.finish(table);
            self.current = Some((word.parameter, Font::default()));
            return;
        }

        let Some((_, font)) = self.current.as_mut() else {
            return;
        };
        if let Some(family) = FontFamily::from_control_word(&word.word) {
            font.family = family;
            return;
        }
        match word.word.as_str() {
            "fcharset" => {
                font.charset = charset_to_encoding(word.parameter);
                if font.charset.is_none() {
                    log::warn!("Unknown or unsupported font charset: {}", word.parameter);
                }
            },
            "cpg" => {
                font.codepage = codepage_to_encoding(word.parameter);
                if font.codepage.is_none() {
                    log::warn!("Unknown or unsupported code page: {}", word.parameter);
                }
            },
            "fprq" => font.pitch = Some(word.parameter),
            _ => {},
        }
    }

    fn finish(&mut self, table: &mut FontTable) {
        let raw_name = std::mem::take(&mut self.raw_name);
        if let Some((font_ref, mut font)) = self.current.take() {
            font.name = raw_name.trim().trim_end_matches(';').trim_end().to_string();
            table.insert(font_ref, font);
        }
    }
}

/// RTF color representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    /// Red component (0-255)
    pub red: u8,
    /// Green component (0-255)
    pub green: u8,
    /// Blue component (0-255)
    pub blue: u8,
}

impl Color {
    /// Create a new color.
    #[inline]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// CSS hex notation, e.g. `#ff8000`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

/// Entry of the color table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorEntry {
    /// The reader's default color (an entry with no components)
    Auto,
    /// An explicit RGB color
    Rgb(Color),
}

/// Color table containing document colors.
#[derive(Debug, Clone, Default)]
pub struct ColorTable {
    colors: Vec<ColorEntry>,
}

impl ColorTable {
    /// Create an empty color table.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the color table from a `{\colortbl ...}` group.
    ///
    /// Each `;` ends an entry. An entry without `\red`, `\green` or `\blue`
    /// is the automatic color, conventionally found at index 0.
    pub fn from_group(group: &Group) -> Self {
        let mut table = Self::new();
        let mut color = Color::default();
        let mut has_components = false;

        for child in group.children.iter().skip(1) {
            match child {
                Node::ControlWord(word) => {
                    let component = word.parameter.clamp(0, 255) as u8;
                    match word.word.as_str() {
                        "red" => color.red = component,
                        "green" => color.green = component,
                        "blue" => color.blue = component,
                        _ => continue,
                    }
                    has_components = true;
                },
                Node::Text(text) => {
                    for _ in text.text.matches(';') {
                        table.colors.push(if has_components {
                            ColorEntry::Rgb(color)
                        } else {
                            ColorEntry::Auto
                        });
                        color = Color::default();
                        has_components = false;
                    }
                },
                Node::Group(_) | Node::ControlSymbol(_) => {},
            }
        }

        table
    }

    /// Get an entry by reference.
    #[inline]
    pub fn entry(&self, color_ref: ColorRef) -> Option<ColorEntry> {
        usize::try_from(color_ref)
            .ok()
            .and_then(|index| self.colors.get(index).copied())
    }

    /// Get an explicit color by reference; the automatic color resolves to
    /// `None`.
    #[inline]
    pub fn get(&self, color_ref: ColorRef) -> Option<Color> {
        match self.entry(color_ref)? {
            ColorEntry::Rgb(color) => Some(color),
            ColorEntry::Auto => None,
        }
    }

    /// Number of entries, including the automatic color.
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the table is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
