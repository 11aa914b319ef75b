//! HTML rendering of an RTF document tree.
//!
//! The renderer walks the tree depth-first, keeping one [`RenderState`] per
//! open group. Text is wrapped in `<span style="...">` elements; a new span
//! is only started when the formatting actually changes, and elements that
//! are closed right after being opened are removed again (an empty paragraph
//! becomes a `<br>`).

use super::node::{ControlSymbol, ControlWord, Group, Node};
use super::picture::Picture;
use super::state::RenderState;
use super::tables::{ColorTable, FontRef, FontTable};
use crate::common::encoding::{CharacterSet, codepage_to_encoding};
use encoding_rs::{Decoder, DecoderResult, Encoding};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// How characters outside ASCII are written to the output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputEncoding {
    /// Numeric character references (`&#233;`)
    #[default]
    HtmlEntities,
    /// Characters written as-is into the UTF-8 output
    Utf8,
}

impl OutputEncoding {
    /// Resolve an encoding label such as `"HTML-ENTITIES"` or `"utf-8"`.
    ///
    /// Labels other than HTML entities and UTF-8 fall back to HTML entities.
    pub fn from_label(label: &str) -> Self {
        if label.eq_ignore_ascii_case("HTML-ENTITIES") {
            return OutputEncoding::HtmlEntities;
        }
        match Encoding::for_label(label.as_bytes()) {
            Some(encoding) if encoding == encoding_rs::UTF_8 => OutputEncoding::Utf8,
            _ => {
                log::warn!("Unsupported output encoding {label:?}, reverting to HTML entities");
                OutputEncoding::HtmlEntities
            },
        }
    }
}

/// HTML renderer options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HtmlOptions {
    /// Font used when none is selected and after `\plain` or `\pard`
    pub default_font: Option<FontRef>,
    /// Output character encoding
    pub encoding: OutputEncoding,
}

/// HTML elements the renderer opens and closes itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Span,
    Paragraph,
}

impl Tag {
    #[inline]
    fn name(self) -> &'static str {
        match self {
            Tag::Span => "span",
            Tag::Paragraph => "p",
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Byte range of an open element's start tag in the output.
#[derive(Debug, Clone, Copy)]
struct OpenTag {
    start: usize,
    end: usize,
}

/// RTF to HTML renderer
pub struct HtmlRenderer {
    /// Renderer options
    options: HtmlOptions,
    /// HTML written so far
    output: String,
    /// Formatting in effect
    state: RenderState,
    /// States of the enclosing groups, innermost last
    saved: SmallVec<[RenderState; 16]>,
    /// State of the most recently opened span
    previous: Option<RenderState>,
    /// Open span and paragraph elements
    open_tags: [Option<OpenTag>; 2],
    /// Font table, once extracted
    fonts: Option<FontTable>,
    /// Color table, once extracted
    colors: Option<ColorTable>,
    /// Encoding declared by `\ansi`, `\mac`, `\pc`, `\pca` or `\ansicpg`
    document_encoding: &'static Encoding,
    /// Decoder carrying a partial multi-byte sequence between `\'hh` escapes
    byte_decoder: Option<Decoder>,
    /// High surrogate waiting for its `\u` partner
    high_surrogate: Option<u32>,
}

impl HtmlRenderer {
    /// Create a renderer with default options.
    pub fn new() -> Self {
        Self::with_options(HtmlOptions::default())
    }

    /// Create a renderer with options.
    pub fn with_options(options: HtmlOptions) -> Self {
        Self {
            state: RenderState::reset(options.default_font),
            options,
            output: String::new(),
            saved: SmallVec::new(),
            previous: None,
            open_tags: [None, None],
            fonts: None,
            colors: None,
            document_encoding: encoding_rs::WINDOWS_1252,
            byte_decoder: None,
            high_surrogate: None,
        }
    }

    /// Render a document tree to an HTML fragment.
    ///
    /// # Examples
    ///
    /// ```
    /// use rtfhtml::rtf::{HtmlRenderer, parse};
    ///
    /// let root = parse(r"{\rtf1 Hello \b world\b0 !}")?;
    /// let html = HtmlRenderer::new().render(&root);
    /// assert_eq!(
    ///     html,
    ///     r#"<p><span>Hello </span><span style="font-weight:bold;">world</span><span>!</span></p>"#
    /// );
    /// # Ok::<(), rtfhtml::rtf::RtfError>(())
    /// ```
    pub fn render(mut self, root: &Group) -> String {
        self.open_tag(Tag::Paragraph, None);
        self.process_group(root);
        self.finish();
        self.output
    }

    fn process_group(&mut self, group: &Group) {
        match group.kind() {
            Some("fonttbl") => {
                if self.fonts.is_none() {
                    self.fonts = Some(FontTable::from_group(group));
                } else {
                    log::debug!("Ignoring repeated font table");
                }
                return;
            },
            Some("colortbl") => {
                if self.colors.is_none() {
                    self.colors = Some(ColorTable::from_group(group));
                } else {
                    log::debug!("Ignoring repeated color table");
                }
                return;
            },
            Some(kind @ ("stylesheet" | "info" | "nonshppict")) => {
                log::debug!("Skipping {kind} group");
                return;
            },
            Some("pict") => {
                self.flush_pending();
                let tag = Picture::from_group(group).to_img_tag();
                self.output.push_str(&tag);
                return;
            },
            Some("*") => {
                self.process_destination(group);
                return;
            },
            _ => {},
        }

        self.saved.push(self.state);
        for child in &group.children {
            self.format_entry(child);
        }
        self.flush_pending();
        if let Some(state) = self.saved.pop() {
            self.state = state;
        }
    }

    /// Only Word 97 pictures (`{\*\shppict ...}`) are rendered from
    /// destinations; everything else is skipped.
    fn process_destination(&mut self, group: &Group) {
        match group.children.get(1) {
            Some(Node::ControlWord(word)) if word.word == "shppict" => {
                for child in &group.children[2..] {
                    self.format_entry(child);
                }
            },
            Some(Node::ControlWord(word)) => log::debug!("Skipping destination \\{}", word.word),
            _ => log::debug!("Skipping unnamed destination"),
        }
    }

    fn format_entry(&mut self, entry: &Node) {
        match entry {
            Node::Group(group) => {
                self.flush_pending();
                self.process_group(group);
            },
            Node::ControlWord(word) => {
                if word.word != "u" {
                    self.flush_surrogate();
                }
                self.flush_bytes();
                self.format_control_word(word);
            },
            Node::ControlSymbol(symbol) => {
                self.flush_surrogate();
                if symbol.symbol != '\'' {
                    self.flush_bytes();
                }
                self.format_control_symbol(symbol);
            },
            Node::Text(text) => {
                self.flush_pending();
                let escaped = self.escape(&text.text);
                self.write(&escaped);
            },
        }
    }

    fn format_control_word(&mut self, word: &ControlWord) {
        let parameter = word.parameter;
        let on = parameter != 0;
        let default_font = self.options.default_font;
        let state = &mut self.state;

        match word.word.as_str() {
            "plain" | "pard" => *state = RenderState::reset(default_font),
            "b" => state.bold = on,
            "i" => state.italic = on,
            "ul" => state.underline = on,
            "ulnone" => state.underline = false,
            "strike" => state.strike = on,
            "v" => state.hidden = on,
            "fs" => state.fontsize = RenderState::scale_font_size(parameter),
            "f" => state.font = Some(parameter),
            "cf" => state.foreground = Some(parameter),
            "cb" => state.background = Some(parameter),
            "highlight" => state.highlight = Some(parameter),

            "par" => {
                self.close_tags();
                self.open_tag(Tag::Paragraph, None);
            },
            "line" => self.write("<br>"),
            "tab" => self.write("&#9;"),
            "lquote" => self.write("&lsquo;"),
            "rquote" => self.write("&rsquo;"),
            "ldblquote" => self.write("&ldquo;"),
            "rdblquote" => self.write("&rdquo;"),
            "emdash" => self.write("&mdash;"),
            "endash" => self.write("&ndash;"),
            "bullet" => self.write("&bull;"),
            "emspace" => self.write("&emsp;"),
            "enspace" => self.write("&ensp;"),

            "u" => self.write_unicode(parameter),

            "ansicpg" => match codepage_to_encoding(parameter) {
                Some(encoding) => self.document_encoding = encoding,
                None => log::warn!("Unknown or unsupported code page: {parameter}"),
            },
            other => {
                if let Some(charset) = CharacterSet::from_control_word(other) {
                    match codepage_to_encoding(charset.codepage()) {
                        Some(encoding) => self.document_encoding = encoding,
                        None => log::warn!("Unsupported document character set: {charset:?}"),
                    }
                }
            },
        }
    }

    fn format_control_symbol(&mut self, symbol: &ControlSymbol) {
        match symbol.symbol {
            '\'' => self.write_byte(symbol.parameter as u8),
            '~' => self.write("&nbsp;"),
            '-' => self.write("&#173;"),
            '_' => self.write("&#8209;"),
            _ => {},
        }
    }

    /// Write a `\uN` code point, pairing UTF-16 surrogates.
    fn write_unicode(&mut self, code: i32) {
        let Ok(code) = u32::try_from(code) else {
            self.write_char(char::REPLACEMENT_CHARACTER);
            return;
        };

        match code {
            0xD800..=0xDBFF => {
                self.flush_surrogate();
                self.high_surrogate = Some(code);
            },
            0xDC00..=0xDFFF => match self.high_surrogate.take() {
                Some(high) => {
                    let combined = 0x10000 + ((high - 0xD800) << 10) + (code - 0xDC00);
                    self.write_char(char::from_u32(combined).unwrap_or(char::REPLACEMENT_CHARACTER));
                },
                None => self.write_char(char::REPLACEMENT_CHARACTER),
            },
            _ => {
                self.flush_surrogate();
                self.write_char(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            },
        }
    }

    /// Write a `\'hh` byte decoded through the active font's encoding.
    fn write_byte(&mut self, byte: u8) {
        let encoding = self.source_encoding();
        if self
            .byte_decoder
            .as_ref()
            .is_some_and(|decoder| decoder.encoding() != encoding)
        {
            self.flush_bytes();
        }

        let mut decoder = self
            .byte_decoder
            .take()
            .unwrap_or_else(|| encoding.new_decoder_without_bom_handling());
        let decoded = decode_into_string(&mut decoder, &[byte], false);
        self.byte_decoder = Some(decoder);

        for ch in decoded.chars() {
            self.write_char(ch);
        }
    }

    /// Encoding of `\'hh` bytes: the active font's code page or charset,
    /// else the document character set.
    fn source_encoding(&self) -> &'static Encoding {
        self.state
            .font
            .and_then(|font| self.fonts.as_ref()?.get(font))
            .and_then(|font| font.encoding())
            .unwrap_or(self.document_encoding)
    }

    fn flush_pending(&mut self) {
        self.flush_surrogate();
        self.flush_bytes();
    }

    /// Emit a high surrogate that never met its low half.
    fn flush_surrogate(&mut self) {
        if self.high_surrogate.take().is_some() {
            log::debug!("Unpaired high surrogate in \\u sequence");
            self.write_char(char::REPLACEMENT_CHARACTER);
        }
    }

    /// Terminate a pending multi-byte sequence.
    fn flush_bytes(&mut self) {
        if let Some(mut decoder) = self.byte_decoder.take() {
            let decoded = decode_into_string(&mut decoder, &[], true);
            for ch in decoded.chars() {
                self.write_char(ch);
            }
        }
    }

    fn write_char(&mut self, ch: char) {
        let mut buffer = [0u8; 4];
        let escaped = self.escape(ch.encode_utf8(&mut buffer));
        self.write(&escaped);
    }

    /// Escape text for HTML in the configured output encoding.
    fn escape(&self, text: &str) -> String {
        let mut escaped = String::with_capacity(text.len());
        for ch in text.chars() {
            match ch {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&#39;"),
                _ if ch.is_ascii() || self.options.encoding == OutputEncoding::Utf8 => {
                    escaped.push(ch)
                },
                _ => push_numeric_reference(&mut escaped, ch as u32),
            }
        }
        escaped
    }

    /// Append already-escaped HTML, opening a new span first if the
    /// formatting changed since the last one.
    fn write(&mut self, html: &str) {
        let state = self.state;
        if self.previous != Some(state) || self.open_tags[Tag::Span.index()].is_none() {
            self.close_tag(Tag::Span);

            let style = state.css(
                self.fonts.as_ref().unwrap_or(&FontTable::default()),
                self.colors.as_ref().unwrap_or(&ColorTable::default()),
            );
            self.previous = Some(state);

            let attr = (!style.is_empty()).then(|| format!("style=\"{style}\""));
            self.open_tag(Tag::Span, attr.as_deref());
        }
        self.output.push_str(html);
    }

    fn open_tag(&mut self, tag: Tag, attr: Option<&str>) {
        let start = self.output.len();
        self.output.push('<');
        self.output.push_str(tag.name());
        if let Some(attr) = attr {
            self.output.push(' ');
            self.output.push_str(attr);
        }
        self.output.push('>');
        self.open_tags[tag.index()] = Some(OpenTag {
            start,
            end: self.output.len(),
        });
    }

    /// Close an open element. An element with nothing written since its
    /// start tag is removed; an empty paragraph becomes `<br>`.
    fn close_tag(&mut self, tag: Tag) {
        let Some(open) = self.open_tags[tag.index()].take() else {
            return;
        };

        if self.output.len() == open.end {
            self.output.truncate(open.start);
            if tag == Tag::Paragraph {
                self.output.push_str("<br>");
            }
        } else {
            self.output.push_str("</");
            self.output.push_str(tag.name());
            self.output.push('>');
        }
    }

    fn close_tags(&mut self) {
        self.close_tag(Tag::Span);
        self.close_tag(Tag::Paragraph);
    }

    /// Close the last paragraph, dropping it if it was opened by a final
    /// `\par` and never written to.
    fn finish(&mut self) {
        self.flush_pending();
        self.close_tag(Tag::Span);

        match self.open_tags[Tag::Paragraph.index()] {
            Some(open) if self.output.len() == open.end => {
                self.output.truncate(open.start);
                self.open_tags[Tag::Paragraph.index()] = None;
            },
            _ => self.close_tag(Tag::Paragraph),
        }
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a document tree with the given options.
pub fn render(root: &Group, options: &HtmlOptions) -> String {
    HtmlRenderer::with_options(options.clone()).render(root)
}

fn push_numeric_reference(out: &mut String, code: u32) {
    let mut buffer = itoa::Buffer::new();
    out.push_str("&#");
    out.push_str(buffer.format(code));
    out.push(';');
}

/// Run bytes through a streaming decoder, replacing malformed sequences
/// with U+FFFD.
fn decode_into_string(decoder: &mut Decoder, mut src: &[u8], last: bool) -> String {
    let mut out = String::new();
    loop {
        let needed = decoder
            .max_utf8_buffer_length_without_replacement(src.len())
            .unwrap_or(16);
        out.reserve(needed.max(4));

        let (result, read) = decoder.decode_to_string_without_replacement(src, &mut out, last);
        src = &src[read..];
        match result {
            DecoderResult::InputEmpty => return out,
            DecoderResult::OutputFull => {},
            DecoderResult::Malformed(_, _) => out.push(char::REPLACEMENT_CHARACTER),
        }
    }
}
