//! RTF (Rich Text Format) to HTML conversion.
//!
//! Conversion runs in two stages. The parser turns the input into a tree of
//! groups, control words, control symbols and text runs, failing as a whole
//! on malformed input. The renderer then walks the tree, extracting the font
//! and color tables as it meets them, and writes an HTML fragment made of
//! `<p>`, `<span style="...">`, `<br>` and `<img>` elements.
//!
//! # Architecture
//!
//! - **Parser**: Builds the document tree from the input text
//! - **Tables**: Font and color tables referenced by `\fN`, `\cfN` and `\cbN`
//! - **Renderer**: Tracks formatting state per group and writes HTML
//! - **Picture**: Turns `{\pict ...}` groups into `<img>` elements
//!
//! # Example
//!
//! ```rust
//! use rtfhtml::rtf::RtfDocument;
//!
//! let rtf_text = r#"{\rtf1\ansi{\fonttbl\f0\fswiss Helvetica;}\f0\pard Hello World!\par}"#;
//! let doc = RtfDocument::parse(rtf_text)?;
//! let html = doc.to_html();
//! assert!(html.contains("Hello World!"));
//! # Ok::<(), rtfhtml::rtf::RtfError>(())
//! ```

mod cursor;
mod document;
mod error;
mod html;
mod node;
mod parser;
mod picture;
mod state;
mod tables;

// Re-exports
pub use document::RtfDocument;
pub use error::{RtfError, RtfResult};
pub use html::{HtmlOptions, HtmlRenderer, OutputEncoding, render};
pub use node::{ControlSymbol, ControlWord, Group, Node, Text};
pub use parser::{Parser, parse};
pub use picture::{ImageType, Picture, detect_image_type};
pub use state::{RenderState, highlight_color};
pub use tables::{Color, ColorEntry, ColorRef, ColorTable, Font, FontFamily, FontRef, FontTable};
