//! rtfhtml - Convert Rich Text Format (RTF) documents to HTML
//!
//! This library parses RTF documents into a tree of groups, control words,
//! control symbols and text, and renders that tree as an HTML fragment.
//!
//! # Features
//!
//! - **Strict parsing**: Malformed input fails as a whole, never with a partial tree
//! - **Character formatting**: Bold, italic, underline, strike, hidden text,
//!   font family and size, foreground, background and highlight colors
//! - **Encodings**: `\'hh` escapes decoded through font charsets, code pages
//!   and the document character set; `\uN` escapes with `\ucN` fallback skipping
//! - **Pictures**: Embedded hex pictures re-encoded as base64 `data:` URIs
//!
//! # Example
//!
//! ```
//! use rtfhtml::{HtmlOptions, rtf_to_html};
//!
//! let html = rtf_to_html(r"{\rtf1\ansi Hello {\b bold} world\par}", &HtmlOptions::default())?;
//! assert_eq!(
//!     html,
//!     r#"<p><span>Hello </span><span style="font-weight:bold;">bold</span><span> world</span></p>"#
//! );
//! # Ok::<(), rtfhtml::rtf::RtfError>(())
//! ```
//!
//! # Example - Converting a file
//!
//! ```no_run
//! use rtfhtml::RtfDocument;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let doc = RtfDocument::open("document.rtf")?;
//! println!("{}", doc.to_html());
//! # Ok(())
//! # }
//! ```

/// Common types and utilities shared across the crate
pub mod common;

/// RTF parsing and HTML rendering
pub mod rtf;

// Re-export commonly used types for convenience
pub use common::{Error, Result};
pub use rtf::{HtmlOptions, OutputEncoding, RtfDocument, RtfError, RtfResult};

/// Convert an RTF document to an HTML fragment.
///
/// Returns an error, and no output, if the document is malformed.
pub fn rtf_to_html(input: &str, options: &HtmlOptions) -> RtfResult<String> {
    let root = rtf::parse(input)?;
    Ok(rtf::render(&root, options))
}
