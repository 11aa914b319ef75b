//! RTF document entry point.

use super::error::RtfResult;
use super::html::{HtmlOptions, HtmlRenderer};
use super::node::Group;
use super::parser::parse;
use std::borrow::Cow;
use std::path::Path;

/// RTF Document.
///
/// Holds the parsed document tree and renders it to HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtfDocument {
    root: Group,
}

impl RtfDocument {
    /// Parse an RTF document from a string.
    ///
    /// # Examples
    ///
    /// ```
    /// use rtfhtml::rtf::RtfDocument;
    ///
    /// let doc = RtfDocument::parse(r"{\rtf1\ansi Hello World!}")?;
    /// assert_eq!(doc.to_html(), "<p><span>Hello World!</span></p>");
    /// # Ok::<(), rtfhtml::rtf::RtfError>(())
    /// ```
    pub fn parse(input: &str) -> RtfResult<Self> {
        Ok(Self { root: parse(input)? })
    }

    /// Parse an RTF document from bytes.
    ///
    /// RTF is 7-bit text, but stray 8-bit bytes do occur; input that is
    /// not valid UTF-8 is read as Windows-1252.
    pub fn from_bytes(bytes: &[u8]) -> RtfResult<Self> {
        let text = match std::str::from_utf8(bytes) {
            Ok(text) => Cow::Borrowed(text),
            Err(_) => {
                log::debug!("Input is not UTF-8, decoding as windows-1252");
                let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
                text
            },
        };
        Self::parse(&text)
    }

    /// Parse an RTF document from a file.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use rtfhtml::rtf::RtfDocument;
    ///
    /// let doc = RtfDocument::open("document.rtf")?;
    /// let html = doc.to_html();
    /// # Ok::<(), rtfhtml::common::Error>(())
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> crate::common::Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(Self::from_bytes(&bytes)?)
    }

    /// Root group of the document tree.
    #[inline]
    pub fn root(&self) -> &Group {
        &self.root
    }

    /// Render the document to HTML with default options.
    pub fn to_html(&self) -> String {
        HtmlRenderer::new().render(&self.root)
    }

    /// Render the document to HTML.
    pub fn to_html_with(&self, options: &HtmlOptions) -> String {
        HtmlRenderer::with_options(options.clone()).render(&self.root)
    }
}

impl From<Group> for RtfDocument {
    fn from(root: Group) -> Self {
        Self { root }
    }
}
