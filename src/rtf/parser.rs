//! RTF parser that builds a document tree from raw characters.
//!
//! The parser is a single pass over the input. It keeps one frame per open
//! group; each frame holds the group being filled and the number of fallback
//! characters to discard after a `\uN` escape (the `\ucN` value), so the
//! skip stack always has exactly one entry per open group.

use super::cursor::Cursor;
use super::error::{RtfError, RtfResult};
use super::node::{ControlSymbol, ControlWord, Group, Node, Text};

/// Fallback characters skipped after `\uN` when no `\uc` is in effect.
const DEFAULT_UNICODE_SKIP: i32 = 1;

/// Group currently being filled, with its Unicode skip count.
#[derive(Debug)]
struct OpenGroup {
    group: Group,
    unicode_skip: i32,
}

/// RTF Parser.
pub struct Parser {
    /// Input characters
    cursor: Cursor,
    /// Open groups, innermost last
    open: Vec<OpenGroup>,
    /// Root group once it has been closed
    root: Option<Group>,
}

/// Parse an RTF document into its root group.
///
/// # Examples
///
/// ```
/// use rtfhtml::rtf::{Node, parse};
///
/// let root = parse(r"{\rtf1 Hello}")?;
/// assert_eq!(root.kind(), Some("rtf"));
/// assert!(matches!(&root.children[1], Node::Text(t) if t.text == "Hello"));
/// # Ok::<(), rtfhtml::rtf::RtfError>(())
/// ```
pub fn parse(input: &str) -> RtfResult<Group> {
    Parser::new(input).parse()
}

impl Parser {
    /// Create a new parser.
    pub fn new(input: &str) -> Self {
        Self {
            cursor: Cursor::new(input),
            open: Vec::new(),
            root: None,
        }
    }

    /// Parse the whole input into the root group.
    ///
    /// Fails on the first structural problem; no partial tree is returned.
    pub fn parse(mut self) -> RtfResult<Group> {
        while let Some(ch) = self.cursor.advance() {
            match ch {
                '\r' | '\n' => {},
                '{' => self.start_group()?,
                '}' => self.end_group()?,
                '\\' => self.parse_control()?,
                _ => {
                    self.cursor.rewind();
                    self.parse_text()?;
                },
            }
        }

        if !self.open.is_empty() {
            return Err(RtfError::TruncatedInput {
                position: self.cursor.position(),
                context: "group still open at end of input",
            });
        }

        self.root.ok_or(RtfError::Structural {
            position: self.cursor.position(),
            reason: "document contains no group",
        })
    }

    /// Handle `{`.
    fn start_group(&mut self) -> RtfResult<()> {
        if self.root.is_some() {
            return Err(self.structural("group after the end of the root group"));
        }

        let unicode_skip = self
            .open
            .last()
            .map_or(DEFAULT_UNICODE_SKIP, |parent| parent.unicode_skip);
        self.open.push(OpenGroup {
            group: Group::new(),
            unicode_skip,
        });
        log::trace!("open group, depth {}", self.open.len());
        Ok(())
    }

    /// Handle `}`.
    fn end_group(&mut self) -> RtfResult<()> {
        let closed = self.open.pop().ok_or(RtfError::UnbalancedGroup {
            position: self.cursor.position() - 1,
        })?;
        log::trace!("close group, depth {}", self.open.len());

        match self.open.last_mut() {
            Some(parent) => parent.group.push(Node::Group(closed.group)),
            None => self.root = Some(closed.group),
        }
        Ok(())
    }

    /// Handle `\`, which starts a control word, a control symbol or an
    /// escaped literal.
    fn parse_control(&mut self) -> RtfResult<()> {
        match self.cursor.peek() {
            None => Err(RtfError::TruncatedInput {
                position: self.cursor.position(),
                context: "backslash at end of input",
            }),
            Some(c) if c.is_ascii_alphabetic() => self.parse_control_word(),
            Some('\\' | '{' | '}') => {
                // Escaped literal: let the text run pick it up
                self.cursor.rewind();
                self.parse_text()
            },
            Some(_) => self.parse_control_symbol(),
        }
    }

    /// Parse `\word`, `\wordN` or `\word-N`.
    fn parse_control_word(&mut self) -> RtfResult<()> {
        let mut word = String::new();
        while let Some(c) = self.cursor.advance_if(|c| c.is_ascii_alphabetic()) {
            word.push(c);
        }

        let negative = self.cursor.advance_if(|c| c == '-').is_some();
        let mut value: Option<i64> = None;
        while let Some(digit) = self.cursor.advance_if(|c| c.is_ascii_digit()) {
            let digit = i64::from(digit as u8 - b'0');
            value = Some(value.unwrap_or(0).saturating_mul(10).saturating_add(digit));
        }

        let mut parameter = value.map_or(1, |v| v.min(i64::from(i32::MAX)) as i32);
        if negative {
            parameter = -parameter;
        }

        if word == "uc"
            && let Some(top) = self.open.last_mut()
        {
            top.unicode_skip = parameter;
        }

        // A single space or line end delimits the word and is not text
        self.cursor.advance_if(|c| matches!(c, ' ' | '\r' | '\n'));

        if word == "u" {
            if negative {
                parameter += 65536;
            }
            self.skip_unicode_fallback()?;
        }

        self.append(ControlWord::new(word, parameter).into())
    }

    /// Discard the fallback characters that follow `\uN`.
    ///
    /// Each unit is one character, a `\'hh` escape, a control word or an
    /// escaped symbol. Line ends are not counted. A brace stops the skip and
    /// is left in the input.
    fn skip_unicode_fallback(&mut self) -> RtfResult<()> {
        let mut remaining = self
            .open
            .last()
            .map_or(DEFAULT_UNICODE_SKIP, |top| top.unicode_skip)
            .max(0);

        while remaining > 0 {
            match self.cursor.advance() {
                None => break,
                Some('{' | '}') => {
                    self.cursor.rewind();
                    break;
                },
                Some('\r' | '\n') => continue,
                Some('\\') => self.skip_escaped_fallback()?,
                Some(_) => {},
            }
            remaining -= 1;
        }
        Ok(())
    }

    /// Discard one backslash-introduced fallback unit; the backslash itself
    /// has already been consumed.
    fn skip_escaped_fallback(&mut self) -> RtfResult<()> {
        let context = "unicode fallback";
        match self.cursor.next_or_truncated(context)? {
            '\'' => {
                self.cursor.next_or_truncated(context)?;
                self.cursor.next_or_truncated(context)?;
            },
            c if c.is_ascii_alphabetic() => {
                while self.cursor.advance_if(|c| c.is_ascii_alphabetic()).is_some() {}
                self.cursor.advance_if(|c| c == '-');
                while self.cursor.advance_if(|c| c.is_ascii_digit()).is_some() {}
                self.cursor.advance_if(|c| c == ' ');
            },
            _ => {},
        }
        Ok(())
    }

    /// Parse a control symbol such as `\~`, `\*` or `\'hh`.
    fn parse_control_symbol(&mut self) -> RtfResult<()> {
        let symbol = self.cursor.next_or_truncated("control symbol")?;

        // A backslash before a line end is shorthand for \par
        if matches!(symbol, '\r' | '\n') {
            return self.append(ControlWord::new("par", 0).into());
        }

        let parameter = if symbol == '\'' {
            self.parse_hex_byte()?
        } else {
            0
        };
        self.append(ControlSymbol::new(symbol, parameter).into())
    }

    /// Read the two hex digits of a `\'hh` escape.
    fn parse_hex_byte(&mut self) -> RtfResult<i32> {
        let position = self.cursor.position();
        let hi = self.cursor.next_or_truncated("hex escape")?;
        let lo = self.cursor.next_or_truncated("hex escape")?;

        match (hi.to_digit(16), lo.to_digit(16)) {
            (Some(hi), Some(lo)) => Ok((hi * 16 + lo) as i32),
            _ => Err(RtfError::MalformedEscape {
                position,
                found: format!("{hi}{lo}"),
            }),
        }
    }

    /// Parse a run of literal text.
    ///
    /// Line ends are dropped, `\\`, `\{` and `\}` become literal characters,
    /// and any other backslash or an unescaped brace ends the run without
    /// being consumed.
    fn parse_text(&mut self) -> RtfResult<()> {
        let mut text = String::new();

        while let Some(ch) = self.cursor.advance() {
            match ch {
                '\r' | '\n' => {},
                '\\' => match self.cursor.peek() {
                    Some(escaped @ ('\\' | '{' | '}')) => {
                        self.cursor.advance();
                        text.push(escaped);
                    },
                    _ => {
                        self.cursor.rewind();
                        break;
                    },
                },
                '{' | '}' => {
                    self.cursor.rewind();
                    break;
                },
                _ => text.push(ch),
            }
        }

        self.append(Text::new(text).into())
    }

    /// Append a node to the innermost open group.
    fn append(&mut self, node: Node) -> RtfResult<()> {
        match self.open.last_mut() {
            Some(top) => {
                top.group.push(node);
                Ok(())
            },
            None => Err(self.structural("content outside of any group")),
        }
    }

    fn structural(&self, reason: &'static str) -> RtfError {
        RtfError::Structural {
            position: self.cursor.position(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(name: &str, parameter: i32) -> Node {
        ControlWord::new(name, parameter).into()
    }

    fn symbol(symbol: char, parameter: i32) -> Node {
        ControlSymbol::new(symbol, parameter).into()
    }

    fn text(text: &str) -> Node {
        Text::new(text).into()
    }

    #[test]
    fn test_simple_document() {
        let root = parse(r"{\rtf1\ansi Hello}").unwrap();
        assert_eq!(root.children, vec![word("rtf", 1), word("ansi", 1), text("Hello")]);
    }

    #[test]
    fn test_control_word_parameters() {
        let root = parse(r"{\b0\fs24\li-720\ul}").unwrap();
        assert_eq!(
            root.children,
            vec![word("b", 0), word("fs", 24), word("li", -720), word("ul", 1)]
        );
    }

    #[test]
    fn test_negative_without_digits() {
        let root = parse(r"{\x- }").unwrap();
        assert_eq!(root.children, vec![word("x", -1)]);
    }

    #[test]
    fn test_delimiter_space_is_consumed_once() {
        let root = parse(r"{\b  bold}").unwrap();
        assert_eq!(root.children, vec![word("b", 1), text(" bold")]);
    }

    #[test]
    fn test_word_terminated_by_symbol_keeps_symbol() {
        let root = parse(r"{\b\i}").unwrap();
        assert_eq!(root.children, vec![word("b", 1), word("i", 1)]);
    }

    #[test]
    fn test_line_ends_are_dropped() {
        let root = parse("{\\rtf1\r\nHel\nlo\r}").unwrap();
        assert_eq!(root.children, vec![word("rtf", 1), text("Hello")]);
    }

    #[test]
    fn test_escaped_braces_are_text() {
        let root = parse(r"{\{literal\}}").unwrap();
        assert_eq!(root.children, vec![text("{literal}")]);

        let root = parse(r"{a\\b}").unwrap();
        assert_eq!(root.children, vec![text(r"a\b")]);
    }

    #[test]
    fn test_backslash_newline_is_par() {
        let root = parse("{one\\\ntwo}").unwrap();
        assert_eq!(root.children, vec![text("one"), word("par", 0), text("two")]);
    }

    #[test]
    fn test_control_symbols() {
        let root = parse(r"{\~\-\_\*}").unwrap();
        assert_eq!(
            root.children,
            vec![symbol('~', 0), symbol('-', 0), symbol('_', 0), symbol('*', 0)]
        );
    }

    #[test]
    fn test_hex_escape() {
        let root = parse(r"{caf\'e9}").unwrap();
        assert_eq!(root.children, vec![text("caf"), symbol('\'', 0xe9)]);

        let root = parse(r"{\'4A}").unwrap();
        assert_eq!(root.children, vec![symbol('\'', 0x4a)]);
    }

    #[test]
    fn test_malformed_hex_escape() {
        let err = parse(r"{\'zz}").unwrap_err();
        assert_eq!(
            err,
            RtfError::MalformedEscape {
                position: 3,
                found: "zz".to_string()
            }
        );
    }

    #[test]
    fn test_truncated_hex_escape() {
        assert!(matches!(
            parse(r"{\'e").unwrap_err(),
            RtfError::TruncatedInput { .. }
        ));
    }

    #[test]
    fn test_trailing_backslash_fails() {
        let err = parse("{abc\\").unwrap_err();
        assert!(matches!(err, RtfError::TruncatedInput { position: 5, .. }));
    }

    #[test]
    fn test_unbalanced_close() {
        assert_eq!(
            parse("{a}}").unwrap_err(),
            RtfError::UnbalancedGroup { position: 3 }
        );
        assert_eq!(parse("}").unwrap_err(), RtfError::UnbalancedGroup { position: 0 });
    }

    #[test]
    fn test_unclosed_group() {
        assert!(matches!(
            parse(r"{\rtf1{\b x}").unwrap_err(),
            RtfError::TruncatedInput { .. }
        ));
    }

    #[test]
    fn test_structural_errors() {
        assert!(matches!(parse("abc").unwrap_err(), RtfError::Structural { .. }));
        assert!(matches!(parse(r"\b{}").unwrap_err(), RtfError::Structural { .. }));
        assert!(matches!(parse("{a}b").unwrap_err(), RtfError::Structural { .. }));
        assert!(matches!(parse("{a}{b}").unwrap_err(), RtfError::Structural { .. }));
        assert!(matches!(parse("").unwrap_err(), RtfError::Structural { .. }));
    }

    #[test]
    fn test_trailing_line_ends_after_root() {
        let root = parse("{a}\r\n").unwrap();
        assert_eq!(root.children, vec![text("a")]);
    }

    #[test]
    fn test_nested_groups() {
        let root = parse(r"{\rtf1{\fonttbl{\f0 Arial;}}x}").unwrap();
        assert_eq!(root.depth(), 3);
        let Node::Group(fonttbl) = &root.children[1] else {
            panic!("expected group");
        };
        assert_eq!(fonttbl.kind(), Some("fonttbl"));
        assert_eq!(root.children[2], text("x"));
    }

    #[test]
    fn test_unicode_default_skip() {
        let root = parse(r"{\u8212 -rest}").unwrap();
        assert_eq!(root.children, vec![word("u", 8212), text("rest")]);
    }

    #[test]
    fn test_unicode_negative_parameter() {
        let root = parse(r"{\u-4064 ?}").unwrap();
        assert_eq!(root.children, vec![word("u", 61472)]);
    }

    #[test]
    fn test_uc_skips_exactly_n() {
        let root = parse(r"{\uc5\u9999 abcdefgh}").unwrap();
        assert_eq!(
            root.children,
            vec![word("uc", 5), word("u", 9999), text("fgh")]
        );
    }

    #[test]
    fn test_uc_zero_skips_nothing() {
        let root = parse(r"{\uc0\u9999 abc}").unwrap();
        assert_eq!(root.children, vec![word("uc", 0), word("u", 9999), text("abc")]);

        let root = parse(r"{\uc0\u233\'e9}").unwrap();
        assert_eq!(
            root.children,
            vec![word("uc", 0), word("u", 233), symbol('\'', 0xe9)]
        );
    }

    #[test]
    fn test_skip_stops_at_group_delimiter() {
        let root = parse(r"{\uc5\u9999 ab}").unwrap();
        assert_eq!(root.children, vec![word("uc", 5), word("u", 9999)]);

        let root = parse(r"{\uc3\u9999 a{b}c}").unwrap();
        assert_eq!(root.children.len(), 4);
        assert_eq!(root.children[2], Node::Group(Group { children: vec![text("b")] }));
        assert_eq!(root.children[3], text("c"));
    }

    #[test]
    fn test_hex_fallback_counts_as_one() {
        let root = parse(r"{\u233\'e9 x}").unwrap();
        assert_eq!(root.children, vec![word("u", 233), text(" x")]);

        let root = parse(r"{\uc2\u233\'e9\'65z}").unwrap();
        assert_eq!(root.children, vec![word("uc", 2), word("u", 233), text("z")]);
    }

    #[test]
    fn test_line_ends_in_fallback_are_not_counted() {
        let root = parse("{\\uc1\\u8212 \r\n-x}").unwrap();
        assert_eq!(root.children, vec![word("uc", 1), word("u", 8212), text("x")]);
    }

    #[test]
    fn test_control_word_fallback_counts_as_one() {
        let root = parse(r"{\u8212\emdash x}").unwrap();
        assert_eq!(root.children, vec![word("u", 8212), text("x")]);
    }

    #[test]
    fn test_skip_count_is_group_scoped() {
        let root = parse(r"{\uc2{\u9999 abc}\u9999 abc}").unwrap();
        let Node::Group(inner) = &root.children[1] else {
            panic!("expected group");
        };
        assert_eq!(inner.children, vec![word("u", 9999), text("c")]);
        assert_eq!(root.children[3], text("c"));

        let root = parse(r"{{\uc0\u9999 abc}\u9999 abc}").unwrap();
        let Node::Group(inner) = &root.children[0] else {
            panic!("expected group");
        };
        assert_eq!(inner.children[2], text("abc"));
        assert_eq!(root.children[2], text("bc"));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        /// Balanced RTF fragment together with its group nesting depth.
        fn balanced_fragment() -> impl Strategy<Value = (String, usize)> {
            let leaf = "[a-z ;]{0,8}".prop_map(|s| (s, 0usize));
            leaf.prop_recursive(5, 48, 4, |inner| {
                prop::collection::vec(inner, 0..4).prop_map(|parts| {
                    let depth = 1 + parts.iter().map(|(_, d)| *d).max().unwrap_or(0);
                    let body: String = parts.into_iter().map(|(s, _)| s).collect();
                    (format!("{{\\b {body}}}"), depth)
                })
            })
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(200))]

            #[test]
            fn prop_balanced_input_parses_to_matching_depth(
                parts in prop::collection::vec(balanced_fragment(), 0..4)
            ) {
                let depth = 1 + parts.iter().map(|(_, d)| *d).max().unwrap_or(0);
                let body: String = parts.into_iter().map(|(s, _)| s).collect();
                let input = format!("{{\\rtf1 {body}}}");

                let root = parse(&input);
                prop_assert!(root.is_ok(), "parse failed for {input:?}: {:?}", root.err());
                prop_assert_eq!(root.unwrap().depth(), depth);
            }

            #[test]
            fn prop_uc_skips_requested_count(skip in 0usize..8, fallback in "[a-z]{8,12}") {
                let input = format!("{{\\uc{skip}\\u9999 {fallback}}}");
                let root = parse(&input).unwrap();
                let expected = &fallback[skip..];
                prop_assert_eq!(root.text(), expected);
            }

            #[test]
            fn prop_extra_close_brace_fails(prefix in "[a-z]{0,5}") {
                let input = format!("{{{prefix}}}}}");
                let is_unbalanced = matches!(parse(&input), Err(RtfError::UnbalancedGroup { .. }));
                prop_assert!(is_unbalanced);
            }
        }
    }
}
