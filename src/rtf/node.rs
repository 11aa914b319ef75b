//! Document tree produced by the RTF parser.
//!
//! Each [`Group`] owns its children outright. The parser keeps the chain of
//! enclosing groups on its own stack while building, so nodes do not store a
//! link back to their parent.

use std::fmt;

/// A node of the RTF document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// `{ ... }` scope
    Group(Group),
    /// `\word` or `\wordN`
    ControlWord(ControlWord),
    /// `\` followed by a single non-letter
    ControlSymbol(ControlSymbol),
    /// Literal text
    Text(Text),
}

/// Brace-delimited group of nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Group {
    pub children: Vec<Node>,
}

/// Control word with its numeric parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlWord {
    /// Alphabetic name, case preserved
    pub word: String,
    /// Parameter; 1 when the source gave none
    pub parameter: i32,
}

/// Control symbol with its parameter.
///
/// The parameter is only meaningful for `\'hh`, where it holds the byte value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlSymbol {
    pub symbol: char,
    pub parameter: i32,
}

/// Run of literal characters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Text {
    pub text: String,
}

impl Group {
    /// Create an empty group.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a child node.
    #[inline]
    pub fn push(&mut self, node: Node) {
        self.children.push(node);
    }

    /// The group's kind, derived from its first child.
    ///
    /// Returns the control word's name when the group starts with one, `"*"`
    /// for a destination marked by `\*`, and `None` otherwise.
    pub fn kind(&self) -> Option<&str> {
        match self.children.first()? {
            Node::ControlWord(word) => Some(&word.word),
            Node::ControlSymbol(symbol) if symbol.symbol == '*' => Some("*"),
            _ => None,
        }
    }

    /// Whether the group is an ignorable destination (`{\*...}`).
    #[inline]
    pub fn is_destination(&self) -> bool {
        matches!(
            self.children.first(),
            Some(Node::ControlSymbol(ControlSymbol { symbol: '*', .. }))
        )
    }

    /// Nesting depth of the tree rooted at this group; a group with no
    /// nested groups has depth 1.
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .filter_map(|child| match child {
                Node::Group(group) => Some(group.depth()),
                _ => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// Concatenation of the text nodes that are direct children.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|child| match child {
                Node::Text(text) => Some(text.text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn dump(&self, f: &mut fmt::Formatter<'_>, level: usize) -> fmt::Result {
        writeln!(f, "{:indent$}{{", "", indent = level * 2)?;
        for child in &self.children {
            match child {
                Node::Group(group) => group.dump(f, level + 1)?,
                Node::ControlWord(word) => writeln!(
                    f,
                    "{:indent$}WORD {} ({})",
                    "",
                    word.word,
                    word.parameter,
                    indent = (level + 1) * 2
                )?,
                Node::ControlSymbol(symbol) => writeln!(
                    f,
                    "{:indent$}SYMBOL {} ({})",
                    "",
                    symbol.symbol,
                    symbol.parameter,
                    indent = (level + 1) * 2
                )?,
                Node::Text(text) => {
                    writeln!(f, "{:indent$}TEXT {}", "", text.text, indent = (level + 1) * 2)?
                },
            }
        }
        writeln!(f, "{:indent$}}}", "", indent = level * 2)
    }
}

/// Indented dump of the tree, one node per line.
impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.dump(f, 0)
    }
}

impl ControlWord {
    /// Create a control word.
    #[inline]
    pub fn new(word: impl Into<String>, parameter: i32) -> Self {
        Self {
            word: word.into(),
            parameter,
        }
    }
}

impl ControlSymbol {
    /// Create a control symbol.
    #[inline]
    pub const fn new(symbol: char, parameter: i32) -> Self {
        Self { symbol, parameter }
    }
}

impl Text {
    /// Create a text node.
    #[inline]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl From<Group> for Node {
    fn from(group: Group) -> Self {
        Node::Group(group)
    }
}

impl From<ControlWord> for Node {
    fn from(word: ControlWord) -> Self {
        Node::ControlWord(word)
    }
}

impl From<ControlSymbol> for Node {
    fn from(symbol: ControlSymbol) -> Self {
        Node::ControlSymbol(symbol)
    }
}

impl From<Text> for Node {
    fn from(text: Text) -> Self {
        Node::Text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(children: Vec<Node>) -> Group {
        Group { children }
    }

    #[test]
    fn test_kind_from_control_word() {
        let g = group(vec![ControlWord::new("fonttbl", 1).into()]);
        assert_eq!(g.kind(), Some("fonttbl"));
        assert!(!g.is_destination());
    }

    #[test]
    fn test_kind_from_destination_marker() {
        let g = group(vec![
            ControlSymbol::new('*', 0).into(),
            ControlWord::new("shppict", 1).into(),
        ]);
        assert_eq!(g.kind(), Some("*"));
        assert!(g.is_destination());
    }

    #[test]
    fn test_kind_none() {
        assert_eq!(Group::new().kind(), None);
        assert_eq!(group(vec![Text::new("x").into()]).kind(), None);
        assert_eq!(group(vec![ControlSymbol::new('~', 0).into()]).kind(), None);
    }

    #[test]
    fn test_depth() {
        let inner = group(vec![Text::new("a").into()]);
        let middle = group(vec![inner.into(), Text::new("b").into()]);
        let root = group(vec![middle.into(), group(vec![]).into()]);
        assert_eq!(root.depth(), 3);
        assert_eq!(Group::new().depth(), 1);
    }

    #[test]
    fn test_dump() {
        let root = group(vec![
            ControlWord::new("rtf", 1).into(),
            group(vec![ControlSymbol::new('\'', 0xe9).into()]).into(),
            Text::new("Hi").into(),
        ]);
        let dump = root.to_string();
        assert_eq!(dump, "{\n  WORD rtf (1)\n  {\n    SYMBOL ' (233)\n  }\n  TEXT Hi\n}\n");
    }
}
