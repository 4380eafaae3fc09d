//! Node kinds and their attributes.

use crate::segment::Segment;

/// Discriminant and kind-specific attributes of a tree node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// Root of every tree.
    Document,
    /// ATX or setext heading.
    Heading {
        /// Heading level, 1 through 6. Hand-built trees may carry other
        /// values; rendering clamps them into that range.
        level: u8,
    },
    Blockquote,
    /// Indented code block.
    CodeBlock {
        /// Source lines, each including its line terminator.
        lines: Vec<Segment>,
    },
    /// Code block delimited by backtick or tilde fences.
    FencedCodeBlock {
        /// Info string following the opening fence.
        info: Option<Box<str>>,
        /// Source lines, each including its line terminator.
        lines: Vec<Segment>,
    },
    HtmlBlock {
        lines: Vec<Segment>,
    },
    List {
        ordered: bool,
        /// First number of an ordered list.
        start: Option<u64>,
    },
    ListItem,
    Paragraph,
    /// Inline content of a tight list item, which has no paragraph wrapper.
    TextBlock,
    ThematicBreak,
    AutoLink {
        destination: Box<str>,
    },
    CodeSpan,
    Emphasis {
        /// 1 for emphasis, 2 for strong emphasis.
        level: u8,
    },
    Image {
        destination: Box<str>,
        title: Box<str>,
    },
    Link {
        destination: Box<str>,
        title: Box<str>,
    },
    /// Inline HTML tag.
    RawHtml {
        segment: Segment,
    },
    Text {
        segment: Segment,
        /// The source line ends right after this text.
        soft_line_break: bool,
        /// The line ending is a hard break (two spaces or a backslash).
        hard_line_break: bool,
    },
    /// Literal text that does not come from the source buffer.
    String {
        value: Box<str>,
    },
    /// A construct the parser recognizes but that has no Jira rendering.
    Extension(ExtensionKind),
}

/// Parser constructs outside the core CommonMark kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExtensionKind {
    Table,
    TableHead,
    TableRow,
    TableCell,
    Strikethrough,
    Superscript,
    Subscript,
    TaskListMarker,
    FootnoteDefinition,
    FootnoteReference,
    InlineMath,
    DisplayMath,
    DefinitionList,
    DefinitionListTitle,
    DefinitionListDefinition,
    MetadataBlock,
}

impl NodeKind {
    /// Human readable kind name, used in diagnostics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Document => "Document",
            Self::Heading { .. } => "Heading",
            Self::Blockquote => "Blockquote",
            Self::CodeBlock { .. } => "CodeBlock",
            Self::FencedCodeBlock { .. } => "FencedCodeBlock",
            Self::HtmlBlock { .. } => "HTMLBlock",
            Self::List { .. } => "List",
            Self::ListItem => "ListItem",
            Self::Paragraph => "Paragraph",
            Self::TextBlock => "TextBlock",
            Self::ThematicBreak => "ThematicBreak",
            Self::AutoLink { .. } => "AutoLink",
            Self::CodeSpan => "CodeSpan",
            Self::Emphasis { .. } => "Emphasis",
            Self::Image { .. } => "Image",
            Self::Link { .. } => "Link",
            Self::RawHtml { .. } => "RawHTML",
            Self::Text { .. } => "Text",
            Self::String { .. } => "String",
            Self::Extension(ext) => ext.name(),
        }
    }

    /// Stable numeric code of the kind.
    #[must_use]
    pub fn code(&self) -> u16 {
        match self {
            Self::Document => 0,
            Self::Heading { .. } => 1,
            Self::Blockquote => 2,
            Self::CodeBlock { .. } => 3,
            Self::FencedCodeBlock { .. } => 4,
            Self::HtmlBlock { .. } => 5,
            Self::List { .. } => 6,
            Self::ListItem => 7,
            Self::Paragraph => 8,
            Self::TextBlock => 9,
            Self::ThematicBreak => 10,
            Self::AutoLink { .. } => 11,
            Self::CodeSpan => 12,
            Self::Emphasis { .. } => 13,
            Self::Image { .. } => 14,
            Self::Link { .. } => 15,
            Self::RawHtml { .. } => 16,
            Self::Text { .. } => 17,
            Self::String { .. } => 18,
            Self::Extension(ext) => ext.code(),
        }
    }

    /// Language tag of a fenced code block: the first word of its info string.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        match self {
            Self::FencedCodeBlock {
                info: Some(info), ..
            } => info.split_whitespace().next(),
            _ => None,
        }
    }

    /// Source lines held by code and HTML blocks.
    #[must_use]
    pub fn lines(&self) -> &[Segment] {
        match self {
            Self::CodeBlock { lines }
            | Self::FencedCodeBlock { lines, .. }
            | Self::HtmlBlock { lines } => lines,
            _ => &[],
        }
    }

    /// Whether the kind belongs to block structure rather than inline content.
    #[must_use]
    pub fn is_block(&self) -> bool {
        match self {
            Self::Document
            | Self::Heading { .. }
            | Self::Blockquote
            | Self::CodeBlock { .. }
            | Self::FencedCodeBlock { .. }
            | Self::HtmlBlock { .. }
            | Self::List { .. }
            | Self::ListItem
            | Self::Paragraph
            | Self::TextBlock
            | Self::ThematicBreak => true,
            Self::AutoLink { .. }
            | Self::CodeSpan
            | Self::Emphasis { .. }
            | Self::Image { .. }
            | Self::Link { .. }
            | Self::RawHtml { .. }
            | Self::Text { .. }
            | Self::String { .. } => false,
            Self::Extension(ext) => ext.is_block(),
        }
    }
}

impl ExtensionKind {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Table => "Table",
            Self::TableHead => "TableHeader",
            Self::TableRow => "TableRow",
            Self::TableCell => "TableCell",
            Self::Strikethrough => "Strikethrough",
            Self::Superscript => "Superscript",
            Self::Subscript => "Subscript",
            Self::TaskListMarker => "TaskCheckBox",
            Self::FootnoteDefinition => "Footnote",
            Self::FootnoteReference => "FootnoteLink",
            Self::InlineMath => "InlineMath",
            Self::DisplayMath => "DisplayMath",
            Self::DefinitionList => "DefinitionList",
            Self::DefinitionListTitle => "DefinitionTerm",
            Self::DefinitionListDefinition => "DefinitionDescription",
            Self::MetadataBlock => "MetadataBlock",
        }
    }

    #[must_use]
    pub fn code(self) -> u16 {
        match self {
            Self::Table => 100,
            Self::TableHead => 101,
            Self::TableRow => 102,
            Self::TableCell => 103,
            Self::Strikethrough => 104,
            Self::Superscript => 105,
            Self::Subscript => 106,
            Self::TaskListMarker => 107,
            Self::FootnoteDefinition => 108,
            Self::FootnoteReference => 109,
            Self::InlineMath => 110,
            Self::DisplayMath => 111,
            Self::DefinitionList => 112,
            Self::DefinitionListTitle => 113,
            Self::DefinitionListDefinition => 114,
            Self::MetadataBlock => 115,
        }
    }

    #[must_use]
    pub fn is_block(self) -> bool {
        !matches!(
            self,
            Self::Strikethrough
                | Self::Superscript
                | Self::Subscript
                | Self::TaskListMarker
                | Self::FootnoteReference
                | Self::InlineMath
        )
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name(), self.code())
    }
}
