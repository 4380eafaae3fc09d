//! Tree construction from `pulldown-cmark` events.
//!
//! The parser's offset iterator gives every event the byte range it covers,
//! which is what lets text and code lines stay [`Segment`]s into the source.

use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, LinkType, Options, Parser, Tag};

use crate::builder::TreeBuilder;
use crate::document::Document;
use crate::kind::{ExtensionKind, NodeKind};
use crate::segment::Segment;

/// Markdown dialect options.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParseOptions {
    /// Recognize GitHub Flavored Markdown: tables, strikethrough, task
    /// lists and blockquote alerts.
    pub gfm: bool,
}

impl ParseOptions {
    fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
        } else {
            Options::empty()
        }
    }
}

/// Parse Markdown into a [`Document`].
#[must_use]
pub fn parse(source: &str, options: &ParseOptions) -> Document {
    let parser = Parser::new_ext(source, options.parser_options());
    let mut state = TreeState {
        source,
        builder: TreeBuilder::new(),
    };
    for (event, range) in parser.into_offset_iter() {
        state.event(event, range);
    }
    let document = state.builder.finish();
    tracing::debug!(nodes = document.len(), bytes = source.len(), "Built document tree");
    document
}

struct TreeState<'s> {
    source: &'s str,
    builder: TreeBuilder,
}

impl TreeState<'_> {
    fn event(&mut self, event: Event<'_>, range: Range<usize>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(_) => self.end(),
            Event::Text(_) => self.text(range),
            Event::Code(_) => self.code_span(range),
            Event::Html(_) => self.html(range),
            Event::InlineHtml(_) => self.inline(NodeKind::RawHtml {
                segment: range.into(),
            }),
            Event::SoftBreak => self.line_break(range.start, false),
            Event::HardBreak => self.line_break(range.start, true),
            Event::Rule => {
                self.close_text_block();
                self.builder.leaf(NodeKind::ThematicBreak);
            }
            Event::TaskListMarker(_) => self.extension_leaf(ExtensionKind::TaskListMarker),
            Event::FootnoteReference(_) => self.extension_leaf(ExtensionKind::FootnoteReference),
            Event::InlineMath(_) => self.extension_leaf(ExtensionKind::InlineMath),
            Event::DisplayMath(_) => self.extension_leaf(ExtensionKind::DisplayMath),
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let kind = match tag {
            Tag::Paragraph => NodeKind::Paragraph,
            Tag::Heading {
                level,
                id,
                classes,
                attrs,
            } => {
                if id.is_some() || !classes.is_empty() || !attrs.is_empty() {
                    tracing::warn!(?level, "Heading attributes are not supported, dropping them");
                }
                NodeKind::Heading {
                    level: heading_level_to_num(level),
                }
            }
            Tag::BlockQuote(_) => NodeKind::Blockquote,
            Tag::CodeBlock(CodeBlockKind::Indented) => NodeKind::CodeBlock { lines: Vec::new() },
            Tag::CodeBlock(CodeBlockKind::Fenced(info)) => NodeKind::FencedCodeBlock {
                info: (!info.is_empty()).then(|| Box::from(&*info)),
                lines: Vec::new(),
            },
            Tag::HtmlBlock => NodeKind::HtmlBlock { lines: Vec::new() },
            Tag::List(start) => NodeKind::List {
                ordered: start.is_some(),
                start,
            },
            Tag::Item => NodeKind::ListItem,
            Tag::Emphasis => NodeKind::Emphasis { level: 1 },
            Tag::Strong => NodeKind::Emphasis { level: 2 },
            Tag::Link {
                link_type: LinkType::Autolink | LinkType::Email,
                dest_url,
                ..
            } => NodeKind::AutoLink {
                destination: Box::from(&*dest_url),
            },
            Tag::Link {
                dest_url, title, ..
            } => NodeKind::Link {
                destination: Box::from(&*dest_url),
                title: Box::from(&*title),
            },
            Tag::Image {
                dest_url, title, ..
            } => NodeKind::Image {
                destination: Box::from(&*dest_url),
                title: Box::from(&*title),
            },
            Tag::Table(_) => NodeKind::Extension(ExtensionKind::Table),
            Tag::TableHead => NodeKind::Extension(ExtensionKind::TableHead),
            Tag::TableRow => NodeKind::Extension(ExtensionKind::TableRow),
            Tag::TableCell => NodeKind::Extension(ExtensionKind::TableCell),
            Tag::Strikethrough => NodeKind::Extension(ExtensionKind::Strikethrough),
            Tag::Superscript => NodeKind::Extension(ExtensionKind::Superscript),
            Tag::Subscript => NodeKind::Extension(ExtensionKind::Subscript),
            Tag::FootnoteDefinition(_) => NodeKind::Extension(ExtensionKind::FootnoteDefinition),
            Tag::DefinitionList => NodeKind::Extension(ExtensionKind::DefinitionList),
            Tag::DefinitionListTitle => NodeKind::Extension(ExtensionKind::DefinitionListTitle),
            Tag::DefinitionListDefinition => {
                NodeKind::Extension(ExtensionKind::DefinitionListDefinition)
            }
            Tag::MetadataBlock(_) => NodeKind::Extension(ExtensionKind::MetadataBlock),
        };

        if let NodeKind::Extension(ext) = &kind {
            tracing::debug!(kind = ext.name(), "Parsed construct without a Jira rule");
        }
        if kind.is_block() {
            self.close_text_block();
        } else {
            self.ensure_text_block();
        }
        self.builder.open(kind);
    }

    fn end(&mut self) {
        // Inline containers are always closed before the item that holds the
        // implicit text block ends, so a text block on top belongs to this end.
        self.close_text_block();
        self.builder.close();
    }

    fn text(&mut self, range: Range<usize>) {
        let current = self.builder.current();
        if let NodeKind::CodeBlock { lines }
        | NodeKind::FencedCodeBlock { lines, .. }
        | NodeKind::HtmlBlock { lines } = self.builder.kind_mut(current)
        {
            lines.push(range.into());
            return;
        }
        self.ensure_text_block();
        let segment = self.with_backslash_escape(range);
        self.builder.leaf(NodeKind::Text {
            segment,
            soft_line_break: false,
            hard_line_break: false,
        });
    }

    /// The parser reports an escaped character as text starting after its
    /// backslash. Jira needs the backslash to keep the character literal, so
    /// the segment is widened over it unless the preceding text already
    /// covers that byte (an escaped backslash).
    fn with_backslash_escape(&self, range: Range<usize>) -> Segment {
        let bytes = self.source.as_bytes();
        let escaped = range.start > 0
            && bytes[range.start - 1] == b'\\'
            && bytes.get(range.start).is_some_and(u8::is_ascii_punctuation);
        let covered = self.builder.last_child().is_some_and(|id| {
            matches!(
                self.builder.kind(id),
                NodeKind::Text { segment, .. } if segment.end == range.start
            )
        });
        if escaped && !covered {
            Segment::new(range.start - 1, range.end)
        } else {
            range.into()
        }
    }

    fn html(&mut self, range: Range<usize>) {
        let current = self.builder.current();
        if let NodeKind::HtmlBlock { lines } = self.builder.kind_mut(current) {
            lines.push(range.into());
            return;
        }
        self.inline(NodeKind::RawHtml {
            segment: range.into(),
        });
    }

    fn code_span(&mut self, range: Range<usize>) {
        let bytes = self.source.as_bytes();
        let lines = code_span_lines(bytes, code_span_content(bytes, range));
        self.ensure_text_block();
        self.builder.open(NodeKind::CodeSpan);
        let last = lines.len() - 1;
        for (i, segment) in lines.into_iter().enumerate() {
            self.builder.leaf(NodeKind::Text {
                segment,
                soft_line_break: i < last,
                hard_line_break: false,
            });
        }
        self.builder.close();
    }

    fn line_break(&mut self, offset: usize, hard: bool) {
        if let Some(last) = self.builder.last_child() {
            if let NodeKind::Text {
                soft_line_break,
                hard_line_break,
                ..
            } = self.builder.kind_mut(last)
            {
                *soft_line_break = true;
                *hard_line_break |= hard;
                return;
            }
        }
        self.inline(NodeKind::Text {
            segment: Segment::empty(offset),
            soft_line_break: true,
            hard_line_break: hard,
        });
    }

    fn inline(&mut self, kind: NodeKind) {
        self.ensure_text_block();
        self.builder.leaf(kind);
    }

    fn extension_leaf(&mut self, ext: ExtensionKind) {
        tracing::debug!(kind = ext.name(), "Parsed construct without a Jira rule");
        let kind = NodeKind::Extension(ext);
        if kind.is_block() {
            self.close_text_block();
        } else {
            self.ensure_text_block();
        }
        self.builder.leaf(kind);
    }

    /// Tight list items carry inline content without a paragraph; wrap it so
    /// every item's inline run has a block parent.
    fn ensure_text_block(&mut self) {
        if matches!(self.builder.current_kind(), NodeKind::ListItem) {
            self.builder.open(NodeKind::TextBlock);
        }
    }

    fn close_text_block(&mut self) {
        if matches!(self.builder.current_kind(), NodeKind::TextBlock) {
            self.builder.close();
        }
    }
}

/// Byte range of a code span's content: the backtick fences removed and, when
/// both ends are padded and the content is not blank, one space stripped from
/// each side.
fn code_span_content(source: &[u8], range: Range<usize>) -> Segment {
    let raw = &source[range.clone()];
    let fence = raw.iter().take_while(|&&b| b == b'`').count();
    let closing = raw.iter().rev().take_while(|&&b| b == b'`').count();
    let start = range.start + fence;
    let end = range.end.saturating_sub(closing).max(start);

    let inner = &source[start..end];
    let is_pad = |b: &u8| *b == b' ' || *b == b'\n';
    if inner.len() >= 2
        && inner.first().is_some_and(is_pad)
        && inner.last().is_some_and(is_pad)
        && !inner.iter().all(is_pad)
    {
        Segment::new(start + 1, end - 1)
    } else {
        Segment::new(start, end)
    }
}

/// Split code span content into one segment per source line.
///
/// Lines after the first start with the container prefix (`> ` markers and
/// indentation). Inline content cannot continue a paragraph with a `>` once
/// that prefix is gone, since such a line opens a blockquote, so the whole
/// leading run of spaces, tabs and `>` is dropped. Line terminators are left
/// out; the caller turns them into soft breaks.
fn code_span_lines(source: &[u8], content: Segment) -> Vec<Segment> {
    let mut lines = Vec::new();
    let mut line_start = content.start;
    loop {
        let line_end = source[line_start..content.end]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(content.end, |i| line_start + i);

        let mut start = line_start;
        if !lines.is_empty() {
            start += source[line_start..line_end]
                .iter()
                .take_while(|&&b| matches!(b, b' ' | b'\t' | b'>'))
                .count();
        }
        let mut end = line_end;
        if end > start && source[end - 1] == b'\r' {
            end -= 1;
        }
        lines.push(Segment::new(start, end));

        if line_end == content.end {
            return lines;
        }
        line_start = line_end + 1;
    }
}

fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::Node;

    fn kinds(node: Node<'_>) -> Vec<&'static str> {
        node.children().map(|child| child.kind().name()).collect()
    }

    fn text_of<'s>(node: Node<'_>, source: &'s str) -> &'s str {
        match node.kind() {
            NodeKind::Text { segment, .. } => {
                std::str::from_utf8(segment.value(source.as_bytes())).unwrap()
            }
            other => panic!("expected text, got {other}"),
        }
    }

    #[test]
    fn test_heading_and_paragraph() {
        let source = "## Title\n\nBody text";
        let document = parse(source, &ParseOptions::default());
        let root = document.root();
        assert_eq!(kinds(root), vec!["Heading", "Paragraph"]);

        let heading = root.first_child().unwrap();
        assert_eq!(heading.kind(), &NodeKind::Heading { level: 2 });
        assert_eq!(text_of(heading.first_child().unwrap(), source), "Title");
    }

    #[test]
    fn test_tight_list_items_get_text_block() {
        let source = "- one\n- two\n";
        let document = parse(source, &ParseOptions::default());
        let list = document.root().first_child().unwrap();
        assert_eq!(
            list.kind(),
            &NodeKind::List {
                ordered: false,
                start: None
            }
        );
        for item in list.children() {
            assert_eq!(kinds(item), vec!["TextBlock"]);
        }
    }

    #[test]
    fn test_nested_list_closes_text_block() {
        let source = "1. outer\n   - inner\n";
        let document = parse(source, &ParseOptions::default());
        let item = document.root().first_child().unwrap().first_child().unwrap();
        assert_eq!(kinds(item), vec!["TextBlock", "List"]);
    }

    #[test]
    fn test_loose_list_items_keep_paragraphs() {
        let source = "- one\n\n- two\n";
        let document = parse(source, &ParseOptions::default());
        let list = document.root().first_child().unwrap();
        for item in list.children() {
            assert_eq!(kinds(item), vec!["Paragraph"]);
        }
    }

    #[test]
    fn test_soft_break_marks_preceding_text() {
        let source = "first\nsecond";
        let document = parse(source, &ParseOptions::default());
        let paragraph = document.root().first_child().unwrap();
        let first = paragraph.first_child().unwrap();
        assert_eq!(text_of(first, source), "first");
        assert!(matches!(
            first.kind(),
            NodeKind::Text {
                soft_line_break: true,
                hard_line_break: false,
                ..
            }
        ));
        assert_eq!(text_of(paragraph.last_child().unwrap(), source), "second");
    }

    #[test]
    fn test_hard_break_sets_both_flags() {
        let source = "first\\\nsecond";
        let document = parse(source, &ParseOptions::default());
        let first = document.root().first_child().unwrap().first_child().unwrap();
        assert!(matches!(
            first.kind(),
            NodeKind::Text {
                soft_line_break: true,
                hard_line_break: true,
                ..
            }
        ));
    }

    #[test]
    fn test_fenced_code_lines_are_segments() {
        let source = "```go\nfmt.Println(\"x\")\n```\n";
        let document = parse(source, &ParseOptions::default());
        let block = document.root().first_child().unwrap();
        assert_eq!(block.kind().language(), Some("go"));
        let lines: Vec<&[u8]> = block
            .kind()
            .lines()
            .iter()
            .map(|line| line.value(source.as_bytes()))
            .collect();
        assert_eq!(lines, vec![b"fmt.Println(\"x\")\n".as_slice()]);
    }

    #[test]
    fn test_code_span_content_strips_fences() {
        let source = "use `` a`b `` here";
        let document = parse(source, &ParseOptions::default());
        let paragraph = document.root().first_child().unwrap();
        let span = paragraph
            .children()
            .find(|n| matches!(n.kind(), NodeKind::CodeSpan))
            .unwrap();
        assert_eq!(text_of(span.first_child().unwrap(), source), "a`b");
    }

    #[test]
    fn test_code_span_content_keeps_blank_content() {
        let source = b"`  `";
        assert_eq!(code_span_content(source, 0..4), Segment::new(1, 3));
    }

    #[test]
    fn test_code_span_lines_drop_blockquote_prefix() {
        let source = "> a `b\n> c` d";
        let document = parse(source, &ParseOptions::default());
        let paragraph = document.root().first_child().unwrap().first_child().unwrap();
        let span = paragraph
            .children()
            .find(|n| matches!(n.kind(), NodeKind::CodeSpan))
            .unwrap();
        let texts: Vec<&str> = span.children().map(|n| text_of(n, source)).collect();
        assert_eq!(texts, vec!["b", "c"]);
        assert!(matches!(
            span.first_child().unwrap().kind(),
            NodeKind::Text {
                soft_line_break: true,
                ..
            }
        ));
    }

    #[test]
    fn test_code_span_lines_strip_crlf() {
        let source = b"a\r\n  b";
        assert_eq!(
            code_span_lines(source, Segment::new(0, source.len())),
            vec![Segment::new(0, 1), Segment::new(5, 6)]
        );
    }

    #[test]
    fn test_escaped_punctuation_keeps_backslash() {
        let source = "2\\*3\\*4";
        let document = parse(source, &ParseOptions::default());
        let paragraph = document.root().first_child().unwrap();
        let texts: String = paragraph.children().map(|n| text_of(n, source)).collect();
        assert_eq!(texts, source);
    }

    #[test]
    fn test_escaped_backslash_is_not_widened_twice() {
        let source = "a\\\\*b";
        let document = parse(source, &ParseOptions::default());
        let paragraph = document.root().first_child().unwrap();
        let texts: String = paragraph.children().map(|n| text_of(n, source)).collect();
        assert_eq!(texts, source);
    }

    #[test]
    fn test_links_and_autolinks() {
        let source = "[x](https://example.com) <https://rust-lang.org>";
        let document = parse(source, &ParseOptions::default());
        let paragraph = document.root().first_child().unwrap();
        let children: Vec<_> = paragraph.children().collect();
        assert_eq!(
            children[0].kind(),
            &NodeKind::Link {
                destination: "https://example.com".into(),
                title: "".into(),
            }
        );
        assert!(
            children
                .iter()
                .any(|n| matches!(n.kind(), NodeKind::AutoLink { .. }))
        );
    }

    #[test]
    fn test_strong_is_level_two_emphasis() {
        let source = "**bold** and *italic*";
        let document = parse(source, &ParseOptions::default());
        let paragraph = document.root().first_child().unwrap();
        let levels: Vec<u8> = paragraph
            .children()
            .filter_map(|n| match n.kind() {
                NodeKind::Emphasis { level } => Some(*level),
                _ => None,
            })
            .collect();
        assert_eq!(levels, vec![2, 1]);
    }

    #[test]
    fn test_html_block_lines() {
        let source = "<div>\nhi\n</div>\n";
        let document = parse(source, &ParseOptions::default());
        let block = document.root().first_child().unwrap();
        assert_eq!(block.kind().name(), "HTMLBlock");
        assert!(!block.kind().lines().is_empty());
        assert!(!block.has_children());
    }

    #[test]
    fn test_gfm_tables_are_extensions() {
        let source = "| a |\n|---|\n| b |\n";
        let document = parse(source, &ParseOptions { gfm: true });
        let table = document.root().first_child().unwrap();
        assert_eq!(table.kind(), &NodeKind::Extension(ExtensionKind::Table));

        let plain = parse(source, &ParseOptions::default());
        assert_eq!(kinds(plain.root()), vec!["Paragraph"]);
    }

    #[test]
    fn test_task_marker_inside_text_block() {
        let source = "- [x] done\n";
        let document = parse(source, &ParseOptions { gfm: true });
        let item = document.root().first_child().unwrap().first_child().unwrap();
        let text_block = item.first_child().unwrap();
        assert_eq!(text_block.kind(), &NodeKind::TextBlock);
        assert_eq!(
            text_block.first_child().unwrap().kind(),
            &NodeKind::Extension(ExtensionKind::TaskListMarker)
        );
    }
}
