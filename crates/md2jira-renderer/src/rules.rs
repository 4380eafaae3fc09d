//! Jira emission rules, one per node kind.

use std::io;

use md2jira_tree::{Node, NodeKind};

use crate::context::{ListMarker, RenderContext};
use crate::url::{escape_destination, is_dangerous_url};

/// Emission rule for one node kind.
///
/// Rules write Jira markup fragments into the context's sink and may update
/// the context's list prefix. They are looked up by kind, so a rule can rely
/// on `node.kind()` being the kind it was registered for.
pub trait Rule: Send + Sync {
    /// Called before the node's children are rendered.
    fn enter(&self, cx: &mut RenderContext<'_>, node: Node<'_>) -> io::Result<()>;

    /// Called after the node's children are rendered.
    fn exit(&self, cx: &mut RenderContext<'_>, node: Node<'_>) -> io::Result<()>;
}

/// Rule for every built-in kind. `None` for extension kinds.
pub(crate) fn builtin_rule(kind: &NodeKind) -> Option<&'static dyn Rule> {
    let rule: &'static dyn Rule = match kind {
        NodeKind::Document => &DocumentRule,
        NodeKind::Heading { .. } => &HeadingRule,
        NodeKind::Blockquote => &BlockquoteRule,
        NodeKind::CodeBlock { .. } => &CodeBlockRule,
        NodeKind::FencedCodeBlock { .. } => &FencedCodeBlockRule,
        NodeKind::List { .. } => &ListRule,
        NodeKind::ListItem => &ListItemRule,
        NodeKind::Paragraph => &ParagraphRule,
        NodeKind::TextBlock => &TextBlockRule,
        NodeKind::CodeSpan => &CodeSpanRule,
        NodeKind::Emphasis { .. } => &EmphasisRule,
        NodeKind::Link { .. } => &LinkRule,
        NodeKind::Text { .. } => &TextRule,
        // No Jira mapping is defined for these yet. They stay registered so
        // documents using them still render; their children are visited.
        NodeKind::ThematicBreak
        | NodeKind::HtmlBlock { .. }
        | NodeKind::AutoLink { .. }
        | NodeKind::Image { .. }
        | NodeKind::RawHtml { .. }
        | NodeKind::String { .. } => &PassThrough,
        NodeKind::Extension(_) => return None,
    };
    Some(rule)
}

/// Blank line between a block and the block that follows it.
fn separate_from_next(cx: &mut RenderContext<'_>, node: Node<'_>) -> io::Result<()> {
    if node.next_sibling().is_some() {
        cx.write_byte(b'\n')?;
    }
    Ok(())
}

fn write_lines(cx: &mut RenderContext<'_>, node: Node<'_>) -> io::Result<()> {
    let source = cx.source();
    for line in node.kind().lines() {
        cx.write(line.value(source))?;
    }
    Ok(())
}

struct PassThrough;

impl Rule for PassThrough {
    fn enter(&self, _cx: &mut RenderContext<'_>, _node: Node<'_>) -> io::Result<()> {
        Ok(())
    }

    fn exit(&self, _cx: &mut RenderContext<'_>, _node: Node<'_>) -> io::Result<()> {
        Ok(())
    }
}

struct DocumentRule;

impl Rule for DocumentRule {
    fn enter(&self, _cx: &mut RenderContext<'_>, _node: Node<'_>) -> io::Result<()> {
        Ok(())
    }

    fn exit(&self, _cx: &mut RenderContext<'_>, _node: Node<'_>) -> io::Result<()> {
        Ok(())
    }
}

struct HeadingRule;

impl Rule for HeadingRule {
    fn enter(&self, cx: &mut RenderContext<'_>, node: Node<'_>) -> io::Result<()> {
        let NodeKind::Heading { level } = node.kind() else {
            return Ok(());
        };
        // Jira only knows h1. through h6.
        let level = (*level).clamp(1, 6);
        cx.write_str(&format!("h{level}. "))
    }

    fn exit(&self, cx: &mut RenderContext<'_>, node: Node<'_>) -> io::Result<()> {
        cx.write_byte(b'\n')?;
        separate_from_next(cx, node)
    }
}

struct BlockquoteRule;

impl Rule for BlockquoteRule {
    fn enter(&self, cx: &mut RenderContext<'_>, _node: Node<'_>) -> io::Result<()> {
        cx.write_str("{quote}\n")
    }

    fn exit(&self, cx: &mut RenderContext<'_>, node: Node<'_>) -> io::Result<()> {
        cx.write_str("{quote}\n")?;
        separate_from_next(cx, node)
    }
}

struct CodeBlockRule;

impl Rule for CodeBlockRule {
    fn enter(&self, cx: &mut RenderContext<'_>, node: Node<'_>) -> io::Result<()> {
        cx.write_str("{code}\n")?;
        write_lines(cx, node)
    }

    fn exit(&self, cx: &mut RenderContext<'_>, node: Node<'_>) -> io::Result<()> {
        cx.write_str("{code}\n")?;
        separate_from_next(cx, node)
    }
}

struct FencedCodeBlockRule;

impl Rule for FencedCodeBlockRule {
    // TODO: map Markdown language tags onto the language names the Jira code
    // macro accepts (e.g. `sh` -> `bash`).
    fn enter(&self, cx: &mut RenderContext<'_>, node: Node<'_>) -> io::Result<()> {
        cx.write_str("{code")?;
        if let Some(language) = node.kind().language() {
            cx.write_byte(b':')?;
            cx.write_str(language)?;
        }
        cx.write_str("}\n")?;
        write_lines(cx, node)
    }

    fn exit(&self, cx: &mut RenderContext<'_>, node: Node<'_>) -> io::Result<()> {
        cx.write_str("{code}\n")?;
        separate_from_next(cx, node)
    }
}

struct ListRule;

impl Rule for ListRule {
    fn enter(&self, cx: &mut RenderContext<'_>, node: Node<'_>) -> io::Result<()> {
        if let NodeKind::List { ordered, .. } = node.kind() {
            cx.list_prefix_mut().push(ListMarker::for_list(*ordered));
        }
        Ok(())
    }

    fn exit(&self, cx: &mut RenderContext<'_>, node: Node<'_>) -> io::Result<()> {
        cx.list_prefix_mut().pop();
        if node.next_sibling().is_some() && node.has_children() {
            cx.write_str("\n\n")?;
        }
        Ok(())
    }
}

/// Items read their marker from the shared prefix; they do not look at the
/// enclosing list themselves.
struct ListItemRule;

impl Rule for ListItemRule {
    fn enter(&self, cx: &mut RenderContext<'_>, _node: Node<'_>) -> io::Result<()> {
        cx.write_list_prefix()
    }

    fn exit(&self, cx: &mut RenderContext<'_>, node: Node<'_>) -> io::Result<()> {
        if node.next_sibling().is_some() && node.has_children() {
            cx.write_byte(b'\n')?;
        }
        Ok(())
    }
}

struct ParagraphRule;

impl Rule for ParagraphRule {
    fn enter(&self, _cx: &mut RenderContext<'_>, _node: Node<'_>) -> io::Result<()> {
        Ok(())
    }

    fn exit(&self, cx: &mut RenderContext<'_>, node: Node<'_>) -> io::Result<()> {
        if node.next_sibling().is_some() {
            cx.write_str("\n\n")
        } else {
            cx.write_byte(b'\n')
        }
    }
}

struct TextBlockRule;

impl Rule for TextBlockRule {
    fn enter(&self, _cx: &mut RenderContext<'_>, _node: Node<'_>) -> io::Result<()> {
        Ok(())
    }

    fn exit(&self, cx: &mut RenderContext<'_>, node: Node<'_>) -> io::Result<()> {
        if node.next_sibling().is_some() && node.has_children() {
            cx.write_byte(b'\n')?;
        }
        Ok(())
    }
}

struct CodeSpanRule;

impl Rule for CodeSpanRule {
    fn enter(&self, cx: &mut RenderContext<'_>, _node: Node<'_>) -> io::Result<()> {
        cx.write_str("{{")
    }

    fn exit(&self, cx: &mut RenderContext<'_>, _node: Node<'_>) -> io::Result<()> {
        cx.write_str("}}")
    }
}

/// `_italic_` and `*bold*`: the same marker opens and closes the span.
struct EmphasisRule;

impl EmphasisRule {
    fn marker(node: Node<'_>) -> u8 {
        match node.kind() {
            NodeKind::Emphasis { level: 2 } => b'*',
            _ => b'_',
        }
    }
}

impl Rule for EmphasisRule {
    fn enter(&self, cx: &mut RenderContext<'_>, node: Node<'_>) -> io::Result<()> {
        cx.write_byte(Self::marker(node))
    }

    fn exit(&self, cx: &mut RenderContext<'_>, node: Node<'_>) -> io::Result<()> {
        cx.write_byte(Self::marker(node))
    }
}

/// `[text|destination]`. Dangerous destinations are left out, the brackets
/// and pipe are still written.
struct LinkRule;

impl Rule for LinkRule {
    fn enter(&self, cx: &mut RenderContext<'_>, _node: Node<'_>) -> io::Result<()> {
        cx.write_byte(b'[')
    }

    fn exit(&self, cx: &mut RenderContext<'_>, node: Node<'_>) -> io::Result<()> {
        cx.write_byte(b'|')?;
        if let NodeKind::Link { destination, .. } = node.kind() {
            if !is_dangerous_url(destination) {
                cx.write_str(&escape_destination(destination))?;
            }
        }
        cx.write_byte(b']')
    }
}

struct TextRule;

impl Rule for TextRule {
    fn enter(&self, cx: &mut RenderContext<'_>, node: Node<'_>) -> io::Result<()> {
        let NodeKind::Text {
            segment,
            soft_line_break,
            ..
        } = node.kind()
        else {
            return Ok(());
        };
        let source = cx.source();
        cx.write(segment.value(source))?;
        if *soft_line_break {
            cx.write_byte(b' ')?;
        }
        Ok(())
    }

    fn exit(&self, _cx: &mut RenderContext<'_>, _node: Node<'_>) -> io::Result<()> {
        Ok(())
    }
}
