//! Jira renderer: rule lookup on top of the document walk.

use std::collections::HashMap;
use std::io::Write;

use md2jira_tree::{Document, ExtensionKind, Node, NodeKind, ParseOptions, parse};

use crate::context::RenderContext;
use crate::error::RenderError;
use crate::rules::{Rule, builtin_rule};
use crate::walk::{Visitor, walk};

/// Renders document trees to Jira wiki markup.
///
/// Built-in kinds always use their built-in rule. Extension kinds have no
/// rule unless one is registered with
/// [`with_extension_rule`](Self::with_extension_rule); visiting one without
/// a rule fails the render with [`RenderError::UnsupportedKind`].
///
/// # Example
///
/// ```
/// use md2jira_renderer::JiraRenderer;
/// use md2jira_tree::{ParseOptions, parse};
///
/// let source = "> hello";
/// let document = parse(source, &ParseOptions::default());
/// let mut out = Vec::new();
/// JiraRenderer::new()
///     .render(&document, source.as_bytes(), &mut out)
///     .unwrap();
/// assert_eq!(out, b"{quote}\nhello\n{quote}\n");
/// ```
#[derive(Default)]
pub struct JiraRenderer {
    extension_rules: HashMap<ExtensionKind, Box<dyn Rule>>,
}

impl JiraRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule for a kind the built-in table does not cover.
    #[must_use]
    pub fn with_extension_rule<R: Rule + 'static>(mut self, kind: ExtensionKind, rule: R) -> Self {
        self.extension_rules.insert(kind, Box::new(rule));
        self
    }

    /// Render `document` into `out`.
    ///
    /// `source` must be the buffer the document was parsed from. The first
    /// unsupported kind or write error stops the render; nothing is written
    /// after the failing node.
    pub fn render(
        &self,
        document: &Document,
        source: &[u8],
        out: &mut dyn Write,
    ) -> Result<(), RenderError> {
        let mut pass = Pass {
            renderer: self,
            cx: RenderContext::new(out, source),
        };
        walk(document.root(), &mut pass)?;
        debug_assert!(
            pass.cx.list_prefix().is_empty(),
            "list prefix must be empty after a render"
        );
        Ok(())
    }

    /// Render `document` into a string.
    ///
    /// Segments are expected to fall on UTF-8 boundaries of `source`; bytes
    /// that do not form valid UTF-8 are replaced.
    pub fn render_to_string(
        &self,
        document: &Document,
        source: &[u8],
    ) -> Result<String, RenderError> {
        let mut out = Vec::with_capacity(source.len() + source.len() / 4);
        self.render(document, source, &mut out)?;
        Ok(match String::from_utf8(out) {
            Ok(s) => s,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        })
    }

    fn rule_for(&self, kind: &NodeKind) -> Result<&dyn Rule, RenderError> {
        if let Some(rule) = builtin_rule(kind) {
            return Ok(rule);
        }
        if let NodeKind::Extension(ext) = kind {
            if let Some(rule) = self.extension_rules.get(ext) {
                return Ok(rule.as_ref());
            }
        }
        Err(RenderError::UnsupportedKind {
            kind: kind.name(),
            code: kind.code(),
        })
    }
}

/// One render pass: the renderer's rules plus the pass-local context.
struct Pass<'r, 'a> {
    renderer: &'r JiraRenderer,
    cx: RenderContext<'a>,
}

impl Visitor for Pass<'_, '_> {
    type Error = RenderError;

    fn enter(&mut self, node: Node<'_>) -> Result<(), RenderError> {
        let rule = self.renderer.rule_for(node.kind())?;
        rule.enter(&mut self.cx, node)?;
        Ok(())
    }

    fn exit(&mut self, node: Node<'_>) -> Result<(), RenderError> {
        let rule = self.renderer.rule_for(node.kind())?;
        rule.exit(&mut self.cx, node)?;
        Ok(())
    }
}

/// Render `document` into `out` with the built-in rules.
pub fn render(document: &Document, source: &[u8], out: &mut dyn Write) -> Result<(), RenderError> {
    JiraRenderer::new().render(document, source, out)
}

/// Render `document` into a string with the built-in rules.
pub fn render_to_string(document: &Document, source: &[u8]) -> Result<String, RenderError> {
    JiraRenderer::new().render_to_string(document, source)
}

/// Parse Markdown and render it to Jira markup.
pub fn convert(markdown: &str, options: &ParseOptions) -> Result<String, RenderError> {
    let document = parse(markdown, options);
    render_to_string(&document, markdown.as_bytes())
}

#[cfg(test)]
mod tests {
    use std::io;

    use md2jira_tree::{Segment, TreeBuilder};
    use pretty_assertions::assert_eq;

    use super::*;

    struct Strikethrough;

    impl Rule for Strikethrough {
        fn enter(&self, cx: &mut RenderContext<'_>, _node: Node<'_>) -> io::Result<()> {
            cx.write_byte(b'-')
        }

        fn exit(&self, cx: &mut RenderContext<'_>, _node: Node<'_>) -> io::Result<()> {
            cx.write_byte(b'-')
        }
    }

    /// Sink that accepts `limit` bytes and then fails.
    struct FailingSink {
        written: Vec<u8>,
        limit: usize,
    }

    impl Write for FailingSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.written.len() + buf.len() > self.limit {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"));
            }
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_convert_paragraphs() {
        let result = convert("one\n\ntwo", &ParseOptions::default()).unwrap();
        assert_eq!(result, "one\n\ntwo\n");
    }

    #[test]
    fn test_unsupported_extension_fails() {
        let err = convert("~~gone~~", &ParseOptions { gfm: true }).unwrap_err();
        assert!(matches!(
            err,
            RenderError::UnsupportedKind {
                kind: "Strikethrough",
                code: 104
            }
        ));
        assert_eq!(
            err.to_string(),
            "no render function for node kind 'Strikethrough(104)'"
        );
    }

    #[test]
    fn test_registered_extension_rule_is_used() {
        let source = "~~gone~~";
        let document = parse(source, &ParseOptions { gfm: true });
        let result = JiraRenderer::new()
            .with_extension_rule(ExtensionKind::Strikethrough, Strikethrough)
            .render_to_string(&document, source.as_bytes())
            .unwrap();
        assert_eq!(result, "-gone-\n");
    }

    #[test]
    fn test_write_error_is_propagated() {
        let source = "# Title\n\nbody";
        let document = parse(source, &ParseOptions::default());
        let mut sink = FailingSink {
            written: Vec::new(),
            limit: 4,
        };
        let err = JiraRenderer::new()
            .render(&document, source.as_bytes(), &mut sink)
            .unwrap_err();
        assert!(matches!(err, RenderError::Output(ref e) if e.kind() == io::ErrorKind::BrokenPipe));
        assert_eq!(sink.written, b"h1. ");
    }

    #[test]
    fn test_renderer_is_reusable() {
        let source = "- a\n  - b\n";
        let document = parse(source, &ParseOptions::default());
        let renderer = JiraRenderer::new();
        let first = renderer.render_to_string(&document, source.as_bytes()).unwrap();
        let second = renderer.render_to_string(&document, source.as_bytes()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_string_node_is_pass_through() {
        let mut builder = TreeBuilder::new();
        builder.open(NodeKind::Paragraph);
        builder.leaf(NodeKind::String {
            value: "ignored".into(),
        });
        builder.leaf(NodeKind::Text {
            segment: Segment::new(0, 2),
            soft_line_break: false,
            hard_line_break: false,
        });
        builder.close();
        let document = builder.finish();
        assert_eq!(render_to_string(&document, b"ok").unwrap(), "ok\n");
    }
}
