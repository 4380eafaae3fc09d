//! Per-pass renderer state.

use std::io::{self, Write};

/// Marker character contributed by one level of list nesting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListMarker {
    /// `#`
    Ordered,
    /// `*`
    Unordered,
}

impl ListMarker {
    #[must_use]
    pub fn for_list(ordered: bool) -> Self {
        if ordered { Self::Ordered } else { Self::Unordered }
    }

    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Self::Ordered => '#',
            Self::Unordered => '*',
        }
    }
}

/// Accumulated list markers, one per enclosing list.
///
/// Jira expresses nesting by repeating markers, so an item two lists deep in
/// an unordered list inside an ordered one renders as `#* `.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListPrefix {
    markers: String,
}

impl ListPrefix {
    pub fn push(&mut self, marker: ListMarker) {
        self.markers.push(marker.as_char());
    }

    pub fn pop(&mut self) -> Option<ListMarker> {
        self.markers.pop().map(|c| {
            if c == '#' {
                ListMarker::Ordered
            } else {
                ListMarker::Unordered
            }
        })
    }

    /// Current list nesting depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.markers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.markers
    }
}

/// Mutable state of one render pass.
///
/// Created at the start of a pass and dropped at its end; never shared
/// between passes.
pub struct RenderContext<'a> {
    out: &'a mut dyn Write,
    source: &'a [u8],
    list_prefix: ListPrefix,
}

impl<'a> RenderContext<'a> {
    pub fn new(out: &'a mut dyn Write, source: &'a [u8]) -> Self {
        Self {
            out,
            source,
            list_prefix: ListPrefix::default(),
        }
    }

    /// Source buffer that node segments point into.
    #[must_use]
    pub fn source(&self) -> &'a [u8] {
        self.source
    }

    #[must_use]
    pub fn list_prefix(&self) -> &ListPrefix {
        &self.list_prefix
    }

    pub fn list_prefix_mut(&mut self) -> &mut ListPrefix {
        &mut self.list_prefix
    }

    pub fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.out.write_all(bytes)
    }

    pub fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.out.write_all(s.as_bytes())
    }

    pub fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.out.write_all(&[byte])
    }

    /// Write the current list prefix followed by a space.
    pub fn write_list_prefix(&mut self) -> io::Result<()> {
        self.out.write_all(self.list_prefix.as_str().as_bytes())?;
        self.out.write_all(b" ")
    }
}
