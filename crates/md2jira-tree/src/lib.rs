//! Typed Markdown document tree.
//!
//! This crate provides the [`Document`] tree consumed by the Jira renderer:
//! an arena of typed nodes with parent, child and sibling links, where text
//! and code lines are stored as [`Segment`]s into the original source instead
//! of owned strings.
//!
//! Trees are normally produced by [`parse`], which adapts `pulldown-cmark`'s
//! event stream, but can also be assembled by hand with [`TreeBuilder`].
//!
//! # Example
//!
//! ```
//! use md2jira_tree::{NodeKind, ParseOptions, parse};
//!
//! let source = "# Title\n\nSome *text*.";
//! let document = parse(source, &ParseOptions::default());
//! let heading = document.root().first_child().unwrap();
//! assert!(matches!(heading.kind(), NodeKind::Heading { level: 1 }));
//! ```

mod builder;
mod document;
mod kind;
mod parse;
mod segment;

pub use builder::TreeBuilder;
pub use document::{Children, Document, Node, NodeId};
pub use kind::{ExtensionKind, NodeKind};
pub use parse::{ParseOptions, parse};
pub use segment::Segment;
