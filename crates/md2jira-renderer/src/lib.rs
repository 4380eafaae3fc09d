//! Jira wiki markup renderer for Markdown document trees.
//!
//! # Architecture
//!
//! Rendering is split in two parts that only share the enter/exit contract:
//! - [`walk`]: depth-first traversal firing [`Visitor::enter`] before a
//!   node's children and [`Visitor::exit`] after them
//! - [`Rule`]: per-kind emission rules, looked up by [`JiraRenderer`]
//!   for every visited node
//!
//! The only state shared between rules is the [`RenderContext`] of one render
//! pass, which owns the output sink and the list nesting prefix. Each call
//! to [`JiraRenderer::render`] creates its own context, so a renderer can be
//! shared between threads rendering different documents.
//!
//! Kinds without a rule abort the render with
//! [`RenderError::UnsupportedKind`]; partial markup is never produced for a
//! construct the renderer does not understand.
//!
//! # Example
//!
//! ```
//! use md2jira_renderer::convert;
//! use md2jira_tree::ParseOptions;
//!
//! let jira = convert("# Hello\n\n**Bold** text", &ParseOptions::default()).unwrap();
//! assert_eq!(jira, "h1. Hello\n\n*Bold* text\n");
//! ```

mod context;
mod error;
mod renderer;
mod rules;
pub mod url;
mod walk;

pub use context::{ListMarker, ListPrefix, RenderContext};
pub use error::RenderError;
pub use renderer::{JiraRenderer, convert, render, render_to_string};
pub use rules::Rule;
pub use walk::{Visitor, walk};
