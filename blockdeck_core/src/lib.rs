//! `blockdeck_core` discovers content block templates, turns the metadata in
//! their headers into block descriptors for a content-management host, and
//! renders block instances back through the matching template.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Template directory (views/blocks)
//!   → Slug resolver (hero.blade.php → hero, other files skipped)
//!   → Header parser (Title:, Category:, SupportsAlign:, ... lines)
//!   → Descriptor builder (validation, boolean/list coercion, supports, parent names)
//!   → Asset resolver (manifest lookup, deferred bundles or legacy URLs)
//!   → register-data filter → host registrar
//!
//! Render request (acf/hero + attributes)
//!   → Render dispatcher (slug, classes, anchor, preview) → data filter
//!   → every template directory holding hero.blade.php → host view renderer
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Configuration loading from `blockdeck.toml`.
//! - [`header`] - Header field extraction from template files.
//! - [`slug`] - Template suffix handling and slug resolution.
//! - [`descriptor`] - Block descriptors and the rules that build them.
//! - [`assets`] - Asset path resolution across pipeline generations.
//! - [`filters`] - Extension filter hooks.
//! - [`hooks`] - Lifecycle hooks for deferred asset enqueues.
//! - [`host`] - Host capabilities and the filesystem-backed [`LocalHost`].
//! - [`registry`] - The block registration pass.
//! - [`render`] - The render dispatcher.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use blockdeck_core::BlockInstance;
//! use blockdeck_core::TracingReporter;
//! use blockdeck_core::load_project;
//! use std::path::Path;
//!
//! let mut project = load_project(Path::new(".")).unwrap();
//!
//! let mut descriptors = Vec::new();
//! let registration = project.register(&mut descriptors, &TracingReporter).unwrap();
//! println!("{} block(s) registered", registration.len());
//!
//! let html = project
//! 	.render(BlockInstance::new("acf/hero").with_attribute("align", "wide"))
//! 	.unwrap();
//! println!("{html}");
//! ```

pub use assets::*;
pub use config::*;
pub use descriptor::*;
pub use error::*;
pub use filters::*;
pub use header::*;
pub use hooks::*;
pub use host::*;
pub use project::*;
pub use registry::*;
pub use render::*;
pub use report::*;
pub use slug::*;

pub mod assets;
pub mod config;
pub mod descriptor;
#[allow(unused_assignments)]
mod error;
pub mod filters;
pub mod header;
pub mod hooks;
pub mod host;
mod project;
pub mod registry;
pub mod render;
mod report;
pub mod slug;

#[cfg(test)]
mod __fixtures;
