//! # vellum-render
//!
//! Template rendering library for vellum.
//!
//! This crate handles HTML template rendering using Askama. Templates are
//! compiled into the binary, so a broken layout fails the build of the tool
//! itself rather than a publish run.

pub mod templates;

pub use templates::ArticleTemplate;
