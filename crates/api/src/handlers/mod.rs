//! Request handlers.
//!
//! `videos` serves the catalog and the per-video detection queries;
//! `viewer` renders the browser page.

pub mod videos;
pub mod viewer;
