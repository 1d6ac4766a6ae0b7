//! Domain core for the framebox viewer backend.
//!
//! Holds the detection types, the frame-indexed [`box_table::BoxTable`],
//! timeline binning, request validation, and the video catalog scan. The
//! storage and HTTP crates build on top of these.

pub mod box_table;
pub mod catalog;
pub mod detection;
pub mod error;
pub mod timeline;
pub mod validation;
