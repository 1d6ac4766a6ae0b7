//! Repository layer: typed queries against detection table files.

pub mod detection_repo;

pub use detection_repo::DetectionRepo;
