//! Utility functions: image IO, artifact bookkeeping, label tables and the
//! scoped log redirection guard.

pub mod artifacts;
pub mod image;
pub mod labels;
pub mod logging;

pub use artifacts::ArtifactDir;
pub use image::{list_image_files, load_image, load_images_batch};
pub use labels::load_labels;
pub use logging::LogScope;
