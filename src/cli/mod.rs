//! Command-line interface module.

pub mod analyze;
mod args;
pub mod clean;
pub mod common;
pub mod images;
pub mod links;
pub mod move_page;
pub mod redirects;
pub mod validate;

pub use args::{Cli, Commands, ImagesArgs};
