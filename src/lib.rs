// Cordoba: summarize the faces, colors, and subjects of a social feed.
//
// This is the library root. Each module corresponds to one stage of the
// feed analysis pipeline.

pub mod aggregate;
pub mod config;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod vision;

#[cfg(feature = "web")]
pub mod web;
