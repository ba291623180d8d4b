// Crate root library declaration and module exports.
pub mod calendar;
pub mod cli;
pub mod client;
pub mod color_utils;
pub mod config;
pub mod context;
pub mod export;
pub mod format;
pub mod model;
pub mod session;
pub mod storage;
