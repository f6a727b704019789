//! CLI module graph.

pub mod check;
pub mod command;
pub mod dispatch;
pub mod migrate;
pub mod serve;
