//! umlsctl library - exposes argument parsing and dispatch for tests

pub mod cli;
pub mod commands;
