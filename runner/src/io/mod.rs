//! Side-effecting adapters: files, processes, git, network, environment.

pub mod checks;
pub mod config;
pub mod discover;
pub mod git;
pub mod online;
pub mod process;
pub mod settings;
