pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod event;
pub mod git;
pub mod output;
pub mod template;

#[cfg(test)]
pub(crate) mod testing;
