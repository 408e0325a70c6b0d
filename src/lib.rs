//! tfadopt - adopt existing CloudWatch metric alarms into Terraform
//!
//! The [`adopt`] module holds the extraction and state synthesis engine.
//! The remaining modules provide the command-line embedding: configuration,
//! commands, and mockable file system and terminal output.

pub mod adopt;
pub mod commands;
pub mod config;
pub mod context;
pub mod output;
pub mod traits;
