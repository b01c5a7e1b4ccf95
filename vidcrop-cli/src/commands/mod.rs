//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific subcommand.

/// Implementation of the `crop` command: the watermark-crop batch job.
pub mod crop;

/// Implementation of the `plot` command: the ratings chart job.
pub mod plot;
