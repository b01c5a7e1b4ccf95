//! Interactions with external command-line tools.
//!
//! Encapsulates the ffmpeg encode invocation and the dependency probing
//! used to decide whether the external encoder path can be attempted at
//! all. Metadata probing lives in [`crate::probe`].

use crate::error::{CoreError, CoreResult};

use std::io;
use std::process::{Command, Stdio};

/// Contains ffmpeg invocation building and execution for the external
/// encoder backend
pub mod ffmpeg;

pub use ffmpeg::{build_ffmpeg_command, run_ffmpeg_crop, EncodeParams};

/// Checks if a required external command is available and executable.
///
/// Runs the command with `-version`, discarding output. Distinguishes a
/// missing binary (`DependencyNotFound`) from one that exists but fails to
/// start (`CommandStart`).
pub fn check_dependency(cmd_name: &str) -> CoreResult<()> {
    let result = Command::new(cmd_name)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {}", cmd_name);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{}' not found.", cmd_name);
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
        Err(e) => {
            log::error!("Failed to start dependency check for '{}': {}", cmd_name, e);
            Err(crate::error::command_start_error(cmd_name, e))
        }
    }
}
