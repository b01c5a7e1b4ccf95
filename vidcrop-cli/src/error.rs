// vidcrop-cli/src/error.rs
//
// CLI error handling: a thin alias over the core error type so command
// implementations can use `?` against both core calls and their own
// path/IO failures.

use vidcrop_core::CoreResult;

/// Type alias for CLI results using the core error type.
pub type CliResult<T> = CoreResult<T>;
