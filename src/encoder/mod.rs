pub mod command_builder;
pub mod ffmpeg;

pub use command_builder::{ConversionParams, build_ffmpeg_args};
pub use ffmpeg::{ProcessOutput, convert_video, run_encoder};

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures of one conversion attempt
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The encoder executable is missing
    #[error("encoder `{0}` not found (is FFmpeg installed?)")]
    EncoderNotFound(String),
    /// The encoder process could not be started
    #[error("failed to start encoder: {0}")]
    Spawn(std::io::Error),
    /// The encoder ran and exited non-zero; detail carries its error output
    #[error("{detail}")]
    NonZeroExit { detail: String },
    /// The output directory does not exist and could not be created
    #[error("output directory {} is not writable: {source}", .dir.display())]
    OutputDirUnwritable {
        dir: PathBuf,
        source: std::io::Error,
    },
}

/// Make sure the output directory exists before a run starts
pub fn ensure_output_dir(dir: &Path) -> Result<(), ConvertError> {
    std::fs::create_dir_all(dir).map_err(|source| ConvertError::OutputDirUnwritable {
        dir: dir.to_path_buf(),
        source,
    })
}
