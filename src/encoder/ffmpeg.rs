use crate::encoder::ConvertError;
use crate::encoder::command_builder::{ConversionParams, build_ffmpeg_args};
use std::io::ErrorKind;
use std::process::{Command, ExitStatus, Stdio};
use tracing::info;

/// Structured result of one encoder process
#[derive(Debug)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    pub stderr: String,
}

/// Run the encoder as a blocking child process and capture its error stream.
/// Independent of the caller's concurrency model; the caller decides which
/// thread blocks on it.
pub fn run_encoder(program: &str, args: &[String]) -> Result<ProcessOutput, ConvertError> {
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                ConvertError::EncoderNotFound(program.to_string())
            } else {
                ConvertError::Spawn(e)
            }
        })?;

    Ok(ProcessOutput {
        status: output.status,
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

/// Convert one file, blocking until the encoder terminates.
/// Exit code zero is success; anything else carries the stderr diagnostic.
pub fn convert_video(params: &ConversionParams, program: &str) -> Result<(), ConvertError> {
    let args = build_ffmpeg_args(params);

    info!(
        "Converting: {} -> {} (crf {})",
        params.input, params.output, params.crf
    );

    let output = run_encoder(program, &args)?;
    if output.status.success() {
        Ok(())
    } else {
        Err(ConvertError::NonZeroExit {
            detail: describe_failure(output.status, &output.stderr),
        })
    }
}

/// FFmpeg prints a wall of configuration text before the actual error,
/// keep only the tail
fn describe_failure(status: ExitStatus, stderr: &str) -> String {
    if stderr.trim().is_empty() {
        format!("ffmpeg failed with status: {}", status)
    } else {
        let last_lines: Vec<&str> = stderr.lines().rev().take(5).collect();
        format!(
            "ffmpeg failed: {}",
            last_lines.into_iter().rev().collect::<Vec<_>>().join("\n")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ConversionParams {
        ConversionParams {
            input: "/videos/a.mkv".to_string(),
            output: "/out/a_converted.mp4".to_string(),
            crf: 23,
        }
    }

    #[cfg(unix)]
    fn stub_encoder(dir: &std::path::Path, body: &str) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("encoder.sh");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path.to_string_lossy().to_string()
    }

    #[test]
    fn missing_program_maps_to_encoder_not_found() {
        let err = run_encoder("hevc2mp4-no-such-encoder", &[]).unwrap_err();
        assert!(matches!(err, ConvertError::EncoderNotFound(_)));
    }

    #[test]
    #[cfg(unix)]
    fn zero_exit_is_success() {
        let dir = tempfile::tempdir().unwrap();
        let encoder = stub_encoder(dir.path(), "exit 0");
        convert_video(&params(), &encoder).unwrap();
    }

    #[test]
    #[cfg(unix)]
    fn non_zero_exit_carries_stderr_tail() {
        let dir = tempfile::tempdir().unwrap();
        let encoder = stub_encoder(dir.path(), "echo 'Invalid data found' >&2\nexit 1");

        let err = convert_video(&params(), &encoder).unwrap_err();
        match err {
            ConvertError::NonZeroExit { detail } => {
                assert!(detail.contains("Invalid data found"));
            }
            other => panic!("expected NonZeroExit, got {:?}", other),
        }
    }

    #[test]
    #[cfg(unix)]
    fn failure_detail_keeps_only_the_last_lines() {
        let dir = tempfile::tempdir().unwrap();
        let body = "for i in 1 2 3 4 5 6 7 8; do echo \"line $i\" >&2; done\nexit 1";
        let encoder = stub_encoder(dir.path(), body);

        let err = convert_video(&params(), &encoder).unwrap_err();
        let detail = err.to_string();
        assert!(!detail.contains("line 1"));
        assert!(detail.contains("line 4"));
        assert!(detail.contains("line 8"));
    }

    #[test]
    #[cfg(unix)]
    fn silent_failure_reports_the_exit_status() {
        let dir = tempfile::tempdir().unwrap();
        let encoder = stub_encoder(dir.path(), "exit 3");

        let err = convert_video(&params(), &encoder).unwrap_err();
        assert!(err.to_string().contains("status"));
    }
}
