use crate::encoder::{self, ConversionParams};
use crate::queue::job::output_path_for;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use tracing::{error, info};

/// Messages sent from the worker thread to the UI thread
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerMessage {
    /// Job started transcoding
    Converting(usize),
    /// Job finished successfully
    Completed(usize),
    /// Job failed, with the encoder diagnostic
    Failed(usize, String),
}

/// Per-run settings, immutable while the batch is active
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub output_dir: PathBuf,
    pub crf: u8,
    pub ffmpeg_path: String,
}

/// Snapshot of one queued job handed to the worker thread
#[derive(Debug, Clone)]
pub struct WorkerJob {
    pub index: usize,
    pub input: PathBuf,
}

/// Run the batch on the calling thread, strictly in list order, one encoder
/// process at a time. Emits a status event per transition; a failed job does
/// not abort the remaining batch.
pub fn run_worker(jobs: Vec<WorkerJob>, config: BatchConfig, tx: Sender<WorkerMessage>) {
    for job in jobs {
        let _ = tx.send(WorkerMessage::Converting(job.index));

        let output = output_path_for(&job.input, &config.output_dir);
        let params = ConversionParams {
            input: job.input.to_string_lossy().to_string(),
            output: output.to_string_lossy().to_string(),
            crf: config.crf,
        };

        match encoder::convert_video(&params, &config.ffmpeg_path) {
            Ok(()) => {
                info!("Converted {} -> {}", params.input, params.output);
                let _ = tx.send(WorkerMessage::Completed(job.index));
            }
            Err(e) => {
                error!("Conversion of {} failed: {}", params.input, e);
                let _ = tx.send(WorkerMessage::Failed(job.index, e.to_string()));
            }
        }
    }
}
