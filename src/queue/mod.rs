pub mod job;
pub mod state;
pub mod worker;

pub use job::{ConversionJob, JobList, JobStatus, is_video_file, output_path_for};
pub use state::BatchState;
pub use worker::{BatchConfig, WorkerJob, WorkerMessage, run_worker};
