//! Application Module
//!
//! Main application state and logic.

use crate::config::AppConfig;
use crate::encoder;
use crate::queue::{
    BatchConfig, BatchState, JobList, JobStatus, WorkerJob, WorkerMessage, is_video_file,
    run_worker,
};
use ratatui::widgets::ListState;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use tracing::{info, warn};

/// Application screens
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Home,
    FileExplorer { target: ExplorerTarget },
}

/// What the file explorer is currently picking
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExplorerTarget {
    AddFiles,
    OutputDir,
}

/// Confirmation dialog action
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmAction {
    ExitApp,
}

/// Main application state
pub struct App {
    pub current_screen: Screen,
    pub should_quit: bool,

    // Conversion queue
    pub jobs: JobList,
    pub batch: BatchState,
    pub job_cursor: usize,
    pub job_list_state: ListState,
    pub marked_jobs: HashSet<PathBuf>,

    // Batch settings
    pub output_dir: Option<PathBuf>,
    pub crf: u8,

    // File explorer
    pub current_dir: PathBuf,
    pub dir_entries: Vec<PathBuf>,
    pub explorer_index: usize,
    pub explorer_list_state: ListState,
    pub marked_files: HashSet<PathBuf>,

    // Conversion run
    pub converting_active: bool,
    pub worker_receiver: Option<Receiver<WorkerMessage>>,

    // Configuration
    pub config: AppConfig,

    // UI state
    pub message: Option<String>,
    pub confirm_dialog: Option<ConfirmAction>,
    pub confirm_selection: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        let mut job_list_state = ListState::default();
        job_list_state.select(Some(0));
        let mut explorer_list_state = ListState::default();
        explorer_list_state.select(Some(0));

        let crf = config.default_crf.min(51);

        Self {
            current_screen: Screen::Home,
            should_quit: false,
            jobs: JobList::new(),
            batch: BatchState::new(),
            job_cursor: 0,
            job_list_state,
            marked_jobs: HashSet::new(),
            output_dir: None,
            crf,
            current_dir,
            dir_entries: Vec::new(),
            explorer_index: 0,
            explorer_list_state,
            marked_files: HashSet::new(),
            converting_active: false,
            worker_receiver: None,
            config,
            message: None,
            confirm_dialog: None,
            confirm_selection: false,
        }
    }

    // Message handling

    pub fn set_message(&mut self, msg: &str) {
        self.message = Some(msg.to_string());
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    // Navigation

    pub fn navigate_to_home(&mut self) {
        self.current_screen = Screen::Home;
    }

    pub fn navigate_to_explorer(&mut self, target: ExplorerTarget) {
        self.marked_files.clear();
        self.refresh_dir_entries();
        self.current_screen = Screen::FileExplorer { target };
    }

    // Job queue

    /// Queue files for conversion, skipping paths already queued.
    /// The first selection also defaults the output directory.
    pub fn add_files(&mut self, paths: Vec<PathBuf>) -> usize {
        if self.output_dir.is_none()
            && let Some(first) = paths.first()
            && let Some(parent) = first.parent()
        {
            self.output_dir = Some(parent.to_path_buf());
        }

        let mut added = 0;
        for path in paths {
            if self.jobs.add(path) {
                added += 1;
            }
        }
        added
    }

    pub fn job_cursor_up(&mut self) {
        if self.job_cursor > 0 {
            self.job_cursor -= 1;
            self.job_list_state.select(Some(self.job_cursor));
        }
    }

    pub fn job_cursor_down(&mut self) {
        if self.job_cursor < self.jobs.len().saturating_sub(1) {
            self.job_cursor += 1;
            self.job_list_state.select(Some(self.job_cursor));
        }
    }

    pub fn toggle_job_mark(&mut self) {
        if let Some(job) = self.jobs.get(self.job_cursor) {
            let path = job.path.clone();
            if !self.marked_jobs.remove(&path) {
                self.marked_jobs.insert(path);
            }
        }
    }

    /// Remove the marked jobs, or the highlighted one when nothing is marked
    pub fn remove_marked(&mut self) {
        if self.converting_active {
            self.set_message("Cannot edit the queue while converting");
            return;
        }

        let paths: Vec<PathBuf> = if self.marked_jobs.is_empty() {
            self.jobs
                .get(self.job_cursor)
                .map(|j| vec![j.path.clone()])
                .unwrap_or_default()
        } else {
            self.marked_jobs.iter().cloned().collect()
        };

        self.jobs.remove(&paths);
        self.marked_jobs.clear();
        if self.job_cursor >= self.jobs.len() {
            self.job_cursor = self.jobs.len().saturating_sub(1);
        }
        self.job_list_state.select(Some(self.job_cursor));
    }

    pub fn clear_jobs(&mut self) {
        if self.converting_active {
            self.set_message("Cannot edit the queue while converting");
            return;
        }
        self.jobs.clear();
        self.marked_jobs.clear();
        self.batch.reset();
        self.job_cursor = 0;
        self.job_list_state.select(Some(0));
    }

    pub fn adjust_crf(&mut self, delta: i16) {
        self.crf = (self.crf as i16 + delta).clamp(0, 51) as u8;
    }

    // File explorer

    pub fn refresh_dir_entries(&mut self) {
        self.dir_entries.clear();

        // Add parent directory
        if let Some(parent) = self.current_dir.parent()
            && parent != self.current_dir
        {
            self.dir_entries.push(PathBuf::from(".."));
        }

        // Read directory contents
        if let Ok(entries) = std::fs::read_dir(&self.current_dir) {
            let mut paths: Vec<PathBuf> = entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.is_dir() || is_video_file(p))
                .collect();

            // Sort: directories first, then files
            paths.sort_by(|a, b| match (a.is_dir(), b.is_dir()) {
                (true, false) => std::cmp::Ordering::Less,
                (false, true) => std::cmp::Ordering::Greater,
                _ => a.file_name().cmp(&b.file_name()),
            });

            self.dir_entries.extend(paths);
        }

        self.explorer_index = 0;
        self.explorer_list_state.select(Some(0));
    }

    pub fn explorer_move_up(&mut self) {
        if self.explorer_index > 0 {
            self.explorer_index -= 1;
            self.explorer_list_state.select(Some(self.explorer_index));
        }
    }

    pub fn explorer_move_down(&mut self) {
        if self.explorer_index < self.dir_entries.len().saturating_sub(1) {
            self.explorer_index += 1;
            self.explorer_list_state.select(Some(self.explorer_index));
        }
    }

    pub fn enter_directory(&mut self) {
        if self.dir_entries.is_empty() {
            return;
        }

        let selected = self.dir_entries[self.explorer_index].clone();

        if selected == Path::new("..") {
            if let Some(parent) = self.current_dir.parent() {
                self.current_dir = parent.to_path_buf();
                self.refresh_dir_entries();
            }
        } else if selected.is_dir() {
            self.current_dir = selected;
            self.refresh_dir_entries();
        }
    }

    /// Enter on an explorer entry: descend into directories, queue video files
    pub fn select_explorer_entry(&mut self) {
        if self.dir_entries.is_empty() {
            return;
        }

        let selected = self.dir_entries[self.explorer_index].clone();

        if selected == Path::new("..") || selected.is_dir() {
            self.enter_directory();
        } else if is_video_file(&selected) {
            self.marked_files.insert(selected);
            self.confirm_add_marked();
        }
    }

    /// Space in add-files mode: mark or unmark the highlighted video file
    pub fn toggle_file_mark(&mut self) {
        if self.dir_entries.is_empty() {
            return;
        }

        let selected = self.dir_entries[self.explorer_index].clone();
        if selected != Path::new("..") && selected.is_file() && is_video_file(&selected) {
            if !self.marked_files.remove(&selected) {
                self.marked_files.insert(selected);
            }
        }
    }

    /// Queue every marked file and return to the home screen
    pub fn confirm_add_marked(&mut self) {
        let mut paths: Vec<PathBuf> = self.marked_files.drain().collect();
        paths.sort();

        if paths.is_empty() {
            if let Some(selected) = self.dir_entries.get(self.explorer_index)
                && selected.is_file()
                && is_video_file(selected)
            {
                paths.push(selected.clone());
            }
        }

        if paths.is_empty() {
            self.set_message("No files selected");
            return;
        }

        let added = self.add_files(paths);
        self.navigate_to_home();
        self.set_message(&format!("Queued {} file(s)", added));
    }

    /// Space in output-dir mode: pick the highlighted directory
    /// (the current one when the cursor is on `..`)
    pub fn select_output_entry(&mut self) {
        if self.dir_entries.is_empty() {
            return;
        }

        let selected = self.dir_entries[self.explorer_index].clone();
        let dir = if selected == Path::new("..") {
            self.current_dir.clone()
        } else if selected.is_dir() {
            selected
        } else {
            return;
        };

        self.output_dir = Some(dir);
        self.navigate_to_home();
    }

    // Conversion

    /// Start the batch. Rejected up front when the queue is empty, no output
    /// directory is set, or a run is already active.
    pub fn start_conversion(&mut self) {
        if self.converting_active {
            return;
        }
        if self.jobs.is_empty() {
            self.set_message("Please add files to convert");
            return;
        }
        let Some(output_dir) = self.output_dir.clone() else {
            self.set_message("Please select an output directory");
            return;
        };

        if let Err(e) = encoder::ensure_output_dir(&output_dir) {
            self.set_message(&e.to_string());
            return;
        }

        self.jobs.reset_statuses();
        self.marked_jobs.clear();
        self.clear_message();
        self.batch.begin(self.jobs.len());
        self.converting_active = true;

        let config = BatchConfig {
            output_dir,
            crf: self.crf,
            ffmpeg_path: self.config.ffmpeg_path.clone(),
        };
        let worker_jobs: Vec<WorkerJob> = self
            .jobs
            .iter()
            .enumerate()
            .map(|(index, job)| WorkerJob {
                index,
                input: job.path.clone(),
            })
            .collect();

        info!(
            "Starting batch of {} file(s) with crf {}",
            worker_jobs.len(),
            config.crf
        );

        let (tx, rx) = mpsc::channel();
        self.worker_receiver = Some(rx);
        thread::spawn(move || run_worker(worker_jobs, config, tx));
    }

    /// Drain pending worker events and apply status transitions
    pub fn process_worker_messages(&mut self) {
        let mut disconnected = false;
        let messages: Vec<WorkerMessage> = if let Some(ref rx) = self.worker_receiver {
            let mut msgs = Vec::new();
            loop {
                match rx.try_recv() {
                    Ok(msg) => msgs.push(msg),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        disconnected = true;
                        break;
                    }
                }
            }
            msgs
        } else {
            return;
        };

        for msg in messages {
            match msg {
                WorkerMessage::Converting(idx) => {
                    if let Some(job) = self.jobs.get_mut(idx) {
                        job.status = JobStatus::Converting;
                    }
                }
                WorkerMessage::Completed(idx) => {
                    if let Some(job) = self.jobs.get_mut(idx) {
                        job.status = JobStatus::Completed;
                    }
                    self.batch.advance();
                }
                WorkerMessage::Failed(idx, detail) => {
                    if let Some(job) = self.jobs.get_mut(idx) {
                        job.status = JobStatus::Failed { message: detail };
                    }
                    self.batch.advance();
                }
            }
        }

        if self.converting_active && disconnected && !self.jobs.all_terminal() {
            // The worker died without finishing the queue; fail the leftovers
            // so the run still ends in a terminal state.
            warn!("Conversion worker stopped unexpectedly");
            for job in self.jobs.iter_mut() {
                if !job.status.is_terminal() {
                    job.status = JobStatus::Failed {
                        message: "conversion worker stopped unexpectedly".to_string(),
                    };
                    self.batch.advance();
                }
            }
            self.set_message("Error during batch conversion: worker stopped unexpectedly");
        }

        if self.converting_active && self.jobs.all_terminal() {
            self.converting_active = false;
            self.batch.finish();
            self.worker_receiver = None;

            let failures = self.jobs.failed_count();
            let completed = self.batch.completed_count;
            let total = self.batch.total;
            info!(
                "Batch finished: {}/{} files, {} failure(s)",
                completed, total, failures
            );
            if failures == 0 {
                self.set_message(&format!(
                    "All conversions completed! ({}/{} files)",
                    completed, total
                ));
            } else {
                self.set_message(&format!(
                    "Completed with {} failure(s) ({}/{} files)",
                    failures, completed, total
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(AppConfig::default())
    }

    #[test]
    fn start_with_empty_queue_is_rejected() {
        let mut app = app();
        app.output_dir = Some(PathBuf::from("/tmp"));
        app.start_conversion();

        assert!(!app.converting_active);
        assert!(app.worker_receiver.is_none());
        assert_eq!(app.message.as_deref(), Some("Please add files to convert"));
    }

    #[test]
    fn start_without_output_dir_is_rejected() {
        let mut app = app();
        app.jobs.add(PathBuf::from("/videos/a.mkv"));
        app.output_dir = None;
        app.start_conversion();

        assert!(!app.converting_active);
        assert_eq!(
            app.message.as_deref(),
            Some("Please select an output directory")
        );
        assert_eq!(app.jobs.get(0).unwrap().status, JobStatus::Pending);
    }

    #[test]
    fn first_added_file_defaults_the_output_dir() {
        let mut app = app();
        app.add_files(vec![PathBuf::from("/videos/season1/a.mkv")]);
        assert_eq!(app.output_dir, Some(PathBuf::from("/videos/season1")));

        // A later selection must not override it
        app.add_files(vec![PathBuf::from("/other/b.mkv")]);
        assert_eq!(app.output_dir, Some(PathBuf::from("/videos/season1")));
    }

    #[test]
    fn add_files_reports_only_new_entries() {
        let mut app = app();
        let added = app.add_files(vec![
            PathBuf::from("/videos/a.mkv"),
            PathBuf::from("/videos/a.mkv"),
            PathBuf::from("/videos/b.mkv"),
        ]);
        assert_eq!(added, 2);
        assert_eq!(app.jobs.len(), 2);
    }

    #[test]
    fn queue_edits_are_blocked_during_a_run() {
        let mut app = app();
        app.add_files(vec![PathBuf::from("/videos/a.mkv")]);
        app.converting_active = true;

        app.remove_marked();
        assert_eq!(app.jobs.len(), 1);

        app.clear_jobs();
        assert_eq!(app.jobs.len(), 1);
    }

    #[test]
    fn remove_marked_falls_back_to_the_cursor() {
        let mut app = app();
        app.add_files(vec![
            PathBuf::from("/videos/a.mkv"),
            PathBuf::from("/videos/b.mkv"),
        ]);
        app.job_cursor = 1;
        app.remove_marked();

        assert_eq!(app.jobs.len(), 1);
        assert_eq!(
            app.jobs.get(0).unwrap().path,
            PathBuf::from("/videos/a.mkv")
        );
        assert_eq!(app.job_cursor, 0);
    }

    #[test]
    fn crf_stays_within_encoder_bounds() {
        let mut app = app();
        app.crf = 1;
        app.adjust_crf(-5);
        assert_eq!(app.crf, 0);
        app.crf = 50;
        app.adjust_crf(5);
        assert_eq!(app.crf, 51);
    }

    #[test]
    fn worker_events_drive_job_statuses() {
        let mut app = app();
        app.add_files(vec![
            PathBuf::from("/videos/a.mkv"),
            PathBuf::from("/videos/b.mkv"),
        ]);
        app.batch.begin(2);
        app.converting_active = true;

        let (tx, rx) = mpsc::channel();
        app.worker_receiver = Some(rx);

        tx.send(WorkerMessage::Converting(0)).unwrap();
        app.process_worker_messages();
        assert_eq!(app.jobs.get(0).unwrap().status, JobStatus::Converting);
        assert!(app.converting_active);

        tx.send(WorkerMessage::Completed(0)).unwrap();
        tx.send(WorkerMessage::Converting(1)).unwrap();
        tx.send(WorkerMessage::Failed(1, "ffmpeg failed: boom".to_string()))
            .unwrap();
        drop(tx);
        app.process_worker_messages();

        assert_eq!(app.jobs.get(0).unwrap().status, JobStatus::Completed);
        assert_eq!(
            app.jobs.get(1).unwrap().status,
            JobStatus::Failed {
                message: "ffmpeg failed: boom".to_string()
            }
        );
        assert_eq!(app.batch.completed_count, 2);
        assert!(!app.converting_active);
        assert!(app.worker_receiver.is_none());
        assert_eq!(
            app.message.as_deref(),
            Some("Completed with 1 failure(s) (2/2 files)")
        );
    }

    #[test]
    fn clean_run_reports_full_success() {
        let mut app = app();
        app.add_files(vec![PathBuf::from("/videos/a.mkv")]);
        app.batch.begin(1);
        app.converting_active = true;

        let (tx, rx) = mpsc::channel();
        app.worker_receiver = Some(rx);
        tx.send(WorkerMessage::Converting(0)).unwrap();
        tx.send(WorkerMessage::Completed(0)).unwrap();
        drop(tx);
        app.process_worker_messages();

        assert_eq!(
            app.message.as_deref(),
            Some("All conversions completed! (1/1 files)")
        );
    }

    #[test]
    fn dead_worker_fails_leftover_jobs_and_reenables_start() {
        let mut app = app();
        app.add_files(vec![
            PathBuf::from("/videos/a.mkv"),
            PathBuf::from("/videos/b.mkv"),
        ]);
        app.batch.begin(2);
        app.converting_active = true;

        let (tx, rx) = mpsc::channel();
        app.worker_receiver = Some(rx);
        tx.send(WorkerMessage::Converting(0)).unwrap();
        drop(tx);
        app.process_worker_messages();

        assert!(!app.converting_active);
        assert!(app.jobs.all_terminal());
        assert_eq!(app.batch.completed_count, 2);
    }
}
