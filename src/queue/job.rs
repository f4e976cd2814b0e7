use std::path::{Path, PathBuf};

/// Status of a job in the conversion queue
#[derive(Debug, Clone, PartialEq)]
pub enum JobStatus {
    /// Waiting to be processed
    Pending,
    /// Currently being transcoded
    Converting,
    /// Successfully converted
    Completed,
    /// Conversion failed
    Failed { message: String },
}

impl JobStatus {
    /// Whether this status is terminal for the current run
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed { .. })
    }
}

/// One input-file-to-output-file conversion unit
#[derive(Debug, Clone)]
pub struct ConversionJob {
    pub path: PathBuf,
    pub status: JobStatus,
    pub source_size: Option<u64>,
}

impl ConversionJob {
    pub fn new(path: PathBuf) -> Self {
        let source_size = std::fs::metadata(&path).ok().map(|m| m.len());
        Self {
            path,
            status: JobStatus::Pending,
            source_size,
        }
    }

    /// Get the filename
    pub fn filename(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "Unknown".to_string())
    }
}

/// Ordered queue of conversion jobs, de-duplicated by path
#[derive(Debug, Default)]
pub struct JobList {
    jobs: Vec<ConversionJob>,
}

impl JobList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a job unless the path is already queued. Returns whether it was added.
    pub fn add(&mut self, path: PathBuf) -> bool {
        if self.jobs.iter().any(|j| j.path == path) {
            return false;
        }
        self.jobs.push(ConversionJob::new(path));
        true
    }

    /// Remove every job whose path is in `paths`. Absent paths are ignored.
    pub fn remove(&mut self, paths: &[PathBuf]) {
        self.jobs.retain(|j| !paths.contains(&j.path));
    }

    pub fn clear(&mut self) {
        self.jobs.clear();
    }

    /// Put every job back to Pending for a fresh run
    pub fn reset_statuses(&mut self) {
        for job in &mut self.jobs {
            job.status = JobStatus::Pending;
        }
    }

    pub fn all_terminal(&self) -> bool {
        self.jobs.iter().all(|j| j.status.is_terminal())
    }

    pub fn failed_count(&self) -> usize {
        self.jobs
            .iter()
            .filter(|j| matches!(j.status, JobStatus::Failed { .. }))
            .count()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ConversionJob> {
        self.jobs.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut ConversionJob> {
        self.jobs.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConversionJob> {
        self.jobs.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, ConversionJob> {
        self.jobs.iter_mut()
    }
}

/// Build the target path: `<output_dir>/<stem>_converted.mp4`
pub fn output_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    output_dir.join(format!("{}_converted.mp4", stem))
}

/// Check if a path has one of the accepted video extensions
pub fn is_video_file(path: &Path) -> bool {
    const VIDEO_EXTENSIONS: [&str; 4] = ["mp4", "mkv", "hevc", "265"];

    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| VIDEO_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_deduplicates_by_path() {
        let mut list = JobList::new();
        assert!(list.add(PathBuf::from("/videos/a.mkv")));
        assert!(!list.add(PathBuf::from("/videos/a.mkv")));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn remove_missing_path_is_noop() {
        let mut list = JobList::new();
        list.add(PathBuf::from("/videos/a.mkv"));
        list.remove(&[PathBuf::from("/videos/b.mkv")]);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn remove_drops_matching_entries() {
        let mut list = JobList::new();
        list.add(PathBuf::from("/videos/a.mkv"));
        list.add(PathBuf::from("/videos/b.mkv"));
        list.add(PathBuf::from("/videos/c.mkv"));
        list.remove(&[
            PathBuf::from("/videos/a.mkv"),
            PathBuf::from("/videos/c.mkv"),
        ]);
        assert_eq!(list.len(), 1);
        assert_eq!(list.get(0).unwrap().path, PathBuf::from("/videos/b.mkv"));
    }

    #[test]
    fn clear_empties_the_list() {
        let mut list = JobList::new();
        list.add(PathBuf::from("/videos/a.mkv"));
        list.add(PathBuf::from("/videos/b.mkv"));
        list.clear();
        assert!(list.is_empty());
    }

    #[test]
    fn reset_statuses_returns_jobs_to_pending() {
        let mut list = JobList::new();
        list.add(PathBuf::from("/videos/a.mkv"));
        list.get_mut(0).unwrap().status = JobStatus::Completed;
        list.reset_statuses();
        assert_eq!(list.get(0).unwrap().status, JobStatus::Pending);
        assert!(!list.all_terminal());
    }

    #[test]
    fn all_terminal_counts_failures() {
        let mut list = JobList::new();
        list.add(PathBuf::from("/videos/a.mkv"));
        list.add(PathBuf::from("/videos/b.mkv"));
        list.get_mut(0).unwrap().status = JobStatus::Completed;
        list.get_mut(1).unwrap().status = JobStatus::Failed {
            message: "boom".to_string(),
        };
        assert!(list.all_terminal());
        assert_eq!(list.failed_count(), 1);
    }

    #[test]
    fn output_path_uses_stem_and_suffix() {
        let out = output_path_for(Path::new("/a/b/clip.mkv"), Path::new("/out"));
        assert_eq!(out, PathBuf::from("/out/clip_converted.mp4"));
    }

    #[test]
    fn video_extensions_are_case_insensitive() {
        assert!(is_video_file(Path::new("movie.mkv")));
        assert!(is_video_file(Path::new("movie.MP4")));
        assert!(is_video_file(Path::new("raw.hevc")));
        assert!(is_video_file(Path::new("stream.265")));
        assert!(!is_video_file(Path::new("notes.txt")));
        assert!(!is_video_file(Path::new("no_extension")));
    }
}
