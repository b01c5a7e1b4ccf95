//! File discovery for the crop batch job.
//!
//! Scans the top level of the input directory for video files by extension
//! (case-insensitive); subdirectories are not searched. Also resolves the
//! primary/alternate input directory convention: when the primary directory
//! is missing or empty and the alternate holds files, the alternate becomes
//! the input and the primary takes over the processed role.

use crate::config::CropConfig;
use crate::error::{CoreError, CoreResult};

use std::path::{Path, PathBuf};

/// Extensions recognized as candidate video files.
pub const VIDEO_EXTENSIONS: [&str; 4] = ["mp4", "avi", "mov", "mkv"];

/// Finds video files eligible for processing in the specified directory.
///
/// Returns `CoreError::NoFilesFound` when the directory holds no candidate
/// files; callers that treat an empty batch as benign match on that variant.
pub fn find_video_files(input_dir: &Path) -> CoreResult<Vec<PathBuf>> {
    let read_dir = std::fs::read_dir(input_dir)?;
    let mut files: Vec<PathBuf> = read_dir
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let path = entry.path();

            if !path.is_file() {
                return None;
            }

            path.extension()
                .and_then(|ext| ext.to_str())
                .filter(|ext_str| {
                    VIDEO_EXTENSIONS
                        .iter()
                        .any(|candidate| ext_str.eq_ignore_ascii_case(candidate))
                })
                .map(|_| path.clone())
        })
        .collect();

    if files.is_empty() {
        Err(CoreError::NoFilesFound)
    } else {
        // Directory order is platform-dependent; sort for a stable batch order.
        files.sort();
        Ok(files)
    }
}

/// Resolves the effective (input, processed) directory pair for a run.
///
/// The primary input directory wins whenever it holds any entries. Otherwise,
/// if the alternate directory exists and is non-empty, the roles swap: the
/// alternate is read and finished originals land in the primary.
pub fn resolve_io_dirs(config: &CropConfig) -> (PathBuf, PathBuf) {
    if !dir_has_entries(&config.input_dir) {
        if let Some(alt) = &config.alt_input_dir {
            if dir_has_entries(alt) {
                return (alt.clone(), config.input_dir.clone());
            }
        }
    }
    (config.input_dir.clone(), config.processed_dir.clone())
}

fn dir_has_entries(dir: &Path) -> bool {
    match std::fs::read_dir(dir) {
        Ok(mut entries) => entries.next().is_some(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    fn touch(dir: &Path, name: &str) {
        File::create(dir.join(name)).unwrap();
    }

    #[test]
    fn finds_videos_by_extension_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.mp4");
        touch(dir.path(), "b.MOV");
        touch(dir.path(), "c.Mkv");
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "noext");
        std::fs::create_dir(dir.path().join("sub.mp4")).unwrap();

        let files = find_video_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.mp4", "b.MOV", "c.Mkv"]);
    }

    #[test]
    fn empty_directory_reports_no_files() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "readme.md");
        assert!(matches!(
            find_video_files(dir.path()),
            Err(CoreError::NoFilesFound)
        ));
    }

    #[test]
    fn primary_directory_wins_when_populated() {
        let root = tempfile::tempdir().unwrap();
        let primary = root.path().join("videos");
        let alt = root.path().join("videos2");
        std::fs::create_dir_all(&primary).unwrap();
        std::fs::create_dir_all(&alt).unwrap();
        touch(&primary, "a.mp4");
        touch(&alt, "b.mp4");

        let mut config = CropConfig::new(
            primary.clone(),
            root.path().join("out"),
            alt.clone(),
        );
        config.alt_input_dir = Some(alt.clone());

        let (input, processed) = resolve_io_dirs(&config);
        assert_eq!(input, primary);
        assert_eq!(processed, alt);
    }

    #[test]
    fn roles_swap_when_primary_is_empty() {
        let root = tempfile::tempdir().unwrap();
        let primary = root.path().join("videos");
        let alt = root.path().join("videos2");
        std::fs::create_dir_all(&primary).unwrap();
        std::fs::create_dir_all(&alt).unwrap();
        touch(&alt, "b.mp4");

        let mut config = CropConfig::new(
            primary.clone(),
            root.path().join("out"),
            alt.clone(),
        );
        config.alt_input_dir = Some(alt.clone());

        let (input, processed) = resolve_io_dirs(&config);
        assert_eq!(input, alt);
        assert_eq!(processed, primary);
    }
}
