//! # Job Planner
//!
//! Percorre l'albero sorgente e costruisce la lista dei job.
//!
//! ## Algoritmo:
//! 1. Visita ricorsiva della cartella sorgente (entry ordinate per nome)
//! 2. Per ogni cartella visitata crea la cartella speculare in destinazione
//! 3. Per ogni file regolare:
//!    - estensione sorgente -> job `transcode` con nome rinominato
//!    - altrimenti, se `copy_unmatched` -> job `copy` con nome invariato
//!    - altrimenti il file viene ignorato
//! 4. Un job viene aggiunto solo se l'output non esiste già
//!
//! Rieseguire il planner dopo un run produce solo i file mancanti: è questo
//! il meccanismo di ripresa, non esiste un manifest dei lavori completati.

use crate::config::{ResolvedConfig, TranscodeConfig};
use crate::error::{Result, TranscodeError};
use crate::planner::job::{Job, JobAction, JobList};
use crate::planner::path_resolver::PathResolver;
use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Builds the job list for a validated configuration
pub struct JobPlanner {
    config: ResolvedConfig,
}

impl JobPlanner {
    pub fn new(config: ResolvedConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Walk the source tree and plan every missing output
    pub fn plan(&self) -> Result<JobList> {
        let resolver = PathResolver::new(&self.config.source_root, &self.config.destination_root)?;
        let source_root = resolver.source_root().to_path_buf();
        let nested_destination = resolver
            .destination_is_nested()
            .then(|| resolver.destination_root().to_path_buf());

        if let Some(ref destination) = nested_destination {
            warn!(
                "Destination {} is inside the source tree, it will not be scanned",
                destination.display()
            );
        }

        let mut jobs = JobList::new();
        let mut planned_outputs = HashSet::new();

        let walker = WalkDir::new(&source_root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                nested_destination
                    .as_deref()
                    .map_or(true, |destination| entry.path() != destination)
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    if e.depth() == 0 || e.path() == Some(source_root.as_path()) {
                        return Err(TranscodeError::Io(e.into()));
                    }
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                let destination_dir = resolver.destination_dir(entry.path());
                PathResolver::ensure_dir(&destination_dir)?;
                continue;
            }

            if !Self::is_regular_file(&entry) {
                debug!("Skipping non-regular entry: {}", entry.path().display());
                continue;
            }

            let Some((output_name, action)) = self.classify(entry.file_name()) else {
                continue;
            };

            let parent = entry.path().parent().unwrap_or(source_root.as_path());
            let output = resolver.destination_dir(parent).join(output_name);

            if output.exists() {
                debug!("[SKIP] Output already exists: {}", output.display());
                continue;
            }

            if !planned_outputs.insert(output.clone()) {
                warn!(
                    "Skipping {}: output {} is already planned by another job",
                    entry.path().display(),
                    output.display()
                );
                continue;
            }

            debug!("[{}] {} -> {}", action, entry.path().display(), output.display());
            jobs.push(Job::new(entry.path().to_path_buf(), output, action));
        }

        info!(
            "📋 Planned {} jobs ({} transcode, {} copy)",
            jobs.len(),
            jobs.count(JobAction::Transcode),
            jobs.count(JobAction::Copy)
        );

        Ok(jobs)
    }

    /// Decide action and output name for a file, `None` to skip it
    fn classify(&self, file_name: &OsStr) -> Option<(OsString, JobAction)> {
        let source_ext = self.config.source_codec.extension().as_bytes();
        let target_ext = self.config.target_codec.extension().as_bytes();

        if let Some(name) = name_bytes(file_name) {
            if name.ends_with(source_ext) {
                let renamed = self.config.rename.apply(name, source_ext, target_ext);
                if let Some(renamed) = name_from_bytes(renamed) {
                    return Some((renamed, JobAction::Transcode));
                }
            }
        }

        if self.config.copy_unmatched {
            Some((file_name.to_os_string(), JobAction::Copy))
        } else {
            None
        }
    }

    /// Regular files, including symlinks that point at one
    fn is_regular_file(entry: &DirEntry) -> bool {
        entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
    }
}

/// Validate `config` and plan its job list
pub fn plan(config: &TranscodeConfig) -> Result<JobList> {
    JobPlanner::new(config.validate()?).plan()
}

#[cfg(unix)]
fn name_bytes(name: &OsStr) -> Option<&[u8]> {
    use std::os::unix::ffi::OsStrExt;
    Some(name.as_bytes())
}

#[cfg(not(unix))]
fn name_bytes(name: &OsStr) -> Option<&[u8]> {
    name.to_str().map(str::as_bytes)
}

#[cfg(unix)]
fn name_from_bytes(bytes: Vec<u8>) -> Option<OsString> {
    use std::os::unix::ffi::OsStringExt;
    Some(OsString::from_vec(bytes))
}

#[cfg(not(unix))]
fn name_from_bytes(bytes: Vec<u8>) -> Option<OsString> {
    String::from_utf8(bytes).ok().map(OsString::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Codec;
    use crate::config::RenameStrategy;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Directories under `destination_root` mirroring every directory of `source_root`
    fn mirrored_dirs(source_root: &Path, destination_root: &Path) -> Vec<PathBuf> {
        WalkDir::new(source_root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_dir())
            .filter_map(|e| {
                e.path()
                    .strip_prefix(source_root)
                    .ok()
                    .map(|relative| destination_root.join(relative))
            })
            .collect()
    }

    struct Fixture {
        _temp: TempDir,
        source: PathBuf,
        destination: PathBuf,
    }

    impl Fixture {
        /// `a/song.flac`, `a/b/track.flac`, `a/notes.txt`
        fn scenario_tree() -> Self {
            let temp = TempDir::new().unwrap();
            let root = temp.path().canonicalize().unwrap();
            let source = root.join("src");
            let destination = root.join("dst");

            fs::create_dir_all(source.join("a/b")).unwrap();
            fs::write(source.join("a/song.flac"), b"flac").unwrap();
            fs::write(source.join("a/b/track.flac"), b"flac").unwrap();
            fs::write(source.join("a/notes.txt"), b"notes").unwrap();

            Self {
                _temp: temp,
                source,
                destination,
            }
        }

        fn config(&self, copy_unmatched: bool) -> TranscodeConfig {
            TranscodeConfig {
                source_codec: Some(Codec::Flac),
                target_codec: Some(Codec::Opus),
                source_root: Some(self.source.clone()),
                destination_root: Some(self.destination.clone()),
                copy_unmatched,
                ..Default::default()
            }
        }

        fn job(&self, input: &str, output: &str, action: JobAction) -> Job {
            Job::new(self.source.join(input), self.destination.join(output), action)
        }
    }

    #[test]
    fn test_transcodes_only_matching_files() {
        let fixture = Fixture::scenario_tree();
        let jobs = plan(&fixture.config(false)).unwrap();

        assert_eq!(
            jobs.as_slice(),
            &[
                fixture.job("a/b/track.flac", "a/b/track.opus", JobAction::Transcode),
                fixture.job("a/song.flac", "a/song.opus", JobAction::Transcode),
            ]
        );
    }

    #[test]
    fn test_copy_unmatched_adds_copy_jobs() {
        let fixture = Fixture::scenario_tree();
        let jobs = plan(&fixture.config(true)).unwrap();

        assert_eq!(jobs.len(), 3);
        assert!(jobs
            .iter()
            .any(|job| *job == fixture.job("a/notes.txt", "a/notes.txt", JobAction::Copy)));
        assert_eq!(jobs.count(JobAction::Transcode), 2);
    }

    #[test]
    fn test_existing_outputs_are_skipped() {
        let fixture = Fixture::scenario_tree();
        fs::create_dir_all(fixture.destination.join("a")).unwrap();
        fs::write(fixture.destination.join("a/song.opus"), b"done").unwrap();

        let jobs = plan(&fixture.config(false)).unwrap();
        assert_eq!(
            jobs.as_slice(),
            &[fixture.job("a/b/track.flac", "a/b/track.opus", JobAction::Transcode)]
        );

        let jobs = plan(&fixture.config(true)).unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs.count(JobAction::Copy), 1);
    }

    #[test]
    fn test_first_occurrence_rename() {
        let fixture = Fixture::scenario_tree();
        fs::write(fixture.source.join("a.flac.flac"), b"flac").unwrap();

        let jobs = plan(&fixture.config(false)).unwrap();
        assert!(jobs
            .iter()
            .any(|job| job.output == fixture.destination.join("a.opus.flac")));
    }

    #[test]
    fn test_suffix_rename() {
        let fixture = Fixture::scenario_tree();
        fs::write(fixture.source.join("a.flac.flac"), b"flac").unwrap();

        let config = TranscodeConfig {
            rename: RenameStrategy::Suffix,
            ..fixture.config(false)
        };
        let jobs = plan(&config).unwrap();
        assert!(jobs
            .iter()
            .any(|job| job.output == fixture.destination.join("a.flac.opus")));
    }

    #[test]
    fn test_extension_match_is_case_sensitive() {
        let fixture = Fixture::scenario_tree();
        fs::write(fixture.source.join("LOUD.FLAC"), b"flac").unwrap();

        let jobs = plan(&fixture.config(false)).unwrap();
        assert!(jobs.iter().all(|job| !job.input.ends_with("LOUD.FLAC")));

        let jobs = plan(&fixture.config(true)).unwrap();
        assert!(jobs
            .iter()
            .any(|job| job.input.ends_with("LOUD.FLAC") && job.action == JobAction::Copy));
    }

    #[test]
    fn test_transcode_extensions_follow_registry() {
        let fixture = Fixture::scenario_tree();
        let config = TranscodeConfig {
            target_codec: Some(Codec::Vorbis),
            ..fixture.config(true)
        };

        for job in plan(&config).unwrap().iter() {
            if job.action == JobAction::Transcode {
                assert!(job.input.to_string_lossy().ends_with(".flac"));
                assert!(job.output.to_string_lossy().ends_with(".ogg"));
            }
        }
    }

    #[test]
    fn test_planning_is_idempotent() {
        let fixture = Fixture::scenario_tree();
        let config = fixture.config(true);

        let first = plan(&config).unwrap();
        let second = plan(&config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_mirrors_every_directory() {
        let fixture = Fixture::scenario_tree();
        fs::create_dir_all(fixture.source.join("empty/deeper")).unwrap();

        plan(&fixture.config(false)).unwrap();

        for dir in mirrored_dirs(&fixture.source, &fixture.destination) {
            assert!(dir.is_dir(), "missing {}", dir.display());
        }
        assert!(fixture.destination.join("empty/deeper").is_dir());
    }

    #[test]
    fn test_empty_source_root() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("src");
        fs::create_dir_all(&source).unwrap();

        let config = TranscodeConfig {
            source_codec: Some(Codec::Flac),
            target_codec: Some(Codec::Opus),
            source_root: Some(source),
            destination_root: Some(temp.path().join("dst")),
            ..Default::default()
        };

        assert!(plan(&config).unwrap().is_empty());
        assert!(temp.path().join("dst").is_dir());
    }

    #[test]
    fn test_invalid_source_root() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file.flac");
        fs::write(&file, b"x").unwrap();

        let mut config = TranscodeConfig {
            source_codec: Some(Codec::Flac),
            target_codec: Some(Codec::Opus),
            source_root: Some(temp.path().join("missing")),
            destination_root: Some(temp.path().join("dst")),
            ..Default::default()
        };
        assert!(matches!(plan(&config), Err(TranscodeError::PathNotFound(_))));

        config.source_root = Some(file);
        assert!(matches!(plan(&config), Err(TranscodeError::NotADirectory(_))));
        assert!(!temp.path().join("dst").exists());
    }

    #[test]
    fn test_destination_blocked_by_file() {
        let fixture = Fixture::scenario_tree();
        fs::write(&fixture.destination, b"not a dir").unwrap();

        let err = plan(&fixture.config(false)).unwrap_err();
        assert!(matches!(err, TranscodeError::DirectoryCreateFailed { .. }));
    }

    #[test]
    fn test_blocked_mirror_directory_aborts_planning() {
        let fixture = Fixture::scenario_tree();
        fs::create_dir_all(&fixture.destination).unwrap();
        fs::write(fixture.destination.join("a"), b"not a dir").unwrap();

        match plan(&fixture.config(true)).unwrap_err() {
            TranscodeError::DirectoryCreateFailed { path, .. } => {
                assert_eq!(path, fixture.destination.join("a"))
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!fixture.destination.join("a/b").exists());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_names_are_transcoded() {
        use std::os::unix::ffi::OsStrExt;

        let fixture = Fixture::scenario_tree();
        let name = OsStr::from_bytes(b"caf\xE9.flac");
        fs::write(fixture.source.join(name), b"flac").unwrap();

        let jobs = plan(&fixture.config(true)).unwrap();
        let job = jobs
            .iter()
            .find(|job| job.input.file_name() == Some(name))
            .unwrap();

        assert_eq!(job.action, JobAction::Transcode);
        assert_eq!(
            job.output,
            fixture.destination.join(OsStr::from_bytes(b"caf\xE9.opus"))
        );
    }

    #[test]
    fn test_nested_destination_is_not_scanned() {
        let fixture = Fixture::scenario_tree();
        let config = TranscodeConfig {
            destination_root: Some(fixture.source.join("out")),
            ..fixture.config(true)
        };

        let first = plan(&config).unwrap();
        assert_eq!(first.len(), 3);

        fs::write(fixture.source.join("out/a/song.opus"), b"done").unwrap();
        let second = plan(&config).unwrap();
        assert_eq!(second.len(), 2);
        assert!(second
            .iter()
            .all(|job| !job.input.starts_with(fixture.source.join("out"))));
        assert!(!fixture.source.join("out/out").exists());
    }

    #[test]
    fn test_colliding_outputs_keep_first_job() {
        let fixture = Fixture::scenario_tree();
        fs::write(fixture.source.join("a/song.opus"), b"already opus").unwrap();

        let jobs = plan(&fixture.config(true)).unwrap();
        let target = fixture.destination.join("a/song.opus");
        let writers: Vec<_> = jobs.iter().filter(|job| job.output == target).collect();

        assert_eq!(writers.len(), 1);
        assert_eq!(writers[0].input, fixture.source.join("a/song.flac"));
    }
}
