use anyhow::{Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::script_detection::{ScriptType, detect_script, is_translatable};
use crate::translation::{LyricsPipeline, ProcessedResult};

// @module: Application controller for lyrics processing

/// One line of a processed lyrics file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricLine {
    pub original: String,
    pub translated: String,
    pub romanized: String,
}

/// JSON document written for a processed lyrics file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricsDocument {
    /// Input file, or `-` for text given on the command line
    pub source: String,
    pub target_language: String,
    /// Dominant script of the translatable lines
    pub script: ScriptType,
    pub lines: Vec<LyricLine>,
}

impl LyricsDocument {
    /// Pair every original line with its result
    pub fn new(source: impl Into<String>, target_language: &str, lines: &[String], result: ProcessedResult) -> Self {
        let translatable: Vec<&String> = lines.iter().filter(|line| is_translatable(line)).collect();
        let lines = lines
            .iter()
            .zip(result.translated)
            .zip(result.romanized)
            .map(|((original, translated), romanized)| LyricLine {
                original: original.clone(),
                translated,
                romanized,
            })
            .collect();

        Self {
            source: source.into(),
            target_language: target_language.to_string(),
            script: detect_script(&translatable),
            lines,
        }
    }
}

/// Counts reported after folder processing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// Main application controller for lyrics processing
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Shared pipeline, one context per controller
    pipeline: LyricsPipeline,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let pipeline = LyricsPipeline::new(&config);
        Ok(Self { config, pipeline })
    }

    /// Create a controller around an existing pipeline
    pub fn with_pipeline(config: Config, pipeline: LyricsPipeline) -> Self {
        Self { config, pipeline }
    }

    /// The pipeline
    pub fn pipeline(&self) -> &LyricsPipeline {
        &self.pipeline
    }

    /// Process lines, bounded by the configured timeout.
    ///
    /// A call that does not finish in time is abandoned and the original lines
    /// are returned in both fields.
    pub async fn process_lines(&self, lines: &[String]) -> ProcessedResult {
        let target_language = &self.config.target_language;
        let timeout = Duration::from_secs(self.config.pipeline.process_timeout_secs);

        match tokio::time::timeout(timeout, self.pipeline.process(lines, target_language)).await {
            Ok(result) => result,
            Err(_) => {
                error!(
                    "Processing {} lines timed out after {}, returning originals",
                    lines.len(),
                    Self::format_duration(timeout)
                );
                // The abandoned call must not commit a late result
                self.pipeline.reset_context(None);
                ProcessedResult::passthrough(lines)
            }
        }
    }

    /// Process text passed directly, one lyric per line
    pub async fn process_text(&self, text: &str) -> LyricsDocument {
        let lines: Vec<String> = text.lines().map(str::to_string).collect();
        let result = self.process_lines(&lines).await;
        LyricsDocument::new("-", &self.config.target_language, &lines, result)
    }

    /// Process one lyrics file into a document without writing it
    pub async fn process_file(&self, input_file: &Path) -> Result<LyricsDocument> {
        if !input_file.is_file() {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        let lines = FileManager::read_lyrics(input_file)?;
        debug!("Read {} lines from {:?}", lines.len(), input_file);
        let result = self.process_lines(&lines).await;

        Ok(LyricsDocument::new(
            input_file.to_string_lossy(),
            &self.config.target_language,
            &lines,
            result,
        ))
    }

    /// Process one lyrics file and write `<stem>.<lang>.json` into `output_dir`.
    ///
    /// Returns the written path, or `None` when an existing output was kept.
    pub async fn run(&self, input_file: PathBuf, output_dir: PathBuf, force_overwrite: bool) -> Result<Option<PathBuf>> {
        let start_time = std::time::Instant::now();

        let output_path = FileManager::generate_output_path(&input_file, &output_dir, &self.config.target_language, "json");
        if output_path.exists() && !force_overwrite {
            warn!("Skipping file, output already exists (use -f to force overwrite): {:?}", output_path);
            return Ok(None);
        }

        let document = self.process_file(&input_file).await?;
        let json = serde_json::to_string_pretty(&document)?;
        FileManager::write_to_file(&output_path, &json)?;

        info!(
            "Processed {} lines ({}) in {}: {:?}",
            document.lines.len(),
            document.script,
            Self::format_duration(start_time.elapsed()),
            output_path
        );
        Ok(Some(output_path))
    }

    /// Run the workflow in folder mode, processing every lyrics file in a directory.
    /// Files that already have an output will be skipped
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<FolderSummary> {
        let start_time = std::time::Instant::now();

        if !input_dir.is_dir() {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let files = FileManager::find_lyrics_files(&input_dir)?;
        if files.is_empty() {
            return Err(anyhow!("No lyrics files found in directory: {:?}", input_dir));
        }

        let folder_pb = ProgressBar::new(files.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(style.progress_chars("█▓▒░"));
        folder_pb.set_message("Processing files");

        let mut summary = FolderSummary::default();

        for file in &files {
            let file_name = file
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Processing: {}", file_name));

            let output_dir = file.parent().map_or_else(|| input_dir.clone(), Path::to_path_buf);
            match self.run(file.clone(), output_dir, force_overwrite).await {
                Ok(Some(_)) => summary.processed += 1,
                Ok(None) => summary.skipped += 1,
                Err(e) => {
                    error!("Error processing file {}: {}", file_name, e);
                    summary.errors += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");

        info!(
            "Folder processing completed: {} processed, {} skipped, {} errors in {}",
            summary.processed,
            summary.skipped,
            summary.errors,
            Self::format_duration(start_time.elapsed())
        );

        Ok(summary)
    }

    // Format duration in a human-readable format
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
