use anyhow::{Result, Context};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

/// `[mm:ss]`, `[mm:ss.xx]` or `[mm:ss:xx]` time tags, possibly several per line
static LRC_TIMESTAMP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[\d{1,3}:\d{2}(?:[.:]\d{1,3})?\]").expect("valid LRC timestamp pattern")
});

/// `[ar:Artist]`, `[ti:Title]`, `[offset:+100]` and similar header tags
static LRC_METADATA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\[[a-zA-Z#]+:[^\]]*\]\s*$").expect("valid LRC metadata pattern")
});

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @generates: Output path for processed lyrics
    // @params: input_file, output_dir, target_language, extension
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        target_language: &str,
        extension: &str,
    ) -> PathBuf {
        let stem = input_file.as_ref().file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push('.');
        output_filename.push_str(target_language);
        output_filename.push('.');
        output_filename.push_str(extension);

        output_dir.as_ref().join(output_filename)
    }

    /// Find lyrics files in a directory, recursively and in a stable order
    pub fn find_lyrics_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true).sort_by_file_name() {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() && Self::detect_file_type(path) != FileType::Unknown {
                result.push(path.to_path_buf());
            }
        }

        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Detect the lyrics format from the file extension
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> FileType {
        let extension = path
            .as_ref()
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase());

        match extension.as_deref() {
            Some("lrc") => FileType::Lrc,
            Some("txt") => FileType::PlainText,
            _ => FileType::Unknown,
        }
    }

    /// Read lyric lines, one per line of the file.
    ///
    /// LRC files lose their time tags and header lines; empty lines are kept
    /// so the output stays aligned with the song.
    pub fn read_lyrics<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
        let path = path.as_ref();
        let content = Self::read_to_string(path)?;
        let is_lrc = Self::detect_file_type(path) == FileType::Lrc;
        Ok(parse_lyrics(&content, is_lrc))
    }
}

/// Split text into lyric lines, optionally stripping LRC markup
pub fn parse_lyrics(content: &str, is_lrc: bool) -> Vec<String> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    content
        .lines()
        .filter(|line| !(is_lrc && LRC_METADATA.is_match(line)))
        .map(|line| if is_lrc { strip_lrc_timestamps(line) } else { line.trim_end().to_string() })
        .collect()
}

/// Remove LRC time tags from a line
pub fn strip_lrc_timestamps(line: &str) -> String {
    LRC_TIMESTAMP.replace_all(line, "").trim().to_string()
}

/// Enum representing the supported lyrics formats
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FileType {
    /// One lyric per line
    PlainText,
    /// Timed lyrics
    Lrc,
    /// Anything else
    Unknown,
}
