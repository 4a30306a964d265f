use anyhow::{Result, Context};
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::app_config::ParserConfig;
use crate::document::Document;
use crate::lexer::Lexer;

// @module: File and directory utilities

/// File extension of ADL documents
pub const ADL_EXTENSION: &str = "adl";

// An <ADL> tag near the start of the file, in any case
static ADL_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)^\s*(/\*.*?\*/\s*)*<ADL>").expect("Invalid ADL tag regex")
});

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @generates: Output path for a rewritten document
    // @params: input_file, output_dir, suffix
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        suffix: &str,
    ) -> PathBuf {
        let input_file = input_file.as_ref();
        let output_dir = output_dir.as_ref();

        let stem = input_file.file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push('.');
        output_filename.push_str(suffix);
        output_filename.push('.');
        output_filename.push_str(ADL_EXTENSION);

        output_dir.join(output_filename)
    }

    /// Find ADL documents in a directory tree
    pub fn find_adl_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true).sort_by_file_name() {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() && Self::detect_file_type(path)? == FileType::Adl {
                result.push(path.to_path_buf());
            }
        }

        Ok(result)
    }

    /// Open a file as a lexer. The file is closed before this returns.
    pub fn open_lexer<P: AsRef<Path>>(path: P) -> Result<Lexer> {
        let file = File::open(&path)
            .with_context(|| format!("Failed to open file: {:?}", path.as_ref()))?;
        Lexer::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Parse an ADL document from a file
    pub fn read_document<P: AsRef<Path>>(path: P, config: &ParserConfig) -> Result<Document> {
        let mut lexer = Self::open_lexer(&path)?;
        Document::read(&mut lexer, config)
            .with_context(|| format!("Failed to parse ADL document: {:?}", path.as_ref()))
    }

    /// Write a document in ADL text form
    pub fn write_document<P: AsRef<Path>>(path: P, document: &Document) -> Result<()> {
        Self::write_to_file(path, &format!("{}\n", document))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Detect an ADL document by its extension, or by an `<ADL>` tag at the start
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> Result<FileType> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(anyhow::anyhow!("File does not exist: {:?}", path));
        }

        if let Some(ext) = path.extension() {
            if ext.to_string_lossy().eq_ignore_ascii_case(ADL_EXTENSION) {
                return Ok(FileType::Adl);
            }
        }

        // Fall back to examining the first kilobyte
        let mut head = Vec::with_capacity(1024);
        File::open(path)
            .with_context(|| format!("Failed to open file: {:?}", path))?
            .take(1024)
            .read_to_end(&mut head)
            .with_context(|| format!("Failed to read file: {:?}", path))?;
        if ADL_TAG_REGEX.is_match(&String::from_utf8_lossy(&head)) {
            return Ok(FileType::Adl);
        }

        Ok(FileType::Unknown)
    }
}

/// Enum representing different file types
#[derive(Debug, PartialEq, Eq)]
pub enum FileType {
    /// AES31-3 ADL document
    Adl,
    /// Anything else
    Unknown,
}
