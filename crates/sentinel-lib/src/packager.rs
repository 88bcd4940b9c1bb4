//! Deployment bundle packaging
//!
//! Builds a deflate-compressed zip where the designated entry file sits at
//! the archive root and every other file under the source directory keeps
//! its relative path.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Entry file forced to the archive root
pub const DEFAULT_ENTRY_FILE: &str = "lambda_function.py";

/// Default source directory
pub const DEFAULT_SOURCE_DIR: &str = "lambda_package";

/// Default output archive
pub const DEFAULT_OUTPUT_ZIP: &str = "lambda_deployment_package.zip";

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Above this size the archive must be staged in S3 before deployment
pub const DIRECT_UPLOAD_LIMIT_MB: f64 = 50.0;

/// Platform ceiling for the unzipped deployment
pub const UNZIPPED_LIMIT_MB: f64 = 250.0;

/// Advisory about the produced archive size; never an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeAdvisory {
    WithinDirectUploadLimit,
    RequiresS3Upload,
    ExceedsUnzippedLimit,
}

impl SizeAdvisory {
    pub fn for_size(size_bytes: u64) -> Self {
        let size_mb = size_bytes as f64 / BYTES_PER_MB;
        if size_mb > UNZIPPED_LIMIT_MB {
            SizeAdvisory::ExceedsUnzippedLimit
        } else if size_mb > DIRECT_UPLOAD_LIMIT_MB {
            SizeAdvisory::RequiresS3Upload
        } else {
            SizeAdvisory::WithinDirectUploadLimit
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            SizeAdvisory::WithinDirectUploadLimit => {
                "Zip file size is within direct upload limits (if unzipped size also fits)."
            }
            SizeAdvisory::RequiresS3Upload => {
                "Zip file is >50MB. It must be uploaded to S3 first, then referenced by Lambda."
            }
            SizeAdvisory::ExceedsUnzippedLimit => {
                "Unzipped size might exceed Lambda's 250MB limit."
            }
        }
    }
}

/// Result of building a deployment bundle
#[derive(Debug, Clone, Serialize)]
pub struct PackageReport {
    pub output: PathBuf,
    /// Archive paths in write order
    pub entries: Vec<String>,
    /// Where the entry file was taken from, if found
    pub entry_source: Option<PathBuf>,
    pub size_bytes: u64,
    pub advisory: SizeAdvisory,
}

impl PackageReport {
    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / BYTES_PER_MB
    }
}

/// Packages a source directory into a deployment zip
#[derive(Debug, Clone)]
pub struct Packager {
    source_dir: PathBuf,
    entry_file: String,
}

impl Packager {
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            entry_file: DEFAULT_ENTRY_FILE.to_string(),
        }
    }

    pub fn with_entry_file(mut self, entry_file: impl Into<String>) -> Self {
        self.entry_file = entry_file.into();
        self
    }

    /// Locate the entry file in the source directory, then in its parent
    pub fn find_entry_file(&self) -> Option<PathBuf> {
        let primary = self.source_dir.join(&self.entry_file);
        if primary.is_file() {
            return Some(primary);
        }

        warn!(
            path = %primary.display(),
            "Entry file not found in source directory, checking its parent"
        );

        let parent = self
            .source_dir
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let fallback = parent.join(&self.entry_file);
        fallback.is_file().then_some(fallback)
    }

    /// Write the archive to `output` and report its contents and size
    pub fn create(&self, output: impl AsRef<Path>) -> Result<PackageReport> {
        let output = output.as_ref();
        if Path::new(&self.entry_file).components().count() != 1 {
            anyhow::bail!(
                "Entry file must be a bare file name, got {}",
                self.entry_file
            );
        }

        let file = File::create(output)
            .with_context(|| format!("Failed to create archive {}", output.display()))?;
        // The archive may be written inside the tree being packaged
        let output_path = output
            .canonicalize()
            .with_context(|| format!("Failed to resolve archive path {}", output.display()))?;
        let mut writer = ZipWriter::new(file);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut entries = Vec::new();

        let entry_source = self.find_entry_file();
        match entry_source {
            Some(ref path) => {
                add_file(&mut writer, options, path, &self.entry_file)?;
                entries.push(self.entry_file.clone());
            }
            None => warn!(
                entry_file = %self.entry_file,
                source_dir = %self.source_dir.display(),
                "Entry file not found, archive will not contain it"
            ),
        }

        for entry in WalkDir::new(&self.source_dir)
            .min_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.with_context(|| {
                format!("Failed to walk directory {}", self.source_dir.display())
            })?;

            if !entry.path().is_file() {
                continue;
            }
            if entry.path().canonicalize().ok().as_deref() == Some(output_path.as_path()) {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(&self.source_dir)
                .with_context(|| {
                    format!("{} is outside the source directory", entry.path().display())
                })?;

            // Already written at the root
            if entry.depth() == 1 && relative == Path::new(&self.entry_file) {
                continue;
            }

            let archive_path = archive_path(relative);
            add_file(&mut writer, options, entry.path(), &archive_path)?;
            entries.push(archive_path);
        }

        writer.finish().context("Failed to finalize archive")?;

        let size_bytes = std::fs::metadata(output)
            .with_context(|| format!("Failed to stat archive {}", output.display()))?
            .len();
        let report = PackageReport {
            output: output.to_path_buf(),
            entries,
            entry_source,
            size_bytes,
            advisory: SizeAdvisory::for_size(size_bytes),
        };

        info!(
            output = %output.display(),
            entries = report.entries.len(),
            size_bytes = report.size_bytes,
            "Created deployment package"
        );
        match report.advisory {
            SizeAdvisory::ExceedsUnzippedLimit => warn!("{}", report.advisory.message()),
            _ => info!("{}", report.advisory.message()),
        }

        Ok(report)
    }
}

/// Zip entry name with `/` separators regardless of platform
fn archive_path(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn add_file(
    writer: &mut ZipWriter<File>,
    options: SimpleFileOptions,
    source: &Path,
    archive_path: &str,
) -> Result<()> {
    debug!(source = %source.display(), archive_path = %archive_path, "Adding file");

    writer
        .start_file(archive_path, options)
        .with_context(|| format!("Failed to start archive entry {}", archive_path))?;
    let mut reader = BufReader::new(
        File::open(source).with_context(|| format!("Failed to open {}", source.display()))?,
    );
    io::copy(&mut reader, writer)
        .with_context(|| format!("Failed to write {} to archive", source.display()))?;
    Ok(())
}
