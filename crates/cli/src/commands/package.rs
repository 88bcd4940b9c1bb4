//! Deployment packaging command

use anyhow::Result;
use colored::Colorize;
use sentinel_lib::packager::{Packager, SizeAdvisory};
use std::path::Path;

use crate::output::{print_info, print_json, print_success, print_warning, OutputFormat};

/// Build the deployment zip and report its size
pub fn create_package(source: &Path, output: &Path, entry: &str, format: OutputFormat) -> Result<()> {
    let packager = Packager::new(source).with_entry_file(entry);
    let report = packager.create(output)?;

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => {
            if report.entry_source.is_none() {
                print_warning(&format!(
                    "{} not found in {} or its parent; the archive has no entry file",
                    entry,
                    source.display()
                ));
            }
            print_success(&format!("Successfully created {}", output.display()));
            println!("Entries:  {}", report.entries.len());
            println!("Zip file size: {} MB", format!("{:.2}", report.size_mb()).cyan());

            match report.advisory {
                SizeAdvisory::ExceedsUnzippedLimit => {
                    print_warning(&format!("WARNING: {}", report.advisory.message()))
                }
                SizeAdvisory::RequiresS3Upload => {
                    print_info(&format!("NOTE: {}", report.advisory.message()))
                }
                SizeAdvisory::WithinDirectUploadLimit => print_info(report.advisory.message()),
            }
        }
    }

    Ok(())
}
