//! Build command - generates the static site

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr, bail};
use folio_generator::{BuildOptions, build_site};

/// Run the build command.
///
/// Fails when the configuration cannot be loaded, the content directory
/// cannot be read, or the home or document pages could not be written.
pub fn run(
    config_path: &Path,
    output: Option<&Path>,
    verbose: bool,
    debug: bool,
    no_env: bool,
) -> Result<()> {
    tracing::info!(?config_path, ?output, "Starting build");

    let mut options = BuildOptions::new(config_path);
    options.output_dir = output.map(Path::to_path_buf);
    options.verbose = verbose;
    options.debug = debug;
    options.no_env = no_env;

    let report = build_site(&options).wrap_err("Build failed")?;

    if !report.warnings.is_empty() {
        println!();
        println!("  Warnings:");
        for warning in &report.warnings {
            println!("  ⚠ {warning}");
        }
    }

    println!();
    println!("  Pages:      {}", report.pages_written);
    println!("  Documents:  {}", report.documents);
    println!("  Tags:       {}", report.tags);
    println!("  Duration:   {:.2}s", report.duration.as_secs_f64());
    println!();

    if !report.failed.is_empty() {
        let failed: Vec<String> = report.failed.iter().map(ToString::to_string).collect();
        println!("  Skipped:    {}", failed.join(", "));
        println!();
    }

    if !report.core_pages_ok() {
        bail!("Build incomplete: home or document pages could not be written");
    }

    tracing::info!(
        pages = report.pages_written,
        duration_ms = report.duration.as_millis() as u64,
        "Build completed"
    );
    Ok(())
}
