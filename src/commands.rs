//! Command handlers

use crate::app::{detect_emission, DetectionOptions, DetectionOutcome, ProgressCallback};
use crate::cli::{Cli, Commands, OutputFormat};
use crate::config::Config;
use crate::domain::repository::ViolationRepository;
use crate::error::{Error, Result};
use crate::export::export_violations_csv;
use crate::infrastructure::persistence::FileViolationRepository;
use crate::output::{output_detection, output_history};
use crate::scanner::scan_directory;
use crate::vision::Cache;
use chrono::{DateTime, Local};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

/// Execute CLI command
pub fn execute(cli: Cli) -> Result<()> {
    // Load config
    let mut config = Config::load()?;

    // Override from CLI args
    if cli.model.is_some() {
        config.model = cli.model.clone();
    }

    match &cli.command {
        Commands::Detect {
            image,
            no_cache,
            plate,
            zone,
            threshold,
        } => {
            // Cache disabled if: --no-cache OR config.cache_enabled=false
            let use_cache = !no_cache && config.cache_enabled;
            let output_format = cli.format.unwrap_or(config.output_format);
            cmd_detect(
                &cli,
                &config,
                image.clone(),
                use_cache,
                plate.clone(),
                zone.clone(),
                *threshold,
                output_format,
            )
        }

        Commands::Batch {
            folder,
            output,
            no_cache,
            jobs,
        } => {
            // Use CLI jobs if specified, otherwise default 4. 0 = auto CPU count.
            let job_count = match jobs {
                Some(0) => num_cpus::get(),
                Some(n) => *n,
                None => 4,
            };
            let use_cache = !no_cache && config.cache_enabled;
            let output_format = cli.format.unwrap_or(config.output_format);
            cmd_batch(
                &cli,
                &config,
                folder.clone(),
                output.clone(),
                use_cache,
                job_count,
                output_format,
            )
        }

        Commands::History { limit } => {
            let output_format = cli.format.unwrap_or(config.output_format);
            cmd_history(&config, *limit, output_format)
        }

        Commands::Send { violation_id } => cmd_send(&config, violation_id),

        Commands::Export { output } => cmd_export(&config, output.clone()),

        Commands::Config {
            show,
            set_model,
            set_threshold,
            set_zone,
            set_ocr_engine,
            set_cache,
            set_output,
            reset,
        } => cmd_config(
            *show,
            set_model.clone(),
            *set_threshold,
            set_zone.clone(),
            *set_ocr_engine,
            *set_cache,
            *set_output,
            *reset,
        ),

        Commands::Cache { clear, stats } => cmd_cache(&config, *clear, *stats),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_detect(
    cli: &Cli,
    config: &Config,
    image: PathBuf,
    use_cache: bool,
    plate: Option<String>,
    zone: Option<String>,
    threshold: Option<f64>,
    output_format: OutputFormat,
) -> Result<()> {
    let mut options = DetectionOptions::new().with_cache(use_cache);
    if let Some(plate) = plate {
        options = options.with_manual_plate(plate);
    }
    if let Some(zone) = zone {
        options = options.with_zone(zone);
    }
    if let Some(threshold) = threshold {
        options = options.with_confidence_threshold(threshold);
    }

    let progress: Option<ProgressCallback> = if cli.verbose {
        Some(Box::new(|msg: &str| eprintln!("{}", msg)))
    } else {
        None
    };

    let outcome = detect_emission(&image, config, &options, progress)
        .map_err(|e| Error::AnalysisFailed(e.to_string()))?;

    output_detection(output_format, &outcome)?;

    Ok(())
}

/// Result from a single detection task
#[derive(Debug)]
struct DetectionTaskResult {
    image_path: PathBuf,
    result: std::result::Result<DetectionOutcome, String>,
}

/// Per-image line in a batch run summary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchEntry {
    image_path: String,
    plate: String,
    severity: String,
    smoke_score: f64,
    confidence: f64,
    violation_id: Option<String>,
}

/// Batch run summary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchSummary {
    entries: Vec<BatchEntry>,
    total_processed: usize,
    violations: usize,
    failed: usize,
    started_at: DateTime<Local>,
    completed_at: DateTime<Local>,
}

fn cmd_batch(
    cli: &Cli,
    config: &Config,
    folder: PathBuf,
    output: Option<PathBuf>,
    use_cache: bool,
    jobs: usize,
    output_format: OutputFormat,
) -> Result<()> {
    // Scan directory
    let images = scan_directory(&folder)?;

    if images.is_empty() {
        return Err(Error::FileNotFound(format!(
            "No images found in {}",
            folder.display()
        )));
    }

    let total_images = images.len();
    if cli.verbose {
        eprintln!(
            "Found {} images to process with {} parallel jobs (cache: {})",
            total_images,
            jobs,
            if use_cache { "on" } else { "off" }
        );
    }

    // Setup progress bar
    let multi_progress = MultiProgress::new();
    let main_pb = multi_progress.add(ProgressBar::new(total_images as u64));
    main_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    // Shared state
    let results: Arc<Mutex<Vec<DetectionTaskResult>>> = Arc::new(Mutex::new(Vec::new()));
    let images = Arc::new(images);
    let next_index = Arc::new(AtomicUsize::new(0));

    let started_at = Local::now();

    // Spawn worker threads. Workers classify but do not write the log;
    // records are persisted on the main thread after the join so the
    // log file is only ever written from one place.
    let mut handles = Vec::new();
    let verbose = cli.verbose;

    for worker_id in 0..jobs {
        let images = Arc::clone(&images);
        let next_index = Arc::clone(&next_index);
        let results = Arc::clone(&results);
        let config = config.clone();
        let pb = main_pb.clone();

        let handle = thread::spawn(move || {
            let options = DetectionOptions::new().with_cache(use_cache).with_record(false);

            loop {
                let idx = next_index.fetch_add(1, Ordering::SeqCst);
                if idx >= images.len() {
                    break;
                }

                let image = &images[idx];

                let filename = image
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("")
                    .to_string();

                if verbose {
                    pb.set_message(format!("[W{}] {}", worker_id, filename));
                }

                let result = detect_emission(image, &config, &options, None)
                    .map_err(|e| e.to_string());

                {
                    let mut results_guard = results.lock().unwrap();
                    results_guard.push(DetectionTaskResult {
                        image_path: image.clone(),
                        result,
                    });
                }

                pb.inc(1);
            }
        });

        handles.push(handle);
    }

    // Wait for all workers to complete
    for handle in handles {
        let _ = handle.join();
    }

    main_pb.finish_with_message("Complete");

    let completed_at = Local::now();

    // Collect results
    let task_results = Arc::try_unwrap(results)
        .expect("All workers should be done")
        .into_inner()
        .unwrap();

    // Persist violations and build the summary
    let repo = FileViolationRepository::open(config.store_dir()?)?;
    let mut entries = Vec::new();
    let mut violations = 0;
    let mut failed = 0;

    for task_result in task_results {
        match task_result.result {
            Ok(outcome) => {
                let violation_id = match outcome.violation {
                    Some(ref record) => {
                        repo.save(record)?;
                        violations += 1;
                        Some(record.violation_id.clone())
                    }
                    None => None,
                };

                entries.push(BatchEntry {
                    image_path: task_result.image_path.display().to_string(),
                    plate: outcome.plate,
                    severity: outcome.analysis.smoke_severity.to_string(),
                    smoke_score: outcome.analysis.smoke_score,
                    confidence: outcome.analysis.confidence,
                    violation_id,
                });
            }
            Err(e) => {
                if cli.verbose {
                    eprintln!(
                        "Failed to process {}: {}",
                        task_result.image_path.display(),
                        e
                    );
                }
                failed += 1;
            }
        }
    }

    // Sort entries by image path for consistent output
    entries.sort_by(|a, b| a.image_path.cmp(&b.image_path));

    let summary = BatchSummary {
        entries,
        total_processed: total_images,
        violations,
        failed,
        started_at,
        completed_at,
    };

    // Output results
    if let Some(output_path) = output {
        let content = serde_json::to_string_pretty(&summary)?;
        std::fs::write(&output_path, content)?;
        println!("Results saved to: {}", output_path.display());
    } else {
        println!("\nBatch Detection Complete");
        println!("========================");
        println!("Total:      {}", summary.total_processed);
        println!("Violations: {}", summary.violations);
        println!("Failed:     {}", summary.failed);
        println!(
            "Duration:   {:.1}s",
            (summary.completed_at - summary.started_at).num_milliseconds() as f64 / 1000.0
        );

        if output_format == OutputFormat::Json {
            let content = serde_json::to_string_pretty(&summary)?;
            println!("\n{}", content);
        }
    }

    Ok(())
}

fn cmd_history(config: &Config, limit: Option<usize>, output_format: OutputFormat) -> Result<()> {
    let repo = FileViolationRepository::open(config.store_dir()?)?;
    let mut records = repo.find_all()?;

    if let Some(limit) = limit {
        records.truncate(limit);
    }

    output_history(output_format, &records)
}

fn cmd_send(config: &Config, violation_id: &str) -> Result<()> {
    let repo = FileViolationRepository::open(config.store_dir()?)?;
    repo.mark_sent(violation_id)?;
    println!("Violation {} marked as sent.", violation_id);
    Ok(())
}

fn cmd_export(config: &Config, output: Option<PathBuf>) -> Result<()> {
    let output_path = output.unwrap_or_else(|| PathBuf::from("violations.csv"));

    let repo = FileViolationRepository::open(config.store_dir()?)?;
    let count = export_violations_csv(&repo, &output_path)?;

    println!(
        "Exported {} records to: {}",
        count,
        output_path.display()
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_config(
    show: bool,
    set_model: Option<String>,
    set_threshold: Option<f64>,
    set_zone: Option<String>,
    set_ocr_engine: Option<u32>,
    set_cache: Option<bool>,
    set_output: Option<OutputFormat>,
    reset: bool,
) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(model) = set_model {
        config.model = Some(model);
        modified = true;
    }

    if let Some(threshold) = set_threshold {
        config.set_confidence_threshold(threshold)?;
        modified = true;
    }

    if let Some(zone) = set_zone {
        config.zone = zone;
        modified = true;
    }

    if let Some(engine) = set_ocr_engine {
        config.ocr_engine = engine;
        modified = true;
    }

    if let Some(cache_enabled) = set_cache {
        config.cache_enabled = cache_enabled;
        modified = true;
    }

    if let Some(output_format) = set_output {
        config.output_format = output_format;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}

fn cmd_cache(config: &Config, clear: bool, stats: bool) -> Result<()> {
    if !config.cache_enabled {
        return Err(Error::Cache(crate::error::CacheError::IoError(
            "Cache is disabled. Enable with: smokeguard config --set-cache true".to_string(),
        )));
    }

    let cache = Cache::new(config.cache_dir()?)?;

    if clear {
        let count = cache.clear()?;
        println!("Cleared {} cached results", count);
    }

    if stats || !clear {
        println!("{}", cache.stats()?);
    }

    Ok(())
}
