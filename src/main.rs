use clap::Parser;
use plate_gallery::core::export::{leaderboard_to_csv, summaries_to_csv};
use plate_gallery::domain::ports::{ObjectStorage, RecordSource};
use plate_gallery::utils::error::ErrorSeverity;
use plate_gallery::utils::validation::{validate_palindrome_form, Validate};
use plate_gallery::utils::logger;
use plate_gallery::{
    format_license_plate, is_palindrome, normalize_plate, Catalog, CliConfig, CollectorForm,
    Command, GalleryError, GalleryFilter, ImageUpload, LocalStorage, OutputFormat,
    PalindromeForm, RestSource, Result, Settings, SnapshotSource, SourceSelection,
    UploadService,
};
use std::path::Path;
use std::sync::Arc;

/// Admin work that needs object storage.
enum StorageJob {
    Photo(ImageUpload),
    Palindrome(PalindromeForm),
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    let file = match cli.load_file_layer() {
        Ok(file) => file,
        Err(e) => {
            eprintln!("❌ Failed to load config file: {}", e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    logger::init_cli_logger(cli.verbose_with(&file), cli.json_logs_with(&file));
    tracing::info!("Starting plate-gallery");

    let settings = cli.settings(&file);
    tracing::debug!("Settings: {:?}", settings);

    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    match run(&cli.command, &settings).await {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            tracing::error!(
                "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 4,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }
}

/// Returns `Ok(false)` when a check ran but did not pass.
async fn run(command: &Command, settings: &Settings) -> Result<bool> {
    match command {
        Command::Check { plate } => {
            let passed = is_palindrome(plate);
            let normalized = normalize_plate(plate);
            if passed {
                println!(
                    "✅ {} is a palindrome ({})",
                    format_license_plate(plate),
                    normalized
                );
            } else {
                println!(
                    "❌ {} is not a palindrome ({})",
                    format_license_plate(plate),
                    normalized
                );
            }
            Ok(passed)
        }

        Command::Validate {
            plate,
            collector,
            image,
        } => {
            let image = match image {
                Some(path) => Some(read_image(path).await?),
                None => None,
            };
            let form = PalindromeForm {
                license_plate: plate.clone(),
                collector_id: collector.clone(),
                image,
                ..Default::default()
            };

            let result = validate_palindrome_form(&form);
            if result.is_valid() {
                println!("✅ Submission is valid");
            } else {
                for (field, message) in &result.errors {
                    println!("❌ {}: {}", field, message);
                }
            }
            Ok(result.is_valid())
        }

        Command::Leaderboard { format } => {
            let catalog = Catalog::new(build_source(settings).await?);
            let board = catalog.leaderboard().await?;

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&board)?),
                OutputFormat::Csv => print!("{}", leaderboard_to_csv(&board)?),
                OutputFormat::Table => {
                    println!(
                        "{:>4}  {:<28} {:>6}  {:<10}  {:<10}",
                        "RANK", "COLLECTOR", "FINDS", "FIRST", "LATEST"
                    );
                    for entry in &board {
                        println!(
                            "{:>4}  {:<28} {:>6}  {:<10}  {:<10}",
                            entry.rank,
                            entry.collector.name,
                            entry.total_finds,
                            entry.earliest_find.date_naive(),
                            entry.latest_find.date_naive()
                        );
                    }
                }
            }
            Ok(true)
        }

        Command::Stats {
            collector_id,
            format,
        } => {
            let catalog = Catalog::new(build_source(settings).await?);
            let (collector, stats) = catalog.collector_stats(collector_id).await?;

            match format {
                OutputFormat::Json | OutputFormat::Csv => {
                    let body = serde_json::json!({ "collector": collector, "stats": stats });
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                OutputFormat::Table => {
                    let or_dash = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());
                    println!("{} ({})", collector.name, collector.id);
                    println!("  Total finds:       {}", stats.total_finds);
                    println!("  First find:        {}", or_dash(stats.earliest_find.map(|d| d.to_string())));
                    println!("  Latest find:       {}", or_dash(stats.latest_find.map(|d| d.to_string())));
                    println!("  Favorite location: {}", or_dash(stats.favorite_location));
                    println!("  Favorite car type: {}", or_dash(stats.favorite_car_type));
                    println!("  Locations:         {}", stats.locations_count);
                    println!("  Car types:         {}", stats.car_types_count);
                }
            }
            Ok(true)
        }

        Command::Collectors { format } => {
            let catalog = Catalog::new(build_source(settings).await?);
            let summaries = catalog.collector_summaries().await?;

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summaries)?),
                OutputFormat::Csv => print!("{}", summaries_to_csv(&summaries)?),
                OutputFormat::Table => {
                    for summary in &summaries {
                        println!(
                            "{:<28} {:>4} finds  {}",
                            summary.collector.name,
                            summary.total_palindromes,
                            summary.collector.location.as_deref().unwrap_or("")
                        );
                    }
                }
            }
            Ok(true)
        }

        Command::Gallery {
            search,
            collector_id,
            location,
            car_type,
            format,
        } => {
            let catalog = Catalog::new(build_source(settings).await?);
            let filter = GalleryFilter {
                search: search.clone(),
                collector_id: collector_id.clone(),
                location: location.clone(),
                car_type: car_type.clone(),
            };
            let items = catalog.gallery(&filter).await?;

            match format {
                OutputFormat::Json | OutputFormat::Csv => {
                    println!("{}", serde_json::to_string_pretty(&items)?)
                }
                OutputFormat::Table => {
                    for item in &items {
                        println!(
                            "{:<12} {:<24} {:<20} {}",
                            format_license_plate(&item.find.license_plate),
                            item.collector_name,
                            item.find.location_found.as_deref().unwrap_or("-"),
                            item.find.car_type.as_deref().unwrap_or("-")
                        );
                    }
                    println!("{} palindromes", items.len());
                }
            }
            Ok(true)
        }

        Command::Upload { admin, file } => {
            let upload = read_image(file).await?;
            let job = StorageJob::Photo(upload);
            run_storage_job(settings, admin.as_deref(), job).await
        }

        Command::AddPalindrome {
            admin,
            plate,
            collector,
            image,
            car_type,
            location,
            date_found,
            notes,
        } => {
            let form = PalindromeForm {
                license_plate: plate.clone(),
                collector_id: collector.clone(),
                image: Some(read_image(image).await?),
                car_type: car_type.clone(),
                location_found: location.clone(),
                date_found: date_found.map(|d| d.to_string()),
                additional_notes: notes.clone(),
            };
            run_storage_job(settings, admin.as_deref(), StorageJob::Palindrome(form)).await
        }

        Command::AddCollector {
            admin,
            name,
            email,
            location,
            bio,
            notes,
        } => {
            let catalog = Catalog::new(build_source(settings).await?);
            let form = CollectorForm {
                name: name.clone(),
                email: email.clone(),
                location: location.clone(),
                bio: bio.clone(),
                notes: notes.clone(),
            };
            let collector = catalog.create_collector(admin.as_deref(), &form).await?;
            println!("{}", serde_json::to_string_pretty(&collector)?);
            Ok(true)
        }

        Command::DeleteCollector { admin, id } => {
            let catalog = Catalog::new(build_source(settings).await?);
            catalog.delete_collector(admin.as_deref(), id).await?;
            println!("✅ Deleted collector {}", id);
            Ok(true)
        }

        Command::DeletePalindrome { admin, id } => {
            let catalog = Catalog::new(build_source(settings).await?);
            catalog.delete_palindrome(admin.as_deref(), id).await?;
            println!("✅ Deleted palindrome {}", id);
            Ok(true)
        }
    }
}

async fn run_storage_job(
    settings: &Settings,
    admin: Option<&str>,
    job: StorageJob,
) -> Result<bool> {
    let source: Arc<dyn RecordSource> = Arc::from(build_source(settings).await?);

    match settings.storage_backend.as_str() {
        "s3" => storage_job_on_s3(settings, source, admin, job).await,
        _ => {
            let mut storage = LocalStorage::new(settings.storage_path.clone());
            if let Some(url) = &settings.public_base_url {
                storage = storage.with_public_base_url(url.clone());
            }
            storage_job(storage, source, settings, admin, job).await
        }
    }
}

async fn build_source(settings: &Settings) -> Result<Box<dyn RecordSource>> {
    match settings.source_selection()? {
        SourceSelection::Snapshot(path) => Ok(Box::new(SnapshotSource::from_file(path).await?)),
        SourceSelection::Rest { api_url, api_key } => {
            tracing::info!("Reading records from {}", api_url);
            Ok(Box::new(RestSource::new(api_url, api_key)))
        }
    }
}

async fn storage_job<S: ObjectStorage>(
    storage: S,
    source: Arc<dyn RecordSource>,
    settings: &Settings,
    admin: Option<&str>,
    job: StorageJob,
) -> Result<bool> {
    let uploads = UploadService::new(storage, source.clone()).with_bucket(settings.bucket.clone());

    match job {
        StorageJob::Photo(upload) => {
            let receipt = uploads.upload(admin, upload).await?;
            println!("{}", serde_json::to_string_pretty(&receipt)?);
        }
        StorageJob::Palindrome(form) => {
            let catalog = Catalog::new(source);
            let find = catalog.create_palindrome(&uploads, admin, form).await?;
            println!("{}", serde_json::to_string_pretty(&find)?);
        }
    }
    Ok(true)
}

#[cfg(feature = "s3")]
async fn storage_job_on_s3(
    settings: &Settings,
    source: Arc<dyn RecordSource>,
    admin: Option<&str>,
    job: StorageJob,
) -> Result<bool> {
    let mut storage = plate_gallery::S3Storage::from_env().await;
    if let Some(url) = &settings.public_base_url {
        storage = storage.with_public_base_url(url.clone());
    }
    storage_job(storage, source, settings, admin, job).await
}

#[cfg(not(feature = "s3"))]
async fn storage_job_on_s3(
    _settings: &Settings,
    _source: Arc<dyn RecordSource>,
    _admin: Option<&str>,
    _job: StorageJob,
) -> Result<bool> {
    Err(GalleryError::ConfigError {
        message: "storage backend 's3' requires building with --features s3".to_string(),
    })
}

async fn read_image(path: &str) -> Result<ImageUpload> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string());

    Ok(ImageUpload {
        content_type: guess_content_type(&file_name).to_string(),
        file_name,
        bytes,
    })
}

fn guess_content_type(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}
