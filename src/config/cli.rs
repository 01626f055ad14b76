use crate::config::toml_config::TomlConfig;
use crate::config::{PartialSettings, Settings};
use crate::utils::error::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Clone, Parser)]
#[command(name = "plate-gallery")]
#[command(about = "Palindromic licence plate catalogue: leaderboard, stats and uploads")]
pub struct CliConfig {
    /// TOML configuration file; flags given here take precedence
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[arg(long, global = true, env = "PLATE_GALLERY_API_URL")]
    pub api_url: Option<String>,

    #[arg(long, global = true, env = "PLATE_GALLERY_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Read records from a JSON snapshot instead of the API
    #[arg(long, global = true)]
    pub snapshot: Option<String>,

    /// `local` or `s3` [default: local]
    #[arg(long, global = true)]
    pub storage_backend: Option<String>,

    /// Root directory for local object storage [default: ./storage]
    #[arg(long, global = true)]
    pub storage_path: Option<String>,

    /// Bucket for uploaded photos [default: images]
    #[arg(long, global = true)]
    pub bucket: Option<String>,

    #[arg(long, global = true)]
    pub public_base_url: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Check whether a plate is a palindrome
    Check { plate: String },

    /// Validate a new-palindrome submission without storing it
    Validate {
        #[arg(long)]
        plate: String,
        #[arg(long, default_value = "")]
        collector: String,
        #[arg(long)]
        image: Option<String>,
    },

    /// Rank collectors by number of finds
    Leaderboard {
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Statistics for one collector
    Stats {
        collector_id: String,
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// List collectors with their find counts
    Collectors {
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Browse and search the gallery
    Gallery {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        collector_id: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        car_type: Option<String>,
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Upload a plate photo as an admin
    Upload {
        /// Profile id of the uploading admin
        #[arg(long)]
        admin: Option<String>,
        file: String,
    },

    /// Add a collector as an admin
    AddCollector {
        #[arg(long)]
        admin: Option<String>,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Store a plate photo and record the find as an admin
    AddPalindrome {
        #[arg(long)]
        admin: Option<String>,
        #[arg(long)]
        plate: String,
        #[arg(long)]
        collector: String,
        /// Plate photo (JPEG, PNG or WebP, at most 5MB)
        #[arg(long)]
        image: String,
        #[arg(long)]
        car_type: Option<String>,
        #[arg(long)]
        location: Option<String>,
        /// Discovery date, YYYY-MM-DD
        #[arg(long)]
        date_found: Option<NaiveDate>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete a collector as an admin
    DeleteCollector {
        #[arg(long)]
        admin: Option<String>,
        id: String,
    },

    /// Delete a palindrome record as an admin
    DeletePalindrome {
        #[arg(long)]
        admin: Option<String>,
        id: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl CliConfig {
    /// Verbose when either the flag or the config file asks for it.
    pub fn verbose_with(&self, file: &TomlConfig) -> bool {
        self.verbose || file.verbose()
    }

    pub fn json_logs_with(&self, file: &TomlConfig) -> bool {
        self.log_json || file.json_logs()
    }

    pub fn load_file_layer(&self) -> Result<TomlConfig> {
        match &self.config {
            Some(path) => TomlConfig::from_file(path),
            None => Ok(TomlConfig::default()),
        }
    }

    pub fn settings(&self, file: &TomlConfig) -> Settings {
        Settings::layered(&PartialSettings::from(self), file)
    }
}
