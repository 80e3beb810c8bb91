use crate::adapters::http::DEFAULT_TIMEOUT_SECONDS;
use crate::domain::model::Platform;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "catalog-etl")]
#[command(about = "Convert marketplace product exports into classified-listing events")]
pub struct CliConfig {
    /// Product export to convert (CSV with a header row)
    #[arg(short, long)]
    pub input: String,

    /// Source platform: woocommerce, ebay, shopify or amazon
    #[arg(short, long)]
    pub platform: Platform,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// Output formats: json, jsonl, csv
    #[arg(long, value_delimiter = ',', default_value = "json")]
    pub formats: Vec<String>,

    /// Bundle all outputs into one zip archive
    #[arg(long)]
    pub zip: bool,

    #[arg(long, default_value = "catalog_output.zip")]
    pub zip_name: String,

    /// Endpoint to POST every listing event to (repeatable)
    #[arg(long = "publish-endpoint")]
    pub publish_endpoints: Vec<String>,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub publish_timeout: u64,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log process CPU/memory between phases")]
    pub monitor: bool,
}

impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn platform(&self) -> Platform {
        self.platform
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }

    fn compression_filename(&self) -> Option<&str> {
        self.zip.then_some(self.zip_name.as_str())
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input", &self.input)?;
        validation::validate_file_extension("input", &self.input, &["csv"])?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_output_formats("formats", &self.formats)?;
        if self.zip {
            validation::validate_file_extension("zip_name", &self.zip_name, &["zip"])?;
        }
        for endpoint in &self.publish_endpoints {
            validation::validate_url("publish_endpoint", endpoint)?;
        }
        validation::validate_positive_number("publish_timeout", self.publish_timeout, 1)?;
        Ok(())
    }
}
