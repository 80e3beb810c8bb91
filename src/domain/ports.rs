use crate::domain::model::{
    BatchOutput, ExtraAliases, ListingEvent, Platform, PublishReport, TransformResult,
};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub fn default_output_filename(format: &str) -> String {
    match format {
        "json" => "events.json".to_string(),
        "jsonl" => "events.jsonl".to_string(),
        "csv" => "products.csv".to_string(),
        other => format!("output.{}", other),
    }
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn platform(&self) -> Platform;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];

    /// Archive name when outputs are bundled into a zip.
    fn compression_filename(&self) -> Option<&str> {
        None
    }

    fn output_filename(&self, format: &str) -> String {
        default_output_filename(format)
    }

    fn extra_aliases(&self) -> Option<&ExtraAliases> {
        None
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<BatchOutput>;
    async fn transform(&self, batch: BatchOutput) -> Result<TransformResult>;
    async fn load(&self, result: &TransformResult) -> Result<String>;
}

/// Outbound collaborator that delivers listing events somewhere else.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, events: &[ListingEvent]) -> Result<PublishReport>;
}
