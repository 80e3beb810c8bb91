use crate::core::batch::parse_batch_with_aliases;
use crate::core::encoder::{encode, format_number};
use crate::domain::model::{BatchOutput, ListingEvent, NormalizedProduct, TransformResult};
use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
use crate::utils::error::{EtlError, Result};
use std::io::Write;
use std::path::Path;
use zip::write::{FileOptions, ZipWriter};

pub const PRODUCT_CSV_HEADERS: [&str; 12] = [
    "id",
    "title",
    "description",
    "price",
    "currency",
    "quantity",
    "images",
    "category",
    "weight",
    "weight_unit",
    "dimensions",
    "dimension_unit",
];

/// Reads one export, converts it, and writes the configured outputs.
pub struct CatalogPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    created_at: Option<i64>,
}

impl<S: Storage, C: ConfigProvider> CatalogPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            created_at: None,
        }
    }

    /// Fixes `created_at` for every event instead of using the clock.
    pub fn with_timestamp(mut self, created_at: i64) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    fn output_location(&self, name: &str) -> String {
        Path::new(self.config.output_path())
            .join(name)
            .to_string_lossy()
            .into_owned()
    }

    fn render_outputs(&self, result: &TransformResult) -> Result<Vec<(String, Vec<u8>)>> {
        let mut files = Vec::new();
        for format in self.config.output_formats() {
            let data = match format.as_str() {
                "json" => serde_json::to_vec_pretty(&result.events)?,
                "jsonl" => render_jsonl(&result.events)?,
                "csv" => result.csv_output.as_bytes().to_vec(),
                other => {
                    return Err(EtlError::InvalidConfigValueError {
                        field: "output_formats".to_string(),
                        value: other.to_string(),
                        reason: "Unsupported output format".to_string(),
                    })
                }
            };
            files.push((self.config.output_filename(format), data));
        }
        Ok(files)
    }
}

fn render_jsonl(events: &[ListingEvent]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    for event in events {
        serde_json::to_writer(&mut out, event)?;
        out.push(b'\n');
    }
    Ok(out)
}

/// Flat CSV of the normalized products. Images are joined with `|`.
pub fn render_products_csv(products: &[NormalizedProduct]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(PRODUCT_CSV_HEADERS)?;

    for p in products {
        let price = format_number(p.price);
        let quantity = p.quantity.to_string();
        let images = p.images.join("|");
        let weight = p.weight.map(format_number).unwrap_or_default();
        wtr.write_record([
            p.id.as_str(),
            p.title.as_str(),
            p.description.as_str(),
            price.as_str(),
            p.currency.as_str(),
            quantity.as_str(),
            images.as_str(),
            p.category.as_deref().unwrap_or_default(),
            weight.as_str(),
            p.weight_unit.as_deref().unwrap_or_default(),
            p.dimensions.as_deref().unwrap_or_default(),
            p.dimension_unit.as_deref().unwrap_or_default(),
        ])?;
    }

    let data = wtr.into_inner().map_err(|e| EtlError::ProcessingError {
        message: format!("CSV buffer flush failed: {}", e),
    })?;
    String::from_utf8(data).map_err(|e| EtlError::ProcessingError {
        message: format!("CSV output is not UTF-8: {}", e),
    })
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CatalogPipeline<S, C> {
    async fn extract(&self) -> Result<BatchOutput> {
        let platform = self.config.platform();
        tracing::debug!("Reading {} export from {}", platform, self.config.input_path());

        let content = self.storage.read_file(self.config.input_path()).await?;
        let batch = parse_batch_with_aliases(&content, platform, self.config.extra_aliases())?;

        if batch.rows_dropped > 0 {
            tracing::warn!(
                "Dropped {} of {} rows without an id or title",
                batch.rows_dropped,
                batch.rows_read
            );
        }
        Ok(batch)
    }

    async fn transform(&self, batch: BatchOutput) -> Result<TransformResult> {
        let created_at = self
            .created_at
            .unwrap_or_else(|| chrono::Utc::now().timestamp());

        let events = batch
            .products
            .iter()
            .map(|product| encode(product, created_at))
            .collect();
        let csv_output = render_products_csv(&batch.products)?;

        Ok(TransformResult {
            products: batch.products,
            events,
            csv_output,
            rows_dropped: batch.rows_dropped,
        })
    }

    async fn load(&self, result: &TransformResult) -> Result<String> {
        let files = self.render_outputs(result)?;

        if let Some(archive_name) = self.config.compression_filename() {
            tracing::debug!("Creating ZIP file with {} files", files.len());

            let zip_data = {
                let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
                for (name, data) in &files {
                    zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
                    zip.write_all(data)?;
                }
                // 完成並取回底層 Vec<u8>
                let cursor = zip.finish()?;
                cursor.into_inner()
            };

            let location = self.output_location(archive_name);
            tracing::debug!("Writing ZIP file ({} bytes) to {}", zip_data.len(), location);
            self.storage.write_file(&location, &zip_data).await?;
            return Ok(location);
        }

        for (name, data) in &files {
            let location = self.output_location(name);
            self.storage.write_file(&location, data).await?;
            tracing::debug!("Wrote {}", location);
        }
        Ok(self.config.output_path().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{AliasField, ExtraAliases, Platform};
    use crate::utils::error::ParseStage;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn with_file(path: &str, data: &str) -> Self {
            let mut files = HashMap::new();
            files.insert(path.to_string(), data.as_bytes().to_vec());
            Self {
                files: Arc::new(Mutex::new(files)),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                EtlError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        platform: Platform,
        formats: Vec<String>,
        zip: Option<String>,
        extra: Option<ExtraAliases>,
    }

    impl MockConfig {
        fn new(platform: Platform, formats: &[&str]) -> Self {
            Self {
                platform,
                formats: formats.iter().map(|f| f.to_string()).collect(),
                zip: None,
                extra: None,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn input_path(&self) -> &str {
            "in/products.csv"
        }

        fn platform(&self) -> Platform {
            self.platform
        }

        fn output_path(&self) -> &str {
            "out"
        }

        fn output_formats(&self) -> &[String] {
            &self.formats
        }

        fn compression_filename(&self) -> Option<&str> {
            self.zip.as_deref()
        }

        fn extra_aliases(&self) -> Option<&ExtraAliases> {
            self.extra.as_ref()
        }
    }

    const SHOPIFY_CSV: &str = "Handle,Title,Body (HTML),Variant Price,Variant Grams,Image Src\n\
                               red-mug,Red Mug,<p>Mug</p>,14.00,350,https://cdn/red.png\n\
                               ,,orphan variant,,,\n\
                               blue-mug,Blue Mug,,N/A,,\n";

    #[tokio::test]
    async fn test_extract_parses_and_drops() {
        let storage = MockStorage::with_file("in/products.csv", SHOPIFY_CSV);
        let pipeline = CatalogPipeline::new(storage, MockConfig::new(Platform::Shopify, &["json"]));

        let batch = pipeline.extract().await.unwrap();

        assert_eq!(batch.products.len(), 2);
        assert_eq!(batch.rows_dropped, 1);
        assert_eq!(batch.products[0].weight, Some(0.35));
        assert_eq!(batch.products[1].price, 0.0);
    }

    #[tokio::test]
    async fn test_extract_uses_extra_aliases() {
        let storage = MockStorage::with_file("in/products.csv", "Code,Name\nX-1,Thing\n");
        let mut config = MockConfig::new(Platform::WooCommerce, &["json"]);
        let mut extra = ExtraAliases::new();
        extra.insert(AliasField::Id, vec!["Code".to_string()]);
        config.extra = Some(extra);
        let pipeline = CatalogPipeline::new(storage, config);

        let batch = pipeline.extract().await.unwrap();

        assert_eq!(batch.products[0].id, "X-1");
    }

    #[tokio::test]
    async fn test_extract_surfaces_decode_errors() {
        let storage = MockStorage::with_file("in/products.csv", "Handle,Title\nh,\"open\n");
        let pipeline = CatalogPipeline::new(storage, MockConfig::new(Platform::Shopify, &["json"]));

        let err = pipeline.extract().await.unwrap_err();

        match err {
            EtlError::ParseError(e) => assert_eq!(e.stage, ParseStage::Decode),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transform_stamps_one_timestamp() {
        let storage = MockStorage::with_file("in/products.csv", SHOPIFY_CSV);
        let pipeline = CatalogPipeline::new(storage, MockConfig::new(Platform::Shopify, &["json"]))
            .with_timestamp(1_700_000_000);

        let batch = pipeline.extract().await.unwrap();
        let result = pipeline.transform(batch).await.unwrap();

        assert_eq!(result.events.len(), 2);
        assert!(result.events.iter().all(|e| e.created_at == 1_700_000_000));
        assert_eq!(result.events[0].identifier(), Some("red-mug"));
        assert_eq!(result.rows_dropped, 1);

        let lines: Vec<&str> = result.csv_output.lines().collect();
        assert_eq!(lines[0], PRODUCT_CSV_HEADERS.join(","));
        assert_eq!(
            lines[1],
            "red-mug,Red Mug,<p>Mug</p>,14,USD,0,https://cdn/red.png,,0.35,kg,,cm"
        );
    }

    #[tokio::test]
    async fn test_load_writes_each_format() {
        let storage = MockStorage::with_file("in/products.csv", SHOPIFY_CSV);
        let pipeline = CatalogPipeline::new(
            storage.clone(),
            MockConfig::new(Platform::Shopify, &["json", "jsonl", "csv"]),
        )
        .with_timestamp(1);

        let batch = pipeline.extract().await.unwrap();
        let result = pipeline.transform(batch).await.unwrap();
        let location = pipeline.load(&result).await.unwrap();

        assert_eq!(location, "out");

        let json = storage.get_file("out/events.json").await.unwrap();
        let events: Vec<ListingEvent> = serde_json::from_slice(&json).unwrap();
        assert_eq!(events, result.events);

        let jsonl = storage.get_file("out/events.jsonl").await.unwrap();
        assert_eq!(String::from_utf8(jsonl).unwrap().lines().count(), 2);

        let csv = storage.get_file("out/products.csv").await.unwrap();
        assert_eq!(String::from_utf8(csv).unwrap(), result.csv_output);
    }

    #[tokio::test]
    async fn test_load_bundles_zip() {
        let storage = MockStorage::with_file("in/products.csv", SHOPIFY_CSV);
        let mut config = MockConfig::new(Platform::Shopify, &["json", "csv"]);
        config.zip = Some("bundle.zip".to_string());
        let pipeline = CatalogPipeline::new(storage.clone(), config);

        let batch = pipeline.extract().await.unwrap();
        let result = pipeline.transform(batch).await.unwrap();
        let location = pipeline.load(&result).await.unwrap();

        assert_eq!(location, "out/bundle.zip");
        assert!(storage.get_file("out/events.json").await.is_none());

        let zip_bytes = storage.get_file("out/bundle.zip").await.unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_bytes)).unwrap();
        let mut file_names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        file_names.sort();
        assert_eq!(file_names, vec!["events.json", "products.csv"]);
    }

    #[test]
    fn test_products_csv_quotes_awkward_values() {
        let product = NormalizedProduct {
            id: "A,1".to_string(),
            title: "Say \"hi\"".to_string(),
            description: String::new(),
            price: 1.5,
            currency: "USD".to_string(),
            quantity: 2,
            images: vec!["a".to_string(), "b".to_string()],
            category: None,
            weight: None,
            weight_unit: None,
            dimensions: None,
            dimension_unit: None,
        };

        let csv = render_products_csv(&[product]).unwrap();

        assert_eq!(
            csv.lines().nth(1).unwrap(),
            "\"A,1\",\"Say \"\"hi\"\"\",,1.5,USD,2,a|b,,,,,"
        );
    }
}
