use crate::domain::model::PublishReport;
use crate::domain::ports::{Pipeline, Publisher};
use crate::utils::error::{EtlError, Result};
use crate::utils::monitor::SystemMonitor;

#[derive(Debug, Clone)]
pub struct EtlReport {
    pub output_path: String,
    pub products: usize,
    pub rows_dropped: usize,
    pub publish: Option<PublishReport>,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
    publisher: Option<Box<dyn Publisher>>,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
            publisher: None,
        }
    }

    pub fn with_publisher(mut self, publisher: Box<dyn Publisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    pub async fn run(&self) -> Result<EtlReport> {
        tracing::info!("Starting catalog conversion");

        let batch = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted {} products ({} rows read, {} dropped)",
            batch.products.len(),
            batch.rows_read,
            batch.rows_dropped
        );
        self.monitor.log_stats("Extract", batch.products.len());

        let result = self.pipeline.transform(batch).await?;
        tracing::info!("Encoded {} listing events", result.events.len());
        self.monitor.log_stats("Transform", result.events.len());

        let output_path = self.pipeline.load(&result).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.monitor.log_stats("Load", result.events.len());

        let publish = match &self.publisher {
            Some(publisher) if !result.events.is_empty() => {
                let report = publisher.publish(&result.events).await?;
                self.check_publish(&report)?;
                Some(report)
            }
            _ => None,
        };

        self.monitor.log_final_stats();

        Ok(EtlReport {
            output_path,
            products: result.products.len(),
            rows_dropped: result.rows_dropped,
            publish,
        })
    }

    fn check_publish(&self, report: &PublishReport) -> Result<()> {
        let published = report.published();
        let total = report.outcomes.len();

        if total > 0 && published == 0 {
            return Err(EtlError::PublishError {
                message: format!("none of {} events were accepted by any endpoint", total),
            });
        }
        if published < total {
            tracing::warn!("Published {}/{} events", published, total);
        } else {
            tracing::info!("Published {} events", published);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::encoder::encode;
    use crate::domain::model::{
        BatchOutput, EventOutcome, ListingEvent, NormalizedProduct, TransformResult,
    };
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct StaticPipeline {
        products: Vec<NormalizedProduct>,
    }

    fn product(id: &str) -> NormalizedProduct {
        NormalizedProduct {
            id: id.to_string(),
            title: format!("Product {}", id),
            description: String::new(),
            price: 1.0,
            currency: "USD".to_string(),
            quantity: 1,
            images: vec![],
            category: None,
            weight: None,
            weight_unit: Some("kg".to_string()),
            dimensions: None,
            dimension_unit: Some("cm".to_string()),
        }
    }

    #[async_trait]
    impl Pipeline for StaticPipeline {
        async fn extract(&self) -> Result<BatchOutput> {
            Ok(BatchOutput {
                products: self.products.clone(),
                rows_read: self.products.len() + 1,
                rows_dropped: 1,
            })
        }

        async fn transform(&self, batch: BatchOutput) -> Result<TransformResult> {
            let events = batch.products.iter().map(|p| encode(p, 0)).collect();
            Ok(TransformResult {
                products: batch.products,
                events,
                csv_output: String::new(),
                rows_dropped: batch.rows_dropped,
            })
        }

        async fn load(&self, _result: &TransformResult) -> Result<String> {
            Ok("out".to_string())
        }
    }

    struct CountingPublisher {
        calls: Arc<AtomicUsize>,
        accept: bool,
    }

    #[async_trait]
    impl Publisher for CountingPublisher {
        async fn publish(&self, events: &[ListingEvent]) -> Result<PublishReport> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let outcomes = events
                .iter()
                .map(|e| EventOutcome {
                    identifier: e.identifier().unwrap_or_default().to_string(),
                    accepted_by: if self.accept {
                        vec!["mock".to_string()]
                    } else {
                        vec![]
                    },
                    errors: vec![],
                })
                .collect();
            Ok(PublishReport { outcomes })
        }
    }

    #[tokio::test]
    async fn test_run_without_publisher() {
        let engine = EtlEngine::new(StaticPipeline {
            products: vec![product("a"), product("b")],
        });

        let report = engine.run().await.unwrap();

        assert_eq!(report.output_path, "out");
        assert_eq!(report.products, 2);
        assert_eq!(report.rows_dropped, 1);
        assert!(report.publish.is_none());
    }

    #[tokio::test]
    async fn test_run_publishes_events() {
        let calls = Arc::new(AtomicUsize::new(0));
        let engine = EtlEngine::new(StaticPipeline {
            products: vec![product("a")],
        })
        .with_publisher(Box::new(CountingPublisher {
            calls: calls.clone(),
            accept: true,
        }));

        let report = engine.run().await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(report.publish.unwrap().published(), 1);
    }

    #[tokio::test]
    async fn test_run_fails_when_nothing_is_accepted() {
        let engine = EtlEngine::new(StaticPipeline {
            products: vec![product("a")],
        })
        .with_publisher(Box::new(CountingPublisher {
            calls: Arc::new(AtomicUsize::new(0)),
            accept: false,
        }));

        let err = engine.run().await.unwrap_err();

        assert!(matches!(err, EtlError::PublishError { .. }));
    }

    #[tokio::test]
    async fn test_empty_batch_skips_publishing() {
        let calls = Arc::new(AtomicUsize::new(0));
        let engine = EtlEngine::new(StaticPipeline { products: vec![] }).with_publisher(
            Box::new(CountingPublisher {
                calls: calls.clone(),
                accept: true,
            }),
        );

        engine.run().await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
