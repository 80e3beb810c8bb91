use crate::domain::model::{EventOutcome, ListingEvent, PublishReport};
use crate::domain::ports::Publisher;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Posts each event as JSON to every endpoint. Single attempt, no retry.
pub struct HttpPublisher {
    client: Client,
    endpoints: Vec<String>,
}

impl HttpPublisher {
    pub fn new(endpoints: Vec<String>, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;
        Ok(Self { client, endpoints })
    }

    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    async fn send(&self, endpoint: &str, event: &ListingEvent) -> std::result::Result<(), String> {
        let response = self
            .client
            .post(endpoint)
            .json(event)
            .send()
            .await
            .map_err(|e| format!("{}: {}", endpoint, e))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(format!("{}: HTTP {}", endpoint, status))
        }
    }
}

#[async_trait]
impl Publisher for HttpPublisher {
    async fn publish(&self, events: &[ListingEvent]) -> Result<PublishReport> {
        let mut report = PublishReport::default();

        for event in events {
            let mut outcome = EventOutcome {
                identifier: event.identifier().unwrap_or_default().to_string(),
                ..EventOutcome::default()
            };

            for endpoint in &self.endpoints {
                match self.send(endpoint, event).await {
                    Ok(()) => outcome.accepted_by.push(endpoint.clone()),
                    Err(e) => {
                        tracing::warn!("Event {} rejected: {}", outcome.identifier, e);
                        outcome.errors.push(e);
                    }
                }
            }

            tracing::debug!(
                "Event {} accepted by {}/{} endpoints",
                outcome.identifier,
                outcome.accepted_by.len(),
                self.endpoints.len()
            );
            report.outcomes.push(outcome);
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::LISTING_KIND;
    use httpmock::prelude::*;

    fn event(id: &str) -> ListingEvent {
        ListingEvent {
            kind: LISTING_KIND,
            created_at: 1_700_000_000,
            content: "desc".to_string(),
            tags: vec![vec!["d".to_string(), id.to_string()]],
        }
    }

    #[tokio::test]
    async fn test_event_published_when_any_endpoint_accepts() {
        let good = MockServer::start();
        let bad = MockServer::start();

        let good_mock = good.mock(|when, then| {
            when.method(POST)
                .path("/events")
                .json_body_partial(r#"{"kind": 30402}"#);
            then.status(201);
        });
        let bad_mock = bad.mock(|when, then| {
            when.method(POST).path("/events");
            then.status(503);
        });

        let publisher =
            HttpPublisher::new(vec![good.url("/events"), bad.url("/events")], 5).unwrap();
        let report = publisher
            .publish(&[event("SKU-1"), event("SKU-2")])
            .await
            .unwrap();

        good_mock.assert_hits(2);
        bad_mock.assert_hits(2);
        assert_eq!(report.published(), 2);
        assert_eq!(report.outcomes[0].identifier, "SKU-1");
        assert_eq!(report.outcomes[0].accepted_by, vec![good.url("/events")]);
        assert!(report.outcomes[0].errors[0].contains("503"));
    }

    #[tokio::test]
    async fn test_event_failed_when_every_endpoint_rejects() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/events");
            then.status(500);
        });

        let publisher = HttpPublisher::new(vec![server.url("/events")], 5).unwrap();
        let report = publisher.publish(&[event("SKU-1")]).await.unwrap();

        mock.assert();
        assert_eq!(report.published(), 0);
        assert_eq!(report.failed(), 1);
    }
}
