use aws_lambda_events::event::dynamodb::Event;
use lambda_runtime::Error;
use serde::{Deserialize, Serialize};
use serde_dynamo::{from_item, Item};
use shared::services::participation_service::ParticipationService;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Key of an item in the events table.
#[derive(Debug, Deserialize, Serialize)]
struct EventKey {
    id: String,
}

/// Purges the participations of events deleted from the events table.
#[derive(Clone)]
pub struct EventCleanupProcessor {
    participation_service: Arc<ParticipationService>,
}

impl EventCleanupProcessor {
    pub fn new(participation_service: Arc<ParticipationService>) -> Self {
        Self {
            participation_service,
        }
    }

    /// A failed purge fails the batch so the stream redelivers it; purging is
    /// idempotent, so records already handled are simply handled again.
    pub async fn process_event(&self, event: Event) -> Result<(), Error> {
        debug!(
            "Event cleanup received stream batch with {} records",
            event.records.len()
        );

        for record in event.records {
            self.process_record(record.event_name.as_str(), record.change.keys)
                .await?;
        }
        Ok(())
    }

    pub async fn process_record(&self, event_name: &str, keys: Item) -> Result<usize, Error> {
        if event_name != "REMOVE" {
            debug!("Ignoring {} record", event_name);
            return Ok(0);
        }

        let key: EventKey = match from_item(keys) {
            Ok(key) => key,
            Err(e) => {
                error!("Skipping REMOVE record with unreadable keys: {}", e);
                return Ok(0);
            }
        };

        let removed = self
            .participation_service
            .remove_by_event(&key.id)
            .await
            .map_err(|e| {
                error!("Failed to purge participations of event {}: {}", key.id, e);
                Error::from(e)
            })?;
        info!(
            "Purged {} participations of deleted event {}",
            removed, key.id
        );
        Ok(removed)
    }
}
