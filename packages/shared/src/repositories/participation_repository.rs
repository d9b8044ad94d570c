use crate::models::identity::ParticipantIdentity;
use crate::models::participation::Participation;
use crate::repositories::errors::participation_repository_errors::ParticipationRepositoryError;
use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde_dynamo::aws_sdk_dynamodb_1::{from_item, from_items, to_item};

#[cfg(test)]
use mockall::automock;

/// Participations keyed by `event_id` (partition) and `participant_key` (sort).
pub struct DynamoDbParticipationRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbParticipationRepository {
    pub fn new(client: Client, table_name: String) -> Self {
        Self { client, table_name }
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ParticipationRepository: Send + Sync {
    async fn get_participation(
        &self,
        event_id: &str,
        identity: &ParticipantIdentity,
    ) -> Result<Option<Participation>, ParticipationRepositoryError>;

    /// Writes the whole record, replacing whatever was stored under its key.
    async fn put_participation(
        &self,
        participation: &Participation,
    ) -> Result<(), ParticipationRepositoryError>;

    async fn list_by_event(
        &self,
        event_id: &str,
    ) -> Result<Vec<Participation>, ParticipationRepositoryError>;

    async fn delete_participation(
        &self,
        event_id: &str,
        participant_key: &str,
    ) -> Result<(), ParticipationRepositoryError>;
}

#[async_trait]
impl ParticipationRepository for DynamoDbParticipationRepository {
    async fn get_participation(
        &self,
        event_id: &str,
        identity: &ParticipantIdentity,
    ) -> Result<Option<Participation>, ParticipationRepositoryError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("event_id", AttributeValue::S(event_id.to_string()))
            .key("participant_key", AttributeValue::S(identity.storage_key()))
            .consistent_read(true)
            .send()
            .await
            .map_err(|e| ParticipationRepositoryError::DynamoDb(e.to_string()))?;

        match output.item {
            Some(item) => {
                let participation = from_item(item)
                    .map_err(|e| ParticipationRepositoryError::Serialization(e.to_string()))?;
                Ok(Some(participation))
            }
            None => Ok(None),
        }
    }

    async fn put_participation(
        &self,
        participation: &Participation,
    ) -> Result<(), ParticipationRepositoryError> {
        let item = to_item(participation)
            .map_err(|e| ParticipationRepositoryError::Serialization(e.to_string()))?;
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| ParticipationRepositoryError::DynamoDb(e.to_string()))?;
        Ok(())
    }

    async fn list_by_event(
        &self,
        event_id: &str,
    ) -> Result<Vec<Participation>, ParticipationRepositoryError> {
        let mut participations = Vec::new();
        let mut start_key = None;
        loop {
            let output = self
                .client
                .query()
                .table_name(&self.table_name)
                .key_condition_expression("event_id = :event_id")
                .expression_attribute_values(
                    ":event_id",
                    AttributeValue::S(event_id.to_string()),
                )
                .consistent_read(true)
                .set_exclusive_start_key(start_key)
                .send()
                .await
                .map_err(|e| ParticipationRepositoryError::DynamoDb(e.to_string()))?;

            let page: Vec<Participation> = from_items(output.items.unwrap_or_default())
                .map_err(|e| ParticipationRepositoryError::Serialization(e.to_string()))?;
            participations.extend(page);

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }
        Ok(participations)
    }

    async fn delete_participation(
        &self,
        event_id: &str,
        participant_key: &str,
    ) -> Result<(), ParticipationRepositoryError> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key("event_id", AttributeValue::S(event_id.to_string()))
            .key(
                "participant_key",
                AttributeValue::S(participant_key.to_string()),
            )
            .send()
            .await
            .map_err(|e| ParticipationRepositoryError::DynamoDb(e.to_string()))?;
        Ok(())
    }
}
