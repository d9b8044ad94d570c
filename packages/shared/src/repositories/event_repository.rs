use crate::models::event::Event;
use crate::repositories::errors::event_repository_errors::EventRepositoryError;
use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde_dynamo::aws_sdk_dynamodb_1::{from_item, from_items, to_item};

#[cfg(test)]
use mockall::automock;

pub struct DynamoDbEventRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbEventRepository {
    pub fn new(client: Client, table_name: String) -> Self {
        Self { client, table_name }
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create_event(&self, event: &Event) -> Result<(), EventRepositoryError>;
    async fn get_event(&self, event_id: &str) -> Result<Event, EventRepositoryError>;
    async fn list_events(&self) -> Result<Vec<Event>, EventRepositoryError>;
    async fn update_event(&self, event: &Event) -> Result<(), EventRepositoryError>;
    async fn delete_event(&self, event_id: &str) -> Result<(), EventRepositoryError>;
}

#[async_trait]
impl EventRepository for DynamoDbEventRepository {
    async fn create_event(&self, event: &Event) -> Result<(), EventRepositoryError> {
        let item = to_item(event).map_err(|e| EventRepositoryError::Serialization(e.to_string()))?;
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| EventRepositoryError::DynamoDb(e.to_string()))?;
        Ok(())
    }

    async fn get_event(&self, event_id: &str) -> Result<Event, EventRepositoryError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("id", AttributeValue::S(event_id.to_string()))
            .send()
            .await
            .map_err(|e| EventRepositoryError::DynamoDb(e.to_string()))?;

        match output.item {
            Some(item) => {
                from_item(item).map_err(|e| EventRepositoryError::Serialization(e.to_string()))
            }
            None => Err(EventRepositoryError::NotFound),
        }
    }

    async fn list_events(&self) -> Result<Vec<Event>, EventRepositoryError> {
        let mut events = Vec::new();
        let mut start_key = None;
        loop {
            let output = self
                .client
                .scan()
                .table_name(&self.table_name)
                .set_exclusive_start_key(start_key)
                .send()
                .await
                .map_err(|e| EventRepositoryError::DynamoDb(e.to_string()))?;

            let page: Vec<Event> = from_items(output.items.unwrap_or_default())
                .map_err(|e| EventRepositoryError::Serialization(e.to_string()))?;
            events.extend(page);

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }
        Ok(events)
    }

    async fn update_event(&self, event: &Event) -> Result<(), EventRepositoryError> {
        let item = to_item(event).map_err(|e| EventRepositoryError::Serialization(e.to_string()))?;
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_exists(id)")
            .send()
            .await
            .map_err(|e| {
                let service_error = e.into_service_error();
                if service_error.is_conditional_check_failed_exception() {
                    EventRepositoryError::NotFound
                } else {
                    EventRepositoryError::DynamoDb(service_error.to_string())
                }
            })?;
        Ok(())
    }

    async fn delete_event(&self, event_id: &str) -> Result<(), EventRepositoryError> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key("id", AttributeValue::S(event_id.to_string()))
            .condition_expression("attribute_exists(id)")
            .send()
            .await
            .map_err(|e| {
                let service_error = e.into_service_error();
                if service_error.is_conditional_check_failed_exception() {
                    EventRepositoryError::NotFound
                } else {
                    EventRepositoryError::DynamoDb(service_error.to_string())
                }
            })?;
        Ok(())
    }
}
