use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use shared::config::{dynamodb_client, required_var, USERS_TABLE};
use shared::repositories::user_repository::DynamoDbUserRepository;
use shared::services::user_service::UserService;

#[derive(Deserialize)]
struct CognitoEvent {
    request: Request,
}

#[derive(Deserialize)]
struct Request {
    #[serde(rename = "userAttributes")]
    user_attributes: UserAttributes,
}

#[derive(Deserialize)]
struct UserAttributes {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    given_name: Option<String>,
    #[serde(default)]
    family_name: Option<String>,
}

impl UserAttributes {
    /// The name shown to organizers: the full name if set, else given and family
    /// names, else the local part of the email address.
    fn display_name(&self) -> Option<String> {
        let non_empty = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        if let Some(name) = non_empty(&self.name) {
            return Some(name);
        }
        let parts: Vec<String> = [non_empty(&self.given_name), non_empty(&self.family_name)]
            .into_iter()
            .flatten()
            .collect();
        if !parts.is_empty() {
            return Some(parts.join(" "));
        }
        non_empty(&self.email)
            .and_then(|email| email.split('@').next().map(str::to_string))
            .filter(|local| !local.is_empty())
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .without_time()
        .init();

    let users_table = required_var(USERS_TABLE)?;
    let client = dynamodb_client().await;
    let user_service = Arc::new(UserService::new(Arc::new(DynamoDbUserRepository::new(
        client,
        users_table,
    ))));

    run(service_fn(move |event: LambdaEvent<Value>| {
        let user_service = user_service.clone();
        async move { user_signup_handler(&user_service, event.payload).await }
    }))
    .await
}

/// Cognito post-confirmation trigger. The event is handed back unchanged, as
/// Cognito requires.
async fn user_signup_handler(user_service: &UserService, payload: Value) -> Result<Value, Error> {
    let event: CognitoEvent = serde_json::from_value(payload.clone())?;
    let attributes = &event.request.user_attributes;
    let name = attributes
        .display_name()
        .ok_or_else(|| Error::from(format!("User {} has no usable name", attributes.sub)))?;

    info!("Creating user: {}", attributes.sub);
    user_service
        .create_user(&attributes.sub, &name)
        .await
        .map_err(|e| Error::from(format!("Failed to create user {}: {}", attributes.sub, e)))?;

    info!("User created successfully: {}", attributes.sub);
    Ok(payload)
}
