use lambda_runtime::{run, service_fn, Error};
use std::sync::Arc;

mod processor;
use processor::EventCleanupProcessor;
use shared::{
    config::{
        dynamodb_client, required_var, EVENTS_TABLE, GAMES_TABLE, PARTICIPATIONS_TABLE,
    },
    repositories::{
        event_repository::DynamoDbEventRepository, game_repository::DynamoDbGameRepository,
        participation_repository::DynamoDbParticipationRepository,
    },
    services::{event_service::EventService, participation_service::ParticipationService},
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .without_time()
        .init();

    let events_table = required_var(EVENTS_TABLE)?;
    let games_table = required_var(GAMES_TABLE)?;
    let participations_table = required_var(PARTICIPATIONS_TABLE)?;
    let client = dynamodb_client().await;

    let event_service = Arc::new(EventService::new(
        Arc::new(DynamoDbEventRepository::new(
            client.clone(),
            events_table,
        )),
        Arc::new(DynamoDbGameRepository::new(
            client.clone(),
            games_table,
        )),
    ));
    let participation_service = Arc::new(ParticipationService::new(
        Arc::new(DynamoDbParticipationRepository::new(
            client,
            participations_table,
        )),
        event_service,
    ));

    let processor = EventCleanupProcessor::new(participation_service);

    run(service_fn(
        move |event: lambda_runtime::LambdaEvent<aws_lambda_events::event::dynamodb::Event>| {
            let processor = processor.clone();
            async move { processor.process_event(event.payload).await }
        },
    ))
    .await
}
