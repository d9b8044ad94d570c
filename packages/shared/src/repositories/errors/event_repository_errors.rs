#[derive(Debug)]
pub enum EventRepositoryError {
    NotFound,
    Serialization(String),
    DynamoDb(String),
}

impl std::fmt::Display for EventRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventRepositoryError::NotFound => write!(f, "Event not found"),
            EventRepositoryError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            EventRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
        }
    }
}

impl std::error::Error for EventRepositoryError {}
