#[derive(Debug)]
pub enum ParticipationRepositoryError {
    Serialization(String),
    DynamoDb(String),
}

impl std::fmt::Display for ParticipationRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParticipationRepositoryError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            ParticipationRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
        }
    }
}

impl std::error::Error for ParticipationRepositoryError {}
