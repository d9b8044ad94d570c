use std::fmt;

pub const GAMES_TABLE: &str = "GAMES_TABLE";
pub const EVENTS_TABLE: &str = "EVENTS_TABLE";
pub const PARTICIPATIONS_TABLE: &str = "PARTICIPATIONS_TABLE";
pub const USERS_TABLE: &str = "USERS_TABLE";
pub const JWT_SECRET: &str = "JWT_SECRET";

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Missing(name) => {
                write!(f, "{} environment variable must be set", name)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Everything the API reads from its environment. The secret stays optional
/// until a token has to be signed or checked.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub games_table: String,
    pub events_table: String,
    pub participations_table: String,
    pub users_table: String,
    pub jwt_secret: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| required_from(&lookup, name);

        Ok(AppConfig {
            games_table: required(GAMES_TABLE)?,
            events_table: required(EVENTS_TABLE)?,
            participations_table: required(PARTICIPATIONS_TABLE)?,
            users_table: required(USERS_TABLE)?,
            jwt_secret: lookup(JWT_SECRET).filter(|value| !value.is_empty()),
        })
    }

    pub fn require_jwt_secret(&self) -> Result<String, ConfigError> {
        self.jwt_secret.clone().ok_or(ConfigError::Missing(JWT_SECRET))
    }
}

/// A single required variable, for binaries that touch only one or two tables.
pub fn required_var(name: &'static str) -> Result<String, ConfigError> {
    required_from(|key| std::env::var(key).ok(), name)
}

pub fn required_from<F>(lookup: F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::Missing(name))
}

pub async fn dynamodb_client() -> aws_sdk_dynamodb::Client {
    let config = aws_config::load_from_env().await;
    aws_sdk_dynamodb::Client::new(&config)
}
