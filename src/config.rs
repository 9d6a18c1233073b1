use dotenv::dotenv;
use std::env;

const RABBIT_URL: &str = "RABBIT_URL";
const APP_ID: &str = "APP_ID";
const EVENT_TOPIC: &str = "EVENT_TOPIC";
const CORS_ORIGIN: &str = "CORS_ORIGIN";
const PUBLISH_FAILURE_POLICY: &str = "PUBLISH_FAILURE_POLICY";

/// What an HTTP handler does when its post-commit event publish fails.
///
/// The local write is already committed either way; there is no rollback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishPolicy {
    /// Log the failure and return success to the caller (default).
    Log,
    /// Return a 500 to the caller. The write still stands.
    Fail,
}

impl std::str::FromStr for PublishPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "log" => Ok(PublishPolicy::Log),
            "fail" => Ok(PublishPolicy::Fail),
            other => Err(format!("unknown publish failure policy: {}", other)),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub rabbit_url: String,
    pub app_id: String,
    pub topic: String,
    pub cors_origin: String,
    pub publish_policy: PublishPolicy,
}

impl Config {
    pub fn from_env() -> Config {
        match Self::try_from_env() {
            Ok(config) => config,
            Err(err) => panic!("{}", err),
        }
    }

    pub fn try_from_env() -> Result<Config, String> {
        // Load .env file
        dotenv().ok();

        let rabbit_url = env::var(RABBIT_URL)
            .map_err(|_| format!("failed to load environment variable {}", RABBIT_URL))?;

        let app_id = env::var(APP_ID).unwrap_or_else(|_| "hotel-reservation".to_string());

        let topic = env::var(EVENT_TOPIC).unwrap_or_else(|_| "hotel".to_string());

        let cors_origin =
            env::var(CORS_ORIGIN).unwrap_or_else(|_| "http://localhost:3000".to_string());

        let publish_policy = match env::var(PUBLISH_FAILURE_POLICY) {
            Ok(raw) => raw.parse()?,
            Err(_) => PublishPolicy::Log,
        };

        Ok(Config {
            rabbit_url,
            app_id,
            topic,
            cors_origin,
            publish_policy,
        })
    }
}
