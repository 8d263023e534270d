//! Process wide parameters.
//!
//! Values are read from the environment (a `.env` file is loaded by the binary
//! before parsing) and installed once with [`init`]. Components read them
//! through [`configurables`], which falls back to defaults when nothing was
//! installed.

use std::str::FromStr;
use std::sync::OnceLock;
use std::time::Duration;

/// Default name of the bucket holding tweet images.
pub const DEFAULT_IMAGE_BUCKET: &str = "user-tweets";

/// Default number of tweets returned by a listing page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Default lifetime of cached tweets.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Prefix of the keys used to cache tweets.
pub const CACHE_KEY_PREFIX: &str = "tweet";

pub mod env {
    pub const DATABASE_URL: &str = "DATABASE_URL";
    pub const DB_MAX_CONNECTIONS: &str = "TWEETD_DB_MAX_CONNECTIONS";
    pub const STORE_URL: &str = "TWEETD_STORE_URL";
    pub const IMAGE_BUCKET: &str = "TWEETD_IMAGE_BUCKET";
    pub const CACHE_URL: &str = "TWEETD_CACHE_URL";
    pub const CACHE_TTL_SECS: &str = "TWEETD_CACHE_TTL_SECS";
    pub const AMQP_URL: &str = "TWEETD_AMQP_URL";
    pub const AMQP_EXCHANGE: &str = "TWEETD_AMQP_EXCHANGE";
    pub const AMQP_QUEUE: &str = "TWEETD_AMQP_QUEUE";
    pub const AMQP_BINDING_KEY: &str = "TWEETD_AMQP_BINDING_KEY";
    pub const PAGE_SIZE: &str = "TWEETD_PAGE_SIZE";
    pub const REQUEST_TIMEOUT_MS: &str = "TWEETD_REQUEST_TIMEOUT_MS";
}

#[derive(thiserror::Error, Debug)]
pub enum ParamsError {
    #[error("missing required parameter `{0}`")]
    Missing(&'static str),
    #[error("invalid value `{value}` for parameter `{key}`")]
    InvalidValue { key: &'static str, value: String },
}

/// Broker topology used by the notification publisher.
#[derive(Debug, Clone, PartialEq)]
pub struct AmqpParams {
    pub url: String,
    pub exchange: String,
    pub queue: String,
    pub binding_key: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Configurables {
    pub database_url: String,
    pub db_max_connections: u32,

    pub store_url: String,
    pub image_bucket: String,

    /// `None` disables caching altogether.
    pub cache_url: Option<String>,
    pub cache_ttl: Duration,

    /// `None` disables notifications.
    pub amqp: Option<AmqpParams>,

    pub page_size: usize,
    pub request_timeout: Option<Duration>,
}

impl Default for Configurables {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            db_max_connections: 10,
            store_url: "file:///tmp/tweetd".to_owned(),
            image_bucket: DEFAULT_IMAGE_BUCKET.to_owned(),
            cache_url: None,
            cache_ttl: DEFAULT_CACHE_TTL,
            amqp: None,
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout: None,
        }
    }
}

impl Configurables {
    pub fn from_env() -> Result<Self, ParamsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the parameters from an arbitrary key lookup, unset keys take their default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ParamsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = get(env::DATABASE_URL).ok_or(ParamsError::Missing(env::DATABASE_URL))?;

        let amqp = get(env::AMQP_URL).map(|url| AmqpParams {
            url,
            exchange: get(env::AMQP_EXCHANGE).unwrap_or_else(|| "tweets".to_owned()),
            queue: get(env::AMQP_QUEUE).unwrap_or_else(|| "tweets.new".to_owned()),
            binding_key: get(env::AMQP_BINDING_KEY).unwrap_or_else(|| "tweet.created".to_owned()),
        });

        let page_size: usize = parse(env::PAGE_SIZE, get(env::PAGE_SIZE))?
            .unwrap_or(defaults.page_size);
        if page_size == 0 {
            return Err(ParamsError::InvalidValue {
                key: env::PAGE_SIZE,
                value: "0".to_owned(),
            });
        }

        Ok(Self {
            database_url,
            db_max_connections: parse(env::DB_MAX_CONNECTIONS, get(env::DB_MAX_CONNECTIONS))?
                .unwrap_or(defaults.db_max_connections),
            store_url: get(env::STORE_URL).unwrap_or(defaults.store_url),
            image_bucket: get(env::IMAGE_BUCKET).unwrap_or(defaults.image_bucket),
            cache_url: get(env::CACHE_URL),
            cache_ttl: parse(env::CACHE_TTL_SECS, get(env::CACHE_TTL_SECS))?
                .map(Duration::from_secs)
                .unwrap_or(defaults.cache_ttl),
            amqp,
            page_size,
            request_timeout: parse(env::REQUEST_TIMEOUT_MS, get(env::REQUEST_TIMEOUT_MS))?
                .map(Duration::from_millis),
        })
    }
}

fn parse<T: FromStr>(key: &'static str, value: Option<String>) -> Result<Option<T>, ParamsError> {
    value
        .map(|v| {
            v.trim()
                .parse::<T>()
                .map_err(|_| ParamsError::InvalidValue { key, value: v })
        })
        .transpose()
}

static CONFIGURABLES: OnceLock<Configurables> = OnceLock::new();

/// Installs the process parameters. Returns `false` if they were already installed.
pub fn init(configurables: Configurables) -> bool {
    CONFIGURABLES.set(configurables).is_ok()
}

pub fn configurables() -> &'static Configurables {
    CONFIGURABLES.get_or_init(Configurables::default)
}
