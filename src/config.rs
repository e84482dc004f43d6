use std::net::SocketAddr;
use std::time::Duration;
use clap::Parser;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};
use crate::repositories::draft_store::DraftLimits;

#[derive(Parser, Clone, Debug)]
pub struct Config {
    #[clap(env, long, default_value = "development")]
    pub environment: String,

    #[clap(env, long, default_value = "127.0.0.1:3000")]
    pub listen_address: SocketAddr,

    /// Root of the REST backend, without the `/api` prefix.
    #[clap(env, long, default_value = "http://localhost:5000")]
    pub api_base_url: String,

    #[clap(env, long, default_value_t = 15)]
    pub request_timeout_secs: u64,

    #[clap(env, long, default_value_t = 10)]
    pub enquiry_page_size: usize,

    #[clap(env, long, default_value_t = 5)]
    pub listing_page_size: usize,

    /// How many records a list page asks the backend for before filtering locally.
    #[clap(env, long, default_value_t = 1000)]
    pub fetch_limit: usize,

    /// Offset that "today", "this month" and custom date ranges are evaluated in.
    #[clap(env, long, default_value = "+00:00", value_parser = parse_utc_offset)]
    pub utc_offset: UtcOffset,

    #[clap(env, long, default_value_t = false)]
    pub secure_cookies: bool,

    #[clap(env, long, default_value_t = 50 * 1024 * 1024)]
    pub max_body_bytes: usize,

    #[clap(env, long, default_value_t = 256)]
    pub max_in_flight_requests: usize,

    #[clap(env, long, default_value_t = 3600)]
    pub draft_ttl_secs: u64,

    /// Open listing forms kept at once; the least recently used go first.
    #[clap(env, long, default_value_t = 200)]
    pub max_drafts: usize,

    #[clap(env, long, default_value_t = 10)]
    pub max_staged_images: usize,
}

fn parse_utc_offset(raw: &str) -> Result<UtcOffset, String> {
    UtcOffset::parse(raw.trim(), format_description!("[offset_hour sign:mandatory]:[offset_minute]"))
        .map_err(|e| format!("expected an offset like +05:30: {}", e))
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn draft_limits(&self) -> DraftLimits {
        DraftLimits {
            ttl: Duration::from_secs(self.draft_ttl_secs),
            max_drafts: self.max_drafts,
            max_staged_images: self.max_staged_images,
        }
    }

    pub fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(self.utc_offset)
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}
