use football_data_api::client::ApiConfig;
use football_data_api::normalize::FailurePolicy;
use log::LevelFilter;

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: LevelFilter,
    pub failure_policy: FailurePolicy,
    pub api: ApiConfig,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: LevelFilter::Info,
            failure_policy: FailurePolicy::default(),
            api: ApiConfig::default(),
        }
    }
}

impl AppSettings {
    /// Read settings from the process environment, after loading `.env` if present.
    pub fn load() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let log_level = lookup("FOOTDASH_LOG")
            .and_then(|v| v.trim().parse::<LevelFilter>().ok())
            .unwrap_or(LevelFilter::Info);
        let failure_policy = lookup("FOOTDASH_FAILURE_POLICY")
            .and_then(|v| v.parse::<FailurePolicy>().ok())
            .unwrap_or_default();

        Self {
            full_screen: false,
            log_level,
            failure_policy,
            api: ApiConfig::from_lookup(&lookup),
        }
    }
}
