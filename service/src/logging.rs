use crate::config::Config;
use log::{info, log, warn, Level, LevelFilter, SetLoggerError};
use simplelog::{self, ConfigBuilder};

/// Dependencies whose log output is suppressed unless running at Trace.
const FILTERED_MODULES: &[&str] = &[
    "tower", "tracing", "hyper", "axum", "reqwest", "rustls", "mio",
];

pub struct Logger {}

impl Logger {
    /// Installs the global terminal logger at the level configured in `Config`.
    ///
    /// Trace shows everything, including HTTP plumbing from dependencies. Every other
    /// level hides the modules in `FILTERED_MODULES`.
    pub fn init_logger(config: &Config) -> Result<(), SetLoggerError> {
        let apply_filters = Self::should_filter_dependencies(config.log_level_filter);

        simplelog::TermLogger::init(
            Self::convert_level_filter(config.log_level_filter),
            Self::build_log_config(apply_filters),
            simplelog::TerminalMode::Mixed,
            simplelog::ColorChoice::Auto,
        )
    }

    /// Logs which organizer and credentials the process will use, without secret values.
    pub fn log_startup_summary(config: &Config) {
        info!("{}", Self::endpoint_summary(config));

        let missing = config.missing_credentials();
        if !missing.is_empty() {
            warn!(
                "Missing credential settings {missing:?}; meeting creation will fail until they are set"
            );
        }

        let (level, message) = Self::organizer_summary(config);
        log!(level, "{message}");
    }

    fn endpoint_summary(config: &Config) -> String {
        let mut summary = format!(
            "Runtime environment: {}, Graph API: {}",
            config.runtime_env(),
            config.graph_base_url()
        );
        if let Some(authority_host) = config.authority_host() {
            summary.push_str(&format!(", authority: {authority_host}"));
        }
        summary
    }

    fn organizer_summary(config: &Config) -> (Level, String) {
        match (
            non_blank(config.default_organizer_user_id()),
            non_blank(config.default_organizer_email()),
        ) {
            (Some(user_id), _) => (
                Level::Info,
                format!("Meetings will be organized by user id {user_id}"),
            ),
            (None, Some(email)) => (
                Level::Warn,
                format!(
                    "Meetings will be organized by {email}; Graph may require the organizer's object id instead of an email"
                ),
            ),
            (None, None) => (
                Level::Warn,
                "Neither DEFAULT_ORGANIZER_USER_ID nor DEFAULT_ORGANIZER_EMAIL is configured"
                    .to_string(),
            ),
        }
    }

    fn convert_level_filter(level: LevelFilter) -> simplelog::LevelFilter {
        match level {
            LevelFilter::Off => simplelog::LevelFilter::Off,
            LevelFilter::Error => simplelog::LevelFilter::Error,
            LevelFilter::Warn => simplelog::LevelFilter::Warn,
            LevelFilter::Info => simplelog::LevelFilter::Info,
            LevelFilter::Debug => simplelog::LevelFilter::Debug,
            LevelFilter::Trace => simplelog::LevelFilter::Trace,
        }
    }

    fn should_filter_dependencies(level: LevelFilter) -> bool {
        level != LevelFilter::Trace
    }

    fn build_log_config(apply_filters: bool) -> simplelog::Config {
        let mut builder = ConfigBuilder::new();
        builder.set_time_format_rfc3339();

        if apply_filters {
            for module in FILTERED_MODULES {
                builder.add_filter_ignore_str(module);
            }
        }

        builder.build()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
