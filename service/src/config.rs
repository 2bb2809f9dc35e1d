use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use std::fmt;
use std::str::FromStr;

/// Default Microsoft Graph API root used when `GRAPH_BASE_URL` is not set.
pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

const DEFAULT_ALLOWED_ORIGIN: &str = "*";
const DEFAULT_GRAPH_TIMEOUT_SECS: u64 = 30;
const DEFAULT_STATIC_DIR: &str = "public";
const DEFAULT_INTERFACE: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

#[derive(Clone, Debug, PartialEq)]
pub enum RustEnv {
    Development,
    Production,
    Staging,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RustEnvParseError;

impl FromStr for RustEnv {
    type Err = RustEnvParseError;
    fn from_str(level: &str) -> Result<RustEnv, Self::Err> {
        match level.to_lowercase().as_str() {
            "development" => Ok(RustEnv::Development),
            "production" => Ok(RustEnv::Production),
            "staging" => Ok(RustEnv::Staging),
            _ => Err(RustEnvParseError),
        }
    }
}

impl fmt::Display for RustEnv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RustEnv::Development => write!(f, "development"),
            RustEnv::Production => write!(f, "production"),
            RustEnv::Staging => write!(f, "staging"),
        }
    }
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// A list of CORS origin URLs allowed to receive server responses. `*` allows any origin.
    #[arg(
        long,
        env,
        value_delimiter = ',',
        use_value_delimiter = true,
        default_value = DEFAULT_ALLOWED_ORIGIN
    )]
    pub allowed_origins: Vec<String>,

    /// The Microsoft Entra tenant the application is registered in.
    #[arg(long, env, hide_env_values = true)]
    tenant_id: Option<String>,

    /// The application (client) ID used for the client credentials exchange.
    #[arg(long, env, hide_env_values = true)]
    client_id: Option<String>,

    /// The client secret used for the client credentials exchange.
    #[arg(long, env, hide_env_values = true)]
    client_secret: Option<String>,

    /// Object ID of the user meetings are created on behalf of. Takes priority
    /// over `DEFAULT_ORGANIZER_EMAIL`.
    #[arg(long, env)]
    default_organizer_user_id: Option<String>,

    /// Email address of the user meetings are created on behalf of.
    #[arg(long, env)]
    default_organizer_email: Option<String>,

    /// The base URL of the Microsoft Graph API.
    /// Override in tests to point at a mock server.
    #[arg(long, env, default_value = DEFAULT_GRAPH_BASE_URL)]
    graph_base_url: String,

    /// The Microsoft identity platform host that issues access tokens. The public
    /// cloud host is used when unset. Override in tests to point at a mock server.
    #[arg(long, env)]
    authority_host: Option<String>,

    /// Timeout in seconds applied to every outbound call to the identity platform and Graph
    #[arg(long, env, default_value_t = DEFAULT_GRAPH_TIMEOUT_SECS)]
    pub graph_timeout_secs: u64,

    /// Directory of static files served for unmatched GET requests
    #[arg(long, env, default_value = DEFAULT_STATIC_DIR)]
    pub static_dir: String,

    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = DEFAULT_INTERFACE)]
    pub interface: Option<String>,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,

    /// Set the Rust runtime environment to use.
    #[arg(
    short,
    long,
    env,
    default_value_t = RustEnv::Development,
    value_parser = clap::builder::PossibleValuesParser::new([
        "DEVELOPMENT", "PRODUCTION", "STAGING",
        "development", "production", "staging"
    ])
        .map(|s| s.parse::<RustEnv>().unwrap()),
    )]
    pub runtime_env: RustEnv,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    /// Builds a Config holding only the built-in defaults. Neither the process
    /// environment nor the command line is read. Credentials and the organizer are
    /// unset until provided with the setters.
    pub fn with_defaults() -> Self {
        Self {
            allowed_origins: vec![DEFAULT_ALLOWED_ORIGIN.to_string()],
            tenant_id: None,
            client_id: None,
            client_secret: None,
            default_organizer_user_id: None,
            default_organizer_email: None,
            graph_base_url: DEFAULT_GRAPH_BASE_URL.to_string(),
            authority_host: None,
            graph_timeout_secs: DEFAULT_GRAPH_TIMEOUT_SECS,
            static_dir: DEFAULT_STATIC_DIR.to_string(),
            interface: Some(DEFAULT_INTERFACE.to_string()),
            port: DEFAULT_PORT,
            log_level_filter: LevelFilter::Info,
            runtime_env: RustEnv::Development,
        }
    }

    pub fn set_credentials(
        mut self,
        tenant_id: Option<String>,
        client_id: Option<String>,
        client_secret: Option<String>,
    ) -> Self {
        self.tenant_id = tenant_id;
        self.client_id = client_id;
        self.client_secret = client_secret;
        self
    }

    pub fn set_organizer(mut self, user_id: Option<String>, email: Option<String>) -> Self {
        self.default_organizer_user_id = user_id;
        self.default_organizer_email = email;
        self
    }

    pub fn set_graph_base_url(mut self, graph_base_url: String) -> Self {
        self.graph_base_url = graph_base_url;
        self
    }

    pub fn set_authority_host(mut self, authority_host: String) -> Self {
        self.authority_host = Some(authority_host);
        self
    }

    pub fn tenant_id(&self) -> Option<&str> {
        self.tenant_id.as_deref()
    }

    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    pub fn client_secret(&self) -> Option<&str> {
        self.client_secret.as_deref()
    }

    pub fn default_organizer_user_id(&self) -> Option<&str> {
        self.default_organizer_user_id.as_deref()
    }

    pub fn default_organizer_email(&self) -> Option<&str> {
        self.default_organizer_email.as_deref()
    }

    /// Returns the Microsoft Graph API base URL without a trailing slash.
    pub fn graph_base_url(&self) -> &str {
        self.graph_base_url.trim_end_matches('/')
    }

    /// Returns the overridden identity platform host without a trailing slash.
    pub fn authority_host(&self) -> Option<&str> {
        self.authority_host
            .as_deref()
            .map(|host| host.trim_end_matches('/'))
            .filter(|host| !host.is_empty())
    }

    /// Names of the credential settings that are absent or blank.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        [
            ("TENANT_ID", &self.tenant_id),
            ("CLIENT_ID", &self.client_id),
            ("CLIENT_SECRET", &self.client_secret),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
        .map(|(name, _)| name)
        .collect()
    }

    pub fn runtime_env(&self) -> RustEnv {
        self.runtime_env.clone()
    }
}
