use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::config_spec::ConfigSpec;
use crate::config::errors::ApplicationError;
use crate::config::EnvironmentProvider;

/// Which tabular store adapter backs the repositories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Google Sheets over HTTPS
    Sheets,
    /// Process-local tables, lost on restart
    Memory,
}

impl StoreBackend {
    fn parse(value: &str) -> Result<Self, ApplicationError> {
        match value.trim().to_lowercase().as_str() {
            "sheets" => Ok(Self::Sheets),
            "memory" => Ok(Self::Memory),
            other => Err(ApplicationError::InvalidSetting {
                setting_name: "STORE_BACKEND".to_string(),
                reason: format!("Expected 'sheets' or 'memory', got '{}'", other),
            }),
        }
    }
}

/// Infrastructure settings read once at startup
pub struct BootstrapSettings {
    server_host: String,
    server_port: u16,
    store_backend: StoreBackend,
    spreadsheet_id: String,
    credentials_file: PathBuf,
    store_timeout: Duration,
    token_ttl: Duration,
}

impl BootstrapSettings {
    pub fn from_env_provider(
        env_provider: Arc<dyn EnvironmentProvider + Send + Sync>,
    ) -> Result<Self, ApplicationError> {
        let host_spec = ConfigSpec::new(env_provider.clone())
            .env_override("HOST")
            .default_value("0.0.0.0")
            .validator(ConfigSpec::validate_host_address);

        let port_spec = ConfigSpec::new(env_provider.clone())
            .env_override("PORT")
            .default_value("8001");

        let backend_spec = ConfigSpec::new(env_provider.clone())
            .env_override("STORE_BACKEND")
            .default_value("sheets");

        let spreadsheet_spec = ConfigSpec::new(env_provider.clone())
            .env_override("SPREADSHEET_ID");

        let credentials_spec = ConfigSpec::new(env_provider.clone())
            .env_override("GOOGLE_CREDENTIALS_FILE")
            .default_value("credentials.json")
            .min_length(1);

        let timeout_spec = ConfigSpec::new(env_provider.clone())
            .env_override("STORE_TIMEOUT_SECS")
            .default_value("10");

        let ttl_spec = ConfigSpec::new(env_provider.clone())
            .env_override("JWT_EXPIRES_IN")
            .default_value("90d");

        let server_host = host_spec.load()?;
        let server_port = ConfigSpec::parse_port(&port_spec.load()?, "PORT")?;
        let store_backend = StoreBackend::parse(&backend_spec.load()?)?;

        let spreadsheet_id = spreadsheet_spec.load()?;
        if store_backend == StoreBackend::Sheets && spreadsheet_id.trim().is_empty() {
            return Err(ApplicationError::InvalidSetting {
                setting_name: "SPREADSHEET_ID".to_string(),
                reason: "Required when STORE_BACKEND is 'sheets'".to_string(),
            });
        }

        let credentials_file = PathBuf::from(credentials_spec.load()?);
        let store_timeout = Duration::from_secs(ConfigSpec::parse_positive_u64(
            &timeout_spec.load()?,
            "STORE_TIMEOUT_SECS",
        )?);
        let token_ttl = ConfigSpec::parse_duration_human(&ttl_spec.load()?, "JWT_EXPIRES_IN")?;

        Ok(Self {
            server_host,
            server_port,
            store_backend,
            spreadsheet_id,
            credentials_file,
            store_timeout,
            token_ttl,
        })
    }

    pub fn from_env() -> Result<Self, ApplicationError> {
        use crate::config::SystemEnvironment;
        Self::from_env_provider(Arc::new(SystemEnvironment))
    }

    pub fn server_host(&self) -> &str {
        &self.server_host
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn store_backend(&self) -> StoreBackend {
        self.store_backend
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    pub fn credentials_file(&self) -> &PathBuf {
        &self.credentials_file
    }

    pub fn store_timeout(&self) -> Duration {
        self.store_timeout
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }
}

impl fmt::Debug for BootstrapSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapSettings")
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("store_backend", &self.store_backend)
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("credentials_file", &self.credentials_file)
            .field("store_timeout", &self.store_timeout)
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    fn settings(vars: &[(&str, &str)]) -> Result<BootstrapSettings, ApplicationError> {
        BootstrapSettings::from_env_provider(Arc::new(MockEnvironment::empty().with_vars(vars)))
    }

    #[test]
    fn test_defaults_with_spreadsheet_id() {
        let settings = settings(&[("SPREADSHEET_ID", "abc123")]).unwrap();

        assert_eq!(settings.server_address(), "0.0.0.0:8001");
        assert_eq!(settings.store_backend(), StoreBackend::Sheets);
        assert_eq!(settings.credentials_file(), &PathBuf::from("credentials.json"));
        assert_eq!(settings.store_timeout(), Duration::from_secs(10));
        assert_eq!(settings.token_ttl(), Duration::from_secs(90 * 24 * 60 * 60));
    }

    #[test]
    fn test_sheets_backend_requires_spreadsheet_id() {
        match settings(&[]) {
            Err(ApplicationError::InvalidSetting { setting_name, .. }) => {
                assert_eq!(setting_name, "SPREADSHEET_ID");
            }
            other => panic!("Expected missing SPREADSHEET_ID, got {:?}", other),
        }
    }

    #[test]
    fn test_memory_backend_needs_no_spreadsheet() {
        let settings = settings(&[("STORE_BACKEND", "memory"), ("PORT", "9100")]).unwrap();

        assert_eq!(settings.store_backend(), StoreBackend::Memory);
        assert_eq!(settings.server_port(), 9100);
    }

    #[test]
    fn test_unknown_backend_rejected() {
        assert!(settings(&[("STORE_BACKEND", "postgres")]).is_err());
    }

    #[test]
    fn test_custom_token_ttl_and_timeout() {
        let settings = settings(&[
            ("STORE_BACKEND", "memory"),
            ("JWT_EXPIRES_IN", "12h"),
            ("STORE_TIMEOUT_SECS", "3"),
        ])
        .unwrap();

        assert_eq!(settings.token_ttl(), Duration::from_secs(12 * 60 * 60));
        assert_eq!(settings.store_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(settings(&[("STORE_BACKEND", "memory"), ("STORE_TIMEOUT_SECS", "0")]).is_err());
    }
}
