use anyhow::{Context, Result};
use platform_api::ClientConfig;

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 8082;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub client: ClientConfig,
    pub log_filter: Option<String>,
    pub otlp_endpoint: Option<String>,
}

impl AppConfig {
    /// Reads `.env` (if present) and then the process environment.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let client = match var("EMPLOYEE_API_URL") {
            Some(url) => ClientConfig::new(&url).context("invalid EMPLOYEE_API_URL")?,
            None => {
                let host = var("EMPLOYEE_API_HOST").unwrap_or_else(|| DEFAULT_HOST.into());
                let port = match var("EMPLOYEE_API_PORT") {
                    Some(raw) => raw
                        .parse::<u16>()
                        .with_context(|| format!("invalid EMPLOYEE_API_PORT {raw:?}"))?,
                    None => DEFAULT_PORT,
                };
                ClientConfig::from_host_port(&host, port)
                    .context("invalid EMPLOYEE_API_HOST")?
            }
        };

        Ok(Self {
            client,
            log_filter: var("LOG_FILTER"),
            otlp_endpoint: var("OTLP_ENDPOINT"),
        })
    }

    pub fn with_api_url(mut self, url: &str) -> Result<Self> {
        self.client = ClientConfig::new(url).context("invalid --api-url")?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_point_at_local_service() {
        let config = config_from(&[]).unwrap();
        assert_eq!(
            config.client.base_url().as_str(),
            "http://localhost:8082/api/employees"
        );
        assert_eq!(config.log_filter, None);
    }

    #[test]
    fn host_and_port_are_combined() {
        let config = config_from(&[
            ("EMPLOYEE_API_HOST", "hr.internal"),
            ("EMPLOYEE_API_PORT", "9000"),
            ("LOG_FILTER", "debug"),
        ])
        .unwrap();
        assert_eq!(
            config.client.base_url().as_str(),
            "http://hr.internal:9000/api/employees"
        );
        assert_eq!(config.log_filter.as_deref(), Some("debug"));
    }

    #[test]
    fn full_url_wins_over_host_and_port() {
        let config = config_from(&[
            ("EMPLOYEE_API_URL", "https://staff.example.test/api/employees"),
            ("EMPLOYEE_API_PORT", "not-a-port"),
        ])
        .unwrap();
        assert_eq!(config.client.base_url().host_str(), Some("staff.example.test"));
    }

    #[test]
    fn bad_port_is_reported() {
        let err = config_from(&[("EMPLOYEE_API_PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("EMPLOYEE_API_PORT"));
    }

    #[test]
    fn cli_override_replaces_base() {
        let config = config_from(&[])
            .unwrap()
            .with_api_url("http://127.0.0.1:18082/api/employees")
            .unwrap();
        assert_eq!(config.client.base_url().port(), Some(18082));
    }
}
