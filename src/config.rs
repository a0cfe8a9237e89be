use log::warn;

const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_SMTP_FROM: &str = "PLV Lost and Found <noreply@plv.edu.ph>";
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Full `From` header, display name included.
    pub from_address: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub smtp: SmtpConfig,
    pub listen_addr: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port = match lookup("SMTP_PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("SMTP_PORT '{}' is not a valid port, using {}", raw, DEFAULT_SMTP_PORT);
                DEFAULT_SMTP_PORT
            }),
            None => DEFAULT_SMTP_PORT,
        };

        Config {
            smtp: SmtpConfig {
                host: var("SMTP_HOST", DEFAULT_SMTP_HOST),
                port,
                username: var("SMTP_USER", ""),
                password: var("SMTP_PASSWORD", ""),
                from_address: var("SMTP_FROM", DEFAULT_SMTP_FROM),
            },
            listen_addr: var("LISTEN_ADDR", DEFAULT_LISTEN_ADDR),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]);
        assert_eq!(config.smtp.host, "smtp.gmail.com");
        assert_eq!(config.smtp.port, 587);
        assert_eq!(config.smtp.username, "");
        assert_eq!(config.smtp.password, "");
        assert_eq!(config.smtp.from_address, "PLV Lost and Found <noreply@plv.edu.ph>");
        assert_eq!(config.listen_addr, "0.0.0.0:3000");
    }

    #[test]
    fn values_come_from_lookup() {
        let config = config_from(&[
            ("SMTP_HOST", "mail.example.org"),
            ("SMTP_PORT", "465"),
            ("SMTP_USER", "relay"),
            ("SMTP_PASSWORD", "hunter2"),
            ("SMTP_FROM", "Desk <desk@plv.edu.ph>"),
            ("LISTEN_ADDR", "127.0.0.1:8080"),
        ]);
        assert_eq!(config.smtp.host, "mail.example.org");
        assert_eq!(config.smtp.port, 465);
        assert_eq!(config.smtp.username, "relay");
        assert_eq!(config.smtp.password, "hunter2");
        assert_eq!(config.smtp.from_address, "Desk <desk@plv.edu.ph>");
        assert_eq!(config.listen_addr, "127.0.0.1:8080");
    }

    #[test]
    fn bad_port_falls_back_to_default() {
        let config = config_from(&[("SMTP_PORT", "not-a-port")]);
        assert_eq!(config.smtp.port, 587);
    }
}
