use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub coupon_webhook: CouponWebhookConfig,
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub wheel: WheelConfig,
    #[serde(default)]
    pub admin: AdminConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expires_in: i64, // seconds
}

/// Generic coupon delivery channel; `url = None` disables it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponWebhookConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CouponWebhookConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// OpenAI-compatible chat completion endpoint used for remarketing drafts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    #[serde(default = "default_ai_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_ai_model")]
    pub model: String,
    #[serde(default = "default_ai_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            base_url: default_ai_base_url(),
            api_key: String::new(),
            model: default_ai_model(),
            timeout_secs: default_ai_timeout_secs(),
        }
    }
}

/// How the resting position of the wheel is chosen.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// Every slice covers the same arc; `chance` is ignored.
    #[default]
    UniformArc,
    /// Slices are picked proportionally to `chance`.
    Weighted,
}

impl std::str::FromStr for SelectionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uniform_arc" => Ok(SelectionMode::UniformArc),
            "weighted" => Ok(SelectionMode::Weighted),
            other => Err(format!("unknown selection mode: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WheelConfig {
    #[serde(default)]
    pub selection_mode: SelectionMode,
    #[serde(default = "default_country_code")]
    pub default_country_code: String,
    /// Used for the redemption link when a restaurant has no WhatsApp number.
    #[serde(default = "default_fallback_whatsapp")]
    pub fallback_whatsapp: String,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            selection_mode: SelectionMode::default(),
            default_country_code: default_country_code(),
            fallback_whatsapp: default_fallback_whatsapp(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AdminConfig {
    #[serde(default)]
    pub bootstrap_email: Option<String>,
    #[serde(default)]
    pub bootstrap_password: Option<String>,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_ai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_ai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_ai_timeout_secs() -> u64 {
    30
}

fn default_country_code() -> String {
    "55".to_string()
}

fn default_fallback_whatsapp() -> String {
    "5511999999999".to_string()
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 配置文件不存在时完全依赖环境变量
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => toml::from_str(&config_str)
                .map_err(|e| format!("Failed to parse config file: {e}"))?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                let database_url = get_env("DATABASE_URL")
                    .ok_or("DATABASE_URL is not set and no config.toml was found")?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    jwt: JwtConfig {
                        secret: get_env("JWT_SECRET")
                            .unwrap_or_else(|| "change-me-in-production".to_string()),
                        access_token_expires_in: get_env_parse("JWT_ACCESS_EXPIRES_IN", 86_400i64),
                    },
                    coupon_webhook: CouponWebhookConfig::default(),
                    ai: AiConfig::default(),
                    wheel: WheelConfig::default(),
                    admin: AdminConfig::default(),
                }
            }
            Err(e) => {
                return Err(format!("Unable to read config file {config_path}: {e}").into());
            }
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// 环境变量覆盖（即便文件存在时也覆盖）
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            self.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            self.database.max_connections = mc;
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.jwt.secret = v;
        }
        if let Ok(v) = env::var("JWT_ACCESS_EXPIRES_IN")
            && let Ok(n) = v.parse()
        {
            self.jwt.access_token_expires_in = n;
        }
        if let Ok(v) = env::var("COUPON_WEBHOOK_URL") {
            self.coupon_webhook.url = Some(v).filter(|s| !s.is_empty());
        }
        if let Ok(v) = env::var("COUPON_WEBHOOK_TIMEOUT_SECS")
            && let Ok(n) = v.parse()
        {
            self.coupon_webhook.timeout_secs = n;
        }
        if let Ok(v) = env::var("AI_BASE_URL") {
            self.ai.base_url = v;
        }
        if let Ok(v) = env::var("AI_API_KEY") {
            self.ai.api_key = v;
        }
        if let Ok(v) = env::var("AI_MODEL") {
            self.ai.model = v;
        }
        if let Ok(v) = env::var("WHEEL_SELECTION_MODE") {
            match v.parse() {
                Ok(mode) => self.wheel.selection_mode = mode,
                Err(e) => log::warn!("Ignoring WHEEL_SELECTION_MODE: {e}"),
            }
        }
        if let Ok(v) = env::var("WHEEL_DEFAULT_COUNTRY_CODE") {
            self.wheel.default_country_code = v;
        }
        if let Ok(v) = env::var("WHEEL_FALLBACK_WHATSAPP") {
            self.wheel.fallback_whatsapp = v;
        }
        if let Ok(v) = env::var("ADMIN_BOOTSTRAP_EMAIL") {
            self.admin.bootstrap_email = Some(v);
        }
        if let Ok(v) = env::var("ADMIN_BOOTSTRAP_PASSWORD") {
            self.admin.bootstrap_password = Some(v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_toml() {
        let raw = r#"
[server]
host = "127.0.0.1"
port = 9000

[database]
url = "sqlite::memory:"
max_connections = 1

[jwt]
secret = "s"
access_token_expires_in = 60
"#;
        let config: Config = toml::from_str(raw).unwrap();
        assert_eq!(config.server.port, 9000);
        assert!(config.coupon_webhook.url.is_none());
        assert_eq!(config.coupon_webhook.timeout_secs, 10);
        assert_eq!(config.wheel.selection_mode, SelectionMode::UniformArc);
        assert_eq!(config.wheel.default_country_code, "55");
    }

    #[test]
    fn test_parse_selection_mode() {
        let raw = r#"
[server]
host = "0.0.0.0"
port = 8080

[database]
url = "sqlite::memory:"
max_connections = 1

[jwt]
secret = "s"
access_token_expires_in = 60

[wheel]
selection_mode = "weighted"
"#;
        let config: Config = toml::from_str(raw).unwrap();
        assert_eq!(config.wheel.selection_mode, SelectionMode::Weighted);
        assert_eq!("uniform_arc".parse::<SelectionMode>(), Ok(SelectionMode::UniformArc));
        assert!("random".parse::<SelectionMode>().is_err());
    }
}
