use std::env;

use crate::errors::{Error, Result};

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RoleGroups {
    pub caseworker: String,
    pub admin: String,
}

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub trigger_url: String,
    pub api_key: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub db: DbConfig,
    pub session_secret: String,
    pub session_ttl_hours: i64,
    pub jwt_secret: String,
    pub jwt_leeway_secs: u64,
    pub local_dev_bypass: bool,
    pub roles: RoleGroups,
    pub orchestrator: Option<OrchestratorConfig>,
}

fn env_string(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_required(name: &str) -> Result<String> {
    env_optional(name).ok_or_else(|| Error::Config(format!("{name} must be set")))
}

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let orchestrator = match (
            env_optional("VEJMAN_ORCHESTRATOR_URL"),
            env_optional("VEJMAN_ORCHESTRATOR_API_KEY"),
        ) {
            (Some(trigger_url), Some(api_key)) => Some(OrchestratorConfig {
                trigger_url,
                api_key,
            }),
            (None, None) => None,
            _ => {
                return Err(Error::Config(
                    "VEJMAN_ORCHESTRATOR_URL and VEJMAN_ORCHESTRATOR_API_KEY must be set together"
                        .to_string(),
                ));
            }
        };

        Ok(Self {
            bind_addr: env_string("VEJMAN_BIND_ADDR", "127.0.0.1:3587"),
            db: DbConfig {
                url: env_string("VEJMAN_DB_URL", "ws://localhost:8050"),
                namespace: env_string("VEJMAN_DB_NS", "vejman"),
                database: env_string("VEJMAN_DB_NAME", "vejmankassen"),
                username: env_optional("VEJMAN_DB_USER"),
                password: env_optional("VEJMAN_DB_PASS"),
            },
            session_secret: env_required("VEJMAN_SESSION_SECRET")?,
            session_ttl_hours: env_u64("VEJMAN_SESSION_TTL_HOURS", 8) as i64,
            jwt_secret: env_required("VEJMAN_JWT_SECRET")?,
            jwt_leeway_secs: env_u64("VEJMAN_JWT_LEEWAY_SECS", 60),
            local_dev_bypass: env_bool("VEJMAN_LOCAL_DEV_BYPASS", false),
            roles: RoleGroups {
                caseworker: env_string("VEJMAN_CASEWORKER_GROUP", "Vejmankassen-Sagsbehandlere"),
                admin: env_string("VEJMAN_ADMIN_GROUP", "Vejmankassen-Administratorer"),
            },
            orchestrator,
        })
    }
}
