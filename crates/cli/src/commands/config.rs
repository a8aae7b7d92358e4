use std::env;
use std::fs;
use std::path::Path;

use concierge_core::config::{
    resolve_config_path, AppConfig, LoadOptions, ENV_LOGGING_FORMAT, ENV_LOGGING_LEVEL,
    ENV_LOG_FORMAT_ALIAS, ENV_LOG_LEVEL_ALIAS, ENV_SERVER_ALLOWED_ORIGINS,
    ENV_SERVER_BIND_ADDRESS, ENV_SERVER_GRACEFUL_SHUTDOWN_SECS, ENV_SERVER_PORT,
};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = resolve_config_path(None);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        "server.bind_address",
        &config.server.bind_address,
        source("server.bind_address", &[ENV_SERVER_BIND_ADDRESS]),
    ));
    lines.push(render_line(
        "server.port",
        &config.server.port.to_string(),
        source("server.port", &[ENV_SERVER_PORT]),
    ));
    lines.push(render_line(
        "server.graceful_shutdown_secs",
        &config.server.graceful_shutdown_secs.to_string(),
        source("server.graceful_shutdown_secs", &[ENV_SERVER_GRACEFUL_SHUTDOWN_SECS]),
    ));
    lines.push(render_line(
        "server.allowed_origins",
        &config.server.allowed_origins.join(","),
        source("server.allowed_origins", &[ENV_SERVER_ALLOWED_ORIGINS]),
    ));
    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source("logging.level", &[ENV_LOGGING_LEVEL, ENV_LOG_LEVEL_ALIAS]),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        source("logging.format", &[ENV_LOGGING_FORMAT, ENV_LOG_FORMAT_ALIAS]),
    ));

    lines.join("\n")
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
