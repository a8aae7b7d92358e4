use std::env;
use std::sync::{Mutex, OnceLock};

use concierge_cli::commands::{ask, config, doctor, smoke};
use concierge_core::config::ENV_KEYS;
use serde_json::Value;

#[test]
fn ask_returns_reply_json() {
    with_env(&[], || {
        let result = ask::run("demo", None);
        assert_eq!(result.exit_code, 0, "expected successful ask");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["nextStep"], "ask_project_type");
        assert_eq!(payload["quickReplies"][0]["value"], "personal");
        assert_eq!(payload["quickReplies"][1]["value"], "business");
    });
}

#[test]
fn ask_returns_context_failure_for_invalid_json() {
    with_env(&[], || {
        let result = ask::run("pricing", Some("not json"));
        assert_eq!(result.exit_code, 2, "expected invalid context failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "ask");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "invalid_context");
    });
}

#[test]
fn config_attributes_env_sources() {
    with_env(&[("CONCIERGE_SERVER_PORT", "6100"), ("CONCIERGE_LOG_LEVEL", "debug")], || {
        let output = config::run();

        assert!(output.starts_with("effective config"));
        assert!(output.contains("- server.port = 6100 (source: env (CONCIERGE_SERVER_PORT))"));
        assert!(output.contains("- logging.level = debug (source: env (CONCIERGE_LOG_LEVEL))"));
        assert!(output.contains("- server.allowed_origins = * (source: default)"));
    });
}

#[test]
fn config_reports_validation_failure() {
    with_env(&[("CONCIERGE_SERVER_ALLOWED_ORIGINS", "shop.example.com")], || {
        let output = config::run();

        assert!(output.starts_with("config validation failed"));
        assert!(output.contains("server.allowed_origins"));
    });
}

#[test]
fn doctor_passes_with_defaults() {
    with_env(&[], || {
        let result = doctor::run(true);
        assert_eq!(result.exit_code, 0, "expected passing doctor report");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["overall_status"], "pass");
        let names = payload["checks"]
            .as_array()
            .map(|checks| checks.iter().filter_map(|check| check["name"].as_str()).collect())
            .unwrap_or_else(Vec::new);
        assert_eq!(names, vec!["config_validation", "bind_address", "catalog_integrity"]);
    });
}

#[test]
fn doctor_skips_bind_check_when_config_invalid() {
    with_env(&[("CONCIERGE_SERVER_PORT", "0")], || {
        let result = doctor::run(false);
        assert_eq!(result.exit_code, 1, "expected failing doctor report");

        assert!(result.output.starts_with("doctor: one or more readiness checks failed"));
        assert!(result.output.contains("- [fail] config_validation"));
        assert!(result.output.contains("- [skip] bind_address"));
        assert!(result.output.contains("- [ok] catalog_integrity"));
    });
}

#[test]
fn smoke_returns_success_report_with_valid_env() {
    with_env(&[], || {
        let result = smoke::run();
        assert_eq!(result.exit_code, 0, "expected successful smoke report");

        let payload = parse_payload(last_line(&result.output));
        assert_eq!(payload["command"], "smoke");
        assert_eq!(payload["status"], "pass");
        assert_eq!(payload["checks"].as_array().map(Vec::len), Some(7));
    });
}

#[test]
fn smoke_returns_failure_when_config_invalid() {
    with_env(&[("CONCIERGE_SERVER_PORT", "0")], || {
        let result = smoke::run();
        assert_eq!(result.exit_code, 6, "expected smoke failure code");

        let payload = parse_payload(last_line(&result.output));
        assert_eq!(payload["command"], "smoke");
        assert_eq!(payload["status"], "fail");
        assert_eq!(payload["checks"][1]["status"], "skipped");
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn last_line(output: &str) -> &str {
    output.lines().last().unwrap_or_default()
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let previous_values: Vec<(&str, Option<String>)> =
        ENV_KEYS.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &ENV_KEYS {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
