use std::net::SocketAddr;

use concierge_core::config::{AppConfig, LoadOptions};
use concierge_core::faq::FaqCatalog;
use serde::Serialize;

use crate::commands::CommandResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> CommandResult {
    let report = build_report();
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { 1 };

    if json_output {
        let output = serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
        return CommandResult { exit_code, output };
    }

    CommandResult { exit_code, output: render_human(&report) }
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_bind_address(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(DoctorCheck {
                name: "bind_address",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
        }
    }
    checks.push(check_catalog_integrity(FaqCatalog::standard()));

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_bind_address(config: &AppConfig) -> DoctorCheck {
    let address = config.server.listen_address();
    match address.parse::<SocketAddr>() {
        Ok(parsed) => DoctorCheck {
            name: "bind_address",
            status: CheckStatus::Pass,
            details: format!("server will listen on {parsed}"),
        },
        Err(error) => DoctorCheck {
            name: "bind_address",
            status: CheckStatus::Fail,
            details: format!("`{address}` is not a socket address: {error}"),
        },
    }
}

fn check_catalog_integrity(catalog: &FaqCatalog) -> DoctorCheck {
    let issues = catalog.integrity_issues();
    if issues.is_empty() {
        return DoctorCheck {
            name: "catalog_integrity",
            status: CheckStatus::Pass,
            details: format!(
                "{} keyword rules, {} default quick replies",
                catalog.keyword_index().len(),
                catalog.default_quick_replies().len()
            ),
        };
    }

    DoctorCheck { name: "catalog_integrity", status: CheckStatus::Fail, details: issues.join("; ") }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use concierge_core::config::AppConfig;
    use concierge_core::faq::FaqCatalog;

    use super::{check_bind_address, check_catalog_integrity, CheckStatus};

    #[test]
    fn hostname_bind_address_is_reported() {
        let mut config = AppConfig::default();
        config.server.bind_address = "localhost".to_string();

        let check = check_bind_address(&config);
        assert_eq!(check.status, CheckStatus::Fail);
        assert!(check.details.contains("localhost:5000"));

        let check = check_bind_address(&AppConfig::default());
        assert_eq!(check.status, CheckStatus::Pass);
    }

    #[test]
    fn standard_catalog_is_consistent() {
        let check = check_catalog_integrity(FaqCatalog::standard());

        assert_eq!(check.status, CheckStatus::Pass);
        assert_eq!(check.details, "4 keyword rules, 4 default quick replies");
    }
}
