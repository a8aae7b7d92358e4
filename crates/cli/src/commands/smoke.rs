use std::time::Instant;

use concierge_agent::{messages, Responder};
use concierge_core::config::{AppConfig, LoadOptions};
use concierge_core::domain::context::ConversationContext;
use concierge_core::domain::reply::Reply;
use concierge_core::flows::DialogueStep;
use serde::Serialize;

use crate::commands::CommandResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum SmokeStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct SmokeCheck {
    name: &'static str,
    status: SmokeStatus,
    elapsed_ms: u64,
    message: String,
}

#[derive(Debug, Serialize)]
struct SmokeReport {
    command: &'static str,
    status: SmokeStatus,
    summary: String,
    total_elapsed_ms: u64,
    checks: Vec<SmokeCheck>,
}

type ConversationCheck = fn(&Responder) -> Result<String, String>;

const CONVERSATION_CHECKS: [(&str, ConversationCheck); 6] = [
    ("catalog_integrity", check_catalog),
    ("faq_exact_match", check_exact_match),
    ("faq_keyword_match", check_keyword_match),
    ("lead_capture", check_lead_capture),
    ("goodbye", check_goodbye),
    ("fallback", check_fallback),
];

pub fn run() -> CommandResult {
    let started = Instant::now();
    let mut checks = Vec::new();

    match timed_check(|| AppConfig::load(LoadOptions::default())) {
        Ok((elapsed_ms, _config)) => checks.push(SmokeCheck {
            name: "config_validation",
            status: SmokeStatus::Pass,
            elapsed_ms,
            message: "configuration loaded and validated".to_string(),
        }),
        Err((elapsed_ms, error)) => {
            checks.push(SmokeCheck {
                name: "config_validation",
                status: SmokeStatus::Fail,
                elapsed_ms,
                message: error.to_string(),
            });
            checks.extend(CONVERSATION_CHECKS.iter().map(|(name, _)| skipped(*name)));
            return finalize_report(checks, started.elapsed().as_millis() as u64);
        }
    }

    let responder = Responder::standard();
    for (name, check) in CONVERSATION_CHECKS {
        let check = match timed_check(|| check(&responder)) {
            Ok((elapsed_ms, message)) => {
                SmokeCheck { name, status: SmokeStatus::Pass, elapsed_ms, message }
            }
            Err((elapsed_ms, message)) => {
                SmokeCheck { name, status: SmokeStatus::Fail, elapsed_ms, message }
            }
        };
        checks.push(check);
    }

    finalize_report(checks, started.elapsed().as_millis() as u64)
}

fn check_catalog(responder: &Responder) -> Result<String, String> {
    let issues = responder.catalog().integrity_issues();
    if issues.is_empty() {
        Ok("catalog tables are consistent".to_string())
    } else {
        Err(issues.join("; "))
    }
}

fn check_exact_match(responder: &Responder) -> Result<String, String> {
    let reply = responder.resolve("pricing", &ConversationContext::default());
    expect_step(&reply, Some(DialogueStep::FaqMode))?;
    expect_values(&reply, &["features", "demo"])?;
    Ok("`pricing` returned the pricing answer".to_string())
}

fn check_keyword_match(responder: &Responder) -> Result<String, String> {
    let context = ConversationContext::default();
    let keyword = responder.resolve("How much does it cost?", &context);
    let exact = responder.resolve("pricing", &context);
    if keyword != exact {
        return Err("keyword question did not match the exact pricing reply".to_string());
    }
    Ok("keyword question matched the pricing answer".to_string())
}

fn check_lead_capture(responder: &Responder) -> Result<String, String> {
    let script = [
        ("demo", DialogueStep::AskProjectType),
        ("business", DialogueStep::AskName),
        ("Smoke Tester", DialogueStep::AskEmail),
        ("not-an-email", DialogueStep::AskEmail),
        ("smoke@example.com", DialogueStep::AskReason),
        ("running smoke checks", DialogueStep::Collected),
    ];

    let mut context = ConversationContext::default();
    for (message, expected) in script {
        let reply = responder.resolve(message, &context);
        expect_step(&reply, Some(expected))
            .map_err(|error| format!("after `{message}`: {error}"))?;
        if message == "not-an-email" && reply.response != messages::INVALID_EMAIL {
            return Err("invalid email was not re-prompted".to_string());
        }
        context = context.apply(&reply);
    }

    let info = &context.user_info;
    let complete = info.project_type.is_some()
        && info.name.is_some()
        && info.email.is_some()
        && info.reason.is_some();
    if !complete {
        return Err("lead capture finished without every field".to_string());
    }
    Ok(format!("collected lead for {}", info.greeting_name()))
}

fn check_goodbye(responder: &Responder) -> Result<String, String> {
    let reply = responder.resolve("thanks", &ConversationContext::at_step(DialogueStep::Collected));
    expect_step(&reply, None)?;
    expect_values(&reply, &[])?;
    Ok("closing message returned".to_string())
}

fn check_fallback(responder: &Responder) -> Result<String, String> {
    let reply = responder.resolve("asdkjasd", &ConversationContext::default());
    expect_step(&reply, Some(DialogueStep::FaqMode))?;
    expect_values(&reply, &["pricing", "features", "support", "demo"])?;
    Ok("fallback offered the default quick replies".to_string())
}

fn expect_step(reply: &Reply, expected: Option<DialogueStep>) -> Result<(), String> {
    if reply.next_step == expected {
        return Ok(());
    }
    Err(format!("expected next step {:?}, got {:?}", expected, reply.next_step))
}

fn expect_values(reply: &Reply, expected: &[&str]) -> Result<(), String> {
    let values =
        reply.quick_replies.iter().map(|quick_reply| quick_reply.value.as_str()).collect::<Vec<_>>();
    if values == expected {
        return Ok(());
    }
    Err(format!("expected quick replies {expected:?}, got {values:?}"))
}

fn timed_check<T, E>(check: impl FnOnce() -> Result<T, E>) -> Result<(u64, T), (u64, E)> {
    let started = Instant::now();
    match check() {
        Ok(value) => Ok((started.elapsed().as_millis() as u64, value)),
        Err(error) => Err((started.elapsed().as_millis() as u64, error)),
    }
}

fn skipped(name: &'static str) -> SmokeCheck {
    SmokeCheck {
        name,
        status: SmokeStatus::Skipped,
        elapsed_ms: 0,
        message: "skipped due previous failure".to_string(),
    }
}

fn finalize_report(checks: Vec<SmokeCheck>, total_elapsed_ms: u64) -> CommandResult {
    let passed = checks.iter().filter(|check| check.status == SmokeStatus::Pass).count();
    let total = checks.len();
    let failed = checks.iter().any(|check| check.status == SmokeStatus::Fail);

    let report = SmokeReport {
        command: "smoke",
        status: if failed { SmokeStatus::Fail } else { SmokeStatus::Pass },
        summary: format!("smoke: {passed}/{total} checks passed in {total_elapsed_ms}ms"),
        total_elapsed_ms,
        checks,
    };

    let human = report.summary.clone();
    let machine = serde_json::to_string(&report).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"smoke\",\"status\":\"fail\",\"summary\":\"serialization failed\",\"error\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    });

    CommandResult { exit_code: if failed { 6 } else { 0 }, output: format!("{human}\n{machine}") }
}
