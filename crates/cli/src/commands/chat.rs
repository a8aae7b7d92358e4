//! Interactive session that carries conversation context between turns the
//! way a chat widget would.

use std::io::{self, BufRead, Write};

use concierge_agent::Responder;
use concierge_core::domain::context::ConversationContext;
use concierge_core::domain::reply::Reply;

pub const QUIT_COMMAND: &str = "/quit";
pub const RESET_COMMAND: &str = "/reset";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChatSummary {
    pub turns: usize,
    pub context: ConversationContext,
}

pub fn run<R, W>(input: R, mut output: W, json: bool) -> io::Result<ChatSummary>
where
    R: BufRead,
    W: Write,
{
    let responder = Responder::standard();
    let mut context = ConversationContext::default();
    let mut turns = 0;

    write_reply(&mut output, &responder.greeting(), json)?;
    prompt(&mut output, json)?;

    for line in input.lines() {
        let line = line?;
        let message = line.trim();

        match message {
            "" => {}
            QUIT_COMMAND => break,
            RESET_COMMAND => {
                context = ConversationContext::default();
                write_reply(&mut output, &responder.greeting(), json)?;
            }
            _ => {
                let reply = responder.resolve(message, &context);
                context = context.apply(&reply);
                turns += 1;
                write_reply(&mut output, &reply, json)?;
            }
        }
        prompt(&mut output, json)?;
    }

    if !json {
        writeln!(output)?;
    }
    output.flush()?;
    Ok(ChatSummary { turns, context })
}

fn write_reply<W: Write>(output: &mut W, reply: &Reply, json: bool) -> io::Result<()> {
    if json {
        let line = serde_json::to_string(reply).map_err(io::Error::other)?;
        return writeln!(output, "{line}");
    }

    writeln!(output, "bot> {}", reply.response.replace('\n', "\n     "))?;
    if !reply.quick_replies.is_empty() {
        let options = reply
            .quick_replies
            .iter()
            .map(|quick_reply| format!("[{}] {}", quick_reply.value, quick_reply.label))
            .collect::<Vec<_>>()
            .join("  ");
        writeln!(output, "     {options}")?;
    }
    Ok(())
}

fn prompt<W: Write>(output: &mut W, json: bool) -> io::Result<()> {
    if !json {
        write!(output, "you> ")?;
        output.flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use concierge_core::flows::DialogueStep;
    use serde_json::Value;

    use super::run;

    fn session(script: &str, json: bool) -> (super::ChatSummary, String) {
        let mut output = Vec::new();
        let summary = run(Cursor::new(script.to_string()), &mut output, json).expect("chat session");
        (summary, String::from_utf8(output).expect("utf-8 output"))
    }

    #[test]
    fn scripted_lead_capture_collects_every_field() {
        let script = "demo\nbusiness\n\nAlex\nnope\nalex@x.com\nEvaluating chat tools\nthanks\n";
        let (summary, output) = session(script, true);

        assert_eq!(summary.turns, 7);
        assert_eq!(summary.context.step, DialogueStep::Collected);
        assert_eq!(summary.context.user_info.project_type.as_deref(), Some("business"));
        assert_eq!(summary.context.user_info.name.as_deref(), Some("Alex"));
        assert_eq!(summary.context.user_info.email.as_deref(), Some("alex@x.com"));
        assert_eq!(summary.context.user_info.reason.as_deref(), Some("Evaluating chat tools"));

        let replies = output
            .lines()
            .map(|line| serde_json::from_str::<Value>(line).expect("json line"))
            .collect::<Vec<_>>();
        assert_eq!(replies.len(), 8, "greeting plus one reply per non-empty line");
        assert_eq!(replies[0]["nextStep"], "faq_mode");
        assert_eq!(replies[4]["nextStep"], "ask_email");
        assert!(replies[4].get("userInfo").is_none());
        assert!(replies[7].get("nextStep").is_none());
    }

    #[test]
    fn reset_restarts_with_empty_context() {
        let (summary, output) = session("demo\npersonal\n/reset\npricing\n", true);

        assert_eq!(summary.turns, 3);
        assert_eq!(summary.context.step, DialogueStep::FaqMode);
        assert!(summary.context.user_info.is_empty());
        assert_eq!(output.lines().count(), 5);
    }

    #[test]
    fn quit_stops_before_remaining_lines() {
        let (summary, _) = session("pricing\n/quit\nfeatures\n", true);

        assert_eq!(summary.turns, 1);
    }

    #[test]
    fn human_output_lists_quick_replies() {
        let (summary, output) = session("features\n", false);

        assert_eq!(summary.turns, 1);
        assert!(output.starts_with("bot> Hi there! 👋"));
        assert!(output.contains("[pricing] 💰 Pricing  [demo] 🚀 Request Demo"));
        assert!(output.contains("you> "));
    }
}
