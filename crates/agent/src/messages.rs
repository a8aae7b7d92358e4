//! Canned conversation text outside the FAQ catalog.

pub const WELCOME: &str = "Hi there! 👋 I'm your virtual assistant. I can help you with questions about our services, pricing, and more.

How can I assist you today?";

pub const ASK_NAME: &str = "Got it! 😊 What should I call you?";

pub const INVALID_EMAIL: &str =
    "Hmm, that doesn't look like a valid email. Could you please try again?";

pub const ASK_REASON: &str =
    "Great! And what brings you here today? (Just a brief description is fine)";

pub const GOODBYE: &str = "You're welcome! Have a wonderful day! 🌟";

pub const FALLBACK: &str = "I'm not quite sure I understand. Could you rephrase that, or choose one of the options below?";

pub fn ask_email(name: &str) -> String {
    format!("Nice to meet you, {name}! 😊 What's the best email to reach you at?")
}

pub fn lead_collected(name: &str) -> String {
    format!(
        "Thank you, {name}! 🎉 Our team will be in touch with you shortly.\n\nIs there anything else I can help you with?"
    )
}
