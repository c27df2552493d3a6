// src/modules/chat/offline.rs
//! Scripted Task Master used when the hosted model is unavailable. Same input
//! and same code always give the same reply.

use super::QuestContext;

const GENERIC_REPLIES: &[&str] = &[
    "Sounds good!",
    "Okay, hurry up please!",
    "Cool, see you soon.",
    "Perfect.",
    "Thanks for helping out!",
];

pub fn offline_reply(text: &str, ctx: &QuestContext) -> String {
    let lower = text.to_lowercase();
    let mentions = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if mentions(&["otp", "code"]) {
        if mentions(&["done", "finish", "complete"]) {
            return format!("Awesome! Here is the OTP: {}. Thanks a ton!", ctx.otp);
        }
        return "I can't give the OTP yet. Please finish the task first!".to_string();
    }

    if mentions(&["done", "finished", "completed"]) {
        return format!("Great job! verify it using this OTP: {}", ctx.otp);
    }

    if mentions(&["where", "location"]) {
        return format!(
            "I'm at {}. Look for the guy in the black hoodie.",
            ctx.location.as_deref().unwrap_or("Campus Center")
        );
    }

    if mentions(&["money", "cash", "pay"]) {
        return format!(
            "The ₹{} is already in escrow. You'll get it instantly after OTP verification.",
            ctx.reward
        );
    }

    GENERIC_REPLIES[stable_index(&lower, GENERIC_REPLIES.len())].to_string()
}

fn stable_index(text: &str, len: usize) -> usize {
    let sum = text
        .bytes()
        .fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
    sum % len
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::chat::tests::context;

    #[test]
    fn test_code_withheld_until_done() {
        let ctx = context();
        assert_eq!(
            offline_reply("can I get the OTP?", &ctx),
            "I can't give the OTP yet. Please finish the task first!"
        );
        assert_eq!(
            offline_reply("Finished! what's the code", &ctx),
            "Awesome! Here is the OTP: 4821. Thanks a ton!"
        );
        assert_eq!(
            offline_reply("all done", &ctx),
            "Great job! verify it using this OTP: 4821"
        );
    }

    #[test]
    fn test_location_and_money() {
        let ctx = context();
        assert!(offline_reply("Where are you?", &ctx).starts_with("I'm at Library."));
        assert!(offline_reply("how will you pay me", &ctx).contains("₹100 is already in escrow"));
    }

    #[test]
    fn test_generic_reply_is_deterministic() {
        let ctx = context();
        let first = offline_reply("on my way", &ctx);
        assert!(GENERIC_REPLIES.contains(&first.as_str()));
        for _ in 0..10 {
            assert_eq!(offline_reply("on my way", &ctx), first);
        }
    }

    #[test]
    fn test_code_rule_beats_location_rule() {
        let ctx = context();
        assert_eq!(
            offline_reply("where do I enter the code", &ctx),
            "I can't give the OTP yet. Please finish the task first!"
        );
    }
}
