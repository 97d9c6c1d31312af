//! Prompt assembly from conversation history.

use crate::models::{ChatMessage, ConversationTurn};

/// Fixed system message opening every prompt.
pub const SYSTEM_PROMPT: &str = "You are an assistant who answers questions about the world.";

/// Build the message list for a completion request: the system message, then
/// each prior turn as a user/assistant pair in chronological order, then the
/// new question last. Deterministic for identical inputs.
pub fn build_messages(history: &[ConversationTurn], next_question: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(2 * history.len() + 2);
    messages.push(ChatMessage::system(SYSTEM_PROMPT));
    for turn in history {
        messages.push(ChatMessage::user(&turn.question));
        messages.push(ChatMessage::assistant(&turn.answer));
    }
    messages.push(ChatMessage::user(next_question));
    messages
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::ChatRole;

    fn turn(question: &str, answer: &str, minute: u32) -> ConversationTurn {
        ConversationTurn {
            user_key: "u1".into(),
            date_time: NaiveDate::from_ymd_opt(2026, 8, 5)
                .unwrap()
                .and_hms_micro_opt(10, minute, 0, 0)
                .unwrap(),
            question: question.into(),
            answer: answer.into(),
        }
    }

    #[test]
    fn empty_history_yields_system_plus_question() {
        let messages = build_messages(&[], "hello");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, ChatRole::System);
        assert_eq!(messages[0].content, SYSTEM_PROMPT);
        assert_eq!(messages[1].role, ChatRole::User);
        assert_eq!(messages[1].content, "hello");
    }

    #[test]
    fn message_count_is_one_plus_two_per_turn_plus_one() {
        let history = vec![turn("q1", "a1", 0), turn("q2", "a2", 1), turn("q3", "a3", 2)];
        let messages = build_messages(&history, "q4");
        assert_eq!(messages.len(), 1 + 2 * history.len() + 1);
    }

    #[test]
    fn roles_alternate_in_fixed_order() {
        let history = vec![turn("q1", "a1", 0), turn("q2", "a2", 1)];
        let messages = build_messages(&history, "q3");

        let roles: Vec<ChatRole> = messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                ChatRole::System,
                ChatRole::User,
                ChatRole::Assistant,
                ChatRole::User,
                ChatRole::Assistant,
                ChatRole::User,
            ]
        );
    }

    #[test]
    fn history_content_maps_to_user_and_assistant() {
        let history = vec![turn("what is rust?", "a language", 0)];
        let messages = build_messages(&history, "tell me more");

        assert_eq!(messages[1].content, "what is rust?");
        assert_eq!(messages[2].content, "a language");
        assert_eq!(messages.last().unwrap().content, "tell me more");
    }

    #[test]
    fn builder_is_deterministic() {
        let history = vec![turn("q1", "a1", 0)];
        assert_eq!(
            build_messages(&history, "q2"),
            build_messages(&history, "q2")
        );
    }
}
