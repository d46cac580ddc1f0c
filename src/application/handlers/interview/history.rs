//! Conversation history for the model transport.

use crate::domain::interview::{Sender, Turn};
use crate::ports::Message;

/// Reduces newest-first turns to chronological model messages.
///
/// Only the `window` most recent turns are kept. `USER` turns become
/// `user` messages and model turns become `assistant` messages.
pub fn build_history(turns_newest_first: &[Turn], window: usize) -> Vec<Message> {
    turns_newest_first
        .iter()
        .take(window)
        .rev()
        .map(|turn| match turn.sender {
            Sender::User => Message::user(&turn.content),
            Sender::Model => Message::assistant(&turn.content),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ConversationId, Timestamp, TurnId};
    use crate::ports::MessageRole;

    fn turn(id: i64, sender: Sender, content: &str) -> Turn {
        Turn {
            id: TurnId::from_raw(id),
            conversation_id: ConversationId::from_raw(1),
            sender,
            content: content.to_string(),
            created_at: Timestamp::now(),
        }
    }

    fn newest_first() -> Vec<Turn> {
        vec![
            turn(4, Sender::User, "Junior"),
            turn(3, Sender::Model, "¿Qué nivel?"),
            turn(2, Sender::User, "empezar"),
            turn(1, Sender::Model, "Hola, soy Evalio"),
        ]
    }

    #[test]
    fn restores_chronological_order_and_maps_roles() {
        let history = build_history(&newest_first(), 50);

        let contents: Vec<&str> = history.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["Hola, soy Evalio", "empezar", "¿Qué nivel?", "Junior"]);
        assert_eq!(history[0].role, MessageRole::Assistant);
        assert_eq!(history[1].role, MessageRole::User);
    }

    #[test]
    fn window_keeps_most_recent_turns() {
        let history = build_history(&newest_first(), 2);

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content, "¿Qué nivel?");
        assert_eq!(history[1].content, "Junior");
    }

    #[test]
    fn empty_input_yields_empty_history() {
        assert!(build_history(&[], 50).is_empty());
        assert!(build_history(&newest_first(), 0).is_empty());
    }

    #[test]
    fn content_is_passed_through_untouched() {
        let turns = vec![turn(1, Sender::User, "  espacios  \n")];
        assert_eq!(build_history(&turns, 10)[0].content, "  espacios  \n");
    }
}
