use crate::wit_client::Classification;

/// Intent names the assistant knows how to act on.
const INTENT_HELP: &str = "get_help";
const INTENT_CHATROOMS: &str = "get_chatrooms";
const INTENT_MESSAGES: &str = "get_messages";

/// Fallbacks for utterances that produce no actionable intent.
///
/// `Unrecognized` means the classifier returned no intent at all;
/// `Unfamiliar` means it returned an intent nothing here is wired to handle.
/// The two get different replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback {
    Unrecognized,
    Unfamiliar,
}

/// What a classified utterance asks the assistant to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchAction {
    Help,
    ListChatrooms,
    ListMessages { chat_room: String, num_posts: u32 },
    Fallback(Fallback),
}

/// Maps a classification onto the action for this turn.
pub fn route(classification: &Classification) -> DispatchAction {
    let Some(intent) = classification.intent.as_deref() else {
        return DispatchAction::Fallback(Fallback::Unrecognized);
    };

    match intent {
        INTENT_HELP => DispatchAction::Help,
        INTENT_CHATROOMS => DispatchAction::ListChatrooms,
        INTENT_MESSAGES => {
            let num_posts = classification.first_entity_count("number").unwrap_or(1);
            let chat_room = classification
                .first_entity_text("chatroom_name")
                .unwrap_or_default();
            DispatchAction::ListMessages {
                chat_room,
                num_posts,
            }
        }
        _ => DispatchAction::Fallback(Fallback::Unfamiliar),
    }
}
