mod common;

use common::ScriptedResponder;
use glacier_core::{
    chat::{GREETING, UNAVAILABLE_MESSAGE},
    ChatMessage, ChatOutcome, SupportChat, Transcript,
};

#[tokio::test(start_paused = true)]
async fn test_conversation_passes_growing_history() {
    let responder = ScriptedResponder::new(vec![
        Some("Use the webhook trigger."),
        None,
        Some("Retries back off exponentially."),
    ]);
    let chat = SupportChat::new(responder.clone());

    assert_eq!(
        chat.send("How do I start a flow from a form?").await,
        ChatOutcome::Replied("Use the webhook trigger.".to_string())
    );
    assert_eq!(
        chat.send("Can I import from Zapier?").await,
        ChatOutcome::Fallback(UNAVAILABLE_MESSAGE.to_string())
    );
    chat.send("How do retries work?").await;

    let histories = responder.histories();
    assert_eq!(histories.len(), 3);
    assert_eq!(histories[0], vec![ChatMessage::model(GREETING)]);
    assert_eq!(histories[1].len(), 3);
    // Fallback replies are part of the history sent afterwards.
    assert_eq!(histories[2][4], ChatMessage::model(UNAVAILABLE_MESSAGE));

    let transcript = Transcript(chat.transcript());
    assert_eq!(transcript.len(), 7);
    let rendered = transcript.to_string();
    assert!(rendered.starts_with(&format!("**Support:** {GREETING}")));
    assert!(rendered.contains("**You:** How do retries work?"));
}
