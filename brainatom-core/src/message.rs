use crate::{Episode, Message};

/// Lays out the turns sent to the provider.
///
/// The system directive (if any) comes first, then every prior exchange as a
/// user/assistant pair in order, then the new prompt. The whole prior episode is
/// replayed; nothing is dropped or reordered.
pub fn compose_messages(
    system: Option<&str>,
    prior: Option<&Episode>,
    prompt: &str,
) -> Vec<Message> {
    let replayed = prior.map_or(0, |episode| episode.exchanges.len() * 2);
    let mut messages = Vec::with_capacity(replayed + 2);

    if let Some(system) = system {
        messages.push(Message::system(system));
    }
    if let Some(episode) = prior {
        for exchange in &episode.exchanges {
            messages.push(Message::user(exchange.input.as_str()));
            messages.push(Message::assistant(exchange.output.as_str()));
        }
    }
    messages.push(Message::user(prompt));

    messages
}
