use crate::error::{RagError, RagResult};
use crate::models::{ChatMessage, RetrievalMatch};

/// Prepended to the retrieval blocks appended to the user's last message.
pub const RESULTS_HEADER: &str = "\n\nReturned results from vector db (done automatically): ";

const UNKNOWN: &str = "unknown";

pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are an AI assistant for a RateMyProfessor-like service. Your role is to help students find professors based on their queries using a RAG (Retrieval-Augmented Generation) system. For each user question, you will provide information on the top 3 most relevant professors.

Your knowledge base contains professor reviews, ratings, and course information. When a user asks a question, you should:

1. Interpret the user's query to understand their needs (e.g., subject area, teaching style, difficulty level).
2. Use the RAG system to retrieve information on the most relevant professors.
3. Present the top 3 professors that best match the query, including:
   - Professor's name
   - Subject area
   - Overall rating (out of 5 stars)
   - A brief summary of student feedback
   - Any standout characteristics or teaching methods

4. If applicable, provide a brief explanation of why these professors were selected.

5. Offer to provide more details or answer follow-up questions about any of the suggested professors.

Remember to be objective and base your recommendations on the available data. If a query is too vague or doesn't yield good matches, ask for clarification or additional information from the user.

Maintain a friendly and helpful tone, and aim to provide information that will assist students in making informed decisions about their course selections.

If asked about the specifics of the RAG system or the underlying data, explain that you don't have access to that information and can only provide results based on the queries.

Are you ready to help students find their ideal professors?
"#;

fn format_stars(stars: Option<f64>) -> String {
    // f64's Display already drops a trailing ".0"
    stars.map_or_else(|| UNKNOWN.to_string(), |s| s.to_string())
}

fn format_match(m: &RetrievalMatch) -> String {
    let stars = format_stars(m.metadata.stars);
    let subject = m.metadata.subject.as_deref().unwrap_or(UNKNOWN);

    // The Review line carries the star value as well.
    format!(
        "\nReturned Results:\nProfessor: {}\nReview: {}\nSubject: {}\nStars: {}\n\n\n",
        m.id, stars, subject, stars
    )
}

/// Renders the header followed by one block per match, in index order.
pub fn format_matches(matches: &[RetrievalMatch]) -> String {
    matches
        .iter()
        .fold(RESULTS_HEADER.to_string(), |mut acc, m| {
            acc.push_str(&format_match(m));
            acc
        })
}

pub fn augment_content(content: &str, matches: &[RetrievalMatch]) -> String {
    format!("{content}{}", format_matches(matches))
}

/// Builds the message list sent to the completion model:
/// the system prompt, every input message but the last unchanged, then the
/// last message's content with the retrieval text appended, sent as `user`.
pub fn build_conversation(
    system_prompt: &str,
    mut messages: Vec<ChatMessage>,
    matches: &[RetrievalMatch],
) -> RagResult<Vec<ChatMessage>> {
    let last = messages.pop().ok_or_else(|| {
        RagError::InvalidInput("conversation must contain at least one message".to_string())
    })?;

    let mut conversation = Vec::with_capacity(messages.len() + 2);
    conversation.push(ChatMessage::system(system_prompt));
    conversation.extend(messages);
    conversation.push(ChatMessage::user(augment_content(&last.content, matches)));

    Ok(conversation)
}
