//! Grounded prompt assembly for answer generation.

/// Returned verbatim when the retrieved context cannot answer the question.
pub const FALLBACK_ANSWER: &str = "Information not available in the provided data.";

/// Builds the system and user messages for a grounded answer.
///
/// Layout of the user message:
/// ```text
/// Glossary:
/// {glossary}
///
/// Retrieved transactions (top {k}):
/// {one projected transaction per line}
///
/// Original question: {query}
/// Rewritten for retrieval: {rewritten}
///
/// Return a concise answer in natural language.
/// ```
pub struct GroundedPrompt;

impl GroundedPrompt {
    pub fn system() -> String {
        format!(
            "You are a banking assistant. Answer ONLY using the provided transactions and glossary. \
             If the data is insufficient, say: '{FALLBACK_ANSWER}'"
        )
    }

    pub fn user(
        glossary: &str,
        documents: &[String],
        top_k: usize,
        query: &str,
        rewritten: &str,
    ) -> String {
        format!(
            "Glossary:\n{}\n\nRetrieved transactions (top {top_k}):\n{}\n\n\
             Original question: {query}\nRewritten for retrieval: {rewritten}\n\n\
             Return a concise answer in natural language.",
            glossary,
            documents.join("\n"),
        )
    }
}
