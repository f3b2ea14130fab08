//! Completion prompt assembly.
//!
//! Merges the assistant persona, the user's question, and the reranked
//! chunks into a single prompt string. Pure function: no I/O, no state.

/// Build the completion prompt from the persona text, the literal user
/// query, and the ranked chunks.
///
/// Chunks appear under a `Relevant Chunks:` heading, joined by blank lines,
/// in exactly the order received from the reranker. The closing instruction
/// tells the model to answer only from the provided content, with a fallback
/// clause allowing outside knowledge when the chunks are empty or unrelated
/// (the model judges that condition, not this code).
pub fn build_prompt(system_prompt: &str, query: &str, chunks: &[String]) -> String {
    format!(
        "{system_prompt}\n\n\
         Please generate an accurate answer based on the user's question \
         (travel form) and the following chunks.\n\n\
         User Question: {query}\n\n\
         Relevant Chunks:\n{}\n\n\
         If the chunks are empty or not related to the question, you may \
         search your own knowledge and generate an answer. Otherwise answer \
         strictly based on the above content. Do not fabricate information.",
        chunks.join("\n\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_persona_and_literal_query() {
        let prompt = build_prompt("You are a travel planner.", "trip to Kyoto?", &[]);
        assert!(prompt.starts_with("You are a travel planner."));
        assert!(prompt.contains("User Question: trip to Kyoto?"));
    }

    #[test]
    fn preserves_chunk_order() {
        let chunks = vec!["zeta".to_string(), "alpha".to_string()];
        let prompt = build_prompt("persona", "q", &chunks);
        let zeta = prompt.find("zeta").unwrap();
        let alpha = prompt.find("alpha").unwrap();
        assert!(zeta < alpha);
        assert!(prompt.contains("zeta\n\nalpha"));
    }

    #[test]
    fn empty_chunks_still_produce_fallback_clause() {
        let prompt = build_prompt("persona", "q", &[]);
        assert!(prompt.contains("Relevant Chunks:"));
        assert!(prompt.contains("If the chunks are empty"));
    }
}
