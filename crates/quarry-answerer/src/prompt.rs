//! Prompt for context-constrained answering

const RAG_INSTRUCTIONS: &str = r#"You are a highly intelligent assistant. Answer the user's question using ONLY the information provided in the context.
- Context may contain multiple documents; read all carefully.
- Provide concise, clear, and complete answers.
- Do NOT invent answers. If the answer is not in the context, reply: "I don't know."
- Return only the answer text. Do not repeat the question or context."#;

/// Builds the RAG prompt from a question and its context
pub struct RagPromptBuilder {
    query: String,
    context: String,
}

impl RagPromptBuilder {
    /// Create a new prompt builder
    pub fn new(query: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            context: context.into(),
        }
    }

    /// Build the complete prompt, ending in the `Answer:` cue
    pub fn build(&self) -> String {
        format!(
            "\n{}\n\nContext:\n{}\n\nQuestion:\n{}\nAnswer:\n",
            RAG_INSTRUCTIONS, self.context, self.query
        )
    }
}
