/// Marks where the rendered input goes; every template contains it exactly once.
pub const SLOT: &str = "{input}";

pub const COMMIT_MESSAGE: &str = r#"You are an expert software engineer assisting with writing clear and concise git commit messages.
Given the following changes, provide a descriptive commit message in 50 words or less:

Changes:
{input}

NOTE: Return only the commit message."#;

pub const QUESTION: &str = r#"You are an expert software engineer answering questions about a codebase.
Use the context below, a condensed view of the source files and any pending changes,
to answer the question. If the context does not contain the answer, say so briefly.

{input}

NOTE: Return only the answer."#;
