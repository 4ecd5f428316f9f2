use crate::llm::prompts;

/// Which instruction template a prompt is rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Describe a diff summary as a commit message.
    CommitMessage,
    /// Answer a free-form question given some context.
    Question,
}

impl PromptKind {
    fn template(self) -> &'static str {
        match self {
            PromptKind::CommitMessage => prompts::COMMIT_MESSAGE,
            PromptKind::Question => prompts::QUESTION,
        }
    }

    /// Substitute `input` into the template's single slot.
    pub fn render(self, input: &str) -> String {
        self.template().replacen(prompts::SLOT, input, 1)
    }
}

pub fn commit_message_prompt(summary: &str) -> String {
    PromptKind::CommitMessage.render(summary)
}

/// Build the question prompt from the question plus whatever context was gathered.
pub fn question_prompt(question: &str, context: &str) -> String {
    let mut input = format!("Question:\n{}\n", question.trim());
    if !context.trim().is_empty() {
        input.push_str("\nContext:\n");
        input.push_str(context.trim_end());
    }
    PromptKind::Question.render(input.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_have_one_slot() {
        for template in [prompts::COMMIT_MESSAGE, prompts::QUESTION] {
            assert_eq!(template.matches(prompts::SLOT).count(), 1);
        }
    }

    #[test]
    fn commit_prompt_embeds_summary() {
        let prompt = commit_message_prompt("main.go: +1/-0");
        assert!(prompt.contains("Changes:\nmain.go: +1/-0\n"));
        assert!(prompt.ends_with("NOTE: Return only the commit message."));
        assert!(!prompt.contains(prompts::SLOT));
    }

    #[test]
    fn slot_text_in_input_is_not_expanded() {
        let prompt = commit_message_prompt("weird {input} file: +1/-0");
        assert!(prompt.contains("weird {input} file: +1/-0"));
    }

    #[test]
    fn question_prompt_without_context() {
        let prompt = question_prompt("  what does main do?  ", "");
        assert!(prompt.contains("Question:\nwhat does main do?\n\nNOTE: Return only the answer."));
        assert!(!prompt.contains("Context:"));
    }

    #[test]
    fn question_prompt_with_context() {
        let prompt = question_prompt("why?", "[{\"filePath\":\"main.go\"}]\n");
        assert!(prompt.contains("Question:\nwhy?\n\nContext:\n[{\"filePath\":\"main.go\"}]\n\nNOTE"));
    }
}
