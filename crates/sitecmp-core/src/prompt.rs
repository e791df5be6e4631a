//! Role and task texts for the two pipeline steps.

/// Topic used when the config does not set one.
pub const DEFAULT_FOCUS: &str = "long-term memory frameworks for LLM agents";

/// Who performs a step and what it is after.
#[derive(Debug, Clone, Copy)]
pub struct Role {
    pub name: &'static str,
    pub goal: &'static str,
    pub backstory: &'static str,
}

pub const URL_EXTRACTOR: Role = Role {
    name: "URL Extractor",
    goal: "Extract a list of URLs from the source file.",
    backstory: "You specialize in file parsing and returning clean data for downstream agents.",
};

pub const CONTENT_ANALYST: Role = Role {
    name: "Content Analyst",
    goal: "Compare the content of multiple websites based on the provided URLs and write a comprehensive comparison.",
    backstory: "You are a highly skilled content analyst with years of experience in identifying similarities and differences between online resources.",
};

pub const EXTRACT_EXPECTED_OUTPUT: &str = "A list of URLs extracted from the file.";
pub const COMPARE_EXPECTED_OUTPUT: &str =
    "A detailed comparison of the content from the extracted URLs.";

impl Role {
    /// System message for a chat model acting in this role.
    pub fn system_prompt(&self) -> String {
        format!(
            "You are the {}. {}\nYour goal: {}",
            self.name, self.backstory, self.goal
        )
    }
}

/// Description of the URL extraction step for `file_name`.
pub fn extract_task(file_name: &str) -> String {
    format!("Read the file '{file_name}' and return a list of URLs contained inside.")
}

/// Description of the comparison step.
pub fn compare_task(focus: &str) -> String {
    format!(
        "Receive a list of URLs extracted from the previous task. The content of each URL is provided below.\n\
         Compare these websites, focusing on {focus}.\n\
         Write a detailed comparison report."
    )
}
