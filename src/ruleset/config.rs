//! Rule loading configuration.

/// What the loader does with a line that does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MalformedLinePolicy {
    /// Abort the whole load with an error naming the line
    #[default]
    Reject,
    /// Log the line at `warn` level and continue without it
    Skip,
}

impl MalformedLinePolicy {
    /// Parse a policy from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "reject" | "strict" => Some(MalformedLinePolicy::Reject),
            "skip" | "lenient" => Some(MalformedLinePolicy::Skip),
            _ => None,
        }
    }
}

/// Configuration for loading a rule store.
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// Handling of lines that do not match the rule grammar
    pub on_malformed: MalformedLinePolicy,
    /// Ignore lines whose first non-blank character is `#`
    pub skip_comments: bool,
    /// Ignore lines that are empty or whitespace only
    pub skip_blank_lines: bool,
}

impl LoadConfig {
    /// Every line must be a rule: no comments, no blank lines, no skipping.
    pub fn strict() -> Self {
        Self {
            on_malformed: MalformedLinePolicy::Reject,
            skip_comments: false,
            skip_blank_lines: false,
        }
    }

    /// Default line handling, but malformed lines are skipped.
    pub fn lenient() -> Self {
        Self {
            on_malformed: MalformedLinePolicy::Skip,
            ..Self::default()
        }
    }

    /// Whether a raw line should be ignored before parsing.
    pub(crate) fn ignores(&self, line: &str) -> bool {
        let trimmed = line.trim();
        (self.skip_blank_lines && trimmed.is_empty())
            || (self.skip_comments && trimmed.starts_with('#'))
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            on_malformed: MalformedLinePolicy::Reject,
            skip_comments: true,
            skip_blank_lines: true,
        }
    }
}
