use std::fmt;

/// Suggest the version that follows `current`.
///
/// A version with exactly three dot-separated parts gets its last part
/// incremented (`0.1.0` -> `0.1.1`). Anything else, including a three-part
/// version whose last part is not a plain integer, gets `.1` appended
/// (`1.2` -> `1.2.1`, `1.0.rc1` -> `1.0.rc1.1`).
pub fn propose_next(current: &str) -> String {
    let parts: Vec<&str> = current.split('.').collect();
    if parts.len() == 3 {
        if let Some(patch) = parts[2]
            .parse::<u64>()
            .ok()
            .and_then(|p| p.checked_add(1))
        {
            return format!("{}.{}.{}", parts[0], parts[1], patch);
        }
    }

    format!("{}.1", current)
}

/// Versions involved in a single synchronization run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionProposal {
    /// Version read from the config document
    pub current: String,
    /// Version offered when the operator gives no input
    pub suggested: String,
    /// Version the operator settled on
    pub chosen: String,
}

impl VersionProposal {
    /// Start a proposal for `current`; the suggestion is chosen until the operator says otherwise
    pub fn new(current: impl Into<String>) -> Self {
        let current = current.into();
        let suggested = propose_next(&current);
        VersionProposal {
            chosen: suggested.clone(),
            current,
            suggested,
        }
    }

    /// Apply one line of operator input: blank keeps the suggestion, anything else is taken verbatim
    pub fn choose(&mut self, input: &str) {
        let input = input.trim();
        self.chosen = if input.is_empty() {
            self.suggested.clone()
        } else {
            input.to_string()
        };
    }

    pub fn is_change(&self) -> bool {
        self.chosen != self.current
    }
}

impl fmt::Display for VersionProposal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.current, self.chosen)
    }
}
