//! Topic-relevance gating for the assistant

/// Pluggable predicate deciding whether a question is in scope.
///
/// The default is a keyword filter; swapping in a classifier touches nothing
/// else.
pub trait TopicGate {
    fn is_on_topic(&self, text: &str) -> bool;
}

/// Case-insensitive keyword match against a fixed vocabulary.
#[derive(Debug, Clone)]
pub struct KeywordGate {
    vocabulary: Vec<String>,
}

impl KeywordGate {
    pub fn new(vocabulary: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            vocabulary: vocabulary
                .into_iter()
                .map(|term| term.into().to_lowercase())
                .collect(),
        }
    }

    /// The battery-domain vocabulary used by the CLI assistant.
    pub fn battery_domain() -> Self {
        Self::new([
            "battery",
            "batteries",
            "cell",
            "soh",
            "soc",
            "state of health",
            "state of charge",
            "charge",
            "charging",
            "discharge",
            "voltage",
            "capacity",
            "degradation",
            "lifespan",
            "safety",
            "maintenance",
        ])
    }
}

impl Default for KeywordGate {
    fn default() -> Self {
        Self::battery_domain()
    }
}

impl TopicGate for KeywordGate {
    fn is_on_topic(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        self.vocabulary.iter().any(|term| lowered.contains(term))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_battery_questions_pass() {
        let gate = KeywordGate::battery_domain();
        assert!(gate.is_on_topic("How do I extend my battery lifespan?"));
        assert!(gate.is_on_topic("What does an SOH of 0.58 mean?"));
        assert!(gate.is_on_topic("Is fast CHARGING bad for the cell?"));
    }

    #[test]
    fn test_off_topic_rejected() {
        let gate = KeywordGate::battery_domain();
        assert!(!gate.is_on_topic("What's the weather in Oshawa?"));
        assert!(!gate.is_on_topic("Tell me a joke"));
    }

    #[test]
    fn test_custom_vocabulary() {
        let gate = KeywordGate::new(["thermal"]);
        assert!(gate.is_on_topic("thermal runaway"));
        assert!(!gate.is_on_topic("battery"));
    }
}
