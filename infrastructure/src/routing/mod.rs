//! Rule-based routing brain
//!
//! Classifies requests by keyword scoring and pulls tool arguments out of the
//! request text with regular expressions. No model is involved, so routing is
//! deterministic and works offline.

/// Lazily compiled regex accessor.
///
/// Patterns are literals, so compilation cannot fail at runtime.
macro_rules! pattern {
    ($vis:vis $name:ident, $re:expr) => {
        $vis fn $name() -> &'static regex::Regex {
            static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
            RE.get_or_init(|| regex::Regex::new($re).unwrap())
        }
    };
}

mod cues;
mod intents;
pub mod rule_based;

pub use rule_based::RuleBasedBrain;
