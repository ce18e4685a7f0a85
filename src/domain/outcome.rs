//! Loop run outcome types.
//!
//! `RalphLoopResult` is the terminal summary handed to the caller, who owns
//! persistence and presentation from there on.

use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::idea::{DopeLevel, Idea};
use super::iteration::IdeaIteration;

/// Terminal summary of one Ralph Loop run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RalphLoopResult {
    /// Threshold reached before the iteration budget ran out
    pub success: bool,
    pub idea: Idea,
    pub iterations: Vec<IdeaIteration>,
    pub final_dope_level: DopeLevel,
    /// Passes taken, including the initial generation
    pub total_iterations: u32,
}

/// Headline shown to a human after a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub title: String,
    pub message: String,
    pub quote: String,
}

/// Which quote pool to draw from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    Thinking,
    Excited,
    Meh,
    Dope,
}

const THINKING_QUOTES: &[&str] = &[
    "My brain is having a thought!",
    "I'm using my thinking cap!",
    "The leprechaun tells me ideas!",
    "It tastes like burning... but in a good way!",
    "My cat's breath smells like cat food and also innovation!",
];

const EXCITED_QUOTES: &[&str] = &[
    "This idea tastes like purple!",
    "I'm helping with business!",
    "Me fail English? That's unpossible! But this idea is possible!",
    "I bent my wookie... into a startup!",
    "Yay, I'm a entrepreneur!",
];

const MEH_QUOTES: &[&str] = &[
    "This idea makes my eyes rain.",
    "My doctor said I'm not allowed to make that idea.",
    "That's not as fun as paste.",
    "Even my invisible friend thinks this is boring.",
    "The voices say to try again.",
];

const DOPE_QUOTES: &[&str] = &[
    "When I grow up I want to be a principal... or this startup!",
    "This idea is super Nintendo!",
    "I'm learnding... to be rich!",
    "My worm went in my mouth and then I ate it. But this idea is even better!",
    "That's my sandbox! And it has gold stars!",
];

impl Mood {
    /// All quotes for this mood
    pub fn quotes(self) -> &'static [&'static str] {
        match self {
            Mood::Thinking => THINKING_QUOTES,
            Mood::Excited => EXCITED_QUOTES,
            Mood::Meh => MEH_QUOTES,
            Mood::Dope => DOPE_QUOTES,
        }
    }

    /// A random quote for this mood
    pub fn random_quote(self) -> &'static str {
        self.quotes().choose(&mut rand::rng()).copied().unwrap_or_default()
    }
}

impl RalphLoopResult {
    /// Pick the headline for this result
    pub fn status_message(&self) -> StatusMessage {
        let level = self.final_dope_level;
        let total = self.total_iterations;

        if self.success {
            return StatusMessage {
                title: "Gold Star Achievement!".to_string(),
                message: format!("Your idea achieved dope level {} in {} iterations!", level, total),
                quote: Mood::Dope.random_quote().to_string(),
            };
        }

        if level >= DopeLevel::new(3) {
            return StatusMessage {
                title: "Almost There!".to_string(),
                message: format!("Dope level {} after {} iterations. Keep refining!", level, total),
                quote: Mood::Thinking.random_quote().to_string(),
            };
        }

        StatusMessage {
            title: "Back to the Sandbox".to_string(),
            message: format!("Dope level {}. This idea needs more work.", level),
            quote: Mood::Meh.random_quote().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(success: bool, level: u8, total: u32) -> RalphLoopResult {
        let mut idea = Idea::new("Test", "idea", 3, 5);
        idea.dope_level = DopeLevel::new(level);
        RalphLoopResult {
            success,
            idea,
            iterations: Vec::new(),
            final_dope_level: DopeLevel::new(level),
            total_iterations: total,
        }
    }

    #[test]
    fn test_status_message_success() {
        let msg = result(true, 5, 3).status_message();
        assert_eq!(msg.title, "Gold Star Achievement!");
        assert_eq!(msg.message, "Your idea achieved dope level 5 in 3 iterations!");
        assert!(Mood::Dope.quotes().contains(&msg.quote.as_str()));
    }

    #[test]
    fn test_status_message_almost() {
        let msg = result(false, 3, 4).status_message();
        assert_eq!(msg.title, "Almost There!");
        assert!(msg.message.contains("after 4 iterations"));
        assert!(Mood::Thinking.quotes().contains(&msg.quote.as_str()));
    }

    #[test]
    fn test_status_message_sandbox() {
        let msg = result(false, 1, 2).status_message();
        assert_eq!(msg.title, "Back to the Sandbox");
        assert_eq!(msg.message, "Dope level 1. This idea needs more work.");
        assert!(Mood::Meh.quotes().contains(&msg.quote.as_str()));
    }

    #[test]
    fn test_every_mood_has_quotes() {
        for mood in [Mood::Thinking, Mood::Excited, Mood::Meh, Mood::Dope] {
            assert_eq!(mood.quotes().len(), 5);
            assert!(!mood.random_quote().is_empty());
        }
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let json = serde_json::to_value(result(true, 4, 2)).unwrap();
        assert_eq!(json["finalDopeLevel"], 4);
        assert_eq!(json["totalIterations"], 2);
        assert_eq!(json["success"], true);
    }
}
