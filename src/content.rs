//! Static content tables: quiz bank, reward catalog and stage names
//!
//! Read-only to the game. The bundled set lives in `assets/content.json`;
//! hosts may supply their own through [`Content::from_json`].

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::COLLECTION_GOAL;

/// Reward rarity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    N,
    R,
    SR,
    SSR,
}

impl Rarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::N => "N",
            Rarity::R => "R",
            Rarity::SR => "SR",
            Rarity::SSR => "SSR",
        }
    }
}

/// A multiple-choice question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub question: String,
    pub choices: Vec<String>,
    /// Index into `choices` of the correct answer
    pub answer: usize,
}

/// A collectible reward from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardItem {
    pub id: u32,
    pub name: String,
    pub icon: String,
    pub rarity: Rarity,
    pub description: String,
}

/// Why a content table was rejected
#[derive(Debug)]
pub enum ContentError {
    Parse(serde_json::Error),
    EmptyQuizBank,
    EmptyCatalog,
    AnswerOutOfRange { quiz: usize, answer: usize, choices: usize },
    DuplicateReward(u32),
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentError::Parse(e) => write!(f, "content JSON is malformed: {e}"),
            ContentError::EmptyQuizBank => write!(f, "quiz bank is empty"),
            ContentError::EmptyCatalog => write!(f, "reward catalog is empty"),
            ContentError::AnswerOutOfRange {
                quiz,
                answer,
                choices,
            } => write!(
                f,
                "quiz {quiz} marks answer {answer} but only has {choices} choices"
            ),
            ContentError::DuplicateReward(id) => write!(f, "reward id {id} appears twice"),
        }
    }
}

impl std::error::Error for ContentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContentError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ContentError {
    fn from(e: serde_json::Error) -> Self {
        ContentError::Parse(e)
    }
}

/// All tables the game reads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub quizzes: Vec<Quiz>,
    pub rewards: Vec<RewardItem>,
    #[serde(default)]
    pub stages: Vec<String>,
}

const BUILTIN_JSON: &str = include_str!("../assets/content.json");

impl Content {
    /// The tables shipped with the game
    pub fn builtin() -> Result<Self, ContentError> {
        Self::from_json(BUILTIN_JSON)
    }

    /// Parse and validate a content document
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let content: Content = serde_json::from_str(json)?;
        content.validate()?;
        Ok(content)
    }

    fn validate(&self) -> Result<(), ContentError> {
        if self.quizzes.is_empty() {
            return Err(ContentError::EmptyQuizBank);
        }
        if self.rewards.is_empty() {
            return Err(ContentError::EmptyCatalog);
        }
        for (i, quiz) in self.quizzes.iter().enumerate() {
            if quiz.answer >= quiz.choices.len() {
                return Err(ContentError::AnswerOutOfRange {
                    quiz: i,
                    answer: quiz.answer,
                    choices: quiz.choices.len(),
                });
            }
        }
        let mut seen = HashSet::new();
        for item in &self.rewards {
            if !seen.insert(item.id) {
                return Err(ContentError::DuplicateReward(item.id));
            }
        }
        Ok(())
    }

    pub fn quiz(&self, index: usize) -> Option<&Quiz> {
        self.quizzes.get(index)
    }

    pub fn reward(&self, id: u32) -> Option<&RewardItem> {
        self.rewards.iter().find(|r| r.id == id)
    }

    /// Stage names cycle once every theme has been visited
    pub fn stage_name(&self, stage: u32) -> &str {
        if self.stages.is_empty() {
            return "";
        }
        &self.stages[stage as usize % self.stages.len()]
    }

    /// Unique rewards needed for the ending; never more than the catalog holds
    pub fn collection_goal(&self) -> usize {
        COLLECTION_GOAL.min(self.rewards.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_are_valid() {
        let content = Content::builtin().expect("bundled content parses");
        assert_eq!(content.rewards.len(), COLLECTION_GOAL);
        assert_eq!(content.collection_goal(), COLLECTION_GOAL);
        assert!(!content.quizzes.is_empty());
        assert_eq!(content.stages.len(), 5);
    }

    #[test]
    fn test_stage_names_cycle() {
        let content = Content::builtin().unwrap();
        assert_eq!(content.stage_name(0), content.stage_name(5));
        assert_ne!(content.stage_name(0), content.stage_name(1));
    }

    #[test]
    fn test_rejects_bad_answer_index() {
        let json = r#"{
            "quizzes": [{"question": "?", "choices": ["a", "b"], "answer": 2}],
            "rewards": [{"id": 1, "name": "x", "icon": "x", "rarity": "N", "description": ""}]
        }"#;
        assert!(matches!(
            Content::from_json(json),
            Err(ContentError::AnswerOutOfRange { answer: 2, choices: 2, .. })
        ));
    }

    #[test]
    fn test_rejects_duplicate_reward_ids() {
        let json = r#"{
            "quizzes": [{"question": "?", "choices": ["a"], "answer": 0}],
            "rewards": [
                {"id": 7, "name": "x", "icon": "x", "rarity": "SR", "description": ""},
                {"id": 7, "name": "y", "icon": "y", "rarity": "SSR", "description": ""}
            ]
        }"#;
        assert!(matches!(
            Content::from_json(json),
            Err(ContentError::DuplicateReward(7))
        ));
    }

    #[test]
    fn test_rejects_empty_tables_and_bad_json() {
        assert!(matches!(
            Content::from_json(r#"{"quizzes": [], "rewards": []}"#),
            Err(ContentError::EmptyQuizBank)
        ));
        assert!(matches!(
            Content::from_json("not json"),
            Err(ContentError::Parse(_))
        ));
    }

    #[test]
    fn test_small_catalog_lowers_goal() {
        let json = r#"{
            "quizzes": [{"question": "?", "choices": ["a"], "answer": 0}],
            "rewards": [{"id": 1, "name": "x", "icon": "x", "rarity": "R", "description": ""}]
        }"#;
        let content = Content::from_json(json).unwrap();
        assert_eq!(content.collection_goal(), 1);
        assert_eq!(content.stage_name(3), "");
    }
}
