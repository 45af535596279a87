use serde::{Deserialize, Serialize};

/// Unique question ID, allocated from the question ID counter.
pub type QuestionId = u32;

/// 1-based position of a choice within its question. Stable for the lifetime
/// of the choice list.
pub type ChoiceNumber = u32;

/// A single choice attached to a question, with its running tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub number: ChoiceNumber,
    pub text: String,
    pub votes: u64,
}
