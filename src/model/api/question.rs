use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::common::question::{Choice, ChoiceNumber, QuestionId};
use crate::model::db::question::Question;

/// A new or replacement question, received from an admin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSpec {
    /// The question itself.
    pub question_text: String,
    /// Texts of the possible answers, in display order. Must be non-empty.
    pub choices: Vec<String>,
    /// Publication datetime; defaults to now. A future datetime hides the
    /// question from the public API until then.
    #[serde(default)]
    pub pub_date: Option<DateTime<Utc>>,
}

impl QuestionSpec {
    /// Build the question this spec describes, under the given ID.
    /// Choices are numbered in display order from 1, with fresh tallies.
    pub fn into_question(self, id: QuestionId) -> Question {
        let choices = self
            .choices
            .into_iter()
            .zip(1..)
            .map(|(text, number)| Choice {
                number,
                text,
                votes: 0,
            })
            .collect();
        Question {
            id,
            question_text: self.question_text,
            pub_date: self.pub_date.unwrap_or_else(Utc::now),
            choices,
        }
    }
}

/// Just enough of a question for a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSummary {
    pub id: QuestionId,
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
}

impl From<Question> for QuestionSummary {
    fn from(question: Question) -> Self {
        Self {
            id: question.id,
            question_text: question.question_text,
            pub_date: question.pub_date,
        }
    }
}

/// A full question as shown to voters: its choices, but not their tallies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDescription {
    pub id: QuestionId,
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
    pub choices: Vec<ChoiceDescription>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceDescription {
    pub number: ChoiceNumber,
    pub text: String,
}

impl From<Question> for QuestionDescription {
    fn from(question: Question) -> Self {
        Self {
            id: question.id,
            question_text: question.question_text,
            pub_date: question.pub_date,
            choices: question
                .choices
                .into_iter()
                .map(|choice| ChoiceDescription {
                    number: choice.number,
                    text: choice.text,
                })
                .collect(),
        }
    }
}

/// A question with the current tally of every choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionResults {
    pub id: QuestionId,
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
    pub totals: Vec<ChoiceTotals>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceTotals {
    pub number: ChoiceNumber,
    pub text: String,
    pub votes: u64,
}

impl From<Question> for QuestionResults {
    fn from(question: Question) -> Self {
        Self {
            id: question.id,
            question_text: question.question_text,
            pub_date: question.pub_date,
            totals: question
                .choices
                .into_iter()
                .map(|choice| ChoiceTotals {
                    number: choice.number,
                    text: choice.text,
                    votes: choice.votes,
                })
                .collect(),
        }
    }
}

/// A vote the caller wishes to cast: a specific choice of a specific
/// question.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteSpec {
    pub choice: ChoiceNumber,
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl QuestionSpec {
        pub fn example() -> Self {
            Self {
                question_text: "What's your favourite language?".to_string(),
                choices: vec!["Rust".to_string(), "Python".to_string()],
                pub_date: None,
            }
        }

        pub fn example_future() -> Self {
            Self {
                question_text: "How was next year?".to_string(),
                choices: vec!["Good".to_string(), "Bad".to_string()],
                pub_date: Some(Utc::now() + chrono::Duration::days(365)),
            }
        }

        pub fn example_no_choices() -> Self {
            Self {
                question_text: "Rhetorical, surely?".to_string(),
                choices: vec![],
                pub_date: None,
            }
        }
    }
}
