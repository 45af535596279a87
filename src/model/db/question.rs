use chrono::{DateTime, Utc};
use mongodb::bson::{self, doc, serde_helpers::chrono_datetime_as_bson_datetime, Document};
use serde::{Deserialize, Serialize};

use crate::model::common::question::{Choice, ChoiceNumber, QuestionId};

/// A poll question, as stored in the database.
///
/// Choices are embedded in the question document; they have no life of their
/// own outside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Unique ID, allocated from the question ID counter.
    #[serde(rename = "_id")]
    pub id: QuestionId,
    /// The question itself.
    pub question_text: String,
    /// When the question was (or will be) published. Questions dated in the
    /// future are only visible to admins.
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub pub_date: DateTime<Utc>,
    /// The possible answers, in display order.
    pub choices: Vec<Choice>,
}

impl Question {
    /// Is this question visible to the public API yet?
    pub fn is_published(&self) -> bool {
        self.pub_date <= Utc::now()
    }

    /// Look up a choice by its number.
    pub fn choice(&self, number: ChoiceNumber) -> Option<&Choice> {
        self.choices.iter().find(|choice| choice.number == number)
    }

    /// Filter matching every published question.
    pub fn published_filter() -> Document {
        doc! {
            "pub_date": { "$lte": bson::DateTime::from_chrono(Utc::now()) },
        }
    }
}
