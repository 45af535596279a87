use mongodb::{bson::doc, options::FindOptions};
use rocket::{futures::TryStreamExt, http::Status, serde::json::Json, Route};

use crate::{
    error::{Error, Result},
    model::{
        api::{
            pagination::{Paginated, PaginationRequest},
            question::{QuestionDescription, QuestionResults, QuestionSummary, VoteSpec},
        },
        common::question::QuestionId,
        db::question::Question,
        mongodb::{u32_id_filter, Coll},
    },
};

pub fn routes() -> Vec<Route> {
    routes![index, detail, results, vote]
}

/// Published questions, newest first.
#[get("/")]
pub async fn index(
    pagination: PaginationRequest,
    questions: Coll<Question>,
) -> Result<Json<Paginated<QuestionSummary>>> {
    let filter = Question::published_filter();
    let total = questions.count_documents(filter.clone(), None).await? as usize;

    let options = FindOptions::builder()
        .sort(doc! { "pub_date": -1, "_id": -1 })
        .skip(pagination.skip())
        .limit(pagination.page_size() as i64)
        .build();
    let page: Vec<Question> = questions.find(filter, options).await?.try_collect().await?;

    let summaries = page.into_iter().map(QuestionSummary::from).collect();
    Ok(Json(pagination.wrap(summaries, total)))
}

/// A single published question and its choices.
#[get("/<question_id>")]
pub async fn detail(
    question_id: QuestionId,
    questions: Coll<Question>,
) -> Result<Json<QuestionDescription>> {
    let question = published_question_by_id(question_id, &questions).await?;
    Ok(Json(question.into()))
}

/// Current tallies for a published question.
#[get("/<question_id>/results")]
pub async fn results(
    question_id: QuestionId,
    questions: Coll<Question>,
) -> Result<Json<QuestionResults>> {
    let question = published_question_by_id(question_id, &questions).await?;
    Ok(Json(question.into()))
}

/// Cast a vote for one choice of a published question.
///
/// Votes are anonymous and repeat voting is permitted; there is nothing to
/// track a voter by.
#[post("/<question_id>/vote", data = "<vote>", format = "json")]
pub async fn vote(
    question_id: QuestionId,
    vote: Json<VoteSpec>,
    questions: Coll<Question>,
) -> Result<Json<QuestionResults>> {
    let question = published_question_by_id(question_id, &questions).await?;
    if question.choice(vote.choice).is_none() {
        return Err(Error::Status(
            Status::NotFound,
            format!(
                "Choice '{}' not found for question '{}'",
                vote.choice, question_id
            ),
        ));
    }

    // Bump the tally atomically so concurrent votes cannot lose updates.
    let filter = doc! {
        "_id": question_id,
        "choices.number": vote.choice,
    };
    let update = doc! {
        "$inc": { "choices.$.votes": 1 }
    };
    questions.update_one(filter, update, None).await?;

    // Re-read for the updated totals.
    let question = published_question_by_id(question_id, &questions).await?;
    Ok(Json(question.into()))
}

/// Look up a question, treating unpublished ones as missing.
async fn published_question_by_id(
    question_id: QuestionId,
    questions: &Coll<Question>,
) -> Result<Question> {
    questions
        .find_one(u32_id_filter(question_id), None)
        .await?
        .filter(|question| question.is_published())
        .ok_or_else(|| Error::not_found(format!("Question with ID '{question_id}'")))
}

#[cfg(test)]
mod tests {
    use rocket::{http::ContentType, local::asynchronous::Client, serde::json::serde_json::json};

    use super::*;

    #[backend_test]
    async fn index_lists_published_newest_first(client: Client, questions: Coll<Question>) {
        questions
            .insert_one(Question::example1(), None)
            .await
            .unwrap();
        questions
            .insert_one(Question::example2(), None)
            .await
            .unwrap();
        questions
            .insert_one(Question::example_future(), None)
            .await
            .unwrap();

        let response = client.get(uri!("/polls", index)).dispatch().await;

        assert_eq!(Status::Ok, response.status());
        let page: Paginated<QuestionSummary> = response.into_json().await.unwrap();
        assert_eq!(2, page.total);
        let ids: Vec<_> = page.items.iter().map(|summary| summary.id).collect();
        assert_eq!(
            vec![Question::example1().id, Question::example2().id],
            ids
        );
    }

    #[backend_test]
    async fn index_paginates(client: Client, questions: Coll<Question>) {
        questions
            .insert_one(Question::example1(), None)
            .await
            .unwrap();
        questions
            .insert_one(Question::example2(), None)
            .await
            .unwrap();

        let response = client.get("/polls?page_num=2&page_size=1").dispatch().await;

        assert_eq!(Status::Ok, response.status());
        let page: Paginated<QuestionSummary> = response.into_json().await.unwrap();
        assert_eq!(2, page.total);
        assert_eq!(1, page.items.len());
        assert_eq!(Question::example2().id, page.items[0].id);
    }

    #[backend_test]
    async fn detail_describes_choices(client: Client, questions: Coll<Question>) {
        let question = Question::example1();
        questions.insert_one(&question, None).await.unwrap();

        let response = client
            .get(uri!("/polls", detail(question.id)))
            .dispatch()
            .await;

        assert_eq!(Status::Ok, response.status());
        let description: QuestionDescription = response.into_json().await.unwrap();
        assert_eq!(question.id, description.id);
        assert_eq!(question.question_text, description.question_text);
        let texts: Vec<_> = description
            .choices
            .iter()
            .map(|choice| choice.text.as_str())
            .collect();
        assert_eq!(vec!["Not much", "The sky", "Just hacking again"], texts);
        let numbers: Vec<_> = description
            .choices
            .iter()
            .map(|choice| choice.number)
            .collect();
        assert_eq!(vec![1, 2, 3], numbers);
    }

    #[backend_test]
    async fn detail_hides_unpublished(client: Client, questions: Coll<Question>) {
        let question = Question::example_future();
        questions.insert_one(&question, None).await.unwrap();

        let response = client
            .get(uri!("/polls", detail(question.id)))
            .dispatch()
            .await;

        assert_eq!(Status::NotFound, response.status());
    }

    #[backend_test]
    async fn detail_unknown_question(client: Client) {
        let response = client.get(uri!("/polls", detail(99))).dispatch().await;

        assert_eq!(Status::NotFound, response.status());
    }

    #[backend_test]
    async fn results_report_tallies(client: Client, questions: Coll<Question>) {
        let question = Question::example2();
        questions.insert_one(&question, None).await.unwrap();

        let response = client
            .get(uri!("/polls", results(question.id)))
            .dispatch()
            .await;

        assert_eq!(Status::Ok, response.status());
        let results: QuestionResults = response.into_json().await.unwrap();
        let tallies: Vec<_> = results
            .totals
            .iter()
            .map(|total| (total.text.as_str(), total.votes))
            .collect();
        assert_eq!(vec![("Yes", 3), ("No", 1)], tallies);
    }

    #[backend_test]
    async fn vote_increments_tally(client: Client, questions: Coll<Question>) {
        let question = Question::example1();
        questions.insert_one(&question, None).await.unwrap();

        // First vote.
        let response = client
            .post(uri!("/polls", vote(question.id)))
            .header(ContentType::JSON)
            .body(json!(VoteSpec { choice: 2 }).to_string())
            .dispatch()
            .await;

        assert_eq!(Status::Ok, response.status());
        let results: QuestionResults = response.into_json().await.unwrap();
        assert_eq!(1, results.totals[1].votes);

        // Repeat voting is permitted.
        let response = client
            .post(uri!("/polls", vote(question.id)))
            .header(ContentType::JSON)
            .body(json!(VoteSpec { choice: 2 }).to_string())
            .dispatch()
            .await;

        assert_eq!(Status::Ok, response.status());
        let results: QuestionResults = response.into_json().await.unwrap();
        assert_eq!(2, results.totals[1].votes);

        // The other tallies are untouched.
        assert_eq!(0, results.totals[0].votes);
        assert_eq!(0, results.totals[2].votes);

        // Check the increments landed in the database.
        let stored = questions
            .find_one(u32_id_filter(question.id), None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(2, stored.choice(2).unwrap().votes);
    }

    #[backend_test]
    async fn vote_unknown_choice(client: Client, questions: Coll<Question>) {
        let question = Question::example1();
        questions.insert_one(&question, None).await.unwrap();

        let response = client
            .post(uri!("/polls", vote(question.id)))
            .header(ContentType::JSON)
            .body(json!(VoteSpec { choice: 9 }).to_string())
            .dispatch()
            .await;

        assert_eq!(Status::NotFound, response.status());

        // No tally was touched.
        let stored = questions
            .find_one(u32_id_filter(question.id), None)
            .await
            .unwrap()
            .unwrap();
        assert!(stored.choices.iter().all(|choice| choice.votes == 0));
    }

    #[backend_test]
    async fn vote_unpublished_question(client: Client, questions: Coll<Question>) {
        let question = Question::example_future();
        questions.insert_one(&question, None).await.unwrap();

        let response = client
            .post(uri!("/polls", vote(question.id)))
            .header(ContentType::JSON)
            .body(json!(VoteSpec { choice: 1 }).to_string())
            .dispatch()
            .await;

        assert_eq!(Status::NotFound, response.status());
    }

    /// Question paths only resolve under the `/polls` mount.
    #[backend_test]
    async fn mount_prefix_required(client: Client, questions: Coll<Question>) {
        let question = Question::example1();
        questions.insert_one(&question, None).await.unwrap();

        let response = client.get(uri!("/polls", detail(question.id))).dispatch().await;
        assert_eq!(Status::Ok, response.status());

        let response = client.get(format!("/{}", question.id)).dispatch().await;
        assert_eq!(Status::NotFound, response.status());
    }
}
