use mongodb::{
    bson::{self, doc, to_bson},
    options::FindOptions,
};
use rocket::{futures::TryStreamExt, http::Status, serde::json::Json, Route};

use crate::{
    error::{Error, Result},
    model::{
        api::{
            admin::AdminCredentials,
            auth::AuthToken,
            pagination::{Paginated, PaginationRequest},
            question::{QuestionDescription, QuestionResults, QuestionSpec, QuestionSummary},
        },
        common::question::QuestionId,
        db::{
            admin::{Admin, NewAdmin},
            question::Question,
        },
        mongodb::{u32_id_filter, Coll, Counter, QUESTION_ID_COUNTER},
    },
};

pub fn routes() -> Vec<Route> {
    routes![
        get_admins,
        create_admin,
        delete_admin,
        get_questions,
        create_question,
        get_question,
        replace_question,
        delete_question,
    ]
}

#[get("/admins")]
async fn get_admins(_token: AuthToken, admins: Coll<Admin>) -> Result<Json<Vec<String>>> {
    let admin_list: Vec<Admin> = admins.find(None, None).await?.try_collect().await?;
    let admin_names = admin_list
        .into_iter()
        .map(|admin| admin.admin.username)
        .collect();
    Ok(Json(admin_names))
}

#[post("/admins", data = "<new_admin>", format = "json")]
async fn create_admin(
    _token: AuthToken,
    new_admin: Json<AdminCredentials>,
    admins: Coll<NewAdmin>,
) -> Result<()> {
    // Check username uniqueness.
    let filter = doc! {
        "username": &new_admin.username,
    };
    let existing = admins.find_one(filter, None).await?;
    if existing.is_some() {
        return Err(Error::Status(
            Status::BadRequest,
            format!("Admin username already in use: {}", new_admin.username),
        ));
    }

    // Create and insert the admin.
    let admin: NewAdmin = new_admin
        .0
        .try_into()
        .map_err(|_| Error::Status(Status::BadRequest, "Illegal admin credentials".to_string()))?;
    admins.insert_one(admin, None).await?;
    Ok(())
}

#[delete("/admins", data = "<username>", format = "json")]
async fn delete_admin(_token: AuthToken, username: String, admins: Coll<Admin>) -> Result<()> {
    // Prevent deleting the last admin.
    let count = admins.count_documents(None, None).await?;
    if count == 1 {
        return Err(Error::Status(
            Status::UnprocessableEntity,
            "Cannot delete last admin!".to_string(),
        ));
    }

    let filter = doc! {
        "username": &username,
    };
    let result = admins.delete_one(filter, None).await?;
    if result.deleted_count == 0 {
        Err(Error::not_found(format!("Admin {username}")))
    } else {
        Ok(())
    }
}

/// Every question, published or not, newest first.
#[get("/questions")]
async fn get_questions(
    _token: AuthToken,
    pagination: PaginationRequest,
    questions: Coll<Question>,
) -> Result<Json<Paginated<QuestionSummary>>> {
    let total = questions.count_documents(None, None).await? as usize;

    let options = FindOptions::builder()
        .sort(doc! { "pub_date": -1, "_id": -1 })
        .skip(pagination.skip())
        .limit(pagination.page_size() as i64)
        .build();
    let page: Vec<Question> = questions.find(None, options).await?.try_collect().await?;

    let summaries = page.into_iter().map(QuestionSummary::from).collect();
    Ok(Json(pagination.wrap(summaries, total)))
}

#[post("/questions", data = "<spec>", format = "json")]
async fn create_question(
    _token: AuthToken,
    spec: Json<QuestionSpec>,
    questions: Coll<Question>,
    counters: Coll<Counter>,
) -> Result<Json<QuestionDescription>> {
    validate_choices(&spec)?;

    let id = Counter::next(&counters, QUESTION_ID_COUNTER).await?;
    let question = spec.0.into_question(id);
    questions.insert_one(&question, None).await?;
    Ok(Json(question.into()))
}

/// Full question state, including tallies and unpublished questions.
#[get("/questions/<question_id>")]
async fn get_question(
    _token: AuthToken,
    question_id: QuestionId,
    questions: Coll<Question>,
) -> Result<Json<QuestionResults>> {
    let question = questions
        .find_one(u32_id_filter(question_id), None)
        .await?
        .ok_or_else(|| Error::not_found(format!("Question with ID '{question_id}'")))?;
    Ok(Json(question.into()))
}

/// Replace a question's text, choices, and publication date.
///
/// The choice list is replaced wholesale, so all tallies reset to zero.
#[put("/questions/<question_id>", data = "<spec>", format = "json")]
async fn replace_question(
    _token: AuthToken,
    question_id: QuestionId,
    spec: Json<QuestionSpec>,
    questions: Coll<Question>,
) -> Result<Json<QuestionDescription>> {
    validate_choices(&spec)?;

    let question = spec.0.into_question(question_id);
    let update = doc! {
        "$set": {
            "question_text": &question.question_text,
            "pub_date": bson::DateTime::from_chrono(question.pub_date),
            "choices": to_bson(&question.choices).expect("choice serialisation is infallible"),
        }
    };
    let result = questions
        .update_one(u32_id_filter(question_id), update, None)
        .await?;
    if result.matched_count == 0 {
        return Err(Error::not_found(format!("Question with ID '{question_id}'")));
    }
    Ok(Json(question.into()))
}

#[delete("/questions/<question_id>")]
async fn delete_question(
    _token: AuthToken,
    question_id: QuestionId,
    questions: Coll<Question>,
) -> Result<()> {
    let result = questions
        .delete_one(u32_id_filter(question_id), None)
        .await?;
    if result.deleted_count == 0 {
        Err(Error::not_found(format!("Question with ID '{question_id}'")))
    } else {
        Ok(())
    }
}

/// Reject a spec with no choices: an unanswerable question is always a
/// mistake.
fn validate_choices(spec: &QuestionSpec) -> Result<()> {
    if spec.choices.is_empty() {
        return Err(Error::Status(
            Status::UnprocessableEntity,
            "A question must have at least one choice".to_string(),
        ));
    }
    Ok(())
}
