use rocket::{
    http::Status,
    request::{self, FromRequest, Request},
};
use serde::{Deserialize, Serialize};

/// The page of results a caller asked for, via the `page_num` and
/// `page_size` query parameters. Both are optional; pages are 1-based.
pub struct PaginationRequest {
    page_num: usize,
    page_size: usize,
}

impl PaginationRequest {
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of results to skip before this page starts.
    pub fn skip(&self) -> u64 {
        ((self.page_num - 1) * self.page_size) as u64
    }

    /// Package one page of results with its pagination metadata.
    pub fn wrap<T>(self, items: Vec<T>, total: usize) -> Paginated<T> {
        Paginated {
            items,
            page_num: self.page_num,
            page_size: self.page_size,
            total,
        }
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for PaginationRequest {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let page_num = match req.query_value::<usize>("page_num").unwrap_or(Ok(1)) {
            Ok(page_num) if page_num > 0 => page_num,
            _ => return request::Outcome::Failure((Status::BadRequest, ())),
        };
        let page_size = match req.query_value::<usize>("page_size").unwrap_or(Ok(50)) {
            Ok(page_size) => page_size,
            _ => return request::Outcome::Failure((Status::BadRequest, ())),
        };
        request::Outcome::Success(Self {
            page_num,
            page_size,
        })
    }
}

/// One page of results.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page_num: usize,
    pub page_size: usize,
    pub total: usize,
}
