use rocket::{serde::json::Json, Route};
use serde::{Deserialize, Serialize};

pub fn routes() -> Vec<Route> {
    routes![home]
}

/// What a caller finds at the site root: where everything else lives.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteDescription {
    pub name: String,
    pub polls_url: String,
    pub admin_login_url: String,
}

/// The site root. Matches the empty path and nothing else.
///
/// The advertised URLs are derived from the route table itself, so they can
/// never drift from where the sub-applications are actually mounted.
#[get("/")]
pub fn home() -> Json<SiteDescription> {
    Json(SiteDescription {
        name: "mpc".to_string(),
        polls_url: uri!("/polls", super::polls::index).to_string(),
        admin_login_url: uri!("/admin", super::auth::authenticate).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use rocket::{http::Status, local::asynchronous::Client};

    use super::*;

    /// Reverse lookup of the `home` route yields the site root.
    #[test]
    fn home_reverse_lookup() {
        assert_eq!("/", uri!(home).to_string());
    }

    #[backend_test]
    async fn home_at_root(client: Client) {
        let response = client.get(uri!(home)).dispatch().await;

        assert_eq!(Status::Ok, response.status());
        let site: SiteDescription = response.into_json().await.unwrap();
        assert_eq!("mpc", site.name);
        assert_eq!(uri!("/polls", crate::api::polls::index).to_string(), site.polls_url);
        assert_eq!(
            uri!("/admin", crate::api::auth::authenticate).to_string(),
            site.admin_login_url
        );
    }

    /// Only the exact root path resolves to `home`; anything unmatched is a
    /// framework 404.
    #[backend_test]
    async fn unknown_paths_not_found(client: Client) {
        for path in ["/nope", "/home", "/1", "/polls-but-longer"] {
            let response = client.get(path).dispatch().await;
            assert_eq!(Status::NotFound, response.status());
        }
    }

    /// The three mounts stay disjoint: each prefix dispatches to its own
    /// table. Guards against regressions if entries are reordered or added.
    #[backend_test]
    async fn mounts_are_disjoint(client: Client) {
        // Root: the home handler.
        let response = client.get("/").dispatch().await;
        assert_eq!(Status::Ok, response.status());
        assert!(response.into_string().await.unwrap().contains("polls_url"));

        // Polls: the polls index (empty, but routed).
        let response = client.get("/polls").dispatch().await;
        assert_eq!(Status::Ok, response.status());
        assert!(response.into_string().await.unwrap().contains("\"total\":0"));

        // Admin: routed, but hidden without authentication.
        let response = client.get("/admin/questions").dispatch().await;
        assert_eq!(Status::NotFound, response.status());
    }
}
