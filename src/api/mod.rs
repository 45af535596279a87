use rocket::Route;

pub mod admin;
pub mod auth;
pub mod home;
pub mod polls;

/// The admin interface's route table: authentication plus management.
pub fn admin_routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(auth::routes());
    routes.extend(admin::routes());
    routes
}
