#[macro_use]
extern crate log;

#[macro_use]
extern crate rocket;

#[cfg(test)]
#[macro_use]
extern crate backend_test;

use rocket::{Build, Rocket};

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;

pub use crate::config::Config;

use crate::config::{ConfigFairing, DatabaseFairing};
use crate::logging::LoggerFairing;

/// Construct the server, ready to ignite.
pub fn build() -> Rocket<Build> {
    rocket_base().attach(ConfigFairing).attach(DatabaseFairing)
}

/// The route table plus request-independent fairings, shared between
/// production and tests.
///
/// Resolution is fixed here once and for all: anything under `/polls` goes to
/// the polls sub-application, anything under `/admin` goes to the admin
/// interface, and the exact root path goes to the `home` handler.
fn rocket_base() -> Rocket<Build> {
    rocket::build()
        .mount("/polls", api::polls::routes())
        .mount("/admin", api::admin_routes())
        .mount("/", api::home::routes())
        .attach(LoggerFairing)
}

/// Connect to the database server named in the figment.
#[cfg(test)]
pub(crate) async fn db_client() -> mongodb::Client {
    let db_uri = rocket::build()
        .figment()
        .extract_inner::<String>("db_uri")
        .expect("`db_uri` not set");
    mongodb::Client::with_uri_str(&db_uri)
        .await
        .expect("Could not connect to database")
}

/// A random database name, so concurrent tests never share state.
#[cfg(test)]
pub(crate) fn database() -> String {
    let random: u32 = rand::random();
    format!("test{random}")
}

/// A rocket with the given database injected directly, bypassing the
/// database fairing but running the same index and counter bootstrap.
#[cfg(test)]
pub(crate) async fn rocket_for_db(client: mongodb::Client, db_name: &str) -> Rocket<Build> {
    use crate::model::mongodb::{ensure_indexes_exist, ensure_question_id_counter_exists, Coll};

    let db = client.database(db_name);
    ensure_indexes_exist(&db).await.unwrap();
    ensure_question_id_counter_exists(&Coll::from_db(&db))
        .await
        .unwrap();

    rocket_base()
        .attach(ConfigFairing)
        .manage(client)
        .manage(db)
}
