use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{
    api::admin::AdminCredentials,
    mongodb::{Coll, Id},
};
use crate::Config;

/// Core admin user data.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminCore {
    pub username: String,
    pub password_hash: String,
}

impl AdminCore {
    /// Check whether the given password is correct.
    pub fn verify_password<T: AsRef<[u8]>>(&self, password: T) -> bool {
        // Unwrap safe because the only way to create an AdminCore is via
        // TryFrom<AdminCredentials>, so the hash is always well-formed.
        argon2::verify_encoded(&self.password_hash, password.as_ref()).unwrap()
    }
}

/// An admin without an ID.
pub type NewAdmin = AdminCore;

/// An admin user from the database, with its unique ID.
#[derive(Serialize, Deserialize)]
pub struct Admin {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub admin: AdminCore,
}

impl Deref for Admin {
    type Target = AdminCore;

    fn deref(&self) -> &Self::Target {
        &self.admin
    }
}

impl DerefMut for Admin {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.admin
    }
}

/// Ensure at least one admin account exists, creating the configured default
/// account if the collection is empty.
///
/// Without this, a fresh deployment would have no way to log in and manage
/// questions.
pub async fn ensure_admin_exists(admins: &Coll<NewAdmin>, config: &Config) -> Result<()> {
    if admins.count_documents(None, None).await? == 0 {
        let credentials = AdminCredentials {
            username: config.default_admin_username().to_string(),
            password: config.default_admin_password().to_string(),
        };
        let username = credentials.username.clone();
        let admin: NewAdmin = credentials.try_into()?;
        admins.insert_one(admin, None).await?;
        warn!("No admins found, created default admin '{username}'");
    }
    Ok(())
}
