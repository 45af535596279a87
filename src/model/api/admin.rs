use argon2::Error as Argon2Error;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::db::admin::NewAdmin;

/// Raw admin credentials, received from a user. These are never stored
/// directly, since the password is in plaintext.
#[derive(Clone, Serialize, Deserialize)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl TryFrom<AdminCredentials> for NewAdmin {
    type Error = Argon2Error;

    /// Convert [`AdminCredentials`] to a new admin by hashing the password.
    fn try_from(credentials: AdminCredentials) -> Result<Self, Self::Error> {
        // 16 bytes is recommended for password hashing:
        //  https://en.wikipedia.org/wiki/Argon2
        let mut salt = [0_u8; 16];
        rand::thread_rng().fill(&mut salt);
        let password_hash = argon2::hash_encoded(
            credentials.password.as_bytes(),
            &salt,
            &argon2::Config::default(),
        )?;
        Ok(Self {
            username: credentials.username,
            password_hash,
        })
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl AdminCredentials {
        pub fn example() -> Self {
            Self {
                username: "coordinator".into(),
                password: "coordinator".into(),
            }
        }

        pub fn example2() -> Self {
            Self {
                username: "coordinator2".into(),
                password: "coordinator2".into(),
            }
        }

        pub fn empty() -> Self {
            Self {
                username: "".into(),
                password: "".into(),
            }
        }
    }
}
