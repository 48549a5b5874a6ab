use serde::{Deserialize, Serialize};

use super::Profile;

/// Email/password pair forwarded to the identity provider
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Session issued by the identity provider after sign-in
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub access_token: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub user: Profile,
}
