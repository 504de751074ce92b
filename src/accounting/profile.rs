use crate::endpoints::user;
use crate::responses;
use crate::{Client, Error};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
/// The authenticated user and the accounts registered to them.
pub struct UserProfile {
    /// Opaque user identifier.
    pub id: String,

    /// The user's display name.
    pub name: String,

    /// Every account the user can trade.
    #[serde(rename = "account", deserialize_with = "crate::responses::one_or_many")]
    pub accounts: Vec<ProfileAccount>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
/// One account entry on a `UserProfile`.
pub struct ProfileAccount {
    pub account_number: String,

    /// Account classification, e.g. `"individual"` or `"entity"`.
    pub classification: String,

    /// Whether the account is flagged as a pattern day trader.
    pub day_trader: bool,

    /// The option trading level approved for the account (1-6).
    pub option_level: u8,

    /// Account status, e.g. `"active"`.
    pub status: String,

    #[serde(rename = "type")]
    /// Account type, e.g. `"margin"` or `"cash"`.
    pub account_type: String,

    pub last_update_date: String,
}

impl UserProfile {
    /// Fetch the profile of the authenticated user.
    pub async fn fetch(client: &Client) -> Result<UserProfile, Error> {
        let value = client.send(&user::PROFILE.bind(), &[], &[]).await?;
        responses::single(&value, &["profile"])
    }
}

impl Client {
    /// Get the profile of the authenticated user.
    pub async fn get_user_profile(&self) -> Result<UserProfile, Error> {
        UserProfile::fetch(self).await
    }
}
