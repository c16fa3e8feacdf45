//! User endpoint.

use crate::client::Pushbullet;
use crate::error::Result;
use crate::types::User;

impl Pushbullet {
    /// Fetch the user the API key belongs to.
    pub async fn user(&self) -> Result<User> {
        self.get("/users/me", &[]).await
    }
}
