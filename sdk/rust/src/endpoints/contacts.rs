//! Contact endpoints.

use crate::client::Pushbullet;
use crate::error::Result;
use crate::types::{Contact, ContactsEnvelope};

impl Pushbullet {
    /// List the contacts on the account.
    pub async fn contacts(&self) -> Result<Vec<Contact>> {
        let envelope: ContactsEnvelope = self.get("/contacts", &[]).await?;
        Ok(envelope.contacts)
    }

    /// Delete a contact.
    pub async fn delete_contact(&self, iden: &str) -> Result<serde_json::Value> {
        self.delete(&format!("/contacts/{iden}")).await
    }
}
