//! Push endpoints.

use crate::client::Pushbullet;
use crate::error::Result;
use crate::types::{Push, PushBody, PushPage, PushRequest, Recipient};

impl Pushbullet {
    pub(crate) async fn create_push(
        &self,
        recipient: &Recipient,
        push: PushBody<'_>,
    ) -> Result<Push> {
        let request = PushRequest { push, recipient };
        self.post("/pushes", &request).await
    }

    /// Push a note.
    ///
    /// `recipient` accepts a device iden directly, or any [`Recipient`] to address
    /// an email, channel or client instead.
    ///
    /// ```no_run
    /// # use pushbullet::{Pushbullet, Recipient};
    /// # async fn example() -> pushbullet::Result<()> {
    /// let client = Pushbullet::from_env()?;
    /// client.push_note("ujpah72o0sjAoRtnM0jc", "Build", "finished").await?;
    /// client
    ///     .push_note(Recipient::Email("ops@example.com".into()), "Build", "finished")
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn push_note(
        &self,
        recipient: impl Into<Recipient>,
        title: &str,
        body: &str,
    ) -> Result<Push> {
        self.create_push(&recipient.into(), PushBody::Note { title, body })
            .await
    }

    /// Push an address, e.g. `name = "Bob's house"`.
    pub async fn push_address(
        &self,
        recipient: impl Into<Recipient>,
        name: &str,
        address: &str,
    ) -> Result<Push> {
        self.create_push(&recipient.into(), PushBody::Address { name, address })
            .await
    }

    /// Push a checklist. Items keep their order.
    pub async fn push_list<I, S>(
        &self,
        recipient: impl Into<Recipient>,
        title: &str,
        items: I,
    ) -> Result<Push>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items = items.into_iter().map(Into::into).collect();
        self.create_push(&recipient.into(), PushBody::List { title, items })
            .await
    }

    /// Push a link.
    pub async fn push_link(
        &self,
        recipient: impl Into<Recipient>,
        title: &str,
        url: &str,
    ) -> Result<Push> {
        self.create_push(&recipient.into(), PushBody::Link { title, url })
            .await
    }

    /// Pushes modified after `modified_after` (seconds since the epoch).
    ///
    /// Returns a single page. Use [`Pushbullet::push_history_page`] to get the
    /// cursor for the next one.
    pub async fn push_history(
        &self,
        modified_after: f64,
        cursor: Option<&str>,
    ) -> Result<Vec<Push>> {
        Ok(self.push_history_page(modified_after, cursor).await?.pushes)
    }

    /// One page of push history along with the cursor of the next page, if any.
    pub async fn push_history_page(
        &self,
        modified_after: f64,
        cursor: Option<&str>,
    ) -> Result<PushPage> {
        let mut query = vec![("modified_after", modified_after.to_string())];
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor.to_string()));
        }
        self.get("/pushes", &query).await
    }

    /// Delete a push.
    pub async fn delete_push(&self, iden: &str) -> Result<serde_json::Value> {
        self.delete(&format!("/pushes/{iden}")).await
    }
}
