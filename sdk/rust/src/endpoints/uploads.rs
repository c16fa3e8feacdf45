//! File pushes: upload-request, upload, then register the push.

use std::io::SeekFrom;

use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeek, AsyncSeekExt};
use tracing::debug;

use crate::client::Pushbullet;
use crate::error::{PushbulletError, Result};
use crate::types::{Push, PushBody, Recipient, UploadTicket};

/// Bytes inspected when guessing a MIME type.
const SNIFF_LEN: usize = 1024;
const FALLBACK_MIME: &str = "application/octet-stream";

/// A file to push.
///
/// The content can be anything readable and seekable: a `tokio::fs::File`, a
/// `std::io::Cursor` over bytes, ...
///
/// ```no_run
/// # use pushbullet::{FilePush, Pushbullet};
/// # async fn example() -> pushbullet::Result<()> {
/// let client = Pushbullet::from_env()?;
/// let file = tokio::fs::File::open("report.pdf").await?;
/// client
///     .push_file("ujpah72o0sjAoRtnM0jc", FilePush::new("report.pdf", file).body("weekly"))
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FilePush<R> {
    file_name: String,
    content: R,
    body: Option<String>,
    file_type: Option<String>,
}

impl<R> FilePush<R> {
    /// Create a file push named `file_name` reading from `content`.
    pub fn new(file_name: impl Into<String>, content: R) -> Self {
        Self {
            file_name: file_name.into(),
            content,
            body: None,
            file_type: None,
        }
    }

    /// Message shown with the file.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// MIME type of the file. Guessed from the content when unset or empty.
    pub fn file_type(mut self, file_type: impl Into<String>) -> Self {
        self.file_type = Some(file_type.into());
        self
    }
}

/// Guess the MIME type from the first bytes of `content`, leaving it rewound to the start.
pub(crate) async fn sniff_mime<R>(content: &mut R) -> Result<String>
where
    R: AsyncRead + AsyncSeek + Unpin,
{
    let mut head = Vec::with_capacity(SNIFF_LEN);
    (&mut *content)
        .take(SNIFF_LEN as u64)
        .read_to_end(&mut head)
        .await?;
    content.seek(SeekFrom::Start(0)).await?;

    let mime = infer::get(&head)
        .map(|kind| kind.mime_type())
        .unwrap_or(FALLBACK_MIME);
    Ok(mime.to_string())
}

impl Pushbullet {
    /// Upload a file and push it to `recipient`.
    ///
    /// Runs the whole two-step flow: an upload slot is requested, the bytes are
    /// posted to it, and only then is the push created. If the upload fails no
    /// push is created; the slot is not reused, so retrying means calling this
    /// again.
    pub async fn push_file<R>(
        &self,
        recipient: impl Into<Recipient>,
        file: FilePush<R>,
    ) -> Result<Push>
    where
        R: AsyncRead + AsyncSeek + Unpin,
    {
        let recipient = recipient.into();
        let FilePush {
            file_name,
            mut content,
            body,
            file_type,
        } = file;

        let file_type = match file_type.filter(|t| !t.trim().is_empty()) {
            Some(file_type) => file_type,
            None => sniff_mime(&mut content).await?,
        };
        let mut bytes = Vec::new();
        content.read_to_end(&mut bytes).await?;

        let size = bytes.len();
        let part = Part::bytes(bytes)
            .file_name(file_name.clone())
            .mime_str(&file_type)
            .map_err(|_| PushbulletError::invalid_file_type(&file_type))?;

        let ticket = self.request_upload(&file_name, &file_type).await?;
        debug!(file_name = %file_name, size, "uploading file");
        self.upload(&ticket, part).await?;

        self.create_push(
            &recipient,
            PushBody::File {
                file_name: &file_name,
                file_type: &file_type,
                file_url: &ticket.file_url,
                body: body.as_deref(),
            },
        )
        .await
    }

    async fn request_upload(&self, file_name: &str, file_type: &str) -> Result<UploadTicket> {
        let query = [
            ("file_name", file_name.to_string()),
            ("file_type", file_type.to_string()),
        ];
        self.get("/upload-request", &query).await
    }

    async fn upload(&self, ticket: &UploadTicket, file: Part) -> Result<()> {
        let mut form = Form::new();
        for (key, value) in &ticket.data {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            form = form.text(key.clone(), value);
        }
        form = form.part("file", file);

        let response = self
            .inner
            .http_client
            .post(&ticket.upload_url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PushbulletError::api(status.as_u16(), body));
        }
        Ok(())
    }
}
