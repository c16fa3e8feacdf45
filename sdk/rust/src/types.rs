//! Data types for the Pushbullet client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Who a push is addressed to.
///
/// Serializes as a single `key: value` pair that is merged into the push body.
/// Plain strings convert to [`Recipient::Device`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Recipient {
    /// A device of the authenticated user (`device_iden`).
    #[serde(rename = "device_iden")]
    Device(String),
    /// A user or non-user by email address (`email`).
    #[serde(rename = "email")]
    Email(String),
    /// Subscribers of a channel (`channel_tag`).
    #[serde(rename = "channel_tag")]
    Channel(String),
    /// Users of an OAuth client (`client_iden`).
    #[serde(rename = "client_iden")]
    Client(String),
}

impl Recipient {
    /// The JSON key this recipient is addressed by.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Device(_) => "device_iden",
            Self::Email(_) => "email",
            Self::Channel(_) => "channel_tag",
            Self::Client(_) => "client_iden",
        }
    }
}

impl From<&str> for Recipient {
    fn from(iden: &str) -> Self {
        Self::Device(iden.to_string())
    }
}

impl From<String> for Recipient {
    fn from(iden: String) -> Self {
        Self::Device(iden)
    }
}

fn timestamp(secs: Option<f64>) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis((secs? * 1000.0).round() as i64)
}

/// A device registered on the account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Device {
    /// Device identifier.
    pub iden: Option<String>,
    /// Human readable name.
    pub nickname: Option<String>,
    /// Whether the device is still active (deleted devices are inactive).
    pub active: Option<bool>,
    /// Device kind, `stream` for devices created through this client.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Creation time, seconds since the epoch.
    pub created: Option<f64>,
    /// Last modification time, seconds since the epoch.
    pub modified: Option<f64>,
    /// Every other field of the response.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Device {
    /// When the device was created.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        timestamp(self.created)
    }
}

/// A push as returned by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Push {
    /// Push identifier.
    pub iden: Option<String>,
    /// Push kind: note, link, address, list or file.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// False once the push has been deleted.
    pub active: Option<bool>,
    /// Whether the push was dismissed on the receiving side.
    pub dismissed: Option<bool>,
    /// Title of a note, link or list.
    pub title: Option<String>,
    /// Message body.
    pub body: Option<String>,
    /// Target of a link push.
    pub url: Option<String>,
    /// Name of the pushed file.
    pub file_name: Option<String>,
    /// MIME type of the pushed file.
    pub file_type: Option<String>,
    /// Where the pushed file can be downloaded.
    pub file_url: Option<String>,
    /// Creation time, seconds since the epoch.
    pub created: Option<f64>,
    /// Last modification time, seconds since the epoch.
    pub modified: Option<f64>,
    /// Every other field of the response.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Push {
    /// When the push was created.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        timestamp(self.created)
    }

    /// When the push was last modified.
    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        timestamp(self.modified)
    }
}

/// One page of push history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[non_exhaustive]
pub struct PushPage {
    /// Pushes on this page, newest first.
    pub pushes: Vec<Push>,
    /// Present when more pages exist; pass it back to fetch the next one.
    #[serde(default)]
    pub cursor: Option<String>,
}

/// A contact on the account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Contact {
    /// Contact identifier.
    pub iden: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Email address the contact is reached at.
    pub email: Option<String>,
    /// False once the contact has been deleted.
    pub active: Option<bool>,
    /// Every other field of the response.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[non_exhaustive]
pub struct User {
    /// User identifier.
    pub iden: Option<String>,
    /// Full name.
    pub name: Option<String>,
    /// Account email address.
    pub email: Option<String>,
    /// Avatar URL.
    pub image_url: Option<String>,
    /// Account creation time, seconds since the epoch.
    pub created: Option<f64>,
    /// Every other field of the response.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// When the account was created.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        timestamp(self.created)
    }
}

/// A message received on the realtime stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct StreamMessage {
    /// Message kind: `tickle`, `push`, ... (`nop` never reaches callers).
    #[serde(rename = "type")]
    pub kind: String,
    /// What changed for a `tickle` (`push`, `device`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    /// Ephemeral payload for a `push` message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push: Option<Value>,
    /// Every other field of the message.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StreamMessage {
    pub(crate) const HEARTBEAT: &'static str = "nop";

    /// Whether this is the keep-alive heartbeat.
    pub fn is_heartbeat(&self) -> bool {
        self.kind == Self::HEARTBEAT
    }
}

/// Slot issued by `/upload-request` for a single file upload.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UploadTicket {
    pub upload_url: String,
    pub file_url: String,
    /// Form fields to send alongside the file.
    #[serde(default)]
    pub data: Map<String, Value>,
}

// HTTP API request bodies

#[derive(Debug, Serialize)]
pub(crate) struct CreateDeviceRequest<'a> {
    pub nickname: &'a str,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub(crate) enum PushBody<'a> {
    Note {
        title: &'a str,
        body: &'a str,
    },
    Address {
        name: &'a str,
        address: &'a str,
    },
    List {
        title: &'a str,
        items: Vec<String>,
    },
    Link {
        title: &'a str,
        url: &'a str,
    },
    File {
        file_name: &'a str,
        file_type: &'a str,
        file_url: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        body: Option<&'a str>,
    },
}

#[derive(Debug, Serialize)]
pub(crate) struct PushRequest<'a> {
    #[serde(flatten)]
    pub push: PushBody<'a>,
    #[serde(flatten)]
    pub recipient: &'a Recipient,
}

#[derive(Debug, Serialize)]
pub(crate) struct EphemeralRequest<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub push: SmsReply<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SmsReply<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub package_name: &'static str,
    pub source_user_iden: &'a str,
    pub target_device_iden: &'a str,
    pub conversation_iden: &'a str,
    pub message: &'a str,
}

// Response envelopes

#[derive(Debug, Deserialize)]
pub(crate) struct DevicesEnvelope {
    pub devices: Vec<Device>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContactsEnvelope {
    pub contacts: Vec<Contact>,
}
