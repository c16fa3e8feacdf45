//! # pushbullet
//!
//! Rust client for the [Pushbullet](https://www.pushbullet.com) v2 API and its
//! realtime event stream.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pushbullet::{Pushbullet, Recipient};
//!
//! #[tokio::main]
//! async fn main() -> pushbullet::Result<()> {
//!     // Create client from environment
//!     let client = Pushbullet::from_env()?;
//!
//!     // Push a note to the first device
//!     let devices = client.devices().await?;
//!     if let Some(iden) = devices.first().and_then(|d| d.iden.clone()) {
//!         client.push_note(iden, "Hello", "from Rust").await?;
//!     }
//!
//!     // Or address someone by email
//!     client
//!         .push_link(Recipient::Email("friend@example.com".into()), "Docs", "https://docs.pushbullet.com")
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! ```no_run
//! use pushbullet::Pushbullet;
//! use std::time::Duration;
//!
//! // From environment (PUSHBULLET_API_KEY)
//! let client = Pushbullet::from_env()?;
//!
//! // Using builder
//! let client = Pushbullet::builder("o.your_api_key")
//!     .server("http://localhost:8080/v2")
//!     .timeout(Duration::from_secs(60))
//!     .build()?;
//! # Ok::<(), pushbullet::PushbulletError>(())
//! ```
//!
//! ## Realtime
//!
//! ```no_run
//! use futures::StreamExt;
//! use pushbullet::Pushbullet;
//!
//! # async fn example() -> pushbullet::Result<()> {
//! let client = Pushbullet::from_env()?;
//! let mut stream = client.subscribe().await?;
//!
//! while let Some(message) = stream.next().await {
//!     let message = message?;
//!     if message.kind == "tickle" {
//!         let pushes = client.push_history(0.0, None).await?;
//!         println!("{} pushes", pushes.len());
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Errors are never retried: a non-2xx response is returned as
//! [`PushbulletError::Api`] with the status and body, and the realtime stream
//! ends on the first transport or parse error.

mod client;
mod endpoints;
mod error;
mod stream;
mod types;

pub use client::{Pushbullet, PushbulletBuilder};
pub use endpoints::FilePush;
pub use error::{PushbulletError, Result};
pub use stream::EventStream;
pub use tokio_util::sync::CancellationToken;
pub use types::{Contact, Device, Push, PushPage, Recipient, StreamMessage, User};
