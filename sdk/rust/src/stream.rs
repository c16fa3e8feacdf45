//! Realtime event stream.
//!
//! The stream is a WebSocket authenticated by the API key in the URL path. The
//! server sends JSON messages; `nop` heartbeats are dropped and everything else
//! is handed to the caller. There is no reconnection: any transport or parse
//! error ends the subscription with that error.

use std::future::{self, Future};
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::{SinkExt, Stream, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};
use url::Url;

use crate::client::Pushbullet;
use crate::error::{PushbulletError, Result};
use crate::types::StreamMessage;

type Socket = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Messages buffered between the subscription task and its `EventStream`.
const EVENT_BUFFER: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Listening,
    Stopped,
}

/// Drive the listen loop over `frames` until `cancel` fires, `on_message`
/// returns `false`, or an error occurs.
///
/// `cancel` is checked before every read and also interrupts a read, or a
/// hook, that is still waiting.
async fn drive<S, F, Fut>(
    frames: S,
    mut on_message: F,
    cancel: &CancellationToken,
) -> Result<()>
where
    S: Stream<Item = std::result::Result<Message, tungstenite::Error>>,
    F: FnMut(StreamMessage) -> Fut,
    Fut: Future<Output = bool>,
{
    let mut frames = std::pin::pin!(frames);
    let mut state = State::Listening;

    while state == State::Listening {
        if cancel.is_cancelled() {
            state = State::Stopped;
            continue;
        }

        let frame = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                state = State::Stopped;
                continue;
            }
            frame = frames.next() => frame,
        };

        let message: StreamMessage = match frame {
            Some(Ok(Message::Text(text))) => serde_json::from_str(&text)?,
            Some(Ok(Message::Binary(bytes))) => serde_json::from_slice(&bytes)?,
            Some(Ok(Message::Close(frame))) => {
                return Err(PushbulletError::websocket(format!(
                    "connection closed by server: {:?}",
                    frame
                )));
            }
            Some(Ok(_)) => continue,
            Some(Err(e)) => return Err(PushbulletError::websocket(e.to_string())),
            None => return Err(PushbulletError::websocket("connection closed unexpectedly")),
        };

        if message.is_heartbeat() {
            trace!("stream heartbeat");
            continue;
        }

        let keep_listening = tokio::select! {
            biased;
            _ = cancel.cancelled() => false,
            keep = on_message(message) => keep,
        };
        if !keep_listening {
            state = State::Stopped;
        }
    }

    debug!("realtime stream stopped");
    Ok(())
}

/// Run the listen loop with a synchronous callback.
pub(crate) async fn listen<S, F>(
    frames: S,
    mut on_message: F,
    cancel: &CancellationToken,
) -> Result<()>
where
    S: Stream<Item = std::result::Result<Message, tungstenite::Error>>,
    F: FnMut(StreamMessage),
{
    drive(
        frames,
        |message| {
            on_message(message);
            future::ready(true)
        },
        cancel,
    )
    .await
}

/// Send every message from `frames` into `events`, waiting for room when the
/// buffer is full. A failure is delivered as the last item.
///
/// Returns `true` when the loop stopped cleanly (cancelled or receiver gone).
async fn forward<S>(
    frames: S,
    events: mpsc::Sender<Result<StreamMessage>>,
    cancel: &CancellationToken,
) -> bool
where
    S: Stream<Item = std::result::Result<Message, tungstenite::Error>>,
{
    let result = drive(
        frames,
        |message| {
            let events = events.clone();
            async move { events.send(Ok(message)).await.is_ok() }
        },
        cancel,
    )
    .await;

    match result {
        Ok(()) => true,
        Err(e) => {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {}
                _ = events.send(Err(e)) => {}
            }
            false
        }
    }
}

impl Pushbullet {
    fn stream_endpoint(&self) -> Result<Url> {
        let url = format!("{}/{}", self.inner.stream_url, self.inner.api_key);
        Ok(Url::parse(&url)?)
    }

    async fn connect_stream(&self) -> Result<Socket> {
        let url = self.stream_endpoint()?;
        debug!(
            host = url.host_str().unwrap_or_default(),
            "connecting realtime stream"
        );
        let (socket, _) = connect_async(url.as_str())
            .await
            .map_err(|e| PushbulletError::websocket(format!("connection failed: {}", e)))?;
        Ok(socket)
    }

    /// Listen to the realtime stream, calling `on_message` for every message
    /// that is not a heartbeat.
    ///
    /// Runs until `cancel` is cancelled (returns `Ok`) or the connection fails
    /// (returns the error). `on_message` runs on the listening task, so a slow
    /// callback delays the next read.
    ///
    /// ```no_run
    /// # use pushbullet::Pushbullet;
    /// # use tokio_util::sync::CancellationToken;
    /// # async fn example() -> pushbullet::Result<()> {
    /// let client = Pushbullet::from_env()?;
    /// let cancel = CancellationToken::new();
    ///
    /// let stop = cancel.clone();
    /// tokio::spawn(async move {
    ///     let _ = tokio::signal::ctrl_c().await;
    ///     stop.cancel();
    /// });
    ///
    /// client
    ///     .realtime(|message| println!("{}: {:?}", message.kind, message.subtype), &cancel)
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn realtime<F>(&self, on_message: F, cancel: &CancellationToken) -> Result<()>
    where
        F: FnMut(StreamMessage),
    {
        let socket = self.connect_stream().await?;
        let (mut write, read) = socket.split();

        listen(read, on_message, cancel).await?;

        if let Err(e) = write.close().await {
            debug!(error = %e, "closing realtime stream failed");
        }
        Ok(())
    }

    /// Subscribe to the realtime stream on a background task.
    ///
    /// Returns an async stream of messages (heartbeats removed). The connection
    /// is opened before this returns, so connection failures surface here. A
    /// later failure is yielded as the last item. At most 100 messages are
    /// buffered; when the consumer falls behind, reading from the socket pauses
    /// until it catches up. Dropping the stream stops the background task.
    pub async fn subscribe(&self) -> Result<EventStream> {
        let socket = self.connect_stream().await?;
        let cancel = CancellationToken::new();
        let (event_tx, event_rx) = mpsc::channel::<Result<StreamMessage>>(EVENT_BUFFER);

        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            let (mut write, read) = socket.split();
            if forward(read, event_tx, &task_cancel).await {
                let _ = write.close().await;
            }
        });

        Ok(EventStream { event_rx, cancel })
    }
}

/// A stream of realtime messages from [`Pushbullet::subscribe`].
///
/// Implements `futures::Stream<Item = Result<StreamMessage>>`.
pub struct EventStream {
    event_rx: mpsc::Receiver<Result<StreamMessage>>,
    cancel: CancellationToken,
}

impl EventStream {
    /// Stop the background task. Messages already received can still be read.
    pub fn close(&self) {
        self.cancel.cancel();
    }
}

impl Stream for EventStream {
    type Item = Result<StreamMessage>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.event_rx).poll_recv(cx)
    }
}

impl Drop for EventStream {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
