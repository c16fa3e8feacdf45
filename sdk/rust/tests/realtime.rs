use futures::{SinkExt, StreamExt};
use pushbullet::{CancellationToken, Pushbullet, PushbulletError};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::Message;

const API_KEY: &str = "o.stream-key";

/// Serve one WebSocket connection that sends `frames` and then idles until the
/// client goes away. Resolves the returned receiver with the request path.
async fn serve(frames: Vec<&'static str>) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (path_tx, path_rx) = oneshot::channel();

    tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.unwrap();
        let mut path = None;
        let record_path = |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
            path = Some(req.uri().path().to_string());
            Ok(resp)
        };
        let mut ws = tokio_tungstenite::accept_hdr_async(tcp, record_path)
            .await
            .unwrap();
        let _ = path_tx.send(path.unwrap_or_default());

        for frame in frames {
            ws.send(Message::Text(frame.to_string())).await.unwrap();
        }
        // Keep the connection open until the client closes it.
        while let Some(Ok(message)) = ws.next().await {
            if message.is_close() {
                break;
            }
        }
    });

    (format!("ws://{addr}/websocket"), path_rx)
}

fn client(stream_url: &str) -> Pushbullet {
    Pushbullet::builder(API_KEY)
        .stream_url(stream_url)
        .build()
        .unwrap()
}

#[tokio::test]
async fn realtime_skips_heartbeats_and_stops_on_cancel() {
    let (url, path_rx) = serve(vec![
        r#"{"type":"nop"}"#,
        r#"{"type":"tickle","subtype":"push"}"#,
    ])
    .await;
    let cancel = CancellationToken::new();
    let mut received = Vec::new();

    client(&url)
        .realtime(
            |message| {
                received.push(message);
                cancel.cancel();
            },
            &cancel,
        )
        .await
        .unwrap();

    assert_eq!(received.len(), 1);
    assert_eq!(received[0].kind, "tickle");
    assert_eq!(path_rx.await.unwrap(), format!("/websocket/{API_KEY}"));
}

#[tokio::test]
async fn subscribe_yields_messages_in_order() {
    let (url, _path) = serve(vec![
        r#"{"type":"nop"}"#,
        r#"{"type":"push","push":{"type":"mirror","title":"Call"}}"#,
        r#"{"type":"nop"}"#,
        r#"{"type":"tickle","subtype":"device"}"#,
    ])
    .await;

    let mut stream = client(&url).subscribe().await.unwrap();

    let first = stream.next().await.unwrap().unwrap();
    let second = stream.next().await.unwrap().unwrap();
    assert_eq!(first.kind, "push");
    assert_eq!(first.push.unwrap()["title"], "Call");
    assert_eq!(second.subtype.as_deref(), Some("device"));

    stream.close();
}

#[tokio::test]
async fn subscribe_reports_malformed_frames() {
    let (url, _path) = serve(vec!["{not json"]).await;

    let mut stream = client(&url).subscribe().await.unwrap();

    let err = stream.next().await.unwrap().unwrap_err();
    assert!(matches!(err, PushbulletError::Serialization(_)));
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn connection_refused_is_an_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let cancel = CancellationToken::new();
    let err = client(&format!("ws://{addr}/websocket"))
        .realtime(|_| {}, &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, PushbulletError::WebSocket(_)));
}
