mod common;

use std::io::{self, Cursor, SeekFrom};
use std::pin::Pin;
use std::task::{Context, Poll};

use common::{client_for, API_KEY};
use pushbullet::{FilePush, PushbulletError};
use serde_json::json;
use tokio::io::{AsyncRead, AsyncSeek, ReadBuf};
use wiremock::matchers::{basic_auth, body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

fn png_bytes() -> Vec<u8> {
    let mut bytes = PNG_HEADER.to_vec();
    // Longer than the sniffed prefix so a missing rewind would show up.
    bytes.extend((0..3000u32).map(|i| (i % 251) as u8));
    bytes
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

async fn mount_upload_request(server: &MockServer, file_name: &str, file_type: &str) {
    Mock::given(method("GET"))
        .and(path("/upload-request"))
        .and(basic_auth(API_KEY, ""))
        .and(query_param("file_name", file_name))
        .and(query_param("file_type", file_type))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "file_name": file_name,
            "file_type": file_type,
            "file_url": format!("https://dl.pushbulletusercontent.com/abc/{file_name}"),
            "upload_url": format!("{}/upload", server.uri()),
            "data": {"acl": "public-read", "key": "abc/upload", "content-length-range": 1}
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn png_is_sniffed_uploaded_and_pushed() {
    let server = MockServer::start().await;
    mount_upload_request(&server, "pic.png", "image/png").await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/pushes"))
        .and(basic_auth(API_KEY, ""))
        .and(body_json(json!({
            "type": "file",
            "file_name": "pic.png",
            "file_type": "image/png",
            "file_url": "https://dl.pushbulletusercontent.com/abc/pic.png",
            "body": "screenshot",
            "device_iden": "dev1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "iden": "push1", "type": "file", "file_type": "image/png"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let content = png_bytes();
    let push = client_for(&server)
        .push_file(
            "dev1",
            FilePush::new("pic.png", Cursor::new(content.clone())).body("screenshot"),
        )
        .await
        .unwrap();

    assert_eq!(push.file_type.as_deref(), Some("image/png"));

    let requests = server.received_requests().await.unwrap();
    let upload = requests
        .iter()
        .find(|r| r.url.path() == "/upload")
        .unwrap();
    assert!(contains(&upload.body, &content));
    assert!(contains(&upload.body, b"public-read"));
    assert!(contains(&upload.body, b"name=\"content-length-range\""));
    assert!(!upload.headers.contains_key("authorization"));
}

#[tokio::test]
async fn explicit_type_skips_sniffing() {
    let server = MockServer::start().await;
    mount_upload_request(&server, "notes.txt", "text/plain").await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/pushes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"iden": "push2"})))
        .expect(1)
        .mount(&server)
        .await;

    let content = Cursor::new(png_bytes());
    client_for(&server)
        .push_file(
            "dev1",
            FilePush::new("notes.txt", content).file_type("text/plain"),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn failed_upload_creates_no_push() {
    let server = MockServer::start().await;
    mount_upload_request(&server, "pic.png", "image/png").await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(403).set_body_string("policy expired"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/pushes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .push_file("dev1", FilePush::new("pic.png", Cursor::new(png_bytes())))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(403));
    assert!(err.to_string().contains("policy expired"));
}

/// Readable content that refuses to seek.
struct Unseekable(Cursor<Vec<u8>>);

impl AsyncRead for Unseekable {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.0).poll_read(cx, buf)
    }
}

impl AsyncSeek for Unseekable {
    fn start_seek(self: Pin<&mut Self>, _position: SeekFrom) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::Unsupported, "pipe"))
    }

    fn poll_complete(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<u64>> {
        Poll::Ready(Ok(0))
    }
}

#[tokio::test]
async fn sniffing_failure_happens_before_any_request() {
    let server = MockServer::start().await;

    let err = client_for(&server)
        .push_file(
            "dev1",
            FilePush::new("pic.png", Unseekable(Cursor::new(png_bytes()))),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, PushbulletError::Io(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn malformed_file_type_is_rejected_before_any_request() {
    let server = MockServer::start().await;

    let err = client_for(&server)
        .push_file(
            "dev1",
            FilePush::new("a.bin", Cursor::new(png_bytes())).file_type("PNG image data, 1 x 1"),
        )
        .await
        .unwrap_err();

    match &err {
        PushbulletError::InvalidFileType(file_type) => {
            assert_eq!(file_type, "PNG image data, 1 x 1")
        }
        other => panic!("expected invalid file type, got {other:?}"),
    }
    assert!(err.to_string().contains("PNG image data, 1 x 1"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_file_type_falls_back_to_sniffing() {
    let server = MockServer::start().await;
    mount_upload_request(&server, "a.png", "image/png").await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/pushes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"iden": "push3"})))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .push_file(
            "dev1",
            FilePush::new("a.png", Cursor::new(png_bytes())).file_type(""),
        )
        .await
        .unwrap();
}
