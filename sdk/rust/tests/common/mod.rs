//! Shared helpers for integration tests.

use pushbullet::Pushbullet;
use wiremock::MockServer;

pub const API_KEY: &str = "o.test-key";

/// Client pointed at a mock server, authenticated with [`API_KEY`].
pub fn client_for(server: &MockServer) -> Pushbullet {
    Pushbullet::builder(API_KEY)
        .server(server.uri())
        .build()
        .expect("failed to build client")
}
