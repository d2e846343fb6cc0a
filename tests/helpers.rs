// Shared helpers for the integration tests: a local JRD server and a client
// configured to talk to it.

use std::time::Duration;

use webfinger_client::{Config, WebFinger};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const JRD_MEDIA_TYPE: &str = "application/jrd+json";

/// A JRD with one profile, two avatars and a display name.
pub const USER_JRD: &str = r#"{
    "subject": "acct:test@localhost",
    "aliases": ["http://localhost/~test"],
    "links": [
        {"rel": "http://webfinger.net/rel/profile-page", "href": "https://example.com/profile"},
        {"rel": "http://webfinger.net/rel/avatar", "href": "https://example.com/avatar.png", "type": "image/png"},
        {"rel": "http://webfinger.net/rel/avatar", "href": "https://example.com/avatar-2.png"},
        {"rel": "remotestorage", "href": "https://storage.example.com/test", "properties": {"http://remotestorage.io/spec/version": "draft-dejong-remotestorage-22"}}
    ],
    "properties": {"http://packetizer.com/ns/name": "Test User"}
}"#;

/// Client settings for a plain-http server on the loopback interface.
#[allow(dead_code)]
pub fn local_config() -> Config {
    Config {
        tls_only: false,
        allow_private_addresses: true,
        request_timeout: Duration::from_secs(5),
        ..Config::default()
    }
}

#[allow(dead_code)]
pub fn local_client(config: Config) -> WebFinger {
    WebFinger::new(config).expect("Failed to build WebFinger client")
}

/// `test@localhost:{port}` for the given mock server.
#[allow(dead_code)]
pub fn local_address(server: &MockServer) -> String {
    format!("test@localhost:{}", server.address().port())
}

/// The `resource` value the client sends for [`local_address`].
#[allow(dead_code)]
pub fn local_resource(server: &MockServer) -> String {
    format!("acct:{}", local_address(server))
}

#[allow(dead_code)]
pub fn jrd_response(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), JRD_MEDIA_TYPE)
}

#[allow(dead_code)]
pub fn redirect_response(location: &str) -> ResponseTemplate {
    ResponseTemplate::new(302).insert_header("Location", location)
}

/// Serves `body` at `/.well-known/{endpoint}` for the local address.
#[allow(dead_code)]
pub async fn mount_jrd(server: &MockServer, endpoint: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/.well-known/{endpoint}")))
        .and(query_param("resource", local_resource(server)))
        .respond_with(jrd_response(body))
        .mount(server)
        .await;
}
