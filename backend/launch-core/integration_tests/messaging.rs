use crate::helpers::{SETTLE_TIMEOUT, endpoint, recording_handler, unique_key};

use launch_core::ipc::{MessageClient, start_message_server};

use common::Message;

use std::time::{Duration, Instant};

use tempfile::TempDir;
use tokio::time::timeout;

const IPC_TIMEOUT: Duration = Duration::from_millis(300);

/// **VALUE**: A sent message reaches the handler once, byte for byte.
///
/// **BUG THIS CATCHES**: Lossy decoding (trimming, re-encoding) or the server
/// re-reading a connection it already handled.
#[tokio::test]
async fn given_listening_server_when_client_sends_then_delivered_once_and_byte_identical() {
    // GIVEN: A server with a recording handler
    let dir = TempDir::new().expect("temp dir");
    let endpoint = endpoint(dir.path(), &unique_key("deliver"));
    let (handler, mut delivered) = recording_handler();
    let server = start_message_server(&endpoint, handler, IPC_TIMEOUT)
        .await
        .expect("server should start");

    // WHEN: Sending a non-ASCII message with surrounding whitespace
    let message = Message::new("  réseau maillé ✓\n").expect("valid message");
    let client = MessageClient::new(endpoint.clone(), IPC_TIMEOUT);
    assert!(client.send(&message).await, "send should succeed");

    // THEN: Delivered exactly once, identical bytes
    let received = timeout(SETTLE_TIMEOUT, delivered.recv())
        .await
        .expect("message should arrive")
        .expect("handler channel open");
    assert_eq!(received.as_bytes(), message.as_bytes());
    assert!(
        timeout(Duration::from_millis(200), delivered.recv()).await.is_err(),
        "message must not be delivered twice"
    );

    server.stop().await;
}

/// **VALUE**: Messages from successive clients arrive in send order.
#[tokio::test]
async fn given_several_clients_when_sending_in_sequence_then_arrival_order_kept() {
    // GIVEN: A running server
    let dir = TempDir::new().expect("temp dir");
    let endpoint = endpoint(dir.path(), &unique_key("order"));
    let (handler, mut delivered) = recording_handler();
    let server = start_message_server(&endpoint, handler, IPC_TIMEOUT)
        .await
        .expect("server should start");

    // WHEN: Three clients send one after another
    for text in ["first", "second", "third"] {
        let client = MessageClient::new(endpoint.clone(), IPC_TIMEOUT);
        assert!(client.send(&Message::new(text).expect("valid")).await);
    }

    // THEN: Same order at the handler
    let mut received = Vec::new();
    for _ in 0..3 {
        let message = timeout(SETTLE_TIMEOUT, delivered.recv())
            .await
            .expect("message should arrive")
            .expect("handler channel open");
        received.push(message.as_str().to_string());
    }
    assert_eq!(received, ["first", "second", "third"]);

    server.stop().await;
}

/// **VALUE**: With nobody listening the client gives up within its timeout.
///
/// **WHY THIS MATTERS**: A secondary launched while the primary is dying must
/// exit promptly instead of hanging the user's shell.
#[tokio::test]
async fn given_no_listener_when_client_sends_then_false_within_timeout() {
    // GIVEN: An endpoint nobody serves
    let dir = TempDir::new().expect("temp dir");
    let endpoint = endpoint(dir.path(), &unique_key("absent"));
    let client = MessageClient::new(endpoint, IPC_TIMEOUT);

    // WHEN: Sending
    let started = Instant::now();
    let sent = client.send(&Message::show_main()).await;

    // THEN: Failure reported, bounded by the timeout plus slack
    assert!(!sent);
    assert!(started.elapsed() < IPC_TIMEOUT + Duration::from_secs(1));
}

#[tokio::test]
async fn given_stopped_server_when_client_sends_then_false() {
    // GIVEN: A server that was started then stopped
    let dir = TempDir::new().expect("temp dir");
    let endpoint = endpoint(dir.path(), &unique_key("stopped"));
    let (handler, _delivered) = recording_handler();
    let server = start_message_server(&endpoint, handler, IPC_TIMEOUT)
        .await
        .expect("server should start");
    server.stop().await;

    // WHEN/THEN: Nobody answers any more
    let client = MessageClient::new(endpoint, IPC_TIMEOUT);
    assert!(!client.send(&Message::show_main()).await);
}

#[cfg(unix)]
mod raw_connections {
    use super::*;

    use tokio::io::AsyncWriteExt;
    use tokio::net::UnixStream;

    /// **VALUE**: A peer that connects and never writes cannot wedge the server.
    ///
    /// **BUG THIS CATCHES**: An unbounded read that blocks every later message
    /// because connections are served one at a time.
    #[tokio::test]
    async fn given_silent_connection_when_read_times_out_then_next_message_delivered() {
        // GIVEN: A server and a connection that stays silent
        let dir = TempDir::new().expect("temp dir");
        let endpoint = endpoint(dir.path(), &unique_key("silent"));
        let (handler, mut delivered) = recording_handler();
        let server = start_message_server(&endpoint, handler, IPC_TIMEOUT)
            .await
            .expect("server should start");
        let _silent = UnixStream::connect(endpoint.socket_path())
            .await
            .expect("raw connect");

        // WHEN: A real client sends while the silent one is being read
        let client = MessageClient::new(endpoint.clone(), Duration::from_secs(2));
        assert!(client.send(&Message::new("after").expect("valid")).await);

        // THEN: The message still arrives once the silent read has timed out
        let received = timeout(SETTLE_TIMEOUT, delivered.recv())
            .await
            .expect("message should arrive")
            .expect("handler channel open");
        assert_eq!(received.as_str(), "after");

        server.stop().await;
    }

    /// **VALUE**: Invalid UTF-8 is dropped without taking the server down.
    #[tokio::test]
    async fn given_non_utf8_payload_when_received_then_discarded_and_server_continues() {
        // GIVEN: A running server
        let dir = TempDir::new().expect("temp dir");
        let endpoint = endpoint(dir.path(), &unique_key("garbage"));
        let (handler, mut delivered) = recording_handler();
        let server = start_message_server(&endpoint, handler, IPC_TIMEOUT)
            .await
            .expect("server should start");

        // WHEN: Raw invalid bytes are sent, then a valid message
        let mut raw = UnixStream::connect(endpoint.socket_path())
            .await
            .expect("raw connect");
        raw.write_all(&[0xff, 0xfe, 0xfd]).await.expect("raw write");
        raw.shutdown().await.expect("raw shutdown");
        drop(raw);

        let client = MessageClient::new(endpoint.clone(), IPC_TIMEOUT);
        assert!(client.send(&Message::show_main()).await);

        // THEN: Only the valid message is delivered
        let received = timeout(SETTLE_TIMEOUT, delivered.recv())
            .await
            .expect("message should arrive")
            .expect("handler channel open");
        assert_eq!(received, Message::show_main());

        server.stop().await;
    }
}
