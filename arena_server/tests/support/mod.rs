// Shared primitives for one-time server bootstrapping across integration tests.
use std::{
    path::PathBuf,
    sync::{Arc, OnceLock},
    time::Duration,
};

use futures::StreamExt;
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

// Body of the placeholder client page served by the test server.
pub const INDEX_HTML: &str = "<!doctype html><title>arena</title>";

// Global host:port used by all tests after the server publishes its bound address.
static SERVER_ADDR: OnceLock<String> = OnceLock::new();
// One-time guard that ensures the server bootstrap path runs only once.
static SERVER_READY: OnceLock<()> = OnceLock::new();

// Ensure the test server is running and return its host:port.
pub fn ensure_server() -> &'static str {
    SERVER_READY.get_or_init(|| {
        let static_dir = write_static_dir();
        let published_addr = Arc::new(OnceLock::<String>::new());
        let published_addr_thread = Arc::clone(&published_addr);
        // Spawn an OS thread so the server outlives individual `#[tokio::test]` runtimes.
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("test runtime");
            runtime.block_on(async move {
                // Bind to an ephemeral port to avoid collisions with local services.
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind ephemeral test port");
                let addr = listener.local_addr().expect("get local addr");
                let _ = published_addr_thread.set(addr.to_string());
                arena_server::run_with_static_dir(listener, static_dir)
                    .await
                    .expect("server failed");
            });
        });
        wait_for_server_addr_and_readiness(published_addr);
    });

    SERVER_ADDR
        .get()
        .expect("server addr should be initialized")
        .as_str()
}

// Static assets live in a per-process temp dir so tests never depend on the checkout layout.
fn write_static_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("arena-static-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create static dir");
    std::fs::write(dir.join("index.html"), INDEX_HTML).expect("write index.html");
    dir
}

fn wait_for_server_addr_and_readiness(published_addr: Arc<OnceLock<String>>) {
    let addr = loop {
        if let Some(addr) = published_addr.get() {
            break addr.clone();
        }
        std::thread::sleep(Duration::from_millis(10));
    };

    let _ = SERVER_ADDR.set(addr.clone());

    // Retry for a short period to avoid racing server bind/accept.
    for _ in 0..100 {
        if std::net::TcpStream::connect(&addr).is_ok() {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }

    panic!("server did not become ready in time");
}

pub async fn connect() -> Client {
    let url = format!("ws://{}/ws", ensure_server());
    let (client, _response) = connect_async(url).await.expect("websocket connect");
    client
}

// Next JSON text message, skipping control frames.
pub async fn next_json(client: &mut Client) -> Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), client.next())
            .await
            .expect("timed out waiting for a message")
            .expect("stream ended")
            .expect("websocket error");
        if let Message::Text(_) = msg {
            let text = msg.to_text().expect("text frame");
            return serde_json::from_str(text).expect("server sent invalid json");
        }
    }
}

// Reads game states until one satisfies `predicate`.
pub async fn wait_for_state<F>(client: &mut Client, mut predicate: F) -> Value
where
    F: FnMut(&Value) -> bool,
{
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        assert!(
            tokio::time::Instant::now() < deadline,
            "no matching game state in time"
        );
        let msg = next_json(client).await;
        if msg["type"] == "gameState" && predicate(&msg["data"]) {
            return msg["data"].clone();
        }
    }
}

// Connects and consumes the welcome message, returning the assigned player id.
pub async fn join() -> (Client, String) {
    let mut client = connect().await;
    let welcome = next_json(&mut client).await;
    assert_eq!(welcome["type"], "welcome", "first message must be welcome");
    let player_id = welcome["data"]["playerId"]
        .as_str()
        .expect("welcome carries a player id")
        .to_string();
    (client, player_id)
}
