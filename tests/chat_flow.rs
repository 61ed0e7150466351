//! End-to-end chat scenarios against a served ephemeral port.

use chat_server::{serve, AppState, Config, MemoryStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::time::{timeout, Duration};
use uuid::Uuid;

async fn start_server() -> (SocketAddr, oneshot::Sender<()>) {
    let config = Config {
        server_ip: "127.0.0.1".to_owned(),
        server_port: "0".to_owned(),
        database_url: None,
        storage_directory: std::env::temp_dir()
            .join(format!("chat-e2e-{}", Uuid::new_v4()))
            .to_string_lossy()
            .into_owned(),
        client_channel_capacity: 16,
    };
    let state = AppState::new(config, Arc::new(MemoryStore::new()));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (stop_tx, stop_rx) = oneshot::channel();
    tokio::spawn(serve(state, listener, async {
        let _ = stop_rx.await;
    }));

    (addr, stop_tx)
}

struct TestClient {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl TestClient {
    async fn connect(addr: SocketAddr) -> Self {
        let socket = TcpStream::connect(addr).await.unwrap();
        let (read_half, writer) = socket.into_split();
        Self {
            lines: BufReader::new(read_half).lines(),
            writer,
        }
    }

    async fn send(&mut self, line: &str) {
        self.writer
            .write_all(format!("{}\n", line).as_bytes())
            .await
            .unwrap();
    }

    async fn recv(&mut self) -> String {
        timeout(Duration::from_secs(5), self.lines.next_line())
            .await
            .expect("timed out waiting for a line")
            .expect("read failed")
            .expect("connection closed")
    }

    async fn expect(&mut self, line: &str) {
        assert_eq!(self.recv().await, line);
    }

    async fn expect_closed(&mut self) {
        let next = timeout(Duration::from_secs(5), self.lines.next_line())
            .await
            .expect("timed out waiting for the close");
        assert!(matches!(next, Ok(None) | Err(_)), "got {:?}", next);
    }

    /// Run the whole handshake and consume the join announcement
    async fn join(addr: SocketAddr, name: &str, role: &str) -> Self {
        let mut client = Self::connect(addr).await;
        client.expect("Enter your name: ").await;
        client.send(name).await;
        client.expect("Enter your password: ").await;
        client.send("secret").await;
        client.expect("Enter your role (admin or guest): ").await;
        client.send(role).await;
        client.expect("User sign up successfully").await;
        client.expect(&format!("{} joined", name)).await;
        client
    }
}

#[tokio::test]
async fn handshake_reprompts_bad_roles_and_signs_up() {
    let (addr, _stop) = start_server().await;

    let mut alice = TestClient::connect(addr).await;
    alice.expect("Enter your name: ").await;
    alice.send("alice").await;
    alice.expect("Enter your password: ").await;
    alice.send("secret").await;
    alice.expect("Enter your role (admin or guest): ").await;
    alice.send("superuser").await;
    alice.expect("Such role doesn't exist").await;
    alice.send("guest").await;
    alice.expect("User sign up successfully").await;
    alice.expect("alice joined").await;
}

#[tokio::test]
async fn returning_user_signs_in() {
    let (addr, _stop) = start_server().await;

    let mut alice = TestClient::join(addr, "alice", "guest").await;
    alice.send("/exit").await;
    alice.expect_closed().await;

    let mut alice = TestClient::connect(addr).await;
    alice.expect("Enter your name: ").await;
    alice.send("alice").await;
    alice.expect("Enter your password: ").await;
    alice.send("secret").await;
    alice.expect("Enter your role (admin or guest): ").await;
    alice.send("guest").await;
    alice.expect("User sign in successfully").await;
    alice.expect("alice joined").await;
}

#[tokio::test]
async fn chat_lines_are_broadcast_with_timestamps() {
    let (addr, _stop) = start_server().await;

    let mut alice = TestClient::join(addr, "alice", "guest").await;
    let mut bob = TestClient::join(addr, "bob", "guest").await;
    alice.expect("bob joined").await;

    alice.send("hello everyone").await;

    let line = bob.recv().await;
    assert!(line.ends_with(" alice: hello everyone"), "got {:?}", line);
    // 2006-01-02 15:04:05 layout in front of the sender
    assert_eq!(line.find(" alice:"), Some(19));
    // the sender hears the broadcast as well
    assert_eq!(alice.recv().await, line);
}

#[tokio::test]
async fn private_messages_and_roster_blocks() {
    let (addr, _stop) = start_server().await;

    let mut alice = TestClient::join(addr, "alice", "guest").await;
    let mut bob = TestClient::join(addr, "bob", "admin").await;
    alice.expect("bob joined").await;

    alice.send("/msg bob hello").await;
    bob.expect("Private message from alice: hello").await;

    alice.send("/list").await;
    alice.expect("=== Registered users ===").await;
    alice.expect("• alice (guest)").await;
    alice.expect("• bob (admin)").await;
    alice.expect("Total: 2").await;
    alice.expect("=== Active participants ===").await;
    let mut active = vec![alice.recv().await, alice.recv().await];
    active.sort();
    assert_eq!(active, ["• alice (guest)", "• bob (admin)"]);
    alice.expect("Total: 2").await;
}

#[tokio::test]
async fn unknown_recipient_notifies_the_sender_only() {
    let (addr, _stop) = start_server().await;

    let mut alice = TestClient::join(addr, "alice", "guest").await;
    let mut bob = TestClient::join(addr, "bob", "guest").await;
    alice.expect("bob joined").await;

    alice.send("/msg nobody hi").await;
    alice.expect("User not found").await;

    // bob saw nothing; the next line he receives is a regular broadcast
    alice.send("ping").await;
    let line = bob.recv().await;
    assert!(line.ends_with(" alice: ping"), "got {:?}", line);
}

#[tokio::test]
async fn malformed_commands_get_usage_notices() {
    let (addr, _stop) = start_server().await;

    let mut alice = TestClient::join(addr, "alice", "guest").await;
    alice.send("/msg bob").await;
    alice.expect("Usage: /msg <name> <message>").await;
    alice.send("/kick").await;
    alice.expect("Usage: /kick <name>").await;
}

#[tokio::test]
async fn guests_may_not_kick() {
    let (addr, _stop) = start_server().await;

    let mut alice = TestClient::join(addr, "alice", "guest").await;
    let mut bob = TestClient::join(addr, "bob", "admin").await;
    alice.expect("bob joined").await;

    alice.send("/kick bob").await;
    alice.expect("You don't have enough rights").await;

    // bob is still registered and reachable
    alice.send("/msg bob still there").await;
    bob.expect("Private message from alice: still there").await;
}

#[tokio::test]
async fn admin_kick_disconnects_and_announces_once() {
    let (addr, _stop) = start_server().await;

    let mut alice = TestClient::join(addr, "alice", "guest").await;
    let mut bob = TestClient::join(addr, "bob", "admin").await;
    alice.expect("bob joined").await;

    bob.send("/kick alice").await;
    bob.expect("User is deleted").await;
    alice.expect_closed().await;

    bob.expect("alice left the chat").await;
    // exactly once: the next line bob sees is his own probe broadcast
    bob.send("ping").await;
    let line = bob.recv().await;
    assert!(line.ends_with(" bob: ping"), "got {:?}", line);
}

#[tokio::test]
async fn exit_announces_the_departure_to_the_others() {
    let (addr, _stop) = start_server().await;

    let mut alice = TestClient::join(addr, "alice", "guest").await;
    let mut bob = TestClient::join(addr, "bob", "guest").await;
    alice.expect("bob joined").await;

    alice.send("/exit").await;
    alice.expect_closed().await;
    bob.expect("alice left the chat").await;
}

#[tokio::test]
async fn dropped_connection_announces_the_departure() {
    let (addr, _stop) = start_server().await;

    let alice = TestClient::join(addr, "alice", "guest").await;
    let mut bob = TestClient::join(addr, "bob", "guest").await;

    drop(alice);
    bob.expect("alice left the chat").await;
}
