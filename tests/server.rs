//! End-to-end tests against a real listener on an ephemeral port.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

use minimal_irc::{Server, Timeouts};

struct Client {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl Client {
    async fn connect(addr: SocketAddr) -> Self {
        let (read, writer) = TcpStream::connect(addr).await.unwrap().into_split();
        Self {
            reader: BufReader::new(read),
            writer,
        }
    }

    async fn send(&mut self, raw: &str) {
        self.writer.write_all(raw.as_bytes()).await.unwrap();
    }

    async fn recv(&mut self) -> String {
        let mut line = String::new();
        tokio::time::timeout(Duration::from_secs(5), self.reader.read_line(&mut line))
            .await
            .expect("timed out waiting for a reply")
            .unwrap();
        line
    }

    async fn recv_n(&mut self, n: usize) -> Vec<String> {
        let mut lines = Vec::with_capacity(n);
        for _ in 0..n {
            lines.push(self.recv().await);
        }
        lines
    }

    /// Register and consume the welcome burst
    async fn register(&mut self, nick: &str, user: &str) -> Vec<String> {
        self.send(&format!("NICK {nick}\r\nUSER {user} 0 * :{user}\r\n"))
            .await;
        self.recv_n(5).await
    }
}

async fn start_server() -> (SocketAddr, tokio::sync::broadcast::Sender<()>) {
    let server = Server::bind("127.0.0.1:0", Timeouts::from_secs(30, 5))
        .await
        .unwrap();
    let addr = server.local_addr().unwrap();
    let shutdown = server.shutdown_handle();
    tokio::spawn(server.run());
    (addr, shutdown)
}

fn burst(nick: &str, user: &str) -> Vec<String> {
    vec![
        format!(":server 001 {nick} :Welcome to the IRC Network {nick}!{user}@localhost\r\n"),
        format!(":server 002 {nick} :Your host is server, running minimal-irc\r\n"),
        format!(":server 003 {nick} :This server was created today\r\n"),
        format!(":server 004 {nick} server v0.1 o o\r\n"),
        "PING :12345\r\n".to_string(),
    ]
}

#[tokio::test]
async fn same_nick_registers_independently_on_two_connections() {
    let (addr, _shutdown) = start_server().await;

    let mut first = Client::connect(addr).await;
    let mut second = Client::connect(addr).await;

    // No shared registry: both sessions accept the same nick.
    let (a, b) = tokio::join!(first.register("twin", "one"), second.register("twin", "two"));
    assert_eq!(a, burst("twin", "one"));
    assert_eq!(b, burst("twin", "two"));

    first.send("JOIN #room\r\n").await;
    assert_eq!(
        first.recv_n(4).await,
        vec![
            ":twin!one@localhost JOIN #room\r\n",
            ":server 331 twin #room :No topic set\r\n",
            ":server 353 twin = #room :twin\r\n",
            ":server 366 twin #room :End of /NAMES list.\r\n",
        ]
    );

    // The other session sees nothing of the JOIN.
    second.send("PING check\r\n").await;
    assert_eq!(second.recv().await, "PONG check\r\n");
}

#[tokio::test]
async fn dropped_connection_does_not_affect_others() {
    let (addr, _shutdown) = start_server().await;

    let mut survivor = Client::connect(addr).await;
    {
        let mut doomed = Client::connect(addr).await;
        doomed.send("NICK gone\r\nUSER go").await;
        // Dropped mid-line.
    }

    survivor.send("FOO bar\r\n").await;
    assert_eq!(survivor.recv().await, ":server 421 * FOO :Unknown command\r\n");

    // New connections are still accepted.
    let mut late = Client::connect(addr).await;
    assert_eq!(late.register("late", "lt").await, burst("late", "lt"));
}

#[tokio::test]
async fn shutdown_closes_open_sessions() {
    let (addr, shutdown) = start_server().await;

    let mut client = Client::connect(addr).await;
    client.send("PING up\r\n").await;
    assert_eq!(client.recv().await, "PONG up\r\n");

    shutdown.send(()).unwrap();

    // The server side closes: the client reads EOF.
    let mut line = String::new();
    let n = tokio::time::timeout(Duration::from_secs(5), client.reader.read_line(&mut line))
        .await
        .expect("session stayed open after shutdown")
        .unwrap();
    assert_eq!(n, 0);
}
