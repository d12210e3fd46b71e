//! Event loop for the chat client
//!
//! One task owns the [`ChatClient`]. Socket events, UI commands and the
//! reconnect timer are handled one at a time, each to completion, so the
//! client needs no locking. UI code talks to the loop through a
//! [`ChatClientHandle`].

use crate::client::ChatClient;
use petshop_core::{Error, Result};
use petshop_networking::websocket::{
    ConnectionStatus, DisplaySink, EventReceiver, SendOutcome, Transport,
};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Command queue depth; UI input is human-paced
const COMMAND_BUFFER: usize = 64;

/// Snapshot returned by [`ChatClientHandle::status`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientStatus {
    pub connection: ConnectionStatus,
    pub identity: Option<String>,
}

/// Requests from the UI to the event loop
#[derive(Debug)]
pub enum ClientCommand {
    Connect,
    Disconnect,
    Login(String),
    Logout,
    Restore(String),
    Send {
        text: String,
        reply: oneshot::Sender<Result<SendOutcome>>,
    },
    Status {
        reply: oneshot::Sender<ClientStatus>,
    },
}

// ─── Handle ──────────────────────────────────────────────────────────

/// Cloneable handle to a running chat client
#[derive(Clone)]
pub struct ChatClientHandle {
    tx: mpsc::Sender<ClientCommand>,
    cancel: CancellationToken,
}

impl ChatClientHandle {
    async fn command(&self, command: ClientCommand) -> Result<()> {
        self.tx
            .send(command)
            .await
            .map_err(|_| Error::Unknown("chat client has stopped".to_string()))
    }

    /// Manual retry: supersede whatever connection exists
    pub async fn connect(&self) -> Result<()> {
        self.command(ClientCommand::Connect).await
    }

    pub async fn disconnect(&self) -> Result<()> {
        self.command(ClientCommand::Disconnect).await
    }

    pub async fn login(&self, identity: &str) -> Result<()> {
        self.command(ClientCommand::Login(identity.to_string())).await
    }

    pub async fn logout(&self) -> Result<()> {
        self.command(ClientCommand::Logout).await
    }

    pub async fn restore(&self, identity: &str) -> Result<()> {
        self.command(ClientCommand::Restore(identity.to_string())).await
    }

    /// Submit chat text and wait for the gate's verdict
    pub async fn send(&self, text: &str) -> Result<SendOutcome> {
        let (reply, rx) = oneshot::channel();
        self.command(ClientCommand::Send {
            text: text.to_string(),
            reply,
        })
        .await?;
        rx.await
            .map_err(|_| Error::Unknown("chat client dropped the request".to_string()))?
    }

    pub async fn status(&self) -> Result<ClientStatus> {
        let (reply, rx) = oneshot::channel();
        self.command(ClientCommand::Status { reply }).await?;
        rx.await
            .map_err(|_| Error::Unknown("chat client dropped the request".to_string()))
    }

    /// Close the chat and end the loop
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

// ─── Spawn ───────────────────────────────────────────────────────────

/// Spawn the event loop for `client`
///
/// `events` must be the receiver returned alongside `client` by
/// [`ChatClient::new`].
pub fn spawn_chat_client<T, S>(
    client: ChatClient<T, S>,
    events: EventReceiver,
) -> (ChatClientHandle, JoinHandle<()>)
where
    T: Transport + 'static,
    S: DisplaySink + Send + 'static,
{
    let cancel = CancellationToken::new();
    let (tx, rx) = mpsc::channel(COMMAND_BUFFER);

    let handle = ChatClientHandle {
        tx,
        cancel: cancel.clone(),
    };
    let task = tokio::spawn(client_loop(client, events, rx, cancel));

    (handle, task)
}

// ─── Loop ────────────────────────────────────────────────────────────

async fn client_loop<T, S>(
    mut client: ChatClient<T, S>,
    mut events: EventReceiver,
    mut commands: mpsc::Receiver<ClientCommand>,
    cancel: CancellationToken,
) where
    T: Transport,
    S: DisplaySink,
{
    info!("Chat client loop started");

    loop {
        let deadline = client.reconnect_deadline();

        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                client.disconnect();
                info!("Chat client cancelled, exiting");
                return;
            }
            Some(event) = events.recv() => {
                client.handle_event(event);
            }
            command = commands.recv() => match command {
                Some(command) => apply(&mut client, command),
                None => {
                    debug!("All chat handles dropped, exiting");
                    client.disconnect();
                    return;
                }
            },
            _ = wait_until(deadline) => {
                client.fire_due_reconnect(Instant::now());
            }
        }
    }
}

fn apply<T: Transport, S: DisplaySink>(client: &mut ChatClient<T, S>, command: ClientCommand) {
    match command {
        ClientCommand::Connect => {
            client.connect();
        }
        ClientCommand::Disconnect => client.disconnect(),
        ClientCommand::Login(identity) => client.login(&identity),
        ClientCommand::Logout => client.logout(),
        ClientCommand::Restore(identity) => client.restore(&identity),
        ClientCommand::Send { text, reply } => {
            let _ = reply.send(client.send(&text));
        }
        ClientCommand::Status { reply } => {
            let _ = reply.send(ClientStatus {
                connection: client.status(),
                identity: client.session().identity().map(str::to_string),
            });
        }
    }
}

/// Sleep until `deadline`, or forever when nothing is scheduled
async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
