//! Tokio runtime bridge.
//!
//! Runs a [`GameDriver`] on a single task. Commands arrive through an mpsc
//! channel and snapshots leave through a watch channel, so timer callbacks
//! and commands are serialized by construction.

use memory_match_content::ContentProvider;
use memory_match_core::types::Command;
use memory_match_core::SessionSnapshot;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

use crate::clock::TokioClock;
use crate::driver::GameDriver;
use crate::EngineError;

/// Commands buffered before senders wait.
pub const COMMAND_BUFFER: usize = 32;

/// Handle to a running session task.
#[derive(Debug)]
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<SessionSnapshot>,
    task: JoinHandle<()>,
}

/// Spawn `driver` on the current runtime. The first board is dealt by the task.
pub fn spawn_session<P>(driver: GameDriver<P, TokioClock>) -> SessionHandle
where
    P: ContentProvider + 'static,
{
    let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_BUFFER);
    let (snap_tx, snap_rx) = watch::channel(driver.snapshot());
    let task = tokio::spawn(run_session(driver, cmd_rx, snap_tx));

    SessionHandle {
        commands: cmd_tx,
        snapshots: snap_rx,
        task,
    }
}

impl SessionHandle {
    pub async fn send(&self, command: Command) -> Result<(), EngineError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| EngineError::Closed)
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    /// Wait until a published snapshot satisfies `predicate`.
    pub async fn wait_for(
        &self,
        predicate: impl FnMut(&SessionSnapshot) -> bool,
    ) -> Result<SessionSnapshot, EngineError> {
        let mut rx = self.snapshots.clone();
        let snapshot = rx.wait_for(predicate).await.map_err(|_| EngineError::Closed)?;
        Ok((*snapshot).clone())
    }

    /// Stop accepting commands and wait for the task to finish.
    pub async fn shutdown(self) -> Result<(), EngineError> {
        drop(self.commands);
        self.task.await?;
        Ok(())
    }
}

async fn run_session<P: ContentProvider>(
    mut driver: GameDriver<P, TokioClock>,
    mut commands: mpsc::Receiver<Command>,
    snapshots: watch::Sender<SessionSnapshot>,
) {
    let config = *driver.session().config();
    info!(
        mode = config.mode.as_str(),
        cards = config.card_count.cards(),
        "session task started"
    );

    driver.start().await;
    publish(&driver, &snapshots);

    loop {
        let deadline = driver.next_deadline();
        let wake_at = deadline.map_or_else(Instant::now, |ms| driver.clock().instant_at(ms));

        tokio::select! {
            command = commands.recv() => match command {
                Some(command) => driver.apply(command).await,
                None => break,
            },
            _ = sleep_until(wake_at), if deadline.is_some() => {
                driver.pump().await;
            }
        }
        publish(&driver, &snapshots);
    }

    debug!("session task stopped");
}

fn publish<P: ContentProvider>(
    driver: &GameDriver<P, TokioClock>,
    snapshots: &watch::Sender<SessionSnapshot>,
) {
    snapshots.send_modify(|snapshot| driver.snapshot_into(snapshot));
}
