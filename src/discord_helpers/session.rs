use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use serenity::{
    all::{ComponentInteractionCollector, Context, MessageId},
    async_trait,
};
use tokio::{sync::watch, task::JoinHandle};

use super::{
    multipage_embed::{Direction, PageFormatter, Paginator},
    transport::{ButtonPress, PressResponder},
    PaginatorError,
};
use crate::{hey, nay};

/// Ends running sessions from the outside. Clones share the same signal.
#[derive(Clone)]
pub struct StopSignal(Arc<watch::Sender<bool>>);

impl StopSignal {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self(Arc::new(sender))
    }

    pub fn stop(&self) {
        self.0.send_replace(true);
    }

    pub fn is_stopped(&self) -> bool {
        *self.0.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.0.subscribe()
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    TimedOut,
    Stopped,
}

/// Where button presses on a paginated message come from.
#[async_trait]
pub trait PressSource: Send {
    type Press: ButtonPress + 'static;

    /// Waits for the next press on `message`. `None` once `timeout` passes without one,
    /// or when presses can no longer arrive.
    async fn next_press(
        &mut self,
        message: MessageId,
        timeout: Option<Duration>,
    ) -> Option<Self::Press>;
}

/// Presses collected from the gateway.
pub struct CollectorPresses {
    ctx: Context,
}

impl CollectorPresses {
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl PressSource for CollectorPresses {
    type Press = PressResponder;

    async fn next_press(
        &mut self,
        message: MessageId,
        timeout: Option<Duration>,
    ) -> Option<PressResponder> {
        // a fresh collector per press, so the timeout restarts after every interaction
        let mut collector = ComponentInteractionCollector::new(&self.ctx.shard).message_id(message);
        if let Some(timeout) = timeout {
            collector = collector.timeout(timeout);
        }
        // the collector also ends when the shard goes away
        let press = collector.next().await?;
        Some(PressResponder::new(Arc::clone(&self.ctx.http), press))
    }
}

/// Drives a started paginator: turns button presses into page changes until the timeout runs out
/// or the session is stopped, then closes the paginator.
pub struct PaginatorSession<F: PageFormatter> {
    paginator: Paginator<F>,
    stop: watch::Receiver<bool>,
}

impl<F: PageFormatter + 'static> PaginatorSession<F> {
    pub fn new(paginator: Paginator<F>, signal: &StopSignal) -> Self {
        Self {
            paginator,
            stop: signal.subscribe(),
        }
    }

    pub async fn run<S: PressSource>(mut self, mut presses: S) -> StopReason {
        let reason = self.listen(&mut presses).await;

        if let Err(e) = self.paginator.close().await {
            nay!("Failed to clean up paginated message: {}", e);
        }
        reason
    }

    async fn listen<S: PressSource>(&mut self, presses: &mut S) -> StopReason {
        let Some(message_id) = self.paginator.message_id() else {
            hey!("Paginator session started before the paginator was shown");
            return StopReason::Stopped;
        };
        let timeout = self.paginator.timeout();

        loop {
            let press = tokio::select! {
                press = presses.next_press(message_id, timeout) => press,
                _ = stopped(&mut self.stop) => return StopReason::Stopped,
            };

            let Some(press) = press else {
                return StopReason::TimedOut;
            };

            self.handle_press(&press).await;
        }
    }

    async fn handle_press(&mut self, press: &dyn ButtonPress) {
        let Some(direction) = Direction::from_custom_id(press.custom_id()) else {
            hey!("Unknown paginator button: {}", press.custom_id());
            acknowledge(press).await;
            return;
        };

        match self.paginator.navigate_from(direction, press).await {
            Ok(()) => {}
            Err(PaginatorError::AtBoundary(direction)) => {
                hey!("Ignored stale page button, cannot go {}", direction);
                acknowledge(press).await;
            }
            Err(e) => {
                nay!("Failed to turn the page: {}", e);
                acknowledge(press).await;
            }
        }
    }
}

/// Resolves once the signal is raised. A signal nobody can raise anymore never resolves.
async fn stopped(stop: &mut watch::Receiver<bool>) {
    if stop.wait_for(|stopped| *stopped).await.is_err() {
        std::future::pending::<()>().await;
    }
}

async fn acknowledge(press: &dyn ButtonPress) {
    if let Err(e) = press.acknowledge().await {
        nay!("Failed to acknowledge page button: {}", e);
    }
}

/// Keeps track of every running session so they can all be wound down on shutdown.
#[derive(Clone, Default)]
pub struct Sessions {
    signal: StopSignal,
    running: Arc<Mutex<Vec<JoinHandle<StopReason>>>>,
}

impl Sessions {
    /// Runs a started paginator on its own task, listening for presses on the gateway.
    pub fn spawn<F: PageFormatter + 'static>(&self, ctx: Context, paginator: Paginator<F>) {
        self.spawn_with(CollectorPresses::new(ctx), paginator);
    }

    pub fn spawn_with<F, S>(&self, presses: S, paginator: Paginator<F>)
    where
        F: PageFormatter + 'static,
        S: PressSource + 'static,
    {
        if self.signal.is_stopped() {
            hey!("Shutting down, not starting another paginator session");
            return;
        }

        let session = PaginatorSession::new(paginator, &self.signal);
        let task = tokio::spawn(session.run(presses));

        let Ok(mut running) = self.running.lock() else {
            nay!("Session list is poisoned, the new session will not be tracked");
            return;
        };
        running.retain(|task| !task.is_finished());
        running.push(task);
    }

    pub fn running(&self) -> usize {
        self.running
            .lock()
            .map(|running| running.iter().filter(|task| !task.is_finished()).count())
            .unwrap_or(0)
    }

    /// Stops every session and waits until their messages are cleaned up.
    pub async fn shutdown(&self) {
        self.signal.stop();

        let tasks = match self.running.lock() {
            Ok(mut running) => std::mem::take(&mut *running),
            Err(_) => {
                nay!("Session list is poisoned, not waiting for sessions to finish");
                return;
            }
        };

        for task in tasks {
            if let Err(e) = task.await {
                nay!("Paginator session crashed: {}", e);
            }
        }
    }
}
