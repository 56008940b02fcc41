//! In-memory transport that records what the paginator would have sent to discord.

use std::{
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use serenity::{all::MessageId, async_trait};
use tokio::sync::mpsc;

use super::{
    page::PagePayload,
    session::PressSource,
    transport::{ButtonPress, CommandContext, DisplayHandle, InteractionContext},
    PaginatorError,
};

#[derive(Debug, Clone)]
pub enum Call {
    Send(PagePayload),
    Respond(PagePayload),
    FollowUp(PagePayload),
    Edit(u64, PagePayload),
    Delete(u64),
    Update(PagePayload),
    Ack(String),
}

#[derive(Default, Clone)]
pub struct Log {
    calls: Arc<Mutex<Vec<Call>>>,
    next_id: Arc<AtomicU64>,
}

impl Log {
    pub fn push(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn handle(&self) -> Box<dyn DisplayHandle> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        Box::new(FakeHandle {
            id,
            log: self.clone(),
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// the payload last put on screen
    pub fn shown(&self) -> PagePayload {
        match self.calls().last() {
            Some(
                Call::Send(p)
                | Call::Respond(p)
                | Call::FollowUp(p)
                | Call::Edit(_, p)
                | Call::Update(p),
            ) => p.clone(),
            other => panic!("nothing shown, last call was {other:?}"),
        }
    }
}

pub struct FakeHandle {
    id: u64,
    log: Log,
}

#[async_trait]
impl DisplayHandle for FakeHandle {
    fn id(&self) -> MessageId {
        MessageId::new(self.id)
    }

    async fn edit(&mut self, payload: &PagePayload) -> Result<(), PaginatorError> {
        self.log.push(Call::Edit(self.id, payload.clone()));
        Ok(())
    }

    async fn delete(&self) -> Result<(), PaginatorError> {
        self.log.push(Call::Delete(self.id));
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeChannel {
    pub log: Log,
}

#[async_trait]
impl CommandContext for FakeChannel {
    async fn send(&self, payload: &PagePayload) -> Result<Box<dyn DisplayHandle>, PaginatorError> {
        self.log.push(Call::Send(payload.clone()));
        Ok(self.log.handle())
    }
}

#[derive(Default)]
pub struct FakeInteraction {
    pub log: Log,
    pub started: AtomicBool,
}

#[async_trait]
impl InteractionContext for FakeInteraction {
    fn is_response_started(&self) -> bool {
        self.started.load(Ordering::Relaxed)
    }

    async fn respond(&self, payload: &PagePayload) -> Result<(), PaginatorError> {
        self.started.store(true, Ordering::Relaxed);
        self.log.push(Call::Respond(payload.clone()));
        Ok(())
    }

    async fn follow_up(
        &self,
        payload: &PagePayload,
    ) -> Result<Box<dyn DisplayHandle>, PaginatorError> {
        self.log.push(Call::FollowUp(payload.clone()));
        Ok(self.log.handle())
    }

    async fn original_response(&self) -> Result<Box<dyn DisplayHandle>, PaginatorError> {
        Ok(self.log.handle())
    }
}

pub struct FakePress {
    custom_id: String,
    log: Log,
}

impl FakePress {
    pub fn new(log: &Log, custom_id: &str) -> Self {
        Self {
            custom_id: custom_id.to_string(),
            log: log.clone(),
        }
    }
}

#[async_trait]
impl ButtonPress for FakePress {
    fn custom_id(&self) -> &str {
        &self.custom_id
    }

    async fn update(&self, payload: &PagePayload) -> Result<(), PaginatorError> {
        self.log.push(Call::Update(payload.clone()));
        Ok(())
    }

    async fn acknowledge(&self) -> Result<(), PaginatorError> {
        self.log.push(Call::Ack(self.custom_id.clone()));
        Ok(())
    }
}

/// Presses fed in by the test. Ends when the sender is dropped or the timeout runs out.
pub struct QueuedPresses(pub mpsc::UnboundedReceiver<FakePress>);

#[async_trait]
impl PressSource for QueuedPresses {
    type Press = FakePress;

    async fn next_press(
        &mut self,
        _message: MessageId,
        timeout: Option<Duration>,
    ) -> Option<FakePress> {
        match timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.0.recv())
                .await
                .ok()
                .flatten(),
            None => self.0.recv().await,
        }
    }
}
