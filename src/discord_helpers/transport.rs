use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use serenity::{
    all::{
        ChannelId, CommandInteraction, ComponentInteraction, CreateInteractionResponse, Http,
        Message, MessageId, MessageReference,
    },
    async_trait,
};

use super::{page::PagePayload, PaginatorError};

/// The message a paginator is currently showing.
#[async_trait]
pub trait DisplayHandle: Send + Sync {
    fn id(&self) -> MessageId;
    async fn edit(&mut self, payload: &PagePayload) -> Result<(), PaginatorError>;
    async fn delete(&self) -> Result<(), PaginatorError>;
}

/// A plain command invocation, answered by sending a new message.
#[async_trait]
pub trait CommandContext: Send + Sync {
    async fn send(&self, payload: &PagePayload) -> Result<Box<dyn DisplayHandle>, PaginatorError>;
}

/// An interaction that still needs (or already has) a response.
#[async_trait]
pub trait InteractionContext: Send + Sync {
    fn is_response_started(&self) -> bool;
    async fn respond(&self, payload: &PagePayload) -> Result<(), PaginatorError>;
    async fn follow_up(
        &self,
        payload: &PagePayload,
    ) -> Result<Box<dyn DisplayHandle>, PaginatorError>;
    async fn original_response(&self) -> Result<Box<dyn DisplayHandle>, PaginatorError>;
}

/// A sent discord message.
pub struct MessageHandle {
    http: Arc<Http>,
    message: Message,
}

impl MessageHandle {
    pub fn new(http: Arc<Http>, message: Message) -> Self {
        Self { http, message }
    }
}

#[async_trait]
impl DisplayHandle for MessageHandle {
    fn id(&self) -> MessageId {
        self.message.id
    }

    async fn edit(&mut self, payload: &PagePayload) -> Result<(), PaginatorError> {
        self.message.edit(&self.http, payload.to_edit()).await?;
        Ok(())
    }

    async fn delete(&self) -> Result<(), PaginatorError> {
        self.message.delete(&self.http).await?;
        Ok(())
    }
}

/// Sends pages into a channel as a reply to the message that invoked the command.
pub struct ChannelContext {
    http: Arc<Http>,
    channel: ChannelId,
    reply_to: MessageReference,
}

impl ChannelContext {
    pub fn replying_to(http: Arc<Http>, msg: &Message) -> Self {
        Self {
            http,
            channel: msg.channel_id,
            reply_to: MessageReference::from(msg),
        }
    }
}

#[async_trait]
impl CommandContext for ChannelContext {
    async fn send(&self, payload: &PagePayload) -> Result<Box<dyn DisplayHandle>, PaginatorError> {
        let builder = payload
            .to_message()
            .reference_message(self.reply_to.clone());
        let msg = self.channel.send_message(&self.http, builder).await?;
        Ok(Box::new(MessageHandle::new(Arc::clone(&self.http), msg)))
    }
}

/// Answers a slash command with the first page.
pub struct InteractionResponder {
    http: Arc<Http>,
    command: CommandInteraction,
    responded: AtomicBool,
}

impl InteractionResponder {
    pub fn command(http: Arc<Http>, command: CommandInteraction) -> Self {
        Self {
            http,
            command,
            responded: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl InteractionContext for InteractionResponder {
    fn is_response_started(&self) -> bool {
        self.responded.load(Ordering::Relaxed)
    }

    async fn respond(&self, payload: &PagePayload) -> Result<(), PaginatorError> {
        let builder = CreateInteractionResponse::Message(payload.to_response());
        self.command.create_response(&self.http, builder).await?;
        self.responded.store(true, Ordering::Relaxed);
        Ok(())
    }

    async fn follow_up(
        &self,
        payload: &PagePayload,
    ) -> Result<Box<dyn DisplayHandle>, PaginatorError> {
        let msg = self
            .command
            .create_followup(&self.http, payload.to_followup())
            .await?;
        Ok(Box::new(MessageHandle::new(Arc::clone(&self.http), msg)))
    }

    async fn original_response(&self) -> Result<Box<dyn DisplayHandle>, PaginatorError> {
        let msg = self.command.get_response(&self.http).await?;
        Ok(Box::new(MessageHandle::new(Arc::clone(&self.http), msg)))
    }
}

/// A press of one of the paginator's buttons.
///
/// Every press has to be answered. Page turns answer it by updating the message the button
/// sits on, anything else just acknowledges it.
#[async_trait]
pub trait ButtonPress: Send + Sync {
    fn custom_id(&self) -> &str;
    async fn update(&self, payload: &PagePayload) -> Result<(), PaginatorError>;
    async fn acknowledge(&self) -> Result<(), PaginatorError>;
}

/// A button press delivered by the gateway.
pub struct PressResponder {
    http: Arc<Http>,
    press: ComponentInteraction,
}

impl PressResponder {
    pub fn new(http: Arc<Http>, press: ComponentInteraction) -> Self {
        Self { http, press }
    }
}

#[async_trait]
impl ButtonPress for PressResponder {
    fn custom_id(&self) -> &str {
        &self.press.data.custom_id
    }

    async fn update(&self, payload: &PagePayload) -> Result<(), PaginatorError> {
        let builder = CreateInteractionResponse::UpdateMessage(payload.to_update());
        self.press.create_response(&self.http, builder).await?;
        Ok(())
    }

    async fn acknowledge(&self) -> Result<(), PaginatorError> {
        self.press.defer(&self.http).await?;
        Ok(())
    }
}
