use serenity::all::{
    Command, CommandInteraction, Context, CreateCommand, CreateInteractionResponse,
    CreateInteractionResponseMessage,
};
use thiserror::Error;

use crate::nay;

pub mod multipage_embed;
pub mod page;
pub mod session;
#[cfg(test)]
pub(crate) mod testing;
pub mod transport;

pub use multipage_embed::{Direction, Invocation, Paginator, PaginatorOptions};
pub use page::{Page, PagePayload};

#[derive(Debug, Error)]
pub enum PaginatorError {
    /// `start` needs exactly one of a command or an interaction to bind to.
    #[error("a paginator can only be started from exactly one command or interaction")]
    InvalidInvocation,
    #[error("page lists may only contain embeds, found {found} at position {index}")]
    InvalidPageFormat { index: usize, found: &'static str },
    #[error("cannot go {0} from here")]
    AtBoundary(Direction),
    #[error("the paginator has not been started")]
    NotStarted,
    #[error("the paginator has already been stopped")]
    Stopped,
    #[error("discord request failed: {0}")]
    Transport(#[from] serenity::Error),
}

pub async fn command_response<S: Into<String>>(
    ctx: &Context,
    command: &CommandInteraction,
    msg: S,
) {
    let data = CreateInteractionResponseMessage::new().content(msg.into());
    let builder = CreateInteractionResponse::Message(data);
    if let Err(err) = command.create_response(&ctx.http, builder).await {
        nay!("Failed to respond to command: {}", err)
    }
}

pub async fn register_command(ctx: &Context, cmd: CreateCommand) {
    if let Err(e) = Command::create_global_command(&ctx.http, cmd).await {
        nay!("Failed to register a command: {}", e);
    }
}
