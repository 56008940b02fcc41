use serenity::all::{CommandInteraction, Context, CreateCommand};

use super::CommandInfo;
use page_turner::discord_helpers::command_response;

pub const INFO: CommandInfo = CommandInfo {
    name: "ping",
    description: "Check that the bot is listening",
    signature: "",
    aliases: &[],
    has_subcommands: false,
};

pub async fn run(ctx: &Context, cmd: &CommandInteraction) {
    command_response(ctx, cmd, "Pong!").await;
}

pub fn register() -> CreateCommand {
    CreateCommand::new(INFO.name)
        .description(INFO.description)
        .dm_permission(true)
}
