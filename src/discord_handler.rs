use std::sync::Arc;

use serenity::{
    all::{
        ActivityData, Context, EventHandler, Interaction, Message, OnlineStatus, Ready,
        ResumedEvent,
    },
    async_trait,
};

use page_turner::{
    config::ConfigSettings,
    discord_helpers::{command_response, register_command, session::Sessions},
    hey, yay,
};

use crate::commands;

pub(crate) struct Handler {
    pub config: Arc<ConfigSettings>,
    pub sessions: Sessions,
}

/// Splits `!help rest` into `("help", "rest")` when the message starts with the prefix.
pub fn parse_prefix_command<'a>(content: &'a str, prefix: &str) -> Option<(String, &'a str)> {
    let rest = content.trim_start().strip_prefix(prefix)?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        return None;
    }
    let (name, args) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    Some((name.to_lowercase(), args.trim()))
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        // Ignore messages from bots
        if msg.author.bot {
            return;
        }

        let Some((name, args)) = parse_prefix_command(&msg.content, &self.config.help.prefix)
        else {
            return;
        };

        // only help has a text form, everything else is a slash command
        if commands::find_command(&name).map(|info| info.name) == Some(commands::help::INFO.name) {
            commands::help::run_prefix(args, &ctx, &msg, &self.config, &self.sessions).await;
        }
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        // register commands
        for cmd in commands::register_all() {
            register_command(&ctx, cmd).await;
        }

        yay!("{} is connected!", ready.user.name);

        ctx.set_presence(
            Some(ActivityData::custom("Turning pages")),
            OnlineStatus::Online,
        );
    }

    async fn resume(&self, _: Context, _: ResumedEvent) {
        hey!("Resumed");
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        // button presses are picked up by the paginator sessions
        let Interaction::Command(command) = interaction else {
            return;
        };

        let command_options = &command.data.options();
        match command.data.name.as_str() {
            "help" => {
                commands::help::run(command_options, &ctx, &command, &self.config, &self.sessions)
                    .await;
            }
            "pages" => {
                commands::pages::run(command_options, &ctx, &command, &self.config, &self.sessions)
                    .await;
            }
            "ping" => {
                commands::ping::run(&ctx, &command).await;
            }
            _ => {
                command_response(&ctx, &command, "Unknown command!").await;
            }
        }
    }
}
