use std::{num::NonZeroUsize, sync::Arc};

use serenity::all::{
    CommandInteraction, CommandOptionType, Context, CreateCommand, CreateCommandOption,
    CreateEmbed, CreateEmbedFooter, CreateInteractionResponse, CreateInteractionResponseMessage,
    CreateMessage, Message, ResolvedOption, ResolvedValue,
};

use super::{find_command, CommandInfo, COMMANDS};
use page_turner::{
    config::ConfigSettings,
    discord_helpers::{
        command_response,
        multipage_embed::AsIs,
        session::Sessions,
        transport::{ChannelContext, InteractionResponder},
        Invocation, Page, Paginator, PaginatorOptions,
    },
    nay,
};

pub const INFO: CommandInfo = CommandInfo {
    name: "help",
    description: "List the commands, or show how to use one of them",
    signature: "[command]",
    aliases: &["commands"],
    has_subcommands: false,
};

/// The command list, split into one embed per page.
pub fn command_pages(commands: &[CommandInfo], cfg: &ConfigSettings, bot_name: &str) -> Vec<Page> {
    let help = &cfg.help;
    commands
        .chunks(help.commands_per_page.get())
        .map(|chunk| {
            let mut embed = CreateEmbed::new()
                .title(format!("Help for {}", bot_name))
                .description(format!(
                    "Total commands: {}\nType `{}help <command>` for more information.",
                    commands.len(),
                    help.prefix
                ))
                .color(help.colour)
                .footer(CreateEmbedFooter::new("(*) has subcommands"));
            for info in chunk {
                let marker = if info.has_subcommands { " (*)" } else { "" };
                embed = embed.field(
                    format!("{}{}{}", help.prefix, info.name, marker),
                    format!(">>> {}", info.description),
                    help.inline,
                );
            }
            Page::Embed(embed)
        })
        .collect()
}

/// Usage and aliases of a single command.
pub fn command_embed(info: &CommandInfo, cfg: &ConfigSettings, requested_by: &str) -> CreateEmbed {
    let help = &cfg.help;
    let usage = format!("{}{} {}", help.prefix, info.name, info.signature);
    let mut embed = CreateEmbed::new()
        .title(format!("Help for {}", info.name))
        .description(format!("> {}", info.description))
        .color(help.colour)
        .field("Usage", usage.trim_end(), false);
    if !info.aliases.is_empty() {
        let aliases: Vec<String> = info.aliases.iter().map(|a| format!("`{}`", a)).collect();
        embed = embed.field("Aliases", aliases.join(" | "), false);
    }
    embed.footer(CreateEmbedFooter::new(format!("Requested by {}", requested_by)))
}

fn help_paginator(ctx: &Context, cfg: &ConfigSettings) -> Paginator {
    let bot_name = ctx.cache.current_user().name.clone();
    // every page is already a full embed
    let options = PaginatorOptions {
        per_page: NonZeroUsize::MIN,
        ..cfg.paginator.options()
    };
    Paginator::with_formatter(
        command_pages(COMMANDS, cfg, &bot_name),
        AsIs::new(cfg.paginator.empty_text.clone()),
        options,
    )
}

pub async fn run(
    options: &[ResolvedOption<'_>],
    ctx: &Context,
    cmd: &CommandInteraction,
    cfg: &ConfigSettings,
    sessions: &Sessions,
) {
    if let Some(ResolvedOption {
        value: ResolvedValue::String(name),
        ..
    }) = options.first()
    {
        let Some(info) = find_command(name) else {
            command_response(ctx, cmd, format!("No command called `{}`", name)).await;
            return;
        };

        let embed = command_embed(info, cfg, &cmd.user.name);
        let builder =
            CreateInteractionResponse::Message(CreateInteractionResponseMessage::new().embed(embed));
        if let Err(e) = cmd.create_response(&ctx.http, builder).await {
            nay!("Failed to send command help: {}", e);
        }
        return;
    }

    let responder = InteractionResponder::command(Arc::clone(&ctx.http), cmd.clone());
    let mut pages = help_paginator(ctx, cfg);
    if let Err(e) = pages.start(Invocation::interaction(&responder)).await {
        nay!("Failed to start help paginator: {}", e);
        return;
    }
    sessions.spawn(ctx.clone(), pages);
}

/// `!help` and `!help <command>`
pub async fn run_prefix(
    args: &str,
    ctx: &Context,
    msg: &Message,
    cfg: &ConfigSettings,
    sessions: &Sessions,
) {
    let args = args.trim();

    if !args.is_empty() {
        let builder = match find_command(args) {
            Some(info) => CreateMessage::new().embed(command_embed(info, cfg, &msg.author.name)),
            None => CreateMessage::new().content(format!("No command called `{}`", args)),
        };
        let sent = msg
            .channel_id
            .send_message(&ctx.http, builder.reference_message(msg))
            .await;
        if let Err(e) = sent {
            nay!("Failed to send command help: {}", e);
        }
        return;
    }

    let channel = ChannelContext::replying_to(Arc::clone(&ctx.http), msg);
    let mut pages = help_paginator(ctx, cfg);
    if let Err(e) = pages.start(Invocation::command(&channel)).await {
        nay!("Failed to start help paginator: {}", e);
        return;
    }
    sessions.spawn(ctx.clone(), pages);
}

pub fn register() -> CreateCommand {
    CreateCommand::new(INFO.name)
        .description(INFO.description)
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::String,
                "command",
                "The command to show help for",
            )
            .required(false),
        )
        .dm_permission(true)
}
