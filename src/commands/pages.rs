use std::{num::NonZeroUsize, sync::Arc};

use serenity::all::{
    CommandInteraction, CommandOptionType, Context, CreateCommand, CreateCommandOption,
    CreateEmbed, CreateEmbedFooter, ResolvedOption, ResolvedValue,
};

use super::CommandInfo;
use page_turner::{
    config::ConfigSettings,
    discord_helpers::{
        command_response, multipage_embed::AsIs, session::Sessions,
        transport::InteractionResponder, Invocation, Page, Paginator,
    },
    nay,
};

pub const INFO: CommandInfo = CommandInfo {
    name: "pages",
    description: "Echo text back as pages, split on `|`",
    signature: "<text> [per_page]",
    aliases: &[],
    has_subcommands: false,
};

/// discord refuses messages with more embeds than this
pub const MAX_EMBEDS: usize = 10;

/// longest embed description discord accepts, in characters
pub const MAX_DESCRIPTION: usize = 4096;

/// One embed per `|`-separated piece of `text`. Blank pieces are skipped and pieces too long
/// for one embed carry on over the following pages.
pub fn split_pages(text: &str, colour: u32) -> Vec<Page> {
    let pieces: Vec<String> = text
        .split('|')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .flat_map(|piece| {
            let chars: Vec<char> = piece.chars().collect();
            chars
                .chunks(MAX_DESCRIPTION)
                .map(|part| part.iter().collect::<String>())
                .collect::<Vec<_>>()
        })
        .collect();
    let total = pieces.len();

    pieces
        .into_iter()
        .enumerate()
        .map(|(index, piece)| {
            Page::Embed(
                CreateEmbed::new()
                    .description(piece)
                    .color(colour)
                    .footer(CreateEmbedFooter::new(format!("{}/{}", index + 1, total))),
            )
        })
        .collect()
}

/// Clamps the requested page size to what fits in one message.
pub fn per_page(requested: Option<i64>, default: NonZeroUsize) -> NonZeroUsize {
    let Some(requested) = requested else {
        return default;
    };
    let clamped = requested.clamp(1, MAX_EMBEDS as i64) as usize;
    NonZeroUsize::new(clamped).unwrap_or(NonZeroUsize::MIN)
}

pub async fn run(
    options: &[ResolvedOption<'_>],
    ctx: &Context,
    cmd: &CommandInteraction,
    cfg: &ConfigSettings,
    sessions: &Sessions,
) {
    let Some(ResolvedOption {
        value: ResolvedValue::String(text),
        ..
    }) = options.first()
    else {
        command_response(ctx, cmd, "You must give some text to split into pages!").await;
        return;
    };

    let requested = match options.get(1) {
        Some(ResolvedOption {
            value: ResolvedValue::Integer(n),
            ..
        }) => Some(*n),
        _ => None,
    };

    let mut paginator_options = cfg.paginator.options();
    paginator_options.per_page = per_page(requested, paginator_options.per_page);

    let mut pages = Paginator::with_formatter(
        split_pages(text, cfg.help.colour),
        AsIs::new(cfg.paginator.empty_text.clone()),
        paginator_options,
    );

    let responder = InteractionResponder::command(Arc::clone(&ctx.http), cmd.clone());
    if let Err(e) = pages.start(Invocation::interaction(&responder)).await {
        nay!("Failed to start pages paginator: {}", e);
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
                "text",
                "The text to page through, pages separated by `|`",
            )
            .required(true),
        )
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::Integer,
                "per_page",
                "How many pages to show at once",
            )
            .min_int_value(1)
            .max_int_value(MAX_EMBEDS as u64)
            .required(false),
        )
        .dm_permission(true)
}
