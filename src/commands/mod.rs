use serenity::all::CreateCommand;

pub(crate) mod help;
pub(crate) mod pages;
pub(crate) mod ping;

/// What the help command knows about a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandInfo {
    pub name: &'static str,
    pub description: &'static str,
    /// arguments, shown after the command name
    pub signature: &'static str,
    pub aliases: &'static [&'static str],
    pub has_subcommands: bool,
}

pub const COMMANDS: &[CommandInfo] = &[
    help::INFO,
    pages::INFO,
    ping::INFO,
];

pub fn find_command(name: &str) -> Option<&'static CommandInfo> {
    let name = name.trim().to_lowercase();
    COMMANDS
        .iter()
        .find(|info| info.name == name || info.aliases.contains(&name.as_str()))
}

/// Slash commands to register with discord.
pub fn register_all() -> Vec<CreateCommand> {
    vec![help::register(), pages::register(), ping::register()]
}
