use anyhow::{Result, bail};

use super::{
    args::{Arguments, Command},
    commands::{CommandResult, import::import, init::init, status::status},
};

/// Dispatch to the handler of the parsed command.
///
/// # Returns
/// - `Ok(CommandResult)` with the summary to print and error counts
/// - `Err` if the command cannot run (invalid config, database failure)
pub fn run(Arguments { command }: Arguments) -> Result<CommandResult> {
    match command {
        Some(Command::Import(cmd)) => import(cmd),
        Some(Command::Status(cmd)) => status(cmd),
        Some(Command::Init) => init(),
        None => bail!("No command provided. Use --help to see available commands."),
    }
}
