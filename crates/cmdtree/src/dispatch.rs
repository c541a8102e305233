//! Resolution of an argument vector to a single command.

use tracing::debug;

use crate::{options::Invocation, Command, Error, Result};

fn is_help(token: &str) -> bool {
    matches!(token, "-h" | "--h" | "-help" | "--help" | "?")
}

/// `args[0]` is the token that selected `cmd` (the program name at the root).
pub(crate) fn execute(cmd: &Command, args: &[String]) -> Result<()> {
    if args.get(1).map_or(false, |it| is_help(it)) {
        debug!(command = %cmd.path_string(), "help requested");
        let mut out = cmd.stdout().borrow_mut();
        cmd.print_help(&mut *out)?;
        return Ok(());
    }

    let mut invocation = cmd.bind().invocation();
    invocation.read_env()?;
    let rest = invocation.parse_flags(cmd.name(), args.get(1..).unwrap_or_default().to_vec())?;

    if rest.is_empty() || cmd.subcommands().is_empty() {
        return run(cmd, invocation, rest);
    }

    match cmd.subcommand(&rest[0]) {
        Some(sub) => {
            debug!(command = %sub.path_string(), "selected subcommand");
            execute(sub, &rest)
        }
        None => {
            Err(Error::UnknownSubcommand { name: rest[0].clone(), path: cmd.path_string() })
        }
    }
}

fn run(cmd: &Command, mut invocation: Box<dyn Invocation + '_>, args: Vec<String>) -> Result<()> {
    let path = cmd.path_string();
    if !cmd.has_action() {
        return Err(Error::NotImplemented { path });
    }
    debug!(command = %path, args = args.len(), "running");

    invocation.parse_args(&path, args)?;
    invocation.init()?;

    if cmd.is_router() {
        let mut err = cmd.stderr().borrow_mut();
        cmd.print_help(&mut *err)?;
        return Ok(());
    }
    invocation.run(&path)
}
