//! Usage and help text, derived from a node's declarations.

use std::fmt::Write;

use crate::{ArgSpec, Command, Flag};

macro_rules! w {
    ($($tt:tt)*) => {
        drop(write!($($tt)*))
    };
}

/// A flag as help sees it: no destination, just what was declared.
#[derive(Debug, Clone)]
pub(crate) struct FlagDoc {
    name: String,
    usage: String,
    default: String,
    is_bool: bool,
}

impl From<&Flag<'_>> for FlagDoc {
    fn from(flag: &Flag<'_>) -> FlagDoc {
        FlagDoc {
            name: flag.name().to_string(),
            usage: flag.usage().to_string(),
            default: flag.default_value().to_string(),
            is_bool: flag.is_bool(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ArgDoc {
    name: String,
    required: bool,
    variadic: bool,
    default: String,
    defaults: Vec<String>,
    min: usize,
}

impl From<&ArgSpec<'_>> for ArgDoc {
    fn from(spec: &ArgSpec<'_>) -> ArgDoc {
        ArgDoc {
            name: spec.name().to_uppercase(),
            required: spec.is_required(),
            variadic: spec.is_variadic(),
            default: spec.default_value().to_string(),
            defaults: spec.default_values().to_vec(),
            min: spec.min_values(),
        }
    }
}

/// Visible flags and positional slots of one node.
#[derive(Debug, Default)]
pub(crate) struct Declarations {
    pub(crate) flags: Vec<FlagDoc>,
    pub(crate) args: Vec<ArgDoc>,
}

impl Declarations {
    pub(crate) fn synopsis(&self) -> String {
        let mut parts = Vec::new();
        for flag in &self.flags {
            let value = flag.name.to_uppercase();
            parts.push(if flag.is_bool {
                format!("[-{}]", flag.name)
            } else if flag.default.is_empty() {
                format!("[-{}={value}]", flag.name)
            } else {
                format!("[-{}={value} ({})]", flag.name, flag.default)
            });
        }
        for arg in &self.args {
            let name = &arg.name;
            parts.push(match (arg.required, arg.variadic) {
                (true, false) => format!("<{name}>"),
                (false, false) if arg.default.is_empty() => format!("[{name}]"),
                (false, false) => format!("[{name} ({})]", arg.default),
                (true, true) => {
                    let mut buf = String::from("<");
                    for i in 0..arg.min {
                        w!(buf, "{name}{i}, ");
                    }
                    buf.push_str("...>");
                    buf
                }
                (false, true) if arg.defaults.is_empty() => format!("[{name}...]"),
                (false, true) => format!("[{name}...]({})", arg.defaults.join(" ")),
            });
        }
        parts.join(" ")
    }

    pub(crate) fn flag_details(&self) -> String {
        let mut buf = String::new();
        for flag in &self.flags {
            w!(buf, "  -{}", flag.name);
            if !flag.is_bool {
                w!(buf, "={}", flag.name.to_uppercase());
            }
            buf.push('\n');
            w!(buf, "        {}", flag.usage);
            if !flag.default.is_empty() && flag.default != "false" {
                w!(buf, " (default {})", flag.default);
            }
            buf.push('\n');
        }
        buf
    }
}

/// Child names and descriptions, column-aligned.
pub(crate) fn subcommand_table(subs: &[Command]) -> String {
    let width = subs.iter().map(|it| it.name().chars().count()).max().unwrap_or(0);
    let mut buf = String::new();
    for sub in subs {
        w!(buf, "  {:width$}  {}", sub.name(), sub.description());
        buf.truncate(buf.trim_end().len());
        buf.push('\n');
    }
    buf
}

pub(crate) fn render(cmd: &Command, decls: &Declarations) -> String {
    let mut sections = vec![format!("{}\n", cmd.usage_with(decls))];
    let about = if cmd.long_help().is_empty() { cmd.description() } else { cmd.long_help() };
    if !about.is_empty() {
        sections.push(format!("{}\n", about.trim()));
    }
    if !decls.flags.is_empty() {
        sections.push(format!("Flags:\n{}", decls.flag_details()));
    }
    if !cmd.subcommands().is_empty() {
        sections.push(format!("Subcommands:\n{}", subcommand_table(cmd.subcommands())));
    }
    sections.join("\n")
}
