//! A command tree with typed, per-invocation options.
//!
//! Each leaf command owns an options type. On every execution the dispatcher
//! walks the tree one token per level, allocates a fresh options value for
//! the command it lands on and fills it from four sources, later ones
//! winning: the environment ([`Env`]), flags ([`Flags`]), positional
//! arguments ([`Args`] or [`ArgDefiner`]) and finally [`Init`].
//!
//! ```
//! use cmdtree::{options, ArgDefiner, ArgList, Command, FlagSet, Flags};
//!
//! #[derive(Default)]
//! struct Greet {
//!     loud: bool,
//!     name: String,
//! }
//!
//! impl Flags for Greet {
//!     fn flags<'a>(&'a mut self, fs: &mut FlagSet<'a>) {
//!         fs.bool(&mut self.loud, "loud", false, "shout the greeting");
//!     }
//! }
//!
//! impl ArgDefiner for Greet {
//!     fn args<'a>(&'a mut self, list: &mut ArgList<'a>) {
//!         list.optional(&mut self.name, "name", "world");
//!     }
//! }
//!
//! options!(Greet: Flags, ArgDefiner);
//!
//! let root = Command::root("app", "demo app", [
//!     Command::leaf("greet", "say hello", |opts: Greet| {
//!         assert!(opts.loud);
//!         assert_eq!(opts.name, "bob");
//!         Ok(())
//!     }),
//! ]);
//!
//! root.execute(["app", "greet", "-loud", "bob"]).unwrap();
//! let greet = root.subcommand("greet").unwrap();
//! assert_eq!(greet.usage(), "Usage: app greet [-loud] [NAME (world)]");
//! ```

use std::{error::Error as StdError, fmt, io};

mod args;
mod command;
mod dispatch;
mod flags;
mod help;
mod options;

pub mod env;

pub use crate::{
    args::{ArgDefiner, ArgList, ArgSpec, Args},
    command::{Command, Stream},
    env::{read_env_all, Env},
    flags::{flags_all, Flag, FlagError, FlagHider, FlagSet, Flags, Value},
    options::{init_all, Init, OptionSet, Options},
};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("subcommand {name:?} not found in {path}")]
    UnknownSubcommand { name: String, path: String },
    #[error("{path}: not implemented")]
    NotImplemented { path: String },
    #[error("{path}: no args allowed")]
    NoArgsAllowed { path: String },
    #[error("required argument missing: {name}")]
    MissingArg { name: String },
    #[error("required {name} argument(s) missing; you must supply at least {min}")]
    TooFewArgs { name: String, min: usize },
    #[error(transparent)]
    Flag(#[from] FlagError),
    #[error(transparent)]
    Io(#[from] io::Error),
    /// A failure reported by an options type or a run action, passed through
    /// as is.
    #[error(transparent)]
    Custom(Box<dyn StdError + Send + Sync>),
}

impl Error {
    pub fn msg(msg: impl fmt::Display) -> Error {
        Error::Custom(msg.to_string().into())
    }

    pub fn custom(err: impl StdError + Send + Sync + 'static) -> Error {
        Error::Custom(Box::new(err))
    }

    /// `-h` or `-help` showed up among the flags rather than right after the
    /// command name.
    pub fn is_help(&self) -> bool {
        matches!(self, Error::Flag(FlagError::Help))
    }
}
