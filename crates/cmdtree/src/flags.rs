//! Single-dash flag parsing.
//!
//! A [`FlagSet`] binds each declared flag to a destination inside an options
//! value. Declaring a flag stores its default into the destination right
//! away; parsing then overwrites whatever the command line mentions.
//!
//! Accepted syntax is `-name`, `--name`, `-name=value` and, for flags that
//! take a value, `-name value`. Parsing stops at the first token that does not
//! look like a flag, or after a `--` terminator (which is consumed).

use std::{collections::HashSet, fmt, str::FromStr};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlagError {
    #[error("flag provided but not defined: -{0}")]
    Undefined(String),
    #[error("bad flag syntax: {0}")]
    BadSyntax(String),
    #[error("flag needs an argument: -{0}")]
    MissingValue(String),
    #[error("invalid value {value:?} for flag -{name}: {reason}")]
    InvalidValue { name: String, value: String, reason: String },
    #[error("invalid boolean value {value:?} for -{name}: {reason}")]
    InvalidBool { name: String, value: String, reason: String },
    #[error("flag: help requested")]
    Help,
}

/// Options types that declare command line flags.
pub trait Flags {
    fn flags<'a>(&'a mut self, fs: &mut FlagSet<'a>);
}

/// Flags that still parse but are left out of generated usage and help.
pub trait FlagHider {
    fn hide_flags(&self) -> Vec<&'static str>;
}

/// Declares the flags of each of `objs` on `fs`, in order.
///
/// This is how an options type exposes flags owned by its fields:
///
/// ```
/// # use cmdtree::{flags_all, FlagSet, Flags};
/// #[derive(Default)]
/// struct Verbosity { verbose: bool }
///
/// impl Flags for Verbosity {
///     fn flags<'a>(&'a mut self, fs: &mut FlagSet<'a>) {
///         fs.bool(&mut self.verbose, "v", false, "verbose output");
///     }
/// }
///
/// #[derive(Default)]
/// struct Build { verbosity: Verbosity, release: bool }
///
/// impl Flags for Build {
///     fn flags<'a>(&'a mut self, fs: &mut FlagSet<'a>) {
///         fs.bool(&mut self.release, "release", false, "optimized build");
///         flags_all(fs, [&mut self.verbosity as &mut dyn Flags]);
///     }
/// }
/// ```
pub fn flags_all<'a>(fs: &mut FlagSet<'a>, objs: impl IntoIterator<Item = &'a mut dyn Flags>) {
    for obj in objs {
        obj.flags(fs);
    }
}

/// A destination a flag writes into.
///
/// Implement this for types the built-in declarations don't cover, then
/// register it with [`FlagSet::value`].
pub trait Value {
    fn set(&mut self, value: &str) -> Result<(), String>;

    /// Boolean flags may be given without a value, `-name` meaning `true`.
    fn is_bool(&self) -> bool {
        false
    }
}

struct BoolValue<'a>(&'a mut bool);

impl Value for BoolValue<'_> {
    fn set(&mut self, value: &str) -> Result<(), String> {
        *self.0 = parse_bool(value)?;
        Ok(())
    }
    fn is_bool(&self) -> bool {
        true
    }
}

struct StringValue<'a>(&'a mut String);

impl Value for StringValue<'_> {
    fn set(&mut self, value: &str) -> Result<(), String> {
        *self.0 = value.to_string();
        Ok(())
    }
}

struct FromStrValue<'a, T>(&'a mut T);

impl<T> Value for FromStrValue<'_, T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    fn set(&mut self, value: &str) -> Result<(), String> {
        *self.0 = value.parse::<T>().map_err(|err| err.to_string())?;
        Ok(())
    }
}

struct FuncValue<F>(F);

impl<F> Value for FuncValue<F>
where
    F: FnMut(&str) -> Result<(), String>,
{
    fn set(&mut self, value: &str) -> Result<(), String> {
        (self.0)(value)
    }
}

pub(crate) fn parse_bool(value: &str) -> Result<bool, String> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err("parse error".to_string()),
    }
}

pub struct Flag<'a> {
    name: String,
    usage: String,
    default: String,
    value: Box<dyn Value + 'a>,
}

impl Flag<'_> {
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn usage(&self) -> &str {
        &self.usage
    }
    /// The default as text, as it appears in generated help.
    pub fn default_value(&self) -> &str {
        &self.default
    }
    pub fn is_bool(&self) -> bool {
        self.value.is_bool()
    }
}

impl fmt::Debug for Flag<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flag")
            .field("name", &self.name)
            .field("default", &self.default)
            .field("is_bool", &self.is_bool())
            .finish()
    }
}

#[derive(Debug)]
pub struct FlagSet<'a> {
    name: String,
    flags: Vec<Flag<'a>>,
    actual: HashSet<String>,
    args: Vec<String>,
}

impl<'a> FlagSet<'a> {
    pub fn new(name: impl Into<String>) -> FlagSet<'a> {
        FlagSet { name: name.into(), flags: Vec::new(), actual: HashSet::new(), args: Vec::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bool(&mut self, dst: &'a mut bool, name: &str, default: bool, usage: &str) {
        *dst = default;
        self.define(BoolValue(dst), name, default.to_string(), usage)
    }

    pub fn string(&mut self, dst: &'a mut String, name: &str, default: &str, usage: &str) {
        *dst = default.to_string();
        self.define(StringValue(dst), name, default.to_string(), usage)
    }

    /// Declares a flag for any type that round-trips through text.
    pub fn var<T>(&mut self, dst: &'a mut T, name: &str, default: T, usage: &str)
    where
        T: FromStr + fmt::Display + 'a,
        T::Err: fmt::Display,
    {
        let text = default.to_string();
        *dst = default;
        self.define(FromStrValue(dst), name, text, usage)
    }

    /// Calls `f` with the value every time the flag is given.
    pub fn func<F>(&mut self, name: &str, usage: &str, f: F)
    where
        F: FnMut(&str) -> Result<(), String> + 'a,
    {
        self.define(FuncValue(f), name, String::new(), usage)
    }

    pub fn value(&mut self, value: impl Value + 'a, name: &str, default: &str, usage: &str) {
        self.define(value, name, default.to_string(), usage)
    }

    fn define(&mut self, value: impl Value + 'a, name: &str, default: String, usage: &str) {
        if self.lookup(name).is_some() {
            panic!("{}: flag redefined: {name}", self.name);
        }
        self.flags.push(Flag {
            name: name.to_string(),
            usage: usage.to_string(),
            default,
            value: Box::new(value),
        });
    }

    pub fn lookup(&self, name: &str) -> Option<&Flag<'a>> {
        self.flags.iter().find(|it| it.name == name)
    }

    /// Flags in declaration order.
    pub fn flags(&self) -> impl Iterator<Item = &Flag<'a>> {
        self.flags.iter()
    }

    /// Whether `name` was given on the command line during the last parse.
    pub fn is_set(&self, name: &str) -> bool {
        self.actual.contains(name)
    }

    /// Tokens left over after the last parse.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn into_args(self) -> Vec<String> {
        self.args
    }

    pub fn parse(&mut self, args: Vec<String>) -> Result<(), FlagError> {
        let mut p = Parser::new(args);
        while let Some(flag) = p.pop_flag() {
            self.parse_one(&flag, &mut p)?;
        }
        self.args = p.rest();
        Ok(())
    }

    fn parse_one(&mut self, raw: &str, p: &mut Parser) -> Result<(), FlagError> {
        let body = raw.strip_prefix("--").unwrap_or(&raw[1..]);
        if body.is_empty() || body.starts_with('-') || body.starts_with('=') {
            return Err(FlagError::BadSyntax(raw.to_string()));
        }
        let (name, inline) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };

        let flag = match self.flags.iter_mut().find(|it| it.name == name) {
            Some(it) => it,
            None if name == "help" || name == "h" => return Err(FlagError::Help),
            None => return Err(FlagError::Undefined(name.to_string())),
        };

        if flag.value.is_bool() {
            let value = inline.unwrap_or("true");
            flag.value.set(value).map_err(|reason| FlagError::InvalidBool {
                name: name.to_string(),
                value: value.to_string(),
                reason,
            })?;
        } else {
            let value = match inline {
                Some(it) => it.to_string(),
                None => p.next_value().ok_or_else(|| FlagError::MissingValue(name.to_string()))?,
            };
            flag.value.set(&value).map_err(|reason| FlagError::InvalidValue {
                name: name.to_string(),
                value: value.clone(),
                reason,
            })?;
        }
        self.actual.insert(name.to_string());
        Ok(())
    }
}

/// Token cursor over the arguments, kept in reverse so that popping the next
/// token is cheap.
struct Parser {
    rargs: Vec<String>,
}

impl Parser {
    fn new(mut args: Vec<String>) -> Parser {
        args.reverse();
        Parser { rargs: args }
    }

    /// Pops the next token if it is a flag. A `--` terminator is consumed and
    /// ends flag parsing, as does a lone `-` or any positional token.
    fn pop_flag(&mut self) -> Option<String> {
        let next = self.rargs.last()?;
        if next.len() < 2 || !next.starts_with('-') {
            return None;
        }
        let arg = self.rargs.pop()?;
        if arg == "--" {
            return None;
        }
        Some(arg)
    }

    fn next_value(&mut self) -> Option<String> {
        self.rargs.pop()
    }

    fn rest(mut self) -> Vec<String> {
        self.rargs.reverse();
        self.rargs
    }
}
