//! Capability binding of options types.
//!
//! An options type opts into any of the capability traits ([`Env`],
//! [`Flags`], [`FlagHider`], [`Args`] or [`ArgDefiner`], [`Init`]) and lists
//! them in its [`Options::option_set`], usually through the [`options!`]
//! macro. The set is computed once, when the command is built; every dispatch
//! then allocates a fresh value and applies the stages in precedence order:
//! environment, flags, positional arguments, initializer.
//!
//! [`options!`]: crate::options

use std::fmt;

use tracing::trace;

use crate::{
    help::{ArgDoc, Declarations, FlagDoc},
    ArgDefiner, ArgList, Args, Env, Error, FlagHider, FlagSet, Flags, Result,
};

/// A final pass over a fully parsed options value, for fields derived from
/// the others.
pub trait Init {
    fn init(&mut self) -> Result<()>;
}

/// Initializes each of `objs` in order, stopping at the first failure.
pub fn init_all<'a>(objs: impl IntoIterator<Item = &'a mut dyn Init>) -> Result<()> {
    for obj in objs {
        obj.init()?;
    }
    Ok(())
}

/// The per-invocation value of a leaf command.
pub trait Options: Default + 'static {
    fn option_set() -> OptionSet<Self> {
        OptionSet::new()
    }
}

impl Options for () {}

/// Implements [`Options`] for a type from the list of capability traits it
/// implements.
///
/// ```
/// # use cmdtree::{options, Env, Init, Result};
/// #[derive(Default)]
/// struct Deploy { region: String }
///
/// impl Env for Deploy {
///     fn read_env(&mut self) -> Result<()> {
///         self.region = cmdtree::env::lookup_or("REGION", "eu");
///         Ok(())
///     }
/// }
///
/// impl Init for Deploy {
///     fn init(&mut self) -> Result<()> {
///         self.region.make_ascii_uppercase();
///         Ok(())
///     }
/// }
///
/// options!(Deploy: Env, Init);
/// ```
#[macro_export]
macro_rules! options {
    (@with $set:ident, Env) => { $set.env() };
    (@with $set:ident, Flags) => { $set.flags() };
    (@with $set:ident, FlagHider) => { $set.hide_flags() };
    (@with $set:ident, Args) => { $set.args() };
    (@with $set:ident, ArgDefiner) => { $set.arg_list() };
    (@with $set:ident, Init) => { $set.init() };
    ($ty:ty) => {
        impl $crate::Options for $ty {}
    };
    ($ty:ty: $($cap:ident),+ $(,)?) => {
        impl $crate::Options for $ty {
            fn option_set() -> $crate::OptionSet<Self> {
                let set = $crate::OptionSet::new();
                $(let set = $crate::options!(@with set, $cap);)+
                set
            }
        }
    };
}

type EnvFn<T> = fn(&mut T) -> Result<()>;
type FlagsFn<T> = for<'a> fn(&'a mut T, &mut FlagSet<'a>);
type HideFn<T> = fn(&T) -> Vec<&'static str>;
type ArgsFn<T> = fn(&mut T, Vec<String>) -> Result<()>;
type ArgListFn<T> = for<'a> fn(&'a mut T, &mut ArgList<'a>);
type InitFn<T> = fn(&mut T) -> Result<()>;

/// The capabilities of an options type.
pub struct OptionSet<T> {
    env: Option<EnvFn<T>>,
    flags: Option<FlagsFn<T>>,
    hider: Option<HideFn<T>>,
    args: Option<ArgsFn<T>>,
    arg_list: Option<ArgListFn<T>>,
    init: Option<InitFn<T>>,
}

impl<T> Default for OptionSet<T> {
    fn default() -> Self {
        OptionSet::new()
    }
}

impl<T> OptionSet<T> {
    pub fn new() -> OptionSet<T> {
        OptionSet { env: None, flags: None, hider: None, args: None, arg_list: None, init: None }
    }

    pub fn env(mut self) -> Self
    where
        T: Env,
    {
        self.env = Some(T::read_env);
        self
    }

    pub fn flags(mut self) -> Self
    where
        T: Flags,
    {
        self.flags = Some(T::flags);
        self
    }

    pub fn hide_flags(mut self) -> Self
    where
        T: FlagHider,
    {
        self.hider = Some(T::hide_flags);
        self
    }

    /// # Panics
    ///
    /// If the set already declares an argument list.
    pub fn args(mut self) -> Self
    where
        T: Args,
    {
        if self.arg_list.is_some() {
            panic!("options cannot implement both Args and ArgDefiner");
        }
        self.args = Some(T::parse_args);
        self
    }

    /// # Panics
    ///
    /// If the set already parses its own arguments.
    pub fn arg_list(mut self) -> Self
    where
        T: ArgDefiner,
    {
        if self.args.is_some() {
            panic!("options cannot implement both Args and ArgDefiner");
        }
        self.arg_list = Some(T::args);
        self
    }

    pub fn init(mut self) -> Self
    where
        T: Init,
    {
        self.init = Some(T::init);
        self
    }

    fn names(&self) -> Vec<&'static str> {
        let mut res = Vec::new();
        let caps = [
            ("Env", self.env.is_some()),
            ("Flags", self.flags.is_some()),
            ("FlagHider", self.hider.is_some()),
            ("Args", self.args.is_some()),
            ("ArgDefiner", self.arg_list.is_some()),
            ("Init", self.init.is_some()),
        ];
        for (name, present) in caps {
            if present {
                res.push(name);
            }
        }
        res
    }
}

impl<T> fmt::Debug for OptionSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

pub(crate) type RunFn<T> = Box<dyn Fn(T) -> Result<()>>;

/// Type-erased view of a node's options, used by the dispatcher.
pub(crate) trait Bind {
    fn has_run(&self) -> bool;
    fn invocation(&self) -> Box<dyn Invocation + '_>;
    fn declarations(&self, name: &str) -> Declarations;
}

/// One dispatch's worth of state: a freshly allocated options value moving
/// through the stages.
pub(crate) trait Invocation {
    fn read_env(&mut self) -> Result<()>;
    fn parse_flags(&mut self, name: &str, args: Vec<String>) -> Result<Vec<String>>;
    fn parse_args(&mut self, path: &str, args: Vec<String>) -> Result<()>;
    fn init(&mut self) -> Result<()>;
    fn run(self: Box<Self>, path: &str) -> Result<()>;
}

pub(crate) struct Binder<T> {
    set: OptionSet<T>,
    run: Option<RunFn<T>>,
}

impl<T: Options> Binder<T> {
    pub(crate) fn new(run: Option<RunFn<T>>) -> Binder<T> {
        Binder { set: T::option_set(), run }
    }
}

impl<T: Options> Bind for Binder<T> {
    fn has_run(&self) -> bool {
        self.run.is_some()
    }

    fn invocation(&self) -> Box<dyn Invocation + '_> {
        Box::new(Pending { binder: self, opts: T::default() })
    }

    fn declarations(&self, name: &str) -> Declarations {
        let mut res = Declarations::default();
        if let Some(declare) = self.set.flags {
            let mut opts = T::default();
            let hidden = self.set.hider.map(|hide| hide(&opts)).unwrap_or_default();
            let mut fs = FlagSet::new(name);
            declare(&mut opts, &mut fs);
            res.flags = fs
                .flags()
                .filter(|flag| !hidden.iter().any(|it| *it == flag.name()))
                .map(FlagDoc::from)
                .collect();
        }
        if let Some(define) = self.set.arg_list {
            let mut opts = T::default();
            let mut list = ArgList::new();
            define(&mut opts, &mut list);
            res.args = list.specs().iter().map(ArgDoc::from).collect();
        }
        res
    }
}

struct Pending<'b, T> {
    binder: &'b Binder<T>,
    opts: T,
}

impl<T: Options> Invocation for Pending<'_, T> {
    fn read_env(&mut self) -> Result<()> {
        match self.binder.set.env {
            Some(read) => {
                trace!("reading environment");
                read(&mut self.opts)
            }
            None => Ok(()),
        }
    }

    fn parse_flags(&mut self, name: &str, args: Vec<String>) -> Result<Vec<String>> {
        let declare = match self.binder.set.flags {
            Some(it) => it,
            None => return Ok(args),
        };
        let mut fs = FlagSet::new(name);
        declare(&mut self.opts, &mut fs);
        fs.parse(args)?;
        let rest = fs.into_args();
        trace!(remaining = rest.len(), "parsed flags");
        Ok(rest)
    }

    fn parse_args(&mut self, path: &str, args: Vec<String>) -> Result<()> {
        if let Some(parse) = self.binder.set.args {
            return parse(&mut self.opts, args);
        }
        if let Some(define) = self.binder.set.arg_list {
            let mut list = ArgList::new();
            define(&mut self.opts, &mut list);
            trace!(slots = list.specs().len(), given = args.len(), "binding positional arguments");
            return list.parse(args);
        }
        if !args.is_empty() {
            return Err(Error::NoArgsAllowed { path: path.to_string() });
        }
        Ok(())
    }

    fn init(&mut self) -> Result<()> {
        match self.binder.set.init {
            Some(init) => init(&mut self.opts),
            None => Ok(()),
        }
    }

    fn run(self: Box<Self>, path: &str) -> Result<()> {
        let Pending { binder, opts } = *self;
        match &binder.run {
            Some(run) => run(opts),
            None => Err(Error::NotImplemented { path: path.to_string() }),
        }
    }
}
