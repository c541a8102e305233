use std::{
    cell::RefCell,
    fmt,
    io::{self, Write},
    rc::Rc,
};

use crate::{
    dispatch,
    help::{self, Declarations},
    options::{Bind, Binder, RunFn},
    Options, Result,
};

/// Where a command writes help and diagnostics.
pub type Stream = Rc<RefCell<dyn Write>>;

/// A node in the command tree.
///
/// Build the tree bottom-up with [`Command::leaf`] and [`Command::root`], then
/// call [`Command::execute`] on the root. The shape is fixed once built; each
/// execution works on its own freshly allocated options value.
pub struct Command {
    name: String,
    desc: String,
    help: String,
    parent: Vec<String>,
    router: bool,
    options: Box<dyn Bind>,
    subs: Vec<Command>,
    stdout: Stream,
    stderr: Stream,
}

impl Command {
    /// A node without an action. Resolving to it fails as not implemented
    /// unless it has a matching subcommand.
    pub fn new(name: impl Into<String>, desc: impl Into<String>) -> Command {
        Command {
            name: name.into(),
            desc: desc.into(),
            help: String::new(),
            parent: Vec::new(),
            router: false,
            options: Box::new(Binder::<()>::new(None)),
            subs: Vec::new(),
            stdout: Rc::new(RefCell::new(io::stdout())),
            stderr: Rc::new(RefCell::new(io::stderr())),
        }
    }

    /// A command that only routes to its subcommands. Invoked on its own it
    /// prints its help to stderr and succeeds.
    pub fn root(
        name: impl Into<String>,
        desc: impl Into<String>,
        subcommands: impl IntoIterator<Item = Command>,
    ) -> Command {
        let mut res = Command::new(name, desc);
        res.router = true;
        res.with_subcommands(subcommands)
    }

    /// A command that runs something.
    ///
    /// Each execution starts from `T::default()`, applies the capabilities
    /// `T` declares in [`Options::option_set`], and hands the result to `run`.
    ///
    /// # Panics
    ///
    /// If `T`'s option set is invalid, e.g. declares both ways of handling
    /// positional arguments.
    pub fn leaf<T, F>(name: impl Into<String>, desc: impl Into<String>, run: F) -> Command
    where
        T: Options,
        F: Fn(T) -> Result<()> + 'static,
    {
        let run: RunFn<T> = Box::new(run);
        let mut res = Command::new(name, desc);
        res.options = Box::new(Binder::new(Some(run)));
        res
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Command {
        self.help = help.into();
        self
    }

    /// # Panics
    ///
    /// If two subcommands share a name.
    pub fn with_subcommands(mut self, subcommands: impl IntoIterator<Item = Command>) -> Command {
        for sub in subcommands {
            if self.subcommand(sub.name()).is_some() {
                panic!("{}: duplicate subcommand {}", self.path_string(), sub.name());
            }
            self.subs.push(sub);
        }
        let path = self.path();
        for sub in &mut self.subs {
            sub.adopt(path.clone());
        }
        self
    }

    // Descendants only remember their ancestors' names, which is all `path`
    // needs.
    fn adopt(&mut self, parent: Vec<String>) {
        self.parent = parent;
        let path = self.path();
        for sub in &mut self.subs {
            sub.adopt(path.clone());
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn description(&self) -> &str {
        &self.desc
    }
    pub fn long_help(&self) -> &str {
        &self.help
    }
    pub fn subcommands(&self) -> &[Command] {
        &self.subs
    }
    pub fn subcommand(&self, name: &str) -> Option<&Command> {
        self.subs.iter().find(|it| it.name == name)
    }
    pub fn has_action(&self) -> bool {
        self.router || self.options.has_run()
    }
    pub(crate) fn is_router(&self) -> bool {
        self.router
    }
    pub(crate) fn bind(&self) -> &dyn Bind {
        &*self.options
    }
    pub(crate) fn stdout(&self) -> &Stream {
        &self.stdout
    }
    pub(crate) fn stderr(&self) -> &Stream {
        &self.stderr
    }

    /// Names from the root down to this command.
    pub fn path(&self) -> Vec<String> {
        let mut res = self.parent.clone();
        res.push(self.name.clone());
        res
    }

    pub fn path_string(&self) -> String {
        self.path().join(" ")
    }

    fn declarations(&self) -> Declarations {
        self.options.declarations(&self.name)
    }

    /// Flags and positional arguments in one line, e.g.
    /// `[-v] [-out=OUT] <SRC> [DST...]`.
    pub fn synopsis(&self) -> String {
        self.declarations().synopsis()
    }

    pub fn usage(&self) -> String {
        self.usage_with(&self.declarations())
    }

    pub(crate) fn usage_with(&self, decls: &Declarations) -> String {
        let synopsis = decls.synopsis();
        if synopsis.is_empty() {
            format!("Usage: {}", self.path_string())
        } else {
            format!("Usage: {} {synopsis}", self.path_string())
        }
    }

    pub fn help(&self) -> String {
        help::render(self, &self.declarations())
    }

    pub fn print_help(&self, w: &mut dyn Write) -> io::Result<()> {
        w.write_all(self.help().as_bytes())
    }

    pub fn set_stdout(&mut self, w: Stream) {
        for sub in &mut self.subs {
            sub.set_stdout(w.clone());
        }
        self.stdout = w;
    }

    pub fn set_stderr(&mut self, w: Stream) {
        for sub in &mut self.subs {
            sub.set_stderr(w.clone());
        }
        self.stderr = w;
    }

    /// Resolves `args` against the tree and runs the selected command.
    ///
    /// `args[0]` is the program name and is not matched against anything.
    pub fn execute<I>(&self, args: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let args = args.into_iter().map(Into::into).collect::<Vec<String>>();
        dispatch::execute(self, &args)
    }

    pub fn execute_from_env(&self) -> Result<()> {
        let args = std::env::args_os().map(|it| it.to_string_lossy().into_owned());
        self.execute(args)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("path", &self.path_string())
            .field("desc", &self.desc)
            .field("subs", &self.subs)
            .finish()
    }
}
