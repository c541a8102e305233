//! A small tree exercising every stage of option binding.
//!
//! ```text
//! $ cargo run -p cmdtree --example hello -- greet -loud -times 2 ferris
//! $ HELLO_GREETING=hi cargo run -p cmdtree --example hello -- greet
//! $ cargo run -p cmdtree --example hello -- util echo a b c
//! ```
//!
//! Set `RUST_LOG=cmdtree=trace` to watch the dispatcher.

use cmdtree::{
    env, options, ArgDefiner, ArgList, Args, Command, Env, Error, FlagSet, Flags, Init, Result,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Greet {
    greeting: String,
    loud: bool,
    times: u32,
    name: String,
    line: String,
}

impl Env for Greet {
    fn read_env(&mut self) -> Result<()> {
        self.greeting = env::lookup_or("HELLO_GREETING", "hello");
        Ok(())
    }
}

impl Flags for Greet {
    fn flags<'a>(&'a mut self, fs: &mut FlagSet<'a>) {
        let greeting = self.greeting.clone();
        fs.string(&mut self.greeting, "greeting", &greeting, "word to greet with");
        fs.bool(&mut self.loud, "loud", false, "shout");
        fs.var(&mut self.times, "times", 1, "how many times to greet");
    }
}

impl ArgDefiner for Greet {
    fn args<'a>(&'a mut self, list: &mut ArgList<'a>) {
        list.optional(&mut self.name, "name", "world");
    }
}

impl Init for Greet {
    fn init(&mut self) -> Result<()> {
        if self.times == 0 {
            return Err(Error::msg("-times must be positive"));
        }
        self.line = format!("{}, {}!", self.greeting, self.name);
        if self.loud {
            self.line.make_ascii_uppercase();
        }
        Ok(())
    }
}

options!(Greet: Env, Flags, ArgDefiner, Init);

#[derive(Debug, Default)]
struct Echo {
    words: Vec<String>,
}

impl Args for Echo {
    fn parse_args(&mut self, args: Vec<String>) -> Result<()> {
        self.words = args;
        Ok(())
    }
}

options!(Echo: Args);

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let app = Command::root(
        "hello",
        "greets people",
        [
            Command::leaf("greet", "print a greeting", |opts: Greet| {
                for _ in 0..opts.times {
                    println!("{}", opts.line);
                }
                Ok(())
            })
            .with_help(
                "Prints a greeting.\n\nThe greeting defaults to $HELLO_GREETING, then \"hello\".",
            ),
            Command::root(
                "util",
                "assorted helpers",
                [
                    Command::leaf("echo", "print the arguments", |opts: Echo| {
                        println!("{}", opts.words.join(" "));
                        Ok(())
                    }),
                    Command::new("sort", "sort the arguments"),
                ],
            ),
        ],
    );

    if let Err(err) = app.execute_from_env() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
