
use std::time::Instant;

use cmdtree::{options, Command, Error, FlagSet, Flags, Result};
use xshell::{cmd, Shell};

#[derive(Debug, Default)]
struct Ci {
    no_demo: bool,
}

impl Flags for Ci {
    fn flags<'a>(&'a mut self, fs: &mut FlagSet<'a>) {
        fs.bool(&mut self.no_demo, "no-demo", false, "skip running the demo");
    }
}

options!(Ci: Flags);

#[derive(Debug, Default)]
struct Publish {
    dry_run: bool,
    branch: String,
}

impl Flags for Publish {
    fn flags<'a>(&'a mut self, fs: &mut FlagSet<'a>) {
        fs.bool(&mut self.dry_run, "dry-run", false, "tag and package without uploading");
        fs.string(&mut self.branch, "branch", "master", "only release from this branch");
    }
}

options!(Publish: Flags);

fn main() {
    let xtask = Command::root(
        "xtask",
        "cmdtree maintenance",
        [
            Command::leaf("ci", "build, test and run the demo", ci),
            Command::leaf("publish", "tag and publish a new version", publish),
        ],
    );
    if let Err(err) = xtask.execute_from_env() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn shell() -> Result<Shell> {
    let sh = Shell::new().map_err(Error::custom)?;
    sh.set_var("RUSTUP_TOOLCHAIN", "stable");
    Ok(sh)
}

fn ci(opts: Ci) -> Result<()> {
    let sh = shell()?;
    cmd!(sh, "rustup toolchain install stable --no-self-update").run().map_err(Error::custom)?;
    cmd!(sh, "rustc --version").run().map_err(Error::custom)?;

    Section::start("BUILD").run(|| cmd!(sh, "cargo test --workspace --no-run").run())?;
    Section::start("TEST").run(|| cmd!(sh, "cargo test --workspace -- --nocapture").run())?;
    if !opts.no_demo {
        Section::start("DEMO").run(|| {
            cmd!(sh, "cargo run -p cmdtree --example hello -- greet -loud ferris").run()
        })?;
    }
    Ok(())
}

fn publish(opts: Publish) -> Result<()> {
    let sh = shell()?;
    let pkgid = cmd!(sh, "cargo pkgid -p cmdtree").read().map_err(Error::custom)?;
    let version = match pkgid.rsplit_once(|c: char| c == '#' || c == '@') {
        Some((_, version)) => version.to_string(),
        None => return Err(Error::msg(format!("can't find a version in {pkgid:?}"))),
    };
    let tag = format!("v{version}");

    let branch = cmd!(sh, "git branch --show-current").read().map_err(Error::custom)?;
    if branch != opts.branch {
        println!("on {branch}, not releasing");
        return Ok(());
    }
    let tags = cmd!(sh, "git tag --list").read().map_err(Error::custom)?;
    if tags.split_ascii_whitespace().any(|it| it == tag) {
        println!("{tag} already released");
        return Ok(());
    }

    let dry_run = if opts.dry_run { Some("--dry-run") } else { None };
    Section::start("PUBLISH").run(|| {
        cmd!(sh, "cargo publish -p cmdtree {dry_run...}").run()?;
        if dry_run.is_none() {
            cmd!(sh, "git tag {tag}").run()?;
            cmd!(sh, "git push --tags").run()?;
        }
        Ok(())
    })
}

/// A collapsible group in the CI log, timed.
struct Section {
    name: &'static str,
    start: Instant,
}

impl Section {
    fn start(name: &'static str) -> Section {
        println!("::group::{name}");
        Section { name, start: Instant::now() }
    }

    fn run(self, f: impl FnOnce() -> xshell::Result<()>) -> Result<()> {
        f().map_err(Error::custom)
    }
}

impl Drop for Section {
    fn drop(&mut self) {
        eprintln!("{}: {:.2?}", self.name, self.start.elapsed());
        println!("::endgroup::");
    }
}
