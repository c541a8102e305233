use std::{cell::RefCell, rc::Rc};

use cmdtree::{options, ArgDefiner, ArgList, Command, FlagHider, FlagSet, Flags};
use expect_test::expect;

use crate::{check, leaf, text, Out};

#[derive(Debug, Default)]
struct Build {
    release: bool,
    target: String,
    jobs: u32,
    internal: String,
    src: String,
    extra: Vec<String>,
}

impl Flags for Build {
    fn flags<'a>(&'a mut self, fs: &mut FlagSet<'a>) {
        fs.bool(&mut self.release, "release", false, "optimized build");
        fs.string(&mut self.target, "target", "", "target triple");
        fs.var(&mut self.jobs, "jobs", 4, "parallel jobs");
        fs.string(&mut self.internal, "internal", "", "debugging knob");
    }
}

impl FlagHider for Build {
    fn hide_flags(&self) -> Vec<&'static str> {
        vec!["internal"]
    }
}

impl ArgDefiner for Build {
    fn args<'a>(&'a mut self, list: &mut ArgList<'a>) {
        list.required(&mut self.src, "src");
        list.optional_variadic(&mut self.extra, "extra", ["a", "b"]);
    }
}

options!(Build: Flags, FlagHider, ArgDefiner);

fn app() -> (Command, Out) {
    let out: Out = Rc::new(RefCell::new(Vec::new()));
    let o = &out;
    let mut root = Command::root(
        "app",
        "demo application",
        [
            leaf(o, "build", "compile sources", |b: Build| {
                format!(
                    "release={} target={} jobs={} internal={} src={} extra={}",
                    b.release,
                    b.target,
                    b.jobs,
                    b.internal,
                    b.src,
                    b.extra.join(" ")
                )
            })
            .with_help("\nBuilds the thing.\n"),
            Command::root(
                "tools",
                "auxiliary tools",
                [leaf(o, "fmt", "format code", |()| "fmt".to_string())],
            ),
            Command::new("stub", ""),
        ],
    );
    root.set_stdout(out.clone());
    root.set_stderr(Rc::new(RefCell::new(Vec::<u8>::new())));
    (root, out)
}

#[test]
fn root_help() {
    check(
        app,
        &["-h"],
        expect![[r#"
            Usage: app

            demo application

            Subcommands:
              build  compile sources
              tools  auxiliary tools
              stub
        "#]],
    );
}

#[test]
fn every_help_token() {
    for token in ["-h", "--h", "-help", "--help", "?"] {
        let (cmd, out) = app();
        cmd.execute(["", token]).unwrap();
        assert!(text(&out).starts_with("Usage: app\n"), "{token}");
    }
}

#[test]
fn leaf_help() {
    check(
        app,
        &["build", "-h"],
        expect![[r#"
            Usage: app build [-release] [-target=TARGET] [-jobs=JOBS (4)] <SRC> [EXTRA...](a b)

            Builds the thing.

            Flags:
              -release
                    optimized build
              -target=TARGET
                    target triple
              -jobs=JOBS
                    parallel jobs (default 4)
        "#]],
    );
}

#[test]
fn nested_help() {
    check(
        app,
        &["tools", "fmt", "--help"],
        expect![[r#"
            Usage: app tools fmt

            format code
        "#]],
    );
    check(
        app,
        &["tools", "?"],
        expect![[r#"
            Usage: app tools

            auxiliary tools

            Subcommands:
              fmt  format code
        "#]],
    );
}

#[test]
fn help_only_right_after_the_command() {
    check(
        app,
        &["build", "src", "-h"],
        expect![["release=false target= jobs=4 internal= src=src extra=-h"]],
    );
}

#[test]
fn hidden_flags_still_parse() {
    check(
        app,
        &["build", "-release", "-jobs", "8", "-internal=x", "main.rs"],
        expect![["release=true target= jobs=8 internal=x src=main.rs extra=a b"]],
    );
    check(
        app,
        &["build", "-target=wasm", "main.rs", "lib.rs", "util.rs"],
        expect![["release=false target=wasm jobs=4 internal= src=main.rs extra=lib.rs util.rs"]],
    );
}

#[test]
fn invalid_flag_values() {
    check(
        app,
        &["build", "-jobs=many", "main.rs"],
        expect![[r#"invalid value "many" for flag -jobs: invalid digit found in string"#]],
    );
    check(app, &["build", "-jobs"], expect![["flag needs an argument: -jobs"]]);
    check(
        app,
        &["build", "-release=maybe"],
        expect![[r#"invalid boolean value "maybe" for -release: parse error"#]],
    );
}

#[test]
fn synopsis_and_usage() {
    let (cmd, _) = app();
    let build = cmd.subcommand("build").unwrap();
    assert_eq!(
        build.synopsis(),
        "[-release] [-target=TARGET] [-jobs=JOBS (4)] <SRC> [EXTRA...](a b)"
    );
    assert_eq!(cmd.usage(), "Usage: app");
    assert_eq!(cmd.subcommand("stub").unwrap().synopsis(), "");
}

#[test]
fn print_help_matches_help() {
    let (cmd, _) = app();
    let tools = cmd.subcommand("tools").unwrap();
    let mut buf = Vec::new();
    tools.print_help(&mut buf).unwrap();
    assert_eq!(String::from_utf8(buf).unwrap(), tools.help());
}
