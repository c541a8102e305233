use cmdtree::ArgList;

#[derive(Debug, Default, PartialEq)]
struct Opts {
    a1: String,
    a2: String,
    v1: Vec<String>,
}

type Setup = for<'a> fn(&'a mut Opts, &mut ArgList<'a>);

struct Case {
    desc: &'static str,
    setup: Setup,
    args: &'static [&'static str],
    want: Result<Opts, &'static str>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|it| it.to_string()).collect()
}

fn opts(a1: &str, a2: &str, v1: &[&str]) -> Opts {
    Opts { a1: a1.to_string(), a2: a2.to_string(), v1: strings(v1) }
}

#[test]
fn parse_table() {
    let cases = vec![
        Case { desc: "zero", setup: |_, _| {}, args: &[], want: Ok(opts("", "", &[])) },
        Case {
            desc: "required_provided",
            setup: |o, al| al.required(&mut o.a1, "name1"),
            args: &["value1"],
            want: Ok(opts("value1", "", &[])),
        },
        Case {
            desc: "required_missing",
            setup: |o, al| al.required(&mut o.a1, "name1"),
            args: &[],
            want: Err("required argument missing: name1"),
        },
        Case {
            desc: "optional_provided",
            setup: |o, al| al.optional(&mut o.a1, "name1", "default1"),
            args: &["value1"],
            want: Ok(opts("value1", "", &[])),
        },
        Case {
            desc: "optional_missing",
            setup: |o, al| al.optional(&mut o.a1, "name1", "default1"),
            args: &[],
            want: Ok(opts("default1", "", &[])),
        },
        Case {
            desc: "required_optional_provided",
            setup: |o, al| {
                al.required(&mut o.a1, "name1");
                al.optional(&mut o.a2, "name2", "default2");
            },
            args: &["val1", "val2"],
            want: Ok(opts("val1", "val2", &[])),
        },
        Case {
            desc: "required_optional_missing",
            setup: |o, al| {
                al.required(&mut o.a1, "name1");
                al.optional(&mut o.a2, "name2", "default2");
            },
            args: &["val1"],
            want: Ok(opts("val1", "default2", &[])),
        },
        Case {
            desc: "required_providedx2",
            setup: |o, al| {
                al.required(&mut o.a1, "name1");
                al.required(&mut o.a2, "name2");
            },
            args: &["val1", "val2"],
            want: Ok(opts("val1", "val2", &[])),
        },
        Case {
            desc: "required_provided_required_missing",
            setup: |o, al| {
                al.required(&mut o.a1, "name1");
                al.required(&mut o.a2, "name2");
            },
            args: &["val1"],
            want: Err("required argument missing: name2"),
        },
        Case {
            desc: "required_variadic_1_provided_extra",
            setup: |o, al| al.required_variadic(&mut o.v1, "name1", 1),
            args: &["val1", "val2", "val3"],
            want: Ok(opts("", "", &["val1", "val2", "val3"])),
        },
        Case {
            desc: "required_variadic_2_provided",
            setup: |o, al| al.required_variadic(&mut o.v1, "name1", 2),
            args: &["val1", "val2"],
            want: Ok(opts("", "", &["val1", "val2"])),
        },
        Case {
            desc: "required_variadic_1_all_missing",
            setup: |o, al| al.required_variadic(&mut o.v1, "name1", 1),
            args: &[],
            want: Err("required name1 argument(s) missing; you must supply at least 1"),
        },
        Case {
            desc: "required_variadic_2_one_missing",
            setup: |o, al| al.required_variadic(&mut o.v1, "name1", 2),
            args: &["val1"],
            want: Err("required name1 argument(s) missing; you must supply at least 2"),
        },
        Case {
            desc: "optional_variadic_provided",
            setup: |o, al| al.optional_variadic(&mut o.v1, "name1", ["def1", "def2", "def3"]),
            args: &["val1", "val2"],
            want: Ok(opts("", "", &["val1", "val2"])),
        },
        Case {
            desc: "optional_variadic_missing",
            setup: |o, al| al.optional_variadic(&mut o.v1, "name1", ["def1", "def2", "def3"]),
            args: &[],
            want: Ok(opts("", "", &["def1", "def2", "def3"])),
        },
        Case {
            desc: "required_provided_required_variadic_1_provided",
            setup: |o, al| {
                al.required(&mut o.a1, "name1");
                al.required_variadic(&mut o.v1, "name2", 1);
            },
            args: &["val1", "val2"],
            want: Ok(opts("val1", "", &["val2"])),
        },
        Case {
            desc: "required_provided_required_variadic_1_missing",
            setup: |o, al| {
                al.required(&mut o.a1, "name1");
                al.required_variadic(&mut o.v1, "name2", 1);
            },
            args: &["val1"],
            want: Err("required name2 argument(s) missing; you must supply at least 1"),
        },
        Case {
            desc: "required_provided_required_variadic_2_missing_one",
            setup: |o, al| {
                al.required(&mut o.a1, "name1");
                al.required_variadic(&mut o.v1, "name2", 2);
            },
            args: &["val1", "val2"],
            want: Err("required name2 argument(s) missing; you must supply at least 2"),
        },
        Case {
            desc: "required_provided_optional_variadic_provided",
            setup: |o, al| {
                al.required(&mut o.a1, "name1");
                al.optional_variadic(&mut o.v1, "name2", ["def1", "def2"]);
            },
            args: &["val1", "val2", "val3"],
            want: Ok(opts("val1", "", &["val2", "val3"])),
        },
        Case {
            desc: "required_provided_optional_variadic_missing",
            setup: |o, al| {
                al.required(&mut o.a1, "name1");
                al.optional_variadic(&mut o.v1, "name2", ["def1", "def2"]);
            },
            args: &["val1"],
            want: Ok(opts("val1", "", &["def1", "def2"])),
        },
    ];

    for case in cases {
        let mut got = Opts::default();
        let mut list = ArgList::new();
        (case.setup)(&mut got, &mut list);
        let res = list.parse(strings(case.args));
        match (res, case.want) {
            (Ok(()), Ok(want)) => assert_eq!(got, want, "{}", case.desc),
            (Err(err), Err(want)) => assert_eq!(err.to_string(), want, "{}", case.desc),
            (Ok(()), Err(want)) => panic!("{}: got no error, want {want:?}", case.desc),
            (Err(err), Ok(_)) => panic!("{}: unexpected error {err}", case.desc),
        }
    }
}

#[test]
#[should_panic(expected = "after variadic argument")]
fn nothing_after_variadic() {
    let mut opts = Opts::default();
    let mut list = ArgList::new();
    list.optional_variadic(&mut opts.v1, "rest", Vec::<String>::new());
    list.required(&mut opts.a1, "late");
}

#[test]
#[should_panic(expected = "after optional argument")]
fn nothing_after_optional() {
    let mut opts = Opts::default();
    let mut list = ArgList::new();
    list.optional(&mut opts.a1, "maybe", "");
    list.optional(&mut opts.a2, "late", "");
}
