//! Positional argument grammar.

use crate::{Error, Result};

/// Options types that consume the leftover tokens themselves.
pub trait Args {
    fn parse_args(&mut self, args: Vec<String>) -> Result<()>;
}

/// Options types that declare their positional arguments and let the
/// dispatcher bind them.
pub trait ArgDefiner {
    fn args<'a>(&'a mut self, list: &mut ArgList<'a>);
}

enum Slot<'a> {
    Scalar { dst: &'a mut String, default: String },
    Variadic { dst: &'a mut Vec<String>, defaults: Vec<String>, min: usize },
}

/// One positional slot of an [`ArgList`].
pub struct ArgSpec<'a> {
    name: String,
    required: bool,
    slot: Slot<'a>,
}

impl ArgSpec<'_> {
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn is_required(&self) -> bool {
        self.required
    }
    pub fn is_variadic(&self) -> bool {
        matches!(self.slot, Slot::Variadic { .. })
    }
    /// Value bound when an optional scalar is absent.
    pub fn default_value(&self) -> &str {
        match &self.slot {
            Slot::Scalar { default, .. } => default,
            Slot::Variadic { .. } => "",
        }
    }
    /// Values bound when an optional variadic receives nothing.
    pub fn default_values(&self) -> &[String] {
        match &self.slot {
            Slot::Scalar { .. } => &[],
            Slot::Variadic { defaults, .. } => defaults,
        }
    }
    pub fn min_values(&self) -> usize {
        match &self.slot {
            Slot::Scalar { .. } => usize::from(self.required),
            Slot::Variadic { min, .. } => *min,
        }
    }
}

/// Ordered positional slots.
///
/// Only the last slot may be optional or variadic; adding anything after such
/// a slot panics, so a malformed list never reaches parsing.
#[derive(Default)]
pub struct ArgList<'a> {
    specs: Vec<ArgSpec<'a>>,
}

impl<'a> ArgList<'a> {
    pub fn new() -> ArgList<'a> {
        ArgList { specs: Vec::new() }
    }

    pub fn required(&mut self, dst: &'a mut String, name: &str) {
        self.add(ArgSpec {
            name: name.to_string(),
            required: true,
            slot: Slot::Scalar { dst, default: String::new() },
        })
    }

    pub fn optional(&mut self, dst: &'a mut String, name: &str, default: &str) {
        self.add(ArgSpec {
            name: name.to_string(),
            required: false,
            slot: Slot::Scalar { dst, default: default.to_string() },
        })
    }

    /// Collects every remaining token, which must number at least `min`.
    pub fn required_variadic(&mut self, dst: &'a mut Vec<String>, name: &str, min: usize) {
        if min < 1 {
            panic!("cannot require {min} values for {name}; must be > 0");
        }
        self.add(ArgSpec {
            name: name.to_string(),
            required: true,
            slot: Slot::Variadic { dst, defaults: Vec::new(), min },
        })
    }

    pub fn optional_variadic<I>(&mut self, dst: &'a mut Vec<String>, name: &str, defaults: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let defaults = defaults.into_iter().map(Into::into).collect();
        self.add(ArgSpec {
            name: name.to_string(),
            required: false,
            slot: Slot::Variadic { dst, defaults, min: 0 },
        })
    }

    fn add(&mut self, spec: ArgSpec<'a>) {
        if let Some(last) = self.specs.last() {
            if last.is_variadic() {
                panic!("can't put {} after variadic argument {}", spec.name, last.name);
            }
            if !last.required {
                panic!("can't put {} after optional argument {}", spec.name, last.name);
            }
        }
        self.specs.push(spec)
    }

    pub fn specs(&self) -> &[ArgSpec<'a>] {
        &self.specs
    }

    /// Binds `args` to the declared slots in order. Tokens past the last
    /// scalar slot are ignored.
    pub fn parse(self, args: Vec<String>) -> Result<()> {
        let mut args = args.into_iter();
        for spec in self.specs {
            let ArgSpec { name, required, slot } = spec;
            match slot {
                Slot::Scalar { dst, default } => match args.next() {
                    Some(arg) => *dst = arg,
                    None if required => return Err(Error::MissingArg { name }),
                    None => *dst = default,
                },
                Slot::Variadic { dst, defaults, min } => {
                    let rest = args.by_ref().collect::<Vec<_>>();
                    if rest.is_empty() && !required {
                        *dst = defaults;
                    } else if rest.len() < min {
                        return Err(Error::TooFewArgs { name, min });
                    } else {
                        *dst = rest;
                    }
                }
            }
        }
        Ok(())
    }
}
