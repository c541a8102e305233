//! Reading options from the environment.

use std::env;

use crate::Result;

/// Options types that populate themselves from the environment.
///
/// Runs before flags are declared, so values read here may be used as flag
/// defaults.
pub trait Env {
    fn read_env(&mut self) -> Result<()>;
}

/// Reads each of `objs` in order, stopping at the first failure.
pub fn read_env_all<'a>(objs: impl IntoIterator<Item = &'a mut dyn Env>) -> Result<()> {
    for obj in objs {
        obj.read_env()?;
    }
    Ok(())
}

/// The value of `name`, treating unset, empty and non-unicode alike.
pub fn lookup(name: &str) -> Option<String> {
    env::var(name).ok().filter(|it| !it.is_empty())
}

pub fn lookup_or(name: &str, default: &str) -> String {
    lookup(name).unwrap_or_else(|| default.to_string())
}
