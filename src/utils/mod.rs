use crate::prelude::*;
use std::str::FromStr;

#[macro_use]
mod macros;
pub(crate) mod fs;

pub fn report_failure(err: &anyhow::Error) {
    error!("{}", err);

    for cause in err.chain().skip(1) {
        error!("caused by: {}", cause);
    }

    if !is_backtrace_runtime_enabled() {
        debug!("note: run with `RUST_BACKTRACE=1` to display a backtrace.");
    }
}

fn is_backtrace_runtime_enabled() -> bool {
    std::env::var("RUST_BACKTRACE")
        .ok()
        .and_then(|s| i32::from_str(&s).ok())
        .is_some_and(|val| val != 0)
}
