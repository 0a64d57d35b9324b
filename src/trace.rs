//! Construction trace written to stderr.
//!
//! Off unless `JSON_ADT_TRACE` is set or [`set_enabled`] is called. Only
//! successful constructions are traced.

use std::sync::atomic::{AtomicBool, Ordering};

use colored::Colorize;
use once_cell::sync::Lazy;
use serde_json::Value;

pub const TRACE_ENV: &str = "JSON_ADT_TRACE";

static ENABLED: Lazy<AtomicBool> = Lazy::new(|| {
    let on = std::env::var(TRACE_ENV).map(|v| parse_flag(&v)).unwrap_or(false);
    AtomicBool::new(on)
});

pub fn set_enabled(on: bool) {
    ENABLED.store(on, Ordering::Relaxed);
}

pub fn enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

pub(crate) fn constructed(name: &str, value: &Value) {
    #[cfg(test)]
    capture::record(name);
    if !enabled() {
        return;
    }
    let stamp = chrono::Local::now().format("%H:%M:%S%.3f").to_string();
    eprintln!("{} {} {}", stamp.dimmed(), name.cyan().bold(), value);
}

fn parse_flag(raw: &str) -> bool {
    !matches!(raw.trim().to_ascii_lowercase().as_str(), "" | "0" | "false" | "off" | "no")
}

/// Per-thread record of traced names, independent of the enabled switch.
#[cfg(test)]
pub(crate) mod capture {
    use std::cell::RefCell;

    thread_local! {
        static NAMES: RefCell<Option<Vec<String>>> = const { RefCell::new(None) };
    }

    pub(crate) fn record(name: &str) {
        NAMES.with(|names| {
            if let Some(names) = names.borrow_mut().as_mut() {
                names.push(name.to_string());
            }
        });
    }

    pub(crate) fn names(f: impl FnOnce()) -> Vec<String> {
        NAMES.with(|names| *names.borrow_mut() = Some(Vec::new()));
        f();
        NAMES.with(|names| names.borrow_mut().take().unwrap_or_default())
    }
}
