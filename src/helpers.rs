use regex::Regex;
use std::{process::exit, sync::LazyLock};

use crate::process::ExitState;

static WORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?:[^\s"']+|"[^"]*"|'[^']*')+"#).unwrap());
static PIECES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[^\s"']+|"([^"]*)"|'([^']*)'"#).unwrap());

pub const EXIT_COMPILE_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Split a flag string the way a shell would for simple quoting:
/// `-DNAME="a b" -Wall` gives `-DNAME=a b` and `-Wall`.
pub fn split_flags(line: &str) -> Vec<String> {
    WORDS
        .find_iter(line)
        .map(|word| {
            PIECES
                .captures_iter(word.as_str())
                .filter_map(|cap| {
                    cap.get(1)
                        .or(cap.get(2))
                        .or(cap.get(0))
                        .map(|m| m.as_str().to_string())
                })
                .collect::<String>()
        })
        .collect()
}

/// Echo captured process output, labelled, when there is any.
pub fn print_captured(label: &str, text: &str) {
    if text.trim().is_empty() {
        return;
    }
    eprintln!("{}: {}", label, text.trim_end());
}

pub fn compile_error(status: &ExitState) {
    eprintln!("Error compiling C code: compiler {}", status);
}

pub fn app_error(msg: &str) -> ! {
    eprintln!("buildrun: {}", msg);
    exit(EXIT_ERROR)
}
