use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use log::trace;
use regex::Regex;

use crate::error::{Error, Result};

fn has_wildcard(text: &str) -> bool {
    text.contains(['*', '?'])
}

/// Turn every pattern into existing file paths. Plain paths must exist,
/// wildcard patterns must match at least one file. The result is sorted and
/// free of duplicates, and never empty.
pub fn resolve(patterns: &[String]) -> Result<Vec<PathBuf>> {
    if patterns.is_empty() {
        return Err(Error::Config("no source files given".to_string()));
    }

    let mut sources = vec![];
    for pattern in patterns {
        if has_wildcard(pattern) {
            sources.extend(expand(pattern)?);
        } else {
            let path = PathBuf::from(pattern);
            if !path.is_file() {
                return Err(Error::MissingSource(path));
            }
            sources.push(path);
        }
    }
    let mut sources: Vec<PathBuf> = sources.into_iter().map(|p| normalize(&p)).collect();
    sources.sort();
    sources.dedup();
    Ok(sources)
}

// `./main.c` and `main.c` name the same file; drop the `.` so they compare equal.
fn normalize(path: &Path) -> PathBuf {
    let normalized: PathBuf = path
        .components()
        .filter(|c| *c != Component::CurDir)
        .collect();
    if normalized.as_os_str().is_empty() {
        return path.to_path_buf();
    }
    normalized
}

fn expand(pattern: &str) -> Result<Vec<PathBuf>> {
    let path = Path::new(pattern);
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return Err(Error::Pattern(format!("{:?} has no file name", pattern)));
    };
    let parent = path.parent().unwrap_or(Path::new(""));
    if has_wildcard(&parent.to_string_lossy()) {
        return Err(Error::Pattern(format!(
            "{:?}: wildcards are only allowed in the file name",
            pattern
        )));
    }

    let matcher = wildcard_regex(name)?;
    let directory = if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    };
    trace!("Matching {} in {:?}", matcher.as_str(), directory);

    let entries = fs::read_dir(directory).map_err(|source| Error::Filesystem {
        path: directory.to_path_buf(),
        source,
    })?;
    let mut matches = vec![];
    for entry in entries.filter_map(|e| e.ok()) {
        let entry_path = entry.path();
        if !entry_path.is_file() {
            continue;
        }
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };
        // Hidden files only match patterns that ask for them, as in a shell.
        if file_name.starts_with('.') && !name.starts_with('.') {
            continue;
        }
        if matcher.is_match(file_name) {
            trace!("{} matched {:?}", pattern, file_name);
            matches.push(parent.join(file_name));
        }
    }

    if matches.is_empty() {
        return Err(Error::MissingSource(path.to_path_buf()));
    }
    Ok(matches)
}

fn wildcard_regex(name: &str) -> Result<Regex> {
    let mut expr = String::from("^");
    for c in name.chars() {
        match c {
            '*' => expr.push_str("[^/]*"),
            '?' => expr.push_str("[^/]"),
            _ => expr.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }
    expr.push('$');
    Regex::new(&expr).map_err(|e| Error::Pattern(e.to_string()))
}
