mod common;

use std::path::PathBuf;

use buildrun::{sources, Error};
use common::touch;
use tempdir::TempDir;
use test_log::test;

fn pattern(dir: &TempDir, rest: &str) -> String {
    dir.path().join(rest).to_string_lossy().into_owned()
}

#[test]
fn literal_paths_must_exist() {
    let dir = TempDir::new("sources").unwrap();
    touch(&dir.path().join("main.c"));

    let found = sources::resolve(&[pattern(&dir, "main.c")]).unwrap();
    assert_eq!(found, vec![dir.path().join("main.c")]);

    let err = sources::resolve(&[pattern(&dir, "src/main.c")]).unwrap_err();
    assert!(matches!(err, Error::MissingSource(ref p) if *p == dir.path().join("src/main.c")));
}

#[test]
fn directories_are_not_sources() {
    let dir = TempDir::new("sources").unwrap();
    std::fs::create_dir(dir.path().join("main.c")).unwrap();

    assert!(sources::resolve(&[pattern(&dir, "main.c")]).is_err());
}

#[test]
fn wildcards_expand_sorted_and_deduplicated() {
    let dir = TempDir::new("sources").unwrap();
    for name in ["stle.c", "tok_trainer.c", "stle.h", "main.c"] {
        touch(&dir.path().join("src").join(name));
    }

    let found = sources::resolve(&[
        pattern(&dir, "src/*.c"),
        pattern(&dir, "src/main.c"),
    ])
    .unwrap();

    let expected: Vec<PathBuf> = ["main.c", "stle.c", "tok_trainer.c"]
        .iter()
        .map(|name| dir.path().join("src").join(name))
        .collect();
    assert_eq!(found, expected);
}

#[test]
fn question_mark_matches_one_character() {
    let dir = TempDir::new("sources").unwrap();
    for name in ["a1.c", "a22.c", "b1.c"] {
        touch(&dir.path().join(name));
    }

    let found = sources::resolve(&[pattern(&dir, "a?.c")]).unwrap();
    assert_eq!(found, vec![dir.path().join("a1.c")]);
}

#[test]
fn dots_in_patterns_are_literal() {
    let dir = TempDir::new("sources").unwrap();
    touch(&dir.path().join("mainxc"));

    let err = sources::resolve(&[pattern(&dir, "main*.c")]).unwrap_err();
    assert!(matches!(err, Error::MissingSource(_)));
}

#[test]
fn wildcard_without_matches_is_missing() {
    let dir = TempDir::new("sources").unwrap();
    touch(&dir.path().join("main.h"));

    let err = sources::resolve(&[pattern(&dir, "*.c")]).unwrap_err();
    assert!(err.is_filesystem());
}

#[test]
fn wildcards_in_directories_are_rejected() {
    let dir = TempDir::new("sources").unwrap();
    touch(&dir.path().join("src/main.c"));

    let err = sources::resolve(&[pattern(&dir, "s*/main.c")]).unwrap_err();
    assert!(matches!(err, Error::Pattern(_)));
}

#[test]
fn empty_source_set_is_rejected() {
    assert!(matches!(sources::resolve(&[]), Err(Error::Config(_))));
}

#[test]
fn same_file_through_dot_prefix_is_listed_once() {
    // Relative patterns resolve against the test's working directory.
    let dir = TempDir::new_in(".", "sources").unwrap();
    touch(&dir.path().join("main.c"));
    let relative = PathBuf::from(dir.path().file_name().unwrap());

    let found = sources::resolve(&[
        relative.join("main.c").to_string_lossy().into_owned(),
        format!("./{}/*.c", relative.display()),
    ])
    .unwrap();

    assert_eq!(found, vec![relative.join("main.c")]);
}

#[test]
fn wildcards_skip_hidden_files() {
    let dir = TempDir::new("sources").unwrap();
    touch(&dir.path().join("main.c"));
    touch(&dir.path().join(".hidden.c"));

    let found = sources::resolve(&[pattern(&dir, "*.c")]).unwrap();
    assert_eq!(found, vec![dir.path().join("main.c")]);

    let found = sources::resolve(&[pattern(&dir, ".*.c")]).unwrap();
    assert_eq!(found, vec![dir.path().join(".hidden.c")]);
}
