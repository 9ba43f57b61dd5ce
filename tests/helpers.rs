use buildrun::{diagnostics::Summary, helpers::split_flags, ExitState, Invocation};
use nix::sys::signal::Signal;
use test_log::test;

#[test]
fn split_plain_flags() {
    assert_eq!(split_flags("  -Wall   -O2 -g "), vec!["-Wall", "-O2", "-g"]);
    assert!(split_flags("   ").is_empty());
}

#[test]
fn split_quoted_flags() {
    assert_eq!(
        split_flags(r#"-DNAME="a b" '-Wl,-rpath,/opt/my lib' -Wextra"#),
        vec!["-DNAME=a b", "-Wl,-rpath,/opt/my lib", "-Wextra"]
    );
    assert_eq!(split_flags(r#"'say "hi"'"#), vec![r#"say "hi""#]);
}

#[test]
fn gcc_output_is_counted() {
    let stderr = "\
main.c: In function 'main':
main.c:3:9: warning: unused variable 'x' [-Wunused-variable]
main.c:7:5: error: 'y' undeclared (first use in this function)
main.c:7:5: note: each undeclared identifier is reported only once
main.c:12:5: optimized: loop vectorized using 32 byte vectors
main.c:20:5: missed: couldn't vectorize loop
collect2: error: ld returned 1 exit status
";
    let summary = Summary::scan(stderr);
    assert_eq!(
        summary,
        Summary {
            errors: 2,
            warnings: 1,
            notes: 1,
            optimized: 1,
            missed: 1,
        }
    );
    assert!(!summary.is_clean());
    assert_eq!(
        summary.to_string(),
        "2 errors, 1 warning, 1 note, 1 optimized / 1 missed"
    );
}

#[test]
fn fatal_errors_count_as_errors() {
    let summary = Summary::scan("cc1: fatal error: nope.c: No such file or directory\n");
    assert_eq!(summary.errors, 1);
}

#[test]
fn clean_output_has_nothing_to_count() {
    let summary = Summary::scan("");
    assert!(summary.is_clean());
    assert_eq!(summary.to_string(), "0 errors, 0 warnings");
}

#[test]
fn invocations_render_like_a_command_line() {
    let invocation = Invocation::new("gdb")
        .args(["-batch", "-ex", "run"])
        .arg("output/my prog.exe");
    assert_eq!(invocation.to_string(), "gdb -batch -ex run 'output/my prog.exe'");
}

#[test]
fn only_a_zero_exit_is_success() {
    assert!(ExitState::Exited(0).success());
    assert!(!ExitState::Exited(1).success());
    assert!(!ExitState::Signaled(Signal::SIGSEGV).success());
    assert_eq!(ExitState::Signaled(Signal::SIGSEGV).to_string(), "terminated by SIGSEGV");
}
