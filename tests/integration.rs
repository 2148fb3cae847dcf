use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_coqdoc")));
    cmd.env_remove("RUST_LOG").env_remove("COQDOC_ASSETS");
    cmd
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn assets_dir() -> String {
    format!("{}/assets", env!("CARGO_MANIFEST_DIR"))
}

fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// -- multi-file mode --

#[test]
fn multi_file_html_with_bindings_and_links() {
    let out = TempDir::new().unwrap();

    cmd()
        .args(["--html", "-d", out.path().to_str().unwrap()])
        .args(["--assets", &assets_dir()])
        .args(["-R", &fixture_path("theories"), "Lib"])
        .arg(fixture_path("theories/Lists.v"))
        .arg(fixture_path("theories/Sets/Fin.v"))
        .assert()
        .success();

    assert_eq!(
        listing(out.path()),
        ["Lib.Lists.html", "Lib.Sets.Fin.html", "coqdoc.css", "index.html"]
    );

    let lists = fs::read_to_string(out.path().join("Lib.Lists.html")).unwrap();
    assert!(lists.contains("Library Lib.Lists"));
    assert!(lists.contains("id=\"Lib.Lists.length\""));
    assert!(lists.contains(
        "href=\"https://coq.inria.fr/doc/V8.20.0/stdlib/Coq.Init.Datatypes.html#Coq.Init.Datatypes.nat\""
    ));
    assert!(lists.contains("href=\"Lib.Lists.html#Lib.Lists.length\""));
    // per-module pages never carry the global index
    assert!(!lists.contains("<div id=\"index\">"));

    let fin = fs::read_to_string(out.path().join("Lib.Sets.Fin.html")).unwrap();
    assert!(fin.contains("href=\"Lib.Lists.html#Lib.Lists.length\""));
    assert!(fin.contains("href=\"Lib.Lists.html#Lib.Lists\""));

    let index = fs::read_to_string(out.path().join("index.html")).unwrap();
    assert!(index.contains("card"));
    assert!(index.contains("length_nil"));
}

#[test]
fn multi_file_toc_and_split_index() {
    let out = TempDir::new().unwrap();

    cmd()
        .args(["--backend=html", "--toc", "--multi-index", "--index", "all"])
        .args(["-d", out.path().to_str().unwrap()])
        .args(["--assets", &assets_dir()])
        .args(["-R", &fixture_path("theories"), "Lib"])
        .arg(fixture_path("theories/Lists.v"))
        .arg(fixture_path("theories/Sets/Fin.v"))
        .assert()
        .success();

    let toc = fs::read_to_string(out.path().join("toc.html")).unwrap();
    let lists_at = toc.find("Library Lib.Lists").unwrap();
    let fin_at = toc.find("Library Lib.Sets.Fin").unwrap();
    assert!(lists_at < fin_at);
    assert!(toc.contains("href=\"Lib.Lists.html#Lib.Lists.2-length\""));

    let main = fs::read_to_string(out.path().join("all.html")).unwrap();
    assert!(main.contains("href=\"all_C.html\""));
    assert!(main.contains("href=\"all_L.html\""));
    let letter_l = fs::read_to_string(out.path().join("all_L.html")).unwrap();
    assert!(letter_l.contains("length_nil"));
    assert!(!letter_l.contains(">card<"));
}

#[test]
fn short_titles_reach_the_toc_page() {
    let out = TempDir::new().unwrap();

    cmd()
        .args(["--html", "--toc", "-s", "--no-index"])
        .args(["-d", out.path().to_str().unwrap()])
        .args(["--assets", &assets_dir()])
        .args(["-R", &fixture_path("theories"), "Lib"])
        .arg(fixture_path("theories/Lists.v"))
        .assert()
        .success();

    let toc = fs::read_to_string(out.path().join("toc.html")).unwrap();
    assert!(toc.contains("<a href=\"Lib.Lists.html#Lib.Lists\">Lib.Lists</a>"));
    assert!(!toc.contains("Library "));
}

#[test]
fn jscoq_is_the_default_backend() {
    let out = TempDir::new().unwrap();

    cmd()
        .args(["-d", out.path().to_str().unwrap()])
        .args(["--assets", &assets_dir()])
        .arg(fixture_path("theories/Lists.v"))
        .assert()
        .success();

    let page = fs::read_to_string(out.path().join("Lists.html")).unwrap();
    assert!(page.contains("jscoq-doc.js"));
    assert!(page.contains("coqdocStart(["));
    assert!(out.path().join("jscoq-doc.js").exists());
}

#[test]
fn first_declared_binding_wins() {
    let work = TempDir::new().unwrap();
    fs::create_dir_all(work.path().join("a/b")).unwrap();
    fs::write(work.path().join("a/b/c.v"), "Definition c := 0.\n").unwrap();

    cmd()
        .current_dir(work.path())
        .args(["--backend=debug", "--no-glob", "-d", "out"])
        .args(["-R", "./a", "Foo", "-Q", "./a/b", "Bar"])
        .arg("./a/b/c.v")
        .assert()
        .success();

    assert!(work.path().join("out/Foo.b.c.txt").exists());
    assert!(!work.path().join("out/Bar.c.txt").exists());
}

#[test]
fn shared_output_name_overwrites() {
    let work = TempDir::new().unwrap();
    fs::create_dir_all(work.path().join("one")).unwrap();
    fs::create_dir_all(work.path().join("two")).unwrap();
    fs::write(work.path().join("one/X.v"), "Definition first := 1.\n").unwrap();
    fs::write(work.path().join("two/X.v"), "Definition second := 2.\n").unwrap();

    cmd()
        .current_dir(work.path())
        .args(["--backend=debug", "--no-glob", "-d", "out", "one/X.v", "two/X.v"])
        .assert()
        .success();

    assert_eq!(listing(&work.path().join("out")), ["X.txt", "index.txt"]);
    let written = fs::read_to_string(work.path().join("out/X.txt")).unwrap();
    assert!(written.contains("second"));
    assert!(!written.contains("first"));
}

// -- single-document modes --

#[test]
fn stdout_debug_without_globs_has_no_links() {
    let assert = cmd()
        .args(["--stdout", "--backend=debug", "--no-glob"])
        .args(["-R", &fixture_path("theories"), "Lib"])
        .arg(fixture_path("theories/Lists.v"))
        .assert()
        .success();

    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(output.starts_with("document \"Documentation\" toc=false index=true"));
    assert!(output.contains("unit Lib.Lists"));
    assert!(output.contains("heading 2 \"Length\""));
    assert!(!output.contains("    ref "));
    assert!(!output.contains("    def "));
}

#[test]
fn stdout_debug_resolves_references() {
    let assert = cmd()
        .args(["--stdout", "--backend=debug"])
        .args(["-R", &fixture_path("theories"), "Lib"])
        .arg(fixture_path("theories/Lists.v"))
        .assert()
        .success();

    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(output.contains("def \"length\" @112-117 def"));
    assert!(output.contains("ref \"length\" @190-195 -> #Lib.Lists.length"));
}

#[test]
fn single_file_keeps_argument_order() {
    let out = TempDir::new().unwrap();
    let target = out.path().join("book.html");

    cmd()
        .args(["--html", "--toc", "-t", "Book"])
        .args(["-o", target.to_str().unwrap()])
        .args(["--assets", &assets_dir()])
        .args(["-R", &fixture_path("theories"), "Lib"])
        .arg(fixture_path("theories/Sets/Fin.v"))
        .arg(fixture_path("theories/Lists.v"))
        .assert()
        .success();

    let page = fs::read_to_string(&target).unwrap();
    assert!(page.contains("<title>Book</title>"));
    let fin_at = page.find("id=\"Lib.Sets.Fin\"").unwrap();
    let lists_at = page.find("id=\"Lib.Lists\"").unwrap();
    assert!(fin_at < lists_at);
    assert!(page.contains("<div id=\"toc\">"));
    assert!(page.contains("<div id=\"index\">"));
    assert!(page.contains("href=\"#Lib.Lists.length\""));
    assert!(out.path().join("coqdoc.css").exists());
}

#[test]
fn body_only_and_light_mode() {
    let assert = cmd()
        .args(["--stdout", "--html", "--body-only", "--no-index", "-l", "-s"])
        .arg(fixture_path("theories/Lists.v"))
        .assert()
        .success();

    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(!output.contains("<html>"));
    assert!(!output.contains("reflexivity"));
    assert!(output.contains("length_nil"));
    assert!(output.contains(">Lists</h1>"));
}

#[test]
fn combined_glob_file() {
    let work = TempDir::new().unwrap();
    let combined = work.path().join("all.glob");
    let lists = fs::read_to_string(fixture_path("theories/Lists.glob")).unwrap();
    let fin = fs::read_to_string(fixture_path("theories/Sets/Fin.glob")).unwrap();
    fs::write(&combined, format!("{}{}", lists, fin)).unwrap();

    let assert = cmd()
        .args(["--stdout", "--backend=debug"])
        .args(["--glob-from", combined.to_str().unwrap()])
        .args(["-R", &fixture_path("theories"), "Lib"])
        .arg(fixture_path("theories/Sets/Fin.v"))
        .assert()
        .success();

    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(output.contains("def \"card\" @60-63 def"));
    // Lib.Lists is not part of this run, so links to it stay unresolved.
    assert!(output.contains("ref \"length\" @83-88 -> unresolved"));
}

// -- non-fatal problems --

#[test]
fn missing_glob_warns_and_continues() {
    let work = TempDir::new().unwrap();
    fs::write(work.path().join("Solo.v"), "Definition x := 1.\n").unwrap();

    cmd()
        .current_dir(work.path())
        .args(["--stdout", "--backend=debug", "Solo.v"])
        .assert()
        .success()
        .stdout(predicate::str::contains("unit Solo"))
        .stderr(predicate::str::contains("cannot read glob file"));
}

#[test]
fn missing_assets_warn_and_continue() {
    let out = TempDir::new().unwrap();

    cmd()
        .args(["--html", "--no-glob", "-d", out.path().to_str().unwrap()])
        .args(["--assets", out.path().join("nowhere").to_str().unwrap()])
        .arg(fixture_path("theories/Lists.v"))
        .assert()
        .success()
        .stderr(predicate::str::contains("cannot copy asset"));

    assert!(out.path().join("Lists.html").exists());
    assert!(!out.path().join("coqdoc.css").exists());
}

// -- fatal problems --

#[test]
fn missing_input_fails_without_output() {
    let out = TempDir::new().unwrap();

    cmd()
        .args(["-d", out.path().to_str().unwrap()])
        .arg(fixture_path("theories/Lists.v"))
        .arg(fixture_path("theories/Missing.v"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("coqdoc: invalid input: no such file"));

    assert!(listing(out.path()).is_empty());
}

#[test]
fn unreadable_input_fails_without_output() {
    let work = TempDir::new().unwrap();
    fs::write(work.path().join("A.v"), "Definition a := 1.\n").unwrap();
    fs::write(work.path().join("B.v"), b"Definition caf\xe9 := 2.\n").unwrap();

    cmd()
        .current_dir(work.path())
        .args(["--backend=debug", "--no-glob", "-d", "out", "A.v", "B.v"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "coqdoc: documentation generation failed: failed to read B.v",
        ));

    assert!(!work.path().join("out").exists());
}

#[test]
fn directory_input_fails_without_output() {
    let work = TempDir::new().unwrap();
    fs::create_dir_all(work.path().join("theories")).unwrap();

    cmd()
        .current_dir(work.path())
        .args(["--backend=debug", "-o", "all.txt", "theories"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to read theories"));

    assert!(!work.path().join("all.txt").exists());
}

#[test]
fn relative_output_file_goes_under_directory() {
    let work = TempDir::new().unwrap();
    fs::create_dir_all(work.path().join("html")).unwrap();
    fs::write(work.path().join("A.v"), "Definition a := 1.\n").unwrap();

    cmd()
        .current_dir(work.path())
        .args(["--backend=debug", "--no-glob", "-d", "html", "-o", "all.txt", "A.v"])
        .assert()
        .success();

    assert!(work.path().join("html/all.txt").exists());
    assert!(!work.path().join("all.txt").exists());
}

#[test]
fn unwritable_output_fails() {
    let out = TempDir::new().unwrap();
    let target = out.path().join("missing-dir").join("doc.html");

    cmd()
        .args(["-o", target.to_str().unwrap()])
        .arg(fixture_path("theories/Lists.v"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to write"));
}

// -- command line --

#[test]
fn unknown_flag_is_usage_error() {
    cmd()
        .args(["--frobnicate", "A.v"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn empty_output_is_usage_error() {
    cmd()
        .args(["-o", "", "A.v"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty());
}

#[test]
fn binding_needs_two_arguments() {
    cmd().args(["-R", "theories"]).assert().code(1);
}

#[test]
fn help_exits_with_one() {
    cmd()
        .arg("--help")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--glob-from"));
}

#[test]
fn version_exits_with_zero() {
    cmd()
        .arg("--version")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("coqdoc"));
}
