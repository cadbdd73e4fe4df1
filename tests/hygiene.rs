//! Hygiene: enforces coding standards at test time
//!
//! These tests scan the production sources under `src/` for antipatterns.
//! Each pattern has a budget (ideally zero). If you must add one, fix an
//! existing one first; the budget never grows.

use std::fs;
use std::path::Path;

/// A forbidden pattern and how many occurrences are tolerated.
struct Rule {
    pattern: &'static str,
    budget: usize,
    why: &'static str,
}

// Panics: these crash the widget inside the host page.
const UNWRAP: Rule = Rule { pattern: ".unwrap()", budget: 0, why: "propagate with `?` instead" };
const EXPECT: Rule = Rule { pattern: ".expect(", budget: 0, why: "propagate with `?` instead" };
const PANIC: Rule = Rule { pattern: "panic!(", budget: 0, why: "return a MapperError" };
const UNREACHABLE: Rule = Rule { pattern: "unreachable!(", budget: 0, why: "model the state instead" };
const TODO: Rule = Rule { pattern: "todo!(", budget: 0, why: "stubs are not shipped" };
const UNIMPLEMENTED: Rule = Rule { pattern: "unimplemented!(", budget: 0, why: "stubs are not shipped" };

// Silent loss: discards errors without inspecting.
const SILENT_DISCARD: Rule = Rule { pattern: "let _ =", budget: 0, why: "log or propagate the error" };
const DOT_OK: Rule = Rule { pattern: ".ok()", budget: 0, why: "log or propagate the error" };

// Browser side effects.
const LEAKED_CLOSURE: Rule = Rule { pattern: ".forget()", budget: 0, why: "store listeners on the mapper" };
const GLOBAL_BODY: Rule = Rule { pattern: ".body()", budget: 0, why: "style the drawing surface, not the page" };

// Style / structure.
const ALLOW_DEAD_CODE: Rule = Rule { pattern: "#[allow(dead_code)]", budget: 0, why: "delete unused code" };

struct SourceFile {
    path: String,
    content: String,
}

/// Collect production `.rs` files from `src/`, excluding `*_test.rs`.
fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect_rs_files(Path::new("src"), &mut files);
    files
}

fn collect_rs_files(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, out);
            continue;
        }
        let path_str = path.to_string_lossy().to_string();
        if !path_str.ends_with(".rs") || path_str.ends_with("_test.rs") {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push(SourceFile { path: path_str, content });
        }
    }
}

/// Assert that `rule.pattern` occurs at most `rule.budget` times across `src/`.
fn check(rule: &Rule) {
    let files = source_files();
    assert!(!files.is_empty(), "no sources found; run from the crate root");

    let hits: Vec<(String, usize)> = files
        .iter()
        .filter_map(|file| {
            let count = file.content.lines().filter(|line| line.contains(rule.pattern)).count();
            (count > 0).then(|| (file.path.clone(), count))
        })
        .collect();
    let count: usize = hits.iter().map(|(_, c)| c).sum();
    let listing = hits.iter().map(|(path, c)| format!("  {path}: {c}")).collect::<Vec<_>>().join("\n");

    assert!(
        count <= rule.budget,
        "`{}` budget exceeded: found {count}, max {} ({}).\n{listing}",
        rule.pattern,
        rule.budget,
        rule.why
    );
}

#[test]
fn unwrap_budget() {
    check(&UNWRAP);
}

#[test]
fn expect_budget() {
    check(&EXPECT);
}

#[test]
fn panic_budget() {
    check(&PANIC);
}

#[test]
fn unreachable_budget() {
    check(&UNREACHABLE);
}

#[test]
fn todo_budget() {
    check(&TODO);
}

#[test]
fn unimplemented_budget() {
    check(&UNIMPLEMENTED);
}

#[test]
fn silent_discard_budget() {
    check(&SILENT_DISCARD);
}

#[test]
fn dot_ok_budget() {
    check(&DOT_OK);
}

#[test]
fn leaked_closure_budget() {
    check(&LEAKED_CLOSURE);
}

#[test]
fn global_body_budget() {
    check(&GLOBAL_BODY);
}

#[test]
fn allow_dead_code_budget() {
    check(&ALLOW_DEAD_CODE);
}
