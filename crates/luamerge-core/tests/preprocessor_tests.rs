use indoc::indoc;
use luamerge_core::{ModulePreprocessor, PreprocessError};
use luamerge_test_helpers::workspace::{mock_fs, TempWorkspace};
use std::path::PathBuf;

fn session(code: &str, files: &[(&str, &str)]) -> ModulePreprocessor {
    ModulePreprocessor::with_file_system(code, vec![PathBuf::from("/ws")], mock_fs(files))
}

#[test]
fn test_require_removed_and_inlined_once() {
    let mut pp = session(
        indoc! {r#"
            require("mod")
            a()
            require("mod")
            b()
        "#},
        &[("/ws/mod.lua", "function a() end\nfunction b() end")],
    );

    pp.expand_require().unwrap();

    assert_eq!(pp.code(), "function a() end\nfunction b() end\na()\nb()");
    assert_eq!(pp.code().matches("function a()").count(), 1);
}

#[test]
fn test_dotted_module_resolves_to_nested_file() {
    let mut pp = session(
        "require('a.b.my_module')\nuse()",
        &[("/ws/a/b/my_module.lua", "function use() end")],
    );

    pp.expand_require().unwrap();
    assert_eq!(pp.code(), "function use() end\nuse()");
}

#[test]
fn test_unresolved_module_aborts_expansion() {
    let source = "require(\"present\")\nrequire(\"absent\")\nrun()";
    let mut pp = session(source, &[("/ws/present.lua", "p = 1")]);

    let err = pp.expand_require().unwrap_err();
    match &err {
        PreprocessError::ModuleNotFound { module, .. } => assert_eq!(module, "absent"),
        other => panic!("expected ModuleNotFound, got {}", other),
    }
    assert!(err.to_string().contains("absent"));
    assert_eq!(pp.code(), source);
}

#[test]
fn test_unresolved_nested_module_fails_whole_expansion() {
    let mut pp = session(
        "require(\"a\")",
        &[("/ws/a.lua", "require(\"b\")\na = 1")],
    );

    assert!(matches!(
        pp.expand_require(),
        Err(PreprocessError::ModuleNotFound { .. })
    ));
}

#[test]
fn test_deep_chain_is_iterative() {
    let names: Vec<String> = (0..200).map(|i| format!("m{}", i)).collect();
    let contents: Vec<String> = names
        .iter()
        .enumerate()
        .map(|(i, name)| match names.get(i + 1) {
            Some(next) => format!("require(\"{}\")\n{} = true", next, name),
            None => format!("{} = true", name),
        })
        .collect();
    let paths: Vec<String> = names.iter().map(|name| format!("/ws/{}.lua", name)).collect();
    let files: Vec<(&str, &str)> = paths
        .iter()
        .zip(&contents)
        .map(|(path, content)| (path.as_str(), content.as_str()))
        .collect();

    let mut pp = session("require(\"m0\")", &files);
    pp.expand_require().unwrap();

    assert_eq!(pp.expanded_count(), 200);
    assert!(pp.code().starts_with("m199 = true\n"));
    assert!(pp.code().ends_with("m0 = true"));
}

#[test]
fn test_comment_marker_inside_string_is_cut() {
    let mut pp = session(
        "require(\"m\")\nurl = \"http://x--y\"",
        &[("/ws/m.lua", "")],
    );

    pp.expand_require().unwrap();
    assert_eq!(pp.code(), "url = \"http://x");
}

#[test]
fn test_real_filesystem_search_paths() {
    let ws = TempWorkspace::new();
    ws.file("first/shared.lua", "from_first = 1");
    ws.file("second/shared.lua", "from_second = 1");
    ws.file("second/only.lua", "only = 1");

    let mut pp = ModulePreprocessor::with_search_paths(
        "require(\"shared\")\nrequire(\"only\")",
        [ws.root().join("first"), ws.root().join("second")],
    );
    pp.expand_require().unwrap();

    assert_eq!(pp.code(), "only = 1\nfrom_first = 1");
}

#[test]
fn test_search_path_added_before_expansion() {
    let ws = TempWorkspace::new();
    ws.file("lib/late.lua", "late = 1");

    let mut pp = ModulePreprocessor::new("require('late')");
    assert!(pp.search_paths().is_empty());
    pp.add_search_path(ws.root().join("lib"));
    pp.add_search_path(ws.root().join("lib"));
    assert_eq!(pp.search_paths().len(), 1);

    pp.expand_require().unwrap();
    assert_eq!(pp.into_code(), "late = 1");
}
