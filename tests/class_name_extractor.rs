use std::error::Error;
use std::path::Path;

use assertgen::errors::AssertgenError;
use assertgen::fs::mock::MockFileSystem;
use assertgen::scan::extract::{name_from_compiled, names_from_source};
use assertgen::scan::{extract_class_names, ClassName};

type TestResult = Result<(), Box<dyn Error>>;

fn qualified(names: &[ClassName]) -> Vec<&str> {
    names.iter().map(ClassName::qualified).collect()
}

#[test]
fn source_file_uses_declared_package() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file(
        "src/org/example/Hello.java",
        "// header\npackage org.example;\n\nimport java.util.List;\n\npublic class Hello {\n  class Inner {}\n}\n",
    );

    let names = extract_class_names(&fs, Path::new("src/org/example/Hello.java"), Path::new("src"))?;
    assert_eq!(qualified(&names), vec!["org.example.Hello"]);
    assert_eq!(names[0].package(), "org.example");
    assert_eq!(names[0].simple_name(), "Hello");
    Ok(())
}

#[test]
fn every_top_level_type_is_enumerated() {
    let text = r#"
package shapes;

/* class Commented {} */
public sealed interface Shape permits Circle, Square {}
final class Circle implements Shape { String s = "class InString {}"; }
record Square(int side) implements Shape {}
enum Kind { ROUND, SQUARE }
@interface Marker {}
"#;
    let names = names_from_source(text, "Shape");
    assert_eq!(
        qualified(&names),
        vec![
            "shapes.Shape",
            "shapes.Circle",
            "shapes.Square",
            "shapes.Kind",
            "shapes.Marker"
        ]
    );
}

#[test]
fn class_literal_is_not_a_declaration() {
    let text = "package a;\nclass Uses { Object o = String.class; }\n";
    let names = names_from_source(text, "Uses");
    assert_eq!(qualified(&names), vec!["a.Uses"]);
}

#[test]
fn default_package_and_fallback_to_file_stem() {
    let names = names_from_source("public class Plain {}", "Plain");
    assert_eq!(qualified(&names), vec!["Plain"]);
    assert_eq!(names[0].package(), "");

    let names = names_from_source("package p;\n// nothing declared\n", "Empty");
    assert_eq!(qualified(&names), vec!["p.Empty"]);
}

#[test]
fn package_metadata_and_directories_yield_nothing() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file("src/org/example/package-info.java", "package org.example;");
    fs.add_file("src/module-info.java", "module m {}");
    fs.add_dir("src/org/example/nested.java");

    for path in [
        "src/org/example/package-info.java",
        "src/module-info.java",
        "src/org/example/nested.java",
    ] {
        let names = extract_class_names(&fs, Path::new(path), Path::new("src"))?;
        assert!(names.is_empty(), "{path} should yield no names");
    }
    Ok(())
}

#[test]
fn compiled_names_come_from_the_relative_path() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file("classes/org/example/Outer$Inner.class", vec![0xCA, 0xFE]);
    fs.add_file("classes/org/example/Outer$1.class", vec![0xCA, 0xFE]);
    fs.add_file("classes/org/example/Outer$1Local.class", vec![0xCA, 0xFE]);

    let names = extract_class_names(
        &fs,
        Path::new("classes/org/example/Outer$Inner.class"),
        Path::new("classes"),
    )?;
    assert_eq!(qualified(&names), vec!["org.example.Outer.Inner"]);
    assert_eq!(names[0].type_name(), "Outer.Inner");

    for anonymous in ["classes/org/example/Outer$1.class", "classes/org/example/Outer$1Local.class"] {
        let names = extract_class_names(&fs, Path::new(anonymous), Path::new("classes"))?;
        assert!(names.is_empty(), "{anonymous} should be excluded");
    }
    Ok(())
}

#[test]
fn compiled_name_edge_cases() {
    assert_eq!(
        name_from_compiled(Path::new("Top.class")).map(|n| n.qualified().to_string()),
        Some("Top".to_string())
    );
    assert!(name_from_compiled(Path::new("a/Outer$.class")).is_none());
    assert!(name_from_compiled(Path::new("a/$Synthetic.class")).is_none());
}

#[test]
fn unknown_extension_is_a_hard_error() {
    let fs = MockFileSystem::new();
    fs.add_file("src/org/example/notes.txt", "hello");

    match extract_class_names(&fs, Path::new("src/org/example/notes.txt"), Path::new("src")) {
        Err(AssertgenError::UnsupportedExtension { path, extension }) => {
            assert_eq!(path, Path::new("src/org/example/notes.txt"));
            assert_eq!(extension, "txt");
            assert!(
                AssertgenError::UnsupportedExtension { path, extension }.is_configuration_error()
            );
        }
        other => panic!("expected UnsupportedExtension, got {:?}", other),
    }
}
