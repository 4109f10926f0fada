use std::error::Error;

use assertgen::errors::AssertgenError;
use assertgen::patterns::compile;
use assertgen::patterns::compiler::pattern_to_regex;
use proptest::prelude::*;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn literal_pattern_matches_only_itself() -> TestResult {
    let m = compile("org.example.Hello")?;
    assert!(m.matches("org.example.Hello"));
    assert!(!m.matches("org.example.HelloWorld"));
    assert!(!m.matches("org.example"));
    // `.` is literal, not "any character".
    assert!(!m.matches("orgXexample.Hello"));
    Ok(())
}

#[test]
fn single_wildcard_stays_within_one_segment() -> TestResult {
    let m = compile("a.b.*")?;
    assert!(m.matches("a.b.C"));
    assert!(!m.matches("a.b.c.D"));
    assert!(!m.matches("a.b."));
    assert!(!m.matches("a.b"));
    Ok(())
}

#[test]
fn double_wildcard_appends_directly_to_prefix() -> TestResult {
    let m = compile("a.b**")?;
    assert!(m.matches("a.b"));
    assert!(m.matches("a.b.c.D"));
    assert!(m.matches("a.bxyz"));
    assert!(!m.matches("a.c"));
    Ok(())
}

#[test]
fn double_wildcard_is_not_split_into_two_singles() {
    let regex = pattern_to_regex("org.**");
    assert_eq!(regex, "^(?:org\\.[A-Za-z0-9_.]*)$");

    let regex = pattern_to_regex("*.Foo");
    assert_eq!(regex, "^(?:[A-Za-z0-9_]+\\.Foo)$");
}

#[test]
fn leading_double_wildcard_matches_any_package() -> TestResult {
    let m = compile("**.internal.*")?;
    assert!(m.matches("org.example.internal.Impl"));
    assert!(m.matches(".internal.Impl"));
    assert!(!m.matches("org.example.internal.deep.Impl"));
    Ok(())
}

#[test]
fn dollar_is_literal() -> TestResult {
    let m = compile("a.Outer$Inner")?;
    assert!(m.matches("a.Outer$Inner"));
    assert!(!m.matches("a.Outer"));
    Ok(())
}

#[test]
fn matching_is_anchored() -> TestResult {
    let m = compile("example.*")?;
    assert!(!m.matches("org.example.Hello"));
    assert!(!m.matches("example.Hello.extra"));
    Ok(())
}

#[test]
fn invalid_pattern_names_the_pattern() {
    match compile("org.(broken") {
        Err(AssertgenError::InvalidPattern { pattern, .. }) => {
            assert_eq!(pattern, "org.(broken");
        }
        other => panic!("expected InvalidPattern, got {:?}", other),
    }
}

fn dotted_name() -> impl Strategy<Value = String> {
    proptest::collection::vec("[A-Za-z_][A-Za-z0-9_]{0,8}", 1..5).prop_map(|s| s.join("."))
}

proptest! {
    #[test]
    fn literal_names_match_themselves_only(name in dotted_name()) {
        let m = compile(&name).unwrap();
        prop_assert!(m.matches(&name));
        let suffixed = format!("{name}x");
        prop_assert!(!m.matches(&suffixed));
    }

    #[test]
    fn package_double_wildcard_matches_every_nested_name(
        prefix in dotted_name(),
        rest in dotted_name(),
    ) {
        let m = compile(&format!("{prefix}**")).unwrap();
        prop_assert!(m.matches(&prefix));
        let nested = format!("{prefix}.{rest}");
        prop_assert!(m.matches(&nested));
    }

    #[test]
    fn single_wildcard_never_crosses_a_dot(
        prefix in dotted_name(),
        a in "[A-Za-z0-9_]{1,6}",
        b in "[A-Za-z0-9_]{1,6}",
    ) {
        let m = compile(&format!("{prefix}.*")).unwrap();
        let one = format!("{prefix}.{a}");
        let two = format!("{prefix}.{a}.{b}");
        prop_assert!(m.matches(&one));
        prop_assert!(!m.matches(&two));
    }
}
