use strict_uri::{error::ResolveError, Uri};

fn resolve(base: &str, reference: &str) -> String {
    let base = Uri::parse(base).unwrap();
    let r = Uri::parse_reference(reference).unwrap();
    r.resolve_against(&base).unwrap().into_string()
}

#[test]
fn normal_examples() {
    let base = "http://a/b/c/d;p?q";
    assert_eq!(resolve(base, "g:h"), "g:h");
    assert_eq!(resolve(base, "g"), "http://a/b/c/g");
    assert_eq!(resolve(base, "./g"), "http://a/b/c/g");
    assert_eq!(resolve(base, "g/"), "http://a/b/c/g/");
    assert_eq!(resolve(base, "/g"), "http://a/g");
    assert_eq!(resolve(base, "//g"), "http://g");
    assert_eq!(resolve(base, "?y"), "http://a/b/c/d;p?y");
    assert_eq!(resolve(base, "g?y"), "http://a/b/c/g?y");
    assert_eq!(resolve(base, "#s"), "http://a/b/c/d;p?q#s");
    assert_eq!(resolve(base, "g#s"), "http://a/b/c/g#s");
    assert_eq!(resolve(base, "g?y#s"), "http://a/b/c/g?y#s");
    assert_eq!(resolve(base, ";x"), "http://a/b/c/;x");
    assert_eq!(resolve(base, "g;x"), "http://a/b/c/g;x");
    assert_eq!(resolve(base, "g;x?y#s"), "http://a/b/c/g;x?y#s");
    assert_eq!(resolve(base, ""), "http://a/b/c/d;p?q");
    assert_eq!(resolve(base, "."), "http://a/b/c/");
    assert_eq!(resolve(base, "./"), "http://a/b/c/");
    assert_eq!(resolve(base, ".."), "http://a/b/");
    assert_eq!(resolve(base, "../"), "http://a/b/");
    assert_eq!(resolve(base, "../g"), "http://a/b/g");
    assert_eq!(resolve(base, "../.."), "http://a/");
    assert_eq!(resolve(base, "../../"), "http://a/");
    assert_eq!(resolve(base, "../../g"), "http://a/g");
}

#[test]
fn abnormal_examples() {
    let base = "http://a/b/c/d;p?q";
    assert_eq!(resolve(base, "../../../g"), "http://a/g");
    assert_eq!(resolve(base, "../../../../g"), "http://a/g");
    assert_eq!(resolve(base, "/./g"), "http://a/g");
    assert_eq!(resolve(base, "/../g"), "http://a/g");
    assert_eq!(resolve(base, "g."), "http://a/b/c/g.");
    assert_eq!(resolve(base, ".g"), "http://a/b/c/.g");
    assert_eq!(resolve(base, "g.."), "http://a/b/c/g..");
    assert_eq!(resolve(base, "..g"), "http://a/b/c/..g");
    assert_eq!(resolve(base, "./../g"), "http://a/b/g");
    assert_eq!(resolve(base, "./g/."), "http://a/b/c/g/");
    assert_eq!(resolve(base, "g/./h"), "http://a/b/c/g/h");
    assert_eq!(resolve(base, "g/../h"), "http://a/b/c/h");
    assert_eq!(resolve(base, "g;x=1/./y"), "http://a/b/c/g;x=1/y");
    assert_eq!(resolve(base, "g;x=1/../y"), "http://a/b/c/y");
    assert_eq!(resolve(base, "g?y/./x"), "http://a/b/c/g?y/./x");
    assert_eq!(resolve(base, "g?y/../x"), "http://a/b/c/g?y/../x");
    assert_eq!(resolve(base, "g#s/./x"), "http://a/b/c/g#s/./x");
    assert_eq!(resolve(base, "g#s/../x"), "http://a/b/c/g#s/../x");
    // The strict interpretation: a scheme-bearing reference is taken
    // as-is, never as relative to the base.
    assert_eq!(resolve(base, "http:g"), "http:g");
}

#[test]
fn merge_with_empty_base_path() {
    // Errata 4789: the merge is against the base path, so an
    // authority with an empty path yields "/" + reference-path.
    assert_eq!(resolve("http://a", "g"), "http://a/g");
    assert_eq!(resolve("http://a?q", "g"), "http://a/g");
    assert_eq!(resolve("http://a", ""), "http://a");
}

#[test]
fn merge_with_base_path_ending_in_dot_dot() {
    // Errata 4789: a base path ending in "/.." also merges from the
    // root, not from its last "/".
    assert_eq!(resolve("http://a/b/..", "g"), "http://a/g");
    assert_eq!(resolve("http://a/b/c/..", "g"), "http://a/g");
    assert_eq!(resolve("http://a/b/..", "g/h"), "http://a/g/h");
    assert_eq!(resolve("http://a/b/..", "?y"), "http://a/b/..?y");

    // A ".." that is only part of the last segment merges normally.
    assert_eq!(resolve("http://a/b/g..", "h"), "http://a/b/h");
}

#[test]
fn result_is_unparsed_but_grammatical() {
    let base = Uri::parse("http://a/b/c/d;p?q").unwrap();
    let r = Uri::parse_reference("../g").unwrap();
    let t = r.resolve_against(&base).unwrap();
    assert_eq!(t.scheme(), Some("http"));
    assert_eq!(t.host(), Some("a"));
    assert_eq!(t.path(), "/b/g");
    assert_eq!(t.form(), strict_uri::Form::Unnormalized);
    assert_eq!(t.entry_point(), strict_uri::EntryPoint::Uri);
}

#[test]
fn non_absolute_base() {
    let base = Uri::parse_reference("//a/b").unwrap();
    let r = Uri::parse_reference("g").unwrap();
    assert_eq!(
        r.resolve_against(&base).unwrap_err(),
        ResolveError::NonAbsoluteBase
    );

    // A base with a fragment is not absolute either.
    let base = Uri::parse("http://a/b#f").unwrap();
    assert_eq!(
        r.resolve_against(&base).unwrap_err(),
        ResolveError::NonAbsoluteBase
    );
}
