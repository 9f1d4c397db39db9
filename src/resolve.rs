use crate::component::Components;
use std::borrow::Cow;

/// Removes dot segments from a path, following the algorithm of
/// RFC 3986, Section 5.2.4. The rules apply to rootless and relative
/// paths as well: `mid/content=5/../6` becomes `mid/6`.
pub(crate) fn remove_dot_segments(path: &str) -> String {
    let mut input = path;
    let mut output = String::with_capacity(path.len());
    while !input.is_empty() {
        if let Some(rest) = input.strip_prefix("../") {
            input = rest;
        } else if let Some(rest) = input.strip_prefix("./") {
            input = rest;
        } else if input.starts_with("/./") {
            input = &input[2..];
        } else if input == "/." {
            input = "/";
        } else if input.starts_with("/../") {
            input = &input[3..];
            truncate_last_segment(&mut output);
        } else if input == "/.." {
            input = "/";
            truncate_last_segment(&mut output);
        } else if input == "." || input == ".." {
            input = "";
        } else {
            // Move the first segment, including any leading "/",
            // from the input to the output.
            let from = usize::from(input.starts_with('/'));
            let end = input[from..].find('/').map_or(input.len(), |i| i + from);
            output.push_str(&input[..end]);
            input = &input[end..];
        }
    }
    output
}

fn truncate_last_segment(output: &mut String) {
    match output.rfind('/') {
        Some(i) => output.truncate(i),
        None => output.clear(),
    }
}

/// Merges a reference path with the base path, per RFC 3986,
/// Section 5.2.3 as corrected by Errata 4789: the merge is against
/// the base path, so a base with an authority and an empty path, or
/// a base path ending in "/..", yields `"/" + reference-path`.
pub(crate) fn merge(base: &Components<'_>, r_path: &str) -> String {
    let base_path = base.path.unwrap_or("");
    if (base.authority.is_some() && base_path.is_empty()) || base_path.ends_with("/..") {
        return format!("/{}", r_path);
    }
    // Everything up to and including the last "/" of the base path.
    let dir = &base_path[..base_path.rfind('/').map_or(0, |i| i + 1)];
    format!("{}{}", dir, r_path)
}

/// Guards a recomposed path against re-parsing ambiguity: a path
/// starting with "//" next to an absent authority would read back as
/// an authority, and a leading segment with a ":" next to an absent
/// scheme would read back as one (RFC 3986, Section 4.2).
pub(crate) fn guard_path<'a>(
    path: &'a str,
    has_scheme: bool,
    has_authority: bool,
) -> Cow<'a, str> {
    if !has_authority && path.starts_with("//") {
        return Cow::Owned(format!("/.{}", path));
    }
    if !has_scheme && !has_authority {
        let first = path.split('/').next().unwrap_or("");
        if first.contains(':') {
            return Cow::Owned(format!("./{}", path));
        }
    }
    Cow::Borrowed(path)
}

/// Computes the resolution target of a reference against a base,
/// per RFC 3986, Section 5.2.2, recomposed into a string.
///
/// The base must have a scheme.
pub(crate) fn target(base: &Components<'_>, r: &Components<'_>) -> String {
    let mut t = Components::default();
    let path;

    if r.scheme.is_some() {
        t.scheme = r.scheme;
        t.authority = r.authority;
        path = remove_dot_segments(r.path.unwrap_or(""));
        t.query = r.query;
    } else {
        if r.authority.is_some() {
            t.authority = r.authority;
            path = remove_dot_segments(r.path.unwrap_or(""));
            t.query = r.query;
        } else {
            let r_path = r.path.unwrap_or("");
            if r_path.is_empty() {
                path = base.path.unwrap_or("").to_owned();
                t.query = r.query.or(base.query);
            } else {
                if r_path.starts_with('/') {
                    path = remove_dot_segments(r_path);
                } else {
                    path = remove_dot_segments(&merge(base, r_path));
                }
                t.query = r.query;
            }
            t.authority = base.authority;
        }
        t.scheme = base.scheme;
    }
    t.fragment = r.fragment;

    let path = guard_path(&path, t.scheme.is_some(), t.authority.is_some());
    t.path = Some(&path);
    t.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_segments() {
        assert_eq!(remove_dot_segments("/a/b/c/./../../g"), "/a/g");
        assert_eq!(remove_dot_segments("mid/content=5/../6"), "mid/6");
        assert_eq!(remove_dot_segments("/./"), "/");
        assert_eq!(remove_dot_segments("/."), "/");
        assert_eq!(remove_dot_segments("/../"), "/");
        assert_eq!(remove_dot_segments("/.."), "/");
        assert_eq!(remove_dot_segments("."), "");
        assert_eq!(remove_dot_segments(".."), "");
        assert_eq!(remove_dot_segments("../.."), "");
        assert_eq!(remove_dot_segments("/a/../../b"), "/b");
        assert_eq!(remove_dot_segments("a/./b"), "a/b");
        assert_eq!(remove_dot_segments(""), "");
        assert_eq!(remove_dot_segments("/a/b/.."), "/a/");
        assert_eq!(remove_dot_segments("..a/b"), "..a/b");
    }

    #[test]
    fn merge_against_base_path() {
        let mut base = Components::default();
        base.authority = Some("a");
        base.path = Some("");
        assert_eq!(merge(&base, "g"), "/g");

        base.path = Some("/b/c/d;p");
        assert_eq!(merge(&base, "g"), "/b/c/g");

        // A base path ending in "/.." merges from the root.
        base.path = Some("/b/..");
        assert_eq!(merge(&base, "g"), "/g");
        base.path = Some("/b/c/..");
        assert_eq!(merge(&base, "g"), "/g");

        let mut no_auth = Components::default();
        no_auth.path = Some("b/c");
        assert_eq!(merge(&no_auth, "g"), "b/g");
        no_auth.path = Some("b");
        assert_eq!(merge(&no_auth, "g"), "g");
    }

    #[test]
    fn path_guards() {
        assert_eq!(guard_path("//b", true, false), "/.//b");
        assert_eq!(guard_path("//b", true, true), "//b");
        assert_eq!(guard_path("x:y/z", false, false), "./x:y/z");
        assert_eq!(guard_path("x:y/z", true, false), "x:y/z");
        assert_eq!(guard_path("a/x:y", false, false), "a/x:y");
    }
}
