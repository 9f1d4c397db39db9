use strict_uri::{error::NormalizeError, EntryPoint, Form, Uri};

fn normalize(input: &str) -> String {
    Uri::parse(input).unwrap().normalize().unwrap().into_string()
}

#[test]
fn case_and_pct_normalization() {
    assert_eq!(
        normalize("eXAMPLE://a/./b/../b/%63/%7bfoo%7d"),
        "example://a/b/c/%7Bfoo%7D"
    );
    assert_eq!(normalize("HTTP://Example.COM/"), "http://example.com/");
    assert_eq!(normalize("http://example.com/%7Ezim/"), "http://example.com/~zim/");
    assert_eq!(normalize("http://example.com/?%7b#%7d"), "http://example.com/?%7B#%7D");
}

#[test]
fn scheme_defaults() {
    assert_eq!(normalize("HTTP://Example.COM:80/"), "http://example.com/");
    assert_eq!(normalize("HTTP://Example.COM:0080/"), "http://example.com/");
    assert_eq!(normalize("http://example.com"), "http://example.com/");
    assert_eq!(normalize("http://example.com:"), "http://example.com/");
    assert_eq!(normalize("https://example.com:443"), "https://example.com/");
    assert_eq!(normalize("ftp://example.com:21/x"), "ftp://example.com/x");
    assert_eq!(normalize("ws://example.com:80"), "ws://example.com");
    assert_eq!(normalize("wss://example.com:443"), "wss://example.com");

    // Non-default ports are kept, with leading zeros stripped.
    assert_eq!(normalize("http://example.com:8080/"), "http://example.com:8080/");
    assert_eq!(normalize("http://example.com:0090/"), "http://example.com:90/");

    // Unlisted schemes get no defaults.
    assert_eq!(normalize("gem://example.com:80"), "gem://example.com:80");
}

#[test]
fn host_normalization() {
    assert_eq!(normalize("http://example.com./"), "http://example.com/");
    assert_eq!(
        normalize("http://B\u{fc}cher.DE/"),
        "http://b\u{fc}cher.de/"
    );
    assert_eq!(
        normalize("http://xn--bcher-kva.de/"),
        "http://b\u{fc}cher.de/"
    );
    assert_eq!(
        normalize("http://xn%2D%2Dui8h%2Edigilicious%2Ecom/"),
        "http://\u{1f354}.digilicious.com/"
    );

    // IP addresses and literals are carried through untouched.
    assert_eq!(normalize("http://127.0.0.1/"), "http://127.0.0.1/");
    assert_eq!(normalize("http://[::1]/"), "http://[::1]/");
    assert_eq!(
        normalize("http://[fe80::1%25eth0]/"),
        "http://[fe80::1%25eth0]/"
    );

    let long = format!("http://{}/", "a".repeat(256));
    let e = Uri::parse(long.as_str()).unwrap().normalize().unwrap_err();
    assert_eq!(e, NormalizeError::HostTooLong);
}

#[test]
fn dot_segments_in_every_path() {
    assert_eq!(normalize("http://a/b/c/./../../g"), "http://a/g");

    // Rootless and relative paths are folded too.
    assert_eq!(normalize("urn:a/b/../c"), "urn:a/c");
    let u = Uri::parse_reference("mid/content=5/../6").unwrap();
    assert_eq!(u.normalize().unwrap().as_str(), "mid/6");
}

#[test]
fn userinfo_is_kept() {
    assert_eq!(
        normalize("http://USER%7e@example.com/"),
        "http://USER%7e@example.com/"
    );
}

#[test]
fn equivalence_pairs() {
    let pairs = [
        ("example://a/b/c/%7Bfoo%7D", "eXAMPLE://a/./b/../b/%63/%7bfoo%7d"),
        ("http://example.com/", "HTTP://Example.COM:80/"),
        ("http://example.com/", "http://example.com"),
        ("http://example.com/", "http://example.com./"),
        ("http://example.com/%7Bfoo%7D", "http://example.com/%7bfoo%7d"),
        ("http://example.com/~zim", "http://example.com/%7Ezim"),
        ("http://b\u{fc}cher.de/", "http://xn--bcher-kva.de/"),
        ("http://example.com/a/c", "http://example.com/a/b/../c"),
        ("ftp://example.com", "FTP://example.com:21"),
        ("https://example.com/", "https://example.com:00443"),
    ];
    for (a, b) in pairs {
        let a = Uri::parse(a).unwrap().normalize().unwrap();
        let b = Uri::parse(b).unwrap().normalize().unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn normalization_is_idempotent() {
    let inputs = [
        "eXAMPLE://a/./b/../b/%63/%7bfoo%7d",
        "HTTP://Example.COM:0080/",
        "http://B\u{fc}cher.DE/x?%7b",
        "http://xn%2D%2Dui8h%2Edigilicious%2Ecom/",
    ];
    for input in inputs {
        let once = Uri::parse(input).unwrap().normalize().unwrap();
        let twice = once.normalize().unwrap();
        assert_eq!(once, twice);
    }
}

#[test]
fn tags_survive() {
    let u = Uri::parse("HTTP://Example.COM/").unwrap();
    assert_eq!(u.form(), Form::Unnormalized);
    let n = u.normalize().unwrap();
    assert_eq!(n.form(), Form::Normalized);
    assert_eq!(n.entry_point(), EntryPoint::Uri);

    let u = Uri::parse_reference("a/./b").unwrap();
    let n = u.normalize().unwrap();
    assert_eq!(n.as_str(), "a/b");
    assert_eq!(n.entry_point(), EntryPoint::UriRef);

    // Tags play no part in equality: same text compares equal.
    let m = Uri::parse_reference("a/b").unwrap();
    assert_eq!(n, m);
}
