use crate::{
    component::{Components, HostKind},
    encoding::{hex_value, is_ascii_unreserved, HEX_DIGITS},
    error::NormalizeError,
    resolve::{guard_path, remove_dot_segments},
};
use idna::Config;
use unicode_normalization::UnicodeNormalization;

/// Hosts longer than this, after percent-encoding normalization,
/// are rejected rather than handed to IDNA.
const MAX_HOST_LENGTH: usize = 255;

struct SchemeDefaults {
    scheme: &'static str,
    default_path: &'static str,
    default_port: u32,
}

// Scheme-specific defaults, after
// <https://url.spec.whatwg.org/#url-miscellaneous>.
const SPECIAL: &[SchemeDefaults] = &[
    SchemeDefaults { scheme: "ftp", default_path: "", default_port: 21 },
    SchemeDefaults { scheme: "gopher", default_path: "", default_port: 70 },
    SchemeDefaults { scheme: "http", default_path: "/", default_port: 80 },
    SchemeDefaults { scheme: "https", default_path: "/", default_port: 443 },
    SchemeDefaults { scheme: "ws", default_path: "", default_port: 80 },
    SchemeDefaults { scheme: "wss", default_path: "", default_port: 443 },
];

/// Normalizes the components into a recomposed string, per RFC 3986,
/// Section 6.2.2 plus scheme-based default handling.
///
/// `host_kind` tells whether the host is a registered name; IP
/// addresses and IP literals are carried through as-is.
pub(crate) fn normalize(
    c: &Components<'_>,
    host_kind: Option<HostKind>,
) -> Result<String, NormalizeError> {
    let scheme = c.scheme.map(|s| s.to_ascii_lowercase());

    let host = match c.host {
        Some(h) if host_kind == Some(HostKind::RegName) || host_kind.is_none() => {
            Some(normalize_host(h)?)
        }
        Some(h) => Some(h.to_owned()),
        None => None,
    };

    let mut port: Option<String> = c.port.map(str::to_owned);
    let mut raw_path = c.path;

    if let Some(s) = scheme.as_deref() {
        if let Some(spc) = SPECIAL.iter().find(|d| d.scheme == s) {
            if let Some(p) = port.as_deref() {
                if !p.is_empty() {
                    if let Ok(n) = p.parse::<u32>() {
                        if n == spc.default_port {
                            port = None;
                        }
                    }
                }
            }
            if port.as_deref() == Some("") {
                port = None;
            }
            if raw_path == Some("") {
                raw_path = Some(spc.default_path);
            }
        }
    }

    // Strip leading zeros from the port.
    if let Some(p) = port.as_deref() {
        if !p.is_empty() {
            if let Ok(n) = p.parse::<u32>() {
                port = Some(n.to_string());
            }
        }
    }

    let path = raw_path.map(|p| remove_dot_segments(&normalize_pct_encoded(p)));
    let query = c.query.map(normalize_pct_encoded);
    let fragment = c.fragment.map(normalize_pct_encoded);

    let has_scheme = scheme.is_some();
    let has_authority = c.userinfo.is_some() || host.is_some() || port.is_some();
    let path = path.map(|p| guard_path(&p, has_scheme, has_authority).into_owned());

    let out = Components {
        scheme: scheme.as_deref(),
        authority: None,
        userinfo: c.userinfo,
        host: host.as_deref(),
        port: port.as_deref(),
        path: path.as_deref(),
        query: query.as_deref(),
        fragment: fragment.as_deref(),
    };
    Ok(out.to_string())
}

/// Normalizes a registered name: strips one trailing dot, applies
/// percent-encoding normalization and NFKC, and round-trips through
/// IDNA with transitional processing, yielding the Unicode form.
fn normalize_host(host: &str) -> Result<String, NormalizeError> {
    let host = host.strip_suffix('.').unwrap_or(host);
    let host = normalize_pct_encoded(host);
    if host.len() > MAX_HOST_LENGTH {
        return Err(NormalizeError::HostTooLong);
    }
    let host: String = host.nfkc().collect();

    let config = Config::default().transitional_processing(true);
    let ascii = config.to_ascii(&host).map_err(|_| NormalizeError::Idna)?;
    let (unicode, result) = config.to_unicode(&ascii);
    result.map_err(|_| NormalizeError::Idna)?;
    Ok(unicode)
}

/// Decodes percent-encoded octets for unreserved ASCII characters and
/// uppercases the hexadecimal digits of the remaining ones. Malformed
/// octets are copied through unchanged.
pub(crate) fn normalize_pct_encoded(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(p) = rest.find('%') {
        out.push_str(&rest[..p]);
        let tail = &rest[p..];
        let b = tail.as_bytes();
        let digits = (
            b.get(1).copied().and_then(hex_value),
            b.get(2).copied().and_then(hex_value),
        );
        if let (Some(hi), Some(lo)) = digits {
            let octet = hi * 16 + lo;
            if is_ascii_unreserved(octet) {
                out.push(octet as char);
            } else {
                out.push('%');
                out.push(HEX_DIGITS[usize::from(octet >> 4)] as char);
                out.push(HEX_DIGITS[usize::from(octet & 0xf)] as char);
            }
            rest = &tail[3..];
        } else {
            out.push('%');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pct_normalization() {
        assert_eq!(normalize_pct_encoded("%63"), "c");
        assert_eq!(normalize_pct_encoded("%7bfoo%7d"), "%7Bfoo%7D");
        assert_eq!(normalize_pct_encoded("%2D%2e"), "-.");
        assert_eq!(normalize_pct_encoded("a%ffb"), "a%FFb");
        assert_eq!(normalize_pct_encoded("100%"), "100%");
        assert_eq!(normalize_pct_encoded("%zz"), "%zz");
        assert_eq!(normalize_pct_encoded("caf\u{e9}"), "caf\u{e9}");
    }

    #[test]
    fn host_normalization() {
        assert_eq!(normalize_host("example.com").as_deref(), Ok("example.com"));
        assert_eq!(normalize_host("Example.COM.").as_deref(), Ok("example.com"));
        assert_eq!(
            normalize_host("xn%2D%2Dui8h%2Edigilicious%2Ecom").as_deref(),
            Ok("\u{1f354}.digilicious.com")
        );
        assert_eq!(
            normalize_host("b\u{fc}cher.de").as_deref(),
            Ok("b\u{fc}cher.de")
        );

        let long = "a".repeat(256);
        assert_eq!(normalize_host(&long), Err(NormalizeError::HostTooLong));
    }
}
