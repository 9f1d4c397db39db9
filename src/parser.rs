use crate::{
    component::HostKind,
    encoding::{
        decode_octet, Table, DIGIT, FRAGMENT, HEXDIG, IPV_FUTURE, PATH, QUERY, SCHEME, SEGMENT_NC,
        USERINFO, ZONE_ID,
    },
    error::{ParseError, ParseErrorKind},
    internal::{AuthMeta, Meta},
    EntryPoint,
};
use std::{
    num::NonZeroUsize,
    ops::{Deref, DerefMut},
};

macro_rules! err {
    ($index:expr, $kind:ident) => {
        return Err(ParseError {
            index: $index,
            kind: ParseErrorKind::$kind,
            input: (),
        })
    };
}

/// Parses a URI reference under the given grammar entry point
/// into component spans.
pub(crate) fn parse(input: &str, entry: EntryPoint) -> Result<Meta, ParseError> {
    let mut parser = Parser {
        reader: Reader::new(input.as_bytes()),
        entry,
        relative: false,
        out: Meta::default(),
    };
    parser.parse_from_start()?;
    Ok(parser.out)
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Reader { bytes, pos: 0 }
    }

    fn has_remaining(&self) -> bool {
        self.pos < self.bytes.len()
    }

    fn peek(&self, i: usize) -> Option<u8> {
        self.bytes.get(self.pos + i).copied()
    }

    fn skip(&mut self, n: usize) {
        self.pos += n;
    }

    /// Consumes bytes allowed by the table, including percent-encoded
    /// octets if the table allows them. Returns whether anything was read.
    fn read(&mut self, table: &Table) -> Result<bool, ParseError> {
        let start = self.pos;
        while self.pos < self.bytes.len() {
            let x = self.bytes[self.pos];
            if x == b'%' {
                if !table.allows_enc() {
                    break;
                }
                match (self.peek(1), self.peek(2)) {
                    (Some(hi), Some(lo)) if HEXDIG.allows(hi) && HEXDIG.allows(lo) => {
                        self.pos += 3;
                    }
                    _ => err!(self.pos, InvalidOctet),
                }
            } else if table.allows(x) {
                self.pos += 1;
            } else {
                break;
            }
        }
        Ok(self.pos > start)
    }

    fn read_str(&mut self, s: &str) -> bool {
        if self.bytes[self.pos..].starts_with(s.as_bytes()) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }
}

struct Parser<'a> {
    reader: Reader<'a>,
    entry: EntryPoint,
    // Set when parsing a relative-part, where a failed authority
    // falls back to path-abempty per the ordered-choice grammar.
    relative: bool,
    out: Meta,
}

impl<'a> Deref for Parser<'a> {
    type Target = Reader<'a>;

    fn deref(&self) -> &Reader<'a> {
        &self.reader
    }
}

impl<'a> DerefMut for Parser<'a> {
    fn deref_mut(&mut self) -> &mut Reader<'a> {
        &mut self.reader
    }
}

impl Parser<'_> {
    fn parse_from_start(&mut self) -> Result<(), ParseError> {
        match self.entry {
            EntryPoint::Uri | EntryPoint::AbsoluteUri => self.parse_from_scheme(),
            EntryPoint::RelativeRef => self.parse_from_relative_part(),
            EntryPoint::UriRef => {
                // URI-reference = URI / relative-ref
                //
                // A single pass suffices: scheme characters are also
                // valid in the first segment of path-noscheme, and a
                // following ":" commits the choice to URI.
                self.read(SCHEME)?;
                if self.peek(0) == Some(b':') {
                    self.commit_scheme()
                } else {
                    self.relative = true;
                    if self.pos == 0 {
                        self.parse_from_relative_part()
                    } else {
                        self.parse_from_path_noscheme()
                    }
                }
            }
        }
    }

    fn parse_from_scheme(&mut self) -> Result<(), ParseError> {
        self.read(SCHEME)?;
        if self.peek(0) == Some(b':') {
            self.commit_scheme()
        } else {
            err!(self.pos, UnexpectedChar)
        }
    }

    fn commit_scheme(&mut self) -> Result<(), ParseError> {
        // scheme = ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )
        if self.pos == 0 || !self.bytes[0].is_ascii_alphabetic() {
            err!(0, UnexpectedChar);
        }
        self.out.scheme_end = NonZeroUsize::new(self.pos);
        self.skip(1);
        self.parse_from_hier_part()
    }

    fn parse_from_hier_part(&mut self) -> Result<(), ParseError> {
        if self.read_str("//") {
            self.parse_from_authority()
        } else {
            // path-absolute / path-rootless / path-empty
            let start = self.pos;
            self.read(PATH)?;
            self.out.path_bounds = (start, self.pos);
            self.parse_from_query_or_fragment()
        }
    }

    fn parse_from_relative_part(&mut self) -> Result<(), ParseError> {
        self.relative = true;
        if self.read_str("//") {
            self.parse_from_authority()
        } else if self.peek(0) == Some(b'/') {
            // path-absolute
            self.read(PATH)?;
            self.out.path_bounds = (0, self.pos);
            self.parse_from_query_or_fragment()
        } else {
            self.parse_from_path_noscheme()
        }
    }

    // path-noscheme / path-abempty / path-empty, continuing after
    // any bytes already consumed as a would-be scheme.
    fn parse_from_path_noscheme(&mut self) -> Result<(), ParseError> {
        self.read(SEGMENT_NC)?;
        if self.peek(0) == Some(b':') {
            // A colon may not appear in the first segment of a
            // relative reference.
            err!(self.pos, UnexpectedChar);
        }
        self.read(PATH)?;
        self.out.path_bounds = (0, self.pos);
        self.parse_from_query_or_fragment()
    }

    fn parse_from_authority(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        // The authority component extends to the first "/", "?" or "#".
        let end = self.bytes[start..]
            .iter()
            .position(|&x| matches!(x, b'/' | b'?' | b'#'))
            .map_or(self.bytes.len(), |i| start + i);

        match parse_authority_span(self.bytes, start, end) {
            Ok(auth) => {
                self.out.auth = Some(auth);
                self.pos = end;
                // path-abempty
                let path_start = self.pos;
                self.read(PATH)?;
                self.out.path_bounds = (path_start, self.pos);
                self.parse_from_query_or_fragment()
            }
            Err(_) if self.relative => {
                // Ordered choice: a relative-part whose authority does
                // not parse is re-read as path-abempty (Errata 5428),
                // "//" included.
                self.pos = 0;
                self.out = Meta::default();
                self.read(PATH)?;
                self.out.path_bounds = (0, self.pos);
                self.parse_from_query_or_fragment()
            }
            Err(e) => Err(e),
        }
    }

    fn parse_from_query_or_fragment(&mut self) -> Result<(), ParseError> {
        if self.read_str("?") {
            self.read(QUERY)?;
            self.out.query_end = NonZeroUsize::new(self.pos);
        }
        if self.peek(0) == Some(b'#') {
            if self.entry == EntryPoint::AbsoluteUri {
                // absolute-URI has no fragment.
                err!(self.pos, UnexpectedChar);
            }
            self.skip(1);
            self.out.fragment_start = NonZeroUsize::new(self.pos);
            self.read(FRAGMENT)?;
        }
        if self.has_remaining() {
            err!(self.pos, UnexpectedChar);
        }
        Ok(())
    }
}

fn parse_authority_span(bytes: &[u8], start: usize, end: usize) -> Result<AuthMeta, ParseError> {
    // authority = [ userinfo "@" ] host [ ":" port ]
    let userinfo_end = bytes[start..end]
        .iter()
        .position(|&x| x == b'@')
        .map(|i| start + i);
    if let Some(i) = userinfo_end {
        validate(bytes, start, i, USERINFO)?;
    }
    let host_start = userinfo_end.map_or(start, |i| i + 1);

    let host_end;
    let port_start;
    let host_kind;
    if bytes.get(host_start) == Some(&b'[') {
        let close = match bytes[host_start..end].iter().position(|&x| x == b']') {
            Some(i) => host_start + i,
            None => err!(host_start, InvalidIpLiteral),
        };
        host_end = close + 1;
        host_kind = parse_ip_literal(bytes, host_start, host_end)?;
        port_start = if host_end == end {
            None
        } else if bytes[host_end] == b':' {
            Some(host_end + 1)
        } else {
            err!(host_end, UnexpectedChar)
        };
    } else {
        host_end = bytes[host_start..end]
            .iter()
            .position(|&x| x == b':')
            .map_or(end, |i| host_start + i);
        host_kind = classify_host(bytes, host_start, host_end)?;
        port_start = if host_end < end {
            Some(host_end + 1)
        } else {
            None
        };
    }
    if let Some(ps) = port_start {
        check_port(bytes, ps, end)?;
    }

    Ok(AuthMeta {
        start,
        userinfo_end,
        host_bounds: (host_start, host_end),
        port_start,
        host_kind,
    })
}

fn validate(bytes: &[u8], start: usize, end: usize, table: &Table) -> Result<(), ParseError> {
    let mut i = start;
    while i < end {
        let x = bytes[i];
        if x == b'%' {
            if !table.allows_enc() {
                err!(i, UnexpectedChar);
            }
            if i + 2 >= end
                || !(HEXDIG.allows(bytes[i + 1]) && HEXDIG.allows(bytes[i + 2]))
            {
                err!(i, InvalidOctet);
            }
            i += 3;
        } else if table.allows(x) {
            i += 1;
        } else {
            err!(i, UnexpectedChar);
        }
    }
    Ok(())
}

fn classify_host(bytes: &[u8], start: usize, end: usize) -> Result<HostKind, ParseError> {
    if start == end {
        // host may not be empty.
        err!(start, UnexpectedChar);
    }
    if let Some(n) = match_ipv4(bytes, start, end) {
        if n == end {
            return Ok(HostKind::Ipv4);
        }
        // A dotted-quad prefix commits the host to IPv4; trailing
        // bytes may not demote it to a registered name.
        err!(n, UnexpectedChar);
    }
    validate_reg_name(bytes, start, end)?;
    Ok(HostKind::RegName)
}

/// Matches an IPv4address and returns the index one past the match.
fn match_ipv4(bytes: &[u8], start: usize, end: usize) -> Option<usize> {
    let mut i = start;
    for k in 0..4 {
        if k > 0 {
            if i >= end || bytes[i] != b'.' {
                return None;
            }
            i += 1;
        }
        i = match_dec_octet(bytes, i, end)?;
    }
    Some(i)
}

/// dec-octet = "25" %x30-35 / "2" %x30-34 DIGIT / "1" 2DIGIT
///           / %x31-39 DIGIT / DIGIT
///
/// Alternatives commit in order; there is no backtracking into a
/// shorter alternative once one matches.
fn match_dec_octet(bytes: &[u8], i: usize, end: usize) -> Option<usize> {
    let at = |k: usize| bytes.get(i + k).copied().filter(|_| i + k < end);
    let b0 = at(0)?;
    let b1 = at(1);
    let b2 = at(2);
    match (b0, b1, b2) {
        (b'2', Some(b'5'), Some(b'0'..=b'5')) => Some(i + 3),
        (b'2', Some(b'0'..=b'4'), Some(x)) if x.is_ascii_digit() => Some(i + 3),
        (b'1', Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => Some(i + 3),
        (b'1'..=b'9', Some(x), _) if x.is_ascii_digit() => Some(i + 2),
        (b'0'..=b'9', ..) => Some(i + 1),
        _ => None,
    }
}

/// Validates a registered name against RFC 1123 hostname rules:
/// dot-separated labels of letters, digits and interior hyphens,
/// with an optional trailing dot. Letters and digits may appear as
/// UTF-8 text or as percent-encoded ASCII; hyphen and dot may also
/// be written "%2D" and "%2E".
fn validate_reg_name(bytes: &[u8], start: usize, end: usize) -> Result<(), ParseError> {
    let mut i = start;
    // One past the longest prefix forming a valid host.
    let mut good = start;
    'labels: loop {
        match read_let_dig(bytes, i, end) {
            Some(n) => i = n,
            None => break,
        }
        good = i;
        loop {
            let mut j = i;
            while let Some(n) = read_pct_char(bytes, j, end, b'-', b"2D") {
                j = n;
            }
            if j > i {
                // Hyphens must be followed by a letter or digit.
                match read_let_dig(bytes, j, end) {
                    Some(n) => {
                        i = n;
                        good = i;
                        continue;
                    }
                    None => break 'labels,
                }
            }
            match read_let_dig(bytes, i, end) {
                Some(n) => {
                    i = n;
                    good = i;
                }
                None => break,
            }
        }
        match read_pct_char(bytes, i, end, b'.', b"2E") {
            Some(n) => {
                i = n;
                good = i;
            }
            None => break,
        }
    }
    if good != end {
        err!(good, UnexpectedChar);
    }
    Ok(())
}

/// Reads a letter, a digit, a non-ASCII octet, or a percent-encoded
/// octet decoding to an ASCII letter or digit.
fn read_let_dig(bytes: &[u8], i: usize, end: usize) -> Option<usize> {
    if i >= end {
        return None;
    }
    let x = bytes[i];
    if x.is_ascii_alphanumeric() || x >= 0x80 {
        Some(i + 1)
    } else if x == b'%' && i + 2 < end {
        let (hi, lo) = (bytes[i + 1], bytes[i + 2]);
        if HEXDIG.allows(hi) && HEXDIG.allows(lo) && decode_octet(hi, lo).is_ascii_alphanumeric() {
            Some(i + 3)
        } else {
            None
        }
    } else {
        None
    }
}

/// Reads `plain` or its percent-encoded form, hex case-insensitive.
fn read_pct_char(bytes: &[u8], i: usize, end: usize, plain: u8, hex: &[u8; 2]) -> Option<usize> {
    if i >= end {
        return None;
    }
    if bytes[i] == plain {
        Some(i + 1)
    } else if bytes[i] == b'%'
        && i + 2 < end
        && bytes[i + 1] == hex[0]
        && bytes[i + 2].eq_ignore_ascii_case(&hex[1])
    {
        Some(i + 3)
    } else {
        None
    }
}

/// port = *DIGIT, bounded to the range of a 16-bit port number:
/// at most four digits unconditionally, or exactly five digits
/// whose value does not exceed 65535.
fn check_port(bytes: &[u8], start: usize, end: usize) -> Result<(), ParseError> {
    let mut i = start;
    while i < end {
        if !DIGIT.allows(bytes[i]) {
            err!(i, UnexpectedChar);
        }
        i += 1;
    }
    let len = end - start;
    if len > 4 {
        let mut value: u32 = 0;
        for k in 0..5 {
            value = value * 10 + u32::from(bytes[start + k] - b'0');
        }
        let consumed = if value <= 65535 { 5 } else { 4 };
        if start + consumed < end {
            err!(start + consumed, UnexpectedChar);
        }
    }
    Ok(())
}

fn parse_ip_literal(bytes: &[u8], start: usize, end: usize) -> Result<HostKind, ParseError> {
    // bytes[start] == '[' and bytes[end - 1] == ']'
    let inner_start = start + 1;
    let inner_end = end - 1;
    if inner_start == inner_end {
        err!(start, InvalidIpLiteral);
    }
    if matches!(bytes[inner_start], b'v' | b'V') {
        // IPvFuture = "v" 1*HEXDIG "." 1*( unreserved / sub-delims / ":" )
        let mut i = inner_start + 1;
        let hex_start = i;
        while i < inner_end && HEXDIG.allows(bytes[i]) {
            i += 1;
        }
        if i == hex_start || i == inner_end || bytes[i] != b'.' {
            err!(start, InvalidIpLiteral);
        }
        i += 1;
        if i == inner_end || validate(bytes, i, inner_end, IPV_FUTURE).is_err() {
            err!(start, InvalidIpLiteral);
        }
        return Ok(HostKind::IpvFuture);
    }

    // IPv6address / IPv6addrz, where a ZoneID follows "%25" (RFC 6874).
    let v6_end = match bytes[inner_start..inner_end].iter().position(|&x| x == b'%') {
        Some(p) => {
            let p = inner_start + p;
            if p + 2 >= inner_end || bytes[p + 1] != b'2' || bytes[p + 2] != b'5' {
                err!(start, InvalidIpLiteral);
            }
            let zone_start = p + 3;
            if zone_start == inner_end || validate(bytes, zone_start, inner_end, ZONE_ID).is_err() {
                err!(start, InvalidIpLiteral);
            }
            p
        }
        None => inner_end,
    };
    if !match_ipv6(bytes, inner_start, v6_end) {
        err!(start, InvalidIpLiteral);
    }
    Ok(HostKind::Ipv6)
}

fn match_ipv6(bytes: &[u8], start: usize, end: usize) -> bool {
    let mut groups = 0u32;
    let mut ellipsis = false;
    let mut i = start;

    if i == end {
        return false;
    }
    if bytes[i] == b':' {
        if i + 1 >= end || bytes[i + 1] != b':' {
            return false;
        }
        ellipsis = true;
        i += 2;
        if i == end {
            return true;
        }
    }

    loop {
        // An embedded IPv4address stands for the last two groups.
        let v4_possible = if ellipsis { groups <= 5 } else { groups == 6 };
        if v4_possible && match_ipv4(bytes, i, end) == Some(end) {
            groups += 2;
            break;
        }

        // h16 = 1*4HEXDIG
        let h_start = i;
        while i < end && i - h_start < 4 && HEXDIG.allows(bytes[i]) {
            i += 1;
        }
        if i == h_start {
            return false;
        }
        groups += 1;
        if i == end {
            break;
        }
        if bytes[i] != b':' {
            return false;
        }
        i += 1;
        if i == end {
            return false;
        }
        if bytes[i] == b':' {
            if ellipsis {
                return false;
            }
            ellipsis = true;
            i += 1;
            if i == end {
                break;
            }
        }
    }

    if ellipsis {
        groups <= 7
    } else {
        groups == 8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v6(s: &str) -> bool {
        match_ipv6(s.as_bytes(), 0, s.len())
    }

    #[test]
    fn ipv6_forms() {
        assert!(v6("::"));
        assert!(v6("::1"));
        assert!(v6("1::"));
        assert!(v6("2001:db8::7"));
        assert!(v6("1:2:3:4:5:6:7:8"));
        assert!(v6("::ffff:192.0.2.1"));
        assert!(v6("1:2:3:4:5:6:192.0.2.1"));
        assert!(v6("fe80::1"));

        assert!(!v6(""));
        assert!(!v6(":"));
        assert!(!v6(":1"));
        assert!(!v6("1:"));
        assert!(!v6("1:2:3:4:5:6:7:8:9"));
        assert!(!v6("1:2:3:4:5:6:7"));
        assert!(!v6("1::2::3"));
        assert!(!v6("12345::"));
        assert!(!v6("1:2:3:4:5:6:7:192.0.2.1"));
        assert!(!v6("::192.0.2.256"));
    }

    #[test]
    fn dec_octet_commits() {
        // The dotted-quad prefix of "1.1.1.1.1" matches, so the
        // leftover ".1" must not fall back to a registered name.
        let b = b"1.1.1.1.1";
        assert_eq!(match_ipv4(b, 0, b.len()), Some(7));
        // "1337" is no octet, so the whole quad match fails cleanly.
        let b = b"1337.net";
        assert_eq!(match_ipv4(b, 0, b.len()), None);
        // The third octet of "1.2.3.256" greedily reads "25".
        let b = b"1.2.3.256";
        assert_eq!(match_ipv4(b, 0, b.len()), Some(8));
    }

    #[test]
    fn reg_name_labels() {
        let ok = |s: &str| validate_reg_name(s.as_bytes(), 0, s.len()).is_ok();
        assert!(ok("example.com"));
        assert!(ok("example.com."));
        assert!(ok("a.b--c.de"));
        assert!(ok("1337.net"));
        assert!(ok("xn%2D%2Dui8h%2Edigilicious%2Ecom"));
        assert!(ok("bücher.de"));

        assert!(!ok("."));
        assert!(!ok(".."));
        assert!(!ok(".example.com"));
        assert!(!ok("-error-.invalid"));
        assert!(!ok("-a.b.co"));
        assert!(!ok("a.b-.co"));
        assert!(!ok("ex_ample.com"));
        assert!(!ok("a..b"));
        assert!(!ok("%7Ea.com"));
    }
}
