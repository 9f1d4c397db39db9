//! Byte pattern tables for the URI grammar.
//!
//! The predefined table constants in this module are documented with
//! the ABNF notation of [RFC 2234], extended with `non-ascii` for the
//! UTF-8 lead and continuation octets (`%x80-FF`). Inputs are always
//! `str`s, so octets above `%x7F` only ever occur in well-formed
//! UTF-8 sequences.
//!
//! [RFC 2234]: https://datatracker.ietf.org/doc/html/rfc2234/

pub(crate) const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// A table determining the byte patterns allowed in a string.
#[derive(Clone, Copy)]
pub(crate) struct Table {
    arr: [bool; 256],
    allows_enc: bool,
}

impl Table {
    /// Generates a table that only allows the given unencoded bytes.
    pub(crate) const fn gen(mut bytes: &[u8]) -> Table {
        let mut arr = [false; 256];
        while let [cur, rem @ ..] = bytes {
            assert!(*cur != b'%', "cannot allow unencoded %");
            arr[*cur as usize] = true;
            bytes = rem;
        }
        Table {
            arr,
            allows_enc: false,
        }
    }

    /// Marks this table as allowing percent-encoded octets.
    pub(crate) const fn enc(mut self) -> Table {
        self.allows_enc = true;
        self
    }

    /// Combines two tables into one.
    pub(crate) const fn or(mut self, other: &Table) -> Table {
        let mut i = 0;
        while i < 256 {
            self.arr[i] |= other.arr[i];
            i += 1;
        }
        self.allows_enc |= other.allows_enc;
        self
    }

    /// Marks all octets above `%x7F` as allowed.
    pub(crate) const fn or_non_ascii(mut self) -> Table {
        let mut i = 0x80;
        while i < 256 {
            self.arr[i] = true;
            i += 1;
        }
        self
    }

    /// Returns `true` if the given unencoded byte is allowed by the table.
    #[inline]
    pub(crate) const fn allows(&self, x: u8) -> bool {
        self.arr[x as usize]
    }

    /// Returns `true` if percent-encoded octets are allowed by the table.
    #[inline]
    pub(crate) const fn allows_enc(&self) -> bool {
        self.allows_enc
    }
}

const fn gen(bytes: &[u8]) -> Table {
    Table::gen(bytes)
}

/// ALPHA = A-Z / a-z
pub(crate) const ALPHA: &Table = &gen(b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz");

/// DIGIT = 0-9
pub(crate) const DIGIT: &Table = &gen(b"0123456789");

/// HEXDIG = DIGIT / "A" / "B" / "C" / "D" / "E" / "F"
///                / "a" / "b" / "c" / "d" / "e" / "f"
pub(crate) const HEXDIG: &Table = &DIGIT.or(&gen(b"ABCDEFabcdef"));

/// sub-delims = "!" / "$" / "&" / "'" / "(" / ")"
///            / "*" / "+" / "," / ";" / "="
pub(crate) const SUB_DELIMS: &Table = &gen(b"!$&'()*+,;=");

/// unreserved = ALPHA / DIGIT / "-" / "." / "_" / "~" / non-ascii
pub(crate) const UNRESERVED: &Table = &ALPHA.or(DIGIT).or(&gen(b"-._~")).or_non_ascii();

/// pchar = unreserved / pct-encoded / sub-delims / ":" / "@"
pub(crate) const PCHAR: &Table = &UNRESERVED.or(SUB_DELIMS).or(&gen(b":@")).enc();

/// segment-nz-nc = 1*( unreserved / pct-encoded / sub-delims / "@" )
pub(crate) const SEGMENT_NC: &Table = &UNRESERVED.or(SUB_DELIMS).or(&gen(b"@")).enc();

/// scheme = ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )
pub(crate) const SCHEME: &Table = &ALPHA.or(DIGIT).or(&gen(b"+-."));

/// userinfo = *( unreserved / pct-encoded / sub-delims / ":" )
pub(crate) const USERINFO: &Table = &UNRESERVED.or(SUB_DELIMS).or(&gen(b":")).enc();

/// IPvFuture = "v" 1\*HEXDIG "." 1\*( unreserved / sub-delims / ":" )
pub(crate) const IPV_FUTURE: &Table = &UNRESERVED.or(SUB_DELIMS).or(&gen(b":"));

/// ZoneID = 1*( unreserved / pct-encoded )
pub(crate) const ZONE_ID: &Table = &UNRESERVED.enc();

/// path = *( pchar / "/" )
pub(crate) const PATH: &Table = &PCHAR.or(&gen(b"/"));

/// query = *( pchar / "/" / "?" )
pub(crate) const QUERY: &Table = &PCHAR.or(&gen(b"/?"));

/// fragment = *( pchar / "/" / "?" )
pub(crate) const FRAGMENT: &Table = QUERY;

/// Returns the value of a hexadecimal digit.
#[inline]
pub(crate) const fn hex_value(x: u8) -> Option<u8> {
    match x {
        b'0'..=b'9' => Some(x - b'0'),
        b'a'..=b'f' => Some(x - b'a' + 10),
        b'A'..=b'F' => Some(x - b'A' + 10),
        _ => None,
    }
}

/// Decodes a percent-encoded octet from its two hexadecimal digits.
///
/// Both digits must be valid.
#[inline]
pub(crate) const fn decode_octet(hi: u8, lo: u8) -> u8 {
    let hi = match hex_value(hi) {
        Some(v) => v,
        None => 0,
    };
    let lo = match hex_value(lo) {
        Some(v) => v,
        None => 0,
    };
    hi * 16 + lo
}

/// unreserved in the strict ASCII sense used by percent-encoding
/// normalization, which never decodes to a non-ASCII octet.
#[inline]
pub(crate) const fn is_ascii_unreserved(x: u8) -> bool {
    x.is_ascii_alphanumeric() || matches!(x, b'-' | b'.' | b'_' | b'~')
}
