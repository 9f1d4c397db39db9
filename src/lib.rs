//! A strict URI handling library based on RFC 3986, with UTF-8 text
//! accepted where RFC 3987 allows it and IPv6 zone identifiers per
//! RFC 6874.
//!
//! Two rules are deliberately stricter than RFC 3986:
//!
//! - Registered names follow RFC 1123 hostname syntax: dot-separated
//!   labels of letters, digits and interior hyphens, with an optional
//!   trailing dot. `http://-a.b.co` and `http://a.b-.co` are rejected,
//!   and so is every empty host.
//! - Ports are bounded to 65535, and a dotted-quad prefix commits a
//!   host to being an IPv4 address, so `http://1.1.1.1.1` is rejected
//!   instead of passing as a registered name.
//!
//! Parsing is zero-allocation: a [`Uri`] records component spans over
//! the source string, which can be borrowed or owned.
//!
//! ```
//! use strict_uri::Uri;
//!
//! let uri = Uri::parse("foo://user@example.com:8042/over/there?name=ferret#nose")?;
//! assert_eq!(uri.scheme(), Some("foo"));
//! assert_eq!(uri.userinfo(), Some("user"));
//! assert_eq!(uri.host(), Some("example.com"));
//! assert_eq!(uri.port(), Some("8042"));
//! assert_eq!(uri.path(), "/over/there");
//! assert_eq!(uri.query(), Some("name=ferret"));
//! assert_eq!(uri.fragment(), Some("nose"));
//! # Ok::<_, strict_uri::error::ParseError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]

mod component;
mod encoding;
pub mod error;
mod fmt;
mod internal;
mod normalize;
mod parser;
mod resolve;

pub use component::{Components, HostKind};

use borrow_or_share::{Bos, BorrowOrShare};
use error::{NormalizeError, ParseError, ResolveError};
use internal::{Meta, Parse, Value};
use std::{borrow::Borrow, cmp::Ordering, hash, str::FromStr};

#[cfg(feature = "serde")]
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// A grammar entry point from RFC 3986.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntryPoint {
    /// `URI = scheme ":" hier-part [ "?" query ] [ "#" fragment ]`
    Uri,
    /// `absolute-URI = scheme ":" hier-part [ "?" query ]`
    AbsoluteUri,
    /// `relative-ref = relative-part [ "?" query ] [ "#" fragment ]`
    RelativeRef,
    /// `URI-reference = URI / relative-ref`
    UriRef,
}

/// Whether a [`Uri`] has been normalized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Form {
    /// The text is exactly as parsed.
    Unnormalized,
    /// The text is the output of [`Uri::normalize`].
    Normalized,
}

/// A parsed URI reference.
///
/// The generic parameter `T` is the storage of the text, either
/// `&str` or `String`. Component accessors on a `Uri<&'a str>`
/// return strings borrowed from the source, outliving the `Uri`
/// value itself.
///
/// Every component accessor distinguishes an absent component
/// (`None`) from a present-but-empty one (`Some("")`); the two
/// serialize differently and compare unequal.
///
/// Comparison, ordering and hashing are by the serialized text.
/// The entry point that admitted the value and its normalization
/// form are available through [`entry_point`](Self::entry_point)
/// and [`form`](Self::form) but take no part in equality.
#[derive(Clone, Copy)]
pub struct Uri<T> {
    val: T,
    meta: Meta,
    entry: EntryPoint,
    form: Form,
}

impl<T> Uri<T> {
    /// Parses a URI: a scheme is required and a fragment is allowed.
    ///
    /// # Examples
    ///
    /// ```
    /// use strict_uri::Uri;
    ///
    /// assert!(Uri::parse("http://example.com/").is_ok());
    /// assert!(Uri::parse("foo.com").is_err());
    /// assert!(Uri::parse("http://1.1.1.1.1").is_err());
    /// ```
    pub fn parse<I>(input: I) -> Result<Self, I::Err>
    where
        I: Parse<Val = T>,
    {
        input.parse(EntryPoint::Uri)
    }

    /// Parses an absolute URI: a scheme is required and a fragment
    /// is a syntax error.
    pub fn parse_absolute<I>(input: I) -> Result<Self, I::Err>
    where
        I: Parse<Val = T>,
    {
        input.parse(EntryPoint::AbsoluteUri)
    }

    /// Parses a relative reference: a scheme is not allowed, and a
    /// colon may not appear in the first path segment.
    pub fn parse_relative_ref<I>(input: I) -> Result<Self, I::Err>
    where
        I: Parse<Val = T>,
    {
        input.parse(EntryPoint::RelativeRef)
    }

    /// Parses a URI reference: a URI if a scheme is present, a
    /// relative reference otherwise.
    pub fn parse_reference<I>(input: I) -> Result<Self, I::Err>
    where
        I: Parse<Val = T>,
    {
        input.parse(EntryPoint::UriRef)
    }

    /// Returns the grammar entry point that admitted this value.
    #[inline]
    pub fn entry_point(&self) -> EntryPoint {
        self.entry
    }

    /// Returns whether this value has been normalized.
    #[inline]
    pub fn form(&self) -> Form {
        self.form
    }
}

impl<'i, 'o, T: BorrowOrShare<'i, 'o, str>> Uri<T> {
    /// Returns the URI reference as a string slice.
    #[inline]
    pub fn as_str(&'i self) -> &'o str {
        self.val.borrow_or_share()
    }

    /// Returns the scheme component.
    pub fn scheme(&'i self) -> Option<&'o str> {
        let s = self.as_str();
        self.meta.scheme_end.map(|end| &s[..end.get()])
    }

    /// Returns the authority component.
    pub fn authority(&'i self) -> Option<&'o str> {
        let s = self.as_str();
        self.meta.auth.map(|a| &s[a.start..self.meta.path_bounds.0])
    }

    /// Returns the userinfo subcomponent.
    pub fn userinfo(&'i self) -> Option<&'o str> {
        let s = self.as_str();
        let auth = self.meta.auth?;
        auth.userinfo_end.map(|end| &s[auth.start..end])
    }

    /// Returns the host subcomponent, brackets included for IP
    /// literals.
    pub fn host(&'i self) -> Option<&'o str> {
        let s = self.as_str();
        self.meta
            .auth
            .map(|a| &s[a.host_bounds.0..a.host_bounds.1])
    }

    /// Returns the port subcomponent.
    ///
    /// An empty port is syntactically valid and distinct from an
    /// absent one: `http://example.com:` has `Some("")`.
    pub fn port(&'i self) -> Option<&'o str> {
        let s = self.as_str();
        let auth = self.meta.auth?;
        auth.port_start.map(|p| &s[p..self.meta.path_bounds.0])
    }

    /// Returns the path component, which is always present but
    /// possibly empty.
    pub fn path(&'i self) -> &'o str {
        &self.as_str()[self.meta.path_bounds.0..self.meta.path_bounds.1]
    }

    /// Returns the query component.
    pub fn query(&'i self) -> Option<&'o str> {
        let s = self.as_str();
        self.meta
            .query_end
            .map(|end| &s[self.meta.path_bounds.1 + 1..end.get()])
    }

    /// Returns the fragment component.
    pub fn fragment(&'i self) -> Option<&'o str> {
        let s = self.as_str();
        self.meta.fragment_start.map(|start| &s[start.get()..])
    }

    /// Returns all components at once.
    pub fn components(&'i self) -> Components<'o> {
        Components {
            scheme: self.scheme(),
            authority: self.authority(),
            userinfo: self.userinfo(),
            host: self.host(),
            port: self.port(),
            path: Some(self.path()),
            query: self.query(),
            fragment: self.fragment(),
        }
    }

    /// Creates a new `Uri<String>` by cloning the text.
    pub fn to_owned(&'i self) -> Uri<String> {
        Uri {
            val: self.as_str().to_owned(),
            meta: self.meta,
            entry: self.entry,
            form: self.form,
        }
    }

    /// Normalizes the URI reference, per RFC 3986, Section 6.2.2,
    /// plus scheme-based default handling:
    ///
    /// - the scheme is lowercased;
    /// - a registered-name host loses one trailing dot and is run
    ///   through NFKC and IDNA, yielding its Unicode form;
    /// - for ftp, gopher, http, https, ws and wss, the default port
    ///   is dropped and an empty path gets the scheme's default;
    /// - leading zeros are stripped from the port;
    /// - percent-encoded octets for unreserved characters are
    ///   decoded and the remaining ones uppercased;
    /// - dot segments are removed from the path, rootless and
    ///   relative paths included.
    ///
    /// The result re-parses under the original entry point and is
    /// tagged [`Form::Normalized`]. Normalization is idempotent.
    ///
    /// # Examples
    ///
    /// ```
    /// use strict_uri::Uri;
    ///
    /// let uri = Uri::parse("eXAMPLE://a/./b/../b/%63/%7bfoo%7d")?;
    /// assert_eq!(uri.normalize()?.as_str(), "example://a/b/c/%7Bfoo%7D");
    ///
    /// let uri = Uri::parse("HTTP://Example.COM:0080/")?;
    /// assert_eq!(uri.normalize()?.as_str(), "http://example.com/");
    /// # Ok::<_, Box<dyn std::error::Error>>(())
    /// ```
    pub fn normalize(&'i self) -> Result<Uri<String>, NormalizeError> {
        let s = normalize::normalize(&self.components(), self.host_kind())?;
        let meta = parser::parse(&s, self.entry)?;
        Ok(Uri {
            val: s,
            meta,
            entry: self.entry,
            form: Form::Normalized,
        })
    }

    /// Resolves this reference against an absolute base URI, per
    /// RFC 3986, Section 5.2, with the merge of Errata 4789. The
    /// target is recomposed and re-parsed as a URI.
    ///
    /// Returns [`ResolveError::NonAbsoluteBase`] if the base lacks
    /// a scheme or carries a fragment.
    ///
    /// # Examples
    ///
    /// ```
    /// use strict_uri::Uri;
    ///
    /// let base = Uri::parse("http://a/b/c/d;p?q")?;
    /// let r = Uri::parse_reference("../g")?;
    /// assert_eq!(r.resolve_against(&base)?.as_str(), "http://a/b/g");
    /// # Ok::<_, Box<dyn std::error::Error>>(())
    /// ```
    pub fn resolve_against<U: Bos<str>>(
        &'i self,
        base: &Uri<U>,
    ) -> Result<Uri<String>, ResolveError> {
        if base.meta.scheme_end.is_none() || base.meta.fragment_start.is_some() {
            return Err(ResolveError::NonAbsoluteBase);
        }
        let s = resolve::target(&base.components(), &self.components());
        let meta = parser::parse(&s, EntryPoint::Uri)?;
        Ok(Uri {
            val: s,
            meta,
            entry: EntryPoint::Uri,
            form: Form::Unnormalized,
        })
    }
}

impl<T: Bos<str>> Uri<T> {
    /// Returns the syntactic class of the host subcomponent.
    #[inline]
    pub fn host_kind(&self) -> Option<HostKind> {
        self.meta.auth.map(|a| a.host_kind)
    }

    /// Returns `true` if a scheme is present and a fragment is not.
    #[inline]
    pub fn is_absolute(&self) -> bool {
        self.meta.scheme_end.is_some() && self.meta.fragment_start.is_none()
    }
}

impl Uri<String> {
    /// Consumes this `Uri` and yields the underlying `String`.
    #[inline]
    pub fn into_string(self) -> String {
        self.val
    }

    /// Creates a borrowed `Uri<&str>` over this value's text.
    pub fn borrowed(&self) -> Uri<&str> {
        Uri {
            val: &self.val[..],
            meta: self.meta,
            entry: self.entry,
            form: self.form,
        }
    }
}

impl<T: Value> Default for Uri<T> {
    /// Creates an empty URI reference.
    fn default() -> Self {
        Uri {
            val: T::default(),
            meta: Meta::default(),
            entry: EntryPoint::UriRef,
            form: Form::Unnormalized,
        }
    }
}

impl<T: Bos<str>, U: Bos<str>> PartialEq<Uri<U>> for Uri<T> {
    fn eq(&self, other: &Uri<U>) -> bool {
        self.as_str() == other.as_str()
    }
}

impl<T: Bos<str>> PartialEq<str> for Uri<T> {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl<T: Bos<str>> PartialEq<Uri<T>> for str {
    fn eq(&self, other: &Uri<T>) -> bool {
        self == other.as_str()
    }
}

impl<T: Bos<str>> PartialEq<&str> for Uri<T> {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl<T: Bos<str>> PartialEq<Uri<T>> for &str {
    fn eq(&self, other: &Uri<T>) -> bool {
        *self == other.as_str()
    }
}

impl<T: Bos<str>> Eq for Uri<T> {}

impl<T: Bos<str>> hash::Hash for Uri<T> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl<T: Bos<str>> PartialOrd for Uri<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Bos<str>> Ord for Uri<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl<T: Bos<str>> AsRef<str> for Uri<T> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<T: Bos<str>> Borrow<str> for Uri<T> {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl<'a> TryFrom<&'a str> for Uri<&'a str> {
    type Error = ParseError;

    /// Equivalent to [`parse_reference`](Self::parse_reference).
    #[inline]
    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        Uri::parse_reference(value)
    }
}

impl TryFrom<String> for Uri<String> {
    type Error = ParseError<String>;

    /// Equivalent to [`parse_reference`](Self::parse_reference).
    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Uri::parse_reference(value)
    }
}

impl<'a> From<Uri<&'a str>> for &'a str {
    #[inline]
    fn from(value: Uri<&'a str>) -> &'a str {
        value.val
    }
}

impl From<Uri<String>> for String {
    #[inline]
    fn from(value: Uri<String>) -> String {
        value.val
    }
}

impl From<Uri<&str>> for Uri<String> {
    /// Equivalent to [`to_owned`](Uri::to_owned).
    #[inline]
    fn from(value: Uri<&str>) -> Self {
        value.to_owned()
    }
}

impl FromStr for Uri<String> {
    type Err = ParseError;

    /// Equivalent to `Uri::parse_reference(s).map(|r| r.to_owned())`.
    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uri::parse_reference(s).map(|r| r.to_owned())
    }
}

#[cfg(feature = "serde")]
impl<T: Bos<str>> Serialize for Uri<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Uri<String> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let val = String::deserialize(deserializer)?;
        Uri::parse_reference(val).map_err(|e| de::Error::custom(e.plain()))
    }
}

#[cfg(feature = "serde")]
impl<'de: 'a, 'a> Deserialize<'de> for Uri<&'a str> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let val = <&str>::deserialize(deserializer)?;
        Uri::parse_reference(val).map_err(de::Error::custom)
    }
}
