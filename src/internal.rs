use crate::{component::HostKind, error::ParseError, parser, EntryPoint, Form, Uri};
use std::num::NonZeroUsize;

/// Component spans over the source string.
///
/// A span of `None` means the corresponding delimiter was absent,
/// which is distinct from a present-but-empty component.
#[derive(Clone, Copy, Default)]
pub struct Meta {
    // The index of the trailing colon.
    pub scheme_end: Option<NonZeroUsize>,
    pub auth: Option<AuthMeta>,
    pub path_bounds: (usize, usize),
    // One byte past the last byte of query.
    pub query_end: Option<NonZeroUsize>,
    // One byte past the "#" delimiter.
    pub fragment_start: Option<NonZeroUsize>,
}

#[derive(Clone, Copy)]
pub struct AuthMeta {
    // The index right after the "//" delimiter.
    pub start: usize,
    // The index of the "@" delimiter, if any.
    pub userinfo_end: Option<usize>,
    // Bounds of the host subcomponent, brackets included for IP literals.
    pub host_bounds: (usize, usize),
    // The index right after the ":" delimiter, if any.
    pub port_start: Option<usize>,
    pub host_kind: HostKind,
}

pub trait Value: Default {}

impl Value for &str {}
impl Value for String {}

/// Storage types a [`Uri`] can be parsed from.
pub trait Parse {
    type Val;
    type Err;

    fn parse(self, entry: EntryPoint) -> Result<Uri<Self::Val>, Self::Err>;
}

impl<'a> Parse for &'a str {
    type Val = &'a str;
    type Err = ParseError;

    fn parse(self, entry: EntryPoint) -> Result<Uri<Self::Val>, Self::Err> {
        parser::parse(self, entry).map(|meta| Uri {
            val: self,
            meta,
            entry,
            form: Form::Unnormalized,
        })
    }
}

impl Parse for String {
    type Val = String;
    type Err = ParseError<String>;

    fn parse(self, entry: EntryPoint) -> Result<Uri<Self::Val>, Self::Err> {
        match parser::parse(&self, entry) {
            Ok(meta) => Ok(Uri {
                val: self,
                meta,
                entry,
                form: Form::Unnormalized,
            }),
            Err(e) => Err(e.with_input(self)),
        }
    }
}
