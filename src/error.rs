/// Detailed cause of a [`ParseError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Invalid percent-encoded octet that is either non-hexadecimal or incomplete.
    ///
    /// The error index points to the percent character "%" of the octet.
    InvalidOctet,
    /// Unexpected character that is not allowed by the URI syntax.
    ///
    /// The error index points to the character.
    UnexpectedChar,
    /// Invalid IP literal address.
    ///
    /// The error index points to the preceding left square bracket "[".
    InvalidIpLiteral,
}

/// An error occurred when parsing URI references.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ParseError<I = ()> {
    pub(crate) index: usize,
    pub(crate) kind: ParseErrorKind,
    pub(crate) input: I,
}

impl ParseError<()> {
    pub(crate) fn with_input<I>(self, input: I) -> ParseError<I> {
        ParseError {
            index: self.index,
            kind: self.kind,
            input,
        }
    }
}

impl<I> ParseError<I> {
    /// Returns the byte index the error points at.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the detailed cause of the error.
    #[inline]
    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }

    /// Recovers the input that was attempted to parse.
    #[inline]
    pub fn into_input(self) -> I {
        self.input
    }

    /// Returns the error with input erased.
    #[inline]
    pub fn plain(&self) -> ParseError {
        ParseError {
            index: self.index,
            kind: self.kind,
            input: (),
        }
    }
}

impl<I> std::error::Error for ParseError<I> {}

/// An error occurred when normalizing a URI reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NormalizeError {
    /// The host, after percent-encoding normalization, exceeds 255 bytes.
    HostTooLong,
    /// The host failed IDNA processing.
    Idna,
    /// The normalized text failed to re-parse under the original entry point.
    Parse(ParseError),
}

impl std::error::Error for NormalizeError {}

impl From<ParseError> for NormalizeError {
    fn from(e: ParseError) -> Self {
        NormalizeError::Parse(e)
    }
}

/// An error occurred when resolving a reference against a base URI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolveError {
    /// The base lacks a scheme or carries a fragment.
    NonAbsoluteBase,
    /// The resolution target failed to re-parse as a URI.
    Parse(ParseError),
}

impl std::error::Error for ResolveError {}

impl From<ParseError> for ResolveError {
    fn from(e: ParseError) -> Self {
        ResolveError::Parse(e)
    }
}
