use crate::model::vocab::{rdf, xsd};
use std::borrow::Cow;
use std::fmt;
use std::fmt::Write;

/// An error raised when constructing a term from disallowed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum TermError {
    /// An IRI must contain at least one character.
    #[error("an IRI cannot be empty")]
    EmptyIri,
    /// A literal must have a non-empty lexical form.
    #[error("a literal cannot have an empty lexical form")]
    EmptyLiteral,
    /// A language-tagged string must carry a non-empty tag.
    #[error("a language tag cannot be empty")]
    EmptyLanguageTag,
    /// The canonical encoding stores the tag length in a single byte.
    #[error("a language tag cannot be longer than 255 bytes")]
    LanguageTagTooLong,
    /// The canonical encoding stores the datatype length in a single byte.
    #[error("a datatype IRI cannot be longer than 255 bytes")]
    DatatypeTooLong,
    /// `rdf:langString` literals are built with a language tag, not a bare datatype.
    #[error("rdf:langString literals must carry a language tag")]
    LanguageTagRequired,
}

/// An owned RDF [IRI](https://www.w3.org/TR/rdf11-concepts/#dfn-iri).
///
/// The string formatter returns the N-Triples representation:
/// ```
/// use tripod::model::Iri;
///
/// assert_eq!(
///     "<http://example.com/foo>",
///     Iri::new("http://example.com/foo")?.to_string()
/// );
/// # Result::<_, tripod::model::TermError>::Ok(())
/// ```
///
/// IRIs are compared byte for byte and are not validated beyond being
/// non-empty.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Hash)]
pub struct Iri {
    iri: String,
}

impl Iri {
    /// Builds an IRI, rejecting the empty string.
    pub fn new(iri: impl Into<String>) -> Result<Self, TermError> {
        let iri = iri.into();
        if iri.is_empty() {
            return Err(TermError::EmptyIri);
        }
        Ok(Self { iri })
    }

    /// Builds an IRI without checking it.
    ///
    /// It is the caller's responsibility to ensure that `iri` is not empty.
    #[inline]
    pub fn new_unchecked(iri: impl Into<String>) -> Self {
        Self { iri: iri.into() }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.iri.as_str()
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.iri
    }

    #[inline]
    pub fn as_ref(&self) -> IriRef<'_> {
        IriRef::new_unchecked(&self.iri)
    }
}

impl fmt::Display for Iri {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_ref().fmt(f)
    }
}

/// A borrowed RDF [IRI](https://www.w3.org/TR/rdf11-concepts/#dfn-iri).
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Copy, Hash)]
pub struct IriRef<'a> {
    iri: &'a str,
}

impl<'a> IriRef<'a> {
    /// Builds an IRI without checking it.
    ///
    /// It is the caller's responsibility to ensure that `iri` is not empty.
    #[inline]
    pub const fn new_unchecked(iri: &'a str) -> Self {
        Self { iri }
    }

    #[inline]
    pub const fn as_str(self) -> &'a str {
        self.iri
    }

    #[inline]
    pub fn into_owned(self) -> Iri {
        Iri::new_unchecked(self.iri)
    }
}

impl fmt::Display for IriRef<'_> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.iri)
    }
}

impl From<IriRef<'_>> for Iri {
    #[inline]
    fn from(iri: IriRef<'_>) -> Self {
        iri.into_owned()
    }
}

impl<'a> From<&'a Iri> for IriRef<'a> {
    #[inline]
    fn from(iri: &'a Iri) -> Self {
        iri.as_ref()
    }
}

impl PartialEq<Iri> for IriRef<'_> {
    #[inline]
    fn eq(&self, other: &Iri) -> bool {
        self.iri == other.iri
    }
}

impl PartialEq<IriRef<'_>> for Iri {
    #[inline]
    fn eq(&self, other: &IriRef<'_>) -> bool {
        self.iri == other.iri
    }
}

/// An owned RDF [literal](https://www.w3.org/TR/rdf11-concepts/#dfn-literal).
///
/// The string formatter returns the N-Triples representation:
/// ```
/// use tripod::model::Literal;
///
/// assert_eq!("\"foo\\nbar\"", Literal::new_simple("foo\nbar")?.to_string());
/// assert_eq!(
///     "\"hei\"@nb-no",
///     Literal::new_language_tagged("hei", "nb-no")?.to_string()
/// );
/// assert_eq!(
///     "\"1\"^^<http://www.w3.org/2001/XMLSchema#long>",
///     Literal::from_i64(1).to_string()
/// );
/// # Result::<_, tripod::model::TermError>::Ok(())
/// ```
///
/// Two literals are equal iff their lexical form, datatype and language tag
/// all match exactly. No value-space normalization is performed:
/// `"1"^^xsd:long` and `"01"^^xsd:long` are distinct literals.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Literal(LiteralContent);

#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub(crate) enum LiteralContent {
    String(String),
    LanguageTaggedString { value: String, language: String },
    Long(i64),
    UnsignedLong(u64),
    TypedLiteral { value: String, datatype: Iri },
}

impl Literal {
    /// Builds an `xsd:string` literal.
    pub fn new_simple(value: impl Into<String>) -> Result<Self, TermError> {
        let value = value.into();
        if value.is_empty() {
            return Err(TermError::EmptyLiteral);
        }
        Ok(Self(LiteralContent::String(value)))
    }

    /// Builds an `rdf:langString` literal with the given language tag.
    ///
    /// Tags are kept as-is and compared byte for byte; no BCP47 validation is
    /// done beyond non-emptiness.
    pub fn new_language_tagged(
        value: impl Into<String>,
        language: impl Into<String>,
    ) -> Result<Self, TermError> {
        let value = value.into();
        let language = language.into();
        if value.is_empty() {
            return Err(TermError::EmptyLiteral);
        }
        if language.is_empty() {
            return Err(TermError::EmptyLanguageTag);
        }
        if language.len() > usize::from(u8::MAX) {
            return Err(TermError::LanguageTagTooLong);
        }
        Ok(Self(LiteralContent::LanguageTaggedString { value, language }))
    }

    /// Builds an `xsd:long` literal from its value.
    #[inline]
    pub fn from_i64(value: i64) -> Self {
        Self(LiteralContent::Long(value))
    }

    /// Builds an `xsd:unsignedLong` literal from its value.
    #[inline]
    pub fn from_u64(value: u64) -> Self {
        Self(LiteralContent::UnsignedLong(value))
    }

    /// Builds a literal with the given datatype.
    ///
    /// `xsd:string` literals are normalized to the plain string form.
    pub fn new_typed(value: impl Into<String>, datatype: Iri) -> Result<Self, TermError> {
        let value = value.into();
        if value.is_empty() {
            return Err(TermError::EmptyLiteral);
        }
        if datatype == xsd::STRING {
            return Ok(Self(LiteralContent::String(value)));
        }
        if datatype == rdf::LANG_STRING {
            return Err(TermError::LanguageTagRequired);
        }
        if datatype.as_str().len() > usize::from(u8::MAX) {
            return Err(TermError::DatatypeTooLong);
        }
        Ok(Self(LiteralContent::TypedLiteral { value, datatype }))
    }

    /// The lexical form of this literal.
    pub fn value(&self) -> Cow<'_, str> {
        match &self.0 {
            LiteralContent::String(value)
            | LiteralContent::LanguageTaggedString { value, .. }
            | LiteralContent::TypedLiteral { value, .. } => Cow::Borrowed(value),
            LiteralContent::Long(value) => Cow::Owned(value.to_string()),
            LiteralContent::UnsignedLong(value) => Cow::Owned(value.to_string()),
        }
    }

    /// The language tag, present iff the datatype is `rdf:langString`.
    pub fn language(&self) -> Option<&str> {
        match &self.0 {
            LiteralContent::LanguageTaggedString { language, .. } => Some(language),
            _ => None,
        }
    }

    /// The datatype IRI of this literal.
    pub fn datatype(&self) -> IriRef<'_> {
        match &self.0 {
            LiteralContent::String(_) => xsd::STRING,
            LiteralContent::LanguageTaggedString { .. } => rdf::LANG_STRING,
            LiteralContent::Long(_) => xsd::LONG,
            LiteralContent::UnsignedLong(_) => xsd::UNSIGNED_LONG,
            LiteralContent::TypedLiteral { datatype, .. } => datatype.as_ref(),
        }
    }

    #[inline]
    pub(crate) fn content(&self) -> &LiteralContent {
        &self.0
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            LiteralContent::String(value) => print_quoted_str(value, f),
            LiteralContent::LanguageTaggedString { value, language } => {
                print_quoted_str(value, f)?;
                write!(f, "@{language}")
            }
            _ => {
                print_quoted_str(&self.value(), f)?;
                write!(f, "^^{}", self.datatype())
            }
        }
    }
}

impl From<i64> for Literal {
    #[inline]
    fn from(value: i64) -> Self {
        Self::from_i64(value)
    }
}

impl From<u64> for Literal {
    #[inline]
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

/// An RDF term: either an [`Iri`] or a [`Literal`].
///
/// Blank nodes are not representable; the N-Triples parser either skips
/// statements containing them or rewrites them to IRIs.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum Term {
    Iri(Iri),
    Literal(Literal),
}

impl Term {
    #[inline]
    pub fn is_iri(&self) -> bool {
        matches!(self, Self::Iri(_))
    }

    #[inline]
    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Self::Iri(iri) => Some(iri),
            Self::Literal(_) => None,
        }
    }
}

impl fmt::Display for Term {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(iri) => iri.fmt(f),
            Self::Literal(literal) => literal.fmt(f),
        }
    }
}

impl From<Iri> for Term {
    #[inline]
    fn from(iri: Iri) -> Self {
        Self::Iri(iri)
    }
}

impl From<Literal> for Term {
    #[inline]
    fn from(literal: Literal) -> Self {
        Self::Literal(literal)
    }
}

fn print_quoted_str(string: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_char('"')?;
    for c in string.chars() {
        match c {
            '\u{08}' => f.write_str("\\b"),
            '\t' => f.write_str("\\t"),
            '\n' => f.write_str("\\n"),
            '\r' => f.write_str("\\r"),
            '\u{0C}' => f.write_str("\\f"),
            '"' => f.write_str("\\\""),
            '\\' => f.write_str("\\\\"),
            _ => f.write_char(c),
        }?;
    }
    f.write_char('"')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iri_rejects_empty() {
        assert_eq!(Iri::new(""), Err(TermError::EmptyIri));
    }

    #[test]
    fn literal_rejects_invalid_input() {
        assert_eq!(Literal::new_simple(""), Err(TermError::EmptyLiteral));
        assert_eq!(
            Literal::new_language_tagged("", "en"),
            Err(TermError::EmptyLiteral)
        );
        assert_eq!(
            Literal::new_language_tagged("hi", ""),
            Err(TermError::EmptyLanguageTag)
        );
        assert_eq!(
            Literal::new_language_tagged("hi", "x".repeat(256)),
            Err(TermError::LanguageTagTooLong)
        );
        assert_eq!(
            Literal::new_typed("abc", rdf::LANG_STRING.into_owned()),
            Err(TermError::LanguageTagRequired)
        );
    }

    #[test]
    fn typed_string_is_normalized() {
        assert_eq!(
            Literal::new_typed("abc", xsd::STRING.into_owned()).unwrap(),
            Literal::new_simple("abc").unwrap()
        );
    }

    #[test]
    fn typed_long_stays_lexical() {
        let typed = Literal::new_typed("01", xsd::LONG.into_owned()).unwrap();
        assert_ne!(typed, Literal::from_i64(1));
        assert_eq!(typed.value(), "01");
        assert_eq!(typed.datatype(), xsd::LONG);
    }

    #[test]
    fn display_is_ntriples() {
        assert_eq!(
            Iri::new("http://example.com/a").unwrap().to_string(),
            "<http://example.com/a>"
        );
        assert_eq!(
            Literal::new_simple("say \"hi\"\n").unwrap().to_string(),
            "\"say \\\"hi\\\"\\n\""
        );
        assert_eq!(
            Literal::new_language_tagged("hei", "nb-no")
                .unwrap()
                .to_string(),
            "\"hei\"@nb-no"
        );
        assert_eq!(
            Literal::from_u64(7).to_string(),
            "\"7\"^^<http://www.w3.org/2001/XMLSchema#unsignedLong>"
        );
        assert_eq!(
            Literal::new_typed("2020-01-01", xsd::DATE.into_owned())
                .unwrap()
                .to_string(),
            "\"2020-01-01\"^^<http://www.w3.org/2001/XMLSchema#date>"
        );
    }

    #[test]
    fn accessors() {
        let literal = Literal::new_language_tagged("hola", "es").unwrap();
        assert_eq!(literal.value(), "hola");
        assert_eq!(literal.language(), Some("es"));
        assert_eq!(literal.datatype(), rdf::LANG_STRING);

        let long = Literal::from_i64(-3);
        assert_eq!(long.value(), "-3");
        assert_eq!(long.language(), None);
        assert_eq!(long.datatype(), xsd::LONG);
    }
}
