//! Ready to use [`IriRef`](super::IriRef) constants for the RDF and XSD vocabularies.

pub mod rdf {
    //! [RDF](https://www.w3.org/TR/rdf11-concepts/) vocabulary.
    use crate::model::IriRef;

    /// The class of language-tagged string literal values.
    pub const LANG_STRING: IriRef<'_> =
        IriRef::new_unchecked("http://www.w3.org/1999/02/22-rdf-syntax-ns#langString");
    /// The class of HTML literal values.
    pub const HTML: IriRef<'_> =
        IriRef::new_unchecked("http://www.w3.org/1999/02/22-rdf-syntax-ns#HTML");
    /// The class of XML literal values.
    pub const XML_LITERAL: IriRef<'_> =
        IriRef::new_unchecked("http://www.w3.org/1999/02/22-rdf-syntax-ns#XMLLiteral");
}

pub mod xsd {
    //! The [RDF-compatible XSD datatypes](https://www.w3.org/TR/rdf11-concepts/#dfn-datatype-iri).
    use crate::model::IriRef;

    /// Character strings.
    pub const STRING: IriRef<'_> =
        IriRef::new_unchecked("http://www.w3.org/2001/XMLSchema#string");
    /// `true` / `false`.
    pub const BOOLEAN: IriRef<'_> =
        IriRef::new_unchecked("http://www.w3.org/2001/XMLSchema#boolean");
    /// Arbitrary-precision decimal numbers.
    pub const DECIMAL: IriRef<'_> =
        IriRef::new_unchecked("http://www.w3.org/2001/XMLSchema#decimal");
    /// Arbitrary-size integer numbers.
    pub const INTEGER: IriRef<'_> =
        IriRef::new_unchecked("http://www.w3.org/2001/XMLSchema#integer");
    /// 64-bit floating point numbers.
    pub const DOUBLE: IriRef<'_> =
        IriRef::new_unchecked("http://www.w3.org/2001/XMLSchema#double");
    /// 32-bit floating point numbers.
    pub const FLOAT: IriRef<'_> = IriRef::new_unchecked("http://www.w3.org/2001/XMLSchema#float");
    /// Dates (on the timeline).
    pub const DATE: IriRef<'_> = IriRef::new_unchecked("http://www.w3.org/2001/XMLSchema#date");
    /// Times (on the timeline).
    pub const TIME: IriRef<'_> = IriRef::new_unchecked("http://www.w3.org/2001/XMLSchema#time");
    /// Date and time (on the timeline).
    pub const DATE_TIME: IriRef<'_> =
        IriRef::new_unchecked("http://www.w3.org/2001/XMLSchema#dateTime");
    /// Date and time with a required timezone.
    pub const DATE_TIME_STAMP: IriRef<'_> =
        IriRef::new_unchecked("http://www.w3.org/2001/XMLSchema#dateTimeStamp");
    /// Gregorian calendar year.
    pub const G_YEAR: IriRef<'_> =
        IriRef::new_unchecked("http://www.w3.org/2001/XMLSchema#gYear");
    /// Gregorian calendar month.
    pub const G_MONTH: IriRef<'_> =
        IriRef::new_unchecked("http://www.w3.org/2001/XMLSchema#gMonth");
    /// Gregorian calendar day of the month.
    pub const G_DAY: IriRef<'_> = IriRef::new_unchecked("http://www.w3.org/2001/XMLSchema#gDay");
    /// Gregorian calendar year and month.
    pub const G_YEAR_MONTH: IriRef<'_> =
        IriRef::new_unchecked("http://www.w3.org/2001/XMLSchema#gYearMonth");
    /// Gregorian calendar month and day.
    pub const G_MONTH_DAY: IriRef<'_> =
        IriRef::new_unchecked("http://www.w3.org/2001/XMLSchema#gMonthDay");
    /// Durations of time.
    pub const DURATION: IriRef<'_> =
        IriRef::new_unchecked("http://www.w3.org/2001/XMLSchema#duration");
    /// Durations counted in months and years.
    pub const YEAR_MONTH_DURATION: IriRef<'_> =
        IriRef::new_unchecked("http://www.w3.org/2001/XMLSchema#yearMonthDuration");
    /// Durations counted in days, hours, minutes and seconds.
    pub const DAY_TIME_DURATION: IriRef<'_> =
        IriRef::new_unchecked("http://www.w3.org/2001/XMLSchema#dayTimeDuration");
    /// -128…+127 (8 bit).
    pub const BYTE: IriRef<'_> = IriRef::new_unchecked("http://www.w3.org/2001/XMLSchema#byte");
    /// -32768…+32767 (16 bit).
    pub const SHORT: IriRef<'_> = IriRef::new_unchecked("http://www.w3.org/2001/XMLSchema#short");
    /// -2147483648…+2147483647 (32 bit).
    pub const INT: IriRef<'_> = IriRef::new_unchecked("http://www.w3.org/2001/XMLSchema#int");
    /// -9223372036854775808…+9223372036854775807 (64 bit).
    pub const LONG: IriRef<'_> = IriRef::new_unchecked("http://www.w3.org/2001/XMLSchema#long");
    /// 0…255 (8 bit).
    pub const UNSIGNED_BYTE: IriRef<'_> =
        IriRef::new_unchecked("http://www.w3.org/2001/XMLSchema#unsignedByte");
    /// 0…65535 (16 bit).
    pub const UNSIGNED_SHORT: IriRef<'_> =
        IriRef::new_unchecked("http://www.w3.org/2001/XMLSchema#unsignedShort");
    /// 0…4294967295 (32 bit).
    pub const UNSIGNED_INT: IriRef<'_> =
        IriRef::new_unchecked("http://www.w3.org/2001/XMLSchema#unsignedInt");
    /// 0…18446744073709551615 (64 bit).
    pub const UNSIGNED_LONG: IriRef<'_> =
        IriRef::new_unchecked("http://www.w3.org/2001/XMLSchema#unsignedLong");
    /// Integer numbers > 0.
    pub const POSITIVE_INTEGER: IriRef<'_> =
        IriRef::new_unchecked("http://www.w3.org/2001/XMLSchema#positiveInteger");
    /// Integer numbers ≥ 0.
    pub const NON_NEGATIVE_INTEGER: IriRef<'_> =
        IriRef::new_unchecked("http://www.w3.org/2001/XMLSchema#nonNegativeInteger");
    /// Integer numbers < 0.
    pub const NEGATIVE_INTEGER: IriRef<'_> =
        IriRef::new_unchecked("http://www.w3.org/2001/XMLSchema#negativeInteger");
    /// Integer numbers ≤ 0.
    pub const NON_POSITIVE_INTEGER: IriRef<'_> =
        IriRef::new_unchecked("http://www.w3.org/2001/XMLSchema#nonPositiveInteger");
    /// Hex-encoded binary data.
    pub const HEX_BINARY: IriRef<'_> =
        IriRef::new_unchecked("http://www.w3.org/2001/XMLSchema#hexBinary");
    /// Base64-encoded binary data.
    pub const BASE64_BINARY: IriRef<'_> =
        IriRef::new_unchecked("http://www.w3.org/2001/XMLSchema#base64Binary");
    /// Absolute or relative URIs and IRIs.
    pub const ANY_URI: IriRef<'_> =
        IriRef::new_unchecked("http://www.w3.org/2001/XMLSchema#anyURI");
    /// Language tags per [BCP47](https://tools.ietf.org/html/bcp47).
    pub const LANGUAGE: IriRef<'_> =
        IriRef::new_unchecked("http://www.w3.org/2001/XMLSchema#language");
    /// Whitespace-normalized strings.
    pub const NORMALIZED_STRING: IriRef<'_> =
        IriRef::new_unchecked("http://www.w3.org/2001/XMLSchema#normalizedString");
    /// Tokenized strings.
    pub const TOKEN: IriRef<'_> = IriRef::new_unchecked("http://www.w3.org/2001/XMLSchema#token");
    /// XML NMTOKENs.
    pub const NMTOKEN: IriRef<'_> =
        IriRef::new_unchecked("http://www.w3.org/2001/XMLSchema#NMTOKEN");
    /// XML Names.
    pub const NAME: IriRef<'_> = IriRef::new_unchecked("http://www.w3.org/2001/XMLSchema#Name");
    /// XML NCNames.
    pub const NC_NAME: IriRef<'_> =
        IriRef::new_unchecked("http://www.w3.org/2001/XMLSchema#NCName");
}
