use crate::model::{Iri, Term};
use std::fmt;

/// An RDF [triple](https://www.w3.org/TR/rdf11-concepts/#dfn-rdf-triple).
///
/// The subject and predicate are always IRIs; the object may be any term.
///
/// The string formatter returns the N-Triples representation:
/// ```
/// use tripod::model::{Iri, Literal, Triple};
///
/// assert_eq!(
///     "<http://example.com/s> <http://example.com/p> \"o\" .",
///     Triple::new(
///         Iri::new("http://example.com/s")?,
///         Iri::new("http://example.com/p")?,
///         Literal::new_simple("o")?,
///     )
///     .to_string()
/// );
/// # Result::<_, tripod::model::TermError>::Ok(())
/// ```
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Triple {
    /// The resource this statement is about.
    pub subject: Iri,
    /// The property relating subject and object.
    pub predicate: Iri,
    /// The value of the statement.
    pub object: Term,
}

impl Triple {
    #[inline]
    pub fn new(subject: Iri, predicate: Iri, object: impl Into<Term>) -> Self {
        Self {
            subject,
            predicate,
            object: object.into(),
        }
    }
}

impl fmt::Display for Triple {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}
