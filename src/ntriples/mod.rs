//! Streaming parser for the [N-Triples](https://www.w3.org/TR/n-triples/) format.
//!
//! Deviations from the W3C specification:
//! - IRIs are not validated beyond being non-empty.
//! - Typed literals are not checked against their datatype.
//! - Any tokens between the terminating `.` and the end of the line are
//!   ignored.
//! - Statements containing blank nodes are skipped with a surfaced error,
//!   unless a namespace is configured to rewrite them to IRIs.

mod lexer;

use self::lexer::{Lexer, TokenKind};
use crate::model::vocab::xsd;
use crate::model::{Iri, Literal, Term, Triple};
use std::io::{self, Read};

/// An error raised while parsing N-Triples.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// A lexical or grammatical error in the input.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    /// An error reading the input stream.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A lexical or grammatical error on one input line.
///
/// During imports these are collected and skipped, not propagated: the parser
/// resumes at the next line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {message}")]
pub struct SyntaxError {
    line: u64,
    message: String,
}

impl SyntaxError {
    fn new(line: u64, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }

    /// The 1-based input line the error was found on.
    pub fn line(&self) -> u64 {
        self.line
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A streaming N-Triples parser.
///
/// It yields one [`Triple`] per well-formed statement. A malformed statement
/// yields a [`ParseError`] and parsing resumes at the next line, so a single
/// bad line never aborts a stream.
///
/// Usage example:
/// ```
/// use tripod::ntriples::NTriplesParser;
///
/// let input = "<http://example.com/s> <http://example.com/p> \"hi\"@en .\n";
/// let triples: Result<Vec<_>, _> = NTriplesParser::new(input.as_bytes()).collect();
/// assert_eq!(triples?.len(), 1);
/// # Result::<_, tripod::ntriples::ParseError>::Ok(())
/// ```
pub struct NTriplesParser<R: Read> {
    lexer: Lexer<R>,
    blank_node_namespace: Option<String>,
}

impl<R: Read> NTriplesParser<R> {
    pub fn new(read: R) -> Self {
        Self {
            lexer: Lexer::new(read),
            blank_node_namespace: None,
        }
    }

    /// Rewrites blank node labels to IRIs under the given namespace instead
    /// of skipping the statements containing them.
    pub fn with_blank_node_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.blank_node_namespace = Some(namespace.into());
        self
    }

    /// Consumes the rest of the current line and reports a syntax error on it.
    fn fail(&mut self, message: impl Into<String>) -> Result<Triple, ParseError> {
        let line = self.lexer.line_number();
        self.drain_line()?;
        Err(SyntaxError::new(line, message).into())
    }

    fn skip_blank_node(&mut self, position: &str) -> Result<Triple, ParseError> {
        self.fail(format!("skipping statement with blank node {position}"))
    }

    fn drain_line(&mut self) -> io::Result<()> {
        loop {
            match self.lexer.next_token()?.kind {
                TokenKind::Eol | TokenKind::Eof => return Ok(()),
                _ => {}
            }
        }
    }

    fn blank_node_iri(&self, label: &str) -> Option<Iri> {
        self.blank_node_namespace
            .as_ref()
            .map(|namespace| Iri::new_unchecked(format!("{namespace}{label}")))
    }

    /// Builds the object term for `literal` from the tokens that follow it.
    /// Returns the term and whether the statement's dot was already consumed.
    fn parse_literal_object(&mut self, value: String) -> Result<(Term, bool), TailError> {
        let token = self.lexer.next_token()?;
        match token.kind {
            TokenKind::Dot => match Literal::new_simple(value) {
                Ok(literal) => Ok((literal.into(), true)),
                Err(e) => Err(TailError::Syntax(e.to_string())),
            },
            TokenKind::Lang => match Literal::new_language_tagged(value, token.value) {
                Ok(literal) => Ok((literal.into(), false)),
                Err(e) => Err(TailError::Syntax(e.to_string())),
            },
            TokenKind::DtMarker => {
                let datatype = self.lexer.next_token()?;
                match datatype.kind {
                    TokenKind::Iri => match typed_literal(value, datatype.value) {
                        Ok(literal) => Ok((literal.into(), false)),
                        Err(e) => Err(TailError::Syntax(e.to_string())),
                    },
                    TokenKind::Eof => Err(TailError::Eof),
                    TokenKind::Error => Err(TailError::Syntax(datatype.value)),
                    kind => Err(TailError::Syntax(format!(
                        "expected IRI as literal datatype, got {}: {:?}",
                        kind.name(),
                        datatype.value
                    ))),
                }
            }
            TokenKind::Eof => Err(TailError::Eof),
            TokenKind::Error => Err(TailError::Syntax(token.value)),
            kind => Err(TailError::Syntax(format!(
                "expected dot, got {}",
                kind.name()
            ))),
        }
    }
}

/// How assembling a literal object can go wrong.
enum TailError {
    Syntax(String),
    Eof,
    Io(io::Error),
}

impl From<io::Error> for TailError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Applies the datatype normalization rules to a freshly parsed literal:
/// `xsd:string` becomes the plain string form, and an `xsd:long` whose
/// lexical form is the canonical rendering of a 64-bit integer is stored as
/// its value.
fn typed_literal(value: String, datatype: String) -> Result<Literal, crate::model::TermError> {
    if datatype == xsd::LONG.as_str() {
        if let Ok(parsed) = value.parse::<i64>() {
            if parsed.to_string() == value {
                return Ok(Literal::from_i64(parsed));
            }
        }
    }
    Literal::new_typed(value, Iri::new(datatype)?)
}

impl<R: Read> Iterator for NTriplesParser<R> {
    type Item = Result<Triple, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        // subject, skipping empty lines
        let token = loop {
            match self.lexer.next_token() {
                Ok(token) if token.kind == TokenKind::Eol => {}
                Ok(token) => break token,
                Err(e) => return Some(Err(e.into())),
            }
        };
        let subject = match token.kind {
            TokenKind::Eof => return None,
            TokenKind::Iri => Iri::new_unchecked(token.value),
            TokenKind::BNode => match self.blank_node_iri(&token.value) {
                Some(iri) => iri,
                None => return Some(self.skip_blank_node("subject")),
            },
            TokenKind::Error => return Some(self.fail(token.value)),
            kind => {
                return Some(self.fail(format!("expected IRI as subject, got {}", kind.name())))
            }
        };

        // predicate
        let token = match self.lexer.next_token() {
            Ok(token) => token,
            Err(e) => return Some(Err(e.into())),
        };
        let predicate = match token.kind {
            TokenKind::Eof => return None,
            TokenKind::Iri => Iri::new_unchecked(token.value),
            TokenKind::Error => return Some(self.fail(token.value)),
            kind => {
                return Some(self.fail(format!("expected IRI as predicate, got {}", kind.name())))
            }
        };

        // object
        let token = match self.lexer.next_token() {
            Ok(token) => token,
            Err(e) => return Some(Err(e.into())),
        };
        let mut terminated = false;
        let object: Term = match token.kind {
            TokenKind::Eof => return None,
            TokenKind::Iri => Iri::new_unchecked(token.value).into(),
            TokenKind::BNode => match self.blank_node_iri(&token.value) {
                Some(iri) => iri.into(),
                None => return Some(self.skip_blank_node("object")),
            },
            TokenKind::Literal => match self.parse_literal_object(token.value) {
                Ok((term, dot_seen)) => {
                    terminated = dot_seen;
                    term
                }
                Err(TailError::Eof) => return None,
                Err(TailError::Io(e)) => return Some(Err(e.into())),
                Err(TailError::Syntax(message)) => return Some(self.fail(message)),
            },
            TokenKind::Error => return Some(self.fail(token.value)),
            kind => {
                return Some(self.fail(format!(
                    "expected IRI or literal as object, got {}",
                    kind.name()
                )))
            }
        };

        // terminating dot, unless the literal fast path already consumed it
        if !terminated {
            let token = match self.lexer.next_token() {
                Ok(token) => token,
                Err(e) => return Some(Err(e.into())),
            };
            match token.kind {
                TokenKind::Dot => {}
                TokenKind::Eof => return None,
                TokenKind::Error => return Some(self.fail(token.value)),
                kind => return Some(self.fail(format!("expected dot, got {}", kind.name()))),
            }
        }

        // anything between the dot and the end of the line is ignored
        if let Err(e) = self.drain_line() {
            return Some(Err(e.into()));
        }
        Some(Ok(Triple {
            subject,
            predicate,
            object,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::vocab::rdf;

    fn iri(value: &str) -> Iri {
        Iri::new(value).unwrap()
    }

    fn parse(input: &str) -> (Vec<Triple>, Vec<String>) {
        let mut triples = Vec::new();
        let mut errors = Vec::new();
        for result in NTriplesParser::new(input.as_bytes()) {
            match result {
                Ok(triple) => triples.push(triple),
                Err(ParseError::Syntax(e)) => errors.push(e.to_string()),
                Err(ParseError::Io(e)) => panic!("unexpected I/O error: {e}"),
            }
        }
        (triples, errors)
    }

    #[test]
    fn decodes_statements() {
        let tests: &[(&str, Vec<Triple>, Vec<&str>)] = &[
            ("", vec![], vec![]),
            ("\n#comment <a> <b> <c> .\n", vec![], vec![]),
            (
                "\n\n\n<>.",
                vec![],
                vec![r#"line 4: empty IRI: "<>""#],
            ),
            (
                "<s><p><o>.\n<s><p><o2>.",
                vec![
                    Triple::new(iri("s"), iri("p"), iri("o")),
                    Triple::new(iri("s"), iri("p"), iri("o2")),
                ],
                vec![],
            ),
            (
                "\n\n<s>\t<p> <o>.#comment\n#comment\n<s><p><o2>.",
                vec![
                    Triple::new(iri("s"), iri("p"), iri("o")),
                    Triple::new(iri("s"), iri("p"), iri("o2")),
                ],
                vec![],
            ),
            (
                "<s><p><o>.<z>\n",
                vec![Triple::new(iri("s"), iri("p"), iri("o"))],
                vec![],
            ),
            (
                "<s><p><o>.<z>\n<s><p><o2>.<y>",
                vec![
                    Triple::new(iri("s"), iri("p"), iri("o")),
                    Triple::new(iri("s"), iri("p"), iri("o2")),
                ],
                vec![],
            ),
            (
                "_:b1 <p> <o> .",
                vec![],
                vec!["line 1: skipping statement with blank node subject"],
            ),
            (
                "<s> <p> _:b2 .",
                vec![],
                vec!["line 1: skipping statement with blank node object"],
            ),
            (
                "<s> <p> _:b2 .\n<S><P><O>.\n\t \n",
                vec![Triple::new(iri("S"), iri("P"), iri("O"))],
                vec!["line 1: skipping statement with blank node object"],
            ),
            (
                r#"<s> <p> ""."#,
                vec![],
                vec![r#"line 1: empty literal: "\"\"""#],
            ),
            (
                r#"<s> <p> "abc"."#,
                vec![Triple::new(
                    iri("s"),
                    iri("p"),
                    Literal::new_simple("abc").unwrap(),
                )],
                vec![],
            ),
            (
                r#"<s> <p> "hi"@en."#,
                vec![Triple::new(
                    iri("s"),
                    iri("p"),
                    Literal::new_language_tagged("hi", "en").unwrap(),
                )],
                vec![],
            ),
            (
                r#"<s> <p> "1"^^"a"."#,
                vec![],
                vec![r#"line 1: expected IRI as literal datatype, got literal: "a""#],
            ),
            (
                r#"<s> <p> "1"^^<http://www.w3.org/2001/XMLSchema#long>."#,
                vec![Triple::new(iri("s"), iri("p"), Literal::from_i64(1))],
                vec![],
            ),
            (
                r#"<s> <p> "01"^^<http://www.w3.org/2001/XMLSchema#long>."#,
                vec![Triple::new(
                    iri("s"),
                    iri("p"),
                    Literal::new_typed("01", xsd::LONG.into_owned()).unwrap(),
                )],
                vec![],
            ),
            (
                r#"<s> <p> "abc"^^<http://www.w3.org/2001/XMLSchema#string>."#,
                vec![Triple::new(
                    iri("s"),
                    iri("p"),
                    Literal::new_simple("abc").unwrap(),
                )],
                vec![],
            ),
            (
                r#"<s> <p> "2020"^^<http://www.w3.org/2001/XMLSchema#gYear>."#,
                vec![Triple::new(
                    iri("s"),
                    iri("p"),
                    Literal::new_typed("2020", xsd::G_YEAR.into_owned()).unwrap(),
                )],
                vec![],
            ),
            (
                "<s> <p> \"no dot\"\n<s2> <p2> <o2> .",
                vec![Triple::new(iri("s2"), iri("p2"), iri("o2"))],
                vec!["line 1: expected dot, got end of line"],
            ),
        ];

        for (input, want_triples, want_errors) in tests {
            let (triples, errors) = parse(input);
            assert_eq!(&triples, want_triples, "parsing {input:?}");
            let errors: Vec<&str> = errors.iter().map(String::as_str).collect();
            assert_eq!(&errors, want_errors, "parsing {input:?}");
        }
    }

    #[test]
    fn rewrites_blank_nodes_when_configured() {
        let input = "_:b1 <p> _:b2 .";
        let triples: Vec<_> = NTriplesParser::new(input.as_bytes())
            .with_blank_node_namespace("http://example.com/.well-known/genid/")
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(
            triples,
            vec![Triple::new(
                iri("http://example.com/.well-known/genid/b1"),
                iri("p"),
                iri("http://example.com/.well-known/genid/b2"),
            )]
        );
    }

    #[test]
    fn blank_node_predicate_is_an_error() {
        let (triples, errors) = parse("<s> _:b1 <o> .");
        assert!(triples.is_empty());
        assert_eq!(
            errors,
            vec!["line 1: expected IRI as predicate, got blank node"]
        );
    }

    #[test]
    fn langstring_datatype_requires_a_tag() {
        let input = format!(r#"<s> <p> "x"^^<{}>."#, rdf::LANG_STRING.as_str());
        let (triples, errors) = parse(&input);
        assert!(triples.is_empty());
        assert_eq!(
            errors,
            vec!["line 1: rdf:langString literals must carry a language tag"]
        );
    }

    #[test]
    fn recovers_after_malformed_lines() {
        let input = "<s_1> <p_1> <o_1> .\n\
                     <s_1> <p_1> \"abc . # invalid triple\n\
                     _:b1 <p_2> <o_1> .\n\
                     <s_1> <p_2> \"oz\"@fr .\n\
                     <s_11> <p_1> <o_1> .";
        let (triples, errors) = parse(input);
        assert_eq!(triples.len(), 3);
        assert_eq!(errors.len(), 2);
        assert!(errors[0].starts_with("line 2: unclosed Literal"));
        assert_eq!(errors[1], "line 3: skipping statement with blank node subject");
    }

    #[test]
    fn eof_terminates_without_trailing_newline() {
        let (triples, errors) = parse("<s> <p> \"abc\".");
        assert_eq!(triples.len(), 1);
        assert!(errors.is_empty());

        // a statement truncated by the end of the stream ends iteration
        let (triples, errors) = parse("<s> <p>");
        assert!(triples.is_empty());
        assert!(errors.is_empty());
    }
}
