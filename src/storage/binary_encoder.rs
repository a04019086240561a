//! The canonical, self-describing byte encoding of RDF terms.
//!
//! The first byte tags the term kind; the remainder is laid out so that the
//! whole slice is unambiguous and `decode_term` is a total inverse of
//! `encode_term`. These bytes are the primary key of the reverse dictionary,
//! so two terms are interned to the same id iff their encodings are equal.

use crate::model::{Iri, Literal, LiteralContent, Term};
use crate::storage::error::DecodeError;
use std::str;

const TYPE_IRI: u8 = 0x00;
const TYPE_LANG_STRING_LITERAL: u8 = 0x01;
const TYPE_STRING_LITERAL: u8 = 0x02;
const TYPE_LONG_LITERAL: u8 = 0x03;
const TYPE_UNSIGNED_LONG_LITERAL: u8 = 0x04;
const TYPE_TYPED_LITERAL: u8 = 0xFF;

pub fn encode_term(term: &Term) -> Vec<u8> {
    match term {
        Term::Iri(iri) => encode_iri(iri),
        Term::Literal(literal) => {
            let mut buffer = Vec::with_capacity(literal.value().len() + 2);
            write_literal(&mut buffer, literal);
            buffer
        }
    }
}

pub fn encode_iri(iri: &Iri) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(iri.as_str().len() + 1);
    buffer.push(TYPE_IRI);
    buffer.extend_from_slice(iri.as_str().as_bytes());
    buffer
}

fn write_literal(buffer: &mut Vec<u8>, literal: &Literal) {
    match literal.content() {
        LiteralContent::String(value) => {
            buffer.push(TYPE_STRING_LITERAL);
            buffer.extend_from_slice(value.as_bytes());
        }
        LiteralContent::LanguageTaggedString { value, language } => {
            buffer.push(TYPE_LANG_STRING_LITERAL);
            // the constructor caps tags at 255 bytes
            buffer.push(language.len() as u8);
            buffer.extend_from_slice(language.as_bytes());
            buffer.extend_from_slice(value.as_bytes());
        }
        LiteralContent::Long(value) => {
            buffer.push(TYPE_LONG_LITERAL);
            write_varint(buffer, *value);
        }
        LiteralContent::UnsignedLong(value) => {
            buffer.push(TYPE_UNSIGNED_LONG_LITERAL);
            write_uvarint(buffer, *value);
        }
        LiteralContent::TypedLiteral { value, datatype } => {
            buffer.push(TYPE_TYPED_LITERAL);
            buffer.push(datatype.as_str().len() as u8);
            buffer.extend_from_slice(datatype.as_str().as_bytes());
            buffer.extend_from_slice(value.as_bytes());
        }
    }
}

pub fn decode_term(buffer: &[u8]) -> Result<Term, DecodeError> {
    if buffer.len() < 2 {
        return Err(DecodeError);
    }
    match buffer[0] {
        TYPE_IRI => Ok(Iri::new(decode_str(&buffer[1..])?)
            .map_err(|_| DecodeError)?
            .into()),
        TYPE_STRING_LITERAL => Ok(Literal::new_simple(decode_str(&buffer[1..])?)
            .map_err(|_| DecodeError)?
            .into()),
        TYPE_LANG_STRING_LITERAL => {
            let tag_end = 2usize
                .checked_add(buffer[1].into())
                .filter(|end| *end <= buffer.len())
                .ok_or(DecodeError)?;
            let language = decode_str(&buffer[2..tag_end])?;
            let value = decode_str(&buffer[tag_end..])?;
            Ok(Literal::new_language_tagged(value, language)
                .map_err(|_| DecodeError)?
                .into())
        }
        TYPE_LONG_LITERAL => {
            let (value, read) = read_varint(&buffer[1..]).ok_or(DecodeError)?;
            if 1 + read != buffer.len() {
                return Err(DecodeError);
            }
            Ok(Literal::from_i64(value).into())
        }
        TYPE_UNSIGNED_LONG_LITERAL => {
            let (value, read) = read_uvarint(&buffer[1..]).ok_or(DecodeError)?;
            if 1 + read != buffer.len() {
                return Err(DecodeError);
            }
            Ok(Literal::from_u64(value).into())
        }
        TYPE_TYPED_LITERAL => {
            let datatype_end = 2usize
                .checked_add(buffer[1].into())
                .filter(|end| *end <= buffer.len())
                .ok_or(DecodeError)?;
            let datatype = Iri::new(decode_str(&buffer[2..datatype_end])?)
                .map_err(|_| DecodeError)?;
            let value = decode_str(&buffer[datatype_end..])?;
            Ok(Literal::new_typed(value, datatype)
                .map_err(|_| DecodeError)?
                .into())
        }
        _ => Err(DecodeError),
    }
}

fn decode_str(buffer: &[u8]) -> Result<&str, DecodeError> {
    str::from_utf8(buffer).map_err(|_| DecodeError)
}

/// Writes a zigzag-encoded signed varint.
fn write_varint(buffer: &mut Vec<u8>, value: i64) {
    write_uvarint(buffer, ((value << 1) ^ (value >> 63)) as u64);
}

fn write_uvarint(buffer: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        buffer.push(value as u8 | 0x80);
        value >>= 7;
    }
    buffer.push(value as u8);
}

fn read_varint(buffer: &[u8]) -> Option<(i64, usize)> {
    let (value, read) = read_uvarint(buffer)?;
    Some(((value >> 1) as i64 ^ -((value & 1) as i64), read))
}

fn read_uvarint(buffer: &[u8]) -> Option<(u64, usize)> {
    let mut value = 0;
    let mut shift = 0;
    for (i, byte) in buffer.iter().enumerate() {
        if shift == 63 && *byte & 0x7F > 1 {
            return None; // overflows 64 bits
        }
        value |= u64::from(byte & 0x7F) << shift;
        if byte & 0x80 == 0 {
            return Some((value, i + 1));
        }
        shift += 7;
        if shift > 63 {
            return None;
        }
    }
    None
}
