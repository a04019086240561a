//! Tripod is an embedded [RDF](https://www.w3.org/TR/rdf11-concepts/) triple store.
//!
//! It keeps a complete dataset in a single file: RDF terms are interned into a
//! bidirectional dictionary of 32-bit ids, and every triple is stored in three
//! covering indices (subject-predicate, object-subject and predicate-object)
//! whose postings are compressed bitmaps. Data is loaded from
//! [N-Triples](https://www.w3.org/TR/n-triples/) streams and queried with
//! resource and concise-bounded-description lookups.
//!
//! Usage example:
//! ```
//! use tripod::model::{Iri, Literal, Triple};
//! use tripod::store::{Query, Store};
//!
//! # let dir = tempfile::tempdir()?;
//! let store = Store::open(dir.path().join("example.db"))?;
//!
//! let subject = Iri::new("http://example.com/s")?;
//! let triple = Triple::new(
//!     subject.clone(),
//!     Iri::new("http://example.com/p")?,
//!     Literal::new_simple("hello")?,
//! );
//! store.insert(&triple)?;
//! assert!(store.contains(&triple)?);
//!
//! let graph = store.query(&Query::resource(subject))?;
//! assert_eq!(graph.len(), 1);
//! # Result::<_, Box<dyn std::error::Error>>::Ok(())
//! ```

pub mod model;
pub mod ntriples;
mod storage;
pub mod store;
