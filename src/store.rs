//! The public store API: open a file, add and remove triples, import
//! N-Triples streams and run resource or CBD queries.

use crate::model::{Graph, Iri, Triple};
use crate::ntriples::{NTriplesParser, ParseError};
use crate::storage::Storage;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

pub use crate::storage::error::{CorruptionError, StorageError};

/// An embedded RDF triple store backed by a single database file.
///
/// Every mutating operation runs in one write transaction: either all of a
/// call's effects become visible or none do. Readers work on consistent
/// snapshots and never block writers. The file lock is released when the
/// store is dropped.
///
/// Usage example:
/// ```
/// use tripod::model::{Iri, Literal, Triple};
/// use tripod::store::{Query, Store};
///
/// # let dir = tempfile::tempdir()?;
/// let store = Store::open(dir.path().join("example.db"))?;
///
/// let ex = Iri::new("http://example.com")?;
/// let triple = Triple::new(ex.clone(), ex.clone(), Literal::new_simple("hi")?);
/// store.insert(&triple)?;
///
/// let graph = store.query(&Query::resource(ex))?;
/// assert!(graph.contains(&triple));
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
pub struct Store {
    storage: Storage,
    /// Cache of the triple count, kept in step with committed transactions
    /// and re-derived from the SPO index at open.
    num_triples: AtomicU64,
}

impl Store {
    /// Opens or creates the database file and makes it ready for reading
    /// and writing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let storage = Storage::open(path.as_ref())?;
        let num_triples = storage.snapshot()?.num_triples()?;
        debug!(
            path = %path.as_ref().display(),
            num_triples,
            "opened triple store"
        );
        Ok(Self {
            storage,
            num_triples: AtomicU64::new(num_triples),
        })
    }

    /// Stores a triple. Adding an already present triple is a no-op.
    pub fn insert(&self, triple: &Triple) -> Result<(), StorageError> {
        let inserted = self.storage.transaction(|txn| {
            let s = txn.intern_iri(&triple.subject)?;
            let p = txn.intern_iri(&triple.predicate)?;
            let o = txn.intern(&triple.object)?;
            txn.insert_triple(s, p, o)
        })?;
        if inserted {
            self.num_triples.fetch_add(1, Ordering::Relaxed);
        }
        Ok(())
    }

    /// Removes a triple, dropping any of its terms that no other triple
    /// references.
    ///
    /// Fails with [`StorageError::NotFound`] if the triple is not stored,
    /// leaving the indices and the counter unchanged.
    pub fn remove(&self, triple: &Triple) -> Result<(), StorageError> {
        self.storage.transaction(|txn| {
            let s = txn.iri_id(&triple.subject)?.ok_or(StorageError::NotFound)?;
            let p = txn
                .iri_id(&triple.predicate)?
                .ok_or(StorageError::NotFound)?;
            let o = txn.term_id(&triple.object)?.ok_or(StorageError::NotFound)?;
            txn.remove_triple(s, p, o)
        })?;
        self.num_triples.fetch_sub(1, Ordering::Relaxed);
        Ok(())
    }

    /// Checks whether the triple is stored. A triple with un-interned terms
    /// is simply absent, never an error.
    pub fn contains(&self, triple: &Triple) -> Result<bool, StorageError> {
        let reader = self.storage.snapshot()?;
        let Some(s) = reader.iri_id(&triple.subject)? else {
            return Ok(false);
        };
        let Some(p) = reader.iri_id(&triple.predicate)? else {
            return Ok(false);
        };
        let Some(o) = reader.term_id(&triple.object)? else {
            return Ok(false);
        };
        reader.contains(s, p, o)
    }

    /// Stores all triples of the graph in one transaction.
    ///
    /// Iteration is grouped by subject and predicate, so each of them is
    /// interned once per group.
    pub fn insert_graph(&self, graph: &Graph) -> Result<(), StorageError> {
        let inserted = self.storage.transaction(|txn| {
            let mut inserted = 0;
            let mut last_subject: Option<(&Iri, u32)> = None;
            let mut last_predicate: Option<(&Iri, u32)> = None;
            for (subject, predicate, object) in graph.iter() {
                let s = match last_subject {
                    Some((iri, id)) if iri == subject => id,
                    _ => {
                        let id = txn.intern_iri(subject)?;
                        last_subject = Some((subject, id));
                        last_predicate = None;
                        id
                    }
                };
                let p = match last_predicate {
                    Some((iri, id)) if iri == predicate => id,
                    _ => {
                        let id = txn.intern_iri(predicate)?;
                        last_predicate = Some((predicate, id));
                        id
                    }
                };
                let o = txn.intern(object)?;
                if txn.insert_triple(s, p, o)? {
                    inserted += 1;
                }
            }
            Ok(inserted)
        })?;
        self.num_triples.fetch_add(inserted, Ordering::Relaxed);
        Ok(())
    }

    /// Removes all triples of the graph in one transaction, with orphan
    /// reclamation. Triples that are not stored are skipped.
    pub fn remove_graph(&self, graph: &Graph) -> Result<(), StorageError> {
        let removed = self.storage.transaction(|txn| {
            let mut removed = 0;
            for (subject, predicate, object) in graph.iter() {
                let Some(s) = txn.iri_id(subject)? else {
                    continue;
                };
                let Some(p) = txn.iri_id(predicate)? else {
                    continue;
                };
                let Some(o) = txn.term_id(object)? else {
                    continue;
                };
                if !txn.contains_triple(s, p, o)? {
                    continue;
                }
                txn.remove_triple(s, p, o)?;
                removed += 1;
            }
            Ok(removed)
        })?;
        self.num_triples.fetch_sub(removed, Ordering::Relaxed);
        Ok(())
    }

    /// Decodes an N-Triples stream and stores its statements in batches of
    /// at most `batch_size` per transaction.
    ///
    /// Malformed lines and statements with blank nodes are skipped, and
    /// logged when `log_errors` is set. Returns the number of statements
    /// stored, whether or not they were already present.
    ///
    /// ```
    /// use tripod::store::Store;
    ///
    /// # let dir = tempfile::tempdir()?;
    /// let store = Store::open(dir.path().join("example.db"))?;
    /// let count = store.load_from_reader(
    ///     "<http://example.com/s> <http://example.com/p> \"hi\" .\n".as_bytes(),
    ///     1024,
    ///     false,
    /// )?;
    /// assert_eq!(count, 1);
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    pub fn load_from_reader(
        &self,
        read: impl Read,
        batch_size: usize,
        log_errors: bool,
    ) -> Result<u64, StorageError> {
        let batch_size = batch_size.max(1) as u64;
        let mut graph = Graph::new();
        let mut pending = 0;
        let mut total = 0;
        for result in NTriplesParser::new(read) {
            match result {
                Ok(triple) => {
                    graph.insert(triple);
                    pending += 1;
                    if pending == batch_size {
                        self.insert_graph(&graph)?;
                        total += pending;
                        pending = 0;
                        graph = Graph::new();
                    }
                }
                Err(ParseError::Syntax(e)) => {
                    if log_errors {
                        warn!("skipping statement: {e}");
                    }
                }
                Err(ParseError::Io(e)) => return Err(e.into()),
            }
        }
        if pending > 0 {
            self.insert_graph(&graph)?;
            total += pending;
        }
        Ok(total)
    }

    /// Runs a query on a consistent snapshot of the store.
    pub fn query(&self, query: &Query) -> Result<Graph, StorageError> {
        let reader = self.storage.snapshot()?;
        match query.form {
            QueryForm::Resource => reader.resource(&query.subject),
            QueryForm::Cbd { depth } => {
                reader.concise_bounded_description(&query.subject, depth)
            }
        }
    }

    /// The number of stored triples.
    pub fn len(&self) -> u64 {
        self.num_triples.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Statistics about the store.
    pub fn stats(&self) -> Result<Stats, StorageError> {
        let reader = self.storage.snapshot()?;
        let path = self.storage.path().to_path_buf();
        let size_in_bytes = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        Ok(Stats {
            num_terms: reader.num_terms()?,
            num_triples: self.len(),
            size_in_bytes,
            path,
        })
    }
}

/// A query against the store. A query always returns a [`Graph`].
#[derive(Debug, Clone)]
pub struct Query {
    subject: Iri,
    form: QueryForm,
}

#[derive(Debug, Clone, Copy)]
enum QueryForm {
    Resource,
    Cbd { depth: u32 },
}

impl Query {
    /// All triples with the given IRI as subject, like SPARQL `DESCRIBE`.
    pub fn resource(subject: Iri) -> Self {
        Self {
            subject,
            form: QueryForm::Resource,
        }
    }

    /// The concise bounded description of the given IRI: all triples with it
    /// as subject or object, recursively expanded on every other IRI in the
    /// result for up to `depth` extra hops.
    pub fn cbd(subject: Iri, depth: u32) -> Self {
        Self {
            subject,
            form: QueryForm::Cbd { depth },
        }
    }
}

/// Statistics about a [`Store`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stats {
    /// Number of interned terms.
    pub num_terms: u64,
    /// Number of stored triples.
    pub num_triples: u64,
    /// Size of the database file.
    pub size_in_bytes: u64,
    /// Location of the database file.
    pub path: PathBuf,
}
