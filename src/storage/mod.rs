//! Persistent storage: the term dictionary and the three covering indices.
//!
//! Everything lives in one [redb](https://docs.rs/redb) file. Terms are
//! interned into 32-bit ids through the `terms`/`iterms` table pair, and a
//! triple `(s, p, o)` is stored in all three index tables or in none:
//! `spo` holds `o` in the bitmap keyed by `(s, p)`, `osp` holds `p` under
//! `(o, s)` and `pos` holds `s` under `(p, o)`. Bitmap postings are
//! serialized [roaring](https://docs.rs/roaring) bitmaps and are read fresh
//! for every operation, trading repeated deserialization for trivial
//! consistency under concurrent transactions.

pub mod binary_encoder;
pub mod error;

use self::binary_encoder::{decode_term, encode_iri, encode_term};
use self::error::{CorruptionError, StorageError};
use crate::model::vocab::{rdf, xsd};
use crate::model::{Graph, Iri, IriRef, Term, Triple};
use redb::{
    Database, ReadTransaction, ReadableTable, ReadableTableMetadata, Table, TableDefinition,
};
use roaring::RoaringBitmap;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

const TERMS: TableDefinition<u32, &[u8]> = TableDefinition::new("terms");
const ITERMS: TableDefinition<&[u8], u32> = TableDefinition::new("iterms");
const SPO: TableDefinition<(u32, u32), &[u8]> = TableDefinition::new("spo");
const OSP: TableDefinition<(u32, u32), &[u8]> = TableDefinition::new("osp");
const POS: TableDefinition<(u32, u32), &[u8]> = TableDefinition::new("pos");
const DT: TableDefinition<u32, &[u8]> = TableDefinition::new("dt");
const IDT: TableDefinition<&[u8], u32> = TableDefinition::new("idt");
const SEQUENCES: TableDefinition<u8, u64> = TableDefinition::new("sequences");

/// Slot in the `sequences` table holding the last allocated term id.
const SEQ_TERM_ID: u8 = 1;

/// The datatypes stored under ids 0-41 in the `dt`/`idt` tables: the
/// RDF-compatible XSD datatypes plus `rdf:langString`, `rdf:HTML` and
/// `rdf:XMLLiteral`. Reserved for prebuilt datatype mappings.
const DATATYPES: [IriRef<'static>; 42] = [
    rdf::LANG_STRING,
    xsd::STRING,
    xsd::BOOLEAN,
    xsd::DECIMAL,
    xsd::INTEGER,
    xsd::DOUBLE,
    xsd::FLOAT,
    xsd::DATE,
    xsd::TIME,
    xsd::DATE_TIME,
    xsd::DATE_TIME_STAMP,
    xsd::G_YEAR,
    xsd::G_MONTH,
    xsd::G_DAY,
    xsd::G_YEAR_MONTH,
    xsd::G_MONTH_DAY,
    xsd::DURATION,
    xsd::YEAR_MONTH_DURATION,
    xsd::DAY_TIME_DURATION,
    xsd::BYTE,
    xsd::SHORT,
    xsd::INT,
    xsd::LONG,
    xsd::UNSIGNED_BYTE,
    xsd::UNSIGNED_SHORT,
    xsd::UNSIGNED_INT,
    xsd::UNSIGNED_LONG,
    xsd::POSITIVE_INTEGER,
    xsd::NON_NEGATIVE_INTEGER,
    xsd::NEGATIVE_INTEGER,
    xsd::NON_POSITIVE_INTEGER,
    xsd::HEX_BINARY,
    xsd::BASE64_BINARY,
    xsd::ANY_URI,
    xsd::LANGUAGE,
    xsd::NORMALIZED_STRING,
    xsd::TOKEN,
    xsd::NMTOKEN,
    xsd::NAME,
    xsd::NC_NAME,
    rdf::HTML,
    rdf::XML_LITERAL,
];

/// Low level storage primitives over a single database file.
pub struct Storage {
    db: Database,
    path: PathBuf,
}

impl Storage {
    /// Opens or creates the database file and ensures all tables exist.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let db = Database::create(path)?;
        let this = Self {
            db,
            path: path.to_path_buf(),
        };
        this.setup()?;
        Ok(this)
    }

    fn setup(&self) -> Result<(), StorageError> {
        let txn = self.db.begin_write()?;
        {
            txn.open_table(TERMS)?;
            txn.open_table(ITERMS)?;
            txn.open_table(SPO)?;
            txn.open_table(OSP)?;
            txn.open_table(POS)?;
            txn.open_table(SEQUENCES)?;
            let mut dt = txn.open_table(DT)?;
            let mut idt = txn.open_table(IDT)?;
            if dt.is_empty()? {
                for (id, datatype) in DATATYPES.iter().enumerate() {
                    dt.insert(id as u32, datatype.as_str().as_bytes())?;
                    idt.insert(datatype.as_str().as_bytes(), id as u32)?;
                }
            }
        }
        txn.commit()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A consistent read snapshot of the store.
    pub fn snapshot(&self) -> Result<StorageReader, StorageError> {
        Ok(StorageReader {
            txn: self.db.begin_read()?,
        })
    }

    /// Runs `f` inside a write transaction, committing on success.
    ///
    /// On error or panic the transaction is dropped, which rolls every write
    /// back; partial state never becomes visible.
    pub fn transaction<T>(
        &self,
        f: impl FnOnce(&mut StorageTransaction<'_>) -> Result<T, StorageError>,
    ) -> Result<T, StorageError> {
        let txn = self.db.begin_write()?;
        let result = {
            let mut transaction = StorageTransaction {
                terms: txn.open_table(TERMS)?,
                iterms: txn.open_table(ITERMS)?,
                spo: txn.open_table(SPO)?,
                osp: txn.open_table(OSP)?,
                pos: txn.open_table(POS)?,
                sequences: txn.open_table(SEQUENCES)?,
            };
            f(&mut transaction)
        };
        match result {
            Ok(value) => {
                txn.commit()?;
                Ok(value)
            }
            Err(e) => Err(e),
        }
    }
}

/// A write transaction over the dictionary and the three indices.
pub struct StorageTransaction<'a> {
    terms: Table<'a, u32, &'static [u8]>,
    iterms: Table<'a, &'static [u8], u32>,
    spo: Table<'a, (u32, u32), &'static [u8]>,
    osp: Table<'a, (u32, u32), &'static [u8]>,
    pos: Table<'a, (u32, u32), &'static [u8]>,
    sequences: Table<'a, u8, u64>,
}

impl StorageTransaction<'_> {
    /// The id of an already interned term.
    pub fn term_id(&self, term: &Term) -> Result<Option<u32>, StorageError> {
        Ok(self
            .iterms
            .get(encode_term(term).as_slice())?
            .map(|id| id.value()))
    }

    /// The id of an already interned IRI.
    pub fn iri_id(&self, iri: &Iri) -> Result<Option<u32>, StorageError> {
        Ok(self
            .iterms
            .get(encode_iri(iri).as_slice())?
            .map(|id| id.value()))
    }

    /// Interns a term, allocating a fresh id on first use.
    ///
    /// Two calls with equal terms return the same id: the probe and the
    /// writes happen in the same transaction.
    pub fn intern(&mut self, term: &Term) -> Result<u32, StorageError> {
        self.intern_encoded(encode_term(term))
    }

    /// Interns an IRI, allocating a fresh id on first use.
    pub fn intern_iri(&mut self, iri: &Iri) -> Result<u32, StorageError> {
        self.intern_encoded(encode_iri(iri))
    }

    fn intern_encoded(&mut self, encoded: Vec<u8>) -> Result<u32, StorageError> {
        if let Some(id) = self.iterms.get(encoded.as_slice())? {
            return Ok(id.value());
        }
        let id = self.next_term_id()?;
        self.terms.insert(id, encoded.as_slice())?;
        self.iterms.insert(encoded.as_slice(), id)?;
        Ok(id)
    }

    fn next_term_id(&mut self) -> Result<u32, StorageError> {
        let current = self.sequences.get(SEQ_TERM_ID)?.map_or(0, |v| v.value());
        let next = current + 1;
        if next > u64::from(u32::MAX) {
            return Err(StorageError::Full);
        }
        self.sequences.insert(SEQ_TERM_ID, next)?;
        Ok(next as u32)
    }

    /// Checks the SPO index for the triple.
    pub fn contains_triple(&self, s: u32, p: u32, o: u32) -> Result<bool, StorageError> {
        match self.spo.get((s, p))? {
            Some(bytes) => Ok(RoaringBitmap::deserialize_from(bytes.value())?.contains(o)),
            None => Ok(false),
        }
    }

    /// Inserts a triple into the three indices.
    ///
    /// Returns `false` without touching anything if it was already present.
    pub fn insert_triple(&mut self, s: u32, p: u32, o: u32) -> Result<bool, StorageError> {
        if !insert_posting(&mut self.spo, s, p, o)? {
            return Ok(false);
        }
        let in_osp = insert_posting(&mut self.osp, o, s, p)?;
        let in_pos = insert_posting(&mut self.pos, p, o, s)?;
        assert!(
            in_osp && in_pos,
            "triple indices have diverged on ({s}, {p}, {o})"
        );
        Ok(true)
    }

    /// Removes a triple from the three indices, then drops terms that no
    /// longer appear in any triple from the dictionary.
    ///
    /// Fails with [`StorageError::NotFound`] if any index lacks the posting,
    /// aborting the transaction so no partial removal becomes visible.
    pub fn remove_triple(&mut self, s: u32, p: u32, o: u32) -> Result<(), StorageError> {
        remove_posting(&mut self.spo, s, p, o)?;
        remove_posting(&mut self.osp, o, s, p)?;
        remove_posting(&mut self.pos, p, o, s)?;
        self.remove_orphaned_terms(s, p, o)
    }

    /// Drops each of the given ids from the dictionary if it has become
    /// orphaned. All three indices must be probed: the role a term played
    /// in the removed triple says nothing about its other occurrences.
    fn remove_orphaned_terms(&mut self, s: u32, p: u32, o: u32) -> Result<(), StorageError> {
        let ids = [s, p, o];
        for (i, &id) in ids.iter().enumerate() {
            if ids[..i].contains(&id) {
                continue;
            }
            if !self.term_referenced(id)? {
                self.remove_term(id)?;
            }
        }
        Ok(())
    }

    fn term_referenced(&self, id: u32) -> Result<bool, StorageError> {
        Ok(appears_in(&self.spo, id)?
            || appears_in(&self.osp, id)?
            || appears_in(&self.pos, id)?)
    }

    fn remove_term(&mut self, id: u32) -> Result<(), StorageError> {
        let Some(encoded) = self.terms.remove(id)? else {
            panic!("corruption: term {id} is already gone from the dictionary");
        };
        if self.iterms.remove(encoded.value())?.is_none() {
            panic!("corruption: term {id} is missing from the reverse dictionary");
        }
        Ok(())
    }
}

fn insert_posting(
    table: &mut Table<'_, (u32, u32), &'static [u8]>,
    k1: u32,
    k2: u32,
    value: u32,
) -> Result<bool, StorageError> {
    let mut bitmap = match table.get((k1, k2))? {
        Some(bytes) => RoaringBitmap::deserialize_from(bytes.value())?,
        None => RoaringBitmap::new(),
    };
    if !bitmap.insert(value) {
        return Ok(false);
    }
    write_bitmap(table, k1, k2, &bitmap)
}

fn remove_posting(
    table: &mut Table<'_, (u32, u32), &'static [u8]>,
    k1: u32,
    k2: u32,
    value: u32,
) -> Result<(), StorageError> {
    let mut bitmap = match table.get((k1, k2))? {
        Some(bytes) => RoaringBitmap::deserialize_from(bytes.value())?,
        None => return Err(StorageError::NotFound),
    };
    if !bitmap.remove(value) {
        return Err(StorageError::NotFound);
    }
    if bitmap.is_empty() {
        // empty bitmaps are never stored
        table.remove((k1, k2))?;
        Ok(())
    } else {
        write_bitmap(table, k1, k2, &bitmap).map(|_| ())
    }
}

fn write_bitmap(
    table: &mut Table<'_, (u32, u32), &'static [u8]>,
    k1: u32,
    k2: u32,
    bitmap: &RoaringBitmap,
) -> Result<bool, StorageError> {
    let mut buffer = Vec::with_capacity(bitmap.serialized_size());
    bitmap.serialize_into(&mut buffer)?;
    table.insert((k1, k2), buffer.as_slice())?;
    Ok(true)
}

/// Checks whether any composite key in the index starts with the given id.
///
/// The keys are ordered, so seeking to the smallest key at or after
/// `(id, 0)` and comparing its first component is enough.
fn appears_in(
    table: &impl ReadableTable<(u32, u32), &'static [u8]>,
    id: u32,
) -> Result<bool, StorageError> {
    match table.range((id, 0)..)?.next() {
        Some(entry) => {
            let (key, _) = entry?;
            Ok(key.value().0 == id)
        }
        None => Ok(false),
    }
}

/// A read snapshot of the store.
pub struct StorageReader {
    txn: ReadTransaction,
}

impl StorageReader {
    pub fn term_id(&self, term: &Term) -> Result<Option<u32>, StorageError> {
        let iterms = self.txn.open_table(ITERMS)?;
        Ok(iterms
            .get(encode_term(term).as_slice())?
            .map(|id| id.value()))
    }

    pub fn iri_id(&self, iri: &Iri) -> Result<Option<u32>, StorageError> {
        let iterms = self.txn.open_table(ITERMS)?;
        Ok(iterms
            .get(encode_iri(iri).as_slice())?
            .map(|id| id.value()))
    }

    pub fn contains(&self, s: u32, p: u32, o: u32) -> Result<bool, StorageError> {
        let spo = self.txn.open_table(SPO)?;
        match spo.get((s, p))? {
            Some(bytes) => Ok(RoaringBitmap::deserialize_from(bytes.value())?.contains(o)),
            None => Ok(false),
        }
    }

    /// The number of interned terms.
    pub fn num_terms(&self) -> Result<u64, StorageError> {
        Ok(self.txn.open_table(TERMS)?.len()?)
    }

    /// The number of stored triples, summed over the SPO bitmaps.
    pub fn num_triples(&self) -> Result<u64, StorageError> {
        let spo = self.txn.open_table(SPO)?;
        let mut count = 0;
        for entry in spo.iter()? {
            let (_, bytes) = entry?;
            count += RoaringBitmap::deserialize_from(bytes.value())?.len();
        }
        Ok(count)
    }

    /// All triples with the given subject.
    pub fn resource(&self, subject: &Iri) -> Result<Graph, StorageError> {
        let mut graph = Graph::new();
        if let Some(sid) = self.iri_id(subject)? {
            let spo = self.txn.open_table(SPO)?;
            let terms = self.txn.open_table(TERMS)?;
            walk_subject(&spo, &terms, sid, subject, &mut graph)?;
        }
        Ok(graph)
    }

    /// The concise bounded description of `start`: all triples with it as
    /// subject or object, expanded on every newly encountered IRI for up to
    /// `depth` extra hops. Already described resources are not revisited.
    pub fn concise_bounded_description(
        &self,
        start: &Iri,
        depth: u32,
    ) -> Result<Graph, StorageError> {
        let spo = self.txn.open_table(SPO)?;
        let osp = self.txn.open_table(OSP)?;
        let terms = self.txn.open_table(TERMS)?;
        let iterms = self.txn.open_table(ITERMS)?;

        let mut graph = Graph::new();
        let mut described = HashSet::new();
        let mut frontier = vec![start.clone()];
        for _ in 0..=depth {
            let mut next = Vec::new();
            for iri in frontier.drain(..) {
                if !described.insert(iri.clone()) {
                    continue;
                }
                let Some(id) = iterms.get(encode_iri(&iri).as_slice())?.map(|id| id.value())
                else {
                    continue;
                };
                next.extend(walk_subject(&spo, &terms, id, &iri, &mut graph)?);
                next.extend(walk_object(&osp, &terms, id, &iri, &mut graph)?);
            }
            frontier = next;
        }
        Ok(graph)
    }
}

/// Walks the SPO index from `(sid, 0)` and adds one triple per posting.
/// Returns the IRIs linked from the subject, for description expansion.
fn walk_subject(
    spo: &impl ReadableTable<(u32, u32), &'static [u8]>,
    terms: &impl ReadableTable<u32, &'static [u8]>,
    sid: u32,
    subject: &Iri,
    graph: &mut Graph,
) -> Result<Vec<Iri>, StorageError> {
    let mut linked = Vec::new();
    for entry in spo.range((sid, 0)..)? {
        let (key, bytes) = entry?;
        let (s, pid) = key.value();
        if s != sid {
            break;
        }
        let predicate = expect_iri(resolve(terms, pid)?, "predicate");
        let bitmap = RoaringBitmap::deserialize_from(bytes.value())?;
        for oid in bitmap.iter() {
            let object = resolve(terms, oid)?;
            if let Term::Iri(iri) = &object {
                linked.push(iri.clone());
            }
            graph.insert(Triple::new(subject.clone(), predicate.clone(), object));
        }
    }
    Ok(linked)
}

/// Walks the OSP index from `(oid, 0)` and adds one triple per posting,
/// reversing the subject and predicate roles. Returns the subjects found.
fn walk_object(
    osp: &impl ReadableTable<(u32, u32), &'static [u8]>,
    terms: &impl ReadableTable<u32, &'static [u8]>,
    oid: u32,
    object: &Iri,
    graph: &mut Graph,
) -> Result<Vec<Iri>, StorageError> {
    let mut linked = Vec::new();
    for entry in osp.range((oid, 0)..)? {
        let (key, bytes) = entry?;
        let (o, sid) = key.value();
        if o != oid {
            break;
        }
        let subject = expect_iri(resolve(terms, sid)?, "subject");
        linked.push(subject.clone());
        let bitmap = RoaringBitmap::deserialize_from(bytes.value())?;
        for pid in bitmap.iter() {
            let predicate = expect_iri(resolve(terms, pid)?, "predicate");
            graph.insert(Triple::new(
                subject.clone(),
                predicate,
                Term::Iri(object.clone()),
            ));
        }
    }
    Ok(linked)
}

/// Resolves an id found in an index. The dictionary resolving every indexed
/// id is a store invariant; a miss means the file is corrupt and the process
/// must halt rather than keep going.
fn resolve(
    terms: &impl ReadableTable<u32, &'static [u8]>,
    id: u32,
) -> Result<Term, StorageError> {
    let Some(bytes) = terms.get(id)? else {
        panic!("corruption: term {id} is indexed but missing from the dictionary");
    };
    Ok(decode_term(bytes.value()).map_err(CorruptionError::from)?)
}

fn expect_iri(term: Term, role: &str) -> Iri {
    match term {
        Term::Iri(iri) => iri,
        Term::Literal(literal) => {
            panic!("corruption: literal {literal} stored as a {role}")
        }
    }
}
