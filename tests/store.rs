use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::TempDir;
use tripod::model::{Graph, Iri, Literal, Term, Triple};
use tripod::store::{Query, StorageError, Store};

fn open_store(dir: &TempDir) -> Store {
    Store::open(dir.path().join("test.db")).unwrap()
}

fn iri(value: &str) -> Iri {
    Iri::new(value).unwrap()
}

fn literal(value: &str) -> Literal {
    Literal::new_simple(value).unwrap()
}

fn lang(value: &str, language: &str) -> Literal {
    Literal::new_language_tagged(value, language).unwrap()
}

fn triple(s: &str, p: &str, o: impl Into<Term>) -> Triple {
    Triple::new(iri(s), iri(p), o)
}

#[test]
fn insert_contains_remove() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    let tr = triple("a", "p", literal("o"));

    assert!(!store.contains(&tr).unwrap());
    store.insert(&tr).unwrap();
    assert!(store.contains(&tr).unwrap());
    assert_eq!(store.len(), 1);

    store.remove(&tr).unwrap();
    assert!(!store.contains(&tr).unwrap());
    assert!(store.is_empty());
}

#[test]
fn insert_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    let tr = triple("a", "p", iri("o"));

    store.insert(&tr).unwrap();
    let before = store.stats().unwrap();
    store.insert(&tr).unwrap();
    let after = store.stats().unwrap();
    assert_eq!(before.num_triples, after.num_triples);
    assert_eq!(before.num_terms, after.num_terms);
}

#[test]
fn term_accounting() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    let tr1 = triple("A", "P", literal("O"));
    let tr2 = triple("A", "P", literal("O2"));
    let tr3 = triple("A", "P2", literal("O"));

    store.insert(&tr1).unwrap();
    let stats = store.stats().unwrap();
    assert_eq!(stats.num_terms, 3);
    assert_eq!(stats.num_triples, 1);

    store.insert(&tr2).unwrap();
    let stats = store.stats().unwrap();
    assert_eq!(stats.num_terms, 4);
    assert_eq!(stats.num_triples, 2);

    store.insert(&tr3).unwrap();
    store.insert(&tr3).unwrap();
    let stats = store.stats().unwrap();
    assert_eq!(stats.num_terms, 5);
    assert_eq!(stats.num_triples, 3);
}

#[test]
fn orphaned_terms_are_reclaimed() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    let tr1 = triple("s1", "p1", literal("o1"));
    let tr2 = triple("s1", "p1", literal("o2"));
    let tr3 = triple("s1", "p2", literal("o1"));

    for tr in [&tr1, &tr2, &tr3] {
        store.insert(tr).unwrap();
    }
    let start = store.stats().unwrap();
    assert_eq!(start.num_terms, 5);

    // only <p2> becomes orphaned: "o1" is still in tr1
    store.remove(&tr3).unwrap();
    let stats = store.stats().unwrap();
    assert_eq!(stats.num_triples, start.num_triples - 1);
    assert_eq!(stats.num_terms, start.num_terms - 1);

    // "o1" goes; <s1> and <p1> are kept alive by tr2
    store.remove(&tr1).unwrap();
    let stats2 = store.stats().unwrap();
    assert_eq!(stats2.num_triples, stats.num_triples - 1);
    assert_eq!(stats2.num_terms, stats.num_terms - 1);

    // everything left becomes orphaned
    store.remove(&tr2).unwrap();
    let stats3 = store.stats().unwrap();
    assert_eq!(stats3.num_triples, stats2.num_triples - 1);
    assert_eq!(stats3.num_terms, stats2.num_terms - 3);
    assert_eq!(stats3.num_terms, 0);
}

#[test]
fn removing_an_absent_triple_fails() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    store.insert(&triple("s1", "p1", literal("o1"))).unwrap();
    let before = store.stats().unwrap();

    // terms that were never interned
    let err = store
        .remove(&triple("s100", "p100", literal("o100")))
        .unwrap_err();
    assert!(matches!(err, StorageError::NotFound));

    // interned terms, but no such posting
    let err = store.remove(&triple("p1", "s1", literal("o1"))).unwrap_err();
    assert!(matches!(err, StorageError::NotFound));

    let after = store.stats().unwrap();
    assert_eq!(before.num_terms, after.num_terms);
    assert_eq!(before.num_triples, after.num_triples);
}

#[test]
fn removing_a_self_referencing_triple() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    // subject and object are the same term
    let tr = triple("s", "p", iri("s"));
    store.insert(&tr).unwrap();
    assert_eq!(store.stats().unwrap().num_terms, 2);

    store.remove(&tr).unwrap();
    let stats = store.stats().unwrap();
    assert_eq!(stats.num_terms, 0);
    assert_eq!(stats.num_triples, 0);
}

#[test]
fn import_ntriples() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    let count = store
        .load_from_reader("<s><p><o>.\n<s><p><o2>.".as_bytes(), 10, false)
        .unwrap();
    assert_eq!(count, 2);

    let graph = store.query(&Query::resource(iri("s"))).unwrap();
    let expected: Graph = [triple("s", "p", iri("o")), triple("s", "p", iri("o2"))]
        .into_iter()
        .collect();
    assert_eq!(graph, expected);

    let stats = store.stats().unwrap();
    assert_eq!(stats.num_triples, 2);
    assert_eq!(stats.num_terms, 4);
}

#[test]
fn import_skips_blank_nodes() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    let count = store
        .load_from_reader("_:b1 <p> <o> .".as_bytes(), 10, false)
        .unwrap();
    assert_eq!(count, 0);
    let stats = store.stats().unwrap();
    assert_eq!(stats.num_triples, 0);
    assert_eq!(stats.num_terms, 0);
}

#[test]
fn import_preserves_language_tags() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    let count = store
        .load_from_reader("<s> <p> \"hi\"@en.".as_bytes(), 10, false)
        .unwrap();
    assert_eq!(count, 1);

    let graph = store.query(&Query::resource(iri("s"))).unwrap();
    let expected: Graph = [triple("s", "p", lang("hi", "en"))].into_iter().collect();
    assert_eq!(graph, expected);
}

#[test]
fn import_skips_malformed_lines() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    let input = "<s_1> <p_1> <o_1> .\n\
                 <s_1> <p_1> \"abc . # invalid triple\n\
                 _:b1 <p_2> <o_1> .\n\
                 <s_1> <p_2> \"oz\"@fr .\n\
                 <s_11> <p_1> <o_1> .";
    let count = store.load_from_reader(input.as_bytes(), 10, true).unwrap();
    assert_eq!(count, 3);

    assert!(store.contains(&triple("s_1", "p_1", iri("o_1"))).unwrap());
    assert!(store.contains(&triple("s_1", "p_2", lang("oz", "fr"))).unwrap());
    assert!(store.contains(&triple("s_11", "p_1", iri("o_1"))).unwrap());
    assert_eq!(store.len(), 3);
}

#[test]
fn import_in_small_batches() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    let mut input = String::new();
    for i in 0..25 {
        input.push_str(&format!("<s{i}> <p> <o> .\n"));
    }
    let count = store.load_from_reader(input.as_bytes(), 4, false).unwrap();
    assert_eq!(count, 25);
    assert_eq!(store.len(), 25);
}

#[test]
fn resource_query_returns_the_rooted_subgraph() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    let graph: Graph = [
        triple("s10", "p1", literal("o1")),
        triple("s10", "p1", literal("o2")),
        triple("s10", "p2", literal("o1")),
        triple("s10", "p3", literal("o1")),
    ]
    .into_iter()
    .collect();
    store.insert_graph(&graph).unwrap();
    // unrelated triple that must not show up
    store.insert(&triple("s11", "p1", literal("o1"))).unwrap();

    let result = store.query(&Query::resource(iri("s10"))).unwrap();
    assert_eq!(result, graph);
}

#[test]
fn resource_query_on_an_unknown_subject_is_empty() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    store.insert(&triple("s", "p", literal("o"))).unwrap();
    let graph = store.query(&Query::resource(iri("nosuch"))).unwrap();
    assert!(graph.is_empty());
}

fn cbd_fixture(store: &Store) {
    let graph: Graph = [
        triple("z1", "p1", iri("z2")),
        triple("z1", "p2", literal("a")),
        triple("z1", "p3", literal("b")),
        triple("z1", "p4", literal("c")),
        triple("z2", "p2", literal("f")),
        triple("z3", "p1", iri("z1")),
    ]
    .into_iter()
    .collect();
    store.insert_graph(&graph).unwrap();
}

#[test]
fn cbd_depth_zero() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    cbd_fixture(&store);

    let result = store.query(&Query::cbd(iri("z1"), 0)).unwrap();
    let expected: Graph = [
        triple("z1", "p1", iri("z2")),
        triple("z1", "p2", literal("a")),
        triple("z1", "p3", literal("b")),
        triple("z1", "p4", literal("c")),
        triple("z3", "p1", iri("z1")),
    ]
    .into_iter()
    .collect();
    assert_eq!(result, expected);
}

#[test]
fn cbd_depth_one_expands_linked_resources() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    cbd_fixture(&store);

    let result = store.query(&Query::cbd(iri("z1"), 1)).unwrap();
    let expected: Graph = [
        triple("z1", "p1", iri("z2")),
        triple("z1", "p2", literal("a")),
        triple("z1", "p3", literal("b")),
        triple("z1", "p4", literal("c")),
        triple("z2", "p2", literal("f")),
        triple("z3", "p1", iri("z1")),
    ]
    .into_iter()
    .collect();
    assert_eq!(result, expected);
}

#[test]
fn remove_graph_reclaims_everything() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    let graph: Graph = [
        triple("s", "p", literal("o1")),
        triple("s", "p", literal("o2")),
        triple("s2", "p", iri("s")),
    ]
    .into_iter()
    .collect();
    store.insert_graph(&graph).unwrap();
    assert_eq!(store.len(), 3);

    // absent triples in the graph are skipped, not errors
    let mut to_remove = graph.clone();
    to_remove.insert(triple("nosuch", "p", literal("o1")));
    store.remove_graph(&to_remove).unwrap();

    let stats = store.stats().unwrap();
    assert_eq!(stats.num_triples, 0);
    assert_eq!(stats.num_terms, 0);
}

#[test]
fn counter_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.db");
    {
        let store = Store::open(&path).unwrap();
        store
            .load_from_reader("<s><p><o>.\n<s><p><o2>.\n<s2><p><o>.".as_bytes(), 10, false)
            .unwrap();
        store.remove(&triple("s2", "p", iri("o"))).unwrap();
        assert_eq!(store.len(), 2);
    }

    // the counter is re-derived from the SPO index
    let store = Store::open(&path).unwrap();
    assert_eq!(store.len(), 2);
    assert!(store.contains(&triple("s", "p", iri("o"))).unwrap());
    assert!(store.contains(&triple("s", "p", iri("o2"))).unwrap());
    assert!(!store.contains(&triple("s2", "p", iri("o"))).unwrap());

    let stats = store.stats().unwrap();
    assert_eq!(stats.num_terms, 4);
    assert!(stats.size_in_bytes > 0);
    assert_eq!(stats.path, path);
}

#[test]
fn interning_is_stable_across_transactions() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    // the same term in several statements must not inflate the dictionary
    store.insert(&triple("s", "p", literal("o"))).unwrap();
    store.insert(&triple("s", "p2", literal("o"))).unwrap();
    store.insert(&triple("s", "p", iri("s"))).unwrap();
    assert_eq!(store.stats().unwrap().num_terms, 4);
}

fn random_ascii(rng: &mut StdRng, max_len: usize) -> String {
    let len = rng.gen_range(1..=max_len);
    (0..len).map(|_| rng.gen_range('a'..='z')).collect()
}

fn random_term(rng: &mut StdRng, salt: usize) -> Term {
    match rng.gen_range(0..4) {
        0 => iri(&format!("http://example.org/{}/{salt}", random_ascii(rng, 20))).into(),
        1 => literal(&format!("{}-{salt}", random_ascii(rng, 200))).into(),
        2 => lang(&format!("{}-{salt}", random_ascii(rng, 200)), &random_ascii(rng, 8)).into(),
        _ => Literal::from_i64(rng.gen::<i64>()).into(),
    }
}

#[test]
fn randomized_triples_roundtrip() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    let mut rng = StdRng::seed_from_u64(0x123);

    let triples: Vec<Triple> = (0..30)
        .map(|i| {
            Triple::new(
                iri(&format!("http://example.org/s/{}", random_ascii(&mut rng, 16))),
                iri(&format!("http://example.org/p/{}", random_ascii(&mut rng, 16))),
                random_term(&mut rng, i),
            )
        })
        .collect();

    for tr in &triples {
        store.insert(tr).unwrap();
    }
    for tr in &triples {
        assert!(store.contains(tr).unwrap(), "missing {tr}");
    }

    let unique: Graph = triples.iter().cloned().collect();
    assert_eq!(store.len(), unique.len() as u64);

    store.remove_graph(&unique).unwrap();
    let stats = store.stats().unwrap();
    assert_eq!(stats.num_triples, 0);
    assert_eq!(stats.num_terms, 0);
}
