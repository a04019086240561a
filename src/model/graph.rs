use crate::model::{Iri, Term, Triple};
use std::collections::BTreeMap;
use std::fmt;

/// An in-memory collection of triples, grouped by subject and predicate.
///
/// Objects are de-duplicated by structural equality, so a graph is a set of
/// triples. Iteration is ordered by subject, then predicate, which lets bulk
/// insertion into the store intern each subject and predicate only once.
///
/// Usage example:
/// ```
/// use tripod::model::{Graph, Iri, Literal, Triple};
///
/// let mut graph = Graph::new();
/// let s = Iri::new("http://example.com/s")?;
/// let p = Iri::new("http://example.com/p")?;
/// graph.insert(Triple::new(s.clone(), p.clone(), Literal::new_simple("a")?));
/// graph.insert(Triple::new(s, p, Literal::new_simple("a")?));
/// assert_eq!(graph.len(), 1);
/// # Result::<_, tripod::model::TermError>::Ok(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Graph {
    inner: BTreeMap<Iri, BTreeMap<Iri, Vec<Term>>>,
    len: usize,
}

impl Graph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a triple. Returns whether it was not already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        let objects = self
            .inner
            .entry(triple.subject)
            .or_default()
            .entry(triple.predicate)
            .or_default();
        if objects.contains(&triple.object) {
            return false;
        }
        objects.push(triple.object);
        self.len += 1;
        true
    }

    /// Checks whether the graph contains the given triple.
    pub fn contains(&self, triple: &Triple) -> bool {
        self.inner
            .get(&triple.subject)
            .and_then(|predicates| predicates.get(&triple.predicate))
            .is_some_and(|objects| objects.contains(&triple.object))
    }

    /// The triples of the graph, ordered by subject then predicate.
    pub fn iter(&self) -> impl Iterator<Item = (&Iri, &Iri, &Term)> {
        self.inner.iter().flat_map(|(subject, predicates)| {
            predicates.iter().flat_map(move |(predicate, objects)| {
                objects.iter().map(move |object| (subject, predicate, object))
            })
        })
    }

    /// The number of triples in the graph.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len
            && self.inner.len() == other.inner.len()
            && self.inner.iter().all(|(subject, predicates)| {
                other.inner.get(subject).is_some_and(|other_predicates| {
                    predicates.len() == other_predicates.len()
                        && predicates.iter().all(|(predicate, objects)| {
                            other_predicates.get(predicate).is_some_and(|other_objects| {
                                objects.len() == other_objects.len()
                                    && objects.iter().all(|object| other_objects.contains(object))
                            })
                        })
                })
            })
    }
}

impl Eq for Graph {}

impl Extend<Triple> for Graph {
    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        for triple in iter {
            self.insert(triple);
        }
    }
}

impl FromIterator<Triple> for Graph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut graph = Self::new();
        graph.extend(iter);
        graph
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (subject, predicate, object) in self.iter() {
            writeln!(f, "{subject} {predicate} {object} .")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Literal;

    fn iri(value: &str) -> Iri {
        Iri::new(value).unwrap()
    }

    fn triple(s: &str, p: &str, o: &str) -> Triple {
        Triple::new(iri(s), iri(p), Literal::new_simple(o).unwrap())
    }

    #[test]
    fn insert_deduplicates() {
        let mut graph = Graph::new();
        assert!(graph.insert(triple("s", "p", "o")));
        assert!(!graph.insert(triple("s", "p", "o")));
        assert!(graph.insert(triple("s", "p", "o2")));
        assert_eq!(graph.len(), 2);
        assert!(graph.contains(&triple("s", "p", "o")));
        assert!(!graph.contains(&triple("s", "p2", "o")));
    }

    #[test]
    fn equality_ignores_insertion_order() {
        let a: Graph = [triple("s", "p", "o"), triple("s", "p", "o2")]
            .into_iter()
            .collect();
        let b: Graph = [triple("s", "p", "o2"), triple("s", "p", "o")]
            .into_iter()
            .collect();
        assert_eq!(a, b);

        let c: Graph = [triple("s", "p", "o")].into_iter().collect();
        assert_ne!(a, c);
    }

    #[test]
    fn iteration_groups_by_subject_and_predicate() {
        let graph: Graph = [
            triple("b", "p2", "o"),
            triple("a", "p", "o"),
            triple("b", "p1", "o"),
            triple("b", "p1", "o2"),
        ]
        .into_iter()
        .collect();
        let order: Vec<_> = graph
            .iter()
            .map(|(s, p, _)| (s.as_str().to_owned(), p.as_str().to_owned()))
            .collect();
        assert_eq!(
            order,
            [
                ("a".to_owned(), "p".to_owned()),
                ("b".to_owned(), "p1".to_owned()),
                ("b".to_owned(), "p1".to_owned()),
                ("b".to_owned(), "p2".to_owned()),
            ]
        );
    }
}
