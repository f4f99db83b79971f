//! Concurrent access to a shared schema registry

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use xbelkit::schema::{ElementDecl, QName, SchemaRegistry, TypeDefinition};

const NS: &str = "urn:xbelkit:test";

fn element(i: usize) -> ElementDecl {
    ElementDecl::new(QName::new(NS, format!("e{i}")))
}

#[test]
fn test_concurrent_readers_see_the_same_snapshot() {
    let registry = SchemaRegistry::new();
    for i in 0..64 {
        registry.add_element(element(i));
        registry.add_type(TypeDefinition::simple(QName::new(NS, format!("t{i}"))));
    }

    let snapshots: Vec<Vec<String>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    for i in 0..64 {
                        assert!(registry.get_element(&element(i).name).is_some());
                    }
                    let mut names: Vec<String> = registry
                        .list_elements()
                        .iter()
                        .map(|e| e.name.to_string())
                        .collect();
                    names.sort();
                    names
                })
            })
            .collect();
        handles
            .into_iter()
            .filter_map(|handle| handle.join().ok())
            .collect()
    });

    assert_eq!(snapshots.len(), 8);
    assert!(snapshots.windows(2).all(|pair| pair.first() == pair.last()));
    assert_eq!(snapshots.first().map(Vec::len), Some(64));
}

#[test]
fn test_writers_and_readers_interleave() {
    let registry = Arc::new(SchemaRegistry::new());
    let total = 500;

    thread::scope(|scope| {
        let writer = Arc::clone(&registry);
        scope.spawn(move || {
            for i in 0..total {
                writer.add_element(element(i));
            }
        });

        for _ in 0..4 {
            let reader = Arc::clone(&registry);
            scope.spawn(move || {
                let mut last_seen = 0;
                loop {
                    let listed = reader.list_elements();
                    // additions only ever grow a snapshot
                    assert!(listed.len() >= last_seen);
                    last_seen = listed.len();
                    for component in &listed {
                        assert!(reader.get_element(&component.name).is_some());
                    }
                    if last_seen == total {
                        break;
                    }
                    thread::yield_now();
                }
            });
        }
    });

    assert_eq!(registry.list_elements().len(), total);
}

#[test]
fn test_concurrent_anonymous_types_get_distinct_keys() {
    let registry = SchemaRegistry::new();

    let keys: Vec<QName> = thread::scope(|scope| {
        let handles: Vec<_> = (0..6)
            .map(|_| {
                scope.spawn(|| {
                    registry.add_anonymous_type(TypeDefinition::complex(QName::new(NS, "Foo")))
                })
            })
            .collect();
        handles
            .into_iter()
            .filter_map(|handle| handle.join().ok())
            .collect()
    });

    let unique: HashSet<&QName> = keys.iter().collect();
    assert_eq!(unique.len(), 6);
    assert_eq!(registry.list_anonymous_types().len(), 6);

    let mut expected = QName::new(NS, "Foo");
    for _ in 0..6 {
        assert!(unique.contains(&expected), "missing key {expected}");
        expected = expected.with_local_prefix("merged_");
    }
}

#[test]
fn test_element_and_type_share_a_name() {
    let registry = SchemaRegistry::new();
    let name = QName::new(NS, "Foo");
    registry.add_element(ElementDecl::new(name.clone()));
    registry.add_type(TypeDefinition::complex(name.clone()));

    assert_eq!(registry.get_element(&name).map(|e| e.name.clone()), Some(name.clone()));
    assert!(registry.get_type(&name).is_some_and(|t| t.is_complex()));
}
