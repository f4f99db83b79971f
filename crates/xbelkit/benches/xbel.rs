use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use xbelkit::schema::{QName, SchemaRegistry, TypeDefinition};
use xbelkit::{from_xbel_str, to_xbel_string, BookmarkTree};

fn sample_tree(folders: usize, per_folder: usize) -> BookmarkTree {
    let mut tree = BookmarkTree::new();
    for f in 0..folders {
        let folder = tree.add_folder(None, format!("Folder {f}"), f % 2 == 0);
        for b in 0..per_folder {
            tree.add_bookmark(
                Some(folder),
                format!("Bookmark {b}"),
                format!("https://example.com/{f}/{b}"),
            );
        }
        tree.add_separator(Some(folder));
    }
    tree
}

fn bench_read(c: &mut Criterion) {
    let xml = to_xbel_string(&sample_tree(50, 20)).unwrap_or_default();
    c.bench_function("xbel_read_1k", |b| b.iter(|| from_xbel_str(black_box(&xml))));
}

fn bench_write(c: &mut Criterion) {
    let tree = sample_tree(50, 20);
    c.bench_function("xbel_write_1k", |b| b.iter(|| to_xbel_string(black_box(&tree))));
}

fn bench_registry_lookup(c: &mut Criterion) {
    let registry = SchemaRegistry::new();
    for i in 0..1000 {
        registry.add_type(TypeDefinition::simple(QName::local(format!("t{i}"))));
    }
    let name = QName::local("t500");
    c.bench_function("registry_get_type", |b| {
        b.iter(|| registry.get_type(black_box(&name)))
    });
}

criterion_group!(benches, bench_read, bench_write, bench_registry_lookup);
criterion_main!(benches);
