//! Property-based tests for the XBEL codec
//!
//! These tests use proptest to verify:
//! 1. Roundtrip property: write(tree) -> read == tree, through events and through XML text
//! 2. The `folded` attribute: only "no" expands a folder, and the writer only emits yes/no
//! 3. Arbitrary input never panics the tokenizer or reader

use proptest::prelude::*;
use xbelkit::{
    from_xbel_bytes, from_xbel_str, to_xbel_string, BookmarkTree, Event, EventBuffer, NodeId,
    Reader, Writer,
};

/// Shape of a generated node before it is placed in an arena
#[derive(Clone, Debug)]
enum Shape {
    Folder {
        title: String,
        expanded: bool,
        children: Vec<Shape>,
    },
    Bookmark {
        title: String,
        url: String,
    },
    Separator,
}

/// Strategy for titles, including markup characters and surrounding whitespace
fn arb_title() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 &<>\"'_.-]{0,16}"
}

fn arb_url() -> impl Strategy<Value = String> {
    "(https?://[a-z]{1,8}\\.[a-z]{2,3}(/[a-z0-9?=&]{0,8})?)?"
}

fn arb_shape() -> impl Strategy<Value = Shape> {
    let leaf = prop_oneof![
        (arb_title(), arb_url()).prop_map(|(title, url)| Shape::Bookmark { title, url }),
        Just(Shape::Separator),
        (arb_title(), any::<bool>()).prop_map(|(title, expanded)| Shape::Folder {
            title,
            expanded,
            children: Vec::new(),
        }),
    ];
    leaf.prop_recursive(5, 48, 6, |inner| {
        (arb_title(), any::<bool>(), prop::collection::vec(inner, 0..6)).prop_map(
            |(title, expanded, children)| Shape::Folder {
                title,
                expanded,
                children,
            },
        )
    })
}

fn arb_tree() -> impl Strategy<Value = BookmarkTree> {
    prop::collection::vec(arb_shape(), 0..6).prop_map(|shapes| {
        let mut tree = BookmarkTree::new();
        for shape in &shapes {
            place(&mut tree, None, shape);
        }
        tree
    })
}

fn place(tree: &mut BookmarkTree, parent: Option<NodeId>, shape: &Shape) {
    match shape {
        Shape::Folder {
            title,
            expanded,
            children,
        } => {
            let id = tree.add_folder(parent, title.clone(), *expanded);
            for child in children {
                place(tree, Some(id), child);
            }
        }
        Shape::Bookmark { title, url } => {
            tree.add_bookmark(parent, title.clone(), url.clone());
        }
        Shape::Separator => {
            tree.add_separator(parent);
        }
    }
}

proptest! {
    #[test]
    fn roundtrip_through_events(tree in arb_tree()) {
        let mut buffer = EventBuffer::new();
        let _ = Writer::new(&tree).write(&mut buffer);

        let mut read_back = BookmarkTree::new();
        let result = Reader::new(&mut read_back).read(&mut buffer);
        prop_assert!(result.is_ok(), "read failed: {:?}", result);
        prop_assert_eq!(read_back, tree);
    }

    #[test]
    fn roundtrip_through_xml(tree in arb_tree()) {
        let xml = to_xbel_string(&tree);
        prop_assert!(xml.is_ok());
        let xml = xml.unwrap_or_default();
        let read_back = from_xbel_str(&xml);
        prop_assert!(read_back.is_ok(), "read failed: {:?}\n{}", read_back, xml);
        prop_assert_eq!(read_back.unwrap_or_default(), tree);
    }

    #[test]
    fn folded_attribute_only_no_expands(value in "[a-zA-Z]{0,6}") {
        let xml = format!(r#"<xbel version="1.0"><folder folded="{value}"/></xbel>"#);
        let tree = from_xbel_str(&xml);
        prop_assert!(tree.is_ok());
        let tree = tree.unwrap_or_default();
        let expanded = tree.iter().next().map(|(_, _, node)| node.is_expanded());
        prop_assert_eq!(expanded, Some(value == "no"));
    }

    #[test]
    fn writer_emits_canonical_folded_values(tree in arb_tree()) {
        let mut buffer = EventBuffer::new();
        let _ = Writer::new(&tree).write(&mut buffer);
        for event in buffer.events() {
            if let Event::StartElement { name, attributes } = event {
                if name == "folder" {
                    let folded = attributes.get("folded").map(String::as_str);
                    prop_assert!(matches!(folded, Some("yes") | Some("no")));
                }
            }
        }
    }

    #[test]
    fn arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = from_xbel_bytes(&bytes);
    }

    #[test]
    fn xbel_prefixed_garbage_never_panics(tail in "[<>/a-z=\"' &;#x0-9]{0,64}") {
        let _ = from_xbel_str(&format!(r#"<xbel version="1.0">{tail}"#));
    }
}
