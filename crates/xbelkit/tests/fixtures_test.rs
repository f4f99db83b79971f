use std::fs;
use xbelkit::{from_xbel_str, to_xbel_string};

#[test]
fn test_valid_fixtures() -> Result<(), Box<dyn std::error::Error>> {
    let valid_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/valid");
    for entry in fs::read_dir(valid_dir)? {
        let path = entry?.path();
        let content = fs::read_to_string(&path)?;
        let tree = from_xbel_str(&content).map_err(|e| {
            std::io::Error::other(format!("Failed to parse valid file {path:?}: {e}"))
        })?;

        // canonical output must read back to the same tree
        let rewritten = to_xbel_string(&tree)?;
        if from_xbel_str(&rewritten)? != tree {
            return Err(std::io::Error::other(format!("Round trip changed {path:?}")).into());
        }
    }
    Ok(())
}

#[test]
fn test_invalid_fixtures() -> Result<(), Box<dyn std::error::Error>> {
    let invalid_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/invalid");
    for entry in fs::read_dir(invalid_dir)? {
        let path = entry?.path();
        let content = fs::read_to_string(&path)?;
        if from_xbel_str(&content).is_ok() {
            return Err(std::io::Error::other(format!(
                "Should fail to parse invalid file: {path:?}"
            ))
            .into());
        }
    }
    Ok(())
}

#[test]
fn test_browser_export_contents() -> Result<(), Box<dyn std::error::Error>> {
    let path = concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/valid/firefox_export.xbel"
    );
    let tree = from_xbel_str(&fs::read_to_string(path)?)?;

    let outline: Vec<(usize, String)> = tree
        .iter()
        .map(|(depth, _, node)| (depth, node.title.clone()))
        .collect();
    assert_eq!(
        outline,
        vec![
            (0, "Development".to_string()),
            (1, "Rust Programming Language".to_string()),
            (1, String::new()),
            (1, "Crates & Docs".to_string()),
            (2, "Docs.rs".to_string()),
            (0, "Unknown title".to_string()),
        ]
    );

    let urls: Vec<&str> = tree.iter().filter_map(|(_, _, node)| node.url()).collect();
    assert_eq!(
        urls,
        ["https://www.rust-lang.org/", "https://docs.rs/?q=a&b", "https://example.com/"]
    );
    Ok(())
}
