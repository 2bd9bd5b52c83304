fn main() {
    println!("Run `cargo test -p hash-compat` to execute fingerprint compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use nodelist_discovery::StaticDiscovery;
    use nodelist_fingerprint::{Fingerprint, format_padded, murmur3_x86_32};
    use nodelist_listing::{HexStyle, OutputMode, Visibility, list_nodes, render};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct VectorFile {
        algorithm: String,
        vectors: Vec<Vector>,
    }

    /// One digest as produced by the reference MurmurHash3 implementation.
    #[derive(Debug, Deserialize)]
    struct Vector {
        input: String,
        seed: u32,
        /// Eight uppercase hex digits.
        digest: String,
        /// The same digest as a signed 32-bit primitive reports it.
        signed: i32,
    }

    #[derive(Debug, Deserialize)]
    struct ListingFixture {
        nodes: Vec<String>,
        visible: Vec<String>,
        all: Vec<String>,
    }

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Loads and deserializes a fixture JSON file.
    fn load_fixture<T: serde::de::DeserializeOwned>(name: &str) -> T {
        let path = fixtures_dir().join(name);
        let data = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()));
        serde_json::from_str(&data)
            .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", path.display()))
    }

    fn rendered(fixture: &ListingFixture, visibility: Visibility) -> Vec<String> {
        let discovery = StaticDiscovery::from_full_names(&fixture.nodes);
        let listing = list_nodes(&discovery, visibility).unwrap();
        let mut out = Vec::new();
        render(&listing, OutputMode::List, HexStyle::Compact, &mut out).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(String::from)
            .collect()
    }

    #[test]
    fn fixture_digests() {
        let file: VectorFile = load_fixture("vectors.json");
        assert_eq!(file.algorithm, "murmur3_x86_32");
        assert!(!file.vectors.is_empty());

        for v in &file.vectors {
            let digest = murmur3_x86_32(v.input.as_bytes(), v.seed);
            assert_eq!(
                format_padded(digest),
                v.digest,
                "digest mismatch for {:?} (seed {})",
                v.input,
                v.seed
            );
        }
    }

    #[test]
    fn fixture_signed_digests_reinterpret() {
        let file: VectorFile = load_fixture("vectors.json");

        for v in file.vectors.iter().filter(|v| v.seed == 0) {
            let fp = Fingerprint::from_signed(v.signed);
            assert_eq!(fp, Fingerprint::of(&v.input), "input {:?}", v.input);
            assert_eq!(fp.padded().to_string(), v.digest);
            assert!(!fp.to_string().contains('-'));
        }
    }

    #[test]
    fn fixture_contains_sign_bit_vectors() {
        let file: VectorFile = load_fixture("vectors.json");
        assert!(file.vectors.iter().any(|v| v.signed < 0));
    }

    #[test]
    fn fixture_listing_visible() {
        let fixture: ListingFixture = load_fixture("listing.json");
        assert_eq!(rendered(&fixture, Visibility::Default), fixture.visible);
    }

    #[test]
    fn fixture_listing_all() {
        let fixture: ListingFixture = load_fixture("listing.json");
        assert_eq!(rendered(&fixture, Visibility::IncludeHidden), fixture.all);
    }
}
