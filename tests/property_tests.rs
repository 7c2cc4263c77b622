//! Property-based tests for core domain types and the checksummer.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use proptest::prelude::*;

use stonework::core::collection::{Identifiable, IdentifiableCollection};
use stonework::core::config::Configuration;
use stonework::core::document::Document;
use stonework::core::pattern::Pattern;
use stonework::core::types::Identifier;
use stonework::engine::Checksummer;

/// Strategy for a single identifier path segment.
fn path_segment() -> impl Strategy<Value = String> {
    "[a-z0-9_-]{1,12}"
}

/// Strategy for generating valid identifiers.
fn valid_identifier() -> impl Strategy<Value = String> {
    prop::collection::vec(path_segment(), 1..4).prop_map(|segments| {
        let mut s = String::new();
        for segment in segments {
            s.push('/');
            s.push_str(&segment);
        }
        s
    })
}

/// Strategy for a flat attribute map.
///
/// Keys are unique: the value is a map, and key-order-independence is only
/// meaningful when each key appears once (the underlying store is
/// last-write-wins, so duplicate keys make insertion order significant).
fn attribute_map() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::btree_map("[a-z]{1,8}", "[ -~]{0,16}", 0..5)
        .prop_map(|m| m.into_iter().collect())
}

fn document_with(identifier: &str, content: &str, attrs: &[(String, String)]) -> Document {
    let mut doc = Document::item(identifier, content).unwrap();
    for (k, v) in attrs {
        doc = doc.with_attribute(k.clone(), v.clone());
    }
    doc
}

proptest! {
    /// Any valid identifier round-trips through serde.
    #[test]
    fn identifier_serde_roundtrip(raw in valid_identifier()) {
        let identifier = Identifier::new(&raw).unwrap();
        let json = serde_json::to_string(&identifier).unwrap();
        let parsed: Identifier = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(identifier, parsed);
    }

    /// Identifier ordering agrees with string ordering.
    #[test]
    fn identifier_order_matches_string_order(a in valid_identifier(), b in valid_identifier()) {
        let ia = Identifier::new(&a).unwrap();
        let ib = Identifier::new(&b).unwrap();
        prop_assert_eq!(ia.cmp(&ib), a.cmp(&b));
    }

    /// Checksums are deterministic: equal inputs yield equal outputs.
    #[test]
    fn document_checksum_deterministic(
        id in valid_identifier(),
        content in "[ -~]{0,64}",
        attrs in attribute_map(),
    ) {
        let a = document_with(&id, &content, &attrs);
        let b = document_with(&id, &content, &attrs);
        prop_assert_eq!(
            Checksummer::calc_document(&a).unwrap(),
            Checksummer::calc_document(&b).unwrap()
        );
    }

    /// Distinct content yields distinct checksums.
    #[test]
    fn document_checksum_separates_content(
        id in valid_identifier(),
        content_a in "[ -~]{0,64}",
        content_b in "[ -~]{0,64}",
    ) {
        prop_assume!(content_a != content_b);
        let a = document_with(&id, &content_a, &[]);
        let b = document_with(&id, &content_b, &[]);
        prop_assert_ne!(
            Checksummer::calc_document(&a).unwrap(),
            Checksummer::calc_document(&b).unwrap()
        );
    }

    /// Configuration checksums are deterministic and key-order independent.
    #[test]
    fn config_checksum_deterministic(attrs in attribute_map()) {
        let mut forward = Configuration::default();
        for (k, v) in &attrs {
            forward = forward.with_attribute(k.clone(), v.clone());
        }
        let mut reverse = Configuration::default();
        for (k, v) in attrs.iter().rev() {
            reverse = reverse.with_attribute(k.clone(), v.clone());
        }
        prop_assert_eq!(
            Checksummer::calc_config(&forward).unwrap(),
            Checksummer::calc_config(&reverse).unwrap()
        );
    }

    /// A glob built from a literal identifier matches exactly that identifier.
    #[test]
    fn literal_glob_matches_itself(raw in valid_identifier(), other in valid_identifier()) {
        let pattern = Pattern::from_glob(&raw).unwrap();
        let identifier = Identifier::new(&raw).unwrap();
        prop_assert!(pattern.matches(&identifier));

        if other != raw {
            let different = Identifier::new(&other).unwrap();
            prop_assert!(!pattern.matches(&different));
        }
    }

    /// A single `*` never matches across a path separator.
    #[test]
    fn single_star_stays_in_segment(a in path_segment(), b in path_segment()) {
        let pattern = Pattern::from_glob("/*").unwrap();
        let flat = Identifier::new(format!("/{a}")).unwrap();
        let nested = Identifier::new(format!("/{a}/{b}")).unwrap();
        prop_assert!(pattern.matches(&flat));
        prop_assert!(!pattern.matches(&nested));
    }

    /// reject preserves relative order and returns the same collection type.
    #[test]
    fn reject_preserves_order(raws in prop::collection::btree_set(valid_identifier(), 1..8)) {
        let documents: Vec<Document> = raws
            .iter()
            .map(|raw| Document::item(raw.as_str(), "").unwrap())
            .collect();
        let expected: Vec<String> = documents
            .iter()
            .filter(|d| !d.identifier().as_str().contains('a'))
            .map(|d| d.identifier().to_string())
            .collect();

        let collection = IdentifiableCollection::new(documents).unwrap();
        let kept: IdentifiableCollection<Document> =
            collection.reject(|d| d.identifier().as_str().contains('a'));

        let actual: Vec<String> = kept.iter().map(|d| d.identifier().to_string()).collect();
        prop_assert_eq!(actual, expected);
    }
}
