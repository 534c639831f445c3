use std::collections::HashMap;

use serde_json::json;
use tessera::xslt::{ClassInstance, Configuration};
use tessera::{AvtRequest, CliError, SortRequest, render_avt, sort_words};

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

#[test]
fn test_avt_over_json_data() {
    let request = AvtRequest {
        template: "{order/@id}: {order/item/name} ({count(order/item)} items)".to_string(),
        line: 1,
        data: Some((
            "order".to_string(),
            json!({
                "@id": "A-17",
                "item": [{"name": "Pen"}, {"name": "Ink"}]
            }),
        )),
        ..AvtRequest::default()
    };
    let output = render_avt(&request).unwrap();
    assert_eq!(output.value, "A-17: Pen Ink (2 items)");

    let first_only = AvtRequest {
        backwards_compatible: true,
        ..request
    };
    assert_eq!(render_avt(&first_only).unwrap().value, "A-17: Pen (2 items)");
}

#[test]
fn test_avt_syntax_error_code() {
    let request = AvtRequest {
        template: "a}b".to_string(),
        line: 12,
        ..AvtRequest::default()
    };
    match render_avt(&request) {
        Err(CliError::Xslt(e)) => assert_eq!(e.code(), Some("XT0360")),
        other => panic!("expected XT0360, got {other:?}"),
    }
}

#[test]
fn test_sort_with_properties() {
    let config = Configuration::default();
    let request = SortRequest {
        properties: HashMap::from([("strength".to_string(), "primary".to_string())]),
        words: words(&["banana", "Apple", "cherry", "apple"]),
        ..SortRequest::default()
    };
    assert_eq!(
        sort_words(&config, &request).unwrap(),
        words(&["Apple", "apple", "banana", "cherry"])
    );
}

#[test]
fn test_sort_with_collation_uri() {
    let config = Configuration::default();
    let request = SortRequest {
        collation_uri: Some(
            "http://www.w3.org/2013/collation/UCA?alphanumeric=yes;case-order=upper-first"
                .to_string(),
        ),
        words: words(&["page10", "page9", "Page9"]),
        ..SortRequest::default()
    };
    assert_eq!(
        sort_words(&config, &request).unwrap(),
        words(&["Page9", "page9", "page10"])
    );

    let codepoint = SortRequest {
        collation_uri: Some(
            "http://www.w3.org/2005/xpath-functions/collation/codepoint".to_string(),
        ),
        words: words(&["b", "B", "a"]),
        ..SortRequest::default()
    };
    assert_eq!(sort_words(&config, &codepoint).unwrap(), words(&["B", "a", "b"]));
}

#[test]
fn test_sort_with_registered_class() {
    let mut config = Configuration::default();
    config.register_class("by-length", || {
        ClassInstance::Comparator(std::sync::Arc::new(|a: &str, b: &str| a.len().cmp(&b.len())))
    });
    let request = SortRequest {
        properties: HashMap::from([("class".to_string(), "by-length".to_string())]),
        words: words(&["ccc", "a", "bb"]),
        ..SortRequest::default()
    };
    assert_eq!(sort_words(&config, &request).unwrap(), words(&["a", "bb", "ccc"]));
}

#[test]
fn test_sort_rejects_bad_strength() {
    let request = SortRequest {
        properties: HashMap::from([("strength".to_string(), "loud".to_string())]),
        words: words(&["a"]),
        ..SortRequest::default()
    };
    assert!(matches!(
        sort_words(&Configuration::default(), &request),
        Err(CliError::Collation(_))
    ));
}
