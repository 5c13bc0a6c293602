use crate::feed::item::{FeedItem, AUTHOR_NOT_AVAILABLE};
use serde_json::Value;
use thiserror::Error;

/// Structural failures that reject a whole payload.
///
/// Problems inside a single record never surface here; the record is skipped
/// and parsing continues with the rest of the array.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Body was empty or whitespace only ("no data", not a malformed payload)
    #[error("Response body is empty")]
    EmptyInput,
    /// Body is not JSON at all
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    /// One of the two required containers is absent or has the wrong type
    #[error("Missing field: {0}")]
    MissingField(&'static str),
}

/// Parses a content API search response into feed items.
///
/// Expects `{"response": {"results": [...]}}`. Records missing any of
/// `sectionName`, `webPublicationDate`, `webTitle` or `webUrl` (or carrying
/// them with a non-string type) are skipped and logged. Output order follows
/// the `results` array.
pub fn parse(raw: &str) -> Result<Vec<FeedItem>, ParseError> {
    if raw.trim().is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let root: Value = serde_json::from_str(raw)?;

    let response = root
        .get("response")
        .filter(|v| v.is_object())
        .ok_or(ParseError::MissingField("response"))?;

    let results = response
        .get("results")
        .and_then(Value::as_array)
        .ok_or(ParseError::MissingField("response.results"))?;

    let items: Vec<FeedItem> = results
        .iter()
        .enumerate()
        .filter_map(|(index, record)| parse_record(index, record))
        .collect();

    let skipped = results.len() - items.len();
    if skipped > 0 {
        tracing::warn!(
            total = results.len(),
            skipped = skipped,
            "Records with missing fields skipped"
        );
    }
    tracing::debug!(items = items.len(), "Parsed feed payload");

    Ok(items)
}

fn parse_record(index: usize, record: &Value) -> Option<FeedItem> {
    let section = required_str(index, record, "sectionName")?;
    let publication_timestamp = required_str(index, record, "webPublicationDate")?;
    let title = required_str(index, record, "webTitle")?;
    let url = required_str(index, record, "webUrl")?;

    Some(FeedItem {
        title,
        section,
        author_name: extract_author(record),
        publication_timestamp,
        url,
    })
}

fn required_str(index: usize, record: &Value, field: &'static str) -> Option<String> {
    match record.get(field).and_then(Value::as_str) {
        Some(value) => Some(value.to_owned()),
        None => {
            tracing::warn!(index, field, "Skipping record with missing or non-string field");
            None
        }
    }
}

/// First contributor tag's `webTitle`, or the placeholder.
///
/// A missing `tags` array, an empty one, and a malformed first element all
/// fall back the same way.
fn extract_author(record: &Value) -> String {
    record
        .get("tags")
        .and_then(Value::as_array)
        .and_then(|tags| tags.first())
        .and_then(|tag| tag.get("webTitle"))
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_else(|| AUTHOR_NOT_AVAILABLE.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    fn record(n: usize) -> Value {
        json!({
            "sectionName": "Technology",
            "webPublicationDate": format!("2019-01-{:02}T10:30:00Z", n % 28 + 1),
            "webTitle": format!("Story {}", n),
            "webUrl": format!("https://www.theguardian.com/technology/{}", n),
            "tags": [{ "webTitle": format!("Author {}", n), "type": "contributor" }]
        })
    }

    fn payload(results: Vec<Value>) -> String {
        json!({ "response": { "status": "ok", "results": results } }).to_string()
    }

    #[test]
    fn test_parses_all_fields() {
        let items = parse(&payload(vec![record(1)])).unwrap();
        assert_eq!(
            items,
            vec![FeedItem {
                title: "Story 1".into(),
                section: "Technology".into(),
                author_name: "Author 1".into(),
                publication_timestamp: "2019-01-02T10:30:00Z".into(),
                url: "https://www.theguardian.com/technology/1".into(),
            }]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(parse(""), Err(ParseError::EmptyInput)));
        assert!(matches!(parse("   "), Err(ParseError::EmptyInput)));
        assert!(matches!(parse("\n\t "), Err(ParseError::EmptyInput)));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(parse("{not json"), Err(ParseError::InvalidJson(_))));
    }

    #[test]
    fn test_missing_response() {
        match parse(r#"{"other": {}}"#) {
            Err(ParseError::MissingField(path)) => assert_eq!(path, "response"),
            other => panic!("Expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_response_wrong_type() {
        assert!(matches!(
            parse(r#"{"response": []}"#),
            Err(ParseError::MissingField("response"))
        ));
    }

    #[test]
    fn test_missing_results() {
        match parse(r#"{"response": {"status": "ok"}}"#) {
            Err(ParseError::MissingField(path)) => assert_eq!(path, "response.results"),
            other => panic!("Expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_top_level_array_is_missing_response() {
        assert!(matches!(
            parse("[1, 2, 3]"),
            Err(ParseError::MissingField("response"))
        ));
    }

    #[test]
    fn test_empty_results_is_ok() {
        let items = parse(&payload(vec![])).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_record_missing_title_is_skipped() {
        let mut broken = record(1);
        broken.as_object_mut().unwrap().remove("webTitle");

        let items = parse(&payload(vec![record(0), broken, record(2)])).unwrap();
        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Story 0", "Story 2"]);
    }

    #[test]
    fn test_record_with_wrong_field_type_is_skipped() {
        let mut broken = record(1);
        broken["webUrl"] = json!(42);

        let items = parse(&payload(vec![broken, record(2)])).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Story 2");
    }

    #[test]
    fn test_non_object_record_is_skipped() {
        let items = parse(&payload(vec![json!("junk"), record(3)])).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Story 3");
    }

    #[test]
    fn test_empty_tags_falls_back() {
        let mut r = record(1);
        r["tags"] = json!([]);

        let items = parse(&payload(vec![r])).unwrap();
        assert_eq!(items[0].author_name, AUTHOR_NOT_AVAILABLE);
    }

    #[test]
    fn test_missing_tags_falls_back() {
        let mut r = record(1);
        r.as_object_mut().unwrap().remove("tags");

        let items = parse(&payload(vec![r])).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].author_name, "Not Available!");
    }

    #[test]
    fn test_malformed_first_tag_falls_back() {
        let mut null_tag = record(1);
        null_tag["tags"] = json!([null, { "webTitle": "Second" }]);
        let mut untitled_tag = record(2);
        untitled_tag["tags"] = json!([{ "id": "profile/someone" }]);
        let mut numeric_title = record(3);
        numeric_title["tags"] = json!([{ "webTitle": 7 }]);

        let items = parse(&payload(vec![null_tag, untitled_tag, numeric_title])).unwrap();
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|i| i.author_name == AUTHOR_NOT_AVAILABLE));
    }

    #[test]
    fn test_empty_string_fields_are_kept() {
        let mut r = record(1);
        r["webTitle"] = json!("");

        let items = parse(&payload(vec![r])).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "");
    }

    proptest! {
        #[test]
        fn prop_well_formed_records_preserve_count_and_order(n in 0usize..40) {
            let items = parse(&payload((0..n).map(record).collect())).unwrap();
            prop_assert_eq!(items.len(), n);
            for (i, item) in items.iter().enumerate() {
                prop_assert_eq!(&item.title, &format!("Story {}", i));
            }
        }

        #[test]
        fn prop_missing_title_omits_exactly_that_record(n in 1usize..40, k_seed in any::<usize>()) {
            let k = k_seed % n;
            let mut results: Vec<Value> = (0..n).map(record).collect();
            results[k].as_object_mut().unwrap().remove("webTitle");

            let items = parse(&payload(results)).unwrap();
            prop_assert_eq!(items.len(), n - 1);
            let expected: Vec<String> = (0..n).filter(|&i| i != k).map(|i| format!("Story {}", i)).collect();
            let actual: Vec<String> = items.into_iter().map(|i| i.title).collect();
            prop_assert_eq!(actual, expected);
        }
    }
}
