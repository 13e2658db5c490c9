//! Formatting of backend results and the most-recent-first response area.

use crate::api::VectorHit;
use crate::error::ClientError;
use serde_json::Value;

/// Accumulated output shown in the response panel. Newest entry first.
#[derive(Debug, Default, Clone)]
pub struct ResponseArea {
    text: String,
    entries: usize,
}

impl ResponseArea {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `text` above everything rendered so far, followed by a blank line.
    pub fn prepend(&mut self, text: &str) {
        let mut entry = String::with_capacity(text.len() + 2 + self.text.len());
        entry.push_str(text);
        entry.push_str("\n\n");
        entry.push_str(&self.text);
        self.text = entry;
        self.entries += 1;
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.entries = 0;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of entries inserted since the last clear.
    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }
}

/// Two labeled lines per hit, each block followed by a blank line.
pub fn format_vector_hits(hits: &[VectorHit]) -> String {
    let mut out = String::new();
    for hit in hits {
        out.push_str("metadata_source: ");
        out.push_str(&hit.metadata_source);
        out.push_str("\npage_content: ");
        out.push_str(&hit.page_content);
        out.push_str("\n\n");
    }
    out
}

/// Render a search response. Vector mode expects a list of hits; every other mode is
/// shown as indented JSON.
pub fn format_search_results(mode: &str, data: Value) -> Result<String, ClientError> {
    if mode == "vector" {
        let hits: Vec<VectorHit> = serde_json::from_value(data)?;
        Ok(format_vector_hits(&hits))
    } else {
        Ok(serde_json::to_string_pretty(&data)?)
    }
}

/// Render the payload of a completed dialog query.
pub fn format_completion(payload: Option<&Value>) -> String {
    match payload {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prepend_is_most_recent_first() {
        let mut area = ResponseArea::new();
        area.prepend("first");
        area.prepend("second");
        assert_eq!(area.text(), "second\n\nfirst\n\n");
        assert_eq!(area.len(), 2);
    }

    #[test]
    fn test_vector_block_above_prior_content() {
        let mut area = ResponseArea::new();
        area.prepend("older");
        let data = json!([{ "metadata_source": "a.txt", "page_content": "hello" }]);
        let text = format_search_results("vector", data).unwrap();
        assert_eq!(text, "metadata_source: a.txt\npage_content: hello\n\n");
        area.prepend(&text);
        assert!(area
            .text()
            .starts_with("metadata_source: a.txt\npage_content: hello\n\n"));
        assert!(area.text().ends_with("older\n\n"));
    }

    #[test]
    fn test_vector_hits_keep_order() {
        let hits = vec![
            VectorHit {
                metadata_source: "1".into(),
                page_content: "x".into(),
            },
            VectorHit {
                metadata_source: "2".into(),
                page_content: "y".into(),
            },
        ];
        let text = format_vector_hits(&hits);
        assert!(text.find("metadata_source: 1").unwrap() < text.find("metadata_source: 2").unwrap());
    }

    #[test]
    fn test_vector_mode_rejects_non_list() {
        let err = format_search_results("vector", json!({"nodes": []})).unwrap_err();
        assert!(matches!(err, ClientError::Parse(_)));
    }

    #[test]
    fn test_graph_mode_pretty_prints() {
        let text = format_search_results("graph", json!({"nodes": [1]})).unwrap();
        assert_eq!(text, "{\n  \"nodes\": [\n    1\n  ]\n}");
    }

    #[test]
    fn test_markup_is_kept_literal() {
        assert_eq!(format_completion(Some(&json!("<b>hi</b>"))), "<b>hi</b>");
        assert_eq!(format_completion(None), "");
    }
}
