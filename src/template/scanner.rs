use super::{Reference, References};
use regex::Regex;
use std::sync::LazyLock;

/// `{{ ... }}` expressions and `{% ... %}` statements, across line breaks.
static BLOCK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\{\{(.*?)\}\}|\{%(.*?)%\}").expect("template block pattern is valid")
});

/// `outputs.name`, `input.name`, `outputs['name']` and `input["name"]`.
static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\b(outputs|input)(?:\.([A-Za-z_][A-Za-z0-9_-]*)|\[\s*["']([^"']+)["']\s*\])"#,
    )
    .expect("template token pattern is valid")
});

/// Extracts every output and input reference from the template markers in `text`.
///
/// Text outside of template blocks is ignored, and markers that do not match the
/// grammar are treated as absent.
pub fn scan(text: &str) -> References {
    let mut references = References::new();
    scan_into(&mut references, text);
    references
}

/// Like [`scan`], but appends to an existing set.
pub fn scan_into(references: &mut References, text: &str) {
    if !text.contains("{{") && !text.contains("{%") {
        return;
    }

    for block in BLOCK_PATTERN.captures_iter(text) {
        let Some(body) = block.get(1).or_else(|| block.get(2)) else {
            continue;
        };
        for token in TOKEN_PATTERN.captures_iter(body.as_str()) {
            let Some(name) = token.get(2).or_else(|| token.get(3)) else {
                continue;
            };
            let name = name.as_str().trim();
            if name.is_empty() {
                continue;
            }
            let reference = match &token[1] {
                "outputs" => Reference::output(name),
                _ => Reference::input(name),
            };
            references.insert(reference);
        }
    }
}

/// Walks every string inside a structured value and scans it.
pub fn scan_value(references: &mut References, value: &serde_yaml::Value) {
    match value {
        serde_yaml::Value::String(text) => scan_into(references, text),
        serde_yaml::Value::Sequence(items) => {
            for item in items {
                scan_value(references, item);
            }
        }
        serde_yaml::Value::Mapping(map) => {
            for item in map.values() {
                scan_value(references, item);
            }
        }
        serde_yaml::Value::Tagged(tagged) => scan_value(references, &tagged.value),
        serde_yaml::Value::Null | serde_yaml::Value::Bool(_) | serde_yaml::Value::Number(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_output_and_input() {
        let refs = scan("Summarise {{ outputs.research }} about {{ input.topic }}.");
        let collected: Vec<_> = refs.iter().cloned().collect();
        assert_eq!(
            collected,
            vec![Reference::output("research"), Reference::input("topic")]
        );
    }

    #[test]
    fn test_scan_nested_attribute_keeps_cell_name() {
        let refs = scan("{{ outputs.extract.result.rows[0] }}");
        assert_eq!(refs.outputs().collect::<Vec<_>>(), vec!["extract"]);
    }

    #[test]
    fn test_scan_hyphenated_name() {
        let refs = scan("{{ outputs.my-cell }} and {{ input.search-term }}");
        assert_eq!(refs.outputs().collect::<Vec<_>>(), vec!["my-cell"]);
        assert_eq!(refs.inputs().collect::<Vec<_>>(), vec!["search-term"]);
    }

    #[test]
    fn test_scan_bracket_form() {
        let refs = scan(r#"{{ outputs['load data'] }} {{ input["region"] }}"#);
        assert!(refs.references_output("load data"));
        assert!(refs.consumes_input("region"));
    }

    #[test]
    fn test_scan_statement_blocks() {
        let refs = scan("{% if outputs.gate %}go{% endif %}");
        assert!(refs.references_output("gate"));
    }

    #[test]
    fn test_scan_ignores_text_outside_blocks() {
        let refs = scan("see outputs.a and input.b in the docs");
        assert!(refs.is_empty());
    }

    #[test]
    fn test_scan_ignores_similar_identifiers() {
        let refs = scan("{{ inputs.x }} {{ my_outputs.y }} {{ outputs. }}");
        assert!(refs.is_empty());
    }

    #[test]
    fn test_scan_deduplicates() {
        let refs = scan("{{ outputs.a }} {{ outputs.a.text }} {{ input.t }} {{ input.t }}");
        assert_eq!(refs.len(), 2);
    }

    #[test]
    fn test_scan_multiline_block() {
        let refs = scan("{{\n  outputs.a\n}}");
        assert!(refs.references_output("a"));
    }

    #[test]
    fn test_scan_value_walks_nested_strings() {
        let value: serde_yaml::Value = serde_yaml::from_str(
            "tool: sql\ninputs:\n  query: \"select * from {{ outputs.load }}\"\n  limit: 10\n  tags: ['{{ input.tag }}']\n",
        )
        .unwrap();
        let mut refs = References::new();
        scan_value(&mut refs, &value);
        assert!(refs.references_output("load"));
        assert!(refs.consumes_input("tag"));
    }
}
