//! Recursive manifest tree walker

use serde_json::Value as JsonValue;
use std::fmt;

use crate::error::PlaceholderError;
use crate::resolver::Resolver;
use crate::strategy::ReplaceStrategy;

/// One step in the path from the document root to a leaf
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, ".{}", key),
            PathSegment::Index(index) => write!(f, "[{}]", index),
        }
    }
}

/// Walks a value tree and hands every string leaf to a strategy
///
/// The walk never stops on error: every leaf is visited exactly once and
/// each failure is appended to the caller's error list in encounter order.
pub struct Walker<'a> {
    strategy: &'a dyn ReplaceStrategy,
    resolver: &'a Resolver<'a>,
}

impl<'a> Walker<'a> {
    pub fn new(strategy: &'a dyn ReplaceStrategy, resolver: &'a Resolver<'a>) -> Self {
        Self { strategy, resolver }
    }

    /// Walk a whole document
    pub fn walk(&self, value: &mut JsonValue, errors: &mut Vec<PlaceholderError>) {
        self.visit(value, "", &mut Vec::new(), errors);
    }

    /// Walk the subtree stored under `field` at `location`
    pub fn walk_field(
        &self,
        value: &mut JsonValue,
        field: &str,
        mut location: Vec<PathSegment>,
        errors: &mut Vec<PlaceholderError>,
    ) {
        self.visit(value, field, &mut location, errors);
    }

    fn visit(
        &self,
        value: &mut JsonValue,
        field: &str,
        location: &mut Vec<PathSegment>,
        errors: &mut Vec<PlaceholderError>,
    ) {
        match value {
            JsonValue::Object(map) => {
                for (key, child) in map.iter_mut() {
                    location.push(PathSegment::Key(key.clone()));
                    self.visit(child, key, location, errors);
                    location.pop();
                }
            }
            JsonValue::Array(items) => {
                // Sequence elements report the field holding the sequence
                for (index, item) in items.iter_mut().enumerate() {
                    location.push(PathSegment::Index(index));
                    self.visit(item, field, location, errors);
                    location.pop();
                }
            }
            JsonValue::String(text) => {
                let replacement = self.strategy.replace(field, text, self.resolver);
                errors.extend(
                    replacement
                        .errors
                        .into_iter()
                        .map(|error| error.at(location.clone())),
                );
                *value = replacement.value;
            }
            JsonValue::Null | JsonValue::Bool(_) | JsonValue::Number(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{Annotations, JsonMap, MockValueSource};
    use crate::strategy::{GenericStrategy, SecretStrategy};
    use serde_json::json;

    fn map(value: JsonValue) -> JsonMap {
        value.as_object().cloned().unwrap()
    }

    fn walk_generic(tree: &mut JsonValue, values: &JsonMap) -> Vec<PlaceholderError> {
        let annotations = Annotations::new();
        let resolver = Resolver::new(values, None, &annotations);
        let walker = Walker::new(&GenericStrategy, &resolver);
        let mut errors = Vec::new();
        walker.walk(tree, &mut errors);
        errors
    }

    #[test]
    fn test_nested_string() {
        let mut tree = json!({
            "namespace": "<terraform:namespace>",
            "spec": {"selector": {"app": "<terraform:name>"}}
        });
        let errors = walk_generic(&mut tree, &map(json!({"namespace": "default", "name": "foo"})));

        assert!(errors.is_empty());
        assert_eq!(
            tree,
            json!({"namespace": "default", "spec": {"selector": {"app": "foo"}}})
        );
    }

    #[test]
    fn test_int_replacement() {
        let mut tree = json!({"spec": {"replicas": "<terraform:replicas>"}});
        let errors = walk_generic(&mut tree, &map(json!({"replicas": 1})));

        assert!(errors.is_empty());
        assert_eq!(tree, json!({"spec": {"replicas": 1}}));
    }

    #[test]
    fn test_sequences_keep_positions() {
        let mut tree = json!({
            "A_SEQUENCE": [1, "<terraform:two>", null, true],
            "hosts": ["mysubdomain.<terraform:host>"]
        });
        let errors = walk_generic(&mut tree, &map(json!({"two": "two", "host": "foo.com"})));

        assert!(errors.is_empty());
        assert_eq!(
            tree,
            json!({
                "A_SEQUENCE": [1, "two", null, true],
                "hosts": ["mysubdomain.foo.com"]
            })
        );
    }

    #[test]
    fn test_missing_value_is_recorded_not_thrown() {
        let mut tree = json!({
            "namespace": "<terraform:namespace>",
            "spec": {"replicas": "<terraform:replicas>"}
        });
        let errors = walk_generic(&mut tree, &map(json!({"namespace": "default"})));

        assert_eq!(
            tree,
            json!({"namespace": "default", "spec": {"replicas": "<terraform:replicas>"}})
        );
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].to_string(),
            "replaceString: missing output value for placeholder replicas in string replicas: <terraform:replicas>"
        );
        assert_eq!(
            errors[0].location,
            vec![
                PathSegment::Key("spec".to_string()),
                PathSegment::Key("replicas".to_string())
            ]
        );
    }

    #[test]
    fn test_sequence_error_reports_enclosing_field() {
        let mut tree = json!({"ports": [{"port": 80}, "<terraform:nope>"]});
        let errors = walk_generic(&mut tree, &JsonMap::new());

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "ports");
        assert_eq!(
            errors[0].location,
            vec![PathSegment::Key("ports".to_string()), PathSegment::Index(1)]
        );
    }

    #[test]
    fn test_walk_continues_after_errors() {
        let mut tree = json!({
            "a": "<terraform:data | undefinedModifier>",
            "b": "<terraform:missing>",
            "c": "<terraform:name>"
        });
        let errors = walk_generic(&mut tree, &map(json!({"data": {}, "name": "ok"})));

        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors[0].to_string(),
            "invalid modifier: undefinedModifier for placeholder data in string a: <terraform:data | undefinedModifier>"
        );
        assert_eq!(tree["a"], json!("<terraform:data | undefinedModifier>"));
        assert_eq!(tree["c"], json!("ok"));
    }

    #[test]
    fn test_json_path_modifiers() {
        let mut tree = json!({
            "username": "<terraform:data | jsonPath {.credentials.user}>",
            "password": "<terraform:data | jsonPath {.credentials.pass} | base64encode>",
            "image": "<terraform:data | jsonPath {.image} | jsonParse>"
        });
        let values = map(json!({
            "data": {
                "credentials": {"user": "app", "pass": "mypw"},
                "image": {"repository": "docker.io/dummy", "tag": "latest"}
            }
        }));
        let errors = walk_generic(&mut tree, &values);

        assert!(errors.is_empty());
        assert_eq!(
            tree,
            json!({
                "username": "app",
                "password": "bXlwdw==",
                "image": {"repository": "docker.io/dummy", "tag": "latest"}
            })
        );
    }

    #[test]
    fn test_token_free_tree_is_unchanged() {
        let original = json!({
            "kind": "Service",
            "metadata": {"name": "my-app", "labels": {"tier": "<web>"}},
            "spec": {"ports": [{"port": 3000}], "enabled": false, "note": null}
        });
        let mut tree = original.clone();
        let errors = walk_generic(&mut tree, &JsonMap::new());

        assert!(errors.is_empty());
        assert_eq!(tree, original);
    }

    #[test]
    fn test_secret_walk_with_explicit_path() {
        let source = MockValueSource::with_data(map(json!({"apikey": "123"})));
        let values = JsonMap::new();
        let annotations = Annotations::new();
        let resolver = Resolver::new(&values, Some(&source), &annotations);
        let walker = Walker::new(&SecretStrategy, &resolver);

        let mut tree = json!({"key": "<terraform:path/to/tfstate#apikey>"});
        let mut errors = Vec::new();
        walker.walk_field(
            &mut tree,
            "data",
            vec![PathSegment::Key("data".to_string())],
            &mut errors,
        );

        assert!(errors.is_empty());
        assert_eq!(tree, json!({"key": "123"}));
        assert_eq!(source.call_counts().single_fetches, 1);
    }
}
