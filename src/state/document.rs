// Document index - parsed structural nodes keyed by source location

use crate::events::SourceLocation;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A tag as declared in the source (`@smoke`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub location: SourceLocation,
}

/// Step argument. A step carries at most one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum StepArgument {
    DocString {
        location: SourceLocation,
        content: String,
        #[serde(default)]
        content_type: Option<String>,
    },
    DataTable {
        location: SourceLocation,
        rows: Vec<Vec<String>>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureNode {
    pub location: SourceLocation,
    pub keyword: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Declared document language, informational only
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleNode {
    pub location: SourceLocation,
    pub keyword: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundNode {
    pub location: SourceLocation,
    pub keyword: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A plain scenario or one concrete outline instance.
///
/// Outline instances are keyed by their example row and carry the name with
/// placeholders already substituted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioNode {
    pub location: SourceLocation,
    pub keyword: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Enclosing `Rule`, if any
    #[serde(default)]
    pub rule: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepNode {
    pub location: SourceLocation,
    /// Locale-specific keyword, trailing space preserved (`"Given "`)
    pub keyword: String,
    pub text: String,
    #[serde(default)]
    pub argument: Option<StepArgument>,
}

/// Any structural node of a parsed document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentNode {
    Feature(FeatureNode),
    Rule(RuleNode),
    Background(BackgroundNode),
    Scenario(ScenarioNode),
    Step(StepNode),
}

impl DocumentNode {
    pub fn location(&self) -> &SourceLocation {
        match self {
            Self::Feature(n) => &n.location,
            Self::Rule(n) => &n.location,
            Self::Background(n) => &n.location,
            Self::Scenario(n) => &n.location,
            Self::Step(n) => &n.location,
        }
    }

    pub fn keyword(&self) -> &str {
        match self {
            Self::Feature(n) => &n.keyword,
            Self::Rule(n) => &n.keyword,
            Self::Background(n) => &n.keyword,
            Self::Scenario(n) => &n.keyword,
            Self::Step(n) => &n.keyword,
        }
    }
}

/// Structural nodes of every parsed document, keyed by location
#[derive(Debug, Default)]
pub struct DocumentIndex {
    nodes: HashMap<SourceLocation, DocumentNode>,
    features: HashMap<String, SourceLocation>,
    tags: HashMap<SourceLocation, Vec<Tag>>,
}

impl DocumentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a node, replacing whatever was stored at the same location.
    /// A document holds one feature, so a second feature for a uri replaces the first.
    pub fn insert(&mut self, node: DocumentNode) {
        if let DocumentNode::Feature(feature) = &node {
            let previous = self
                .features
                .insert(feature.location.uri.clone(), feature.location.clone());
            if let Some(previous) = previous.filter(|p| *p != feature.location) {
                self.nodes.remove(&previous);
            }
        }

        self.nodes.insert(node.location().clone(), node);
    }

    /// Attach an argument to an already parsed step. Returns false if no step lives there.
    pub fn attach_argument(&mut self, step: &SourceLocation, argument: StepArgument) -> bool {
        match self.nodes.get_mut(step) {
            Some(DocumentNode::Step(node)) => {
                node.argument = Some(argument);
                true
            }
            _ => false,
        }
    }

    pub fn add_tag(&mut self, owner: SourceLocation, tag: Tag) {
        self.tags.entry(owner).or_default().push(tag);
    }

    pub fn node_at(&self, location: &SourceLocation) -> Option<&DocumentNode> {
        self.nodes.get(location)
    }

    pub fn feature_for_uri(&self, uri: &str) -> Option<&FeatureNode> {
        match self.features.get(uri).and_then(|l| self.nodes.get(l)) {
            Some(DocumentNode::Feature(feature)) => Some(feature),
            _ => None,
        }
    }

    pub fn scenario_at(&self, location: &SourceLocation) -> Option<&ScenarioNode> {
        match self.nodes.get(location) {
            Some(DocumentNode::Scenario(scenario)) => Some(scenario),
            _ => None,
        }
    }

    pub fn step_at(&self, location: &SourceLocation) -> Option<&StepNode> {
        match self.nodes.get(location) {
            Some(DocumentNode::Step(step)) => Some(step),
            _ => None,
        }
    }

    /// Tags declared directly on the node at `location`
    pub fn own_tags(&self, location: &SourceLocation) -> &[Tag] {
        self.tags.get(location).map(Vec::as_slice).unwrap_or_default()
    }

    /// Effective tags of a node: enclosing feature tags, then enclosing rule
    /// tags, then its own, in declaration order with duplicates kept.
    pub fn tags_for(&self, location: &SourceLocation) -> Vec<Tag> {
        let mut tags = Vec::new();

        match self.nodes.get(location) {
            Some(DocumentNode::Scenario(scenario)) => {
                self.extend_with_feature_tags(&mut tags, location);
                if let Some(rule) = &scenario.rule {
                    tags.extend_from_slice(self.own_tags(rule));
                }
            }
            Some(DocumentNode::Rule(_)) => self.extend_with_feature_tags(&mut tags, location),
            _ => {}
        }

        tags.extend_from_slice(self.own_tags(location));
        tags
    }

    fn extend_with_feature_tags(&self, tags: &mut Vec<Tag>, location: &SourceLocation) {
        if let Some(feature) = self.features.get(&location.uri) {
            tags.extend_from_slice(self.own_tags(feature));
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(line: u32) -> SourceLocation {
        SourceLocation::new("a.feature", line)
    }

    fn tag(name: &str, line: u32) -> Tag {
        Tag {
            name: name.to_string(),
            location: loc(line),
        }
    }

    fn feature(line: u32, name: &str) -> DocumentNode {
        DocumentNode::Feature(FeatureNode {
            location: loc(line),
            keyword: "Feature".to_string(),
            name: name.to_string(),
            description: String::new(),
            language: None,
        })
    }

    fn scenario(line: u32, rule: Option<SourceLocation>) -> DocumentNode {
        DocumentNode::Scenario(ScenarioNode {
            location: loc(line),
            keyword: "Scenario".to_string(),
            name: "a scenario".to_string(),
            description: String::new(),
            rule,
        })
    }

    #[test]
    fn test_scenario_inherits_feature_tags_first() {
        let mut index = DocumentIndex::new();
        index.insert(feature(2, "f"));
        index.insert(scenario(5, None));
        index.add_tag(loc(2), tag("@feat", 1));
        index.add_tag(loc(5), tag("@own", 4));
        index.add_tag(loc(5), tag("@feat", 4));

        let names: Vec<_> = index.tags_for(&loc(5)).into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["@feat", "@own", "@feat"]);
    }

    #[test]
    fn test_rule_tags_sit_between_feature_and_scenario() {
        let mut index = DocumentIndex::new();
        index.insert(feature(2, "f"));
        index.insert(DocumentNode::Rule(RuleNode {
            location: loc(4),
            keyword: "Rule".to_string(),
            name: "r".to_string(),
            description: String::new(),
        }));
        index.insert(scenario(7, Some(loc(4))));
        index.add_tag(loc(2), tag("@f", 1));
        index.add_tag(loc(4), tag("@r", 3));
        index.add_tag(loc(7), tag("@s", 6));

        let names: Vec<_> = index.tags_for(&loc(7)).into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["@f", "@r", "@s"]);
    }

    #[test]
    fn test_feature_tags_are_its_own() {
        let mut index = DocumentIndex::new();
        index.insert(feature(2, "f"));
        index.add_tag(loc(2), tag("@f", 1));
        assert_eq!(index.tags_for(&loc(2)).len(), 1);
    }

    #[test]
    fn test_second_feature_for_uri_replaces_first() {
        let mut index = DocumentIndex::new();
        index.insert(feature(1, "old"));
        index.insert(feature(3, "new"));

        assert_eq!(index.feature_for_uri("a.feature").map(|f| f.name.as_str()), Some("new"));
        assert!(index.node_at(&loc(1)).is_none());
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_attach_argument_requires_step() {
        let mut index = DocumentIndex::new();
        let table = StepArgument::DataTable {
            location: loc(4),
            rows: vec![vec!["a".to_string()]],
        };
        assert!(!index.attach_argument(&loc(3), table.clone()));

        index.insert(DocumentNode::Step(StepNode {
            location: loc(3),
            keyword: "Given ".to_string(),
            text: "a table".to_string(),
            argument: None,
        }));
        assert!(index.attach_argument(&loc(3), table.clone()));
        assert_eq!(index.step_at(&loc(3)).and_then(|s| s.argument.clone()), Some(table));
    }
}
