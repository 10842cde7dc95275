//! Naming tags and key resolution
//!
//! A field may carry several naming annotations. The emitted YAML key comes
//! from the first source in [`TAG_PRIORITY`] that supplies a name, falling
//! back to the lowercased declared identifier.

/// Where a naming tag came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagSource {
    /// YAML-oriented tag (`yaml: "..."`)
    Yaml,
    /// Structure-mapping tag (`mapstructure: "..."`)
    Mapstructure,
}

impl TagSource {
    /// Attribute name used for this source in schema source text
    pub fn as_str(&self) -> &'static str {
        match self {
            TagSource::Yaml => "yaml",
            TagSource::Mapstructure => "mapstructure",
        }
    }

    /// Look up a tag source by its attribute name
    pub fn from_attribute(name: &str) -> Option<Self> {
        TAG_PRIORITY.into_iter().find(|source| source.as_str() == name)
    }
}

impl std::fmt::Display for TagSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tag sources in precedence order, first match wins
pub const TAG_PRIORITY: [TagSource; 2] = [TagSource::Yaml, TagSource::Mapstructure];

/// Tag value that drops a field from the template
pub const IGNORE_SENTINEL: &str = "-";

/// A naming tag attached to a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub source: TagSource,
    pub value: String,
}

impl Tag {
    pub fn new(source: TagSource, value: impl Into<String>) -> Self {
        Self {
            source,
            value: value.into(),
        }
    }

    /// The name part of the tag value; options after the first comma are dropped
    pub fn name(&self) -> &str {
        self.value
            .split_once(',')
            .map_or(self.value.as_str(), |(name, _)| name)
            .trim()
    }
}

/// Result of resolving a field's emitted key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKey {
    /// Emit the field under this key
    Named(String),
    /// The field is dropped from output and alignment
    Ignored,
}

/// Resolve the emitted key for a field from its declared name and tags
pub fn resolve_key(declared: &str, tags: &[Tag]) -> FieldKey {
    let tagged = TAG_PRIORITY.iter().find_map(|source| {
        tags.iter()
            .filter(|tag| tag.source == *source)
            .map(Tag::name)
            .find(|name| !name.is_empty())
    });

    match tagged {
        Some(IGNORE_SENTINEL) => FieldKey::Ignored,
        Some(name) => FieldKey::Named(name.to_string()),
        None if declared.is_empty() => FieldKey::Ignored,
        None => FieldKey::Named(declared.to_lowercase()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_tag_wins_over_mapstructure() {
        let tags = vec![
            Tag::new(TagSource::Mapstructure, "mapstructure_tag"),
            Tag::new(TagSource::Yaml, "yaml_tag"),
        ];
        assert_eq!(
            resolve_key("Field", &tags),
            FieldKey::Named("yaml_tag".to_string())
        );
    }

    #[test]
    fn test_mapstructure_used_without_yaml() {
        let tags = vec![Tag::new(TagSource::Mapstructure, "map_field")];
        assert_eq!(
            resolve_key("MapField", &tags),
            FieldKey::Named("map_field".to_string())
        );
    }

    #[test]
    fn test_declared_name_fallback_is_lowercased() {
        assert_eq!(resolve_key("Host", &[]), FieldKey::Named("host".to_string()));
    }

    #[test]
    fn test_dash_ignores_field() {
        let tags = vec![Tag::new(TagSource::Yaml, "-")];
        assert_eq!(resolve_key("Hidden", &tags), FieldKey::Ignored);
    }

    #[test]
    fn test_dash_on_lower_priority_is_shadowed() {
        let tags = vec![
            Tag::new(TagSource::Yaml, "shown"),
            Tag::new(TagSource::Mapstructure, "-"),
        ];
        assert_eq!(
            resolve_key("Field", &tags),
            FieldKey::Named("shown".to_string())
        );
    }

    #[test]
    fn test_tag_options_are_stripped() {
        let tags = vec![Tag::new(TagSource::Yaml, "host,omitempty")];
        assert_eq!(resolve_key("Host", &tags), FieldKey::Named("host".to_string()));
    }

    #[test]
    fn test_empty_name_part_falls_through() {
        let tags = vec![
            Tag::new(TagSource::Yaml, ",omitempty"),
            Tag::new(TagSource::Mapstructure, "port_number"),
        ];
        assert_eq!(
            resolve_key("Port", &tags),
            FieldKey::Named("port_number".to_string())
        );
    }

    #[test]
    fn test_tag_source_from_attribute() {
        assert_eq!(TagSource::from_attribute("yaml"), Some(TagSource::Yaml));
        assert_eq!(
            TagSource::from_attribute("mapstructure"),
            Some(TagSource::Mapstructure)
        );
        assert_eq!(TagSource::from_attribute("json"), None);
    }
}
