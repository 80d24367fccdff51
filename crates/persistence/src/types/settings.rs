//! Per-index settings and client-validation allow-lists.
//!
//! Both are supplied by the host, read-only to the compiler, and merged with
//! built-in defaults field by field through `#[serde(default)]`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{
    DEFAULT_HIGHLIGHT_POST_TAG, DEFAULT_HIGHLIGHT_PRE_TAG, DEFAULT_LANGUAGE, MAX_HITS_PER_PAGE,
    MAX_HITS_TOTAL, MAX_PAGES,
};
use crate::error::ConfigError;

/// How facet values are ordered in facet counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortFacetValuesBy {
    /// Most frequent first, ties broken alphabetically.
    #[default]
    Count,
    /// Alphabetical.
    Alpha,
}

/// Index settings (the host's defaults for a given table).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IndexSettings {
    /// Attributes returned when the request does not name any. `*` = all.
    pub attributes_to_retrieve: Vec<String>,

    /// Facet declarations: `attr`, `searchable(attr)` or `filterOnly(attr)`.
    pub attributes_for_faceting: Vec<String>,

    /// Numeric attributes that get `facets_stats`.
    pub numeric_attributes_for_filtering: Vec<String>,

    /// Maximum number of values returned per facet.
    pub max_values_per_facet: u32,

    /// Facet value ordering.
    pub sort_facet_values_by: SortFacetValuesBy,

    /// Attributes highlighted when the request does not name any.
    pub attributes_to_highlight: Vec<String>,

    /// Highlight opening tag.
    pub highlight_pre_tag: String,

    /// Highlight closing tag.
    pub highlight_post_tag: String,

    /// Default page size.
    pub hits_per_page: u32,

    /// Maximum `offset + limit` for this index.
    pub pagination_limited_to: u32,

    /// Maximum number of facet hits returned by a facet-value search.
    pub max_facet_hits: u32,

    /// Text search configuration (`regconfig`) used for matching and headlines.
    pub language: String,

    /// Opaque rendering hints echoed back to the client.
    pub rendering_content: Value,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            attributes_to_retrieve: vec!["*".to_string()],
            attributes_for_faceting: Vec::new(),
            numeric_attributes_for_filtering: Vec::new(),
            max_values_per_facet: 10,
            sort_facet_values_by: SortFacetValuesBy::Count,
            attributes_to_highlight: Vec::new(),
            highlight_pre_tag: DEFAULT_HIGHLIGHT_PRE_TAG.to_string(),
            highlight_post_tag: DEFAULT_HIGHLIGHT_POST_TAG.to_string(),
            hits_per_page: 20,
            pagination_limited_to: MAX_HITS_TOTAL,
            max_facet_hits: 100,
            language: DEFAULT_LANGUAGE.to_string(),
            rendering_content: Value::Object(Default::default()),
        }
    }
}

/// The category a facet attribute is declared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetKind {
    /// Counted and filterable.
    Plain,
    /// Counted, filterable, and open to facet-value search.
    Searchable,
    /// Filterable only.
    FilterOnly,
}

/// A parsed `attributesForFaceting` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetDeclaration {
    /// Attribute (column) name.
    pub attribute: String,
    /// Declared category.
    pub kind: FacetKind,
}

impl FacetDeclaration {
    /// Parses `attr`, `searchable(attr)` or `filterOnly(attr)`.
    pub fn parse(declaration: &str) -> Option<Self> {
        let declaration = declaration.trim();
        let (kind, attribute) = if let Some(inner) = strip_modifier(declaration, "searchable") {
            (FacetKind::Searchable, inner)
        } else if let Some(inner) = strip_modifier(declaration, "filterOnly") {
            (FacetKind::FilterOnly, inner)
        } else {
            (FacetKind::Plain, declaration)
        };

        let attribute = attribute.trim();
        if attribute.is_empty() || attribute.contains(['(', ')']) {
            return None;
        }
        Some(Self {
            attribute: attribute.to_string(),
            kind,
        })
    }

    /// Whether counts may be requested for this attribute.
    pub fn is_countable(&self) -> bool {
        !matches!(self.kind, FacetKind::FilterOnly)
    }
}

fn strip_modifier<'a>(declaration: &'a str, modifier: &str) -> Option<&'a str> {
    declaration
        .strip_prefix(modifier)
        .and_then(|rest| rest.strip_prefix('('))
        .and_then(|rest| rest.strip_suffix(')'))
}

impl IndexSettings {
    /// Parses `attributesForFaceting`, rejecting duplicates across categories.
    pub fn facet_declarations(&self, index: &str) -> Result<Vec<FacetDeclaration>, ConfigError> {
        let mut declarations: Vec<FacetDeclaration> =
            Vec::with_capacity(self.attributes_for_faceting.len());

        for raw in &self.attributes_for_faceting {
            let declaration =
                FacetDeclaration::parse(raw).ok_or_else(|| ConfigError::InvalidFacetDeclaration {
                    index: index.to_string(),
                    declaration: raw.clone(),
                })?;
            if declarations
                .iter()
                .any(|d| d.attribute == declaration.attribute)
            {
                return Err(ConfigError::DuplicateFacetConfig {
                    index: index.to_string(),
                    attribute: declaration.attribute,
                });
            }
            declarations.push(declaration);
        }

        Ok(declarations)
    }

    /// Returns the declaration for `attribute`, if any.
    ///
    /// Assumes the declarations were validated at load time; unparsable
    /// entries are skipped.
    pub fn facet_declaration(&self, attribute: &str) -> Option<FacetDeclaration> {
        self.attributes_for_faceting
            .iter()
            .filter_map(|raw| FacetDeclaration::parse(raw))
            .find(|d| d.attribute == attribute)
    }

    /// Attributes facet counts may be computed for, in declaration order:
    /// countable facet declarations followed by numeric attributes not
    /// already listed.
    pub fn countable_facets(&self) -> Vec<String> {
        let mut attributes: Vec<String> = self
            .attributes_for_faceting
            .iter()
            .filter_map(|raw| FacetDeclaration::parse(raw))
            .filter(FacetDeclaration::is_countable)
            .map(|d| d.attribute)
            .collect();

        for numeric in &self.numeric_attributes_for_filtering {
            if !attributes.contains(numeric) {
                attributes.push(numeric.clone());
            }
        }
        attributes
    }

    /// Whether `attribute` gets `facets_stats`.
    pub fn is_numeric(&self, attribute: &str) -> bool {
        self.numeric_attributes_for_filtering
            .iter()
            .any(|a| a == attribute)
    }
}

/// Allow-lists restricting what a caller may request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientValidation {
    /// Attributes the caller may retrieve. `*` = all.
    pub valid_attributes_to_retrieve: Vec<String>,
    /// Attributes the caller may filter on. `*` = all.
    pub valid_facet_filters: Vec<String>,
    /// Attributes the caller may highlight. `*` = all.
    pub valid_attributes_to_highlight: Vec<String>,
    /// Accepted highlight opening tags.
    pub valid_highlight_pre_tags: Vec<String>,
    /// Accepted highlight closing tags.
    pub valid_highlight_post_tags: Vec<String>,
    /// Maximum page number.
    pub max_page: u32,
    /// Maximum hits per page.
    pub max_hits_per_page: u32,
    /// Maximum offset.
    pub max_offset: u32,
    /// Maximum length.
    pub max_length: u32,
    /// Maximum `offset + limit`.
    pub max_hits_total: u32,
}

impl Default for ClientValidation {
    fn default() -> Self {
        Self {
            valid_attributes_to_retrieve: vec!["*".to_string()],
            valid_facet_filters: vec!["*".to_string()],
            valid_attributes_to_highlight: vec!["*".to_string()],
            valid_highlight_pre_tags: vec![DEFAULT_HIGHLIGHT_PRE_TAG.to_string()],
            valid_highlight_post_tags: vec![DEFAULT_HIGHLIGHT_POST_TAG.to_string()],
            max_page: MAX_PAGES,
            max_hits_per_page: MAX_HITS_PER_PAGE,
            max_offset: MAX_HITS_TOTAL,
            max_length: MAX_HITS_PER_PAGE,
            max_hits_total: MAX_HITS_TOTAL,
        }
    }
}

/// Returns true when `list` contains the wildcard or `value`.
pub(crate) fn allows(list: &[String], value: &str) -> bool {
    list.iter().any(|v| v == "*" || v == value)
}

/// Configuration for one index (table).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexConfig {
    /// Table the configuration applies to. `None` applies to any table not
    /// configured by name.
    #[serde(default)]
    pub index_name: Option<String>,

    /// Index settings.
    #[serde(default)]
    pub settings: IndexSettings,

    /// Client allow-lists.
    #[serde(default)]
    pub client_validation: ClientValidation,
}

impl IndexConfig {
    /// Validates the configuration; run once at load time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let index = self.index_name.as_deref().unwrap_or("*");
        self.settings.facet_declarations(index)?;
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IndexConfigFile {
    Many(Vec<IndexConfig>),
    One(IndexConfig),
}

/// All index configurations known to the host.
#[derive(Debug, Clone, Default)]
pub struct IndexConfigs {
    configs: Vec<IndexConfig>,
    fallback: IndexConfig,
}

impl IndexConfigs {
    /// Creates a validated set of configurations.
    pub fn new(configs: Vec<IndexConfig>) -> Result<Self, ConfigError> {
        for config in &configs {
            config.validate()?;
        }
        Ok(Self {
            configs,
            fallback: IndexConfig::default(),
        })
    }

    /// Parses a JSON document holding one configuration or an array of them.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let parsed: IndexConfigFile =
            serde_json::from_str(json).map_err(|e| ConfigError::LoadFailed {
                path: "<inline>".to_string(),
                message: e.to_string(),
            })?;
        match parsed {
            IndexConfigFile::Many(configs) => Self::new(configs),
            IndexConfigFile::One(config) => Self::new(vec![config]),
        }
    }

    /// Reads and parses a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&json).map_err(|e| match e {
            ConfigError::LoadFailed { message, .. } => ConfigError::LoadFailed {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    /// Returns the configuration for `table`: a named match, else the first
    /// unnamed configuration, else the built-in defaults.
    pub fn resolve(&self, table: &str) -> &IndexConfig {
        self.configs
            .iter()
            .find(|c| c.index_name.as_deref() == Some(table))
            .or_else(|| self.configs.iter().find(|c| c.index_name.is_none()))
            .unwrap_or(&self.fallback)
    }

    /// Number of explicit configurations.
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    /// Returns true when no explicit configuration was supplied.
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}
