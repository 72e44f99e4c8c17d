//! The entity registry: which identifiers tfgraph recognizes and how they are labelled.
//!
//! The built-in registry covers the Terraform AWS stack (provider, VPC, ALB
//! security group, ALB, Route53). It is materialized once per process and never
//! mutated. A replacement registry can be loaded from TOML:
//!
//! ```toml
//! entry = "aws_provider"
//!
//! [[entity]]
//! id = "aws_provider"
//! label = "AWS Provider"
//! fillcolor = "lightgrey"
//!
//! [info]
//! name = "Variables"
//! title = "Infrastructure Variables"
//! items = ["Environment", "AWS Region"]
//! ```

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use tfgraph_error::{Error, ErrorKind, Result};

struct BuiltinEntity {
    id: &'static str,
    label: &'static str,
    description: Option<&'static str>,
    fillcolor: Option<&'static str>,
}

const BUILTIN_ENTITIES: [BuiltinEntity; 5] = [
    BuiltinEntity {
        id: "aws_provider",
        label: "AWS Provider",
        description: None,
        fillcolor: Some("lightgrey"),
    },
    BuiltinEntity {
        id: "module.vpc",
        label: "VPC",
        description: Some("VPC with public/private subnets"),
        fillcolor: None,
    },
    BuiltinEntity {
        id: "module.alb_security_group",
        label: "ALB Security Group",
        description: Some("Security group for ALB"),
        fillcolor: None,
    },
    BuiltinEntity {
        id: "module.alb",
        label: "ALB",
        description: Some("Application Load Balancer"),
        fillcolor: None,
    },
    BuiltinEntity {
        id: "aws_route53",
        label: "Route53",
        description: Some("DNS configuration"),
        fillcolor: None,
    },
];

const BUILTIN_INFO_NAME: &str = "Variables";
const BUILTIN_INFO_TITLE: &str = "Infrastructure Variables";
const BUILTIN_INFO_ITEMS: [&str; 6] = [
    "Environment",
    "AWS Region",
    "VPC CIDR",
    "Subnet CIDRs",
    "Domain Name",
    "Certificate ARN",
];

static BUILTIN: LazyLock<Registry> = LazyLock::new(Registry::from_builtin_table);

/// A recognized entity: an identifier searched for in the input and the label
/// it is shown under in the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Entity {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fillcolor: Option<String>,
}

/// The note-shaped node listing the configuration inputs of the stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InfoNode {
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub items: Vec<String>,
}

impl InfoNode {
    /// Multi-line label: the title, then one `- item` line per item.
    pub fn label(&self) -> String {
        let mut label = self.title.clone();
        for item in &self.items {
            label.push_str("\n- ");
            label.push_str(item);
        }
        label
    }
}

impl Default for InfoNode {
    fn default() -> Self {
        Self {
            name: BUILTIN_INFO_NAME.to_string(),
            title: BUILTIN_INFO_TITLE.to_string(),
            items: BUILTIN_INFO_ITEMS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// On-disk shape of a registry file.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegistryFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    entry: Option<String>,
    #[serde(rename = "entity", default)]
    entities: Vec<Entity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    info: Option<InfoNode>,
}

/// Immutable table of known entities.
///
/// Invariants, checked when a registry is built from a file: at least one
/// entity, non-empty ids and labels, unique ids, and an entry entity that is
/// one of the declared ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    entities: Vec<Entity>,
    entry: usize,
    info: InfoNode,
}

impl Registry {
    /// The built-in Terraform AWS registry.
    pub fn builtin() -> &'static Registry {
        &BUILTIN
    }

    fn from_builtin_table() -> Self {
        let entities = BUILTIN_ENTITIES
            .iter()
            .map(|e| Entity {
                id: e.id.to_string(),
                label: e.label.to_string(),
                description: e.description.map(str::to_string),
                fillcolor: e.fillcolor.map(str::to_string),
            })
            .collect();
        Self {
            entities,
            entry: 0,
            info: InfoNode::default(),
        }
    }

    /// Build a registry from parts, validating the invariants.
    ///
    /// `entry` defaults to the first entity and `info` to the built-in info node.
    pub fn new(entities: Vec<Entity>, entry: Option<&str>, info: Option<InfoNode>) -> Result<Self> {
        if entities.is_empty() {
            return Err(Error::config_invalid("registry declares no entities")
                .with_operation("registry::validate"));
        }

        let mut seen = HashSet::with_capacity(entities.len());
        for entity in &entities {
            if entity.id.is_empty() {
                return Err(Error::config_invalid("entity id must not be empty")
                    .with_operation("registry::validate")
                    .with_context("label", entity.label.clone()));
            }
            if entity.label.is_empty() {
                return Err(Error::config_invalid("entity label must not be empty")
                    .with_operation("registry::validate")
                    .with_context("id", entity.id.clone()));
            }
            if !seen.insert(entity.id.as_str()) {
                return Err(Error::config_invalid("duplicate entity id")
                    .with_operation("registry::validate")
                    .with_context("id", entity.id.clone()));
            }
        }

        let entry = match entry {
            None => 0,
            Some(id) => entities.iter().position(|e| e.id == id).ok_or_else(|| {
                Error::config_invalid("entry does not name a declared entity")
                    .with_operation("registry::validate")
                    .with_context("entry", id)
            })?,
        };

        Ok(Self {
            entities,
            entry,
            info: info.unwrap_or_default(),
        })
    }

    /// Parse a registry from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: RegistryFile = toml::from_str(text).map_err(|err| {
            Error::new(ErrorKind::DeserializationFailed, err.message().to_string())
                .with_operation("registry::from_toml_str")
                .set_source(err)
        })?;
        Self::new(file.entities, file.entry.as_deref(), file.info)
    }

    /// Read and parse a registry file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let path_display = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|err| {
            Error::from(err)
                .with_operation("registry::load")
                .with_context("path", path_display.clone())
        })?;
        let registry = Self::from_toml_str(&text).map_err(|err| {
            err.with_operation("registry::load")
                .with_context("path", path_display.clone())
        })?;
        debug!(path = %path_display, entities = registry.len(), "registry loaded");
        Ok(registry)
    }

    /// Serialize to the TOML format accepted by [`Registry::from_toml_str`].
    pub fn to_toml_string(&self) -> Result<String> {
        let file = RegistryFile {
            entry: Some(self.entry().id.clone()),
            entities: self.entities.clone(),
            info: Some(self.info.clone()),
        };
        toml::to_string(&file).map_err(|err| {
            Error::new(ErrorKind::SerializationFailed, err.to_string())
                .with_operation("registry::to_toml_string")
                .set_source(err)
        })
    }

    /// Entities in declaration order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// The root entity the info node points at.
    pub fn entry(&self) -> &Entity {
        &self.entities[self.entry]
    }

    pub fn info(&self) -> &InfoNode {
        &self.info
    }

    pub fn label_of(&self, id: &str) -> Option<&str> {
        self.entities
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Always false for a constructed registry; kept alongside `len`.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
