//! Entity and relationship type names, the entity-type → relationship-type
//! rule table, and the classification of relationships into data flow,
//! glossary and containment.

use crate::View;

// Entity types
pub const PROCESS: &str = "Process";
pub const PORT_ALIAS: &str = "PortAlias";
pub const PORT_IMPLEMENTATION: &str = "PortImplementation";
pub const TABULAR_SCHEMA_TYPE: &str = "TabularSchemaType";
pub const TABULAR_COLUMN_TYPE: &str = "TabularColumnType";
pub const TABULAR_COLUMN: &str = "TabularColumn";
pub const RELATIONAL_COLUMN: &str = "RelationalColumn";
pub const RELATIONAL_TABLE: &str = "RelationalTable";
pub const DERIVED_RELATIONAL_COLUMN: &str = "DerivedRelationalColumn";
pub const DERIVED_SCHEMA_ATTRIBUTE: &str = "DerivedSchemaAttribute";
pub const SCHEMA_ATTRIBUTE: &str = "SchemaAttribute";
pub const DEPLOYED_DB_SCHEMA_TYPE: &str = "DeployedDatabaseSchema";
pub const DATA_STORE: &str = "DataStore";
pub const DATABASE: &str = "Database";
pub const DATA_FILE: &str = "DataFile";
pub const ASSET: &str = "Asset";
pub const HOST: &str = "Host";
pub const SOFTWARE_SERVER: &str = "SoftwareServer";
pub const GLOSSARY_TERM: &str = "GlossaryTerm";
pub const GLOSSARY_CATEGORY: &str = "GlossaryCategory";

// Relationship types
pub const SCHEMA_ATTRIBUTE_TYPE: &str = "SchemaAttributeType";
pub const ATTRIBUTE_FOR_SCHEMA: &str = "AttributeForSchema";
pub const ASSET_SCHEMA_TYPE: &str = "AssetSchemaType";
pub const DATA_CONTENT_FOR_DATA_SET: &str = "DataContentForDataSet";
pub const NESTED_FILE: &str = "NestedFile";
pub const SEMANTIC_ASSIGNMENT: &str = "SemanticAssignment";
pub const TERM_CATEGORIZATION: &str = "TermCategorization";
pub const PORT_DELEGATION: &str = "PortDelegation";
pub const PROCESS_PORT: &str = "ProcessPort";
pub const LINEAGE_MAPPING: &str = "LineageMapping";
pub const PORT_SCHEMA: &str = "PortSchema";

// Property names
pub const DISPLAY_NAME: &str = "displayName";
pub const QUALIFIED_NAME: &str = "qualifiedName";
/// Fallback link from a fine-grained vertex to its container when no
/// containment edge is present.
pub const CONTAINER_GUID: &str = "containerGuid";

/// Entity type → relationship type produced when the entity appears as an
/// element of a process lineage event.
pub const PROCESS_RELATIONSHIP_RULES: &[(&str, &str)] = &[
    (PORT_ALIAS, PORT_DELEGATION),
    (PORT_IMPLEMENTATION, PORT_SCHEMA),
    (TABULAR_SCHEMA_TYPE, ATTRIBUTE_FOR_SCHEMA),
    (SCHEMA_ATTRIBUTE_TYPE, SCHEMA_ATTRIBUTE_TYPE),
    (TABULAR_COLUMN_TYPE, LINEAGE_MAPPING),
];

/// Look up the relationship type produced by an entity type.
pub fn relationship_for(entity_type: &str) -> Option<&'static str> {
    PROCESS_RELATIONSHIP_RULES
        .iter()
        .find(|(entity, _)| *entity == entity_type)
        .map(|(_, relationship)| *relationship)
}

/// Relationship types that carry data flow by default.
pub const DATA_FLOW_RELATIONSHIPS: &[&str] = &[LINEAGE_MAPPING];

/// Relationship types followed by glossary queries.
pub const GLOSSARY_RELATIONSHIPS: &[&str] = &[SEMANTIC_ASSIGNMENT, TERM_CATEGORIZATION];

/// Relationship types linking a container to what it contains.
pub const CONTAINMENT_RELATIONSHIPS: &[&str] = &[
    ATTRIBUTE_FOR_SCHEMA,
    ASSET_SCHEMA_TYPE,
    SCHEMA_ATTRIBUTE_TYPE,
    NESTED_FILE,
    DATA_CONTENT_FOR_DATA_SET,
];

pub fn is_glossary(label: &str) -> bool {
    GLOSSARY_RELATIONSHIPS.contains(&label)
}

pub fn is_containment(label: &str) -> bool {
    CONTAINMENT_RELATIONSHIPS.contains(&label)
}

/// Level of detail an entity type represents.
///
/// Ordered from coarsest to finest, like [`View`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Granularity {
    Host,
    Table,
    Column,
}

impl Granularity {
    /// Granularity of an entity type, or `None` for types that are never
    /// collapsed (processes, ports, glossary terms, ...).
    pub fn of(type_name: &str) -> Option<Self> {
        match type_name {
            HOST | SOFTWARE_SERVER | DATABASE | DATA_STORE | DEPLOYED_DB_SCHEMA_TYPE => {
                Some(Self::Host)
            }
            RELATIONAL_TABLE | TABULAR_SCHEMA_TYPE | DATA_FILE | ASSET => Some(Self::Table),
            RELATIONAL_COLUMN
            | TABULAR_COLUMN
            | TABULAR_COLUMN_TYPE
            | SCHEMA_ATTRIBUTE
            | DERIVED_RELATIONAL_COLUMN
            | DERIVED_SCHEMA_ATTRIBUTE => Some(Self::Column),
            _ => None,
        }
    }

    /// The granularity a view reports at.
    pub fn of_view(view: View) -> Self {
        match view {
            View::HostView => Self::Host,
            View::TableView => Self::Table,
            View::ColumnView => Self::Column,
        }
    }

    /// Whether this granularity is finer than what `view` reports.
    pub fn finer_than(self, view: View) -> bool {
        self > Self::of_view(view)
    }
}
