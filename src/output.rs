use tabled::settings::Style;
use tabled::{Table, Tabled};
use termtree::Tree;

use crate::framework::{Attribute, PlannedChange, Schema};
use crate::operations::Operation;

#[derive(Tabled)]
struct OperationRow<'a> {
    #[tabled(rename = "OP")]
    op: String,
    #[tabled(rename = "PATH")]
    path: &'a str,
    #[tabled(rename = "VALUE")]
    value: &'a str,
}

#[derive(Tabled)]
struct TypeRow<'a> {
    #[tabled(rename = "KIND")]
    kind: &'static str,
    #[tabled(rename = "TYPE")]
    name: &'a str,
}

pub fn operations_table(ops: &[Operation]) -> String {
    let rows = ops.iter().map(|op| OperationRow {
        op: op.op.to_string(),
        path: &op.path,
        value: op.value.as_deref().unwrap_or(""),
    });
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn types_table<'a>(
    resources: impl IntoIterator<Item = &'a String>,
    data_sources: impl IntoIterator<Item = &'a String>,
) -> String {
    let rows = resources
        .into_iter()
        .map(|name| TypeRow {
            kind: "resource",
            name,
        })
        .chain(data_sources.into_iter().map(|name| TypeRow {
            kind: "data source",
            name,
        }));
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Human-readable summary of a planned change.
pub fn render_plan(type_name: &str, name: &str, change: &PlannedChange) -> String {
    let mut out = format!("{type_name} \"{name}\": {}\n", change.action);
    if !change.requires_replace.is_empty() {
        out.push_str(&format!(
            "  forces replacement: {}\n",
            change.requires_replace.join(", ")
        ));
    }
    if !change.operations.is_empty() {
        out.push_str(&operations_table(&change.operations));
        out.push('\n');
    }
    out
}

fn attribute_label(attribute: &Attribute) -> String {
    let mut flags = vec![attribute.kind.label()];
    if attribute.required {
        flags.push("required");
    } else if attribute.read_only {
        flags.push("read-only");
    } else if attribute.computed {
        flags.push("optional, computed");
    } else {
        flags.push("optional");
    }
    if attribute.requires_replace {
        flags.push("forces replacement");
    }
    format!("{} ({})", attribute.name, flags.join(", "))
}

fn attribute_tree(attribute: &Attribute) -> Tree<String> {
    let mut tree = Tree::new(attribute_label(attribute));
    if !attribute.description.is_empty() {
        tree.push(attribute.description.to_string());
    }
    if !attribute.supported_by.is_empty() {
        tree.push(format!("types: {}", attribute.supported_by.join(", ")));
    }
    if !attribute.required_by.is_empty() {
        tree.push(format!("required by: {}", attribute.required_by.join(", ")));
    }
    tree
}

pub fn schema_tree(type_name: &str, schema: &Schema) -> Tree<String> {
    let mut root = Tree::new(type_name.to_string());
    root.push(schema.description.to_string());
    if !schema.types.is_empty() {
        root.push(
            Tree::new("types".to_string())
                .with_leaves(schema.types.iter().map(|t| t.to_string())),
        );
    }
    root.push(
        Tree::new("attributes".to_string())
            .with_leaves(schema.attributes.iter().map(attribute_tree)),
    );
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::{AttributeKind, PlannedAction};

    #[test]
    fn test_operations_table_contains_rows() {
        let table = operations_table(&[
            Operation::replace("enabled", "false"),
            Operation::remove("[disk-devices eq \"sda\"]"),
        ]);
        assert!(table.contains("OP"));
        assert!(table.contains("replace"));
        assert!(table.contains("enabled"));
        assert!(table.contains("[disk-devices eq \"sda\"]"));
    }

    #[test]
    fn test_render_plan_replace() {
        let change = PlannedChange {
            action: PlannedAction::Replace,
            operations: Vec::new(),
            requires_replace: vec!["type".to_string()],
        };
        let out = render_plan("pingdirectory_monitor_provider", "Disk", &change);
        assert!(out.starts_with("pingdirectory_monitor_provider \"Disk\": replace"));
        assert!(out.contains("forces replacement: type"));
    }

    #[test]
    fn test_schema_tree() {
        let schema = Schema {
            description: "Lists configuration object ids.",
            types: &[],
            attributes: vec![
                Attribute::string("filter").describe("SCIM filter."),
                Attribute::new("ids", AttributeKind::StringSet).read_only(),
            ],
        };
        let rendered = schema_tree("pingdirectory_monitor_providers", &schema).to_string();
        assert!(rendered.starts_with("pingdirectory_monitor_providers"));
        assert!(rendered.contains("filter (string, optional)"));
        assert!(rendered.contains("ids (set(string), read-only)"));
        assert!(!rendered.contains("types"));
    }

    #[test]
    fn test_types_table() {
        let resources = vec!["pingdirectory_monitor_provider".to_string()];
        let data_sources = vec!["pingdirectory_monitor_providers".to_string()];
        let table = types_table(&resources, &data_sources);
        assert!(table.contains("data source"));
        assert!(table.contains("pingdirectory_monitor_providers"));
    }
}
