//! Expanding a tree to a fixed depth and turning it into text or JSON.

use ckan_rs_relgraph::{RegistryQuery, RelationshipTree};
use ckan_rs_relgraph::metadb::package::VersionCriteria;
use ckan_rs_relgraph::relationship_graph::{Emphasis, NodeIndex};

/// Expands the tree until `depth` layers below the root are populated.
/// 
/// `build_root()` already populates the first layer so a depth of `0` or `1` changes nothing.
pub fn expand_to_depth<R: RegistryQuery + ?Sized>(tree: &mut RelationshipTree, registry: &R, criteria: Option<&VersionCriteria>, depth: usize) -> ckan_rs_relgraph::Result<()> {
	let mut frontier = tree.children(tree.root());
	for _ in 1..depth {
		let mut next = Vec::new();
		for node in frontier {
			tree.expand_layer(node, registry, criteria)?;
			next.extend(tree.children(node));
		}
		frontier = next;
	}
	Ok(())
}

/// One line per node, indented by depth.
/// 
/// Lines are prefixed with `!` for incompatible or missing targets and `~` for provides groups.
/// Nodes which could still be expanded end in `...`.
pub fn render_text(tree: &RelationshipTree, verbose: bool) -> String {
	let mut out = String::new();
	render_node(tree, tree.root(), 0, verbose, &mut out);
	out
}

fn render_node(tree: &RelationshipTree, node: NodeIndex, depth: usize, verbose: bool, out: &mut String) {
	let weight = &tree[node];

	out.push_str(&"  ".repeat(depth));
	out.push_str(match weight.emphasis() {
		Emphasis::Normal => "",
		Emphasis::Muted => "~ ",
		Emphasis::Error => "! ",
	});
	if let Some(tooltip) = weight.tooltip() {
		out.push_str(&tooltip.to_lowercase());
		out.push_str(": ");
	}
	out.push_str(weight.label());
	if !weight.is_expanded() {
		out.push_str(" ...");
	}
	if verbose {
		out.push_str(&format!(" [{:?}, icon {}]", weight.variant(), weight.icon_index()));
	}
	out.push('\n');

	for child in tree.children(node) {
		render_node(tree, child, depth + 1, verbose, out);
	}
}

/// The tree as nested JSON objects starting at the root.
pub fn render_json(tree: &RelationshipTree) -> serde_json::Value {
	node_json(tree, tree.root())
}

fn node_json(tree: &RelationshipTree, node: NodeIndex) -> serde_json::Value {
	let weight = &tree[node];
	serde_json::json!({
		"label": weight.label(),
		"name": weight.name(),
		"variant": weight.variant(),
		"relationship": weight.relationship(),
		"compatible": weight.is_compatible(),
		"compatibility_note": weight.compatibility_note(),
		"expanded": weight.is_expanded(),
		"children": tree.children(node).into_iter().map(|c| node_json(tree, c)).collect::<Vec<_>>(),
	})
}

#[cfg(test)]
mod test {
	use super::*;
	use ckan_rs_test_utils::*;

	fn core_tree(depth: usize) -> RelationshipTree {
		let mut db = core_metadb().unwrap();
		db.add_package(PackageBuilder::new("Lib", "3.0").unwrap().depends("Ghost").build());
		let core = db.get_latest("Core").unwrap().clone();
		let mut tree = RelationshipTree::build_root(core, &db, None).unwrap();
		expand_to_depth(&mut tree, &db, None, depth).unwrap();
		tree
	}

	#[test]
	fn depth_one_leaves_children_unexpanded() {
		let text = render_text(&core_tree(1), false);
		assert_eq!(text, "Core 1.0\n  depends: Lib 3.0 ...\n  ~ recommends: Widget (virtual)\n    recommends: WidgetA 1.0 ...\n    recommends: WidgetB 1.0 ...\n");
	}

	#[test]
	fn depth_two_expands_grandchildren() {
		let text = render_text(&core_tree(2), false);
		assert_eq!(text, "Core 1.0\n  depends: Lib 3.0\n    ! depends: Ghost (not indexed)\n  ~ recommends: Widget (virtual)\n    recommends: WidgetA 1.0 ...\n    recommends: WidgetB 1.0 ...\n");
	}

	#[test]
	fn verbose_shows_variant() {
		let text = render_text(&core_tree(1), true);
		assert!(text.starts_with("Core 1.0 [Root, icon 0]\n"));
		assert!(text.contains("Lib 3.0 ... [ResolvedPackage, icon 1]"));
	}

	#[test]
	fn json_nests_children() {
		let v = render_json(&core_tree(2));
		assert_eq!(v["label"], "Core 1.0");
		assert_eq!(v["children"][0]["relationship"], "Depends");
		assert_eq!(v["children"][0]["children"][0]["variant"], "Unindexed");
		assert_eq!(v["children"][1]["children"].as_array().unwrap().len(), 2);
		assert!(v["children"][1]["compatibility_note"].is_null());
	}
}
