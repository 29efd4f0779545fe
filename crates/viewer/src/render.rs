//! Text rendering of the navigation tree

use doc_manager::navigation::NavigationTree;
use doc_manager::Projection;
use std::fmt::Write;

/// Render the whole tree, one node per line, children indented under
/// their parent and each line ending with the node id
pub fn tree(tree: &NavigationTree, projection: &impl Projection) -> String {
    let mut out = String::new();
    if !projection.has_document() {
        out.push_str(doc_manager::navigation::NO_DOCUMENT);
        out.push('\n');
        return out;
    }

    let _ = writeln!(out, "{}", projection.title());
    for category in tree.root_children(projection) {
        let _ = writeln!(out, "  {}  [{}]", tree.label(projection, &category), category);
        for child in tree.children(projection, &category) {
            let _ = writeln!(out, "    {}  [{}]", tree.label(projection, &child), child);
        }
    }
    out
}
