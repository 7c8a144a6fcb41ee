use crate::{
    db::path::PopulatePath,
    record::{Node, Record},
};

/// Merge resolved relation values into the root record.
///
/// Each `(path, node)` pair writes its node under the path's first segment;
/// deeper segments are already nested inside the node by the resolver. Two
/// records landing under the same segment merge field-wise, so several
/// population paths sharing a prefix compose regardless of order. The result
/// is a plain nested value tree with no references to loader state;
/// comparison is by value.
#[must_use]
pub fn assemble(root: &Record, populated: Vec<(PopulatePath, Node)>) -> Record {
    let mut assembled = root.clone();

    for (path, node) in populated {
        let Some(first) = path.segments().first() else {
            continue;
        };

        let merged = match assembled.get(first) {
            Some(existing) => merge_nodes(existing, node),
            None => node,
        };
        assembled.set(first.clone(), merged);
    }

    assembled
}

// Records merge field-wise with the incoming side winning per field;
// anything else is replaced wholesale.
fn merge_nodes(existing: &Node, incoming: Node) -> Node {
    match (existing, incoming) {
        (Node::Record(base), Node::Record(overlay)) => {
            let mut merged = base.clone();
            for (field, node) in overlay {
                let node = match merged.get(&field) {
                    Some(current) => merge_nodes(current, node),
                    None => node,
                };
                merged.set(field, node);
            }
            Node::Record(merged)
        }
        (_, incoming) => incoming,
    }
}

///
/// TESTS
///
