use protodts_syntax::{NodeId, Program, TypeOracle};
use crate::{error::DtsError, utils::quote};

/// Returns `Ok(())` if the snapshot is internally consistent, or
/// `Err(DtsError::InvalidProgram(_))` describing the first problem found.
pub fn verify_program(program: &Program) -> Result<(), DtsError> {
    let node_count   = program.nodes.len();
    let type_count   = program.types.len();
    let symbol_count = program.symbols.len();
    let file_count   = program.files.len();

    let invalid = |msg: String| Err(DtsError::InvalidProgram(msg));

    // 1) Files: roots exist, have no parent and belong to their file
    for (index, file) in program.files.iter().enumerate() {
        match program.node(file.root) {
            None => {
                return invalid(format!(
                    "The root {} of file {} does not exist",
                    file.root,
                    quote(&file.name)
                ))
            }
            Some(root) if root.file.index() != index => {
                return invalid(format!(
                    "The root {} of file {} belongs to another file",
                    file.root,
                    quote(&file.name)
                ))
            }
            Some(root) if root.parent.is_some() => {
                return invalid(format!(
                    "The root {} of file {} has a parent",
                    file.root,
                    quote(&file.name)
                ))
            }
            Some(_) => {}
        }
    }

    // 2) Nodes: references in range, tree links consistent, spans in bounds
    for id in program.node_ids() {
        let node = &program.nodes[id.index()];

        if node.file.index() >= file_count {
            return invalid(format!("The file of {} does not exist", id));
        }
        if let Some(parent) = node.parent {
            let Some(parent_node) = program.node(parent) else {
                return invalid(format!("The parent of {} does not exist", id));
            };
            if !parent_node.children.contains(&id) {
                return invalid(format!("{} is not listed among the children of its parent {}", id, parent));
            }
        }
        for &child in &node.children {
            match program.node(child) {
                Some(child_node) if child_node.parent == Some(id) => {}
                Some(_) => return invalid(format!("The child {} of {} points to another parent", child, id)),
                None => return invalid(format!("The child {} of {} does not exist", child, id)),
            }
        }
        for linked in [node.kind.type_annotation(), initializer_of(program, id)].into_iter().flatten() {
            if !node.children.contains(&linked) {
                return invalid(format!("{} refers to {} which is not one of its children", id, linked));
            }
        }
        if let Some(ty) = node.ty {
            if ty.index() >= type_count {
                return invalid(format!("The type of {} does not exist", id));
            }
        }
        if let Some(span) = node.span {
            let text = &program.files[node.file.index()].text;
            if span.pos > span.end || text.get(span.pos..span.end).is_none() {
                return invalid(format!(
                    "The span {}..{} of {} is outside its file {}",
                    span.pos,
                    span.end,
                    id,
                    quote(&program.files[node.file.index()].name)
                ));
            }
        }
    }

    // 3) Trees: every node is reached from its file's root exactly once
    let mut reached = vec![false; node_count];
    for file in &program.files {
        let mut stack = vec![file.root];
        while let Some(id) = stack.pop() {
            if std::mem::replace(&mut reached[id.index()], true) {
                return invalid(format!(
                    "{} is reached more than once from the root of {}",
                    id,
                    quote(&file.name)
                ));
            }
            let node = &program.nodes[id.index()];
            if node.file != program.nodes[file.root.index()].file {
                return invalid(format!(
                    "{} is in the tree of {} but names another file",
                    id,
                    quote(&file.name)
                ));
            }
            stack.extend(node.children.iter().rev());
        }
    }
    if let Some(orphan) = reached.iter().position(|&seen| !seen) {
        return invalid(format!("NodeId#{} is not reachable from the root of its file", orphan));
    }

    // 4) Types: symbols and type arguments exist
    for (index, ty) in program.types.iter().enumerate() {
        for symbol in [ty.alias_symbol, ty.symbol].into_iter().flatten() {
            if symbol.index() >= symbol_count {
                return invalid(format!("The symbol of TypeId#{} does not exist", index));
            }
        }
        if ty.type_arguments.iter().any(|arg| arg.index() >= type_count) {
            return invalid(format!("A type argument of TypeId#{} does not exist", index));
        }
    }

    // 5) Symbols: declarations exist
    for symbol in &program.symbols {
        if symbol.declarations.iter().any(|decl| decl.index() >= node_count) {
            return invalid(format!(
                "A declaration of symbol {} does not exist",
                quote(&symbol.name)
            ));
        }
    }

    Ok(())
}

fn initializer_of(program: &Program, id: NodeId) -> Option<NodeId> {
    match program.node(id)?.kind {
        protodts_syntax::NodeKind::EnumMember { initializer } => initializer,
        _ => None,
    }
}
