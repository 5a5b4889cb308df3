use crate::ast::{AstNode, AstOp};

/// Renders the AST as an indented tree, one node per line.
pub fn ast_to_string(root: &AstNode) -> String {
    let mut out = String::new();
    write_node(&mut out, root, 0);
    out
}

fn write_node(out: &mut String, node: &AstNode, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }

    match node.op {
        AstOp::LeafId => {
            out.push_str(&format!("id '{}'", node.name().unwrap_or("?")));
        }
        AstOp::LeafUint => {
            out.push_str(&format!("uint {}", node.int_val.unwrap_or(0)));
        }
        AstOp::Type => {
            out.push_str("type");
            if let Some(ty) = &node.ty {
                out.push_str(&format!(" {}", ty));
            }
        }
        op => {
            out.push_str(&op.to_string());
            if let Some(ty) = &node.ty {
                out.push_str(&format!(" : {}", ty));
            }
        }
    }
    out.push_str(&format!(" <line {}>\n", node.line));

    for kid in &node.kids {
        write_node(out, kid, depth + 1);
    }
}
