use crate::variables::{Declarations, VariableTable};

/// Render the table as a stylesheet fragment, one rule per selector.
/// Selectors without declarations are skipped.
pub fn emit_css(table: &VariableTable) -> String {
    let mut out = String::new();

    for (selector, declarations) in table.iter() {
        if declarations.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        emit_rule(selector, declarations, &mut out);
    }
    out
}

fn emit_rule(selector: &str, declarations: &Declarations, out: &mut String) {
    out.push_str(selector);
    out.push_str(" {\n");

    for (name, value) in declarations {
        emit_declaration(name, value, out);
    }
    out.push_str("}\n");
}

fn emit_declaration(name: &str, value: &str, out: &mut String) {
    out.push_str("    ");
    out.push_str(name);
    out.push_str(": ");
    out.push_str(value);
    out.push_str(";\n");
}
