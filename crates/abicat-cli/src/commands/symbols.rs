//! Symbol listing - every exported function and data symbol

use abicat_native::catalogue::{BoundaryFunction, ReturnOwnership, DATA, FUNCTIONS};
use anyhow::Result;
use colored::Colorize;
use serde_json::json;

/// Print the symbol table (or JSON) to stdout
pub fn run(json: bool) -> Result<()> {
    if json {
        println!("{}", to_json()?);
    } else {
        print!("{}", render_table());
    }
    Ok(())
}

/// `{"functions": [...], "data": [...]}`
pub fn to_json() -> Result<String> {
    let value = json!({
        "functions": FUNCTIONS,
        "data": DATA,
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

fn ownership_note(f: &BoundaryFunction) -> String {
    match f.ownership {
        ReturnOwnership::Value => String::new(),
        ReturnOwnership::Transferred { release } => format!("caller frees with {}", release),
        ReturnOwnership::FieldTransferred { field, release } => {
            format!("caller frees .{} with {}", field, release)
        }
        ReturnOwnership::Static => "library-owned".to_string(),
    }
}

/// Human-readable table grouped by category
pub fn render_table() -> String {
    let width = FUNCTIONS.iter().map(|f| f.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    let mut current = None;

    for f in FUNCTIONS {
        if current != Some(f.category) {
            current = Some(f.category);
            out.push_str(&format!("\n{}\n", f.category.display_name().bold()));
        }
        out.push_str(&format!(
            "  {}  {}",
            format!("{:<width$}", f.name, width = width).green(),
            f.prototype()
        ));
        let note = ownership_note(f);
        if !note.is_empty() {
            out.push_str(&format!("  {}", format!("[{}]", note).yellow()));
        }
        out.push('\n');
    }

    out.push_str(&format!("\n{}\n", "data".bold()));
    for d in DATA {
        out.push_str(&format!(
            "  {}  {}  = {}\n",
            format!("{:<width$}", d.name, width = width).green(),
            d.declaration(),
            d.initial
        ));
    }

    out.push_str(&format!(
        "\n{} functions, {} data symbols\n",
        FUNCTIONS.len(),
        DATA.len()
    ));
    out
}
