//! Struct layout report

use abicat_native::catalogue::{self, StructLayout};
use anyhow::Result;
use colored::Colorize;

pub fn run(json: bool) -> Result<()> {
    let layouts = catalogue::struct_layouts();
    if json {
        println!("{}", serde_json::to_string_pretty(&layouts)?);
    } else {
        print!("{}", render(&layouts));
    }
    Ok(())
}

pub fn render(layouts: &[StructLayout]) -> String {
    let mut out = String::new();
    for layout in layouts {
        out.push_str(&format!(
            "{}  size {}  align {}  padding {}\n",
            layout.name.bold(),
            layout.size,
            layout.align,
            layout.padding()
        ));
        for field in &layout.fields {
            out.push_str(&format!(
                "  {:>4}  {:<8} {:>3}B  {}\n",
                field.offset,
                field.name,
                field.size,
                field.shape.c_name()
            ));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_reports_offsets() {
        colored::control::set_override(false);
        let text = render(&catalogue::struct_layouts());
        assert!(text.contains("double3  size 24  align 8  padding 0"));
        assert!(text.contains("StructWithStruct  size 80"));
        assert!(text.contains("    16  array2    24B  double[3]"));
    }
}
