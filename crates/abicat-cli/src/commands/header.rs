//! C header generation from the catalogue

use crate::config::{HeaderConfig, ProjectConfig};
use abicat_native::catalogue::{
    self, Category, DATA, ENUMS, FUNCTIONS, OPAQUE_TYPES, TYPEDEFS,
};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Emit the header to `output`, or stdout
pub fn run(config_path: Option<&Path>, output: Option<&Path>) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to read working directory")?;
    let project = ProjectConfig::discover(config_path, &cwd).context("Failed to load configuration")?;
    let header = render(&project.header);

    match output {
        Some(path) => {
            fs::write(path, &header)
                .with_context(|| format!("Failed to write header: {}", path.display()))?;
            tracing::info!(path = %path.display(), "header written");
        }
        None => print!("{}", header),
    }
    Ok(())
}

/// Render the full header text
pub fn render(config: &HeaderConfig) -> String {
    let mut out = String::new();
    let guard = &config.guard;

    if !config.banner.is_empty() {
        out.push_str(&format!("/* {} */\n\n", config.banner));
    }
    out.push_str(&format!("#ifndef {0}\n#define {0}\n\n", guard));
    out.push_str("#include <stdbool.h>\n#include <stddef.h>\n#include <stdint.h>\n\n");
    out.push_str("#ifdef __cplusplus\nextern \"C\" {\n#endif\n\n");

    for typedef in TYPEDEFS {
        if let Some(decl) = typedef.typedef_declaration() {
            out.push_str(&decl);
            out.push('\n');
        }
    }
    for name in OPAQUE_TYPES {
        out.push_str(&format!("typedef struct {0} {0};\n", name));
    }
    out.push('\n');

    for decl in ENUMS {
        out.push_str(&decl.declaration());
        out.push_str("\n\n");
    }
    for layout in catalogue::struct_layouts() {
        out.push_str(&layout.declaration());
        out.push_str("\n\n");
    }
    for data in DATA {
        out.push_str(&data.declaration());
        out.push('\n');
    }

    let mut current = None;
    for f in FUNCTIONS {
        if f.category == Category::Release && !config.include_release {
            continue;
        }
        if current != Some(f.category) {
            current = Some(f.category);
            out.push_str(&format!("\n/* {} */\n", f.category.display_name()));
        }
        out.push_str(&f.prototype());
        out.push('\n');
    }

    out.push_str("\n#ifdef __cplusplus\n}\n#endif\n\n");
    out.push_str(&format!("#endif /* {} */\n", guard));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_guard_wraps_header() {
        let header = render(&HeaderConfig::default());
        assert!(header.starts_with("/* Generated by abicat */\n\n#ifndef ABICAT_H\n#define ABICAT_H\n"));
        assert!(header.ends_with("#endif /* ABICAT_H */\n"));
    }

    #[test]
    fn test_declarations_precede_prototypes() {
        let header = render(&HeaderConfig::default());
        let struct_pos = header.find("typedef struct MyStruct MyStruct;").unwrap();
        let proto_pos = header.find("void accept_struct_ptr(MyStruct *arg);").unwrap();
        assert!(struct_pos < proto_pos);
        assert!(header.contains("typedef int INTTYPE;"));
        assert!(header.contains("typedef struct MyOpaqueStruct MyOpaqueStruct;"));
        assert!(header.contains("extern uint64_t GLOBALINT;"));
        assert!(header.contains("int **ptr_ptr(int **a, int **b);"));
    }

    #[test]
    fn test_release_prototypes_optional() {
        let with = render(&HeaderConfig::default());
        assert!(with.contains("void free_int(int *ptr);"));

        let without = render(&HeaderConfig {
            include_release: false,
            ..HeaderConfig::default()
        });
        assert!(!without.contains("free_int"));
        assert!(without.contains("int *multiply(int a, int b);"));
    }

    #[test]
    fn test_every_prototype_present_once() {
        let header = render(&HeaderConfig::default());
        for f in FUNCTIONS {
            assert_eq!(header.matches(&f.prototype()).count(), 1, "{}", f.name);
        }
    }

    #[test]
    fn test_run_writes_file() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("abicat.toml");
        fs::write(&config_path, "[header]\nguard = \"CUSTOM_H\"\nbanner = \"\"\n").unwrap();
        let out = dir.path().join("abicat.h");

        run(Some(config_path.as_path()), Some(out.as_path())).unwrap();
        let text = fs::read_to_string(&out).unwrap();
        assert!(text.starts_with("#ifndef CUSTOM_H"));
    }
}
