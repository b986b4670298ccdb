//! Source text generation for the schema catalog module.

use super::catalog::SchemaCatalog;

/// Binding name prefix for generated imports.
const ALIAS_PREFIX: &str = "__schema_";

/// Generate the module body for a catalog.
///
/// Every entry becomes a default import bound to `__schema_<n>`; the module
/// then exports one mapping from key to binding, both as the named export
/// `schemas` and as the default export. The data files themselves are never
/// read here: parsing them is the host loader's job.
///
/// # Example
///
/// ```
/// use forge_overlay::aggregator::{generate_module, SchemaCatalog};
/// use forge_overlay::config::SchemaConfig;
///
/// let catalog = SchemaCatalog::from_listing(
///     ["amp.json".to_string()],
///     &SchemaConfig::new("/repo/shared/schemas"),
/// ).unwrap();
///
/// let code = generate_module(&catalog);
/// assert!(code.contains(r#"import __schema_0 from "shared/schemas/amp.json";"#));
/// assert!(code.contains(r#""AMP": __schema_0"#));
/// assert!(code.contains("export default schemas;"));
/// ```
pub fn generate_module(catalog: &SchemaCatalog) -> String {
    let mut code = String::new();

    for (i, entry) in catalog.entries().iter().enumerate() {
        code.push_str(&format!(
            "import {}{} from {};\n",
            ALIAS_PREFIX,
            i,
            string_literal(&entry.import_path)
        ));
    }
    if !catalog.is_empty() {
        code.push('\n');
    }

    if catalog.is_empty() {
        code.push_str("export const schemas = {};\n");
    } else {
        let entries: Vec<String> = catalog
            .entries()
            .iter()
            .enumerate()
            .map(|(i, entry)| format!("  {}: {}{}", string_literal(&entry.key), ALIAS_PREFIX, i))
            .collect();
        code.push_str("export const schemas = {\n");
        code.push_str(&entries.join(",\n"));
        code.push_str("\n};\n");
    }

    code.push_str("\nexport default schemas;\n");
    code
}

/// Quote a string as a JavaScript string literal.
///
/// JSON string syntax is a subset of JavaScript's, so the JSON encoder gives
/// correct escaping for quotes, backslashes and control characters.
fn string_literal(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SchemaConfig;

    fn catalog(names: &[&str]) -> SchemaCatalog {
        SchemaCatalog::from_listing(
            names.iter().map(|s| s.to_string()),
            &SchemaConfig::new("/repo/shared/schemas"),
        )
        .unwrap()
    }

    #[test]
    fn test_two_schemas() {
        let code = generate_module(&catalog(&["b.json", "a.json"]));

        let expected = "\
import __schema_0 from \"shared/schemas/a.json\";
import __schema_1 from \"shared/schemas/b.json\";

export const schemas = {
  \"A\": __schema_0,
  \"B\": __schema_1
};

export default schemas;
";
        assert_eq!(code, expected);
    }

    #[test]
    fn test_empty_catalog() {
        let code = generate_module(&SchemaCatalog::new());
        assert_eq!(code, "export const schemas = {};\n\nexport default schemas;\n");
    }

    #[test]
    fn test_every_key_bound_to_its_import() {
        let names = ["amp.json", "claude_code.json", "codex.json", "gemini.json"];
        let code = generate_module(&catalog(&names));

        for (i, name) in names.iter().enumerate() {
            assert!(code.contains(&format!(
                "import __schema_{} from \"shared/schemas/{}\";",
                i, name
            )));
            let key = name.trim_end_matches(".json").to_uppercase();
            assert!(code.contains(&format!("\"{}\": __schema_{}", key, i)));
        }
    }

    #[test]
    fn test_names_are_escaped() {
        let code = generate_module(&catalog(&["we\"ird.json"]));
        assert!(code.contains(r#"import __schema_0 from "shared/schemas/we\"ird.json";"#));
        assert!(code.contains(r#""WE\"IRD": __schema_0"#));
    }
}
