//! Schema listing command handler.

use loopcsv::{ElementKind, SchemaRegistry};

/// Elements command.
pub fn cmd_elements(only: Option<ElementKind>) {
    let registry = SchemaRegistry::standard();

    for (element, schema) in registry.iter() {
        if only.is_some_and(|kind| kind != element) {
            continue;
        }
        println!(
            "{} ({}, {} columns, {} bytes per record)",
            element.as_str(),
            element.file_name(),
            schema.len(),
            schema.record_width()
        );
        println!("  store path: {}", element.store_path());
        for column in schema {
            println!("  {:<22} {}", column.name, column.column_type);
        }
        println!();
    }
}
