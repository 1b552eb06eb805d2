/// Separator between the segments of a qualified field path.
pub const PATH_SEPARATOR: char = '.';

/// Build the qualified path of `field` nested under `parent`.
///
/// The root of a run has an empty parent, so its fields are addressed by bare
/// name (`engine`), and nested fields by their dotted chain
/// (`car.engine.serial_number`).
pub fn qualified_path(parent: &str, field: &str) -> String {
    if parent.is_empty() {
        return field.to_string();
    }

    format!("{parent}{PATH_SEPARATOR}{field}")
}
