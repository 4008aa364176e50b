use crate::legacy::loader::is_yaml;
use crate::migrate::DocumentOverrides;
use std::path::Path;

/// Derives the migrated document's identity from its source file name.
///
/// The stem is split on `.`: the last segment is the id, the second one is
/// the name (`export.Orders.7f3a.json` -> id `7f3a`, name `Orders`). With
/// two segments the id doubles as the name; a single segment yields no name.
pub fn overrides_from_file_name(file_name: &str) -> Option<DocumentOverrides> {
    let stem = Path::new(file_name).file_stem()?.to_str()?;
    let segments: Vec<&str> = stem.split('.').collect();

    let id = segments.last().filter(|id| !id.is_empty())?;
    let name = segments.get(1).copied().filter(|name| !name.is_empty());

    Some(DocumentOverrides::new(id, name))
}

/// Output documents are always JSON; YAML inputs get their extension swapped.
pub fn output_file_name(file_name: &str) -> String {
    let path = Path::new(file_name);
    if is_yaml(path) {
        path.with_extension("json").to_string_lossy().into_owned()
    } else {
        file_name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_segment_names_split_into_name_and_id() {
        let overrides = overrides_from_file_name("export.Orders.7f3a.json").unwrap();
        assert_eq!(overrides, DocumentOverrides::new("7f3a", Some("Orders")));
    }

    #[test]
    fn longer_stems_take_second_and_last_segment() {
        let overrides = overrides_from_file_name("a.Billing.v2.99.json").unwrap();
        assert_eq!(overrides, DocumentOverrides::new("99", Some("Billing")));
    }

    #[test]
    fn two_segment_names_take_the_second_segment() {
        let overrides = overrides_from_file_name("Orders.7f3a.json").unwrap();
        assert_eq!(overrides, DocumentOverrides::new("7f3a", Some("7f3a")));
    }

    #[test]
    fn empty_name_segment_is_absent() {
        let overrides = overrides_from_file_name("export..7f3a.json").unwrap();
        assert_eq!(overrides, DocumentOverrides::new("7f3a", None));
    }

    #[test]
    fn single_segment_has_no_name() {
        let overrides = overrides_from_file_name("7f3a.json").unwrap();
        assert_eq!(overrides, DocumentOverrides::new("7f3a", None));
    }

    #[test]
    fn empty_id_segment_is_rejected() {
        assert!(overrides_from_file_name("orders..json").is_none());
    }

    #[test]
    fn yaml_outputs_become_json() {
        assert_eq!(output_file_name("a.b.c.yaml"), "a.b.c.json");
        assert_eq!(output_file_name("a.b.c.json"), "a.b.c.json");
    }
}
