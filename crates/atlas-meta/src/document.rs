//! TOML meta documents.
//!
//! Each top-level table of a document is one registration:
//!
//! ```toml
//! [settings]
//! size = [32, 32]
//!
//! [sheet_settings]
//! rows = 2
//! columns = 4
//!
//! [[sheet_settings.coordinates]]
//! at = [0, 1]
//! global_alpha = 128
//! ```

use toml::{Table, Value};

use crate::{
    ChildrenSettings, MetaCapture, MetaContext, MetaError, MetaOutput, Settings, SheetSettings,
    Slot,
};

/// Reserved key inside `[children_settings]` holding grouped entries.
const GROUPS_KEY: &str = "groups";

/// Evaluate one meta document in `context`.
///
/// A fresh capture is built for every call, so evaluations never observe
/// each other's registrations.
pub fn evaluate(source: &str, context: MetaContext) -> Result<MetaOutput, MetaError> {
    let document: Table = toml::from_str(source).map_err(|e| MetaError::Parse(e.to_string()))?;

    let mut capture = MetaCapture::new();
    for (key, value) in document {
        let slot = Slot::from_name(&key).ok_or(MetaError::UnknownEntry(key))?;
        match slot {
            Slot::Settings => {
                capture.settings(parse_settings(slot, value)?);
            }
            Slot::DefaultSettings => {
                capture.default_settings(parse_settings(slot, value)?);
            }
            Slot::SheetSettings => {
                capture.sheet_settings(parse_sheet(value)?);
            }
            Slot::ChildrenSettings => {
                capture.children_settings(parse_children(value)?);
            }
        }
    }
    capture.finish(context)
}

fn invalid(entry: Slot, message: impl Into<String>) -> MetaError {
    MetaError::InvalidEntry {
        entry,
        message: message.into(),
    }
}

fn parse_settings(entry: Slot, value: Value) -> Result<Settings, MetaError> {
    if !value.is_table() {
        return Err(invalid(entry, "expected a table of settings"));
    }
    value.try_into().map_err(|e| invalid(entry, e.to_string()))
}

fn into_table(entry: Slot, value: Value, what: &str) -> Result<Table, MetaError> {
    match value {
        Value::Table(table) => Ok(table),
        other => Err(invalid(
            entry,
            format!("expected {} to be a table, found {}", what, other.type_str()),
        )),
    }
}

fn integer(entry: Slot, table: &Table, key: &str) -> Result<Option<i64>, MetaError> {
    match table.get(key) {
        None => Ok(None),
        Some(Value::Integer(i)) => Ok(Some(*i)),
        Some(other) => Err(invalid(
            entry,
            format!("'{}' must be an integer, found {}", key, other.type_str()),
        )),
    }
}

fn parse_sheet(value: Value) -> Result<SheetSettings, MetaError> {
    let entry = Slot::SheetSettings;
    let mut table = into_table(entry, value, "sheet_settings")?;

    let rows = integer(entry, &table, "rows")?.ok_or_else(|| invalid(entry, "missing 'rows'"))?;
    let columns =
        integer(entry, &table, "columns")?.ok_or_else(|| invalid(entry, "missing 'columns'"))?;
    let padding = integer(entry, &table, "padding")?.unwrap_or(0);
    let mut sheet = SheetSettings::new(rows, columns, padding)?;

    let coordinates = table.remove("coordinates");
    if let Some(key) = table
        .keys()
        .find(|k| !matches!(k.as_str(), "rows" | "columns" | "padding"))
    {
        return Err(invalid(entry, format!("unknown field '{}'", key)));
    }

    let coordinates = match coordinates {
        None => Vec::new(),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(invalid(
                entry,
                format!("'coordinates' must be an array, found {}", other.type_str()),
            ))
        }
    };

    for item in coordinates {
        let mut cell = into_table(entry, item, "every coordinate")?;
        let at = cell
            .remove("at")
            .ok_or_else(|| invalid(entry, "every coordinate needs 'at = [column, row]'"))?;
        let at: (u32, u32) = at
            .try_into()
            .map_err(|_| invalid(entry, "'at' must be a pair of non-negative integers"))?;
        let settings = parse_settings(entry, Value::Table(cell))?;
        sheet.coordinate_overrides.insert(at, settings);
    }

    Ok(sheet)
}

fn parse_children(value: Value) -> Result<ChildrenSettings, MetaError> {
    let entry = Slot::ChildrenSettings;
    let table = into_table(entry, value, "children_settings")?;
    let mut children = ChildrenSettings::new();

    for (name, value) in table {
        if name != GROUPS_KEY {
            children.insert([name], parse_settings(entry, value)?);
            continue;
        }

        let Value::Array(groups) = value else {
            return Err(invalid(entry, "'groups' must be an array of tables"));
        };
        for group in groups {
            let mut group = into_table(entry, group, "every group")?;
            let names: Vec<String> = match group.remove("names") {
                Some(Value::String(name)) => vec![name],
                Some(names @ Value::Array(_)) => names
                    .try_into()
                    .map_err(|_| invalid(entry, "'names' must be a list of asset names"))?,
                _ => return Err(invalid(entry, "every group needs 'names'")),
            };
            children.insert(names, parse_settings(entry, Value::Table(group))?);
        }
    }

    Ok(children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ColorKey, Scale};

    #[test]
    fn test_folder_document() {
        let source = r##"
            [default_settings]
            alpha = false
            scale = 2

            [children_settings]
            hero = { size = [16, 24] }

            [[children_settings.groups]]
            names = ["tree", "bush"]
            colorkey = "#ff00ff"
        "##;
        let output = evaluate(source, MetaContext::Folder).unwrap();

        let defaults = output.default_settings.unwrap();
        assert_eq!(defaults.alpha, Some(false));
        assert_eq!(defaults.scale, Some(Scale::Uniform(2.0)));
        assert!(output.settings.is_none());

        let children = output.children_settings.unwrap();
        assert_eq!(children.get("hero").unwrap().size, Some((16, 24)));
        assert_eq!(
            children.get("bush").unwrap().colorkey,
            Some(ColorKey::new(255, 0, 255))
        );
        assert_eq!(children.len(), 3);
    }

    #[test]
    fn test_sheet_document() {
        let source = r#"
            [settings]
            scale = [2.0, 0.5]

            [sheet_settings]
            rows = 2
            columns = 3
            padding = 1

            [[sheet_settings.coordinates]]
            at = [2, 1]
            global_alpha = 40
        "#;
        let output = evaluate(source, MetaContext::Asset).unwrap();
        assert_eq!(output.settings.unwrap().scale, Some(Scale::Axes(2.0, 0.5)));

        let sheet = output.sheet_settings.unwrap();
        assert_eq!((sheet.rows, sheet.columns, sheet.padding), (2, 3, 1));
        assert_eq!(sheet.coordinate_overrides[&(2, 1)].global_alpha, Some(40));
    }

    #[test]
    fn test_sheet_only_asset_is_valid() {
        let output = evaluate("[sheet_settings]\nrows = 1\ncolumns = 4\n", MetaContext::Asset)
            .unwrap();
        assert!(output.settings.is_none());
        assert_eq!(output.sheet_settings.unwrap().padding, 0);
    }

    #[test]
    fn test_context_rules() {
        let sheet = "[sheet_settings]\nrows = 1\ncolumns = 1\n";
        assert!(matches!(
            evaluate(sheet, MetaContext::Folder),
            Err(MetaError::Forbidden { .. })
        ));

        let children = "[settings]\n[children_settings]\na = {}\n";
        assert!(matches!(
            evaluate(children, MetaContext::Asset),
            Err(MetaError::Forbidden { .. })
        ));

        assert_eq!(
            evaluate("", MetaContext::Asset),
            Err(MetaError::MissingRegistration)
        );
    }

    #[test]
    fn test_rejects_bad_documents() {
        assert!(matches!(
            evaluate("[palette]\n", MetaContext::Folder),
            Err(MetaError::UnknownEntry(name)) if name == "palette"
        ));
        assert!(matches!(
            evaluate("[settings]\nblur = 3\n", MetaContext::Folder),
            Err(MetaError::InvalidEntry { .. })
        ));
        assert!(matches!(
            evaluate("[settings]\nglobal_alpha = 300\n", MetaContext::Folder),
            Err(MetaError::InvalidEntry { .. })
        ));
        assert!(matches!(
            evaluate("[sheet_settings]\nrows = 0\ncolumns = 2\n", MetaContext::Asset),
            Err(MetaError::InvalidSheetLayout { rows: 0, columns: 2 })
        ));
        assert!(matches!(
            evaluate("settings = 3", MetaContext::Folder),
            Err(MetaError::InvalidEntry { .. })
        ));
        assert!(matches!(
            evaluate("[settings", MetaContext::Folder),
            Err(MetaError::Parse(_))
        ));
    }
}
