use std::path::Path;

use crate::error::{BlendError, Result};
use crate::models::ItemRecord;

/// Which catalog table is being read; formulas additionally carry a priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum TableKind {
    Formulas,
    Solutions,
}

impl TableKind {
    fn label(self) -> &'static str {
        match self {
            TableKind::Formulas => "formula",
            TableKind::Solutions => "solution",
        }
    }
}

pub(super) struct RawTable {
    pub records: Vec<ItemRecord>,
    /// Normalized nutrient column keys, used for cross-table alignment.
    pub nutrient_keys: Vec<String>,
    /// Nutrient column labels as written in the source header.
    pub nutrient_names: Vec<String>,
}

/// Column layout resolved from a table header.
struct Columns {
    name: usize,
    volume: usize,
    priority: Option<usize>,
    bottles: Option<usize>,
    /// (column index, normalized key, display label) per nutrient.
    nutrients: Vec<(usize, String, String)>,
}

/// Normalize a header cell to its comparison key: trimmed, lowercased,
/// first whitespace-separated token (so "Protein g" and "Protein gr." align).
fn header_key(header: &str) -> String {
    header
        .trim()
        .to_lowercase()
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_string()
}

fn resolve_columns(headers: &csv::StringRecord, kind: TableKind) -> Result<Columns> {
    let mut name = None;
    let mut volume = None;
    let mut priority = None;
    let mut bottles = None;
    let mut nutrients = Vec::new();

    for (idx, header) in headers.iter().enumerate() {
        match header_key(header).as_str() {
            "name" => name = Some(idx),
            "volume" => volume = Some(idx),
            "priority" => priority = Some(idx),
            "bottles" => bottles = Some(idx),
            "" => {}
            key => nutrients.push((idx, key.to_string(), header.trim().to_string())),
        }
    }

    let missing = |column: &str| BlendError::MissingColumn {
        column: column.to_string(),
        table: kind.label().to_string(),
    };
    let name = name.ok_or_else(|| missing("name"))?;
    let volume = volume.ok_or_else(|| missing("volume"))?;
    if kind == TableKind::Formulas && priority.is_none() {
        return Err(missing("priority"));
    }

    Ok(Columns {
        name,
        volume,
        priority,
        bottles,
        nutrients,
    })
}

fn cell<'a>(row: &'a csv::StringRecord, idx: usize) -> &'a str {
    row.get(idx).unwrap_or("").trim()
}

fn parse_number(text: &str, context: &str) -> Result<Option<f64>> {
    if text.is_empty() {
        return Ok(None);
    }
    text.parse::<f64>()
        .map(Some)
        .map_err(|_| BlendError::InvalidCatalog(format!("cannot parse '{}' in {}", text, context)))
}

/// Read one catalog table. Reserved columns are `name`, `volume`, `priority`
/// and `bottles`; every other column is a nutrient, kept in file order.
/// Missing cells take defaults downstream; missing nutrient cells are zero.
pub(super) fn read_table(path: &Path, kind: TableKind) -> Result<RawTable> {
    let mut reader = csv::Reader::from_path(path)?;
    let columns = resolve_columns(reader.headers()?, kind)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let name = cell(&row, columns.name).to_string();
        if name.is_empty() {
            return Err(BlendError::InvalidCatalog(format!(
                "{} row {} has no name",
                kind.label(),
                records.len() + 1
            )));
        }
        let context = format!("{} '{}'", kind.label(), name);

        let bottle_volume = parse_number(cell(&row, columns.volume), &context)?;
        let priority = match (kind, columns.priority) {
            (TableKind::Formulas, Some(idx)) => parse_number(cell(&row, idx), &context)?,
            _ => None,
        };
        let bottle_cap = match columns.bottles {
            Some(idx) => parse_number(cell(&row, idx), &context)?.map(|v| v.round() as u32),
            None => None,
        };

        let mut nutrients = Vec::with_capacity(columns.nutrients.len());
        for (idx, _, _) in &columns.nutrients {
            nutrients.push(parse_number(cell(&row, *idx), &context)?.unwrap_or(0.0));
        }

        records.push(ItemRecord {
            name,
            bottle_volume,
            priority,
            bottle_cap,
            nutrients,
        });
    }

    let (nutrient_keys, nutrient_names) = columns
        .nutrients
        .into_iter()
        .map(|(_, key, label)| (key, label))
        .unzip();

    Ok(RawTable {
        records,
        nutrient_keys,
        nutrient_names,
    })
}
