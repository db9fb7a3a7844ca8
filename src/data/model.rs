use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the loaded table
// ---------------------------------------------------------------------------

/// A dynamically-typed table cell, loosely mirroring what a DataFrame holds.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Bool(bool),
    Missing,
}

/// Tokens that delimited-text readers treat as an absent value.
const MISSING_TOKENS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

impl CellValue {
    /// Guess a cell type from raw text, as a CSV reader would.
    pub fn from_text(s: &str) -> Self {
        let s = s.trim();
        if MISSING_TOKENS.contains(&s) {
            return CellValue::Missing;
        }
        if let Ok(v) = s.parse::<f64>() {
            return CellValue::Number(v);
        }
        match s {
            "true" | "True" | "TRUE" => CellValue::Bool(true),
            "false" | "False" | "FALSE" => CellValue::Bool(false),
            _ => CellValue::Text(s.to_string()),
        }
    }

    /// Numeric view of the cell. NaN counts as missing.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(v) => write!(f, "{v}"),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Missing => write!(f, "<missing>"),
        }
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded file
// ---------------------------------------------------------------------------

/// Column-oriented table. Columns keep their file order.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub column_names: Vec<String>,
    columns: Vec<Vec<CellValue>>,
    n_rows: usize,
}

impl Table {
    /// Build a table from a header and row-major records.
    ///
    /// Short rows are padded with [`CellValue::Missing`]; cells beyond the
    /// header are dropped. Repeated header names get a `.1`, `.2`, … suffix.
    pub fn from_rows(header: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let column_names = dedup_names(header);
        let mut columns: Vec<Vec<CellValue>> =
            vec![Vec::with_capacity(rows.len()); column_names.len()];
        let n_rows = rows.len();

        for mut row in rows {
            row.resize(column_names.len(), CellValue::Missing);
            for (col, cell) in columns.iter_mut().zip(row) {
                col.push(cell);
            }
        }

        Table {
            column_names,
            columns,
            n_rows,
        }
    }

    /// Build a table from already column-oriented data.
    pub fn from_columns(named: Vec<(String, Vec<CellValue>)>) -> Self {
        let (names, mut columns): (Vec<String>, Vec<Vec<CellValue>>) = named.into_iter().unzip();
        let n_rows = columns.iter().map(Vec::len).max().unwrap_or(0);
        for col in &mut columns {
            col.resize(n_rows, CellValue::Missing);
        }
        Table {
            column_names: dedup_names(names),
            columns,
            n_rows,
        }
    }

    /// Number of rows in the file (before any cleaning).
    pub fn len(&self) -> usize {
        self.n_rows
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn n_columns(&self) -> usize {
        self.column_names.len()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.column_names.iter().position(|c| c == name)
    }

    /// Raw cells of a column.
    pub fn cells(&self, name: &str) -> Option<&[CellValue]> {
        self.column_index(name).map(|i| self.columns[i].as_slice())
    }

    /// Cleaned numeric view of a column: missing, NaN and non-numeric cells
    /// are dropped, so indices refer to the cleaned sequence.
    pub fn numeric_column(&self, name: &str) -> Option<ColumnData> {
        let cells = self.cells(name)?;
        let values = cells.iter().filter_map(CellValue::as_f64).collect();
        Some(ColumnData::new(name, values))
    }

    /// Count of usable numeric cells per column, in column order.
    pub fn numeric_counts(&self) -> Vec<(String, usize)> {
        self.column_names
            .iter()
            .zip(&self.columns)
            .map(|(name, cells)| {
                let n = cells.iter().filter(|c| c.as_f64().is_some()).count();
                (name.clone(), n)
            })
            .collect()
    }
}

fn dedup_names(names: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let mut candidate = name.clone();
        let mut k = 1;
        while out.contains(&candidate) {
            candidate = format!("{name}.{k}");
            k += 1;
        }
        out.push(candidate);
    }
    out
}

// ---------------------------------------------------------------------------
// ColumnData – one cleaned column, ready to plot
// ---------------------------------------------------------------------------

/// Immutable numeric sequence of the active column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnData {
    name: String,
    values: Vec<f64>,
}

impl ColumnData {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
