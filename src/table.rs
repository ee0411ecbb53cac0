//! Solve results: one row per variable of the active equations

use std::fmt;

use serde::Serialize;

/// Propagated error of one variable
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub var: String,
    pub value: f64,
    /// Propagated error for solved rows, the input error otherwise
    pub error: f64,
    /// `100 * |error / value|`, NaN when not finite
    pub pct_error: f64,
    /// True when the error was solved for
    pub is_calc: bool,
    /// 1-based pipeline stage, `None` outside a pipeline
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<usize>,
}

impl ResultRow {
    pub fn new(var: impl Into<String>, value: f64, error: f64, is_calc: bool) -> Self {
        Self {
            var: var.into(),
            value,
            error,
            pct_error: percent_error(error, value),
            is_calc,
            stage: None,
        }
    }
}

/// `100 * |error / value|` with non-finite results mapped to NaN
pub fn percent_error(error: f64, value: f64) -> f64 {
    let pct = 100.0 * (error / value).abs();
    if pct.is_finite() { pct } else { f64::NAN }
}

/// Rows ordered by stage, then variable name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultTable {
    rows: Vec<ResultRow>,
}

impl ResultTable {
    pub fn new(mut rows: Vec<ResultRow>) -> Self {
        rows.sort_by(|a, b| a.stage.cmp(&b.stage).then_with(|| a.var.cmp(&b.var)));
        Self { rows }
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResultRow> {
        self.rows.iter()
    }

    /// Row of `var`; in a pipeline table, the row from the latest stage
    pub fn get(&self, var: &str) -> Option<&ResultRow> {
        self.rows.iter().rev().find(|r| r.var == var)
    }

    /// Row of `var` from a given 1-based pipeline stage
    pub fn get_in_stage(&self, stage: usize, var: &str) -> Option<&ResultRow> {
        self.rows
            .iter()
            .find(|r| r.stage == Some(stage) && r.var == var)
    }

    /// Rows whose error was solved for
    pub fn calculated(&self) -> impl Iterator<Item = &ResultRow> {
        self.rows.iter().filter(|r| r.is_calc)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Tag every row with a 1-based pipeline stage
    pub(crate) fn with_stage(mut self, stage: usize) -> Self {
        for row in &mut self.rows {
            row.stage = Some(stage);
        }
        self
    }

    /// Concatenate stage tables, keeping stage order
    pub(crate) fn concat(tables: Vec<ResultTable>) -> Self {
        Self::new(tables.into_iter().flat_map(|t| t.rows).collect())
    }

    /// JSON array of rows; NaN percent errors serialize as `null`
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl<'a> IntoIterator for &'a ResultTable {
    type Item = &'a ResultRow;
    type IntoIter = std::slice::Iter<'a, ResultRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl fmt::Display for ResultTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let staged = self.rows.iter().any(|r| r.stage.is_some());
        let width = self
            .rows
            .iter()
            .map(|r| r.var.len())
            .max()
            .unwrap_or(0)
            .max("var".len());

        if staged {
            write!(f, "{:>5}  ", "stage")?;
        }
        writeln!(
            f,
            "{:<width$}  {:>14}  {:>14}  {:>10}  {:>7}",
            "var",
            "value",
            "error",
            "pct_error",
            "is_calc",
            width = width
        )?;
        for row in &self.rows {
            if staged {
                match row.stage {
                    Some(stage) => write!(f, "{:>5}  ", stage)?,
                    None => write!(f, "{:>5}  ", "")?,
                }
            }
            writeln!(
                f,
                "{:<width$}  {:>14.6}  {:>14.6}  {:>10.4}  {:>7}",
                row.var,
                row.value,
                row.error,
                row.pct_error,
                row.is_calc,
                width = width
            )?;
        }
        Ok(())
    }
}
