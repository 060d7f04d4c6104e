//! Models shared by the writer: cell styles, cell values, options and reports.

////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Cell style, independent of the xlsx backend. Unset fields inherit on merge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecCellFormat {
    pub font_name: Option<String>,
    /// Points.
    pub font_size: Option<u16>,
    pub bold: Option<bool>,
    /// `left`, `center` or `right`.
    pub align: Option<String>,
    /// Thin border on all four sides.
    pub if_border_thin: Option<bool>,
    pub border_color: Option<String>,
    pub num_format: Option<String>,
    pub bg_color: Option<String>,
    pub font_color: Option<String>,
}

impl SpecCellFormat {
    /// Overlay `patch` onto `self`; set fields of `patch` win.
    pub fn merge(&self, patch: &SpecCellFormat) -> SpecCellFormat {
        let pick = |a: &Option<String>, b: &Option<String>| a.clone().or_else(|| b.clone());
        SpecCellFormat {
            font_name: pick(&patch.font_name, &self.font_name),
            font_size: patch.font_size.or(self.font_size),
            bold: patch.bold.or(self.bold),
            align: pick(&patch.align, &self.align),
            if_border_thin: patch.if_border_thin.or(self.if_border_thin),
            border_color: pick(&patch.border_color, &self.border_color),
            num_format: pick(&patch.num_format, &self.num_format),
            bg_color: pick(&patch.bg_color, &self.bg_color),
            font_color: pick(&patch.font_color, &self.font_color),
        }
    }
}

/// Named format presets consumed by [`crate::writer::XlsxWriter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecXlsxFormats {
    /// Text body cells.
    pub text: SpecCellFormat,
    /// Integer body cells.
    pub integer: SpecCellFormat,
    /// Decimal body cells.
    pub decimal: SpecCellFormat,
    /// Header row cells.
    pub header: SpecCellFormat,
    /// Patch merged onto body cells of striped rows.
    pub stripe: SpecCellFormat,
}

/// A cell as the writer sees it.
///
/// `None` is the missing-data sentinel; empty text is kept distinct so callers
/// can tell "null" apart from "empty string".
#[derive(Debug, Clone, PartialEq)]
pub enum EnumCellValue {
    /// Missing/blank value.
    None,
    /// Text value.
    String(String),
    /// Numeric value.
    Number(f64),
}

impl EnumCellValue {
    /// `true` unless the value is missing or empty text.
    pub fn is_present(&self) -> bool {
        match self {
            Self::None => false,
            Self::String(s) => !s.is_empty(),
            Self::Number(n) => !n.is_nan(),
        }
    }

    /// Numeric view of the value; text is parsed after trimming.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::None => None,
            Self::String(s) => s.trim().parse::<f64>().ok(),
            Self::Number(n) => Some(*n),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region WriteOptions

/// Column width estimation from header and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecAutofitCellsPolicy {
    pub if_enabled: bool,
    /// Body rows sampled per column; `None` scans every row.
    pub height_body_inferred_max: Option<usize>,
    pub width_cell_min: usize,
    pub width_cell_max: usize,
    pub width_cell_padding: usize,
}

impl Default for SpecAutofitCellsPolicy {
    fn default() -> Self {
        Self {
            if_enabled: true,
            height_body_inferred_max: Some(20_000),
            width_cell_min: 8,
            width_cell_max: 50,
            width_cell_padding: 2,
        }
    }
}

/// Writer-wide typing rules.
///
/// Missing values are always written as blank cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecXlsxWriteOptions {
    /// Write numeric-dtype columns as numbers rather than text.
    pub infer_numeric_cols: bool,
    /// Give integer-dtype columns the integer number format.
    pub infer_integer_cols: bool,
}

impl Default for SpecXlsxWriteOptions {
    fn default() -> Self {
        Self {
            infer_numeric_cols: true,
            infer_integer_cols: true,
        }
    }
}

/// Per-sheet call options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecXlsxSheetWriteOptions {
    /// Columns forced to integer format, by name.
    pub cols_integer: Option<Vec<String>>,
    /// Freeze the header row.
    pub if_freeze_header: bool,
    /// Shade alternate body rows with the stripe patch.
    pub if_zebra_rows: bool,
    /// Column autofit policy.
    pub policy_autofit: SpecAutofitCellsPolicy,
}

impl Default for SpecXlsxSheetWriteOptions {
    fn default() -> Self {
        Self {
            cols_integer: None,
            if_freeze_header: true,
            if_zebra_rows: true,
            policy_autofit: SpecAutofitCellsPolicy::default(),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportSpecification

/// One worksheet produced from a table: the source row and column ranges
/// (half-open) it holds, under its final workbook name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSheetSlice {
    pub sheet_name: String,
    pub row_start_inclusive: usize,
    pub row_end_exclusive: usize,
    pub col_start_inclusive: usize,
    pub col_end_exclusive: usize,
}

impl SpecSheetSlice {
    /// Worksheet rows written for this slice, header row included.
    pub fn height_written(&self) -> usize {
        self.row_end_exclusive - self.row_start_inclusive + 1
    }

    /// Worksheet columns written for this slice.
    pub fn width_written(&self) -> usize {
        self.col_end_exclusive - self.col_start_inclusive
    }
}

/// Outcome of writing one logical table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecXlsxReport {
    /// Logical (requested) sheet name.
    pub sheet_name_requested: String,
    /// Worksheets produced, in workbook order.
    pub sheets: Vec<SpecSheetSlice>,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecXlsxReport {
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
