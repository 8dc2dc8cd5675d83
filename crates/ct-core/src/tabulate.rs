/// Default tab stop used when aligning columns.
pub const DEFAULT_TAB_WIDTH: usize = 8;

/// One accumulated output row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Row {
    /// Emitted verbatim, never aligned.
    Line(String),
    /// Fields aligned to tab stops.
    Fields(Vec<String>),
}

/// Accumulates lines and tab-aligned rows for a generated source block.
///
/// Column widths are computed over every row when rendering, so a wide
/// field added late still shifts earlier rows.
///
/// # Example
/// ```
/// use ct_core::tabulate::Tabulator;
/// let mut tab = Tabulator::default();
/// tab.add_line("static int t[] = {");
/// tab.add_row(["", "{1,", "2},", "// One"]);
/// tab.add_row(["", "{1000000000,", "2},", "// Big"]);
/// tab.add_line("};");
/// let lines: Vec<String> = tab.lines().collect();
/// assert_eq!(lines[1], "\t{1,\t\t2},\t// One");
/// assert_eq!(lines[2], "\t{1000000000,\t2},\t// Big");
/// ```
#[derive(Clone, Debug)]
pub struct Tabulator {
    tab_width: usize,
    rows: Vec<Row>,
}

impl Default for Tabulator {
    fn default() -> Self {
        Self::new(DEFAULT_TAB_WIDTH)
    }
}

impl Tabulator {
    /// A tab width of 0 is treated as 1.
    #[must_use]
    pub fn new(tab_width: usize) -> Self {
        Self {
            tab_width: tab_width.max(1),
            rows: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Add a line that does not take part in column alignment.
    pub fn add_line(&mut self, line: impl Into<String>) {
        self.rows.push(Row::Line(line.into()));
    }

    /// Add a row whose fields are each placed in their own column.
    pub fn add_row<I, S>(&mut self, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows
            .push(Row::Fields(fields.into_iter().map(Into::into).collect()));
    }

    /// Add a blank line, unless nothing has been added yet.
    pub fn add_space(&mut self) {
        if !self.rows.is_empty() {
            self.rows.push(Row::Line(String::new()));
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rendered lines, in the order they were added.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        let widths = self.column_widths();
        self.rows.iter().map(move |row| match row {
            Row::Line(line) => line.clone(),
            Row::Fields(fields) => self.render_fields(fields, &widths),
        })
    }

    /// All lines, each terminated by `\n`.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in self.lines() {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    /// Widest field per column index, over all rows.
    fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = Vec::new();
        for row in &self.rows {
            let Row::Fields(fields) = row else {
                continue;
            };
            if fields.len() > widths.len() {
                widths.resize(fields.len(), 0);
            }
            for (width, field) in widths.iter_mut().zip(fields) {
                *width = (*width).max(field.chars().count());
            }
        }
        widths
    }

    fn render_fields(&self, fields: &[String], widths: &[usize]) -> String {
        let mut line = String::new();
        for (field, &width) in fields.iter().zip(widths) {
            let column_tabs = width / self.tab_width + 1;
            let field_tabs = field.chars().count() / self.tab_width;
            line.push_str(field);
            line.extend(std::iter::repeat_n('\t', column_tabs - field_tabs));
        }
        line.truncate(line.trim_end().len());
        line
    }
}
