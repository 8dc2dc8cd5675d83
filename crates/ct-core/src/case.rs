use crate::names::title_case;
use crate::tabulate::Tabulator;
use crate::unicode_data::UnicodeData;

/// Case conversions for a single codepoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaseEntry {
    pub codepoint: u32,
    pub upper: Option<u32>,
    pub lower: Option<u32>,
    /// Titlecase mapping, falling back to the uppercase one.
    pub title: Option<u32>,
    pub name: String,
}

/// Collect every codepoint with at least one case mapping, in ascending
/// codepoint order.
///
/// # Example
/// ```
/// use ct_core::case::build_case_table;
/// use ct_core::unicode_data::parse_unicode_data;
/// let unicode = parse_unicode_data(
///     "0061;LATIN SMALL LETTER A;Ll;0;L;;;;;N;;;0041;;\n".as_bytes(),
/// ).unwrap();
/// let table = build_case_table(&unicode);
/// assert_eq!(table[0].title, Some(0x41));
/// ```
#[must_use]
pub fn build_case_table(unicode: &UnicodeData) -> Vec<CaseEntry> {
    let mut entries: Vec<CaseEntry> = unicode
        .iter()
        .filter(|c| c.has_case_mapping())
        .map(|c| CaseEntry {
            codepoint: c.codepoint,
            upper: c.upper_case,
            lower: c.lower_case,
            title: c.title_case.or(c.upper_case),
            name: c.name.clone().unwrap_or_default(),
        })
        .collect();

    entries.sort_by_key(|e| e.codepoint);
    entries
}

/// Render the `struct case_character` array into `tab`.
///
/// `unicode_version` is quoted in the header comment.
pub fn write_case_table(
    tab: &mut Tabulator,
    unicode: &UnicodeData,
    struct_name: &str,
    unicode_version: &str,
) {
    let entries = build_case_table(unicode);

    tab.add_space();
    tab.add_line("/**");
    tab.add_line(" * The list of known character case conversions.");
    tab.add_line(" *");
    tab.add_line(" * The order of this table is by ascending unicode point, with -1 at");
    tab.add_line(" * the end as an end stop.");
    tab.add_line(" *");
    tab.add_line(format!(
        " * The data in this table was derived from UnicodeData {unicode_version}"
    ));
    tab.add_line(" */");
    tab.add_space();
    tab.add_line(format!("static struct case_character {struct_name}[] = {{"));

    for entry in &entries {
        tab.add_row([
            String::new(),
            format!("{{{},", hex(Some(entry.codepoint))),
            format!("{},", hex(entry.upper)),
            format!("{},", hex(entry.lower)),
            format!("{}}},", hex(entry.title)),
            format!("// {}", title_case(&entry.name)),
        ]);
    }

    tab.add_row(["", "{-1,", "0x0,", "0x0,", "0x0}", "// End of Table"]);
    tab.add_line("};");

    log::info!("Table de conversion de casse générée ({} entrées).", entries.len());
}

/// Lower-case hex literal, absent values as `0x0`.
fn hex(value: Option<u32>) -> String {
    format!("{:#x}", value.unwrap_or(0))
}
