//! Render validated rows as C array initializers.

use crate::rows::{CodeType, PostcodeRow};

/// Render the table for one code type:
///
/// ```text
///
/// static PostCode SMCCodes[] = {
/// 	{0x001a, "FOO", 0}
/// };
/// ```
pub fn render_table(code_type: CodeType, rows: &[PostcodeRow]) -> String {
    let entries: Vec<String> = rows
        .iter()
        .filter(|r| r.code_type == code_type)
        .map(|r| format!("\t{{{:#06x}, \"{}\", {}}}", r.code, r.name, r.is_error))
        .collect();
    format!(
        "\nstatic PostCode {}Codes[] = {{\n{}\n}};\n",
        code_type,
        entries.join(",\n")
    )
}

/// Render every code type's table, SMC first, keeping CSV order within a table.
pub fn render_tables(rows: &[PostcodeRow]) -> String {
    CodeType::ALL
        .iter()
        .map(|&t| render_table(t, rows))
        .collect()
}
