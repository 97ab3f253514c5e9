//! Postcode CSV records and their validation.

use crate::PostcodeError;
use std::fmt;
use std::str::FromStr;

/// Console family a code applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Console {
    All,
    Xop,
    Xos,
    Xox,
    Xss,
    Xsx,
}

/// Firmware component that emits a code. Declaration order is table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeType {
    Smc,
    Sp,
    Cpu,
    Os,
}

impl CodeType {
    pub const ALL: [CodeType; 4] = [CodeType::Smc, CodeType::Sp, CodeType::Cpu, CodeType::Os];

    pub fn as_str(self) -> &'static str {
        match self {
            CodeType::Smc => "SMC",
            CodeType::Sp => "SP",
            CodeType::Cpu => "CPU",
            CodeType::Os => "OS",
        }
    }
}

impl fmt::Display for CodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CodeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SMC" => Ok(CodeType::Smc),
            "SP" => Ok(CodeType::Sp),
            "CPU" => Ok(CodeType::Cpu),
            "OS" => Ok(CodeType::Os),
            other => Err(format!("unknown Type {:?}", other)),
        }
    }
}

impl FromStr for Console {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ALL" => Ok(Console::All),
            "XOP" => Ok(Console::Xop),
            "XOS" => Ok(Console::Xos),
            "XOX" => Ok(Console::Xox),
            "XSS" => Ok(Console::Xss),
            "XSX" => Ok(Console::Xsx),
            other => Err(format!("unknown Console {:?}", other)),
        }
    }
}

/// One validated CSV row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostcodeRow {
    pub console: Console,
    pub code_type: CodeType,
    pub code: u16,
    pub name: String,
    /// Emitted verbatim as the initializer's third field.
    pub is_error: String,
}

const REQUIRED_COLUMNS: [&str; 5] = ["Console", "Type", "Code", "Name", "IsError"];

/// Parse and validate a header-keyed postcode CSV document.
///
/// Fails on the first row that has a different field count than the header
/// (an unquoted comma in a description), an unknown console or type, or a
/// code that is not a `0x`-prefixed 16-bit hex number.
pub fn parse_rows(csv_text: &str) -> Result<Vec<PostcodeRow>, PostcodeError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(csv_text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| invalid(1, e.to_string()))?
        .clone();
    let mut columns = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, name) in columns.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| invalid(1, format!("missing column {name}")))?;
    }
    let [console_col, type_col, code_col, name_col, is_error_col] = columns;

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let fallback_line = i + 2;
        let record = record.map_err(|e| invalid(fallback_line, e.to_string()))?;
        let line = record
            .position()
            .map_or(fallback_line, |p| p.line() as usize);

        if record.len() != headers.len() {
            return Err(invalid(
                line,
                format!(
                    "expected {} columns, found {}; is the description quoted properly?",
                    headers.len(),
                    record.len()
                ),
            ));
        }
        let field = |col: usize| record.get(col).unwrap_or_default();

        let console = field(console_col).parse().map_err(|e| invalid(line, e))?;
        let code_type = field(type_col).parse().map_err(|e| invalid(line, e))?;
        let code = parse_code(field(code_col)).map_err(|e| invalid(line, e))?;

        rows.push(PostcodeRow {
            console,
            code_type,
            code,
            name: field(name_col).to_string(),
            is_error: field(is_error_col).to_string(),
        });
    }
    Ok(rows)
}

fn parse_code(text: &str) -> Result<u16, String> {
    let hex = text
        .strip_prefix("0x")
        .ok_or_else(|| format!("Code {:?} is not 0x-prefixed", text))?;
    u16::from_str_radix(hex, 16).map_err(|e| format!("Code {:?}: {}", text, e))
}

fn invalid(line: usize, message: impl Into<String>) -> PostcodeError {
    PostcodeError::RowValidation {
        line,
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Console,Type,Code,Name,IsError,Description\n";

    #[test]
    fn test_parse_valid_rows() {
        let csv_text = format!(
            "{HEADER}ALL,SMC,0x1A,FOO,0,\"does foo, then bar\"\nXSX,CPU,0xE001,FATAL_V12,1,\n"
        );
        let rows = parse_rows(&csv_text).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].code_type, CodeType::Smc);
        assert_eq!(rows[0].code, 0x1a);
        assert_eq!(rows[0].name, "FOO");
        assert_eq!(rows[0].is_error, "0");
        assert_eq!(rows[1].console, Console::Xsx);
        assert_eq!(rows[1].code, 0xe001);
    }

    #[test]
    fn test_unquoted_comma_fails() {
        let csv_text = format!("{HEADER}ALL,SMC,0x1A,FOO,0,does foo, then bar\n");
        let err = parse_rows(&csv_text).unwrap_err();
        match err {
            PostcodeError::RowValidation { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("quoted properly"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_console_fails() {
        let csv_text = format!("{HEADER}XB1,SMC,0x1A,FOO,0,\n");
        let err = parse_rows(&csv_text).unwrap_err();
        assert!(err.to_string().contains("unknown Console"));
    }

    #[test]
    fn test_unknown_type_fails() {
        let csv_text = format!("{HEADER}ALL,GPU,0x1A,FOO,0,\n");
        let err = parse_rows(&csv_text).unwrap_err();
        assert!(err.to_string().contains("unknown Type"));
    }

    #[test]
    fn test_code_without_prefix_fails() {
        let csv_text = format!("{HEADER}ALL,OS,1A,FOO,0,\n");
        let err = parse_rows(&csv_text).unwrap_err();
        assert!(err.to_string().contains("not 0x-prefixed"));
    }

    #[test]
    fn test_missing_column_fails() {
        let err = parse_rows("Console,Type,Code,Name\nALL,OS,0x1,A\n").unwrap_err();
        assert!(matches!(err, PostcodeError::RowValidation { line: 1, .. }));
    }

    #[test]
    fn test_code_type_order() {
        let names: Vec<&str> = CodeType::ALL.iter().map(|t| t.as_str()).collect();
        assert_eq!(names, vec!["SMC", "SP", "CPU", "OS"]);
    }
}
