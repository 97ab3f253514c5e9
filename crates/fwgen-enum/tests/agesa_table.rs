use fwgen_enum::entries::resolve_entries;
use fwgen_enum::{EnumEntry, EnumError, RenderOptions, compile, compile_table};

const AGESA_TP: &str = include_str!("fixtures/agesa_tp.h");

fn value_of(entries: &[EnumEntry], name: &str) -> u64 {
    entries
        .iter()
        .find(|e| e.name == name)
        .unwrap_or_else(|| panic!("missing entry {name}"))
        .value
}

fn entry_line_count(source: &str) -> usize {
    source
        .lines()
        .map(str::trim)
        .filter(|l| {
            !l.is_empty() && !l.starts_with("enum") && !l.starts_with('}') && !l.starts_with("//")
        })
        .count()
}

#[test]
fn test_row_count_matches_entry_lines() {
    let table = compile_table(AGESA_TP, &RenderOptions::default()).unwrap();
    assert_eq!(table.lines().count(), entry_line_count(AGESA_TP));
    assert_eq!(table.lines().count(), 206);
}

#[test]
fn test_auto_increment_invariant() {
    let entries = compile(AGESA_TP, &RenderOptions::default()).unwrap();
    let explicit = [
        "TpProcHtEntry",
        "TpProcMemSendMRS2",
        "StartNbTestPoints",
        "StartFchTestPoints",
        "TpIfAmdInitResetEntry",
        "EndAgesaTps",
    ];
    for pair in entries.windows(2) {
        if !explicit.contains(&pair[1].name.as_str()) {
            assert_eq!(pair[1].value, pair[0].value + 1, "{}", pair[1].name);
        }
    }
}

#[test]
fn test_explicit_assignment_resets_baseline() {
    let entries = compile(AGESA_TP, &RenderOptions::default()).unwrap();
    assert_eq!(value_of(&entries, "TpProcCpuAfterAllocateSsdtBuffer"), 0x6B);
    assert_eq!(value_of(&entries, "TpProcHtEntry"), 113);
    assert_eq!(value_of(&entries, "TpProcHtTopology"), 114);
    assert_eq!(value_of(&entries, "EndFchTestPoints"), 0xBD);
    assert_eq!(value_of(&entries, "TpPerfUnit"), 0xF8);
    assert_eq!(value_of(&entries, "EndAgesaTps"), 0xFF);
}

#[test]
fn test_rendered_hex_round_trips() {
    let options = RenderOptions::default();
    let entries = compile(AGESA_TP, &options).unwrap();
    let table = compile_table(AGESA_TP, &options).unwrap();

    for (entry, row) in entries.iter().zip(table.lines()) {
        let hex = row
            .strip_prefix("{0x")
            .and_then(|r| r.split_once(','))
            .map(|(h, _)| h)
            .unwrap();
        assert_eq!(u64::from_str_radix(hex, 16).unwrap(), entry.value);
        assert!(row.contains(&format!("\"{}\"}},", entry.name)));
    }
}

#[test]
fn test_reference_row_layout() {
    let table = compile_table(AGESA_TP, &RenderOptions::default()).unwrap();
    let row = table
        .lines()
        .find(|l| l.contains("\"TpProcMemBeforeMemDataInit\""))
        .unwrap();
    assert_eq!(
        row,
        format!(
            "{{0x01, \"TpProcMemBeforeMemDataInit\"}},{}///< 01 .. Memory structure initialization (Public interface)",
            " ".repeat(16)
        )
    );
}

#[test]
fn test_clean_annotations_layout() {
    let options = RenderOptions {
        clean_annotations: true,
        ..RenderOptions::default()
    };
    let table = compile_table(AGESA_TP, &options).unwrap();
    let row = table
        .lines()
        .find(|l| l.contains("\"TpProcMemBeforeMemDataInit\""))
        .unwrap();
    assert!(row.ends_with(" .. Memory structure initialization (Public interface)"));
    assert!(!row.contains("///<"));
}

#[test]
fn test_single_line_enum_resolves_but_has_no_annotations() {
    let source = "enum E { A, B, C = 0x10, D };";
    let resolved = resolve_entries(source).unwrap();
    let values: Vec<u64> = resolved.iter().map(|e| e.value).collect();
    assert_eq!(values, vec![0, 1, 16, 17]);

    // The line scan skips the `enum` line, so the merge cannot attribute A.
    let err = compile(source, &RenderOptions::default()).unwrap_err();
    assert_eq!(
        err,
        EnumError::MissingAnnotation {
            name: "A".to_string()
        }
    );
}

#[test]
fn test_last_entry_without_comma_is_missing_annotation() {
    let source = "\
enum E {
  A,   // first
  B    // no trailing comma
};
";
    let err = compile(source, &RenderOptions::default()).unwrap_err();
    assert_eq!(
        err,
        EnumError::MissingAnnotation {
            name: "B".to_string()
        }
    );
}

#[test]
fn test_entry_without_comment_renders_padded() {
    let source = "\
enum E {
  A,
  B = 0x71,   // explicit
};
";
    let entries = compile(source, &RenderOptions::default()).unwrap();
    assert_eq!(entries[0].annotation, "");
    let table = compile_table(source, &RenderOptions::default()).unwrap();
    let first = table.lines().next().unwrap();
    assert_eq!(first.len(), 53);
    assert!(table.lines().nth(1).unwrap().starts_with("{0x71, \"B\"},"));
}

#[test]
fn test_entries_serialize_to_json() {
    let source = "enum E {\n  A,  // a\n};\n";
    let entries = compile(source, &RenderOptions::default()).unwrap();
    let json = serde_json::to_value(&entries).unwrap();
    assert_eq!(json[0]["name"], "A");
    assert_eq!(json[0]["value"], 0);
    assert_eq!(json[0]["annotation"], "// a");
}

#[test]
fn test_commented_out_lines_do_not_override_annotations() {
    let source = "enum E {\n  A, // a\n  B, // b\n};\n/* old:\n  A, stale\n*/\n";
    let entries = compile(source, &RenderOptions::default()).unwrap();
    assert_eq!(entries[0].annotation, "// a");
    assert_eq!(entries[1].annotation, "// b");
}

#[test]
fn test_octal_looking_value_is_rejected() {
    let source = "enum E {\n  A = 010,  // ambiguous\n  B,\n};\n";
    let err = compile(source, &RenderOptions::default()).unwrap_err();
    assert!(matches!(err, EnumError::Parse { .. }));
}
