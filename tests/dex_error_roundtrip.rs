//! O JSON de log é renderizado à mão (formatação estável); aqui ele é relido
//! com serde_json para garantir que continua JSON válido e fiel ao catálogo.

use std::collections::HashSet;

use serde_json::Value;

use ngn_dex_core::amm::error::DexError;
use ngn_dex_core::amm::error_catalog::DexErrorCode;

fn parse(err: &DexError) -> Value {
    let raw = err.to_log_json();
    serde_json::from_str(&raw).unwrap_or_else(|e| panic!("JSON inválido: {e}: {raw}"))
}

#[test]
fn json_shape_per_code() {
    for code in DexErrorCode::all() {
        let err = DexError::new(*code);
        let v = parse(&err);
        assert_eq!(v["code"], code.code());
        assert_eq!(v["title"], code.title());
        assert_eq!(v["message"], code.message_en());
        assert!(v["context"].is_object());
        assert!(v["context"].as_object().unwrap().is_empty());
    }
}

#[test]
fn context_survives_roundtrip() {
    let err = DexError::new(DexErrorCode::SlippageExceeded)
        .with_context("amount_out", 9_871u128)
        .with_context("min_amount_out", 9_999u128);
    let v = parse(&err);
    let ctx = v["context"].as_object().unwrap();
    assert_eq!(ctx["amount_out"], "9871");
    assert_eq!(ctx["min_amount_out"], "9999");
}

#[test]
fn control_chars_are_escaped() {
    let err = DexError::new(DexErrorCode::TransferFailed)
        .with_context("cause", "line1\"quoted\\back\u{1}");
    let v = parse(&err);
    // sanitização já trocou \n/\t; o resto escapa sem quebrar o parse
    let cause = v["context"]["cause"].as_str().unwrap();
    assert!(cause.contains("\"quoted"));
    assert!(cause.contains('\\'));
}

#[test]
fn all_codes_seen() {
    let mut seen = HashSet::new();
    for code in DexErrorCode::all() {
        let v = parse(&DexError::new(*code));
        seen.insert(v["code"].as_str().unwrap().to_string());
    }
    assert_eq!(seen.len(), 13);
}
