// src/services/part_rules.rs
//
// Regras puras do cadastro de peças: formatos, unicidade, sequência SAP,
// validação de importação CSV e detecção de duplicados. Nenhuma função aqui
// toca o banco; todas operam sobre um snapshot da coleção.

use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::parts::{DuplicateGroup, ImportReport, Part, PartPayload, ValidImportRow};

// SAP: '7' seguido de exatamente 6 dígitos.
static SAP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^7\d{6}$").unwrap());

// Referência interna: 2-4 letras maiúsculas + espaço opcional + 3-4 dígitos.
static INTERNAL_REF_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{2,4} ?\d{3,4}$").unwrap());

// Rack: vazio ou exatamente 2 dígitos.
static RACK_NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{2}$").unwrap());

// Nível: vazio ou uma letra A-D.
static RACK_LEVEL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[ABCDabcd]$").unwrap());

pub fn validate_sap(value: &str) -> bool {
    SAP_RE.is_match(value)
}

pub fn validate_internal_ref(value: &str) -> bool {
    INTERNAL_REF_RE.is_match(&value.to_uppercase())
}

pub fn validate_rack_number(value: &str) -> bool {
    value.is_empty() || RACK_NUMBER_RE.is_match(value)
}

pub fn validate_rack_level(value: &str) -> bool {
    value.is_empty() || RACK_LEVEL_RE.is_match(value)
}

// Forma canônica da referência interna para comparação de unicidade
// (caso e espaço não distinguem).
fn normalize_ref(value: &str) -> String {
    value.to_uppercase().replace(' ', "")
}

// Forma canônica do nome (aparado, sem distinção de caso).
fn normalize_name(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Próximo número SAP da sequência: maior SAP conforme ao formato + 1,
/// com zeros à esquerda até 7 dígitos; "7000001" quando não há nenhum.
/// Valores fora do formato são ignorados no cálculo do máximo.
///
/// Deve ser recalculado a cada mutação da coleção — nunca cacheado.
pub fn next_sap_number(parts: &[Part]) -> String {
    let max = parts
        .iter()
        .filter(|p| validate_sap(&p.sap_number))
        .filter_map(|p| p.sap_number.parse::<u32>().ok())
        .max();

    match max {
        Some(n) => format!("{:07}", n + 1),
        None => "7000001".to_string(),
    }
}

fn incomplete(field: &str) -> AppError {
    // Presença de campo obrigatório falhou: mensagem genérica de formulário
    // incompleto, como na entrada interativa.
    AppError::FieldValidation {
        field: field.to_string(),
        message: "Formulário incompleto: preencha todos os campos obrigatórios.".to_string(),
    }
}

fn invalid(field: &str, message: &str) -> AppError {
    AppError::FieldValidation {
        field: field.to_string(),
        message: message.to_string(),
    }
}

/// Cadeia ordenada de validação de cadastro/edição. A ordem é parte do
/// contrato (mensagens determinísticas); a primeira regra que falha vence e
/// a cadeia é interrompida.
///
/// `current` é a peça sendo editada (None num cadastro novo): a própria
/// peça não conta contra as regras de unicidade, e o SAP só passa pela
/// checagem de sequência quando é novo ou foi alterado.
pub fn validate_part(
    payload: &PartPayload,
    existing: &[Part],
    current: Option<&Part>,
) -> Result<(), AppError> {
    let self_id = current.map(|p| p.id);
    let others = || existing.iter().filter(|p| Some(p.id) != self_id);

    // 1. Presença dos campos obrigatórios
    if payload.sap_number.trim().is_empty() {
        return Err(incomplete("sapNumber"));
    }
    if payload.internal_ref.trim().is_empty() {
        return Err(incomplete("internalRef"));
    }
    if payload.name.trim().is_empty() {
        return Err(incomplete("name"));
    }
    if payload.category.trim().is_empty() {
        return Err(incomplete("category"));
    }

    // 2. Formato do SAP
    if !validate_sap(&payload.sap_number) {
        return Err(invalid(
            "sapNumber",
            "O número SAP deve ser '7' seguido de exatamente 6 dígitos.",
        ));
    }

    // 3. Unicidade do SAP
    if others().any(|p| p.sap_number == payload.sap_number) {
        return Err(invalid("sapNumber", "Este número SAP já está cadastrado."));
    }

    // 4. Sequência do SAP (bloqueio recuperável: force sobrepõe)
    let sap_changed = current.map(|p| p.sap_number != payload.sap_number).unwrap_or(true);
    if sap_changed && !payload.force {
        let expected = next_sap_number(existing);
        if payload.sap_number != expected {
            return Err(AppError::SapSequenceMismatch {
                entered: payload.sap_number.clone(),
                expected,
            });
        }
    }

    // 5. Formato da referência interna
    if !validate_internal_ref(&payload.internal_ref) {
        return Err(invalid(
            "internalRef",
            "A referência interna deve ter 2-4 letras seguidas de 3-4 dígitos (espaço opcional).",
        ));
    }

    // 6. Unicidade da referência interna (sem distinção de caso/espaço)
    let ref_key = normalize_ref(&payload.internal_ref);
    if others().any(|p| normalize_ref(&p.internal_ref) == ref_key) {
        return Err(invalid("internalRef", "Esta referência interna já está cadastrada."));
    }

    // 7. Unicidade do nome (aparado, sem distinção de caso)
    let name_key = normalize_name(&payload.name);
    if others().any(|p| normalize_name(&p.name) == name_key) {
        return Err(invalid("name", "Já existe uma peça com este nome."));
    }

    // 8. Formato do rack number
    if !validate_rack_number(&payload.rack_number) {
        return Err(invalid("rackNumber", "O rack number deve ter exatamente 2 dígitos."));
    }

    // 9. Formato do rack level
    if !validate_rack_level(&payload.rack_level) {
        return Err(invalid("rackLevel", "O rack level deve ser A, B, C ou D."));
    }

    // 10. Faixa do nível de segurança
    if payload.safety_level.unwrap_or(0) < 0 {
        return Err(invalid("safetyLevel", "O nível de segurança não pode ser negativo."));
    }

    // 11. Faixa da quantidade de reposição
    if payload.replenish_qty.unwrap_or(0) < 0 {
        return Err(invalid("replenishQty", "A quantidade de reposição não pode ser negativa."));
    }

    if payload.current_stock.unwrap_or(0) < 0 {
        return Err(invalid("currentStock", "O estoque atual não pode ser negativo."));
    }

    Ok(())
}

// ---
// Importação CSV
// ---

const REQUIRED_COLUMNS: [&str; 6] = [
    "sapnumber",
    "internalref",
    "name",
    "category",
    "safetylevel",
    "replenishqty",
];

/// Valida um arquivo CSV de importação inteiro, sem persistir nada.
///
/// Cabeçalho separado por vírgula, nomes de coluna sem distinção de caso.
/// Falta de coluna obrigatória aborta com um único erro e nenhuma linha.
/// Cada linha de dados passa pelas mesmas regras da entrada interativa,
/// mais detecção de duplicados contra a coleção existente e contra as
/// linhas já aceitas do próprio arquivo (a primeira ocorrência vence).
pub fn validate_import(raw_csv: &str, existing: &[Part]) -> ImportReport {
    let mut report = ImportReport::default();

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(raw_csv.as_bytes());

    let headers = match reader.headers() {
        Ok(h) => h.clone(),
        Err(e) => {
            report.errors.push(format!("Arquivo CSV ilegível: {}", e));
            return report;
        }
    };

    // Índice por nome de coluna normalizado.
    let index_of = |name: &str| -> Option<usize> {
        headers
            .iter()
            .position(|h| h.trim().to_lowercase() == name)
    };

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| index_of(c).is_none())
        .collect();

    if !missing.is_empty() {
        report.errors.push(format!(
            "Colunas obrigatórias ausentes no cabeçalho: {}",
            missing.join(", ")
        ));
        return report;
    }

    let col_sap = index_of("sapnumber").unwrap();
    let col_ref = index_of("internalref").unwrap();
    let col_name = index_of("name").unwrap();
    let col_category = index_of("category").unwrap();
    let col_safety = index_of("safetylevel").unwrap();
    let col_replenish = index_of("replenishqty").unwrap();
    // Colunas opcionais
    let col_rack_number = index_of("racknumber");
    let col_rack_level = index_of("racklevel");
    let col_stock = index_of("currentstock");

    // Chaves já cadastradas na coleção persistida.
    let existing_saps: Vec<&str> = existing.iter().map(|p| p.sap_number.as_str()).collect();
    let existing_refs: Vec<String> = existing.iter().map(|p| normalize_ref(&p.internal_ref)).collect();
    let existing_names: Vec<String> = existing.iter().map(|p| normalize_name(&p.name)).collect();

    // Chaves das linhas já aceitas neste arquivo.
    let mut seen_saps: Vec<String> = Vec::new();
    let mut seen_refs: Vec<String> = Vec::new();
    let mut seen_names: Vec<String> = Vec::new();

    for (i, record) in reader.records().enumerate() {
        // Linha 1 é o cabeçalho; dados começam na 2.
        let line = i + 2;

        let record = match record {
            Ok(r) => r,
            Err(e) => {
                report.errors.push(format!("Linha {}: registro ilegível ({})", line, e));
                continue;
            }
        };

        let field = |idx: usize| record.get(idx).unwrap_or("").trim().to_string();

        let sap_number = field(col_sap);
        let internal_ref = field(col_ref);
        let name = field(col_name);
        let category = field(col_category);
        let rack_number = col_rack_number.map(|idx| field(idx)).unwrap_or_default();
        let rack_level = col_rack_level
            .map(|idx| field(idx))
            .unwrap_or_default()
            .to_uppercase();

        let mut row_errors: Vec<String> = Vec::new();

        if sap_number.is_empty() || internal_ref.is_empty() || name.is_empty() || category.is_empty() {
            row_errors.push(format!("Linha {}: campos obrigatórios em branco", line));
        }

        if !sap_number.is_empty() && !validate_sap(&sap_number) {
            row_errors.push(format!("Linha {}: número SAP '{}' inválido", line, sap_number));
        }
        if !internal_ref.is_empty() && !validate_internal_ref(&internal_ref) {
            row_errors.push(format!(
                "Linha {}: referência interna '{}' inválida",
                line, internal_ref
            ));
        }
        if !validate_rack_number(&rack_number) {
            row_errors.push(format!("Linha {}: rack number '{}' inválido", line, rack_number));
        }
        if !validate_rack_level(&rack_level) {
            row_errors.push(format!("Linha {}: rack level '{}' inválido", line, rack_level));
        }

        let parse_qty = |raw: String, label: &str, errors: &mut Vec<String>| -> i64 {
            if raw.is_empty() {
                return 0;
            }
            match raw.parse::<i64>() {
                Ok(v) if v >= 0 => v,
                _ => {
                    errors.push(format!("Linha {}: {} '{}' deve ser um inteiro >= 0", line, label, raw));
                    0
                }
            }
        };

        let safety_level = parse_qty(field(col_safety), "safetylevel", &mut row_errors);
        let replenish_qty = parse_qty(field(col_replenish), "replenishqty", &mut row_errors);
        let current_stock = col_stock
            .map(|idx| parse_qty(field(idx), "currentstock", &mut row_errors))
            .unwrap_or(0);

        // Duplicados: contra a coleção existente e contra o próprio arquivo.
        let ref_key = normalize_ref(&internal_ref);
        let name_key = normalize_name(&name);

        if existing_saps.contains(&sap_number.as_str()) {
            row_errors.push(format!(
                "Linha {}: número SAP '{}' já cadastrado",
                line, sap_number
            ));
        } else if seen_saps.contains(&sap_number) {
            row_errors.push(format!(
                "Linha {}: número SAP '{}' duplicado dentro do arquivo",
                line, sap_number
            ));
        }

        if !ref_key.is_empty() {
            if existing_refs.contains(&ref_key) {
                row_errors.push(format!(
                    "Linha {}: referência interna '{}' já cadastrada",
                    line, internal_ref
                ));
            } else if seen_refs.contains(&ref_key) {
                row_errors.push(format!(
                    "Linha {}: referência interna '{}' duplicada dentro do arquivo",
                    line, internal_ref
                ));
            }
        }

        if !name_key.is_empty() {
            if existing_names.contains(&name_key) {
                row_errors.push(format!("Linha {}: nome '{}' já cadastrado", line, name));
            } else if seen_names.contains(&name_key) {
                row_errors.push(format!(
                    "Linha {}: nome '{}' duplicado dentro do arquivo",
                    line, name
                ));
            }
        }

        if row_errors.is_empty() {
            seen_saps.push(sap_number.clone());
            seen_refs.push(ref_key);
            seen_names.push(name_key);
            report.rows.push(ValidImportRow {
                sap_number,
                internal_ref,
                name,
                category,
                rack_number,
                rack_level,
                safety_level,
                replenish_qty,
                current_stock,
            });
        } else {
            report.errors.append(&mut row_errors);
        }
    }

    report
}

// ---
// Detecção e limpeza de duplicados
// ---

/// Agrupa peças que colidem no número SAP. `ids[0]` é sempre a primeira
/// vista na ordem da coleção — a que a limpeza mantém.
pub fn find_duplicates(parts: &[Part]) -> Vec<DuplicateGroup> {
    let mut groups: Vec<DuplicateGroup> = Vec::new();

    for part in parts {
        match groups.iter_mut().find(|g| g.sap_number == part.sap_number) {
            Some(group) => {
                group.count += 1;
                group.ids.push(part.id);
            }
            None => groups.push(DuplicateGroup {
                sap_number: part.sap_number.clone(),
                name: part.name.clone(),
                count: 1,
                ids: vec![part.id],
            }),
        }
    }

    groups.retain(|g| g.count > 1);
    groups
}

/// Conjunto mínimo de remoção: todos os ids de cada grupo exceto o primeiro.
pub fn plan_deletions(groups: &[DuplicateGroup]) -> Vec<Uuid> {
    groups
        .iter()
        .flat_map(|g| g.ids.iter().skip(1).copied())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn part(sap: &str, internal_ref: &str, name: &str) -> Part {
        Part {
            id: Uuid::new_v4(),
            sap_number: sap.into(),
            internal_ref: internal_ref.into(),
            name: name.into(),
            category: "SP-BEARING".into(),
            rack_number: "01".into(),
            rack_level: "A".into(),
            safety_level: Some(0),
            replenish_qty: Some(0),
            current_stock: Some(0),
            min_stock_level: None,
            max_stock_level: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn payload(sap: &str, internal_ref: &str, name: &str) -> PartPayload {
        PartPayload {
            sap_number: sap.into(),
            internal_ref: internal_ref.into(),
            name: name.into(),
            category: "SP-BEARING".into(),
            rack_number: "".into(),
            rack_level: "".into(),
            safety_level: None,
            replenish_qty: None,
            current_stock: None,
            force: false,
        }
    }

    // --- Formatos ---

    #[test]
    fn sap_format_is_seven_then_six_digits() {
        assert!(validate_sap("7000001"));
        assert!(validate_sap("7999999"));
        assert!(!validate_sap("8000001"));
        assert!(!validate_sap("700001"));
        assert!(!validate_sap("70000011"));
        assert!(!validate_sap("ABC"));
    }

    #[test]
    fn internal_ref_format() {
        assert!(validate_internal_ref("AB123"));
        assert!(validate_internal_ref("ABCD1234"));
        assert!(validate_internal_ref("AB 1234"));
        assert!(validate_internal_ref("ab 1234")); // caso não distingue
        assert!(!validate_internal_ref("A123"));
        assert!(!validate_internal_ref("ABCDE123"));
        assert!(!validate_internal_ref("AB12"));
    }

    #[test]
    fn rack_fields_allow_empty() {
        assert!(validate_rack_number(""));
        assert!(validate_rack_number("03"));
        assert!(!validate_rack_number("3"));
        assert!(!validate_rack_number("123"));

        assert!(validate_rack_level(""));
        assert!(validate_rack_level("B"));
        assert!(validate_rack_level("d"));
        assert!(!validate_rack_level("E"));
        assert!(!validate_rack_level("AB"));
    }

    // --- Sequência SAP ---

    #[test]
    fn next_sap_starts_the_sequence_when_empty() {
        assert_eq!(next_sap_number(&[]), "7000001");
    }

    #[test]
    fn next_sap_is_max_plus_one() {
        let parts = vec![part("7000042", "AB123", "a"), part("7000005", "CD456", "b")];
        assert_eq!(next_sap_number(&parts), "7000043");
    }

    #[test]
    fn next_sap_ignores_non_conforming_values() {
        let parts = vec![part("ABC", "AB123", "a"), part("7000002", "CD456", "b")];
        assert_eq!(next_sap_number(&parts), "7000003");

        let only_bad = vec![part("ABC", "AB123", "a")];
        assert_eq!(next_sap_number(&only_bad), "7000001");
    }

    // --- Cadeia ordenada ---

    #[test]
    fn missing_required_field_reports_incomplete_form_first() {
        let existing = vec![part("9999999", "AB123", "x")];
        // SAP em branco E formato inválido do ref: a presença vem primeiro.
        let mut p = payload("", "!!!", "");
        p.name = "".into();
        let err = validate_part(&p, &existing, None).unwrap_err();
        match err {
            AppError::FieldValidation { field, message } => {
                assert_eq!(field, "sapNumber");
                assert!(message.contains("incompleto"));
            }
            other => panic!("esperava FieldValidation, veio {:?}", other),
        }
    }

    #[test]
    fn sap_uniqueness_comes_before_sequence() {
        let existing = vec![part("7000001", "AB123", "x")];
        let p = payload("7000001", "CD456", "y");
        let err = validate_part(&p, &existing, None).unwrap_err();
        match err {
            AppError::FieldValidation { field, .. } => assert_eq!(field, "sapNumber"),
            other => panic!("esperava unicidade do SAP, veio {:?}", other),
        }
    }

    #[test]
    fn out_of_sequence_sap_is_a_recoverable_conflict() {
        let existing = vec![part("7000001", "AB123", "x")];
        let p = payload("7000009", "CD456", "y");
        let err = validate_part(&p, &existing, None).unwrap_err();
        match err {
            AppError::SapSequenceMismatch { entered, expected } => {
                assert_eq!(entered, "7000009");
                assert_eq!(expected, "7000002");
            }
            other => panic!("esperava SapSequenceMismatch, veio {:?}", other),
        }

        // force sobrepõe o bloqueio e o resto da cadeia segue valendo.
        let mut forced = payload("7000009", "CD456", "y");
        forced.force = true;
        assert!(validate_part(&forced, &existing, None).is_ok());
    }

    #[test]
    fn internal_ref_uniqueness_ignores_case_and_space() {
        let existing = vec![part("7000001", "AB 123", "x")];
        let mut p = payload("7000002", "ab123", "y");
        p.force = false;
        let err = validate_part(&p, &existing, None).unwrap_err();
        match err {
            AppError::FieldValidation { field, .. } => assert_eq!(field, "internalRef"),
            other => panic!("esperava unicidade do ref, veio {:?}", other),
        }
    }

    #[test]
    fn name_uniqueness_ignores_case_and_trim() {
        let existing = vec![part("7000001", "AB123", "Bearing 6204")];
        let p = payload("7000002", "CD456", "  bearing 6204 ");
        let err = validate_part(&p, &existing, None).unwrap_err();
        match err {
            AppError::FieldValidation { field, .. } => assert_eq!(field, "name"),
            other => panic!("esperava unicidade do nome, veio {:?}", other),
        }
    }

    #[test]
    fn editing_keeps_own_sap_without_sequence_check() {
        let existing = vec![part("7000001", "AB123", "x"), part("7000002", "CD456", "y")];
        let current = &existing[0];
        // Mesmo SAP da própria peça: sem conflito de unicidade nem sequência.
        let p = payload("7000001", "AB123", "x");
        assert!(validate_part(&p, &existing, Some(current)).is_ok());
    }

    #[test]
    fn negative_quantities_are_rejected_in_order() {
        let p = {
            let mut p = payload("7000001", "AB123", "x");
            p.safety_level = Some(-1);
            p.replenish_qty = Some(-1);
            p
        };
        let err = validate_part(&p, &[], None).unwrap_err();
        match err {
            AppError::FieldValidation { field, .. } => assert_eq!(field, "safetyLevel"),
            other => panic!("esperava safetyLevel, veio {:?}", other),
        }
    }

    // --- CSV ---

    const HEADER: &str = "sapnumber,internalref,name,category,safetylevel,replenishqty";

    #[test]
    fn missing_header_column_aborts_with_single_error() {
        let csv = "sapnumber,internalref,name,category,replenishqty\n7000001,AB123,Bearing,SP,10\n";
        let report = validate_import(csv, &[]);
        assert!(report.rows.is_empty());
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("safetylevel"));
    }

    #[test]
    fn header_matching_is_case_insensitive() {
        let csv = "SapNumber,InternalRef,Name,Category,SafetyLevel,ReplenishQty\n\
                   7000001,AB123,Bearing,SP,5,10\n";
        let report = validate_import(csv, &[]);
        assert!(report.errors.is_empty(), "{:?}", report.errors);
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].sap_number, "7000001");
        assert_eq!(report.rows[0].safety_level, 5);
    }

    #[test]
    fn duplicate_sap_within_file_keeps_first_occurrence() {
        let csv = format!(
            "{}\n7000001,AB123,Bearing,SP,5,10\n7000001,CD456,Belt,SP,5,10\n",
            HEADER
        );
        let report = validate_import(&csv, &[]);
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].internal_ref, "AB123");
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("duplicado dentro do arquivo"));
    }

    #[test]
    fn rows_colliding_with_existing_parts_are_rejected() {
        let existing = vec![part("7000001", "AB123", "Bearing")];
        let csv = format!("{}\n7000001,CD456,Belt,SP,5,10\n7000002,EF789,Chain,SP,5,10\n", HEADER);
        let report = validate_import(&csv, &existing);
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].sap_number, "7000002");
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("já cadastrado"));
    }

    #[test]
    fn invalid_row_contributes_errors_and_is_excluded() {
        let csv = format!("{}\nABC,A1,Bearing,SP,-2,10\n", HEADER);
        let report = validate_import(&csv, &[]);
        assert!(report.rows.is_empty());
        // SAP inválido, ref inválida e safetylevel negativo: três mensagens.
        assert_eq!(report.errors.len(), 3);
    }

    #[test]
    fn optional_columns_are_honored_when_present() {
        let csv = "sapnumber,internalref,name,category,safetylevel,replenishqty,racknumber,racklevel,currentstock\n\
                   7000001,AB123,Bearing,SP,5,10,03,b,7\n";
        let report = validate_import(csv, &[]);
        assert!(report.errors.is_empty(), "{:?}", report.errors);
        let row = &report.rows[0];
        assert_eq!(row.rack_number, "03");
        assert_eq!(row.rack_level, "B");
        assert_eq!(row.current_stock, 7);
    }

    // --- Duplicados ---

    #[test]
    fn duplicate_groups_keep_first_seen_id() {
        let p1 = part("7000001", "AB123", "Bearing");
        let p2 = part("7000001", "CD456", "Bearing copy");
        let p3 = part("7000001", "EF789", "Bearing copy 2");
        let p4 = part("7000002", "GH012", "Belt");
        let (i1, i2, i3) = (p1.id, p2.id, p3.id);

        let groups = find_duplicates(&[p1, p2, p3, p4]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].sap_number, "7000001");
        assert_eq!(groups[0].count, 3);
        assert_eq!(groups[0].ids, vec![i1, i2, i3]);

        let deletions = plan_deletions(&groups);
        assert_eq!(deletions, vec![i2, i3]);
    }

    #[test]
    fn unique_parts_produce_no_groups() {
        let parts = vec![part("7000001", "AB123", "a"), part("7000002", "CD456", "b")];
        assert!(find_duplicates(&parts).is_empty());
        assert!(plan_deletions(&[]).is_empty());
    }
}
