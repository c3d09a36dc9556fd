//! End-to-end audits through the public API
use resolucao_auditor::core::RegionName;
use resolucao_auditor::validation::Status;
use resolucao_auditor::{AuditResult, Auditor, DocumentType, ProfileRegistry, Severity, audit};

const CLEAN_RESOLUTION: &str = "\
MINISTÉRIO DA INTEGRAÇÃO E DO DESENVOLVIMENTO REGIONAL
RESOLUÇÃO Nº 5, DE 3 DE MAIO DE 2024
Aprova o regimento interno.
O PRESIDENTE DO CONSELHO, no uso de suas atribuições, resolve:
Art. 1º  Fica aprovado o regimento interno.
Art. 2º  Esta Resolução entra em vigor na data de sua publicação.
FULANO DE TAL
Presidente
";

fn with_rule<'a>(result: &'a AuditResult, rule_id: &str) -> Vec<&'a resolucao_auditor::Diagnostic> {
    result
        .diagnostics
        .iter()
        .filter(|d| d.rule_id == rule_id)
        .collect()
}

#[test]
fn clean_resolution_has_no_diagnostics() {
    let result = audit(CLEAN_RESOLUTION);
    assert_eq!(result.document_type, DocumentType::Unknown);
    assert!(
        result.diagnostics.is_empty(),
        "unexpected diagnostics: {:#?}",
        result.diagnostics
    );
    assert!(result.rules.iter().all(|r| r.status == Status::Ok));
}

#[test]
fn article_formatting_scenario() {
    let text = "Art. 1 Aprova o regimento.\nArt. 2. Revoga o anterior.";
    let result = audit(text);
    let formatting = with_rule(&result, "formato-artigos");

    assert_eq!(formatting.len(), 2);
    let first = formatting[0].suggested_fix.as_ref().expect("fix for Art. 1");
    assert_eq!(first.replacement, "Art. 1º  ");
    assert_eq!(first.original, "Art. 1 ");
    assert!(formatting[1].message.contains("Art. 2"));
    assert_eq!(
        formatting[1].suggested_fix.as_ref().map(|f| f.replacement.as_str()),
        Some("Art. 2º  ")
    );
}

#[test]
fn inciso_sequence_scenario() {
    let text = "Art. 1º  São objetivos:\nI – primeiro;\nIII – terceiro.\n";
    let result = audit(text);

    let sequence = with_rule(&result, "sequencia-incisos");
    assert_eq!(sequence.len(), 1);
    assert!(sequence[0].message.contains("esperado 'II'"));
    assert!(sequence[0].message.contains("encontrado 'III'"));

    assert!(with_rule(&result, "pontuacao-hierarquica").is_empty());
}

#[test]
fn article_opening_incisos_needs_colon() {
    let text = "Art. 1º  São objetivos.\nI – primeiro;\nII – segundo.\n";
    let result = audit(text);

    let punctuation = with_rule(&result, "pontuacao-hierarquica");
    assert_eq!(punctuation.len(), 1);
    let fix = punctuation[0].suggested_fix.as_ref().expect("colon fix");
    assert_eq!(fix.original, ".");
    assert_eq!(fix.replacement, ":");
}

#[test]
fn annex_spans_point_into_original_text() {
    let text = "\
Art. 1º  Fica aprovado o anexo.
Art. 3º  Revoga-se a norma (ABC).
ANEXO
Art. 1º  Primeiro artigo do anexo.
Art. 3º  Terceiro artigo do anexo.
";
    let result = audit(text);

    let annex: Vec<_> = result
        .diagnostics
        .iter()
        .filter(|d| d.region == RegionName::Annex)
        .collect();
    assert!(!annex.is_empty());
    assert!(annex.iter().all(|d| d.rule_name.starts_with("Anexo: ")));

    let marker = text.find("ANEXO").unwrap();
    let annex_sequence = annex
        .iter()
        .find(|d| d.rule_id == "sequencia-artigos")
        .expect("annex sequence diagnostic");
    assert!(annex_sequence.span.unwrap().start > marker);

    for diagnostic in &result.diagnostics {
        if let Some(span) = diagnostic.span {
            assert_eq!(&text[span.start..span.end], diagnostic.matched_text);
        }
        if let Some(fix) = &diagnostic.suggested_fix {
            assert_eq!(&text[fix.span.start..fix.span.end], fix.original);
        }
    }
}

#[test]
fn highlighted_spans_never_overlap() {
    let text = "Art. 1 Texto (ABC)\nArt. 5. Outro texto; e\n";
    let result = audit(text);

    let mut highlighted: Vec<_> = result
        .diagnostics
        .iter()
        .filter(|d| d.highlighted)
        .filter_map(|d| d.span)
        .collect();
    highlighted.sort_by_key(|s| s.start);
    for pair in highlighted.windows(2) {
        assert!(pair[0].end <= pair[1].start, "{:?} overlaps {:?}", pair[0], pair[1]);
    }

    let ids: Vec<_> = result
        .diagnostics
        .iter()
        .filter_map(|d| d.id.as_deref())
        .collect();
    let expected: Vec<_> = (1..=ids.len()).map(|n| format!("erro_{}", n)).collect();
    assert_eq!(ids, expected);
}

#[test]
fn audit_is_idempotent() {
    let text = "Art. 1 Texto.\nI – um;\nV – cinco.\nANEXO\nArt. 2. Texto\n";
    assert_eq!(audit(text), audit(text));
}

#[test]
fn crlf_input_keeps_offsets_of_normalised_text() {
    let result = audit("Art. 1º  Texto.\r\nArt. 3º  Texto.\r\n");
    let sequence = with_rule(&result, "sequencia-artigos");
    assert_eq!(sequence[0].span.map(|s| s.start), Some(17));
}

#[test]
fn blank_document_runs_no_rules() {
    let result = audit("\n   \n");
    assert!(result.diagnostics.is_empty());
    assert!(result.rules.is_empty());
    assert_eq!(result.document_type, DocumentType::Unknown);
}

#[test]
fn forced_profile_overrides_detection() {
    let auditor = Auditor::new(ProfileRegistry::with_builtin_profiles())
        .with_forced_type(Some(DocumentType::Cnrh));
    let result = auditor.audit(CLEAN_RESOLUTION);

    assert_eq!(result.document_type, DocumentType::Cnrh);
    assert!(result.has_errors());
    assert!(!with_rule(&result, "cabecalho").is_empty());
}

#[test]
fn detects_document_type_from_epigraph() {
    let text = CLEAN_RESOLUTION.replace("RESOLUÇÃO Nº 5", "RESOLUÇÃO CEG/MIDR Nº 5");
    let result = audit(&text);
    assert_eq!(result.document_type, DocumentType::Ceg);
    assert!(result.rules.iter().any(|r| r.rule_name == "Epígrafe (CEG)"));
}

#[test]
fn acronym_findings_are_warnings() {
    let result = audit("Art. 1º  Fica criado o Fundo de Desenvolvimento (FDCO).\n");
    let acronyms = with_rule(&result, "siglas");
    assert_eq!(acronyms.len(), 1);
    assert_eq!(acronyms[0].severity, Severity::Warning);
    assert_eq!(
        acronyms[0].suggested_fix.as_ref().map(|f| f.replacement.as_str()),
        Some("— FDCO")
    );
}

#[test]
fn wrapped_items_are_punctuated_by_their_last_line() {
    let text = "\
Art. 1º  Compete ao Conselho, nos termos da lei,
e do seu regimento:
I – aprovar o plano anual de
investimentos do Fundo;
II – deliberar sobre
programas.
";
    let result = audit(text);
    assert!(with_rule(&result, "pontuacao-hierarquica").is_empty());
}

#[test]
fn huge_article_number_is_a_sequence_finding() {
    let result = audit("Art. 1º  Texto.\nArt. 4294967295.  Texto.\n");
    let sequence = with_rule(&result, "sequencia-artigos");
    assert_eq!(sequence.len(), 1);
    assert!(!sequence[0].message.starts_with("Erro interno"));
    assert!(sequence[0].message.contains("esperado '2'"));
}
