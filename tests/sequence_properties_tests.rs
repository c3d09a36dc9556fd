//! Sequence and punctuation properties over generated lists
use resolucao_auditor::parser::{ItemKind, KindSpec, int_to_roman, ordinal_to_letter, scan};
use resolucao_auditor::validation::{validate_punctuation, validate_sequence};

fn incisos(ordinals: &[u32]) -> String {
    let mut text = String::from("Art. 1º  São objetivos:\n");
    for (i, value) in ordinals.iter().enumerate() {
        let terminator = if i + 1 == ordinals.len() { "." } else { ";" };
        text.push_str(&format!("{} – item{}\n", int_to_roman(*value), terminator));
    }
    text
}

fn sequence_findings(text: &str, kind: ItemKind) -> usize {
    let items = scan(text, &KindSpec::standard());
    validate_sequence(text, &items, kind).len()
}

#[test]
fn well_formed_roman_sequences_have_no_findings() {
    for n in 1..=40 {
        let ordinals: Vec<u32> = (1..=n).collect();
        let text = incisos(&ordinals);
        assert_eq!(sequence_findings(&text, ItemKind::Inciso), 0, "n = {}", n);
    }
}

#[test]
fn well_formed_articles_have_no_findings() {
    let text: String = (1..=25)
        .map(|n| {
            if n <= 9 {
                format!("Art. {}º  Texto.\n", n)
            } else {
                format!("Art. {}.  Texto.\n", n)
            }
        })
        .collect();
    assert_eq!(sequence_findings(&text, ItemKind::Article), 0);
}

#[test]
fn well_formed_alineas_have_no_findings() {
    let mut text = String::from("Art. 1º  Compete:\nI – coordenar:\n");
    for n in 1..=10 {
        let letter = ordinal_to_letter(n).unwrap();
        let terminator = if n == 10 { "." } else { ";" };
        text.push_str(&format!("{}) tarefa{}\n", letter, terminator));
    }
    assert_eq!(sequence_findings(&text, ItemKind::Alinea), 0);
    let items = scan(&text, &KindSpec::standard());
    assert!(validate_punctuation(&text, &items).is_empty());
}

#[test]
fn isolated_mislabel_yields_one_finding_at_any_position() {
    let n = 8;
    for wrong_at in 1..n {
        let mut ordinals: Vec<u32> = (1..=n).collect();
        ordinals[wrong_at as usize] += 3;
        let text = incisos(&ordinals);
        assert_eq!(
            sequence_findings(&text, ItemKind::Inciso),
            1,
            "mislabel at position {}",
            wrong_at
        );
    }
}

#[test]
fn renumbering_jump_yields_one_finding() {
    let text = incisos(&[1, 2, 5, 6, 7]);
    let items = scan(&text, &KindSpec::standard());
    let findings = validate_sequence(&text, &items, ItemKind::Inciso);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].matched_text, "V –");
}

#[test]
fn changing_a_colon_to_a_period_adds_one_finding() {
    let good = incisos(&[1, 2, 3]);
    let items = scan(&good, &KindSpec::standard());
    assert!(validate_punctuation(&good, &items).is_empty());

    let bad = good.replacen("objetivos:", "objetivos.", 1);
    let items = scan(&bad, &KindSpec::standard());
    assert_eq!(validate_punctuation(&bad, &items).len(), 1);
}
