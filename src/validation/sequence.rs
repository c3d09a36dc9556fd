//! Sequence Validator
//!
//! Checks that the ordinals of one item kind increase by exactly one inside
//! each numbering scope. A lone mislabel is reported once; the sequence then
//! continues as if the label had been correct.

use crate::core::diagnostics::Finding;
use crate::parser::{ItemKind, StructuralItem};

/// Per-traversal expectation for one item kind
#[derive(Debug)]
struct ScopeCounter {
    scope: Option<Option<usize>>,
    expected: u32,
}

impl ScopeCounter {
    fn new() -> Self {
        Self {
            scope: None,
            expected: 1,
        }
    }

    /// Reset to 1 when `scope` differs from the current one
    fn enter(&mut self, scope: Option<usize>) {
        if self.scope != Some(scope) {
            self.scope = Some(scope);
            self.expected = 1;
        }
    }
}

/// Index of the item that opened the numbering scope of `items[index]`
///
/// `None` is the region-level scope.
pub fn scope_of(items: &[StructuralItem], index: usize) -> Option<usize> {
    let parents = items[index].kind.scope_parents();
    items[..index]
        .iter()
        .rposition(|item| parents.contains(&item.kind))
}

/// Validate the numbering of every `kind` item in `items`
///
/// Items without a numeric ordinal (`Parágrafo único`) are not counted.
pub fn validate_sequence(text: &str, items: &[StructuralItem], kind: ItemKind) -> Vec<Finding> {
    let counted: Vec<(usize, Option<usize>, u32)> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.kind == kind)
        .filter_map(|(index, item)| {
            item.ordinal_value
                .map(|value| (index, scope_of(items, index), value))
        })
        .collect();

    let mut counter = ScopeCounter::new();
    let mut findings = Vec::new();

    for (position, &(index, scope, value)) in counted.iter().enumerate() {
        counter.enter(scope);

        if value == counter.expected {
            counter.expected = counter.expected.saturating_add(1);
            continue;
        }

        let item = &items[index];
        findings.push(Finding::at(
            text,
            item.label_span(text),
            format!(
                "Sequência de {} incorreta: esperado '{}', encontrado '{}'.",
                kind.plural(),
                kind.format_ordinal(counter.expected),
                item.ordinal_raw
            ),
        ));

        let next_in_scope = counted[position + 1..]
            .iter()
            .find(|(_, next_scope, _)| *next_scope == scope)
            .map(|&(_, _, next_value)| next_value);

        if next_in_scope.is_some() && next_in_scope == counter.expected.checked_add(1) {
            // Isolated typo: the mislabelled item still takes the expected slot
            counter.expected += 1;
        } else {
            counter.expected = value.saturating_add(1);
        }
    }

    findings
}
