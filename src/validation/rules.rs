//! Rules and Rule Sets
//!
//! A [`Rule`] pairs an identity with a [`Check`]. Rule sets are built per
//! audit from a profile and hold one list of rules per region.

use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use regex::Regex;

use crate::core::diagnostics::Severity;
use crate::core::document::{Region, RegionName};
use crate::parser::{ItemKind, KindSpec, StructuralItem, scan};
use crate::profile::{Closing, Ementa, Epigraph, HeaderLine, Preamble, Profile, Signature};
use crate::validation::catalog;
use crate::validation::punctuation::validate_punctuation;
use crate::validation::result::RuleResult;
use crate::validation::sequence::validate_sequence;
use crate::validation::structure;

/// Everything a check sees of the region it evaluates
#[derive(Debug)]
pub struct RegionContext<'a> {
    pub region: &'a Region<'a>,
    /// Structural items of the region, scanned once
    pub items: Vec<StructuralItem>,
    pub annex_present: bool,
}

impl<'a> RegionContext<'a> {
    pub fn new(region: &'a Region<'a>, spec: &KindSpec, annex_present: bool) -> Self {
        Self {
            region,
            items: scan(region.text, spec),
            annex_present,
        }
    }

    pub fn text(&self) -> &'a str {
        self.region.text
    }

    fn has_kind(&self, kind: ItemKind) -> bool {
        self.items.iter().any(|item| item.kind == kind)
    }

    /// Offset of the first article, or the end of the region
    fn first_article_start(&self) -> usize {
        self.items
            .iter()
            .find(|item| item.kind == ItemKind::Article)
            .map(|item| item.line_start)
            .unwrap_or(self.region.text.len())
    }
}

/// Signature of user-supplied checks
pub type CustomCheck = dyn Fn(&RegionContext<'_>) -> Result<RuleResult> + Send + Sync;

/// What a rule evaluates
#[derive(Clone)]
pub enum Check {
    ArticleFormat,
    ParagraphFormat,
    Sequence(ItemKind),
    Punctuation,
    Acronyms,
    LeadingZeroDates,
    AnnexMarker,
    Header(Vec<HeaderLine>),
    Epigraph(Epigraph),
    Ementa {
        ementa: Ementa,
        epigraph: Option<Regex>,
    },
    Preamble(Preamble),
    Closing(Closing),
    Signature(Signature),
    Custom(Arc<CustomCheck>),
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Check::ArticleFormat => f.write_str("ArticleFormat"),
            Check::ParagraphFormat => f.write_str("ParagraphFormat"),
            Check::Sequence(kind) => f.debug_tuple("Sequence").field(kind).finish(),
            Check::Punctuation => f.write_str("Punctuation"),
            Check::Acronyms => f.write_str("Acronyms"),
            Check::LeadingZeroDates => f.write_str("LeadingZeroDates"),
            Check::AnnexMarker => f.write_str("AnnexMarker"),
            Check::Header(lines) => f.debug_tuple("Header").field(lines).finish(),
            Check::Epigraph(epigraph) => f.debug_tuple("Epigraph").field(epigraph).finish(),
            Check::Ementa { ementa, .. } => f.debug_tuple("Ementa").field(ementa).finish(),
            Check::Preamble(preamble) => f.debug_tuple("Preamble").field(preamble).finish(),
            Check::Closing(closing) => f.debug_tuple("Closing").field(closing).finish(),
            Check::Signature(signature) => f.debug_tuple("Signature").field(signature).finish(),
            Check::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

fn absent(kind_plural: &str) -> RuleResult {
    RuleResult::ok_with_detail(format!("Nenhum item do tipo '{}' encontrado.", kind_plural))
}

impl Check {
    /// Evaluate against one region
    pub fn evaluate(&self, ctx: &RegionContext<'_>) -> Result<RuleResult> {
        let text = ctx.text();
        let result = match self {
            Check::ArticleFormat => {
                if !ctx.has_kind(ItemKind::Article) {
                    return Ok(absent(ItemKind::Article.plural()));
                }
                RuleResult::from_findings(structure::check_article_format(text, &ctx.items))
            }
            Check::ParagraphFormat => {
                if !ctx.has_kind(ItemKind::Paragraph) {
                    return Ok(absent(ItemKind::Paragraph.plural()));
                }
                RuleResult::from_findings(structure::check_paragraph_format(text, &ctx.items))
            }
            Check::Sequence(kind) => {
                if !ctx.has_kind(*kind) {
                    return Ok(absent(kind.plural()));
                }
                RuleResult::from_findings(validate_sequence(text, &ctx.items, *kind))
            }
            Check::Punctuation => {
                if ctx.items.is_empty() {
                    return Ok(RuleResult::ok_with_detail(
                        "Nenhum item estrutural encontrado.",
                    ));
                }
                RuleResult::from_findings(validate_punctuation(text, &ctx.items))
            }
            Check::Acronyms => RuleResult::warn_if_any(structure::check_acronyms(text)),
            Check::LeadingZeroDates => {
                RuleResult::from_findings(structure::check_leading_zero_dates(text))
            }
            Check::AnnexMarker => {
                let findings = structure::check_annex_marker(text);
                if !findings.is_empty() {
                    RuleResult::fail(findings)
                } else if ctx.annex_present {
                    RuleResult::ok_with_detail("Seção 'ANEXO' encontrada e formatada corretamente.")
                } else {
                    RuleResult::ok_with_detail(
                        "Nenhuma seção 'ANEXO' foi encontrada (não obrigatório).",
                    )
                }
            }
            Check::Header(lines) => catalog::check_header(text, lines),
            Check::Epigraph(epigraph) => catalog::check_epigraph(text, epigraph),
            Check::Ementa { ementa, epigraph } => {
                catalog::check_ementa(text, ementa, epigraph.as_ref())
            }
            Check::Preamble(preamble) => {
                catalog::check_preamble(text, preamble, ctx.first_article_start())
            }
            Check::Closing(closing) => catalog::check_closing(text, closing),
            Check::Signature(signature) => catalog::check_signature(text, signature),
            Check::Custom(check) => return check(ctx),
        };
        Ok(result)
    }
}

/// A named check with a severity
#[derive(Debug, Clone)]
pub struct Rule {
    pub id: String,
    pub name: String,
    pub severity: Severity,
    pub check: Check,
}

impl Rule {
    pub fn new(id: impl Into<String>, name: impl Into<String>, severity: Severity, check: Check) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            severity,
            check,
        }
    }

    /// A rule backed by a closure
    pub fn custom<F>(id: impl Into<String>, name: impl Into<String>, severity: Severity, check: F) -> Self
    where
        F: Fn(&RegionContext<'_>) -> Result<RuleResult> + Send + Sync + 'static,
    {
        Self::new(id, name, severity, Check::Custom(Arc::new(check)))
    }
}

fn sequence_rule(kind: ItemKind) -> Rule {
    let id = match kind {
        ItemKind::Chapter => "sequencia-capitulos",
        ItemKind::Section => "sequencia-secoes",
        ItemKind::Article => "sequencia-artigos",
        ItemKind::Paragraph => "sequencia-paragrafos",
        ItemKind::Inciso => "sequencia-incisos",
        ItemKind::Alinea => "sequencia-alineas",
    };
    Rule::new(
        id,
        format!("{} (Sequência)", kind.plural()),
        Severity::Error,
        Check::Sequence(kind),
    )
}

/// Rules every region gets
fn structural_rules() -> Vec<Rule> {
    let mut rules = vec![
        Rule::new(
            "formato-artigos",
            "Artigos (Formato Numeração)",
            Severity::Error,
            Check::ArticleFormat,
        ),
        Rule::new(
            "formato-paragrafos",
            "Parágrafos (§ Espaçamento)",
            Severity::Error,
            Check::ParagraphFormat,
        ),
    ];
    rules.extend(
        [
            ItemKind::Chapter,
            ItemKind::Section,
            ItemKind::Article,
            ItemKind::Paragraph,
            ItemKind::Inciso,
            ItemKind::Alinea,
        ]
        .into_iter()
        .map(sequence_rule),
    );
    rules.extend([
        Rule::new(
            "pontuacao-hierarquica",
            "Pontuação Hierárquica",
            Severity::Error,
            Check::Punctuation,
        ),
        Rule::new(
            "siglas",
            "Siglas (Uso do travessão)",
            Severity::Warning,
            Check::Acronyms,
        ),
        Rule::new(
            "datas-zero-esquerda",
            "Datas (Zero à Esquerda)",
            Severity::Error,
            Check::LeadingZeroDates,
        ),
    ]);
    rules
}

/// Body-only rules taken from the profile tables
fn catalog_rules(profile: &Profile) -> Vec<Rule> {
    let label = &profile.name;
    let mut rules = vec![Rule::new(
        "marcador-anexo",
        "Anexo (Identificação)",
        Severity::Error,
        Check::AnnexMarker,
    )];

    if !profile.header.is_empty() {
        rules.push(Rule::new(
            "cabecalho",
            format!("Cabeçalho ({})", label),
            Severity::Error,
            Check::Header(profile.header.clone()),
        ));
    }
    if let Some(epigraph) = &profile.epigraph {
        rules.push(Rule::new(
            "epigrafe",
            format!("Epígrafe ({})", label),
            Severity::Error,
            Check::Epigraph(epigraph.clone()),
        ));
    }
    if let Some(ementa) = &profile.ementa {
        rules.push(Rule::new(
            "ementa",
            "Ementa (Verbo Inicial)",
            Severity::Error,
            Check::Ementa {
                ementa: ementa.clone(),
                epigraph: profile.epigraph.as_ref().map(|e| e.pattern.clone()),
            },
        ));
    }
    if let Some(preamble) = &profile.preamble {
        rules.push(Rule::new(
            "preambulo",
            format!("Preâmbulo ({})", label),
            Severity::Error,
            Check::Preamble(preamble.clone()),
        ));
    }
    if let Some(closing) = &profile.closing {
        rules.push(Rule::new(
            "fecho-vigencia",
            "Fecho de Vigência",
            Severity::Error,
            Check::Closing(closing.clone()),
        ));
    }
    if let Some(signature) = &profile.signature {
        rules.push(Rule::new(
            "assinatura",
            "Bloco de Assinatura",
            Severity::Error,
            Check::Signature(signature.clone()),
        ));
    }
    rules
}

/// Rules for the body and for the annex
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    pub body: Vec<Rule>,
    pub annex: Vec<Rule>,
}

impl RuleSet {
    pub fn new(body: Vec<Rule>, annex: Vec<Rule>) -> Self {
        Self { body, annex }
    }

    /// Structural rules for both regions plus the profile's catalog for the
    /// body
    pub fn for_profile(profile: &Profile) -> Self {
        let mut body = catalog_rules(profile);
        body.extend(structural_rules());

        let annex = structural_rules()
            .into_iter()
            .map(|rule| Rule {
                name: format!("Anexo: {}", rule.name),
                ..rule
            })
            .collect();

        Self { body, annex }
    }

    pub fn with_body_rule(mut self, rule: Rule) -> Self {
        self.body.push(rule);
        self
    }

    pub fn with_annex_rule(mut self, rule: Rule) -> Self {
        self.annex.push(rule);
        self
    }

    pub fn for_region(&self, region: RegionName) -> &[Rule] {
        match region {
            RegionName::Body => &self.body,
            RegionName::Annex => &self.annex,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::document::split_regions;
    use crate::profile::{DocumentType, ProfileRegistry};
    use crate::validation::result::Status;

    #[test]
    fn test_annex_rules_exclude_catalog() {
        let profile = ProfileRegistry::with_builtin_profiles().profile_for(DocumentType::Cnrh);
        let rules = RuleSet::for_profile(&profile);

        let body_ids: Vec<_> = rules.body.iter().map(|r| r.id.as_str()).collect();
        assert!(body_ids.contains(&"cabecalho"));
        assert!(body_ids.contains(&"marcador-anexo"));
        assert!(body_ids.contains(&"pontuacao-hierarquica"));

        assert!(rules.annex.iter().all(|r| r.name.starts_with("Anexo: ")));
        assert!(!rules.annex.iter().any(|r| r.id == "assinatura" || r.id == "marcador-anexo"));
        assert!(rules.annex.iter().any(|r| r.id == "sequencia-capitulos"));
    }

    #[test]
    fn test_structural_absence_is_ok_with_detail() {
        let regions = split_regions("Texto sem estrutura.\n");
        let ctx = RegionContext::new(&regions.body, &KindSpec::standard(), false);
        let result = Check::Sequence(ItemKind::Inciso).evaluate(&ctx).unwrap();
        assert_eq!(result.status, Status::Ok);
        assert!(result.detail.unwrap().contains("Incisos"));
    }

    #[test]
    fn test_custom_check_sees_items() {
        let regions = split_regions("Art. 1º  Texto.\nArt. 2º  Texto.\n");
        let ctx = RegionContext::new(&regions.body, &KindSpec::standard(), false);
        let rule = Rule::custom("contagem", "Contagem", Severity::Info, |ctx| {
            Ok(RuleResult::ok_with_detail(format!("{} itens", ctx.items.len())))
        });
        let result = rule.check.evaluate(&ctx).unwrap();
        assert_eq!(result.detail.as_deref(), Some("2 itens"));
    }
}
