//! Audit Engine
//!
//! One document in, one [`AuditResult`] out. The engine picks a profile,
//! splits the document into regions, runs every rule of the region's rule
//! set and hands the findings to the assembler.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::LazyLock;

use serde::Serialize;

use crate::core::diagnostics::{Diagnostic, Finding, RegionFindings, Severity, assemble};
use crate::core::document::{Document, RegionName};
use crate::parser::KindSpec;
use crate::profile::{DocumentType, ProfileRegistry};
use crate::validation::result::{RuleResult, Status};
use crate::validation::rules::{RegionContext, Rule, RuleSet};

/// Checklist entry for one rule over one region
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleSummary {
    pub rule_id: String,
    pub rule_name: String,
    pub region: RegionName,
    pub status: Status,
    pub detail: Option<String>,
    pub findings: usize,
}

/// Everything an audit produces
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AuditResult {
    pub document_type: DocumentType,
    pub diagnostics: Vec<Diagnostic>,
    pub rules: Vec<RuleSummary>,
}

impl AuditResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn failed_rules(&self) -> impl Iterator<Item = &RuleSummary> {
        self.rules.iter().filter(|r| r.status != Status::Ok)
    }
}

/// Runs audits against a profile registry
#[derive(Debug, Clone)]
pub struct Auditor {
    registry: ProfileRegistry,
    forced: Option<DocumentType>,
    spec: KindSpec,
}

impl Default for Auditor {
    fn default() -> Self {
        Self::new(ProfileRegistry::with_builtin_profiles())
    }
}

impl Auditor {
    pub fn new(registry: ProfileRegistry) -> Self {
        Self {
            registry,
            forced: None,
            spec: KindSpec::standard(),
        }
    }

    /// Skip detection and always use `document_type`
    pub fn with_forced_type(mut self, document_type: Option<DocumentType>) -> Self {
        self.forced = document_type;
        self
    }

    pub fn registry(&self) -> &ProfileRegistry {
        &self.registry
    }

    /// Audit raw text
    pub fn audit(&self, raw: &str) -> AuditResult {
        let document = Document::new(raw);
        if document.is_blank() {
            log::debug!("Skipping audit of blank document");
            return AuditResult::empty();
        }

        let regions = document.regions();
        let document_type = self
            .forced
            .unwrap_or_else(|| self.registry.detect(regions.body.text));
        let profile = self.registry.profile_for(document_type);
        let rules = RuleSet::for_profile(&profile);

        log::debug!(
            "Auditing {} bytes as {} ({} body rules, annex: {})",
            document.text().len(),
            document_type,
            rules.body.len(),
            regions.has_annex()
        );

        run(&document, document_type, &rules, &self.spec)
    }
}

/// Audit `document` under an explicit rule set
pub fn run(document: &Document, document_type: DocumentType, rules: &RuleSet, spec: &KindSpec) -> AuditResult {
    let regions = document.regions();
    let annex_present = regions.has_annex();

    let mut region_findings = Vec::new();
    let mut summaries = Vec::new();

    for region in regions.iter() {
        let ctx = RegionContext::new(region, spec, annex_present);
        log::debug!(
            "Region {:?}: {} bytes, {} structural items",
            region.name,
            region.text.len(),
            ctx.items.len()
        );

        for rule in rules.for_region(region.name) {
            let result = evaluate_isolated(rule, &ctx);
            let severity = if result.status == Status::Warn {
                Severity::Warning
            } else {
                rule.severity
            };

            summaries.push(RuleSummary {
                rule_id: rule.id.clone(),
                rule_name: rule.name.clone(),
                region: region.name,
                status: result.status,
                detail: result.detail,
                findings: result.findings.len(),
            });

            if !result.findings.is_empty() {
                region_findings.push(RegionFindings {
                    rule_id: rule.id.clone(),
                    rule_name: rule.name.clone(),
                    severity,
                    region: region.name,
                    offset_in_document: region.offset_in_document,
                    findings: result.findings,
                });
            }
        }
    }

    AuditResult {
        document_type,
        diagnostics: assemble(region_findings, document.text()),
        rules: summaries,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "pânico sem mensagem".to_string()
    }
}

/// A failing or panicking rule becomes a single FAIL finding
fn evaluate_isolated(rule: &Rule, ctx: &RegionContext<'_>) -> RuleResult {
    let message = match catch_unwind(AssertUnwindSafe(|| rule.check.evaluate(ctx))) {
        Ok(Ok(result)) => return result,
        Ok(Err(err)) => format!("{:#}", err),
        Err(payload) => panic_message(payload.as_ref()),
    };

    log::warn!("Rule '{}' failed on {:?}: {}", rule.id, ctx.region.name, message);
    RuleResult::fail(vec![Finding::unanchored(format!("Erro interno: {}", message))])
}

static DEFAULT_AUDITOR: LazyLock<Auditor> = LazyLock::new(Auditor::default);

/// Audit raw text with the built-in profiles
pub fn audit(raw: &str) -> AuditResult {
    DEFAULT_AUDITOR.audit(raw)
}
