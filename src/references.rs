use std::collections::HashMap;

use swc_core::{
    common::{Span, DUMMY_SP},
    ecma::{
        ast::*,
        visit::{Visit, VisitWith},
    },
};
use tracing::trace;

use crate::{error::MacroError, imports::MacroBinding};

/// Name of the marker call, `decorate(...)`.
pub const TRIGGER: &str = "decorate";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// Callee of a call expression, named exactly `decorate`.
    Call,
    Other,
}

/// One usage site of a macro binding.
///
/// The tree has no parent links, so a site is addressed by its `ordinal`:
/// the position of the occurrence among all occurrences of `binding` in a
/// preorder walk. `span` is kept to verify the site is still the same node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub binding: Id,
    pub ordinal: usize,
    pub span: Span,
    pub kind: ReferenceKind,
}

/// Imported name to its usage sites, in discovery order.
pub type References = HashMap<String, Vec<Reference>>;

pub fn collect_references(program: &Program, bindings: &[MacroBinding]) -> References {
    let mut out = References::new();
    for binding in bindings {
        let mut scanner = Scanner {
            binding: &binding.local,
            sites: vec![],
        };
        program.visit_with(&mut scanner);
        out.entry(binding.imported.clone())
            .or_default()
            .extend(scanner.sites);
    }
    out
}

/// Invocations of the trigger, last discovered first.
pub fn trigger_calls(references: &References) -> Result<Vec<&Reference>, MacroError> {
    let sites = references.get(TRIGGER).ok_or_else(|| {
        MacroError::new(DUMMY_SP, "`decorate` is not imported from the macro")
    })?;

    Ok(sites
        .iter()
        .rev()
        .filter(|site| {
            if site.kind == ReferenceKind::Call {
                return true;
            }
            trace!(ordinal = site.ordinal, "skipping non-call reference");
            false
        })
        .collect())
}

pub(crate) fn callee_ident(call: &CallExpr) -> Option<&Ident> {
    match &call.callee {
        Callee::Expr(expr) => match &**expr {
            Expr::Ident(ident) => Some(ident),
            _ => None,
        },
        _ => None,
    }
}

pub(crate) fn is_binding(ident: &Ident, binding: &Id) -> bool {
    ident.sym == binding.0 && ident.ctxt == binding.1
}

struct Scanner<'a> {
    binding: &'a Id,
    sites: Vec<Reference>,
}

impl Scanner<'_> {
    fn record(&mut self, ident: &Ident, kind: ReferenceKind) {
        self.sites.push(Reference {
            binding: self.binding.clone(),
            ordinal: self.sites.len(),
            span: ident.span,
            kind,
        });
    }
}

impl Visit for Scanner<'_> {
    fn visit_import_decl(&mut self, _: &ImportDecl) {}

    fn visit_call_expr(&mut self, call: &CallExpr) {
        match callee_ident(call) {
            Some(callee) if is_binding(callee, self.binding) => {
                let kind = if callee.sym.as_ref() == TRIGGER {
                    ReferenceKind::Call
                } else {
                    ReferenceKind::Other
                };
                self.record(callee, kind);
                call.args.visit_with(self);
                call.type_args.visit_with(self);
            }
            _ => call.visit_children_with(self),
        }
    }

    fn visit_ident(&mut self, ident: &Ident) {
        if is_binding(ident, self.binding) {
            self.record(ident, ReferenceKind::Other);
        }
    }
}
