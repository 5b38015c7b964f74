use swc_core::{
    common::Span,
    ecma::{
        ast::*,
        visit::{Visit, VisitWith},
    },
};

use crate::{
    error::{invariant, MacroError},
    references::{is_binding, Reference},
};

/// Address of a statement without parent links: `index` inside the
/// `container`-th statement list entered by a preorder walk.
///
/// Statement lists are module/script bodies, blocks, TS module blocks and
/// switch cases; only the first three may hold a decorator call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub container: usize,
    pub index: usize,
}

/// Finds the expression statement enclosing `reference`.
pub fn enclosing_statement(program: &Program, reference: &Reference) -> Result<Slot, MacroError> {
    let mut locator = Locator {
        reference,
        seen: 0,
        containers: 0,
        slot: None,
        anchors: vec![],
        found: None,
    };
    program.visit_with(&mut locator);
    locator
        .found
        .unwrap_or_else(|| Err(MacroError::new(reference.span, "Expression not found")))
}

struct Locator<'a> {
    reference: &'a Reference,
    seen: usize,
    containers: usize,
    // Set right before visiting a statement that sits directly in a block or program body.
    slot: Option<Slot>,
    // Expression statements around the current node, innermost last.
    anchors: Vec<Option<Slot>>,
    found: Option<Result<Slot, MacroError>>,
}

impl Locator<'_> {
    fn visit_list<T: VisitWith<Self>>(&mut self, items: &[T], block_like: bool) {
        let container = self.containers;
        self.containers += 1;
        for (index, item) in items.iter().enumerate() {
            if self.found.is_some() {
                return;
            }
            self.slot = block_like.then_some(Slot { container, index });
            item.visit_with(self);
            self.slot = None;
        }
    }

    fn resolve(&self, span: Span) -> Result<Slot, MacroError> {
        invariant(span == self.reference.span, span, "Expression not found")?;
        let Some(&anchor) = self.anchors.last() else {
            return Err(MacroError::new(span, "ExpressionStatement not found"));
        };
        anchor.ok_or_else(|| MacroError::new(span, "Decorator should be inside block or program"))
    }
}

impl Visit for Locator<'_> {
    fn visit_module(&mut self, module: &Module) {
        self.visit_list(&module.body, true);
    }

    fn visit_script(&mut self, script: &Script) {
        self.visit_list(&script.body, true);
    }

    fn visit_block_stmt(&mut self, block: &BlockStmt) {
        self.visit_list(&block.stmts, true);
    }

    fn visit_ts_module_block(&mut self, block: &TsModuleBlock) {
        self.visit_list(&block.body, true);
    }

    fn visit_switch_case(&mut self, case: &SwitchCase) {
        case.test.visit_with(self);
        self.visit_list(&case.cons, false);
    }

    fn visit_module_decl(&mut self, decl: &ModuleDecl) {
        self.slot = None;
        decl.visit_children_with(self);
    }

    fn visit_import_decl(&mut self, _: &ImportDecl) {}

    fn visit_stmt(&mut self, stmt: &Stmt) {
        let slot = self.slot.take();
        match stmt {
            Stmt::Expr(expr_stmt) => {
                self.anchors.push(slot);
                expr_stmt.visit_with(self);
                self.anchors.pop();
            }
            _ => stmt.visit_children_with(self),
        }
    }

    fn visit_ident(&mut self, ident: &Ident) {
        if self.found.is_some() || !is_binding(ident, &self.reference.binding) {
            return;
        }
        let ordinal = self.seen;
        self.seen += 1;
        if ordinal == self.reference.ordinal {
            self.found = Some(self.resolve(ident.span));
        }
    }
}
