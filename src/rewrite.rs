use swc_core::{
    common::{Span, Spanned, DUMMY_SP},
    ecma::{
        ast::*,
        utils::ExprFactory,
        visit::{VisitMut, VisitMutWith},
    },
};

use crate::{
    error::{invariant, MacroError},
    locate::Slot,
    references::{callee_ident, TRIGGER},
};

/// Member of the trigger standing in for the decorated function, `decorate.target`.
pub const PLACEHOLDER: &str = "target";

/// Outcome of one expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decorated {
    pub decorator: String,
    /// Name bound by the decorated declarator, `None` for destructuring patterns.
    pub target: Option<String>,
    pub placeholders: usize,
}

/// Statement list items a decorator call can sit between.
pub(crate) trait Statement {
    fn as_expr_stmt_mut(&mut self) -> Option<&mut ExprStmt>;

    /// The variable declaration, looking through `export`.
    fn as_var_decl_mut(&mut self) -> Option<&mut VarDecl>;
}

impl Statement for Stmt {
    fn as_expr_stmt_mut(&mut self) -> Option<&mut ExprStmt> {
        match self {
            Stmt::Expr(expr_stmt) => Some(expr_stmt),
            _ => None,
        }
    }

    fn as_var_decl_mut(&mut self) -> Option<&mut VarDecl> {
        match self {
            Stmt::Decl(Decl::Var(var)) => Some(&mut **var),
            _ => None,
        }
    }
}

impl Statement for ModuleItem {
    fn as_expr_stmt_mut(&mut self) -> Option<&mut ExprStmt> {
        match self {
            ModuleItem::Stmt(stmt) => stmt.as_expr_stmt_mut(),
            ModuleItem::ModuleDecl(_) => None,
        }
    }

    fn as_var_decl_mut(&mut self) -> Option<&mut VarDecl> {
        match self {
            ModuleItem::Stmt(stmt) => stmt.as_var_decl_mut(),
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(ExportDecl {
                decl: Decl::Var(var),
                ..
            })) => Some(&mut **var),
            ModuleItem::ModuleDecl(_) => None,
        }
    }
}

/// Wraps the declaration following the decorator call at `slot` and removes the call.
pub fn apply(program: &mut Program, slot: Slot) -> Result<Decorated, MacroError> {
    let mut editor = Editor {
        slot,
        containers: 0,
        outcome: None,
    };
    program.visit_mut_with(&mut editor);
    editor
        .outcome
        .unwrap_or_else(|| Err(MacroError::new(DUMMY_SP, "Expression not found")))
}

// Walks statement lists in the same order as the locator to reach the slot's container.
struct Editor {
    slot: Slot,
    containers: usize,
    outcome: Option<Result<Decorated, MacroError>>,
}

impl Editor {
    fn visit_list<T>(&mut self, items: &mut Vec<T>)
    where
        T: Statement + VisitMutWith<Self>,
    {
        if self.outcome.is_some() {
            return;
        }
        let container = self.containers;
        self.containers += 1;
        if container == self.slot.container {
            self.outcome = Some(decorate_at(items, self.slot.index));
            return;
        }
        for item in items.iter_mut() {
            if self.outcome.is_some() {
                return;
            }
            item.visit_mut_with(self);
        }
    }
}

impl VisitMut for Editor {
    fn visit_mut_module(&mut self, module: &mut Module) {
        self.visit_list(&mut module.body);
    }

    fn visit_mut_script(&mut self, script: &mut Script) {
        self.visit_list(&mut script.body);
    }

    fn visit_mut_block_stmt(&mut self, block: &mut BlockStmt) {
        self.visit_list(&mut block.stmts);
    }

    fn visit_mut_ts_module_block(&mut self, block: &mut TsModuleBlock) {
        self.visit_list(&mut block.body);
    }

    fn visit_mut_switch_case(&mut self, case: &mut SwitchCase) {
        case.test.visit_mut_with(self);
        self.visit_list(&mut case.cons);
    }
}

fn decorate_at<T: Statement>(items: &mut Vec<T>, index: usize) -> Result<Decorated, MacroError> {
    invariant(index < items.len(), DUMMY_SP, "Expression not found")?;

    // Nothing is mutated until both the target and the call have been validated.
    let decorated = {
        let (head, following) = items.split_at_mut(index + 1);
        let Some(statement) = head[index].as_expr_stmt_mut() else {
            return Err(MacroError::new(DUMMY_SP, "Expression not found"));
        };
        let target = resolve_target(statement.span, following)?;
        let call = trigger_call(statement)?;
        rewrite(call, target)
    };

    items.remove(index);
    Ok(decorated)
}

struct Target<'a> {
    name: Option<String>,
    init: &'a mut Box<Expr>,
}

fn resolve_target<T: Statement>(span: Span, following: &mut [T]) -> Result<Target<'_>, MacroError> {
    let Some(declaration) = following.iter_mut().find_map(|item| item.as_var_decl_mut()) else {
        return Err(MacroError::new(span, "Can not find function to decorate"));
    };
    invariant(
        declaration.decls.len() <= 1,
        declaration.span,
        "One declaration should contain one declarator",
    )?;

    let declaration_span = declaration.span;
    let Some(declarator) = declaration.decls.first_mut() else {
        return Err(MacroError::new(declaration_span, "Declaration has no declarator"));
    };

    let declarator_span = declarator.span;
    let name = declarator.name.as_ident().map(|binding| binding.id.sym.to_string());
    let Some(init) = declarator.init.as_mut().filter(|init| is_function_shaped(init)) else {
        return Err(MacroError::new(
            declarator_span,
            "Decorated declaration should be initialized with an arrow function or a call expression",
        ));
    };
    Ok(Target { name, init })
}

/// Arrow functions and calls, the latter covering factories returning functions.
fn is_function_shaped(expr: &Expr) -> bool {
    matches!(expr.unwrap_parens(), Expr::Arrow(_) | Expr::Call(_))
}

struct TriggerCall {
    decorator: Ident,
    args: Vec<ExprOrSpread>,
}

fn trigger_call(statement: &mut ExprStmt) -> Result<TriggerCall, MacroError> {
    let span = statement.span;
    let Expr::Call(call) = statement.expr.unwrap_parens_mut() else {
        return Err(MacroError::new(span, "Decorator call should be a plain function call"));
    };
    invariant(
        callee_ident(call).is_some(),
        call.span,
        "Decorator call should be a plain function call",
    )?;
    invariant(
        call.args.len() > 1,
        call.span,
        "Decorator call should receive a decorator and at least one argument",
    )?;

    let decorator = match &call.args[0] {
        ExprOrSpread { spread: None, expr } => match &**expr {
            Expr::Ident(ident) => Some(ident.clone()),
            _ => None,
        },
        _ => None,
    };
    let Some(decorator) = decorator else {
        return Err(MacroError::new(
            call.args[0].expr.span(),
            "Decorator should be an identifier",
        ));
    };

    Ok(TriggerCall {
        decorator,
        args: call.args.drain(1..).collect(),
    })
}

fn is_placeholder(arg: &ExprOrSpread) -> bool {
    if arg.spread.is_some() {
        return false;
    }
    let Expr::Member(member) = &*arg.expr else {
        return false;
    };
    let (Expr::Ident(object), MemberProp::Ident(prop)) = (&*member.obj, &member.prop) else {
        return false;
    };
    object.sym.as_ref() == TRIGGER && prop.sym.as_ref() == PLACEHOLDER
}

// Every placeholder gets its own copy of the function so the result stays a tree.
fn rewrite(call: TriggerCall, target: Target<'_>) -> Decorated {
    let decorator = call.decorator.sym.to_string();
    let mut placeholders = 0;

    let args: Vec<ExprOrSpread> = call
        .args
        .into_iter()
        .map(|arg| {
            if !is_placeholder(&arg) {
                return arg;
            }
            placeholders += 1;
            (**target.init).clone().as_arg()
        })
        .collect();

    **target.init = Expr::Ident(call.decorator).as_call(DUMMY_SP, args);

    Decorated {
        decorator,
        target: target.name,
        placeholders,
    }
}
