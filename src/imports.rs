use regex::Regex;
use swc_core::ecma::ast::*;
use tracing::debug;

use crate::references::TRIGGER;

/// Local binding of a name imported from a macro module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroBinding {
    /// Name exported by the macro module (`"default"` for default imports).
    pub imported: String,
    pub local: Id,
}

/// Removes the imports of the `decorate` macro and returns what they bound.
///
/// An import is taken when its source matches `matcher` and it names
/// `decorate` among its specifiers. Imports of other macro packages
/// (`twin.macro`, `styled-components/macro`, ...) stay in place for their own
/// plugin. `None` means nothing was taken, so there is nothing to expand.
/// Type-only imports bind nothing at runtime and are never taken.
pub fn take_macro_imports(program: &mut Program, matcher: &Regex) -> Option<Vec<MacroBinding>> {
    let Program::Module(module) = program else {
        return None;
    };

    let mut bindings = vec![];
    let mut found = false;
    module.body.retain(|item| {
        let ModuleItem::ModuleDecl(ModuleDecl::Import(import)) = item else {
            return true;
        };
        let source = import.src.value.to_string();
        if import.type_only || !matcher.is_match(&source) || !imports_trigger(import) {
            return true;
        }

        found = true;
        for specifier in &import.specifiers {
            match specifier {
                ImportSpecifier::Named(named) if !named.is_type_only => {
                    bindings.push(MacroBinding {
                        imported: imported_name(named),
                        local: named.local.to_id(),
                    });
                }
                ImportSpecifier::Default(def) => bindings.push(MacroBinding {
                    imported: "default".into(),
                    local: def.local.to_id(),
                }),
                // Namespace imports and type-only specifiers go away with the declaration.
                _ => {}
            }
        }
        debug!(source = %source, "removed macro import");
        false
    });

    found.then_some(bindings)
}

fn imports_trigger(import: &ImportDecl) -> bool {
    import.specifiers.iter().any(|specifier| match specifier {
        ImportSpecifier::Named(named) => !named.is_type_only && imported_name(named) == TRIGGER,
        _ => false,
    })
}

fn imported_name(named: &ImportNamedSpecifier) -> String {
    match &named.imported {
        Some(ModuleExportName::Ident(i)) => i.sym.to_string(),
        Some(ModuleExportName::Str(s)) => s.value.to_string(),
        None => named.local.sym.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MacroConfig;
    use crate::testing::{parse, parse_script, print};

    fn take(src: &str) -> (Option<Vec<MacroBinding>>, String) {
        let (cm, mut program) = parse(src);
        let matcher = MacroConfig::default().source_matcher().unwrap();
        let bindings = take_macro_imports(&mut program, &matcher);
        (bindings, print(cm, &program))
    }

    #[test]
    fn keeps_files_without_macro_imports() {
        let (bindings, out) = take("import { useState } from 'react';\nconst a = 1;");
        assert!(bindings.is_none());
        assert!(out.contains("import"));
        assert!(out.contains("useState"));
    }

    #[test]
    fn removes_macro_import_and_binds_by_imported_name() {
        let (bindings, out) = take(
            "import { decorate as deco, other } from './decorate.macro';\nconst a = 1;",
        );
        let bindings = bindings.unwrap();
        let names: Vec<_> = bindings
            .iter()
            .map(|b| (b.imported.as_str(), b.local.0.to_string()))
            .collect();
        assert_eq!(
            names,
            [
                ("decorate", "deco".to_string()),
                ("other", "other".to_string()),
            ]
        );
        assert!(!out.contains("import"));
        assert!(out.contains("const a = 1"));
    }

    #[test]
    fn default_specifier_is_bound_next_to_the_trigger() {
        let (bindings, _) = take("import helpers, { decorate } from './decorate.macro';");
        let imported: Vec<_> = bindings
            .unwrap()
            .into_iter()
            .map(|b| b.imported)
            .collect();
        assert_eq!(imported, ["default", "decorate"]);
    }

    #[test]
    fn other_macro_packages_are_left_alone() {
        let (bindings, out) = take(
            "import tw from 'twin.macro';\n\
             import styled from 'styled-components/macro';\n\
             import { gql } from 'graphql.macro';\n\
             import decorate from './decorate.macro';",
        );
        assert!(bindings.is_none());
        for source in ["twin.macro", "styled-components/macro", "graphql.macro", "./decorate.macro"] {
            assert!(out.contains(source), "{source} import was removed:\n{out}");
        }
    }

    #[test]
    fn scripts_have_no_imports() {
        let (_, mut program) = parse_script("decorate(wrap, decorate.target);\nvar f = () => 1;");
        let matcher = MacroConfig::default().source_matcher().unwrap();
        assert!(take_macro_imports(&mut program, &matcher).is_none());
    }

    #[test]
    fn leaves_type_only_imports_alone() {
        let (bindings, out) = take("import type { Decorate } from './decorate.macro';");
        assert!(bindings.is_none());
        assert!(out.contains("import type"));
    }
}
