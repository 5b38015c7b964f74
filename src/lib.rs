use swc_core::{
    ecma::ast::Program,
    plugin::{plugin_transform, proxies::TransformPluginProgramMetadata},
};
use tracing::debug;

mod config;
mod error;
mod imports;
mod locate;
mod references;
mod rewrite;
#[cfg(test)]
mod testing;

pub use config::{MacroConfig, DEFAULT_SOURCE_PATTERN};
pub use error::MacroError;
pub use imports::{take_macro_imports, MacroBinding};
pub use locate::{enclosing_statement, Slot};
pub use references::{
    collect_references, trigger_calls, Reference, ReferenceKind, References, TRIGGER,
};
pub use rewrite::{apply, Decorated, PLACEHOLDER};

// -----------------------------------------------------------------------------
// Transform
// -----------------------------------------------------------------------------

/// Expands every `decorate(...)` call of `program`.
///
/// `references` maps each name imported from the macro module to its usage
/// sites. On failure the partially edited program is dropped.
pub fn transform(mut program: Program, references: &References) -> Result<Program, MacroError> {
    expand(&mut program, references)?;
    Ok(program)
}

/// In-place [`transform`], returning how many declarations were decorated.
///
/// Calls are processed last discovered first, so a rewrite never moves a
/// site that still has to be visited.
pub fn expand(program: &mut Program, references: &References) -> Result<usize, MacroError> {
    let triggers = trigger_calls(references)?;
    for reference in &triggers {
        let slot = enclosing_statement(program, reference)?;
        let decorated = apply(program, slot)?;
        debug!(
            decorator = %decorated.decorator,
            declaration = ?decorated.target,
            placeholders = decorated.placeholders,
            "decorated declaration"
        );
    }
    Ok(triggers.len())
}

/// Resolves the macro imports of `program` and expands them.
///
/// Programs that never import a macro module are left untouched.
pub fn expand_macros(program: &mut Program, config: &MacroConfig) -> Result<usize, MacroError> {
    let matcher = config.source_matcher()?;
    let Some(bindings) = take_macro_imports(program, &matcher) else {
        return Ok(0);
    };
    let references = collect_references(program, &bindings);
    expand(program, &references)
}

// -----------------------------------------------------------------------------
// Entrypoint
// -----------------------------------------------------------------------------

#[plugin_transform]
pub fn process_transform(mut program: Program, metadata: TransformPluginProgramMetadata) -> Program {
    let config = metadata
        .get_transform_plugin_config()
        .map(|raw| MacroConfig::from_json(&raw))
        .unwrap_or_default();

    if let Err(err) = expand_macros(&mut program, &config) {
        err.emit();
    }

    program
}
