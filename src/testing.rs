use swc_core::{
    common::{sync::Lrc, SourceMap},
    ecma::ast::Program,
};

use crate::{
    config::MacroConfig,
    imports::take_macro_imports,
    references::{collect_references, References},
};

#[path = "../tests/common/mod.rs"]
mod common;

pub(crate) use common::{parse, parse_script, print};

/// Parses `src` and resolves its macro imports the way the plugin does.
pub(crate) fn parse_with_references(src: &str) -> (Lrc<SourceMap>, Program, References) {
    let (cm, mut program) = parse(src);
    let matcher = MacroConfig::default()
        .source_matcher()
        .expect("default pattern compiles");
    let bindings = take_macro_imports(&mut program, &matcher).unwrap_or_default();
    let references = collect_references(&program, &bindings);
    (cm, program, references)
}
