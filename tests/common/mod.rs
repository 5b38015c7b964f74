//! Parse/print helpers shared by the integration tests and the unit tests.
#![allow(dead_code)]

use swc_core::{
    common::{sync::Lrc, FileName, SourceMap},
    ecma::{
        ast::{EsVersion, Program},
        codegen::to_code_default,
        parser::{parse_file_as_module, parse_file_as_script, Syntax, TsSyntax},
    },
};

pub fn parse(src: &str) -> (Lrc<SourceMap>, Program) {
    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(FileName::Anon.into(), src.to_string());
    let module = parse_file_as_module(
        &fm,
        Syntax::Typescript(TsSyntax::default()),
        EsVersion::latest(),
        None,
        &mut vec![],
    )
    .expect("test source should parse");
    (cm, Program::Module(module))
}

pub fn parse_script(src: &str) -> (Lrc<SourceMap>, Program) {
    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(FileName::Anon.into(), src.to_string());
    let script = parse_file_as_script(
        &fm,
        Syntax::Es(Default::default()),
        EsVersion::latest(),
        None,
        &mut vec![],
    )
    .expect("test script should parse");
    (cm, Program::Script(script))
}

pub fn print(cm: Lrc<SourceMap>, program: &Program) -> String {
    to_code_default(cm, None, program)
}
