use dll2lib::{
    convert::{ConvertError, ConverterBuilder},
    dump::{DumpFormatError, TranslateError},
    process::{ToolArg, ToolError},
};

use crate::utils::{
    def_text,
    fake_tools::{BareNameFinder, FAKE_ARCHIVE, FakeToolRunner},
    scratch::ScratchDir,
};

const WIDGETS_DUMP: &str = include_str!("../translate/widgets.dmp");
const EXECUTABLE_DUMP: &str = include_str!("../translate/executable.dmp");

/// Not a real image. The converter only warns about it.
const INPUT_DLL: &[u8] = b"MZ placeholder";

#[test]
fn import_library() {
    let scratch = ScratchDir::new("convert-import-library");
    let input = scratch.write("widgets.dll", INPUT_DLL);
    let runner = FakeToolRunner::new(WIDGETS_DUMP);

    let converter = ConverterBuilder::new()
        .tool_finder(BareNameFinder)
        .tool_runner(&runner)
        .build();

    let library = converter.convert(&input).expect("Could not convert DLL");

    assert_eq!(library, scratch.path().join("widgets.lib"));
    assert_eq!(std::fs::read(&library).unwrap(), FAKE_ARCHIVE);

    assert_eq!(runner.tool_names(), ["dumpbin", "lib"]);
    assert_eq!(
        runner.definitions(),
        [def_text(&[
            "EXPORTS",
            "CreateWidget",
            "DestroyWidget",
            "DllRegisterServer PRIVATE",
            "HeapAlloc",
            "DllCanUnloadNow PRIVATE",
        ])]
    );

    assert!(!scratch.path().join("widgets.dmp").exists());
    assert!(!scratch.path().join("widgets.def").exists());
}

#[test]
fn tool_arguments() {
    let scratch = ScratchDir::new("convert-tool-arguments");
    let input = scratch.write("widgets.dll", INPUT_DLL);
    let runner = FakeToolRunner::new(WIDGETS_DUMP);

    ConverterBuilder::new()
        .tool_finder(BareNameFinder)
        .tool_runner(&runner)
        .build()
        .convert(&input)
        .expect("Could not convert DLL");

    let invocations = runner.invocations();
    let [dumpbin, lib] = invocations.as_slice() else {
        panic!("expected 2 tool invocations, found {}", invocations.len());
    };

    assert_eq!(
        dumpbin.path_for("/out:"),
        Some(scratch.path().join("widgets.dmp").as_path())
    );
    assert_eq!(dumpbin.path_for(""), Some(input.as_path()));
    assert_eq!(dumpbin.args()[1], ToolArg::Plain("/exports".into()));

    assert_eq!(lib.args()[0], ToolArg::Plain("/machine:arm".into()));
    assert_eq!(
        lib.path_for("/def:"),
        Some(scratch.path().join("widgets.def").as_path())
    );
    assert_eq!(
        lib.path_for("/out:"),
        Some(scratch.path().join("widgets.lib").as_path())
    );
}

#[test]
fn keep_intermediates() {
    let scratch = ScratchDir::new("convert-keep-intermediates");
    let input = scratch.write("widgets.dll", INPUT_DLL);
    let runner = FakeToolRunner::new(WIDGETS_DUMP);

    ConverterBuilder::new()
        .tool_finder(BareNameFinder)
        .tool_runner(&runner)
        .clean(false)
        .build()
        .convert(&input)
        .expect("Could not convert DLL");

    assert_eq!(
        std::fs::read_to_string(scratch.path().join("widgets.dmp")).unwrap(),
        WIDGETS_DUMP
    );
    assert_eq!(
        std::fs::read_to_string(scratch.path().join("widgets.def")).unwrap(),
        runner.definitions()[0]
    );
}

#[test]
fn dumpbin_failure() {
    let scratch = ScratchDir::new("convert-dumpbin-failure");
    let input = scratch.write("widgets.dll", INPUT_DLL);
    let runner = FakeToolRunner::new(WIDGETS_DUMP).dumpbin_exit(2);

    let err = ConverterBuilder::new()
        .tool_finder(BareNameFinder)
        .tool_runner(&runner)
        .build()
        .convert(&input)
        .unwrap_err();

    assert!(
        matches!(err, ConvertError::Dump(ToolError::Failed { code: 2, .. })),
        "unexpected error {err:?}"
    );
    assert_eq!(runner.tool_names(), ["dumpbin"]);
    assert!(!scratch.path().join("widgets.dmp").exists());
    assert!(!scratch.path().join("widgets.def").exists());
}

#[test]
fn unexpected_listing() {
    let scratch = ScratchDir::new("convert-unexpected-listing");
    let input = scratch.write("widgets.dll", INPUT_DLL);
    let runner = FakeToolRunner::new(EXECUTABLE_DUMP);

    let err = ConverterBuilder::new()
        .tool_finder(BareNameFinder)
        .tool_runner(&runner)
        .build()
        .convert(&input)
        .unwrap_err();

    assert!(
        matches!(
            err,
            ConvertError::Translate(TranslateError::Format {
                error: DumpFormatError::FileType { .. },
                ..
            })
        ),
        "unexpected error {err:?}"
    );
    assert_eq!(runner.tool_names(), ["dumpbin"]);
    assert!(!scratch.path().join("widgets.dmp").exists());
    assert!(!scratch.path().join("widgets.def").exists());
    assert!(!scratch.path().join("widgets.lib").exists());
}

#[test]
fn unexpected_listing_kept() {
    let scratch = ScratchDir::new("convert-unexpected-listing-kept");
    let input = scratch.write("widgets.dll", INPUT_DLL);
    let runner = FakeToolRunner::new(EXECUTABLE_DUMP);

    ConverterBuilder::new()
        .tool_finder(BareNameFinder)
        .tool_runner(&runner)
        .clean(false)
        .build()
        .convert(&input)
        .unwrap_err();

    assert!(scratch.path().join("widgets.dmp").exists());
    assert!(!scratch.path().join("widgets.def").exists());
}

#[test]
fn lib_failure() {
    let scratch = ScratchDir::new("convert-lib-failure");
    let input = scratch.write("widgets.dll", INPUT_DLL);
    let runner = FakeToolRunner::new(WIDGETS_DUMP).lib_exit(1120);

    let err = ConverterBuilder::new()
        .tool_finder(BareNameFinder)
        .tool_runner(&runner)
        .build()
        .convert(&input)
        .unwrap_err();

    assert!(
        matches!(&err, ConvertError::Archive(e) if e.exit_code() == Some(1120)),
        "unexpected error {err:?}"
    );
    assert_eq!(runner.tool_names(), ["dumpbin", "lib"]);
    assert!(!scratch.path().join("widgets.dmp").exists());
    assert!(!scratch.path().join("widgets.def").exists());
    assert!(!scratch.path().join("widgets.lib").exists());
}

#[test]
fn missing_input() {
    let scratch = ScratchDir::new("convert-missing-input");
    let input = scratch.path().join("missing.dll");
    let runner = FakeToolRunner::new(WIDGETS_DUMP);

    let err = ConverterBuilder::new()
        .tool_finder(BareNameFinder)
        .tool_runner(&runner)
        .build()
        .convert(&input)
        .unwrap_err();

    assert!(
        matches!(&err, ConvertError::InputNotFound(path) if *path == input),
        "unexpected error {err:?}"
    );
    assert!(runner.invocations().is_empty());
}
