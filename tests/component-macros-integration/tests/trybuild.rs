//! trybuild compile-time tests for component_macros

#[test]
fn trybuild_interface_macro() {
    let t = trybuild::TestCases::new();
    t.pass("tests/trybuild/interface_ok.rs");
}

#[test]
fn trybuild_component_derive() {
    let t = trybuild::TestCases::new();
    t.pass("tests/trybuild/component_ok.rs");
}
