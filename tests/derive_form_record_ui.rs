#[test]
fn form_record_derive_ui() {
    let testcases = trybuild::TestCases::new();
    testcases.pass("tests/ui/form_record/pass.rs");
}
