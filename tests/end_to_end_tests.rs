use std::fs;
use std::path::Path;
use std::time::Duration;

use tailwind_template_scanner::{run_scan, ScannerConfig};
use tempfile::tempdir;

fn config_for(root: &Path) -> ScannerConfig {
    ScannerConfig {
        root: root.to_path_buf(),
        files: vec![],
        output: root.join("frontend/src/templates.js"),
        ignore_file: None,
        use_ignore: true,
        exclude: vec![],
        extensions: vec!["py".to_string()],
        keywords: vec![],
        base_tokens: vec![],
        debounce: Duration::from_millis(500),
        dry_run: false,
    }
}

#[test]
fn test_end_to_end_artifact_generation() {
    let temp_dir = tempdir().unwrap();

    fs::write(
        temp_dir.path().join("layout.py"),
        r#"
def layout(content):
    return div(class_='container mx-auto',
        header('.flex .items-center'),
        content,
        footer(class_="mt-8 text-gray-600"))
"#,
    )
    .unwrap();

    fs::write(
        temp_dir.path().join("buttons.py"),
        r"
def danger_button(label):
    return button.bg-red-500.hover\:text-white(label)
",
    )
    .unwrap();

    let summary = run_scan(&config_for(temp_dir.path())).unwrap();
    assert_eq!(summary.files_scanned, 2);
    assert!(summary.classes_found > 0);
    assert!(summary.wrote_artifact);

    let content = fs::read_to_string(&summary.output).unwrap();
    assert!(content.contains("\"container\""));
    assert!(content.contains("\"flex\""));
    assert!(content.contains("\"bg-red-500\""));
    assert!(content.contains("\"hover:text-white\""));
    assert!(content.contains("export default templateClasses;"));

    // Sorted and deduplicated.
    let bg = content.find("bg-red-500").unwrap();
    let container = content.find("container").unwrap();
    let mt8 = content.find("mt-8").unwrap();
    assert!(bg < container && container < mt8);
    assert_eq!(content.matches("\"flex\"").count(), 1);
}

#[test]
fn test_repeated_scans_are_byte_identical() {
    let temp_dir = tempdir().unwrap();
    fs::write(
        temp_dir.path().join("page.py"),
        "div(class_='flex gap-2')\nspan.mx-4.p-2",
    )
    .unwrap();

    let config = config_for(temp_dir.path());
    run_scan(&config).unwrap();
    let first = fs::read(&config.output).unwrap();
    run_scan(&config).unwrap();
    let second = fs::read(&config.output).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_artifact_is_independent_of_traversal_order() {
    // The same class sets distributed over differently-named files must
    // serialize identically.
    let dir_a = tempdir().unwrap();
    fs::write(dir_a.path().join("a.py"), "div('.zebra')").unwrap();
    fs::write(dir_a.path().join("b.py"), "div('.aardvark')").unwrap();

    let dir_b = tempdir().unwrap();
    fs::write(dir_b.path().join("a.py"), "div('.aardvark')").unwrap();
    fs::write(dir_b.path().join("b.py"), "div('.zebra')").unwrap();

    let config_a = config_for(dir_a.path());
    let config_b = config_for(dir_b.path());
    run_scan(&config_a).unwrap();
    run_scan(&config_b).unwrap();

    assert_eq!(
        fs::read(&config_a.output).unwrap(),
        fs::read(&config_b.output).unwrap()
    );
}

#[test]
fn test_ignored_files_contribute_nothing() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join(".gitignore"), "generated/\n*.skip.py\n").unwrap();
    fs::write(temp_dir.path().join("kept.py"), "div('.should-find')").unwrap();
    fs::write(temp_dir.path().join("a.skip.py"), "div('.should-not-find')").unwrap();
    fs::create_dir(temp_dir.path().join("generated")).unwrap();
    fs::write(
        temp_dir.path().join("generated/out.py"),
        "div('.also-should-not-find')",
    )
    .unwrap();

    let config = config_for(temp_dir.path());
    run_scan(&config).unwrap();

    let content = fs::read_to_string(&config.output).unwrap();
    assert!(content.contains("should-find"));
    assert!(!content.contains("should-not-find"));
    assert!(!content.contains("also-should-not-find"));
}

#[test]
fn test_empty_scan_writes_importable_stub() {
    let temp_dir = tempdir().unwrap();

    let config = config_for(temp_dir.path());
    let summary = run_scan(&config).unwrap();
    assert_eq!(summary.classes_found, 0);

    let content = fs::read_to_string(&config.output).unwrap();
    assert!(content.contains("const templateClasses = [];"));
    assert!(content.contains("export default templateClasses;"));
}

#[test]
fn test_explicit_file_targets_limit_the_scan() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join("one.py"), "div('.bg-blue-500')").unwrap();
    fs::write(temp_dir.path().join("two.py"), "span(class_='text-white')").unwrap();
    fs::write(temp_dir.path().join("three.py"), "div('.p-4')").unwrap();

    let mut config = config_for(temp_dir.path());
    config.files = vec!["one.py".into(), "two.py".into()];
    run_scan(&config).unwrap();

    let content = fs::read_to_string(&config.output).unwrap();
    assert!(content.contains("bg-blue-500"));
    assert!(content.contains("text-white"));
    assert!(!content.contains("p-4"));
}

#[test]
fn test_dry_run_does_not_write() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join("page.py"), "div('.flex')").unwrap();

    let mut config = config_for(temp_dir.path());
    config.dry_run = true;
    let summary = run_scan(&config).unwrap();

    assert_eq!(summary.classes_found, 1);
    assert!(!summary.wrote_artifact);
    assert!(!config.output.exists());
}

#[test]
fn test_graceful_degradation_within_a_file() {
    let temp_dir = tempdir().unwrap();
    fs::write(
        temp_dir.path().join("partial.py"),
        "div(class_='broken\ndiv(class_='flex items-center')",
    )
    .unwrap();

    let config = config_for(temp_dir.path());
    run_scan(&config).unwrap();

    let content = fs::read_to_string(&config.output).unwrap();
    assert!(content.contains("flex"));
    assert!(content.contains("items-center"));
    assert!(!content.contains("broken"));
}
