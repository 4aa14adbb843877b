use anyhow::Result;
use serde_json::Value;

use crate::CliTest;

const APP: &str = "export const title = \"你好\";\n";

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn dictionary(test: &CliTest) -> Result<serde_json::Map<String, Value>> {
    let content = test.read_file("output/zh_CN.json")?;
    match serde_json::from_str(&content)? {
        Value::Object(map) => Ok(map),
        other => panic!("expected an object, got {other}"),
    }
}

#[test]
fn test_dry_run_leaves_files_alone() -> Result<()> {
    let test = CliTest::with_config()?;
    test.write_file("src/app.ts", APP)?;

    let output = test.extract_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let stdout = stdout(&output);
    assert!(stdout.contains("extract: \"你好\""));
    assert!(stdout.contains("--> ./src/app.ts:1:22"));
    assert!(stdout.contains("run with --apply to apply"));

    assert_eq!(test.read_file("src/app.ts")?, APP);
    assert!(!test.root().join("output").exists());

    Ok(())
}

#[test]
fn test_dry_run_counts_merged_dictionary() -> Result<()> {
    let test = CliTest::with_config()?;
    test.write_file("src/app.ts", APP)?;
    test.write_file("output/zh_CN.json", "{\"kept\": \"保留\"}\n")?;

    let output = test.extract_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("would rewrite 1 file, 2 keys in"));
    assert_eq!(
        test.read_file("output/zh_CN.json")?,
        "{\"kept\": \"保留\"}\n"
    );

    Ok(())
}

#[test]
fn test_apply_rewrites_source_and_dictionary() -> Result<()> {
    let test = CliTest::with_config()?;
    test.write_file("src/app.ts", APP)?;

    let output = test.extract_command().arg("--apply").output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Rewrote 1 file, 1 key in"));

    let rewritten = test.read_file("src/app.ts")?;
    let mut lines = rewritten.lines();
    assert_eq!(
        lines.next(),
        Some("import { getLangMsg } from \"@/utils/intl\";")
    );
    insta::with_settings!({filters => vec![(r"\b[0-9a-f]{15}\b", "[KEY]")]}, {
        insta::assert_snapshot!(lines.next().unwrap_or_default(), @r#"export const title = getLangMsg("[KEY]").d("你好");"#);
    });

    let dictionary = dictionary(&test)?;
    assert_eq!(dictionary.len(), 1);
    let (key, value) = dictionary.iter().next().unwrap();
    assert_eq!(key.len(), 15);
    assert_eq!(value, "你好");
    assert!(rewritten.contains(key.as_str()));

    Ok(())
}

#[test]
fn test_second_apply_changes_nothing() -> Result<()> {
    let test = CliTest::with_config()?;
    test.write_file("src/app.tsx", "export const App = () => <p>欢迎{name}</p>;\n")?;

    test.extract_command().arg("--apply").output()?;
    let source = test.read_file("src/app.tsx")?;
    let artifact = test.read_file("output/zh_CN.json")?;

    let output = test.extract_command().arg("--apply").output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Rewrote 0 files"));
    assert_eq!(test.read_file("src/app.tsx")?, source);
    assert_eq!(test.read_file("output/zh_CN.json")?, artifact);

    Ok(())
}

#[test]
fn test_merges_into_existing_dictionary() -> Result<()> {
    let test = CliTest::with_config()?;
    test.write_file("src/app.ts", APP)?;
    test.write_file("output/zh_CN.json", "{\"kept\": \"保留\"}\n")?;

    let output = test.extract_command().arg("--apply").output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let dictionary = dictionary(&test)?;
    assert_eq!(dictionary.len(), 2);
    assert_eq!(dictionary["kept"], "保留");

    Ok(())
}

#[test]
fn test_rebuild_drops_stale_entries() -> Result<()> {
    let test = CliTest::with_config()?;
    test.write_file("src/app.ts", APP)?;
    test.write_file("output/zh_CN.json", "{\"stale\": \"过时\"}\n")?;

    let output = test
        .extract_command()
        .args(["--apply", "--rebuild"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let dictionary = dictionary(&test)?;
    assert_eq!(dictionary.len(), 1);
    assert!(!dictionary.contains_key("stale"));

    Ok(())
}

#[test]
fn test_output_override() -> Result<()> {
    let test = CliTest::with_config()?;
    test.write_file("src/app.ts", APP)?;

    let output = test
        .extract_command()
        .args(["--apply", "--output", "locales/zh.json"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    assert!(test.root().join("locales/zh.json").exists());
    assert!(!test.root().join("output").exists());

    Ok(())
}

#[test]
fn test_missing_lookup_options_is_an_error() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".autointlrc.json", "{\"includes\": [\"src\"]}\n")?;
    test.write_file("src/app.ts", APP)?;

    let output = test.extract_command().arg("--apply").output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).starts_with("error:"));
    assert_eq!(test.read_file("src/app.ts")?, APP);

    Ok(())
}

#[test]
fn test_broken_dictionary_aborts_before_rewrite() -> Result<()> {
    let test = CliTest::with_config()?;
    test.write_file("src/app.ts", APP)?;
    test.write_file("output/zh_CN.json", "[1, 2]\n")?;

    let output = test.extract_command().arg("--apply").output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("zh_CN.json"));
    assert_eq!(test.read_file("src/app.ts")?, APP);

    Ok(())
}

#[test]
fn test_unparsable_file_reported_others_processed() -> Result<()> {
    let test = CliTest::with_config()?;
    test.write_file("src/app.ts", APP)?;
    test.write_file("src/broken.ts", "const = ;\n")?;

    let output = test.extract_command().arg("--apply").output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("error: ./src/broken.ts"));
    assert!(stdout(&output).contains("1 file failed"));

    assert_ne!(test.read_file("src/app.ts")?, APP);
    assert_eq!(test.read_file("src/broken.ts")?, "const = ;\n");
    assert_eq!(dictionary(&test)?.len(), 1);

    Ok(())
}
