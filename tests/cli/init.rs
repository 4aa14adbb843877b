use anyhow::{Context, Result};
use insta_cmd::assert_cmd_snapshot;
use serde_json::Value;

use crate::CliTest;

/// Validates config file structure and starter values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    for field in ["includes", "output", "importSource", "bindingName", "callTemplate"] {
        assert!(
            parsed.get(field).is_some(),
            "Config should have '{field}' field"
        );
    }
    assert_eq!(parsed["callTemplate"], "getLangMsg({args}).d({source})");

    assert!(
        content.contains("\n  \""),
        "Config should use 2-space indentation"
    );

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.command().arg("init"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Created .autointlrc.json

    ----- stderr -----
    ");

    assert!(test.root().join(".autointlrc.json").exists());
    let content = test.read_file(".autointlrc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".autointlrc.json", "{}")?;

    let output = test.command().arg("init").output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("already exists"));
    assert_eq!(test.read_file(".autointlrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;

    test.command().arg("init").output()?;
    test.write_file(
        "src/app.tsx",
        r#"export function App() { return <div>测试</div>; }"#,
    )?;

    let output = test.extract_command().arg("--apply").output()?;
    assert!(
        output.status.success(),
        "Extract should work with initialized config. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(test.read_file("src/app.tsx")?.contains("getLangMsg("));
    assert!(test.root().join("output/zh_CN.json").exists());

    Ok(())
}
