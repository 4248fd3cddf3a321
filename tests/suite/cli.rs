//! End-to-end tests for the `kiln` binary

use crate::common::{Sandbox, run_with, stderr, stdout};

const CONFIG: &str = r#"
[pipelines.shout]
stages = [
  { op = "trim" },
  { op = "uppercase" },
  { op = "suffix", value = "!" },
]

[pipelines.broken]
stages = [{ op = "replace", pattern = "(", with = "" }]
"#;

#[test]
fn builtin_slug_without_config() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["run", "slug"], "  Hello World  \nThis Is A Very Long String\n");

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "hello_world\nthis_is_a_very_long_\n");
}

#[test]
fn runs_pipeline_from_default_config() {
    let sandbox = Sandbox::new();
    sandbox.write_default_config(CONFIG);

    let output = sandbox.run(&["run", "shout"], "  hey \nyou\n");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "HEY!\nYOU!\n");
}

#[test]
fn explicit_config_flag_wins() {
    let sandbox = Sandbox::new();
    sandbox.write_default_config("[pipelines.shout]\nstages = []\n");
    let path = sandbox.write_config("custom.toml", CONFIG);

    let output = sandbox.run(&["run", "shout", "--config", path.to_str().unwrap()], "a\n");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "A!\n");
}

#[test]
fn config_env_var_is_honored() {
    let sandbox = Sandbox::new();
    let path = sandbox.write_config("env.toml", CONFIG);

    let output = run_with(
        sandbox.command().env("KILN_CONFIG", &path).args(["run", "shout"]),
        "x\n",
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "X!\n");
}

#[test]
fn unknown_pipeline_fails() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["run", "nope"], "");

    assert!(!output.status.success());
    assert!(stderr(&output).contains("unknown pipeline 'nope'"));
    assert!(stdout(&output).is_empty());
}

#[test]
fn missing_explicit_config_fails() {
    let sandbox = Sandbox::new();
    let missing = sandbox.home().join("missing.toml");

    let output = sandbox.run(&["list", "--config", missing.to_str().unwrap()], "");
    assert!(!output.status.success());
    assert!(stderr(&output).contains("failed to load configuration"));
}

#[test]
fn list_prints_pipelines() {
    let sandbox = Sandbox::new();
    sandbox.write_default_config(CONFIG);

    let output = sandbox.run(&["list"], "");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let listing = stdout(&output);
    assert!(listing.contains("shout: trim -> uppercase -> suffix\n"));
    assert!(listing.contains("slug: trim -> lowercase -> collapse_whitespace -> truncate\n"));
    assert!(listing.contains("broken: invalid ("));
}

#[test]
fn check_reports_broken_pipeline() {
    let sandbox = Sandbox::new();
    sandbox.write_default_config(CONFIG);

    let output = sandbox.run(&["check"], "");
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("pipeline 'broken' failed to build"), "stderr: {err}");
    assert!(err.contains("replace"), "stderr: {err}");
}

#[test]
fn config_log_level_writes_to_stderr_only() {
    let sandbox = Sandbox::new();
    sandbox.write_default_config("[log]\nlevel = \"info\"\n");

    let output = sandbox.run(&["run", "slug"], "A B\n");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "a_b\n");
    assert!(stderr(&output).contains("Running pipeline"));
}

#[test]
fn parse_failure_is_logged_as_warning() {
    let sandbox = Sandbox::new();
    sandbox.write_default_config("invalid toml [");

    let output = sandbox.run(&["list"], "");
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("WARN"), "stderr: {err}");
    assert!(err.contains("Failed to parse config at"), "stderr: {err}");
    assert!(err.contains("failed to load configuration"), "stderr: {err}");
}

#[test]
fn missing_explicit_config_is_logged_as_warning() {
    let sandbox = Sandbox::new();
    let missing = sandbox.home().join("missing.toml");

    let output = sandbox.run(&["check", "--config", missing.to_str().unwrap()], "");
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Failed to read config at"));
}

#[test]
fn config_load_is_logged_at_debug() {
    let sandbox = Sandbox::new();
    sandbox.write_default_config(CONFIG);

    let output = run_with(sandbox.command().env("RUST_LOG", "debug").arg("list"), "");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("Config loaded"));
    assert!(!stdout(&output).contains("Config loaded"));
}
