// End-to-end tests for the process-hooks binary
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;

use test_utils::{hook_document, Workspace};

fn process_hooks() -> Command {
    let mut cmd = Command::cargo_bin("process-hooks").unwrap();
    cmd.env_remove("RUST_LOG").env("NO_COLOR", "1");
    cmd
}

fn run_stdout(workspace: &Workspace) -> String {
    let output = process_hooks()
        .args(workspace.args())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    String::from_utf8(output).unwrap()
}

#[test]
fn test_help_flag_works() {
    process_hooks()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("process-hooks"));
}

#[test]
fn test_version_flag_works() {
    process_hooks()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_wrong_argument_counts_fail_without_output() {
    let workspace = Workspace::new();
    let hooks = workspace.hooks_dir.to_str().unwrap().to_string();
    let scripts = workspace.scripts_dir.to_str().unwrap().to_string();
    let settings = workspace.settings_output.to_str().unwrap().to_string();
    workspace.write_hook("a.yaml", &hook_document("a", &["Stop"], "", "a.sh"));

    let cases: Vec<Vec<String>> = vec![
        vec![],
        vec![hooks.clone()],
        vec![hooks.clone(), scripts.clone()],
        vec![hooks.clone(), scripts.clone(), settings.clone(), "extra".to_string()],
    ];

    for args in cases {
        process_hooks()
            .current_dir(workspace.root())
            .args(&args)
            .assert()
            .code(1)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains(
                "Usage: process-hooks <hooks_dir> <scripts_output_dir> <settings_output_path>",
            ));

        assert!(!workspace.scripts_dir.exists(), "args {args:?} created scripts dir");
        assert!(!workspace.debug_config().exists());
        assert!(!workspace.settings_output.exists());
    }
}

#[test]
fn test_grouping_and_distinct_matchers() {
    let workspace = Workspace::new();
    workspace.write_hook(
        "01-first.yaml",
        &hook_document("first", &["PreToolUse"], "Bash", "first.sh"),
    );
    workspace.write_hook(
        "02-second.yaml",
        &hook_document("second", &["PreToolUse"], "Bash", "second.sh"),
    );
    workspace.write_hook(
        "03-edit.yaml",
        &hook_document("edit", &["PreToolUse", "PostToolUse"], "Edit", "edit.sh"),
    );

    let stdout = run_stdout(&workspace);
    let config: Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(
        config,
        json!({
            "hooks": {
                "PreToolUse": [
                    {
                        "matcher": "Bash",
                        "hooks": [
                            { "type": "command", "command": "first.sh" },
                            { "type": "command", "command": "second.sh" }
                        ]
                    },
                    {
                        "matcher": "Edit",
                        "hooks": [{ "type": "command", "command": "edit.sh" }]
                    }
                ],
                "PostToolUse": [
                    {
                        "matcher": "Edit",
                        "hooks": [{ "type": "command", "command": "edit.sh" }]
                    }
                ]
            }
        })
    );

    // Debug copy matches stdout (minus the trailing newline of println)
    assert_eq!(
        fs::read_to_string(workspace.debug_config()).unwrap(),
        stdout.trim_end()
    );
    // Settings output is reserved and left untouched
    assert!(!workspace.settings_output.exists());
}

#[test]
fn test_scripts_are_generated() {
    let workspace = Workspace::new();
    workspace.write_hook(
        "guard.yaml",
        "id: guard\nevents:\n  - PreToolUse\nconfiguration:\n  matcher: \"Bash\"\n  command: \"$HOOKS/guard.sh\"\nscript: |\n  echo checking\n  exit 0\n",
    );
    workspace.write_hook(
        "py.yaml",
        "id: py\nevents:\n  - Stop\nconfiguration:\n  matcher: \"\"\n  command: \"py.sh\"\nscript: |\n  #!/usr/bin/env python3\n  print('done')\n",
    );

    process_hooks()
        .args(workspace.args())
        .assert()
        .success()
        .stderr(predicate::str::contains("Processing hook: guard.yaml"))
        .stderr(predicate::str::contains("Created script: guard.sh"))
        .stderr(predicate::str::contains("Added to event: PreToolUse"))
        .stderr(predicate::str::contains("Hooks configuration saved to:"));

    let guard = workspace.scripts_dir.join("guard.sh");
    assert_eq!(
        fs::read_to_string(&guard).unwrap(),
        "#!/bin/bash\necho checking\nexit 0"
    );
    assert_eq!(
        fs::read_to_string(workspace.scripts_dir.join("py.sh")).unwrap(),
        "#!/usr/bin/env python3\nprint('done')"
    );

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(&guard).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}

#[test]
fn test_unreadable_document_is_skipped() {
    let workspace = Workspace::new();
    workspace.write_hook("a.yaml", &hook_document("a", &["Stop"], "", "a.sh"));
    // Invalid UTF-8 cannot be read as text
    fs::write(workspace.hooks_dir.join("b.yaml"), [0xff, 0xfe, 0x00, 0xc3]).unwrap();
    workspace.write_hook("c.yaml", &hook_document("c", &["Stop"], "", "c.sh"));

    let assert = process_hooks()
        .args(workspace.args())
        .assert()
        .code(0)
        .stderr(predicate::str::contains("Error processing"))
        .stderr(predicate::str::contains("b.yaml"));

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let config: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(
        config["hooks"]["Stop"],
        json!([{
            "matcher": "",
            "hooks": [
                { "type": "command", "command": "a.sh" },
                { "type": "command", "command": "c.sh" }
            ]
        }])
    );
}

#[test]
fn test_rerun_is_byte_identical() {
    let workspace = Workspace::new();
    for (file, id, event) in [
        ("zeta.yaml", "zeta", "Stop"),
        ("alpha.yaml", "alpha", "PreToolUse"),
        ("mid.yaml", "mid", "Stop"),
    ] {
        workspace.write_hook(file, &hook_document(id, &[event], "", &format!("{id}.sh")));
    }

    let first = run_stdout(&workspace);
    fs::remove_dir_all(workspace.root().join("build")).unwrap();
    let second = run_stdout(&workspace);

    assert_eq!(first, second);
    // Events follow file-name order: alpha.yaml registers PreToolUse first
    assert!(first.find("PreToolUse").unwrap() < first.find("Stop").unwrap());
}

#[test]
fn test_empty_hooks_dir() {
    let workspace = Workspace::new();
    let stdout = run_stdout(&workspace);
    assert_eq!(stdout, "{\n  \"hooks\": {}\n}\n");
    assert!(workspace.scripts_dir.is_dir());
}

#[test]
fn test_merge_template_opt_in() {
    let workspace = Workspace::new();
    workspace.write_hook(
        "bash.yaml",
        &hook_document("bash", &["PreToolUse"], "Bash", "new.sh"),
    );
    let template = workspace.root().join("settings.template.json");
    fs::write(
        &template,
        r#"{
  "permissions": { "allow": ["Bash(ls)"] },
  "hooks": {
    "PreToolUse": [
      { "matcher": "Bash", "hooks": [{ "type": "command", "command": "old.sh" }] }
    ]
  }
}"#,
    )
    .unwrap();

    process_hooks()
        .arg("--merge-template")
        .arg(&template)
        .args(workspace.args())
        .assert()
        .success();

    let merged: Value =
        serde_json::from_str(&fs::read_to_string(&workspace.settings_output).unwrap()).unwrap();
    assert_eq!(merged["permissions"]["allow"][0], "Bash(ls)");
    assert_eq!(
        merged["hooks"]["PreToolUse"][0]["hooks"],
        json!([
            { "type": "command", "command": "old.sh" },
            { "type": "command", "command": "new.sh" }
        ])
    );
}

#[test]
fn test_invalid_merge_template_fails() {
    let workspace = Workspace::new();
    let template = workspace.root().join("broken.json");
    fs::write(&template, "{ nope").unwrap();

    process_hooks()
        .arg("--merge-template")
        .arg(&template)
        .args(workspace.args())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid JSON"));
}

#[test]
fn test_quiet_suppresses_trace() {
    let workspace = Workspace::new();
    workspace.write_hook("a.yaml", &hook_document("a", &["Stop"], "", "a.sh"));

    process_hooks()
        .arg("--quiet")
        .args(workspace.args())
        .assert()
        .success()
        .stderr(predicate::str::contains("Processing hook").not());
}

#[test]
fn test_id_collision_warns_and_last_script_wins() {
    let workspace = Workspace::new();
    workspace.write_hook(
        "a.yaml",
        "id: shared\nevents:\n  - Stop\nconfiguration:\n  matcher: \"\"\n  command: \"a.sh\"\nscript: |\n  echo first\n",
    );
    workspace.write_hook(
        "b.yaml",
        "id: shared\nevents:\n  - Stop\nconfiguration:\n  matcher: \"\"\n  command: \"b.sh\"\nscript: |\n  echo second\n",
    );

    process_hooks()
        .args(workspace.args())
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Hook id already produced a script in this run, overwriting it",
        ));

    assert_eq!(
        fs::read_to_string(workspace.scripts_dir.join("shared.sh")).unwrap(),
        "#!/bin/bash\necho second"
    );
}

#[test]
fn test_path_like_id_warns() {
    let workspace = Workspace::new();
    workspace.write_hook(
        "escape.yaml",
        "id: ../escape\nevents:\n  - Stop\nconfiguration:\n  matcher: \"\"\n  command: \"escape.sh\"\nscript: |\n  echo out\n",
    );

    process_hooks()
        .args(workspace.args())
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "is a path, script is written outside the scripts directory",
        ));
}

#[test]
fn test_missing_hooks_dir_warns_and_emits_empty_config() {
    let workspace = Workspace::new();
    let missing = workspace.root().join("no-such-hooks");

    process_hooks()
        .arg(&missing)
        .arg(&workspace.scripts_dir)
        .arg(&workspace.settings_output)
        .assert()
        .success()
        .stdout("{\n  \"hooks\": {}\n}\n")
        .stderr(predicate::str::contains("Hooks directory not found"));
}
