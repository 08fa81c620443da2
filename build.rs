use std::env;
use std::process::Command;

/// Trimmed stdout of a command, or "unknown" when it can't be run
fn command_output(program: &str, args: &[&str]) -> String {
    Command::new(program)
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|stdout| stdout.trim().to_string())
        .filter(|stdout| !stdout.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

fn main() {
    let build_date = chrono::Utc::now()
        .format("%Y-%m-%d %H:%M:%S UTC")
        .to_string();
    println!("cargo:rustc-env=BUILD_DATE={build_date}");

    let rustc_version =
        env::var("RUSTC_VERSION").unwrap_or_else(|_| command_output("rustc", &["--version"]));
    println!("cargo:rustc-env=RUST_VERSION={rustc_version}");

    let git_commit = command_output("git", &["rev-parse", "--short", "HEAD"]);
    println!("cargo:rustc-env=GIT_COMMIT={git_commit}");

    let git_branch = command_output("git", &["rev-parse", "--abbrev-ref", "HEAD"]);
    println!("cargo:rustc-env=GIT_BRANCH={git_branch}");

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=Cargo.toml");
}
