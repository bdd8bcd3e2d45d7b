use assert_cmd::Command;
use predicates::str::contains;

mod support;
use support::TestEnv;

#[test]
fn agenda_help_works() {
    Command::cargo_bin("agenda")
        .expect("binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("tasks grouped by due date"));
}

#[test]
fn subcommand_help_works() {
    let subcommands = [
        "init", "add", "list", "show", "done", "reopen", "due", "project", "rm", "projects",
        "board",
    ];

    for cmd in subcommands {
        Command::cargo_bin("agenda")
            .expect("binary")
            .arg(cmd)
            .arg("--help")
            .assert()
            .success();
    }
}

#[test]
fn unknown_task_id_is_a_user_error() {
    let env = TestEnv::new();
    env.cmd()
        .args(["show", "42"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("No task with id 42"));
}

#[test]
fn init_is_idempotent() {
    let env = TestEnv::new();
    env.cmd()
        .arg("init")
        .assert()
        .success()
        .stdout(contains("initialized"));
    env.cmd()
        .arg("init")
        .assert()
        .success()
        .stdout(contains("nothing to do"));
    assert!(env.data_dir().exists());
}

#[test]
fn projects_lists_the_default_catalog() {
    let env = TestEnv::new();
    env.cmd()
        .arg("projects")
        .assert()
        .success()
        .stdout(contains("project-a  Project A"))
        .stdout(contains("project-c  Project C"));
}

#[test]
fn projects_honours_a_custom_catalog() {
    let env = TestEnv::new();
    env.write_config(
        r#"
        [[projects]]
        id = "home"
        name = "Home"
        "#,
    );
    let report = env.run_json(&["projects"]);
    let projects = report["data"]["projects"].as_array().expect("projects");
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["id"], "home");
}
