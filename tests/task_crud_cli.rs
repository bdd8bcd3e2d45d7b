use std::fs;

use predicates::str::contains;

mod support;
use support::TestEnv;

#[test]
fn add_then_show_round_trips_every_field() {
    let env = TestEnv::new();

    let created = env.run_json(&[
        "add",
        "water the plants",
        "--due",
        "2024-06-10",
        "--project",
        "project-a",
    ]);
    assert_eq!(created["status"], "success");
    let id = created["data"]["task"]["id"].as_u64().expect("id");

    let shown = env.run_json(&["show", &id.to_string()]);
    let task = &shown["data"]["task"];
    assert_eq!(task["description"], "water the plants");
    assert_eq!(task["completed"], false);
    assert_eq!(task["due_date"], "2024-06-10");
    assert_eq!(task["project_id"], "project-a");
}

#[test]
fn done_and_reopen_toggle_completion() {
    let env = TestEnv::new();
    let id = env.run_json(&["add", "send invoices"])["data"]["task"]["id"]
        .as_u64()
        .expect("id")
        .to_string();

    env.cmd().args(["done", &id]).assert().success();
    let shown = env.run_json(&["show", &id]);
    assert_eq!(shown["data"]["task"]["completed"], true);

    env.cmd().args(["reopen", &id]).assert().success();
    let shown = env.run_json(&["show", &id]);
    assert_eq!(shown["data"]["task"]["completed"], false);
}

#[test]
fn due_sets_and_clears_the_date() {
    let env = TestEnv::new();
    let id = env.run_json(&["add", "book flights"])["data"]["task"]["id"]
        .as_u64()
        .expect("id")
        .to_string();

    env.cmd()
        .args(["due", &id, "2024-07-01"])
        .assert()
        .success();
    let shown = env.run_json(&["show", &id]);
    assert_eq!(shown["data"]["task"]["due_date"], "2024-07-01");

    env.cmd().args(["due", &id, "--clear"]).assert().success();
    let shown = env.run_json(&["show", &id]);
    assert!(shown["data"]["task"]["due_date"].is_null());
}

#[test]
fn malformed_due_date_is_rejected() {
    let env = TestEnv::new();
    let id = env.run_json(&["add", "plan trip"])["data"]["task"]["id"]
        .as_u64()
        .expect("id")
        .to_string();

    env.cmd()
        .args(["due", &id, "next tuesday"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("expected YYYY-MM-DD"));
}

#[test]
fn project_assignment_sets_and_clears() {
    let env = TestEnv::new();
    let id = env.run_json(&["add", "review budget"])["data"]["task"]["id"]
        .as_u64()
        .expect("id")
        .to_string();

    env.cmd()
        .args(["project", &id, "project-b"])
        .assert()
        .success();
    let shown = env.run_json(&["show", &id]);
    assert_eq!(shown["data"]["task"]["project_id"], "project-b");

    env.cmd()
        .args(["project", &id, "--clear"])
        .assert()
        .success();
    let shown = env.run_json(&["show", &id]);
    assert!(shown["data"]["task"]["project_id"].is_null());
}

#[test]
fn unknown_project_is_accepted_with_a_warning() {
    let env = TestEnv::new();
    env.cmd()
        .args(["add", "stray task", "--project", "side-quest"])
        .assert()
        .success()
        .stdout(contains("not in the configured catalog"));

    // Accepted silently at the store layer: the id is persisted as-is.
    let listed = env.run_json(&["list"]);
    assert_eq!(
        listed["data"]["groups"][4]["tasks"][0]["project_id"],
        "side-quest"
    );
}

#[test]
fn rm_deletes_the_task() {
    let env = TestEnv::new();
    let id = env.run_json(&["add", "old chore"])["data"]["task"]["id"]
        .as_u64()
        .expect("id")
        .to_string();

    env.cmd().args(["rm", &id]).assert().success();
    env.cmd().args(["show", &id]).assert().failure().code(2);
    assert_eq!(env.run_json(&["list"])["data"]["total"], 0);
}

#[test]
fn empty_description_is_rejected_before_any_store_call() {
    let env = TestEnv::new();

    env.cmd()
        .args(["add", "   "])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("Description cannot be empty"));

    // The store was never written.
    assert!(!env.tasks_file().exists());
    assert_eq!(env.run_json(&["list"])["data"]["total"], 0);
}

#[test]
fn failed_delete_leaves_the_store_unchanged() {
    let env = TestEnv::new();
    env.cmd().args(["add", "keep me"]).assert().success();

    // Corrupt the snapshot so the delete's read-modify-write fails.
    let good = fs::read_to_string(env.tasks_file()).expect("snapshot");
    fs::write(env.tasks_file(), "{ not json").expect("corrupt");
    env.cmd().args(["rm", "1"]).assert().failure().code(4);

    fs::write(env.tasks_file(), good).expect("restore");
    let listed = env.run_json(&["list"]);
    assert_eq!(listed["data"]["total"], 1);
}

#[test]
fn failed_read_is_surfaced_as_an_error_state() {
    let env = TestEnv::new();
    env.cmd().args(["add", "anything"]).assert().success();
    fs::write(env.tasks_file(), "{ not json").expect("corrupt");

    env.cmd()
        .args(["list"])
        .assert()
        .failure()
        .code(4)
        .stderr(contains("error"));
}
