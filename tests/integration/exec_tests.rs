//! Execution collaborator contract: completion, deadline, missing binary.

use std::time::Duration;

use zoneline::exec::{run, ExecOutcome};

#[tokio::test]
async fn captures_stdout_and_exit_code() {
    let outcome = run("echo", &["telemetry".to_owned()], Duration::from_secs(5))
        .await
        .unwrap();

    match outcome {
        ExecOutcome::Completed(output) => {
            assert_eq!(output.exit_code, 0);
            assert!(output.stdout.contains("telemetry"));
            assert!(output.stderr.is_empty());
        }
        other => panic!("expected completion, got {other:?}"),
    }
}

#[tokio::test]
async fn reports_a_missing_binary() {
    let outcome = run("/definitely/not/installed", &[], Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(outcome, ExecOutcome::NotFound);
}

#[tokio::test]
async fn enforces_the_deadline() {
    let outcome = run("sleep", &["5".to_owned()], Duration::from_millis(200))
        .await
        .unwrap();
    assert_eq!(outcome, ExecOutcome::TimedOut);
}
