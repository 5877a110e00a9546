//! End-to-end flows over the in-memory bus: one process hosting the
//! controller and one or more agents on the shared topic.

use std::io::Write;
use std::time::Duration;

use zoneline::agent::AgentRuntime;
use zoneline::bus::{memory, BusHandle};
use zoneline::controller::{save_artifact, Controller};
use zoneline::protocol::action::Action;

const TOPIC: &str = "sensors";
const WINDOW: Duration = Duration::from_millis(400);

fn spawn_agent(bus: &BusHandle, identity: &str) {
    let agent = AgentRuntime::new(
        identity.to_owned(),
        TOPIC.to_owned(),
        Duration::from_secs(5),
        bus.clone(),
    );
    drop(agent.spawn());
}

fn start_controller(bus: &BusHandle) -> Controller {
    let controller = Controller::new(TOPIC.to_owned(), bus.clone());
    drop(controller.spawn_listener());
    controller
}

#[tokio::test]
async fn missing_file_reports_not_found() {
    let bus = memory::spawn();
    spawn_agent(&bus, "probe-1");
    let controller = start_controller(&bus);

    controller
        .issue(Action::FetchFile, Some("/definitely/missing/hostname"))
        .await
        .unwrap();
    let replies = controller.collect(WINDOW).await;

    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].identity.as_deref(), Some("probe-1"));
    let message = replies[0].message.as_deref().unwrap();
    assert!(message.contains("/definitely/missing/hostname"));
    assert!(message.contains("not found"));
}

#[tokio::test]
async fn fetched_files_round_trip_through_artifacts() {
    let mut source = tempfile::NamedTempFile::new().unwrap();
    source.write_all(b"tz offset table v7\n").unwrap();
    let source_path = source.path().to_str().unwrap().to_owned();

    let bus = memory::spawn();
    spawn_agent(&bus, "probe-1");
    let controller = start_controller(&bus);

    controller.issue(Action::FetchFile, Some(&source_path)).await.unwrap();
    let replies = controller.collect(WINDOW).await;
    assert_eq!(replies.len(), 1);

    let artifacts = tempfile::tempdir().unwrap();
    let saved = save_artifact(
        artifacts.path(),
        replies[0].identity.as_deref(),
        replies[0].message.as_deref().unwrap(),
    )
    .unwrap();

    assert_eq!(std::fs::read(saved).unwrap(), b"tz offset table v7\n");
}

#[tokio::test]
async fn missing_path_argument_comes_back_as_text() {
    let bus = memory::spawn();
    spawn_agent(&bus, "probe-1");
    let controller = start_controller(&bus);

    controller.issue(Action::ListDirectory, None).await.unwrap();
    let replies = controller.collect(WINDOW).await;

    assert_eq!(replies.len(), 1);
    assert!(replies[0].message.as_deref().unwrap().contains("needs a path"));
}

#[tokio::test]
async fn long_arguments_travel_via_chunk_distribution() {
    // A 150+ character path forces the command argument through the
    // chunk-distribution slot end to end.
    let long_path = format!("/definitely/missing/{}", "d".repeat(150));

    let bus = memory::spawn();
    spawn_agent(&bus, "probe-1");
    let controller = start_controller(&bus);

    controller.issue(Action::FetchFile, Some(&long_path)).await.unwrap();
    let replies = controller.collect(WINDOW).await;

    assert_eq!(replies.len(), 1);
    let message = replies[0].message.as_deref().unwrap();
    assert!(message.contains(&long_path));
    assert!(message.contains("not found"));
}

#[tokio::test]
async fn every_agent_in_the_fleet_replies() {
    let dir = tempfile::tempdir().unwrap();
    let dir_path = dir.path().to_str().unwrap().to_owned();

    let bus = memory::spawn();
    spawn_agent(&bus, "probe-1");
    spawn_agent(&bus, "probe-2");
    let controller = start_controller(&bus);

    controller.issue(Action::ListDirectory, Some(&dir_path)).await.unwrap();
    let replies = controller.collect(WINDOW).await;

    let mut identities: Vec<_> = replies
        .iter()
        .map(|reply| reply.identity.clone().unwrap())
        .collect();
    identities.sort_unstable();
    assert_eq!(identities, ["probe-1", "probe-2"]);
}

#[tokio::test]
async fn ambient_noise_disturbs_nothing() {
    let bus = memory::spawn();
    spawn_agent(&bus, "probe-1");
    let controller = start_controller(&bus);

    // Foreign traffic on the shared topic: binary garbage, an unrelated
    // sensor reading, and an envelope-shaped message with no role.
    bus.publish(TOPIC, vec![0xff, 0xfe, 0x00]).await.unwrap();
    bus.publish(TOPIC, br#"{"temp_c": 21.5, "hum": 40}"#.to_vec()).await.unwrap();
    bus.publish(TOPIC, br#"{"decorative_timestamp": "2024-06-01T12:00:00"}"#.to_vec())
        .await
        .unwrap();

    // Nothing above is a response, so the window stays empty.
    assert!(controller.collect(WINDOW).await.is_empty());

    // And the channel still works afterwards.
    controller.issue(Action::FetchFile, Some("/definitely/missing/x")).await.unwrap();
    let replies = controller.collect(WINDOW).await;
    assert_eq!(replies.len(), 1);
}

#[tokio::test]
async fn each_command_opens_a_fresh_window() {
    let bus = memory::spawn();
    spawn_agent(&bus, "probe-1");
    let controller = start_controller(&bus);

    controller.issue(Action::FetchFile, Some("/definitely/missing/first")).await.unwrap();
    let first = controller.collect(WINDOW).await;
    assert_eq!(first.len(), 1);
    assert!(first[0].message.as_deref().unwrap().contains("first"));

    controller.issue(Action::FetchFile, Some("/definitely/missing/second")).await.unwrap();
    let second = controller.collect(WINDOW).await;
    assert_eq!(second.len(), 1);
    assert!(second[0].message.as_deref().unwrap().contains("second"));
}

#[tokio::test]
async fn agents_ignore_sibling_responses() {
    // A response published on the topic must trigger no agent reaction;
    // only the controller's listener picks it up.
    let bus = memory::spawn();
    spawn_agent(&bus, "probe-1");
    let controller = start_controller(&bus);

    let sibling = zoneline::protocol::envelope::Envelope::response("probe-0", Some("done"))
        .unwrap()
        .to_wire()
        .unwrap();
    bus.publish(TOPIC, sibling).await.unwrap();

    let replies = controller.collect(WINDOW).await;
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].identity.as_deref(), Some("probe-0"));
    assert_eq!(replies[0].message.as_deref(), Some("done"));
}
