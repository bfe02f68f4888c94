use super::*;
use crate::{
    error_log::ERROR_LOG_CAPACITY,
    test_support::{server_error, ScriptedTransport},
};

fn deps_with(transport: Arc<ScriptedTransport>) -> OrchestratorDeps {
    OrchestratorDeps {
        transport,
        notifications: Arc::new(NotificationCenter::new()),
        error_log: Arc::new(ErrorLog::new()),
        results: Arc::new(ResultStore::new()),
    }
}

fn toast(deps: &OrchestratorDeps) -> (ToastKind, String) {
    let toast = deps.notifications.current().expect("toast shown");
    (toast.kind, toast.message)
}

/// Submit once and count the toasts shown by that call. Toast ids are
/// sequential, so the distance from a baseline toast is the number of shows.
async fn submit_counting_toasts(
    orchestrator: &ActionOrchestrator,
    deps: &OrchestratorDeps,
    input: &str,
) -> (ActionOutcome, u64) {
    let baseline = deps.notifications.show("baseline", ToastKind::Success);
    let mut slot = deps.notifications.subscribe();
    slot.borrow_and_update();

    let outcome = orchestrator.submit(input).await;

    if !slot.has_changed().expect("notification center alive") {
        return (outcome, 0);
    }
    let shown = slot
        .borrow_and_update()
        .as_ref()
        .map_or(0, |toast| toast.id.0 - baseline.0);
    (outcome, shown)
}

#[tokio::test]
async fn empty_video_id_is_rejected_without_network_call() {
    let transport = Arc::new(ScriptedTransport::new());
    let deps = deps_with(transport.clone());
    let upload = ActionOrchestrator::new(TranscriptAction::Upload, deps.clone());

    for input in ["", "   ", "\t\n"] {
        let outcome = upload.submit(input).await;
        assert!(matches!(
            outcome,
            ActionOutcome::Failed(ActionError::Validation { .. })
        ));
        assert_eq!(
            toast(&deps),
            (ToastKind::Error, "Please enter a YouTube video ID".to_string())
        );
    }

    assert_eq!(transport.calls(), 0);
    assert!(!upload.is_busy());
    assert!(deps.error_log.is_empty());
}

#[tokio::test]
async fn empty_question_is_rejected_without_network_call() {
    let transport = Arc::new(ScriptedTransport::new());
    let deps = deps_with(transport.clone());
    let ask = ActionOrchestrator::new(TranscriptAction::Ask, deps.clone());

    ask.submit("  ").await;

    assert_eq!(
        toast(&deps),
        (ToastKind::Error, "Please enter a question".to_string())
    );
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn upload_success_shows_service_message() {
    let transport = Arc::new(
        ScriptedTransport::new().with_reply(Ok(DomainResponse::ok("Indexed 42 chunks", 200))),
    );
    let deps = deps_with(transport.clone());
    let upload = ActionOrchestrator::new(TranscriptAction::Upload, deps.clone());

    let outcome = upload.submit("dZqa_9H803w").await;

    assert!(outcome.is_success());
    assert_eq!(
        toast(&deps),
        (ToastKind::Success, "Indexed 42 chunks".to_string())
    );
    assert_eq!(deps.results.get(), None, "upload never writes an answer");
    assert_eq!(
        transport.requests(),
        vec![TranscriptRequest::for_action(
            TranscriptAction::Upload,
            "dZqa_9H803w"
        )]
    );
}

#[tokio::test]
async fn ask_success_stores_answer() {
    let transport = Arc::new(ScriptedTransport::new().with_reply(Ok(
        DomainResponse::ok("Answer generated", 200).with_data("X is the unknown"),
    )));
    let deps = deps_with(transport);
    let ask = ActionOrchestrator::new(TranscriptAction::Ask, deps.clone());

    ask.submit("What is X?").await;

    assert_eq!(deps.results.get().as_deref(), Some("X is the unknown"));
    assert_eq!(
        toast(&deps),
        (ToastKind::Success, "Answer generated".to_string())
    );
}

#[tokio::test]
async fn ask_success_without_data_stores_empty_answer() {
    let transport = Arc::new(ScriptedTransport::new().with_reply(Ok(DomainResponse::ok("ok", 200))));
    let deps = deps_with(transport);
    deps.results.set("previous answer");
    let ask = ActionOrchestrator::new(TranscriptAction::Ask, deps.clone());

    ask.submit("What is X?").await;

    assert_eq!(deps.results.get().as_deref(), Some(""));
}

#[tokio::test]
async fn domain_failure_shows_error_but_skips_error_log() {
    let transport = Arc::new(ScriptedTransport::new().with_reply(Ok(
        DomainResponse::failed("No transcript indexed", 200).with_data(""),
    )));
    let deps = deps_with(transport);
    deps.results.set("previous answer");
    let ask = ActionOrchestrator::new(TranscriptAction::Ask, deps.clone());

    let outcome = ask.submit("What is X?").await;

    assert_eq!(
        outcome,
        ActionOutcome::Failed(ActionError::domain("No transcript indexed", 200))
    );
    assert_eq!(
        toast(&deps),
        (ToastKind::Error, "No transcript indexed".to_string())
    );
    assert!(deps.error_log.is_empty());
    assert_eq!(deps.results.get().as_deref(), Some("previous answer"));
    assert!(!ask.is_busy());
}

#[tokio::test]
async fn transport_failure_is_toasted_and_logged() {
    let transport = Arc::new(ScriptedTransport::new().with_reply(Err(server_error())));
    let deps = deps_with(transport);
    let ask = ActionOrchestrator::new(TranscriptAction::Ask, deps.clone());

    let outcome = ask.submit("What is X?").await;

    assert!(matches!(
        outcome,
        ActionOutcome::Failed(ActionError::Transport(_))
    ));
    let (kind, message) = toast(&deps);
    assert_eq!(kind, ToastKind::Error);
    assert!(message.contains("API Error (500): Internal Server Error"));

    assert_eq!(deps.error_log.len(), 1);
    let head = deps.error_log.latest().expect("log entry");
    assert_eq!(
        head.message,
        "Question Error: API Error (500): Internal Server Error"
    );
    assert!(!ask.is_busy());
}

#[tokio::test]
async fn upload_transport_failure_uses_upload_prefixes() {
    let transport = Arc::new(ScriptedTransport::new().with_reply(Err(TransportError::synthesize(
        None,
        None,
        None,
        None,
    ))));
    let deps = deps_with(transport);
    let upload = ActionOrchestrator::new(TranscriptAction::Upload, deps.clone());

    upload.submit("abc").await;

    assert_eq!(
        toast(&deps).1,
        "Upload Failed: API Error (Unknown): Network error occurred"
    );
    assert_eq!(
        deps.error_log.latest().expect("entry").message,
        "Upload Error: API Error (Unknown): Network error occurred"
    );
}

#[tokio::test]
async fn eleven_transport_failures_keep_ten_newest() {
    let transport = Arc::new(ScriptedTransport::new().with_replies(
        (0..11).map(|i| Err(TransportError::new(format!("failure {i}"), Some(503)))),
    ));
    let deps = deps_with(transport.clone());
    let ask = ActionOrchestrator::new(TranscriptAction::Ask, deps.clone());

    for _ in 0..11 {
        ask.submit("again?").await;
        assert!(deps.error_log.len() <= ERROR_LOG_CAPACITY);
    }

    let entries = deps.error_log.entries();
    assert_eq!(transport.calls(), 11);
    assert_eq!(entries.len(), ERROR_LOG_CAPACITY);
    assert_eq!(
        entries[0].message,
        "Question Error: API Error (503): failure 10"
    );
    assert_eq!(
        entries[9].message,
        "Question Error: API Error (503): failure 1"
    );
}

#[tokio::test]
async fn second_submit_while_busy_is_a_noop() {
    let transport = Arc::new(
        ScriptedTransport::new().with_reply(Ok(DomainResponse::ok("answered", 200).with_data("42"))),
    );
    let (entered, release) = transport.hold_next_call();
    let deps = deps_with(transport.clone());
    let ask = Arc::new(ActionOrchestrator::new(TranscriptAction::Ask, deps.clone()));

    let first = tokio::spawn({
        let ask = Arc::clone(&ask);
        async move { ask.submit("first question").await }
    });
    entered.await.expect("first call started");

    assert!(ask.is_busy());
    assert_eq!(ask.label(), "Thinking...");
    let toast_before = deps.notifications.current();

    let second = ask.submit("second question").await;
    assert_eq!(second, ActionOutcome::Busy);
    assert_eq!(transport.calls(), 1);
    assert_eq!(deps.notifications.current(), toast_before);

    // Even an empty input is ignored while busy.
    assert_eq!(ask.submit("").await, ActionOutcome::Busy);

    release.send(()).expect("release");
    let outcome = first.await.expect("join");
    assert!(outcome.is_success());
    assert!(!ask.is_busy());
    assert_eq!(ask.label(), "Ask");
    assert_eq!(deps.results.get().as_deref(), Some("42"));
}

#[tokio::test]
async fn actions_do_not_block_each_other() {
    let upload_transport = Arc::new(
        ScriptedTransport::new().with_reply(Ok(DomainResponse::ok("Indexed 42 chunks", 200))),
    );
    let (entered, release) = upload_transport.hold_next_call();
    let upload_deps = deps_with(upload_transport);
    let ask_deps = OrchestratorDeps {
        transport: Arc::new(
            ScriptedTransport::new().with_reply(Ok(DomainResponse::ok("ok", 200).with_data("yes"))),
        ),
        ..upload_deps.clone()
    };
    let upload = Arc::new(ActionOrchestrator::new(
        TranscriptAction::Upload,
        upload_deps.clone(),
    ));
    let ask = ActionOrchestrator::new(TranscriptAction::Ask, ask_deps);

    let pending_upload = tokio::spawn({
        let upload = Arc::clone(&upload);
        async move { upload.submit("dZqa_9H803w").await }
    });
    entered.await.expect("upload started");
    assert!(upload.is_busy());

    let answered = ask.submit("Is it indexed?").await;
    assert!(answered.is_success());
    assert!(!ask.is_busy());
    assert!(upload.is_busy());

    release.send(()).expect("release");
    assert!(pending_upload.await.expect("join").is_success());
    assert!(!upload.is_busy());
}

#[tokio::test]
async fn dropped_submission_releases_busy_flag() {
    let transport = Arc::new(ScriptedTransport::new());
    let (entered, _release) = transport.hold_next_call();
    let deps = deps_with(transport);
    let upload = Arc::new(ActionOrchestrator::new(TranscriptAction::Upload, deps));

    let pending = tokio::spawn({
        let upload = Arc::clone(&upload);
        async move { upload.submit("abc").await }
    });
    entered.await.expect("call started");
    assert!(upload.is_busy());

    pending.abort();
    assert!(pending.await.is_err());
    assert!(!upload.is_busy());
}

#[tokio::test]
async fn input_is_sent_as_typed() {
    let transport = Arc::new(ScriptedTransport::new().with_reply(Ok(DomainResponse::ok("ok", 200))));
    let deps = deps_with(transport.clone());
    let upload = ActionOrchestrator::new(TranscriptAction::Upload, deps);

    upload.submit("  dZqa_9H803w ").await;

    assert_eq!(
        transport.requests(),
        vec![TranscriptRequest::for_action(
            TranscriptAction::Upload,
            "  dZqa_9H803w "
        )]
    );
}

#[test]
fn view_reports_idle_label() {
    let deps = deps_with(Arc::new(ScriptedTransport::new()));
    let upload = ActionOrchestrator::new(TranscriptAction::Upload, deps);
    assert_eq!(
        upload.view(),
        ActionView {
            action: TranscriptAction::Upload,
            busy: false,
            label: "Upload".to_string(),
        }
    );
}

#[tokio::test]
async fn each_settlement_shows_exactly_one_toast() {
    let transport = Arc::new(ScriptedTransport::new().with_replies([
        Ok(DomainResponse::ok("Answer generated", 200).with_data("X is the unknown")),
        Ok(DomainResponse::failed("No transcript indexed", 200)),
        Err(server_error()),
    ]));
    let deps = deps_with(transport.clone());
    let ask = ActionOrchestrator::new(TranscriptAction::Ask, deps.clone());

    let (outcome, shown) = submit_counting_toasts(&ask, &deps, "   ").await;
    assert!(matches!(outcome, ActionOutcome::Failed(ActionError::Validation { .. })));
    assert_eq!(shown, 1, "validation");

    let (outcome, shown) = submit_counting_toasts(&ask, &deps, "What is X?").await;
    assert!(outcome.is_success());
    assert_eq!(shown, 1, "success");
    assert_eq!(toast(&deps), (ToastKind::Success, "Answer generated".to_string()));

    let (outcome, shown) = submit_counting_toasts(&ask, &deps, "What is X?").await;
    assert!(matches!(outcome, ActionOutcome::Failed(ActionError::Domain { .. })));
    assert_eq!(shown, 1, "domain failure");

    let (outcome, shown) = submit_counting_toasts(&ask, &deps, "What is X?").await;
    assert!(matches!(outcome, ActionOutcome::Failed(ActionError::Transport(_))));
    assert_eq!(shown, 1, "transport failure");

    assert_eq!(transport.calls(), 3);
}

#[tokio::test]
async fn busy_submit_shows_no_toast() {
    let transport = Arc::new(ScriptedTransport::new().with_reply(Ok(DomainResponse::ok("Indexed", 200))));
    let (entered, release) = transport.hold_next_call();
    let deps = deps_with(transport);
    let upload = Arc::new(ActionOrchestrator::new(TranscriptAction::Upload, deps.clone()));

    let first = tokio::spawn({
        let upload = Arc::clone(&upload);
        async move { upload.submit("dZqa_9H803w").await }
    });
    entered.await.expect("first call started");

    let (outcome, shown) = submit_counting_toasts(&upload, &deps, "dZqa_9H803w").await;
    assert_eq!(outcome, ActionOutcome::Busy);
    assert_eq!(shown, 0);

    release.send(()).expect("release");
    assert!(first.await.expect("join").is_success());
}
