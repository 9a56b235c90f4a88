use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use serde_json::json;

use userboard::dispatch::Dispatcher;
use userboard::notify::{ClearPolicy, Notification, NotificationKind, Notifier, StatusSink};
use userboard::output::UserRow;
use userboard::{
    classify, ApiResponse, AppError, Classification, DisplayMode, Transport, TransportError,
    UserRecord, View,
};

#[derive(Clone, Default)]
struct Collect(Rc<RefCell<Vec<NotificationKind>>>);

impl StatusSink for Collect {
    fn show(&self, notification: &Notification) {
        self.0.borrow_mut().push(notification.kind);
    }
}

#[test]
fn list_of_one_user() {
    let response = ApiResponse::from_json(json!({
        "status": "success",
        "data": [{"id": 1, "name": "Ana", "email": "ana@x.com", "age": 30,
                  "city": "Jakarta", "pekerjaan": "Dev", "hobi": "Chess"}],
        "total": 1
    }));

    let result = classify("/api/users", &response).unwrap();

    assert_eq!(result.mode(), DisplayMode::UserList);
    match result {
        Classification::UserList { users, total, .. } => {
            assert_eq!(total, 1);
            assert_eq!(users.len(), 1);
            // Rendering to a display row and reading it back is lossless.
            let row = UserRow::from(&users[0]);
            assert_eq!(UserRecord::try_from(&row).unwrap(), users[0]);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn missing_user_is_error_with_server_message() {
    let response = ApiResponse::from_json(json!({"status": "error", "message": "User not found"}));

    let result = classify("/api/users/99", &response).unwrap();

    assert_eq!(result.mode(), DisplayMode::Error);
    assert_eq!(
        result,
        Classification::Error {
            message: "User not found".into()
        }
    );
}

#[test]
fn empty_list_is_user_list() {
    let response = ApiResponse::from_json(json!({"status": "success", "data": []}));

    let result = classify("/api/users", &response).unwrap();

    assert_eq!(result.mode(), DisplayMode::UserList);
    assert!(matches!(View::from(result), View::UserList { users, .. } if users.is_empty()));
}

#[test]
fn health_is_info() {
    let response = ApiResponse::from_json(json!({"status": "ok"}));
    assert_eq!(classify("/health", &response).unwrap().mode(), DisplayMode::Info);
}

#[tokio::test]
async fn network_failure_is_reported_and_clears_display() {
    let sink = Collect::default();
    let notifier = Notifier::new(
        ClearPolicy {
            success: Duration::from_millis(5_000),
            info: Duration::from_millis(5_000),
        },
        Box::new(sink.clone()),
    );
    let dispatcher = Dispatcher::new(
        Transport::standard(Duration::from_millis(2_000)),
        "http://127.0.0.1:9".to_string(),
        notifier,
    );

    let err = dispatcher.load("/api/users").await.unwrap_err();

    assert!(matches!(
        err.unreported(),
        AppError::Transport(TransportError::Network(_))
    ));
    assert_eq!(dispatcher.view(), View::Empty);
    assert_eq!(
        sink.0.borrow().as_slice(),
        [NotificationKind::Loading, NotificationKind::Error]
    );
}
