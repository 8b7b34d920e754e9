use super::*;

// =============================================================
// Role / SessionUser
// =============================================================

#[test]
fn role_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
    assert_eq!(serde_json::to_string(&Role::Pro).unwrap(), "\"pro\"");
    assert_eq!(serde_json::to_string(&Role::Free).unwrap(), "\"free\"");
}

#[test]
fn role_parse_rejects_unknown_values() {
    assert_eq!(Role::parse("admin"), Some(Role::Admin));
    assert_eq!(Role::parse("Admin"), None);
    assert_eq!(Role::parse("owner"), None);
}

#[test]
fn session_user_json_shape_is_id_and_role() {
    let user = SessionUser { id: "u1".to_owned(), role: Role::Admin };
    let value = serde_json::to_value(&user).unwrap();
    assert_eq!(value, serde_json::json!({"id": "u1", "role": "admin"}));
}

// =============================================================
// Login response
// =============================================================

#[test]
fn login_response_accepts_mongo_style_user_id() {
    let body: LoginResponse = serde_json::from_value(serde_json::json!({
        "token": "jwt",
        "user": {"_id": "abc", "role": "admin", "email": "a@b.c"}
    }))
    .unwrap();
    assert_eq!(body.token.as_deref(), Some("jwt"));
    let user = body.user.unwrap();
    assert_eq!(user.id, "abc");
    assert_eq!(user.role.as_deref(), Some("admin"));
}

#[test]
fn login_response_tolerates_error_only_body() {
    let body: LoginResponse = serde_json::from_str(r#"{"message":"Invalid credentials"}"#).unwrap();
    assert!(body.token.is_none());
    assert!(body.user.is_none());
    assert_eq!(body.message.as_deref(), Some("Invalid credentials"));
}

// =============================================================
// Logs
// =============================================================

fn log_entry_json() -> serde_json::Value {
    serde_json::json!({
        "_id": "l1",
        "timestamp": "2024-03-01T10:00:00Z",
        "level": "warn",
        "message": "slow request",
        "userId": "u7",
        "ipAddress": "10.0.0.1",
        "method": "GET",
        "url": "/api/videos",
        "status": 200,
        "responseTime": 812.5
    })
}

#[test]
fn log_entry_parses_camel_case_fields() {
    let entry: LogEntry = serde_json::from_value(log_entry_json()).unwrap();
    assert_eq!(entry.id, "l1");
    assert_eq!(entry.level, LogLevel::Warn);
    assert_eq!(entry.user_id.as_deref(), Some("u7"));
    assert_eq!(entry.status, Some(200));
    assert!(entry.error_stack.is_none());
}

#[test]
fn log_entry_request_summary_skips_missing_parts() {
    let entry: LogEntry = serde_json::from_value(log_entry_json()).unwrap();
    assert_eq!(entry.request_summary(), "GET /api/videos (200) [10.0.0.1]");

    let bare = LogEntry { method: None, url: None, status: None, ip_address: None, ..entry };
    assert_eq!(bare.request_summary(), "");
}

#[test]
fn log_level_unknown_values_fall_back() {
    let level: LogLevel = serde_json::from_str("\"verbose\"").unwrap();
    assert_eq!(level, LogLevel::Unknown);
}

#[test]
fn log_level_badge_groups_error_and_fatal() {
    assert_eq!(LogLevel::Fatal.badge_class(), LogLevel::Error.badge_class());
    assert_ne!(LogLevel::Warn.badge_class(), LogLevel::Info.badge_class());
    assert_eq!(LogLevel::Debug.badge_class(), LogLevel::Trace.badge_class());
}

#[test]
fn log_page_parses_pagination_block() {
    let page: LogPage = serde_json::from_value(serde_json::json!({
        "data": [log_entry_json()],
        "pagination": {"currentPage": 2, "totalPages": 9, "totalLogs": 211, "limit": 25}
    }))
    .unwrap();
    assert_eq!(page.data.len(), 1);
    assert_eq!(
        page.pagination,
        Pagination { current_page: 2, total_pages: 9, total_logs: 211, limit: 25 }
    );
}

// =============================================================
// Users
// =============================================================

fn user_data(first: Option<&str>, last: Option<&str>) -> UserData {
    UserData {
        id: "u1".to_owned(),
        email: "ann@example.com".to_owned(),
        role: "pro".to_owned(),
        first_name: first.map(str::to_owned),
        last_name: last.map(str::to_owned),
        created_at: "2024-01-01T00:00:00Z".to_owned(),
    }
}

#[test]
fn display_name_joins_available_parts() {
    assert_eq!(user_data(Some("Ann"), Some("Lee")).display_name(), "Ann Lee");
    assert_eq!(user_data(Some("Ann"), None).display_name(), "Ann");
    assert_eq!(user_data(None, Some("Lee")).display_name(), "Lee");
}

#[test]
fn display_name_placeholder_when_unnamed() {
    assert_eq!(user_data(None, None).display_name(), "(No name provided)");
    assert_eq!(user_data(Some(""), Some("")).display_name(), "(No name provided)");
}

#[test]
fn update_payload_sends_empty_strings_for_missing_names() {
    let user: UserEditData = serde_json::from_value(serde_json::json!({
        "_id": "u1",
        "email": "ann@example.com",
        "role": "pro",
        "firstName": "Ann",
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-02-01T00:00:00Z"
    }))
    .unwrap();
    let payload = UserUpdatePayload::from(&user);
    assert_eq!(
        serde_json::to_value(&payload).unwrap(),
        serde_json::json!({"role": "pro", "firstName": "Ann", "lastName": ""})
    );
}

// =============================================================
// Videos
// =============================================================

#[test]
fn video_detail_reads_playback_id() {
    let detail: VideoDetail = serde_json::from_value(serde_json::json!({
        "_id": "v1",
        "title": "Intro",
        "accessLevel": "free",
        "muxPlaybackId": "pb123",
        "createdAt": "2024-01-01T00:00:00Z"
    }))
    .unwrap();
    assert_eq!(detail.mux_playback_id.as_deref(), Some("pb123"));
}

#[test]
fn video_summary_parses_access_level() {
    let summary: VideoSummary = serde_json::from_value(serde_json::json!({
        "_id": "v1",
        "title": "Intro",
        "accessLevel": "public",
        "duration": 185.0,
        "createdAt": "2024-01-01T00:00:00Z"
    }))
    .unwrap();
    assert_eq!(summary.access_level, AccessLevel::Public);
    assert_eq!(duration_label(summary.duration), "3 min");
}

#[test]
fn duration_label_empty_when_unknown() {
    assert_eq!(duration_label(None), "");
    assert_eq!(duration_label(Some(0.0)), "");
}

// =============================================================
// Realtime payloads
// =============================================================

#[test]
fn received_message_uses_camel_case_sender() {
    let msg: ReceivedMessage = serde_json::from_value(serde_json::json!({
        "senderId": "abc",
        "message": "hi",
        "timestamp": "2024-01-01T00:00:00Z"
    }))
    .unwrap();
    assert_eq!(msg.sender_id, "abc");
}

#[test]
fn outgoing_message_serializes_recipient_id() {
    let msg = OutgoingMessage { recipient_id: "u1".to_owned(), message: "hi".to_owned() };
    assert_eq!(
        serde_json::to_value(&msg).unwrap(),
        serde_json::json!({"recipientId": "u1", "message": "hi"})
    );
}
