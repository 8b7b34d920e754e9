use super::*;

#[test]
fn status_shows_authenticating_while_auth_loads() {
    assert_eq!(status_label(true, ConnectionStatus::Connected), "Authenticating...");
}

#[test]
fn status_only_reports_connected_when_connected() {
    assert_eq!(status_label(false, ConnectionStatus::Connected), "Connected");
    assert_eq!(status_label(false, ConnectionStatus::Connecting), "Disconnected");
    assert_eq!(status_label(false, ConnectionStatus::Disconnected), "Disconnected");
}

#[test]
fn own_messages_are_labelled_you() {
    assert_eq!(sender_label("sock-1", Some("sock-1")), "You");
    assert_eq!(sender_label("sock-2", Some("sock-1")), "sock-2");
    assert_eq!(sender_label("sock-2", None), "sock-2");
}
