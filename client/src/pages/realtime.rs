//! Websocket test page: connect with the session token, send messages to the
//! signed-in user, and list what arrives.
//!
//! SYSTEM CONTEXT
//! ==============
//! The page owns one [`RealtimeClient`] for its lifetime. It connects once
//! auth initialization resolves and disconnects from `on_cleanup`, so
//! leaving the route always releases the socket.

#[cfg(test)]
#[path = "realtime_test.rs"]
mod realtime_test;

use leptos::prelude::*;

use crate::config::ClientConfig;
use crate::net::socket::BrowserSocket;
use crate::net::types::ReceivedMessage;
use crate::state::auth::AuthController;
use crate::state::realtime::{ConnectionStatus, RealtimeClient};
use crate::util::time::time_of_day;

/// Status indicator text.
pub(crate) fn status_label(auth_loading: bool, status: ConnectionStatus) -> &'static str {
    if auth_loading {
        "Authenticating..."
    } else if status == ConnectionStatus::Connected {
        "Connected"
    } else {
        "Disconnected"
    }
}

/// Sender column: "You" for messages this connection sent.
pub(crate) fn sender_label(sender_id: &str, own_socket_id: Option<&str>) -> String {
    if own_socket_id == Some(sender_id) { "You".to_owned() } else { sender_id.to_owned() }
}

#[component]
pub fn RealtimePage() -> impl IntoView {
    let auth = expect_context::<AuthController>();
    let config = expect_context::<ClientConfig>();
    let client = RealtimeClient::new(BrowserSocket::new(config.reconnect), config.socket_endpoint());
    let realtime = client.state();
    let auth_state = auth.state();
    let draft = RwSignal::new(String::new());

    {
        let client = client.clone();
        Effect::new(move || {
            let state = auth_state.get();
            if state.loading {
                return;
            }
            client.connect(state.token.as_deref());
        });
    }
    {
        let client = client.clone();
        on_cleanup(move || {
            leptos::logging::log!("realtime page: disconnecting");
            client.disconnect();
        });
    }

    let on_send = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let text = draft.get_untracked();
        let Some(user) = auth_state.get_untracked().user else {
            return;
        };
        if text.trim().is_empty() {
            return;
        }
        if client.send_message(&text, &user.id).is_ok() {
            draft.set(String::new());
        }
    };

    let connected = move || realtime.with(|s| s.status == ConnectionStatus::Connected);

    view! {
        <div class="realtime-page">
            <h1 class="admin-page__title">"WebSocket Test"</h1>
            <div class="realtime-status">
                "Status: "
                <span
                    class="realtime-status__value"
                    class:realtime-status__value--up=connected
                >
                    {move || status_label(auth_state.with(|s| s.loading), realtime.with(|s| s.status))}
                </span>
                {move || {
                    realtime
                        .with(|s| s.last_error.as_ref().map(ToString::to_string))
                        .map(|error| view! { <p class="realtime-status__error">"Error: " {error}</p> })
                }}
            </div>

            <Show when=connected>
                <form class="realtime-form" on:submit=on_send.clone()>
                    <input
                        type="text"
                        placeholder="Enter message..."
                        prop:value=move || draft.get()
                        on:input=move |ev| draft.set(event_target_value(&ev))
                    />
                    <button type="submit">"Send"</button>
                </form>
            </Show>

            <div class="realtime-messages">
                <h2>"Received Messages:"</h2>
                <div class="realtime-messages__list">
                    {move || {
                        let (messages, own_id) = realtime.with(|s| (s.messages.clone(), s.socket_id.clone()));
                        if messages.is_empty() {
                            view! { <p class="realtime-messages__empty">"No messages yet."</p> }.into_any()
                        } else {
                            messages
                                .into_iter()
                                .map(|message| message_row(message, own_id.as_deref()))
                                .collect_view()
                                .into_any()
                        }
                    }}
                </div>
            </div>
        </div>
    }
}

fn message_row(message: ReceivedMessage, own_socket_id: Option<&str>) -> impl IntoView {
    let sender = sender_label(&message.sender_id, own_socket_id);
    let time = time_of_day(&message.timestamp);
    view! {
        <div class="realtime-message">
            <span class="realtime-message__time">"[" {time} "]"</span>
            <span class="realtime-message__sender">"(" {sender} "):"</span>
            " "
            <span class="realtime-message__text">{message.message}</span>
        </div>
    }
}
