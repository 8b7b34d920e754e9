//! Paginated system log viewer, newest entries first.

#[cfg(test)]
#[path = "logs_test.rs"]
mod logs_test;

use leptos::prelude::*;

use super::common::{Load, PageError, PageLoading, load_into, ready_token};
use crate::config::ClientConfig;
use crate::net::api::{self, LogQuery};
use crate::net::types::{LogEntry, LogPage, Pagination};
use crate::state::auth::AuthController;
use crate::util::time::format_timestamp;

/// `Page 2 of 5 (Total: 120)`.
pub(crate) fn page_label(pagination: &Pagination) -> String {
    format!(
        "Page {} of {} (Total: {})",
        pagination.current_page, pagination.total_pages, pagination.total_logs
    )
}

/// Pager is only shown when there is more than one page.
pub(crate) fn shows_pager(pagination: &Pagination) -> bool {
    pagination.total_pages > 1
}

#[component]
pub fn LogsPage() -> impl IntoView {
    let auth = expect_context::<AuthController>();
    let config = expect_context::<ClientConfig>();
    let token = ready_token(auth.state());
    let query = RwSignal::new(LogQuery::default());
    let page = RwSignal::new(Load::<LogPage>::Pending);

    Effect::new(move || {
        let Some(token) = token.get() else {
            return;
        };
        let current = query.get();
        leptos::logging::log!("fetch logs: page={} limit={}", current.page, current.limit);
        let config = config.clone();
        let policy = config.unauthorized_policy;
        load_into(page, "fetch logs", auth.clone(), policy, async move {
            api::fetch_logs(&config, Some(&token), current).await
        });
    });

    let loading = move || matches!(page.get(), Load::Pending);
    let pagination = move || match page.get() {
        Load::Ready(p) => Some(p.pagination),
        _ => None,
    };
    let on_previous = move |_| {
        if let Some(prev) = query.get_untracked().previous() {
            query.set(prev);
        }
    };
    let on_next = move |_| {
        if let Some(next) = query.get_untracked().next(pagination().as_ref()) {
            query.set(next);
        }
    };

    view! {
        <div class="admin-page">
            <h1 class="admin-page__title">"System Logs"</h1>
            {move || match page.get() {
                Load::Pending => view! { <PageLoading text="Loading logs..."/> }.into_any(),
                Load::Failed(message) => view! { <PageError message/> }.into_any(),
                Load::Ready(result) if result.data.is_empty() => view! { <p>"No logs found."</p> }.into_any(),
                Load::Ready(result) => view! {
                    <div class="admin-table-wrap">
                        <table class="admin-table admin-table--logs">
                            <thead>
                                <tr>
                                    <th>"Timestamp"</th>
                                    <th>"Level"</th>
                                    <th>"Message"</th>
                                    <th>"User ID"</th>
                                    <th>"Req Info"</th>
                                </tr>
                            </thead>
                            <tbody>{result.data.into_iter().map(log_row).collect_view()}</tbody>
                        </table>
                    </div>
                }.into_any(),
            }}
            <Show when=move || pagination().is_some_and(|p| shows_pager(&p))>
                <div class="pager">
                    <span>{move || pagination().map(|p| page_label(&p)).unwrap_or_default()}</span>
                    <div class="pager__buttons">
                        <button
                            on:click=on_previous
                            disabled=move || loading() || query.get().previous().is_none()
                        >
                            "Previous"
                        </button>
                        <button
                            on:click=on_next
                            disabled=move || loading() || query.get().next(pagination().as_ref()).is_none()
                        >
                            "Next"
                        </button>
                    </div>
                </div>
            </Show>
        </div>
    }
}

fn log_row(entry: LogEntry) -> impl IntoView {
    let timestamp = format_timestamp(&entry.timestamp);
    let request = entry.request_summary();
    let user_id = entry.user_id.clone().unwrap_or_else(|| "N/A".to_owned());
    view! {
        <tr>
            <td class="admin-table__nowrap">{timestamp}</td>
            <td><span class=entry.level.badge_class()>{entry.level.as_str()}</span></td>
            <td>
                {entry.message}
                {entry.error_stack.map(|stack| view! { <pre class="log-stack"><code>{stack}</code></pre> })}
            </td>
            <td class="admin-table__mono">{user_id}</td>
            <td class="admin-table__nowrap">{request}</td>
        </tr>
    }
}
