//! Video catalogue and player pages.
//!
//! SYSTEM CONTEXT
//! ==============
//! These routes live outside the admin layout but still require a session:
//! they install the same guard decision and redirect to the login path.

use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::{use_location, use_navigate, use_params_map};

use super::common::{Load, PageError, PageLoading, load_into, ready_token};
use crate::components::mux_player::MuxPlayer;
use crate::config::ClientConfig;
use crate::net::api;
use crate::net::types::{VideoDetail, VideoSummary, duration_label};
use crate::state::auth::AuthController;
use crate::util::auth::{GuardDecision, guard_memo, install_unauth_redirect};
use crate::util::time::format_date;

/// Install the login redirect for a standalone page and return the decision
/// the page renders against.
fn require_session(auth: &AuthController, config: &ClientConfig) -> Memo<GuardDecision> {
    let decision = guard_memo(auth.state(), use_location().pathname, config.login_path.clone());
    install_unauth_redirect(decision, use_navigate());
    decision
}

#[component]
pub fn VideosPage() -> impl IntoView {
    let auth = expect_context::<AuthController>();
    let config = expect_context::<ClientConfig>();
    let decision = require_session(&auth, &config);
    let token = ready_token(auth.state());
    let videos = RwSignal::new(Load::<Vec<VideoSummary>>::Pending);

    Effect::new(move || {
        let Some(token) = token.get() else {
            return;
        };
        let config = config.clone();
        let policy = config.unauthorized_policy;
        load_into(videos, "fetch videos", auth.clone(), policy, async move {
            api::fetch_videos(&config, Some(&token)).await
        });
    });

    view! {
        <div class="videos-page">
            <h1 class="videos-page__title">"Available Videos"</h1>
            {move || match (decision.get(), videos.get()) {
                (GuardDecision::Redirect(_), _) => view! { <PageLoading text="Redirecting to login..."/> }.into_any(),
                (GuardDecision::Loading, _) | (_, Load::Pending) => {
                    view! { <PageLoading text="Loading videos..."/> }.into_any()
                }
                (_, Load::Failed(message)) => view! { <PageError message/> }.into_any(),
                (_, Load::Ready(list)) if list.is_empty() => {
                    view! { <p>"No videos available for you at this time."</p> }.into_any()
                }
                (_, Load::Ready(list)) => view! {
                    <div class="video-grid">{list.into_iter().map(video_card).collect_view()}</div>
                }.into_any(),
            }}
        </div>
    }
}

fn video_card(video: VideoSummary) -> impl IntoView {
    let href = format!("/videos/{}", video.id);
    let duration = duration_label(video.duration);
    let description = video.description.clone().unwrap_or_else(|| "No description.".to_owned());
    let thumbnail = match video.thumbnail_url.clone() {
        Some(src) => view! { <img class="video-card__thumb" src=src alt=video.title.clone()/> }.into_any(),
        None => view! { <span class="video-card__no-thumb">"No Thumbnail"</span> }.into_any(),
    };
    view! {
        <A href=href>
            <div class="video-card">
                <div class="video-card__media">{thumbnail}</div>
                <div class="video-card__body">
                    <h3 class="video-card__title">{video.title}</h3>
                    <p class="video-card__description">{description}</p>
                    <div class="video-card__meta">
                        <span>{video.access_level.as_str()}</span>
                        <span>{duration}</span>
                    </div>
                </div>
            </div>
        </A>
    }
}

#[component]
pub fn VideoDetailPage() -> impl IntoView {
    let auth = expect_context::<AuthController>();
    let config = expect_context::<ClientConfig>();
    let decision = require_session(&auth, &config);
    let token = ready_token(auth.state());
    let params = use_params_map();
    let video_id = Memo::new(move |_| params.read().get("id").unwrap_or_default());
    let video = RwSignal::new(Load::<VideoDetail>::Pending);

    Effect::new(move || {
        let Some(token) = token.get() else {
            return;
        };
        let id = video_id.get();
        if id.is_empty() {
            video.set(Load::Failed("Video ID missing from URL.".to_owned()));
            return;
        }
        let config = config.clone();
        let policy = config.unauthorized_policy;
        load_into(video, "fetch video", auth.clone(), policy, async move {
            api::fetch_video(&config, Some(&token), &id).await
        });
    });

    view! {
        <div class="video-detail">
            <a class="video-detail__back" href="/videos">"← Back to Videos"</a>
            {move || match (decision.get(), video.get()) {
                (GuardDecision::Redirect(_), _) => view! { <PageLoading text="Redirecting to login..."/> }.into_any(),
                (GuardDecision::Loading, _) | (_, Load::Pending) => {
                    view! { <PageLoading text="Loading video..."/> }.into_any()
                }
                (_, Load::Failed(message)) => view! { <PageError message/> }.into_any(),
                (_, Load::Ready(detail)) => video_body(detail).into_any(),
            }}
        </div>
    }
}

fn video_body(detail: VideoDetail) -> impl IntoView {
    let playback_id = detail.mux_playback_id.clone().unwrap_or_default();
    let uploaded = format_date(&detail.created_at);
    let duration = duration_label(detail.duration);
    view! {
        <div>
            <h1 class="video-detail__title">{detail.title.clone()}</h1>
            <MuxPlayer playback_id title=detail.title/>
            {detail.description.map(|text| view! { <div class="video-detail__description"><p>{text}</p></div> })}
            <div class="video-detail__meta">
                <p>"Access Level: " <span class="video-detail__access">{detail.access_level}</span></p>
                <p>"Uploaded: " {uploaded}</p>
                {(!duration.is_empty()).then(|| view! { <p>"Duration: " {duration}</p> })}
            </div>
        </div>
    }
}
