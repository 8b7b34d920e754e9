//! Embed for the hosted video player web component.
//!
//! The `<mux-player>` custom element is registered by the player script the
//! shell loads; this component only passes it the playback identifier.

use leptos::prelude::*;

/// Streaming player for one playback id.
#[component]
pub fn MuxPlayer(playback_id: String, #[prop(optional, into)] title: String) -> impl IntoView {
    view! {
        <div class="video-player">
            <mux-player
                playback-id=playback_id
                metadata-video-title=title
                stream-type="on-demand"
                accent-color="#4f46e5"
            ></mux-player>
        </div>
    }
}
