use crate::state::{use_app, use_config, AppAction};
use gloo::timers::future::TimeoutFuture;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

/// Shows the current notice and dismisses it after a while
#[function_component(NoticeBar)]
pub fn notice_bar() -> Html {
    let app = use_app();
    let config = use_config();
    let notice_id = app.notice.as_ref().map(|n| n.id);

    use_effect_with(notice_id, {
        let app = app.clone();
        let delay = config.flash_duration_ms.saturating_mul(2);
        move |notice_id| {
            if let Some(id) = *notice_id {
                spawn_local(async move {
                    TimeoutFuture::new(delay).await;
                    app.dispatch(AppAction::DismissNotice(id));
                });
            }
            || ()
        }
    });

    match &app.notice {
        Some(notice) => {
            let onclick = {
                let app = app.clone();
                let id = notice.id;
                Callback::from(move |_: MouseEvent| app.dispatch(AppAction::DismissNotice(id)))
            };
            html! {
                <div class={notice.level.css_class()} role="status">
                    <span class="notice-message">{&notice.message}</span>
                    <button class="notice-close" {onclick}>{"×"}</button>
                </div>
            }
        }
        None => html! {},
    }
}
