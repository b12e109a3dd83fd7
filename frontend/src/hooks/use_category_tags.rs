use super::FetchGuard;
use crate::state::{report_error, use_api, use_app, Resource};
use shared::CategoryTag;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[derive(Clone, PartialEq, Default)]
pub struct CategoryTagsState {
    pub tags: Vec<CategoryTag>,
    pub loading: bool,
}

impl CategoryTagsState {
    pub fn active(&self) -> impl Iterator<Item = &CategoryTag> {
        self.tags.iter().filter(|t| t.is_active)
    }
}

/// Tags of one top-level category; empty when `category_id` is `None`
#[hook]
pub fn use_category_tags(category_id: Option<i64>) -> UseStateHandle<CategoryTagsState> {
    let app = use_app();
    let api = use_api();
    let state = use_state(CategoryTagsState::default);
    let generation = app.generation(Resource::CategoryTags);

    use_effect_with((category_id, generation), {
        let state = state.clone();
        let app = app.clone();

        move |(category_id, _)| {
            let guard = FetchGuard::new();
            match *category_id {
                None => state.set(CategoryTagsState::default()),
                Some(category_id) => {
                    state.set(CategoryTagsState {
                        tags: Vec::new(),
                        loading: true,
                    });
                    let in_flight = guard.clone();
                    spawn_local(async move {
                        let result = api.category_tags(category_id).await;
                        if !in_flight.is_current() {
                            return;
                        }
                        let tags = match result {
                            Ok(tags) => tags,
                            Err(e) => {
                                report_error(&app, "use_category_tags", &e);
                                Vec::new()
                            }
                        };
                        state.set(CategoryTagsState { tags, loading: false });
                    });
                }
            }

            guard.canceller()
        }
    });

    state
}
