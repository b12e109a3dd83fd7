use super::FetchGuard;
use crate::services::Logger;
use crate::state::{notify, report_error, use_api, use_app, NoticeLevel, Resource};
use shared::{CategoryForest, CategoryType};
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[derive(Clone, PartialEq, Default)]
pub struct CategoryTreeState {
    pub forest: Rc<CategoryForest>,
    pub loading: bool,
}

/// Category forest of one type, rebuilt on every fetch
#[hook]
pub fn use_category_tree(category_type: CategoryType) -> UseStateHandle<CategoryTreeState> {
    let app = use_app();
    let api = use_api();
    let state = use_state(CategoryTreeState::default);
    let generation = app.generation(Resource::CategoryTree);

    use_effect_with((category_type, generation), {
        let state = state.clone();
        let app = app.clone();

        move |(category_type, _)| {
            let category_type = *category_type;
            let guard = FetchGuard::new();
            state.set(CategoryTreeState {
                forest: state.forest.clone(),
                loading: true,
            });

            let in_flight = guard.clone();
            spawn_local(async move {
                let result = api.category_tree(category_type).await;
                if !in_flight.is_current() {
                    Logger::debug_with_component(
                        "use_category_tree",
                        &format!("dropped stale {} category tree", category_type),
                    );
                    return;
                }

                let forest = match result {
                    Ok(nodes) => match CategoryForest::from_snapshot(&nodes) {
                        Ok(forest) => forest,
                        Err(e) => {
                            Logger::error_with_component("use_category_tree", &e.to_string());
                            notify(
                                &app,
                                NoticeLevel::Error,
                                format!("The {} category tree is malformed", category_type),
                            );
                            CategoryForest::default()
                        }
                    },
                    Err(e) => {
                        report_error(&app, "use_category_tree", &e);
                        CategoryForest::default()
                    }
                };
                Logger::debug_with_component(
                    "use_category_tree",
                    &format!("loaded {} {} categories", forest.len(), category_type),
                );
                state.set(CategoryTreeState {
                    forest: Rc::new(forest),
                    loading: false,
                });
            });

            guard.canceller()
        }
    });

    state
}
