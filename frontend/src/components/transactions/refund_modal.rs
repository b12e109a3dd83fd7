use crate::components::fields::{check_note_length, input_value, optional_text, textarea_value};
use crate::services::date_utils::{input_to_rfc3339, now_input_value};
use crate::state::{inline_or_report, notify, use_api, use_app, use_config, AppAction, NoticeLevel, Resource};
use chrono::FixedOffset;
use shared::grouping::refundable_cents;
use shared::{format_cents, parse_amount_to_cents, CreateRefundRequest, RefundMode, TransactionRow};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct RefundModalProps {
    pub row: TransactionRow,
    pub offset: FixedOffset,
    pub currency_symbol: AttrValue,
    pub on_close: Callback<()>,
}

/// Amount for a partial refund; it may not exceed what is still refundable
pub fn partial_refund_cents(input: &str, remaining_cents: i64) -> Result<i64, String> {
    let cents = parse_amount_to_cents(input).map_err(|e| e.to_string())?;
    if cents > remaining_cents {
        return Err(format!(
            "At most {} can still be refunded",
            format_cents(remaining_cents)
        ));
    }
    Ok(cents)
}

#[function_component(RefundModal)]
pub fn refund_modal(props: &RefundModalProps) -> Html {
    let app = use_app();
    let api = use_api();
    let config = use_config();
    let remaining = refundable_cents(&props.row);

    let mode = use_state(|| RefundMode::Full);
    let amount = use_state(String::new);
    let occurred_at = use_state(now_input_value);
    let note = use_state(String::new);
    let saving = use_state(|| false);
    let error = use_state(|| None::<String>);

    let on_submit = {
        let app = app.clone();
        let mode = mode.clone();
        let amount = amount.clone();
        let occurred_at = occurred_at.clone();
        let note = note.clone();
        let saving = saving.clone();
        let error = error.clone();
        let on_close = props.on_close.clone();
        let id = props.row.id;
        let offset = props.offset;
        let max_note = config.max_note_length;

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *saving {
                return;
            }
            let amount_cents = match *mode {
                RefundMode::Full => None,
                RefundMode::Partial => match partial_refund_cents(&amount, remaining) {
                    Ok(cents) => Some(cents),
                    Err(message) => {
                        error.set(Some(message));
                        return;
                    }
                },
            };
            let Some(when) = input_to_rfc3339(&occurred_at, offset) else {
                error.set(Some("Please enter a valid time".to_string()));
                return;
            };
            if let Err(message) = check_note_length(&note, max_note) {
                error.set(Some(message));
                return;
            }

            let request = CreateRefundRequest {
                mode: *mode,
                amount_cents,
                occurred_at: Some(when),
                note: optional_text(&note),
            };

            saving.set(true);
            error.set(None);
            let app = app.clone();
            let api = api.clone();
            let saving = saving.clone();
            let error = error.clone();
            let on_close = on_close.clone();
            spawn_local(async move {
                match api.refund_transaction(id, &request).await {
                    Ok(_) => {
                        notify(&app, NoticeLevel::Success, "Refund recorded");
                        app.dispatch(AppAction::Invalidate(Resource::Transactions));
                        app.dispatch(AppAction::Invalidate(Resource::BankAccounts));
                        app.dispatch(AppAction::Invalidate(Resource::Stats));
                        on_close.emit(());
                    }
                    Err(e) => error.set(inline_or_report(&app, "refund_modal", &e)),
                }
                saving.set(false);
            });
        })
    };

    let mode_radio = |value: RefundMode, label: &'static str| {
        let mode = mode.clone();
        html! {
            <label class="radio">
                <input
                    type="radio"
                    name="refund-mode"
                    checked={*mode == value}
                    onchange={Callback::from(move |_: Event| mode.set(value))}
                />
                {label}
            </label>
        }
    };

    html! {
        <div class="modal-backdrop">
            <div class="modal">
                <h3>{format!("Refund expense #{}", props.row.id)}</h3>
                <p class="muted">
                    {format!(
                        "Refundable: {}{}",
                        props.currency_symbol,
                        format_cents(remaining)
                    )}
                </p>
                {if let Some(message) = error.as_ref() {
                    html! { <div class="form-message error">{message}</div> }
                } else { html! {} }}
                <form onsubmit={on_submit}>
                    <div class="form-group">
                        {mode_radio(RefundMode::Full, "Full refund")}
                        {mode_radio(RefundMode::Partial, "Partial refund")}
                    </div>
                    {if *mode == RefundMode::Partial {
                        html! {
                            <div class="form-group">
                                <label>{"Amount"}</label>
                                <input
                                    type="text"
                                    inputmode="decimal"
                                    placeholder="0.00"
                                    value={(*amount).clone()}
                                    oninput={let amount = amount.clone(); Callback::from(move |e: InputEvent| amount.set(input_value(&e)))}
                                />
                            </div>
                        }
                    } else { html! {} }}
                    <div class="form-group">
                        <label>{"Time"}</label>
                        <input
                            type="datetime-local"
                            value={(*occurred_at).clone()}
                            oninput={let occurred_at = occurred_at.clone(); Callback::from(move |e: InputEvent| occurred_at.set(input_value(&e)))}
                        />
                    </div>
                    <div class="form-group">
                        <label>{"Note"}</label>
                        <textarea
                            rows="2"
                            value={(*note).clone()}
                            oninput={let note = note.clone(); Callback::from(move |e: InputEvent| note.set(textarea_value(&e)))}
                        />
                    </div>
                    <div class="button-row">
                        <button type="submit" class="btn btn-primary" disabled={*saving || remaining <= 0}>
                            {if *saving { "Saving..." } else { "Refund" }}
                        </button>
                        <button type="button" class="btn btn-secondary" onclick={props.on_close.reform(|_: MouseEvent| ())}>
                            {"Cancel"}
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_refund_cannot_exceed_remaining() {
        assert_eq!(partial_refund_cents("12.50", 2000), Ok(1250));
        assert_eq!(partial_refund_cents("20", 2000), Ok(2000));
        assert!(partial_refund_cents("20.01", 2000).is_err());
        assert!(partial_refund_cents("0", 2000).is_err());
    }
}
