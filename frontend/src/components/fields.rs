//! Small helpers for reading form controls.

use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

pub fn input_value(e: &InputEvent) -> String {
    e.target_unchecked_into::<HtmlInputElement>().value()
}

pub fn input_checked(e: &Event) -> bool {
    e.target_unchecked_into::<HtmlInputElement>().checked()
}

pub fn select_value(e: &Event) -> String {
    e.target_unchecked_into::<HtmlSelectElement>().value()
}

pub fn textarea_value(e: &InputEvent) -> String {
    e.target_unchecked_into::<HtmlTextAreaElement>().value()
}

/// `<select>` value to an optional id; the empty option means none
pub fn parse_id(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

/// Trimmed note, `None` when blank
pub fn optional_text(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Rejects notes longer than `max` characters
pub fn check_note_length(note: &str, max: usize) -> Result<(), String> {
    let length = note.trim().chars().count();
    if length > max {
        Err(format!("Note is too long ({} of {} characters)", length, max))
    } else {
        Ok(())
    }
}
