//! Form submission planning: what the browser would send after typing into an input.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{Result, SearchError};

/// HTTP method declared by a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMethod {
    Get,
    Post,
}

/// A resolved form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmission {
    pub method: FormMethod,
    /// Absolute action URL, without the submitted fields.
    pub action: Url,
    /// Successful controls in document order, with the typed value applied.
    pub fields: Vec<(String, String)>,
}

impl FormSubmission {
    /// The action URL with fields encoded as the query string (GET semantics).
    pub fn get_url(&self) -> Url {
        let mut url = self.action.clone();
        url.set_query(None);
        if !self.fields.is_empty() {
            url.query_pairs_mut().extend_pairs(self.fields.iter());
        }
        url
    }
}

/// Input types that never contribute a field when submitting with Enter.
const SKIPPED_INPUT_TYPES: [&str; 6] = ["submit", "button", "image", "reset", "file", "checkbox"];

/// Work out the request produced by typing `value` into the input matched by
/// `input_selector` and pressing Enter.
///
/// # Errors
///
/// Returns [`SearchError::Parse`] if the selector is invalid, matches nothing,
/// the input has no `name`, or it is not inside a `<form>`; returns
/// [`SearchError::Parse`] as well if the action cannot be resolved against
/// `page_url`.
pub fn plan_submission(
    html: &str,
    page_url: &str,
    input_selector: &str,
    value: &str,
) -> Result<FormSubmission> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(input_selector)
        .map_err(|e| SearchError::Parse(format!("invalid input selector {input_selector:?}: {e:?}")))?;

    let input = document
        .select(&selector)
        .next()
        .ok_or_else(|| SearchError::Parse(format!("no element matches {input_selector:?}")))?;

    let input_name = input
        .value()
        .attr("name")
        .filter(|name| !name.is_empty())
        .ok_or_else(|| SearchError::Parse("query input has no name attribute".into()))?;

    let form = input
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "form")
        .ok_or_else(|| SearchError::Parse("query input is not inside a form".into()))?;

    let base = Url::parse(page_url)
        .map_err(|e| SearchError::Parse(format!("invalid page URL {page_url:?}: {e}")))?;
    let action_attr = form.value().attr("action").unwrap_or_default().trim();
    let action = if action_attr.is_empty() {
        base
    } else {
        base.join(action_attr)
            .map_err(|e| SearchError::Parse(format!("invalid form action {action_attr:?}: {e}")))?
    };

    let method = match form.value().attr("method") {
        Some(m) if m.eq_ignore_ascii_case("post") => FormMethod::Post,
        _ => FormMethod::Get,
    };

    let mut fields = collect_fields(form);
    let mut typed = false;
    for (name, field_value) in fields.iter_mut() {
        if name == input_name && !typed {
            *field_value = value.to_owned();
            typed = true;
        }
    }
    if !typed {
        fields.push((input_name.to_owned(), value.to_owned()));
    }

    Ok(FormSubmission {
        method,
        action,
        fields,
    })
}

/// Named controls of `form` that a browser would submit, in document order.
fn collect_fields(form: ElementRef<'_>) -> Vec<(String, String)> {
    let Ok(selector) = Selector::parse("input[name], textarea[name], select[name]") else {
        return Vec::new();
    };

    let mut fields = Vec::new();
    for control in form.select(&selector) {
        let element = control.value();
        if element.attr("disabled").is_some() {
            continue;
        }
        let Some(name) = element.attr("name").filter(|n| !n.is_empty()) else {
            continue;
        };

        let value = match element.name() {
            "input" => {
                let input_type = element.attr("type").unwrap_or("text").to_ascii_lowercase();
                if SKIPPED_INPUT_TYPES.contains(&input_type.as_str()) {
                    continue;
                }
                if input_type == "radio" && element.attr("checked").is_none() {
                    continue;
                }
                element.attr("value").unwrap_or_default().to_owned()
            }
            "textarea" => control.text().collect::<String>(),
            _ => selected_option(control),
        };
        fields.push((name.to_owned(), value));
    }
    fields
}

/// Value of the selected (or first) option of a `<select>`.
fn selected_option(select: ElementRef<'_>) -> String {
    let Ok(option_sel) = Selector::parse("option") else {
        return String::new();
    };
    let options: Vec<ElementRef<'_>> = select.select(&option_sel).collect();
    let chosen = options
        .iter()
        .find(|opt| opt.value().attr("selected").is_some())
        .or_else(|| options.first());

    chosen
        .map(|opt| {
            opt.value()
                .attr("value")
                .map(str::to_owned)
                .unwrap_or_else(|| opt.text().collect::<String>().trim().to_owned())
        })
        .unwrap_or_default()
}
