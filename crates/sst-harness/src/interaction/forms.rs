//! HTML form and link semantics over `scraper`.
//!
//! Everything here is synchronous: the parsed document is not `Send`, so it
//! is built and dropped inside each helper and never held across an await.

use std::collections::BTreeMap;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::{LinkInteraction, Page};
use crate::error::InteractionError;

/// HTTP method of a form submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormMethod {
    Get,
    Post,
}

/// A form ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FormSubmission {
    pub method: FormMethod,
    pub action: Url,
    pub fields: Vec<(String, String)>,
}

impl FormSubmission {
    /// URL to request. For GET the form data replaces the action's query.
    pub fn target_url(&self) -> Url {
        let mut url = self.action.clone();
        if self.method == FormMethod::Get {
            url.set_query(None);
            if !self.fields.is_empty() {
                url.query_pairs_mut().extend_pairs(&self.fields);
            }
        }
        url
    }
}

/// What activating an element does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Activation {
    Navigate(Url),
    Submit(FormSubmission),
}

fn selector(css: &str) -> Result<Selector, InteractionError> {
    Selector::parse(css).map_err(|_| InteractionError::InvalidSelector(css.to_string()))
}

/// Locates the form matched by `form_selector` and fills it in.
pub(crate) fn prepare_form(
    page: &Page,
    form_selector: &str,
    values: &BTreeMap<String, String>,
    submit: Option<&str>,
) -> Result<FormSubmission, InteractionError> {
    let document = Html::parse_document(&page.body);
    let form_sel = selector(form_selector)?;

    let matched = document
        .select(&form_sel)
        .next()
        .ok_or_else(|| InteractionError::NotFound(format!("form '{form_selector}'")))?;
    let form = enclosing_form(matched).ok_or_else(|| {
        InteractionError::NotFound(format!("'{form_selector}' is not inside a form"))
    })?;

    let submitter = match submit {
        Some(css) => {
            let submit_sel = selector(css)?;
            let control = form
                .select(&submit_sel)
                .next()
                .or_else(|| document.select(&submit_sel).next())
                .ok_or_else(|| InteractionError::NotFound(format!("submit control '{css}'")))?;
            Some(control)
        }
        None => None,
    };

    build_submission(form, &page.url, values, submitter)
}

/// Resolves the target of the first link matching `link`.
pub(crate) fn resolve_link(page: &Page, link: &LinkInteraction) -> Result<Url, InteractionError> {
    if link.selector.is_none() && link.text_contains.is_none() {
        return Err(InteractionError::NotFound(link.describe()));
    }

    let document = Html::parse_document(&page.body);
    let link_sel = selector(link.selector.as_deref().unwrap_or("a[href]"))?;

    let href = document
        .select(&link_sel)
        .filter(|el| el.value().attr("href").is_some())
        .find(|el| {
            link.text_contains
                .as_deref()
                .map_or(true, |needle| el.text().collect::<String>().contains(needle))
        })
        .and_then(|el| el.value().attr("href"))
        .ok_or_else(|| InteractionError::NotFound(link.describe()))?;

    Ok(page.url.join(href.trim())?)
}

/// Works out what activating the element matched by `css` does.
pub(crate) fn activate(page: &Page, css: &str) -> Result<Activation, InteractionError> {
    let document = Html::parse_document(&page.body);
    let element_sel = selector(css)?;
    let element = document
        .select(&element_sel)
        .next()
        .ok_or_else(|| InteractionError::NotFound(format!("element '{css}'")))?;

    let value = element.value();
    let is_submit = match value.name() {
        "a" | "area" => {
            if let Some(href) = value.attr("href") {
                return Ok(Activation::Navigate(page.url.join(href.trim())?));
            }
            false
        }
        "button" => value
            .attr("type")
            .map_or(true, |t| t.eq_ignore_ascii_case("submit")),
        "input" => value
            .attr("type")
            .is_some_and(|t| t.eq_ignore_ascii_case("submit") || t.eq_ignore_ascii_case("image")),
        _ => false,
    };

    if is_submit {
        if let Some(form) = enclosing_form(element) {
            return build_submission(form, &page.url, &BTreeMap::new(), Some(element))
                .map(Activation::Submit);
        }
    }

    Err(InteractionError::NotFound(format!(
        "element '{css}' cannot be activated"
    )))
}

/// Finds a form that carries a SAML message and would be auto-submitted by
/// a script-enabled browser.
pub(crate) fn auto_post(page: &Page) -> Option<FormSubmission> {
    if !page.is_interactive() {
        return None;
    }

    let document = Html::parse_document(&page.body);
    let forms = selector("form").ok()?;
    let carrier = selector("input[name=SAMLResponse], input[name=SAMLRequest]").ok()?;

    let form = document
        .select(&forms)
        .find(|form| form.select(&carrier).next().is_some())?;
    build_submission(form, &page.url, &BTreeMap::new(), None).ok()
}

fn enclosing_form(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    if element.value().name() == "form" {
        return Some(element);
    }
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().name() == "form")
}

fn build_submission(
    form: ElementRef<'_>,
    base: &Url,
    values: &BTreeMap<String, String>,
    submitter: Option<ElementRef<'_>>,
) -> Result<FormSubmission, InteractionError> {
    let action = match form.value().attr("action").map(str::trim) {
        Some(action) if !action.is_empty() => base.join(action)?,
        _ => base.clone(),
    };
    let method = if form
        .value()
        .attr("method")
        .is_some_and(|m| m.eq_ignore_ascii_case("post"))
    {
        FormMethod::Post
    } else {
        FormMethod::Get
    };

    let mut fields = successful_controls(form)?;
    for (name, value) in values {
        match fields.iter_mut().find(|(field, _)| *field == *name) {
            Some(field) => field.1.clone_from(value),
            None => fields.push((name.clone(), value.clone())),
        }
    }

    if let Some(button) = submitter {
        if let Some(name) = button.value().attr("name").filter(|n| !n.is_empty()) {
            let value = button.value().attr("value").unwrap_or_default();
            fields.push((name.to_string(), value.to_string()));
        }
    }

    Ok(FormSubmission {
        method,
        action,
        fields,
    })
}

fn successful_controls(form: ElementRef<'_>) -> Result<Vec<(String, String)>, InteractionError> {
    let controls = selector("input, select, textarea")?;
    let options = selector("option")?;
    let mut fields = Vec::new();

    for control in form.select(&controls) {
        let element = control.value();
        let Some(name) = element.attr("name").filter(|n| !n.is_empty()) else {
            continue;
        };
        if element.attr("disabled").is_some() {
            continue;
        }

        match element.name() {
            "input" => {
                let kind = element.attr("type").unwrap_or("text").to_ascii_lowercase();
                match kind.as_str() {
                    "submit" | "image" | "button" | "reset" | "file" => {}
                    "checkbox" | "radio" => {
                        if element.attr("checked").is_some() {
                            let value = element.attr("value").unwrap_or("on");
                            fields.push((name.to_string(), value.to_string()));
                        }
                    }
                    _ => {
                        let value = element.attr("value").unwrap_or_default();
                        fields.push((name.to_string(), value.to_string()));
                    }
                }
            }
            "textarea" => fields.push((name.to_string(), control.text().collect())),
            "select" => {
                let all: Vec<ElementRef<'_>> = control.select(&options).collect();
                let selected: Vec<ElementRef<'_>> = all
                    .iter()
                    .copied()
                    .filter(|option| option.value().attr("selected").is_some())
                    .collect();

                if selected.is_empty() && element.attr("multiple").is_none() {
                    if let Some(first) = all.first() {
                        fields.push((name.to_string(), option_value(*first)));
                    }
                } else {
                    for option in selected {
                        fields.push((name.to_string(), option_value(option)));
                    }
                }
            }
            _ => {}
        }
    }

    Ok(fields)
}

fn option_value(option: ElementRef<'_>) -> String {
    option.value().attr("value").map_or_else(
        || option.text().collect::<String>().trim().to_string(),
        String::from,
    )
}
