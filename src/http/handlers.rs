//! Request handlers.

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use tera::Context;

use crate::error::AppError;
use crate::forms::{Field, Form, FormInput, FormRequest, Validator};
use crate::http::templates::Templates;

/// Plain text greeting.
pub async fn hello_world() -> &'static str {
    "Confira meu jogo!"
}

/// Greeting rendered through a template.
pub async fn pretty_hello_world(State(templates): State<Templates>) -> Result<Html<String>, AppError> {
    let mut context = Context::new();
    context.insert("message", "Ja conferiu?!");
    Ok(Html(templates.render("hello_world.html", &context)?))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub fn contact_form() -> Form {
    Form::new()
        .field(
            Field::text("name", "Name")
                .validator(Validator::required())
                .validator(Validator::length(None, Some(64))),
        )
        .field(
            Field::email("email", "E-mail")
                .validator(Validator::required())
                .validator(Validator::email()),
        )
        .field(
            Field::textarea("message", "Message")
                .validator(Validator::required())
                .validator(Validator::length(None, Some(2000))),
        )
        .csrf_protection(true)
}

#[derive(Serialize)]
struct FlashView {
    message: String,
    level: String,
}

#[derive(Serialize)]
struct FieldView {
    label: String,
    input: String,
    errors: Vec<String>,
}

#[derive(Serialize)]
struct ContactPage {
    flashes: Vec<FlashView>,
    csrf_field: String,
    csrf_errors: Vec<String>,
    fields: Vec<FieldView>,
}

impl ContactPage {
    fn new(form: &Form, flashes: Vec<(String, Option<String>)>) -> Self {
        Self {
            flashes: flashes
                .into_iter()
                .map(|(message, level)| FlashView {
                    message,
                    level: level.unwrap_or_else(|| "info".into()),
                })
                .collect(),
            csrf_field: form.csrf_field(),
            csrf_errors: form.csrf_errors().to_vec(),
            fields: form
                .fields()
                .iter()
                .map(|field| FieldView {
                    label: field.label_html(),
                    input: field.input_html(),
                    errors: field.errors().to_vec(),
                })
                .collect(),
        }
    }
}

/// CSRF-protected contact form. GET renders it; POST validates and redirects on success.
pub async fn contact(
    State(templates): State<Templates>,
    request: FormRequest,
) -> Result<Response, AppError> {
    let mut form = contact_form();
    form.process(FormInput::Request(&request))?;

    if request.is_submission() {
        if form.validate() {
            let name = form.get("name").map(Field::value).unwrap_or_default();
            tracing::info!(name = %name, "Contact form accepted");
            request
                .session
                .lock()
                .add_flash(format!("Thanks, {}! Your message was received.", name), Some("success"));
            return Ok(Redirect::to("/contact").into_response());
        }
        tracing::debug!(errors = ?form.errors(), "Contact form rejected");
    }

    let flashes = request.session.lock().take_flashes();
    let context = Context::from_serialize(ContactPage::new(&form, flashes))?;
    Ok(Html(templates.render("contact.html", &context)?).into_response())
}
