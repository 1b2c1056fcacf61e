use std::borrow::Cow;

use axum::{
    extract::{Form, Query, State, rejection::FormRejection},
    http::StatusCode,
    response::{Html, Redirect},
};
use serde::Deserialize;
use tracing::{error, info};

use crate::web::{
    AppState,
    flash::{FlashQuery, compose_flash_message},
    models::timestamp_now,
    templates::{PageLayout, escape_html, render_page},
};

const CONTACT_PAGE: &str = "/contact";

#[derive(Deserialize)]
pub struct ContactSubmission {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// A contact submission whose four fields are all present and non-blank.
#[derive(Debug, PartialEq)]
pub(crate) struct ValidContact {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactSubmission {
    pub(crate) fn validate(self) -> Option<ValidContact> {
        let field = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Some(ValidContact {
            name: field(self.name)?,
            email: field(self.email)?,
            subject: field(self.subject)?,
            message: field(self.message)?,
        })
    }
}

pub async fn home() -> Html<String> {
    static_page(
        "Home",
        "home",
        r#"<section class="panel">
            <h1>Building dependable technology for growing businesses</h1>
            <p class="note">We design, build and run the software and infrastructure our clients depend on every day.</p>
            <a href="/services">Explore our services →</a>
        </section>
        <section class="grid">
            <div class="panel"><h2>Engineering</h2><p class="note">Product teams that ship reliable systems on schedule.</p></div>
            <div class="panel"><h2>Consulting</h2><p class="note">Architecture reviews, audits and delivery coaching.</p></div>
            <div class="panel"><h2>Operations</h2><p class="note">Managed hosting and round-the-clock support.</p></div>
        </section>"#,
    )
}

pub async fn about() -> Html<String> {
    static_page(
        "About",
        "about",
        r#"<section class="panel">
            <h1>About us</h1>
            <p class="note">Founded by a small group of engineers, we have grown into a company serving clients across retail, logistics and finance.</p>
            <p class="note">Our values are simple: be honest about trade-offs, measure what matters, and leave every system better than we found it.</p>
        </section>"#,
    )
}

pub async fn services() -> Html<String> {
    static_page(
        "Services",
        "services",
        r#"<section>
            <h1>Services</h1>
            <div class="grid">
                <div class="panel"><h2>Product Development</h2><p class="note">End-to-end delivery of web and mobile products.</p></div>
                <div class="panel"><h2>Cloud Infrastructure</h2><p class="note">Migration, hardening and cost control for cloud workloads.</p></div>
                <div class="panel"><h2>Data &amp; Analytics</h2><p class="note">Pipelines, dashboards and reporting your teams trust.</p></div>
                <div class="panel"><h2>Support Contracts</h2><p class="note">Service agreements with guaranteed response times.</p></div>
            </div>
        </section>"#,
    )
}

pub async fn team() -> Html<String> {
    static_page(
        "Team",
        "team",
        r#"<section>
            <h1>Leadership team</h1>
            <div class="grid">
                <div class="panel"><h2>Chief Executive Officer</h2><p class="note">Sets company direction and leads client partnerships.</p></div>
                <div class="panel"><h2>Chief Technology Officer</h2><p class="note">Owns engineering standards and the technology roadmap.</p></div>
                <div class="panel"><h2>Chief Financial Officer</h2><p class="note">Leads finance, investor relations and reporting.</p></div>
            </div>
        </section>"#,
    )
}

pub async fn careers() -> Html<String> {
    static_page(
        "Careers",
        "careers",
        r#"<section class="panel">
            <h1>Careers</h1>
            <p class="note">We hire engineers, designers and consultants who enjoy solving real problems with small, focused teams.</p>
            <p class="note">Send your résumé through the <a href="/contact">contact form</a> with the subject “Careers”.</p>
        </section>"#,
    )
}

pub async fn contact_page(Query(params): Query<FlashQuery>) -> Html<String> {
    let flash = compose_flash_message(params.status.as_deref(), params.error.as_deref());
    Html(render_page(PageLayout {
        meta_title: "Contact",
        active_page: "contact",
        flash_html: Cow::Owned(flash),
        body_html: Cow::Borrowed(CONTACT_FORM_HTML),
    }))
}

pub async fn submit_contact(
    State(state): State<AppState>,
    form: Result<Form<ContactSubmission>, FormRejection>,
) -> Redirect {
    let Some(contact) = form.ok().and_then(|Form(submission)| submission.validate()) else {
        return Redirect::to(&format!("{CONTACT_PAGE}?error=missing_fields"));
    };

    match store_contact(&state, &contact).await {
        Ok(()) => {
            info!(email = %contact.email, "contact form submitted");
            Redirect::to(&format!("{CONTACT_PAGE}?status=sent"))
        }
        Err(err) => {
            error!(?err, "error in contact form submission");
            Redirect::to(&format!("{CONTACT_PAGE}?error=send_failed"))
        }
    }
}

async fn store_contact(state: &AppState, contact: &ValidContact) -> sqlx::Result<()> {
    let mut tx = state.begin().await?;
    sqlx::query(
        "INSERT INTO contact_forms (name, email, subject, message, created_at) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(&contact.name)
    .bind(&contact.email)
    .bind(&contact.subject)
    .bind(&contact.message)
    .bind(timestamp_now())
    .execute(&mut *tx)
    .await?;
    tx.commit().await
}

pub async fn not_found(uri: axum::http::Uri) -> (StatusCode, Html<String>) {
    let body = format!(
        r#"<section class="panel">
            <h1>Page not found</h1>
            <p class="note">Nothing lives at <code>{path}</code>. Head back to the <a href="/">home page</a>.</p>
        </section>"#,
        path = escape_html(uri.path()),
    );
    (
        StatusCode::NOT_FOUND,
        Html(render_page(PageLayout {
            meta_title: "Not Found",
            active_page: "",
            flash_html: Cow::Borrowed(""),
            body_html: Cow::Owned(body),
        })),
    )
}

fn static_page(title: &str, active_page: &str, body: &'static str) -> Html<String> {
    Html(render_page(PageLayout {
        meta_title: title,
        active_page,
        flash_html: Cow::Borrowed(""),
        body_html: Cow::Borrowed(body),
    }))
}

const CONTACT_FORM_HTML: &str = r#"<section class="panel">
            <h1>Contact us</h1>
            <p class="note">Questions about our services, partnerships or careers? We reply within two business days.</p>
            <form method="post" action="/contact">
                <label for="name">Name</label>
                <input id="name" name="name" required>
                <label for="email">Email</label>
                <input id="email" name="email" type="email" required>
                <label for="subject">Subject</label>
                <input id="subject" name="subject" required>
                <label for="message">Message</label>
                <textarea id="message" name="message" rows="6" required></textarea>
                <button type="submit">Send message</button>
            </form>
        </section>"#;
