use serde::Deserialize;

/// `?status=` / `?error=` codes carried across a redirect.
#[derive(Default, Deserialize)]
pub struct FlashQuery {
    pub status: Option<String>,
    pub error: Option<String>,
}

/// Compose a flash banner for known status or error codes.
pub fn compose_flash_message(status: Option<&str>, error: Option<&str>) -> String {
    if let Some(status) = status {
        let message = match status {
            "sent" => "Your message has been sent! We will get back to you soon.",
            _ => "",
        };

        if !message.is_empty() {
            return format!(r#"<div class="flash success" role="status">{message}</div>"#);
        }
    }

    if let Some(error) = error {
        let message = match error {
            "missing_fields" => "Please fill in all fields",
            "send_failed" => {
                "There was an error sending your message. Please try again later."
            }
            _ => "Something went wrong. Please try again.",
        };

        return format!(r#"<div class="flash danger" role="alert">{message}</div>"#);
    }

    String::new()
}
