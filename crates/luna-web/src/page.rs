//! HTML rendering.
//!
//! Everything that came from the user or the model is escaped.

use luna_domain::{FieldSet, History};
use luna_oracle::Reading;
use std::fmt::Write;

/// What the last form submission produced
#[derive(Debug, Clone)]
pub enum Outcome {
    /// A reading to show as a card
    Reading(Reading),
    /// Input problem; nothing was sent
    Warning(String),
    /// The question failed; `raw` holds the model output when there was one
    Failure {
        /// Error message
        message: String,
        /// Raw model output
        raw: Option<String>,
    },
}

/// Escape text for inclusion in HTML content or attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the whole page
pub fn render(fields: FieldSet, history: &History, outcome: Option<&Outcome>) -> String {
    let mut body = String::new();

    body.push_str(
        r#"<form method="post" action="/ask">
<input type="text" name="question" placeholder="Ask Luna anything..." autofocus>
<button type="submit">Ask</button>
</form>
"#,
    );

    match outcome {
        Some(Outcome::Reading(reading)) => render_card(&mut body, fields, reading),
        Some(Outcome::Warning(message)) => {
            let _ = writeln!(body, r#"<p class="warning">{}</p>"#, escape_html(message));
        }
        Some(Outcome::Failure { message, raw }) => {
            let _ = writeln!(body, r#"<p class="error">{}</p>"#, escape_html(message));
            if let Some(raw) = raw {
                let _ = writeln!(
                    body,
                    "<p>Received text:</p>\n<pre>{}</pre>",
                    escape_html(raw)
                );
            }
        }
        None => {}
    }

    render_history(&mut body, fields, history);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Luna's fortune</title>
</head>
<body>
<h1>🔮 Luna's fortune</h1>
{}</body>
</html>
"#,
        body
    )
}

fn render_card(body: &mut String, fields: FieldSet, reading: &Reading) {
    let _ = writeln!(
        body,
        r#"<section class="card">
<h2>{}</h2>
<dl>"#,
        escape_html(&reading.question)
    );
    for field in fields.fields() {
        let _ = writeln!(
            body,
            "<dt>{}</dt><dd>{}</dd>",
            escape_html(field.label),
            escape_html(&reading.record.text_or_empty(field.key))
        );
    }
    body.push_str("</dl>\n</section>\n");
}

fn render_history(body: &mut String, fields: FieldSet, history: &History) {
    if history.is_empty() {
        return;
    }

    let headline = fields.headline_key();
    body.push_str("<h2>History</h2>\n<ol reversed>\n");
    for entry in history.recent() {
        let _ = writeln!(
            body,
            "<li><strong>{}</strong>: {}</li>",
            escape_html(&entry.question),
            escape_html(&entry.result.text_or_empty(headline))
        );
    }
    body.push_str("</ol>\n");
}
