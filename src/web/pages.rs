//! HTML for the input and result views.

use uuid::Uuid;

use crate::domain::DEFAULT_CITY;
use crate::report::{format_accuracy, format_temperature};

const STYLE: &str = "body{font-family:sans-serif;max-width:40rem;margin:3rem auto;padding:0 1rem}\
.error{color:#b00020}input,button{font-size:1rem;padding:.4rem}";

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n"
    )
}

/// Input form, optionally with an error message above it.
pub fn input_page(error: Option<&str>, city: &str) -> String {
    let error_html = error
        .map(|e| format!("<p class=\"error\">Error: {}</p>\n", escape_html(e)))
        .unwrap_or_default();
    let body = format!(
        "<h1>Weather Prediction</h1>\n{error_html}\
         <form method=\"post\" action=\"/\">\n\
         <label for=\"city\">City</label>\n\
         <input id=\"city\" name=\"city\" value=\"{}\" placeholder=\"{DEFAULT_CITY}\">\n\
         <button type=\"submit\">Predict</button>\n</form>",
        escape_html(city)
    );
    layout("Weather Prediction", &body)
}

/// Result view with the headline numbers and a link to the PDF.
pub fn result_page(city: &str, accuracy: f64, prediction: f64, report_id: Uuid) -> String {
    let body = format!(
        "<h1>Weather Prediction for {city}</h1>\n\
         <p>Model accuracy (R²): <strong>{accuracy}</strong></p>\n\
         <p>Predicted temperature: <strong>{prediction} °C</strong></p>\n\
         <p><a href=\"/download_pdf?report={report_id}\">Download PDF report</a></p>\n\
         <p><a href=\"/\">Try another city</a></p>",
        city = escape_html(city),
        accuracy = format_accuracy(accuracy),
        prediction = format_temperature(prediction),
    );
    layout("Weather Prediction", &body)
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html("<b>\"Tom\" & 'Jerry'</b>"),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn input_page_shows_escaped_error() {
        let html = input_page(Some("Location not found: '<x>'."), "<x>");
        assert!(html.contains("class=\"error\""));
        assert!(html.contains("&lt;x&gt;"));
        assert!(!html.contains("<x>"));
    }

    #[test]
    fn result_page_rounds_to_two_decimals() {
        let id = Uuid::now_v7();
        let html = result_page("Lahore", 0.91234, 17.005, id);
        assert!(html.contains("<strong>0.91</strong>"));
        assert!(html.contains("°C"));
        assert!(html.contains(&format!("/download_pdf?report={id}")));
    }
}
