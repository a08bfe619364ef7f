//! HTML for the entry page.
//!
//! Every user-supplied value passes through [`escape`] before it is written.

use cases::{BenefitUnit, BusinessCaseForm, CaseId, Department, Field};

/// Message shown above the form.
#[derive(Debug, Clone, PartialEq)]
pub enum Banner {
    /// The previous submission was saved under this id.
    Saved(CaseId),
    /// The submission broke a validation rule; nothing was saved.
    Invalid(String),
    /// The database write failed.
    Failed(String),
}

const STYLE: &str = "\
body{font-family:sans-serif;max-width:44rem;margin:2rem auto;padding:0 1rem}\
label{display:block;font-weight:600;margin-top:1rem}\
input,select,textarea{width:100%;padding:.4rem;box-sizing:border-box}\
textarea{min-height:6rem}\
small{color:#555}\
.banner{padding:.75rem;border-radius:.25rem;margin:1rem 0}\
.success{background:#e6f4ea;color:#1e4620}\
.error{background:#fdecea;color:#611a15}\
button{margin-top:1.5rem;padding:.6rem 1.2rem}";

/// Render the whole page for `form`, with an optional banner.
pub fn render_page(form: &BusinessCaseForm, banner: Option<&Banner>) -> String {
    let mut html = String::with_capacity(4096);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Business Case Entry</title>\n");
    html.push_str(&format!("<style>{STYLE}</style>\n</head>\n<body>\n"));

    if let Some(Banner::Saved(id)) = banner {
        html.push_str(&format!(
            "<div class=\"banner success\" role=\"status\">Business case saved successfully. \
             Your business case ID is: {id}.</div>\n"
        ));
    }

    html.push_str("<h1>Business Case Entry</h1>\n");
    html.push_str("<p><small>Fields marked with * are required.</small></p>\n");

    match banner {
        Some(Banner::Invalid(msg)) => html.push_str(&format!(
            "<div class=\"banner error validation\" role=\"alert\">{}</div>\n",
            escape(msg)
        )),
        Some(Banner::Failed(msg)) => html.push_str(&format!(
            "<div class=\"banner error\" role=\"alert\">{}</div>\n",
            escape(msg)
        )),
        _ => {}
    }

    html.push_str("<form method=\"post\" action=\"/\">\n");
    for field in Field::ALL {
        html.push_str(&render_field(field, form.value(field)));
    }
    html.push_str("<button type=\"submit\">Save Business Case</button>\n</form>\n</body>\n</html>\n");
    html
}

fn render_field(field: Field, value: &str) -> String {
    let name = field.name();
    let label = if field.is_required() {
        format!("{} *", field.label())
    } else {
        field.label().to_owned()
    };

    let control = match field {
        Field::Description | Field::AdditionalNotes => {
            format!("<textarea id=\"{name}\" name=\"{name}\">{}</textarea>", escape(value))
        }
        Field::Department => select(name, Department::ALL.map(|d| d.as_str()).as_slice(), value),
        Field::BenefitUnit => select(name, BenefitUnit::ALL.map(|u| u.as_str()).as_slice(), value),
        Field::ExpectedBenefit => format!(
            "<input type=\"number\" id=\"{name}\" name=\"{name}\" min=\"0\" step=\"0.01\" value=\"{}\">",
            escape(value)
        ),
        Field::StartDate | Field::EndDate => format!(
            "<input type=\"date\" id=\"{name}\" name=\"{name}\" value=\"{}\">",
            escape(value)
        ),
        Field::Title | Field::ResponsiblePerson => format!(
            "<input type=\"text\" id=\"{name}\" name=\"{name}\" value=\"{}\">",
            escape(value)
        ),
    };

    format!(
        "<label for=\"{name}\">{label}</label>\n{control}\n<small>{}</small>\n",
        field.help()
    )
}

fn select(name: &str, options: &[&str], current: &str) -> String {
    let mut html = format!("<select id=\"{name}\" name=\"{name}\">");
    for option in options {
        let selected = if *option == current { " selected" } else { "" };
        html.push_str(&format!("<option value=\"{option}\"{selected}>{option}</option>"));
    }
    html.push_str("</select>");
    html
}

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn blank() -> BusinessCaseForm {
        BusinessCaseForm::blank(NaiveDate::from_ymd_opt(2025, 2, 3).unwrap())
    }

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(
            escape(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn page_has_one_control_per_field() {
        let html = render_page(&blank(), None);
        for field in Field::ALL {
            assert!(html.contains(&format!("name=\"{}\"", field.name())), "{field:?}");
        }
        assert!(html.contains("Business Case Title *"));
        assert!(html.contains("Additional Notes (optional)</label>"));
        assert!(html.contains("Save Business Case"));
    }

    #[test]
    fn dates_default_to_the_given_day() {
        let html = render_page(&blank(), None);
        assert!(html.contains("name=\"start_date\" value=\"2025-02-03\""));
        assert!(html.contains("name=\"end_date\" value=\"2025-02-03\""));
    }

    #[test]
    fn submitted_select_value_stays_selected() {
        let form = BusinessCaseForm { department: "Sales".into(), ..blank() };
        let html = render_page(&form, None);
        assert!(html.contains("<option value=\"Sales\" selected>"));
        assert!(!html.contains("<option value=\"Finance\" selected>"));
    }

    #[test]
    fn success_banner_shows_the_id() {
        let html = render_page(&blank(), Some(&Banner::Saved(CaseId(17))));
        assert!(html.contains("Your business case ID is: 17."));
    }

    #[test]
    fn user_text_is_escaped() {
        let form = BusinessCaseForm { title: "<script>alert(1)</script>".into(), ..blank() };
        let html = render_page(&form, None);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }
}
