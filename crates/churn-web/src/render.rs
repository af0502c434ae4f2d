//! HTML page rendering
//!
//! One page serves both the empty form and the result. The form is built
//! from the [`FIELDS`] catalog so the inputs always match what the collector
//! accepts.

use churn_core::{CustomerForm, DerivedFeatureSet, FieldKind, FieldSpec, Section, FIELDS};
use churn_model::{ChurnLabel, PredictionResult};
use serde_json::{Map, Value};

/// Page heading
pub const HEADING: &str = "E-Commerce Churn Prediction App";

/// Notice when the artifact file is missing
pub const MODEL_NOT_FOUND: &str = "Model file not found. Please contact the administrator.";

/// Notice when the artifact exists but could not be loaded
pub const MODEL_INVALID: &str = "Model file could not be loaded. Please contact the administrator.";

const INTRO: &str = "This application estimates the likelihood that a customer will <strong>churn</strong>, \
meaning they may stop using the platform or making purchases.";

const INSTRUCTIONS: &str = "<strong>Instructions</strong>: Enter customer details in the form and click \
<strong>Predict</strong> to assess churn risk.";

const ABOUT: &str = r#"<p>This prediction tool helps e-commerce teams <strong>identify high-risk customers</strong> based on their behavior, satisfaction, and engagement level.</p>
<ul>
<li>Built using a supervised ML model trained on real e-commerce customer data.</li>
<li>Use this tool to <strong>prioritize retention campaigns</strong>, improve support, and target offers.</li>
</ul>
<p><strong>Churn</strong> here means the customer is unlikely to continue using the app or shopping on the platform.</p>"#;

const FEATURE_EXPLANATIONS: &str = r#"<ul>
<li><code>Tenure</code>: Duration as a customer (<strong>months</strong>).</li>
<li><code>TenureGroup</code>: Loyalty bin based on tenure: <code>New (&le;3)</code>, <code>Early (4-9)</code>, <code>MidTerm (10-15)</code>, <code>LongTerm (&gt;15)</code>.</li>
<li><code>HourSpendOnApp</code>: Avg. weekly app usage time (in hours).</li>
<li><code>NumberOfDeviceRegistered</code>, <code>NumberOfAddress</code>: Device or address count in profile.</li>
<li><code>DaySinceLastOrder</code>: Days since most recent order.</li>
<li><code>RecencyRatio</code>: <code>DaySinceLastOrder / (Tenure + 1)</code>. Lower means more active.</li>
<li><code>IsActiveUser</code>: <code>Yes</code> if last order &lt; 30 days ago, else <code>No</code>.</li>
<li><code>CityTier</code>: Customer's city level: <code>1</code>, <code>2</code>, or <code>3</code>.</li>
<li><code>Gender</code>, <code>MaritalStatus</code>: Demographic info.</li>
<li><code>PreferredLoginDevice</code>: Common login device, <code>Mobile Phone</code> or <code>Computer</code>.</li>
<li><code>PreferredPaymentMode</code>: Most used payment method.</li>
<li><code>PreferedOrderCat</code>: Top product category ordered last month.</li>
<li><code>WarehouseToHome</code>: Estimated distance from warehouse to home (<strong>km</strong>).</li>
<li><code>OrderAmountHikeFromlastYear</code>: % order increase from last year.</li>
<li><code>CouponUsed</code>, <code>OrderCount</code>, <code>CashbackAmount</code>: Purchase-related metrics.</li>
<li><code>SatisfactionScore</code>: Rating from 1 (low) to 5 (high).</li>
<li><code>Complain</code>: <code>Yes</code> if complaint filed last month, <code>No</code> if not.</li>
<li><code>UnhappyCustomer</code>: <code>Yes</code> if complaint and satisfaction &le; 2.</li>
</ul>"#;

/// What the page reports below the form
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Form not submitted yet
    Empty,
    /// Prediction succeeded
    Prediction(PredictionResult),
    /// Submission rejected or prediction failed
    Error(String),
}

/// Everything one page render needs
#[derive(Debug, Clone)]
pub struct PageView<'a> {
    /// Browser title
    pub title: &'a str,
    /// Decorative image URL
    pub image_url: &'a str,
    /// Degraded-state notice; hides the form
    pub notice: Option<&'a str>,
    /// Derived preview, and the form values unless `submitted` is set
    pub features: &'a DerivedFeatureSet,
    /// Rejected submission, shown back as entered
    pub submitted: Option<&'a CustomerForm>,
    /// Result block
    pub outcome: Outcome,
}

/// Headline and follow-up note for a prediction
pub fn result_text(result: &PredictionResult) -> (String, &'static str) {
    match result.label {
        ChurnLabel::Churn => (
            format!("Churn Prediction: Yes (Probability: {:.2}%)", result.churn_percent()),
            "Action Needed: This customer is at risk of leaving. Consider targeted engagement.",
        ),
        ChurnLabel::Stay => (
            format!("Churn Prediction: No (Probability of Staying: {:.2}%)", result.stay_percent()),
            "Good News: This customer is likely to remain loyal.",
        ),
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Escape text for HTML element and attribute content
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn current_value(values: &Map<String, Value>, key: &str) -> String {
    match values.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn render_field(field: &FieldSpec, values: &Map<String, Value>) -> String {
    let value = current_value(values, field.key);
    let label = format!(
        r#"<label for="{key}">{label}</label>"#,
        key = field.key,
        label = escape(field.label)
    );

    let input = match field.kind {
        FieldKind::Integer { min, max, .. } => format!(
            r#"<input type="number" id="{key}" name="{key}" min="{min}" max="{max}" step="1" value="{value}">"#,
            key = field.key,
            value = escape(&value)
        ),
        FieldKind::Float { min, max, step, .. } => format!(
            r#"<input type="number" id="{key}" name="{key}" min="{min}" max="{max}" step="{step}" value="{value}">"#,
            key = field.key,
            value = escape(&value)
        ),
        FieldKind::Choice { options } => render_select(field.key, options, &value),
        FieldKind::Flag { .. } => {
            let value = match value.trim().to_ascii_lowercase().as_str() {
                "yes" | "true" | "1" | "on" => "Yes",
                _ => "No",
            };
            render_select(field.key, &["No", "Yes"], value)
        }
    };

    format!("<div class=\"field\">{label}{input}</div>\n")
}

fn render_select(key: &str, options: &[&str], selected: &str) -> String {
    let mut html = format!(r#"<select id="{key}" name="{key}">"#);
    for option in options {
        let mark = if *option == selected { " selected" } else { "" };
        html.push_str(&format!(
            r#"<option value="{v}"{mark}>{v}</option>"#,
            v = escape(option)
        ));
    }
    html.push_str("</select>");
    html
}

fn render_preview(section: Section, features: &DerivedFeatureSet) -> String {
    let items: Vec<String> = match section {
        Section::Engagement => vec![
            format!("Tenure Group: <code>{}</code>", features.tenure_group),
            format!("Recency Ratio: {}", features.recency_ratio_display()),
            format!("Active User: {}", yes_no(features.is_active_user)),
        ],
        Section::Transactions => vec![format!(
            "Unhappy Customer: {}",
            yes_no(features.unhappy_customer)
        )],
        _ => return String::new(),
    };

    let mut html = String::from("<ul class=\"derived\">");
    for item in items {
        html.push_str(&format!("<li>{item}</li>"));
    }
    html.push_str("</ul>\n");
    html
}

fn form_values(form: &CustomerForm) -> Map<String, Value> {
    // Non-finite floats serialize as null and show as empty inputs
    match serde_json::to_value(form) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

fn render_form(features: &DerivedFeatureSet, submitted: Option<&CustomerForm>) -> String {
    let values = match submitted {
        Some(form) => form_values(form),
        None => form_values(&CustomerForm::from_record(&features.record)),
    };

    let mut html = String::from("<form method=\"post\" action=\"/predict\">\n<h2>CUSTOMER DETAILS</h2>\n");
    for section in Section::ALL {
        html.push_str(&format!("<fieldset>\n<legend>{}</legend>\n", section.title()));
        for field in FIELDS.iter().filter(|f| f.section == section) {
            html.push_str(&render_field(field, &values));
        }
        html.push_str(&render_preview(section, features));
        html.push_str("</fieldset>\n");
    }
    html.push_str("<button type=\"submit\">Predict</button>\n</form>\n");
    html
}

fn render_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Empty => String::new(),
        Outcome::Prediction(result) => {
            let (headline, note) = result_text(result);
            let class = match result.label {
                ChurnLabel::Churn => "churn",
                ChurnLabel::Stay => "stay",
            };
            format!(
                "<section class=\"result {class}\" id=\"result\">\n<p class=\"headline\">{}</p>\n<p>{}</p>\n</section>\n",
                escape(&headline),
                escape(note)
            )
        }
        Outcome::Error(message) => format!(
            "<section class=\"result error\" id=\"result\">\n<p>{}</p>\n</section>\n",
            escape(message)
        ),
    }
}

/// Render the full page
pub fn page(view: &PageView<'_>) -> String {
    let mut body = String::new();
    body.push_str(&format!("<h1>{HEADING}</h1>\n<p>{INTRO}</p>\n<p>{INSTRUCTIONS}</p>\n"));

    match view.notice {
        Some(notice) => body.push_str(&format!(
            "<div class=\"notice\" role=\"alert\">{}</div>\n",
            escape(notice)
        )),
        None => body.push_str(&render_form(view.features, view.submitted)),
    }

    body.push_str(&render_outcome(&view.outcome));
    body.push_str(&format!(
        "<img src=\"{}\" alt=\"E-commerce illustration\" class=\"banner\">\n",
        escape(view.image_url)
    ));
    body.push_str(&format!(
        "<details><summary>About This App</summary>\n{ABOUT}\n</details>\n\
         <details><summary>Feature Explanations</summary>\n{FEATURE_EXPLANATIONS}\n</details>\n"
    ));

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n</head>\n<body>\n<main>\n{body}</main>\n</body>\n</html>\n",
        escape(view.title)
    )
}
