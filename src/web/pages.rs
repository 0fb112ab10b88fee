//! Server-rendered HTML pages.

use std::fmt::Write;

use crate::domain::Field;

/// Questionnaire entry: field plus the wording shown on the web form.
struct Question {
    field: Field,
    label: &'static str,
    description: &'static str,
}

const QUESTIONS: [Question; 10] = [
    Question {
        field: Field::SysBp,
        label: "Systolic Blood Pressure",
        description: "What is your systolic blood pressure?",
    },
    Question {
        field: Field::Glucose,
        label: "Glucose",
        description: "What is your glucose level?",
    },
    Question {
        field: Field::Age,
        label: "Age",
        description: "How old are you?",
    },
    Question {
        field: Field::TotChol,
        label: "Total Cholesterol",
        description: "What is your total cholesterol level?",
    },
    Question {
        field: Field::CigsPerDay,
        label: "Cigarettes per Day",
        description: "How many cigarettes do you smoke per day?",
    },
    Question {
        field: Field::DiaBp,
        label: "Diastolic Blood Pressure",
        description: "What is your diastolic blood pressure?",
    },
    Question {
        field: Field::PrevalentHyp,
        label: "Prevalent Hypertension",
        description: "Are you hypertensive?",
    },
    Question {
        field: Field::Diabetes,
        label: "Diabetes",
        description: "Do you have diabetes?",
    },
    Question {
        field: Field::BpMeds,
        label: "Blood Pressure Medication",
        description: "Are you on blood pressure medication?",
    },
    Question {
        field: Field::Sex,
        label: "Gender",
        description: "What is your gender?",
    },
];

const STYLE: &str = "body{font-family:sans-serif;max-width:40rem;margin:2rem auto;color:#0f172a}\
label{display:block;margin-top:.8rem;font-weight:bold}\
input[type=text],input[type=password]{width:100%;padding:.4rem}\
.error{color:#f43f5e}.hint{color:#64748b;font-size:.9rem}\
button{margin-top:1rem;padding:.5rem 1.2rem;background:#0d9488;color:#fff;border:0}\
nav a{margin-right:1rem}";

/// Escape text for HTML element and attribute content.
pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <nav><a href=\"/index\">Questionnaire</a><a href=\"/book\">Reading</a>\
         <a href=\"/login\">Login</a></nav>\n{body}\n</body>\n</html>\n",
        title = escape(title),
    )
}

fn error_block(error: Option<&str>) -> String {
    error
        .map(|e| format!("<p class=\"error\">{}</p>", escape(e)))
        .unwrap_or_default()
}

pub fn login(error: Option<&str>) -> String {
    layout(
        "Login",
        &format!(
            "<h1>Login</h1>\n{}\n<form method=\"post\" action=\"/login\">\n\
             <label for=\"username\">Username</label><input type=\"text\" id=\"username\" name=\"username\" required>\n\
             <label for=\"password\">Password</label><input type=\"password\" id=\"password\" name=\"password\" required>\n\
             <button type=\"submit\">Login</button>\n</form>\n\
             <p>No account? <a href=\"/registration\">Register</a></p>",
            error_block(error)
        ),
    )
}

pub fn registration(error: Option<&str>) -> String {
    layout(
        "Registration",
        &format!(
            "<h1>Registration</h1>\n{}\n<form method=\"post\" action=\"/registration\">\n\
             <label for=\"fullname\">Full name</label><input type=\"text\" id=\"fullname\" name=\"fullname\" required>\n\
             <label for=\"username\">Username</label><input type=\"text\" id=\"username\" name=\"username\" required>\n\
             <label for=\"password\">Password</label><input type=\"password\" id=\"password\" name=\"password\" required>\n\
             <button type=\"submit\">Register</button>\n</form>\n\
             <p>Already registered? <a href=\"/login\">Login</a></p>",
            error_block(error)
        ),
    )
}

const PREDICT_SCRIPT: &str = r#"<script>
document.getElementById('questionnaire').addEventListener('submit', async (event) => {
  event.preventDefault();
  const answers = [];
  for (const q of document.querySelectorAll('[data-question]')) {
    const name = q.dataset.question;
    const checked = q.querySelector('input[type=radio]:checked');
    const input = checked || q.querySelector('input[type=text]');
    answers.push({ question: name, answer: input ? input.value : '' });
  }
  const out = document.getElementById('result');
  try {
    const res = await fetch('/predict', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ answers }),
    });
    const data = await res.json();
    if (!res.ok) {
      out.className = 'error';
      out.textContent = data.error;
      return;
    }
    out.className = '';
    out.textContent = Object.entries(data)
      .map(([model, label]) => model + ': ' + (label === 1 ? 'Heart disease likely' : 'Heart disease unlikely'))
      .join('\n');
  } catch (err) {
    out.className = 'error';
    out.textContent = String(err);
  }
});
</script>"#;

pub fn index() -> String {
    let mut body = String::from(
        "<h1>Heart Disease Questionnaire</h1>\n<form id=\"questionnaire\" method=\"post\" action=\"/index\">\n",
    );
    for q in &QUESTIONS {
        let key = q.field.key();
        // Writing to a String cannot fail.
        let _ = write!(
            body,
            "<div data-question=\"{key}\">\n<label>{}</label>\n<p class=\"hint\">{}</p>\n",
            escape(q.label),
            escape(q.description)
        );
        match q.field.choices() {
            Some(options) => {
                for (i, option) in options.iter().enumerate() {
                    let checked = if i == 0 { " checked" } else { "" };
                    let _ = write!(
                        body,
                        "<input type=\"radio\" id=\"{key}-{option}\" name=\"{key}\" value=\"{option}\"{checked}>\
                         <label for=\"{key}-{option}\" style=\"display:inline;font-weight:normal\">{option}</label>\n"
                    );
                }
            }
            None => {
                let _ = writeln!(
                    body,
                    "<input type=\"text\" name=\"{key}\" inputmode=\"decimal\" required>"
                );
            }
        }
        body.push_str("</div>\n");
    }
    body.push_str("<button type=\"submit\">Predict</button>\n</form>\n<pre id=\"result\"></pre>\n");
    body.push_str(PREDICT_SCRIPT);

    layout("Questionnaire", &body)
}

pub fn book() -> String {
    layout(
        "Reading",
        "<h1>Understanding Heart Disease</h1>\n\
         <p>Heart disease covers conditions that affect the heart and blood vessels. \
         The main modifiable risk factors are high blood pressure, high cholesterol, \
         high blood sugar and smoking.</p>\n\
         <ul>\n<li>Maintain a healthy diet</li>\n<li>Exercise regularly</li>\n\
         <li>Quit smoking</li>\n<li>Limit alcohol consumption</li>\n\
         <li>Monitor blood pressure and blood sugar levels</li>\n\
         <li>Manage stress effectively</li>\n</ul>\n\
         <p class=\"hint\">This material is informational and does not replace professional medical evaluation.</p>",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_error_is_escaped_on_login_page() {
        let page = login(Some("<script>"));
        assert!(page.contains("&lt;script&gt;"));
        assert!(!page.contains("<p class=\"error\"><script>"));
    }

    #[test]
    fn test_questionnaire_lists_every_question_key() {
        let page = index();
        for field in Field::ALL {
            assert!(
                page.contains(&format!("data-question=\"{}\"", field.key())),
                "missing {}",
                field.key()
            );
        }
        assert!(page.contains("value=\"Male\""));
        assert!(page.contains("value=\"Female\""));
    }
}
