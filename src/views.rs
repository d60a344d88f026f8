//! Server-rendered pages: the authenticate prompt and the error page.
//!
//! Both use the guest layout, which carries no account chrome and so can be
//! shown to a caller whose authentication just failed.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    Authenticate,
    ErrorPage,
}

impl Template {
    pub fn name(&self) -> &'static str {
        match self {
            Template::Authenticate => "authenticate",
            Template::ErrorPage => "error_page",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Guest,
}

impl Layout {
    pub fn name(&self) -> &'static str {
        match self {
            Layout::Guest => "guest",
        }
    }
}

/// What a page is rendered from.
///
/// `params` are the original request parameters. `resubmit` is set when the
/// failed request can be replayed as a plain GET from a form.
#[derive(Debug, Clone, Copy)]
pub struct Page<'a> {
    pub message: &'a str,
    pub code: u16,
    pub params: &'a [(String, String)],
    pub resubmit: bool,
}

/// Parameters the authenticate form must not echo back as hidden fields.
const NOT_ECHOED: &[&str] = &["password"];

pub fn render(template: Template, layout: Layout, page: &Page<'_>) -> String {
    let (title, body) = match template {
        Template::Authenticate if is_share(page.params) => {
            ("Password required", password_body(page))
        }
        Template::Authenticate => ("Sign in required", sign_in_body(page)),
        Template::ErrorPage => ("Error", error_body(page)),
    };

    match layout {
        Layout::Guest => guest_layout(title, &body),
    }
}

fn guest_layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body class=\"guest\">\n<main>\n{}</main>\n</body>\n</html>\n",
        escape(title),
        body
    )
}

fn is_share(params: &[(String, String)]) -> bool {
    params
        .iter()
        .any(|(name, value)| name == "token" && !value.is_empty())
}

fn password_body(page: &Page<'_>) -> String {
    let mut body = format!("<p class=\"notice\">{}</p>\n", escape(page.message));
    if !page.resubmit {
        // The form can only replay GET requests.
        body.push_str("<p>Open the shared link again to enter its password.</p>\n");
        return body;
    }

    body.push_str("<form method=\"get\" action=\"\">\n");
    body.push_str(&hidden_fields(page.params));
    if page.params.iter().any(|(name, _)| name == "password") {
        body.push_str("<p class=\"warning\">The password is wrong. Try again.</p>\n");
    }
    body.push_str("<label for=\"password\">This share is password-protected</label>\n");
    body.push_str("<input type=\"password\" name=\"password\" id=\"password\" autofocus>\n");
    body.push_str("<input type=\"submit\" value=\"Continue\">\n</form>\n");
    body
}

fn sign_in_body(page: &Page<'_>) -> String {
    let mut body = format!(
        "<p class=\"notice\">{}</p>\n<p>Sign in to your account to continue.</p>\n",
        escape(page.message)
    );
    if page.resubmit {
        body.push_str("<form method=\"get\" action=\"\">\n");
        body.push_str(&hidden_fields(page.params));
        body.push_str("<input type=\"submit\" value=\"Try again\">\n</form>\n");
    }
    body
}

fn hidden_fields(params: &[(String, String)]) -> String {
    params
        .iter()
        .filter(|(name, _)| !NOT_ECHOED.contains(&name.as_str()))
        .map(|(name, value)| {
            format!(
                "<input type=\"hidden\" name=\"{}\" value=\"{}\">\n",
                escape(name),
                escape(value)
            )
        })
        .collect()
}

fn error_body(page: &Page<'_>) -> String {
    format!(
        "<h1>{}</h1>\n<p class=\"error-code\">{}</p>\n",
        escape(page.message),
        page.code
    )
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}
