//! HTML for the application shell.
//!
//! Page bodies are static content; only the chrome and the greeting read the
//! session snapshot.

use axum::response::Html;

use crate::{models::session::SessionSnapshot, services::guard::View};

const STYLE: &str = "body{font-family:system-ui,sans-serif;margin:0;color:#1f2937}\
header{display:flex;gap:1rem;align-items:center;padding:1rem 2rem;background:#0f766e;color:#fff}\
header a{color:#fff;text-decoration:none}main{padding:2rem}\
.spinner{margin:20vh auto;width:3rem;height:3rem;border:4px solid #ccfbf1;\
border-top-color:#0f766e;border-radius:50%;animation:spin 1s linear infinite}\
@keyframes spin{to{transform:rotate(360deg)}}";

const NAV: &[(&str, &str)] = &[
    ("/dashboard", "Dashboard"),
    ("/messages", "Messages"),
    ("/profile", "Profile"),
    ("/settings", "Settings"),
    ("/help", "Help"),
];

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn document(title: &str, head_extra: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\">\
<title>{title} · MedMentor</title>{head_extra}<style>{STYLE}</style></head>\
<body>{body}</body></html>"
    ))
}

fn action_script(endpoint: &str, target: &str) -> String {
    format!(
        "fetch('{endpoint}',{{method:'POST'}}).then(function(){{location.assign('{target}')}})"
    )
}

fn chrome(snapshot: &SessionSnapshot, content: &str) -> String {
    let links: String = NAV
        .iter()
        .map(|(href, label)| format!("<a href=\"{href}\">{label}</a>"))
        .collect();

    let account = match &snapshot.identity {
        Some(identity) => format!(
            "<span>{}</span><button onclick=\"{}\">Sign out</button>",
            escape(&identity.name),
            action_script("/api/auth/logout", "/login")
        ),
        None => "<a href=\"/login\">Sign in</a>".to_string(),
    };

    format!("<header><strong>MedMentor</strong><nav>{links}</nav>{account}</header><main>{content}</main>")
}

fn login_page() -> String {
    format!(
        "<main><h1>Sign in</h1>\
<form id=\"login\"><input name=\"email\" type=\"email\" placeholder=\"Email\">\
<input name=\"password\" type=\"password\" placeholder=\"Password\">\
<button type=\"submit\">Sign in</button></form>\
<button onclick=\"{}\">Try the demo</button>\
<p><a href=\"/register\">Create an account</a></p></main>\
<script>document.getElementById('login').onsubmit=function(e){{e.preventDefault();\
var f=new FormData(e.target);fetch('/api/auth/login',{{method:'POST',\
headers:{{'content-type':'application/json'}},\
body:JSON.stringify({{email:f.get('email'),password:f.get('password')}})}})\
.then(function(r){{if(r.ok)location.assign('/dashboard')}})}}</script>",
        action_script("/api/auth/demo", "/dashboard")
    )
}

fn register_page() -> String {
    "<main><h1>Create an account</h1>\
<p>Mentors and mentees register with their professional details.</p>\
<form id=\"register\"><input name=\"name\" placeholder=\"Full name\">\
<input name=\"email\" type=\"email\" placeholder=\"Email\">\
<input name=\"password\" type=\"password\" placeholder=\"Password\">\
<input name=\"registration_number\" placeholder=\"Registration number\">\
<input name=\"specialty\" placeholder=\"Specialty\">\
<button type=\"submit\">Register</button></form>\
<p><a href=\"/login\">Already registered?</a></p></main>"
        .to_string()
}

fn dashboard(snapshot: &SessionSnapshot) -> String {
    let greeting = match &snapshot.identity {
        Some(identity) => format!("Welcome back, {}!", escape(&identity.name)),
        None => "Welcome!".to_string(),
    };
    format!(
        "<h1>{greeting}</h1><section><h2>Upcoming mentoring sessions</h2>\
<p>No sessions scheduled.</p></section>"
    )
}

fn profile(snapshot: &SessionSnapshot) -> String {
    let Some(identity) = &snapshot.identity else {
        return "<h1>Profile</h1><p>Sign in to see your profile.</p>".to_string();
    };

    let field = |label: &str, value: Option<&str>| {
        format!("<dt>{label}</dt><dd>{}</dd>", escape(value.unwrap_or("-")))
    };

    format!(
        "<h1>Profile</h1><dl>{}{}{}{}{}</dl>",
        field("Name", Some(&identity.name)),
        field("Email", Some(&identity.email)),
        field("Phone", identity.phone.as_deref()),
        field("Registration", identity.registration_number.as_deref()),
        field("Specialty", identity.specialty.as_deref()),
    )
}

/// Renders `view` for the given session snapshot.
pub fn render(view: View, snapshot: &SessionSnapshot) -> Html<String> {
    match view {
        View::Login => document("Sign in", "", &login_page()),
        View::Register => document("Register", "", &register_page()),
        View::Dashboard => document("Dashboard", "", &chrome(snapshot, &dashboard(snapshot))),
        View::Messages => document(
            "Messages",
            "",
            &chrome(snapshot, "<h1>Messages</h1><p>Your inbox is empty.</p>"),
        ),
        View::Profile => document("Profile", "", &chrome(snapshot, &profile(snapshot))),
        View::Settings => document(
            "Settings",
            "",
            &chrome(snapshot, "<h1>Settings</h1><p>Notification and privacy preferences.</p>"),
        ),
        View::Help => document(
            "Help",
            "",
            &chrome(snapshot, "<h1>Help</h1><p>Open a ticket or browse the articles.</p>"),
        ),
    }
}

/// The loading indicator shown until the session store is initialized.
pub fn placeholder() -> Html<String> {
    document(
        "Loading",
        "<meta http-equiv=\"refresh\" content=\"1\">",
        "<div class=\"spinner\" role=\"status\" aria-label=\"Loading\"></div>",
    )
}
