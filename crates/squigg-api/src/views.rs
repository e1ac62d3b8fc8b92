use axum::{extract::State, response::Html};
use axum_extra::extract::cookie::CookieJar;
use minijinja::{Environment, Value};
use tracing::error;

use squigg_types::models::{Context, Locals, Meta};

use crate::auth::AppState;
use crate::content::DEFAULT_TOP_SQUIGGS;
use crate::error::ServiceError;
use crate::session::AuthError;

const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");

/// GET /: server-rendered front page.
pub async fn index(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Html<String>, ServiceError> {
    let user = match state.auth.resolve(&jar) {
        Ok(user) => Some(user),
        Err(AuthError::Rejected(_)) => None,
        Err(AuthError::Service(e)) => {
            error!("Session lookup failed, rendering anonymously: {:#}", e);
            None
        }
    };
    let squiggs = state.content.get_top_squiggs(DEFAULT_TOP_SQUIGGS)?;

    let locals = Locals {
        meta: Meta {
            title: "baroot?".into(),
            description: "baroot, baroot.".into(),
        },
        context: Context { user, squiggs },
    };

    let html = render_index(&locals).map_err(|e| ServiceError::Persistence(e.into()))?;
    Ok(Html(html))
}

/// The `.html` name turns on HTML autoescaping for every substitution.
pub fn render_index(locals: &Locals) -> Result<String, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template("index.html", INDEX_TEMPLATE)?;

    let tmpl = env.get_template("index.html")?;
    tmpl.render(Value::from_serialize(locals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use squigg_types::models::{SquiggView, User};

    fn locals(content: &str) -> Locals {
        Locals {
            meta: Meta {
                title: "baroot?".into(),
                description: "baroot, baroot.".into(),
            },
            context: Context {
                user: Some(User { id: "u1".into() }),
                squiggs: vec![SquiggView {
                    id: "s1".into(),
                    content: content.into(),
                    author_id: "u1".into(),
                    created_at: "March 4, 2017 at 09:15 UTC".into(),
                    upvoter_ids: vec!["u1".into()],
                    upvotes: 1,
                }],
            },
        }
    }

    #[test]
    fn renders_meta_and_squiggs() {
        let html = render_index(&locals("hello world")).unwrap();
        assert!(html.contains("<title>baroot?</title>"));
        assert!(html.contains("content=\"baroot, baroot.\""));
        assert!(html.contains("<p>hello world</p>"));
        assert!(html.contains("<time>March 4, 2017 at 09:15 UTC</time>"));
    }

    #[test]
    fn content_is_escaped() {
        let html = render_index(&locals("<script>alert(1)</script>")).unwrap();
        assert!(html.contains("<p>&lt;script&gt;alert(1)"));
        assert!(!html.contains("<script>alert"));
        // the embedded JSON context must not close its script tag early
        assert!(!html.contains("alert(1)</script>"));
    }

    #[test]
    fn anonymous_context_renders() {
        let mut anon = locals("hi");
        anon.context.user = None;
        let html = render_index(&anon).unwrap();
        assert!(html.contains("\"user\":null"));
    }
}
