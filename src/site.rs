//! Demo site served by the `hashroute` binary.
//!
//! | Verb | Pattern    | Handler                                      |
//! |------|------------|----------------------------------------------|
//! | GET  | `/`        | view `index` (continuation style)            |
//! | GET  | `about`    | view `about` (continuation style)            |
//! | GET  | `contact`  | view `contact` (continuation style)          |
//! | GET  | `noview`   | literal HTML                                 |
//! | GET  | `user/:id` | view `user-profile`, `{{id}}` filled         |
//! | POST | `post`     | view `form-response`, submitted fields filled |

use crate::dispatch::{deferred, handler, with_continuation, HandlerError, HandlerOutput};
use crate::routing::{PatternError, RouteRegistry};
use crate::view::ViewLoader;

const NOT_PROVIDED: &str = "Not provided";

/// Register the demo routes.
pub fn register(registry: &mut RouteRegistry, views: &ViewLoader) -> Result<(), PatternError> {
    for (pattern, view) in [("/", "index"), ("about", "about"), ("contact", "contact")] {
        let views = views.clone();
        registry.get(
            pattern,
            with_continuation(move |next, _, _| {
                views.spawn_make(view, next);
                Ok(())
            }),
        )?;
    }

    registry.get(
        "noview",
        handler(|_, _| {
            Ok(HandlerOutput::literal(
                r#"<div class="container">Just sending in some text</div>"#,
            ))
        }),
    )?;

    let profile_views = views.clone();
    registry.get(
        "user/:id",
        deferred(move |params, _| {
            let views = profile_views.clone();
            let id = params.get("id").cloned().unwrap_or_default();
            async move {
                let template = views.load("user-profile").await?;
                Ok::<_, HandlerError>(fill(&template, &[("id", id.as_str())]))
            }
        }),
    )?;

    let response_views = views.clone();
    registry.post(
        "post",
        deferred(move |_, data| {
            let views = response_views.clone();
            let field = |name: &str| {
                data.form
                    .get(name)
                    .filter(|v| !v.is_empty())
                    .cloned()
                    .unwrap_or_else(|| NOT_PROVIDED.to_string())
            };
            let (name, email, comment) = (field("yourname"), field("email"), field("comment"));
            async move {
                let template = views.load("form-response").await?;
                Ok::<_, HandlerError>(fill(
                    &template,
                    &[
                        ("yourname", name.as_str()),
                        ("email", email.as_str()),
                        ("comment", comment.as_str()),
                    ],
                ))
            }
        }),
    )?;

    tracing::debug!(routes = registry.len(), "Demo routes registered");
    Ok(())
}

/// Replace `{{key}}` placeholders with HTML-escaped values. Unknown
/// placeholders are left as they are.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, value) in values {
        out = out.replace(&format!("{{{{{key}}}}}"), &escape_html(value));
    }
    out
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
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
    use std::sync::Arc;

    use crate::request::RequestData;
    use crate::routing::Verb;
    use crate::view::StaticViews;

    #[test]
    fn test_fill_escapes_values() {
        let html = fill("<b>{{name}}</b> {{other}}", &[("name", "<script>&")]);
        assert_eq!(html, "<b>&lt;script&gt;&amp;</b> {{other}}");
    }

    #[test]
    fn test_register_all_routes() {
        let views = ViewLoader::new(Arc::new(StaticViews::new()));
        let mut registry = RouteRegistry::new();
        register(&mut registry, &views).unwrap();

        assert_eq!(registry.routes(Verb::Get).len(), 5);
        assert_eq!(registry.routes(Verb::Post).len(), 1);
        assert!(registry.find(Verb::Get, "user/7").is_some());
        assert!(registry.find(Verb::Post, "post").is_some());
    }

    #[tokio::test]
    async fn test_post_defaults_missing_fields() {
        let views = ViewLoader::new(Arc::new(
            StaticViews::new().with("form-response", "{{yourname}}|{{email}}|{{comment}}"),
        ));
        let mut registry = RouteRegistry::new();
        register(&mut registry, &views).unwrap();

        let route = registry.find(Verb::Post, "post").unwrap();
        let mut data = RequestData::default();
        data.form.insert("yourname".into(), "Ann".into());

        match route.handler.call(&route.params, &data).unwrap() {
            HandlerOutput::Deferred(fut) => {
                assert_eq!(fut.await.unwrap(), "Ann|Not provided|Not provided")
            }
            other => panic!("unexpected output: {other:?}"),
        }
    }
}
