use std::fs;
use std::path::PathBuf;

use log::debug;

use crate::errors::NotesError;
use crate::types::{IndexContext, Page};
use crate::utils::{escape_attr, escape_html};

/// Named views the dispatcher can render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Index,
    Edit,
    View,
}

impl View {
    pub fn name(&self) -> &'static str {
        match self {
            View::Index => "index",
            View::Edit => "edit",
            View::View => "view",
        }
    }

    fn builtin(&self) -> &'static str {
        match self {
            View::Index => INDEX_TEMPLATE,
            View::Edit => EDIT_TEMPLATE,
            View::View => VIEW_TEMPLATE,
        }
    }
}

/// Component for rendering HTML views.
///
/// `<template_dir>/<view>.html` overrides the built-in markup when present.
pub struct TemplateComponent {
    template_dir: PathBuf,
}

impl TemplateComponent {
    pub fn new(template_dir: PathBuf) -> Self {
        Self { template_dir }
    }

    fn load(&self, view: View) -> Result<String, NotesError> {
        let path = self.template_dir.join(format!("{}.html", view.name()));
        match fs::read_to_string(&path) {
            Ok(tpl) => Ok(tpl),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No {:?}, using built-in {} view", path, view.name());
                Ok(view.builtin().to_string())
            }
            Err(e) => Err(NotesError::TemplateError(format!("{:?}: {}", path, e))),
        }
    }

    pub fn render_index(&self, context: &IndexContext) -> Result<String, NotesError> {
        let mut links = String::new();
        for link in &context.links {
            links.push_str(&format!(
                "<li><a href=\"/view/{}\">{}</a></li>\n",
                escape_attr(link),
                escape_html(link)
            ));
        }
        let username_error = context
            .errors
            .get("Username")
            .map(|msg| format!("<p class=\"error\">{}</p>", escape_html(msg)))
            .unwrap_or_default();

        let tpl = self.load(View::Index)?;
        Ok(fill(&tpl, |key| match key {
            "TITLE" => Some(escape_html(&context.title)),
            "USERNAME" => Some(escape_attr(&context.username)),
            "USERNAME_ERROR" => Some(username_error.clone()),
            "YEAR" => Some(context.year.to_string()),
            "LINKS" => Some(links.clone()),
            _ => None,
        }))
    }

    /// Render a page through the edit or view template
    pub fn render_page(&self, view: View, page: &Page) -> Result<String, NotesError> {
        if view == View::Index {
            return Err(NotesError::TemplateError("index view needs an index context".to_string()));
        }
        let tpl = self.load(view)?;
        Ok(fill(&tpl, |key| match key {
            "TITLE" => Some(escape_html(page.id.as_str())),
            "BODY" => Some(escape_html(&page.body_text())),
            _ => None,
        }))
    }
}

/// Substitute `{{NAME}}` tokens in a single pass.
///
/// Inserted values are never rescanned. Unknown tokens are left as written.
fn fill(template: &str, value: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = &after[..end];
                match value(key) {
                    Some(v) => out.push_str(&v),
                    None => {
                        out.push_str("{{");
                        out.push_str(key);
                        out.push_str("}}");
                    }
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

const INDEX_TEMPLATE: &str = r#"<!doctype html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{{TITLE}}</title>
    <link rel="stylesheet" href="/css/site.css">
</head>
<body>
    <h1>{{TITLE}}</h1>
    <form method="POST" action="/">
        <label for="username">Username</label>
        <input type="text" id="username" name="username" value="{{USERNAME}}">
        {{USERNAME_ERROR}}
        <input type="submit" value="Save">
    </form>
    <p>
        <input type="text" id="notename" placeholder="New note" pattern="[A-Za-z0-9-]+">
        <button type="button" onclick="createNewNote()">Create</button>
    </p>
    <ul class="links">
{{LINKS}}    </ul>
    <footer>&copy; {{YEAR}} {{USERNAME}}</footer>
    <script>
        function createNewNote() {
            var name = document.getElementById("notename").value;
            if (name !== "") {
                window.location = "/edit/" + name;
            }
        }
    </script>
</body>
</html>
"#;

const EDIT_TEMPLATE: &str = r#"<!doctype html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Editing {{TITLE}}</title>
    <link rel="stylesheet" href="/css/site.css">
</head>
<body>
    <h1>Editing {{TITLE}}</h1>
    <form action="/save/{{TITLE}}" method="POST">
        <textarea name="body" rows="20" cols="80">{{BODY}}</textarea>
        <input type="submit" value="Save">
    </form>
</body>
</html>
"#;

const VIEW_TEMPLATE: &str = r#"<!doctype html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{{TITLE}}</title>
    <link rel="stylesheet" href="/css/site.css">
</head>
<body>
    <h1>{{TITLE}}</h1>
    <p>[<a href="/edit/{{TITLE}}">edit</a>] [<a href="/">index</a>]</p>
    <pre class="body">{{BODY}}</pre>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::PageId;

    fn component() -> (tempfile::TempDir, TemplateComponent) {
        let dir = tempfile::tempdir().unwrap();
        let component = TemplateComponent::new(dir.path().to_path_buf());
        (dir, component)
    }

    #[test]
    fn view_escapes_body() {
        let (_dir, templates) = component();
        let page = Page::new(PageId::parse("x").unwrap(), "<script>");
        let html = templates.render_page(View::View, &page).unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn template_dir_overrides_builtin() {
        let (dir, templates) = component();
        fs::write(dir.path().join("view.html"), "T={{TITLE}} B={{BODY}}").unwrap();
        let page = Page::new(PageId::parse("x").unwrap(), "y");
        assert_eq!(templates.render_page(View::View, &page).unwrap(), "T=x B=y");
    }

    #[test]
    fn placeholder_text_in_values_is_not_expanded() {
        let (_dir, templates) = component();
        let context = IndexContext {
            title: "Index".to_string(),
            links: vec!["alpha".to_string()],
            year: 2026,
            username: "{{LINKS}}".to_string(),
            ..Default::default()
        };
        let html = templates.render_index(&context).unwrap();
        assert!(html.contains("value=\"{{LINKS}}\""));
        assert_eq!(html.matches("href=\"/view/alpha\"").count(), 1);

        let page = Page::new(PageId::parse("x").unwrap(), "{{TITLE}} {{BODY}}");
        let html = templates.render_page(View::View, &page).unwrap();
        assert!(html.contains("<pre class=\"body\">{{TITLE}} {{BODY}}</pre>"));
    }

    #[test]
    fn fill_keeps_unknown_and_unterminated_tokens() {
        let out = fill("a {{X}} {{NOPE}} {{open", |key| (key == "X").then(|| "1".to_string()));
        assert_eq!(out, "a 1 {{NOPE}} {{open");
    }

    #[test]
    fn index_lists_links_and_error() {
        let (_dir, templates) = component();
        let mut context = IndexContext {
            title: "Index".to_string(),
            links: vec!["a".to_string(), "b-2".to_string()],
            year: 2026,
            username: "ada".to_string(),
            ..Default::default()
        };
        context.errors.insert("Username".to_string(), "Please enter a username.".to_string());
        let html = templates.render_index(&context).unwrap();
        assert!(html.contains("href=\"/view/b-2\""));
        assert!(html.contains("Please enter a username."));
        assert!(html.contains("2026"));
    }
}
