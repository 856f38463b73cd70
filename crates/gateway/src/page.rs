//! Server-side rendering of the chat page.
//!
//! The HTML template is compiled into the binary with `include_str!` for
//! single-binary deployment. Assistant turns are written in markdown and
//! rendered to HTML before templating; user turns stay plain text and are
//! escaped by the template engine.

use minijinja::{Environment, context};
use pulldown_cmark::{Options, Parser, html};
use serde::Serialize;
use textline_core::turn::{Role, Turn};

/// The embedded chat page template.
const CHAT_TEMPLATE: &str = include_str!("../templates/chat.html");

/// One message as the template sees it.
#[derive(Serialize)]
struct MessageView {
    role: &'static str,
    content: String,
    html: String,
}

/// Render assistant markdown to HTML.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let parser = Parser::new_ext(markdown, options);
    let mut rendered = String::new();
    html::push_html(&mut rendered, parser);
    rendered
}

/// Render the full chat page for a conversation's turns.
pub fn render_chat(turns: &[Turn]) -> Result<String, minijinja::Error> {
    let mut env = Environment::new();
    env.set_undefined_behavior(minijinja::UndefinedBehavior::Strict);
    env.add_template("chat.html", CHAT_TEMPLATE)?;

    let messages: Vec<MessageView> = turns
        .iter()
        .map(|t| MessageView {
            role: t.role.as_str(),
            content: t.content.clone(),
            html: match t.role {
                Role::Assistant => markdown_to_html(&t.content),
                Role::User => String::new(),
            },
        })
        .collect();

    let template = env.get_template("chat.html")?;
    template.render(context! { messages => messages })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use textline_core::turn::ConversationId;

    fn turn(role: Role, content: &str) -> Turn {
        Turn {
            id: 0,
            conversation_id: ConversationId::from("c1"),
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn markdown_renders_emphasis_and_code() {
        let html = markdown_to_html("Here is **bold** and `code`.");
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<code>code</code>"));
    }

    #[test]
    fn markdown_renders_fenced_blocks() {
        let html = markdown_to_html("```rust\nfn main() {}\n```");
        assert!(html.contains("<pre>"));
        assert!(html.contains("fn main()"));
    }

    #[test]
    fn empty_conversation_renders_placeholder() {
        let page = render_chat(&[]).unwrap();
        assert!(page.contains("<!DOCTYPE html>"));
        assert!(page.contains("Send a message to start"));
    }

    #[test]
    fn turns_render_as_bubbles() {
        let turns = vec![
            turn(Role::User, "Hi there"),
            turn(Role::Assistant, "Hello **friend**"),
        ];
        let page = render_chat(&turns).unwrap();
        assert!(page.contains("Hi there"));
        assert!(page.contains("<strong>friend</strong>"));
        assert!(page.contains("bubble user"));
        assert!(page.contains("bubble assistant"));
    }

    #[test]
    fn user_content_is_escaped() {
        let turns = vec![turn(Role::User, "<script>alert(1)</script>")];
        let page = render_chat(&turns).unwrap();
        assert!(!page.contains("<script>alert(1)</script>"));
        assert!(page.contains("&lt;script&gt;"));
    }
}
