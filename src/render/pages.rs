use actix_web::http::StatusCode;

use super::{Markup, Template};
use crate::models::comments::Comment;

const BOARD_HTML: &str = include_str!("../../templates/board.html");
const SEARCH_HTML: &str = include_str!("../../templates/search.html");
const SEARCH_FORM_HTML: &str = include_str!("../../templates/search_form.html");
const COMMENT_HTML: &str = include_str!("../../templates/comment.html");
const IMAGE_HTML: &str = include_str!("../../templates/image.html");
const ERROR_HTML: &str = include_str!("../../templates/error.html");

pub fn render_comment(comment: &Comment) -> Markup {
    let image = if comment.has_image() {
        Template::new(IMAGE_HTML).attr("src", &comment.image).render()
    } else {
        Markup::empty()
    };
    Template::new(COMMENT_HTML)
        .markup("image", image)
        .text("username", &comment.username)
        .text("time", &comment.time)
        .text("comment", &comment.comment)
        .text("hashtags", &comment.hashtags)
        .render()
}

pub fn render_comments<'a, I>(comments: I) -> Markup
where
    I: IntoIterator<Item = &'a Comment>,
{
    comments.into_iter().map(render_comment).collect()
}

fn notice(class: &'static str, message: &str) -> Markup {
    Template::new(r#"<p class="{{class}}">{{message}}</p>"#)
        .attr("class", class)
        .text("message", message)
        .render()
}

fn search_form() -> Markup {
    Template::new(SEARCH_FORM_HTML).render()
}

/// The board view: submission form, every comment, and the search form.
pub struct BoardPage<'a> {
    pub account_name: &'a str,
    pub app_name: &'a str,
    pub comments: &'a [Comment],
    pub hashtags: &'a str,
    pub comment_text: &'a str,
    pub image_url: &'a str,
    pub form_error: Option<&'a str>,
}

impl<'a> BoardPage<'a> {
    pub fn render(&self) -> Markup {
        let comments = if self.comments.is_empty() {
            notice("empty", "No comments yet.")
        } else {
            render_comments(self.comments)
        };
        let form_error = match self.form_error {
            Some(message) => notice("form-error", message),
            None => Markup::empty(),
        };
        let image_preview = if self.image_url.is_empty() {
            Markup::empty()
        } else {
            Template::new(IMAGE_HTML).attr("src", self.image_url).render()
        };

        Template::new(BOARD_HTML)
            .text("app_name", self.app_name)
            .attr("account_name", self.account_name)
            .attr("hashtags", self.hashtags)
            .text("comment_text", self.comment_text)
            .markup("form_error", form_error)
            .markup("image_preview", image_preview)
            .markup("comments", comments)
            .markup("search_form", search_form())
            .render()
    }
}

pub struct SearchPage<'a> {
    pub hashtag_query: &'a str,
    pub matches: &'a [&'a Comment],
}

impl<'a> SearchPage<'a> {
    pub fn render(&self) -> Markup {
        let results = if self.matches.is_empty() {
            notice("empty", "No comments found.")
        } else {
            render_comments(self.matches.iter().copied())
        };
        Template::new(SEARCH_HTML)
            .text("hashtag_query", self.hashtag_query)
            .markup("results", results)
            .markup("search_form", search_form())
            .render()
    }
}

pub struct ErrorPage<'a> {
    pub status: StatusCode,
    pub message: &'a str,
}

impl<'a> ErrorPage<'a> {
    pub fn render(&self) -> Markup {
        Template::new(ERROR_HTML)
            .text("status", &self.status.to_string())
            .text("message", self.message)
            .render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(username: &str, image: &str) -> Comment {
        Comment {
            username: username.to_string(),
            time: "05/06/2024 08:30 AM".to_string(),
            hashtags: "#cats".to_string(),
            comment: "hello there".to_string(),
            image: image.to_string(),
        }
    }

    fn board_page<'a>(comments: &'a [Comment]) -> BoardPage<'a> {
        BoardPage {
            account_name: "alice",
            app_name: "Web Comment Board",
            comments,
            hashtags: "",
            comment_text: "",
            image_url: "",
            form_error: None,
        }
    }

    #[test]
    fn comment_without_image_has_no_image_block() {
        let html = render_comment(&comment("alice", "")).into_string();
        assert!(!html.contains("<img"));
        assert!(html.contains("<b>alice</b>"));
        assert!(html.contains("08:30 AM"));
        assert!(html.contains("REPLY"));
    }

    #[test]
    fn comment_with_image_renders_it() {
        let html = render_comment(&comment("bob", "/static/abc.png")).into_string();
        assert!(html.contains(r#"<img src="/static/abc.png""#));
    }

    #[test]
    fn user_fields_are_escaped() {
        let evil = Comment {
            username: "<b>mallory</b>".to_string(),
            time: "t".to_string(),
            hashtags: "#<i>x</i>".to_string(),
            comment: "<script>alert(1)</script>".to_string(),
            image: "\" onerror=\"alert(1)".to_string(),
        };
        let html = render_comment(&evil).into_string();
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<b>mallory"));
        assert!(!html.contains("<i>x"));
        assert!(!html.contains("\" onerror"));
    }

    #[test]
    fn empty_board_renders_without_comments() {
        let html = board_page(&[]).render().into_string();
        assert!(html.contains("No comments yet."));
        assert!(!html.contains("class=\"comment\""));
        assert!(html.contains("action=\"/search\""));
    }

    #[test]
    fn board_lists_comments_in_order() {
        let comments = vec![comment("first", ""), comment("second", "")];
        let html = board_page(&comments).render().into_string();
        let first = html.find("<b>first</b>").unwrap();
        let second = html.find("<b>second</b>").unwrap();
        assert!(first < second);
        assert!(html.contains("value=\"alice\""));
    }

    #[test]
    fn board_shows_form_error_and_entered_values() {
        let page = BoardPage {
            hashtags: "#\"quoted\"",
            comment_text: "draft </textarea>",
            form_error: Some("Only images allowed!"),
            ..board_page(&[])
        };
        let html = page.render().into_string();
        assert!(html.contains("Only images allowed!"));
        assert!(html.contains("value=\"#&quot;quoted&quot;\""));
        assert!(!html.contains("draft </textarea>"));
    }

    #[test]
    fn search_page_reports_no_matches() {
        let html = SearchPage {
            hashtag_query: "<dogs>",
            matches: &[],
        }
        .render()
        .into_string();
        assert!(html.contains("Search results for '&lt;dogs&gt;'"));
        assert!(html.contains("No comments found."));
    }

    #[test]
    fn error_page_shows_status() {
        let html = ErrorPage {
            status: StatusCode::NOT_FOUND,
            message: "file not found: x.png",
        }
        .render()
        .into_string();
        assert!(html.contains("404 Not Found"));
        assert!(html.contains("x.png"));
    }
}
