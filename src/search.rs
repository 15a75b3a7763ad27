use crate::models::comments::Comment;

/// Substring filters over hashtags and author. Empty filters match anything.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub hashtag: String,
    pub author: String,
}

impl SearchQuery {
    pub fn new<H: Into<String>, A: Into<String>>(hashtag: H, author: A) -> Self {
        Self {
            hashtag: hashtag.into(),
            author: author.into(),
        }
    }

    pub fn matches(&self, comment: &Comment) -> bool {
        comment.hashtags.contains(self.hashtag.as_str())
            && comment.username.contains(self.author.as_str())
    }
}

/// Matching comments in their stored order.
pub fn search<'a>(comments: &'a [Comment], query: &SearchQuery) -> Vec<&'a Comment> {
    comments.iter().filter(|c| query.matches(c)).collect()
}
