use serde::{Deserialize, Serialize};

pub const DEFAULT_USERNAME: &str = "default";
pub const COMMENT_PLACEHOLDER: &str = "Post a comment...";

/// One entry on the board, stored verbatim in the data file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub username: String,
    pub time: String,
    pub hashtags: String,
    pub comment: String,
    #[serde(default)]
    pub image: String,
}

impl Comment {
    pub fn has_image(&self) -> bool {
        !self.image.is_empty()
    }
}

/// Raw values of a board submission, before defaults are applied.
#[derive(Debug, Default)]
pub struct NewComment {
    pub username: Option<String>,
    pub hashtags: Option<String>,
    pub comment: Option<String>,
    pub image: Option<String>,
}

impl NewComment {
    pub fn into_comment(self, time: String) -> Comment {
        Comment {
            username: non_empty(self.username).unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
            time,
            hashtags: self.hashtags.unwrap_or_default(),
            comment: non_empty(self.comment).unwrap_or_else(|| COMMENT_PLACEHOLDER.to_string()),
            image: self.image.unwrap_or_default(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
