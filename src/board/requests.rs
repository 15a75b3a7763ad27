use serde::Deserialize;

use crate::{error::ValidationError, models::comments::NewComment, search::SearchQuery};

#[derive(Deserialize, Default)]
pub struct BoardQuery {
    #[serde(default)]
    pub account: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct SearchRequest {
    #[serde(default)]
    pub searchstr: String,
    #[serde(default)]
    pub authorname: String,
}

impl From<SearchRequest> for SearchQuery {
    fn from(req: SearchRequest) -> Self {
        SearchQuery::new(req.searchstr, req.authorname)
    }
}

pub struct PhotoField {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Fields of the multipart submission form.
#[derive(Default)]
pub struct SubmitRequest {
    pub account: Option<String>,
    pub hashtags: Option<String>,
    pub comments: Option<String>,
    pub photo: Option<PhotoField>,
    /// Set when the photo part was rejected while reading the body.
    pub photo_error: Option<ValidationError>,
}

impl SubmitRequest {
    pub fn into_new_comment(self, image: Option<String>) -> NewComment {
        NewComment {
            username: self.account,
            hashtags: self.hashtags,
            comment: self.comments,
            image,
        }
    }
}
