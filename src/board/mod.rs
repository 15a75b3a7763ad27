mod requests;
mod utils;

use crate::{
    database::CommentStore,
    error::{NotFoundError, ValidationError},
    models::comments::Comment,
    protocol::{html, html_builder},
    render::{BoardPage, SearchPage},
    search::{search, SearchQuery},
    utils::{now_str, run_blocking},
    AppState,
};
use actix_files::NamedFile;
use actix_multipart::Multipart;
use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use anyhow::Context;
use tracing::{info, warn};

use self::{requests::*, utils::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(board)
        .service(submit)
        .service(search_comments)
        .service(get_file);
}

crate::page_funcs! {
    (board, get, "/", {
        state: web::Data<AppState>,
        query: web::Query<BoardQuery>,
        req: HttpRequest,
    }),
    (submit, post, "/", {
        state: web::Data<AppState>,
        payload: Multipart,
    }),
    (search_comments, post, "/search", {
        state: web::Data<AppState>,
        form: web::Form<SearchRequest>,
    }),
    (get_file, get, "/static/{filename}", {
        state: web::Data<AppState>,
        filename: web::Path<String>,
        req: HttpRequest,
    }),
}

async fn load_comments(state: &web::Data<AppState>) -> anyhow::Result<Vec<Comment>> {
    let state = state.clone();
    run_blocking(move || state.store.load().context("loading comments")).await
}

async fn board_impl(
    state: web::Data<AppState>,
    query: web::Query<BoardQuery>,
    req: HttpRequest,
) -> anyhow::Result<HttpResponse> {
    let account_name = get_account_name(&req, &query);
    let comments = load_comments(&state).await?;

    let page = BoardPage {
        account_name: &account_name,
        app_name: &state.config.app_name,
        comments: &comments,
        hashtags: "",
        comment_text: "",
        image_url: "",
        form_error: None,
    };
    Ok(html(StatusCode::OK, page.render()))
}

async fn submit_impl(
    state: web::Data<AppState>,
    payload: Multipart,
) -> anyhow::Result<HttpResponse> {
    let mut request = read_submission(payload, state.uploads.max_bytes()).await?;
    if let Some(err) = request.photo_error.take() {
        return reject_submission(&state, request, err).await;
    }

    let upload = match request.photo.take() {
        Some(photo) => match state.uploads.accept(&photo.filename, photo.bytes) {
            Ok(upload) => Some(upload),
            Err(err) => return reject_submission(&state, request, err).await,
        },
        None => None,
    };

    let image = match upload {
        Some(upload) => {
            let state = state.clone();
            let url = run_blocking(move || state.uploads.store(&upload).context("storing upload"))
                .await?;
            Some(url)
        }
        None => None,
    };

    let comment = request.into_new_comment(image).into_comment(now_str());
    info!(
        username = %comment.username,
        image = comment.has_image(),
        "new comment"
    );
    let account_name = comment.username.clone();
    let image_url = comment.image.clone();

    let comments = {
        let state = state.clone();
        run_blocking(move || {
            state
                .store
                .update(|comments| CommentStore::append(comments, comment))
                .context("saving comment")
        })
        .await?
    };

    let page = BoardPage {
        account_name: &account_name,
        app_name: &state.config.app_name,
        comments: &comments,
        hashtags: "",
        comment_text: "",
        image_url: &image_url,
        form_error: None,
    };
    Ok(html_builder(StatusCode::OK)
        .cookie(account_cookie(&account_name))
        .body(page.render().into_string()))
}

/// Shows the form again with the entered values and nothing stored.
async fn reject_submission(
    state: &web::Data<AppState>,
    request: SubmitRequest,
    err: ValidationError,
) -> anyhow::Result<HttpResponse> {
    warn!(error = %err, "rejected submission");
    let comments = load_comments(state).await?;
    let message = err.to_string();

    let page = BoardPage {
        account_name: request.account.as_deref().unwrap_or(""),
        app_name: &state.config.app_name,
        comments: &comments,
        hashtags: request.hashtags.as_deref().unwrap_or(""),
        comment_text: request.comments.as_deref().unwrap_or(""),
        image_url: "",
        form_error: Some(&message),
    };
    Ok(html(StatusCode::BAD_REQUEST, page.render()))
}

async fn search_comments_impl(
    state: web::Data<AppState>,
    form: web::Form<SearchRequest>,
) -> anyhow::Result<HttpResponse> {
    let query: SearchQuery = form.into_inner().into();
    let comments = load_comments(&state).await?;
    let matches = search(&comments, &query);
    info!(
        hashtag = %query.hashtag,
        author = %query.author,
        found = matches.len(),
        "search"
    );

    let page = SearchPage {
        hashtag_query: &query.hashtag,
        matches: &matches,
    };
    Ok(html(StatusCode::OK, page.render()))
}

async fn get_file_impl(
    state: web::Data<AppState>,
    filename: web::Path<String>,
    req: HttpRequest,
) -> anyhow::Result<HttpResponse> {
    let filename = filename.into_inner();
    let path = state.uploads.resolve(&filename)?;
    let file = NamedFile::open(&path).map_err(|_| NotFoundError(filename))?;
    Ok(file.into_response(&req))
}
