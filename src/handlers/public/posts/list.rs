// handlers/public/posts/list.rs - GET /api/posts handler

use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::database::models::PostWithAuthor;
use crate::filter::{FilterOrder, PageInfo, Pagination, PostQuery};
use crate::docs::ErrorEnvelope;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Page number, from 1
    #[param(example = "1")]
    pub page: Option<String>,
    /// Posts per page
    #[param(example = "10")]
    pub limit: Option<String>,
    /// `createdAt`, `updatedAt` or `title`; a leading `-` sorts descending
    #[param(example = "-createdAt")]
    pub sort: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PostList {
    pub posts: Vec<PostWithAuthor>,
    pub pagination: PageInfo,
}

/// GET /api/posts?page=&limit=&sort= - one page of posts with their authors
#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "Posts",
    params(ListQuery),
    responses(
        (status = 200, description = "A page of posts", body = PostList),
        (status = 400, description = "Unknown sort field", body = ErrorEnvelope)
    )
)]
pub async fn posts_list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<PostList> {
    let pagination = Pagination::from_query(
        query.page.as_deref(),
        query.limit.as_deref(),
        &state.config.api,
    );
    let sort = FilterOrder::parse(query.sort.as_deref())?;

    let posts = state
        .store
        .list_posts(PostQuery {
            offset: pagination.offset(),
            limit: i64::from(pagination.limit),
            sort,
        })
        .await?;
    let total = state.store.count_posts().await?;

    Ok(ApiResponse::success(PostList {
        posts,
        pagination: pagination.page_info(total),
    }))
}
