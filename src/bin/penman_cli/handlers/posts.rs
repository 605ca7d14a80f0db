#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use penman::application::gate::{CREATE_POST_PATH, HOME_PATH, edit_post_path};
use penman::application::listing::PaginatedListing;
use penman::application::posts::{DeleteOutcome, PostEditor, PostLifecycle};
use penman::domain::lifecycle::Confirmation;
use penman::domain::types::{ListingFilter, PostType};
use penman::infra::http::HttpPostApi;
use penman_api_types::PostRecord;
use serde::Serialize;
use uuid::Uuid;

use crate::args::{FilterArg, PostsCmd};
use crate::client::{CliError, Ctx};
use crate::io::read_opt_value;
use crate::print::{print_json, render_controls};

#[derive(Serialize)]
struct ListingView<'a> {
    filter: &'static str,
    current_page: u32,
    total_pages: u32,
    total_items: u64,
    controls: Option<String>,
    items: &'a [PostRecord],
}

#[derive(Serialize)]
struct PostView<'a> {
    state: &'static str,
    post: Option<&'a PostRecord>,
}

struct PostEdits {
    title: Option<String>,
    content: Option<String>,
    content_file: Option<PathBuf>,
    slug: Option<String>,
    excerpt: Option<String>,
    tags: Option<String>,
    kind: Option<PostType>,
    auto_slug: bool,
    auto_excerpt: bool,
}

pub async fn handle(ctx: &Ctx, cmd: PostsCmd) -> Result<(), CliError> {
    match cmd {
        PostsCmd::List { filter, page } => list(ctx, filter, page).await,
        PostsCmd::Get { id } => get(ctx, id).await,
        PostsCmd::Create {
            title,
            content,
            content_file,
            slug,
            excerpt,
            tags,
            kind,
        } => {
            let edits = PostEdits {
                title: Some(title),
                content,
                content_file,
                slug,
                excerpt,
                tags,
                kind: Some(kind.into()),
                auto_slug: false,
                auto_excerpt: false,
            };
            create(ctx, edits).await
        }
        PostsCmd::Edit {
            id,
            title,
            content,
            content_file,
            slug,
            excerpt,
            tags,
            kind,
            auto_slug,
            auto_excerpt,
        } => {
            let edits = PostEdits {
                title,
                content,
                content_file,
                slug,
                excerpt,
                tags,
                kind: kind.map(Into::into),
                auto_slug,
                auto_excerpt,
            };
            edit(ctx, id, edits).await
        }
        PostsCmd::Publish { id } => set_published(ctx, id, true).await,
        PostsCmd::Unpublish { id } => set_published(ctx, id, false).await,
        PostsCmd::Delete { id, yes } => delete(ctx, id, Confirmation::from_flag(yes)).await,
    }
}

async fn list(ctx: &Ctx, filter: FilterArg, page: u32) -> Result<(), CliError> {
    ctx.require_session(HOME_PATH)?;

    let filter = ListingFilter::from(filter);
    let mut listing = PaginatedListing::new(ctx.posts.clone(), filter, ctx.page_size());
    listing
        .select_page(page)
        .await
        .map_err(|err| ctx.fail(err))?;

    print_json(&ListingView {
        filter: filter.as_str(),
        current_page: listing.query().page(),
        total_pages: listing.total_pages(),
        total_items: listing.total_items(),
        controls: listing.controls().as_ref().map(render_controls),
        items: listing.items(),
    })
}

async fn get(ctx: &Ctx, id: Uuid) -> Result<(), CliError> {
    let lifecycle = open(ctx, id).await?;
    print_lifecycle(&lifecycle)
}

async fn create(ctx: &Ctx, edits: PostEdits) -> Result<(), CliError> {
    ctx.require_session(CREATE_POST_PATH)?;

    let mut lifecycle = PostLifecycle::new(ctx.posts.clone());
    apply_edits(lifecycle.editor_mut(), edits)?;
    lifecycle.save().await.map_err(|err| ctx.fail(err))?;
    print_lifecycle(&lifecycle)
}

async fn edit(ctx: &Ctx, id: Uuid, edits: PostEdits) -> Result<(), CliError> {
    let mut lifecycle = open(ctx, id).await?;
    apply_edits(lifecycle.editor_mut(), edits)?;
    lifecycle.save().await.map_err(|err| ctx.fail(err))?;
    print_lifecycle(&lifecycle)
}

async fn set_published(ctx: &Ctx, id: Uuid, published: bool) -> Result<(), CliError> {
    let mut lifecycle = open(ctx, id).await?;
    let result = if published {
        lifecycle.publish().await
    } else {
        lifecycle.unpublish().await
    };
    result.map_err(|err| ctx.fail(err))?;
    print_lifecycle(&lifecycle)
}

async fn delete(ctx: &Ctx, id: Uuid, confirmation: Confirmation) -> Result<(), CliError> {
    let mut lifecycle = open(ctx, id).await?;
    let outcome = lifecycle
        .delete(confirmation)
        .await
        .map_err(|err| ctx.fail(err))?;

    if outcome == DeleteOutcome::Cancelled {
        eprintln!("deleting a post cannot be undone; re-run with --yes to confirm");
    }
    print_json(&serde_json::json!({
        "id": id,
        "deleted": outcome == DeleteOutcome::Deleted,
    }))
}

async fn open(ctx: &Ctx, id: Uuid) -> Result<PostLifecycle<HttpPostApi>, CliError> {
    ctx.require_session(&edit_post_path(id))?;
    PostLifecycle::open(ctx.posts.clone(), id)
        .await
        .map_err(|err| ctx.fail(err))
}

/// Title and content go first so derived fields follow them; explicit
/// re-derivation comes next and manual values last.
fn apply_edits(editor: &mut PostEditor, edits: PostEdits) -> Result<(), CliError> {
    if let Some(kind) = edits.kind {
        editor.set_kind(kind);
    }
    if let Some(title) = edits.title {
        editor.set_title(title);
    }
    if let Some(content) = read_opt_value(edits.content, edits.content_file)? {
        editor.set_content(content);
    }
    if let Some(tags) = edits.tags {
        editor.set_tags_input(tags);
    }

    if edits.auto_slug {
        editor.enable_slug_derivation();
    }
    if edits.auto_excerpt {
        editor.enable_excerpt_derivation();
    }
    if let Some(slug) = edits.slug {
        editor.edit_slug(slug);
    }
    if let Some(excerpt) = edits.excerpt {
        editor.edit_excerpt(excerpt);
    }
    Ok(())
}

fn print_lifecycle(lifecycle: &PostLifecycle<HttpPostApi>) -> Result<(), CliError> {
    print_json(&PostView {
        state: lifecycle.state().as_str(),
        post: lifecycle.record(),
    })
}
