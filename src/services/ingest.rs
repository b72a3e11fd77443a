//! Movie ingestion: validates the create payload, resolves an optional
//! catalog reference, and enriches unset fields from the external catalog.
//!
//! Enrichment is opportunistic. A missing credential, an unreachable
//! catalog, or an unknown reference all degrade to absent optional fields;
//! the create itself still succeeds.

use crate::{
    error::{AppError, AppResult},
    models::NewMovie,
    services::{
        catalog::{Catalog, CatalogMovie, Lookup},
        resolver::{self, PosterReference},
    },
};

/// Caller-supplied fields for a new movie, before validation/enrichment.
///
/// This is the one canonical create contract: direct fields plus an
/// optional `tmdb_input` catalog reference (numeric ID, catalog URL, or a
/// free-text title) that triggers enrichment for whichever fields were left
/// unset.
#[derive(Debug, Clone, Default)]
pub struct MovieDraft {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub description: Option<String>,
    pub poster: Option<String>,
    pub trailer_url: Option<String>,
    pub tmdb_input: Option<String>,
}

/// Assemble a [`NewMovie`] from the draft, consulting the catalog when a
/// reference was given.
///
/// Without a reference, `title` and `genre` are mandatory. With one, both
/// may be filled from the catalog; when the catalog cannot help, `title`
/// falls back to the raw reference and `genre` to the empty string so the
/// record can still be persisted.
pub async fn assemble_movie(catalog: &dyn Catalog, draft: MovieDraft) -> AppResult<NewMovie> {
    let title = draft.title.as_deref().and_then(non_empty);
    let genre = draft.genre.as_deref().and_then(non_empty);
    let description = draft.description;
    let trailer = draft.trailer_url.as_deref().and_then(non_empty);
    let poster = draft
        .poster
        .as_deref()
        .and_then(resolver::normalize_poster_reference)
        .map(|reference| match reference {
            PosterReference::Absolute(url) => url,
            PosterReference::CatalogPath(path) => catalog.poster_url(&path),
        });

    let tmdb_input = draft.tmdb_input.as_deref().and_then(non_empty);
    let Some(input) = tmdb_input else {
        // Plain create: no external lookup is needed
        let (Some(title), Some(genre)) = (title, genre) else {
            return Err(AppError::InvalidInput(
                "title and genre are required".to_string(),
            ));
        };
        return Ok(NewMovie {
            tmdb_id: None,
            title,
            description: description.unwrap_or_default(),
            genre,
            poster_url: poster,
            trailer_url: trailer,
        });
    };

    let resolved_id = resolver::extract_catalog_id(&input);
    let lookup = match &resolved_id {
        Some(id) => catalog.movie_details(id).await,
        None => catalog.search_movie(&input).await,
    };
    let details = match lookup {
        Lookup::Found(movie) => Some(movie),
        Lookup::NotFound => {
            tracing::debug!(input = %input, "catalog has no match for reference");
            None
        }
        Lookup::Unavailable => {
            tracing::info!(input = %input, "catalog unavailable; creating with partial data");
            None
        }
    };

    let tmdb_id = resolved_id.or_else(|| details.as_ref().map(|d| d.id.clone()));

    let trailer_url = match (trailer, tmdb_id.as_deref()) {
        (Some(url), _) => Some(url),
        (None, Some(id)) => catalog.trailer_url(id).await.found(),
        (None, None) => None,
    };

    Ok(NewMovie {
        title: title
            .or_else(|| details.as_ref().map(|d| d.title.clone()))
            .unwrap_or_else(|| input.clone()),
        description: description
            .and_then(|d| non_empty(&d))
            .or_else(|| details.as_ref().and_then(|d| d.overview.clone()))
            .unwrap_or_default(),
        genre: genre
            .or_else(|| joined_genres(details.as_ref()))
            .unwrap_or_default(),
        poster_url: poster.or_else(|| {
            details
                .as_ref()
                .and_then(|d| d.poster_path.as_deref())
                .map(|path| catalog.poster_url(path))
        }),
        trailer_url,
        tmdb_id,
    })
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn joined_genres(details: Option<&CatalogMovie>) -> Option<String> {
    details
        .filter(|d| !d.genres.is_empty())
        .map(|d| d.genres.join(", "))
}
