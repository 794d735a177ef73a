//! # Repositories
//!
//! One `#[repository]` singleton per collection. MongoDB is the store of
//! record; Redis caches hot single-document reads (users, programs).
//!
//! ```rust,ignore
//! use crate::repositories::programs::program_repo::ProgramRepository;
//!
//! let programs = ProgramRepository::instance();
//! let program = programs.find_by_id_or_slug("intro-to-python-a1b2c3").await?;
//! ```
//!
//! The free functions below are the shared query plumbing: paginated finds,
//! case-insensitive search filters and reaction toggles.

pub mod community;
pub mod content;
pub mod opportunities;
pub mod programs;
pub mod progress;
pub mod users;

use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::Collection;
use serde::de::DeserializeOwned;

use crate::core::errors::AppError;
use crate::domain::dto::common::{Page, PageQuery, Pagination};
use crate::domain::entities::reactions::{ReactionChange, ReactionKind, Reactions};
use crate::utils::string_utils::escape_regex;

/// `countDocuments` + `find().sort().skip().limit()` for one page
pub async fn find_page<T>(
    collection: &Collection<T>,
    filter: Document,
    sort: Document,
    query: &PageQuery,
) -> Result<Page<T>, AppError>
where
    T: DeserializeOwned + Unpin + Send + Sync,
{
    let total = collection.count_documents(filter.clone()).await?;

    let items: Vec<T> = collection
        .find(filter)
        .sort(sort)
        .skip(query.skip())
        .limit(query.limit() as i64)
        .await?
        .try_collect()
        .await?;

    Ok(Page {
        items,
        pagination: Pagination::from_query(query, total),
    })
}

/// Unpaginated find; `limit <= 0` means no limit
pub async fn find_all<T>(
    collection: &Collection<T>,
    filter: Document,
    sort: Document,
    limit: i64,
) -> Result<Vec<T>, AppError>
where
    T: DeserializeOwned + Unpin + Send + Sync,
{
    let mut find = collection.find(filter).sort(sort);
    if limit > 0 {
        find = find.limit(limit);
    }
    Ok(find.await?.try_collect().await?)
}

/// `{ $or: [{ f1: /term/i }, { f2: /term/i }] }` with the term escaped
pub fn search_filter(fields: &[&str], term: &str) -> Document {
    let pattern = escape_regex(term);
    let clauses: Vec<Bson> = fields
        .iter()
        .map(|field| Bson::Document(doc! { *field: { "$regex": &pattern, "$options": "i" } }))
        .collect();
    doc! { "$or": clauses }
}

/// Adds the search clause to `filter` when a term is present
pub fn with_search(mut filter: Document, fields: &[&str], query: &PageQuery) -> Document {
    if let Some(term) = query.search_term() {
        filter.extend(search_filter(fields, term));
    }
    filter
}

/// `{ _id: { $in: ids } }`
pub fn ids_filter(ids: &[ObjectId]) -> Document {
    doc! { "_id": { "$in": ids.to_vec() } }
}

/// Toggles a like/dislike on any document embedding [`Reactions`].
/// The decision is taken from `current`, the write itself is atomic.
pub async fn toggle_reaction<T>(
    collection: &Collection<T>,
    id: ObjectId,
    current: &Reactions,
    user: ObjectId,
    kind: ReactionKind,
) -> Result<ReactionChange, AppError>
where
    T: Send + Sync,
{
    let change = current.plan_toggle(&user, kind);
    let mut update = Reactions::update_document(user, kind, change);
    update.insert("$set", doc! { "updated_at": mongodb::bson::DateTime::now() });

    collection.update_one(doc! { "_id": id }, update).await?;
    Ok(change)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_filter_escapes_input() {
        let filter = search_filter(&["title", "description"], "c++");
        let clauses = filter.get_array("$or").unwrap();
        assert_eq!(clauses.len(), 2);

        let first = clauses[0].as_document().unwrap().get_document("title").unwrap();
        assert_eq!(first.get_str("$regex").unwrap(), "c\\+\\+");
        assert_eq!(first.get_str("$options").unwrap(), "i");
    }

    #[test]
    fn test_with_search_skips_blank_terms() {
        let query = PageQuery { search: Some("   ".into()), ..Default::default() };
        let filter = with_search(doc! { "is_active": true }, &["title"], &query);
        assert!(!filter.contains_key("$or"));
    }
}
