//! Like / dislike bookkeeping shared by posts, comments and reviews.

use mongodb::bson::{doc, oid::ObjectId, Document};
use serde::{Deserialize, Serialize};

/// Which button the user pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionKind {
    Like,
    Dislike,
}

impl ReactionKind {
    fn field(&self) -> &'static str {
        match self {
            ReactionKind::Like => "likes",
            ReactionKind::Dislike => "dislikes",
        }
    }

    fn opposite(&self) -> Self {
        match self {
            ReactionKind::Like => ReactionKind::Dislike,
            ReactionKind::Dislike => ReactionKind::Like,
        }
    }
}

/// Outcome of a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionChange {
    /// The reaction was set (and the opposite one cleared)
    Added,
    /// The user pressed the same button twice; the reaction was cleared
    Removed,
}

/// User id sets, embedded into the owning document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Reactions {
    #[serde(default)]
    pub likes: Vec<ObjectId>,
    #[serde(default)]
    pub dislikes: Vec<ObjectId>,
}

impl Reactions {
    fn set(&self, kind: ReactionKind) -> &Vec<ObjectId> {
        match kind {
            ReactionKind::Like => &self.likes,
            ReactionKind::Dislike => &self.dislikes,
        }
    }

    fn set_mut(&mut self, kind: ReactionKind) -> &mut Vec<ObjectId> {
        match kind {
            ReactionKind::Like => &mut self.likes,
            ReactionKind::Dislike => &mut self.dislikes,
        }
    }

    /// Decides what pressing `kind` does for `user` in the current state
    pub fn plan_toggle(&self, user: &ObjectId, kind: ReactionKind) -> ReactionChange {
        if self.set(kind).contains(user) {
            ReactionChange::Removed
        } else {
            ReactionChange::Added
        }
    }

    /// Applies a toggle in memory; likes and dislikes stay mutually exclusive
    pub fn toggle(&mut self, user: ObjectId, kind: ReactionKind) -> ReactionChange {
        let change = self.plan_toggle(&user, kind);
        match change {
            ReactionChange::Removed => self.set_mut(kind).retain(|id| *id != user),
            ReactionChange::Added => {
                self.set_mut(kind.opposite()).retain(|id| *id != user);
                self.set_mut(kind).push(user);
            }
        }
        change
    }

    /// Atomic MongoDB update equivalent to [`Reactions::toggle`]
    pub fn update_document(user: ObjectId, kind: ReactionKind, change: ReactionChange) -> Document {
        match change {
            ReactionChange::Removed => doc! { "$pull": { kind.field(): user } },
            ReactionChange::Added => doc! {
                "$addToSet": { kind.field(): user },
                "$pull": { kind.opposite().field(): user },
            },
        }
    }

    pub fn like_count(&self) -> usize {
        self.likes.len()
    }

    pub fn dislike_count(&self) -> usize {
        self.dislikes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_then_dislike_is_exclusive() {
        let user = ObjectId::new();
        let mut reactions = Reactions::default();

        assert_eq!(reactions.toggle(user, ReactionKind::Like), ReactionChange::Added);
        assert_eq!(reactions.like_count(), 1);

        assert_eq!(reactions.toggle(user, ReactionKind::Dislike), ReactionChange::Added);
        assert_eq!(reactions.like_count(), 0);
        assert_eq!(reactions.dislike_count(), 1);
    }

    #[test]
    fn test_second_press_removes() {
        let user = ObjectId::new();
        let mut reactions = Reactions::default();

        reactions.toggle(user, ReactionKind::Like);
        assert_eq!(reactions.toggle(user, ReactionKind::Like), ReactionChange::Removed);
        assert!(reactions.likes.is_empty());
    }

    #[test]
    fn test_update_document_shape() {
        let user = ObjectId::new();
        let added = Reactions::update_document(user, ReactionKind::Like, ReactionChange::Added);
        assert!(added.get_document("$addToSet").unwrap().contains_key("likes"));
        assert!(added.get_document("$pull").unwrap().contains_key("dislikes"));

        let removed = Reactions::update_document(user, ReactionKind::Dislike, ReactionChange::Removed);
        assert!(removed.get_document("$pull").unwrap().contains_key("dislikes"));
        assert!(!removed.contains_key("$addToSet"));
    }
}
