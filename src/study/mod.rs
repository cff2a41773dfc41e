//! Client-side controllers. State lives behind locks and every mutation bumps
//! the shared [`Revision`].

pub mod bookmarks;
pub mod carousel;
pub mod characters;
pub mod flashcards;
pub mod revision;
pub mod search;
pub mod swipe;

pub use bookmarks::BookmarkSet;
pub use characters::{
    CharacterCache,
    LookupState,
};
pub use flashcards::{
    Flashcards,
    Group,
};
pub use revision::Revision;
pub use search::{
    Carousel,
    Category,
    SearchController,
    SearchSession,
};
pub use swipe::{
    SwipeDetector,
    SwipeDirection,
};
