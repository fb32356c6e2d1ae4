//! Adapters for the external TIDAL collaborators: the catalog API and the
//! authenticated session that fronts it.

pub mod client;
pub mod models;
pub mod session;
pub mod url;

pub use client::{
    AlbumFilter, Catalog, CatalogError, FavoriteKind, Favorites, SearchKind, TidalApiClient,
};
pub use models::{
    Album, AlbumRef, Artist, ArtistBio, ArtistRef, Favorite, Lyrics, Page, Playlist,
    PlaylistCreator, PlaylistEntry, SearchResults, SessionInfo, Track, User,
};
pub use session::{
    LazySessionProvider, Session, SessionError, SessionFactory, SessionProvider, TokenFileLogin,
};
pub use url::{MediaLink, UrlMediaKind, parse_media_url};

/// Public web link for a media item
pub fn browse_url(kind: &str, id: impl std::fmt::Display) -> String {
    format!("https://tidal.com/browse/{kind}/{id}")
}
