//! Genre types

use serde::Serialize;

/// A browsable catalog genre
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Genre {
    /// Stable identifier used in routes and CLI arguments
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Catalog tag queried for this genre
    pub tag: &'static str,
}

/// Genres shown on the home page, in display order
pub const GENRES: &[Genre] = &[
    Genre { id: "rock", name: "Rock", tag: "rock" },
    Genre { id: "electronic", name: "Electronic", tag: "electronic" },
    Genre { id: "jazz", name: "Jazz", tag: "jazz" },
    Genre { id: "pop", name: "Pop", tag: "pop" },
    Genre { id: "classical", name: "Classical", tag: "classical" },
    Genre { id: "hiphop", name: "Hip Hop", tag: "hip_hop" },
    Genre { id: "ambient", name: "Ambient", tag: "ambient" },
    Genre { id: "folk", name: "Folk", tag: "folk" },
];

/// Look up a genre by id (case-insensitive)
pub fn genre_by_id(id: &str) -> Option<&'static Genre> {
    GENRES.iter().find(|g| g.id.eq_ignore_ascii_case(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hip_hop_uses_underscored_tag() {
        let genre = genre_by_id("HipHop").unwrap();
        assert_eq!(genre.tag, "hip_hop");
        assert_eq!(genre.name, "Hip Hop");
    }

    #[test]
    fn unknown_genre() {
        assert!(genre_by_id("polka").is_none());
    }
}
