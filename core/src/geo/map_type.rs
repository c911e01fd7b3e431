use serde::{Deserialize, Serialize};
use std::fmt;

/// Rendering mode of the map surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapType {
    Roadmap,
    Satellite,
    Hybrid,
    #[default]
    Terrain,
}

impl MapType {
    pub const ALL: [MapType; 4] = [
        MapType::Roadmap,
        MapType::Satellite,
        MapType::Hybrid,
        MapType::Terrain,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MapType::Roadmap => "roadmap",
            MapType::Satellite => "satellite",
            MapType::Hybrid => "hybrid",
            MapType::Terrain => "terrain",
        }
    }

    /// Exact, case-sensitive match against the four mode names.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.as_str() == name)
    }

    /// Selects the mode from the `map` parameter of a page URL or bare query
    /// string. The first `map` parameter wins; anything unrecognized falls
    /// back to terrain.
    pub fn from_query(query: Option<&str>) -> Self {
        query
            .and_then(map_param)
            .and_then(Self::from_name)
            .unwrap_or_default()
    }
}

fn map_param(query: &str) -> Option<&str> {
    let query = query.split('#').next().unwrap_or_default();
    let query = match query.split_once('?') {
        Some((_, rest)) => rest,
        None => query,
    };
    query
        .split('&')
        .filter_map(|pair| match pair.split_once('=') {
            Some((key, value)) => Some((key, value)),
            None => Some((pair, "")),
        })
        .find(|(key, _)| *key == "map")
        .map(|(_, value)| value)
}

impl fmt::Display for MapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognized_modes_are_selected() {
        assert_eq!(MapType::from_query(Some("?map=roadmap")), MapType::Roadmap);
        assert_eq!(MapType::from_query(Some("map=satellite")), MapType::Satellite);
        assert_eq!(
            MapType::from_query(Some("https://example.org/track?zoom=3&map=hybrid#top")),
            MapType::Hybrid
        );
    }

    #[test]
    fn unknown_or_absent_falls_back_to_terrain() {
        assert_eq!(MapType::from_query(None), MapType::Terrain);
        assert_eq!(MapType::from_query(Some("")), MapType::Terrain);
        assert_eq!(MapType::from_query(Some("?map=moon")), MapType::Terrain);
        assert_eq!(MapType::from_query(Some("?map=Satellite")), MapType::Terrain);
        assert_eq!(MapType::from_query(Some("?zoom=4")), MapType::Terrain);
    }

    #[test]
    fn first_map_parameter_wins() {
        assert_eq!(
            MapType::from_query(Some("?map=roadmap&map=satellite")),
            MapType::Roadmap
        );
    }
}
