//! Item catalog - the built-in hairstyle set and JSON-backed catalogs.
//!
//! A catalog file is a JSON array of items:
//!
//! ```json
//! [
//!   {"id": "w1", "displayName": "Long Layers", "imageRef": "https://...", "category": "women"},
//!   {"id": "m1", "name": "Classic Fade", "imageUrl": "https://...", "gender": "men"}
//! ]
//! ```
//!
//! Both the current field names and the older `name`/`imageUrl`/`gender`
//! spelling are accepted.

use std::collections::HashSet;
use std::path::Path;

use tracing::info;

use crate::provider::ContentError;
use crate::types::Item;

/// Item categories offered by the built-in catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    #[default]
    All,
    Women,
    Men,
}

impl Category {
    /// Parse category from string (case-insensitive); `both` is an alias of `all`.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "all" | "both" => Some(Category::All),
            "women" => Some(Category::Women),
            "men" => Some(Category::Men),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::All => "all",
            Category::Women => "women",
            Category::Men => "men",
        }
    }

    pub fn matches(&self, item: &Item) -> bool {
        match self {
            Category::All => true,
            Category::Women | Category::Men => item.category.as_deref() == Some(self.as_str()),
        }
    }
}

/// Built-in hairstyle catalog: (id, name, image, category).
const BUILTIN: [(&str, &str, &str, &str); 32] = [
    ("w1", "Long Layers", "https://images.unsplash.com/photo-1562322140-8baeececf3df?w=400&h=400&fit=crop", "women"),
    ("w2", "Bob Cut", "https://images.unsplash.com/photo-1595475884562-073c30d45670?w=400&h=400&fit=crop", "women"),
    ("w3", "Pixie Cut", "https://images.unsplash.com/photo-1580618672591-eb180b1a973f?w=400&h=400&fit=crop", "women"),
    ("w4", "Beach Waves", "https://images.unsplash.com/photo-1522337660859-02fbefca4702?w=400&h=400&fit=crop", "women"),
    ("w5", "Balayage", "https://images.unsplash.com/photo-1605497788044-5a32c7078486?w=400&h=400&fit=crop", "women"),
    ("w6", "Shag Cut", "https://images.unsplash.com/photo-1487412912498-0447578fcca8?w=400&h=400&fit=crop", "women"),
    ("w7", "Lob (Long Bob)", "https://images.unsplash.com/photo-1508214751196-bcfd4ca60f91?w=400&h=400&fit=crop", "women"),
    ("w8", "Curtain Bangs", "https://images.unsplash.com/photo-1494790108377-be9c29b29330?w=400&h=400&fit=crop", "women"),
    ("w9", "Updo", "https://images.unsplash.com/photo-1531123897727-8f129e1688ce?w=400&h=400&fit=crop", "women"),
    ("w10", "French Braid", "https://images.unsplash.com/photo-1509967419530-da38b4704bc6?w=400&h=400&fit=crop", "women"),
    ("w11", "High Ponytail", "https://images.unsplash.com/photo-1524502397800-2eeaad7c3fe5?w=400&h=400&fit=crop", "women"),
    ("w12", "Messy Bun", "https://images.unsplash.com/photo-1488426862026-3ee34a7d66df?w=400&h=400&fit=crop", "women"),
    ("w13", "Sleek Straight", "https://images.unsplash.com/photo-1529626455594-4ff0802cfb7e?w=400&h=400&fit=crop", "women"),
    ("w14", "Curly Bob", "https://images.unsplash.com/photo-1541101767792-f9b2b1c4f127?w=400&h=400&fit=crop", "women"),
    ("w15", "Butterfly Cut", "https://images.unsplash.com/photo-1492106087820-71f1a00d2b11?w=400&h=400&fit=crop", "women"),
    ("w16", "Wolf Cut", "https://images.unsplash.com/photo-1513956589380-bad6acb9b9d4?w=400&h=400&fit=crop", "women"),
    ("m1", "Classic Fade", "https://images.unsplash.com/photo-1560575801-c45c98fd5f7d?w=400&h=400&fit=crop", "men"),
    ("m2", "Buzz Cut", "https://images.unsplash.com/photo-1506794778202-cad84cf45f1d?w=400&h=400&fit=crop", "men"),
    ("m3", "Undercut", "https://images.unsplash.com/photo-1519085360753-af0119f7cbe7?w=400&h=400&fit=crop", "men"),
    ("m4", "Pompadour", "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=400&h=400&fit=crop", "men"),
    ("m5", "Quiff", "https://images.unsplash.com/photo-1500648767791-00dcc994a43e?w=400&h=400&fit=crop", "men"),
    ("m6", "Slick Back", "https://images.unsplash.com/photo-1492562080023-ab3db95bfbce?w=400&h=400&fit=crop", "men"),
    ("m7", "Crew Cut", "https://images.unsplash.com/photo-1531746020798-e6953c6e8e04?w=400&h=400&fit=crop", "men"),
    ("m8", "Mohawk", "https://images.unsplash.com/photo-1564564321837-a57b7070ac4f?w=400&h=400&fit=crop", "men"),
    ("m9", "French Crop", "https://images.unsplash.com/photo-1506277886164-e25aa3f4ef7f?w=400&h=400&fit=crop", "men"),
    ("m10", "Textured Crop", "https://images.unsplash.com/photo-1552058544-f2b08422138a?w=400&h=400&fit=crop", "men"),
    ("m11", "Side Part", "https://images.unsplash.com/photo-1502823403499-6ccfcf4fb453?w=400&h=400&fit=crop", "men"),
    ("m12", "Faux Hawk", "https://images.unsplash.com/photo-1539571696357-5a69c17a67c6?w=400&h=400&fit=crop", "men"),
    ("m13", "High Fade", "https://images.unsplash.com/photo-1506794778202-cad84cf45f1d?w=400&h=400&fit=crop&sat=-100", "men"),
    ("m14", "Low Fade", "https://images.unsplash.com/photo-1544005313-94ddf0286df2?w=400&h=400&fit=crop", "men"),
    ("m15", "Taper Fade", "https://images.unsplash.com/photo-1603415526960-f7e0328c63b1?w=400&h=400&fit=crop", "men"),
    ("m16", "Curly Top", "https://images.unsplash.com/photo-1528892952291-009c663ce843?w=400&h=400&fit=crop", "men"),
];

/// An immutable set of distinct items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    items: Vec<Item>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids.
    pub fn new(items: Vec<Item>) -> Result<Self, ContentError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id.as_str()) {
                return Err(ContentError::DuplicateId(item.id.clone()));
            }
        }
        Ok(Self { items })
    }

    /// The 32 built-in hairstyles (16 women, 16 men).
    pub fn builtin() -> Self {
        let items = BUILTIN
            .iter()
            .map(|(id, name, image, category)| Item::new(*id, *name, *image).with_category(*category))
            .collect();
        Self { items }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ContentError> {
        let items: Vec<Item> = serde_json::from_str(json)?;
        Self::new(items)
    }

    /// Load a JSON catalog from disk.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ContentError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ContentError::Io {
                path: path.display().to_string(),
                source,
            })?;
        let catalog = Self::from_json_str(&json)?;
        info!(path = %path.display(), items = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items belonging to `category`, in catalog order.
    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &Item> + '_ {
        self.items.iter().filter(move |item| category.matches(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_catalog() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 32);
        assert_eq!(catalog.in_category(Category::Women).count(), 16);
        assert_eq!(catalog.in_category(Category::Men).count(), 16);
        assert_eq!(catalog.in_category(Category::All).count(), 32);

        let ids: HashSet<&str> = catalog.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids.len(), 32);
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!(Category::from_str("Both"), Some(Category::All));
        assert_eq!(Category::from_str("women"), Some(Category::Women));
        assert_eq!(Category::from_str("kids"), None);
    }

    #[test]
    fn test_from_json_accepts_both_spellings() {
        let json = r#"[
            {"id": "a", "displayName": "A", "imageRef": "img://a", "category": "women", "tags": ["short"]},
            {"id": "b", "name": "B", "imageUrl": "img://b", "gender": "men"}
        ]"#;
        let catalog = Catalog::from_json_str(json).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.items()[0].tags, vec!["short".to_string()]);
        assert_eq!(catalog.in_category(Category::Men).count(), 1);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"[
            {"id": "a", "displayName": "A", "imageRef": "img://a"},
            {"id": "a", "displayName": "A2", "imageRef": "img://a2"}
        ]"#;
        let err = Catalog::from_json_str(json).unwrap_err();
        assert!(matches!(err, ContentError::DuplicateId(id) if id == "a"));
    }

    #[test]
    fn test_invalid_json() {
        let err = Catalog::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ContentError::Parse(_)));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": "x", "displayName": "X", "imageRef": "img://x"}}]"#
        )
        .unwrap();

        let catalog = Catalog::load(file.path()).await.unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.items()[0].id, "x");
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = Catalog::load("/definitely/not/here.json").await.unwrap_err();
        assert!(matches!(err, ContentError::Io { .. }));
    }
}
