//! Item catalog and ruleset categories.
//!
//! The catalog is the static registry of selectable items (civilization +
//! display attributes) and the configurable ruleset categories participants
//! vote on. It is pure lookup: all session state lives elsewhere.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One selectable item: a civilization with its display attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Canonical item identifier (civilization name)
    pub name: String,
    /// Leader shown alongside the civilization
    pub leader: String,
    /// Display emoji used by the presentation layer
    pub emoji: String,
    /// Reference link for the presentation layer
    pub link: String,
}

/// One ruleset dimension participants vote on, with its finite option set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupCategory {
    pub name: String,
    pub options: Vec<String>,
}

impl SetupCategory {
    pub fn new(name: impl Into<String>, options: &[&str]) -> Self {
        Self {
            name: name.into(),
            options: options.iter().map(|o| o.to_string()).collect(),
        }
    }

    /// Whether `option` is one of this category's configured options.
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    /// The fallback winner when a category receives zero votes under a
    /// forced resolution: the first configured option.
    pub fn default_option(&self) -> Option<&str> {
        self.options.first().map(|o| o.as_str())
    }
}

/// Static registry of selectable items plus the voting categories.
///
/// Catalog order is stable (declaration order); it matters only for
/// deterministic fixtures, since pool allocation re-shuffles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemCatalog {
    items: Vec<CatalogItem>,
    categories: Vec<SetupCategory>,
}

impl ItemCatalog {
    /// Builds a catalog from explicit items and categories.
    pub fn new(items: Vec<CatalogItem>, categories: Vec<SetupCategory>) -> Self {
        Self { items, categories }
    }

    /// All items, in catalog order.
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// All voting categories, in declaration order.
    pub fn categories(&self) -> &[SetupCategory] {
        &self.categories
    }

    /// Looks up a category by name.
    pub fn category(&self, name: &str) -> Option<&SetupCategory> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Looks up an item by its canonical name.
    pub fn item(&self, name: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|i| i.name == name)
    }

    /// Whether `name` identifies a catalog item.
    pub fn contains_item(&self, name: &str) -> bool {
        self.item(name).is_some()
    }

    /// Item names that are not in `banned`, preserving catalog order.
    pub fn available_excluding(&self, banned: &BTreeSet<String>) -> Vec<String> {
        self.items
            .iter()
            .filter(|i| !banned.contains(&i.name))
            .map(|i| i.name.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for ItemCatalog {
    fn default() -> Self {
        DEFAULT_CATALOG.clone()
    }
}

/// The built-in catalog: Civilization VI base-game + expansion leaders and
/// the standard voted ruleset categories.
static DEFAULT_CATALOG: Lazy<ItemCatalog> = Lazy::new(|| {
    ItemCatalog::new(default_items(), default_categories())
});

const WIKI_BASE: &str = "https://civilization.fandom.com/wiki";

fn default_items() -> Vec<CatalogItem> {
    // (civilization, leader, emoji)
    const LEADERS: &[(&str, &str, &str)] = &[
        ("America", "Teddy Roosevelt", "🇺🇸"),
        ("Arabia", "Saladin", "🕌"),
        ("Australia", "John Curtin", "🇦🇺"),
        ("Aztec", "Montezuma", "🐆"),
        ("Brazil", "Pedro II", "🇧🇷"),
        ("Byzantium", "Basil II", "☦️"),
        ("Canada", "Wilfrid Laurier", "🇨🇦"),
        ("China", "Qin Shi Huang", "🇨🇳"),
        ("Cree", "Poundmaker", "🦬"),
        ("Egypt", "Cleopatra", "🇪🇬"),
        ("England", "Victoria", "🏴󠁧󠁢󠁥󠁮󠁧󠁿"),
        ("Ethiopia", "Menelik II", "🇪🇹"),
        ("France", "Catherine de Medici", "🇫🇷"),
        ("Gaul", "Ambiorix", "⚒️"),
        ("Georgia", "Tamar", "🇬🇪"),
        ("Germany", "Frederick Barbarossa", "🇩🇪"),
        ("Gran Colombia", "Simón Bolívar", "🇨🇴"),
        ("Greece", "Pericles", "🇬🇷"),
        ("Hungary", "Matthias Corvinus", "🇭🇺"),
        ("Inca", "Pachacuti", "🦙"),
        ("India", "Gandhi", "🇮🇳"),
        ("Indonesia", "Gitarja", "🇮🇩"),
        ("Japan", "Hojo Tokimune", "🇯🇵"),
        ("Khmer", "Jayavarman VII", "🇰🇭"),
        ("Kongo", "Mvemba a Nzinga", "🇨🇩"),
        ("Korea", "Seondeok", "🇰🇷"),
        ("Macedon", "Alexander", "⚔️"),
        ("Mali", "Mansa Musa", "🇲🇱"),
        ("Māori", "Kupe", "🇳🇿"),
        ("Mapuche", "Lautaro", "🏹"),
        ("Maya", "Lady Six Sky", "🗿"),
        ("Mongolia", "Genghis Khan", "🇲🇳"),
        ("Netherlands", "Wilhelmina", "🇳🇱"),
        ("Norway", "Harald Hardrada", "🇳🇴"),
        ("Nubia", "Amanitore", "🏜️"),
        ("Ottoman", "Suleiman", "🇹🇷"),
        ("Persia", "Cyrus", "🇮🇷"),
        ("Phoenicia", "Dido", "⛵"),
        ("Poland", "Jadwiga", "🇵🇱"),
        ("Portugal", "João III", "🇵🇹"),
        ("Rome", "Trajan", "🏛️"),
        ("Russia", "Peter", "🇷🇺"),
        ("Scotland", "Robert the Bruce", "🏴󠁧󠁢󠁳󠁣󠁴󠁿"),
        ("Scythia", "Tomyris", "🐎"),
        ("Spain", "Philip II", "🇪🇸"),
        ("Sumeria", "Gilgamesh", "🪔"),
        ("Sweden", "Kristina", "🇸🇪"),
        ("Vietnam", "Bà Triệu", "🇻🇳"),
        ("Zulu", "Shaka", "🇿🇦"),
    ];

    LEADERS
        .iter()
        .map(|(name, leader, emoji)| CatalogItem {
            name: name.to_string(),
            leader: leader.to_string(),
            emoji: emoji.to_string(),
            link: format!("{}/{}_(Civ6)", WIKI_BASE, leader.replace(' ', "_")),
        })
        .collect()
}

fn default_categories() -> Vec<SetupCategory> {
    vec![
        SetupCategory::new(
            "Map",
            &[
                "Continents",
                "Pangaea",
                "Archipelago",
                "Fractal",
                "Seven Seas",
                "Highlands",
            ],
        ),
        SetupCategory::new("Speed", &["Standard", "Online", "Quick", "Epic"]),
        SetupCategory::new("Map Size", &["Duel", "Tiny", "Small", "Standard"]),
        SetupCategory::new("Disasters", &["2", "0", "1", "3", "4"]),
        SetupCategory::new("Resources", &["Standard", "Sparse", "Abundant"]),
        SetupCategory::new("Barbarians", &["Standard", "No Barbarians", "Raging"]),
    ]
}
