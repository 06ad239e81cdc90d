//! # Content Catalog
//!
//! Defines what can be placed in a chunk and how likely each category is.
//!
//! A placement decision is two independent uniform draws:
//!
//! 1. `classify(u)` walks the cumulative probability table in a fixed
//!    order (`tree`, `structure`, `decoration`, `cluster`, `empty`) and
//!    returns the first category whose cumulative probability reaches `u`.
//! 2. `pick_variant(kind, u)` selects uniformly from that kind's variant
//!    table. Variants are not weighted.
//!
//! Both are pure functions of their inputs; the RNG lives in the generator.

use serde::{Deserialize, Serialize};

/// Result of classifying one uniform draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// A single tree.
    Tree,
    /// A single man-made structure (lamp, gate, well).
    Structure,
    /// A single small ground prop.
    Decoration,
    /// A short run of trees at tight spacing.
    Cluster,
    /// Nothing is placed at this slot.
    Empty,
}

impl Category {
    /// Iteration order of the cumulative distribution walk.
    pub const ORDER: [Self; 5] = [
        Self::Tree,
        Self::Structure,
        Self::Decoration,
        Self::Cluster,
        Self::Empty,
    ];

    /// Returns the object kind placed for this category.
    ///
    /// Clusters are flora, so they place trees. `Empty` places nothing.
    #[inline]
    #[must_use]
    pub const fn object_kind(self) -> Option<ObjectKind> {
        match self {
            Self::Tree | Self::Cluster => Some(ObjectKind::Tree),
            Self::Structure => Some(ObjectKind::Structure),
            Self::Decoration => Some(ObjectKind::Decoration),
            Self::Empty => None,
        }
    }
}

/// Kind of a placed object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// Flora.
    Tree,
    /// Lamp, gate, well and similar.
    Structure,
    /// Small ground props.
    Decoration,
}

/// Sprite sheet a variant is cut from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpriteSheet {
    /// `trees.png`
    Trees,
    /// `objects.png`
    Objects,
    /// `props.png`
    Props,
}

/// One placeable variant of an object kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    /// Variant identifier (e.g. `tree2`).
    pub name: String,
    /// Footprint width in world units.
    pub width: f64,
    /// Footprint height in world units.
    pub height: f64,
    /// Pushes the object down so sprite padding sits on the ground line.
    #[serde(default)]
    pub vertical_offset: f64,
    /// Source sheet.
    pub sprite_sheet: SpriteSheet,
    /// Source rectangle X offset.
    pub sprite_x: f64,
    /// Source rectangle Y offset.
    pub sprite_y: f64,
}

impl Variant {
    /// Creates a variant description.
    #[must_use]
    pub fn new(
        name: &str,
        (width, height): (f64, f64),
        vertical_offset: f64,
        sprite_sheet: SpriteSheet,
        (sprite_x, sprite_y): (f64, f64),
    ) -> Self {
        Self {
            name: name.to_owned(),
            width,
            height,
            vertical_offset,
            sprite_sheet,
            sprite_x,
            sprite_y,
        }
    }
}

/// Probability of each category for a single slot.
///
/// Kept as named fields so the walk order cannot depend on map iteration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryWeights {
    /// Probability of a single tree.
    pub tree: f64,
    /// Probability of a structure.
    pub structure: f64,
    /// Probability of a decoration.
    pub decoration: f64,
    /// Probability of a tree cluster.
    pub cluster: f64,
    /// Probability of an empty slot.
    pub empty: f64,
}

impl CategoryWeights {
    /// Returns the probability configured for a category.
    #[inline]
    #[must_use]
    pub const fn get(&self, category: Category) -> f64 {
        match category {
            Category::Tree => self.tree,
            Category::Structure => self.structure,
            Category::Decoration => self.decoration,
            Category::Cluster => self.cluster,
            Category::Empty => self.empty,
        }
    }

    /// Sum of all probabilities.
    #[must_use]
    pub fn total(&self) -> f64 {
        Category::ORDER.iter().map(|c| self.get(*c)).sum()
    }
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            tree: 0.15,
            structure: 0.08,
            decoration: 0.12,
            cluster: 0.05,
            empty: 0.60,
        }
    }
}

/// Static tables of everything that can be placed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentCatalog {
    /// Category probability table.
    pub probabilities: CategoryWeights,
    /// Tree variants (also used by clusters).
    pub trees: Vec<Variant>,
    /// Structure variants.
    pub structures: Vec<Variant>,
    /// Decoration variants.
    pub decorations: Vec<Variant>,
}

impl ContentCatalog {
    /// Converts a uniform draw in `[0, 1)` into a category.
    ///
    /// Categories with a non-positive probability are never returned, even
    /// for `u == 0`. If rounding leaves a residual above the cumulative
    /// total, the result is [`Category::Empty`].
    #[must_use]
    pub fn classify(&self, u: f64) -> Category {
        let mut cumulative = 0.0;
        for category in Category::ORDER {
            let probability = self.probabilities.get(category);
            if probability <= 0.0 {
                continue;
            }
            cumulative += probability;
            if cumulative >= u {
                return category;
            }
        }
        Category::Empty
    }

    /// Returns the variant table for an object kind.
    #[inline]
    #[must_use]
    pub fn variants(&self, kind: ObjectKind) -> &[Variant] {
        match kind {
            ObjectKind::Tree => &self.trees,
            ObjectKind::Structure => &self.structures,
            ObjectKind::Decoration => &self.decorations,
        }
    }

    /// Picks a variant uniformly from a kind's table.
    ///
    /// Returns `None` when the table is empty; callers treat that slot as
    /// empty instead of failing the chunk.
    #[must_use]
    pub fn pick_variant(&self, kind: ObjectKind, u: f64) -> Option<&Variant> {
        let table = self.variants(kind);
        if table.is_empty() {
            return None;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
        let slot = ((u * table.len() as f64) as usize).min(table.len() - 1);
        table.get(slot)
    }

    /// Categories that can be drawn but have nothing to place.
    pub fn unplaceable_categories(&self) -> impl Iterator<Item = Category> + '_ {
        Category::ORDER.into_iter().filter(move |category| {
            self.probabilities.get(*category) > 0.0
                && category
                    .object_kind()
                    .is_some_and(|kind| self.variants(kind).is_empty())
        })
    }
}

impl Default for ContentCatalog {
    fn default() -> Self {
        Self {
            probabilities: CategoryWeights::default(),
            trees: vec![
                Variant::new("tree1", (118.0, 133.0), 27.0, SpriteSheet::Trees, (19.0, 27.0)),
                Variant::new("tree2", (103.0, 99.0), 61.0, SpriteSheet::Trees, (147.0, 61.0)),
                Variant::new("tree3", (130.0, 125.0), 35.0, SpriteSheet::Trees, (262.0, 35.0)),
            ],
            structures: vec![
                Variant::new("lamp", (31.0, 48.0), 0.0, SpriteSheet::Objects, (0.0, 48.0)),
                Variant::new("gate", (96.0, 75.0), 0.0, SpriteSheet::Objects, (32.0, 21.0)),
                Variant::new("well", (74.0, 74.0), 0.0, SpriteSheet::Objects, (138.0, 22.0)),
            ],
            decorations: vec![
                Variant::new("prop1", (32.0, 32.0), 0.0, SpriteSheet::Props, (0.0, 0.0)),
                Variant::new("prop2", (32.0, 32.0), 0.0, SpriteSheet::Props, (32.0, 0.0)),
                Variant::new("prop3", (32.0, 32.0), 0.0, SpriteSheet::Props, (64.0, 0.0)),
            ],
        }
    }
}
