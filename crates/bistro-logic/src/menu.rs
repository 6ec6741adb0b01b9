//! Menu built from the player's logged food items.
//!
//! Every distinct food name becomes one dish. Logging the same name again
//! bumps its order count; three orders make it a signature dish, which pays
//! double and is ordered three times as often.

use serde::{Deserialize, Serialize};

/// Food category as tagged by the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodCategory {
    Rice,
    Meat,
    Vegetable,
    Fruit,
    Dairy,
    Drink,
    Snack,
    #[default]
    #[serde(other)]
    Other,
}

impl FoodCategory {
    /// Base profit unit of a dish in this category.
    pub fn profit(self) -> u32 {
        match self {
            Self::Rice => 1,
            Self::Meat => 3,
            Self::Vegetable => 2,
            Self::Fruit => 2,
            Self::Dairy => 2,
            Self::Drink => 1,
            Self::Snack => 2,
            Self::Other => 1,
        }
    }

    /// Plate color, as an `0xRRGGBB` value.
    pub fn color(self) -> u32 {
        match self {
            Self::Rice => 0xfff8e1,
            Self::Meat => 0xd32f2f,
            Self::Vegetable => 0x4caf50,
            Self::Fruit => 0xff9800,
            Self::Dairy => 0xe3f2fd,
            Self::Drink => 0x81d4fa,
            Self::Snack => 0xffcc02,
            Self::Other => 0x9e9e9e,
        }
    }
}

/// One logged food record, as supplied by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub name: String,
    #[serde(default)]
    pub calories: u32,
    #[serde(default)]
    pub category: FoodCategory,
}

impl FoodItem {
    pub fn new(name: impl Into<String>, calories: u32, category: FoodCategory) -> Self {
        Self {
            name: name.into(),
            calories,
            category,
        }
    }
}

/// Orders needed before a dish becomes a signature dish.
pub const SIGNATURE_THRESHOLD: u32 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    pub category: FoodCategory,
    pub calories: u32,
    pub times_ordered: u32,
    pub is_signature: bool,
    pub profit: u32,
}

impl MenuItem {
    /// Payout base before satisfaction and modifier multipliers.
    pub fn base_profit(&self) -> u32 {
        if self.is_signature {
            self.profit * 2
        } else {
            self.profit
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    pub items: Vec<MenuItem>,
}

impl Menu {
    /// Build from food records, merging duplicate names in first-seen order.
    pub fn build(foods: &[FoodItem]) -> Self {
        let mut items: Vec<MenuItem> = Vec::new();
        for food in foods {
            if let Some(existing) = items.iter_mut().find(|i| i.name == food.name) {
                existing.times_ordered += 1;
                if existing.times_ordered >= SIGNATURE_THRESHOLD {
                    existing.is_signature = true;
                }
            } else {
                items.push(MenuItem {
                    name: food.name.clone(),
                    category: food.category,
                    calories: food.calories,
                    times_ordered: 1,
                    is_signature: false,
                    profit: food.category.profit(),
                });
            }
        }
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn signature_count(&self) -> usize {
        self.items.iter().filter(|i| i.is_signature).count()
    }

    pub fn find(&self, name: &str) -> Option<&MenuItem> {
        self.items.iter().find(|i| i.name == name)
    }

    /// Total weight for [`pick`](Self::pick): signature dishes count three times.
    pub fn total_weight(&self) -> u32 {
        self.items
            .iter()
            .map(|i| if i.is_signature { 3 } else { 1 })
            .sum()
    }

    /// Pick a dish with `roll` in `[0, 1)`. `None` on an empty menu.
    pub fn pick(&self, roll: f32) -> Option<&MenuItem> {
        let total = self.total_weight();
        if total == 0 {
            return None;
        }
        let mut slot = ((roll.clamp(0.0, 1.0) * total as f32) as u32).min(total - 1);
        for item in &self.items {
            let weight = if item.is_signature { 3 } else { 1 };
            if slot < weight {
                return Some(item);
            }
            slot -= weight;
        }
        self.items.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn foods() -> Vec<FoodItem> {
        vec![
            FoodItem::new("Salmon Bowl", 520, FoodCategory::Meat),
            FoodItem::new("Green Salad", 180, FoodCategory::Vegetable),
            FoodItem::new("Salmon Bowl", 520, FoodCategory::Meat),
            FoodItem::new("Salmon Bowl", 520, FoodCategory::Meat),
        ]
    }

    #[test]
    fn test_duplicates_merge_into_signature() {
        let menu = Menu::build(&foods());
        assert_eq!(menu.len(), 2);
        let salmon = menu.find("Salmon Bowl").unwrap();
        assert_eq!(salmon.times_ordered, 3);
        assert!(salmon.is_signature);
        assert_eq!(salmon.base_profit(), 6);
        assert_eq!(menu.find("Green Salad").unwrap().base_profit(), 2);
        assert_eq!(menu.signature_count(), 1);
    }

    #[test]
    fn test_pick_is_weighted_toward_signatures() {
        let menu = Menu::build(&foods());
        assert_eq!(menu.total_weight(), 4);
        assert_eq!(menu.pick(0.0).unwrap().name, "Salmon Bowl");
        assert_eq!(menu.pick(0.74).unwrap().name, "Salmon Bowl");
        assert_eq!(menu.pick(0.76).unwrap().name, "Green Salad");
        assert_eq!(menu.pick(1.0).unwrap().name, "Green Salad");
    }

    #[test]
    fn test_empty_menu_picks_nothing() {
        let menu = Menu::build(&[]);
        assert!(menu.pick(0.5).is_none());
    }

    #[test]
    fn test_unknown_category_is_other() {
        let item: FoodItem =
            serde_json::from_str(r#"{"name":"Mystery","category":"dessert"}"#).unwrap();
        assert_eq!(item.category, FoodCategory::Other);
        assert_eq!(item.calories, 0);
        assert_eq!(item.category.profit(), 1);
    }
}
