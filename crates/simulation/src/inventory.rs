use std::collections::HashMap;

use bevy::prelude::*;
use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Raw materials consumed by placement.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode,
)]
pub enum ResourceKind {
    Wood,
    Stone,
    Plank,
    Fiber,
    Crystal,
}

impl ResourceKind {
    /// Stable display/iteration order for UI readouts and save files.
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Wood,
        ResourceKind::Stone,
        ResourceKind::Plank,
        ResourceKind::Fiber,
        ResourceKind::Crystal,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Wood => "Wood",
            ResourceKind::Stone => "Stone",
            ResourceKind::Plank => "Plank",
            ResourceKind::Fiber => "Fiber",
            ResourceKind::Crystal => "Crystal",
        }
    }
}

/// One line item of a placement cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceCost {
    pub kind: ResourceKind,
    pub amount: u32,
}

impl ResourceCost {
    pub const fn new(kind: ResourceKind, amount: u32) -> Self {
        Self { kind, amount }
    }
}

/// The player's material stock. Authoritative for affordability queries;
/// `consume` is single-shot and never retried.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    amounts: HashMap<ResourceKind, u32>,
}

impl Default for Inventory {
    fn default() -> Self {
        let mut amounts = HashMap::new();
        amounts.insert(ResourceKind::Wood, 40);
        amounts.insert(ResourceKind::Stone, 30);
        amounts.insert(ResourceKind::Plank, 20);
        amounts.insert(ResourceKind::Fiber, 12);
        amounts.insert(ResourceKind::Crystal, 4);
        Self { amounts }
    }
}

impl Inventory {
    /// An inventory with nothing in it (load path starts from here).
    pub fn empty() -> Self {
        Self {
            amounts: HashMap::new(),
        }
    }

    pub fn amount(&self, kind: ResourceKind) -> u32 {
        self.amounts.get(&kind).copied().unwrap_or(0)
    }

    pub fn add(&mut self, kind: ResourceKind, amount: u32) {
        *self.amounts.entry(kind).or_insert(0) += amount;
    }

    pub fn has(&self, kind: ResourceKind, amount: u32) -> bool {
        self.amount(kind) >= amount
    }

    pub fn can_afford(&self, costs: &[ResourceCost]) -> bool {
        costs.iter().all(|c| self.has(c.kind, c.amount))
    }

    /// Deducts `costs` from the stock. Callers must have checked
    /// `can_afford` first; consuming more than is stocked is a programmer
    /// error.
    pub fn consume(&mut self, costs: &[ResourceCost]) {
        debug_assert!(
            self.can_afford(costs),
            "consume called without an affordability check"
        );
        for cost in costs {
            let entry = self.amounts.entry(cost.kind).or_insert(0);
            *entry = entry.saturating_sub(cost.amount);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_stock() {
        let inv = Inventory::default();
        assert_eq!(inv.amount(ResourceKind::Wood), 40);
        assert_eq!(inv.amount(ResourceKind::Crystal), 4);
    }

    #[test]
    fn test_can_afford_multi_line_cost() {
        let inv = Inventory::default();
        let cost = [
            ResourceCost::new(ResourceKind::Wood, 10),
            ResourceCost::new(ResourceKind::Stone, 30),
        ];
        assert!(inv.can_afford(&cost));

        let too_much = [ResourceCost::new(ResourceKind::Stone, 31)];
        assert!(!inv.can_afford(&too_much));
    }

    #[test]
    fn test_consume_deducts() {
        let mut inv = Inventory::default();
        inv.consume(&[ResourceCost::new(ResourceKind::Fiber, 5)]);
        assert_eq!(inv.amount(ResourceKind::Fiber), 7);
    }

    #[test]
    fn test_missing_kind_reads_as_zero() {
        let inv = Inventory::empty();
        assert_eq!(inv.amount(ResourceKind::Wood), 0);
        assert!(!inv.has(ResourceKind::Wood, 1));
        assert!(inv.can_afford(&[]));
    }

    #[test]
    fn test_add_accumulates() {
        let mut inv = Inventory::empty();
        inv.add(ResourceKind::Plank, 3);
        inv.add(ResourceKind::Plank, 2);
        assert_eq!(inv.amount(ResourceKind::Plank), 5);
    }
}
