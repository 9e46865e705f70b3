// src/domain/auctions.rs
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use super::core::{AuctionId, Errors};
use super::states::State;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductCondition {
    New,
    Used,
    Refurbished,
}

impl fmt::Display for ProductCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductCondition::New => write!(f, "New"),
            ProductCondition::Used => write!(f, "Used"),
            ProductCondition::Refurbished => write!(f, "Refurbished"),
        }
    }
}

impl FromStr for ProductCondition {
    type Err = Errors;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "new" => Ok(ProductCondition::New),
            "used" => Ok(ProductCondition::Used),
            "refurbished" => Ok(ProductCondition::Refurbished),
            _ => Err(Errors::validation("Invalid Condition")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuctionStatus {
    Active,
    Completed,
}

impl fmt::Display for AuctionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuctionStatus::Active => write!(f, "Active"),
            AuctionStatus::Completed => write!(f, "Completed"),
        }
    }
}

impl FromStr for AuctionStatus {
    type Err = Errors;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(AuctionStatus::Active),
            "completed" => Ok(AuctionStatus::Completed),
            _ => Err(Errors::validation(format!("Invalid status value: {}", s))),
        }
    }
}

/// Raw input for a new auction, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuction {
    pub product_name: String,
    pub category: String,
    pub description: String,
    pub condition: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auction {
    pub id: AuctionId,
    pub product_name: String,
    pub category: String,
    pub description: String,
    pub condition: ProductCondition,
    pub status: AuctionStatus,
    pub created_at: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
}

impl Auction {
    /// Validate `input` and build an Active auction closing `duration` after `now`.
    pub fn create(input: NewAuction, now: DateTime<Utc>, duration: Duration) -> Result<Self, Errors> {
        // lengths are counted in characters, not bytes
        if input.product_name.chars().count() <= 1 {
            return Err(Errors::validation("ProductName too short"));
        }
        if input.category.chars().count() <= 2 {
            return Err(Errors::validation("Category too short"));
        }
        if input.description.chars().count() <= 10 {
            return Err(Errors::validation("Description too short"));
        }
        let condition = ProductCondition::from_str(&input.condition)?;
        let deadline = now
            .checked_add_signed(duration)
            .ok_or_else(|| Errors::validation("Auction duration out of range"))?;

        Ok(Auction {
            id: Uuid::new_v4(),
            product_name: input.product_name,
            category: input.category,
            description: input.description,
            condition,
            status: AuctionStatus::Active,
            created_at: now,
            deadline,
        })
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.deadline
    }

    pub fn accepts_bids_at(&self, now: DateTime<Utc>) -> bool {
        self.status == AuctionStatus::Active && !self.is_expired_at(now)
    }
}

impl State for Auction {
    fn inc(&self, now: DateTime<Utc>) -> Self {
        match self.status {
            AuctionStatus::Active if self.is_expired_at(now) => {
                // Active -> Completed
                Auction {
                    status: AuctionStatus::Completed,
                    ..self.clone()
                }
            },
            // Active -> Active (too early), Completed -> Completed
            _ => self.clone(),
        }
    }

    fn has_ended(&self) -> bool {
        self.status == AuctionStatus::Completed
    }
}
