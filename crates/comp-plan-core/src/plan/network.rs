use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CompPlanError;
use crate::numeric::{round_half_up, to_decimal, to_f64};
use crate::plan::tiers::{whole_number, TierId};
use crate::types::*;

/// Flat headcount and sales assumptions for the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkParams {
    pub consultant_headcount: u32,
    pub leader_headcount: u32,
    pub lol_headcount: u32,
    /// Monthly average sales per consultant
    pub consultant_avg_sales: Money,
    pub leader_avg_sales: Money,
    pub lol_avg_sales: Money,
    /// Monthly growth rate. Carried for projections; no calculation reads it.
    pub growth_rate_pct: Percent,
    /// Monthly promotion rate. Carried for projections; no calculation reads it.
    pub promotion_rate_pct: Percent,
    /// Monthly attrition rate. Carried for projections; no calculation reads it.
    pub attrition_rate_pct: Percent,
}

impl NetworkParams {
    pub fn headcount(&self, tier: TierId) -> u32 {
        match tier {
            TierId::Consultant => self.consultant_headcount,
            TierId::Leader => self.leader_headcount,
            TierId::LeaderOfLeaders => self.lol_headcount,
        }
    }

    pub fn avg_sales(&self, tier: TierId) -> Money {
        match tier {
            TierId::Consultant => self.consultant_avg_sales,
            TierId::Leader => self.leader_avg_sales,
            TierId::LeaderOfLeaders => self.lol_avg_sales,
        }
    }

    /// Headcount times average sales for one tier, in binary64.
    pub(crate) fn sales_f64(&self, tier: TierId) -> f64 {
        f64::from(self.headcount(tier)) * to_f64(self.avg_sales(tier))
    }

    /// Headcount times average sales for one tier (unrounded).
    pub fn tier_sales(&self, tier: TierId) -> Money {
        to_decimal(self.sales_f64(tier))
    }

    /// Sales volume across all tiers, summed in tier order, in binary64.
    pub(crate) fn total_volume_f64(&self) -> f64 {
        TierId::ALL.iter().map(|t| self.sales_f64(*t)).sum()
    }

    /// Sales volume across all tiers (unrounded).
    pub fn total_volume(&self) -> Money {
        to_decimal(self.total_volume_f64())
    }

    /// Scale every headcount by `multiplier`, holding average sales fixed.
    ///
    /// Headcounts round half-up to the nearest person and saturate at
    /// `u32::MAX`; the top tier never drops below one member.
    pub fn scaled(&self, multiplier: Multiplier) -> NetworkParams {
        let scale = |count: u32| -> u32 { round_half_up(f64::from(count) * multiplier) as u32 };
        NetworkParams {
            consultant_headcount: scale(self.consultant_headcount),
            leader_headcount: scale(self.leader_headcount),
            lol_headcount: scale(self.lol_headcount).max(1),
            ..self.clone()
        }
    }

    /// Apply a single typed field update.
    pub fn apply(&mut self, update: NetworkUpdate) {
        match update {
            NetworkUpdate::ConsultantHeadcount(v) => self.consultant_headcount = v,
            NetworkUpdate::LeaderHeadcount(v) => self.leader_headcount = v,
            NetworkUpdate::LolHeadcount(v) => self.lol_headcount = v,
            NetworkUpdate::ConsultantAvgSales(v) => self.consultant_avg_sales = v,
            NetworkUpdate::LeaderAvgSales(v) => self.leader_avg_sales = v,
            NetworkUpdate::LolAvgSales(v) => self.lol_avg_sales = v,
            NetworkUpdate::GrowthRatePct(v) => self.growth_rate_pct = v,
            NetworkUpdate::PromotionRatePct(v) => self.promotion_rate_pct = v,
            NetworkUpdate::AttritionRatePct(v) => self.attrition_rate_pct = v,
        }
    }
}

/// A single-field edit to `NetworkParams`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum NetworkUpdate {
    ConsultantHeadcount(u32),
    LeaderHeadcount(u32),
    LolHeadcount(u32),
    ConsultantAvgSales(Money),
    LeaderAvgSales(Money),
    LolAvgSales(Money),
    GrowthRatePct(Percent),
    PromotionRatePct(Percent),
    AttritionRatePct(Percent),
}

impl NetworkUpdate {
    /// Build an update from a field name and a decimal value. Headcounts
    /// must be whole numbers.
    pub fn parse(field: &str, value: Decimal) -> Result<Self, CompPlanError> {
        match field {
            "consultant_headcount" => Ok(NetworkUpdate::ConsultantHeadcount(whole_number(field, value)?)),
            "leader_headcount" => Ok(NetworkUpdate::LeaderHeadcount(whole_number(field, value)?)),
            "lol_headcount" => Ok(NetworkUpdate::LolHeadcount(whole_number(field, value)?)),
            "consultant_avg_sales" => Ok(NetworkUpdate::ConsultantAvgSales(value)),
            "leader_avg_sales" => Ok(NetworkUpdate::LeaderAvgSales(value)),
            "lol_avg_sales" => Ok(NetworkUpdate::LolAvgSales(value)),
            "growth_rate_pct" => Ok(NetworkUpdate::GrowthRatePct(value)),
            "promotion_rate_pct" => Ok(NetworkUpdate::PromotionRatePct(value)),
            "attrition_rate_pct" => Ok(NetworkUpdate::AttritionRatePct(value)),
            other => Err(CompPlanError::InvalidInput {
                field: other.into(),
                reason: "Not a network parameter".into(),
            }),
        }
    }
}
